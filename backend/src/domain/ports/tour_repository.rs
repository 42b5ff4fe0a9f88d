//! Port abstraction for tour catalogue persistence adapters.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    Price, PriceBand, Tour, TourCategory, TourDetails, TourStatus, UserId,
};
use pagination::{Page, PageRequest};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by tour repository adapters.
    pub enum TourPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "tour repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "tour repository query failed: {message}",
    }
}

/// Catalogue filters applied to the published tour listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TourFilters {
    /// Case-insensitive needle matched against title, description, and
    /// department name.
    pub search: Option<String>,
    /// Restrict to one category.
    pub category: Option<TourCategory>,
    /// Restrict to one department.
    pub department: Option<Uuid>,
    /// Restrict to a price band.
    pub price_band: Option<PriceBand>,
}

/// Paginated catalogue search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourSearch {
    /// Filters to apply.
    pub filters: TourFilters,
    /// Page to fetch.
    pub page: PageRequest,
    /// Listing instant; only published tours dated after this appear.
    pub now: DateTime<Utc>,
}

/// Catalogue card for one tour.
///
/// `available_spots` is derived at read time from the confirmed bookings so
/// it is never stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourSummary {
    /// Tour identifier.
    pub id: Uuid,
    /// Headline.
    pub title: String,
    /// Kind of experience.
    pub category: TourCategory,
    /// Department name, when the tour has one.
    pub department_name: Option<String>,
    /// Meeting point.
    pub location: String,
    /// When the tour starts.
    pub tour_date: DateTime<Utc>,
    /// Planned length in whole hours.
    pub duration_hours: i32,
    /// Capacity across all bookings.
    pub max_participants: i32,
    /// Seats not yet taken by confirmed bookings.
    pub available_spots: i64,
    /// Price per participant.
    pub price: Price,
    /// Optional cover image link.
    pub image_url: Option<String>,
    /// Lifecycle state, relevant on organizer listings.
    pub status: TourStatus,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TourRepository: Send + Sync {
    /// Published future tours matching the filters, soonest first.
    async fn search(&self, request: &TourSearch)
    -> Result<Page<TourSummary>, TourPersistenceError>;

    /// Fetch a tour by identifier.
    async fn find(&self, id: Uuid) -> Result<Option<Tour>, TourPersistenceError>;

    /// Store a new tour.
    async fn insert(&self, tour: &Tour) -> Result<(), TourPersistenceError>;

    /// Replace a tour's content fields and department link, leaving status
    /// untouched.
    ///
    /// Returns `false` when the tour does not exist.
    async fn update_details(
        &self,
        id: Uuid,
        department_id: Option<Uuid>,
        details: &TourDetails,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, TourPersistenceError>;

    /// Move a tour to a new lifecycle state, adjusting the QR link in the
    /// same statement.
    ///
    /// Returns `false` when the tour does not exist.
    async fn set_status(
        &self,
        id: Uuid,
        status: TourStatus,
        qr_code_url: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, TourPersistenceError>;

    /// Replace just the QR link.
    ///
    /// Returns `false` when the tour does not exist.
    async fn set_qr_code_url(
        &self,
        id: Uuid,
        qr_code_url: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool, TourPersistenceError>;

    /// Remove a tour and its bookings.
    ///
    /// Returns `false` when the tour does not exist.
    async fn delete(&self, id: Uuid) -> Result<bool, TourPersistenceError>;

    /// Every tour owned by an organizer regardless of status, newest first.
    async fn list_for_organizer(
        &self,
        organizer: &UserId,
        page: PageRequest,
    ) -> Result<Page<TourSummary>, TourPersistenceError>;

    /// Published future tours in a department, soonest first.
    async fn list_for_department(
        &self,
        department: Uuid,
        now: DateTime<Utc>,
        page: PageRequest,
    ) -> Result<Page<TourSummary>, TourPersistenceError>;

    /// Up to `limit` other published future tours from the same department.
    async fn related(
        &self,
        department: Uuid,
        exclude: Uuid,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<TourSummary>, TourPersistenceError>;

    /// Participants across the tour's confirmed bookings.
    async fn confirmed_participants(&self, id: Uuid) -> Result<i64, TourPersistenceError>;
}
