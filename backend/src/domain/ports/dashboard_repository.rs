//! Port abstraction for dashboard aggregation adapters.
//!
//! Dashboards recompute their numbers on every request instead of keeping
//! counters, so the adapter exposes one aggregate query per dashboard plus
//! the paginated lists shown beneath the stat cards.
use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::domain::{User, UserId};
use pagination::{Page, PageRequest};

use super::booking_repository::BookingSummary;
use super::define_port_error;
use super::tour_repository::TourSummary;

define_port_error! {
    /// Persistence errors raised by dashboard adapters.
    pub enum DashboardPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "dashboard repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "dashboard repository query failed: {message}",
    }
}

/// Stat cards on the tourist dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TouristStats {
    /// Bookings ever made, cancelled ones included.
    pub total_bookings: i64,
    /// Confirmed bookings on tours that have not run yet.
    pub upcoming_bookings: i64,
    /// Tours saved to the wishlist.
    pub wishlist_count: i64,
    /// Reviews written.
    pub review_count: i64,
}

/// Stat cards on the organizer dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct OrganizerStats {
    /// Tours ever created, drafts included.
    pub total_tours: i64,
    /// Tours currently published.
    pub published_tours: i64,
    /// Bookings across all of the organizer's tours.
    pub total_bookings: i64,
    /// Sum of confirmed booking totals across the organizer's tours.
    pub total_revenue: BigDecimal,
}

/// Stat cards on the developer dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformStats {
    /// All accounts.
    pub total_users: i64,
    /// Tourist accounts.
    pub tourists: i64,
    /// Organizer accounts.
    pub organizers: i64,
    /// Developer accounts.
    pub developers: i64,
    /// All tours regardless of status.
    pub total_tours: i64,
    /// All bookings regardless of status.
    pub total_bookings: i64,
    /// All departments.
    pub total_departments: i64,
    /// Sum of confirmed booking totals across the platform.
    pub total_revenue: BigDecimal,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// Aggregate numbers for a tourist's dashboard.
    async fn tourist_stats(
        &self,
        tourist: &UserId,
    ) -> Result<TouristStats, DashboardPersistenceError>;

    /// A tourist's bookings, newest first, for the dashboard list.
    async fn tourist_recent_bookings(
        &self,
        tourist: &UserId,
        page: PageRequest,
    ) -> Result<Page<BookingSummary>, DashboardPersistenceError>;

    /// Aggregate numbers for an organizer's dashboard.
    async fn organizer_stats(
        &self,
        organizer: &UserId,
    ) -> Result<OrganizerStats, DashboardPersistenceError>;

    /// An organizer's tours, newest first, for the dashboard list.
    async fn organizer_tours(
        &self,
        organizer: &UserId,
        page: PageRequest,
    ) -> Result<Page<TourSummary>, DashboardPersistenceError>;

    /// Aggregate numbers for the developer dashboard.
    async fn platform_stats(&self) -> Result<PlatformStats, DashboardPersistenceError>;

    /// Most recently joined users, newest first.
    async fn recent_users(
        &self,
        page: PageRequest,
    ) -> Result<Page<User>, DashboardPersistenceError>;

    /// Most recently created tours regardless of status, newest first.
    async fn recent_tours(
        &self,
        page: PageRequest,
    ) -> Result<Page<TourSummary>, DashboardPersistenceError>;
}
