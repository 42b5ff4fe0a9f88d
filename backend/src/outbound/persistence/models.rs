//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and never
//! cross into the domain. Reads go through the `*Row` structs, inserts
//! through `New*Row` structs borrowing from domain values, and updates
//! through `*Update` changesets.

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    bookings, departments, emergency_contacts, notifications, organizer_profiles, reviews,
    tourist_profiles, tours, user_notifications, users, wishlist_items,
};

// ---------------------------------------------------------------------------
// Account models
// ---------------------------------------------------------------------------

/// Row struct for reading an account without its password hash.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Row struct for password verification, nothing else selected.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialsRow {
    pub id: Uuid,
    pub password_hash: String,
}

/// Insertable struct for creating new accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub phone: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

/// Row struct for reading a tourist profile.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tourist_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TouristProfileRow {
    pub user_id: Uuid,
    pub student_id: Option<String>,
    pub department: Option<String>,
    pub semester: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

/// Insertable struct for writing a tourist profile, also used on upsert.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = tourist_profiles, treat_none_as_null = true)]
pub(crate) struct NewTouristProfileRow<'a> {
    pub user_id: Uuid,
    pub student_id: Option<&'a str>,
    pub department: Option<&'a str>,
    pub semester: Option<&'a str>,
    pub date_of_birth: Option<NaiveDate>,
}

/// Row struct for reading an organizer profile.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = organizer_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrganizerProfileRow {
    pub user_id: Uuid,
    pub department: String,
    pub organizer_id: Option<String>,
    pub bio: Option<String>,
    pub is_verified: bool,
}

/// Insertable struct for writing an organizer profile, also used on upsert.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = organizer_profiles, treat_none_as_null = true)]
pub(crate) struct NewOrganizerProfileRow<'a> {
    pub user_id: Uuid,
    pub department: &'a str,
    pub organizer_id: Option<&'a str>,
    pub bio: Option<&'a str>,
    pub is_verified: bool,
}

// ---------------------------------------------------------------------------
// Emergency contact models
// ---------------------------------------------------------------------------

/// Row struct for reading from the emergency_contacts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = emergency_contacts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EmergencyContactRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub relationship: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new emergency contacts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = emergency_contacts)]
pub(crate) struct NewEmergencyContactRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: &'a str,
    pub relationship: &'a str,
    pub phone: &'a str,
    pub email: Option<&'a str>,
    pub address: Option<&'a str>,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct for replacing a contact's details.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = emergency_contacts, treat_none_as_null = true)]
pub(crate) struct ContactUpdate<'a> {
    pub full_name: &'a str,
    pub relationship: &'a str,
    pub phone: &'a str,
    pub email: Option<&'a str>,
    pub address: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Department models
// ---------------------------------------------------------------------------

/// Row struct for reading from the departments table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = departments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DepartmentRow {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub description: String,
}

/// Insertable struct for creating new departments.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = departments)]
pub(crate) struct NewDepartmentRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub code: &'a str,
    pub description: &'a str,
}

/// Changeset struct for replacing a department's details.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = departments)]
pub(crate) struct DepartmentUpdate<'a> {
    pub name: &'a str,
    pub code: &'a str,
    pub description: &'a str,
}

// ---------------------------------------------------------------------------
// Tour models
// ---------------------------------------------------------------------------

/// Row struct for reading from the tours table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tours)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TourRow {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub department_id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub tour_date: DateTime<Utc>,
    pub duration_hours: i32,
    pub max_participants: i32,
    pub price: BigDecimal,
    pub image_url: Option<String>,
    pub status: String,
    pub qr_code_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new tours.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tours)]
pub(crate) struct NewTourRow<'a> {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub department_id: Option<Uuid>,
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub location: &'a str,
    pub tour_date: DateTime<Utc>,
    pub duration_hours: i32,
    pub max_participants: i32,
    pub price: &'a BigDecimal,
    pub image_url: Option<&'a str>,
    pub status: &'a str,
    pub qr_code_url: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct for replacing a tour's content fields.
///
/// Status and QR link are deliberately absent; lifecycle moves go through
/// their own statements.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tours, treat_none_as_null = true)]
pub(crate) struct TourDetailsUpdate<'a> {
    pub department_id: Option<Uuid>,
    pub title: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub location: &'a str,
    pub tour_date: DateTime<Utc>,
    pub duration_hours: i32,
    pub max_participants: i32,
    pub price: &'a BigDecimal,
    pub image_url: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Booking models
// ---------------------------------------------------------------------------

/// Row struct for reading from the bookings table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingRow {
    pub id: Uuid,
    pub tourist_id: Uuid,
    pub tour_id: Uuid,
    pub participants: i32,
    pub special_requirements: Option<String>,
    pub total_price: BigDecimal,
    pub status: String,
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for reserving a booking.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub(crate) struct NewBookingRow<'a> {
    pub id: Uuid,
    pub tourist_id: Uuid,
    pub tour_id: Uuid,
    pub participants: i32,
    pub special_requirements: Option<&'a str>,
    pub total_price: &'a BigDecimal,
    pub status: &'a str,
    pub payment_status: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Wishlist models
// ---------------------------------------------------------------------------

/// Row struct for the wishlist_items table, read and written unchanged.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = wishlist_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WishlistItemRow {
    pub id: Uuid,
    pub tourist_id: Uuid,
    pub tour_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Review models
// ---------------------------------------------------------------------------

/// Row struct for reading from the reviews table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub tourist_id: Uuid,
    pub tour_id: Uuid,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for submitting a review.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = reviews)]
pub(crate) struct NewReviewRow<'a> {
    pub id: Uuid,
    pub tourist_id: Uuid,
    pub tour_id: Uuid,
    pub rating: i16,
    pub comment: &'a str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Notification models
// ---------------------------------------------------------------------------

/// Row struct for reading from the notifications table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub title: String,
    pub message: String,
    pub notification_type: String,
    pub send_to_all: bool,
    pub tour_id: Option<Uuid>,
    pub is_sent: bool,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for storing an authored notification.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub id: Uuid,
    pub organizer_id: Uuid,
    pub title: &'a str,
    pub message: &'a str,
    pub notification_type: &'a str,
    pub send_to_all: bool,
    pub tour_id: Option<Uuid>,
    pub is_sent: bool,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Row struct for the user_notifications table, read and written unchanged.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = user_notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserNotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub notification_id: Uuid,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
