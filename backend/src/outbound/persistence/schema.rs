//! Diesel table definitions for the PostgreSQL schema.
//!
//! Kept in lockstep with the migrations under `backend/migrations`; Diesel
//! validates every query in this crate against these definitions at compile
//! time. `diesel print-schema` can regenerate them from a live database when
//! the migrations move.

diesel::table! {
    /// Registered accounts across all three roles.
    ///
    /// Role-specific profile data lives in `tourist_profiles` and
    /// `organizer_profiles`; developers carry no profile row.
    users (id) {
        /// Primary key, UUID v4.
        id -> Uuid,
        /// Unique login name.
        username -> Varchar,
        /// Unique contact email, stored lowercase.
        email -> Varchar,
        /// Argon2id encoded password hash.
        password_hash -> Varchar,
        /// Account role: `tourist`, `organizer`, or `developer`.
        role -> Varchar,
        /// Optional contact phone number.
        phone -> Nullable<Varchar>,
        /// When the account was created.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Academic details attached to tourist accounts.
    tourist_profiles (user_id) {
        /// Owning account, one row per tourist at most.
        user_id -> Uuid,
        /// Free-form student identifier.
        student_id -> Nullable<Varchar>,
        /// Free-form department name.
        department -> Nullable<Varchar>,
        /// Free-form current semester.
        semester -> Nullable<Varchar>,
        /// Date of birth.
        date_of_birth -> Nullable<Date>,
    }
}

diesel::table! {
    /// Department and verification state attached to organizer accounts.
    organizer_profiles (user_id) {
        /// Owning account, one row per organizer at most.
        user_id -> Uuid,
        /// Department the organizer runs tours for.
        department -> Varchar,
        /// Free-form staff identifier.
        organizer_id -> Nullable<Varchar>,
        /// Short biography shown on tour pages.
        bio -> Nullable<Text>,
        /// Set by developers once the organizer is vetted.
        is_verified -> Bool,
    }
}

diesel::table! {
    /// Emergency contacts registered by account holders.
    ///
    /// `(user_id, phone)` is unique and at most one row per owner carries
    /// `is_primary`.
    emergency_contacts (id) {
        /// Primary key, UUID v4.
        id -> Uuid,
        /// Account the contact belongs to.
        user_id -> Uuid,
        /// Contact's full name.
        full_name -> Varchar,
        /// Relationship to the account holder.
        relationship -> Varchar,
        /// Phone number to dial.
        phone -> Varchar,
        /// Optional email address.
        email -> Nullable<Varchar>,
        /// Optional postal address.
        address -> Nullable<Text>,
        /// Whether this is the contact to call first.
        is_primary -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// University departments that tours are grouped under.
    departments (id) {
        /// Primary key, UUID v4.
        id -> Uuid,
        /// Unique full name.
        name -> Varchar,
        /// Short uppercase code such as `CSE`.
        code -> Varchar,
        /// Free-form description shown on department pages.
        description -> Text,
    }
}

diesel::table! {
    /// Campus tours offered by organizers.
    tours (id) {
        /// Primary key, UUID v4.
        id -> Uuid,
        /// Organizer who owns the tour.
        organizer_id -> Uuid,
        /// Department the tour belongs to, nulled when the department goes.
        department_id -> Nullable<Uuid>,
        /// Headline shown in the catalogue.
        title -> Varchar,
        /// Free-form description.
        description -> Text,
        /// Kind of experience: `campus`, `academic`, `cultural`,
        /// `adventure`, or `general`.
        category -> Varchar,
        /// Meeting point.
        location -> Varchar,
        /// When the tour starts.
        tour_date -> Timestamptz,
        /// Planned length in whole hours.
        duration_hours -> Int4,
        /// Capacity across all bookings.
        max_participants -> Int4,
        /// Price per participant, two fraction digits.
        price -> Numeric,
        /// Optional cover image link.
        image_url -> Nullable<Varchar>,
        /// Lifecycle state: `draft`, `published`, `cancelled`, `completed`.
        status -> Varchar,
        /// Link encoded in the printed QR poster, set while published.
        qr_code_url -> Nullable<Varchar>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Seat reservations tourists hold on tours.
    bookings (id) {
        /// Primary key, UUID v4.
        id -> Uuid,
        /// Tourist who holds the booking.
        tourist_id -> Uuid,
        /// Tour being booked.
        tour_id -> Uuid,
        /// Seats reserved.
        participants -> Int4,
        /// Accessibility or dietary notes for the organizer.
        special_requirements -> Nullable<Text>,
        /// Amount owed, frozen at booking time.
        total_price -> Numeric,
        /// Lifecycle state: `pending`, `confirmed`, `cancelled`, `completed`.
        status -> Varchar,
        /// Payment state: `pending`, `paid`, `refunded`.
        payment_status -> Varchar,
        /// Channel the payment came through, once paid.
        payment_method -> Nullable<Varchar>,
        /// Receipt reference shown to the tourist.
        transaction_id -> Nullable<Varchar>,
        /// When the booking was made.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tours saved to tourist wishlists.
    ///
    /// `(tourist_id, tour_id)` is unique; toggling deletes and reinserts.
    wishlist_items (id) {
        /// Primary key, UUID v4.
        id -> Uuid,
        /// Tourist who saved the tour.
        tourist_id -> Uuid,
        /// Saved tour.
        tour_id -> Uuid,
        /// When the tour was saved.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Tour reviews written by tourists who attended.
    ///
    /// `(tourist_id, tour_id)` is unique; resubmitting replaces the review.
    reviews (id) {
        /// Primary key, UUID v4.
        id -> Uuid,
        /// Tourist who wrote the review.
        tourist_id -> Uuid,
        /// Reviewed tour.
        tour_id -> Uuid,
        /// Star rating from 1 to 5.
        rating -> Int2,
        /// Free-form comment.
        comment -> Text,
        /// When the review was first written.
        created_at -> Timestamptz,
        /// When the review was last edited.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Notifications authored by organizers.
    notifications (id) {
        /// Primary key, UUID v4.
        id -> Uuid,
        /// Organizer who sent the notification.
        organizer_id -> Uuid,
        /// Headline shown in inboxes.
        title -> Varchar,
        /// Body text.
        message -> Text,
        /// Tone: `announcement`, `reminder`, `alert`, or `update`.
        notification_type -> Varchar,
        /// Whether the audience is every tourist rather than one tour.
        send_to_all -> Bool,
        /// Tour whose confirmed bookers receive it, when not sent to all.
        tour_id -> Nullable<Uuid>,
        /// Whether fan-out has run.
        is_sent -> Bool,
        /// Optional future delivery instant.
        scheduled_for -> Nullable<Timestamptz>,
        /// When the notification was authored.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-recipient inbox entries created by notification fan-out.
    ///
    /// `(user_id, notification_id)` is unique so a retried fan-out never
    /// delivers twice.
    user_notifications (id) {
        /// Primary key, UUID v4.
        id -> Uuid,
        /// Recipient account.
        user_id -> Uuid,
        /// Notification delivered.
        notification_id -> Uuid,
        /// Whether the recipient opened it.
        is_read -> Bool,
        /// When the recipient opened it.
        read_at -> Nullable<Timestamptz>,
        /// When the entry was delivered.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(tourist_profiles -> users (user_id));
diesel::joinable!(organizer_profiles -> users (user_id));
diesel::joinable!(emergency_contacts -> users (user_id));
diesel::joinable!(tours -> users (organizer_id));
diesel::joinable!(tours -> departments (department_id));
diesel::joinable!(bookings -> users (tourist_id));
diesel::joinable!(bookings -> tours (tour_id));
diesel::joinable!(wishlist_items -> users (tourist_id));
diesel::joinable!(wishlist_items -> tours (tour_id));
diesel::joinable!(reviews -> users (tourist_id));
diesel::joinable!(reviews -> tours (tour_id));
diesel::joinable!(notifications -> users (organizer_id));
diesel::joinable!(notifications -> tours (tour_id));
diesel::joinable!(user_notifications -> users (user_id));
diesel::joinable!(user_notifications -> notifications (notification_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    tourist_profiles,
    organizer_profiles,
    emergency_contacts,
    departments,
    tours,
    bookings,
    wishlist_items,
    reviews,
    notifications,
    user_notifications,
);
