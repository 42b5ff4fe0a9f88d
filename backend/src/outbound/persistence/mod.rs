//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain repository ports
//! backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! The persistence layer follows these principles:
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Async-safe pooling**: Connections are managed via `bb8` pools with
//!   proper async integration through `diesel-async`.
//! - **Strongly typed errors**: All database errors are mapped to domain
//!   persistence error types.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, PoolConfig, DieselUserRepository};
//!
//! let config = PoolConfig::new("postgres://localhost/mydb");
//! let pool = DbPool::new(config).await?;
//! let repo = DieselUserRepository::new(pool);
//! ```

mod booking_summaries;
mod diesel_booking_repository;
mod diesel_dashboard_repository;
mod diesel_department_repository;
mod diesel_emergency_contact_repository;
mod diesel_engagement_repository;
pub(crate) mod diesel_error_mapping;
mod diesel_notification_repository;
mod diesel_tour_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;
mod tour_summaries;

pub use diesel_booking_repository::DieselBookingRepository;
pub use diesel_dashboard_repository::DieselDashboardRepository;
pub use diesel_department_repository::DieselDepartmentRepository;
pub use diesel_emergency_contact_repository::DieselEmergencyContactRepository;
pub use diesel_engagement_repository::DieselEngagementRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_tour_repository::DieselTourRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
