//! Internal helpers shared by the tour, booking, and engagement services.
//!
//! Connection failures surface as service-unavailable so clients can retry;
//! plain query failures are internal faults. Refusals carried inside the
//! error keep their own codes.

use crate::domain::ports::{
    BookingPersistenceError, DepartmentPersistenceError, EngagementPersistenceError,
    TourPersistenceError,
};
use crate::domain::Error;

pub(crate) fn map_tour_error(error: TourPersistenceError) -> Error {
    match error {
        TourPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("tour repository unavailable: {message}"))
        }
        TourPersistenceError::Query { message } => {
            Error::internal(format!("tour repository error: {message}"))
        }
    }
}

pub(crate) fn map_department_error(error: DepartmentPersistenceError) -> Error {
    match error {
        DepartmentPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("department repository unavailable: {message}"))
        }
        DepartmentPersistenceError::Query { message } => {
            Error::internal(format!("department repository error: {message}"))
        }
        DepartmentPersistenceError::Duplicate { message } => Error::conflict(message),
    }
}

pub(crate) fn map_engagement_error(error: EngagementPersistenceError) -> Error {
    match error {
        EngagementPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("engagement repository unavailable: {message}"))
        }
        EngagementPersistenceError::Query { message } => {
            Error::internal(format!("engagement repository error: {message}"))
        }
    }
}

pub(crate) fn map_booking_error(error: BookingPersistenceError) -> Error {
    match error {
        BookingPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("booking repository unavailable: {message}"))
        }
        BookingPersistenceError::Query { message } => {
            Error::internal(format!("booking repository error: {message}"))
        }
        BookingPersistenceError::TourMissing { tour_id } => {
            Error::not_found(format!("tour {tour_id} not found"))
        }
        BookingPersistenceError::NotBookable { message } => Error::invalid_request(message),
        BookingPersistenceError::CapacityExceeded { available } => {
            Error::conflict(format!("only {available} spots remain on this tour"))
        }
        BookingPersistenceError::NotPayable { message } => Error::conflict(message),
    }
}
