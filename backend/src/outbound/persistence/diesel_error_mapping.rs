//! Shared Diesel error mapping for the persistence adapters.
//!
//! Every port defines its own error enum, but they all share connection and
//! query variants. These helpers fold pool and Diesel failures into whichever
//! constructors the calling adapter passes in, so the match logic lives in
//! one place.

use tracing::debug;

use super::pool::PoolError;

/// Map pool failures into a port's connection error constructor.
pub(crate) fn map_common_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map Diesel failures into a port's query or connection constructor.
pub(crate) fn map_common_diesel_error<E, Q, C>(
    error: diesel::result::Error,
    query: Q,
    connection: C,
) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        _ => query("database error"),
    }
}

/// Map Diesel failures from writes that can trip a unique constraint.
///
/// Unique violations surface through `duplicate` with the database message so
/// callers can report which value collided; everything else falls through to
/// [`map_common_diesel_error`].
pub(crate) fn map_common_write_error<E, D, Q, C>(
    error: diesel::result::Error,
    duplicate: D,
    query: Q,
    connection: C,
) -> E
where
    D: FnOnce(String) -> E,
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        debug!(message = info.message(), "unique constraint violated");
        return duplicate(info.message().to_owned());
    }
    map_common_diesel_error(error, query, connection)
}

/// Error channel for transactions that can abort for domain reasons.
///
/// `diesel_async` requires the transaction error type to convert from
/// [`diesel::result::Error`]. This wrapper carries a port-specific abort
/// alongside that conversion, so transaction closures can use `?` on queries
/// and still bail out with a typed failure that rolls the transaction back.
pub(crate) enum TxError<E> {
    /// A query inside the transaction failed.
    Db(diesel::result::Error),
    /// The adapter aborted the transaction with a port error.
    Abort(E),
}

impl<E> From<diesel::result::Error> for TxError<E> {
    fn from(error: diesel::result::Error) -> Self {
        Self::Db(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum ProbeError {
        Connection(String),
        Query(String),
        Duplicate(String),
    }

    fn connection(message: impl Into<String>) -> ProbeError {
        ProbeError::Connection(message.into())
    }

    fn query(message: impl Into<String>) -> ProbeError {
        ProbeError::Query(message.into())
    }

    #[rstest]
    fn pool_errors_map_to_connection() {
        let mapped = map_common_pool_error(PoolError::checkout("pool exhausted"), connection);
        assert_eq!(mapped, ProbeError::Connection("pool exhausted".into()));

        let mapped = map_common_pool_error(PoolError::build("bad url"), connection);
        assert_eq!(mapped, ProbeError::Connection("bad url".into()));
    }

    #[rstest]
    #[case(diesel::result::Error::NotFound, ProbeError::Query("record not found".into()))]
    #[case(
        diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        ),
        ProbeError::Connection("database connection error".into())
    )]
    #[case(
        diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::CheckViolation,
            Box::new("check failed".to_owned()),
        ),
        ProbeError::Query("database error".into())
    )]
    fn diesel_errors_map_by_variant(
        #[case] error: diesel::result::Error,
        #[case] expected: ProbeError,
    ) {
        assert_eq!(map_common_diesel_error(error, query, connection), expected);
    }

    #[rstest]
    fn unique_violations_map_to_duplicate_with_the_database_message() {
        let message = "duplicate key value violates unique constraint \"users_username_key\"";
        let error = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new(message.to_owned()),
        );

        let mapped = map_common_write_error(error, ProbeError::Duplicate, query, connection);

        assert_eq!(mapped, ProbeError::Duplicate(message.into()));
    }

    #[rstest]
    fn non_unique_write_errors_fall_through() {
        let mapped = map_common_write_error(
            diesel::result::Error::NotFound,
            ProbeError::Duplicate,
            query,
            connection,
        );
        assert_eq!(mapped, ProbeError::Query("record not found".into()));
    }
}
