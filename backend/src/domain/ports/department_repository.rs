//! Port abstraction for department persistence adapters.
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Department, DepartmentDetails};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by department repository adapters.
    pub enum DepartmentPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "department repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "department repository query failed: {message}",
        /// A department with the same name already exists.
        Duplicate { message: String } => "department already exists: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    /// All departments ordered by name.
    async fn list(&self) -> Result<Vec<Department>, DepartmentPersistenceError>;

    /// Fetch a department by identifier.
    async fn find(&self, id: Uuid) -> Result<Option<Department>, DepartmentPersistenceError>;

    /// Store a new department.
    async fn insert(&self, department: &Department) -> Result<(), DepartmentPersistenceError>;

    /// Replace a department's details.
    ///
    /// Returns `false` when the department does not exist.
    async fn update(
        &self,
        id: Uuid,
        details: &DepartmentDetails,
    ) -> Result<bool, DepartmentPersistenceError>;

    /// Remove a department. Tours keep running and simply lose the link.
    ///
    /// Returns `false` when the department does not exist.
    async fn delete(&self, id: Uuid) -> Result<bool, DepartmentPersistenceError>;

    /// Insert the default departments, skipping names that already exist.
    ///
    /// Returns how many rows were actually inserted so startup can log
    /// whether seeding did anything.
    async fn seed_defaults(&self) -> Result<u64, DepartmentPersistenceError>;
}
