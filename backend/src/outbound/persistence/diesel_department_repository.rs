//! PostgreSQL-backed `DepartmentRepository` implementation using Diesel ORM.
//!
//! Startup seeding inserts the default catalogue with
//! `ON CONFLICT (name) DO NOTHING`, so the server can run it on every boot
//! and only the first one writes anything.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::department::DEFAULT_DEPARTMENTS;
use crate::domain::ports::{DepartmentPersistenceError, DepartmentRepository};
use crate::domain::{Department, DepartmentDetails};

use super::diesel_error_mapping::{
    map_common_diesel_error, map_common_pool_error, map_common_write_error,
};
use super::models::{DepartmentRow, DepartmentUpdate, NewDepartmentRow};
use super::pool::{DbPool, PoolError};
use super::schema::departments;

/// Diesel-backed implementation of the department repository port.
#[derive(Clone)]
pub struct DieselDepartmentRepository {
    pool: DbPool,
}

impl DieselDepartmentRepository {
    /// Create a new repository with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DepartmentPersistenceError {
    map_common_pool_error(error, DepartmentPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> DepartmentPersistenceError {
    map_common_diesel_error(
        error,
        DepartmentPersistenceError::query,
        DepartmentPersistenceError::connection,
    )
}

fn map_write_error(error: diesel::result::Error) -> DepartmentPersistenceError {
    map_common_write_error(
        error,
        DepartmentPersistenceError::duplicate,
        DepartmentPersistenceError::query,
        DepartmentPersistenceError::connection,
    )
}

/// Convert a database row into a validated domain department.
fn row_to_department(row: DepartmentRow) -> Result<Department, DepartmentPersistenceError> {
    let details = DepartmentDetails::try_from_parts(&row.name, &row.code, &row.description)
        .map_err(|err| DepartmentPersistenceError::query(err.to_string()))?;
    Ok(Department {
        id: row.id,
        details,
    })
}

#[async_trait]
impl DepartmentRepository for DieselDepartmentRepository {
    async fn list(&self) -> Result<Vec<Department>, DepartmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DepartmentRow> = departments::table
            .order(departments::name.asc())
            .select(DepartmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_department).collect()
    }

    async fn find(&self, id: Uuid) -> Result<Option<Department>, DepartmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<DepartmentRow> = departments::table
            .find(id)
            .select(DepartmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_department).transpose()
    }

    async fn insert(&self, department: &Department) -> Result<(), DepartmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewDepartmentRow {
            id: department.id,
            name: &department.details.name,
            code: &department.details.code,
            description: &department.details.description,
        };
        diesel::insert_into(departments::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_write_error)?;
        Ok(())
    }

    async fn update(
        &self,
        id: Uuid,
        details: &DepartmentDetails,
    ) -> Result<bool, DepartmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = DepartmentUpdate {
            name: &details.name,
            code: &details.code,
            description: &details.description,
        };
        let updated = diesel::update(departments::table.find(id))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_write_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DepartmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // Tours reference departments with ON DELETE SET NULL, so this
        // detaches rather than cascades.
        let deleted = diesel::delete(departments::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn seed_defaults(&self) -> Result<u64, DepartmentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<NewDepartmentRow<'static>> = DEFAULT_DEPARTMENTS
            .iter()
            .copied()
            .map(|(code, name)| NewDepartmentRow {
                id: Uuid::new_v4(),
                name,
                code,
                description: "",
            })
            .collect();
        let inserted = diesel::insert_into(departments::table)
            .values(&rows)
            .on_conflict(departments::name)
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted as u64)
    }
}
