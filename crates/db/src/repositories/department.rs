//! Department registry repository.

use async_trait::async_trait;
use fiscus_core::home::DepartmentName;
use fiscus_core::home::sources::DepartmentDirectory;
use fiscus_shared::AppResult;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use super::db_err;
use crate::entities::departments;

/// Department name lookups over the `departments` table.
#[derive(Debug, Clone)]
pub struct DepartmentRepository {
    db: DatabaseConnection,
}

impl DepartmentRepository {
    /// Creates a new repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DepartmentDirectory for DepartmentRepository {
    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<DepartmentName>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = departments::Entity::find()
            .filter(departments::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|m| DepartmentName {
                id: m.id,
                name: m.name,
            })
            .collect())
    }
}
