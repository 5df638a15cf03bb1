//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the snapshot and entry tables
//! - Repository implementations of the core collaborator traits
//! - Database migrations

pub mod entities;
pub mod migration;
pub mod repositories;

pub use repositories::{
    DepartmentRepository, IncomeByDepartmentRepository, ProjectedIncomeByDepartmentRepository,
    ProjectedSpendByDepartmentRepository, ProjectedTotalSumRepository, SpendByDepartmentRepository,
    TotalSumRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
