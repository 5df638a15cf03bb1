//! Repository implementations of the core collaborator traits.
//!
//! Each repository owns one snapshot store: its recalculation rewrites the
//! snapshot from the entry tables in a single statement, and its reads map
//! entity models into the core upstream record types.

pub mod department;
pub mod income_by_department;
pub mod spend_by_department;
pub mod totals;

pub use department::DepartmentRepository;
pub use income_by_department::{IncomeByDepartmentRepository, ProjectedIncomeByDepartmentRepository};
pub use spend_by_department::{ProjectedSpendByDepartmentRepository, SpendByDepartmentRepository};
pub use totals::{ProjectedTotalSumRepository, TotalSumRepository};

use fiscus_shared::AppError;
use sea_orm::DbErr;

/// Maps a database error into the shared application error.
pub(crate) fn db_err(err: DbErr) -> AppError {
    AppError::Database(err.to_string())
}
