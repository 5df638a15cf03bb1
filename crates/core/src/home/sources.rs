//! Collaborator traits for the upstream snapshot stores.
//!
//! The home service never computes snapshots itself; it triggers the
//! upstream recalculation and reads whatever state exists afterwards.
//! These traits are implemented by the db crate against the snapshot
//! tables, and mocked in service tests.

use async_trait::async_trait;
use fiscus_shared::AppResult;

use super::types::{DepartmentAmountRow, DepartmentName, TotalsSnapshot};

/// A totals snapshot store (real or projected), one row per fiscal year.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TotalsSource: Send + Sync {
    /// Recomputes the snapshot for the fiscal year.
    async fn recalc_for_fiscal_year(&self, fiscal_year_id: i64) -> AppResult<()>;

    /// Reads the snapshot for the fiscal year, if one exists.
    async fn find_by_fiscal_year(&self, fiscal_year_id: i64) -> AppResult<Option<TotalsSnapshot>>;
}

/// A per-department amount store scoped by fiscal year.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DepartmentAmountSource: Send + Sync {
    /// Recomputes all per-department rows for the fiscal year.
    async fn recalc_for_fiscal_year(&self, fiscal_year_id: i64) -> AppResult<()>;

    /// Reads the per-department rows for the fiscal year.
    async fn find_by_fiscal_year(
        &self,
        fiscal_year_id: i64,
    ) -> AppResult<Vec<DepartmentAmountRow>>;
}

/// A per-department amount store that is not fiscal-year scoped.
///
/// The projected spend table is maintained as one row per department with
/// no year column, so it is read whole and never recalculated from here.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DepartmentAmountTable: Send + Sync {
    /// Reads every row in the table.
    async fn find_all(&self) -> AppResult<Vec<DepartmentAmountRow>>;
}

/// The department registry, for display-name enrichment.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DepartmentDirectory: Send + Sync {
    /// Batched name lookup for exactly the given ids.
    ///
    /// Ids with no matching department are simply absent from the result.
    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<DepartmentName>>;
}
