//! Home dashboard aggregation.
//!
//! This module combines precomputed real and projected snapshots for one
//! fiscal year into the dashboard payloads:
//! - Totals cards (incomes, spends, balances)
//! - Per-department real-vs-projected comparison tables
//!
//! The heavy lifting (recalculating and persisting the snapshots) belongs
//! to the upstream collaborators behind the [`sources`] traits; the only
//! arithmetic here is subtraction and the merge-by-department-id join.

mod fanout;
mod service;
pub mod sources;
mod types;

#[cfg(test)]
mod tests;

pub use service::{HomeService, HomeServiceProps};
pub use types::{
    ComparisonRow, DepartmentAmountRow, DepartmentName, DepartmentRef, GroupBy, Totals,
    TotalsSnapshot,
};
