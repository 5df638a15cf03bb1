//! `SeaORM` entity definitions.
//!
//! Entry tables (`*_entries`, `*_lines`) are written by the upstream
//! recording flows; the snapshot tables are rewritten by the repository
//! recalculations and read by the home dashboard.

pub mod departments;
pub mod income_by_department;
pub mod income_entries;
pub mod projected_income_by_department;
pub mod projected_income_lines;
pub mod projected_spend_by_department;
pub mod projected_spend_lines;
pub mod projected_total_sums;
pub mod spend_by_department;
pub mod spend_entries;
pub mod total_sums;
