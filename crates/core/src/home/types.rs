//! Home dashboard data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Totals cards for one fiscal year.
///
/// All six fields are plain currency amounts; the two balances are the only
/// derived values (`incomes - spends`, `projected_incomes - projected_spends`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Recorded incomes.
    pub incomes: Decimal,
    /// Recorded spends.
    pub spends: Decimal,
    /// `incomes - spends`.
    pub balance: Decimal,
    /// Forecast incomes.
    pub projected_incomes: Decimal,
    /// Forecast spends.
    pub projected_spends: Decimal,
    /// `projected_incomes - projected_spends`.
    pub projected_balance: Decimal,
}

/// One department's real-vs-projected pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// Department id.
    pub id: i64,
    /// Department display name; empty string when unresolved.
    pub name: String,
    /// Recorded amount; zero when the department has no real row.
    pub real: Decimal,
    /// Forecast amount; zero when the department has no projected row.
    pub projected: Decimal,
    /// `real - projected`.
    pub diff: Decimal,
}

/// Requested grouping for the comparison tables.
///
/// Only [`GroupBy::Department`] is wired up; `Type` and `Subtype` are
/// placeholders that yield empty tables until their snapshot sources exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupBy {
    /// Group amounts by department.
    Department,
    /// Group amounts by income/spend type (not yet wired).
    Type,
    /// Group amounts by subtype (not yet wired).
    Subtype,
}

impl GroupBy {
    /// Parses the raw `groupBy` query value.
    ///
    /// Matching is case-insensitive. Absent, empty, and unrecognized
    /// values all normalize to [`GroupBy::Department`]; only the literal
    /// `type`/`subtype` spellings select the placeholder groupings.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Department;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "type" => Self::Type,
            "subtype" => Self::Subtype,
            _ => Self::Department,
        }
    }
}

/// Upstream totals snapshot record.
///
/// The two totals stores never agreed on column naming, so both accepted
/// variants travel side by side and the accessors resolve
/// primary-then-fallback. Neither variant is canonical.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TotalsSnapshot {
    /// Income total under the `total_income` naming.
    pub total_income: Option<Decimal>,
    /// Income total under the `income_total` naming.
    pub income_total: Option<Decimal>,
    /// Spend total under the `total_spend` naming.
    pub total_spend: Option<Decimal>,
    /// Spend total under the `spend_total` naming.
    pub spend_total: Option<Decimal>,
}

impl TotalsSnapshot {
    /// Income amount: `total_income`, then `income_total`, then zero.
    #[must_use]
    pub fn income(&self) -> Decimal {
        self.total_income.or(self.income_total).unwrap_or_default()
    }

    /// Spend amount: `total_spend`, then `spend_total`, then zero.
    #[must_use]
    pub fn spend(&self) -> Decimal {
        self.total_spend.or(self.spend_total).unwrap_or_default()
    }
}

/// Nested department reference carried by some upstream rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepartmentRef {
    /// The referenced department id.
    pub id: i64,
}

/// Upstream per-department amount record.
///
/// Depending on the source table a row points at its department through a
/// nested reference, a flat `department_id` column, or its own primary key.
/// [`DepartmentAmountRow::department_key`] is the one place that ordering
/// is decided.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepartmentAmountRow {
    /// Nested department reference, when the source embeds one.
    pub department: Option<DepartmentRef>,
    /// Flat department id column, when the source has one.
    pub department_id: Option<i64>,
    /// The row's own id, for tables keyed directly by department.
    pub row_id: Option<i64>,
    /// The amount this row carries; absent/unparsable means zero.
    pub amount: Option<Decimal>,
}

impl DepartmentAmountRow {
    /// Resolves the department id: nested reference, then flat column,
    /// then the row's own id, then 0. First present wins.
    #[must_use]
    pub fn department_key(&self) -> i64 {
        self.department
            .map(|d| d.id)
            .or(self.department_id)
            .or(self.row_id)
            .unwrap_or(0)
    }
}

/// A department id/name pair from the directory lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentName {
    /// Department id.
    pub id: i64,
    /// Display name.
    pub name: String,
}
