//! Home aggregation service.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use fiscus_shared::AppResult;
use rust_decimal::Decimal;
use tracing::warn;

use super::fanout::settle_refresh;
use super::sources::{
    DepartmentAmountSource, DepartmentAmountTable, DepartmentDirectory, TotalsSource,
};
use super::types::{ComparisonRow, DepartmentAmountRow, GroupBy, Totals};

/// Collaborators wired into [`HomeService`].
pub struct HomeServiceProps {
    /// Real totals snapshot store.
    pub real_totals: Arc<dyn TotalsSource>,
    /// Projected totals snapshot store.
    pub projected_totals: Arc<dyn TotalsSource>,
    /// Real income-by-department store.
    pub real_incomes: Arc<dyn DepartmentAmountSource>,
    /// Projected income-by-department store.
    pub projected_incomes: Arc<dyn DepartmentAmountSource>,
    /// Real spend-by-department store.
    pub real_spends: Arc<dyn DepartmentAmountSource>,
    /// Projected spend-by-department table (not fiscal-year scoped).
    pub projected_spends: Arc<dyn DepartmentAmountTable>,
    /// Department registry for name enrichment.
    pub departments: Arc<dyn DepartmentDirectory>,
}

/// Read-only aggregation over the upstream snapshot stores.
///
/// Stateless; each call triggers a best-effort refresh, reads the refreshed
/// snapshots, and derives balances/diffs by subtraction.
pub struct HomeService {
    real_totals: Arc<dyn TotalsSource>,
    projected_totals: Arc<dyn TotalsSource>,
    real_incomes: Arc<dyn DepartmentAmountSource>,
    projected_incomes: Arc<dyn DepartmentAmountSource>,
    real_spends: Arc<dyn DepartmentAmountSource>,
    projected_spends: Arc<dyn DepartmentAmountTable>,
    departments: Arc<dyn DepartmentDirectory>,
}

impl HomeService {
    /// Creates the service from its collaborators.
    #[must_use]
    pub fn new(props: HomeServiceProps) -> Self {
        Self {
            real_totals: props.real_totals,
            projected_totals: props.projected_totals,
            real_incomes: props.real_incomes,
            projected_incomes: props.projected_incomes,
            real_spends: props.real_spends,
            projected_spends: props.projected_spends,
            departments: props.departments,
        }
    }

    /// Totals cards for the fiscal year.
    ///
    /// An absent or invalid fiscal year short-circuits to all-zero totals
    /// without touching the upstream stores. Refreshes are best-effort;
    /// snapshot reads propagate failure.
    ///
    /// # Errors
    ///
    /// Returns an error when either totals snapshot read fails.
    pub async fn totals(&self, fiscal_year_id: Option<i64>) -> AppResult<Totals> {
        let Some(fy) = valid_fiscal_year(fiscal_year_id) else {
            warn!("totals requested without a valid fiscal year id; returning zeros");
            return Ok(Totals::default());
        };

        settle_refresh(vec![
            self.real_totals.recalc_for_fiscal_year(fy),
            self.projected_totals.recalc_for_fiscal_year(fy),
        ])
        .await;

        let (real, projected) = tokio::join!(
            self.real_totals.find_by_fiscal_year(fy),
            self.projected_totals.find_by_fiscal_year(fy),
        );
        // A missing snapshot row reads as all-absent fields, hence zeros.
        let real = real?.unwrap_or_default();
        let projected = projected?.unwrap_or_default();

        let incomes = real.income();
        let spends = real.spend();
        let projected_incomes = projected.income();
        let projected_spends = projected.spend();

        Ok(Totals {
            incomes,
            spends,
            balance: incomes - spends,
            projected_incomes,
            projected_spends,
            projected_balance: projected_incomes - projected_spends,
        })
    }

    /// Income comparison table for the fiscal year.
    ///
    /// # Errors
    ///
    /// Returns an error when a row read or the name lookup fails.
    pub async fn income_comparison(
        &self,
        fiscal_year_id: Option<i64>,
        group_by: Option<&str>,
    ) -> AppResult<Vec<ComparisonRow>> {
        let Some(fy) = valid_fiscal_year(fiscal_year_id) else {
            return Ok(Vec::new());
        };
        if GroupBy::parse(group_by) != GroupBy::Department {
            return Ok(Vec::new());
        }

        settle_refresh(vec![
            self.real_incomes.recalc_for_fiscal_year(fy),
            self.projected_incomes.recalc_for_fiscal_year(fy),
        ])
        .await;

        let (real_rows, projected_rows) = tokio::join!(
            self.real_incomes.find_by_fiscal_year(fy),
            self.projected_incomes.find_by_fiscal_year(fy),
        );

        self.merge_by_department(real_rows?, projected_rows?).await
    }

    /// Spend comparison table for the fiscal year.
    ///
    /// Same shape as the income table with two upstream asymmetries: only
    /// the real spend store is refreshed, and the projected side is a full
    /// table read because that store is not fiscal-year scoped.
    ///
    /// # Errors
    ///
    /// Returns an error when a row read or the name lookup fails.
    pub async fn spend_comparison(
        &self,
        fiscal_year_id: Option<i64>,
        group_by: Option<&str>,
    ) -> AppResult<Vec<ComparisonRow>> {
        let Some(fy) = valid_fiscal_year(fiscal_year_id) else {
            return Ok(Vec::new());
        };
        if GroupBy::parse(group_by) != GroupBy::Department {
            return Ok(Vec::new());
        }

        settle_refresh(vec![self.real_spends.recalc_for_fiscal_year(fy)]).await;

        let (real_rows, projected_rows) = tokio::join!(
            self.real_spends.find_by_fiscal_year(fy),
            self.projected_spends.find_all(),
        );

        self.merge_by_department(real_rows?, projected_rows?).await
    }

    /// Joins the two sparse id->amount mappings into comparison rows.
    ///
    /// The row set is exactly the union of department ids on either side,
    /// in ascending id order, with one batched name lookup for the union.
    async fn merge_by_department(
        &self,
        real_rows: Vec<DepartmentAmountRow>,
        projected_rows: Vec<DepartmentAmountRow>,
    ) -> AppResult<Vec<ComparisonRow>> {
        let real = amounts_by_department(&real_rows);
        let projected = amounts_by_department(&projected_rows);

        let ids: BTreeSet<i64> = real.keys().chain(projected.keys()).copied().collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let id_list: Vec<i64> = ids.into_iter().collect();
        let names: HashMap<i64, String> = self
            .departments
            .find_by_ids(&id_list)
            .await?
            .into_iter()
            .map(|d| (d.id, d.name))
            .collect();

        Ok(id_list
            .into_iter()
            .map(|id| {
                let real = real.get(&id).copied().unwrap_or_default();
                let projected = projected.get(&id).copied().unwrap_or_default();
                ComparisonRow {
                    id,
                    name: names.get(&id).cloned().unwrap_or_default(),
                    real,
                    projected,
                    diff: real - projected,
                }
            })
            .collect())
    }
}

/// Builds the id->amount mapping for one side of a comparison.
///
/// Later rows overwrite earlier ones for the same department, matching the
/// one-row-per-department shape of the snapshot tables.
fn amounts_by_department(rows: &[DepartmentAmountRow]) -> HashMap<i64, Decimal> {
    rows.iter()
        .map(|row| (row.department_key(), row.amount.unwrap_or_default()))
        .collect()
}

/// A fiscal year id is usable when present and positive.
///
/// Non-positive ids never match a stored fiscal year, so rejecting them
/// here yields the same zeros/empty output as querying an empty snapshot,
/// minus the upstream round trips.
fn valid_fiscal_year(id: Option<i64>) -> Option<i64> {
    id.filter(|fy| *fy > 0)
}
