//! Totals snapshot repositories (real and projected).

use async_trait::async_trait;
use fiscus_core::home::TotalsSnapshot;
use fiscus_core::home::sources::TotalsSource;
use fiscus_shared::AppResult;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, Statement};

use super::db_err;
use crate::entities::{projected_total_sums, total_sums};

/// Real totals snapshot store over the `total_sums` table.
#[derive(Debug, Clone)]
pub struct TotalSumRepository {
    db: DatabaseConnection,
}

impl TotalSumRepository {
    /// Creates a new repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TotalsSource for TotalSumRepository {
    async fn recalc_for_fiscal_year(&self, fiscal_year_id: i64) -> AppResult<()> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r"
            INSERT INTO total_sums (fiscal_year_id, total_income, total_spend, updated_at)
            VALUES (
                $1,
                COALESCE((SELECT SUM(amount) FROM income_entries WHERE fiscal_year_id = $1), 0),
                COALESCE((SELECT SUM(amount) FROM spend_entries WHERE fiscal_year_id = $1), 0),
                NOW()
            )
            ON CONFLICT (fiscal_year_id) DO UPDATE SET
                total_income = EXCLUDED.total_income,
                total_spend = EXCLUDED.total_spend,
                updated_at = EXCLUDED.updated_at
            ",
            [fiscal_year_id.into()],
        );
        self.db.execute(stmt).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_fiscal_year(&self, fiscal_year_id: i64) -> AppResult<Option<TotalsSnapshot>> {
        let snapshot = total_sums::Entity::find_by_id(fiscal_year_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(snapshot.map(|m| TotalsSnapshot {
            total_income: m.total_income,
            total_spend: m.total_spend,
            ..TotalsSnapshot::default()
        }))
    }
}

/// Projected totals snapshot store over the `projected_total_sums` table.
///
/// That table carries the `income_total`/`spend_total` column naming, so
/// the mapped snapshot populates the fallback fields.
#[derive(Debug, Clone)]
pub struct ProjectedTotalSumRepository {
    db: DatabaseConnection,
}

impl ProjectedTotalSumRepository {
    /// Creates a new repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TotalsSource for ProjectedTotalSumRepository {
    async fn recalc_for_fiscal_year(&self, fiscal_year_id: i64) -> AppResult<()> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            r"
            INSERT INTO projected_total_sums (fiscal_year_id, income_total, spend_total, updated_at)
            VALUES (
                $1,
                COALESCE((SELECT SUM(amount) FROM projected_income_lines WHERE fiscal_year_id = $1), 0),
                COALESCE((SELECT SUM(amount) FROM projected_spend_lines WHERE fiscal_year_id = $1), 0),
                NOW()
            )
            ON CONFLICT (fiscal_year_id) DO UPDATE SET
                income_total = EXCLUDED.income_total,
                spend_total = EXCLUDED.spend_total,
                updated_at = EXCLUDED.updated_at
            ",
            [fiscal_year_id.into()],
        );
        self.db.execute(stmt).await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_fiscal_year(&self, fiscal_year_id: i64) -> AppResult<Option<TotalsSnapshot>> {
        let snapshot = projected_total_sums::Entity::find_by_id(fiscal_year_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(snapshot.map(|m| TotalsSnapshot {
            income_total: m.income_total,
            spend_total: m.spend_total,
            ..TotalsSnapshot::default()
        }))
    }
}
