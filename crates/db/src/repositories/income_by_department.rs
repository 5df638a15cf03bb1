//! Income-by-department snapshot repositories (real and projected).

use async_trait::async_trait;
use fiscus_core::home::DepartmentAmountRow;
use fiscus_core::home::sources::DepartmentAmountSource;
use fiscus_shared::AppResult;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, QueryFilter,
    Statement, TransactionTrait,
};

use super::db_err;
use crate::entities::{income_by_department, projected_income_by_department};

/// Real income-by-department snapshot store.
#[derive(Debug, Clone)]
pub struct IncomeByDepartmentRepository {
    db: DatabaseConnection,
}

impl IncomeByDepartmentRepository {
    /// Creates a new repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DepartmentAmountSource for IncomeByDepartmentRepository {
    async fn recalc_for_fiscal_year(&self, fiscal_year_id: i64) -> AppResult<()> {
        // Rewrite the fiscal year's rows atomically so a concurrent read
        // never sees a half-replaced snapshot.
        let txn = self.db.begin().await.map_err(db_err)?;
        txn.execute(Statement::from_sql_and_values(
            DbBackend::Postgres,
            "DELETE FROM income_by_department WHERE fiscal_year_id = $1",
            [fiscal_year_id.into()],
        ))
        .await
        .map_err(db_err)?;
        txn.execute(Statement::from_sql_and_values(
            DbBackend::Postgres,
            r"
            INSERT INTO income_by_department (fiscal_year_id, department_id, amount_dep_income)
            SELECT $1, department_id, SUM(amount)
            FROM income_entries
            WHERE fiscal_year_id = $1
            GROUP BY department_id
            ",
            [fiscal_year_id.into()],
        ))
        .await
        .map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_fiscal_year(
        &self,
        fiscal_year_id: i64,
    ) -> AppResult<Vec<DepartmentAmountRow>> {
        let rows = income_by_department::Entity::find()
            .filter(income_by_department::Column::FiscalYearId.eq(fiscal_year_id))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|m| DepartmentAmountRow {
                department_id: Some(m.department_id),
                amount: m.amount_dep_income,
                ..DepartmentAmountRow::default()
            })
            .collect())
    }
}

/// Projected income-by-department snapshot store.
#[derive(Debug, Clone)]
pub struct ProjectedIncomeByDepartmentRepository {
    db: DatabaseConnection,
}

impl ProjectedIncomeByDepartmentRepository {
    /// Creates a new repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DepartmentAmountSource for ProjectedIncomeByDepartmentRepository {
    async fn recalc_for_fiscal_year(&self, fiscal_year_id: i64) -> AppResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;
        txn.execute(Statement::from_sql_and_values(
            DbBackend::Postgres,
            "DELETE FROM projected_income_by_department WHERE fiscal_year_id = $1",
            [fiscal_year_id.into()],
        ))
        .await
        .map_err(db_err)?;
        txn.execute(Statement::from_sql_and_values(
            DbBackend::Postgres,
            r"
            INSERT INTO projected_income_by_department (fiscal_year_id, department_id, amount_dep_p_income)
            SELECT $1, department_id, SUM(amount)
            FROM projected_income_lines
            WHERE fiscal_year_id = $1
            GROUP BY department_id
            ",
            [fiscal_year_id.into()],
        ))
        .await
        .map_err(db_err)?;
        txn.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn find_by_fiscal_year(
        &self,
        fiscal_year_id: i64,
    ) -> AppResult<Vec<DepartmentAmountRow>> {
        let rows = projected_income_by_department::Entity::find()
            .filter(projected_income_by_department::Column::FiscalYearId.eq(fiscal_year_id))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|m| DepartmentAmountRow {
                department_id: Some(m.department_id),
                amount: m.amount_dep_p_income,
                ..DepartmentAmountRow::default()
            })
            .collect())
    }
}
