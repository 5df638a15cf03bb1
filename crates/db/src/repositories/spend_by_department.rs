//! Spend-by-department repositories.
//!
//! The real side mirrors the income path. The projected side is a plain
//! table keyed by department id with no fiscal year scoping and no
//! recalculation entry point; it is read whole.

use async_trait::async_trait;
use fiscus_core::home::DepartmentAmountRow;
use fiscus_core::home::sources::{DepartmentAmountSource, DepartmentAmountTable};
use fiscus_shared::AppResult;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, QueryFilter,
    Statement, TransactionTrait,
};

use super::db_err;
use crate::entities::{projected_spend_by_department, spend_by_department};

/// Real spend-by-department snapshot store.
#[derive(Debug, Clone)]
pub struct SpendByDepartmentRepository {
    db: DatabaseConnection,
}

impl SpendByDepartmentRepository {
    /// Creates a new repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DepartmentAmountSource for SpendByDepartmentRepository {
    async fn recalc_for_fiscal_year(&self, fiscal_year_id: i64) -> AppResult<()> {
        let txn = self.db.begin().await.map_err(db_err)?;
        txn.execute(Statement::from_sql_and_values(
            DbBackend::Postgres,
            "DELETE FROM spend_by_department WHERE fiscal_year_id = $1",
            [fiscal_year_id.into()],
        ))
        .await
        .map_err(db_err)?;
        txn.execute(Statement::from_sql_and_values(
            DbBackend::Postgres,
            r"
            INSERT INTO spend_by_department (fiscal_year_id, department_id, amount_dep_spend)
            SELECT $1, department_id, SUM(amount)
            FROM spend_entries
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
        let rows = spend_by_department::Entity::find()
            .filter(spend_by_department::Column::FiscalYearId.eq(fiscal_year_id))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|m| DepartmentAmountRow {
                department_id: Some(m.department_id),
                amount: m.amount_dep_spend,
                ..DepartmentAmountRow::default()
            })
            .collect())
    }
}

/// Projected spend-by-department table, read as-is.
#[derive(Debug, Clone)]
pub struct ProjectedSpendByDepartmentRepository {
    db: DatabaseConnection,
}

impl ProjectedSpendByDepartmentRepository {
    /// Creates a new repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DepartmentAmountTable for ProjectedSpendByDepartmentRepository {
    async fn find_all(&self) -> AppResult<Vec<DepartmentAmountRow>> {
        let rows = projected_spend_by_department::Entity::find()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        // The table is keyed by the department's id directly, so the
        // mapped record resolves through its own row id.
        Ok(rows
            .into_iter()
            .map(|m| DepartmentAmountRow {
                row_id: Some(m.id),
                amount: m.amount_dep_p_spend,
                ..DepartmentAmountRow::default()
            })
            .collect())
    }
}
