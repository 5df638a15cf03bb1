//! Initial database migration.
//!
//! Creates the department registry, the entry tables written by the
//! upstream recording flows, and the snapshot tables the dashboard reads.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: DEPARTMENT REGISTRY
        // ============================================================
        db.execute_unprepared(DEPARTMENTS_SQL).await?;

        // ============================================================
        // PART 2: ENTRY TABLES (written upstream)
        // ============================================================
        db.execute_unprepared(INCOME_ENTRIES_SQL).await?;
        db.execute_unprepared(SPEND_ENTRIES_SQL).await?;
        db.execute_unprepared(PROJECTED_INCOME_LINES_SQL).await?;
        db.execute_unprepared(PROJECTED_SPEND_LINES_SQL).await?;

        // ============================================================
        // PART 3: TOTALS SNAPSHOTS
        // ============================================================
        db.execute_unprepared(TOTAL_SUMS_SQL).await?;
        db.execute_unprepared(PROJECTED_TOTAL_SUMS_SQL).await?;

        // ============================================================
        // PART 4: PER-DEPARTMENT SNAPSHOTS
        // ============================================================
        db.execute_unprepared(INCOME_BY_DEPARTMENT_SQL).await?;
        db.execute_unprepared(PROJECTED_INCOME_BY_DEPARTMENT_SQL)
            .await?;
        db.execute_unprepared(SPEND_BY_DEPARTMENT_SQL).await?;
        db.execute_unprepared(PROJECTED_SPEND_BY_DEPARTMENT_SQL)
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            "DROP TABLE IF EXISTS
                projected_spend_by_department,
                spend_by_department,
                projected_income_by_department,
                income_by_department,
                projected_total_sums,
                total_sums,
                projected_spend_lines,
                projected_income_lines,
                spend_entries,
                income_entries,
                departments
            CASCADE",
        )
        .await?;

        Ok(())
    }
}

const DEPARTMENTS_SQL: &str = r"
CREATE TABLE departments (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL
);
";

const INCOME_ENTRIES_SQL: &str = r"
CREATE TABLE income_entries (
    id BIGSERIAL PRIMARY KEY,
    fiscal_year_id BIGINT NOT NULL,
    department_id BIGINT NOT NULL REFERENCES departments(id),
    amount NUMERIC(18, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_income_entries_fy ON income_entries(fiscal_year_id);
";

const SPEND_ENTRIES_SQL: &str = r"
CREATE TABLE spend_entries (
    id BIGSERIAL PRIMARY KEY,
    fiscal_year_id BIGINT NOT NULL,
    department_id BIGINT NOT NULL REFERENCES departments(id),
    amount NUMERIC(18, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_spend_entries_fy ON spend_entries(fiscal_year_id);
";

const PROJECTED_INCOME_LINES_SQL: &str = r"
CREATE TABLE projected_income_lines (
    id BIGSERIAL PRIMARY KEY,
    fiscal_year_id BIGINT NOT NULL,
    department_id BIGINT NOT NULL REFERENCES departments(id),
    amount NUMERIC(18, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_projected_income_lines_fy ON projected_income_lines(fiscal_year_id);
";

const PROJECTED_SPEND_LINES_SQL: &str = r"
CREATE TABLE projected_spend_lines (
    id BIGSERIAL PRIMARY KEY,
    fiscal_year_id BIGINT NOT NULL,
    department_id BIGINT NOT NULL REFERENCES departments(id),
    amount NUMERIC(18, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
CREATE INDEX idx_projected_spend_lines_fy ON projected_spend_lines(fiscal_year_id);
";

const TOTAL_SUMS_SQL: &str = r"
CREATE TABLE total_sums (
    fiscal_year_id BIGINT PRIMARY KEY,
    total_income NUMERIC(18, 2),
    total_spend NUMERIC(18, 2),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

// Kept in the other naming scheme on purpose; see the entity docs.
const PROJECTED_TOTAL_SUMS_SQL: &str = r"
CREATE TABLE projected_total_sums (
    fiscal_year_id BIGINT PRIMARY KEY,
    income_total NUMERIC(18, 2),
    spend_total NUMERIC(18, 2),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const INCOME_BY_DEPARTMENT_SQL: &str = r"
CREATE TABLE income_by_department (
    fiscal_year_id BIGINT NOT NULL,
    department_id BIGINT NOT NULL REFERENCES departments(id),
    amount_dep_income NUMERIC(18, 2),
    PRIMARY KEY (fiscal_year_id, department_id)
);
";

const PROJECTED_INCOME_BY_DEPARTMENT_SQL: &str = r"
CREATE TABLE projected_income_by_department (
    fiscal_year_id BIGINT NOT NULL,
    department_id BIGINT NOT NULL REFERENCES departments(id),
    amount_dep_p_income NUMERIC(18, 2),
    PRIMARY KEY (fiscal_year_id, department_id)
);
";

const SPEND_BY_DEPARTMENT_SQL: &str = r"
CREATE TABLE spend_by_department (
    fiscal_year_id BIGINT NOT NULL,
    department_id BIGINT NOT NULL REFERENCES departments(id),
    amount_dep_spend NUMERIC(18, 2),
    PRIMARY KEY (fiscal_year_id, department_id)
);
";

const PROJECTED_SPEND_BY_DEPARTMENT_SQL: &str = r"
CREATE TABLE projected_spend_by_department (
    id BIGINT PRIMARY KEY REFERENCES departments(id),
    amount_dep_p_spend NUMERIC(18, 2)
);
";
