//! `SeaORM` Entity for projected_total_sums table (projected totals snapshot).
//!
//! Note the column naming (`income_total`/`spend_total`) deliberately
//! diverges from `total_sums`; both variants are accepted downstream.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "projected_total_sums")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub fiscal_year_id: i64,
    pub income_total: Option<Decimal>,
    pub spend_total: Option<Decimal>,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
