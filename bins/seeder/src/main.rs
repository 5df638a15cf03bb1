//! Database seeder for Fiscus development and testing.
//!
//! Seeds a handful of departments, income/spend entries for one fiscal
//! year, and the projected spend table (which is maintained upstream and
//! never recalculated by the dashboard).
//!
//! Usage: cargo run --bin seeder

use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

use fiscus_db::entities::{
    departments, income_entries, projected_income_lines, projected_spend_by_department,
    projected_spend_lines, spend_entries,
};

/// Fiscal year all seeded entries belong to.
const SEED_FISCAL_YEAR: i64 = 1;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = fiscus_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding departments...");
    seed_departments(&db).await;

    println!("Seeding income and spend entries...");
    seed_entries(&db).await;

    println!("Seeding projected spend table...");
    seed_projected_spends(&db).await;

    println!("Seeding complete!");
}

/// Seeds the department registry.
async fn seed_departments(db: &DatabaseConnection) {
    // Check if departments already exist
    if departments::Entity::find_by_id(1)
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Departments already exist, skipping...");
        return;
    }

    for (id, name) in [
        (1, "Finance"),
        (2, "Operations"),
        (3, "Culture"),
        (4, "Public Works"),
    ] {
        let dept = departments::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
        };
        if let Err(e) = dept.insert(db).await {
            eprintln!("Failed to insert department {name}: {e}");
        } else {
            println!("  Created department: {name}");
        }
    }
}

/// Seeds real and projected entries for the seed fiscal year.
async fn seed_entries(db: &DatabaseConnection) {
    if income_entries::Entity::find().one(db).await.ok().flatten().is_some() {
        println!("  Entries already exist, skipping...");
        return;
    }

    let incomes = [(1, 150_000_00), (2, 82_500_00), (3, 12_000_00)];
    for (department_id, cents) in incomes {
        let entry = income_entries::ActiveModel {
            fiscal_year_id: Set(SEED_FISCAL_YEAR),
            department_id: Set(department_id),
            amount: Set(Decimal::new(cents, 2)),
            ..Default::default()
        };
        if let Err(e) = entry.insert(db).await {
            eprintln!("Failed to insert income entry: {e}");
        }
    }

    let spends = [(1, 96_000_00), (2, 105_250_00), (4, 40_000_00)];
    for (department_id, cents) in spends {
        let entry = spend_entries::ActiveModel {
            fiscal_year_id: Set(SEED_FISCAL_YEAR),
            department_id: Set(department_id),
            amount: Set(Decimal::new(cents, 2)),
            ..Default::default()
        };
        if let Err(e) = entry.insert(db).await {
            eprintln!("Failed to insert spend entry: {e}");
        }
    }

    let projected_incomes = [(1, 140_000_00), (2, 90_000_00), (4, 5_000_00)];
    for (department_id, cents) in projected_incomes {
        let line = projected_income_lines::ActiveModel {
            fiscal_year_id: Set(SEED_FISCAL_YEAR),
            department_id: Set(department_id),
            amount: Set(Decimal::new(cents, 2)),
            ..Default::default()
        };
        if let Err(e) = line.insert(db).await {
            eprintln!("Failed to insert projected income line: {e}");
        }
    }

    let projected_spends = [(1, 100_000_00), (3, 8_000_00)];
    for (department_id, cents) in projected_spends {
        let line = projected_spend_lines::ActiveModel {
            fiscal_year_id: Set(SEED_FISCAL_YEAR),
            department_id: Set(department_id),
            amount: Set(Decimal::new(cents, 2)),
            ..Default::default()
        };
        if let Err(e) = line.insert(db).await {
            eprintln!("Failed to insert projected spend line: {e}");
        }
    }

    println!("  Created entries for fiscal year {SEED_FISCAL_YEAR}");
}

/// Seeds the projected spend-by-department table.
///
/// The dashboard never recalculates this table, so development data has to
/// come from here.
async fn seed_projected_spends(db: &DatabaseConnection) {
    if projected_spend_by_department::Entity::find()
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Projected spend table already populated, skipping...");
        return;
    }

    for (department_id, cents) in [(1, 100_000_00), (2, 95_000_00), (3, 8_000_00)] {
        let row = projected_spend_by_department::ActiveModel {
            id: Set(department_id),
            amount_dep_p_spend: Set(Some(Decimal::new(cents, 2))),
        };
        if let Err(e) = row.insert(db).await {
            eprintln!("Failed to insert projected spend row: {e}");
        }
    }

    println!("  Populated projected spend table");
}
