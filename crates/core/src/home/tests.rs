//! Tests for the home aggregation service.

use std::sync::Arc;

use proptest::prelude::*;
use rstest::rstest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use fiscus_shared::AppError;

use super::fanout::settle_refresh;
use super::sources::{
    MockDepartmentAmountSource, MockDepartmentAmountTable, MockDepartmentDirectory,
    MockTotalsSource,
};
use super::types::{
    ComparisonRow, DepartmentAmountRow, DepartmentName, DepartmentRef, GroupBy, Totals,
    TotalsSnapshot,
};
use super::{HomeService, HomeServiceProps};

/// One mock per collaborator; unconfigured mocks panic when called, which
/// doubles as an assertion that short-circuit paths stay offline.
struct Mocks {
    real_totals: MockTotalsSource,
    projected_totals: MockTotalsSource,
    real_incomes: MockDepartmentAmountSource,
    projected_incomes: MockDepartmentAmountSource,
    real_spends: MockDepartmentAmountSource,
    projected_spends: MockDepartmentAmountTable,
    departments: MockDepartmentDirectory,
}

impl Mocks {
    fn new() -> Self {
        Self {
            real_totals: MockTotalsSource::new(),
            projected_totals: MockTotalsSource::new(),
            real_incomes: MockDepartmentAmountSource::new(),
            projected_incomes: MockDepartmentAmountSource::new(),
            real_spends: MockDepartmentAmountSource::new(),
            projected_spends: MockDepartmentAmountTable::new(),
            departments: MockDepartmentDirectory::new(),
        }
    }

    fn into_service(self) -> HomeService {
        HomeService::new(HomeServiceProps {
            real_totals: Arc::new(self.real_totals),
            projected_totals: Arc::new(self.projected_totals),
            real_incomes: Arc::new(self.real_incomes),
            projected_incomes: Arc::new(self.projected_incomes),
            real_spends: Arc::new(self.real_spends),
            projected_spends: Arc::new(self.projected_spends),
            departments: Arc::new(self.departments),
        })
    }
}

fn dept_row(department_id: i64, amount: Decimal) -> DepartmentAmountRow {
    DepartmentAmountRow {
        department_id: Some(department_id),
        amount: Some(amount),
        ..DepartmentAmountRow::default()
    }
}

fn names(pairs: &[(i64, &str)]) -> Vec<DepartmentName> {
    pairs
        .iter()
        .map(|(id, name)| DepartmentName {
            id: *id,
            name: (*name).to_string(),
        })
        .collect()
}

// ============================================================================
// Totals
// ============================================================================

#[tokio::test]
async fn test_totals_without_fiscal_year_returns_zeros() {
    // No expectations configured: any upstream call would panic.
    let service = Mocks::new().into_service();

    let totals = service.totals(None).await.unwrap();

    assert_eq!(totals, Totals::default());
}

#[tokio::test]
async fn test_totals_with_non_positive_fiscal_year_returns_zeros() {
    let service = Mocks::new().into_service();

    assert_eq!(service.totals(Some(0)).await.unwrap(), Totals::default());
    assert_eq!(service.totals(Some(-3)).await.unwrap(), Totals::default());
}

#[tokio::test]
async fn test_totals_computes_both_balances() {
    let mut mocks = Mocks::new();
    mocks
        .real_totals
        .expect_recalc_for_fiscal_year()
        .returning(|_| Ok(()));
    mocks.real_totals.expect_find_by_fiscal_year().returning(|_| {
        Ok(Some(TotalsSnapshot {
            total_income: Some(dec!(1500)),
            total_spend: Some(dec!(400)),
            ..TotalsSnapshot::default()
        }))
    });
    mocks
        .projected_totals
        .expect_recalc_for_fiscal_year()
        .returning(|_| Ok(()));
    mocks
        .projected_totals
        .expect_find_by_fiscal_year()
        .returning(|_| {
            // The projected store uses the other column naming.
            Ok(Some(TotalsSnapshot {
                income_total: Some(dec!(1200)),
                spend_total: Some(dec!(1350.50)),
                ..TotalsSnapshot::default()
            }))
        });

    let totals = mocks.into_service().totals(Some(7)).await.unwrap();

    assert_eq!(
        totals,
        Totals {
            incomes: dec!(1500),
            spends: dec!(400),
            balance: dec!(1100),
            projected_incomes: dec!(1200),
            projected_spends: dec!(1350.50),
            projected_balance: dec!(-150.50),
        }
    );
}

#[tokio::test]
async fn test_totals_missing_snapshots_read_as_zero() {
    let mut mocks = Mocks::new();
    mocks
        .real_totals
        .expect_recalc_for_fiscal_year()
        .returning(|_| Ok(()));
    mocks
        .real_totals
        .expect_find_by_fiscal_year()
        .returning(|_| Ok(None));
    mocks
        .projected_totals
        .expect_recalc_for_fiscal_year()
        .returning(|_| Ok(()));
    mocks
        .projected_totals
        .expect_find_by_fiscal_year()
        .returning(|_| Ok(None));

    let totals = mocks.into_service().totals(Some(1)).await.unwrap();

    assert_eq!(totals, Totals::default());
}

#[tokio::test]
async fn test_totals_survives_failed_refresh() {
    let mut mocks = Mocks::new();
    mocks
        .real_totals
        .expect_recalc_for_fiscal_year()
        .returning(|_| Err(AppError::Database("recalc blew up".into())));
    mocks.real_totals.expect_find_by_fiscal_year().returning(|_| {
        Ok(Some(TotalsSnapshot {
            total_income: Some(dec!(10)),
            total_spend: Some(dec!(4)),
            ..TotalsSnapshot::default()
        }))
    });
    mocks
        .projected_totals
        .expect_recalc_for_fiscal_year()
        .returning(|_| Err(AppError::ExternalService("timeout".into())));
    mocks
        .projected_totals
        .expect_find_by_fiscal_year()
        .returning(|_| Ok(None));

    let totals = mocks.into_service().totals(Some(2)).await.unwrap();

    assert_eq!(totals.incomes, dec!(10));
    assert_eq!(totals.balance, dec!(6));
}

#[tokio::test]
async fn test_totals_propagates_read_failure() {
    let mut mocks = Mocks::new();
    mocks
        .real_totals
        .expect_recalc_for_fiscal_year()
        .returning(|_| Ok(()));
    mocks
        .real_totals
        .expect_find_by_fiscal_year()
        .returning(|_| Err(AppError::Database("connection lost".into())));
    mocks
        .projected_totals
        .expect_recalc_for_fiscal_year()
        .returning(|_| Ok(()));
    mocks
        .projected_totals
        .expect_find_by_fiscal_year()
        .returning(|_| Ok(None));

    let result = mocks.into_service().totals(Some(2)).await;

    assert!(matches!(result, Err(AppError::Database(_))));
}

// ============================================================================
// Income comparison
// ============================================================================

#[tokio::test]
async fn test_income_comparison_without_fiscal_year_is_empty() {
    let service = Mocks::new().into_service();

    let rows = service.income_comparison(None, None).await.unwrap();

    assert!(rows.is_empty());
}

#[rstest]
#[case::placeholder_type("type")]
#[case::placeholder_subtype("subtype")]
#[case::placeholder_uppercase("TYPE")]
#[tokio::test]
async fn test_income_comparison_unimplemented_grouping_is_empty(#[case] group_by: &str) {
    // No expectations configured: the gate must short-circuit before any
    // upstream call.
    let service = Mocks::new().into_service();

    let rows = service
        .income_comparison(Some(1), Some(group_by))
        .await
        .unwrap();

    assert!(rows.is_empty());
}

#[rstest]
#[case::unrecognized("by-moon-phase")]
#[case::empty("")]
#[tokio::test]
async fn test_income_comparison_unrecognized_grouping_falls_back_to_department(
    #[case] group_by: &str,
) {
    let mut mocks = Mocks::new();
    mocks
        .real_incomes
        .expect_recalc_for_fiscal_year()
        .returning(|_| Ok(()));
    mocks
        .real_incomes
        .expect_find_by_fiscal_year()
        .returning(|_| Ok(vec![dept_row(1, dec!(100))]));
    mocks
        .projected_incomes
        .expect_recalc_for_fiscal_year()
        .returning(|_| Ok(()));
    mocks
        .projected_incomes
        .expect_find_by_fiscal_year()
        .returning(|_| Ok(vec![dept_row(1, dec!(60))]));
    mocks
        .departments
        .expect_find_by_ids()
        .returning(|_| Ok(names(&[(1, "Finance")])));

    let rows = mocks
        .into_service()
        .income_comparison(Some(1), Some(group_by))
        .await
        .unwrap();

    assert_eq!(
        rows,
        vec![ComparisonRow {
            id: 1,
            name: "Finance".into(),
            real: dec!(100),
            projected: dec!(60),
            diff: dec!(40),
        }]
    );
}

#[tokio::test]
async fn test_income_comparison_merges_union_of_departments() {
    let mut mocks = Mocks::new();
    mocks
        .real_incomes
        .expect_recalc_for_fiscal_year()
        .returning(|_| Ok(()));
    mocks
        .real_incomes
        .expect_find_by_fiscal_year()
        .returning(|_| Ok(vec![dept_row(1, dec!(100))]));
    mocks
        .projected_incomes
        .expect_recalc_for_fiscal_year()
        .returning(|_| Ok(()));
    mocks
        .projected_incomes
        .expect_find_by_fiscal_year()
        .returning(|_| Ok(vec![dept_row(2, dec!(40))]));
    mocks
        .departments
        .expect_find_by_ids()
        .withf(|ids: &[i64]| ids == [1, 2])
        .returning(|_| Ok(names(&[(1, "Finance"), (2, "Operations")])));

    let rows = mocks
        .into_service()
        .income_comparison(Some(1), Some("department"))
        .await
        .unwrap();

    assert_eq!(
        rows,
        vec![
            ComparisonRow {
                id: 1,
                name: "Finance".into(),
                real: dec!(100),
                projected: dec!(0),
                diff: dec!(100),
            },
            ComparisonRow {
                id: 2,
                name: "Operations".into(),
                real: dec!(0),
                projected: dec!(40),
                diff: dec!(-40),
            },
        ]
    );
}

#[tokio::test]
async fn test_income_comparison_one_sided_department() {
    let mut mocks = Mocks::new();
    mocks
        .real_incomes
        .expect_recalc_for_fiscal_year()
        .returning(|_| Ok(()));
    mocks
        .real_incomes
        .expect_find_by_fiscal_year()
        .returning(|_| Ok(vec![dept_row(7, dec!(500))]));
    mocks
        .projected_incomes
        .expect_recalc_for_fiscal_year()
        .returning(|_| Ok(()));
    mocks
        .projected_incomes
        .expect_find_by_fiscal_year()
        .returning(|_| Ok(Vec::new()));
    mocks
        .departments
        .expect_find_by_ids()
        .returning(|_| Ok(names(&[(7, "Culture")])));

    let rows = mocks
        .into_service()
        .income_comparison(Some(1), None)
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].real, dec!(500));
    assert_eq!(rows[0].projected, dec!(0));
    assert_eq!(rows[0].diff, dec!(500));
}

#[tokio::test]
async fn test_income_comparison_unresolved_name_is_empty_string() {
    let mut mocks = Mocks::new();
    mocks
        .real_incomes
        .expect_recalc_for_fiscal_year()
        .returning(|_| Ok(()));
    mocks
        .real_incomes
        .expect_find_by_fiscal_year()
        .returning(|_| Ok(vec![dept_row(3, dec!(12))]));
    mocks
        .projected_incomes
        .expect_recalc_for_fiscal_year()
        .returning(|_| Ok(()));
    mocks
        .projected_incomes
        .expect_find_by_fiscal_year()
        .returning(|_| Ok(Vec::new()));
    // Department 3 is missing from the directory.
    mocks
        .departments
        .expect_find_by_ids()
        .returning(|_| Ok(Vec::new()));

    let rows = mocks
        .into_service()
        .income_comparison(Some(1), None)
        .await
        .unwrap();

    assert_eq!(rows[0].name, "");
}

#[tokio::test]
async fn test_income_comparison_empty_sources_skip_name_lookup() {
    let mut mocks = Mocks::new();
    mocks
        .real_incomes
        .expect_recalc_for_fiscal_year()
        .returning(|_| Ok(()));
    mocks
        .real_incomes
        .expect_find_by_fiscal_year()
        .returning(|_| Ok(Vec::new()));
    mocks
        .projected_incomes
        .expect_recalc_for_fiscal_year()
        .returning(|_| Ok(()));
    mocks
        .projected_incomes
        .expect_find_by_fiscal_year()
        .returning(|_| Ok(Vec::new()));
    // departments mock left unconfigured: a lookup would panic.

    let rows = mocks
        .into_service()
        .income_comparison(Some(1), None)
        .await
        .unwrap();

    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_income_comparison_duplicate_department_last_row_wins() {
    let mut mocks = Mocks::new();
    mocks
        .real_incomes
        .expect_recalc_for_fiscal_year()
        .returning(|_| Ok(()));
    mocks
        .real_incomes
        .expect_find_by_fiscal_year()
        .returning(|_| Ok(vec![dept_row(5, dec!(10)), dept_row(5, dec!(25))]));
    mocks
        .projected_incomes
        .expect_recalc_for_fiscal_year()
        .returning(|_| Ok(()));
    mocks
        .projected_incomes
        .expect_find_by_fiscal_year()
        .returning(|_| Ok(Vec::new()));
    mocks
        .departments
        .expect_find_by_ids()
        .returning(|_| Ok(Vec::new()));

    let rows = mocks
        .into_service()
        .income_comparison(Some(1), None)
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].real, dec!(25));
}

#[tokio::test]
async fn test_income_comparison_propagates_read_failure() {
    let mut mocks = Mocks::new();
    mocks
        .real_incomes
        .expect_recalc_for_fiscal_year()
        .returning(|_| Ok(()));
    mocks
        .real_incomes
        .expect_find_by_fiscal_year()
        .returning(|_| Err(AppError::Database("table gone".into())));
    mocks
        .projected_incomes
        .expect_recalc_for_fiscal_year()
        .returning(|_| Ok(()));
    mocks
        .projected_incomes
        .expect_find_by_fiscal_year()
        .returning(|_| Ok(Vec::new()));

    let result = mocks.into_service().income_comparison(Some(1), None).await;

    assert!(matches!(result, Err(AppError::Database(_))));
}

// ============================================================================
// Spend comparison
// ============================================================================

#[tokio::test]
async fn test_spend_comparison_refreshes_only_real_side() {
    let mut mocks = Mocks::new();
    // Only the real spend store may be refreshed; the projected table trait
    // has no refresh at all, so the asymmetry is structural.
    mocks
        .real_spends
        .expect_recalc_for_fiscal_year()
        .times(1)
        .returning(|_| Ok(()));
    mocks
        .real_spends
        .expect_find_by_fiscal_year()
        .returning(|_| Ok(vec![dept_row(1, dec!(80))]));
    mocks.projected_spends.expect_find_all().returning(|| {
        // The projected spend table is keyed by department id directly.
        Ok(vec![DepartmentAmountRow {
            row_id: Some(1),
            amount: Some(dec!(100)),
            ..DepartmentAmountRow::default()
        }])
    });
    mocks
        .departments
        .expect_find_by_ids()
        .returning(|_| Ok(names(&[(1, "Finance")])));

    let rows = mocks
        .into_service()
        .spend_comparison(Some(1), Some("Department"))
        .await
        .unwrap();

    assert_eq!(
        rows,
        vec![ComparisonRow {
            id: 1,
            name: "Finance".into(),
            real: dec!(80),
            projected: dec!(100),
            diff: dec!(-20),
        }]
    );
}

#[tokio::test]
async fn test_spend_comparison_without_fiscal_year_is_empty() {
    let service = Mocks::new().into_service();

    let rows = service.spend_comparison(None, None).await.unwrap();

    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_spend_comparison_unimplemented_grouping_is_empty() {
    let service = Mocks::new().into_service();

    let rows = service
        .spend_comparison(Some(4), Some("subtype"))
        .await
        .unwrap();

    assert!(rows.is_empty());
}

// ============================================================================
// Refresh fan-out
// ============================================================================

#[tokio::test]
async fn test_settle_refresh_reports_every_outcome() {
    use fiscus_shared::AppResult;
    use futures::future::BoxFuture;

    let ok: BoxFuture<'static, AppResult<()>> = Box::pin(async { Ok(()) });
    let err: BoxFuture<'static, AppResult<()>> =
        Box::pin(async { Err(AppError::Internal("nope".into())) });

    let outcomes = settle_refresh(vec![ok, err]).await;

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].is_ok());
    assert!(outcomes[1].is_err());
}

// ============================================================================
// Parsing and resolution helpers
// ============================================================================

#[rstest]
#[case::absent(None, GroupBy::Department)]
#[case::department(Some("department"), GroupBy::Department)]
#[case::mixed_case(Some("DePartMENT"), GroupBy::Department)]
#[case::padded(Some("  department "), GroupBy::Department)]
#[case::placeholder_type(Some("type"), GroupBy::Type)]
#[case::placeholder_subtype(Some("Subtype"), GroupBy::Subtype)]
#[case::unrecognized(Some("region"), GroupBy::Department)]
#[case::empty(Some(""), GroupBy::Department)]
fn test_group_by_parse(#[case] raw: Option<&str>, #[case] expected: GroupBy) {
    assert_eq!(GroupBy::parse(raw), expected);
}

#[test]
fn test_department_key_prefers_nested_reference() {
    let row = DepartmentAmountRow {
        department: Some(DepartmentRef { id: 1 }),
        department_id: Some(2),
        row_id: Some(3),
        amount: None,
    };
    assert_eq!(row.department_key(), 1);
}

#[test]
fn test_department_key_falls_back_in_order() {
    let flat = DepartmentAmountRow {
        department_id: Some(2),
        row_id: Some(3),
        ..DepartmentAmountRow::default()
    };
    assert_eq!(flat.department_key(), 2);

    let own = DepartmentAmountRow {
        row_id: Some(3),
        ..DepartmentAmountRow::default()
    };
    assert_eq!(own.department_key(), 3);

    assert_eq!(DepartmentAmountRow::default().department_key(), 0);
}

#[test]
fn test_totals_snapshot_field_fallback() {
    let primary = TotalsSnapshot {
        total_income: Some(dec!(5)),
        income_total: Some(dec!(9)),
        ..TotalsSnapshot::default()
    };
    assert_eq!(primary.income(), dec!(5));

    let fallback = TotalsSnapshot {
        spend_total: Some(dec!(7)),
        ..TotalsSnapshot::default()
    };
    assert_eq!(fallback.spend(), dec!(7));

    assert_eq!(TotalsSnapshot::default().income(), dec!(0));
    assert_eq!(TotalsSnapshot::default().spend(), dec!(0));
}

// ============================================================================
// Merge properties
// ============================================================================

/// Strategy for one side of a comparison: department ids with amounts in
/// cents, small enough to collide across sides.
fn side() -> impl Strategy<Value = Vec<(i64, Decimal)>> {
    proptest::collection::vec(
        (1i64..20, (-1_000_000i64..1_000_000).prop_map(|c| Decimal::new(c, 2))),
        0..12,
    )
}

fn run_income_comparison(
    real_side: Vec<(i64, Decimal)>,
    projected_side: Vec<(i64, Decimal)>,
) -> Vec<ComparisonRow> {
    let mut mocks = Mocks::new();
    let real_rows: Vec<_> = real_side.iter().map(|(id, a)| dept_row(*id, *a)).collect();
    let projected_rows: Vec<_> = projected_side
        .iter()
        .map(|(id, a)| dept_row(*id, *a))
        .collect();
    mocks
        .real_incomes
        .expect_recalc_for_fiscal_year()
        .returning(|_| Ok(()));
    mocks
        .real_incomes
        .expect_find_by_fiscal_year()
        .return_once(move |_| Ok(real_rows));
    mocks
        .projected_incomes
        .expect_recalc_for_fiscal_year()
        .returning(|_| Ok(()));
    mocks
        .projected_incomes
        .expect_find_by_fiscal_year()
        .return_once(move |_| Ok(projected_rows));
    mocks
        .departments
        .expect_find_by_ids()
        .returning(|_| Ok(Vec::new()));

    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(mocks.into_service().income_comparison(Some(1), None))
        .unwrap()
}

proptest! {
    /// The output row set is exactly the union of department ids, each id
    /// once, and every diff is real - projected.
    #[test]
    fn test_merge_union_and_diff(real_side in side(), projected_side in side()) {
        use std::collections::{BTreeSet, HashMap};

        let rows = run_income_comparison(real_side.clone(), projected_side.clone());

        let real_map: HashMap<i64, Decimal> = real_side.into_iter().collect();
        let projected_map: HashMap<i64, Decimal> = projected_side.into_iter().collect();
        let union: BTreeSet<i64> = real_map.keys().chain(projected_map.keys()).copied().collect();

        let output_ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let unique_ids: BTreeSet<i64> = output_ids.iter().copied().collect();

        prop_assert_eq!(output_ids.len(), unique_ids.len());
        prop_assert_eq!(&unique_ids, &union);

        for row in &rows {
            prop_assert_eq!(row.diff, row.real - row.projected);
            prop_assert_eq!(
                row.real,
                real_map.get(&row.id).copied().unwrap_or_default()
            );
            prop_assert_eq!(
                row.projected,
                projected_map.get(&row.id).copied().unwrap_or_default()
            );
        }
    }
}
