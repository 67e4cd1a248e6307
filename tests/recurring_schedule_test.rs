mod common;

use common::{date, RecurringServiceTrait, TransactionServiceTrait};
use moneybook_core::recurring::{Frequency, NewRecurringDefinition};
use moneybook_core::transactions::TransactionType;

fn monthly_rent(account_id: &str) -> NewRecurringDefinition {
    NewRecurringDefinition {
        id: None,
        account_id: account_id.to_string(),
        category_id: None,
        transaction_type: TransactionType::Expense,
        amount: 120_000,
        frequency: Frequency::Monthly { day_of_month: 31 },
        start_date: date(2026, 1, 31),
        end_date: None,
        auto_create: true,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn rent_on_the_31st_clamps_to_short_months() {
    let ctx = common::setup();
    let account = ctx.create_account("Checking", "USD", 500_000).await;

    let def = ctx
        .recurring
        .create_definition(monthly_rent(&account.id))
        .await
        .unwrap();
    assert_eq!(def.next_run_date, date(2026, 1, 31));

    let report = ctx.recurring.process_due(date(2026, 2, 1)).await.unwrap();
    assert_eq!(report.materialized.len(), 1);
    assert!(report.skipped.is_empty());

    let txn = &report.materialized[0];
    assert_eq!(txn.transaction_date, date(2026, 1, 31));
    assert_eq!(txn.amount, 120_000);
    assert_eq!(ctx.balance_of(&account.id), 380_000);

    // February has no 31st; the cursor clamps to the 28th but the rule
    // keeps its nominal day.
    let def = ctx.recurring.get_definition(&def.id).unwrap();
    assert_eq!(def.last_run_date, Some(date(2026, 1, 31)));
    assert_eq!(def.next_run_date, date(2026, 2, 28));
}

#[tokio::test(flavor = "multi_thread")]
async fn process_due_is_idempotent() {
    let ctx = common::setup();
    let account = ctx.create_account("Checking", "USD", 500_000).await;
    ctx.recurring
        .create_definition(monthly_rent(&account.id))
        .await
        .unwrap();

    let first = ctx.recurring.process_due(date(2026, 2, 1)).await.unwrap();
    assert_eq!(first.materialized.len(), 1);

    // A second pass with the same clock finds nothing due.
    let second = ctx.recurring.process_due(date(2026, 2, 1)).await.unwrap();
    assert!(second.materialized.is_empty());
    assert!(second.skipped.is_empty());
    assert_eq!(ctx.balance_of(&account.id), 380_000);
}

#[tokio::test(flavor = "multi_thread")]
async fn one_pass_catches_up_every_missed_occurrence() {
    let ctx = common::setup();
    let account = ctx.create_account("Checking", "USD", 10_000).await;

    let def = ctx
        .recurring
        .create_definition(NewRecurringDefinition {
            id: None,
            account_id: account.id.clone(),
            category_id: None,
            transaction_type: TransactionType::Expense,
            amount: 100,
            frequency: Frequency::Daily,
            start_date: date(2026, 3, 1),
            end_date: None,
            auto_create: true,
        })
        .await
        .unwrap();

    // Three days late: the 1st, 2nd and 3rd are all due.
    let report = ctx.recurring.process_due(date(2026, 3, 3)).await.unwrap();
    assert_eq!(report.materialized.len(), 3);
    assert_eq!(ctx.balance_of(&account.id), 9_700);

    let def = ctx.recurring.get_definition(&def.id).unwrap();
    assert_eq!(def.next_run_date, date(2026, 3, 4));
    assert_eq!(def.last_run_date, Some(date(2026, 3, 3)));
}

#[tokio::test(flavor = "multi_thread")]
async fn paused_definitions_are_ignored_and_resume_catches_up() {
    let ctx = common::setup();
    let account = ctx.create_account("Checking", "USD", 10_000).await;

    let def = ctx
        .recurring
        .create_definition(NewRecurringDefinition {
            id: None,
            account_id: account.id.clone(),
            category_id: None,
            transaction_type: TransactionType::Expense,
            amount: 100,
            frequency: Frequency::Daily,
            start_date: date(2026, 3, 1),
            end_date: None,
            auto_create: true,
        })
        .await
        .unwrap();

    ctx.recurring.pause(&def.id).await.unwrap();
    let report = ctx.recurring.process_due(date(2026, 3, 2)).await.unwrap();
    assert!(report.materialized.is_empty());
    assert_eq!(ctx.balance_of(&account.id), 10_000);

    // Resume keeps the stale cursor; the next pass materializes everything
    // that accumulated while paused.
    ctx.recurring.resume(&def.id).await.unwrap();
    let def = ctx.recurring.get_definition(&def.id).unwrap();
    assert_eq!(def.next_run_date, date(2026, 3, 1));

    let report = ctx.recurring.process_due(date(2026, 3, 2)).await.unwrap();
    assert_eq!(report.materialized.len(), 2);
    assert_eq!(ctx.balance_of(&account.id), 9_800);
}

#[tokio::test(flavor = "multi_thread")]
async fn manual_definitions_advance_without_materializing() {
    let ctx = common::setup();
    let account = ctx.create_account("Checking", "USD", 10_000).await;

    let def = ctx
        .recurring
        .create_definition(NewRecurringDefinition {
            id: None,
            account_id: account.id.clone(),
            category_id: None,
            transaction_type: TransactionType::Income,
            amount: 5_000,
            frequency: Frequency::Monthly { day_of_month: 1 },
            start_date: date(2026, 3, 1),
            end_date: None,
            auto_create: false,
        })
        .await
        .unwrap();

    let report = ctx.recurring.process_due(date(2026, 3, 1)).await.unwrap();
    assert!(report.materialized.is_empty());
    assert_eq!(ctx.balance_of(&account.id), 10_000);

    let def = ctx.recurring.get_definition(&def.id).unwrap();
    assert_eq!(def.next_run_date, date(2026, 4, 1));
    assert_eq!(def.last_run_date, Some(date(2026, 3, 1)));
}

#[tokio::test(flavor = "multi_thread")]
async fn finished_schedules_deactivate() {
    let ctx = common::setup();
    let account = ctx.create_account("Checking", "USD", 10_000).await;

    let def = ctx
        .recurring
        .create_definition(NewRecurringDefinition {
            id: None,
            account_id: account.id.clone(),
            category_id: None,
            transaction_type: TransactionType::Expense,
            amount: 100,
            frequency: Frequency::Daily,
            start_date: date(2026, 3, 1),
            end_date: Some(date(2026, 3, 2)),
            auto_create: true,
        })
        .await
        .unwrap();

    let report = ctx.recurring.process_due(date(2026, 3, 10)).await.unwrap();
    // Only the 1st and 2nd fall inside the window.
    assert_eq!(report.materialized.len(), 2);
    assert_eq!(ctx.balance_of(&account.id), 9_800);

    let def = ctx.recurring.get_definition(&def.id).unwrap();
    assert!(!def.is_active);
}

#[tokio::test(flavor = "multi_thread")]
async fn preview_projects_without_writing() {
    let ctx = common::setup();
    let account = ctx.create_account("Checking", "USD", 10_000).await;

    let def = ctx
        .recurring
        .create_definition(monthly_rent(&account.id))
        .await
        .unwrap();

    let occurrences = ctx.recurring.preview(&def, 4);
    let dates: Vec<_> = occurrences.iter().map(|o| o.date).collect();
    assert_eq!(
        dates,
        vec![
            date(2026, 1, 31),
            date(2026, 2, 28),
            date(2026, 3, 31),
            date(2026, 4, 30),
        ]
    );
    assert!(occurrences.iter().all(|o| o.amount == 120_000));

    // Projection only: no rows, no balance change.
    assert!(ctx
        .transactions
        .list_by_account(&account.id)
        .unwrap()
        .is_empty());
    assert_eq!(ctx.balance_of(&account.id), 10_000);
}
