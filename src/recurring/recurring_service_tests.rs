use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::sqlite::SqliteConnection;

use super::recurring_errors::RecurringError;
use super::recurring_model::{NewRecurringDefinition, RecurringDefinition};
use super::recurring_service::RecurringService;
use super::recurring_traits::{RecurringRepositoryTrait, RecurringServiceTrait};
use crate::accounts::{Account, AccountRepositoryTrait, AccountUpdate, NewAccount};
use crate::db;
use crate::recurring::Frequency;
use crate::transactions::TransactionType;
use crate::Result;

struct StubAccounts;

#[async_trait]
impl AccountRepositoryTrait for StubAccounts {
    async fn create(&self, _: NewAccount) -> Result<Account> {
        unreachable!()
    }
    async fn update(&self, _: AccountUpdate) -> Result<Account> {
        unreachable!()
    }
    async fn set_active(&self, _: &str, _: bool) -> Result<()> {
        unreachable!()
    }
    fn get_by_id(&self, _: &str) -> Result<Account> {
        unreachable!()
    }
    fn list(&self, _: &str, _: Option<bool>) -> Result<Vec<Account>> {
        unreachable!()
    }
}

/// In-memory repository whose deactivation fails for one chosen definition.
struct FlakyDeactivation {
    definitions: Vec<RecurringDefinition>,
    fail_for: String,
    deactivated: Mutex<Vec<String>>,
}

#[async_trait]
impl RecurringRepositoryTrait for FlakyDeactivation {
    async fn create(&self, _: NewRecurringDefinition, _: String) -> Result<RecurringDefinition> {
        unreachable!()
    }

    async fn set_active(&self, definition_id: &str, _: bool) -> Result<()> {
        if definition_id == self.fail_for {
            return Err(RecurringError::DatabaseError("disk I/O error".to_string()).into());
        }
        self.deactivated
            .lock()
            .unwrap()
            .push(definition_id.to_string());
        Ok(())
    }

    fn get_by_id(&self, _: &str) -> Result<RecurringDefinition> {
        unreachable!()
    }

    fn list_by_account(&self, _: &str) -> Result<Vec<RecurringDefinition>> {
        unreachable!()
    }

    fn list_due(&self, as_of: NaiveDate) -> Result<Vec<RecurringDefinition>> {
        Ok(self
            .definitions
            .iter()
            .filter(|d| d.is_active && d.next_run_date <= as_of)
            .cloned()
            .collect())
    }

    fn claim_in_tx(
        &self,
        _: &str,
        _: NaiveDate,
        _: NaiveDate,
        _: NaiveDate,
        _: &mut SqliteConnection,
    ) -> Result<bool> {
        Ok(true)
    }
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn finished_definition(id: &str) -> RecurringDefinition {
    let now = chrono::Utc::now().naive_utc();
    RecurringDefinition {
        id: id.to_string(),
        account_id: "acc-1".to_string(),
        category_id: None,
        transaction_type: TransactionType::Expense,
        amount: 100,
        currency: "USD".to_string(),
        frequency: Frequency::Daily,
        start_date: d(2026, 3, 1),
        end_date: Some(d(2026, 3, 1)),
        next_run_date: d(2026, 3, 1),
        last_run_date: None,
        is_active: true,
        // Schedule bookkeeping only; nothing is written.
        auto_create: false,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn deactivation_failure_does_not_abort_the_pass() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = db::init(dir.path().join("app.db").to_str().unwrap()).unwrap();
    let pool = db::create_pool(&db_path).unwrap();
    let writer = db::spawn_writer(pool).unwrap();

    let repository = Arc::new(FlakyDeactivation {
        definitions: vec![finished_definition("def-1"), finished_definition("def-2")],
        fail_for: "def-1".to_string(),
        deactivated: Mutex::new(Vec::new()),
    });
    let service = RecurringService::new(repository.clone(), Arc::new(StubAccounts), writer);

    let report = service.process_due(d(2026, 3, 5)).await.unwrap();

    // The first definition's deactivation failed and was reported; the
    // second was still processed and deactivated.
    assert!(report.materialized.is_empty());
    assert_eq!(report.skipped, vec!["def-1".to_string()]);
    assert_eq!(
        *repository.deactivated.lock().unwrap(),
        vec!["def-2".to_string()]
    );
}
