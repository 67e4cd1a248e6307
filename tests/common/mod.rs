// Not every test binary touches every helper.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use diesel::prelude::*;
use tempfile::TempDir;

use moneybook_core::accounts::{
    Account, AccountRepository, AccountService, AccountType, NewAccount,
};
use moneybook_core::db::{self, DbPool};
use moneybook_core::fx::{ExchangeRateDB, FxRepository, FxService};
use moneybook_core::recurring::{RecurringRepository, RecurringService};
use moneybook_core::schema::{accounts, exchange_rates};
use moneybook_core::transactions::{TransactionRepository, TransactionService};

pub use moneybook_core::accounts::{AccountRepositoryTrait, AccountServiceTrait};
pub use moneybook_core::fx::FxServiceTrait;
pub use moneybook_core::recurring::RecurringServiceTrait;
pub use moneybook_core::transactions::TransactionServiceTrait;

pub const OWNER: &str = "test-owner";

/// A fully wired service stack over a scratch database. The temp dir is
/// dropped with the context, which removes the database file.
pub struct TestContext {
    pub pool: Arc<DbPool>,
    pub accounts: AccountService,
    pub fx: Arc<FxService>,
    pub transactions: TransactionService,
    pub recurring: RecurringService,
    _dir: TempDir,
}

/// Builds the full stack on a fresh database. Must run inside a tokio
/// runtime because the write actor is a spawned task.
pub fn setup() -> TestContext {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir
        .path()
        .join("app.db")
        .to_string_lossy()
        .to_string();

    let db_path = db::init(&db_path).expect("Failed to initialize database");
    let pool = db::create_pool(&db_path).expect("Failed to create database pool");
    let writer = db::spawn_writer(Arc::clone(&pool)).expect("Failed to spawn write actor");

    let account_repository: Arc<dyn AccountRepositoryTrait> =
        Arc::new(AccountRepository::new(Arc::clone(&pool), writer.clone()));
    let fx_service = Arc::new(FxService::new(Arc::new(FxRepository::new(Arc::clone(
        &pool,
    )))));

    let transactions = TransactionService::new(
        Arc::new(TransactionRepository::new(Arc::clone(&pool))),
        Arc::clone(&account_repository),
        fx_service.clone(),
        writer.clone(),
    );
    let recurring = RecurringService::new(
        Arc::new(RecurringRepository::new(Arc::clone(&pool), writer.clone())),
        Arc::clone(&account_repository),
        writer.clone(),
    );
    let accounts = AccountService::new(Arc::clone(&account_repository), fx_service.clone());

    TestContext {
        pool,
        accounts,
        fx: fx_service,
        transactions,
        recurring,
        _dir: dir,
    }
}

impl TestContext {
    pub async fn create_account(
        &self,
        name: &str,
        currency: &str,
        initial_balance: i64,
    ) -> Account {
        self.accounts
            .create_account(NewAccount {
                id: None,
                owner_id: OWNER.to_string(),
                name: name.to_string(),
                account_type: AccountType::Bank,
                currency: currency.to_string(),
                initial_balance,
                tracks_debt: None,
                included_in_net_worth: true,
            })
            .await
            .expect("Failed to create account")
    }

    pub fn balance_of(&self, account_id: &str) -> i64 {
        let mut conn = self.pool.get().expect("Failed to get connection");
        accounts::table
            .find(account_id)
            .select(accounts::current_balance)
            .first::<i64>(&mut conn)
            .expect("Failed to read balance")
    }

    pub fn seed_rate(&self, base: &str, target: &str, rate: &str, rate_date: NaiveDate) {
        let mut conn = self.pool.get().expect("Failed to get connection");
        let now = chrono::Utc::now().naive_utc();
        diesel::insert_into(exchange_rates::table)
            .values(ExchangeRateDB {
                id: format!("{}-{}-{}", base, target, rate_date),
                base_currency: base.to_string(),
                target_currency: target.to_string(),
                rate: rate.to_string(),
                rate_date,
                source: "manual".to_string(),
                created_at: now,
            })
            .execute(&mut conn)
            .expect("Failed to seed exchange rate");
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("Invalid test date")
}
