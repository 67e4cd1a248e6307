use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use super::accounts_model::{Account, AccountDB, AccountUpdate, NewAccount};
use super::accounts_traits::AccountRepositoryTrait;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::schema::accounts;
use crate::schema::accounts::dsl::*;
use crate::Result;

fn insert_new_account(new_account: NewAccount, conn: &mut SqliteConnection) -> Result<Account> {
    new_account.validate()?;

    let mut account_db: AccountDB = new_account.into();
    if account_db.id.is_empty() {
        account_db.id = uuid::Uuid::new_v4().to_string();
    }

    diesel::insert_into(accounts::table)
        .values(&account_db)
        .execute(conn)?;

    Ok(account_db.try_into()?)
}

/// Repository for managing account data in the database.
pub struct AccountRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AccountRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl AccountRepositoryTrait for AccountRepository {
    async fn create(&self, new_account: NewAccount) -> Result<Account> {
        self.writer
            .exec(move |conn| insert_new_account(new_account, conn))
            .await
    }

    async fn update(&self, account_update: AccountUpdate) -> Result<Account> {
        account_update.validate()?;

        self.writer
            .exec(move |conn| {
                let existing = accounts
                    .select(AccountDB::as_select())
                    .find(&account_update.id)
                    .first::<AccountDB>(conn)?;

                let account_db = AccountDB {
                    name: account_update.name.clone(),
                    account_type: account_update.account_type.as_str().to_string(),
                    tracks_debt: account_update.tracks_debt,
                    included_in_net_worth: account_update.included_in_net_worth,
                    is_active: account_update.is_active,
                    updated_at: chrono::Utc::now().naive_utc(),
                    // Currency and balances never change through an update.
                    ..existing
                };

                diesel::update(accounts.find(&account_db.id))
                    .set(&account_db)
                    .execute(conn)?;

                Ok(account_db.try_into()?)
            })
            .await
    }

    async fn set_active(&self, account_id: &str, active: bool) -> Result<()> {
        let id_owned = account_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::update(accounts.find(&id_owned))
                    .set((
                        is_active.eq(active),
                        updated_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .execute(conn)?;
                Ok(())
            })
            .await
    }

    fn get_by_id(&self, account_id: &str) -> Result<Account> {
        let mut conn = get_connection(&self.pool)?;

        let account_db = accounts
            .select(AccountDB::as_select())
            .find(account_id)
            .first::<AccountDB>(&mut conn)?;

        Ok(account_db.try_into()?)
    }

    fn list(&self, owner: &str, is_active_filter: Option<bool>) -> Result<Vec<Account>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = accounts::table.into_boxed();
        query = query.filter(owner_id.eq(owner.to_string()));

        if let Some(active) = is_active_filter {
            query = query.filter(is_active.eq(active));
        }

        let results = query
            .select(AccountDB::as_select())
            .order((is_active.desc(), name.asc()))
            .load::<AccountDB>(&mut conn)?;

        results
            .into_iter()
            .map(|db| Ok(Account::try_from(db)?))
            .collect()
    }
}
