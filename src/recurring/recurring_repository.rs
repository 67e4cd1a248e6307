use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use super::recurring_errors::RecurringError;
use super::recurring_model::{NewRecurringDefinition, RecurringDB, RecurringDefinition};
use super::recurring_traits::RecurringRepositoryTrait;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::schema::recurring_transactions;
use crate::schema::recurring_transactions::dsl::*;
use crate::Result;

/// Repository for recurring-transaction definitions.
pub struct RecurringRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl RecurringRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl RecurringRepositoryTrait for RecurringRepository {
    async fn create(
        &self,
        new_def: NewRecurringDefinition,
        def_currency: String,
    ) -> Result<RecurringDefinition> {
        new_def.validate()?;

        self.writer
            .exec(move |conn| {
                let row = RecurringDB::from_new(&new_def, &def_currency);
                diesel::insert_into(recurring_transactions::table)
                    .values(&row)
                    .execute(conn)?;
                Ok(row.try_into()?)
            })
            .await
    }

    async fn set_active(&self, definition_id: &str, active: bool) -> Result<()> {
        let id_owned = definition_id.to_string();
        self.writer
            .exec(move |conn| {
                let updated = diesel::update(recurring_transactions.find(&id_owned))
                    .set((
                        is_active.eq(active),
                        updated_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .execute(conn)?;

                if updated == 0 {
                    return Err(RecurringError::NotFound(id_owned.clone()).into());
                }
                Ok(())
            })
            .await
    }

    fn get_by_id(&self, definition_id: &str) -> Result<RecurringDefinition> {
        let mut conn = get_connection(&self.pool)?;

        let row = recurring_transactions
            .select(RecurringDB::as_select())
            .find(definition_id)
            .first::<RecurringDB>(&mut conn)
            .map_err(RecurringError::from)?;

        Ok(row.try_into()?)
    }

    fn list_by_account(&self, for_account: &str) -> Result<Vec<RecurringDefinition>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = recurring_transactions
            .filter(account_id.eq(for_account))
            .select(RecurringDB::as_select())
            .order(next_run_date.asc())
            .load::<RecurringDB>(&mut conn)?;

        rows.into_iter()
            .map(|row| Ok(RecurringDefinition::try_from(row)?))
            .collect()
    }

    fn list_due(&self, as_of: NaiveDate) -> Result<Vec<RecurringDefinition>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = recurring_transactions
            .filter(is_active.eq(true))
            .filter(next_run_date.le(as_of))
            .select(RecurringDB::as_select())
            .order(next_run_date.asc())
            .load::<RecurringDB>(&mut conn)?;

        rows.into_iter()
            .map(|row| Ok(RecurringDefinition::try_from(row)?))
            .collect()
    }

    fn claim_in_tx(
        &self,
        definition_id: &str,
        expected_next: NaiveDate,
        new_last: NaiveDate,
        new_next: NaiveDate,
        conn: &mut SqliteConnection,
    ) -> Result<bool> {
        let updated = diesel::update(
            recurring_transactions
                .find(definition_id)
                .filter(next_run_date.eq(expected_next))
                .filter(is_active.eq(true)),
        )
        .set((
            next_run_date.eq(new_next),
            last_run_date.eq(Some(new_last)),
            updated_at.eq(chrono::Utc::now().naive_utc()),
        ))
        .execute(conn)?;

        Ok(updated == 1)
    }
}
