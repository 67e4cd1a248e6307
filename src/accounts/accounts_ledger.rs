//! Atomic balance mutation for a single account.

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use super::accounts_errors::AccountError;
use crate::schema::accounts;
use crate::Result;

/// Applies signed balance deltas to accounts at the storage layer.
///
/// The increment happens inside the SQL engine
/// (`current_balance = current_balance + ?`), never as a read-then-write in
/// application memory, so concurrent operations on the same account cannot
/// lose updates. Callers decide the sign convention: income is `+amount`,
/// expense is `-amount`.
pub struct AccountLedger;

impl AccountLedger {
    /// Adds `delta` to the account's current balance. Runs on the caller's
    /// transaction connection so the balance change commits or rolls back
    /// together with the rest of the operation.
    pub fn apply(conn: &mut SqliteConnection, account_id: &str, delta: i64) -> Result<()> {
        let updated = diesel::update(accounts::table.find(account_id))
            .set((
                accounts::current_balance.eq(accounts::current_balance + delta),
                accounts::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .execute(conn)?;

        if updated == 0 {
            return Err(AccountError::NotFound(format!("Account {} not found", account_id)).into());
        }

        Ok(())
    }

    /// Undoes a previously applied delta.
    pub fn reverse(conn: &mut SqliteConnection, account_id: &str, previous_delta: i64) -> Result<()> {
        Self::apply(conn, account_id, -previous_delta)
    }
}
