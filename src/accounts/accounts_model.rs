//! Account domain models.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::accounts_errors::AccountError;
use crate::schema::accounts;
use crate::Result;

/// Kind of account. Credit cards and loans track debt: their balance counts
/// against net worth rather than towards it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    #[default]
    Bank,
    Investment,
    Cash,
    EWallet,
    CreditCard,
    Loan,
    Other,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Bank => "BANK",
            AccountType::Investment => "INVESTMENT",
            AccountType::Cash => "CASH",
            AccountType::EWallet => "E_WALLET",
            AccountType::CreditCard => "CREDIT_CARD",
            AccountType::Loan => "LOAN",
            AccountType::Other => "OTHER",
        }
    }

    pub fn from_str(value: &str) -> std::result::Result<Self, AccountError> {
        match value {
            "BANK" => Ok(AccountType::Bank),
            "INVESTMENT" => Ok(AccountType::Investment),
            "CASH" => Ok(AccountType::Cash),
            "E_WALLET" => Ok(AccountType::EWallet),
            "CREDIT_CARD" => Ok(AccountType::CreditCard),
            "LOAN" => Ok(AccountType::Loan),
            "OTHER" => Ok(AccountType::Other),
            other => Err(AccountError::InvalidData(format!(
                "Unknown account type: {}",
                other
            ))),
        }
    }

    /// Default debt capability for the type; callers may override per account.
    pub fn tracks_debt_by_default(&self) -> bool {
        matches!(self, AccountType::CreditCard | AccountType::Loan)
    }
}

/// Domain model representing an account. Balances are integer minor units of
/// the account currency. Invariant: `current_balance` always equals
/// `initial_balance` plus the signed effects of every non-deleted transaction
/// touching this account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub account_type: AccountType,
    pub currency: String,
    pub initial_balance: i64,
    pub current_balance: i64,
    pub tracks_debt: bool,
    pub included_in_net_worth: bool,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub owner_id: String,
    pub name: String,
    pub account_type: AccountType,
    pub currency: String,
    pub initial_balance: i64,
    pub tracks_debt: Option<bool>,
    pub included_in_net_worth: bool,
}

impl NewAccount {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(
                AccountError::InvalidData("Account name cannot be empty".to_string()).into(),
            );
        }
        if self.currency.trim().is_empty() {
            return Err(AccountError::InvalidData("Currency cannot be empty".to_string()).into());
        }
        if self.owner_id.trim().is_empty() {
            return Err(AccountError::InvalidData("Owner id cannot be empty".to_string()).into());
        }
        Ok(())
    }
}

/// Input model for updating an existing account. The currency and both
/// balance fields are immutable here; balances change only through the
/// ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountUpdate {
    pub id: String,
    pub name: String,
    pub account_type: AccountType,
    pub tracks_debt: bool,
    pub included_in_net_worth: bool,
    pub is_active: bool,
}

impl AccountUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(
                AccountError::InvalidData("Account ID is required for updates".to_string()).into(),
            );
        }
        if self.name.trim().is_empty() {
            return Err(
                AccountError::InvalidData("Account name cannot be empty".to_string()).into(),
            );
        }
        Ok(())
    }
}

/// One account's balance expressed in a reporting currency. When no rate is
/// available the raw balance is carried over unconverted and `approximate`
/// is set, so one missing pair never sinks a whole report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedBalance {
    pub account_id: String,
    pub currency: String,
    pub balance: i64,
    pub target_currency: String,
    pub converted_balance: i64,
    pub approximate: bool,
}

/// Aggregate assets/liabilities over accounts included in net worth.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetWorth {
    pub currency: String,
    pub assets: i64,
    pub liabilities: i64,
    pub net: i64,
}

/// Database row for an account.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset, Identifiable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountDB {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub account_type: String,
    pub currency: String,
    pub initial_balance: i64,
    pub current_balance: i64,
    pub tracks_debt: bool,
    pub included_in_net_worth: bool,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<AccountDB> for Account {
    type Error = AccountError;

    fn try_from(db: AccountDB) -> std::result::Result<Self, AccountError> {
        Ok(Account {
            account_type: AccountType::from_str(&db.account_type)?,
            id: db.id,
            owner_id: db.owner_id,
            name: db.name,
            currency: db.currency,
            initial_balance: db.initial_balance,
            current_balance: db.current_balance,
            tracks_debt: db.tracks_debt,
            included_in_net_worth: db.included_in_net_worth,
            is_active: db.is_active,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<NewAccount> for AccountDB {
    fn from(new_account: NewAccount) -> Self {
        let now = chrono::Utc::now().naive_utc();
        let tracks_debt = new_account
            .tracks_debt
            .unwrap_or_else(|| new_account.account_type.tracks_debt_by_default());
        AccountDB {
            id: new_account.id.unwrap_or_default(),
            owner_id: new_account.owner_id,
            name: new_account.name,
            account_type: new_account.account_type.as_str().to_string(),
            currency: new_account.currency,
            initial_balance: new_account.initial_balance,
            // A fresh account has no transactions yet.
            current_balance: new_account.initial_balance,
            tracks_debt,
            included_in_net_worth: new_account.included_in_net_worth,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
