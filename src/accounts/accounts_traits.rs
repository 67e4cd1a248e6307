use async_trait::async_trait;

use super::accounts_model::{Account, AccountUpdate, ConvertedBalance, NetWorth, NewAccount};
use crate::Result;

/// Trait defining the contract for account repository operations.
#[async_trait]
pub trait AccountRepositoryTrait: Send + Sync {
    async fn create(&self, new_account: NewAccount) -> Result<Account>;
    async fn update(&self, account_update: AccountUpdate) -> Result<Account>;
    async fn set_active(&self, account_id: &str, is_active: bool) -> Result<()>;
    fn get_by_id(&self, account_id: &str) -> Result<Account>;
    fn list(&self, owner_id: &str, is_active_filter: Option<bool>) -> Result<Vec<Account>>;
}

/// Trait defining the contract for account service operations.
#[async_trait]
pub trait AccountServiceTrait: Send + Sync {
    async fn create_account(&self, new_account: NewAccount) -> Result<Account>;
    async fn update_account(&self, account_update: AccountUpdate) -> Result<Account>;
    async fn deactivate_account(&self, account_id: &str) -> Result<()>;
    fn get_account(&self, account_id: &str) -> Result<Account>;
    fn list_accounts(&self, owner_id: &str, is_active_filter: Option<bool>) -> Result<Vec<Account>>;

    /// Per-account balances converted into `target_currency` for reporting.
    fn converted_balances(&self, owner_id: &str, target_currency: &str)
        -> Result<Vec<ConvertedBalance>>;

    /// Assets/liabilities/net over active accounts included in net worth.
    fn net_worth(&self, owner_id: &str, target_currency: &str) -> Result<NetWorth>;
}
