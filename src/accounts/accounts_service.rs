use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};

use super::accounts_model::{Account, AccountUpdate, ConvertedBalance, NetWorth, NewAccount};
use super::accounts_traits::{AccountRepositoryTrait, AccountServiceTrait};
use crate::errors::Result;
use crate::fx::{FxError, FxServiceTrait};
use crate::Error;

/// Service for managing accounts and account-level reporting.
pub struct AccountService {
    repository: Arc<dyn AccountRepositoryTrait>,
    fx_service: Arc<dyn FxServiceTrait>,
}

impl AccountService {
    pub fn new(
        repository: Arc<dyn AccountRepositoryTrait>,
        fx_service: Arc<dyn FxServiceTrait>,
    ) -> Self {
        Self {
            repository,
            fx_service,
        }
    }

    /// Converts one account's balance, degrading to the unconverted amount
    /// when no rate is stored for the pair.
    fn convert_balance(&self, account: &Account, target_currency: &str) -> ConvertedBalance {
        match self
            .fx_service
            .convert(account.current_balance, &account.currency, target_currency, None)
        {
            Ok(converted) => ConvertedBalance {
                account_id: account.id.clone(),
                currency: account.currency.clone(),
                balance: account.current_balance,
                target_currency: target_currency.to_string(),
                converted_balance: converted,
                approximate: false,
            },
            Err(Error::Fx(FxError::RateNotFound(msg))) => {
                warn!(
                    "No rate for {}->{} ({}); reporting raw balance for account {}",
                    account.currency, target_currency, msg, account.id
                );
                ConvertedBalance {
                    account_id: account.id.clone(),
                    currency: account.currency.clone(),
                    balance: account.current_balance,
                    target_currency: target_currency.to_string(),
                    converted_balance: account.current_balance,
                    approximate: true,
                }
            }
            Err(e) => {
                warn!(
                    "Conversion failed for account {} ({}); reporting raw balance: {}",
                    account.id, account.currency, e
                );
                ConvertedBalance {
                    account_id: account.id.clone(),
                    currency: account.currency.clone(),
                    balance: account.current_balance,
                    target_currency: target_currency.to_string(),
                    converted_balance: account.current_balance,
                    approximate: true,
                }
            }
        }
    }
}

#[async_trait]
impl AccountServiceTrait for AccountService {
    async fn create_account(&self, new_account: NewAccount) -> Result<Account> {
        debug!(
            "Creating account {} ({})",
            new_account.name, new_account.currency
        );
        self.repository.create(new_account).await
    }

    async fn update_account(&self, account_update: AccountUpdate) -> Result<Account> {
        self.repository.update(account_update).await
    }

    async fn deactivate_account(&self, account_id: &str) -> Result<()> {
        self.repository.set_active(account_id, false).await
    }

    fn get_account(&self, account_id: &str) -> Result<Account> {
        self.repository.get_by_id(account_id)
    }

    fn list_accounts(&self, owner_id: &str, is_active_filter: Option<bool>) -> Result<Vec<Account>> {
        self.repository.list(owner_id, is_active_filter)
    }

    fn converted_balances(
        &self,
        owner_id: &str,
        target_currency: &str,
    ) -> Result<Vec<ConvertedBalance>> {
        let accounts = self.repository.list(owner_id, Some(true))?;
        Ok(accounts
            .iter()
            .map(|account| self.convert_balance(account, target_currency))
            .collect())
    }

    fn net_worth(&self, owner_id: &str, target_currency: &str) -> Result<NetWorth> {
        let accounts = self.repository.list(owner_id, Some(true))?;

        let mut assets: i64 = 0;
        let mut liabilities: i64 = 0;

        for account in accounts.iter().filter(|a| a.included_in_net_worth) {
            let converted = self.convert_balance(account, target_currency);
            if account.tracks_debt {
                // Debt accounts usually carry negative balances; count their
                // magnitude against net worth.
                liabilities += -converted.converted_balance;
            } else {
                assets += converted.converted_balance;
            }
        }

        Ok(NetWorth {
            currency: target_currency.to_string(),
            assets,
            liabilities,
            net: assets - liabilities,
        })
    }
}
