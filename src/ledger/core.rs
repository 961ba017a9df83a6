//! Main ledger facade that coordinates account lifecycle and transactions

use crate::ledger::{AccountManager, TransactionManager};
use crate::traits::LedgerStore;
use crate::types::*;

/// Ledger system orchestrating all account and transaction operations
///
/// This is the single entry point a boundary layer (HTTP, CLI, queue
/// consumer) talks to; it delegates to the account and transaction
/// managers, which share the same storage backend.
pub struct Ledger<S: LedgerStore> {
    account_manager: AccountManager<S>,
    transaction_manager: TransactionManager<S>,
}

impl<S: LedgerStore + Clone> Ledger<S> {
    /// Create a new ledger with the given storage backend
    pub fn new(storage: S) -> Self {
        Self {
            account_manager: AccountManager::new(storage.clone()),
            transaction_manager: TransactionManager::new(storage),
        }
    }

    // Account lifecycle operations

    /// Open a new account for a user
    pub async fn open_account(
        &mut self,
        user_id: u64,
        initial_balance: i64,
    ) -> LedgerResult<AccountSummary> {
        self.account_manager
            .open_account(user_id, initial_balance)
            .await
    }

    /// Close an account, stamping its unregistration time
    pub async fn close_account(
        &mut self,
        user_id: u64,
        account_number: &str,
    ) -> LedgerResult<AccountSummary> {
        self.account_manager
            .close_account(user_id, account_number)
            .await
    }

    /// List every account a user owns
    pub async fn list_accounts(&self, user_id: u64) -> LedgerResult<Vec<AccountSummary>> {
        self.account_manager.list_accounts(user_id).await
    }

    // Transaction operations

    /// Debit an account's balance and record the transaction
    pub async fn use_balance(
        &mut self,
        user_id: u64,
        account_number: &str,
        amount: i64,
    ) -> LedgerResult<TransactionRecord> {
        self.transaction_manager
            .use_balance(user_id, account_number, amount)
            .await
    }

    /// Record a rejected use attempt for the audit trail
    pub async fn record_failed_use(
        &mut self,
        account_number: &str,
        amount: i64,
    ) -> LedgerResult<()> {
        self.transaction_manager
            .record_failed_use(account_number, amount)
            .await
    }

    /// Reverse a prior successful use in full
    pub async fn cancel_balance(
        &mut self,
        transaction_id: &str,
        account_number: &str,
        amount: i64,
    ) -> LedgerResult<TransactionRecord> {
        self.transaction_manager
            .cancel_balance(transaction_id, account_number, amount)
            .await
    }

    /// Record a rejected cancel attempt for the audit trail
    pub async fn record_failed_cancel(
        &mut self,
        account_number: &str,
        amount: i64,
    ) -> LedgerResult<()> {
        self.transaction_manager
            .record_failed_cancel(account_number, amount)
            .await
    }

    // Query operations

    /// Fetch a stored transaction by its external id
    pub async fn get_transaction(&self, transaction_id: &str) -> LedgerResult<TransactionRecord> {
        self.transaction_manager.get_transaction(transaction_id).await
    }
}
