//! Balance transaction processing and lookup

use chrono::Months;
use tracing::{info, warn};
use uuid::Uuid;

use crate::traits::LedgerStore;
use crate::types::*;
use crate::utils::validation::{validate_account_number, validate_positive_amount};

/// How far back a successful use may still be cancelled
pub const CANCEL_WINDOW_MONTHS: u32 = 12;

/// Transaction manager executing balance-use and balance-cancel operations
///
/// Rejected attempts are not recorded automatically: when `use_balance` or
/// `cancel_balance` fails against a resolved account, the caller decides
/// whether to write an audit record via [`record_failed_use`] /
/// [`record_failed_cancel`].
///
/// [`record_failed_use`]: TransactionManager::record_failed_use
/// [`record_failed_cancel`]: TransactionManager::record_failed_cancel
pub struct TransactionManager<S: LedgerStore> {
    storage: S,
}

impl<S: LedgerStore> TransactionManager<S> {
    /// Create a new transaction manager
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Debit an account's balance and record the transaction
    pub async fn use_balance(
        &mut self,
        user_id: u64,
        account_number: &str,
        amount: i64,
    ) -> LedgerResult<TransactionRecord> {
        validate_positive_amount(amount)?;
        validate_account_number(account_number)?;

        let user = self.get_user_required(user_id).await?;
        let mut account = self.get_account_required(account_number).await?;

        if account.user_id != user.id {
            return Err(LedgerError::UserAccountMismatch);
        }
        if account.status != AccountStatus::Active {
            return Err(LedgerError::AccountAlreadyUnregistered);
        }
        if amount > account.balance {
            return Err(LedgerError::AmountExceedsBalance);
        }

        account.use_balance(amount)?;
        let account = self.storage.save_account(&account).await?;
        let stored = self
            .record(TransactionType::Use, TransactionResult::Success, &account, amount)
            .await?;

        info!(
            account_number = %stored.account_number,
            transaction_id = %stored.transaction_id,
            amount,
            "balance used"
        );
        Ok(TransactionRecord::from(&stored))
    }

    /// Record a rejected use attempt against the account's audit trail
    ///
    /// The balance is untouched; the snapshot captures it as-is.
    pub async fn record_failed_use(&mut self, account_number: &str, amount: i64) -> LedgerResult<()> {
        validate_positive_amount(amount)?;
        validate_account_number(account_number)?;

        let account = self.get_account_required(account_number).await?;
        let stored = self
            .record(TransactionType::Use, TransactionResult::Fail, &account, amount)
            .await?;

        warn!(
            account_number = %stored.account_number,
            transaction_id = %stored.transaction_id,
            amount,
            "failed use recorded"
        );
        Ok(())
    }

    /// Reverse a prior successful use, crediting the balance back
    ///
    /// Only full reversals are allowed, and only within
    /// [`CANCEL_WINDOW_MONTHS`] of the original execution time.
    pub async fn cancel_balance(
        &mut self,
        transaction_id: &str,
        account_number: &str,
        amount: i64,
    ) -> LedgerResult<TransactionRecord> {
        validate_positive_amount(amount)?;
        validate_account_number(account_number)?;

        let original = self.get_transaction_required(transaction_id).await?;
        let mut account = self.get_account_required(account_number).await?;

        if original.account_id != account.id {
            return Err(LedgerError::TransactionAccountMismatch);
        }
        if original.amount != amount {
            return Err(LedgerError::CancelMustBeFull);
        }
        let now = chrono::Utc::now().naive_utc();
        if original.transacted_at < now - Months::new(CANCEL_WINDOW_MONTHS) {
            return Err(LedgerError::TransactionTooOldToCancel);
        }

        account.cancel_balance(amount)?;
        let account = self.storage.save_account(&account).await?;
        let stored = self
            .record(TransactionType::Cancel, TransactionResult::Success, &account, amount)
            .await?;

        info!(
            account_number = %stored.account_number,
            transaction_id = %stored.transaction_id,
            cancelled_transaction_id = %original.transaction_id,
            amount,
            "balance cancelled"
        );
        Ok(TransactionRecord::from(&stored))
    }

    /// Record a rejected cancel attempt against the account's audit trail
    pub async fn record_failed_cancel(
        &mut self,
        account_number: &str,
        amount: i64,
    ) -> LedgerResult<()> {
        validate_positive_amount(amount)?;
        validate_account_number(account_number)?;

        let account = self.get_account_required(account_number).await?;
        let stored = self
            .record(TransactionType::Cancel, TransactionResult::Fail, &account, amount)
            .await?;

        warn!(
            account_number = %stored.account_number,
            transaction_id = %stored.transaction_id,
            amount,
            "failed cancel recorded"
        );
        Ok(())
    }

    /// Fetch a stored transaction by its external id, verbatim
    pub async fn get_transaction(&self, transaction_id: &str) -> LedgerResult<TransactionRecord> {
        let transaction = self.get_transaction_required(transaction_id).await?;
        Ok(TransactionRecord::from(&transaction))
    }

    /// Persist one transaction record with a fresh external id
    ///
    /// The balance snapshot is whatever the account holds at call time:
    /// post-mutation on the success paths, unchanged on the failure paths.
    async fn record(
        &mut self,
        transaction_type: TransactionType,
        transaction_result: TransactionResult,
        account: &Account,
        amount: i64,
    ) -> LedgerResult<Transaction> {
        let now = chrono::Utc::now().naive_utc();
        let transaction = Transaction {
            id: 0,
            transaction_type,
            transaction_result,
            account_id: account.id,
            account_number: account.account_number.clone(),
            amount,
            balance_snapshot: account.balance,
            transaction_id: new_transaction_id(),
            transacted_at: now,
            created_at: now,
            updated_at: now,
        };
        self.storage.save_transaction(&transaction).await
    }

    async fn get_user_required(&self, user_id: u64) -> LedgerResult<User> {
        self.storage
            .find_user_by_id(user_id)
            .await?
            .ok_or(LedgerError::UserNotFound(user_id))
    }

    async fn get_account_required(&self, account_number: &str) -> LedgerResult<Account> {
        self.storage
            .find_account_by_number(account_number)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(account_number.to_string()))
    }

    async fn get_transaction_required(&self, transaction_id: &str) -> LedgerResult<Transaction> {
        self.storage
            .find_transaction_by_external_id(transaction_id)
            .await?
            .ok_or_else(|| LedgerError::TransactionNotFound(transaction_id.to_string()))
    }
}

/// Generate a globally unique external transaction id
///
/// A v4 UUID with the separators stripped: 32 lowercase hex characters.
fn new_transaction_id() -> String {
    Uuid::new_v4().simple().to_string()
}
