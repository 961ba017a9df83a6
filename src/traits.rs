//! Traits for storage abstraction

use async_trait::async_trait;

use crate::types::*;

/// Storage abstraction for the ledger
///
/// This trait lets the account core work with any storage backend
/// (PostgreSQL, MySQL, SQLite, in-memory, etc.) by implementing these
/// methods.
///
/// # Atomicity
///
/// Each public ledger operation issues a group of reads and writes that the
/// implementation must commit as one atomic unit: a balance mutation and the
/// transaction record describing it are inseparable, and all reads within an
/// operation must observe a consistent snapshot. Isolation between
/// concurrent operations on the same account (row locking, optimistic
/// retry) is the implementation's concern; the core is single-threaded per
/// request and makes no concurrency decisions of its own.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Look up a user by id
    async fn find_user_by_id(&self, user_id: u64) -> LedgerResult<Option<User>>;

    /// Look up an account by its 10-digit account number
    async fn find_account_by_number(&self, account_number: &str)
        -> LedgerResult<Option<Account>>;

    /// The numerically highest account number in the system, if any
    /// accounts exist at all
    async fn find_highest_account_number(&self) -> LedgerResult<Option<String>>;

    /// How many accounts a user owns, open or closed
    async fn count_accounts_for_user(&self, user_id: u64) -> LedgerResult<usize>;

    /// All accounts owned by a user, in insertion order
    async fn find_accounts_for_user(&self, user_id: u64) -> LedgerResult<Vec<Account>>;

    /// Look up a transaction by its external transaction id
    async fn find_transaction_by_external_id(
        &self,
        transaction_id: &str,
    ) -> LedgerResult<Option<Transaction>>;

    /// Persist an account, returning the stored row
    ///
    /// Inserts assign the internal id and stamp `created_at`; every write
    /// stamps `updated_at`. Updating a row that does not exist is an
    /// [`LedgerError::AccountNotFound`] error.
    async fn save_account(&mut self, account: &Account) -> LedgerResult<Account>;

    /// Persist a transaction record, returning the stored row
    ///
    /// Transactions are insert-only; records are never updated or deleted.
    async fn save_transaction(&mut self, transaction: &Transaction) -> LedgerResult<Transaction>;
}
