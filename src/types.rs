//! Core types and data structures for the account ledger

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an account
///
/// The only legal transition is `Active -> Closed`; a closed account is
/// never reopened and never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    /// Account is open and may be debited and credited
    Active,
    /// Account has been unregistered; balance operations are rejected
    Closed,
}

/// Kind of balance-affecting operation a transaction records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Debit against an account's balance
    Use,
    /// Full reversal of a prior use, crediting the balance back
    Cancel,
}

/// Terminal outcome of a transaction attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionResult {
    /// The balance mutation was applied
    Success,
    /// The attempt was rejected; the balance is unchanged
    Fail,
}

/// Holder of one or more accounts
///
/// Users are owned by the ledger store; the core only resolves them by id
/// and never creates or mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: u64,
    /// Display name
    pub name: String,
    /// When the record was created (stamped by the store)
    pub created_at: NaiveDateTime,
    /// When the record was last written (stamped by the store)
    pub updated_at: NaiveDateTime,
}

/// A single bank account owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Internal storage key; 0 until the store assigns one on first save
    pub id: u64,
    /// Owning user
    pub user_id: u64,
    /// Externally visible account number, exactly 10 decimal digits
    pub account_number: String,
    /// Current lifecycle status
    pub status: AccountStatus,
    /// Current balance in the smallest currency unit; never negative
    pub balance: i64,
    /// When the account was opened
    pub registered_at: NaiveDateTime,
    /// When the account was closed, if it has been
    pub unregistered_at: Option<NaiveDateTime>,
    /// When the record was created (stamped by the store)
    pub created_at: NaiveDateTime,
    /// When the record was last written (stamped by the store)
    pub updated_at: NaiveDateTime,
}

impl Account {
    /// Create a new active account, not yet persisted
    pub fn new(user_id: u64, account_number: String, balance: i64, now: NaiveDateTime) -> Self {
        Self {
            id: 0,
            user_id,
            account_number,
            status: AccountStatus::Active,
            balance,
            registered_at: now,
            unregistered_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Debit the balance
    ///
    /// The manager validates the amount before calling; the entity re-checks
    /// so the balance can never go negative through any path.
    pub fn use_balance(&mut self, amount: i64) -> LedgerResult<()> {
        if amount > self.balance {
            return Err(LedgerError::AmountExceedsBalance);
        }
        self.balance -= amount;
        self.updated_at = chrono::Utc::now().naive_utc();
        Ok(())
    }

    /// Credit the balance back after a cancellation
    pub fn cancel_balance(&mut self, amount: i64) -> LedgerResult<()> {
        if amount < 0 {
            return Err(LedgerError::InvalidRequest(
                "cancel amount must not be negative".to_string(),
            ));
        }
        self.balance += amount;
        self.updated_at = chrono::Utc::now().naive_utc();
        Ok(())
    }

    /// Close the account, stamping the unregistration time
    pub fn close(&mut self, now: NaiveDateTime) -> LedgerResult<()> {
        if self.status == AccountStatus::Closed {
            return Err(LedgerError::AccountAlreadyClosed);
        }
        self.status = AccountStatus::Closed;
        self.unregistered_at = Some(now);
        self.updated_at = now;
        Ok(())
    }
}

/// One balance-affecting event, successful or rejected
///
/// Transactions are immutable once created; corrections happen through new
/// `Cancel` transactions, never by editing a past record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Internal storage key; 0 until the store assigns one on save
    pub id: u64,
    /// Operation kind this record captures
    pub transaction_type: TransactionType,
    /// Whether the operation was applied or rejected
    pub transaction_result: TransactionResult,
    /// Internal key of the affected account
    pub account_id: u64,
    /// Account number of the affected account
    pub account_number: String,
    /// Requested amount in the smallest currency unit
    pub amount: i64,
    /// Account balance right after the operation; on a `Fail` record this
    /// is the unchanged balance
    pub balance_snapshot: i64,
    /// Globally unique external identifier, a 32-character hex token
    pub transaction_id: String,
    /// When the operation executed
    pub transacted_at: NaiveDateTime,
    /// When the record was created (stamped by the store)
    pub created_at: NaiveDateTime,
    /// When the record was last written (stamped by the store)
    pub updated_at: NaiveDateTime,
}

/// Account view returned by lifecycle and listing operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub user_id: u64,
    pub account_number: String,
    pub balance: i64,
    pub registered_at: NaiveDateTime,
    pub unregistered_at: Option<NaiveDateTime>,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            user_id: account.user_id,
            account_number: account.account_number.clone(),
            balance: account.balance,
            registered_at: account.registered_at,
            unregistered_at: account.unregistered_at,
        }
    }
}

/// Transaction view returned by the engine and query operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub account_number: String,
    pub transaction_type: TransactionType,
    pub transaction_result: TransactionResult,
    pub transaction_id: String,
    pub amount: i64,
    pub balance_snapshot: i64,
    pub transacted_at: NaiveDateTime,
}

impl From<&Transaction> for TransactionRecord {
    fn from(transaction: &Transaction) -> Self {
        Self {
            account_number: transaction.account_number.clone(),
            transaction_type: transaction.transaction_type,
            transaction_result: transaction.transaction_result,
            transaction_id: transaction.transaction_id.clone(),
            amount: transaction.amount,
            balance_snapshot: transaction.balance_snapshot,
            transacted_at: transaction.transacted_at,
        }
    }
}

/// Errors that can occur in the ledger system
///
/// Every failure carries a machine-readable [`code`](LedgerError::code) for
/// boundary layers and a human-readable message through `Display`.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("user {0} not found")]
    UserNotFound(u64),
    #[error("account {0} not found")]
    AccountNotFound(String),
    #[error("transaction {0} not found")]
    TransactionNotFound(String),
    #[error("account is not owned by the requesting user")]
    UserAccountMismatch,
    #[error("transaction does not belong to the given account")]
    TransactionAccountMismatch,
    #[error("account is already unregistered")]
    AccountAlreadyUnregistered,
    #[error("account is already closed")]
    AccountAlreadyClosed,
    #[error("account balance is not empty")]
    BalanceNotEmpty,
    #[error("amount exceeds the account balance")]
    AmountExceedsBalance,
    #[error("cancellation must match the full original amount")]
    CancelMustBeFull,
    #[error("transaction is too old to cancel")]
    TransactionTooOldToCancel,
    #[error("user already holds the maximum number of accounts")]
    MaxAccountsExceeded,
    #[error("account number space is exhausted")]
    AccountNumberExhausted,
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Stable machine-readable code for this error kind
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::UserNotFound(_) => "USER_NOT_FOUND",
            LedgerError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            LedgerError::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            LedgerError::UserAccountMismatch => "USER_ACCOUNT_MISMATCH",
            LedgerError::TransactionAccountMismatch => "TRANSACTION_ACCOUNT_MISMATCH",
            LedgerError::AccountAlreadyUnregistered => "ACCOUNT_ALREADY_UNREGISTERED",
            LedgerError::AccountAlreadyClosed => "ACCOUNT_ALREADY_CLOSED",
            LedgerError::BalanceNotEmpty => "BALANCE_NOT_EMPTY",
            LedgerError::AmountExceedsBalance => "AMOUNT_EXCEEDS_BALANCE",
            LedgerError::CancelMustBeFull => "CANCEL_MUST_BE_FULL",
            LedgerError::TransactionTooOldToCancel => "TRANSACTION_TOO_OLD_TO_CANCEL",
            LedgerError::MaxAccountsExceeded => "MAX_ACCOUNTS_EXCEEDED",
            LedgerError::AccountNumberExhausted => "ACCOUNT_NUMBER_EXHAUSTED",
            LedgerError::InvalidRequest(_) => "INVALID_REQUEST",
            LedgerError::Storage(_) => "STORAGE_ERROR",
        }
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
