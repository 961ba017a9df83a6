//! In-memory storage implementation for testing and development

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::traits::LedgerStore;
use crate::types::*;

/// In-memory [`LedgerStore`] for tests, demos and development
///
/// Clones share the same underlying state, so a `MemoryStore` can be handed
/// to several managers at once. All writes go through a single lock, which
/// trivially satisfies the trait's atomicity contract: operations on the
/// store serialize, and a debit can never interleave with another write on
/// the same account.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    users: BTreeMap<u64, User>,
    accounts: BTreeMap<u64, Account>,
    transactions: BTreeMap<u64, Transaction>,
    next_user_id: u64,
    next_account_id: u64,
    next_transaction_id: u64,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user fixture, assigning the next free id
    ///
    /// The core never creates users; tests and demos add them here.
    pub fn add_user(&self, name: &str) -> User {
        let mut inner = self.inner.write().unwrap();
        inner.next_user_id += 1;
        let now = chrono::Utc::now().naive_utc();
        let user = User {
            id: inner.next_user_id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(user.id, user.clone());
        user
    }

    /// Seed a transaction fixture verbatim, assigning an id when unset
    ///
    /// Lets tests plant records with arbitrary execution timestamps, which
    /// no engine path can produce.
    pub fn add_transaction(&self, mut transaction: Transaction) -> Transaction {
        let mut inner = self.inner.write().unwrap();
        if transaction.id == 0 {
            inner.next_transaction_id += 1;
            transaction.id = inner.next_transaction_id;
        }
        inner
            .transactions
            .insert(transaction.id, transaction.clone());
        transaction
    }

    /// Every transaction recorded against an account, in insertion order
    ///
    /// Inspection helper for tests; the query facade only exposes lookup
    /// by external id.
    pub fn transactions_for_account(&self, account_id: u64) -> Vec<Transaction> {
        let inner = self.inner.read().unwrap();
        inner
            .transactions
            .values()
            .filter(|transaction| transaction.account_id == account_id)
            .cloned()
            .collect()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.users.clear();
        inner.accounts.clear();
        inner.transactions.clear();
    }
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn find_user_by_id(&self, user_id: u64) -> LedgerResult<Option<User>> {
        Ok(self.inner.read().unwrap().users.get(&user_id).cloned())
    }

    async fn find_account_by_number(
        &self,
        account_number: &str,
    ) -> LedgerResult<Option<Account>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .accounts
            .values()
            .find(|account| account.account_number == account_number)
            .cloned())
    }

    async fn find_highest_account_number(&self) -> LedgerResult<Option<String>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .accounts
            .values()
            .filter_map(|account| {
                account
                    .account_number
                    .parse::<u64>()
                    .ok()
                    .map(|n| (n, account.account_number.clone()))
            })
            .max_by_key(|(n, _)| *n)
            .map(|(_, number)| number))
    }

    async fn count_accounts_for_user(&self, user_id: u64) -> LedgerResult<usize> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .accounts
            .values()
            .filter(|account| account.user_id == user_id)
            .count())
    }

    async fn find_accounts_for_user(&self, user_id: u64) -> LedgerResult<Vec<Account>> {
        let inner = self.inner.read().unwrap();
        // BTreeMap iteration by assigned id preserves insertion order
        Ok(inner
            .accounts
            .values()
            .filter(|account| account.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_transaction_by_external_id(
        &self,
        transaction_id: &str,
    ) -> LedgerResult<Option<Transaction>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .transactions
            .values()
            .find(|transaction| transaction.transaction_id == transaction_id)
            .cloned())
    }

    async fn save_account(&mut self, account: &Account) -> LedgerResult<Account> {
        let mut inner = self.inner.write().unwrap();
        let now = chrono::Utc::now().naive_utc();
        let mut stored = account.clone();
        stored.updated_at = now;

        if stored.id == 0 {
            inner.next_account_id += 1;
            stored.id = inner.next_account_id;
            stored.created_at = now;
        } else if !inner.accounts.contains_key(&stored.id) {
            return Err(LedgerError::AccountNotFound(stored.account_number.clone()));
        }

        inner.accounts.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn save_transaction(&mut self, transaction: &Transaction) -> LedgerResult<Transaction> {
        let mut inner = self.inner.write().unwrap();
        if inner
            .transactions
            .values()
            .any(|t| t.transaction_id == transaction.transaction_id)
        {
            return Err(LedgerError::Storage(format!(
                "duplicate transaction id: {}",
                transaction.transaction_id
            )));
        }

        let now = chrono::Utc::now().naive_utc();
        let mut stored = transaction.clone();
        inner.next_transaction_id += 1;
        stored.id = inner.next_transaction_id;
        stored.created_at = now;
        stored.updated_at = now;

        inner.transactions.insert(stored.id, stored.clone());
        Ok(stored)
    }
}
