//! Account lifecycle management

use tracing::info;

use crate::traits::LedgerStore;
use crate::types::*;
use crate::utils::validation::{validate_account_number, validate_initial_balance};

/// Maximum number of accounts a single user may own, open or closed
pub const MAX_ACCOUNTS_PER_USER: usize = 10;

/// Account number issued when no accounts exist yet
pub const FIRST_ACCOUNT_NUMBER: &str = "1000000000";

/// Largest value the fixed-width 10-digit account number can hold
const MAX_ACCOUNT_NUMBER: u64 = 9_999_999_999;

/// Account manager handling open, close and listing operations
pub struct AccountManager<S: LedgerStore> {
    storage: S,
}

impl<S: LedgerStore> AccountManager<S> {
    /// Create a new account manager
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Open a new account for a user
    ///
    /// The new account receives the next free number: one greater than the
    /// numerically highest number in the system, or
    /// [`FIRST_ACCOUNT_NUMBER`] when no accounts exist yet.
    pub async fn open_account(
        &mut self,
        user_id: u64,
        initial_balance: i64,
    ) -> LedgerResult<AccountSummary> {
        let user = self.get_user_required(user_id).await?;

        let owned = self.storage.count_accounts_for_user(user.id).await?;
        if owned >= MAX_ACCOUNTS_PER_USER {
            return Err(LedgerError::MaxAccountsExceeded);
        }

        validate_initial_balance(initial_balance)?;

        let account_number = match self.storage.find_highest_account_number().await? {
            Some(highest) => next_account_number(&highest)?,
            None => FIRST_ACCOUNT_NUMBER.to_string(),
        };

        let now = chrono::Utc::now().naive_utc();
        let account = Account::new(user.id, account_number, initial_balance, now);
        let stored = self.storage.save_account(&account).await?;

        info!(
            user_id = stored.user_id,
            account_number = %stored.account_number,
            "account opened"
        );
        Ok(AccountSummary::from(&stored))
    }

    /// Close an account
    ///
    /// The account must belong to the user, still be active, and hold a
    /// zero balance; funds must be used or transferred out before closing.
    pub async fn close_account(
        &mut self,
        user_id: u64,
        account_number: &str,
    ) -> LedgerResult<AccountSummary> {
        validate_account_number(account_number)?;
        let user = self.get_user_required(user_id).await?;
        let mut account = self.get_account_required(account_number).await?;

        if account.user_id != user.id {
            return Err(LedgerError::UserAccountMismatch);
        }
        if account.status == AccountStatus::Closed {
            return Err(LedgerError::AccountAlreadyClosed);
        }
        if account.balance != 0 {
            return Err(LedgerError::BalanceNotEmpty);
        }

        account.close(chrono::Utc::now().naive_utc())?;
        let stored = self.storage.save_account(&account).await?;

        info!(
            user_id = stored.user_id,
            account_number = %stored.account_number,
            "account closed"
        );
        Ok(AccountSummary::from(&stored))
    }

    /// List every account a user owns, in the store's insertion order
    pub async fn list_accounts(&self, user_id: u64) -> LedgerResult<Vec<AccountSummary>> {
        let user = self.get_user_required(user_id).await?;
        let accounts = self.storage.find_accounts_for_user(user.id).await?;
        Ok(accounts.iter().map(AccountSummary::from).collect())
    }

    /// Resolve a user by id, returning an error if not found
    async fn get_user_required(&self, user_id: u64) -> LedgerResult<User> {
        self.storage
            .find_user_by_id(user_id)
            .await?
            .ok_or(LedgerError::UserNotFound(user_id))
    }

    /// Resolve an account by number, returning an error if not found
    async fn get_account_required(&self, account_number: &str) -> LedgerResult<Account> {
        self.storage
            .find_account_by_number(account_number)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(account_number.to_string()))
    }
}

/// Compute the number following the given one, zero-padded to 10 digits
///
/// The number is parsed and incremented numerically; naive string handling
/// would turn `"0999999999"` into `"09999999991"` rather than
/// `"1000000000"`.
fn next_account_number(highest: &str) -> LedgerResult<String> {
    let parsed: u64 = highest.parse().map_err(|_| {
        LedgerError::Storage(format!("malformed account number in store: {highest}"))
    })?;
    if parsed >= MAX_ACCOUNT_NUMBER {
        return Err(LedgerError::AccountNumberExhausted);
    }
    Ok(format!("{:010}", parsed + 1))
}
