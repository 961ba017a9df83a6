//! Request-field validation helpers

use crate::types::{LedgerError, LedgerResult};

/// Fixed width of an account number
pub const ACCOUNT_NUMBER_LEN: usize = 10;

/// Validate that an account number is exactly 10 ASCII digits
pub fn validate_account_number(account_number: &str) -> LedgerResult<()> {
    if account_number.len() != ACCOUNT_NUMBER_LEN
        || !account_number.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(LedgerError::InvalidRequest(format!(
            "account number must be exactly {ACCOUNT_NUMBER_LEN} digits"
        )));
    }
    Ok(())
}

/// Validate that a transaction amount is a positive integer
pub fn validate_positive_amount(amount: i64) -> LedgerResult<()> {
    if amount < 1 {
        return Err(LedgerError::InvalidRequest(
            "amount must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Validate that an opening balance is not negative
pub fn validate_initial_balance(balance: i64) -> LedgerResult<()> {
    if balance < 0 {
        return Err(LedgerError::InvalidRequest(
            "initial balance must not be negative".to_string(),
        ));
    }
    Ok(())
}
