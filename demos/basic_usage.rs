//! Basic account ledger usage example

use account_core::utils::MemoryStore;
use account_core::{Ledger, LedgerError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Account Core - Basic Usage Example\n");

    // Create a ledger over in-memory storage and seed a user
    let storage = MemoryStore::new();
    let user = storage.add_user("Pobi");
    let mut ledger = Ledger::new(storage);

    // 1. Open two accounts
    let checking = ledger.open_account(user.id, 50_000).await?;
    let savings = ledger.open_account(user.id, 0).await?;
    println!("  opened {} with balance {}", checking.account_number, checking.balance);
    println!("  opened {} with balance {}", savings.account_number, savings.balance);

    // 2. Use some balance
    let payment = ledger
        .use_balance(user.id, &checking.account_number, 12_500)
        .await?;
    println!(
        "  used {} from {}, balance now {} (transaction {})",
        payment.amount, payment.account_number, payment.balance_snapshot, payment.transaction_id
    );

    // 3. An overdraft attempt is rejected and recorded for the audit trail
    match ledger
        .use_balance(user.id, &checking.account_number, 1_000_000)
        .await
    {
        Err(err @ LedgerError::AmountExceedsBalance) => {
            println!("  rejected: {} ({})", err, err.code());
            ledger
                .record_failed_use(&checking.account_number, 1_000_000)
                .await?;
        }
        other => panic!("expected overdraft rejection, got {other:?}"),
    }

    // 4. Cancel the payment in full
    let reversal = ledger
        .cancel_balance(&payment.transaction_id, &checking.account_number, 12_500)
        .await?;
    println!(
        "  cancelled {} back to {}, balance now {}",
        reversal.amount, reversal.account_number, reversal.balance_snapshot
    );

    // 5. Query a transaction by its external id
    let fetched = ledger.get_transaction(&payment.transaction_id).await?;
    println!(
        "  looked up {}: {:?}/{:?} amount {}",
        fetched.transaction_id,
        fetched.transaction_type,
        fetched.transaction_result,
        fetched.amount
    );

    // 6. List the user's accounts and close the empty one
    for account in ledger.list_accounts(user.id).await? {
        println!("  account {} balance {}", account.account_number, account.balance);
    }
    let closed = ledger.close_account(user.id, &savings.account_number).await?;
    println!(
        "  closed {} at {}",
        closed.account_number,
        closed.unregistered_at.expect("closing stamps the time")
    );

    Ok(())
}
