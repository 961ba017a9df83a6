//! Integration tests for account-core

use account_core::utils::MemoryStore;
use account_core::{
    Account, Ledger, LedgerError, LedgerStore, Transaction, TransactionResult, TransactionType,
};
use chrono::{Duration, Months};

fn ledger_with_user(name: &str) -> (MemoryStore, Ledger<MemoryStore>, u64) {
    let storage = MemoryStore::new();
    let user = storage.add_user(name);
    let ledger = Ledger::new(storage.clone());
    (storage, ledger, user.id)
}

/// Plant a successful use record with an arbitrary execution time.
fn plant_use_transaction(
    storage: &MemoryStore,
    account: &Account,
    amount: i64,
    transacted_at: chrono::NaiveDateTime,
    external_id: &str,
) -> Transaction {
    storage.add_transaction(Transaction {
        id: 0,
        transaction_type: TransactionType::Use,
        transaction_result: TransactionResult::Success,
        account_id: account.id,
        account_number: account.account_number.clone(),
        amount,
        balance_snapshot: account.balance,
        transaction_id: external_id.to_string(),
        transacted_at,
        created_at: transacted_at,
        updated_at: transacted_at,
    })
}

#[tokio::test]
async fn complete_account_workflow() {
    let (_storage, mut ledger, user_id) = ledger_with_user("Pobi");

    // Open and fund
    let opened = ledger.open_account(user_id, 10_000).await.unwrap();
    assert_eq!(opened.account_number, "1000000000");
    assert!(opened.unregistered_at.is_none());

    // Use part of the balance
    let used = ledger
        .use_balance(user_id, &opened.account_number, 4_000)
        .await
        .unwrap();
    assert_eq!(used.transaction_type, TransactionType::Use);
    assert_eq!(used.transaction_result, TransactionResult::Success);
    assert_eq!(used.amount, 4_000);
    assert_eq!(used.balance_snapshot, 6_000);
    assert_eq!(used.transaction_id.len(), 32);

    // Cancel restores the pre-use balance exactly
    let cancelled = ledger
        .cancel_balance(&used.transaction_id, &opened.account_number, 4_000)
        .await
        .unwrap();
    assert_eq!(cancelled.transaction_type, TransactionType::Cancel);
    assert_eq!(cancelled.balance_snapshot, 10_000);
    assert_ne!(cancelled.transaction_id, used.transaction_id);

    // Drain and close
    ledger
        .use_balance(user_id, &opened.account_number, 10_000)
        .await
        .unwrap();
    let closed = ledger
        .close_account(user_id, &opened.account_number)
        .await
        .unwrap();
    assert!(closed.unregistered_at.is_some());

    // A closed account rejects further use
    let err = ledger
        .use_balance(user_id, &opened.account_number, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AccountAlreadyUnregistered));
}

#[tokio::test]
async fn first_account_gets_default_number() {
    let (_storage, mut ledger, user_id) = ledger_with_user("Pobi");
    let opened = ledger.open_account(user_id, 0).await.unwrap();
    assert_eq!(opened.account_number, "1000000000");
}

#[tokio::test]
async fn account_numbers_follow_the_highest_existing() {
    let (mut storage, mut ledger, user_id) = ledger_with_user("Pobi");

    let now = chrono::Utc::now().naive_utc();
    storage
        .save_account(&Account::new(user_id, "1000000012".to_string(), 0, now))
        .await
        .unwrap();

    let opened = ledger.open_account(user_id, 0).await.unwrap();
    assert_eq!(opened.account_number, "1000000013");
}

#[tokio::test]
async fn eleventh_account_is_rejected() {
    let (_storage, mut ledger, user_id) = ledger_with_user("Pobi");

    for _ in 0..10 {
        ledger.open_account(user_id, 0).await.unwrap();
    }
    let err = ledger.open_account(user_id, 0).await.unwrap_err();
    assert!(matches!(err, LedgerError::MaxAccountsExceeded));

    let accounts = ledger.list_accounts(user_id).await.unwrap();
    assert_eq!(accounts.len(), 10);
}

#[tokio::test]
async fn number_space_exhaustion_fails_account_creation() {
    let (mut storage, mut ledger, user_id) = ledger_with_user("Pobi");

    let now = chrono::Utc::now().naive_utc();
    storage
        .save_account(&Account::new(user_id, "9999999999".to_string(), 0, now))
        .await
        .unwrap();

    let err = ledger.open_account(user_id, 0).await.unwrap_err();
    assert!(matches!(err, LedgerError::AccountNumberExhausted));
}

#[tokio::test]
async fn listing_preserves_store_order() {
    let (_storage, mut ledger, user_id) = ledger_with_user("Pobi");

    for balance in [1_000, 2_000, 3_000] {
        ledger.open_account(user_id, balance).await.unwrap();
    }

    let accounts = ledger.list_accounts(user_id).await.unwrap();
    let numbers: Vec<&str> = accounts
        .iter()
        .map(|a| a.account_number.as_str())
        .collect();
    assert_eq!(numbers, ["1000000000", "1000000001", "1000000002"]);
    let balances: Vec<i64> = accounts.iter().map(|a| a.balance).collect();
    assert_eq!(balances, [1_000, 2_000, 3_000]);
}

#[tokio::test]
async fn unknown_user_is_rejected_everywhere() {
    let storage = MemoryStore::new();
    let mut ledger = Ledger::new(storage);

    assert!(matches!(
        ledger.open_account(99, 0).await.unwrap_err(),
        LedgerError::UserNotFound(99)
    ));
    assert!(matches!(
        ledger.list_accounts(99).await.unwrap_err(),
        LedgerError::UserNotFound(99)
    ));
    assert!(matches!(
        ledger.close_account(99, "1000000000").await.unwrap_err(),
        LedgerError::UserNotFound(99)
    ));
    assert!(matches!(
        ledger.use_balance(99, "1000000000", 1).await.unwrap_err(),
        LedgerError::UserNotFound(99)
    ));
}

#[tokio::test]
async fn use_rejects_foreign_account() {
    let storage = MemoryStore::new();
    let owner = storage.add_user("Pobi");
    let intruder = storage.add_user("Dobi");
    let mut ledger = Ledger::new(storage);

    let opened = ledger.open_account(owner.id, 1_000).await.unwrap();
    let err = ledger
        .use_balance(intruder.id, &opened.account_number, 100)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::UserAccountMismatch));

    let err = ledger
        .close_account(intruder.id, &opened.account_number)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::UserAccountMismatch));
}

#[tokio::test]
async fn overdraft_is_rejected_and_failure_recordable() {
    let (storage, mut ledger, user_id) = ledger_with_user("Pobi");

    let opened = ledger.open_account(user_id, 100).await.unwrap();
    let err = ledger
        .use_balance(user_id, &opened.account_number, 101)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AmountExceedsBalance));

    // The caller records the rejected attempt for the audit trail
    ledger
        .record_failed_use(&opened.account_number, 101)
        .await
        .unwrap();

    let account = storage
        .find_account_by_number(&opened.account_number)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.balance, 100);

    let trail = storage.transactions_for_account(account.id);
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].transaction_type, TransactionType::Use);
    assert_eq!(trail[0].transaction_result, TransactionResult::Fail);
    assert_eq!(trail[0].amount, 101);
    assert_eq!(trail[0].balance_snapshot, 100);
}

#[tokio::test]
async fn failed_cancel_is_recordable() {
    let (storage, mut ledger, user_id) = ledger_with_user("Pobi");

    let opened = ledger.open_account(user_id, 100).await.unwrap();
    ledger
        .record_failed_cancel(&opened.account_number, 500)
        .await
        .unwrap();

    let account = storage
        .find_account_by_number(&opened.account_number)
        .await
        .unwrap()
        .unwrap();
    let trail = storage.transactions_for_account(account.id);
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].transaction_type, TransactionType::Cancel);
    assert_eq!(trail[0].transaction_result, TransactionResult::Fail);
    assert_eq!(trail[0].balance_snapshot, 100);
}

#[tokio::test]
async fn partial_cancel_is_rejected() {
    let (_storage, mut ledger, user_id) = ledger_with_user("Pobi");

    let opened = ledger.open_account(user_id, 1_000).await.unwrap();
    let used = ledger
        .use_balance(user_id, &opened.account_number, 400)
        .await
        .unwrap();

    for wrong_amount in [399, 401, 1] {
        let err = ledger
            .cancel_balance(&used.transaction_id, &opened.account_number, wrong_amount)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::CancelMustBeFull));
    }

    // The full amount still cancels
    let cancelled = ledger
        .cancel_balance(&used.transaction_id, &opened.account_number, 400)
        .await
        .unwrap();
    assert_eq!(cancelled.balance_snapshot, 1_000);
}

#[tokio::test]
async fn cancel_rejects_mismatched_account() {
    let (_storage, mut ledger, user_id) = ledger_with_user("Pobi");

    let first = ledger.open_account(user_id, 1_000).await.unwrap();
    let second = ledger.open_account(user_id, 1_000).await.unwrap();
    let used = ledger
        .use_balance(user_id, &first.account_number, 300)
        .await
        .unwrap();

    let err = ledger
        .cancel_balance(&used.transaction_id, &second.account_number, 300)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::TransactionAccountMismatch));
}

#[tokio::test]
async fn cancel_window_is_one_year() {
    let (storage, mut ledger, user_id) = ledger_with_user("Pobi");

    let opened = ledger.open_account(user_id, 1_000).await.unwrap();
    let account = storage
        .find_account_by_number(&opened.account_number)
        .await
        .unwrap()
        .unwrap();
    let now = chrono::Utc::now().naive_utc();

    // Strictly more than a year ago: rejected
    let stale = plant_use_transaction(
        &storage,
        &account,
        250,
        now - Months::new(12) - Duration::minutes(1),
        "00000000000000000000000000000001",
    );
    let err = ledger
        .cancel_balance(&stale.transaction_id, &opened.account_number, 250)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::TransactionTooOldToCancel));

    // Just inside the window: cancels
    let fresh = plant_use_transaction(
        &storage,
        &account,
        250,
        now - Months::new(12) + Duration::minutes(1),
        "00000000000000000000000000000002",
    );
    let cancelled = ledger
        .cancel_balance(&fresh.transaction_id, &opened.account_number, 250)
        .await
        .unwrap();
    assert_eq!(cancelled.transaction_result, TransactionResult::Success);
    assert_eq!(cancelled.balance_snapshot, 1_250);
}

#[tokio::test]
async fn get_transaction_returns_stored_fields_verbatim() {
    let (_storage, mut ledger, user_id) = ledger_with_user("Pobi");

    let err = ledger.get_transaction("deadbeef").await.unwrap_err();
    assert!(matches!(err, LedgerError::TransactionNotFound(_)));

    let opened = ledger.open_account(user_id, 5_000).await.unwrap();
    let used = ledger
        .use_balance(user_id, &opened.account_number, 1_234)
        .await
        .unwrap();

    let fetched = ledger.get_transaction(&used.transaction_id).await.unwrap();
    assert_eq!(fetched, used);
}

#[tokio::test]
async fn invalid_request_fields_are_rejected() {
    let (_storage, mut ledger, user_id) = ledger_with_user("Pobi");
    let opened = ledger.open_account(user_id, 1_000).await.unwrap();

    // Zero and negative amounts
    for bad_amount in [0, -10] {
        let err = ledger
            .use_balance(user_id, &opened.account_number, bad_amount)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidRequest(_)));
    }

    // Malformed account numbers
    for bad_number in ["123", "12345678901", "10000000ab"] {
        let err = ledger.use_balance(user_id, bad_number, 10).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidRequest(_)));
    }

    // Negative opening balance
    let err = ledger.open_account(user_id, -1).await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidRequest(_)));
}

#[tokio::test]
async fn concurrent_debits_never_drive_balance_negative() {
    let (storage, mut ledger, user_id) = ledger_with_user("Pobi");
    let opened = ledger.open_account(user_id, 100).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let storage = storage.clone();
        let account_number = opened.account_number.clone();
        handles.push(tokio::spawn(async move {
            let mut engine = account_core::TransactionManager::new(storage);
            // Most of these must fail; none may overdraw
            let _ = engine.use_balance(user_id, &account_number, 60).await;
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let account = storage
        .find_account_by_number(&opened.account_number)
        .await
        .unwrap()
        .unwrap();
    assert!(account.balance >= 0);
}

#[tokio::test]
async fn transaction_record_serializes_for_the_boundary_layer() {
    let (_storage, mut ledger, user_id) = ledger_with_user("Pobi");

    let opened = ledger.open_account(user_id, 1_000).await.unwrap();
    let used = ledger
        .use_balance(user_id, &opened.account_number, 10)
        .await
        .unwrap();

    let json = serde_json::to_value(&used).unwrap();
    assert_eq!(json["account_number"], opened.account_number);
    assert_eq!(json["transaction_type"], "USE");
    assert_eq!(json["transaction_result"], "SUCCESS");
    assert_eq!(json["amount"], 10);
    assert_eq!(json["balance_snapshot"], 990);
}
