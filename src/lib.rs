//! # Account Core
//!
//! A banking-account ledger core providing account lifecycle management,
//! validated balance transactions, and an auditable transaction trail.
//!
//! ## Features
//!
//! - **Account lifecycle**: open and close accounts with a per-user limit
//!   and sequential 10-digit account numbering
//! - **Balance transactions**: validated use (debit) and cancel
//!   (full-reversal credit) operations that can never drive a balance
//!   negative
//! - **Audit trail**: rejected attempts can be captured as immutable
//!   `FAIL`-result records alongside successful ones
//! - **Queries**: transaction lookup by external id, account listing per
//!   user
//! - **Storage abstraction**: database-agnostic design with a trait-based
//!   store
//!
//! ## Quick Start
//!
//! ```rust
//! use account_core::utils::MemoryStore;
//! use account_core::Ledger;
//!
//! # async fn demo() -> account_core::LedgerResult<()> {
//! let storage = MemoryStore::new();
//! let user = storage.add_user("Pobi");
//! let mut ledger = Ledger::new(storage);
//!
//! let account = ledger.open_account(user.id, 10_000).await?;
//! let record = ledger
//!     .use_balance(user.id, &account.account_number, 1_000)
//!     .await?;
//! ledger
//!     .cancel_balance(&record.transaction_id, &account.account_number, 1_000)
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod ledger;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use ledger::*;
pub use traits::*;
pub use types::*;
