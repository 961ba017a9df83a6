//! Ledger module containing account lifecycle and transaction processing

pub mod account;
pub mod core;
pub mod transaction;

pub use account::*;
pub use core::*;
pub use transaction::*;
