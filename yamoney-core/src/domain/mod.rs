//! Core domain entities
//!
//! Account snapshots and operations are opaque provider payloads with
//! read-only accessors - no I/O or external dependencies.

mod account;
mod credential;
mod transaction;
pub mod result;

pub use account::{currency_code, AccountSnapshot};
pub use credential::Credential;
pub use transaction::TransactionRecord;
