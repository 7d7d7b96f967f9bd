//! Service layer - business logic orchestration
//!
//! Services coordinate the provider port with the rest of the application.

pub mod logging;
mod sync;

pub use logging::{init_tracing, BodyRedaction, LogRedaction};
pub use sync::{SyncResult, SyncService, TransactionStats};
