//! Storage layer for the transaction tracker. Provides:
//! - The owned transaction list and its CRUD operations ([`TransactionStore`])
//! - Key-value persistence collaborators ([`KeyValueStorage`])
//!
//! Current implementation is synchronous: every mutation writes the whole
//! list through to storage before returning.

mod storage;
mod transactions;

pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use transactions::{TransactionStore, BACKUP_KEY, STORAGE_KEY};
