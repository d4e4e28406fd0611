pub mod categories;
pub mod config;
mod csv_utils;
mod dto;
mod error;
mod runner;
mod stores;
mod summary;

pub use csv_utils::{export_transactions, import_transactions};
pub use dto::{
    format_money, Transaction, TransactionForm, TransactionKind, TransactionRequest, DATE_FORMAT,
    MAX_AMOUNT,
};
pub use error::{Error, ValidationError};
pub use runner::run;
pub use stores::{
    FileStorage, KeyValueStorage, MemoryStorage, StorageError, TransactionStore, BACKUP_KEY,
    STORAGE_KEY,
};
pub use summary::{summarize, Standing, Summary};
