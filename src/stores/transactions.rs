//! The transaction list and its storage mirror.
//!
//! The store owns every [`Transaction`] and mirrors the full list into one
//! slot of a [`KeyValueStorage`] after each mutation:
//! - Requests are validated before anything changes
//! - A failed storage write rolls the in-memory change back
//! - Loading never fails: unreadable data yields an empty list, invalid
//!   records are skipped, and in both cases the raw blob is copied to
//!   [`BACKUP_KEY`] before the next write can replace it

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::categories;
use crate::dto::{Transaction, TransactionRequest};
use crate::stores::{KeyValueStorage, StorageError};
use crate::summary::{summarize, Summary};
use crate::Error;

/// The storage slot holding the serialized transaction list.
pub const STORAGE_KEY: &str = "transactions";
/// Holds the last stored blob that could not be loaded in full.
pub const BACKUP_KEY: &str = "transactions_backup";

pub struct TransactionStore<S> {
    /// Kept in insertion order; `list` sorts a copy.
    transactions: Vec<Transaction>,
    /// `None` once the id space is used up.
    next_id: Option<u64>,
    storage: S,
}

impl<S: KeyValueStorage> TransactionStore<S> {
    /// Creates a store over `storage` and loads whatever it already holds.
    pub fn open(storage: S) -> Self {
        let mut store = Self {
            transactions: Vec::new(),
            next_id: Some(1),
            storage,
        };
        store.load_from_storage();
        store
    }

    /// Tears the store down and returns its storage collaborator.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Replaces the in-memory list with the persisted one.
    ///
    /// An unreadable blob results in an empty store; records that do not
    /// deserialize or break an invariant are skipped one by one. Whenever
    /// anything is dropped the original blob is saved under [`BACKUP_KEY`].
    pub fn load_from_storage(&mut self) {
        let blob = match self.storage.get(STORAGE_KEY) {
            Ok(blob) => blob,
            Err(err) => {
                tracing::warn!("could not read stored transactions: {err}");
                None
            }
        };

        let mut dropped_data = false;
        self.transactions = match blob.as_deref().map(parse_records) {
            None => Vec::new(),
            Some(Ok((transactions, 0))) => transactions,
            Some(Ok((transactions, skipped))) => {
                tracing::warn!("skipped {skipped} invalid stored transactions");
                dropped_data = true;
                transactions
            }
            Some(Err(err)) => {
                tracing::warn!("discarding unreadable stored transactions: {err}");
                dropped_data = true;
                Vec::new()
            }
        };
        tracing::info!("loaded {} transactions", self.transactions.len());

        if let (true, Some(blob)) = (dropped_data, blob) {
            match self.storage.set(BACKUP_KEY, &blob) {
                Ok(()) => tracing::warn!("original stored transactions kept under \"{BACKUP_KEY}\""),
                Err(err) => tracing::warn!("could not back up stored transactions: {err}"),
            }
        }

        self.next_id = match self.transactions.iter().map(|t| t.id).max() {
            Some(id) => id.checked_add(1),
            None => Some(1),
        };
    }

    /// Writes the full list to storage.
    pub fn persist(&mut self) -> Result<(), StorageError> {
        let blob = serde_json::to_string(&self.transactions)?;
        self.storage.set(STORAGE_KEY, &blob)?;
        tracing::debug!("persisted {} transactions", self.transactions.len());
        Ok(())
    }

    /// Validates `request`, appends it under a fresh id and persists.
    pub fn add(&mut self, request: TransactionRequest) -> Result<Transaction, Error> {
        let request = request.validated()?;
        let id = self.next_id.ok_or(Error::IdsExhausted)?;
        let transaction = Transaction::from_request(id, request);
        self.transactions.push(transaction.clone());

        if let Err(err) = self.persist() {
            self.transactions.pop();
            return Err(err.into());
        }
        self.next_id = id.checked_add(1);
        tracing::debug!("added transaction {}", transaction.id);
        Ok(transaction)
    }

    /// Replaces every field of transaction `id` except the id itself.
    /// The record keeps its position in insertion order.
    pub fn update(&mut self, id: u64, request: TransactionRequest) -> Result<Transaction, Error> {
        let request = request.validated()?;
        let index = self.position(id).ok_or(Error::NotFound(id))?;
        let updated = Transaction::from_request(id, request);
        let previous = std::mem::replace(&mut self.transactions[index], updated.clone());

        if let Err(err) = self.persist() {
            self.transactions[index] = previous;
            return Err(err.into());
        }
        tracing::debug!("updated transaction {id}");
        Ok(updated)
    }

    /// Removes transaction `id`. Returns `false` when there was nothing to remove.
    pub fn delete(&mut self, id: u64) -> Result<bool, Error> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        let removed = self.transactions.remove(index);

        if let Err(err) = self.persist() {
            self.transactions.insert(index, removed);
            return Err(err.into());
        }
        tracing::debug!("deleted transaction {id}");
        Ok(true)
    }

    pub fn get(&self, id: u64) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// All transactions, or those in `filter_category`, newest date first.
    /// Transactions on the same date keep their insertion order.
    pub fn list(&self, filter_category: Option<&str>) -> Vec<Transaction> {
        let mut listed: Vec<Transaction> = self
            .transactions
            .iter()
            .filter(|t| filter_category.map_or(true, |category| t.category == category))
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.date.cmp(&a.date));
        listed
    }

    pub fn summary(&self) -> Summary {
        summarize(&self.transactions)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.transactions.iter().position(|t| t.id == id)
    }
}

/// Parses a stored blob record by record.
/// Returns the valid transactions and the number of records skipped.
fn parse_records(blob: &str) -> Result<(Vec<Transaction>, usize), serde_json::Error> {
    let records: Vec<serde_json::Value> = serde_json::from_str(blob)?;
    let mut transactions = Vec::with_capacity(records.len());
    let mut seen = HashSet::with_capacity(records.len());
    let mut skipped = 0;

    for record in records {
        let transaction = match serde_json::from_value::<Transaction>(record) {
            Ok(transaction) => transaction,
            Err(err) => {
                tracing::warn!("skipping unreadable stored transaction: {err}");
                skipped += 1;
                continue;
            }
        };
        let problem = if seen.contains(&transaction.id) {
            Some("duplicate id".to_string())
        } else if transaction.amount <= Decimal::ZERO {
            Some("amount is not positive".to_string())
        } else if !categories::is_valid(transaction.kind, &transaction.category) {
            Some(format!(
                "category \"{}\" is not a {} category",
                transaction.category, transaction.kind
            ))
        } else {
            None
        };
        match problem {
            Some(problem) => {
                tracing::warn!("skipping stored transaction {}: {problem}", transaction.id);
                skipped += 1;
            }
            None => {
                seen.insert(transaction.id);
                transactions.push(transaction);
            }
        }
    }
    Ok((transactions, skipped))
}
