//! CSV serialization and deserialization utilities.
//!
//! Provides generic functions for reading and writing CSV data, plus the
//! export/import of a transaction store built on them.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::{Read, Write};

use crate::dto::{Transaction, TransactionForm};
use crate::stores::{KeyValueStorage, TransactionStore};
use crate::Error;

/// Creates an iterator that reads CSV records from a reader.
/// Each record is deserialized into type T.
pub fn read_csv<T, R>(reader: R) -> impl Iterator<Item = csv::Result<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .into_deserialize()
}

/// Writes an iterator of records to a CSV writer.
/// Each record must implement Serialize.
pub fn write_csv<T, W>(writer: W, records: impl Iterator<Item = T>) -> csv::Result<()>
where
    T: Serialize,
    W: Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes the listed transactions, in list order, as CSV.
pub fn export_transactions<S, W>(
    store: &TransactionStore<S>,
    filter_category: Option<&str>,
    writer: W,
) -> Result<usize, Error>
where
    S: KeyValueStorage,
    W: Write,
{
    let transactions: Vec<Transaction> = store.list(filter_category);
    let count = transactions.len();
    write_csv(writer, transactions.into_iter())?;
    Ok(count)
}

/// Adds every row of a `type,category,amount,date,description` CSV to the store.
///
/// Stops at the first row that cannot be parsed or added; rows before it stay
/// in the store. Row numbers in errors are 1-based and exclude the header.
pub fn import_transactions<S, R>(store: &mut TransactionStore<S>, reader: R) -> Result<usize, Error>
where
    S: KeyValueStorage,
    R: Read,
{
    let mut imported = 0;
    for (index, record) in read_csv::<TransactionForm, _>(reader).enumerate() {
        let row = index + 1;
        let added = record
            .map_err(Error::from)
            .and_then(|form| Ok(form.parse()?))
            .and_then(|request| store.add(request));
        if let Err(err) = added {
            return Err(Error::ImportRow {
                row,
                source: Box::new(err),
            });
        }
        imported += 1;
    }
    tracing::info!("imported {imported} transactions");
    Ok(imported)
}
