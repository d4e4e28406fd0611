use std::error::Error;
use std::fs::File;
use std::io::{BufRead, Write};

use chrono::Local;

use crate::{
    categories,
    config::Command,
    csv_utils::{export_transactions, import_transactions},
    dto::{format_money, Transaction, TransactionForm, TransactionKind, DATE_FORMAT},
    error::ValidationError,
    stores::{KeyValueStorage, TransactionStore},
    summary::Standing,
};

/// Runs a single command against the store and writes its output to `output`.
///
/// # Arguments
/// * `command` - The parsed command line
/// * `store` - The transaction store to read and mutate
/// * `input` - Where confirmation answers are read from (e.g. stdin)
/// * `output` - Where listings and messages go (e.g. stdout)
///
/// # Errors
/// Returns an error if:
/// * A request fails validation or names an unknown id
/// * Persisting the store fails
/// * Reading the import file or writing the output fails
pub fn run<S, R, W>(
    command: Command,
    store: &mut TransactionStore<S>,
    mut input: R,
    mut output: W,
) -> Result<(), Box<dyn Error>>
where
    S: KeyValueStorage,
    R: BufRead,
    W: Write,
{
    match command {
        Command::Add(fields) => {
            let mut form = TransactionForm::from(fields);
            form.date
                .get_or_insert_with(|| Local::now().date_naive().format(DATE_FORMAT).to_string());
            let created = store.add(form.parse()?)?;
            writeln!(output, "Added transaction {}", created.id)?;
        }
        Command::Edit { id, fields } => {
            let current = store.get(id).ok_or(crate::Error::NotFound(id))?;
            let form = TransactionForm::from(current).merged_with(fields.into());
            let updated = store.update(id, form.parse()?)?;
            writeln!(output, "Updated transaction {}", updated.id)?;
        }
        Command::Delete { id, yes } => {
            let Some(transaction) = store.get(id) else {
                return Err(crate::Error::NotFound(id).into());
            };
            if !yes {
                write!(
                    output,
                    "Delete \"{}\" ({})? [y/N] ",
                    transaction.description,
                    transaction.signed_amount()
                )?;
                output.flush()?;
                let mut answer = String::new();
                input.read_line(&mut answer)?;
                if !matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
                    writeln!(output, "Cancelled")?;
                    return Ok(());
                }
            }
            store.delete(id)?;
            writeln!(output, "Deleted transaction {id}")?;
        }
        Command::List { category } => {
            let transactions = store.list(category_filter(category.as_deref())?);
            write_table(&mut output, &transactions)?;
        }
        Command::Show { id } => {
            let transaction = store.get(id).ok_or(crate::Error::NotFound(id))?;
            write_table(&mut output, std::slice::from_ref(transaction))?;
        }
        Command::Summary => {
            let summary = store.summary();
            let standing = match summary.standing() {
                Standing::Surplus => "surplus",
                Standing::Deficit => "deficit",
            };
            writeln!(output, "Total income:  {}", format_money(summary.total_income))?;
            writeln!(output, "Total expense: {}", format_money(summary.total_expense))?;
            writeln!(
                output,
                "Net balance:   {} ({standing})",
                format_money(summary.net_balance)
            )?;
        }
        Command::Categories { kind } => {
            let kinds = match kind {
                Some(kind) => vec![kind.parse::<TransactionKind>()?],
                None => vec![TransactionKind::Income, TransactionKind::Expense],
            };
            for kind in kinds {
                writeln!(output, "{}: {}", kind.label(), categories::for_kind(kind).join(", "))?;
            }
        }
        Command::Export {
            category,
            output: path,
        } => {
            let filter = category_filter(category.as_deref())?;
            match path {
                Some(path) => {
                    let count = export_transactions(store, filter, File::create(&path)?)?;
                    writeln!(output, "Exported {count} transactions to {}", path.display())?;
                }
                None => {
                    export_transactions(store, filter, &mut output)?;
                }
            }
        }
        Command::Import { path } => {
            let count = import_transactions(store, File::open(&path)?)?;
            writeln!(output, "Imported {count} transactions")?;
        }
    }
    Ok(())
}

/// `all` selects every category; anything else must be a known category.
fn category_filter(category: Option<&str>) -> Result<Option<&str>, ValidationError> {
    match category {
        None => Ok(None),
        Some(c) if c.eq_ignore_ascii_case("all") => Ok(None),
        Some(c) if categories::is_known(c) => Ok(Some(c)),
        Some(c) => Err(ValidationError::UnknownCategory(c.to_string())),
    }
}

fn write_table<W: Write>(output: &mut W, transactions: &[Transaction]) -> std::io::Result<()> {
    if transactions.is_empty() {
        return writeln!(output, "No transactions");
    }
    writeln!(
        output,
        "{:>6}  {:<10}  {:<16}  {:<7}  {:>14}  Description",
        "ID", "Date", "Category", "Type", "Amount"
    )?;
    for t in transactions {
        writeln!(
            output,
            "{:>6}  {:<10}  {:<16}  {:<7}  {:>14}  {}",
            t.id,
            t.date.format(DATE_FORMAT).to_string(),
            t.category,
            t.kind.label(),
            t.signed_amount(),
            t.description
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TransactionArgs;
    use crate::stores::{FileStorage, MemoryStorage};
    use rust_decimal_macros::dec;
    use std::path::PathBuf;
    use tempfile::TempDir;

    type Result<T = ()> = std::result::Result<T, Box<dyn Error>>;

    fn args(kind: &str, category: &str, amount: &str, date: &str, desc: &str) -> TransactionArgs {
        TransactionArgs {
            kind: Some(kind.to_string()),
            category: Some(category.to_string()),
            amount: Some(amount.to_string()),
            date: Some(date.to_string()),
            description: Some(desc.to_string()),
        }
    }

    fn exec<S: KeyValueStorage>(store: &mut TransactionStore<S>, command: Command) -> Result<String> {
        exec_with_input(store, command, "")
    }

    fn exec_with_input<S: KeyValueStorage>(
        store: &mut TransactionStore<S>,
        command: Command,
        input: &str,
    ) -> Result<String> {
        let mut output = Vec::new();
        run(command, store, input.as_bytes(), &mut output)?;
        Ok(String::from_utf8(output)?)
    }

    fn seeded() -> Result<TransactionStore<MemoryStorage>> {
        let mut store = TransactionStore::open(MemoryStorage::new());
        exec(
            &mut store,
            Command::Add(args("income", "Salary", "1000", "2024-01-01", "January pay")),
        )?;
        exec(
            &mut store,
            Command::Add(args("expense", "Food", "200", "2024-01-02", "Groceries")),
        )?;
        Ok(store)
    }

    #[test]
    fn test_add_then_list() -> Result {
        let mut store = seeded()?;

        let listed = exec(&mut store, Command::List { category: None })?;

        let expected = "    ID  Date        Category          Type             Amount  Description
     2  2024-01-02  Food              Expense        -$200.00  Groceries
     1  2024-01-01  Salary            Income        +$1000.00  January pay
";
        assert_eq!(listed, expected);
        Ok(())
    }

    #[test]
    fn test_list_with_category_filter() -> Result {
        let mut store = seeded()?;

        let food = exec(
            &mut store,
            Command::List {
                category: Some("Food".to_string()),
            },
        )?;
        assert_eq!(food.lines().count(), 2);
        assert!(food.contains("Groceries"));

        let all = exec(
            &mut store,
            Command::List {
                category: Some("all".to_string()),
            },
        )?;
        assert_eq!(all.lines().count(), 3);

        let none = exec(
            &mut store,
            Command::List {
                category: Some("Gifts".to_string()),
            },
        )?;
        assert_eq!(none, "No transactions\n");
        Ok(())
    }

    #[test]
    fn test_unknown_filter_category_is_rejected() -> Result {
        let mut store = seeded()?;

        let listed = exec(
            &mut store,
            Command::List {
                category: Some("Groceries".to_string()),
            },
        );
        assert_eq!(
            listed.unwrap_err().to_string(),
            "\"Groceries\" is not a known category"
        );

        let exported = exec(
            &mut store,
            Command::Export {
                category: Some("food".to_string()),
                output: None,
            },
        );
        assert!(exported.is_err());
        Ok(())
    }

    #[test]
    fn test_summary_output() -> Result {
        let mut store = seeded()?;

        let summary = exec(&mut store, Command::Summary)?;

        assert_eq!(
            summary,
            "Total income:  $1000.00\nTotal expense: $200.00\nNet balance:   $800.00 (surplus)\n"
        );
        Ok(())
    }

    #[test]
    fn test_add_defaults_date_to_today() -> Result {
        let mut store = TransactionStore::open(MemoryStorage::new());
        let mut fields = args("expense", "Rent", "900", "", "Rent");
        fields.date = None;

        exec(&mut store, Command::Add(fields))?;

        assert_eq!(store.get(1).unwrap().date, Local::now().date_naive());
        Ok(())
    }

    #[test]
    fn test_add_invalid_amount_is_an_error() -> Result {
        let mut store = TransactionStore::open(MemoryStorage::new());

        let result = exec(
            &mut store,
            Command::Add(args("income", "Salary", "0", "2024-01-01", "Nothing")),
        );

        assert_eq!(result.unwrap_err().to_string(), "amount must be greater than 0");
        assert!(store.is_empty());
        Ok(())
    }

    #[test]
    fn test_edit_keeps_omitted_fields() -> Result {
        let mut store = seeded()?;

        exec(
            &mut store,
            Command::Edit {
                id: 2,
                fields: TransactionArgs {
                    amount: Some("250.75".to_string()),
                    ..Default::default()
                },
            },
        )?;

        let edited = store.get(2).unwrap();
        assert_eq!(edited.amount, dec!(250.75));
        assert_eq!(edited.category, "Food");
        assert_eq!(edited.description, "Groceries");
        assert_eq!(store.summary().net_balance, dec!(749.25));
        Ok(())
    }

    #[test]
    fn test_edit_unknown_id() -> Result {
        let mut store = seeded()?;

        let result = exec(
            &mut store,
            Command::Edit {
                id: 42,
                fields: TransactionArgs::default(),
            },
        );

        assert_eq!(result.unwrap_err().to_string(), "no transaction with id 42");
        Ok(())
    }

    #[test]
    fn test_delete_asks_for_confirmation() -> Result {
        let mut store = seeded()?;

        let cancelled = exec_with_input(&mut store, Command::Delete { id: 1, yes: false }, "n\n")?;
        assert!(cancelled.ends_with("Cancelled\n"));
        assert_eq!(store.len(), 2);

        let confirmed = exec_with_input(&mut store, Command::Delete { id: 1, yes: false }, "y\n")?;
        assert!(confirmed.starts_with("Delete \"January pay\" (+$1000.00)? [y/N] "));
        assert_eq!(store.len(), 1);

        let forced = exec(&mut store, Command::Delete { id: 2, yes: true })?;
        assert_eq!(forced, "Deleted transaction 2\n");
        assert!(store.is_empty());
        Ok(())
    }

    #[test]
    fn test_categories_output() -> Result {
        let mut store = TransactionStore::open(MemoryStorage::new());

        let income = exec(
            &mut store,
            Command::Categories {
                kind: Some("income".to_string()),
            },
        )?;

        assert_eq!(
            income,
            "Income: Salary, Freelance, Investments, Gifts, Other Income\n"
        );
        Ok(())
    }

    #[test]
    fn test_export_and_import_files() -> Result {
        let dir = TempDir::new()?;
        let export_path = dir.path().join("out.csv");
        let mut store = seeded()?;

        exec(
            &mut store,
            Command::Export {
                category: None,
                output: Some(export_path.clone()),
            },
        )?;
        let exported = std::fs::read_to_string(&export_path)?;
        assert!(exported.starts_with("id,type,category,amount,date,description\n"));

        let import_path = dir.path().join("in.csv");
        std::fs::write(
            &import_path,
            "type,category,amount,date,description\nincome,Gifts,50,2024-03-01,Birthday\n",
        )?;
        let message = exec(&mut store, Command::Import { path: import_path })?;
        assert_eq!(message, "Imported 1 transactions\n");
        assert_eq!(store.summary().total_income, dec!(1050));
        Ok(())
    }

    #[test]
    fn test_changes_persist_to_data_dir() -> Result {
        let dir = TempDir::new()?;
        let data_dir: PathBuf = dir.path().join("tally");

        let mut store = TransactionStore::open(FileStorage::new(&data_dir));
        exec(
            &mut store,
            Command::Add(args("income", "Investments", "12.34", "2024-05-05", "Dividend")),
        )?;
        drop(store);

        let mut reopened = TransactionStore::open(FileStorage::new(&data_dir));
        let listed = exec(&mut reopened, Command::Show { id: 1 })?;
        assert!(listed.contains("+$12.34"));
        assert!(listed.contains("Dividend"));
        Ok(())
    }
}
