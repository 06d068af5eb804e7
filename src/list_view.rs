// 📋 List View - the whole collection as a table, plus spreadsheet export

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::entities::Expense;
use crate::error::StoreError;
use crate::store::{fetch_records, ExpenseCollection};

/// Default export target, overwritten on every export
pub const EXPORT_FILE: &str = "expenses.csv";

/// Column labels, in field order. Shared by the rendered table and the export.
pub const HEADERS: [&str; 4] = ["Category", "Amount (₹)", "Description", "Date"];

pub const NO_EXPENSES: &str = "No expenses found. Use the 'Add Expense' tab to start tracking.";

/// Outcome of loading a view: either the "no data" signal or something to render
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded<T> {
    Empty,
    Ready(T),
}

impl<T> Loaded<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Loaded::Empty)
    }
}

/// Row-per-record table in store order
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseTable {
    pub rows: Vec<Expense>,
}

impl ExpenseTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Display cells for one row, in column order
    pub fn cells(expense: &Expense) -> [String; 4] {
        [
            expense.category.to_string(),
            format!("{:.2}", expense.amount),
            expense.description.clone(),
            expense.iso_date(),
        ]
    }

    /// Write the table as rendered to CSV, replacing `path` if it exists.
    /// Returns rows written.
    pub fn export(&self, path: &Path) -> Result<usize> {
        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        wtr.write_record(HEADERS)
            .context("Failed to write header")?;
        for expense in &self.rows {
            wtr.write_record(Self::cells(expense))
                .context("Failed to write expense row")?;
        }
        wtr.flush().context("Failed to flush export")?;

        info!(rows = self.rows.len(), path = %path.display(), "expenses exported");
        Ok(self.rows.len())
    }
}

/// Fetch the collection for display
pub fn load_table(collection: &dyn ExpenseCollection) -> Result<Loaded<ExpenseTable>, StoreError> {
    let rows = fetch_records(collection)?;
    if rows.is_empty() {
        return Ok(Loaded::Empty);
    }
    Ok(Loaded::Ready(ExpenseTable { rows }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Category;
    use crate::store::MemoryCollection;
    use chrono::NaiveDate;

    fn expense(category: Category, amount: &str, description: &str, day: u32) -> Expense {
        let date = NaiveDate::from_ymd_opt(2026, 4, day).unwrap();
        Expense::new(category, amount.parse().unwrap(), description, date).unwrap()
    }

    fn seeded() -> MemoryCollection {
        let collection = MemoryCollection::new();
        collection.append(&expense(Category::Food, "12.5", "Dosa", 3)).unwrap();
        collection.append(&expense(Category::Travel, "300", "Bus, return", 1)).unwrap();
        collection.append(&expense(Category::Bills, "0", "", 2)).unwrap();
        collection
    }

    #[test]
    fn test_empty_collection_signals_no_data() {
        let loaded = load_table(&MemoryCollection::new()).unwrap();
        assert_eq!(loaded, Loaded::Empty);
    }

    #[test]
    fn test_table_keeps_store_order() {
        let loaded = load_table(&seeded()).unwrap();
        let Loaded::Ready(table) = loaded else {
            panic!("expected rows");
        };

        assert_eq!(table.len(), 3);
        let days: Vec<u32> = table.rows.iter().map(|e| chrono::Datelike::day(&e.date)).collect();
        assert_eq!(days, vec![3, 1, 2], "No sorting is applied");
        assert_eq!(
            ExpenseTable::cells(&table.rows[0]),
            ["Food".to_string(), "12.50".to_string(), "Dosa".to_string(), "2026-04-03".to_string()]
        );
    }

    #[test]
    fn test_export_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE);
        let Loaded::Ready(table) = load_table(&seeded()).unwrap() else {
            panic!("expected rows");
        };

        let written = table.export(&path).unwrap();
        assert_eq!(written, 3);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 4, "Header plus one row per record");
        assert_eq!(lines[0], "Category,Amount (₹),Description,Date");
        assert_eq!(lines[1], "Food,12.50,Dosa,2026-04-03");
        assert_eq!(lines[2], "Travel,300.00,\"Bus, return\",2026-04-01");
        assert_eq!(lines[3], "Bills,0.00,,2026-04-02");
    }

    #[test]
    fn test_export_matches_rendered_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE);
        let table = ExpenseTable {
            rows: vec![expense(Category::Shopping, "1999.999", "Kurta", 5)],
        };
        table.export(&path).unwrap();

        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = rdr.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, HEADERS);

        let row: Vec<String> = rdr
            .records()
            .next()
            .unwrap()
            .unwrap()
            .iter()
            .map(String::from)
            .collect();
        assert_eq!(row, ExpenseTable::cells(&table.rows[0]));
        assert_eq!(row[1], "2000.00");
    }

    #[test]
    fn test_export_of_empty_table_is_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE);

        assert_eq!(ExpenseTable { rows: Vec::new() }.export(&path).unwrap(), 0);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().collect::<Vec<_>>(), vec!["Category,Amount (₹),Description,Date"]);
    }

    #[test]
    fn test_export_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE);
        std::fs::write(&path, "stale\nstale\nstale\nstale\nstale\nstale\n").unwrap();

        let table = ExpenseTable {
            rows: vec![expense(Category::Others, "5", "gift", 9)],
        };
        table.export(&path).unwrap();
        table.export(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2, "Second export replaces, never appends");
        assert!(!content.contains("stale"));
    }

    #[test]
    fn test_export_to_missing_directory_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join(EXPORT_FILE);
        let table = ExpenseTable {
            rows: vec![expense(Category::Food, "1", "", 1)],
        };

        assert!(table.export(&path).is_err());
    }
}
