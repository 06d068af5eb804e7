// 📊 Summary View - total spent and per-category subtotals

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::entities::{Category, Expense};
use crate::error::StoreError;
use crate::list_view::Loaded;
use crate::store::{fetch_records, ExpenseCollection};

pub const NO_SUMMARY_DATA: &str = "No data to show yet. Add some expenses first!";

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total: Decimal,
    pub record_count: usize,
    /// Only categories present in the data, ordered by category name
    pub by_category: Vec<(Category, Decimal)>,
}

impl Summary {
    /// Aggregate a snapshot. `None` for an empty snapshot: there is nothing to chart.
    pub fn compute(expenses: &[Expense]) -> Option<Self> {
        if expenses.is_empty() {
            return None;
        }

        let total = total_spent(expenses);

        // Keyed by name so the order matches a plain group-by on the column
        let mut groups: BTreeMap<&'static str, (Category, Decimal)> = BTreeMap::new();
        for expense in expenses {
            let entry = groups
                .entry(expense.category.as_str())
                .or_insert((expense.category, Decimal::ZERO));
            entry.1 += expense.amount;
        }

        Some(Self {
            total,
            record_count: expenses.len(),
            by_category: groups.into_values().collect(),
        })
    }

    pub fn subtotal(&self, category: Category) -> Option<Decimal> {
        self.by_category
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, amount)| *amount)
    }
}

/// Sum of all amounts; 0 for no records
pub fn total_spent(expenses: &[Expense]) -> Decimal {
    expenses.iter().map(|e| e.amount).sum()
}

/// Fetch and aggregate
pub fn load_summary(collection: &dyn ExpenseCollection) -> Result<Loaded<Summary>, StoreError> {
    let expenses = fetch_records(collection)?;
    Ok(match Summary::compute(&expenses) {
        Some(summary) => Loaded::Ready(summary),
        None => Loaded::Empty,
    })
}
