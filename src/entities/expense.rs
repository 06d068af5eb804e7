// 💸 Expense Record - one logged expense
//
// Records are written once and never mutated. The store assigns each one an
// opaque identifier which is carried alongside but never used for logic.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::Category;
use crate::error::RecordError;

/// Opaque identifier assigned by the store on append
pub type RecordId = String;

/// One expense as stored in the `expenses` collection.
///
/// Serializes to `{"category":"Food","amount":12.5,"description":"","date":"2026-10-19"}`.
/// Deserialization goes through [`ExpenseDocument`] so malformed documents
/// are rejected at the boundary instead of leaking into the views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ExpenseDocument")]
pub struct Expense {
    pub category: Category,
    pub amount: Decimal,
    pub description: String,
    pub date: NaiveDate,
}

impl Expense {
    pub fn new(
        category: Category,
        amount: Decimal,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Result<Self, RecordError> {
        Ok(Self {
            category,
            amount: check_amount(amount)?,
            description: description.into(),
            date,
        })
    }

    /// ISO-8601 form of the date, exactly as it is stored
    pub fn iso_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

fn check_amount(amount: Decimal) -> Result<Decimal, RecordError> {
    if amount < Decimal::ZERO {
        return Err(RecordError::InvalidAmount(amount));
    }
    Ok(amount)
}

/// Loose wire shape of a stored document
#[derive(Debug, Deserialize)]
struct ExpenseDocument {
    category: String,
    amount: Decimal,
    #[serde(default)]
    description: String,
    date: String,
}

impl TryFrom<ExpenseDocument> for Expense {
    type Error = RecordError;

    fn try_from(doc: ExpenseDocument) -> Result<Self, Self::Error> {
        let category = doc.category.parse::<Category>()?;
        let date = NaiveDate::parse_from_str(&doc.date, "%Y-%m-%d")
            .map_err(|_| RecordError::InvalidDate(doc.date.clone()))?;

        Expense::new(category, doc.amount, doc.description, date)
    }
}
