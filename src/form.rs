// ➕ Input Form - collects one candidate Expense Record
//
// Field constraints are enforced while typing: the category only cycles
// through the fixed set, the amount buffer only ever holds a non-negative
// decimal, the date only moves by whole days or months.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::entities::{Category, Expense, RecordId};
use crate::error::{RecordError, SubmitError};
use crate::store::ExpenseCollection;

/// Amount step for the left/right keys: 0.1
pub const AMOUNT_STEP: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Category,
    Amount,
    Description,
    Date,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Category,
        FormField::Amount,
        FormField::Description,
        FormField::Date,
    ];

    pub fn next(&self) -> Self {
        match self {
            FormField::Category => FormField::Amount,
            FormField::Amount => FormField::Description,
            FormField::Description => FormField::Date,
            FormField::Date => FormField::Category,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            FormField::Category => FormField::Date,
            FormField::Amount => FormField::Category,
            FormField::Description => FormField::Amount,
            FormField::Date => FormField::Description,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Category => "Category",
            FormField::Amount => "Amount (₹)",
            FormField::Description => "Description",
            FormField::Date => "Date",
        }
    }

    /// Fields that consume typed characters
    pub fn takes_text(&self) -> bool {
        matches!(self, FormField::Amount | FormField::Description)
    }
}

#[derive(Debug, Clone)]
pub struct ExpenseForm {
    pub category: Category,
    amount: String,
    pub description: String,
    pub date: NaiveDate,
    pub focus: FormField,
    today: NaiveDate,
}

impl ExpenseForm {
    /// Fresh form; `today` is the date default
    pub fn new(today: NaiveDate) -> Self {
        Self {
            category: Category::default(),
            amount: "0".to_string(),
            description: String::new(),
            date: today,
            focus: FormField::Category,
            today,
        }
    }

    /// Back to defaults. Focus returns to the first field.
    pub fn reset(&mut self) {
        *self = Self::new(self.today);
    }

    /// Amount as typed
    pub fn amount_text(&self) -> &str {
        &self.amount
    }

    /// Numeric amount. A trailing "." is ignored.
    pub fn amount(&self) -> Decimal {
        self.amount
            .trim_end_matches('.')
            .parse::<Decimal>()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Type a character into the focused field. Returns false when rejected.
    pub fn input_char(&mut self, c: char) -> bool {
        match self.focus {
            FormField::Amount => self.push_amount_char(c),
            FormField::Description => {
                self.description.push(c);
                true
            }
            FormField::Category | FormField::Date => false,
        }
    }

    fn push_amount_char(&mut self, c: char) -> bool {
        match c {
            '0'..='9' => {
                if self.amount == "0" {
                    self.amount.clear();
                }
                self.amount.push(c);
                true
            }
            '.' if !self.amount.contains('.') => {
                if self.amount.is_empty() {
                    self.amount.push('0');
                }
                self.amount.push('.');
                true
            }
            _ => false,
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            FormField::Amount => {
                self.amount.pop();
                if self.amount.is_empty() {
                    self.amount.push('0');
                }
            }
            FormField::Description => {
                self.description.pop();
            }
            FormField::Category | FormField::Date => {}
        }
    }

    /// Left/right on the focused field
    pub fn adjust(&mut self, forward: bool) {
        match self.focus {
            FormField::Category => {
                self.category = if forward {
                    self.category.next()
                } else {
                    self.category.previous()
                };
            }
            FormField::Amount => self.step_amount(forward),
            FormField::Date => self.step_days(if forward { 1 } else { -1 }),
            FormField::Description => {}
        }
    }

    /// Move the amount by one step, clamped at zero
    pub fn step_amount(&mut self, up: bool) {
        let stepped = if up {
            self.amount() + AMOUNT_STEP
        } else {
            self.amount() - AMOUNT_STEP
        };
        self.amount = stepped.max(Decimal::ZERO).normalize().to_string();
    }

    pub fn step_days(&mut self, days: i64) {
        if let Some(date) = self.date.checked_add_signed(chrono::Duration::days(days)) {
            self.date = date;
        }
    }

    pub fn step_months(&mut self, forward: bool) {
        let moved = if forward {
            self.date.checked_add_months(Months::new(1))
        } else {
            self.date.checked_sub_months(Months::new(1))
        };
        if let Some(date) = moved {
            self.date = date;
        }
    }

    /// Build the record the form currently describes
    pub fn to_expense(&self) -> Result<Expense, RecordError> {
        Expense::new(self.category, self.amount(), self.description.clone(), self.date)
    }

    /// Append the current values as one new record, then reset on success
    pub fn submit(&mut self, collection: &dyn ExpenseCollection) -> Result<RecordId, SubmitError> {
        let expense = self.to_expense()?;

        match collection.append(&expense) {
            Ok(id) => {
                info!(
                    category = %expense.category,
                    amount = %expense.amount,
                    date = %expense.iso_date(),
                    "expense added"
                );
                self.reset();
                Ok(id)
            }
            Err(e) => {
                warn!(error = %e, "expense submit failed, keeping form values");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::{fetch_records, MemoryCollection};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn rupees(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn type_text(form: &mut ExpenseForm, text: &str) {
        for c in text.chars() {
            form.input_char(c);
        }
    }

    #[test]
    fn test_defaults() {
        let form = ExpenseForm::new(today());

        assert_eq!(form.category, Category::Food);
        assert_eq!(form.amount(), Decimal::ZERO);
        assert_eq!(form.description, "");
        assert_eq!(form.date, today());
        assert_eq!(form.focus, FormField::Category);
    }

    #[test]
    fn test_amount_accepts_only_decimal_input() {
        let mut form = ExpenseForm::new(today());
        form.focus = FormField::Amount;

        type_text(&mut form, "12a.5-.3");
        assert_eq!(form.amount_text(), "12.53");
        assert_eq!(form.amount(), rupees("12.53"));

        assert!(!form.input_char('-'), "Minus sign can never be typed");
    }

    #[test]
    fn test_amount_backspace_never_empties() {
        let mut form = ExpenseForm::new(today());
        form.focus = FormField::Amount;
        type_text(&mut form, "7");

        form.backspace();
        form.backspace();
        assert_eq!(form.amount_text(), "0");
    }

    #[test]
    fn test_amount_step_clamps_at_zero() {
        let mut form = ExpenseForm::new(today());

        form.step_amount(true);
        form.step_amount(true);
        form.step_amount(true);
        assert_eq!(form.amount_text(), "0.3");

        for _ in 0..10 {
            form.step_amount(false);
        }
        assert_eq!(form.amount(), Decimal::ZERO);
        assert_eq!(form.amount_text(), "0");
    }

    #[test]
    fn test_category_cycles_through_fixed_set() {
        let mut form = ExpenseForm::new(today());
        form.adjust(true);
        assert_eq!(form.category, Category::Travel);
        form.adjust(false);
        form.adjust(false);
        assert_eq!(form.category, Category::Others);
    }

    #[test]
    fn test_date_steps() {
        let mut form = ExpenseForm::new(today());
        form.focus = FormField::Date;

        form.adjust(false);
        assert_eq!(form.date, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap());

        form.step_months(true);
        assert_eq!(form.date, NaiveDate::from_ymd_opt(2026, 11, 18).unwrap());
    }

    #[test]
    fn test_submit_appends_one_record_and_resets() {
        let collection = MemoryCollection::new();
        let mut form = ExpenseForm::new(today());

        form.category = Category::Shopping;
        form.focus = FormField::Amount;
        type_text(&mut form, "249.99");
        form.focus = FormField::Description;
        type_text(&mut form, "Shoes");
        form.date = NaiveDate::from_ymd_opt(2026, 9, 30).unwrap();

        form.submit(&collection).unwrap();

        let stored = collection.fetch_all().unwrap();
        assert_eq!(stored.len(), 1);
        let (_, expense) = &stored[0];
        assert_eq!(expense.amount, rupees("249.99"));
        assert_eq!(expense.category, Category::Shopping);
        assert_eq!(expense.description, "Shoes");

        let wire = serde_json::to_value(expense).unwrap();
        assert_eq!(wire["date"], "2026-09-30");

        // Form is back to defaults so a second Enter can't resubmit stale values
        assert_eq!(form.category, Category::Food);
        assert_eq!(form.amount(), Decimal::ZERO);
        assert_eq!(form.description, "");
        assert_eq!(form.date, today());
    }

    #[test]
    fn test_n_submissions_grow_collection_by_n() {
        let collection = MemoryCollection::new();
        let mut form = ExpenseForm::new(today());
        form.submit(&collection).unwrap();
        let before = fetch_records(&collection).unwrap().len();

        for _ in 0..4 {
            form.submit(&collection).unwrap();
        }

        assert_eq!(fetch_records(&collection).unwrap().len(), before + 4);
    }

    #[test]
    fn test_zero_amount_empty_description_accepted() {
        let collection = MemoryCollection::new();
        let mut form = ExpenseForm::new(today());

        assert!(form.submit(&collection).is_ok());
        let records = fetch_records(&collection).unwrap();
        assert_eq!(records[0].amount, Decimal::ZERO);
        assert_eq!(records[0].description, "");
    }

    struct FailingCollection;

    impl ExpenseCollection for FailingCollection {
        fn append(&self, _: &Expense) -> Result<RecordId, StoreError> {
            Err(StoreError::Transport("connection reset".to_string()))
        }

        fn fetch_all(&self) -> Result<Vec<(RecordId, Expense)>, StoreError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_failed_submit_keeps_values() {
        let mut form = ExpenseForm::new(today());
        form.focus = FormField::Description;
        type_text(&mut form, "Taxi");

        assert!(matches!(
            form.submit(&FailingCollection),
            Err(SubmitError::Store(StoreError::Transport(_)))
        ));
        assert_eq!(form.description, "Taxi");
    }

    #[test]
    fn test_rejected_record_is_not_a_store_error() {
        let mut form = ExpenseForm::new(today());
        form.amount = "-4".to_string();

        assert!(matches!(form.to_expense(), Err(RecordError::InvalidAmount(_))));

        let collection = MemoryCollection::new();
        let err = form.submit(&collection).unwrap_err();
        assert!(matches!(err, SubmitError::Invalid(RecordError::InvalidAmount(_))));
        assert!(collection.is_empty(), "Nothing is sent for an invalid record");
    }

    #[test]
    fn test_trailing_point_reads_as_whole_amount() {
        let mut form = ExpenseForm::new(today());
        form.focus = FormField::Amount;
        type_text(&mut form, "12.");

        assert_eq!(form.amount_text(), "12.");
        assert_eq!(form.amount(), Decimal::from(12));
    }

    #[test]
    fn test_amount_steps_are_exact() {
        let mut form = ExpenseForm::new(today());
        for _ in 0..30 {
            form.step_amount(true);
        }
        assert_eq!(form.amount_text(), "3");
        form.step_amount(false);
        assert_eq!(form.amount_text(), "2.9");
    }
}
