// Entity Models
// The single record type of the expenses collection and its closed category set

pub mod category;
pub mod expense;

pub use category::Category;
pub use expense::{Expense, RecordId};
