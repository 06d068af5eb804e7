// Expense Tracker - Core Library
// Exposes all modules for use in the TUI, the store server, and tests

pub mod entities;
pub mod error;
pub mod config;
pub mod store;
pub mod remote;
pub mod bootstrap;
pub mod form;
pub mod list_view;
pub mod summary;

#[cfg(feature = "server")]
pub mod db;
#[cfg(feature = "server")]
pub mod server;

// Re-export commonly used types
pub use entities::{Category, Expense, RecordId};
pub use error::{BootstrapError, ConfigError, RecordError, StoreError, SubmitError};
pub use config::{Secrets, ServerSettings, ServiceAccount};
pub use store::{fetch_records, ExpenseCollection, MemoryCollection, EXPENSES_COLLECTION};
pub use remote::HttpCollection;
pub use bootstrap::{connect, Bootstrap, StoreContext};
pub use form::{ExpenseForm, FormField, AMOUNT_STEP};
pub use list_view::{load_table, ExpenseTable, Loaded, EXPORT_FILE, HEADERS, NO_EXPENSES};
pub use summary::{load_summary, total_spent, Summary, NO_SUMMARY_DATA};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
