// Collection boundary - the only two operations the app performs on the store
//
// append(record) -> opaque id
// fetch_all()    -> every (id, record) pair, in whatever order the store returns
//
// There is no update or delete. Writes never read first, so concurrent
// writers cannot lose each other's records.

use std::sync::{Arc, Mutex};

use crate::entities::{Expense, RecordId};
use crate::error::StoreError;

/// Name of the one collection the tracker uses
pub const EXPENSES_COLLECTION: &str = "expenses";

pub trait ExpenseCollection: Send + Sync {
    /// Append a new record. Never upserts; every call creates one record.
    fn append(&self, expense: &Expense) -> Result<RecordId, StoreError>;

    /// Fetch the whole collection as one snapshot
    fn fetch_all(&self) -> Result<Vec<(RecordId, Expense)>, StoreError>;

    /// Cheap check that the collection is reachable with the current credentials
    fn probe(&self) -> Result<(), StoreError> {
        self.fetch_all().map(|_| ())
    }
}

/// Records only, store ids dropped
pub fn fetch_records(collection: &dyn ExpenseCollection) -> Result<Vec<Expense>, StoreError> {
    Ok(collection
        .fetch_all()?
        .into_iter()
        .map(|(_, expense)| expense)
        .collect())
}

// ============================================================================
// IN-MEMORY COLLECTION
// ============================================================================

/// Process-local collection used as the test double for views and the UI
#[derive(Clone, Default)]
pub struct MemoryCollection {
    records: Arc<Mutex<Vec<(RecordId, Expense)>>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ExpenseCollection for MemoryCollection {
    fn append(&self, expense: &Expense) -> Result<RecordId, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        let mut records = self
            .records
            .lock()
            .map_err(|_| StoreError::Transport("memory collection poisoned".to_string()))?;
        records.push((id.clone(), expense.clone()));
        Ok(id)
    }

    fn fetch_all(&self) -> Result<Vec<(RecordId, Expense)>, StoreError> {
        let records = self
            .records
            .lock()
            .map_err(|_| StoreError::Transport("memory collection poisoned".to_string()))?;
        Ok(records.clone())
    }
}
