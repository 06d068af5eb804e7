// 🏷️ Category - the fixed, closed set of spending buckets
//
// The form never lets a user type a category, it only cycles through these.
// Anything else arriving from the store is rejected at deserialization.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RecordError;

// ============================================================================
// CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Food,
    Travel,
    Bills,
    Shopping,
    Others,
}

impl Category {
    /// All categories in menu order. The first one is the form default.
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Travel,
        Category::Bills,
        Category::Shopping,
        Category::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Travel => "Travel",
            Category::Bills => "Bills",
            Category::Shopping => "Shopping",
            Category::Others => "Others",
        }
    }

    /// Position in `Category::ALL`
    pub fn index(&self) -> usize {
        match self {
            Category::Food => 0,
            Category::Travel => 1,
            Category::Bills => 2,
            Category::Shopping => 3,
            Category::Others => 4,
        }
    }

    /// Next category in menu order, wrapping around
    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Previous category in menu order, wrapping around
    pub fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::ALL[0]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| RecordError::UnknownCategory(s.to_string()))
    }
}
