//! # Denomination Table
//!
//! The immutable, sorted set of coin values a register accepts.
//!
//! ## Table Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  input:   [50, 25, 10, 5, 1, 25]                                       │
//! │              │ clean (dedupe + sort) + validate                         │
//! │              ▼                                                          │
//! │  values:  [ 1,  5, 10, 25, 50]                                         │
//! │  index:     0   1   2   3   4   ◄── parallel to CoinMultiset counts    │
//! │                                                                         │
//! │  id: 5f0c…  ◄── identity; bundles compare tables by id, not by value   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::error::TillResult;
use crate::validation::validate_denominations;

/// Identity of a denomination table.
///
/// Two tables built from the same values still get different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(Uuid);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Deduplicates and sorts a list of coin values ascending.
///
/// ## Example
/// ```rust
/// use till_core::denomination::clean_denominations;
///
/// assert_eq!(clean_denominations(&[25, 1, 10, 1]), vec![1, 10, 25]);
/// ```
pub fn clean_denominations(values: &[i64]) -> Vec<i64> {
    let mut cleaned = values.to_vec();
    cleaned.sort_unstable();
    cleaned.dedup();
    cleaned
}

/// Returns true if the values may form a register's denomination table.
pub fn check_denominations(values: &[i64]) -> bool {
    validate_denominations(values).is_ok()
}

/// A validated, ascending, duplicate-free list of coin values.
///
/// ## Invariants
/// - Non-empty
/// - Strictly ascending, every value `>= 1`
/// - `values[0] == 1`
#[derive(Debug)]
pub struct DenominationTable {
    id: TableId,
    values: Vec<i64>,
}

impl DenominationTable {
    /// Builds a table from arbitrary coin values.
    ///
    /// Duplicates are dropped and the values sorted before the rules in
    /// [`validate_denominations`] are applied.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::DenominationTable;
    ///
    /// let table = DenominationTable::build(&[25, 10, 5, 1, 5]).unwrap();
    /// assert_eq!(table.values(), &[1, 5, 10, 25]);
    /// assert_eq!(table.index_of(10), Some(2));
    ///
    /// assert!(DenominationTable::build(&[5, 10]).is_err());
    /// ```
    pub fn build(values: &[i64]) -> TillResult<Self> {
        let values = clean_denominations(values);
        validate_denominations(&values)?;

        Ok(DenominationTable {
            id: TableId(Uuid::new_v4()),
            values,
        })
    }

    /// Builds a table from a constant list that is already clean and valid.
    pub(crate) fn from_builtin(values: &'static [i64]) -> Self {
        debug_assert!(check_denominations(values));
        debug_assert!(values.windows(2).all(|w| w[0] < w[1]));

        DenominationTable {
            id: TableId(Uuid::new_v4()),
            values: values.to_vec(),
        }
    }

    /// Builds a table and wraps it for sharing with bundles.
    pub fn shared(values: &[i64]) -> TillResult<Arc<Self>> {
        Self::build(values).map(Arc::new)
    }

    /// Returns the table's identity.
    #[inline]
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Returns the coin values, ascending.
    #[inline]
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Returns the number of denominations.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the table has no denominations.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Finds the index of a coin value (binary search over the sorted table).
    pub fn index_of(&self, value: i64) -> Option<usize> {
        self.values.binary_search(&value).ok()
    }

    /// Returns true if the value is one of the table's denominations.
    pub fn contains(&self, value: i64) -> bool {
        self.index_of(value).is_some()
    }

    /// Returns the coin value at an index.
    pub fn value_at(&self, index: usize) -> Option<i64> {
        self.values.get(index).copied()
    }

    /// Returns the largest denomination.
    pub fn largest(&self) -> i64 {
        // Non-empty by construction.
        self.values.last().copied().unwrap_or(1)
    }
}

impl fmt::Display for DenominationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values: Vec<String> = self.values.iter().map(|v| v.to_string()).collect();
        write!(f, "[{}]", values.join(", "))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
