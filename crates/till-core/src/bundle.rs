//! # Coin Bundles
//!
//! `CoinMultiset` is a dense count of coins per denomination, bound to one
//! [`DenominationTable`]. A register's inventory, the change handed back by
//! a sale and ad-hoc bundles passed to `add_bundle`/`remove_bundle` are all
//! coin multisets.
//!
//! ## Invariants (hold after every operation, successful or not)
//! ```text
//! count[i]   >= 0                               for every i
//! total      == Σ count[i] × denomination[i]
//! coin_count == Σ count[i]
//! ```
//!
//! Every operation validates its whole input before writing, so a failed
//! call leaves the bundle exactly as it was.

use std::fmt;
use std::sync::Arc;

use crate::denomination::DenominationTable;
use crate::error::{TillError, TillResult};
use crate::money::Money;
use crate::types::{BundleSummary, CoinLine};
use crate::validation::validate_count;

/// A multiset of coins over a denomination table.
#[derive(Debug, Clone)]
pub struct CoinMultiset {
    table: Arc<DenominationTable>,
    counts: Vec<i64>,
    total: i64,
    coin_count: i64,
}

impl CoinMultiset {
    /// Creates an empty bundle.
    pub fn new(table: Arc<DenominationTable>) -> Self {
        let counts = vec![0; table.len()];
        CoinMultiset {
            table,
            counts,
            total: 0,
            coin_count: 0,
        }
    }

    /// Creates a bundle from one count per denomination, in table order.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::{CoinMultiset, DenominationTable};
    ///
    /// let table = DenominationTable::shared(&[1, 5, 10]).unwrap();
    /// let bundle = CoinMultiset::from_counts(table, &[2, 1, 3]).unwrap();
    /// assert_eq!(bundle.total(), 37);
    /// assert_eq!(bundle.coin_count(), 6);
    /// ```
    pub fn from_counts(table: Arc<DenominationTable>, counts: &[i64]) -> TillResult<Self> {
        if counts.len() != table.len() {
            return Err(TillError::CountLengthMismatch {
                expected: table.len(),
                actual: counts.len(),
            });
        }

        for &count in counts {
            validate_count(count)?;
        }

        let (total, coin_count) = checked_totals(table.values(), counts)?;

        Ok(CoinMultiset {
            table,
            counts: counts.to_vec(),
            total,
            coin_count,
        })
    }

    /// Builds a bundle from counts already known to be valid for the table.
    pub(crate) fn from_trusted_counts(table: Arc<DenominationTable>, counts: Vec<i64>) -> Self {
        debug_assert_eq!(counts.len(), table.len());

        let total: i64 = counts
            .iter()
            .zip(table.values())
            .map(|(count, value)| count * value)
            .sum();
        let coin_count: i64 = counts.iter().sum();

        CoinMultiset {
            table,
            counts,
            total,
            coin_count,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the table this bundle is bound to.
    #[inline]
    pub fn table(&self) -> &Arc<DenominationTable> {
        &self.table
    }

    /// Total value in base units.
    #[inline]
    pub fn total(&self) -> i64 {
        self.total
    }

    /// Total value as Money.
    #[inline]
    pub fn total_money(&self) -> Money {
        Money::from_cents(self.total)
    }

    /// Number of coins regardless of denomination.
    #[inline]
    pub fn coin_count(&self) -> i64 {
        self.coin_count
    }

    /// Per-denomination counts, parallel to `table().values()`.
    #[inline]
    pub fn counts(&self) -> &[i64] {
        &self.counts
    }

    /// Returns true if the bundle holds no coins.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coin_count == 0
    }

    /// Number of coins of one denomination.
    pub fn count_of(&self, denomination: i64) -> TillResult<i64> {
        let index = self.index_of(denomination)?;
        Ok(self.counts[index])
    }

    /// Iterates `(denomination, count)` pairs in ascending denomination order.
    pub fn lines(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.table
            .values()
            .iter()
            .copied()
            .zip(self.counts.iter().copied())
    }

    /// Serialisable snapshot listing the non-empty denominations.
    pub fn summary(&self) -> BundleSummary {
        BundleSummary {
            total_cents: self.total,
            coin_count: self.coin_count,
            coins: self
                .lines()
                .filter(|&(_, count)| count > 0)
                .map(|(denomination, count)| CoinLine {
                    denomination,
                    count,
                })
                .collect(),
        }
    }

    /// Independent deep copy bound to the same table.
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    // =========================================================================
    // Single-Denomination Mutations
    // =========================================================================

    /// Adds `count` coins of `denomination`.
    ///
    /// A zero count is a successful no-op.
    pub fn add(&mut self, denomination: i64, count: i64) -> TillResult<()> {
        if count == 0 {
            return Ok(());
        }
        validate_count(count)?;
        let index = self.index_of(denomination)?;

        let new_count = self.counts[index]
            .checked_add(count)
            .ok_or(TillError::AmountOverflow)?;
        let new_total = denomination
            .checked_mul(count)
            .and_then(|value| self.total.checked_add(value))
            .ok_or(TillError::AmountOverflow)?;
        let new_coin_count = self
            .coin_count
            .checked_add(count)
            .ok_or(TillError::AmountOverflow)?;

        self.counts[index] = new_count;
        self.total = new_total;
        self.coin_count = new_coin_count;
        Ok(())
    }

    /// Removes `count` coins of `denomination`.
    ///
    /// Fails with `InsufficientCoins` rather than going negative.
    pub fn remove(&mut self, denomination: i64, count: i64) -> TillResult<()> {
        if count == 0 {
            return Ok(());
        }
        validate_count(count)?;
        let index = self.index_of(denomination)?;

        let available = self.counts[index];
        if available < count {
            return Err(TillError::InsufficientCoins {
                denomination,
                available,
                requested: count,
            });
        }

        self.counts[index] -= count;
        self.total -= denomination * count;
        self.coin_count -= count;
        Ok(())
    }

    /// Resets every count to zero.
    pub fn clear(&mut self) {
        self.counts.iter_mut().for_each(|count| *count = 0);
        self.total = 0;
        self.coin_count = 0;
    }

    // =========================================================================
    // Bundle-to-Bundle Operations
    // =========================================================================

    /// Adds every coin of `other` into this bundle. `other` is not changed.
    pub fn merge_add(&mut self, other: &CoinMultiset) -> TillResult<()> {
        self.ensure_same_table(other)?;

        let mut counts = Vec::with_capacity(self.counts.len());
        for (&mine, &theirs) in self.counts.iter().zip(&other.counts) {
            counts.push(mine.checked_add(theirs).ok_or(TillError::AmountOverflow)?);
        }
        let total = self
            .total
            .checked_add(other.total)
            .ok_or(TillError::AmountOverflow)?;
        let coin_count = self
            .coin_count
            .checked_add(other.coin_count)
            .ok_or(TillError::AmountOverflow)?;

        self.counts = counts;
        self.total = total;
        self.coin_count = coin_count;
        Ok(())
    }

    /// Removes up to `other`'s count of each denomination.
    ///
    /// Saturating: a denomination this bundle holds fewer of than `other`
    /// drops to zero instead of failing.
    pub fn merge_remove(&mut self, other: &CoinMultiset) -> TillResult<()> {
        self.ensure_same_table(other)?;

        for (index, &theirs) in other.counts.iter().enumerate() {
            let taken = self.counts[index].min(theirs);
            self.counts[index] -= taken;
            self.total -= self.table.values()[index] * taken;
            self.coin_count -= taken;
        }
        Ok(())
    }

    /// Removes exactly `other`'s coins, or nothing at all.
    ///
    /// Fails with `InsufficientCoins` for the first denomination that is
    /// short; the bundle is left untouched in that case.
    pub fn remove_exact(&mut self, other: &CoinMultiset) -> TillResult<()> {
        self.ensure_same_table(other)?;

        let short = self
            .lines()
            .zip(other.counts.iter().copied())
            .find(|&((_, available), requested)| available < requested);
        if let Some(((denomination, available), requested)) = short {
            return Err(TillError::InsufficientCoins {
                denomination,
                available,
                requested,
            });
        }

        for (mine, &theirs) in self.counts.iter_mut().zip(&other.counts) {
            *mine -= theirs;
        }
        self.total -= other.total;
        self.coin_count -= other.coin_count;
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn index_of(&self, denomination: i64) -> TillResult<usize> {
        self.table
            .index_of(denomination)
            .ok_or(TillError::UnknownDenomination(denomination))
    }

    fn ensure_same_table(&self, other: &CoinMultiset) -> TillResult<()> {
        if self.table.id() != other.table.id() {
            return Err(TillError::MismatchedTable);
        }
        Ok(())
    }
}

fn checked_totals(values: &[i64], counts: &[i64]) -> TillResult<(i64, i64)> {
    let mut total: i64 = 0;
    let mut coin_count: i64 = 0;
    for (&value, &count) in values.iter().zip(counts) {
        total = value
            .checked_mul(count)
            .and_then(|line| total.checked_add(line))
            .ok_or(TillError::AmountOverflow)?;
        coin_count = coin_count
            .checked_add(count)
            .ok_or(TillError::AmountOverflow)?;
    }
    Ok((total, coin_count))
}

/// Bundles are equal when they share a table and hold the same coins.
impl PartialEq for CoinMultiset {
    fn eq(&self, other: &Self) -> bool {
        self.table.id() == other.table.id() && self.counts == other.counts
    }
}

impl Eq for CoinMultiset {}

/// `Total: $0.30; [1]: 0, [5]: 0, [10]: 3, [25]: 0, [50]: 0`
impl fmt::Display for CoinMultiset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Total: {};", self.total_money())?;
        for (i, (denomination, count)) in self.lines().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{}[{}]: {}", sep, denomination, count)?;
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
