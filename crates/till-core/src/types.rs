//! # Summary Types
//!
//! Plain, serialisable views of coin bundles for callers that present
//! results (the shell's JSON output, logs, tests).
//!
//! ```text
//! ┌──────────────────────────────┐
//! │        BundleSummary         │
//! │  ──────────────────────────  │
//! │  total_cents:  30            │
//! │  coin_count:   3             │
//! │  coins: [ CoinLine ... ]     │──► { denomination: 10, count: 3 }
//! └──────────────────────────────┘
//! ```
//!
//! Summaries list only denominations with a non-zero count.

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// One denomination and how many coins of it a bundle holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinLine {
    pub denomination: i64,
    pub count: i64,
}

/// Snapshot of a coin bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleSummary {
    pub total_cents: i64,
    pub coin_count: i64,
    pub coins: Vec<CoinLine>,
}

impl BundleSummary {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
