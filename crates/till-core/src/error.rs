//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  Construction (fatal, no register can be built)                        │
//! │  ├── InvalidDenominations                                              │
//! │  └── InvalidCurrency                                                   │
//! │                                                                         │
//! │  Caller input (recoverable, fix the request)                           │
//! │  ├── UnknownDenomination   ├── InvalidCount                            │
//! │  ├── CountLengthMismatch   ├── InvalidSaleArguments                    │
//! │  └── MismatchedTable (programmer error, still checked at runtime)      │
//! │                                                                         │
//! │  Inventory state (recoverable, restock or rebalance)                   │
//! │  ├── InsufficientCoins     ├── InsufficientRegisterTotal               │
//! │  ├── NoExactChangeAvailable                                            │
//! │  └── AmountOverflow                                                    │
//! │                                                                         │
//! │  Flow: TillError → till-cli shell → "error: ..." on stderr             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (denomination, counts, amounts)
//! 3. Every failing operation leaves the inventory in its pre-call state

use thiserror::Error;

// =============================================================================
// Till Error
// =============================================================================

/// Errors raised by denomination tables, coin bundles and registers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TillError {
    /// The denomination list breaks a construction rule.
    ///
    /// ## When This Occurs
    /// - The list is empty
    /// - A value is zero or negative
    /// - No unit (`1`) coin is present, so some amounts are unreachable
    #[error("Invalid denominations: {reason}")]
    InvalidDenominations { reason: String },

    /// A currency name that has no coin table.
    #[error("Unknown currency: '{0}'. Valid options: usd, eur, gbp, cad")]
    InvalidCurrency(String),

    /// A coin value that is not in the register's table.
    #[error("Unknown denomination: {0}")]
    UnknownDenomination(i64),

    /// A negative coin count.
    #[error("Invalid coin count: {0} (must not be negative)")]
    InvalidCount(i64),

    /// A dense count vector whose length does not match the table.
    #[error("Expected {expected} coin counts, got {actual}")]
    CountLengthMismatch { expected: usize, actual: usize },

    /// Removing more coins than are on hand.
    ///
    /// ## User Workflow
    /// ```text
    /// remove 10 x3
    ///      │
    ///      ▼
    /// Check on hand: [10] = 2
    ///      │
    ///      ▼
    /// InsufficientCoins { denomination: 10, available: 2, requested: 3 }
    /// ```
    #[error("Insufficient coins of {denomination}: available {available}, requested {requested}")]
    InsufficientCoins {
        denomination: i64,
        available: i64,
        requested: i64,
    },

    /// Two bundles built from different denomination tables.
    #[error("Coin bundles belong to different denomination tables")]
    MismatchedTable,

    /// Negative cost or tendered amount, or tendered below cost.
    #[error("Invalid sale arguments: {reason}")]
    InvalidSaleArguments { reason: String },

    /// The register holds less value than the change due.
    #[error("Register total {available} is less than the change due {required}")]
    InsufficientRegisterTotal { available: i64, required: i64 },

    /// Enough value on hand, but no subset of coins sums to the change due.
    #[error("No exact combination of coins makes change of {amount}")]
    NoExactChangeAvailable { amount: i64 },

    /// A running total or count would not fit in an `i64`.
    #[error("Coin amount overflow")]
    AmountOverflow,
}

impl TillError {
    /// Returns true when the request itself was malformed.
    ///
    /// False means the request was well-formed but the register's current
    /// inventory could not satisfy it.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            TillError::InvalidDenominations { .. }
                | TillError::InvalidCurrency(_)
                | TillError::UnknownDenomination(_)
                | TillError::InvalidCount(_)
                | TillError::CountLengthMismatch { .. }
                | TillError::MismatchedTable
                | TillError::InvalidSaleArguments { .. }
        )
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with TillError.
pub type TillResult<T> = Result<T, TillError>;

// =============================================================================
// Unit Tests
// =============================================================================
