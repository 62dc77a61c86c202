//! # Validation Module
//!
//! Input validation for register requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Shell (till-cli)                                             │
//! │  └── Token parsing: is "abc" a number?                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Denomination list rules                                           │
//! │  ├── Coin counts are non-negative                                      │
//! │  └── Sale amounts are coherent                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: CoinMultiset                                                 │
//! │  └── Table membership, on-hand counts, overflow                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every check runs before any state is touched, so a failed request never
//! leaves a partial mutation behind.

use crate::error::{TillError, TillResult};

// =============================================================================
// Denomination Rules
// =============================================================================

/// Validates a list of coin values for use as a denomination table.
///
/// ## Rules
/// - Must not be empty
/// - Every value must be at least 1
/// - One value must equal 1, so every amount is reachable with enough coins
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_denominations;
///
/// assert!(validate_denominations(&[25, 10, 5, 1]).is_ok());
/// assert!(validate_denominations(&[5, 10]).is_err());
/// assert!(validate_denominations(&[]).is_err());
/// ```
pub fn validate_denominations(values: &[i64]) -> TillResult<()> {
    if values.is_empty() {
        return Err(TillError::InvalidDenominations {
            reason: "denominations cannot be empty".to_string(),
        });
    }

    if let Some(bad) = values.iter().find(|&&v| v < 1) {
        return Err(TillError::InvalidDenominations {
            reason: format!("denomination {} is not positive", bad),
        });
    }

    if !values.contains(&1) {
        return Err(TillError::InvalidDenominations {
            reason: "a unit (1) denomination is required".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a coin count for add/remove requests.
///
/// Zero is allowed (the operation becomes a no-op).
pub fn validate_count(count: i64) -> TillResult<()> {
    if count < 0 {
        return Err(TillError::InvalidCount(count));
    }

    Ok(())
}

/// Validates a sale and returns the change due.
///
/// ## Rules
/// - `cost >= 0`
/// - `tendered >= 0`
/// - `tendered >= cost`
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_sale;
///
/// assert_eq!(validate_sale(60, 90).unwrap(), 30);
/// assert_eq!(validate_sale(25, 25).unwrap(), 0);
/// assert!(validate_sale(90, 60).is_err());
/// ```
pub fn validate_sale(cost: i64, tendered: i64) -> TillResult<i64> {
    if cost < 0 {
        return Err(TillError::InvalidSaleArguments {
            reason: format!("cost {} is negative", cost),
        });
    }

    if tendered < 0 {
        return Err(TillError::InvalidSaleArguments {
            reason: format!("tendered amount {} is negative", tendered),
        });
    }

    if tendered < cost {
        return Err(TillError::InvalidSaleArguments {
            reason: format!("tendered {} is less than cost {}", tendered, cost),
        });
    }

    Ok(tendered - cost)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_denominations() {
        assert!(validate_denominations(&[1]).is_ok());
        assert!(validate_denominations(&[1, 5, 10, 25, 50]).is_ok());
        assert!(validate_denominations(&[50, 1, 1]).is_ok());

        assert!(validate_denominations(&[]).is_err());
        assert!(validate_denominations(&[0, 1]).is_err());
        assert!(validate_denominations(&[-5, 1]).is_err());
        assert!(matches!(
            validate_denominations(&[2, 5]),
            Err(TillError::InvalidDenominations { .. })
        ));
    }

    #[test]
    fn test_validate_count() {
        assert!(validate_count(0).is_ok());
        assert!(validate_count(100).is_ok());
        assert_eq!(validate_count(-1), Err(TillError::InvalidCount(-1)));
    }

    #[test]
    fn test_validate_sale() {
        assert_eq!(validate_sale(0, 30), Ok(30));
        assert_eq!(validate_sale(1, 8), Ok(7));

        assert!(matches!(
            validate_sale(-1, 10),
            Err(TillError::InvalidSaleArguments { .. })
        ));
        assert!(matches!(
            validate_sale(1, -10),
            Err(TillError::InvalidSaleArguments { .. })
        ));
        assert!(matches!(
            validate_sale(10, 9),
            Err(TillError::InvalidSaleArguments { .. })
        ));
    }
}
