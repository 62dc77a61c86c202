//! # Currency Tables
//!
//! Built-in coin sets for common currencies.
//!
//! ```text
//! ┌──────────┬────────────────────────────────────────────────────────────┐
//! │ Currency │ Coins (base units)                                         │
//! ├──────────┼────────────────────────────────────────────────────────────┤
//! │ usd      │ 1, 5, 10, 25, 50                                           │
//! │ eur      │ 1, 2, 5, 10, 20, 50, 100, 200                              │
//! │ gbp      │ 1, 2, 5, 10, 20, 50, 100, 200                              │
//! │ cad      │ 1, 5, 10, 25, 100, 200                                     │
//! └──────────┴────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::denomination::DenominationTable;
use crate::error::TillError;

/// U.S. coin values.
pub mod usd {
    pub const PENNY: i64 = 1;
    pub const NICKEL: i64 = 5;
    pub const DIME: i64 = 10;
    pub const QUARTER: i64 = 25;
    pub const HALF_DOLLAR: i64 = 50;
}

const USD: &[i64] = &[
    usd::PENNY,
    usd::NICKEL,
    usd::DIME,
    usd::QUARTER,
    usd::HALF_DOLLAR,
];
const EUR: &[i64] = &[1, 2, 5, 10, 20, 50, 100, 200];
const GBP: &[i64] = &[1, 2, 5, 10, 20, 50, 100, 200];
// The penny is no longer minted but is kept so every amount stays reachable.
const CAD: &[i64] = &[1, 5, 10, 25, 100, 200];

/// A currency with a built-in coin table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    /// United States dollar.
    #[default]
    Usd,
    /// Euro.
    Eur,
    /// Pound sterling.
    Gbp,
    /// Canadian dollar.
    Cad,
}

impl Currency {
    /// Every built-in currency.
    pub const ALL: [Currency; 4] = [Currency::Usd, Currency::Eur, Currency::Gbp, Currency::Cad];

    /// Returns the coin values in base units, ascending.
    pub fn denominations(&self) -> &'static [i64] {
        match self {
            Currency::Usd => USD,
            Currency::Eur => EUR,
            Currency::Gbp => GBP,
            Currency::Cad => CAD,
        }
    }

    /// Returns the lowercase ISO-style code.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Eur => "eur",
            Currency::Gbp => "gbp",
            Currency::Cad => "cad",
        }
    }

    /// Builds a fresh denomination table for this currency.
    pub fn table(&self) -> DenominationTable {
        DenominationTable::from_builtin(self.denominations())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = TillError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "usd" | "us" | "dollar" => Ok(Currency::Usd),
            "eur" | "euro" => Ok(Currency::Eur),
            "gbp" | "uk" | "pound" | "sterling" => Ok(Currency::Gbp),
            "cad" | "ca" | "loonie" => Ok(Currency::Cad),
            other => Err(TillError::InvalidCurrency(other.to_string())),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::denomination::check_denominations;

    #[test]
    fn test_builtin_tables_are_valid() {
        for currency in Currency::ALL {
            assert!(check_denominations(currency.denominations()), "{}", currency);
            let table = currency.table();
            assert_eq!(table.values(), currency.denominations());
        }
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!("USD".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!(" euro ".parse::<Currency>().unwrap(), Currency::Eur);
        assert_eq!("pound".parse::<Currency>().unwrap(), Currency::Gbp);
        assert_eq!("cad".parse::<Currency>().unwrap(), Currency::Cad);
        assert_eq!(
            "yen".parse::<Currency>(),
            Err(TillError::InvalidCurrency("yen".to_string()))
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for currency in Currency::ALL {
            assert_eq!(currency.to_string().parse::<Currency>().unwrap(), currency);
        }
        assert_eq!(Currency::default(), Currency::Usd);
    }
}
