//! # till-core: Pure Change Engine for the Till
//!
//! This crate is the **heart** of the till. It holds coin inventories,
//! answers "what is the fewest coins that make exactly this change?", and
//! keeps the bookkeeping of a register consistent. It has zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Till Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    till (apps/till-cli)                         │   │
//! │  │    config file + env ──► shell commands ──► text / JSON out     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────┐  ┌────────────┐  ┌────────────┐  ┌──────────┐ │   │
//! │  │   │denomination│  │   bundle   │  │  resolver  │  │ register │ │   │
//! │  │   │   Table    │  │CoinMultiset│  │  fewest    │  │ Register │ │   │
//! │  │   │  Currency  │  │  invariants│  │  coins     │  │  Shared  │ │   │
//! │  │   └────────────┘  └────────────┘  └────────────┘  └──────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO STDIN • LOGGING VIA tracing ONLY      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`denomination`] - Validated, ascending coin tables with identity
//! - [`currency`] - Built-in tables (usd, eur, gbp, cad)
//! - [`bundle`] - `CoinMultiset`, a count per denomination with cached totals
//! - [`resolver`] - Fewest-coin exact change over a finite supply
//! - [`register`] - `Register` and the thread-safe `SharedRegister`
//! - [`money`] - Integer money for display
//! - [`types`] - Serialisable bundle summaries
//! - [`error`] - Domain error type
//! - [`validation`] - Argument checks shared by the modules above
//!
//! ## Design Principles
//!
//! 1. **Integer Amounts**: Every amount is in base units (i64), never floats
//! 2. **All or Nothing**: A failed operation leaves every bundle untouched
//! 3. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use till_core::{Currency, Register};
//!
//! let mut register = Register::with_currency(Currency::Usd);
//! register.add_coins(10, 5).unwrap();
//! register.add_coins(25, 2).unwrap();
//!
//! // 30 cents change: three dimes beats a quarter plus five pennies.
//! let change = register.sale(70, 100).unwrap();
//! assert_eq!(change.coin_count(), 3);
//! assert_eq!(register.total(), 70);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bundle;
pub mod currency;
pub mod denomination;
pub mod error;
pub mod money;
pub mod register;
pub mod resolver;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use till_core::Register` instead of
// `use till_core::register::Register`

pub use bundle::CoinMultiset;
pub use currency::Currency;
pub use denomination::{DenominationTable, TableId};
pub use error::{TillError, TillResult};
pub use money::Money;
pub use register::{Register, SharedRegister};
pub use resolver::ChangeResolver;
pub use types::{BundleSummary, CoinLine};
