//! # Register
//!
//! A coin register: one denomination table and one live inventory.
//!
//! ## Sale Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sale(cost, tendered)                                                   │
//! │       │                                                                 │
//! │       ├── validate amounts ─────────► InvalidSaleArguments              │
//! │       │                                                                 │
//! │       ├── change_due = tendered - cost                                  │
//! │       │                                                                 │
//! │       ├── inventory total < due? ───► InsufficientRegisterTotal         │
//! │       │                                                                 │
//! │       ├── ChangeResolver on a copy ─► NoExactChangeAvailable            │
//! │       │   of the inventory counts                                       │
//! │       │                                                                 │
//! │       └── remove change from live inventory, return change              │
//! │                                                                         │
//! │  Sales never add the tendered money to the register; call the add       │
//! │  operations for that. Every failure leaves the inventory untouched.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Thread Safety
//! `Register` itself is a plain value with `&mut self` mutations. Shared use
//! goes through [`SharedRegister`], which holds the lock for the whole of
//! each operation (including a sale's check, search and commit), so no other
//! mutation can slip in between computing change and removing it.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::bundle::CoinMultiset;
use crate::currency::Currency;
use crate::denomination::DenominationTable;
use crate::error::{TillError, TillResult};
use crate::resolver::ChangeResolver;
use crate::validation::validate_sale;

/// A coin register.
#[derive(Debug)]
pub struct Register {
    table: Arc<DenominationTable>,
    inventory: CoinMultiset,
}

impl Register {
    /// Creates an empty register over a denomination table.
    pub fn new(table: DenominationTable) -> Self {
        let table = Arc::new(table);
        let inventory = CoinMultiset::new(Arc::clone(&table));
        Register { table, inventory }
    }

    /// Creates an empty register for a built-in currency.
    pub fn with_currency(currency: Currency) -> Self {
        Self::new(currency.table())
    }

    /// Creates an empty register from raw coin values (cleaned and validated).
    ///
    /// ## Example
    /// ```rust
    /// use till_core::Register;
    ///
    /// let register = Register::from_denominations(&[3, 1, 2, 2]).unwrap();
    /// assert_eq!(register.table().values(), &[1, 2, 3]);
    /// assert!(Register::from_denominations(&[2, 3]).is_err());
    /// ```
    pub fn from_denominations(values: &[i64]) -> TillResult<Self> {
        DenominationTable::build(values).map(Self::new)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// The register's denomination table.
    #[inline]
    pub fn table(&self) -> &Arc<DenominationTable> {
        &self.table
    }

    /// Read-only view of the live inventory.
    #[inline]
    pub fn inventory(&self) -> &CoinMultiset {
        &self.inventory
    }

    /// Total value on hand.
    #[inline]
    pub fn total(&self) -> i64 {
        self.inventory.total()
    }

    /// Number of coins on hand.
    #[inline]
    pub fn coin_count(&self) -> i64 {
        self.inventory.coin_count()
    }

    /// Returns true if the register accepts this coin value.
    pub fn is_valid_coin(&self, denomination: i64) -> bool {
        self.table.contains(denomination)
    }

    // =========================================================================
    // Bundles
    // =========================================================================

    /// Creates an empty bundle bound to this register's table.
    pub fn create_bundle(&self) -> CoinMultiset {
        CoinMultiset::new(Arc::clone(&self.table))
    }

    /// Creates a bundle from one count per denomination, ascending.
    pub fn bundle_from_counts(&self, counts: &[i64]) -> TillResult<CoinMultiset> {
        CoinMultiset::from_counts(Arc::clone(&self.table), counts)
    }

    // =========================================================================
    // Inventory Mutations
    // =========================================================================

    /// Adds one coin.
    pub fn add_coin(&mut self, denomination: i64) -> TillResult<()> {
        self.add_coins(denomination, 1)
    }

    /// Adds `count` coins of one denomination.
    pub fn add_coins(&mut self, denomination: i64, count: i64) -> TillResult<()> {
        self.inventory.add(denomination, count)?;
        debug!(denomination, count, total = self.total(), "Added coins");
        Ok(())
    }

    /// Removes one coin.
    pub fn remove_coin(&mut self, denomination: i64) -> TillResult<()> {
        self.remove_coins(denomination, 1)
    }

    /// Removes `count` coins of one denomination.
    pub fn remove_coins(&mut self, denomination: i64, count: i64) -> TillResult<()> {
        self.inventory.remove(denomination, count)?;
        debug!(denomination, count, total = self.total(), "Removed coins");
        Ok(())
    }

    /// Adds a bundle's coins. The bundle itself is not emptied.
    pub fn add_bundle(&mut self, bundle: &CoinMultiset) -> TillResult<()> {
        self.inventory.merge_add(bundle)?;
        debug!(added = bundle.total(), total = self.total(), "Added bundle");
        Ok(())
    }

    /// Removes up to a bundle's coins from the inventory (saturating).
    pub fn remove_bundle(&mut self, bundle: &CoinMultiset) -> TillResult<()> {
        self.inventory.merge_remove(bundle)?;
        debug!(requested = bundle.total(), total = self.total(), "Removed bundle");
        Ok(())
    }

    /// Empties the register.
    pub fn clear(&mut self) {
        self.inventory.clear();
        debug!("Cleared register");
    }

    // =========================================================================
    // Sales
    // =========================================================================

    /// Makes a sale and returns the change handed back.
    ///
    /// `cost` and `tendered` are in base units. The returned bundle has
    /// already been removed from the inventory.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::{Currency, Register};
    ///
    /// let mut register = Register::with_currency(Currency::Usd);
    /// register.add_coins(10, 3).unwrap();
    /// register.add_coins(25, 1).unwrap();
    ///
    /// let change = register.sale(60, 90).unwrap();
    /// assert_eq!(change.total(), 30);
    /// assert_eq!(change.coin_count(), 3);
    /// assert_eq!(register.total(), 25);
    /// ```
    pub fn sale(&mut self, cost: i64, tendered: i64) -> TillResult<CoinMultiset> {
        let change_due = validate_sale(cost, tendered)?;

        let available = self.total();
        if available < change_due {
            debug!(change_due, available, "Sale rejected: register total too low");
            return Err(TillError::InsufficientRegisterTotal {
                available,
                required: change_due,
            });
        }

        let snapshot = self.inventory.counts().to_vec();
        let change = ChangeResolver::resolve(&self.table, &snapshot, change_due).ok_or_else(|| {
            debug!(change_due, available, "Sale rejected: no exact change");
            TillError::NoExactChangeAvailable { amount: change_due }
        })?;

        self.inventory.remove_exact(&change)?;

        debug!(
            cost,
            tendered,
            change = change.total(),
            coins = change.coin_count(),
            total = self.total(),
            "Sale completed"
        );
        Ok(change)
    }
}

impl Default for Register {
    /// An empty U.S. coin register.
    fn default() -> Self {
        Self::with_currency(Currency::default())
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inventory, f)
    }
}

// =============================================================================
// Shared Register
// =============================================================================

/// A register shared between threads.
///
/// ## Thread Safety
/// Uses `Arc<Mutex<Register>>`:
/// - `Arc`: shared ownership across threads (clone the handle)
/// - `Mutex`: every operation runs start to finish under one lock
///
/// Bundles passed to `add_bundle`/`remove_bundle` are read by reference
/// while only this register's lock is held, so there is no lock ordering
/// between registers.
///
/// A poisoned lock is recovered: mutations validate before writing, so a
/// panic elsewhere cannot have left the inventory half-updated.
#[derive(Debug, Clone)]
pub struct SharedRegister {
    register: Arc<Mutex<Register>>,
}

impl SharedRegister {
    /// Wraps a register for shared use.
    pub fn new(register: Register) -> Self {
        SharedRegister {
            register: Arc::new(Mutex::new(register)),
        }
    }

    /// Executes a function with read access to the register.
    ///
    /// ## Usage
    /// ```rust
    /// use till_core::{Register, SharedRegister};
    ///
    /// let shared = SharedRegister::new(Register::default());
    /// let (total, coins) = shared.with_register(|r| (r.total(), r.coin_count()));
    /// assert_eq!((total, coins), (0, 0));
    /// ```
    pub fn with_register<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Register) -> R,
    {
        let register = self.register.lock().unwrap_or_else(PoisonError::into_inner);
        f(&register)
    }

    /// Executes a function with write access to the register.
    pub fn with_register_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Register) -> R,
    {
        let mut register = self.register.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut register)
    }

    pub fn total(&self) -> i64 {
        self.with_register(Register::total)
    }

    pub fn coin_count(&self) -> i64 {
        self.with_register(Register::coin_count)
    }

    /// Copy of the current inventory.
    pub fn inventory(&self) -> CoinMultiset {
        self.with_register(|r| r.inventory().duplicate())
    }

    /// Creates an empty bundle bound to the register's table.
    pub fn create_bundle(&self) -> CoinMultiset {
        self.with_register(Register::create_bundle)
    }

    pub fn add_coins(&self, denomination: i64, count: i64) -> TillResult<()> {
        self.with_register_mut(|r| r.add_coins(denomination, count))
    }

    pub fn remove_coins(&self, denomination: i64, count: i64) -> TillResult<()> {
        self.with_register_mut(|r| r.remove_coins(denomination, count))
    }

    pub fn add_bundle(&self, bundle: &CoinMultiset) -> TillResult<()> {
        self.with_register_mut(|r| r.add_bundle(bundle))
    }

    pub fn remove_bundle(&self, bundle: &CoinMultiset) -> TillResult<()> {
        self.with_register_mut(|r| r.remove_bundle(bundle))
    }

    pub fn clear(&self) {
        self.with_register_mut(Register::clear)
    }

    /// Makes a sale with the pre-check, search and commit under one lock.
    pub fn sale(&self, cost: i64, tendered: i64) -> TillResult<CoinMultiset> {
        self.with_register_mut(|r| r.sale(cost, tendered))
    }
}

impl From<Register> for SharedRegister {
    fn from(register: Register) -> Self {
        SharedRegister::new(register)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::usd::{DIME, NICKEL, PENNY, QUARTER};
    use std::thread;

    fn register_with(values: &[i64], counts: &[i64]) -> Register {
        let mut register = Register::from_denominations(values).unwrap();
        let bundle = register.bundle_from_counts(counts).unwrap();
        register.add_bundle(&bundle).unwrap();
        register
    }

    #[test]
    fn test_basic_inventory_operations() {
        let mut register = Register::default();
        register.add_coins(DIME, 5).unwrap();
        register.remove_coins(DIME, 2).unwrap();
        register.remove_coins(DIME, 1).unwrap();
        assert!(matches!(
            register.remove_coins(DIME, 3),
            Err(TillError::InsufficientCoins { .. })
        ));
        register.remove_coins(DIME, 2).unwrap();
        assert_eq!(register.total(), 0);

        register.add_coin(PENNY).unwrap();
        register.remove_coin(PENNY).unwrap();
        assert_eq!(register.coin_count(), 0);

        assert!(register.is_valid_coin(QUARTER));
        assert!(!register.is_valid_coin(3));
        assert_eq!(register.add_coins(3, 1), Err(TillError::UnknownDenomination(3)));
        assert_eq!(register.add_coins(PENNY, -1), Err(TillError::InvalidCount(-1)));
    }

    #[test]
    fn test_sale_from_large_inventory() {
        let mut register = Register::default();
        register.add_coins(PENNY, 10).unwrap();
        register.add_coins(NICKEL, 10).unwrap();
        register.add_coins(DIME, 100).unwrap();
        register.add_coins(QUARTER, 100).unwrap();
        assert_eq!(register.total(), 3560);

        let change = register.sale(60, 90).unwrap();
        assert_eq!(change.total(), 30);
        assert_eq!(register.total(), 3530);
    }

    #[test]
    fn test_sale_sequence_drains_register() {
        let mut register = Register::default();
        register.add_coins(PENNY, 10).unwrap();
        register.add_coins(NICKEL, 5).unwrap();
        register.add_coins(DIME, 5).unwrap();
        register.add_coins(QUARTER, 1).unwrap();
        assert_eq!(register.total(), 110);

        let change = register.sale(25, 30).unwrap();
        assert_eq!((change.coin_count(), change.total()), (1, 5));
        assert_eq!(register.total(), 105);

        let change = register.sale(25, 25).unwrap();
        assert_eq!((change.coin_count(), change.total()), (0, 0));
        assert_eq!(register.total(), 105);

        let change = register.sale(1, 26).unwrap();
        assert_eq!(change.counts(), &[0, 0, 0, 1, 0]);
        assert_eq!(register.total(), 80);

        // Quarters are gone: 2 dimes + 1 nickel.
        let change = register.sale(1, 26).unwrap();
        assert_eq!(change.counts(), &[0, 1, 2, 0, 0]);
        assert_eq!(register.total(), 55);

        // 3 dimes + 1 nickel + 2 pennies.
        let change = register.sale(1, 38).unwrap();
        assert_eq!((change.coin_count(), change.total()), (6, 37));
        assert_eq!(register.total(), 18);

        assert_eq!(
            register.sale(1, 20),
            Err(TillError::InsufficientRegisterTotal {
                available: 18,
                required: 19
            })
        );
        assert_eq!(register.total(), 18);
    }

    #[test]
    fn test_dimes_then_quarter_and_pennies() {
        let mut register = register_with(&[1, 10, 25], &[5, 3, 1]);
        assert_eq!(register.total(), 60);

        let change = register.sale(0, 30).unwrap();
        assert_eq!(change.counts(), &[0, 3, 0]);
        assert_eq!(register.total(), 30);

        let change = register.sale(0, 30).unwrap();
        assert_eq!(change.counts(), &[5, 0, 1]);
        assert_eq!(change.coin_count(), 6);
        assert_eq!(register.total(), 0);
    }

    #[test]
    fn test_other_tables() {
        let mut register = register_with(&[1, 2, 3], &[2, 2, 2]);
        let change = register.sale(1, 8).unwrap();
        assert_eq!((change.coin_count(), change.total()), (3, 7));
        assert_eq!(register.total(), 5);

        let mut register = register_with(&[1, 5, 10, 21, 25], &[2, 2, 2, 2, 2]);
        let change = register.sale(1, 65).unwrap();
        assert_eq!((change.coin_count(), change.total()), (6, 64));
        assert_eq!(register.total(), 60);
    }

    #[test]
    fn test_no_exact_change_leaves_inventory_unchanged() {
        let mut register = register_with(&[1, 5], &[0, 2]);
        let before = register.inventory().duplicate();
        assert_eq!(
            register.sale(0, 8),
            Err(TillError::NoExactChangeAvailable { amount: 8 })
        );
        assert_eq!(register.inventory(), &before);
    }

    #[test]
    fn test_invalid_sale_arguments() {
        let mut register = register_with(&[1], &[100]);
        for (cost, tendered) in [(10, 5), (-1, 5), (0, -5)] {
            assert!(matches!(
                register.sale(cost, tendered),
                Err(TillError::InvalidSaleArguments { .. })
            ));
        }
        assert_eq!(register.total(), 100);
    }

    #[test]
    fn test_bundles_from_another_register_are_rejected() {
        let mut a = Register::default();
        let b = Register::default();
        let foreign = b.bundle_from_counts(&[1, 1, 1, 1, 1]).unwrap();
        assert_eq!(a.add_bundle(&foreign), Err(TillError::MismatchedTable));
        assert_eq!(a.remove_bundle(&foreign), Err(TillError::MismatchedTable));
        assert_eq!(a.total(), 0);
    }

    #[test]
    fn test_remove_bundle_saturates_and_clear_resets() {
        let mut register = register_with(&[1, 5, 10], &[1, 1, 1]);
        let bundle = register.bundle_from_counts(&[5, 0, 1]).unwrap();
        register.remove_bundle(&bundle).unwrap();
        assert_eq!(register.inventory().counts(), &[0, 1, 0]);

        register.clear();
        register.clear();
        assert_eq!(register.total(), 0);
        assert_eq!(register.coin_count(), 0);
    }

    #[test]
    fn test_display_shows_inventory() {
        let register = register_with(&[1, 5], &[2, 1]);
        assert_eq!(register.to_string(), "Total: $0.07; [1]: 2, [5]: 1");
    }

    #[test]
    fn test_shared_register_conserves_value_under_concurrent_sales() {
        let shared = SharedRegister::new(register_with(&[1, 5, 10, 25], &[40, 40, 40, 40]));
        let start = shared.total();

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let mut handed_out = 0;
                    for round in 0..20 {
                        let due = 1 + (worker * 7 + round * 3) % 40;
                        if let Ok(change) = shared.sale(0, due) {
                            assert_eq!(change.total(), due);
                            handed_out += change.total();
                        }
                        if round % 5 == 0 {
                            shared.add_coins(5, 1).unwrap();
                            handed_out -= 5;
                        }
                    }
                    handed_out
                })
            })
            .collect();

        let net_out: i64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(shared.total(), start - net_out);

        let inventory = shared.inventory();
        assert!(inventory.counts().iter().all(|&c| c >= 0));
        assert_eq!(inventory.total(), shared.total());
    }

    #[test]
    fn test_shared_register_delegates() {
        let shared: SharedRegister = Register::default().into();
        let mut bundle = shared.create_bundle();
        bundle.add(QUARTER, 2).unwrap();

        shared.add_bundle(&bundle).unwrap();
        shared.add_coins(DIME, 1).unwrap();
        shared.remove_coins(DIME, 1).unwrap();
        assert_eq!(shared.total(), 50);
        assert_eq!(shared.coin_count(), 2);

        shared.remove_bundle(&bundle).unwrap();
        assert_eq!(shared.total(), 0);

        shared.add_coins(QUARTER, 1).unwrap();
        shared.clear();
        assert_eq!(shared.with_register_mut(|r| r.sale(0, 0)).unwrap().total(), 0);
    }
}
