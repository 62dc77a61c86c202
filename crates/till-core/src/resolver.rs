//! # Change Resolver
//!
//! Finds the fewest coins that sum *exactly* to an amount, using only the
//! coins on hand.
//!
//! ## Why Not the Textbook DP?
//! The classic coin-change dynamic program assumes an unlimited supply of
//! every denomination. A till has a finite count of each coin, and greedy
//! selection is wrong for tables such as `[1, 5, 10, 21, 25]`. The resolver
//! instead runs a depth-first branch-and-bound search over the actual
//! inventory.
//!
//! ## Search Shape
//! ```text
//! frame(cursor, remaining)            candidates: indices below cursor
//!   i = next candidate, largest first
//!     skip i if no coins of it are left
//!     after = remaining - value[i]
//!     after <  0  → try the next smaller coin
//!     after == 0  → exact hit: record if fewer coins than best, close frame
//!     after >  0  → take one coin of i, push frame(i + 1, after)
//!   no candidates left → pop frame, put its coin back
//! ```
//!
//! A child frame may reuse its own denomination, so choosing coins in
//! non-increasing index order visits every combination once. Frames live in
//! a `Vec`, so a six-figure pile of pennies costs heap, not call stack.
//!
//! An exact hit closes its frame: one coin is the cheapest completion there is.
//!
//! ## Pruning
//! Before a frame is pushed, the resolver counts the fewest coins that could
//! still cover the remainder: walk the coins left on hand from the largest
//! down, taking as many as needed. If even all of them fall short the branch
//! is dead. Otherwise the branch is cut when that count plus the coins already
//! taken cannot beat the best solution so far. Taking the largest coins first
//! makes the first solution close to greedy, so the bound is tight early.
//!
//! The search works on its own scratch vectors; it never sees the caller's
//! live inventory.

use std::sync::Arc;

use tracing::trace;

use crate::bundle::CoinMultiset;
use crate::denomination::DenominationTable;

/// Exact-change search over a finite coin supply.
pub struct ChangeResolver;

impl ChangeResolver {
    /// Resolves `target` against `available` counts (parallel to the table).
    ///
    /// ## Returns
    /// - `Some(empty bundle)` when `target <= 0`
    /// - `Some(bundle)` with the fewest coins summing exactly to `target`
    /// - `None` when no combination of the available coins sums to `target`
    ///
    /// Counts missing from a short `available` slice, and negative counts,
    /// are treated as zero.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::{ChangeResolver, DenominationTable};
    ///
    /// let table = DenominationTable::shared(&[1, 5, 10, 21, 25]).unwrap();
    /// let change = ChangeResolver::resolve(&table, &[2, 2, 2, 2, 2], 64).unwrap();
    /// assert_eq!(change.counts(), &[2, 0, 2, 2, 0]);
    /// assert_eq!(change.coin_count(), 6);
    ///
    /// assert!(ChangeResolver::resolve(&table, &[0, 2, 0, 0, 0], 8).is_none());
    /// ```
    pub fn resolve(
        table: &Arc<DenominationTable>,
        available: &[i64],
        target: i64,
    ) -> Option<CoinMultiset> {
        if target <= 0 {
            return Some(CoinMultiset::new(Arc::clone(table)));
        }

        let mut search = Search::new(table.values(), available);
        search.run(target);

        trace!(
            target,
            nodes = search.nodes,
            coins = search.best_coins,
            "Change search finished"
        );

        search
            .best
            .map(|counts| CoinMultiset::from_trusted_counts(Arc::clone(table), counts))
    }
}

/// One level of the search: the coin taken to reach it and what is left.
#[derive(Debug, Clone, Copy)]
struct Frame {
    /// Candidates are the indices below `cursor`.
    cursor: usize,
    remaining: i64,
    taken: Option<usize>,
}

/// Scratch state for one resolution.
struct Search<'a> {
    values: &'a [i64],
    /// Coins still available, decremented as coins are taken.
    working: Vec<i64>,
    /// Coins taken on the current branch.
    partial: Vec<i64>,
    partial_coins: i64,
    frames: Vec<Frame>,
    best: Option<Vec<i64>>,
    best_coins: Option<i64>,
    nodes: u64,
}

impl<'a> Search<'a> {
    fn new(values: &'a [i64], available: &[i64]) -> Self {
        let working = (0..values.len())
            .map(|i| available.get(i).copied().unwrap_or(0).max(0))
            .collect();

        Search {
            values,
            working,
            partial: vec![0; values.len()],
            partial_coins: 0,
            frames: Vec::new(),
            best: None,
            best_coins: None,
            nodes: 0,
        }
    }

    fn run(&mut self, target: i64) {
        let len = self.values.len();
        if !self.worth_exploring(len, target) {
            return;
        }
        self.frames.push(Frame {
            cursor: len,
            remaining: target,
            taken: None,
        });

        while let Some(&Frame {
            cursor,
            remaining,
            taken,
        }) = self.frames.last()
        {
            if cursor == 0 {
                self.frames.pop();
                if let Some(i) = taken {
                    self.put_back(i);
                }
                continue;
            }

            let i = cursor - 1;
            self.set_cursor(i);

            if self.working[i] <= 0 {
                continue;
            }

            let after = remaining - self.values[i];
            if after < 0 {
                continue;
            }

            if after == 0 {
                self.record(i);
                self.set_cursor(0);
                continue;
            }

            self.take(i);
            if self.worth_exploring(i + 1, after) {
                self.frames.push(Frame {
                    cursor: i + 1,
                    remaining: after,
                    taken: Some(i),
                });
            } else {
                self.put_back(i);
            }
        }
    }

    /// Counts a node and decides whether a frame over indices below `limit`
    /// can still beat the best solution.
    fn worth_exploring(&mut self, limit: usize, remaining: i64) -> bool {
        self.nodes += 1;

        match self.fewest_to_cover(limit, remaining) {
            None => false,
            Some(fewest) => self
                .best_coins
                .map_or(true, |best| self.partial_coins + fewest < best),
        }
    }

    /// Fewest coins among indices below `limit` whose sum reaches `remaining`,
    /// or `None` if all of them together fall short.
    fn fewest_to_cover(&self, limit: usize, remaining: i64) -> Option<i64> {
        let mut left = remaining;
        let mut coins = 0i64;

        for i in (0..limit).rev() {
            let (value, have) = (self.values[i], self.working[i]);
            if have <= 0 {
                continue;
            }
            let needed = left / value + i64::from(left % value != 0);
            if needed <= have {
                return Some(coins + needed);
            }
            coins += have;
            left -= have * value;
        }

        None
    }

    fn set_cursor(&mut self, cursor: usize) {
        if let Some(top) = self.frames.last_mut() {
            top.cursor = cursor;
        }
    }

    fn take(&mut self, i: usize) {
        self.working[i] -= 1;
        self.partial[i] += 1;
        self.partial_coins += 1;
    }

    fn put_back(&mut self, i: usize) {
        self.partial_coins -= 1;
        self.partial[i] -= 1;
        self.working[i] += 1;
    }

    /// Records the current branch plus one coin of `last` as a solution.
    fn record(&mut self, last: usize) {
        let coins = self.partial_coins + 1;
        if self.best_coins.is_some_and(|best| coins >= best) {
            return;
        }

        let mut solution = self.partial.clone();
        solution[last] += 1;
        self.best = Some(solution);
        self.best_coins = Some(coins);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn table(values: &[i64]) -> Arc<DenominationTable> {
        DenominationTable::shared(values).unwrap()
    }

    /// Minimum coin count over every sub-multiset of `available`, by enumeration.
    fn brute_force_min(values: &[i64], available: &[i64], target: i64) -> Option<i64> {
        fn go(
            values: &[i64],
            available: &[i64],
            index: usize,
            remaining: i64,
            coins: i64,
            best: &mut Option<i64>,
        ) {
            if index == values.len() {
                if remaining == 0 && best.map_or(true, |b| coins < b) {
                    *best = Some(coins);
                }
                return;
            }
            for n in 0..=available[index] {
                let left = remaining - n * values[index];
                if left < 0 {
                    break;
                }
                go(values, available, index + 1, left, coins + n, best);
            }
        }

        let mut best = None;
        go(values, available, 0, target, 0, &mut best);
        best
    }

    #[test]
    fn test_non_positive_target_is_empty_solution() {
        let t = table(&[1, 5]);
        for target in [0, -7] {
            let change = ChangeResolver::resolve(&t, &[0, 0], target).unwrap();
            assert!(change.is_empty());
            assert_eq!(change.total(), 0);
        }
    }

    #[test]
    fn test_prefers_fewest_coins_over_greedy() {
        // Greedy would take 25 first and then need 25 + 21 + ... (fails or is longer).
        let t = table(&[1, 5, 10, 21, 25]);
        let change = ChangeResolver::resolve(&t, &[2, 2, 2, 2, 2], 64).unwrap();
        assert_eq!(change.total(), 64);
        assert_eq!(change.coin_count(), 6);
        assert_eq!(change.counts(), &[2, 0, 2, 2, 0]);
    }

    #[test]
    fn test_small_table() {
        let t = table(&[1, 2, 3]);
        let change = ChangeResolver::resolve(&t, &[2, 2, 2], 7).unwrap();
        assert_eq!(change.total(), 7);
        assert_eq!(change.coin_count(), 3);
    }

    #[test]
    fn test_respects_finite_supply() {
        let t = table(&[1, 10, 25]);
        let change = ChangeResolver::resolve(&t, &[5, 0, 1], 30).unwrap();
        assert_eq!(change.counts(), &[5, 0, 1]);
        assert_eq!(change.coin_count(), 6);
    }

    #[test]
    fn test_infeasible_even_with_enough_value() {
        let t = table(&[1, 5]);
        assert!(ChangeResolver::resolve(&t, &[0, 2], 8).is_none());
        assert!(ChangeResolver::resolve(&t, &[3, 0], 4).is_none());
    }

    #[test]
    fn test_short_and_negative_available_counts_are_zero() {
        let t = table(&[1, 5, 10]);
        assert!(ChangeResolver::resolve(&t, &[-3], 1).is_none());
        let change = ChangeResolver::resolve(&t, &[1], 1).unwrap();
        assert_eq!(change.counts(), &[1, 0, 0]);
    }

    #[test]
    fn test_result_is_bound_to_table() {
        let t = table(&[1, 5]);
        let change = ChangeResolver::resolve(&t, &[5, 5], 6).unwrap();
        assert_eq!(change.table().id(), t.id());
    }

    #[test]
    fn test_six_figure_penny_pile() {
        let t = table(&[1, 5]);
        let change = ChangeResolver::resolve(&t, &[300_000, 0], 300_000).unwrap();
        assert_eq!(change.counts(), &[300_000, 0]);
        assert_eq!(change.coin_count(), 300_000);
    }

    #[test]
    fn test_full_usd_till_stays_shallow() {
        let t = table(&[1, 5, 10, 25, 50]);
        let mut search = Search::new(t.values(), &[100; 5]);
        search.run(8999);

        assert_eq!(search.best_coins, Some(403));
        assert_eq!(search.best.as_deref(), Some(&[4, 99, 100, 100, 100][..]));
        assert!(search.nodes < 10_000, "visited {} nodes", search.nodes);
    }

    #[test]
    fn test_short_supply_is_cut_before_searching() {
        let t = table(&[1, 5, 10, 25, 50]);
        let mut search = Search::new(t.values(), &[100; 5]);
        search.run(9101);

        assert!(search.best.is_none());
        assert_eq!(search.nodes, 1);
    }

    #[test]
    fn test_matches_brute_force_on_random_inventories() {
        let mut rng = StdRng::seed_from_u64(0x5eed_c0de);
        let pool = [2, 3, 4, 5, 6, 7, 10, 12, 20, 25];

        for _ in 0..300 {
            let mut values = vec![1];
            for _ in 0..rng.gen_range(0..4) {
                values.push(pool[rng.gen_range(0..pool.len())]);
            }
            let t = table(&values);
            let values = t.values().to_vec();

            let available: Vec<i64> = values.iter().map(|_| rng.gen_range(0..=3)).collect();
            let capacity: i64 = values.iter().zip(&available).map(|(v, c)| v * c).sum();
            let target = rng.gen_range(0..=capacity + 2);

            let expected = brute_force_min(&values, &available, target);
            let actual = ChangeResolver::resolve(&t, &available, target);

            match (expected, actual) {
                (None, None) => {}
                (Some(min), Some(change)) => {
                    assert_eq!(change.total(), target, "values {:?}", values);
                    assert_eq!(change.coin_count(), min, "values {:?}", values);
                    for (used, have) in change.counts().iter().zip(&available) {
                        assert!(used <= have);
                    }
                }
                (expected, actual) => panic!(
                    "values {:?} available {:?} target {}: expected {:?}, got {:?}",
                    values, available, target, expected, actual
                ),
            }
        }
    }
}
