//! Operator selection strategies.

mod roulette;

pub use roulette::{OperatorStats, RouletteWheelSelect, SegmentSnapshot};

use crate::outcome::Outcome;
use rand::Rng;

/// Chooses the destroy/repair pair of each iteration and learns from outcomes.
pub trait SelectStrategy {
    /// Returns `(destroy_index, repair_index)`.
    fn select<R: Rng>(&mut self, rng: &mut R) -> (usize, usize);

    /// Credits the outcome of the pair chosen by the last [`select`](Self::select).
    ///
    /// Returns a snapshot when the call closed a segment and weights changed.
    fn record(&mut self, destroy: usize, repair: usize, outcome: Outcome) -> Option<SegmentSnapshot>;

    /// Restores initial weights and clears every accumulator.
    fn reset(&mut self);

    /// Number of destroy operators the strategy picks from.
    fn num_destroy(&self) -> usize;

    /// Number of repair operators the strategy picks from.
    fn num_repair(&self) -> usize;

    /// Current `(destroy, repair)` weights.
    fn weights(&self) -> (Vec<f64>, Vec<f64>) {
        (vec![1.0; self.num_destroy()], vec![1.0; self.num_repair()])
    }
}

/// Always picks the first destroy and the first repair operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedPair;

impl SelectStrategy for FixedPair {
    fn select<R: Rng>(&mut self, _rng: &mut R) -> (usize, usize) {
        (0, 0)
    }

    fn record(&mut self, _destroy: usize, _repair: usize, _outcome: Outcome) -> Option<SegmentSnapshot> {
        None
    }

    fn reset(&mut self) {}

    fn num_destroy(&self) -> usize {
        1
    }

    fn num_repair(&self) -> usize {
        1
    }
}
