//! Acceptance criteria.
//!
//! An [`AcceptStrategy`] classifies a repaired candidate against the best and
//! current solutions. The orchestrator applies the replacement implied by the
//! returned [`Outcome`]:
//!
//! | Outcome    | best      | current   |
//! |------------|-----------|-----------|
//! | `Best`     | candidate | candidate |
//! | `Better`   | kept      | candidate |
//! | `Accepted` | kept      | candidate |
//! | `Rejected` | kept      | kept      |

mod simulated_annealing;

pub use simulated_annealing::SimulatedAnnealing;

use crate::outcome::Outcome;
use rand::Rng;

/// Candidate filter with its own cooling or aging state.
pub trait AcceptStrategy {
    /// Classifies a candidate given the objective values (`|S|`, minimized)
    /// of the best, current and candidate solutions.
    fn evaluate<R: Rng>(&self, best: usize, current: usize, candidate: usize, rng: &mut R) -> Outcome {
        if candidate < best {
            Outcome::Best
        } else if candidate < current {
            Outcome::Better
        } else if self.accept(current, candidate, rng) {
            Outcome::Accepted
        } else {
            Outcome::Rejected
        }
    }

    /// Whether a candidate that does not improve on `current` replaces it.
    fn accept<R: Rng>(&self, current: usize, candidate: usize, rng: &mut R) -> bool;

    /// Moves to the next iteration.
    fn advance(&mut self);

    /// Restores the initial state for a fresh run.
    fn reset(&mut self);
}
