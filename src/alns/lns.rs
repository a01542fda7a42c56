//! Large Neighborhood Search with one destroy and one repair operator.

use super::config::AlnsConfig;
use super::runner::Alns;
use crate::accept::{AcceptStrategy, SimulatedAnnealing};
use crate::error::{AlnsError, Result};
use crate::events::EventHandler;
use crate::operators::{DestroyOperator, RepairOperator};
use crate::random::{create_rng, create_rng_from_entropy, SearchRng};
use crate::select::FixedPair;
use crate::state::SolutionState;
use crate::statistics::Statistics;
use crate::stop::StopCondition;
use std::cell::Ref;

/// The ALNS loop specialised to a single destroy/repair pair.
///
/// Setting an operator replaces the previous one of the same kind.
#[derive(Debug)]
pub struct Lns<A = SimulatedAnnealing> {
    inner: Alns<A, FixedPair>,
}

impl<A: AcceptStrategy> Lns<A> {
    pub fn new(stop: StopCondition, accept: A, rng: SearchRng) -> Self {
        Self {
            inner: Alns::new(stop, accept, FixedPair, rng).with_operator_tracking(false),
        }
    }

    pub fn with_statistics(mut self, track: bool) -> Self {
        self.inner = self.inner.with_statistics(track);
        self
    }

    pub fn set_destroy_operator(&mut self, op: impl Into<DestroyOperator>) {
        self.inner.set_single_pair(Some(op.into()), None);
    }

    pub fn set_repair_operator(&mut self, op: impl Into<RepairOperator>) {
        self.inner.set_single_pair(None, Some(op.into()));
    }

    pub fn destroy_operator(&self) -> Option<&DestroyOperator> {
        self.inner.destroy_operators().first()
    }

    pub fn repair_operator(&self) -> Option<&RepairOperator> {
        self.inner.repair_operators().first()
    }

    pub fn stop_condition(&self) -> &StopCondition {
        self.inner.stop_condition()
    }

    pub fn accept_strategy(&self) -> &A {
        self.inner.accept_strategy()
    }

    pub fn events_mut(&mut self) -> &mut EventHandler {
        self.inner.events_mut()
    }

    pub fn statistics(&self) -> Ref<'_, Statistics> {
        self.inner.statistics()
    }

    pub fn reset(&mut self, rng: SearchRng) {
        self.inner.reset(rng);
    }

    /// Runs the search; fails when either operator has not been set.
    pub fn execute(&mut self, initial: SolutionState) -> Result<SolutionState> {
        self.inner.execute(initial)
    }
}

impl Lns {
    /// Builds an LNS engine from the first destroy and first repair operator
    /// named in `config`.
    pub fn from_config(config: &AlnsConfig) -> Result<Self> {
        config.validate()?;
        let destroy = config.build_destroy_operators()?;
        let repair = config.build_repair_operators()?;
        let rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng_from_entropy(),
        };

        let mut lns = Lns::new(config.build_stop()?, config.build_accept()?, rng);
        match (destroy.into_iter().next(), repair.into_iter().next()) {
            (Some(d), Some(r)) => {
                lns.set_destroy_operator(d);
                lns.set_repair_operator(r);
                Ok(lns)
            }
            (d, r) => Err(AlnsError::MissingOperators {
                destroy: usize::from(d.is_some()),
                repair: usize::from(r.is_some()),
            }),
        }
    }
}
