//! Destroy and repair operators.
//!
//! Every operator implements [`Operator`]: it declares the per-node columns it
//! needs and transforms a [`SolutionState`] in place. The orchestrators store
//! operators as the tagged variants [`DestroyOperator`] and [`RepairOperator`],
//! which the [`registry`] builds from stable operator names.

mod destroy;
pub mod registry;
mod repair;

pub use destroy::RandomDestroy;
pub use registry::{OperatorContext, OperatorKind, OperatorName};
pub use repair::{GreedyRepair, Priority, RandomRepair};

use crate::state::{ColumnSet, SolutionState};
use rand::Rng;

/// A transformation of a solution state.
pub trait Operator: Send + Sync {
    /// Stable operator name.
    fn name(&self) -> &str;

    /// Columns the transform reads.
    fn required_columns(&self) -> ColumnSet;

    /// Applies the transform, assuming columns are allocated and current.
    fn apply<R: Rng>(&self, state: &mut SolutionState, rng: &mut R);

    /// Makes sure the required columns exist and are current, then applies
    /// the transform. The state must already be materialized.
    fn operate<R: Rng>(&self, state: &mut SolutionState, rng: &mut R) {
        debug_assert!(state.is_materialized(), "operate on an unmaterialized state");
        state.register_columns(self.required_columns());
        state.sync_columns();
        self.apply(state, rng);
    }
}

/// Operators that shrink S.
#[derive(Debug, Clone, PartialEq)]
pub enum DestroyOperator {
    Random(RandomDestroy),
}

impl Operator for DestroyOperator {
    fn name(&self) -> &str {
        match self {
            DestroyOperator::Random(op) => op.name(),
        }
    }

    fn required_columns(&self) -> ColumnSet {
        match self {
            DestroyOperator::Random(op) => op.required_columns(),
        }
    }

    fn apply<R: Rng>(&self, state: &mut SolutionState, rng: &mut R) {
        match self {
            DestroyOperator::Random(op) => op.apply(state, rng),
        }
    }
}

impl From<RandomDestroy> for DestroyOperator {
    fn from(op: RandomDestroy) -> Self {
        DestroyOperator::Random(op)
    }
}

/// Operators that grow S until no node is left non-dominated.
#[derive(Debug, Clone, PartialEq)]
pub enum RepairOperator {
    Random(RandomRepair),
    Greedy(GreedyRepair),
}

impl Operator for RepairOperator {
    fn name(&self) -> &str {
        match self {
            RepairOperator::Random(op) => op.name(),
            RepairOperator::Greedy(op) => op.name(),
        }
    }

    fn required_columns(&self) -> ColumnSet {
        match self {
            RepairOperator::Random(op) => op.required_columns(),
            RepairOperator::Greedy(op) => op.required_columns(),
        }
    }

    fn apply<R: Rng>(&self, state: &mut SolutionState, rng: &mut R) {
        match self {
            RepairOperator::Random(op) => op.apply(state, rng),
            RepairOperator::Greedy(op) => op.apply(state, rng),
        }
    }
}

impl From<RandomRepair> for RepairOperator {
    fn from(op: RandomRepair) -> Self {
        RepairOperator::Random(op)
    }
}

impl From<GreedyRepair> for RepairOperator {
    fn from(op: GreedyRepair) -> Self {
        RepairOperator::Greedy(op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Graph, GraphBuilder};
    use crate::random::create_rng;
    use crate::state::Column;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn random_graph(n: usize, p: f64, seed: u64) -> Arc<Graph> {
        let mut rng = create_rng(seed);
        let mut builder = GraphBuilder::new(n);
        for u in 0..n {
            for v in (u + 1)..n {
                if rng.random_bool(p) {
                    builder.add_edge(u, v).unwrap();
                }
            }
        }
        Arc::new(builder.build())
    }

    fn all_repairs(alpha: f64) -> Vec<RepairOperator> {
        vec![
            RandomRepair.into(),
            GreedyRepair::degree(alpha).unwrap().into(),
            GreedyRepair::least_dominated(alpha).unwrap().into(),
            GreedyRepair::hybrid_dominated(alpha).unwrap().into(),
            GreedyRepair::hybrid_degree(alpha).unwrap().into(),
        ]
    }

    fn prepared_state(graph: Arc<Graph>, k: u32, repairs: &[RepairOperator]) -> SolutionState {
        let mut state = SolutionState::new(graph, k).unwrap();
        for op in repairs {
            state.register_columns(op.required_columns());
        }
        state.materialize();
        state
    }

    #[test]
    fn test_every_repair_reaches_feasibility() {
        let graph = random_graph(40, 0.15, 3);
        for k in 1..=3 {
            for op in all_repairs(0.3) {
                let mut rng = create_rng(11);
                let mut state = prepared_state(Arc::clone(&graph), k, &[op.clone()]);
                op.operate(&mut state, &mut rng);
                assert!(state.non_dominated().is_empty(), "{} k={k}", op.name());
                assert!(state.is_feasible(), "{} k={k}", op.name());
                assert!(state.invariants_hold(), "{} k={k}", op.name());
            }
        }
    }

    #[test]
    fn test_operate_allocates_missing_columns() {
        let graph = random_graph(12, 0.3, 5);
        let mut state = SolutionState::new(graph, 1).unwrap();
        state.materialize();
        assert!(!state.columns().contains(Column::Weight));
        let op: RepairOperator = GreedyRepair::hybrid_degree(0.0).unwrap().into();
        let mut rng = create_rng(0);

        op.operate(&mut state, &mut rng);
        assert!(state.columns().contains(Column::Weight));
        assert!(state.is_feasible());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "unmaterialized")]
    fn test_operate_requires_materialized_state() {
        let mut state = SolutionState::new(random_graph(6, 0.5, 2), 1).unwrap();
        RandomRepair.operate(&mut state, &mut create_rng(0));
    }

    #[test]
    fn test_same_seed_same_solution() {
        let graph = random_graph(50, 0.1, 8);
        let repairs = all_repairs(0.5);
        let destroy: DestroyOperator = RandomDestroy::new(0.4).unwrap().into();

        let run = |seed: u64| {
            let mut rng = create_rng(seed);
            let mut state = prepared_state(Arc::clone(&graph), 2, &repairs);
            RandomRepair.operate(&mut state, &mut rng);
            for i in 0..20 {
                destroy.operate(&mut state, &mut rng);
                repairs[i % repairs.len()].operate(&mut state, &mut rng);
            }
            state.solution().sorted()
        };

        assert_eq!(run(99), run(99));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_incremental_matches_recomputed(
            graph_seed in 0u64..1_000,
            run_seed in 0u64..1_000,
            n in 5usize..40,
            k in 1u32..4,
            factor in 0.05f64..0.95,
            alpha in 0.0f64..=1.0,
            sequence in proptest::collection::vec(0usize..5, 1..25),
        ) {
            let graph = random_graph(n, 0.2, graph_seed);
            let repairs = all_repairs(alpha);
            let destroy: DestroyOperator = RandomDestroy::new(factor).unwrap().into();
            let mut rng = create_rng(run_seed);

            let mut state = prepared_state(graph, k, &repairs);
            RandomRepair.operate(&mut state, &mut rng);
            prop_assert!(state.invariants_hold());

            for &pick in &sequence {
                destroy.operate(&mut state, &mut rng);
                prop_assert!(state.invariants_hold());
                prop_assert!(state.bookkeeping_eq(&state.recomputed()));

                let repair = &repairs[pick];
                repair.operate(&mut state, &mut rng);
                prop_assert!(state.invariants_hold());
                prop_assert!(state.non_dominated().is_empty());
                prop_assert!(state.is_feasible());
                prop_assert!(state.bookkeeping_eq(&state.recomputed()), "after {}", repair.name());
            }
        }
    }
}
