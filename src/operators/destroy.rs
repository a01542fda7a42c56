use super::Operator;
use crate::error::{AlnsError, Result};
use crate::state::{Column, ColumnSet, SolutionState};
use rand::Rng;

/// Removes `floor(factor * |S|)` uniformly chosen members of S.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomDestroy {
    factor: f64,
}

impl RandomDestroy {
    pub const NAME: &'static str = "random_destroy";

    /// Creates the operator; `factor` must lie strictly between 0 and 1.
    pub fn new(factor: f64) -> Result<Self> {
        if !(factor > 0.0 && factor < 1.0) {
            return Err(AlnsError::config(format!(
                "destroy factor must be in (0, 1), got {factor}"
            )));
        }
        Ok(Self { factor })
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Number of members removed from a solution of size `len`.
    pub fn removal_count(&self, len: usize) -> usize {
        (self.factor * len as f64).floor() as usize
    }
}

impl Operator for RandomDestroy {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn required_columns(&self) -> ColumnSet {
        ColumnSet::of(&[Column::KRemaining])
    }

    fn apply<R: Rng>(&self, state: &mut SolutionState, rng: &mut R) {
        let members = state.solution().as_slice();
        let count = self.removal_count(members.len());
        if count == 0 {
            return;
        }
        let picked: Vec<usize> = rand::seq::index::sample(rng, members.len(), count)
            .iter()
            .map(|i| members[i])
            .collect();
        for node in picked {
            state.remove_from_solution(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::operators::RandomRepair;
    use crate::random::create_rng;
    use std::sync::Arc;

    #[test]
    fn test_factor_validation() {
        assert!(RandomDestroy::new(0.0).is_err());
        assert!(RandomDestroy::new(1.0).is_err());
        assert!(RandomDestroy::new(f64::NAN).is_err());
        assert!(RandomDestroy::new(0.5).is_ok());
    }

    #[test]
    fn test_removes_floor_of_fraction() {
        let graph = Arc::new(Graph::new(10));
        let mut state = SolutionState::new(graph, 1).unwrap();
        state.materialize();
        let mut rng = create_rng(4);
        RandomRepair.operate(&mut state, &mut rng);
        // No edges: every node has to be in S.
        assert_eq!(state.objective(), 10);

        let destroy = RandomDestroy::new(0.35).unwrap();
        destroy.operate(&mut state, &mut rng);
        assert_eq!(state.objective(), 7);
        assert_eq!(state.non_dominated().len(), 3);
        assert!(state.invariants_hold());
    }

    #[test]
    fn test_small_solution_is_untouched() {
        let graph = Arc::new(Graph::from_edges(3, &[(0, 1), (1, 2)]).unwrap());
        let mut state = SolutionState::new(graph, 1).unwrap();
        state.materialize();
        state.add_to_solution(1);

        let destroy = RandomDestroy::new(0.5).unwrap();
        destroy.operate(&mut state, &mut create_rng(0));
        assert_eq!(state.solution().as_slice(), &[1]);
    }

    #[test]
    fn test_empty_solution_is_a_no_op() {
        let graph = Arc::new(Graph::cycle(6));
        let mut state = SolutionState::new(graph, 1).unwrap();
        state.materialize();
        let destroy = RandomDestroy::new(0.9).unwrap();
        destroy.operate(&mut state, &mut create_rng(0));
        assert!(state.is_empty_solution());
        assert_eq!(state.non_dominated().len(), 6);
    }
}
