use super::Operator;
use crate::error::{AlnsError, Result};
use crate::state::{Column, ColumnSet, SolutionState};
use rand::Rng;

/// Adds uniformly chosen non-dominated nodes to S until none is left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RandomRepair;

impl RandomRepair {
    pub const NAME: &'static str = "random_repair";
}

impl Operator for RandomRepair {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn required_columns(&self) -> ColumnSet {
        ColumnSet::of(&[Column::KRemaining])
    }

    fn apply<R: Rng>(&self, state: &mut SolutionState, rng: &mut R) {
        while !state.non_dominated().is_empty() {
            let open = state.non_dominated().as_slice();
            let node = open[rng.random_range(0..open.len())];
            state.add_to_solution(node);
        }
    }
}

/// Scoring rule of a [`GreedyRepair`]; higher scores are preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    /// Number of non-dominated neighbors.
    Degree,
    /// Remaining coverage requirement.
    LeastDominated,
    /// `k_remaining^2 / max(1, |ND| - degree)`.
    HybridDominated,
    /// `degree^2 / max(1, |ND| - k_remaining)`.
    HybridDegree,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Degree,
        Priority::LeastDominated,
        Priority::HybridDominated,
        Priority::HybridDegree,
    ];

    /// Registry name of the greedy operator using this rule.
    pub const fn operator_name(self) -> &'static str {
        match self {
            Priority::Degree => "remaining_neighbors_repair",
            Priority::LeastDominated => "least_dominated_repair",
            Priority::HybridDominated => "hybrid_least_dominated_repair",
            Priority::HybridDegree => "hybrid_remaining_neighbor_repair",
        }
    }

    pub fn required_columns(self) -> ColumnSet {
        match self {
            Priority::Degree => ColumnSet::of(&[Column::KRemaining, Column::Degree]),
            Priority::LeastDominated => ColumnSet::of(&[Column::KRemaining]),
            Priority::HybridDominated | Priority::HybridDegree => {
                ColumnSet::of(&[Column::KRemaining, Column::Degree, Column::Weight])
            }
        }
    }

    fn weight_formula(self) -> Option<fn(u32, u32, usize) -> f64> {
        match self {
            Priority::HybridDominated => Some(hybrid_dominated_weight),
            Priority::HybridDegree => Some(hybrid_degree_weight),
            Priority::Degree | Priority::LeastDominated => None,
        }
    }
}

fn hybrid_dominated_weight(k_remaining: u32, degree: u32, open: usize) -> f64 {
    let kr = f64::from(k_remaining);
    kr * kr / (open as f64 - f64::from(degree)).max(1.0)
}

fn hybrid_degree_weight(k_remaining: u32, degree: u32, open: usize) -> f64 {
    let deg = f64::from(degree);
    deg * deg / (open as f64 - f64::from(k_remaining)).max(1.0)
}

/// Greedy randomized repair driven by a restricted candidate list.
///
/// Each step scores every non-dominated node, keeps those scoring at least
/// `max - alpha * (max - min)` and adds one of them uniformly at random.
/// `alpha = 0` is pure greedy and `alpha = 1` is uniform random.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreedyRepair {
    priority: Priority,
    alpha: f64,
}

impl GreedyRepair {
    /// Creates the operator; `alpha` must lie in `[0, 1]`.
    pub fn new(priority: Priority, alpha: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(AlnsError::config(format!(
                "greedy alpha must be in [0, 1], got {alpha}"
            )));
        }
        Ok(Self { priority, alpha })
    }

    pub fn degree(alpha: f64) -> Result<Self> {
        Self::new(Priority::Degree, alpha)
    }

    pub fn least_dominated(alpha: f64) -> Result<Self> {
        Self::new(Priority::LeastDominated, alpha)
    }

    pub fn hybrid_dominated(alpha: f64) -> Result<Self> {
        Self::new(Priority::HybridDominated, alpha)
    }

    pub fn hybrid_degree(alpha: f64) -> Result<Self> {
        Self::new(Priority::HybridDegree, alpha)
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    fn score(&self, state: &SolutionState, node: usize) -> f64 {
        match self.priority {
            Priority::Degree => f64::from(state.degree_column()[node]),
            Priority::LeastDominated => f64::from(state.k_remaining_column()[node]),
            Priority::HybridDominated | Priority::HybridDegree => state.weight_column()[node],
        }
    }

    /// Picks the next node from the restricted candidate list.
    fn pick<R: Rng>(&self, state: &SolutionState, scores: &mut Vec<f64>, rng: &mut R) -> usize {
        let open = state.non_dominated().as_slice();
        scores.clear();
        scores.extend(open.iter().map(|&v| self.score(state, v)));

        let (min, max) = scores
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| {
                (lo.min(s), hi.max(s))
            });
        let threshold = if self.alpha >= 1.0 {
            min
        } else {
            max - self.alpha * (max - min)
        };

        let candidates = scores.iter().filter(|&&s| s >= threshold).count();
        let chosen = rng.random_range(0..candidates);
        open.iter()
            .zip(scores.iter())
            .filter(|(_, &s)| s >= threshold)
            .nth(chosen)
            .map(|(&v, _)| v)
            .unwrap_or(open[0])
    }
}

impl Operator for GreedyRepair {
    fn name(&self) -> &str {
        self.priority.operator_name()
    }

    fn required_columns(&self) -> ColumnSet {
        self.priority.required_columns()
    }

    fn apply<R: Rng>(&self, state: &mut SolutionState, rng: &mut R) {
        let formula = self.priority.weight_formula();
        let mut scores = Vec::with_capacity(state.non_dominated().len());
        while !state.non_dominated().is_empty() {
            if let Some(formula) = formula {
                state.refresh_weights(formula);
            }
            let node = self.pick(state, &mut scores, rng);
            state.add_to_solution(node);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::random::create_rng;
    use std::sync::Arc;

    fn star(leaves: usize) -> Arc<Graph> {
        let edges: Vec<(usize, usize)> = (1..=leaves).map(|l| (0, l)).collect();
        Arc::new(Graph::from_edges(leaves + 1, &edges).unwrap())
    }

    #[test]
    fn test_alpha_validation() {
        assert!(GreedyRepair::degree(-0.1).is_err());
        assert!(GreedyRepair::degree(1.1).is_err());
        assert!(GreedyRepair::degree(f64::NAN).is_err());
        assert!(GreedyRepair::degree(0.0).is_ok());
        assert!(GreedyRepair::degree(1.0).is_ok());
    }

    #[test]
    fn test_pure_greedy_degree_takes_the_hub() {
        let mut state = SolutionState::new(star(6), 1).unwrap();
        state.materialize();
        let op = GreedyRepair::degree(0.0).unwrap();
        op.operate(&mut state, &mut create_rng(1));

        // Hub first dominates every leaf; the hub itself is then alone.
        assert!(state.solution().contains(0));
        assert!(state.is_feasible());
        assert_eq!(state.objective(), 1);
    }

    #[test]
    fn test_names_follow_priority() {
        for priority in Priority::ALL {
            let op = GreedyRepair::new(priority, 0.2).unwrap();
            assert_eq!(op.name(), priority.operator_name());
            assert!(op.required_columns().contains(Column::KRemaining));
        }
        assert_eq!(RandomRepair.name(), "random_repair");
    }

    #[test]
    fn test_hybrid_weights() {
        assert_eq!(hybrid_dominated_weight(2, 1, 5), 1.0);
        assert_eq!(hybrid_dominated_weight(3, 10, 5), 9.0);
        assert_eq!(hybrid_degree_weight(1, 4, 9), 2.0);
        assert_eq!(hybrid_degree_weight(5, 2, 3), 4.0);
    }

    #[test]
    fn test_hybrid_writes_weight_column() {
        let mut state = SolutionState::new(star(4), 2).unwrap();
        state.register_columns(Priority::HybridDegree.required_columns());
        state.materialize();
        state.refresh_weights(hybrid_degree_weight);
        // Hub: degree 4, k_remaining 2, five open nodes.
        assert_eq!(state.weight(0), Some(16.0 / 3.0));

        let op = GreedyRepair::hybrid_degree(0.0).unwrap();
        op.operate(&mut state, &mut create_rng(3));
        assert!(state.is_feasible());
    }

    #[test]
    fn test_full_alpha_can_pick_any_node() {
        let mut seen_hub_first = false;
        let mut seen_leaf_first = false;
        for seed in 0..64 {
            let mut state = SolutionState::new(star(5), 1).unwrap();
            state.register_columns(Priority::Degree.required_columns());
            state.materialize();
            let op = GreedyRepair::degree(1.0).unwrap();
            let mut scores = Vec::new();
            let node = op.pick(&state, &mut scores, &mut create_rng(seed));
            if node == 0 {
                seen_hub_first = true;
            } else {
                seen_leaf_first = true;
            }
        }
        assert!(seen_hub_first && seen_leaf_first);
    }
}
