//! Incrementally maintained k-domination bookkeeping.
//!
//! A [`SolutionState`] partitions the nodes of a [`Graph`] into three
//! disjoint sets:
//!
//! - `solution` (S): the chosen dominating set,
//! - `dominated`: nodes outside S with at least K neighbors in S,
//! - `non_dominated`: nodes outside S that still need more neighbors in S.
//!
//! Next to the sets it tracks per-node [`Column`]s. `KRemaining` is always
//! present; `Degree` and `Weight` are allocated only when an operator asks
//! for them through [`SolutionState::register_columns`].
//!
//! # Lifecycle
//!
//! 1. [`SolutionState::new`] with the graph and K.
//! 2. [`SolutionState::register_columns`] for every operator of the run.
//! 3. [`SolutionState::materialize`] allocates the columns and freezes the
//!    initial state (S empty, every node non-dominated) as a snapshot.
//! 4. Repair steps ([`SolutionState::add_to_solution`]) and destroy steps
//!    ([`SolutionState::remove_from_solution`]) mutate the state; clones share
//!    the graph and snapshot but own their sets and columns.

mod columns;
mod node_set;

pub use columns::{Column, ColumnSet};
pub use node_set::NodeSet;

use crate::error::{AlnsError, Result};
use crate::graph::Graph;
use std::sync::Arc;

/// Frozen initial columns of a materialized state.
#[derive(Debug)]
struct Snapshot {
    columns: ColumnSet,
    k_remaining: Vec<u32>,
    degree: Vec<u32>,
    weight: Vec<f64>,
}

impl Snapshot {
    fn initial(graph: &Graph, k: u32, columns: ColumnSet) -> Self {
        let n = graph.node_count();
        let degree = if columns.contains(Column::Degree) {
            graph.nodes().map(|v| graph.degree(v) as u32).collect()
        } else {
            Vec::new()
        };
        let weight = if columns.contains(Column::Weight) {
            vec![0.0; n]
        } else {
            Vec::new()
        };
        Self {
            columns,
            k_remaining: vec![k; n],
            degree,
            weight,
        }
    }
}

/// Solution of the k-dominating set problem plus its bookkeeping.
#[derive(Debug, Clone)]
pub struct SolutionState {
    k: u32,
    graph: Arc<Graph>,
    solution: NodeSet,
    dominated: NodeSet,
    non_dominated: NodeSet,
    /// Exact number of neighbors in S, per node.
    coverage: Vec<u32>,
    k_remaining: Vec<u32>,
    degree: Vec<u32>,
    weight: Vec<f64>,
    columns: ColumnSet,
    degree_stale: bool,
    snapshot: Option<Arc<Snapshot>>,
}

impl SolutionState {
    /// Creates an unmaterialized state with every node non-dominated.
    ///
    /// Fails with a configuration error when `k` is zero.
    pub fn new(graph: Arc<Graph>, k: u32) -> Result<Self> {
        if k == 0 {
            return Err(AlnsError::config("k must be at least 1"));
        }
        let n = graph.node_count();
        Ok(Self {
            k,
            solution: NodeSet::with_capacity(n),
            dominated: NodeSet::with_capacity(n),
            non_dominated: NodeSet::full(n),
            coverage: vec![0; n],
            k_remaining: Vec::new(),
            degree: Vec::new(),
            weight: Vec::new(),
            columns: ColumnSet::of(&[Column::KRemaining]),
            degree_stale: false,
            snapshot: None,
            graph,
        })
    }

    /// Domination multiplicity K.
    pub fn k(&self) -> u32 {
        self.k
    }

    /// Shared graph.
    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }

    /// Current solution S.
    pub fn solution(&self) -> &NodeSet {
        &self.solution
    }

    pub fn dominated(&self) -> &NodeSet {
        &self.dominated
    }

    pub fn non_dominated(&self) -> &NodeSet {
        &self.non_dominated
    }

    /// Objective value `|S|` (minimized).
    pub fn objective(&self) -> usize {
        self.solution.len()
    }

    /// Columns currently tracked.
    pub fn columns(&self) -> ColumnSet {
        self.columns
    }

    /// Value of `column` for `node`, or `None` when the column is not allocated.
    pub fn value(&self, node: usize, column: Column) -> Option<f64> {
        match column {
            Column::KRemaining => self.k_remaining(node).map(f64::from),
            Column::Degree => self.degree(node).map(f64::from),
            Column::Weight => self.weight(node),
        }
    }

    pub fn k_remaining(&self, node: usize) -> Option<u32> {
        self.k_remaining.get(node).copied()
    }

    pub fn degree(&self, node: usize) -> Option<u32> {
        self.degree.get(node).copied()
    }

    pub fn weight(&self, node: usize) -> Option<f64> {
        self.weight.get(node).copied()
    }

    pub(crate) fn k_remaining_column(&self) -> &[u32] {
        &self.k_remaining
    }

    pub(crate) fn degree_column(&self) -> &[u32] {
        &self.degree
    }

    pub(crate) fn weight_column(&self) -> &[f64] {
        &self.weight
    }

    /// Adds `columns` to the tracked set.
    ///
    /// On a materialized state, newly added columns are allocated right away
    /// from the current solution and the snapshot is rebuilt on the next
    /// [`materialize`](Self::materialize).
    pub fn register_columns(&mut self, columns: ColumnSet) {
        let merged = self.columns.union(columns);
        if merged == self.columns {
            return;
        }
        let added = ColumnSet::from_iter(merged.iter().filter(|c| !self.columns.contains(*c)));
        self.columns = merged;

        if !self.is_materialized() {
            return;
        }
        let n = self.graph.node_count();
        if added.contains(Column::Degree) {
            self.recompute_degree();
        }
        if added.contains(Column::Weight) {
            self.weight = vec![0.0; n];
        }
    }

    /// Whether columns have been allocated and a snapshot captured.
    pub fn is_materialized(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Allocates the registered columns and freezes the initial state.
    ///
    /// When a snapshot covering every registered column already exists, the
    /// state is re-derived from it instead of being rebuilt.
    pub fn materialize(&mut self) {
        match &self.snapshot {
            Some(snapshot) if snapshot.columns.is_superset(self.columns) => {
                let snapshot = Arc::clone(snapshot);
                self.restore(&snapshot);
            }
            _ => {
                let snapshot = Arc::new(Snapshot::initial(&self.graph, self.k, self.columns));
                self.restore(&snapshot);
                self.snapshot = Some(snapshot);
            }
        }
    }

    /// Restores the frozen initial state, materializing first if needed.
    pub fn reset_to_snapshot(&mut self) {
        self.materialize();
    }

    fn restore(&mut self, snapshot: &Snapshot) {
        let n = self.graph.node_count();
        self.columns = self.columns.union(snapshot.columns);
        self.solution.clear();
        self.dominated.clear();
        self.non_dominated = NodeSet::full(n);
        self.coverage.clear();
        self.coverage.resize(n, 0);
        self.k_remaining.clone_from(&snapshot.k_remaining);
        self.degree.clone_from(&snapshot.degree);
        self.weight.clone_from(&snapshot.weight);
        self.degree_stale = false;
    }

    /// True when S is empty.
    pub fn is_empty_solution(&self) -> bool {
        self.solution.is_empty()
    }

    /// True until the first repair pass touched a materialized state.
    pub fn is_uninitialized(&self) -> bool {
        !self.is_materialized() || (self.solution.is_empty() && self.dominated.is_empty())
    }

    /// Re-derives auxiliary columns invalidated by earlier destroy steps.
    pub fn sync_columns(&mut self) {
        if self.degree_stale && self.columns.contains(Column::Degree) {
            self.recompute_degree();
        }
        self.degree_stale = false;
    }

    fn recompute_degree(&mut self) {
        let n = self.graph.node_count();
        self.degree.clear();
        self.degree.resize(n, 0);
        for v in self.non_dominated.iter() {
            for &u in self.graph.neighbors(v) {
                self.degree[u] += 1;
            }
        }
    }

    /// Recomputes `Weight` for every non-dominated node.
    ///
    /// `formula` receives `(k_remaining, degree, |non_dominated|)`.
    pub(crate) fn refresh_weights<F>(&mut self, formula: F)
    where
        F: Fn(u32, u32, usize) -> f64,
    {
        if !self.columns.contains(Column::Weight) || self.weight.is_empty() {
            return;
        }
        let open = self.non_dominated.len();
        for v in self.non_dominated.iter() {
            let degree = self.degree.get(v).copied().unwrap_or(0);
            self.weight[v] = formula(self.k_remaining[v], degree, open);
        }
    }

    /// Repair step: moves the non-dominated `node` into S.
    ///
    /// Every neighbor loses one unit of `KRemaining`; neighbors reaching zero
    /// become dominated. `Degree`, when tracked, is decremented for every edge
    /// that stops pointing at a non-dominated node.
    pub fn add_to_solution(&mut self, node: usize) {
        debug_assert!(
            self.non_dominated.contains(node),
            "node {node} is not non-dominated"
        );
        if !self.non_dominated.contains(node) || self.k_remaining.is_empty() {
            return;
        }
        let graph = Arc::clone(&self.graph);
        let track_degree = self.columns.contains(Column::Degree) && !self.degree.is_empty();

        self.solution.insert(node);
        for &u in graph.neighbors(node) {
            self.coverage[u] += 1;
            self.k_remaining[u] = self.k_remaining[u].saturating_sub(1);
            if track_degree {
                self.degree[u] = self.degree[u].saturating_sub(1);
            }
            if self.k_remaining[u] == 0
                && !self.solution.contains(u)
                && self.non_dominated.remove(u)
            {
                self.dominated.insert(u);
                if track_degree {
                    for &w in graph.neighbors(u) {
                        self.degree[w] = self.degree[w].saturating_sub(1);
                    }
                }
            }
        }
        self.non_dominated.remove(node);
    }

    /// Destroy step: takes `node` out of S.
    ///
    /// Returns false when `node` was not in S. `Degree` is left stale until
    /// the next [`sync_columns`](Self::sync_columns).
    pub fn remove_from_solution(&mut self, node: usize) -> bool {
        if !self.solution.remove(node) {
            return false;
        }
        let graph = Arc::clone(&self.graph);

        if self.k_remaining[node] == 0 {
            self.dominated.insert(node);
        } else {
            self.non_dominated.insert(node);
        }
        for &u in graph.neighbors(node) {
            self.coverage[u] -= 1;
            self.k_remaining[u] = self.k.saturating_sub(self.coverage[u]);
            if self.k_remaining[u] > 0 && !self.solution.contains(u) && self.dominated.remove(u) {
                self.non_dominated.insert(u);
            }
        }
        self.degree_stale = true;
        true
    }

    /// Checks k-domination directly on the graph, ignoring the counters.
    pub fn is_feasible(&self) -> bool {
        self.graph.nodes().filter(|v| !self.solution.contains(*v)).all(|v| {
            let covered = self
                .graph
                .neighbors(v)
                .iter()
                .filter(|u| self.solution.contains(**u))
                .count();
            covered >= self.k as usize
        })
    }

    /// Checks the partition and `KRemaining` invariants.
    pub fn invariants_hold(&self) -> bool {
        let n = self.graph.node_count();
        if self.solution.len() + self.dominated.len() + self.non_dominated.len() != n {
            return false;
        }
        self.graph.nodes().all(|v| {
            let memberships = [
                self.solution.contains(v),
                self.dominated.contains(v),
                self.non_dominated.contains(v),
            ];
            if memberships.iter().filter(|m| **m).count() != 1 {
                return false;
            }
            if self.solution.contains(v) || self.k_remaining.is_empty() {
                return true;
            }
            (self.dominated.contains(v) == (self.k_remaining[v] == 0))
                && (self.non_dominated.contains(v) == (self.k_remaining[v] > 0))
        })
    }

    /// Rebuilds sets and columns from scratch for the current S.
    ///
    /// `Weight` is derived data and comes back zeroed.
    pub fn recomputed(&self) -> SolutionState {
        let mut fresh = self.clone();
        let n = self.graph.node_count();
        fresh.dominated.clear();
        fresh.non_dominated.clear();
        fresh.coverage = vec![0; n];
        for v in self.solution.iter() {
            for &u in self.graph.neighbors(v) {
                fresh.coverage[u] += 1;
            }
        }
        fresh.k_remaining = fresh
            .coverage
            .iter()
            .map(|&c| self.k.saturating_sub(c))
            .collect();
        for v in self.graph.nodes() {
            if self.solution.contains(v) {
                continue;
            }
            if fresh.k_remaining[v] == 0 {
                fresh.dominated.insert(v);
            } else {
                fresh.non_dominated.insert(v);
            }
        }
        if self.columns.contains(Column::Degree) {
            fresh.recompute_degree();
        }
        if self.columns.contains(Column::Weight) {
            fresh.weight = vec![0.0; n];
        }
        fresh.degree_stale = false;
        fresh
    }

    /// Compares sets and non-derived columns with `other`.
    ///
    /// `Degree` is compared only when it is current on both sides.
    pub fn bookkeeping_eq(&self, other: &SolutionState) -> bool {
        let degree_comparable = self.columns.contains(Column::Degree)
            && other.columns.contains(Column::Degree)
            && !self.degree_stale
            && !other.degree_stale;
        self.k == other.k
            && self.solution == other.solution
            && self.dominated == other.dominated
            && self.non_dominated == other.non_dominated
            && self.k_remaining == other.k_remaining
            && (!degree_comparable || self.degree == other.degree)
    }
}
