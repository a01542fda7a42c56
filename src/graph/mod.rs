//! Static undirected graphs.
//!
//! A [`Graph`] is built once (usually by [`read_graph`]) and then shared
//! read-only, behind an `Arc`, by every solution state of a search run.

mod reader;

pub use reader::{parse_graph, read_graph, GraphError, GraphFormat};

use std::ops::Range;

/// Simple undirected graph over node ids `0..n`.
///
/// Self loops are ignored and parallel edges are merged, so every adjacency
/// list holds distinct neighbors different from the node itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    adjacency: Vec<Vec<usize>>,
    edge_count: usize,
}

impl Graph {
    /// Creates a graph with `node_count` isolated nodes.
    pub fn new(node_count: usize) -> Self {
        GraphBuilder::new(node_count).build()
    }

    /// Builds a graph from an edge list.
    ///
    /// Returns [`GraphError::NodeOutOfRange`] when an endpoint is not below
    /// `node_count`.
    pub fn from_edges(node_count: usize, edges: &[(usize, usize)]) -> Result<Self, GraphError> {
        let mut builder = GraphBuilder::new(node_count);
        for &(u, v) in edges {
            builder.add_edge(u, v)?;
        }
        Ok(builder.build())
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of distinct undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Iterator over all node ids.
    pub fn nodes(&self) -> Range<usize> {
        0..self.node_count()
    }

    /// Neighbors of `node`, ascending.
    ///
    /// # Panics
    /// Panics if `node` is out of range.
    pub fn neighbors(&self, node: usize) -> &[usize] {
        &self.adjacency[node]
    }

    /// Degree of `node`.
    pub fn degree(&self, node: usize) -> usize {
        self.adjacency[node].len()
    }

    /// Cycle graph `0 - 1 - ... - (n-1) - 0`.
    pub fn cycle(node_count: usize) -> Self {
        let mut builder = GraphBuilder::new(node_count);
        if node_count >= 2 {
            for u in 0..node_count {
                // In range by construction; duplicates (n == 2) are merged.
                let _ = builder.add_edge(u, (u + 1) % node_count);
            }
        }
        builder.build()
    }
}

/// Collects edges, then merges duplicates once in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    adjacency: Vec<Vec<usize>>,
}

impl GraphBuilder {
    pub fn new(node_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); node_count],
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Records the undirected edge `{u, v}`; self loops are dropped.
    pub fn add_edge(&mut self, u: usize, v: usize) -> Result<(), GraphError> {
        let n = self.node_count();
        for node in [u, v] {
            if node >= n {
                return Err(GraphError::NodeOutOfRange {
                    node,
                    node_count: n,
                });
            }
        }
        if u != v {
            self.adjacency[u].push(v);
            self.adjacency[v].push(u);
        }
        Ok(())
    }

    /// Sorts every adjacency list and drops parallel edges.
    pub fn build(mut self) -> Graph {
        for neighbors in &mut self.adjacency {
            neighbors.sort_unstable();
            neighbors.dedup();
        }
        let edge_count = self.adjacency.iter().map(Vec::len).sum::<usize>() / 2;
        Graph {
            adjacency: self.adjacency,
            edge_count,
        }
    }
}
