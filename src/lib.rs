//! Adaptive Large Neighborhood Search for near-minimal k-dominating sets.
//!
//! Given a static undirected graph and a multiplicity `K >= 1`, the search
//! looks for a small node set S such that every node outside S has at least
//! `K` neighbors in S.
//!
//! - **Graph**: adjacency lists plus edge-list and DIMACS loaders.
//! - **SolutionState**: S, the dominated/non-dominated partition and per-node
//!   columns, all maintained incrementally.
//! - **Operators**: random destroy, random repair and four greedy randomized
//!   repairs driven by a restricted candidate list.
//! - **ALNS / LNS**: the destroy/repair loop with simulated annealing
//!   acceptance, segment roulette-wheel operator selection, stop conditions
//!   and an event bus feeding run statistics.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use u_domset::alns::{Alns, AlnsConfig};
//! use u_domset::graph::Graph;
//! use u_domset::state::SolutionState;
//! use u_domset::stop::StopMethod;
//!
//! let graph = Arc::new(Graph::cycle(10));
//! let config = AlnsConfig::default()
//!     .with_stop(StopMethod::ByIterationLimit, 50)
//!     .with_seed(7);
//!
//! let mut alns = Alns::from_config(&config).unwrap();
//! let best = alns.execute(SolutionState::new(graph, 1).unwrap()).unwrap();
//! assert!(best.is_feasible());
//! ```
//!
//! # Architecture
//!
//! Every search run owns one seeded generator and lends it to the operators
//! and strategies it drives; runs share nothing but the read-only graph, so
//! independent replicates (see [`batch`]) can execute side by side.

pub mod accept;
pub mod alns;
pub mod batch;
pub mod error;
pub mod events;
pub mod graph;
pub mod operators;
pub mod outcome;
pub mod random;
pub mod select;
pub mod state;
pub mod statistics;
pub mod stop;

pub use error::{AlnsError, Result};
