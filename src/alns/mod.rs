//! Adaptive Large Neighborhood Search (ALNS) and its single-pair LNS sibling.
//!
//! The engine iteratively destroys and repairs a k-dominating set using a
//! portfolio of operators whose selection probabilities adapt to past
//! performance. A run goes through:
//!
//! 1. validation of the registered operators,
//! 2. a bootstrap random repair of the empty solution,
//! 3. the destroy/repair/evaluate loop until the stop condition fires,
//! 4. the end event, returning the best solution.
//!
//! # References
//!
//! Ropke & Pisinger (2006), "An Adaptive Large Neighborhood Search Heuristic
//! for the Pickup and Delivery Problem with Time Windows"

mod config;
mod lns;
mod runner;

pub use config::AlnsConfig;
pub use lns::Lns;
pub use runner::Alns;
