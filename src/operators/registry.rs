//! Operator names and construction by name.

use super::{DestroyOperator, GreedyRepair, Priority, RandomDestroy, RandomRepair, RepairOperator};
use crate::error::{AlnsError, Result};
use std::fmt;
use std::str::FromStr;

/// Whether an operator shrinks or grows the solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Destroy,
    Repair,
}

/// Every operator that can be built by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorName {
    RandomDestroy,
    RandomRepair,
    GreedyDegree,
    GreedyLeastDominated,
    GreedyHybridDominated,
    GreedyHybridDegree,
}

impl OperatorName {
    pub const ALL: [OperatorName; 6] = [
        OperatorName::RandomDestroy,
        OperatorName::RandomRepair,
        OperatorName::GreedyDegree,
        OperatorName::GreedyLeastDominated,
        OperatorName::GreedyHybridDominated,
        OperatorName::GreedyHybridDegree,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            OperatorName::RandomDestroy => RandomDestroy::NAME,
            OperatorName::RandomRepair => RandomRepair::NAME,
            OperatorName::GreedyDegree => Priority::Degree.operator_name(),
            OperatorName::GreedyLeastDominated => Priority::LeastDominated.operator_name(),
            OperatorName::GreedyHybridDominated => Priority::HybridDominated.operator_name(),
            OperatorName::GreedyHybridDegree => Priority::HybridDegree.operator_name(),
        }
    }

    pub const fn kind(self) -> OperatorKind {
        match self {
            OperatorName::RandomDestroy => OperatorKind::Destroy,
            _ => OperatorKind::Repair,
        }
    }

    /// Names of every repair operator, in registry order.
    pub fn repair_names() -> impl Iterator<Item = &'static str> {
        Self::ALL
            .into_iter()
            .filter(|n| n.kind() == OperatorKind::Repair)
            .map(OperatorName::as_str)
    }

    fn priority(self) -> Option<Priority> {
        match self {
            OperatorName::GreedyDegree => Some(Priority::Degree),
            OperatorName::GreedyLeastDominated => Some(Priority::LeastDominated),
            OperatorName::GreedyHybridDominated => Some(Priority::HybridDominated),
            OperatorName::GreedyHybridDegree => Some(Priority::HybridDegree),
            OperatorName::RandomDestroy | OperatorName::RandomRepair => None,
        }
    }
}

impl fmt::Display for OperatorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatorName {
    type Err = AlnsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| AlnsError::config(format!("unknown operator `{s}`")))
    }
}

/// Parameters shared by operators built from names.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperatorContext {
    /// RCL relaxation of the greedy repairs, in `[0, 1]`.
    pub greedy_alpha: f64,
    /// Fraction of S removed by destroy operators, in `(0, 1)`.
    pub destroy_factor: f64,
}

impl Default for OperatorContext {
    fn default() -> Self {
        Self {
            greedy_alpha: 0.15,
            destroy_factor: 0.5,
        }
    }
}

impl OperatorContext {
    pub fn with_greedy_alpha(mut self, alpha: f64) -> Self {
        self.greedy_alpha = alpha;
        self
    }

    pub fn with_destroy_factor(mut self, factor: f64) -> Self {
        self.destroy_factor = factor;
        self
    }

    /// Builds the destroy operator registered under `name`.
    pub fn destroy(&self, name: &str) -> Result<DestroyOperator> {
        let parsed: OperatorName = name.parse()?;
        match parsed {
            OperatorName::RandomDestroy => Ok(RandomDestroy::new(self.destroy_factor)?.into()),
            other => Err(AlnsError::config(format!(
                "`{other}` is a repair operator, not a destroy operator"
            ))),
        }
    }

    /// Builds the repair operator registered under `name`.
    pub fn repair(&self, name: &str) -> Result<RepairOperator> {
        let parsed: OperatorName = name.parse()?;
        if parsed == OperatorName::RandomRepair {
            return Ok(RandomRepair.into());
        }
        match parsed.priority() {
            Some(priority) => Ok(GreedyRepair::new(priority, self.greedy_alpha)?.into()),
            None => Err(AlnsError::config(format!(
                "`{parsed}` is a destroy operator, not a repair operator"
            ))),
        }
    }
}
