//! Candidate evaluation outcomes and their rewards.

use crate::error::{AlnsError, Result};

/// Classification of a candidate solution relative to the best and current ones.
///
/// `NewBetter` and `NewAccepted` keep their reward slots but are never
/// produced by [`crate::accept::AcceptStrategy::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    Best,
    NewBetter,
    Better,
    NewAccepted,
    Accepted,
    Rejected,
}

impl Outcome {
    /// All outcomes ordered by id.
    pub const ALL: [Outcome; 6] = [
        Outcome::Best,
        Outcome::NewBetter,
        Outcome::Better,
        Outcome::NewAccepted,
        Outcome::Accepted,
        Outcome::Rejected,
    ];

    /// Stable index into a [`RewardTable`].
    pub const fn id(self) -> usize {
        match self {
            Outcome::Best => 0,
            Outcome::NewBetter => 1,
            Outcome::Better => 2,
            Outcome::NewAccepted => 3,
            Outcome::Accepted => 4,
            Outcome::Rejected => 5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Outcome::Best => "BEST",
            Outcome::NewBetter => "NEW_BETTER",
            Outcome::Better => "BETTER",
            Outcome::NewAccepted => "NEW_ACCEPTED",
            Outcome::Accepted => "ACCEPTED",
            Outcome::Rejected => "REJECTED",
        }
    }

    /// True when the candidate replaces the current solution.
    pub const fn is_accepted(self) -> bool {
        !matches!(self, Outcome::Rejected)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Reward per [`Outcome`], indexed by [`Outcome::id`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardTable([f64; 6]);

impl RewardTable {
    /// Creates a table; rewards must be finite and non-negative.
    pub fn new(rewards: [f64; 6]) -> Result<Self> {
        if let Some(bad) = rewards.iter().find(|r| !r.is_finite() || **r < 0.0) {
            return Err(AlnsError::config(format!(
                "outcome rewards must be finite and non-negative, got {bad}"
            )));
        }
        Ok(Self(rewards))
    }

    /// Creates a table from a slice holding exactly six values.
    pub fn from_slice(rewards: &[f64]) -> Result<Self> {
        let array: [f64; 6] = rewards.try_into().map_err(|_| {
            AlnsError::config(format!(
                "expected 6 outcome rewards, got {}",
                rewards.len()
            ))
        })?;
        Self::new(array)
    }

    pub fn reward(&self, outcome: Outcome) -> f64 {
        self.0[outcome.id()]
    }

    pub fn as_array(&self) -> [f64; 6] {
        self.0
    }
}

impl Default for RewardTable {
    /// Rewards used by the reference experiments: 33 / 0 / 16 / 0 / 9 / 0.
    fn default() -> Self {
        Self([33.0, 0.0, 16.0, 0.0, 9.0, 0.0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_dense() {
        for (i, outcome) in Outcome::ALL.iter().enumerate() {
            assert_eq!(outcome.id(), i);
        }
        assert_eq!(Outcome::Better.to_string(), "BETTER");
        assert!(!Outcome::Rejected.is_accepted());
        assert!(Outcome::Accepted.is_accepted());
    }

    #[test]
    fn test_reward_lookup() {
        let table = RewardTable::default();
        assert_eq!(table.reward(Outcome::Best), 33.0);
        assert_eq!(table.reward(Outcome::Better), 16.0);
        assert_eq!(table.reward(Outcome::Accepted), 9.0);
        assert_eq!(table.reward(Outcome::Rejected), 0.0);
    }

    #[test]
    fn test_from_slice_validates() {
        assert!(RewardTable::from_slice(&[1.0, 2.0]).is_err());
        assert!(RewardTable::from_slice(&[1.0, 0.0, 1.0, 0.0, -1.0, 0.0]).is_err());
        assert!(RewardTable::from_slice(&[f64::NAN, 0.0, 1.0, 0.0, 1.0, 0.0]).is_err());
        let table = RewardTable::from_slice(&[24.0, 17.0, 9.0, 13.0, 7.0, 0.0]).unwrap();
        assert_eq!(table.reward(Outcome::NewAccepted), 13.0);
    }
}
