//! ALNS configuration.

use crate::accept::SimulatedAnnealing;
use crate::error::Result;
use crate::operators::{DestroyOperator, OperatorContext, OperatorName, RandomDestroy, RepairOperator};
use crate::outcome::RewardTable;
use crate::select::RouletteWheelSelect;
use crate::stop::{StopCondition, StopMethod};

/// Configuration for the ALNS and LNS engines.
///
/// # Scoring
///
/// Each iteration the selected destroy/repair pair is credited with the
/// reward of the candidate's outcome, indexed by outcome id
/// (`BEST, NEW_BETTER, BETTER, NEW_ACCEPTED, ACCEPTED, REJECTED`). Rewards
/// accumulate over a segment of `segment_length` iterations and then update
/// the operator weights with reaction factor `rho`.
///
/// # Acceptance
///
/// Worse candidates are accepted with probability `exp(-delta / T)`, where
/// `T` starts at `initial_temperature` and decays by `cooling_rate` each
/// iteration, never below `final_temperature`.
///
/// # Examples
///
/// ```
/// use u_domset::alns::AlnsConfig;
/// use u_domset::stop::StopMethod;
///
/// let config = AlnsConfig::default()
///     .with_stop(StopMethod::ByIterationLimit, 500)
///     .with_segment_length(50)
///     .with_greedy_alpha(0.2)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlnsConfig {
    /// RCL relaxation of the greedy repairs, in `[0, 1]`.
    pub greedy_alpha: f64,

    /// Fraction of S removed per destroy, in `(0, 1)`.
    pub destroy_factor: f64,

    pub stop_method: StopMethod,

    /// Iterations or seconds, depending on `stop_method`.
    pub stop_limit: u64,

    pub initial_temperature: f64,

    pub final_temperature: f64,

    /// Geometric cooling factor, in `[0, 1]`.
    pub cooling_rate: f64,

    /// Iterations between weight updates.
    pub segment_length: usize,

    /// Reaction factor (rho) of the weight update, in `[0, 1]`.
    pub reaction_factor: f64,

    /// Six rewards indexed by outcome id.
    pub outcome_rewards: Vec<f64>,

    /// Registry names of the destroy operators.
    pub destroy_operators: Vec<String>,

    /// Registry names of the repair operators.
    pub repair_operators: Vec<String>,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,

    /// Record per-operator attempt, score and weight series. The runtime and
    /// the best-solution trace are collected regardless.
    pub track_statistics: bool,
}

impl Default for AlnsConfig {
    fn default() -> Self {
        Self {
            greedy_alpha: 0.15,
            destroy_factor: 0.5,
            stop_method: StopMethod::ByIterationLimit,
            stop_limit: 10,
            initial_temperature: 25.0,
            final_temperature: 1.0,
            cooling_rate: 0.9975,
            segment_length: 25,
            reaction_factor: 0.5,
            outcome_rewards: RewardTable::default().as_array().to_vec(),
            destroy_operators: vec![RandomDestroy::NAME.to_owned()],
            repair_operators: OperatorName::repair_names().map(str::to_owned).collect(),
            seed: None,
            track_statistics: true,
        }
    }
}

impl AlnsConfig {
    pub fn with_greedy_alpha(mut self, alpha: f64) -> Self {
        self.greedy_alpha = alpha;
        self
    }

    pub fn with_destroy_factor(mut self, factor: f64) -> Self {
        self.destroy_factor = factor;
        self
    }

    pub fn with_stop(mut self, method: StopMethod, limit: u64) -> Self {
        self.stop_method = method;
        self.stop_limit = limit;
        self
    }

    pub fn with_temperature(mut self, initial: f64, final_temperature: f64, cooling_rate: f64) -> Self {
        self.initial_temperature = initial;
        self.final_temperature = final_temperature;
        self.cooling_rate = cooling_rate;
        self
    }

    pub fn with_segment_length(mut self, n: usize) -> Self {
        self.segment_length = n;
        self
    }

    pub fn with_reaction_factor(mut self, rho: f64) -> Self {
        self.reaction_factor = rho;
        self
    }

    pub fn with_outcome_rewards(mut self, rewards: [f64; 6]) -> Self {
        self.outcome_rewards = rewards.to_vec();
        self
    }

    pub fn with_destroy_operators<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.destroy_operators = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_repair_operators<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.repair_operators = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_track_statistics(mut self, track: bool) -> Self {
        self.track_statistics = track;
        self
    }

    pub fn operator_context(&self) -> OperatorContext {
        OperatorContext::default()
            .with_greedy_alpha(self.greedy_alpha)
            .with_destroy_factor(self.destroy_factor)
    }

    pub(crate) fn build_destroy_operators(&self) -> Result<Vec<DestroyOperator>> {
        let ctx = self.operator_context();
        self.destroy_operators.iter().map(|name| ctx.destroy(name)).collect()
    }

    pub(crate) fn build_repair_operators(&self) -> Result<Vec<RepairOperator>> {
        let ctx = self.operator_context();
        self.repair_operators.iter().map(|name| ctx.repair(name)).collect()
    }

    pub(crate) fn build_stop(&self) -> Result<StopCondition> {
        StopCondition::new(self.stop_method, self.stop_limit)
    }

    pub(crate) fn build_accept(&self) -> Result<SimulatedAnnealing> {
        SimulatedAnnealing::new(self.initial_temperature, self.final_temperature, self.cooling_rate)
    }

    pub(crate) fn build_select(&self, num_destroy: usize, num_repair: usize) -> Result<RouletteWheelSelect> {
        let rewards = RewardTable::from_slice(&self.outcome_rewards)?;
        RouletteWheelSelect::new(
            num_destroy,
            num_repair,
            self.segment_length,
            self.reaction_factor,
            rewards,
        )
    }

    /// Validates every parameter and operator name.
    ///
    /// An empty operator list is not a configuration error here; the engine
    /// reports it as missing operators when it is executed.
    pub fn validate(&self) -> Result<()> {
        let destroy = self.build_destroy_operators()?;
        let repair = self.build_repair_operators()?;
        self.build_stop()?;
        self.build_accept()?;
        self.build_select(destroy.len(), repair.len())?;
        Ok(())
    }

    /// Parses a stop method label such as `"timeout"` into the config.
    pub fn with_stop_label(mut self, label: &str, limit: u64) -> Result<Self> {
        self.stop_method = label.parse()?;
        self.stop_limit = limit;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AlnsError;

    #[test]
    fn test_default_config() {
        let config = AlnsConfig::default();
        assert_eq!(config.stop_limit, 10);
        assert_eq!(config.segment_length, 25);
        assert!((config.greedy_alpha - 0.15).abs() < 1e-10);
        assert!((config.cooling_rate - 0.9975).abs() < 1e-10);
        assert_eq!(config.outcome_rewards, vec![33.0, 0.0, 16.0, 0.0, 9.0, 0.0]);
        assert_eq!(config.repair_operators.len(), 5);
        assert_eq!(config.destroy_operators, vec!["random_destroy".to_string()]);
    }

    #[test]
    fn test_validate_ok() {
        assert!(AlnsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_bad_parameters() {
        let bad = [
            AlnsConfig::default().with_greedy_alpha(1.5),
            AlnsConfig::default().with_destroy_factor(0.0),
            AlnsConfig::default().with_stop(StopMethod::ByTimeout, 0),
            AlnsConfig::default().with_temperature(1.0, 5.0, 0.9),
            AlnsConfig::default().with_temperature(10.0, 1.0, 1.1),
            AlnsConfig::default().with_segment_length(0),
            AlnsConfig::default().with_reaction_factor(-0.1),
            AlnsConfig::default().with_repair_operators(["random_destroy"]),
            AlnsConfig::default().with_destroy_operators(["shuffle"]),
        ];
        for config in bad {
            assert!(matches!(config.validate(), Err(AlnsError::Configuration(_))), "{config:?}");
        }

        let mut short_rewards = AlnsConfig::default();
        short_rewards.outcome_rewards.pop();
        assert!(short_rewards.validate().is_err());
    }

    #[test]
    fn test_stop_label() {
        let config = AlnsConfig::default().with_stop_label("timeout", 30).unwrap();
        assert_eq!(config.stop_method, StopMethod::ByTimeout);
        assert!(AlnsConfig::default().with_stop_label("", 30).is_err());
    }

    #[test]
    fn test_builder_chain() {
        let config = AlnsConfig::default()
            .with_destroy_factor(0.3)
            .with_outcome_rewards([24.0, 17.0, 9.0, 13.0, 7.0, 0.0])
            .with_repair_operators(["random_repair", "least_dominated_repair"])
            .with_track_statistics(false)
            .with_seed(42);

        assert!((config.destroy_factor - 0.3).abs() < 1e-10);
        assert_eq!(config.build_repair_operators().unwrap().len(), 2);
        assert_eq!(config.seed, Some(42));
        assert!(!config.track_statistics);
    }
}
