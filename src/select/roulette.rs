use super::SelectStrategy;
use crate::error::{AlnsError, Result};
use crate::outcome::{Outcome, RewardTable};
use rand::Rng;

/// Adaptive weight and per-segment accumulators of one operator.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperatorStats {
    pub weight: f64,
    pub segment_score: f64,
    pub segment_uses: usize,
}

impl OperatorStats {
    fn new(weight: f64) -> Self {
        Self {
            weight,
            segment_score: 0.0,
            segment_uses: 0,
        }
    }

    /// Exponential smoothing at the end of a segment:
    ///
    /// `w = w * (1 - rho) + rho * (score / uses)`
    ///
    /// Operators unused during the segment keep their weight.
    fn update_weight(&mut self, reaction_factor: f64) {
        if self.segment_uses > 0 {
            let avg_score = self.segment_score / self.segment_uses as f64;
            self.weight = self.weight * (1.0 - reaction_factor) + avg_score * reaction_factor;
        }
    }

    fn clear_segment(&mut self) {
        self.segment_score = 0.0;
        self.segment_uses = 0;
    }
}

/// Operator statistics at the close of a segment.
///
/// Weights are the updated ones; scores and uses are what the segment
/// accumulated before the reset.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentSnapshot {
    /// Zero-based index of the closed segment.
    pub segment: usize,
    pub destroy: Vec<OperatorStats>,
    pub repair: Vec<OperatorStats>,
}

/// Roulette wheel with segment-wise adaptive weights.
#[derive(Debug, Clone)]
pub struct RouletteWheelSelect {
    destroy: Vec<OperatorStats>,
    repair: Vec<OperatorStats>,
    initial_destroy: Vec<f64>,
    initial_repair: Vec<f64>,
    segment_length: usize,
    reaction_factor: f64,
    rewards: RewardTable,
    segment_iteration: usize,
    segments_completed: usize,
}

impl RouletteWheelSelect {
    /// Creates a selector with every weight at 1.0.
    ///
    /// `segment_length` must be at least 1 and `reaction_factor` in `[0, 1]`.
    pub fn new(
        num_destroy: usize,
        num_repair: usize,
        segment_length: usize,
        reaction_factor: f64,
        rewards: RewardTable,
    ) -> Result<Self> {
        if segment_length == 0 {
            return Err(AlnsError::config("segment_length must be at least 1"));
        }
        if !(0.0..=1.0).contains(&reaction_factor) {
            return Err(AlnsError::config(format!(
                "reaction_factor must be in [0, 1], got {reaction_factor}"
            )));
        }
        let initial_destroy = vec![1.0; num_destroy];
        let initial_repair = vec![1.0; num_repair];
        Ok(Self {
            destroy: initial_destroy.iter().map(|&w| OperatorStats::new(w)).collect(),
            repair: initial_repair.iter().map(|&w| OperatorStats::new(w)).collect(),
            initial_destroy,
            initial_repair,
            segment_length,
            reaction_factor,
            rewards,
            segment_iteration: 0,
            segments_completed: 0,
        })
    }

    /// Replaces the initial weights; their counts define the operator counts.
    pub fn with_initial_weights(mut self, destroy: Vec<f64>, repair: Vec<f64>) -> Result<Self> {
        if let Some(bad) = destroy
            .iter()
            .chain(repair.iter())
            .find(|w| !w.is_finite() || **w < 0.0)
        {
            return Err(AlnsError::config(format!(
                "operator weights must be finite and non-negative, got {bad}"
            )));
        }
        self.initial_destroy = destroy;
        self.initial_repair = repair;
        self.reset();
        Ok(self)
    }

    pub fn destroy_stats(&self) -> &[OperatorStats] {
        &self.destroy
    }

    pub fn repair_stats(&self) -> &[OperatorStats] {
        &self.repair
    }

    pub fn destroy_weights(&self) -> Vec<f64> {
        self.destroy.iter().map(|s| s.weight).collect()
    }

    pub fn repair_weights(&self) -> Vec<f64> {
        self.repair.iter().map(|s| s.weight).collect()
    }

    pub fn segment_length(&self) -> usize {
        self.segment_length
    }

    pub fn reaction_factor(&self) -> f64 {
        self.reaction_factor
    }

    pub fn rewards(&self) -> &RewardTable {
        &self.rewards
    }

    fn close_segment(&mut self) -> SegmentSnapshot {
        for stat in self.destroy.iter_mut().chain(self.repair.iter_mut()) {
            stat.update_weight(self.reaction_factor);
        }
        let snapshot = SegmentSnapshot {
            segment: self.segments_completed,
            destroy: self.destroy.clone(),
            repair: self.repair.clone(),
        };
        for stat in self.destroy.iter_mut().chain(self.repair.iter_mut()) {
            stat.clear_segment();
        }
        self.segment_iteration = 0;
        self.segments_completed += 1;
        snapshot
    }
}

/// Picks an index with probability proportional to its weight.
///
/// Falls back to a uniform choice when every weight is zero.
fn roulette_select<R: Rng>(stats: &[OperatorStats], rng: &mut R) -> usize {
    if stats.len() <= 1 {
        return 0;
    }
    let total: f64 = stats.iter().map(|s| s.weight).sum();
    if total <= 0.0 {
        return rng.random_range(0..stats.len());
    }

    let mut roll = rng.random_range(0.0..total);
    for (i, stat) in stats.iter().enumerate() {
        if roll < stat.weight {
            return i;
        }
        roll -= stat.weight;
    }
    // Rounding residue lands on the last operator that can be chosen.
    stats.iter().rposition(|s| s.weight > 0.0).unwrap_or(0)
}

impl SelectStrategy for RouletteWheelSelect {
    fn select<R: Rng>(&mut self, rng: &mut R) -> (usize, usize) {
        let d = roulette_select(&self.destroy, rng);
        let r = roulette_select(&self.repair, rng);
        if let Some(stat) = self.destroy.get_mut(d) {
            stat.segment_uses += 1;
        }
        if let Some(stat) = self.repair.get_mut(r) {
            stat.segment_uses += 1;
        }
        (d, r)
    }

    fn record(&mut self, destroy: usize, repair: usize, outcome: Outcome) -> Option<SegmentSnapshot> {
        let reward = self.rewards.reward(outcome);
        if let Some(stat) = self.destroy.get_mut(destroy) {
            stat.segment_score += reward;
        }
        if let Some(stat) = self.repair.get_mut(repair) {
            stat.segment_score += reward;
        }
        self.segment_iteration += 1;
        if self.segment_iteration >= self.segment_length {
            Some(self.close_segment())
        } else {
            None
        }
    }

    fn reset(&mut self) {
        self.destroy = self.initial_destroy.iter().map(|&w| OperatorStats::new(w)).collect();
        self.repair = self.initial_repair.iter().map(|&w| OperatorStats::new(w)).collect();
        self.segment_iteration = 0;
        self.segments_completed = 0;
    }

    fn num_destroy(&self) -> usize {
        self.destroy.len()
    }

    fn num_repair(&self) -> usize {
        self.repair.len()
    }

    fn weights(&self) -> (Vec<f64>, Vec<f64>) {
        (self.destroy_weights(), self.repair_weights())
    }
}
