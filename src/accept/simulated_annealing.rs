use super::AcceptStrategy;
use crate::error::{AlnsError, Result};
use rand::Rng;

/// Metropolis acceptance with geometric cooling.
///
/// A worse candidate is accepted with probability `exp(-delta / T)`. After
/// each iteration `T = max(T * cooling_rate, final_temperature)`.
///
/// # Examples
///
/// ```
/// use u_domset::accept::{AcceptStrategy, SimulatedAnnealing};
///
/// let mut sa = SimulatedAnnealing::new(25.0, 1.0, 0.9975).unwrap();
/// sa.advance();
/// assert!(sa.temperature() < 25.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedAnnealing {
    initial_temperature: f64,
    final_temperature: f64,
    cooling_rate: f64,
    temperature: f64,
}

impl SimulatedAnnealing {
    /// Validates `initial >= final >= 0` and `0 <= cooling_rate <= 1`.
    pub fn new(initial_temperature: f64, final_temperature: f64, cooling_rate: f64) -> Result<Self> {
        if !initial_temperature.is_finite() || !final_temperature.is_finite() {
            return Err(AlnsError::config("temperatures must be finite"));
        }
        if final_temperature < 0.0 {
            return Err(AlnsError::config(format!(
                "final_temperature must be non-negative, got {final_temperature}"
            )));
        }
        if initial_temperature < final_temperature {
            return Err(AlnsError::config(format!(
                "initial_temperature ({initial_temperature}) must be >= final_temperature ({final_temperature})"
            )));
        }
        if !(0.0..=1.0).contains(&cooling_rate) {
            return Err(AlnsError::config(format!(
                "cooling_rate must be in [0, 1], got {cooling_rate}"
            )));
        }
        Ok(Self {
            initial_temperature,
            final_temperature,
            cooling_rate,
            temperature: initial_temperature,
        })
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn initial_temperature(&self) -> f64 {
        self.initial_temperature
    }

    pub fn final_temperature(&self) -> f64 {
        self.final_temperature
    }

    pub fn cooling_rate(&self) -> f64 {
        self.cooling_rate
    }

    /// Probability of accepting a candidate `delta` units worse than current.
    pub fn acceptance_probability(&self, delta: f64) -> f64 {
        if delta <= 0.0 {
            1.0
        } else if self.temperature <= 0.0 {
            0.0
        } else {
            (-delta / self.temperature).exp()
        }
    }
}

impl AcceptStrategy for SimulatedAnnealing {
    fn accept<R: Rng>(&self, current: usize, candidate: usize, rng: &mut R) -> bool {
        if candidate <= current {
            return true;
        }
        let delta = (candidate - current) as f64;
        rng.random::<f64>() < self.acceptance_probability(delta)
    }

    fn advance(&mut self) {
        self.temperature = (self.temperature * self.cooling_rate).max(self.final_temperature);
    }

    fn reset(&mut self) {
        self.temperature = self.initial_temperature;
    }
}
