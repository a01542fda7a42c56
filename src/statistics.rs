//! Run statistics collected from search events.

use crate::events::{Event, EventHandler, EventPayload};
use crate::select::{OperatorStats, SegmentSnapshot};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

/// One improvement of the best solution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BestRecord {
    /// `|S|` of the new best solution.
    pub objective: usize,
    pub iteration: u64,
    pub elapsed: Duration,
    /// Repair operator that produced it.
    pub operator: String,
}

/// Per-segment history of one operator.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OperatorSeries {
    pub attempts: Vec<usize>,
    pub scores: Vec<f64>,
    /// Starts with the initial weight, then one entry per segment.
    pub weights: Vec<f64>,
}

impl OperatorSeries {
    fn starting_at(weight: f64) -> Self {
        Self {
            attempts: Vec::new(),
            scores: Vec::new(),
            weights: vec![weight],
        }
    }

    fn push(&mut self, stats: &OperatorStats) {
        self.attempts.push(stats.segment_uses);
        self.scores.push(stats.segment_score);
        self.weights.push(stats.weight);
    }
}

/// Exportable view of a run.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Metrics {
    pub best_solution_progression: Vec<BestRecord>,
    pub destroy_operators: BTreeMap<String, OperatorSeries>,
    pub repair_operators: BTreeMap<String, OperatorSeries>,
}

/// Collector fed by [`EventHandler`] callbacks.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    runtime: Option<Duration>,
    best: Vec<BestRecord>,
    destroy_names: Vec<String>,
    repair_names: Vec<String>,
    destroy: Vec<OperatorSeries>,
    repair: Vec<OperatorSeries>,
}

impl Statistics {
    /// Creates a collector for the named operators, each starting at weight 1.0.
    pub fn new(destroy_names: Vec<String>, repair_names: Vec<String>) -> Self {
        let destroy = vec![1.0; destroy_names.len()];
        let repair = vec![1.0; repair_names.len()];
        Self::with_initial_weights(destroy_names, repair_names, &destroy, &repair)
    }

    pub fn with_initial_weights(
        destroy_names: Vec<String>,
        repair_names: Vec<String>,
        destroy_weights: &[f64],
        repair_weights: &[f64],
    ) -> Self {
        let series = |names: &[String], weights: &[f64]| -> Vec<OperatorSeries> {
            (0..names.len())
                .map(|i| OperatorSeries::starting_at(weights.get(i).copied().unwrap_or(1.0)))
                .collect()
        };
        Self {
            runtime: None,
            best: Vec::new(),
            destroy: series(&destroy_names, destroy_weights),
            repair: series(&repair_names, repair_weights),
            destroy_names,
            repair_names,
        }
    }

    /// Subscribes `stats` to the end and best events, and to segment updates
    /// when `track_operators` is set.
    pub fn subscribe(stats: &Rc<RefCell<Statistics>>, events: &mut EventHandler, track_operators: bool) {
        let on_end = Rc::clone(stats);
        events.register(Event::OnEnd, move |payload| {
            if let EventPayload::End { elapsed, .. } = payload {
                on_end.borrow_mut().record_end(*elapsed);
            }
        });

        let on_best = Rc::clone(stats);
        events.register(Event::OnBest, move |payload| {
            if let EventPayload::Outcome {
                solution,
                iteration,
                elapsed,
                operator,
                ..
            } = payload
            {
                on_best
                    .borrow_mut()
                    .record_best(solution.objective(), *iteration, *elapsed, operator);
            }
        });

        if track_operators {
            let on_update = Rc::clone(stats);
            events.register(Event::OnSelectUpdate, move |payload| {
                if let EventPayload::SelectUpdate(snapshot) = payload {
                    on_update.borrow_mut().record_segment(snapshot);
                }
            });
        }
    }

    pub fn record_best(&mut self, objective: usize, iteration: u64, elapsed: Duration, operator: &str) {
        self.best.push(BestRecord {
            objective,
            iteration,
            elapsed,
            operator: operator.to_owned(),
        });
    }

    pub fn record_end(&mut self, elapsed: Duration) {
        self.runtime = Some(elapsed);
    }

    pub fn record_segment(&mut self, snapshot: &SegmentSnapshot) {
        for (series, stats) in self.destroy.iter_mut().zip(&snapshot.destroy) {
            series.push(stats);
        }
        for (series, stats) in self.repair.iter_mut().zip(&snapshot.repair) {
            series.push(stats);
        }
    }

    /// Wall time of the finished run, `None` while it is still running.
    pub fn runtime_duration(&self) -> Option<Duration> {
        self.runtime
    }

    /// The most recent best-solution record.
    pub fn last_time_to_best(&self) -> Option<&BestRecord> {
        self.best.last()
    }

    pub fn best_progression(&self) -> &[BestRecord] {
        &self.best
    }

    pub fn destroy_series(&self, name: &str) -> Option<&OperatorSeries> {
        let i = self.destroy_names.iter().position(|n| n == name)?;
        self.destroy.get(i)
    }

    pub fn repair_series(&self, name: &str) -> Option<&OperatorSeries> {
        let i = self.repair_names.iter().position(|n| n == name)?;
        self.repair.get(i)
    }

    pub fn metrics(&self) -> Metrics {
        let keyed = |names: &[String], series: &[OperatorSeries]| -> BTreeMap<String, OperatorSeries> {
            names.iter().cloned().zip(series.iter().cloned()).collect()
        };
        Metrics {
            best_solution_progression: self.best.clone(),
            destroy_operators: keyed(&self.destroy_names, &self.destroy),
            repair_operators: keyed(&self.repair_names, &self.repair),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::outcome::Outcome;
    use crate::state::SolutionState;
    use std::sync::Arc;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_collects_from_events() {
        let stats = Rc::new(RefCell::new(Statistics::new(
            names(&["random_destroy"]),
            names(&["random_repair", "least_dominated_repair"]),
        )));
        let mut events = EventHandler::new();
        Statistics::subscribe(&stats, &mut events, true);

        let graph = Arc::new(Graph::cycle(5));
        let mut state = SolutionState::new(graph, 1).unwrap();
        state.materialize();
        state.add_to_solution(0);

        events.on_outcome(Outcome::Best, &state, 4, Duration::from_millis(3), "random_repair");
        events.on_outcome(Outcome::Better, &state, 5, Duration::from_millis(4), "random_repair");

        let snapshot = SegmentSnapshot {
            segment: 0,
            destroy: vec![OperatorStats {
                weight: 2.5,
                segment_score: 33.0,
                segment_uses: 2,
            }],
            repair: vec![
                OperatorStats {
                    weight: 1.0,
                    segment_score: 0.0,
                    segment_uses: 0,
                },
                OperatorStats {
                    weight: 17.0,
                    segment_score: 33.0,
                    segment_uses: 2,
                },
            ],
        };
        events.trigger(Event::OnSelectUpdate, &EventPayload::SelectUpdate(&snapshot));
        assert!(stats.borrow().runtime_duration().is_none());
        events.trigger(
            Event::OnEnd,
            &EventPayload::End {
                iteration: 9,
                elapsed: Duration::from_millis(12),
            },
        );

        let stats = stats.borrow();
        assert_eq!(stats.runtime_duration(), Some(Duration::from_millis(12)));
        let last = stats.last_time_to_best().unwrap();
        assert_eq!(last.objective, 1);
        assert_eq!(last.iteration, 4);
        assert_eq!(stats.best_progression().len(), 1);

        let series = stats.repair_series("least_dominated_repair").unwrap();
        assert_eq!(series.weights, vec![1.0, 17.0]);
        assert_eq!(series.attempts, vec![2]);

        let metrics = stats.metrics();
        assert_eq!(metrics.destroy_operators["random_destroy"].scores, vec![33.0]);
        assert_eq!(metrics.repair_operators.len(), 2);
    }

    #[test]
    fn test_operator_tracking_is_optional() {
        let stats = Rc::new(RefCell::new(Statistics::new(names(&["d"]), names(&["r"]))));
        let mut events = EventHandler::new();
        Statistics::subscribe(&stats, &mut events, false);
        assert!(events.is_empty(Event::OnSelectUpdate));
        assert_eq!(stats.borrow().repair_series("r").unwrap().weights, vec![1.0]);
        assert!(stats.borrow().repair_series("missing").is_none());
    }
}
