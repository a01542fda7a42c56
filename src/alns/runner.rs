//! ALNS execution loop.

use super::config::AlnsConfig;
use crate::accept::{AcceptStrategy, SimulatedAnnealing};
use crate::error::{AlnsError, Result};
use crate::events::{Event, EventHandler, EventPayload};
use crate::operators::{
    DestroyOperator, Operator, OperatorContext, OperatorKind, OperatorName, RandomRepair,
    RepairOperator,
};
use crate::outcome::Outcome;
use crate::random::{create_rng, create_rng_from_entropy, SearchRng};
use crate::select::{RouletteWheelSelect, SelectStrategy};
use crate::state::SolutionState;
use crate::statistics::Statistics;
use crate::stop::StopCondition;
use std::cell::{Ref, RefCell};
use std::rc::Rc;
use tracing::{debug, info, trace};

/// Adaptive Large Neighborhood Search over a k-domination state.
///
/// Each iteration picks a destroy/repair pair through the select strategy,
/// destroys and repairs a private copy of the current solution, classifies
/// the candidate with the accept strategy and feeds the outcome back to the
/// selector and the event bus.
pub struct Alns<A = SimulatedAnnealing, S = RouletteWheelSelect> {
    stop: StopCondition,
    accept: A,
    select: S,
    rng: SearchRng,
    events: EventHandler,
    destroy_operators: Vec<DestroyOperator>,
    repair_operators: Vec<RepairOperator>,
    statistics: Rc<RefCell<Statistics>>,
    track_statistics: bool,
    track_operators: bool,
    subscribed: bool,
}

impl<A: AcceptStrategy, S: SelectStrategy> Alns<A, S> {
    /// Creates an engine without operators.
    pub fn new(stop: StopCondition, accept: A, select: S, rng: SearchRng) -> Self {
        Self {
            stop,
            accept,
            select,
            rng,
            events: EventHandler::new(),
            destroy_operators: Vec::new(),
            repair_operators: Vec::new(),
            statistics: Rc::new(RefCell::new(Statistics::default())),
            track_statistics: true,
            track_operators: true,
            subscribed: false,
        }
    }

    /// Enables or disables the built-in statistics collector.
    pub fn with_statistics(mut self, track: bool) -> Self {
        self.track_statistics = track;
        self
    }

    /// Enables or disables the per-operator segment series; the best trace
    /// and runtime are unaffected.
    pub fn with_operator_tracking(mut self, track: bool) -> Self {
        self.track_operators = track;
        self
    }

    /// Adds a destroy operator; an operator with the same name is replaced
    /// in place.
    pub fn add_destroy_operator(&mut self, op: impl Into<DestroyOperator>) {
        let op = op.into();
        match self.destroy_operators.iter().position(|o| o.name() == op.name()) {
            Some(i) => self.destroy_operators[i] = op,
            None => self.destroy_operators.push(op),
        }
    }

    /// Adds a repair operator; an operator with the same name is replaced
    /// in place.
    pub fn add_repair_operator(&mut self, op: impl Into<RepairOperator>) {
        let op = op.into();
        match self.repair_operators.iter().position(|o| o.name() == op.name()) {
            Some(i) => self.repair_operators[i] = op,
            None => self.repair_operators.push(op),
        }
    }

    /// Builds the operator registered under `name` and adds it.
    pub fn add_operator_by_name(&mut self, name: &str, ctx: &OperatorContext) -> Result<()> {
        match name.parse::<OperatorName>()?.kind() {
            OperatorKind::Destroy => self.add_destroy_operator(ctx.destroy(name)?),
            OperatorKind::Repair => self.add_repair_operator(ctx.repair(name)?),
        }
        Ok(())
    }

    pub(super) fn set_single_pair(&mut self, destroy: Option<DestroyOperator>, repair: Option<RepairOperator>) {
        if let Some(op) = destroy {
            self.destroy_operators = vec![op];
        }
        if let Some(op) = repair {
            self.repair_operators = vec![op];
        }
    }

    pub fn destroy_operators(&self) -> &[DestroyOperator] {
        &self.destroy_operators
    }

    pub fn repair_operators(&self) -> &[RepairOperator] {
        &self.repair_operators
    }

    pub fn num_destroy_operators(&self) -> usize {
        self.destroy_operators.len()
    }

    pub fn num_repair_operators(&self) -> usize {
        self.repair_operators.len()
    }

    pub fn stop_condition(&self) -> &StopCondition {
        &self.stop
    }

    pub fn accept_strategy(&self) -> &A {
        &self.accept
    }

    pub fn select_strategy(&self) -> &S {
        &self.select
    }

    /// Event bus for custom subscriptions.
    pub fn events_mut(&mut self) -> &mut EventHandler {
        &mut self.events
    }

    /// Statistics of the last run.
    pub fn statistics(&self) -> Ref<'_, Statistics> {
        self.statistics.borrow()
    }

    /// Clears temperature, weights, counters and subscriptions, and installs
    /// a new generator for the next independent run.
    pub fn reset(&mut self, rng: SearchRng) {
        self.stop.reset();
        self.accept.reset();
        self.select.reset();
        self.events.unregister_all();
        self.statistics = Rc::new(RefCell::new(Statistics::default()));
        self.subscribed = false;
        self.rng = rng;
    }

    fn validate(&self) -> Result<()> {
        if self.destroy_operators.is_empty() || self.repair_operators.is_empty() {
            return Err(AlnsError::MissingOperators {
                destroy: self.destroy_operators.len(),
                repair: self.repair_operators.len(),
            });
        }
        if self.select.num_destroy() != self.destroy_operators.len()
            || self.select.num_repair() != self.repair_operators.len()
        {
            return Err(AlnsError::config(format!(
                "select strategy expects {} destroy and {} repair operators, {} and {} registered",
                self.select.num_destroy(),
                self.select.num_repair(),
                self.destroy_operators.len(),
                self.repair_operators.len()
            )));
        }
        Ok(())
    }

    fn prepare_statistics(&mut self) {
        if !self.track_statistics {
            return;
        }
        let (destroy_weights, repair_weights) = self.select.weights();
        *self.statistics.borrow_mut() = Statistics::with_initial_weights(
            self.destroy_operators.iter().map(|o| o.name().to_owned()).collect(),
            self.repair_operators.iter().map(|o| o.name().to_owned()).collect(),
            &destroy_weights,
            &repair_weights,
        );
        if !self.subscribed {
            Statistics::subscribe(&self.statistics, &mut self.events, self.track_operators);
            self.subscribed = true;
        }
    }

    /// Runs the search from the empty solution of `initial` and returns the
    /// best solution found.
    ///
    /// Fails before touching any operator when no destroy or no repair
    /// operator is registered.
    pub fn execute(&mut self, initial: SolutionState) -> Result<SolutionState> {
        self.validate()?;

        let mut current = initial;
        current.register_columns(RandomRepair.required_columns());
        for op in &self.destroy_operators {
            current.register_columns(op.required_columns());
        }
        for op in &self.repair_operators {
            current.register_columns(op.required_columns());
        }
        current.materialize();

        self.stop.start();
        self.prepare_statistics();

        let graph = current.graph();
        info!(
            event = "search_start",
            node_count = graph.node_count(),
            edge_count = graph.edge_count(),
            k = current.k(),
            destroy_operators = self.destroy_operators.len(),
            repair_operators = self.repair_operators.len(),
        );

        RandomRepair.operate(&mut current, &mut self.rng);
        let mut best = current.clone();
        self.events.on_outcome(
            Outcome::Best,
            &best,
            0,
            self.stop.elapsed(),
            RandomRepair::NAME,
        );
        info!(event = "bootstrap", objective = best.objective());

        while !self.stop.stop() {
            let iteration = self.stop.iteration();
            let (d, r) = self.select.select(&mut self.rng);
            self.events.trigger(
                Event::OnSelect,
                &EventPayload::Select {
                    destroy: d,
                    repair: r,
                    iteration,
                },
            );

            let mut candidate = current.clone();
            self.destroy_operators[d].operate(&mut candidate, &mut self.rng);
            self.repair_operators[r].operate(&mut candidate, &mut self.rng);

            let outcome = self.accept.evaluate(
                best.objective(),
                current.objective(),
                candidate.objective(),
                &mut self.rng,
            );
            trace!(
                event = "iteration",
                iteration,
                destroy = self.destroy_operators[d].name(),
                repair = self.repair_operators[r].name(),
                objective = candidate.objective(),
                outcome = %outcome,
            );
            self.events.on_outcome(
                outcome,
                &candidate,
                iteration,
                self.stop.elapsed(),
                self.repair_operators[r].name(),
            );

            match outcome {
                Outcome::Best => {
                    debug!(
                        event = "new_best",
                        iteration,
                        objective = candidate.objective(),
                        repair = self.repair_operators[r].name(),
                    );
                    best = candidate.clone();
                    current = candidate;
                }
                Outcome::Rejected => {}
                _ => current = candidate,
            }

            if let Some(snapshot) = self.select.record(d, r, outcome) {
                debug!(
                    event = "segment_update",
                    segment = snapshot.segment,
                    iteration,
                );
                self.events
                    .trigger(Event::OnSelectUpdate, &EventPayload::SelectUpdate(&snapshot));
            }
            self.accept.advance();
        }

        let iterations = self.stop.iteration().saturating_sub(1);
        let elapsed = self.stop.elapsed();
        self.events.trigger(
            Event::OnEnd,
            &EventPayload::End {
                iteration: iterations,
                elapsed,
            },
        );
        info!(
            event = "search_end",
            objective = best.objective(),
            iterations,
            duration_ms = elapsed.as_millis() as u64,
        );
        Ok(best)
    }
}

impl Alns {
    /// Builds the full engine from a configuration: operators through the
    /// registry, simulated annealing, roulette wheel and a seeded generator.
    pub fn from_config(config: &AlnsConfig) -> Result<Self> {
        config.validate()?;
        let destroy = config.build_destroy_operators()?;
        let repair = config.build_repair_operators()?;
        let select = config.build_select(destroy.len(), repair.len())?;
        let rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng_from_entropy(),
        };

        let mut alns = Alns::new(config.build_stop()?, config.build_accept()?, select, rng)
            .with_operator_tracking(config.track_statistics);
        for op in destroy {
            alns.add_destroy_operator(op);
        }
        for op in repair {
            alns.add_repair_operator(op);
        }
        Ok(alns)
    }
}

impl<A: std::fmt::Debug, S: std::fmt::Debug> std::fmt::Debug for Alns<A, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Alns")
            .field("stop", &self.stop)
            .field("accept", &self.accept)
            .field("select", &self.select)
            .field("destroy_operators", &self.destroy_operators)
            .field("repair_operators", &self.repair_operators)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::operators::{GreedyRepair, RandomDestroy};
    use crate::outcome::RewardTable;
    use crate::stop::StopMethod;
    use std::sync::Arc;

    fn cycle_state(n: usize, k: u32) -> SolutionState {
        SolutionState::new(Arc::new(Graph::cycle(n)), k).unwrap()
    }

    fn cycle_engine(seed: u64, iterations: u64) -> Alns {
        let select = RouletteWheelSelect::new(1, 1, 10, 0.5, RewardTable::default()).unwrap();
        let mut alns = Alns::new(
            StopCondition::iterations(iterations).unwrap(),
            SimulatedAnnealing::new(25.0, 1.0, 0.9975).unwrap(),
            select,
            create_rng(seed),
        );
        alns.add_destroy_operator(RandomDestroy::new(0.5).unwrap());
        alns.add_repair_operator(RandomRepair);
        alns
    }

    #[test]
    fn test_cycle_scenario_is_feasible_and_reproducible() {
        let run = |seed| {
            let mut alns = cycle_engine(seed, 50);
            let best = alns.execute(cycle_state(10, 1)).unwrap();
            assert!(best.is_feasible());
            assert!(best.invariants_hold());
            assert!(best.objective() >= 4);
            assert!(best.objective() <= 10);
            assert_eq!(alns.stop_condition().iteration(), 51);
            best.solution().sorted()
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn test_missing_repair_operator_fails_fast() {
        let select = RouletteWheelSelect::new(1, 0, 10, 0.5, RewardTable::default()).unwrap();
        let mut alns = Alns::new(
            StopCondition::iterations(10).unwrap(),
            SimulatedAnnealing::new(25.0, 1.0, 0.9975).unwrap(),
            select,
            create_rng(0),
        );
        alns.add_destroy_operator(RandomDestroy::new(0.5).unwrap());

        let err = alns.execute(cycle_state(6, 1)).unwrap_err();
        assert_eq!(err, AlnsError::MissingOperators { destroy: 1, repair: 0 });
        assert_eq!(alns.stop_condition().iteration(), 0);
    }

    #[test]
    fn test_selector_size_mismatch_is_a_configuration_error() {
        let mut alns = cycle_engine(0, 5);
        alns.add_repair_operator(GreedyRepair::degree(0.1).unwrap());
        assert!(matches!(
            alns.execute(cycle_state(6, 1)),
            Err(AlnsError::Configuration(_))
        ));
    }

    #[test]
    fn test_same_name_replaces_operator() {
        let mut alns = cycle_engine(0, 5);
        alns.add_destroy_operator(RandomDestroy::new(0.25).unwrap());
        assert_eq!(alns.num_destroy_operators(), 1);
        match &alns.destroy_operators()[0] {
            DestroyOperator::Random(op) => assert_eq!(op.factor(), 0.25),
        }
    }

    #[test]
    fn test_events_and_statistics() {
        let mut alns = cycle_engine(3, 30);
        let selections = Rc::new(RefCell::new(0u64));
        let outcomes = Rc::new(RefCell::new(0u64));
        {
            let selections = Rc::clone(&selections);
            alns.events_mut().register(Event::OnSelect, move |_| *selections.borrow_mut() += 1);
            let outcomes = Rc::clone(&outcomes);
            alns.events_mut()
                .register(Event::OnAnyOutcome, move |_| *outcomes.borrow_mut() += 1);
        }
        let best = alns.execute(cycle_state(12, 1)).unwrap();

        assert_eq!(*selections.borrow(), 30);
        // Every iteration plus the bootstrap best.
        assert_eq!(*outcomes.borrow(), 31);

        let stats = alns.statistics();
        assert!(stats.runtime_duration().is_some());
        let first = &stats.best_progression()[0];
        assert_eq!(first.iteration, 0);
        assert_eq!(first.operator, "random_repair");
        assert_eq!(stats.last_time_to_best().unwrap().objective, best.objective());
        // Three closed segments of ten iterations.
        let series = stats.destroy_series("random_destroy").unwrap();
        assert_eq!(series.weights.len(), 4);
        assert_eq!(series.attempts, vec![10, 10, 10]);
    }

    #[test]
    fn test_reset_allows_independent_rerun() {
        let mut alns = cycle_engine(11, 20);
        let first = alns.execute(cycle_state(15, 2)).unwrap();
        alns.reset(create_rng(11));
        let second = alns.execute(cycle_state(15, 2)).unwrap();
        assert_eq!(first.solution().sorted(), second.solution().sorted());
        assert_eq!(alns.statistics().best_progression()[0].iteration, 0);
    }

    #[test]
    fn test_from_config_runs_all_operators() {
        let config = AlnsConfig::default()
            .with_stop(StopMethod::ByIterationLimit, 60)
            .with_segment_length(10)
            .with_seed(5);
        let mut alns = Alns::from_config(&config).unwrap();
        assert_eq!(alns.num_repair_operators(), 5);

        let edges = [
            (0, 1),
            (0, 2),
            (0, 3),
            (1, 2),
            (3, 4),
            (4, 5),
            (5, 6),
            (6, 7),
            (7, 4),
        ];
        let graph = Arc::new(Graph::from_edges(8, &edges).unwrap());
        let best = alns.execute(SolutionState::new(graph, 2).unwrap()).unwrap();
        assert!(best.is_feasible());
        let metrics = alns.statistics().metrics();
        assert_eq!(metrics.repair_operators.len(), 5);
        let attempts: usize = metrics
            .repair_operators
            .values()
            .map(|s| s.attempts.iter().sum::<usize>())
            .sum();
        assert_eq!(attempts, 60);
    }

    #[test]
    fn test_add_operator_by_name() {
        let mut alns = cycle_engine(0, 5);
        let ctx = OperatorContext::default();
        alns.add_operator_by_name("least_dominated_repair", &ctx).unwrap();
        alns.add_operator_by_name("random_destroy", &ctx).unwrap();
        assert_eq!(alns.num_repair_operators(), 2);
        assert_eq!(alns.num_destroy_operators(), 1);
        assert!(alns.add_operator_by_name("tabu_repair", &ctx).is_err());
    }

    #[test]
    fn test_without_statistics() {
        let mut alns = cycle_engine(1, 5).with_statistics(false);
        alns.execute(cycle_state(8, 1)).unwrap();
        assert!(alns.statistics().best_progression().is_empty());
        assert!(alns.events_mut().is_empty(Event::OnBest));
    }

    #[test]
    fn test_config_without_operator_tracking_keeps_run_results() {
        let config = AlnsConfig::default()
            .with_stop(StopMethod::ByIterationLimit, 50)
            .with_segment_length(10)
            .with_track_statistics(false)
            .with_seed(11);
        let mut alns = Alns::from_config(&config).unwrap();
        let best = alns.execute(cycle_state(20, 1)).unwrap();

        let stats = alns.statistics();
        assert!(stats.runtime_duration().is_some());
        assert!(!stats.best_progression().is_empty());
        assert_eq!(
            stats.last_time_to_best().map(|r| r.objective),
            Some(best.objective())
        );
        let metrics = stats.metrics();
        assert!(metrics
            .repair_operators
            .values()
            .all(|s| s.attempts.is_empty() && s.weights.len() == 1));
    }
}
