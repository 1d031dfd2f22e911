//! Token replay: drives traces through a net and scores the flow.
//!
//! A replay fires the trace's symbols in order, then compares the tokens
//! that moved against the tokens left behind. A perfectly completed run
//! leaves exactly one token (in the final place), which is not counted.

use crate::net::PetriNet;

/// One observed case: activity symbols in order.
pub type Trace = Vec<String>;

/// What happened during a single `run`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReplayOutcome {
    pub fired: usize,
    pub blocked: usize,
    /// Symbols with no matching transition; skipped.
    pub unknown: usize,
    pub produced_and_consumed: u64,
    pub remaining: u64,
    pub step_accuracy: f64,
}

/// Replays one trace against the current marking and adds its step accuracy
/// to `net.accuracy`. Does not reset the net.
pub fn run<S: AsRef<str>>(net: &mut PetriNet, trace: &[S]) -> ReplayOutcome {
    net.times_run += 1;

    let mut outcome = ReplayOutcome::default();
    for symbol in trace {
        let symbol = symbol.as_ref();
        if net.transition(symbol).is_none() {
            outcome.unknown += 1;
        } else if net.fire(symbol) {
            outcome.fired += 1;
        } else {
            outcome.blocked += 1;
        }
    }

    outcome.produced_and_consumed = produced_and_consumed(net);
    outcome.remaining = remaining_tokens(net);
    outcome.step_accuracy = step_accuracy(outcome.produced_and_consumed, outcome.remaining);

    net.accuracy += outcome.step_accuracy;
    outcome
}

/// Sum of `consumed + produced` over every arc.
pub fn produced_and_consumed(net: &PetriNet) -> u64 {
    net.transitions()
        .iter()
        .flat_map(|t| t.arcs())
        .map(|a| a.transferred())
        .sum()
}

/// Absolute tokens left in all places, minus the one a clean run ends with.
pub fn remaining_tokens(net: &PetriNet) -> u64 {
    let raw: u64 = net.places().iter().map(|p| p.holding.unsigned_abs()).sum();
    raw.saturating_sub(1)
}

#[inline(always)]
pub fn step_accuracy(produced_and_consumed: u64, remaining: u64) -> f64 {
    if produced_and_consumed == 0 {
        return 0.0;
    }
    let moved = produced_and_consumed as f64;
    (moved - remaining as f64) / moved
}

/// Mean step accuracy since the last full reset.
pub fn calculate_fitness(net: &mut PetriNet) -> f64 {
    net.fitness = net.accuracy / net.times_run.max(1) as f64;
    net.fitness
}

/// Full evaluation against a trace set: score baseline, one replay per trace
/// from a fresh marking, then fitness.
pub fn evaluate<S: AsRef<str>>(net: &mut PetriNet, traces: &[Vec<S>]) -> f64 {
    net.reset_all();
    for trace in traces {
        net.reset_tokens();
        run(net, trace);
    }
    calculate_fitness(net)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::{NetBuilder, ACCURACY_FLOOR};

    fn chain() -> PetriNet {
        NetBuilder::new(3)
            .transition("A", &[0], &[1])
            .transition("B", &[1], &[2])
            .build()
            .unwrap()
    }

    #[test]
    fn test_perfect_trace_scores_one() {
        let mut net = chain();
        net.reset_all();
        let out = run(&mut net, &["A", "B"]);

        assert_eq!(out.fired, 2);
        assert_eq!(out.produced_and_consumed, 4);
        assert_eq!(out.remaining, 0);
        assert_eq!(out.step_accuracy, 1.0);
        assert_eq!(net.accuracy, ACCURACY_FLOOR + 1.0);
        assert_eq!(net.times_run, 2);
    }

    #[test]
    fn test_unknown_and_blocked_are_counted() {
        let mut net = chain();
        let out = run(&mut net, &["B", "X", "A"]);
        assert_eq!(out.blocked, 1);
        assert_eq!(out.unknown, 1);
        assert_eq!(out.fired, 1);
    }

    #[test]
    fn test_zero_movement_guard() {
        assert_eq!(step_accuracy(0, 5), 0.0);
        assert_eq!(step_accuracy(4, 2), 0.5);
        // Leftovers may outweigh movement.
        assert!(step_accuracy(2, 4) < 0.0);
    }

    #[test]
    fn test_remaining_floors_at_zero() {
        let mut net = chain();
        net.reset_tokens();
        assert_eq!(remaining_tokens(&net), 0);
        net.fire("A");
        net.fire("A");
        assert_eq!(remaining_tokens(&net), 0);
    }

    #[test]
    fn test_fitness_uses_at_least_one_run() {
        let mut net = chain();
        net.times_run = 0;
        net.accuracy = 0.5;
        assert_eq!(calculate_fitness(&mut net), 0.5);
    }

    #[test]
    fn test_evaluate_empty_trace_set_is_floor() {
        let mut net = chain();
        let traces: Vec<Vec<String>> = Vec::new();
        assert_eq!(evaluate(&mut net, &traces), ACCURACY_FLOOR);
    }

    #[test]
    fn test_evaluate_is_repeatable() {
        let mut net = chain();
        let traces = vec![vec!["A", "B"], vec!["B", "A"]];
        let first = evaluate(&mut net, &traces);
        let second = evaluate(&mut net, &traces);
        assert_eq!(first, second);
        assert_eq!(net.times_run, 3);
    }
}
