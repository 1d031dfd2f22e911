mod common;

use common::{split_net, trace, traces};
use netforge::net::ACCURACY_FLOOR;
use netforge::replay::{self, calculate_fitness};

const EPS: f64 = 1e-9;

#[test]
fn test_split_net_scenario() {
    let mut net = split_net();

    let first = replay::run(&mut net, &trace("ABDC"));
    assert_eq!(first.fired, 4);
    assert_eq!(first.produced_and_consumed, 9);
    assert_eq!(first.remaining, 1);
    assert!((first.step_accuracy - 8.0 / 9.0).abs() < EPS);

    net.reset_tokens();
    let second = replay::run(&mut net, &trace("ACDB"));
    assert_eq!(second.fired, 4);
    assert_eq!(net.times_run, 2);

    // Every arc moved exactly one token on the second replay.
    for t in net.transitions() {
        for a in &t.consume {
            assert_eq!((a.consumed, a.produced), (1, 0), "{} consume {}", t.name, a.place);
        }
        for a in &t.produce {
            assert_eq!((a.consumed, a.produced), (0, 1), "{} produce {}", t.name, a.place);
        }
    }

    let fitness = calculate_fitness(&mut net);
    let expected = (ACCURACY_FLOOR + 16.0 / 9.0) / 2.0;
    assert!((fitness - expected).abs() < EPS);
    assert!(fitness > 0.0 && fitness < 1.0);
}

#[test]
fn test_evaluate_uses_reset_baseline() {
    let mut net = split_net();
    let fitness = replay::evaluate(&mut net, &traces(&["ABDC", "ACDB"]));

    assert_eq!(net.times_run, 3);
    let expected = (ACCURACY_FLOOR + 16.0 / 9.0) / 3.0;
    assert!((fitness - expected).abs() < EPS);
    assert_eq!(net.fitness, fitness);
}

#[test]
fn test_evaluate_is_repeatable() {
    let log = traces(&["ABDC", "ACDB", "ABCD", "DCBA"]);
    let mut net = split_net();
    let a = replay::evaluate(&mut net, &log);
    let b = replay::evaluate(&mut net, &log);
    assert_eq!(a, b);
}

#[test]
fn test_empty_trace_scores_zero_step() {
    let mut net = split_net();
    net.reset_all();
    let empty: Vec<String> = Vec::new();
    let out = replay::run(&mut net, &empty);

    assert_eq!(out.produced_and_consumed, 0);
    assert_eq!(out.step_accuracy, 0.0);
    assert_eq!(net.accuracy, ACCURACY_FLOOR);
    assert_eq!(net.times_run, 2);
    assert_eq!(net.holdings(), vec![1, 0, 0, 0, 0]);
}

#[test]
fn test_unknown_symbols_skipped() {
    let mut net = split_net();
    let out = replay::run(&mut net, &trace("AXBYD"));
    assert_eq!(out.unknown, 2);
    assert_eq!(out.fired, 3);
}

#[test]
fn test_clean_chain_scores_perfect_step() {
    let mut net = netforge::net::NetBuilder::new(3)
        .transition("A", &[0], &[1])
        .transition("B", &[1], &[2])
        .build()
        .unwrap();
    let out = replay::run(&mut net, &trace("AB"));
    assert_eq!(out.remaining, 0);
    assert_eq!(out.step_accuracy, 1.0);
}
