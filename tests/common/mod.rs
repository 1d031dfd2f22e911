#![allow(dead_code)] // Not every test binary uses every helper

use netforge::net::{NetBuilder, PetriNet};
use netforge::replay::Trace;

/// p1 -A-> {p2, p3}; p2 -B-> p4; p3 -C-> p4; p4 -D-> p5.
/// B and C both feed p4 without a join, so D can fire before the second branch lands.
pub fn split_net() -> PetriNet {
    NetBuilder::new(5)
        .transition("A", &[0], &[1, 2])
        .transition("B", &[1], &[3])
        .transition("C", &[2], &[3])
        .transition("D", &[3], &[4])
        .build()
        .unwrap()
}

/// "ABDC" -> ["A", "B", "D", "C"]
pub fn trace(s: &str) -> Trace {
    s.chars().map(|c| c.to_string()).collect()
}

pub fn traces(rows: &[&str]) -> Vec<Trace> {
    rows.iter().map(|r| trace(r)).collect()
}
