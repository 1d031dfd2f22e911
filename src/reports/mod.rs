use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use netforge::event_log::CausalEntry;
use netforge::net::{Arc, PetriNet};
use netforge::optimizer::{MiningResult, StopReason};
use std::time::Duration;

fn arc_list(arcs: &[Arc]) -> String {
    if arcs.is_empty() {
        return "-".to_string();
    }
    arcs.iter()
        .map(|a| a.place.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn print_run_summary(result: &MiningResult, elapsed: Duration) {
    let mut table = new_table();

    let reason_color = match result.stop_reason {
        StopReason::TargetReached => Color::Green,
        StopReason::Aborted | StopReason::TimeLimit => Color::Yellow,
        _ => Color::White,
    };

    table.add_row(vec![
        Cell::new("Generations").add_attribute(Attribute::Bold),
        Cell::new("Stop"),
        Cell::new("Fitness").fg(Color::Cyan),
        Cell::new("Accuracy"),
        Cell::new("Runs"),
        Cell::new("Time"),
    ]);
    for i in [0, 2, 3, 4, 5] {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    table.add_row(vec![
        Cell::new(result.generations),
        Cell::new(result.stop_reason).fg(reason_color),
        Cell::new(format!("{:.4}", result.fitness)).fg(Color::Cyan),
        Cell::new(format!("{:.3}", result.accuracy)),
        Cell::new(result.times_run),
        Cell::new(format!("{:.1}s", elapsed.as_secs_f64())),
    ]);
    println!("\n{}", table);
}

/// One row per transition: which places it consumes from and produces into.
pub fn print_net(net: &PetriNet) {
    println!(
        "\nNet: {} places, {} transitions, {} arcs",
        net.place_count(),
        net.transitions().len(),
        net.arc_count()
    );

    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Transition").add_attribute(Attribute::Bold),
        Cell::new("Consume"),
        Cell::new("Produce"),
    ]);
    for t in net.transitions() {
        table.add_row(vec![
            Cell::new(&t.name).add_attribute(Attribute::Bold),
            Cell::new(arc_list(&t.consume)),
            Cell::new(arc_list(&t.produce)),
        ]);
    }
    println!("{}", table);

    let marking: Vec<String> = net
        .places()
        .iter()
        .filter(|p| p.holding != 0)
        .map(|p| format!("{}={}", p.name, p.holding))
        .collect();
    if !marking.is_empty() {
        println!("Marking: {}", marking.join(", "));
    }
}

/// Flow counters from the last replay, so blocked paths stand out.
pub fn print_arc_counters(net: &PetriNet) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Transition").add_attribute(Attribute::Bold),
        Cell::new("Kind"),
        Cell::new("Place"),
        Cell::new("Consumed"),
        Cell::new("Produced"),
        Cell::new("Missing").fg(Color::Red),
    ]);
    for i in 3..=5 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for t in net.transitions() {
        for a in t.arcs() {
            let missing = if a.missing > 0 {
                Cell::new(a.missing).fg(Color::Red)
            } else {
                Cell::new(a.missing)
            };
            table.add_row(vec![
                Cell::new(&t.name).add_attribute(Attribute::Bold),
                Cell::new(a.kind),
                Cell::new(a.place),
                Cell::new(a.consumed),
                Cell::new(a.produced),
                missing,
            ]);
        }
    }
    println!("\n{}", table);
}

/// Directly-follows view of the log the search is fitting.
pub fn print_causal_matrix(matrix: &[CausalEntry]) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Activity").add_attribute(Attribute::Bold),
        Cell::new("Inputs"),
        Cell::new("Outputs"),
    ]);
    for e in matrix {
        let list = |v: &[String]| if v.is_empty() { "-".to_string() } else { v.join(" ") };
        table.add_row(vec![
            Cell::new(&e.activity).add_attribute(Attribute::Bold),
            Cell::new(list(&e.inputs)),
            Cell::new(list(&e.outputs)),
        ]);
    }
    println!("\n{}", table);
}
