//! Event log input: CSV rows turned into traces plus the activity alphabet.

use crate::error::{NetForgeError, NfResult};
use crate::replay::Trace;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Row layout of a log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    /// One row per trace; every character of the cell is one activity.
    Compact { column: String },
    /// One row per event, grouped into traces by case id.
    Events {
        case_column: String,
        activity_column: String,
    },
}

impl Default for LogFormat {
    fn default() -> Self {
        Self::Compact {
            column: "Activity".to_string(),
        }
    }
}

/// Activities seen directly before and after one activity anywhere in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CausalEntry {
    pub activity: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    pub traces: Vec<Trace>,
    /// Distinct activities in order of first appearance.
    pub activities: Vec<String>,
}

impl EventLog {
    pub fn from_traces(traces: Vec<Trace>) -> Self {
        let mut seen = HashSet::new();
        let mut activities = Vec::new();
        for symbol in traces.iter().flatten() {
            if seen.insert(symbol.as_str()) {
                activities.push(symbol.clone());
            }
        }
        Self { traces, activities }
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    pub fn event_count(&self) -> usize {
        self.traces.iter().map(Vec::len).sum()
    }

    /// Directly-follows relation, one entry per activity in alphabet order.
    /// Neighbours are listed once each, in order of first sighting.
    pub fn causal_matrix(&self) -> Vec<CausalEntry> {
        let index: HashMap<&str, usize> = self
            .activities
            .iter()
            .enumerate()
            .map(|(i, a)| (a.as_str(), i))
            .collect();
        let mut entries: Vec<CausalEntry> = self
            .activities
            .iter()
            .map(|a| CausalEntry {
                activity: a.clone(),
                inputs: Vec::new(),
                outputs: Vec::new(),
            })
            .collect();

        for trace in &self.traces {
            for pair in trace.windows(2) {
                let (from, to) = (&pair[0], &pair[1]);
                // Symbols outside `activities` have no row.
                let (Some(&f), Some(&t)) = (index.get(from.as_str()), index.get(to.as_str()))
                else {
                    continue;
                };
                if !entries[f].outputs.contains(to) {
                    entries[f].outputs.push(to.clone());
                }
                if !entries[t].inputs.contains(from) {
                    entries[t].inputs.push(from.clone());
                }
            }
        }
        entries
    }
}

pub fn load_event_log<R: Read>(reader: R, format: &LogFormat) -> NfResult<EventLog> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| -> NfResult<usize> {
        headers.iter().position(|h| h == name).ok_or_else(|| {
            NetForgeError::Validation(format!("log has no '{}' column", name))
        })
    };

    let traces = match format {
        LogFormat::Compact { column: name } => {
            let col = column(name)?;
            let mut traces = Vec::new();
            for (row, record) in rdr.records().enumerate() {
                let record = record?;
                match record.get(col) {
                    Some(cell) if !cell.is_empty() => {
                        traces.push(cell.chars().map(|c| c.to_string()).collect());
                    }
                    _ => warn!("Skipping row {}: empty '{}' cell", row + 1, name),
                }
            }
            traces
        }
        LogFormat::Events {
            case_column,
            activity_column,
        } => {
            let case_col = column(case_column)?;
            let act_col = column(activity_column)?;

            let mut order: Vec<Trace> = Vec::new();
            let mut by_case: HashMap<String, usize> = HashMap::new();
            for (row, record) in rdr.records().enumerate() {
                let record = record?;
                let case = record.get(case_col).unwrap_or("");
                let activity = record.get(act_col).unwrap_or("");
                if case.is_empty() || activity.is_empty() {
                    warn!("Skipping row {}: missing case id or activity", row + 1);
                    continue;
                }
                let slot = *by_case.entry(case.to_string()).or_insert_with(|| {
                    order.push(Vec::new());
                    order.len() - 1
                });
                order[slot].push(activity.to_string());
            }
            order
        }
    };

    let log = EventLog::from_traces(traces);
    info!(
        "📚 Loaded {} traces ({} events, {} activities)",
        log.traces.len(),
        log.event_count(),
        log.activities.len()
    );
    Ok(log)
}

pub fn load_event_log_from_path<P: AsRef<Path>>(path: P, format: &LogFormat) -> NfResult<EventLog> {
    let file = File::open(path)?;
    load_event_log(file, format)
}
