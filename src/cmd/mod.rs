pub mod discover;
pub mod replay;

use clap::Args;
use netforge::event_log::LogFormat;

/// Column selection shared by every command that reads a log.
#[derive(Args, Debug, Clone)]
pub struct LogArgs {
    /// CSV event log.
    #[arg(short, long)]
    pub log: String,

    #[arg(long, default_value = "Activity")]
    pub activity_column: String,

    /// Group one-event-per-row logs by this column. Without it every row is a
    /// whole trace, one character per activity.
    #[arg(long)]
    pub case_column: Option<String>,
}

impl LogArgs {
    pub fn format(&self) -> LogFormat {
        match &self.case_column {
            Some(case) => LogFormat::Events {
                case_column: case.clone(),
                activity_column: self.activity_column.clone(),
            },
            None => LogFormat::Compact {
                column: self.activity_column.clone(),
            },
        }
    }
}
