pub mod config;
pub mod error;
pub mod event_log;
pub mod net;
pub mod optimizer;
pub mod replay;

pub use error::{NetForgeError, NfResult};
// cmd and reports belong to the binary (main.rs).
