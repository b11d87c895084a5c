//! Round-robin call-center scheduler.
//!
//! One arrival generator feeds a single shared ready queue; a pool of agents
//! serves calls from it one quantum at a time, putting unfinished calls back
//! at the tail. The run ends once every generated call has been completed.

pub mod arrival;
pub mod config;
pub mod error;
pub mod prompt;
pub mod report;
pub mod scheduler;
pub mod simulation;
pub mod worker;

pub use config::{ArrivalConfig, SimConfig, TimingConfig, MAX_AGENTS};
pub use error::{Result, SimError};
pub use simulation::{RunSummary, Simulation};
