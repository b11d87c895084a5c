//! Round-robin scheduling core.
//!
//! - [`ReadyQueue`]: the single shared FIFO plus termination bookkeeping
//! - [`Timeline`]: logical clock and ordered event output
//! - [`SchedulerContext`]: both of the above behind their own locks
//!
//! The arrival generator lives in [`crate::arrival`], the agents in
//! [`crate::worker`].

pub mod clock;
pub mod context;
pub mod event;
pub mod job;
pub mod queue;

/// Logical time units.
pub type Ticks = u64;

pub use clock::{event_channel, EventSink, EventStream, RunStats, Timeline};
pub use context::SchedulerContext;
pub use event::{AgentId, SchedEvent};
pub use job::{Call, CallId};
pub use queue::{Dispatch, ReadyQueue};
