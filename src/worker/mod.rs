//! Agent pool serving calls round-robin.
//!
//! Each [`Agent`] loops over the shared ready queue:
//!
//! 1. **Poll** the queue under its lock (see [`Dispatch`](crate::scheduler::Dispatch))
//! 2. **Serve** at most one quantum, advancing the logical clock
//! 3. **Requeue** the call at the tail if service time remains, otherwise
//!    retire it and decrement the active-call counter
//!
//! An agent exits only once the queue is empty, the arrival generator is done
//! and no call is in flight.

pub mod agent;

pub use agent::Agent;
