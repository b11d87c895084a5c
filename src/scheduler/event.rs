use std::fmt;

use serde::Serialize;

use super::job::CallId;
use super::Ticks;

pub type AgentId = usize;

/// Scheduling events, emitted in timeline order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SchedEvent {
    Arrived {
        call: CallId,
        service: Ticks,
        at: Ticks,
    },
    // `at` is the clock when the slice started
    Served {
        agent: AgentId,
        call: CallId,
        at: Ticks,
        slice: Ticks,
    },
    Paused {
        agent: AgentId,
        call: CallId,
        remaining: Ticks,
    },
    Completed {
        agent: AgentId,
        call: CallId,
        at: Ticks,
    },
}

impl fmt::Display for SchedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedEvent::Arrived { call, service, at } => {
                write!(f, "[Time {}] New Call {} arrived (service {})", at, call, service)
            }
            SchedEvent::Served {
                agent, call, at, ..
            } => write!(f, "Agent {} serving Call {} at time {}", agent, call, at),
            SchedEvent::Paused {
                call, remaining, ..
            } => write!(f, "Call {} paused, remaining {}", call, remaining),
            SchedEvent::Completed { call, .. } => write!(f, "Call {} completed", call),
        }
    }
}
