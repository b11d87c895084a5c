use tokio::sync::{Mutex, Notify};

use crate::config::SimConfig;
use crate::scheduler::clock::{EventSink, Timeline};
use crate::scheduler::queue::ReadyQueue;

/// State shared by the arrival generator and every agent.
///
/// Lock discipline: `queue` guards the ready calls, the active-call counter
/// and the producer flag; `timeline` guards the clock and the event output.
/// The two are never held at the same time.
#[derive(Debug)]
pub struct SchedulerContext {
    pub config: SimConfig,
    pub queue: Mutex<ReadyQueue>,
    pub timeline: Mutex<Timeline>,
    /// Signalled whenever a call becomes ready or the run may have drained
    pub ready: Notify,
}

impl SchedulerContext {
    pub fn new(config: SimConfig, sink: Option<EventSink>) -> Self {
        let timeline = Timeline::new(config.agents, sink);
        Self {
            config,
            queue: Mutex::new(ReadyQueue::new()),
            timeline: Mutex::new(timeline),
            ready: Notify::new(),
        }
    }

    /// Wait for a ready notification, bounded by the idle backoff.
    pub async fn wait_for_work(&self) {
        let backoff = self.config.timing.idle_backoff;
        // Timing out just means "poll again".
        let _ = tokio::time::timeout(backoff, self.ready.notified()).await;
    }

    /// Wake every idle agent so it re-checks the termination condition.
    pub fn wake_all(&self) {
        self.ready.notify_waiters();
    }
}
