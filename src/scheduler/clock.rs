use serde::Serialize;
use tokio::sync::mpsc;

use super::event::{AgentId, SchedEvent};
use super::job::Call;
use super::Ticks;

/// Receiving side of the event stream handed to the display layer.
pub type EventStream = mpsc::UnboundedReceiver<SchedEvent>;
pub type EventSink = mpsc::UnboundedSender<SchedEvent>;

pub fn event_channel() -> (EventSink, EventStream) {
    mpsc::unbounded_channel()
}

/// Counters accumulated over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub arrived: u64,
    pub completed: u64,
    pub slices: u64,
    pub preemptions: u64,
    /// Slices served by each agent, indexed by `agent - 1`
    pub slices_per_agent: Vec<u64>,
}

/// Logical clock plus the ordered event output.
///
/// Lives behind its own lock, separate from the ready queue. Events are sent
/// while that lock is held, so the stream order matches clock order.
#[derive(Debug)]
pub struct Timeline {
    now: Ticks,
    sink: Option<EventSink>,
    stats: RunStats,
}

impl Timeline {
    pub fn new(agents: usize, sink: Option<EventSink>) -> Self {
        Self {
            now: 0,
            sink,
            stats: RunStats {
                slices_per_agent: vec![0; agents],
                ..Default::default()
            },
        }
    }

    pub fn now(&self) -> Ticks {
        self.now
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    fn emit(&mut self, event: SchedEvent) {
        tracing::trace!(?event, "Scheduling event");
        if let Some(sink) = &self.sink {
            if sink.send(event).is_err() {
                tracing::debug!("Event receiver dropped, discarding further events");
                self.sink = None;
            }
        }
    }

    pub fn record_arrival(&mut self, call: &Call) {
        self.stats.arrived += 1;
        let at = self.now;
        self.emit(SchedEvent::Arrived {
            call: call.id,
            service: call.service,
            at,
        });
    }

    /// Serve one slice of `call` and advance the clock by the amount granted.
    pub fn serve_slice(&mut self, agent: AgentId, call: &mut Call, quantum: Ticks) -> Ticks {
        let at = self.now;
        let before = call.remaining;
        let served = call.serve(quantum);
        debug_assert!(served > 0 && call.remaining < before);

        self.now = self.now.saturating_add(served);
        self.stats.slices += 1;
        if let Some(count) = self.stats.slices_per_agent.get_mut(agent.wrapping_sub(1)) {
            *count += 1;
        }
        self.emit(SchedEvent::Served {
            agent,
            call: call.id,
            at,
            slice: served,
        });
        served
    }

    pub fn record_pause(&mut self, agent: AgentId, call: &Call) {
        self.stats.preemptions += 1;
        self.emit(SchedEvent::Paused {
            agent,
            call: call.id,
            remaining: call.remaining,
        });
    }

    pub fn record_completion(&mut self, agent: AgentId, call: &Call) {
        debug_assert!(call.is_finished(), "call {} completed early", call.id);
        self.stats.completed += 1;
        let at = self.now;
        self.emit(SchedEvent::Completed {
            agent,
            call: call.id,
            at,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_slice_advances_clock_by_granted_time() {
        let mut timeline = Timeline::new(1, None);
        let mut call = Call::new(1, 7);

        assert_eq!(timeline.serve_slice(1, &mut call, 5), 5);
        assert_eq!(timeline.now(), 5);
        assert_eq!(call.remaining, 2);

        assert_eq!(timeline.serve_slice(1, &mut call, 5), 2);
        assert_eq!(timeline.now(), 7);
        assert!(call.is_finished());
        assert_eq!(timeline.stats().slices, 2);
        assert_eq!(timeline.stats().slices_per_agent, vec![2]);
    }

    #[test]
    fn events_carry_slice_start_time() {
        let (sink, mut stream) = event_channel();
        let mut timeline = Timeline::new(2, Some(sink));
        let mut call = Call::new(4, 3);

        timeline.record_arrival(&call);
        timeline.serve_slice(2, &mut call, 10);
        timeline.record_completion(2, &call);

        assert_eq!(
            stream.try_recv().unwrap(),
            SchedEvent::Arrived {
                call: 4,
                service: 3,
                at: 0
            }
        );
        assert_eq!(
            stream.try_recv().unwrap(),
            SchedEvent::Served {
                agent: 2,
                call: 4,
                at: 0,
                slice: 3
            }
        );
        assert_eq!(
            stream.try_recv().unwrap(),
            SchedEvent::Completed {
                agent: 2,
                call: 4,
                at: 3
            }
        );
        assert_eq!(timeline.stats().slices_per_agent, vec![0, 1]);
    }

    #[test]
    fn dropped_receiver_does_not_stop_the_clock() {
        let (sink, stream) = event_channel();
        drop(stream);
        let mut timeline = Timeline::new(1, Some(sink));
        let mut call = Call::new(1, 4);

        timeline.serve_slice(1, &mut call, 2);
        timeline.record_pause(1, &call);
        assert_eq!(timeline.now(), 2);
        assert_eq!(timeline.stats().preemptions, 1);
    }
}
