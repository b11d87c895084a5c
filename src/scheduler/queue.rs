use std::collections::VecDeque;

use crate::scheduler::job::Call;

/// Outcome of an agent polling the ready queue.
#[derive(Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// The head of the queue, now owned by the polling agent
    Call(Call),
    /// Nothing ready yet, but more work can still show up
    Idle,
    /// Queue empty, producer finished and no call in flight: the agent may exit
    Drained,
}

/// Shared FIFO of ready calls plus the bookkeeping used for termination.
///
/// Every method is meant to run under the same lock, so the queue contents,
/// the active-call counter and the producer flag always change together.
#[derive(Debug, Default)]
pub struct ReadyQueue {
    calls: VecDeque<Call>,
    active: usize,
    producer_done: bool,
}

impl ReadyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a call to the tail.
    pub fn enqueue(&mut self, call: Call) {
        debug_assert!(
            !self.calls.iter().any(|c| c.id == call.id),
            "call {} already present in the ready queue",
            call.id
        );
        debug_assert!(call.remaining > 0, "finished call {} enqueued", call.id);
        self.calls.push_back(call);
    }

    /// Remove the head. Callers check `is_empty` under the same lock first.
    pub fn dequeue(&mut self) -> Option<Call> {
        debug_assert!(!self.calls.is_empty(), "dequeue on an empty ready queue");
        self.calls.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Enqueue a brand-new call and count it as active.
    pub fn admit(&mut self, call: Call) {
        debug_assert!(
            !self.producer_done,
            "call {} admitted after production finished",
            call.id
        );
        self.enqueue(call);
        self.active += 1;
    }

    /// Put a partially served call back at the tail. It is still active.
    pub fn requeue(&mut self, call: Call) {
        debug_assert!(self.active > 0, "requeue of call {} with no active calls", call.id);
        self.enqueue(call);
    }

    /// Retire one finished call.
    pub fn complete(&mut self) {
        debug_assert!(self.active > 0, "active-call counter underflow");
        self.active = self.active.saturating_sub(1);
    }

    /// Record that no further call will ever be admitted.
    pub fn finish_production(&mut self) {
        debug_assert!(!self.producer_done, "production finished twice");
        self.producer_done = true;
    }

    /// Calls arrived but not yet completed, whether queued or held by an agent.
    pub fn active(&self) -> usize {
        self.active
    }

    pub fn producer_done(&self) -> bool {
        self.producer_done
    }

    /// True once nothing can ever become ready again.
    pub fn is_drained(&self) -> bool {
        self.calls.is_empty() && self.producer_done && self.active == 0
    }

    /// Decide what a polling agent does next.
    pub fn poll(&mut self) -> Dispatch {
        if !self.is_empty() {
            return match self.dequeue() {
                Some(call) => Dispatch::Call(call),
                None => Dispatch::Idle,
            };
        }
        if self.is_drained() {
            Dispatch::Drained
        } else {
            Dispatch::Idle
        }
    }
}
