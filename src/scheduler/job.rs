use serde::{Deserialize, Serialize};

use super::Ticks;

pub type CallId = u64;

/// An incoming call waiting for, or holding, an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    pub id: CallId,
    /// Service time drawn at arrival
    pub service: Ticks,
    /// Service time still owed; strictly positive while the call is active
    pub remaining: Ticks,
}

impl Call {
    pub fn new(id: CallId, service: Ticks) -> Self {
        debug_assert!(service > 0, "call {id} created with zero service time");
        Self {
            id,
            service,
            remaining: service,
        }
    }

    /// Grant one slice of at most `quantum` and return how much was served.
    ///
    /// A call whose remaining time is `<= quantum` finishes in this slice.
    pub fn serve(&mut self, quantum: Ticks) -> Ticks {
        debug_assert!(self.remaining > 0, "call {} served after completion", self.id);
        let served = self.remaining.min(quantum);
        self.remaining -= served;
        served
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_call_owes_full_service() {
        let call = Call::new(3, 6);
        assert_eq!(call.id, 3);
        assert_eq!(call.service, 6);
        assert_eq!(call.remaining, 6);
        assert!(!call.is_finished());
    }

    #[test]
    fn serve_longer_than_quantum_leaves_remainder() {
        let mut call = Call::new(1, 7);
        assert_eq!(call.serve(5), 5);
        assert_eq!(call.remaining, 2);
        assert!(!call.is_finished());

        assert_eq!(call.serve(5), 2);
        assert_eq!(call.remaining, 0);
        assert!(call.is_finished());
    }

    #[test]
    fn serve_exactly_quantum_finishes() {
        let mut call = Call::new(1, 4);
        assert_eq!(call.serve(4), 4);
        assert!(call.is_finished());
    }

    #[test]
    fn remaining_strictly_decreases() {
        let mut call = Call::new(9, 10);
        let mut last = call.remaining;
        while !call.is_finished() {
            call.serve(3);
            assert!(call.remaining < last);
            last = call.remaining;
        }
        assert_eq!(call.remaining, 0);
    }
}
