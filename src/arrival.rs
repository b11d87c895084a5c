//! Arrival generator: the single producer feeding the ready queue.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::scheduler::{Call, CallId, SchedulerContext, Ticks};

pub struct ArrivalGenerator {
    ctx: Arc<SchedulerContext>,
    rng: StdRng,
    next_id: CallId,
}

impl ArrivalGenerator {
    pub fn new(ctx: Arc<SchedulerContext>) -> Self {
        let rng = match ctx.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            ctx,
            rng,
            next_id: 1,
        }
    }

    fn pause_for(&self, gap: Ticks) -> Duration {
        let units = u32::try_from(gap).unwrap_or(u32::MAX);
        self.ctx.config.timing.tick.saturating_mul(units)
    }

    /// Generate the configured number of calls, then mark production done.
    ///
    /// Returns the number of calls generated.
    pub async fn run(mut self) -> u64 {
        let total = self.ctx.config.total_calls;
        let arrival = self.ctx.config.arrival.clone();

        while self.next_id <= total {
            let gap = self.rng.gen_range(arrival.inter_arrival.clone());
            tokio::time::sleep(self.pause_for(gap)).await;

            let service = self.rng.gen_range(arrival.service_time.clone());
            let call = Call::new(self.next_id, service);
            self.next_id += 1;

            // Announce before admitting so the arrival always precedes
            // the first slice in the event stream.
            {
                let mut timeline = self.ctx.timeline.lock().await;
                timeline.record_arrival(&call);
            }
            tracing::debug!(call = call.id, service, "Call arrived");

            self.ctx.queue.lock().await.admit(call);
            self.ctx.ready.notify_one();
        }

        self.ctx.queue.lock().await.finish_production();
        self.ctx.wake_all();

        let generated = self.next_id - 1;
        tracing::debug!(generated, "Arrival generator finished");
        generated
    }
}
