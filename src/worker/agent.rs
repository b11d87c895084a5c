use std::sync::Arc;

use crate::scheduler::{AgentId, Call, Dispatch, SchedulerContext};

/// One agent of the pool, serving calls from the shared ready queue.
pub struct Agent {
    id: AgentId,
    ctx: Arc<SchedulerContext>,
}

impl Agent {
    pub fn new(id: AgentId, ctx: Arc<SchedulerContext>) -> Self {
        Self { id, ctx }
    }

    /// Serve calls until the run drains. Returns the number of slices served.
    pub async fn run(self) -> u64 {
        let mut slices = 0;

        loop {
            let dispatch = self.ctx.queue.lock().await.poll();

            match dispatch {
                Dispatch::Call(call) => {
                    self.serve(call).await;
                    slices += 1;
                }
                Dispatch::Idle => self.ctx.wait_for_work().await,
                Dispatch::Drained => break,
            }
        }

        tracing::debug!(agent = self.id, slices, "Agent finished");
        slices
    }

    /// Run one quantum-bounded slice of `call`, then requeue or retire it.
    async fn serve(&self, mut call: Call) {
        let quantum = self.ctx.config.quantum;
        let served = {
            let mut timeline = self.ctx.timeline.lock().await;
            timeline.serve_slice(self.id, &mut call, quantum)
        };
        tracing::debug!(
            agent = self.id,
            call = call.id,
            served,
            remaining = call.remaining,
            "Served slice"
        );

        tokio::time::sleep(self.ctx.config.timing.work_delay).await;

        if call.is_finished() {
            let drained = {
                let mut queue = self.ctx.queue.lock().await;
                queue.complete();
                queue.is_drained()
            };
            self.ctx.timeline.lock().await.record_completion(self.id, &call);
            if drained {
                self.ctx.wake_all();
            }
        } else {
            // Announce the pause first so it precedes the next slice of this call.
            self.ctx.timeline.lock().await.record_pause(self.id, &call);
            self.ctx.queue.lock().await.requeue(call);
            self.ctx.ready.notify_one();
        }
    }
}
