use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinSet;

use crate::arrival::ArrivalGenerator;
use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::scheduler::{AgentId, EventSink, RunStats, SchedulerContext, Ticks};
use crate::worker::Agent;

/// What a finished run looked like.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub calls_generated: u64,
    pub final_clock: Ticks,
    pub stats: RunStats,
}

/// Orchestrates one run: the arrival generator plus the agent pool.
pub struct Simulation {
    ctx: Arc<SchedulerContext>,
}

impl Simulation {
    /// Validate `config` and build the shared scheduler state.
    ///
    /// Events are sent to `sink` when one is given.
    pub fn new(config: SimConfig, sink: Option<EventSink>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            ctx: Arc::new(SchedulerContext::new(config, sink)),
        })
    }

    /// Shared scheduler state, for inspecting the queue and clock from outside the run.
    pub fn context(&self) -> &Arc<SchedulerContext> {
        &self.ctx
    }

    /// Run until every call has been served to completion.
    ///
    /// Spawns the generator and one task per agent, waits for all of them and
    /// returns the run summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the generator or any agent task panicked. The
    /// remaining tasks are aborted and awaited before the error is returned.
    pub async fn run(self) -> Result<RunSummary> {
        let config = &self.ctx.config;
        tracing::info!(
            calls = config.total_calls,
            agents = config.agents,
            quantum = config.quantum,
            "Starting simulation"
        );

        let mut tasks = JoinSet::new();
        let mut roles = HashMap::new();

        let producer = ArrivalGenerator::new(self.ctx.clone());
        let handle = tasks.spawn(async move { TaskOutput::Produced(producer.run().await) });
        roles.insert(handle.id(), Role::Producer);

        for id in 1..=config.agents {
            let agent = Agent::new(id, self.ctx.clone());
            let handle = tasks.spawn(async move {
                let slices = agent.run().await;
                TaskOutput::Served { agent: id, slices }
            });
            roles.insert(handle.id(), Role::Agent(id));
        }

        let mut calls_generated = 0;
        while let Some(joined) = tasks.join_next_with_id().await {
            match joined {
                Ok((_, TaskOutput::Produced(generated))) => calls_generated = generated,
                Ok((_, TaskOutput::Served { agent, slices })) => {
                    tracing::debug!(agent, slices, "Agent joined")
                }
                Err(e) => {
                    let role = roles.get(&e.id()).copied().unwrap_or(Role::Producer);
                    tracing::warn!(?role, error = %e, "Simulation task failed, aborting run");
                    // Nothing can drain the run any more; stop everyone still polling.
                    tasks.shutdown().await;
                    return Err(match role {
                        Role::Producer => SimError::ProducerPanicked,
                        Role::Agent(id) => SimError::AgentPanicked(id),
                    });
                }
            }
        }

        let timeline = self.ctx.timeline.lock().await;
        let summary = RunSummary {
            calls_generated,
            final_clock: timeline.now(),
            stats: timeline.stats().clone(),
        };
        drop(timeline);

        debug_assert_eq!(self.ctx.queue.lock().await.active(), 0);
        tracing::info!(
            completed = summary.stats.completed,
            slices = summary.stats.slices,
            final_clock = summary.final_clock,
            "Simulation finished"
        );
        Ok(summary)
    }
}

#[derive(Debug, Clone, Copy)]
enum Role {
    Producer,
    Agent(AgentId),
}

enum TaskOutput {
    Produced(u64),
    Served { agent: AgentId, slices: u64 },
}
