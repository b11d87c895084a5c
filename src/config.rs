use std::ops::RangeInclusive;
use std::time::Duration;

use crate::error::{Result, SimError};
use crate::scheduler::Ticks;

/// Upper bound on the number of agents serving calls in parallel.
pub const MAX_AGENTS: usize = 10;

/// Random ranges used by the arrival generator, in logical time units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalConfig {
    /// Gap between two consecutive arrivals
    pub inter_arrival: RangeInclusive<Ticks>,
    /// Initial service time of a new call
    pub service_time: RangeInclusive<Ticks>,
}

impl Default for ArrivalConfig {
    fn default() -> Self {
        Self {
            inter_arrival: 1..=4,
            service_time: 2..=7,
        }
    }
}

/// Wall-clock pacing of the simulation.
///
/// The logical clock only counts granted service time; these durations decide
/// how long the tasks actually sleep while the run is in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingConfig {
    /// Real duration of one logical time unit of inter-arrival sleep
    pub tick: Duration,
    /// Time an agent spends "on the phone" for each served slice
    pub work_delay: Duration,
    /// Longest an idle agent waits before re-checking the queue
    pub idle_backoff: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            work_delay: Duration::from_secs(1),
            idle_backoff: Duration::from_millis(100),
        }
    }
}

impl TimingConfig {
    /// Millisecond pacing, for tests and quick demos.
    pub fn fast() -> Self {
        Self {
            tick: Duration::from_millis(1),
            work_delay: Duration::from_millis(1),
            idle_backoff: Duration::from_millis(5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub total_calls: u64,
    pub agents: usize,
    pub quantum: Ticks,
    pub arrival: ArrivalConfig,
    pub timing: TimingConfig,
    /// Seed for the arrival generator; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            total_calls: 10,
            agents: 2,
            quantum: 3,
            arrival: ArrivalConfig::default(),
            timing: TimingConfig::default(),
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn new(total_calls: u64, agents: usize, quantum: Ticks) -> Self {
        Self {
            total_calls,
            agents,
            quantum,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    pub fn with_arrival(mut self, arrival: ArrivalConfig) -> Self {
        self.arrival = arrival;
        self
    }

    /// Check the bounds that must hold before any task is spawned.
    ///
    /// Timing is not constrained: a zero tick, like an inter-arrival range of
    /// `0..=0`, just makes calls arrive back to back.
    pub fn validate(&self) -> Result<()> {
        if self.total_calls == 0 {
            return Err(SimError::InvalidConfig(
                "total number of calls must be positive".to_string(),
            ));
        }
        if self.agents == 0 || self.agents > MAX_AGENTS {
            return Err(SimError::InvalidConfig(format!(
                "number of agents must be between 1 and {}, got {}",
                MAX_AGENTS, self.agents
            )));
        }
        if self.quantum == 0 {
            return Err(SimError::InvalidConfig(
                "time quantum must be positive".to_string(),
            ));
        }
        if self.arrival.inter_arrival.is_empty() {
            return Err(SimError::InvalidConfig(format!(
                "inter-arrival range {:?} is empty",
                self.arrival.inter_arrival
            )));
        }
        if self.arrival.service_time.is_empty() || *self.arrival.service_time.start() == 0 {
            return Err(SimError::InvalidConfig(format!(
                "service time range {:?} must be non-empty and strictly positive",
                self.arrival.service_time
            )));
        }
        Ok(())
    }
}
