//! End-to-end runs of the generator and agent pool.
//!
//! All runs use millisecond pacing and fixed seeds so they finish quickly and
//! draw the same arrivals every time.

use std::collections::HashMap;
use std::time::Duration;

use callq::config::{ArrivalConfig, SimConfig, TimingConfig};
use callq::scheduler::{event_channel, SchedEvent};
use callq::{RunSummary, SimError, Simulation};

fn fast_config(calls: u64, agents: usize, quantum: u64) -> SimConfig {
    SimConfig::new(calls, agents, quantum)
        .with_timing(TimingConfig::fast())
        .with_seed(7)
}

/// Run to completion and collect every emitted event.
async fn run_collect(config: SimConfig) -> (RunSummary, Vec<SchedEvent>) {
    let (sink, mut stream) = event_channel();
    let sim = Simulation::new(config, Some(sink)).expect("valid config");

    let summary = tokio::time::timeout(Duration::from_secs(30), sim.run())
        .await
        .expect("run should terminate")
        .expect("run should succeed");

    let mut events = Vec::new();
    while let Some(event) = stream.recv().await {
        events.push(event);
    }
    (summary, events)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_single_call_preempted_once() {
    let config = fast_config(1, 1, 5).with_arrival(ArrivalConfig {
        inter_arrival: 1..=1,
        service_time: 7..=7,
    });

    let (summary, events) = run_collect(config).await;

    assert_eq!(
        events,
        vec![
            SchedEvent::Arrived {
                call: 1,
                service: 7,
                at: 0
            },
            SchedEvent::Served {
                agent: 1,
                call: 1,
                at: 0,
                slice: 5
            },
            SchedEvent::Paused {
                agent: 1,
                call: 1,
                remaining: 2
            },
            SchedEvent::Served {
                agent: 1,
                call: 1,
                at: 5,
                slice: 2
            },
            SchedEvent::Completed {
                agent: 1,
                call: 1,
                at: 7
            },
        ]
    );
    assert_eq!(summary.final_clock, 7);
    assert_eq!(summary.stats.preemptions, 1);
    assert_eq!(summary.stats.completed, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_large_quantum_never_pauses() {
    let (summary, events) = run_collect(fast_config(3, 2, 100)).await;

    let served = events
        .iter()
        .filter(|e| matches!(e, SchedEvent::Served { .. }))
        .count();
    let paused = events
        .iter()
        .filter(|e| matches!(e, SchedEvent::Paused { .. }))
        .count();
    let completed = events
        .iter()
        .filter(|e| matches!(e, SchedEvent::Completed { .. }))
        .count();

    assert_eq!(served, 3);
    assert_eq!(paused, 0);
    assert_eq!(completed, 3);
    assert_eq!(summary.stats.slices, 3);
    assert_eq!(summary.stats.preemptions, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_call_served_to_completion_exactly_once() {
    let config = fast_config(40, 4, 2).with_arrival(ArrivalConfig {
        inter_arrival: 0..=1,
        service_time: 2..=7,
    });
    let (summary, events) = run_collect(config).await;

    let mut service: HashMap<u64, u64> = HashMap::new();
    let mut granted: HashMap<u64, u64> = HashMap::new();
    let mut completions: HashMap<u64, u32> = HashMap::new();
    let mut last_remaining: HashMap<u64, u64> = HashMap::new();

    for event in &events {
        match *event {
            SchedEvent::Arrived { call, service: s, .. } => {
                assert!(service.insert(call, s).is_none(), "call {call} arrived twice");
            }
            SchedEvent::Served { call, slice, .. } => {
                assert!(service.contains_key(&call), "call {call} served before arrival");
                assert!(slice > 0 && slice <= 2, "slice {slice} outside quantum");
                assert!(!completions.contains_key(&call), "call {call} served after completion");
                *granted.entry(call).or_default() += slice;
            }
            SchedEvent::Paused { call, remaining, .. } => {
                assert!(remaining > 0);
                if let Some(prev) = last_remaining.insert(call, remaining) {
                    assert!(remaining < prev, "remaining time of call {call} did not decrease");
                }
            }
            SchedEvent::Completed { call, .. } => {
                *completions.entry(call).or_default() += 1;
            }
        }
    }

    assert_eq!(service.len(), 40);
    assert_eq!(completions.len(), 40);
    assert!(completions.values().all(|&n| n == 1));
    for (call, s) in &service {
        assert_eq!(granted.get(call), Some(s), "call {call} granted wrong total");
    }

    let total_service: u64 = service.values().sum();
    assert_eq!(summary.final_clock, total_service);
    assert_eq!(summary.calls_generated, 40);
    assert_eq!(summary.stats.completed, 40);
    assert_eq!(
        summary.stats.slices_per_agent.iter().sum::<u64>(),
        summary.stats.slices
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_slices_start_in_clock_order() {
    let config = fast_config(20, 3, 3);
    let (_, events) = run_collect(config).await;

    let starts: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            SchedEvent::Served { at, .. } => Some(*at),
            _ => None,
        })
        .collect();
    assert!(starts.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_same_seed_draws_same_calls() {
    let arrivals = |events: Vec<SchedEvent>| -> Vec<(u64, u64)> {
        events
            .into_iter()
            .filter_map(|e| match e {
                SchedEvent::Arrived { call, service, .. } => Some((call, service)),
                _ => None,
            })
            .collect()
    };

    let (_, first) = run_collect(fast_config(8, 2, 3).with_seed(99)).await;
    let (_, second) = run_collect(fast_config(8, 3, 1).with_seed(99)).await;

    assert_eq!(arrivals(first), arrivals(second));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_more_agents_than_calls_terminates() {
    let (summary, _) = run_collect(fast_config(2, 10, 1)).await;
    assert_eq!(summary.stats.completed, 2);
    assert_eq!(summary.stats.slices_per_agent.len(), 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_run_without_event_sink() {
    let sim = Simulation::new(fast_config(5, 2, 2), None).unwrap();
    let summary = tokio::time::timeout(Duration::from_secs(30), sim.run())
        .await
        .expect("run should terminate")
        .unwrap();
    assert_eq!(summary.stats.completed, 5);
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let result = Simulation::new(SimConfig::new(3, 11, 2), None);
    assert!(matches!(result, Err(SimError::InvalidConfig(_))));

    let result = Simulation::new(SimConfig::new(3, 2, 0), None);
    assert!(matches!(result, Err(SimError::InvalidConfig(_))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_queue_drained_after_run() {
    let sim = Simulation::new(fast_config(6, 2, 2), None).unwrap();
    let ctx = sim.context().clone();
    sim.run().await.unwrap();

    let queue = ctx.queue.lock().await;
    assert!(queue.is_empty());
    assert!(queue.producer_done());
    assert_eq!(queue.active(), 0);
}

/// A panicking agent must not leave the rest of the pool polling forever.
#[cfg(debug_assertions)]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_agent_panic_aborts_remaining_tasks() {
    use callq::scheduler::Call;
    use std::sync::Arc;

    let timing = TimingConfig {
        work_delay: Duration::from_millis(300),
        idle_backoff: Duration::from_secs(10),
        ..TimingConfig::fast()
    };
    // Three agents for two calls: the idle agent sits in its long backoff and
    // would keep polling until the active counter drops to zero, which never
    // happens after a panic.
    let config = fast_config(2, 3, 5)
        .with_timing(timing)
        .with_arrival(ArrivalConfig {
            inter_arrival: 0..=0,
            service_time: 7..=7,
        });
    let sim = Simulation::new(config, None).unwrap();
    let ctx = sim.context().clone();
    let run = tokio::spawn(sim.run());

    // Both calls are now held mid-slice. Queue a second copy of each, so
    // whichever agent requeues first trips the duplicate-call check.
    tokio::time::sleep(Duration::from_millis(100)).await;
    {
        let mut queue = ctx.queue.lock().await;
        assert_eq!(queue.active(), 2);
        assert!(queue.is_empty());
        queue.requeue(Call::new(1, 3));
        queue.requeue(Call::new(2, 3));
    }

    let result = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("run should return after an agent panics")
        .unwrap();
    assert!(matches!(result, Err(SimError::AgentPanicked(_))));

    // Every spawned task has been dropped, so only this handle remains.
    assert_eq!(Arc::strong_count(&ctx), 1);
}
