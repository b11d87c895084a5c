use std::io::{self, Write};
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use callq::config::{ArrivalConfig, SimConfig, TimingConfig};
use callq::prompt::{self, RunParams};
use callq::report::{self, OutputFormat};
use callq::scheduler::{event_channel, Ticks};
use callq::Simulation;

#[derive(Parser, Debug)]
#[command(name = "callq")]
#[command(version)]
#[command(about = "Round-robin call-center simulation with parallel agents")]
struct Args {
    /// Total number of calls to simulate (prompted for when omitted)
    #[arg(long)]
    calls: Option<u64>,

    /// Number of agents serving calls (prompted for when omitted)
    #[arg(long)]
    agents: Option<usize>,

    /// Time quantum granted per slice (prompted for when omitted)
    #[arg(long)]
    quantum: Option<Ticks>,

    /// Seed for reproducible arrivals
    #[arg(long)]
    seed: Option<u64>,

    /// Wall-clock milliseconds per inter-arrival time unit
    #[arg(long, default_value = "1000")]
    tick_ms: u64,

    /// Wall-clock milliseconds an agent spends on each slice
    #[arg(long, default_value = "1000")]
    work_ms: u64,

    /// Longest an idle agent waits before polling again, in milliseconds
    #[arg(long, default_value = "100")]
    backoff_ms: u64,

    #[arg(long, default_value = "1")]
    min_arrival: Ticks,

    #[arg(long, default_value = "4")]
    max_arrival: Ticks,

    #[arg(long, default_value = "2")]
    min_service: Ticks,

    #[arg(long, default_value = "7")]
    max_service: Ticks,

    /// Output format
    #[arg(long, short = 'o', default_value = "table")]
    output: OutputFormat,

    /// Skip the welcome banner
    #[arg(long)]
    no_banner: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let params = RunParams {
        total_calls: args.calls,
        agents: args.agents,
        quantum: args.quantum,
    };

    let (total_calls, agents, quantum) = {
        let stdin = io::stdin();
        prompt::collect(
            params,
            args.output,
            !args.no_banner,
            &mut stdin.lock(),
            &mut io::stdout(),
            &mut io::stderr(),
        )?
    };

    let mut config = SimConfig::new(total_calls, agents, quantum)
        .with_timing(TimingConfig {
            tick: Duration::from_millis(args.tick_ms),
            work_delay: Duration::from_millis(args.work_ms),
            idle_backoff: Duration::from_millis(args.backoff_ms),
        })
        .with_arrival(ArrivalConfig {
            inter_arrival: args.min_arrival..=args.max_arrival,
            service_time: args.min_service..=args.max_service,
        });
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let (sink, stream) = event_channel();
    let simulation = match Simulation::new(config, Some(sink)) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let format = args.output;
    let printer = tokio::spawn(report::print_events(stream, format, io::stdout()));

    let summary = simulation.run().await?;
    printer.await??;

    let mut out = io::stdout();
    writeln!(out, "{}", report::render_summary(&summary, format)?)?;
    Ok(())
}
