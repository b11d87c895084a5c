//! Rendering of the event stream and the run summary.

use std::io::Write;

use clap::ValueEnum;

use crate::error::Result;
use crate::scheduler::{EventStream, SchedEvent};
use crate::simulation::RunSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub fn render_event(event: &SchedEvent, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Table => event.to_string(),
        OutputFormat::Json => serde_json::to_string(event)?,
    })
}

pub fn render_summary(summary: &RunSummary, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string(summary)?);
    }

    let stats = &summary.stats;
    let mut text = String::new();
    text.push_str("\nAll calls processed with RANDOM inter-arrival and TRUE parallel agents.\n");
    text.push_str(&"-".repeat(45));
    text.push('\n');
    text.push_str(&format!("Calls:        {}\n", summary.calls_generated));
    text.push_str(&format!("Completed:    {}\n", stats.completed));
    text.push_str(&format!("Slices:       {}\n", stats.slices));
    text.push_str(&format!("Preemptions:  {}\n", stats.preemptions));
    text.push_str(&format!("Final time:   {}\n", summary.final_clock));
    text.push_str(&format!("{:<8} SLICES\n", "AGENT"));
    for (idx, slices) in stats.slices_per_agent.iter().enumerate() {
        text.push_str(&format!("{:<8} {}\n", idx + 1, slices));
    }
    Ok(text)
}

/// Drain the event stream into `out` until every sender is gone.
///
/// Returns the number of events written.
pub async fn print_events<W: Write>(
    mut stream: EventStream,
    format: OutputFormat,
    mut out: W,
) -> Result<u64> {
    let mut written = 0;
    while let Some(event) = stream.recv().await {
        writeln!(out, "{}", render_event(&event, format)?)?;
        out.flush()?;
        written += 1;
    }
    Ok(written)
}
