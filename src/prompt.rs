//! Interactive startup: welcome banner and the three run questions.
//!
//! Generic over the reader and writer so the binary can use stdin/stdout and
//! tests can use in-memory buffers.

use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::error::{Result, SimError};
use crate::report::OutputFormat;
use crate::scheduler::Ticks;

const BANNER: &str = "\
=========================================
   CALL CENTER ROUND ROBIN SIMULATION
=========================================
 Features:
 - Random inter-arrival calls
 - Multiple parallel agents
 - Round Robin scheduling
 - Real-life call center behavior
=========================================
";

/// Print the banner and wait for ENTER.
pub fn welcome<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<()> {
    out.write_all(BANNER.as_bytes())?;
    write!(out, " Press ENTER to start simulation...")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}

/// Ask one question and parse the answer.
pub fn ask<R, W, T>(input: &mut R, out: &mut W, question: &str) -> Result<T>
where
    R: BufRead,
    W: Write,
    T: FromStr,
{
    write!(out, "{}: ", question)?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(SimError::Prompt(format!("no answer for \"{}\"", question)));
    }
    let answer = line.trim();
    answer
        .parse()
        .map_err(|_| SimError::Prompt(format!("\"{}\" is not a valid number", answer)))
}

/// The three values every run needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunParams {
    pub total_calls: Option<u64>,
    pub agents: Option<usize>,
    pub quantum: Option<Ticks>,
}

impl RunParams {
    pub fn is_complete(&self) -> bool {
        self.total_calls.is_some() && self.agents.is_some() && self.quantum.is_some()
    }

    /// Ask for whichever values were not already supplied.
    pub fn fill_missing<R: BufRead, W: Write>(
        self,
        input: &mut R,
        out: &mut W,
    ) -> Result<(u64, usize, Ticks)> {
        let total_calls = match self.total_calls {
            Some(v) => v,
            None => ask(input, out, "Enter total number of calls to simulate")?,
        };
        let agents = match self.agents {
            Some(v) => v,
            None => ask(input, out, "Enter number of agents")?,
        };
        let quantum = match self.quantum {
            Some(v) => v,
            None => ask(input, out, "Enter time quantum")?,
        };
        Ok((total_calls, agents, quantum))
    }
}

/// Settle the run parameters before the simulation starts.
///
/// In table mode the banner (unless suppressed) and the questions share
/// `out`. In JSON mode `out` carries only event records, so questions go to
/// `err` and there is no banner. A fully specified run never reads `input`.
pub fn collect<R, O, E>(
    params: RunParams,
    format: OutputFormat,
    show_banner: bool,
    input: &mut R,
    out: &mut O,
    err: &mut E,
) -> Result<(u64, usize, Ticks)>
where
    R: BufRead,
    O: Write,
    E: Write,
{
    match format {
        OutputFormat::Json => params.fill_missing(input, err),
        OutputFormat::Table => {
            if show_banner && !params.is_complete() {
                welcome(input, out)?;
            }
            params.fill_missing(input, out)
        }
    }
}
