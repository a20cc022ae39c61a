//! Console rendering of a probe outcome.

use std::io::{self, Write};

use colored::Colorize;

use crate::config::USAGE;
use crate::error::ProbeFailure;
use crate::prober::ProbeResult;

/// Writes either the full report or a single red error line.
pub fn report<W: Write>(out: &mut W, outcome: &Result<ProbeResult, ProbeFailure>) -> io::Result<()> {
    match outcome {
        Ok(result) => write_result(out, result),
        Err(failure) => write_failure(out, failure),
    }
}

pub fn write_usage<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{USAGE}")
}

fn write_result<W: Write>(out: &mut W, result: &ProbeResult) -> io::Result<()> {
    let content_length = result
        .content_length
        .map(|len| len.to_string())
        .unwrap_or_else(|| "-1".to_string());

    writeln!(out)?;
    writeln!(out, "Elapsed: {} milliseconds", result.elapsed_ms)?;
    writeln!(out, "Response url: {}", result.response_url)?;
    match result.status_text() {
        "" => writeln!(out, "Status: {}", result.status)?,
        text => writeln!(out, "Status: {} {text}", result.status)?,
    }
    writeln!(out, "Content Length: {content_length}")?;
    writeln!(out, "Is From Cache: {}", result.from_cache)?;
    writeln!(out)?;
    for (name, value) in &result.headers {
        writeln!(out, "{name}: {value}")?;
    }
    writeln!(out)?;
    out.flush()
}

fn write_failure<W: Write>(out: &mut W, failure: &ProbeFailure) -> io::Result<()> {
    writeln!(out, "{}", failure.to_string().red())?;
    out.flush()
}
