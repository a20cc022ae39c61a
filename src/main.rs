use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use urlchecker::report::{report, write_usage};
use urlchecker::{ReqwestTransport, Resolution, resolve, run};

/// Checks a url with a single HTTP HEAD request and prints what came back.
#[derive(Debug, Parser)]
#[command(name = "urlchecker", version, disable_help_flag = true)]
struct Cli {
    /// Print usage
    #[arg(short, long)]
    help: bool,

    /// The url to be checked; `http://` is assumed when no scheme is given
    url: Option<String>,

    /// Seconds to wait for the request to complete (not including DNS resolution)
    #[arg(allow_hyphen_values = true)]
    timeout: Option<String>,

    #[arg(hide = true, allow_hyphen_values = true)]
    rest: Vec<String>,
}

impl Cli {
    fn positional(self) -> Vec<String> {
        self.url.into_iter().chain(self.timeout).collect()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("urlchecker=warn")),
        )
        .init();

    if !cli.rest.is_empty() {
        debug!("ignoring extra arguments: {:?}", cli.rest);
    }

    let args = if cli.help { Vec::new() } else { cli.positional() };

    let outcome = match resolve(&args) {
        Ok(Resolution::ShowUsage) => {
            write_usage(&mut io::stdout().lock()).context("failed to write usage")?;
            return Ok(());
        }
        Ok(Resolution::Probe(request)) => {
            let transport = ReqwestTransport::for_request(&request);
            run(&transport, &request).await
        }
        Err(failure) => Err(failure),
    };

    report(&mut io::stdout().lock(), &outcome).context("failed to write report")?;
    Ok(())
}
