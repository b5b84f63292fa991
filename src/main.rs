mod cli;

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use ctm_randr::RandrTransport;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

fn main() -> Result<ExitCode> {
    init_tracing();

    let args = match cli::Args::try_parse() {
        Ok(args) => args,
        Err(err) if err.kind() == ErrorKind::DisplayHelp => err.exit(),
        Err(err) => {
            tracing::debug!(%err, "argument parsing failed");
            println!("{}", cli::short_help());
            return Ok(ExitCode::from(1));
        }
    };

    let mut stdout = io::stdout().lock();
    let code = cli::run(&args, RandrTransport::connect, &mut stdout)?;
    Ok(ExitCode::from(code))
}

/// Diagnostics go to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);
    Registry::default().with(filter).with(fmt_layer).init();
}
