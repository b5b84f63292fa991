//! Argument handling and the single apply transaction behind `main`.

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use ctm_core::{apply_ctm, CtmError, CtmPlan, PropertyTransport, TransportError};
use ctm_math::SaturationRequest;
use tracing::warn;

pub const VERSION_STRING: &str = "alpha-v3";
pub const HELP: &str = include_str!("help.txt");

#[derive(Parser, Debug)]
#[command(name = "sat-ctm", override_help = HELP, disable_version_flag = true)]
pub struct Args {
    /// Saturation value, or "default" for the identity matrix
    #[arg(short = 'c', value_name = "SATURATION", allow_hyphen_values = true)]
    pub ctm: Option<String>,

    /// Output to program
    #[arg(short = 'o', value_name = "OUTPUT")]
    pub output: Option<String>,

    /// X display, defaults to $DISPLAY
    #[arg(short = 'd', value_name = "DISPLAY")]
    pub display: Option<String>,

    /// Print the payload instead of applying it
    #[arg(short = 'n')]
    pub dry_run: bool,

    /// Print the version and exit
    #[arg(short = 'v', long = "version")]
    pub version: bool,
}

/// First line of the help text.
pub fn short_help() -> &'static str {
    HELP.lines().next().unwrap_or_default()
}

/// Run one invocation and return the process exit status.
///
/// `connect` is only called once the arguments are known to be good, so bad
/// input never reaches the display server.
pub fn run<T, F>(args: &Args, connect: F, out: &mut dyn Write) -> Result<u8>
where
    T: PropertyTransport,
    F: FnOnce(Option<&str>) -> Result<T, TransportError>,
{
    if args.version {
        writeln!(out, "{VERSION_STRING}")?;
        return Ok(0);
    }

    let Some(output_name) = args.output.as_deref() else {
        writeln!(out, "{}", short_help())?;
        return Ok(1);
    };
    let Some(token) = args.ctm.as_deref() else {
        writeln!(out, "{}", short_help())?;
        return Ok(1);
    };

    let plan = match CtmPlan::parse(token) {
        Ok(plan) => plan,
        Err(err) => {
            writeln!(out, "{err}. Skipping.")?;
            writeln!(out, "{}", short_help())?;
            return Ok(err.exit_code());
        }
    };

    match plan.request {
        SaturationRequest::Identity => writeln!(out, "Using identity CTM")?,
        SaturationRequest::Scalar(_) => {
            writeln!(out, "Using custom CTM:")?;
            write!(out, "{}", plan.coefficients)?;
        }
    }

    if args.dry_run {
        let packed = &plan.packed;
        writeln!(
            out,
            "{} x 32-bit ({:?}): {}",
            packed.len(),
            packed.endian(),
            hex::encode(plan.payload())
        )?;
        writeln!(
            out,
            "{} x {}-bit long: {}",
            packed.len(),
            packed.width().bytes() * 8,
            hex::encode(packed.to_container_bytes())
        )?;
        return Ok(0);
    }

    let mut transport = match connect(args.display.as_deref()) {
        Ok(transport) => transport,
        Err(err) => {
            warn!(%err, "display connection failed");
            writeln!(out, "No display specified, check the DISPLAY environment variable.")?;
            return Ok(1);
        }
    };

    match apply_ctm(&mut transport, output_name, &plan) {
        Ok(()) => Ok(0),
        Err(err @ CtmError::OutputNotFound(_)) => {
            writeln!(out, "{err}")?;
            Ok(err.exit_code())
        }
        Err(err) => {
            writeln!(out, "{err}")?;
            writeln!(out, "Failed to set CTM. {}", err.exit_code())?;
            Ok(err.exit_code())
        }
    }
}
