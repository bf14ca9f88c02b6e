//! Command runners. Each writes its result to `out`; logging goes through `tracing`.

use std::io::Write;
use std::thread;
use std::time::Duration;

use paycode_otp::paycode::{core, secret, PaycodeError, PaycodeErrorKind, PaycodeService};
use serde::Serialize;
use tracing::{debug, warn};

use crate::args::{Args, Command};

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Paycode(#[from] PaycodeError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

/// How a successfully executed command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// A paycode was checked and rejected.
    Invalid,
}

#[derive(Serialize)]
struct KeygenOutput<'a> {
    secret: &'a str,
}

/// Execute the parsed command.
pub fn run(args: &Args, out: &mut dyn Write) -> Result<Outcome, CliError> {
    debug!("command line: {:?}", args);

    match &args.command {
        Command::Keygen { text, random } => keygen(args, text.as_deref(), *random, out),
        Command::Otp { secret } => otp(args, secret, out),
        Command::Generate { secret } => generate(args, secret, out),
        Command::Validate { secret, paycode } => validate(args, secret, paycode, out),
        Command::Demo {
            secret,
            iterations,
            interval_ms,
        } => demo(args, secret, *iterations, Duration::from_millis(*interval_ms), out),
    }
}

fn now(args: &Args) -> u64 {
    args.at.unwrap_or_else(core::current_unix_time)
}

fn service(args: &Args, secret: &str) -> Result<PaycodeService, CliError> {
    Ok(PaycodeService::from_encoded_secret(args.config(), secret)?)
}

fn keygen(args: &Args, text: Option<&str>, random: Option<usize>, out: &mut dyn Write) -> Result<Outcome, CliError> {
    let encoded = match (text, random) {
        (_, Some(0)) => {
            return Err(PaycodeError::new(PaycodeErrorKind::InvalidConfig, "--random needs at least one byte").into())
        }
        (_, Some(len)) => secret::generate_secret(len),
        (Some(text), None) => secret::encode_secret(text.as_bytes()),
        (None, None) => {
            return Err(PaycodeError::new(PaycodeErrorKind::InvalidConfig, "nothing to encode").into())
        }
    };

    if args.json {
        writeln!(out, "{}", serde_json::to_string(&KeygenOutput { secret: &encoded })?)?;
    } else {
        writeln!(out, "{}", encoded)?;
    }
    Ok(Outcome::Success)
}

fn otp(args: &Args, secret: &str, out: &mut dyn Write) -> Result<Outcome, CliError> {
    let otp = service(args, secret)?.otp_at(now(args))?;
    if args.json {
        writeln!(out, "{}", serde_json::to_string(&otp)?)?;
    } else {
        writeln!(out, "otp: {}, expires in {}s", otp.code, otp.remaining_seconds)?;
    }
    Ok(Outcome::Success)
}

fn generate(args: &Args, secret: &str, out: &mut dyn Write) -> Result<Outcome, CliError> {
    let generated = service(args, secret)?.generate_at(now(args))?;
    if args.json {
        writeln!(out, "{}", serde_json::to_string(&generated)?)?;
    } else {
        writeln!(out, "paycode: {}, expires in {}s", generated.code, generated.remaining_seconds)?;
    }
    Ok(Outcome::Success)
}

fn validate(args: &Args, secret: &str, paycode: &str, out: &mut dyn Write) -> Result<Outcome, CliError> {
    let svc = service(args, secret)?;
    let result = svc.validate_at(paycode, now(args))?;

    if args.json {
        writeln!(out, "{}", serde_json::to_string(&result)?)?;
    } else if result.valid {
        writeln!(out, "paycode: {}, uid: {}", paycode, svc.config().uid)?;
    } else {
        let reason = result.clone().into_result(paycode).err().map(|e| e.to_string());
        writeln!(out, "{}", reason.unwrap_or_else(|| format!("invalid paycode: {}", paycode)))?;
    }

    Ok(if result.valid { Outcome::Success } else { Outcome::Invalid })
}

/// Generate a paycode, decode it again and validate it, `iterations` times.
fn demo(
    args: &Args,
    secret: &str,
    iterations: usize,
    interval: Duration,
    out: &mut dyn Write,
) -> Result<Outcome, CliError> {
    let svc = service(args, secret)?;
    writeln!(out, "step: {}s", svc.config().step_seconds)?;

    for i in 0..iterations {
        if i > 0 && !interval.is_zero() {
            thread::sleep(interval);
        }

        let t = now(args);
        let generated = match svc.generate_at(t) {
            Ok(generated) => generated,
            Err(e) if matches!(e.kind, PaycodeErrorKind::DivisionByZero | PaycodeErrorKind::FieldOverflow) => {
                warn!("no paycode at {}: {}", t, e);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let result = svc.validate_at(&generated.code, t)?.into_result(&generated.code)?;
        writeln!(
            out,
            "paycode: {}, uid: {}",
            generated.code,
            result.recovered_uid.unwrap_or_default()
        )?;
    }
    Ok(Outcome::Success)
}
