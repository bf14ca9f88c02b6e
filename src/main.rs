//! The paycode CLI

use std::process::ExitCode;

use clap::Parser;
use paycode_app::{run, Args, Outcome};
use tracing::error;

fn main() -> ExitCode {
    let args = Args::parse();

    enable_logging(&args);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run(&args, &mut out) {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::Invalid) => ExitCode::from(2),
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn enable_logging(args: &Args) {
    let mut builder = tracing_subscriber::fmt().compact().with_writer(std::io::stderr);

    if args.quiet {
        builder = builder.with_max_level(tracing::Level::ERROR);
    } else {
        match args.verbose {
            3.. => builder = builder.with_max_level(tracing::Level::TRACE),
            2 => builder = builder.with_max_level(tracing::Level::DEBUG),
            1 => builder = builder.with_max_level(tracing::Level::INFO),
            _ => builder = builder.with_max_level(tracing::Level::WARN),
        }
    }

    builder.init();
}
