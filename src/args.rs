//! Command-line arguments for the `paycode` binary.

use clap::{Parser, Subcommand};
use paycode_otp::paycode::PaycodeConfig;

/// Arguments for the paycode CLI
#[derive(Parser, Debug)]
#[command(version, about = "Generate and validate time-based one-time paycodes")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    #[clap(
        long,
        global = true,
        value_name = "UID",
        help = "Account identifier carried in paycodes [default: 10203405609]"
    )]
    pub uid: Option<u64>,

    #[clap(
        long,
        global = true,
        value_name = "N",
        help = "Multiplier used when deriving the y field [default: 5]"
    )]
    pub factor: Option<u64>,

    #[clap(
        long,
        global = true,
        value_name = "SECS",
        help = "TOTP time step in seconds [default: 30]"
    )]
    pub step: Option<u64>,

    #[clap(
        long,
        global = true,
        value_name = "EPOCH",
        help = "Evaluate at this unix timestamp instead of the system clock"
    )]
    pub at: Option<u64>,

    #[clap(long, global = true, help = "Print results as JSON", default_value_t = false)]
    pub json: bool,

    #[clap(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Don't print any log messages except for errors",
        default_value_t = false
    )]
    pub quiet: bool,

    #[clap(
        short = 'v',
        long,
        global = true,
        conflicts_with = "quiet",
        action = clap::ArgAction::Count,
        help = "Log generation and validation details; specify multiple times for more detail"
    )]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Base-32 encode a passphrase (or generate a random secret) for use as a key
    Keygen {
        #[clap(
            required_unless_present = "random",
            conflicts_with = "random",
            help = "Raw text whose bytes become the secret"
        )]
        text: Option<String>,

        #[clap(long, value_name = "BYTES", help = "Generate a random secret of this many bytes")]
        random: Option<usize>,
    },

    /// Print the current one-time password
    Otp {
        #[clap(help = "Base-32 secret (case-insensitive, spaces allowed)")]
        secret: String,
    },

    /// Print a paycode for the current time step
    Generate {
        #[clap(help = "Base-32 secret (case-insensitive, spaces allowed)")]
        secret: String,
    },

    /// Check a paycode against the identifier and the current one-time password
    Validate {
        #[clap(help = "Base-32 secret (case-insensitive, spaces allowed)")]
        secret: String,

        #[clap(help = "The 18-digit paycode to check")]
        paycode: String,
    },

    /// Repeatedly generate and validate paycodes
    Demo {
        #[clap(help = "Base-32 secret (case-insensitive, spaces allowed)")]
        secret: String,

        #[clap(
            short = 'n',
            long,
            value_name = "N",
            default_value_t = 100,
            help = "Number of generate/validate rounds to run"
        )]
        iterations: usize,

        #[clap(
            long,
            value_name = "MS",
            default_value_t = 1000,
            help = "Pause between rounds in milliseconds"
        )]
        interval_ms: u64,
    },
}

impl Args {
    /// Default configuration with any command-line overrides applied.
    pub fn config(&self) -> PaycodeConfig {
        let mut config = PaycodeConfig::default();
        if let Some(uid) = self.uid {
            config = config.with_uid(uid);
        }
        if let Some(factor) = self.factor {
            config = config.with_factor(factor);
        }
        if let Some(step) = self.step {
            config = config.with_step_seconds(step);
        }
        config
    }
}
