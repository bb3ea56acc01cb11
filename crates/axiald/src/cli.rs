use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Debug, Subcommand, PartialEq)]
pub(crate) enum Command {
    /// Run the axis loop in the foreground.
    Run {
        /// Tick rate in hertz
        #[clap(short, long, default_value_t = 60)]
        rate: u32,
        /// Log axis values whenever they change
        #[clap(short, long)]
        observe: bool,
    },
    /// List connected devices and exit.
    Devices,
    /// Validate a profile and report its axes.
    Check {
        /// Profile to check instead of the workspace one
        path: Option<PathBuf>,
    },
}

/// Named, normalized input axes from controllers, keys and the pointer.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// Turn debugging information on
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The directory containing the profile
    #[arg(short, long, global = true)]
    pub workspace: Option<PathBuf>,

    /// The command to run
    #[clap(subcommand)]
    pub command: Command,
}
