use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "fbridge",
    about = "Alternating fiber/monomer coupling for filament network simulations",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Suppress banner and progress output (for scripting)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Decode a trajectory snapshot and list its fibers
    #[command(visible_alias = "d")]
    Decode(DecodeArgs),

    /// Recover the simulation box extent from a rendered system file
    #[command(visible_alias = "e")]
    Extent(ExtentArgs),

    /// Run the coupling loop with the MEDYAN adapter
    #[command(visible_alias = "r")]
    Run(RunArgs),
}

#[derive(Args)]
pub struct DecodeArgs {
    /// Snapshot file (stdin if omitted)
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    /// Decode the type column as first-seen indices of these type names
    #[arg(long = "type", value_name = "NAME", action = clap::ArgAction::Append)]
    pub types: Vec<String>,
}

#[derive(Args)]
pub struct ExtentArgs {
    /// Rendered system configuration file (stdin if omitted)
    #[arg(value_name = "CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct RunArgs {
    /// Coupling configuration (TOML); defaults apply when omitted
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Initial filament listing; the bundled 30-filament bundle when omitted
    #[arg(short, long, value_name = "FILE")]
    pub fibers: Option<PathBuf>,

    /// Box extent for a listing that does not come with one
    #[arg(long, value_name = "X,Y,Z", value_delimiter = ',', num_args = 3)]
    pub extent: Option<Vec<f64>>,

    /// Simulated end time
    #[arg(short, long, value_name = "T")]
    pub until: f64,

    /// Write the final fiber state as a filament listing
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn parse() -> Cli {
    Cli::parse()
}
