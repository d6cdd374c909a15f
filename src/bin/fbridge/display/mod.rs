mod banner;
mod error;
mod progress;
mod tables;

pub use banner::{banner_for_help, print_banner};
pub use error::print_error;
pub use progress::Progress;
pub use tables::{RunSummary, print_extent, print_fibers, print_run_summary};

/// How much terminal decoration a subcommand may print.
#[derive(Debug, Clone, Copy)]
pub struct Context {
    /// Banner, spinners and run summaries go to stderr only when it is a
    /// terminal and `--quiet` was not given.
    pub interactive: bool,
}

impl Context {
    pub fn from_flags(quiet: bool) -> Self {
        Self {
            interactive: !quiet && crate::io::stderr_is_tty(),
        }
    }
}
