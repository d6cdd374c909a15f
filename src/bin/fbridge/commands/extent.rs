use anyhow::{Context, Result};

use filament_bridge::io::recover_box_extent;

use crate::cli::ExtentArgs;
use crate::display::{Context as DisplayContext, print_extent};
use crate::io::read_text;

pub fn run_extent(args: ExtentArgs, _ctx: DisplayContext) -> Result<()> {
    let text = read_text(args.config.as_deref())?;
    let extent =
        recover_box_extent(&text).context("Failed to read geometry from system configuration")?;
    print_extent(&extent);
    Ok(())
}
