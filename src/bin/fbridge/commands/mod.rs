mod decode;
mod extent;
mod run;

use decode::run_decode;
use extent::run_extent;
use run::run_coupling;

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::Decode(args) => run_decode(args, ctx),
        Command::Extent(args) => run_extent(args, ctx),
        Command::Run(args) => run_coupling(args, ctx),
    }
}
