use anyhow::{Context, Result};

use filament_bridge::io::{TrajectoryCodec, TypeEncoding};

use crate::cli::DecodeArgs;
use crate::display::{Context as DisplayContext, print_fibers};
use crate::io::open_input;

pub fn run_decode(args: DecodeArgs, _ctx: DisplayContext) -> Result<()> {
    let encoding = if args.types.is_empty() {
        TypeEncoding::Name
    } else {
        TypeEncoding::Index
    };
    let mut codec = TrajectoryCodec::new(encoding);
    for name in &args.types {
        codec.register_type(name);
    }

    let input = open_input(args.snapshot.as_deref())?;
    let fibers = codec
        .decode_snapshot(input)
        .context("Failed to decode trajectory snapshot")?;

    print_fibers(&fibers);
    Ok(())
}
