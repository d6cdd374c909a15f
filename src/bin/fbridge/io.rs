use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};

/// Returns `true` if stderr is a terminal (interactive).
pub fn stderr_is_tty() -> bool {
    io::stderr().is_terminal()
}

/// Opens `path`, or stdin when no path is given. Refuses an interactive
/// stdin so a forgotten argument does not hang waiting for input.
pub fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    if let Some(p) = path {
        let file =
            File::open(p).with_context(|| format!("Failed to open input file: {}", p.display()))?;
        return Ok(Box::new(BufReader::new(file)));
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        bail!("No input file specified and stdin is a terminal");
    }
    Ok(Box::new(stdin.lock()))
}

pub fn read_text(path: Option<&Path>) -> Result<String> {
    let mut text = String::new();
    open_input(path)?
        .read_to_string(&mut text)
        .context("Failed to read input")?;
    Ok(text)
}
