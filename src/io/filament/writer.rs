use crate::io::{error::Error, util::FILAMENT_TOKEN};
use crate::model::types::Point3;
use std::fmt::Write as _;
use std::io::Write;

/// Formats one listing line: `FILAMENT <type> x1 y1 z1 x2 y2 z2 ...`.
pub fn encode_line(type_token: &str, points: &[Point3]) -> String {
    let mut line = format!("{FILAMENT_TOKEN} {type_token}");
    for point in points {
        for value in point {
            let _ = write!(line, " {value}");
        }
    }
    line
}

pub fn write<'a, W, I>(mut writer: W, lines: I) -> Result<(), Error>
where
    W: Write,
    I: IntoIterator<Item = (&'a str, &'a [Point3])>,
{
    for (type_token, points) in lines {
        writeln!(writer, "{}", encode_line(type_token, points))?;
    }
    writer.flush()?;
    Ok(())
}
