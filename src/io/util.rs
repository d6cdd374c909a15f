use super::{Format, error::Error};
use crate::model::types::Point3;
use std::io::BufRead;

pub const FILAMENT_TOKEN: &str = "FILAMENT";

/// Reads every line, pairing it with its 1-based line number.
pub fn collect_lines<R: BufRead>(reader: R) -> Result<Vec<(usize, String)>, Error> {
    reader
        .lines()
        .enumerate()
        .map(|(i, line)| {
            line.map(|v| (i + 1, v))
                .map_err(|e| Error::Io { source: e })
        })
        .collect()
}

#[inline]
pub fn has_filament_token(line: &str) -> bool {
    line.split_whitespace().any(|token| token == FILAMENT_TOKEN)
}

/// Parses whitespace-separated floats into points, three values per point.
pub fn parse_points<'a, I>(tokens: I, format: Format, line_no: usize) -> Result<Vec<Point3>, Error>
where
    I: IntoIterator<Item = &'a str>,
{
    let values = tokens
        .into_iter()
        .map(|token| {
            token.parse::<f64>().map_err(|_| {
                Error::parse(format, line_no, format!("invalid coordinate '{token}'"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if values.is_empty() {
        return Err(Error::parse(format, line_no, "coordinate list is empty"));
    }
    if values.len() % 3 != 0 {
        return Err(Error::parse(
            format,
            line_no,
            format!(
                "coordinate count {} is not a multiple of 3",
                values.len()
            ),
        ));
    }

    Ok(values
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect())
}
