use crate::io::{
    Format,
    error::Error,
    types::TypeResolver,
    util::{self, FILAMENT_TOKEN},
};
use crate::model::fiber::Fiber;
use std::collections::BTreeMap;
use std::io::BufRead;
use tracing::debug;

const HEADER_FIELDS: usize = 6;

struct Header<'a> {
    id: &'a str,
    type_token: &'a str,
}

/// Decodes every `FILAMENT` block, keyed by the engine-assigned fiber id.
///
/// Later blocks overwrite earlier ones with the same id, so a multi-timepoint
/// snapshot yields the geometry of its final timepoint.
pub fn read<R: BufRead>(
    reader: R,
    types: TypeResolver<'_>,
) -> Result<BTreeMap<String, Fiber>, Error> {
    let lines = util::collect_lines(reader)?;
    let mut fibers = BTreeMap::new();
    let mut cursor = 0;

    while cursor < lines.len() {
        let (ln, line) = &lines[cursor];
        if !util::has_filament_token(line) {
            cursor += 1;
            continue;
        }

        let header = parse_header(line, *ln)?;
        let (coords_ln, coords) = lines.get(cursor + 1).ok_or_else(|| {
            Error::parse(
                Format::Snapshot,
                *ln,
                "FILAMENT header is not followed by a coordinate line",
            )
        })?;
        let points = util::parse_points(coords.split_whitespace(), Format::Snapshot, *coords_ln)?;
        let type_name = types.resolve(header.type_token, Format::Snapshot, *ln)?;

        let fiber = Fiber::new(header.id, type_name, points);
        if fibers.insert(header.id.to_string(), fiber).is_some() {
            debug!(fiber = header.id, line = *ln, "later timepoint replaces fiber");
        }
        cursor += 2;
    }

    Ok(fibers)
}

fn parse_header(line: &str, line_no: usize) -> Result<Header<'_>, Error> {
    let tokens: Vec<_> = line.split_whitespace().collect();
    if tokens.len() != HEADER_FIELDS || tokens[0] != FILAMENT_TOKEN {
        return Err(Error::parse(
            Format::Snapshot,
            line_no,
            format!(
                "FILAMENT header must have {HEADER_FIELDS} fields \
                 (FILAMENT id type length delta_l delta_r), found {}",
                tokens.len()
            ),
        ));
    }
    Ok(Header {
        id: tokens[1],
        type_token: tokens[2],
    })
}
