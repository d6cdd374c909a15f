use crate::io::{
    Format,
    error::Error,
    types::TypeResolver,
    util::{self, FILAMENT_TOKEN},
};
use crate::model::fiber::Fiber;
use std::io::BufRead;

/// Reads a filament listing. Fibers get positional ids `"0"`, `"1"`, ... in
/// line order, matching the ids the engine reports for them.
pub fn read<R: BufRead>(reader: R, types: TypeResolver<'_>) -> Result<Vec<Fiber>, Error> {
    let lines = util::collect_lines(reader)?;
    let mut fibers = Vec::new();

    for (ln, raw) in &lines {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut tokens = trimmed.split_whitespace();
        if tokens.next() != Some(FILAMENT_TOKEN) {
            return Err(Error::parse(
                Format::Filament,
                *ln,
                "listing lines must start with FILAMENT",
            ));
        }
        let type_token = tokens
            .next()
            .ok_or_else(|| Error::parse(Format::Filament, *ln, "missing filament type"))?;
        let type_name = types.resolve(type_token, Format::Filament, *ln)?;
        let points = util::parse_points(tokens, Format::Filament, *ln)?;

        fibers.push(Fiber::new(fibers.len().to_string(), type_name, points));
    }

    Ok(fibers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::types::TypeTable;
    use std::io::Cursor;

    #[test]
    fn reads_listing_in_order() {
        let text = "FILAMENT Actin-Polymer 0 0 0 10 0 0\n\n# comment\nFILAMENT Arp 1 1 1 2 2 2 3 3 3\n";
        let fibers = read(Cursor::new(text), TypeResolver::Literal).expect("valid listing");
        assert_eq!(fibers.len(), 2);
        assert_eq!(fibers[0].id, "0");
        assert_eq!(fibers[0].type_name, "Actin-Polymer");
        assert_eq!(fibers[1].id, "1");
        assert_eq!(fibers[1].points.len(), 3);
    }

    #[test]
    fn resolves_indexed_types() {
        let mut table = TypeTable::new();
        table.index_of("Actin-Polymer");
        let fibers = read(
            Cursor::new("FILAMENT 0 0 0 0 1 1 1\n"),
            TypeResolver::Indexed(&table),
        )
        .expect("valid listing");
        assert_eq!(fibers[0].type_name, "Actin-Polymer");
    }

    #[test]
    fn rejects_foreign_lines() {
        let err = read(Cursor::new("LINKER 0 0 0\n"), TypeResolver::Literal)
            .expect_err("unexpected record kind");
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }
}
