//! Filament listing: the fiber engine's input file, one `FILAMENT` line per fiber.

pub mod reader;
pub mod writer;

use super::error::Error;
use super::types::TypeResolver;
use crate::model::fiber::FiberState;
use std::io::Cursor;

const CHANDRASEKARAN_2019: &str = include_str!("../../../resources/fibers/chandrasekaran_2019.txt");
const CHANDRASEKARAN_2019_EXTENT: [f64; 3] = [4000.0, 2000.0, 2000.0];

impl FiberState {
    /// The bundled 30-filament parallel actin bundle in a 4000 x 2000 x 2000
    /// box, ids `"1"` through `"30"`.
    pub fn chandrasekaran_2019() -> Result<Self, Error> {
        chandrasekaran_2019()
    }
}

fn chandrasekaran_2019() -> Result<FiberState, Error> {
    let fibers = reader::read(Cursor::new(CHANDRASEKARAN_2019), TypeResolver::Literal)?;
    Ok(FiberState::with_fibers(
        CHANDRASEKARAN_2019_EXTENT,
        fibers.into_iter().enumerate().map(|(i, mut fiber)| {
            fiber.id = (i + 1).to_string();
            fiber
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_table_loads() {
        let state = FiberState::chandrasekaran_2019().expect("bundled table parses");
        assert_eq!(state.fiber_count(), 30);
        assert!(state.has_box_extent());

        let first = &state.fibers["1"];
        assert_eq!(first.type_name, "Actin-Polymer");
        assert_eq!(
            first.points,
            vec![[1000.0, 912.5, 1000.0], [3160.0, 912.5, 1000.0]]
        );
        assert!(state.fibers.values().all(|f| f.points.len() == 2));
    }
}
