use crate::model::fiber::Fiber;
use crate::model::types::Point3;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{BufRead, Cursor, Write};
use tracing::debug;

pub mod error;
pub mod filament;
pub mod remap;
pub mod snapshot;
pub mod system;
pub mod types;
pub mod util;

pub use remap::remap_fiber_ids;
pub use system::reader::recover_box_extent;
pub use types::{TypeEncoding, TypeResolver, TypeTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Filament,
    Snapshot,
    SystemConfig,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Filament => write!(f, "filament listing"),
            Format::Snapshot => write!(f, "trajectory snapshot"),
            Format::SystemConfig => write!(f, "system configuration"),
        }
    }
}

/// Serializes fibers into the fiber engine's listing format and decodes its
/// snapshot output, owning the type table both directions share.
#[derive(Debug, Clone, Default)]
pub struct TrajectoryCodec {
    encoding: TypeEncoding,
    types: TypeTable,
}

impl TrajectoryCodec {
    pub fn new(encoding: TypeEncoding) -> Self {
        Self {
            encoding,
            types: TypeTable::new(),
        }
    }

    #[inline]
    pub fn encoding(&self) -> TypeEncoding {
        self.encoding
    }

    #[inline]
    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    /// Registers a type name ahead of encoding, returning its index.
    pub fn register_type(&mut self, type_name: &str) -> usize {
        self.types.index_of(type_name)
    }

    fn type_token(&mut self, type_name: &str) -> String {
        match self.encoding {
            TypeEncoding::Name => type_name.to_string(),
            TypeEncoding::Index => self.types.index_of(type_name).to_string(),
        }
    }

    fn resolver(&self) -> TypeResolver<'_> {
        match self.encoding {
            TypeEncoding::Name => TypeResolver::Literal,
            TypeEncoding::Index => TypeResolver::Indexed(&self.types),
        }
    }

    pub fn encode_fiber_line(&mut self, type_name: &str, points: &[Point3]) -> String {
        let token = self.type_token(type_name);
        filament::writer::encode_line(&token, points)
    }

    /// Writes one listing line per fiber and returns the submitted ids in
    /// listing order, for [`remap_fiber_ids`].
    pub fn write_filaments<'a, W, I>(
        &mut self,
        writer: W,
        fibers: I,
    ) -> Result<Vec<String>, error::Error>
    where
        W: Write,
        I: IntoIterator<Item = &'a Fiber>,
    {
        let fibers: Vec<&Fiber> = fibers.into_iter().collect();
        let tokens: Vec<String> = fibers.iter().map(|f| self.type_token(&f.type_name)).collect();

        filament::writer::write(
            writer,
            tokens
                .iter()
                .zip(&fibers)
                .map(|(token, fiber)| (token.as_str(), fiber.points.as_slice())),
        )?;

        debug!(count = fibers.len(), encoding = ?self.encoding, "wrote filament listing");
        Ok(fibers.iter().map(|f| f.id.clone()).collect())
    }

    pub fn read_filaments<R: BufRead>(&self, reader: R) -> Result<Vec<Fiber>, error::Error> {
        filament::reader::read(reader, self.resolver())
    }

    pub fn decode_snapshot<R: BufRead>(
        &self,
        reader: R,
    ) -> Result<BTreeMap<String, Fiber>, error::Error> {
        let fibers = snapshot::reader::read(reader, self.resolver())?;
        debug!(count = fibers.len(), "decoded snapshot");
        Ok(fibers)
    }

    pub fn decode_snapshot_str(&self, text: &str) -> Result<BTreeMap<String, Fiber>, error::Error> {
        self.decode_snapshot(Cursor::new(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Fiber> {
        vec![
            Fiber::new("7", "Actin-Polymer", vec![[0.5, 1.0, 2.0], [10.0, 1.0, 2.0]]),
            Fiber::new("2", "Arp", vec![[0.0; 3], [1.0, 1.0, 1.0], [2.0, 0.0, 1.0 / 3.0]]),
            Fiber::new("9", "Actin-Polymer", vec![[4.0, 4.0, 4.0], [5.0, 5.0, 5.0]]),
        ]
    }

    #[test]
    fn index_encoding_assigns_first_seen_indices() {
        let mut codec = TrajectoryCodec::new(TypeEncoding::Index);
        assert_eq!(codec.encode_fiber_line("Arp", &[[1.0, 2.0, 3.0]]), "FILAMENT 0 1 2 3");
        assert_eq!(codec.encode_fiber_line("Actin", &[[1.0, 2.0, 3.0]]), "FILAMENT 1 1 2 3");
        assert_eq!(codec.encode_fiber_line("Arp", &[[1.0, 2.0, 3.0]]), "FILAMENT 0 1 2 3");
        assert_eq!(codec.types().len(), 2);
    }

    #[test]
    fn listing_roundtrip_preserves_fibers() {
        for encoding in [TypeEncoding::Name, TypeEncoding::Index] {
            let fibers = sample();
            let mut codec = TrajectoryCodec::new(encoding);
            let mut buf = Vec::new();
            let ids = codec.write_filaments(&mut buf, &fibers).expect("write");
            assert_eq!(ids, vec!["7", "2", "9"]);

            let read = codec.read_filaments(Cursor::new(buf)).expect("read");
            let decoded: BTreeMap<_, _> = read.into_iter().map(|f| (f.id.clone(), f)).collect();
            let remapped = remap_fiber_ids(&ids, decoded).expect("remap");

            for fiber in &fibers {
                assert_eq!(&remapped[&fiber.id], fiber, "encoding {encoding:?}");
            }
        }
    }

    #[test]
    fn snapshot_uses_codec_type_table() {
        let mut codec = TrajectoryCodec::new(TypeEncoding::Index);
        codec.encode_fiber_line("Actin-Polymer", &[[0.0; 3]]);
        let fibers = codec
            .decode_snapshot_str("FILAMENT 0 0 10 0 0\n0 0 0 10 0 0\n")
            .expect("decode");
        assert_eq!(fibers["0"].type_name, "Actin-Polymer");
    }
}
