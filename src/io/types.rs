use super::{Format, error::Error};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How fiber types are written into the engine's filament listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeEncoding {
    /// The literal type name.
    #[default]
    Name,
    /// A stable integer assigned in first-seen order.
    Index,
}

/// Bidirectional name/index table. Indices grow monotonically and are never reused.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    names: Vec<String>,
    indices: HashMap<String, usize>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index for `name`, assigning the next free one on first sight.
    pub fn index_of(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.indices.get(name) {
            return idx;
        }
        let idx = self.names.len();
        self.names.push(name.to_string());
        self.indices.insert(name.to_string(), idx);
        idx
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    pub fn name_of(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Recovers type names from the type column of a decoded record.
#[derive(Debug, Clone, Copy)]
pub enum TypeResolver<'a> {
    Literal,
    Indexed(&'a TypeTable),
}

impl TypeResolver<'_> {
    pub fn resolve(&self, token: &str, format: Format, line: usize) -> Result<String, Error> {
        match self {
            TypeResolver::Literal => Ok(token.to_string()),
            TypeResolver::Indexed(table) => {
                let index = token.parse::<usize>().map_err(|_| {
                    Error::parse(format, line, format!("type column '{token}' is not an index"))
                })?;
                table
                    .name_of(index)
                    .map(str::to_string)
                    .ok_or(Error::UnknownTypeIndex { line, index })
            }
        }
    }
}
