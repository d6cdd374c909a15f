use super::error::Error;
use std::collections::BTreeMap;

const BUNDLED_SYSTEM_TEMPLATE: &str = include_str!("../../resources/medyan/system.txt");

/// Renders the fiber engine's system configuration from named parameters.
pub trait ConfigRenderer {
    fn render(&self, params: &BTreeMap<&str, String>) -> Result<String, Error>;
}

/// Substitutes `{{ name }}` placeholders. An unknown name or an unterminated
/// placeholder is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderTemplate {
    text: String,
}

impl PlaceholderTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The system configuration shipped with the crate.
    pub fn bundled() -> Self {
        Self::new(BUNDLED_SYSTEM_TEMPLATE)
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Default for PlaceholderTemplate {
    fn default() -> Self {
        Self::bundled()
    }
}

impl ConfigRenderer for PlaceholderTemplate {
    fn render(&self, params: &BTreeMap<&str, String>) -> Result<String, Error> {
        let mut out = String::with_capacity(self.text.len());
        let mut rest = self.text.as_str();

        while let Some(open) = rest.find("{{") {
            out.push_str(&rest[..open]);
            let after = &rest[open + 2..];
            let close = after
                .find("}}")
                .ok_or_else(|| Error::Template("unterminated '{{' placeholder".to_string()))?;
            let name = after[..close].trim();
            let value = params
                .get(name)
                .ok_or_else(|| Error::Template(format!("no value for placeholder '{name}'")))?;
            out.push_str(value);
            rest = &after[close + 2..];
        }
        out.push_str(rest);
        Ok(out)
    }
}
