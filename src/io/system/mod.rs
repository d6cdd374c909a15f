//! Rendered fiber-engine system configuration.

pub mod reader;
