//! Finder services implementations

pub mod openai_provider;
pub mod response_parser;
pub mod hubspot_client;
pub mod csv_exporter;
pub mod record_source;

#[cfg(test)]
pub mod tests;

pub use openai_provider::*;
pub use response_parser::*;
pub use hubspot_client::*;
pub use csv_exporter::*;
pub use record_source::*;
