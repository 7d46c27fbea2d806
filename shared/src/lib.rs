//! Shared types for the deal duplicate finder
//!
//! Contains the record model handed over by the CRM collaborator, the verdict
//! and report types produced by the engine, the classifier failure taxonomy
//! and the logging bootstrap used by every binary in the workspace.

pub mod types;
pub mod errors;
pub mod logging;

pub use types::*;
pub use errors::*;
