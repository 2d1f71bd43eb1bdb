//! Core types and utilities for the Lenia cellular-automaton engine.

pub mod types;
pub mod config;
pub mod error;
pub mod growth;
pub mod stats;

pub use error::{Error, Result};
pub use types::*;
pub use config::*;
pub use growth::growth;
pub use stats::*;
