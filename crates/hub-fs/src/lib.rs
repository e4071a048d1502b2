//! Filesystem edge of the management hub environment tooling
//!
//! Loads and saves the structured document, reads `.env`-style sources and
//! writes generated artifacts atomically.

pub mod document;
pub mod env_file;
pub mod error;
pub mod io;

pub use document::{DocumentFormat, DocumentStore};
pub use env_file::{SourceSpec, load_sources, parse_env_text, read_env_file};
pub use error::{Error, Result};
