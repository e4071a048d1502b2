//! Reading `.env`-style environment sources

use std::io::Read;
use std::path::{Path, PathBuf};

use hub_core::EnvSource;

use crate::{Error, Result};

/// An environment file to merge, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    /// Name used in logs and merge reports.
    pub name: String,
    pub path: PathBuf,
    /// Fail instead of skipping when the file cannot be read.
    pub required: bool,
}

impl SourceSpec {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            required: false,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// Read an environment file.
///
/// A missing or unreadable file is [`Error::SourceUnavailable`]; a malformed
/// line is [`Error::EnvParse`].
pub fn read_env_file(name: &str, path: &Path) -> Result<EnvSource> {
    let iter = dotenvy::from_path_iter(path).map_err(|e| map_dotenv_error(path, e))?;
    collect(name, path, iter)
}

/// Parse environment text that is already in memory.
pub fn parse_env_text(name: &str, text: &str) -> Result<EnvSource> {
    collect(name, Path::new(name), dotenvy::from_read_iter(text.as_bytes()))
}

/// Read every source in order, skipping unavailable ones that are not required.
pub fn load_sources(specs: &[SourceSpec]) -> Result<Vec<EnvSource>> {
    let mut sources = Vec::with_capacity(specs.len());
    for spec in specs {
        match read_env_file(&spec.name, &spec.path) {
            Ok(source) => {
                tracing::debug!(
                    source = %spec.name,
                    path = %spec.path.display(),
                    entries = source.entries.len(),
                    "Read environment source"
                );
                sources.push(source);
            }
            Err(Error::SourceUnavailable { path, source }) if !spec.required => {
                tracing::warn!(
                    source = %spec.name,
                    path = %path.display(),
                    error = %source,
                    "Environment source unavailable, skipping"
                );
            }
            Err(e) => return Err(e),
        }
    }
    Ok(sources)
}

fn collect<R: Read>(name: &str, path: &Path, iter: dotenvy::Iter<R>) -> Result<EnvSource> {
    let mut source = EnvSource::new(name);
    for item in iter {
        let (key, value) = item.map_err(|e| map_dotenv_error(path, e))?;
        source.push(key, value);
    }
    Ok(source)
}

fn map_dotenv_error(path: &Path, error: dotenvy::Error) -> Error {
    match error {
        dotenvy::Error::Io(source) => Error::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        },
        other => Error::EnvParse {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    }
}
