//! The validate command

use std::path::Path;

use hub_core::{RootPassword, validate};
use hub_fs::DocumentStore;
use serde::Serialize;

use super::{print_json, report_failure};
use crate::error::Result;

#[derive(Debug, Serialize)]
struct Report {
    root_password: RootPassword,
    validation_errors: Vec<String>,
}

/// Validate the document as it is on disk.
pub fn run_validate(config: &Path) -> Result<()> {
    let config = DocumentStore::new()
        .load(config)
        .map_err(|e| report_failure(e.into()))?;

    let errors = validate(&config);
    if !errors.is_empty() {
        return Err(report_failure(hub_core::Error::Validation { errors }.into()));
    }

    print_json(&Report {
        root_password: RootPassword::of(&config),
        validation_errors: errors,
    })
}
