//! Command implementations for hub-cli

pub mod classify;
pub mod load;
pub mod validate;

pub use classify::run_classify;
pub use load::run_load;
pub use validate::run_validate;

use serde::Serialize;

use crate::error::{CliError, Result};

/// JSON printed on stdout when a run fails after the document was read.
#[derive(Debug, Serialize)]
struct Failure<'a> {
    failed: bool,
    msg: String,
    validation_errors: &'a [String],
}

/// Print the failure document for `error` and hand the error back.
pub(crate) fn report_failure(error: CliError) -> CliError {
    let validation_errors = match error.core() {
        Some(hub_core::Error::Validation { errors }) => errors.as_slice(),
        _ => &[],
    };
    let failure = Failure {
        failed: true,
        msg: error.to_string(),
        validation_errors,
    };

    match serde_json::to_string_pretty(&failure) {
        Ok(json) => {
            println!("{}", json);
            error
        }
        Err(e) => e.into(),
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
