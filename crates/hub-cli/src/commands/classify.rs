//! The classify command

use colored::Colorize;
use hub_core::EnvAddress;

use crate::error::{CliError, Result};

/// Print the address of each key and whether a merge would take it.
pub fn run_classify(keys: &[String]) -> Result<()> {
    for key in keys {
        if key.is_empty() {
            return Err(CliError::user("environment key must not be empty"));
        }

        let address = EnvAddress::classify(key);
        let verdict = if address.is_accepted() {
            "accepted".green()
        } else {
            "ignored".yellow()
        };
        println!("{} -> {} ({})", key.bold(), address, verdict);
    }
    Ok(())
}
