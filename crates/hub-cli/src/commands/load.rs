//! The load command: merge, validate, render, optionally write

use std::path::Path;

use hub_core::{EnvAddress, Environment, HubEnvLoader, LineStyle, LoadOutcome};
use hub_fs::{DocumentStore, SourceSpec, io, load_sources};
use uuid::Uuid;

use super::{print_json, report_failure};
use crate::cli::LoadArgs;
use crate::error::Result;

/// Run the full pipeline and print the JSON result.
pub fn run_load(args: &LoadArgs) -> Result<()> {
    let store = DocumentStore::new();
    let config = store.load(&args.config).map_err(|e| report_failure(e.into()))?;

    let outcome = match execute(config, args) {
        Ok(outcome) => outcome,
        Err(e) => return Err(report_failure(e)),
    };

    write_artifacts(&store, &outcome, args).map_err(report_failure)?;

    print_json(&outcome)
}

/// Render every requested artifact first, so a document that cannot be
/// rendered leaves nothing written.
fn write_artifacts(store: &DocumentStore, outcome: &LoadOutcome, args: &LoadArgs) -> Result<()> {
    let mut artifacts: Vec<(&Path, String)> = Vec::new();
    if let Some(path) = &args.write_document {
        artifacts.push((path.as_path(), store.render(path, &outcome.hzn_mgmt_hub)?));
    }
    if let Some(path) = &args.write_admin_env {
        artifacts.push((path.as_path(), outcome.administrator_env.clone()));
    }
    if let Some(path) = &args.write_agent_install {
        artifacts.push((path.as_path(), outcome.agent_install.clone()));
    }

    for (path, content) in &artifacts {
        io::write_text(path, content)?;
    }
    Ok(())
}

fn execute(config: hub_core::HubConfig, args: &LoadArgs) -> Result<LoadOutcome> {
    let sources = load_sources(&source_specs(args))?;

    let environment = if args.no_process_env {
        Environment::empty()
    } else {
        Environment::from_process()
    };
    let style = if args.plain {
        LineStyle::Plain
    } else {
        LineStyle::Export
    };

    let mut loader = HubEnvLoader::new(config)
        .with_environment(environment)
        .with_style(style);
    if args.generate_secrets {
        loader = loader.with_secret_generator(generate_secret);
    }

    Ok(loader.run(&sources)?)
}

/// Environment file first, then agent-install.cfg.
fn source_specs(args: &LoadArgs) -> Vec<SourceSpec> {
    [("env_file", &args.env_file), ("agent_install", &args.agent_install)]
        .into_iter()
        .filter_map(|(name, path)| {
            path.as_ref()
                .map(|path| SourceSpec::new(name, path).required(args.require_sources))
        })
        .collect()
}

/// Random token for a null secret. Hashes are never invented.
fn generate_secret(address: &EnvAddress) -> Option<String> {
    if address.key.ends_with("bcrypted") {
        return None;
    }
    Some(Uuid::new_v4().simple().to_string())
}
