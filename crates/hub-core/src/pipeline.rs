//! The merge → validate → render pipeline
//!
//! Takes ownership of the initial document for the duration of one run and
//! hands it back, possibly modified, together with the generated text.

use serde::Serialize;

use crate::address::EnvAddress;
use crate::error::{Error, Result};
use crate::merge::{EnvSource, Environment, MergeReport, merge_sources};
use crate::render::{LineStyle, agent_install, full_environment};
use crate::store::HubConfig;
use crate::validate::validate;

/// Supplies a value for a null secret, or declines with `None`.
pub type SecretGenerator<'a> = Box<dyn FnMut(&EnvAddress) -> Option<String> + 'a>;

/// Everything a successful run produces.
#[derive(Debug, Clone, Serialize)]
pub struct LoadOutcome {
    /// Whether any source or generated secret changed the document.
    pub changed: bool,
    /// The resulting document.
    pub hzn_mgmt_hub: HubConfig,
    /// The administrator's environment file.
    pub administrator_env: String,
    /// `agent-install.cfg`.
    pub agent_install: String,
    /// Per-source merge summary, in merge order.
    pub sources: Vec<MergeReport>,
}

/// One run over one document.
pub struct HubEnvLoader<'a> {
    config: HubConfig,
    environment: Environment,
    style: LineStyle,
    secrets: Option<SecretGenerator<'a>>,
}

impl<'a> HubEnvLoader<'a> {
    pub fn new(config: HubConfig) -> Self {
        Self {
            config,
            environment: Environment::empty(),
            style: LineStyle::Export,
            secrets: None,
        }
    }

    /// The environment whose keys take precedence over every source.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Line style of the administrator's environment.
    pub fn with_style(mut self, style: LineStyle) -> Self {
        self.style = style;
        self
    }

    /// Fill null secrets after merging.
    pub fn with_secret_generator<F>(mut self, generator: F) -> Self
    where
        F: FnMut(&EnvAddress) -> Option<String> + 'a,
    {
        self.secrets = Some(Box::new(generator));
        self
    }

    /// Merge `sources` in order, validate, and render.
    ///
    /// Shape errors abort the run. Validation failures are returned together
    /// as [`Error::Validation`] and nothing is rendered.
    pub fn run(self, sources: &[EnvSource]) -> Result<LoadOutcome> {
        let HubEnvLoader {
            mut config,
            environment,
            style,
            secrets,
        } = self;

        let reports = merge_sources(&mut config, &environment, sources)?;
        let mut changed = reports.iter().any(MergeReport::changed);

        if let Some(generator) = secrets {
            let filled = config.fill_secret_defaults(generator);
            if filled > 0 {
                tracing::info!(filled, "Filled default secrets");
                changed = true;
            }
        }

        let errors = validate(&config);
        if !errors.is_empty() {
            tracing::warn!(count = errors.len(), "Configuration validation failed");
            return Err(Error::Validation { errors });
        }

        Ok(LoadOutcome {
            changed,
            administrator_env: full_environment(&config, style),
            agent_install: agent_install(&config),
            hzn_mgmt_hub: config,
            sources: reports,
        })
    }
}
