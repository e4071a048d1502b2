//! Merging environment sources into the structured store
//!
//! Sources are applied in order, so a later source overrides an earlier one.
//! Keys that were already bound in the ambient environment before the merge
//! run started always win: a source never overrides them.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::address::EnvAddress;
use crate::error::Result;
use crate::store::HubConfig;

/// A named, ordered sequence of `KEY=VALUE` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSource {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

impl EnvSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn from_pairs<K, V, I>(name: impl Into<String>, pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            name: name.into(),
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }
}

/// Immutable set of environment keys bound at a source boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySnapshot {
    keys: BTreeSet<String>,
}

impl KeySnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<K: Into<String>> FromIterator<K> for KeySnapshot {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// The ambient environment as it was before any source was merged.
///
/// Captured once. Merging never writes to it, so every source boundary sees
/// the same bound keys.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// An environment with nothing bound.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Capture the current process environment. Non-UTF-8 entries are skipped.
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Keys bound at this boundary.
    pub fn snapshot(&self) -> KeySnapshot {
        self.vars.keys().cloned().collect()
    }
}

/// What one source did to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub source: String,
    /// New leaf keys written.
    pub inserted: usize,
    /// Existing leaf keys given a different value.
    pub updated: usize,
    /// Accepted entries whose value was already in place.
    pub unchanged: usize,
    /// Entries skipped because the key predates the merge.
    pub shadowed: usize,
    /// Entries dropped by the acceptance filter.
    pub filtered: usize,
}

impl MergeReport {
    pub fn changed(&self) -> bool {
        self.inserted > 0 || self.updated > 0
    }
}

/// Merge one source into the store.
///
/// Entries whose key is in `prior` are skipped. The rest are classified and
/// filtered; accepted entries are written last-write-wins. The source is
/// applied all-or-nothing: if any accepted entry targets an undeclared
/// component, nothing is written and the shape error is returned.
pub fn merge_source(config: &mut HubConfig, source: &EnvSource, prior: &KeySnapshot) -> Result<MergeReport> {
    let mut report = MergeReport {
        source: source.name.clone(),
        ..MergeReport::default()
    };

    let mut accepted = Vec::new();
    for (key, value) in &source.entries {
        if prior.contains(key) {
            tracing::debug!(source = %source.name, %key, "Key predates merge, keeping existing binding");
            report.shadowed += 1;
            continue;
        }

        let address = EnvAddress::classify(key);
        if !address.is_accepted() {
            tracing::trace!(source = %source.name, %key, "Ignoring unrelated key");
            report.filtered += 1;
            continue;
        }

        config.check_insertable(&address)?;
        accepted.push((address, value));
    }

    for (address, value) in accepted {
        match config.insert(&address, Some(value.clone()))? {
            None => report.inserted += 1,
            Some(previous) if previous.as_deref() == Some(value.as_str()) => report.unchanged += 1,
            Some(_) => report.updated += 1,
        }
        tracing::debug!(source = %source.name, %address, "Merged environment key");
    }

    tracing::info!(
        source = %report.source,
        inserted = report.inserted,
        updated = report.updated,
        shadowed = report.shadowed,
        filtered = report.filtered,
        "Merged environment source"
    );
    Ok(report)
}

/// Merge sources in order against the ambient environment.
///
/// Each source gets its own snapshot taken right before it is applied.
pub fn merge_sources(
    config: &mut HubConfig,
    environment: &Environment,
    sources: &[EnvSource],
) -> Result<Vec<MergeReport>> {
    sources
        .iter()
        .map(|source| {
            let prior = environment.snapshot();
            merge_source(config, source, &prior)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    fn hub() -> HubConfig {
        HubConfig::new()
            .with_component(Component::Exchange)
            .with_component(Component::Hzn)
    }

    #[test]
    fn test_merge_places_root_password() {
        let mut config: HubConfig =
            serde_yaml::from_str("exchange:\n  secrets:\n    root_pw: ~\n").unwrap();
        let source = EnvSource::from_pairs("env", [("EXCHANGE_ROOT_PW", "s3cret")]);

        let report = merge_source(&mut config, &source, &KeySnapshot::empty()).unwrap();

        assert_eq!(report.updated, 1);
        assert_eq!(config.get(&EnvAddress::classify("EXCHANGE_ROOT_PW")), Some("s3cret"));
    }

    #[test]
    fn test_merge_filters_noise() {
        let mut config = hub();
        let source = EnvSource::from_pairs(
            "env",
            [("PATH", "/usr/bin"), ("HZN_ORG_ID", "myorg"), ("HC_DOCKER_TAG", "latest")],
        );

        let report = merge_source(&mut config, &source, &KeySnapshot::empty()).unwrap();

        assert_eq!(report.filtered, 1);
        assert_eq!(report.inserted, 2);
        assert_eq!(config.get(&EnvAddress::classify("PATH")), None);
        assert_eq!(config.get(&EnvAddress::classify("HZN_ORG_ID")), Some("myorg"));
    }

    #[test]
    fn test_prior_keys_are_skipped() {
        let mut config = hub();
        let source = EnvSource::from_pairs("env", [("HZN_ORG_ID", "from-file")]);
        let prior: KeySnapshot = ["HZN_ORG_ID"].into_iter().collect();

        let report = merge_source(&mut config, &source, &prior).unwrap();

        assert_eq!(report.shadowed, 1);
        assert!(!report.changed());
        assert_eq!(config.get(&EnvAddress::classify("HZN_ORG_ID")), None);
    }

    #[test]
    fn test_later_source_overrides_earlier() {
        let mut config = hub();
        let environment = Environment::empty();
        let sources = [
            EnvSource::from_pairs("env_file", [("HZN_EXCHANGE_URL", "http://a")]),
            EnvSource::from_pairs("agent_install", [("HZN_EXCHANGE_URL", "http://b")]),
        ];

        let reports = merge_sources(&mut config, &environment, &sources).unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].updated, 1);
        assert_eq!(config.get(&EnvAddress::classify("HZN_EXCHANGE_URL")), Some("http://b"));
    }

    #[test]
    fn test_ambient_environment_beats_every_source() {
        let mut config = hub();
        let environment = Environment::from_pairs([("HZN_ORG_ID", "ambient")]);
        let sources = [
            EnvSource::from_pairs("env_file", [("HZN_ORG_ID", "a")]),
            EnvSource::from_pairs("agent_install", [("HZN_ORG_ID", "b")]),
        ];

        merge_sources(&mut config, &environment, &sources).unwrap();

        assert_eq!(config.get(&EnvAddress::classify("HZN_ORG_ID")), None);
        assert_eq!(environment.get("HZN_ORG_ID"), Some("ambient"));
    }

    #[test]
    fn test_undeclared_component_aborts_whole_source() {
        let mut config = hub();
        let before = config.clone();
        let source = EnvSource::from_pairs("env", [("HZN_ORG_ID", "myorg"), ("VAULT_TOKEN", "t")]);

        let err = merge_source(&mut config, &source, &KeySnapshot::empty()).unwrap_err();

        assert!(matches!(err, Error::ConfigShape { .. }));
        assert_eq!(config, before);
    }

    #[test]
    fn test_merge_twice_is_idempotent() {
        let mut config = hub();
        let source = EnvSource::from_pairs("env", [("HZN_ORG_ID", "myorg"), ("EXCHANGE_PORT", "8080")]);

        merge_source(&mut config, &source, &KeySnapshot::empty()).unwrap();
        let once = config.clone();
        let report = merge_source(&mut config, &source, &KeySnapshot::empty()).unwrap();

        assert_eq!(config, once);
        assert_eq!(report.unchanged, 2);
        assert!(!report.changed());
    }
}
