//! Structured store for the management hub document
//!
//! The document is keyed by component, then by group, then by leaf key:
//!
//! ```text
//! exchange:            <- Component
//!   secrets:           <- GroupName::Category(Secrets)
//!     root_pw: ...     <- leaf
//!   extras: [...]      <- opaque, kept verbatim
//! secrets:             <- top-level group (component-less settings)
//!   api_key: ...
//! ```
//!
//! Only `secrets`, `net` and `config` groups are addressed by environment
//! keys. Other groups are carried along untouched.

mod document;
mod settings;

use std::fmt;

use serde_yaml::Value;

use crate::address::EnvAddress;
use crate::component::{Category, Component};
use crate::error::{Error, Result};

pub use settings::Settings;

/// Name of a group inside a component or at the top level.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupName {
    Category(Category),
    Named(String),
}

impl From<&str> for GroupName {
    fn from(name: &str) -> Self {
        match Category::from_name(name) {
            Some(category) => GroupName::Category(category),
            None => GroupName::Named(name.to_string()),
        }
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupName::Category(category) => f.write_str(category.as_str()),
            GroupName::Named(name) => f.write_str(name),
        }
    }
}

/// Contents of a group.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupBody {
    /// A flat mapping of leaf settings.
    Settings(Settings),
    /// Anything else. Preserved in the document, never emitted as environment.
    Opaque(Value),
}

/// Ordered groups of one scope (a component, or the top level).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Groups {
    entries: Vec<(GroupName, GroupBody)>,
}

impl Groups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &GroupName) -> Option<&GroupBody> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, body)| body)
    }

    /// Settings of a category group, if the group exists and is a settings mapping.
    pub fn settings(&self, category: Category) -> Option<&Settings> {
        match self.get(&GroupName::Category(category)) {
            Some(GroupBody::Settings(settings)) => Some(settings),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupName, &GroupBody)> {
        self.entries.iter().map(|(name, body)| (name, body))
    }

    /// Only the groups that hold leaf settings, in document order.
    pub fn settings_groups(&self) -> impl Iterator<Item = (&GroupName, &Settings)> {
        self.entries.iter().filter_map(|(name, body)| match body {
            GroupBody::Settings(settings) => Some((name, settings)),
            GroupBody::Opaque(_) => None,
        })
    }

    /// Add or replace a group.
    pub fn insert(&mut self, name: GroupName, body: GroupBody) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = body,
            None => self.entries.push((name, body)),
        }
    }

    fn check_writable(&self, category: Category) -> std::result::Result<(), String> {
        match self.get(&GroupName::Category(category)) {
            Some(GroupBody::Opaque(_)) => Err(format!("group `{}` is not a settings mapping", category)),
            _ => Ok(()),
        }
    }

    fn existing_settings_mut(&mut self, category: Category) -> Option<&mut Settings> {
        let name = GroupName::Category(category);
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, GroupBody::Settings(settings))) => Some(settings),
            _ => None,
        }
    }

    fn settings_mut(&mut self, category: Category) -> std::result::Result<&mut Settings, String> {
        let name = GroupName::Category(category);
        let index = match self.entries.iter().position(|(n, _)| *n == name) {
            Some(index) => index,
            None => {
                self.entries.push((name, GroupBody::Settings(Settings::new())));
                self.entries.len() - 1
            }
        };

        match &mut self.entries[index].1 {
            GroupBody::Settings(settings) => Ok(settings),
            GroupBody::Opaque(_) => Err(format!("group `{}` is not a settings mapping", category)),
        }
    }
}

/// The structured management hub document.
///
/// Components must be declared by the initial document before values can be
/// inserted under them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HubConfig {
    components: Vec<(Component, Groups)>,
    globals: Groups,
}

impl HubConfig {
    /// An empty document with no components declared.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a component (no-op if already declared).
    pub fn with_component(mut self, component: Component) -> Self {
        self.declare(component);
        self
    }

    /// Declare a component and return its groups.
    pub fn declare(&mut self, component: Component) -> &mut Groups {
        let index = match self.components.iter().position(|(c, _)| *c == component) {
            Some(index) => index,
            None => {
                self.components.push((component, Groups::new()));
                self.components.len() - 1
            }
        };
        &mut self.components[index].1
    }

    pub fn has_component(&self, component: Component) -> bool {
        self.component(component).is_some()
    }

    pub fn component(&self, component: Component) -> Option<&Groups> {
        self.components
            .iter()
            .find(|(c, _)| *c == component)
            .map(|(_, groups)| groups)
    }

    /// Declared components in document order.
    pub fn components(&self) -> impl Iterator<Item = (Component, &Groups)> {
        self.components.iter().map(|(c, groups)| (*c, groups))
    }

    /// Top-level groups (settings that belong to no component).
    pub fn globals(&self) -> &Groups {
        &self.globals
    }

    pub fn globals_mut(&mut self) -> &mut Groups {
        &mut self.globals
    }

    /// Read-only walk over every scope: components first, then the top level.
    pub fn scopes(&self) -> impl Iterator<Item = (Option<Component>, &Groups)> {
        self.components
            .iter()
            .map(|(c, groups)| (Some(*c), groups))
            .chain(std::iter::once((None, &self.globals)))
    }

    fn scope(&self, component: Option<Component>) -> Option<&Groups> {
        match component {
            Some(component) => self.component(component),
            None => Some(&self.globals),
        }
    }

    /// Non-null value at `address`. Never creates anything.
    pub fn get(&self, address: &EnvAddress) -> Option<&str> {
        self.entry(address).flatten()
    }

    /// `None` when the address is absent, `Some(None)` when it holds null.
    pub fn entry(&self, address: &EnvAddress) -> Option<Option<&str>> {
        self.scope(address.component)?
            .settings(address.category)?
            .entry(&address.key)
    }

    /// Check that `address` could be inserted without touching the store.
    pub fn check_insertable(&self, address: &EnvAddress) -> Result<()> {
        let groups = self.scope(address.component).ok_or_else(|| undeclared(address))?;
        groups
            .check_writable(address.category)
            .map_err(|reason| shape_error(address, reason))
    }

    /// Set the value at `address`, creating the category group if needed.
    ///
    /// Returns the previous entry. Fails if the component was never declared
    /// or the target group is not a settings mapping.
    pub fn insert(&mut self, address: &EnvAddress, value: Option<String>) -> Result<Option<Option<String>>> {
        let groups = match address.component {
            Some(component) => self
                .components
                .iter_mut()
                .find(|(c, _)| *c == component)
                .map(|(_, groups)| groups)
                .ok_or_else(|| undeclared(address))?,
            None => &mut self.globals,
        };

        let settings = groups
            .settings_mut(address.category)
            .map_err(|reason| shape_error(address, reason))?;
        Ok(settings.insert(address.key.clone(), value))
    }

    /// Fill null secrets from `generator`, returning how many were filled.
    ///
    /// The generator sees the address of each null leaf in every `secrets`
    /// group and may decline by returning `None`.
    pub fn fill_secret_defaults<F>(&mut self, mut generator: F) -> usize
    where
        F: FnMut(&EnvAddress) -> Option<String>,
    {
        let scopes = self
            .components
            .iter_mut()
            .map(|(c, groups)| (Some(*c), groups))
            .chain(std::iter::once((None, &mut self.globals)));

        let mut filled = 0;
        for (component, groups) in scopes {
            let Some(settings) = groups.existing_settings_mut(Category::Secrets) else {
                continue;
            };
            for (key, value) in settings.iter_mut() {
                if value.is_some() {
                    continue;
                }
                let address = EnvAddress::new(component, Category::Secrets, key);
                if let Some(generated) = generator(&address) {
                    tracing::debug!(%address, "Generated default secret");
                    *value = Some(generated);
                    filled += 1;
                }
            }
        }
        filled
    }
}

fn undeclared(address: &EnvAddress) -> Error {
    let component = address.component.map(|c| c.as_str()).unwrap_or_default();
    Error::shape(format!(
        "cannot set {}: component `{}` is not declared in the document",
        address.env_key(),
        component
    ))
}

fn shape_error(address: &EnvAddress, reason: String) -> Error {
    Error::shape(format!("cannot set {}: {}", address.env_key(), reason))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn exchange_doc() -> HubConfig {
        HubConfig::new().with_component(Component::Exchange)
    }

    #[test]
    fn test_get_does_not_create_levels() {
        let config = exchange_doc();
        let address = EnvAddress::classify("EXCHANGE_ROOT_PW");

        assert_eq!(config.get(&address), None);
        assert!(config.component(Component::Exchange).unwrap().is_empty());
    }

    #[test]
    fn test_insert_creates_category_group() {
        let mut config = exchange_doc();
        let address = EnvAddress::classify("EXCHANGE_ROOT_PW");

        let previous = config.insert(&address, Some("s3cret".into())).unwrap();

        assert_eq!(previous, None);
        assert_eq!(config.get(&address), Some("s3cret"));
        assert!(config.component(Component::Exchange).unwrap().settings(Category::Secrets).is_some());
    }

    #[test]
    fn test_insert_is_last_write_wins_and_idempotent() {
        let mut config = exchange_doc();
        let address = EnvAddress::classify("EXCHANGE_PORT");

        config.insert(&address, Some("1".into())).unwrap();
        let once = config.clone();
        config.insert(&address, Some("1".into())).unwrap();
        assert_eq!(config, once);

        config.insert(&address, Some("2".into())).unwrap();
        assert_eq!(config.get(&address), Some("2"));
    }

    #[test]
    fn test_insert_into_undeclared_component_fails() {
        let mut config = exchange_doc();
        let address = EnvAddress::classify("VAULT_TOKEN");

        let err = config.insert(&address, Some("t".into())).unwrap_err();
        assert!(matches!(err, Error::ConfigShape { .. }));
        assert!(err.to_string().contains("vault"));
        assert!(!config.has_component(Component::Vault));
    }

    #[test]
    fn test_insert_into_opaque_group_fails() {
        let mut config = exchange_doc();
        config.declare(Component::Exchange).insert(
            GroupName::Category(Category::Net),
            GroupBody::Opaque(Value::Sequence(vec![])),
        );
        let address = EnvAddress::classify("EXCHANGE_PORT");

        assert!(config.check_insertable(&address).is_err());
        assert!(config.insert(&address, Some("80".into())).is_err());
    }

    #[test]
    fn test_global_insert_needs_no_declaration() {
        let mut config = HubConfig::new();
        let address = EnvAddress::classify("COMPOSE_PROJECT_NAME");

        config.insert(&address, Some("hzn".into())).unwrap();
        assert_eq!(config.globals().settings(Category::Config).unwrap().get("compose_project_name"), Some("hzn"));
    }

    #[test]
    fn test_fill_secret_defaults_only_touches_nulls() {
        let mut config = exchange_doc();
        config.insert(&EnvAddress::classify("EXCHANGE_ROOT_PW"), None).unwrap();
        config.insert(&EnvAddress::classify("EXCHANGE_API_KEY"), Some("kept".into())).unwrap();
        config.insert(&EnvAddress::classify("AUTH_TOKEN"), None).unwrap();

        let mut seen = Vec::new();
        let filled = config.fill_secret_defaults(|address| {
            seen.push(address.env_key());
            Some("generated".to_string())
        });

        assert_eq!(filled, 2);
        assert_eq!(seen, vec!["EXCHANGE_ROOT_PW", "AUTH_TOKEN"]);
        assert_eq!(config.get(&EnvAddress::classify("EXCHANGE_API_KEY")), Some("kept"));
        assert_eq!(config.get(&EnvAddress::classify("EXCHANGE_ROOT_PW")), Some("generated"));
    }

    #[test]
    fn test_scopes_visit_components_then_globals() {
        let config = HubConfig::new()
            .with_component(Component::Vault)
            .with_component(Component::Css);
        let scopes: Vec<_> = config.scopes().map(|(c, _)| c).collect();
        assert_eq!(scopes, vec![Some(Component::Vault), Some(Component::Css), None]);
    }
}
