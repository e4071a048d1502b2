//! Environment key classification
//!
//! Turns a raw `KEY` from an environment source into the place in the
//! structured document where its value belongs, and back.

use std::fmt;

use serde::Serialize;

use crate::component::{Category, Component};

/// Component-less config keys that are still accepted into the document.
pub const ACCEPTED_GLOBAL_KEYS: &[&str] = &["anax_log_level", "compose_project_name", "hc_docker_tag"];

/// Location of a setting in the structured document.
///
/// The category is not part of the environment key; it only picks the group
/// the value is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EnvAddress {
    pub component: Option<Component>,
    pub category: Category,
    pub key: String,
}

impl EnvAddress {
    /// Classify a raw environment key.
    ///
    /// The key is lower-cased and split on `_`. A leading component token is
    /// taken off first; the rest is classified and re-joined as the leaf key.
    /// Never fails.
    pub fn classify(raw_key: &str) -> Self {
        let lowered = raw_key.to_lowercase();
        let mut tokens: Vec<&str> = lowered.split('_').collect();

        let component = tokens.first().and_then(|first| Component::from_token(first));
        if component.is_some() {
            tokens.remove(0);
        }

        Self {
            component,
            category: Category::classify(tokens.as_slice()),
            key: tokens.join("_"),
        }
    }

    /// Build an address directly.
    pub fn new(component: Option<Component>, category: Category, key: impl Into<String>) -> Self {
        Self {
            component,
            category,
            key: key.into(),
        }
    }

    /// Whether a value at this address should be taken into the document.
    ///
    /// Unprefixed config keys are environment noise unless allow-listed.
    pub fn is_accepted(&self) -> bool {
        self.component.is_some()
            || self.category != Category::Config
            || ACCEPTED_GLOBAL_KEYS.contains(&self.key.as_str())
    }

    /// The environment key this address is emitted as.
    pub fn env_key(&self) -> String {
        env_key(self.component, &self.key)
    }
}

impl fmt::Display for EnvAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.component {
            Some(component) => write!(f, "{}.{}.{}", component, self.category, self.key),
            None => write!(f, "{}.{}", self.category, self.key),
        }
    }
}

/// Environment key for a leaf under an optional component.
pub fn env_key(component: Option<Component>, key: &str) -> String {
    let prefix = component.map(|c| c.env_prefix()).unwrap_or_default();
    format!("{}{}", prefix, key.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_component_secret() {
        let address = EnvAddress::classify("EXCHANGE_ROOT_PW");
        assert_eq!(address.component, Some(Component::Exchange));
        assert_eq!(address.category, Category::Secrets);
        assert_eq!(address.key, "root_pw");
    }

    #[test]
    fn test_component_detected_before_category() {
        let address = EnvAddress::classify("TOKEN");
        assert_eq!(address, EnvAddress::new(None, Category::Secrets, "token"));
    }

    #[test]
    fn test_component_token_alone() {
        let address = EnvAddress::classify("VAULT");
        assert_eq!(address, EnvAddress::new(Some(Component::Vault), Category::Config, ""));
    }

    #[test]
    fn test_acceptance() {
        assert!(EnvAddress::classify("HZN_ORG_ID").is_accepted());
        assert!(EnvAddress::classify("DB_HOST").is_accepted());
        assert!(EnvAddress::classify("ANAX_LOG_LEVEL").is_accepted());
        assert!(!EnvAddress::classify("PATH").is_accepted());
        assert!(!EnvAddress::classify("HOME_DIR").is_accepted());
    }

    #[test]
    fn test_env_key() {
        assert_eq!(EnvAddress::classify("exchange_root_pw").env_key(), "EXCHANGE_ROOT_PW");
        assert_eq!(EnvAddress::classify("Compose_Project_Name").env_key(), "COMPOSE_PROJECT_NAME");
    }

    #[test]
    fn test_display() {
        assert_eq!(EnvAddress::classify("CSS_PORT").to_string(), "css.net.port");
        assert_eq!(EnvAddress::classify("API_KEY").to_string(), "secrets.api_key");
    }
}
