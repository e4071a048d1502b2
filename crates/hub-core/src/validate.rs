//! Cross-field checks on the structured store

use serde::Serialize;

use crate::component::{Category, Component};
use crate::store::HubConfig;

const ROOT_PW: &str = "root_pw";
const ROOT_PW_BCRYPTED: &str = "root_pw_bcrypted";

/// How the exchange root password is specified.
///
/// Provisioning cannot derive the plaintext from the hash or the other way
/// around, so exactly one of the two being set is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RootPassword {
    /// Neither field appears in the document.
    Absent,
    /// At least one field appears, but both are null.
    Unset,
    PlaintextOnly,
    HashedOnly,
    Both,
}

impl RootPassword {
    /// Read the state from `exchange.secrets`.
    pub fn of(config: &HubConfig) -> Self {
        let Some(secrets) = config
            .component(Component::Exchange)
            .and_then(|groups| groups.settings(Category::Secrets))
        else {
            return RootPassword::Absent;
        };

        let plaintext = secrets.get(ROOT_PW).is_some();
        let hashed = secrets.get(ROOT_PW_BCRYPTED).is_some();
        match (plaintext, hashed) {
            (true, true) => RootPassword::Both,
            (true, false) => RootPassword::PlaintextOnly,
            (false, true) => RootPassword::HashedOnly,
            (false, false) if secrets.contains_key(ROOT_PW) || secrets.contains_key(ROOT_PW_BCRYPTED) => {
                RootPassword::Unset
            }
            (false, false) => RootPassword::Absent,
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, RootPassword::PlaintextOnly | RootPassword::HashedOnly)
    }

    fn error(&self) -> Option<String> {
        let found = match self {
            RootPassword::PlaintextOnly => ROOT_PW,
            RootPassword::HashedOnly => ROOT_PW_BCRYPTED,
            _ => return None,
        };
        Some(format!(
            "{ROOT_PW} and {ROOT_PW_BCRYPTED} must both be non-null strings, or absent from the configuration (found only {found})"
        ))
    }
}

/// Check every rule, returning all violations. Empty means valid.
pub fn validate(config: &HubConfig) -> Vec<String> {
    let mut errors = Vec::new();

    let root_password = RootPassword::of(config);
    tracing::debug!(?root_password, "Checked exchange root password");
    errors.extend(root_password.error());

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn doc(yaml: &str) -> HubConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[rstest]
    #[case("vault: {}\n", RootPassword::Absent)]
    #[case("exchange:\n  config:\n    x: 1\n", RootPassword::Absent)]
    #[case("exchange:\n  secrets:\n    root_pw: ~\n", RootPassword::Unset)]
    #[case("exchange:\n  secrets:\n    root_pw: ~\n    root_pw_bcrypted: ~\n", RootPassword::Unset)]
    #[case("exchange:\n  secrets:\n    root_pw: x\n", RootPassword::PlaintextOnly)]
    #[case("exchange:\n  secrets:\n    root_pw: x\n    root_pw_bcrypted: ~\n", RootPassword::PlaintextOnly)]
    #[case("exchange:\n  secrets:\n    root_pw_bcrypted: y\n", RootPassword::HashedOnly)]
    #[case("exchange:\n  secrets:\n    root_pw: x\n    root_pw_bcrypted: y\n", RootPassword::Both)]
    fn test_root_password_state(#[case] yaml: &str, #[case] expected: RootPassword) {
        assert_eq!(RootPassword::of(&doc(yaml)), expected);
    }

    #[test]
    fn test_plaintext_only_is_one_error() {
        let errors = validate(&doc("exchange:\n  secrets:\n    root_pw: x\n"));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("found only root_pw"));
    }

    #[test]
    fn test_hashed_only_is_one_error() {
        let errors = validate(&doc("exchange:\n  secrets:\n    root_pw_bcrypted: y\n"));
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("found only root_pw_bcrypted"));
    }

    #[test]
    fn test_both_set_is_valid() {
        let errors = validate(&doc("exchange:\n  secrets:\n    root_pw: x\n    root_pw_bcrypted: y\n"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_empty_document_is_valid() {
        assert!(validate(&HubConfig::new()).is_empty());
    }
}
