//! Deployment components and setting categories
//!
//! Both sets are closed. The naming grammar of an environment key is
//! `COMPONENT_..._KEY`, where the leading token may name a [`Component`]
//! and the remaining tokens decide the [`Category`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A deployable unit of the management hub with its own settings namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Agbot,
    Agbot2,
    Agent,
    Css,
    Exchange,
    Hzn,
    Mongo,
    Postgres,
    Fdo,
    Oh,
    Vault,
}

impl Component {
    /// Every component, in the order they are probed against a key's first token.
    pub const ALL: [Component; 11] = [
        Component::Agbot,
        Component::Agbot2,
        Component::Agent,
        Component::Css,
        Component::Exchange,
        Component::Hzn,
        Component::Mongo,
        Component::Postgres,
        Component::Fdo,
        Component::Oh,
        Component::Vault,
    ];

    /// Lowercase name used in documents and as the key token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Agbot => "agbot",
            Component::Agbot2 => "agbot2",
            Component::Agent => "agent",
            Component::Css => "css",
            Component::Exchange => "exchange",
            Component::Hzn => "hzn",
            Component::Mongo => "mongo",
            Component::Postgres => "postgres",
            Component::Fdo => "fdo",
            Component::Oh => "oh",
            Component::Vault => "vault",
        }
    }

    /// Match an already lower-cased token against the component names.
    pub fn from_token(token: &str) -> Option<Component> {
        Self::ALL.into_iter().find(|c| c.as_str() == token)
    }

    /// Prefix used when this component's settings are emitted, e.g. `EXCHANGE_`.
    pub fn env_prefix(&self) -> String {
        format!("{}_", self.as_str().to_uppercase())
    }
}

impl FromStr for Component {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_token(&s.to_lowercase()).ok_or_else(|| Error::UnknownComponent {
            name: s.to_string(),
        })
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic class of a setting. Decides which group of the document a value lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Credentials, tokens and keys.
    Secrets,
    /// Hosts, ports and addresses.
    Net,
    /// Everything else.
    Config,
}

/// Keyword sets in priority order. The first set sharing a token with the key wins.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Secrets,
        &["pw", "pass", "password", "key", "auth", "token"],
    ),
    (Category::Net, &["port", "ip", "hostname", "host"]),
];

impl Category {
    pub const ALL: [Category; 3] = [Category::Secrets, Category::Net, Category::Config];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Secrets => "secrets",
            Category::Net => "net",
            Category::Config => "config",
        }
    }

    /// Parse a group name. Anything other than the three category names is a free-form group.
    pub fn from_name(name: &str) -> Option<Category> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Keywords that select this category. Empty for the fallback.
    pub fn keywords(&self) -> &'static [&'static str] {
        CATEGORY_KEYWORDS
            .iter()
            .find(|(category, _)| category == self)
            .map(|(_, keywords)| *keywords)
            .unwrap_or(&[])
    }

    /// Classify a token sequence. Total: falls back to [`Category::Config`].
    pub fn classify<S: AsRef<str>>(tokens: &[S]) -> Category {
        CATEGORY_KEYWORDS
            .iter()
            .find(|(_, keywords)| {
                tokens
                    .iter()
                    .any(|token| keywords.contains(&token.as_ref()))
            })
            .map(|(category, _)| *category)
            .unwrap_or(Category::Config)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
