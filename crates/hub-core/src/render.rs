//! Emitting environment text from the structured store
//!
//! Two artifacts are produced: the administrator's environment (every
//! setting) and `agent-install.cfg` (a fixed, ordered subset). Output depends
//! only on the store contents and their order, never on hashing.

use crate::address::{EnvAddress, env_key};
use crate::component::Component;
use crate::store::{HubConfig, Settings};

const MANAGED_NOTICE: &str =
    "# MANAGED BY ANSIBLE! DO NOT EDIT! Edits applied to this file will not be persistent.";

/// Banner of the administrator's environment file.
pub const ADMINISTRATOR_BANNER: &[&str] = &[
    "# Administrator's environment file used to run deploy-mgmt-hub.sh",
    "# Usage: source <this-file>",
    MANAGED_NOTICE,
];

/// Banner of `agent-install.cfg`.
pub const AGENT_INSTALL_BANNER: &[&str] = &["# agent-install.cfg", MANAGED_NOTICE];

/// Keys written to `agent-install.cfg`, in order, when they have a value.
pub const AGENT_INSTALL_KEYS: &[&str] = &[
    "HZN_LISTEN_IP",
    "HZN_LISTEN_PUBLIC_IP",
    "HZN_ORG_ID",
    "HZN_EXCHANGE_URL",
    "HZN_FSS_CSSURL",
    "HZN_AGBOT_URL",
    "HZN_FDO_SVC_URL",
];

/// How each `NAME=value` line is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineStyle {
    /// `export NAME='value'`, for sourcing from a shell.
    #[default]
    Export,
    /// `NAME="value"`.
    Plain,
    /// `NAME='value'`.
    Quoted,
}

impl LineStyle {
    pub fn line(&self, name: &str, value: &str) -> String {
        match self {
            LineStyle::Export => format!("export {}={}", name, single_quoted(value)),
            LineStyle::Plain => format!("{}={}", name, double_quoted(value)),
            LineStyle::Quoted => format!("{}={}", name, single_quoted(value)),
        }
    }
}

/// One line per non-null setting, prefixed with the component name if any.
pub fn settings_to_lines(component: Option<Component>, settings: &Settings, style: LineStyle) -> Vec<String> {
    settings
        .iter()
        .filter_map(|(key, value)| Some(style.line(&env_key(component, key), value?)))
        .collect()
}

/// Every settings group of every component, then every top-level group.
pub fn full_environment(config: &HubConfig, style: LineStyle) -> String {
    let lines = config.scopes().flat_map(|(component, groups)| {
        groups
            .settings_groups()
            .flat_map(move |(_, settings)| settings_to_lines(component, settings, style))
    });
    document(ADMINISTRATOR_BANNER, lines)
}

/// Only the listed keys that resolve to a non-empty value, in list order.
pub fn restricted_subset<S: AsRef<str>>(config: &HubConfig, keys: &[S]) -> String {
    let lines = keys.iter().filter_map(|key| {
        let key = key.as_ref();
        config
            .get(&EnvAddress::classify(key))
            .filter(|value| !value.is_empty())
            .map(|value| LineStyle::Quoted.line(key, value))
    });
    document(AGENT_INSTALL_BANNER, lines)
}

/// `agent-install.cfg` with the standard key list.
pub fn agent_install(config: &HubConfig) -> String {
    restricted_subset(config, AGENT_INSTALL_KEYS)
}

fn document(banner: &[&str], lines: impl Iterator<Item = String>) -> String {
    let mut out: Vec<String> = banner.iter().map(|line| line.to_string()).collect();
    out.push(String::new());
    out.extend(lines);
    out.push(String::new());
    out.join("\n")
}

fn single_quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

fn double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '\\' | '"' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
