//! Management hub configuration ⇄ environment mapping.
//!
//! Converts between the structured hub document (component → category →
//! key) and flat `KEY=VALUE` environment files, merging environment sources
//! with a fixed precedence and validating the result before it is rendered.

pub mod address;
pub mod component;
pub mod error;
pub mod merge;
pub mod pipeline;
pub mod render;
pub mod store;
pub mod validate;

pub use address::EnvAddress;
pub use component::{Category, Component};
pub use error::{Error, Result};
pub use merge::{EnvSource, Environment, KeySnapshot, MergeReport, merge_source, merge_sources};
pub use pipeline::{HubEnvLoader, LoadOutcome};
pub use render::{LineStyle, agent_install, full_environment, restricted_subset, settings_to_lines};
pub use store::{GroupBody, GroupName, Groups, HubConfig, Settings};
pub use validate::{RootPassword, validate};
