//! Conversion between [`HubConfig`] and the generic document tree
//!
//! Any serde format can carry the document. It is buffered as a
//! `serde_yaml::Value` because that mapping keeps key order.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::{Mapping, Value};

use super::{GroupBody, GroupName, Groups, HubConfig, Settings};
use crate::component::Component;
use crate::error::{Error, Result};

impl HubConfig {
    /// Build the store from a document tree.
    ///
    /// Top-level keys naming a component must hold a mapping (or null).
    /// Everything else becomes a top-level group.
    pub fn from_value(value: Value) -> Result<Self> {
        let mapping = match value {
            Value::Null => return Ok(Self::new()),
            Value::Mapping(mapping) => mapping,
            other => {
                return Err(Error::shape(format!(
                    "document must be a mapping, found {}",
                    kind(&other)
                )));
            }
        };

        let mut config = Self::new();
        for (key, value) in mapping {
            let name = key_str(&key, "document")?;
            match Component::from_token(name) {
                Some(component) => {
                    let groups = groups_from_value(value, name)?;
                    *config.declare(component) = groups;
                }
                None => config
                    .globals
                    .insert(GroupName::from(name), GroupBody::from_value(value)),
            }
        }
        Ok(config)
    }

    /// The document tree: components in order, then top-level groups.
    pub fn to_value(&self) -> Value {
        let mut mapping = Mapping::new();
        for (component, groups) in self.components() {
            mapping.insert(
                Value::String(component.as_str().to_string()),
                Value::Mapping(groups.to_mapping()),
            );
        }
        for (name, body) in self.globals.to_mapping() {
            mapping.insert(name, body);
        }
        Value::Mapping(mapping)
    }
}

impl GroupBody {
    /// Null reads as an empty settings group.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => GroupBody::Settings(Settings::new()),
            Value::Mapping(ref mapping) => match Settings::from_mapping(mapping) {
                Some(settings) => GroupBody::Settings(settings),
                None => GroupBody::Opaque(value),
            },
            other => GroupBody::Opaque(other),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            GroupBody::Settings(settings) => Value::Mapping(settings.to_mapping()),
            GroupBody::Opaque(value) => value.clone(),
        }
    }
}

impl Groups {
    fn to_mapping(&self) -> Mapping {
        self.iter()
            .map(|(name, body)| (Value::String(name.to_string()), body.to_value()))
            .collect()
    }
}

fn groups_from_value(value: Value, component: &str) -> Result<Groups> {
    let mapping = match value {
        Value::Null => return Ok(Groups::new()),
        Value::Mapping(mapping) => mapping,
        other => {
            return Err(Error::shape(format!(
                "component `{}` must be a mapping of groups, found {}",
                component,
                kind(&other)
            )));
        }
    };

    let mut groups = Groups::new();
    for (key, value) in mapping {
        let name = key_str(&key, component)?;
        groups.insert(GroupName::from(name), GroupBody::from_value(value));
    }
    Ok(groups)
}

fn key_str<'a>(key: &'a Value, context: &str) -> Result<&'a str> {
    key.as_str().ok_or_else(|| {
        Error::shape(format!("keys in `{}` must be strings, found {}", context, kind(key)))
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

impl Serialize for HubConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for HubConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        HubConfig::from_value(value).map_err(serde::de::Error::custom)
    }
}
