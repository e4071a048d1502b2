//! Ordered leaf settings of a single group

use serde_yaml::{Mapping, Value};

/// Leaf key to optional value, kept in insertion order.
///
/// A `None` value is a key that was declared (or explicitly nulled) without a
/// value. Absent keys are simply not present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    entries: Vec<(String, Option<String>)>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Non-null value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entry(key).flatten()
    }

    /// `None` when absent, `Some(None)` when present but null.
    pub fn entry(&self, key: &str) -> Option<Option<&str>> {
        self.position(key)
            .map(|index| self.entries[index].1.as_deref())
    }

    /// Set `key`, returning the previous entry if there was one.
    ///
    /// Existing keys keep their position.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) -> Option<Option<String>> {
        let key = key.into();
        match self.position(&key) {
            Some(index) => Some(std::mem::replace(&mut self.entries[index].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Option<String>)> {
        self.entries
            .iter_mut()
            .map(|(key, value)| (key.as_str(), value))
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// Read a mapping of scalars. Returns `None` if any key is not a string
    /// or any value is not a scalar or null.
    pub(crate) fn from_mapping(mapping: &Mapping) -> Option<Self> {
        let mut settings = Settings::new();
        for (key, value) in mapping {
            let key = key.as_str()?;
            settings.insert(key, scalar_to_string(value)?);
        }
        Some(settings)
    }

    pub(crate) fn to_mapping(&self) -> Mapping {
        self.entries
            .iter()
            .map(|(key, value)| {
                let value = value.clone().map(Value::String).unwrap_or(Value::Null);
                (Value::String(key.clone()), value)
            })
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for Settings {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        let mut settings = Settings::new();
        for (key, value) in iter {
            settings.insert(key, value);
        }
        settings
    }
}

/// `Some(None)` for null, `Some(Some(text))` for scalars, `None` otherwise.
fn scalar_to_string(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::String(s) => Some(Some(s.clone())),
        Value::Number(n) => Some(Some(n.to_string())),
        Value::Bool(b) => Some(Some(b.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_position() {
        let mut settings = Settings::new();
        settings.insert("b", Some("1".into()));
        settings.insert("a", Some("2".into()));
        let previous = settings.insert("b", Some("3".into()));

        assert_eq!(previous, Some(Some("1".to_string())));
        let keys: Vec<_> = settings.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(settings.get("b"), Some("3"));
    }

    #[test]
    fn test_null_entry_is_present_but_has_no_value() {
        let settings: Settings = [("root_pw", None)].into_iter().collect();
        assert!(settings.contains_key("root_pw"));
        assert_eq!(settings.entry("root_pw"), Some(None));
        assert_eq!(settings.get("root_pw"), None);
        assert_eq!(settings.entry("missing"), None);
    }

    #[test]
    fn test_from_mapping_normalises_scalars() {
        let mapping: Mapping = serde_yaml::from_str("port: 8080\ntls: true\nname: hub\nmissing: ~\n").unwrap();
        let settings = Settings::from_mapping(&mapping).unwrap();

        assert_eq!(settings.get("port"), Some("8080"));
        assert_eq!(settings.get("tls"), Some("true"));
        assert_eq!(settings.get("name"), Some("hub"));
        assert_eq!(settings.entry("missing"), Some(None));
    }

    #[test]
    fn test_from_mapping_rejects_nested_values() {
        let mapping: Mapping = serde_yaml::from_str("inner:\n  a: 1\n").unwrap();
        assert!(Settings::from_mapping(&mapping).is_none());
    }
}
