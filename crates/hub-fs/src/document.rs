//! Format-agnostic loading and saving of the hub document

use std::fmt;
use std::path::Path;

use hub_core::HubConfig;

use crate::{Error, Result, io};

/// Serialization format of a document file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        match extension.to_lowercase().as_str() {
            "toml" => Ok(DocumentFormat::Toml),
            "json" => Ok(DocumentFormat::Json),
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    /// Parse text into the document tree.
    pub fn parse(&self, content: &str) -> std::result::Result<serde_yaml::Value, String> {
        match self {
            DocumentFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            DocumentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }

    /// Render a document. TOML cannot hold null leaves.
    pub fn render(&self, config: &HubConfig) -> std::result::Result<String, String> {
        match self {
            DocumentFormat::Toml => toml::to_string_pretty(config).map_err(|e| e.to_string()),
            DocumentFormat::Json => serde_json::to_string_pretty(config).map_err(|e| e.to_string()),
            DocumentFormat::Yaml => serde_yaml::to_string(config).map_err(|e| e.to_string()),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Toml => write!(f, "TOML"),
            DocumentFormat::Json => write!(f, "JSON"),
            DocumentFormat::Yaml => write!(f, "YAML"),
        }
    }
}

/// Loads and saves [`HubConfig`] documents.
///
/// Format is detected from the file extension:
/// - `.toml` -> TOML
/// - `.json` -> JSON
/// - `.yaml`, `.yml` -> YAML
#[derive(Debug, Default)]
pub struct DocumentStore;

impl DocumentStore {
    pub fn new() -> Self {
        Self
    }

    pub fn load(&self, path: &Path) -> Result<HubConfig> {
        let format = DocumentFormat::from_path(path)?;
        let content = io::read_text(path)?;
        let value = format.parse(&content).map_err(|message| Error::ConfigParse {
            path: path.to_path_buf(),
            format: format.to_string(),
            message,
        })?;

        let config = HubConfig::from_value(value)?;
        tracing::debug!(path = %path.display(), %format, "Loaded hub document");
        Ok(config)
    }

    /// Render `config` in the format `path` would be saved in.
    pub fn render(&self, path: &Path, config: &HubConfig) -> Result<String> {
        let format = DocumentFormat::from_path(path)?;
        format.render(config).map_err(|message| Error::ConfigSerialize {
            path: path.to_path_buf(),
            format: format.to_string(),
            message,
        })
    }

    /// Save atomically in the format named by the extension.
    pub fn save(&self, path: &Path, config: &HubConfig) -> Result<()> {
        let content = self.render(path, config)?;
        io::write_text(path, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_core::EnvAddress;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    #[rstest]
    #[case("hub.toml", DocumentFormat::Toml)]
    #[case("hub.JSON", DocumentFormat::Json)]
    #[case("hub.yml", DocumentFormat::Yaml)]
    #[case("hub.yaml", DocumentFormat::Yaml)]
    fn test_format_from_extension(#[case] name: &str, #[case] expected: DocumentFormat) {
        assert_eq!(DocumentFormat::from_path(Path::new(name)).unwrap(), expected);
    }

    #[test]
    fn test_unknown_extension() {
        let err = DocumentFormat::from_path(Path::new("hub.ini")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_load_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("hub.toml");
        fs::write(&path, "[exchange.net]\nport = 3090\n\n[hzn.config]\norg_id = \"myorg\"\n").unwrap();

        let config = DocumentStore::new().load(&path).unwrap();

        assert_eq!(config.get(&EnvAddress::classify("EXCHANGE_PORT")), Some("3090"));
        assert_eq!(config.get(&EnvAddress::classify("HZN_ORG_ID")), Some("myorg"));
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("hub.json");
        fs::write(&path, "{not json").unwrap();

        let err = DocumentStore::new().load(&path).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn test_load_reports_shape_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("hub.yaml");
        fs::write(&path, "exchange: 5\n").unwrap();

        let err = DocumentStore::new().load(&path).unwrap_err();
        assert!(matches!(err, Error::Core(hub_core::Error::ConfigShape { .. })));
    }

    #[test]
    fn test_render_does_not_touch_disk() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.json");
        let config: HubConfig = serde_yaml::from_str("hzn:\n  config:\n    org_id: myorg\n").unwrap();

        let text = DocumentStore::new().render(&path, &config).unwrap();

        assert!(text.contains("\"org_id\": \"myorg\""));
        assert!(!path.exists());
    }

    #[test]
    fn test_save_and_reload_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.yaml");
        let config: HubConfig =
            serde_yaml::from_str("exchange:\n  secrets:\n    root_pw: ~\n").unwrap();

        let store = DocumentStore::new();
        store.save(&path, &config).unwrap();

        assert_eq!(store.load(&path).unwrap(), config);
    }
}
