//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON layout files
//! - Validate layout legality
//! - Generate `StreamLayout`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let layout = ConfigLoader::load_from_path(Path::new("layout.toml")).unwrap();
//! println!("Routes: {}", layout.routes.len());
//! ```

mod parser;
mod validator;

pub use contracts::StreamLayout;
pub use parser::ConfigFormat;

use contracts::DemuxError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<StreamLayout, DemuxError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<StreamLayout, DemuxError> {
        Self::parse_and_validate(content, format)
    }

    /// Validate an already constructed layout (e.g. a preset with overrides)
    pub fn validate(layout: &StreamLayout) -> Result<(), DemuxError> {
        validator::validate(layout)
    }

    /// Serialize StreamLayout to TOML string
    pub fn to_toml(layout: &StreamLayout) -> Result<String, DemuxError> {
        toml::to_string_pretty(layout)
            .map_err(|e| DemuxError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize StreamLayout to JSON string
    pub fn to_json(layout: &StreamLayout) -> Result<String, DemuxError> {
        serde_json::to_string_pretty(layout)
            .map_err(|e| DemuxError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, DemuxError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            DemuxError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            DemuxError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, DemuxError> {
        std::fs::read_to_string(path).map_err(|e| DemuxError::ConfigParse {
            message: format!("cannot read {}: {e}", path.display()),
            source: Some(Box::new(e)),
        })
    }

    /// Parse and validate configuration content
    fn parse_and_validate(content: &str, format: ConfigFormat) -> Result<StreamLayout, DemuxError> {
        let layout = parser::parse(content, format)?;
        validator::validate(&layout)?;
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_TOML: &str = r#"
[stream]
terminal_kind = 3
checkpoint_kind = 1
staging_capacity = 1024

[[routes]]
kind = 0
discipline = "discard"

[[routes]]
kind = 1
target = "metaData.json"
discipline = "overwrite"

[[routes]]
kind = 2
target = "recording.tmcpr"
discipline = "append"

[[routes]]
kind = 3
target = "end_of_stream.txt"
discipline = "append"
"#;

    #[test]
    fn test_load_from_str_toml() {
        let result = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let layout = result.unwrap();
        assert_eq!(layout.stream.terminal_kind, 3);
        assert_eq!(layout.to_route_table().unwrap().route_count(), 4);
    }

    #[test]
    fn test_round_trip_toml() {
        let layout = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let serialized = ConfigLoader::to_toml(&layout).unwrap();
        let layout2 = ConfigLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(layout.routes.len(), layout2.routes.len());
        assert_eq!(layout.stream.staging_capacity, layout2.stream.staging_capacity);
        assert_eq!(layout.routes[2].target, layout2.routes[2].target);
    }

    #[test]
    fn test_round_trip_json() {
        let layout = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&layout).unwrap();
        let layout2 = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(layout.stream.checkpoint_kind, layout2.stream.checkpoint_kind);
    }

    #[test]
    fn test_preset_serializes_and_reloads() {
        let toml = ConfigLoader::to_toml(&StreamLayout::pipeline()).unwrap();
        let layout = ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap();
        assert_eq!(layout.routes.len(), 15);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        // terminal marker on the discard route must fail validation
        let content = MINIMAL_TOML.replace("terminal_kind = 3", "terminal_kind = 0");
        let result = ConfigLoader::load_from_str(&content, ConfigFormat::Toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("discard"));
    }

    #[test]
    fn test_load_from_path_detects_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layout.toml");
        std::fs::write(&path, MINIMAL_TOML).unwrap();
        let layout = ConfigLoader::load_from_path(&path).unwrap();
        assert_eq!(layout.routes.len(), 4);

        let bad = dir.path().join("layout.yaml");
        std::fs::write(&bad, MINIMAL_TOML).unwrap();
        let err = ConfigLoader::load_from_path(&bad).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }
}
