//! Project configuration.
//!
//! Mirrors the project's `config.json`. Every field has a default so a
//! partial file (or `{}`) is a valid configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, TranspileError};

/// File name of the entry-point document, relative to the source root.
pub const DEFAULT_ENTRY_POINT: &str = "index.html";
/// Name the entry-point component is always emitted under.
pub const ENTRY_COMPONENT_NAME: &str = "App";
/// Extension of documents handled by the pipeline.
pub const DOCUMENT_EXTENSION: &str = "html";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranspileConfig {
    pub project_name: String,
    /// Root of the HTML source tree.
    pub src_dir: PathBuf,
    /// Root of the generated React project. Components land in `<dest_dir>/src`.
    pub dest_dir: PathBuf,
    pub entry_point: String,
    /// Extension for generated component files, without the dot.
    pub component_extension: String,
    /// Base name of the generated router entry file.
    pub router_file: String,
    /// Attribute renames merged over the built-in props map.
    pub props_overrides: BTreeMap<String, String>,
    /// Parse every generated component before writing it.
    pub verify_output: bool,
}

impl Default for TranspileConfig {
    fn default() -> Self {
        Self {
            project_name: String::new(),
            src_dir: PathBuf::from("src"),
            dest_dir: PathBuf::from("dist"),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            component_extension: "js".to_string(),
            router_file: "AppRouter".to_string(),
            props_overrides: BTreeMap::new(),
            verify_output: true,
        }
    }
}

impl TranspileConfig {
    pub fn new(src_dir: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            src_dir: src_dir.into(),
            dest_dir: dest_dir.into(),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load `config.json` from disk. Relative `srcDir`/`destDir` values are
    /// resolved against the directory holding the config file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|e| TranspileError::io(path, e))?;
        let mut config = Self::from_json_str(&data)?;

        if let Some(base) = path.parent() {
            if config.src_dir.is_relative() {
                config.src_dir = base.join(&config.src_dir);
            }
            if config.dest_dir.is_relative() {
                config.dest_dir = base.join(&config.dest_dir);
            }
        }

        Ok(config)
    }

    /// Directory the generated components are written into.
    pub fn output_root(&self) -> PathBuf {
        self.dest_dir.join("src")
    }

    pub fn entry_point_path(&self) -> PathBuf {
        self.src_dir.join(&self.entry_point)
    }

    pub fn router_file_name(&self) -> String {
        format!("{}.{}", self.router_file, self.component_extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = TranspileConfig::from_json_str("{}").unwrap();
        assert_eq!(config.src_dir, PathBuf::from("src"));
        assert_eq!(config.dest_dir, PathBuf::from("dist"));
        assert_eq!(config.entry_point, "index.html");
        assert!(config.verify_output);
        assert_eq!(config.router_file_name(), "AppRouter.js");
    }

    #[test]
    fn test_camel_case_keys() {
        let config = TranspileConfig::from_json_str(
            r#"{
                "projectName": "site",
                "srcDir": "pages",
                "destDir": "out",
                "componentExtension": "jsx",
                "propsOverrides": { "itemprop": "itemProp" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.project_name, "site");
        assert_eq!(config.output_root(), PathBuf::from("out/src"));
        assert_eq!(config.entry_point_path(), PathBuf::from("pages/index.html"));
        assert_eq!(config.router_file_name(), "AppRouter.jsx");
        assert_eq!(
            config.props_overrides.get("itemprop"),
            Some(&"itemProp".to_string())
        );
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = TranspileConfig::from_json_str("{ not json").unwrap_err();
        assert_eq!(err.code(), crate::error::ERR_CONFIG);
    }

    #[test]
    fn test_load_resolves_relative_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "projectName": "demo" }"#).unwrap();

        let config = TranspileConfig::load(&path).unwrap();
        assert_eq!(config.src_dir, dir.path().join("src"));
        assert_eq!(config.dest_dir, dir.path().join("dist"));
    }
}
