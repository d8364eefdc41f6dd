use crate::error::{CliError, Result};
use crate::utils::parser;
use comref::core::models::IndexGroup;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// A vector written either as `[x, y, z]` or as a string such as `"x y z"`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum FileVector {
    Components([f64; 3]),
    Text(String),
}

impl FileVector {
    pub fn resolve(&self) -> Result<[f64; 3]> {
        match self {
            FileVector::Components(values) => Ok(*values),
            FileVector::Text(text) => {
                parser::parse_vec3(text).map_err(|e| CliError::Config(e.to_string()))
            }
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileSystemConfig {
    pub masses: Vec<f64>,
    #[serde(rename = "box")]
    pub box_size: Option<FileVector>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileGroup {
    pub name: String,
    pub indices: Vec<usize>,
}

impl From<FileGroup> for IndexGroup {
    fn from(g: FileGroup) -> Self {
        IndexGroup {
            name: g.name,
            indices: g.indices,
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileCylinderConfig {
    #[serde(rename = "core-radius")]
    pub core_radius: Option<f64>,
    pub cutoff: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FilePullConfig {
    #[serde(rename = "history-depth")]
    pub history_depth: Option<usize>,
    #[serde(rename = "pulled-dims")]
    pub pulled_dims: Option<[bool; 3]>,
    pub cylinder: Option<FileCylinderConfig>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub system: Option<FileSystemConfig>,
    pub reference: Option<FileGroup>,
    #[serde(rename = "pull-group", default)]
    pub pull_groups: Vec<FileGroup>,
    pub pull: Option<FilePullConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_is_parsed() {
        let config = FileConfig::from_toml(
            r#"
            [system]
            masses = [12.0, 12.0, 1.0]
            box = [10.0, 10.0, 12.0]

            [reference]
            name = "membrane"
            indices = [0, 1]

            [[pull-group]]
            name = "peptide"
            indices = [2]

            [pull]
            history-depth = 5
            pulled-dims = [false, false, true]

            [pull.cylinder]
            core-radius = 1.0
            cutoff = 1.5
            "#,
        )
        .unwrap();

        let system = config.system.unwrap();
        assert_eq!(system.masses, vec![12.0, 12.0, 1.0]);
        assert_eq!(
            system.box_size,
            Some(FileVector::Components([10.0, 10.0, 12.0]))
        );
        assert_eq!(config.reference.unwrap().indices, vec![0, 1]);
        assert_eq!(config.pull_groups.len(), 1);
        let pull = config.pull.unwrap();
        assert_eq!(pull.history_depth, Some(5));
        assert_eq!(pull.pulled_dims, Some([false, false, true]));
        assert_eq!(pull.cylinder.unwrap().cutoff, Some(1.5));
    }

    #[test]
    fn box_may_be_written_as_a_string() {
        let config = FileConfig::from_toml(
            r#"
            [system]
            masses = [1.0]
            box = "7.5 7.5 9.0"
            "#,
        )
        .unwrap();
        let box_size = config.system.unwrap().box_size.unwrap();
        assert_eq!(box_size.resolve().unwrap(), [7.5, 7.5, 9.0]);
    }

    #[test]
    fn malformed_box_string_is_a_config_error() {
        let vector = FileVector::Text("7.5 7.5".to_string());
        assert!(matches!(vector.resolve(), Err(CliError::Config(_))));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = FileConfig::from_toml(
            r#"
            [pull]
            history-depth = 2
            smoothing = true
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = FileConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }

    #[test]
    fn invalid_toml_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[pull\nhistory-depth = ").unwrap();

        let result = FileConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { path: p, .. }) if p == path));
    }
}
