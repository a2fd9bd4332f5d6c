//! Container configuration, loadable from YAML or JSON.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// When a container checks its dependency graph.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
  /// Check only the subgraph reachable from a service when it is first built.
  /// A cycle among services nobody asks for is never reported.
  #[default]
  Lazy,
  /// Check every registered service whenever a new service is built.
  Eager,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ContainerConfig {
  /// Label attached to the container's log events.
  #[serde(default = "default_name")]
  pub name: String,
  #[serde(default)]
  pub validation: ValidationMode,
}

fn default_name() -> String {
  "default".to_string()
}

impl Default for ContainerConfig {
  fn default() -> Self {
    Self {
      name: default_name(),
      validation: ValidationMode::default(),
    }
  }
}

impl ContainerConfig {
  pub fn from_yaml_str(source: &str) -> Result<Self> {
    serde_yaml::from_str(source).map_err(|e| Error::ConfigParse(e.to_string()))
  }

  pub fn from_json_str(source: &str) -> Result<Self> {
    serde_json::from_str(source).map_err(|e| Error::ConfigParse(e.to_string()))
  }

  /// Reads `path` as JSON when it has a `.json` extension and as YAML otherwise.
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let is_json = path
      .extension()
      .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
      Self::from_json_str(&contents)
    } else {
      Self::from_yaml_str(&contents)
    }
  }
}
