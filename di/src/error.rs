use thiserror::Error;

/// The error family for every container operation.
#[derive(Debug, Error)]
pub enum Error {
  #[error("Cannot register service '{name}': {reason}")]
  Registration { name: String, reason: String },

  #[error("{}", missing_message(.name, .parameter.as_deref()))]
  MissingDependency {
    name: String,
    /// The constructor parameter that asked for `name`, when there was one.
    parameter: Option<String>,
  },

  #[error("Service '{name}' has a cyclic dependency: {}", .chain.join(" -> "))]
  CyclicDependency { name: String, chain: Vec<String> },

  #[error("Service '{name}' is not of the requested type {expected}")]
  TypeMismatch { name: String, expected: &'static str },

  #[error("Argument index {index} is out of range for a provider with {len} parameter(s)")]
  ArgumentIndex { index: usize, len: usize },

  #[error("Provider for service '{name}' failed: {source}")]
  Provider {
    name: String,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },

  #[error("Failed to read configuration file: {0}")]
  ConfigRead(#[from] std::io::Error),

  #[error("Failed to parse configuration: {0}")]
  ConfigParse(String),
}

fn missing_message(name: &str, parameter: Option<&str>) -> String {
  match parameter {
    Some(param) => format!(
      "Service '{}' is not registered and argument '{}' has no default value",
      name, param
    ),
    None => format!("Service '{}' is not registered", name),
  }
}

impl Error {
  pub(crate) fn duplicate(name: &str) -> Self {
    Error::Registration {
      name: name.to_owned(),
      reason: "a service with this name is already registered".to_owned(),
    }
  }

  pub(crate) fn missing(name: &str) -> Self {
    Error::MissingDependency {
      name: name.to_owned(),
      parameter: None,
    }
  }

  pub fn is_registration(&self) -> bool {
    matches!(self, Error::Registration { .. })
  }

  pub fn is_missing(&self) -> bool {
    matches!(self, Error::MissingDependency { .. })
  }

  pub fn is_cyclic(&self) -> bool {
    matches!(self, Error::CyclicDependency { .. })
  }
}

/// A specialized `Result` type for `fibre_di` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
