//! The main `Container` struct and its associated methods.

use crate::config::{ContainerConfig, ValidationMode};
use crate::core::ContainerId;
use crate::error::{Error, Result};
use crate::graph::{self, NodeTable, Validation};
use crate::provider::{Injectable, Instance, Provider, ProviderKind};
use crate::registry::Registry;
use crate::resolver::Resolver;
use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::any::{type_name, Any};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// The dependency injection container.
///
/// Services are registered once under a unique name and built on first
/// request. Each service is built at most once per container and the same
/// instance is handed out from then on. Before a service is first built, the
/// dependency graph below it is checked for missing and cyclic dependencies.
///
/// The container is thread-safe, and independent containers share nothing.
pub struct Container {
  id: ContainerId,
  config: ContainerConfig,
  registry: Registry,
  instances: DashMap<String, Arc<OnceCell<Instance>>>,
  // Registry generation last checked as a whole in eager mode.
  checked_generation: AtomicUsize,
}

impl Default for Container {
  fn default() -> Self {
    Self::with_config(ContainerConfig::default())
  }
}

impl Container {
  /// Creates a new, empty `Container`.
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_config(config: ContainerConfig) -> Self {
    Self {
      id: ContainerId::next(),
      config,
      registry: Registry::default(),
      instances: DashMap::new(),
      checked_generation: AtomicUsize::new(usize::MAX),
    }
  }

  pub fn config(&self) -> &ContainerConfig {
    &self.config
  }

  // --- Registration ---

  /// Registers `provider` under `name`.
  ///
  /// Fails if `name` is empty or already taken; the existing registration is
  /// left untouched.
  pub fn register(&self, name: &str, provider: Provider) -> Result<()> {
    let node = self.registry.insert(name, provider)?;
    tracing::debug!(
      container = self.name(),
      service = name,
      dependencies = ?node.dependencies(),
      "registered service"
    );
    Ok(())
  }

  /// Registers a class-like provider under its own class name.
  pub fn register_class(&self, provider: Provider) -> Result<()> {
    let Some(name) = provider.class_name().map(str::to_owned) else {
      let kind = match provider.kind() {
        ProviderKind::Instance => "instance",
        _ => "function",
      };
      return Err(Error::Registration {
        name: format!("<unnamed {}>", kind),
        reason: "only class providers can be registered without a name".to_owned(),
      });
    };
    self.register(&name, provider)
  }

  pub fn register_type<T: Injectable>(&self) -> Result<()> {
    self.register_class(Provider::class::<T>())
  }

  /// Registers a value that is already built.
  pub fn register_instance<T: Any + Send + Sync>(&self, name: &str, value: T) -> Result<()> {
    self.register(name, Provider::instance(value))
  }

  // --- Lookup ---

  pub fn is_registered(&self, name: &str) -> bool {
    self.registry.contains(name)
  }

  /// Registered service names, sorted.
  pub fn registered_names(&self) -> Vec<String> {
    self.registry.names()
  }

  /// The required dependencies declared by `name`.
  pub fn dependencies_of(&self, name: &str) -> Option<Vec<String>> {
    self
      .registry
      .node(name)
      .map(|node| node.dependencies().to_vec())
  }

  pub fn validation_of(&self, name: &str) -> Option<Validation> {
    self.registry.node(name).map(|node| node.validation())
  }

  pub fn len(&self) -> usize {
    self.registry.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  // --- Resolution ---

  /// Resolves a service, building it and its dependencies on first use.
  pub fn get(&self, name: &str) -> Result<Instance> {
    if let Some(instance) = self.cached(name) {
      tracing::trace!(container = self.name(), service = name, "cache hit");
      return Ok(instance);
    }

    let node = self.registry.node(name).ok_or_else(|| Error::missing(name))?;
    let checked = match self.config.validation {
      ValidationMode::Lazy => graph::check_graph(&self.registry, &node),
      ValidationMode::Eager => self.check_registry(),
    };
    if let Err(e) = checked {
      tracing::warn!(container = self.name(), service = name, error = %e, "dependency graph check failed");
      return Err(e);
    }

    Resolver::new(self).construct(name)
  }

  /// Resolves a service and downcasts it to `T`.
  pub fn get_as<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
    self
      .get(name)?
      .downcast::<T>()
      .map_err(|_| Error::TypeMismatch {
        name: name.to_owned(),
        expected: type_name::<T>(),
      })
  }

  /// Resolves `T` under its [`Injectable::service_name`].
  pub fn resolve<T: Injectable>(&self) -> Result<Arc<T>> {
    self.get_as::<T>(&T::service_name())
  }

  /// Checks the whole registry at once, including services nobody has asked for.
  pub fn validate(&self) -> Result<()> {
    graph::check_all(&self.registry, self.registry.names())
  }

  // --- PRIVATE HELPERS ---

  pub(crate) fn id(&self) -> ContainerId {
    self.id
  }

  pub(crate) fn name(&self) -> &str {
    &self.config.name
  }

  pub(crate) fn registry(&self) -> &Registry {
    &self.registry
  }

  pub(crate) fn slot(&self, name: &str) -> Arc<OnceCell<Instance>> {
    Arc::clone(&self.instances.entry(name.to_owned()).or_default())
  }

  // Skips the walk while nothing was registered since the last passing check.
  fn check_registry(&self) -> Result<()> {
    let generation = self.registry.generation();
    if self.checked_generation.load(Ordering::Acquire) == generation {
      return Ok(());
    }
    self.validate()?;
    self.checked_generation.store(generation, Ordering::Release);
    Ok(())
  }

  fn cached(&self, name: &str) -> Option<Instance> {
    self
      .instances
      .get(name)
      .and_then(|cell| cell.get().cloned())
  }
}
