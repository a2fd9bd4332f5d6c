//! The construction pass: builds a service once its graph has been validated.

use crate::container::Container;
use crate::core::ResolutionGuard;
use crate::error::{Error, Result};
use crate::provider::{Args, Instance, Provider};
use std::sync::Arc;

pub(crate) struct Resolver<'c> {
  container: &'c Container,
}

impl<'c> Resolver<'c> {
  pub(crate) fn new(container: &'c Container) -> Self {
    Self { container }
  }

  /// Builds `name` and stores it in the container's cache.
  ///
  /// The per-name cell serialises concurrent builders and stays empty when the
  /// provider fails, so a later call starts over.
  pub(crate) fn construct(&self, name: &str) -> Result<Instance> {
    let _guard = ResolutionGuard::enter(self.container.id(), name)?;
    let slot = self.container.slot(name);

    slot
      .get_or_try_init(|| {
        let provider = self
          .container
          .registry()
          .provider(name)
          .ok_or_else(|| Error::missing(name))?;
        let args = self.resolve_args(&provider)?;

        tracing::debug!(
          container = self.container.name(),
          service = name,
          args = args.len(),
          "constructing service"
        );
        provider.invoke(name, args)
      })
      .cloned()
  }

  // Registered services take precedence over defaults.
  fn resolve_args(&self, provider: &Provider) -> Result<Args> {
    let params = provider.params();
    let mut keys = Vec::with_capacity(params.len());
    let mut values = Vec::with_capacity(params.len());

    for param in params {
      let key = param.key();
      let value = if self.container.is_registered(&key) {
        self.container.get(&key)?
      } else if let Some(default) = param.default_value() {
        Arc::clone(default)
      } else {
        return Err(Error::MissingDependency {
          name: key,
          parameter: Some(param.name().to_owned()),
        });
      };
      keys.push(key);
      values.push(value);
    }

    Ok(Args::new(keys, values))
  }
}
