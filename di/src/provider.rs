//! Providers: the factories a container calls to build services, together with
//! the parameter descriptors that tell the container what to pass them.

use crate::error::{Error, Result};
use crate::naming::to_service_name;
use std::any::{type_name, Any};
use std::fmt;
use std::sync::Arc;

/// A type-erased, shared service instance.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// What a provider's factory may return. Any error type converts into it, and
/// errors raised by the container itself pass through unchanged.
pub type FactoryResult<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

type Factory = Box<dyn Fn(Args) -> FactoryResult<Instance> + Send + Sync>;

/// Describes one positional parameter of a provider.
///
/// The service a parameter asks for is its annotation when one is set, and
/// otherwise the parameter name run through [`to_service_name`]. A parameter
/// with a default is optional.
#[derive(Clone)]
pub struct Param {
  name: String,
  annotation: Option<String>,
  default: Option<Instance>,
}

impl Param {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      annotation: None,
      default: None,
    }
  }

  /// Names the service explicitly instead of deriving it from the parameter name.
  pub fn annotated(mut self, service: impl Into<String>) -> Self {
    self.annotation = Some(service.into());
    self
  }

  pub fn with_default<T: Any + Send + Sync>(mut self, value: T) -> Self {
    self.default = Some(Arc::new(value));
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn annotation(&self) -> Option<&str> {
    self.annotation.as_deref()
  }

  /// The service name this parameter resolves to.
  pub fn key(&self) -> String {
    match &self.annotation {
      Some(service) => service.clone(),
      None => to_service_name(&self.name),
    }
  }

  pub fn default_value(&self) -> Option<&Instance> {
    self.default.as_ref()
  }

  pub fn is_required(&self) -> bool {
    self.default.is_none()
  }
}

impl fmt::Debug for Param {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Param")
      .field("name", &self.name)
      .field("annotation", &self.annotation)
      .field("has_default", &self.default.is_some())
      .finish()
  }
}

/// The shape of a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderKind {
  /// A constructor for a named type. Only these can be passed to `register_class`.
  Class { name: String },
  /// A free-standing factory function.
  Function,
  /// An already-built value.
  Instance,
}

/// A service factory together with its parameter list.
pub struct Provider {
  kind: ProviderKind,
  params: Vec<Param>,
  factory: Factory,
}

impl Provider {
  /// A factory function taking the resolved `params` positionally.
  pub fn function<T, F>(params: Vec<Param>, factory: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn(Args) -> FactoryResult<T> + Send + Sync + 'static,
  {
    Self {
      kind: ProviderKind::Function,
      params,
      factory: Box::new(move |args| factory(args).map(|value| Arc::new(value) as Instance)),
    }
  }

  /// A constructor for `T`, registered under `T`'s short type name.
  pub fn constructor<T, F>(params: Vec<Param>, factory: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn(Args) -> FactoryResult<T> + Send + Sync + 'static,
  {
    Self {
      kind: ProviderKind::Class {
        name: short_type_name::<T>().to_owned(),
      },
      ..Self::function(params, factory)
    }
  }

  /// The constructor declared by `T`'s [`Injectable`] implementation.
  pub fn class<T: Injectable>() -> Self {
    Self {
      kind: ProviderKind::Class {
        name: T::service_name(),
      },
      ..Self::function(T::parameters(), T::construct)
    }
  }

  /// Wraps a value that is already built.
  pub fn instance<T: Any + Send + Sync>(value: T) -> Self {
    let instance: Instance = Arc::new(value);
    Self {
      kind: ProviderKind::Instance,
      params: Vec::new(),
      factory: Box::new(move |_| Ok(Arc::clone(&instance))),
    }
  }

  pub fn kind(&self) -> &ProviderKind {
    &self.kind
  }

  /// The registration name of a class-like provider.
  pub fn class_name(&self) -> Option<&str> {
    match &self.kind {
      ProviderKind::Class { name } => Some(name),
      _ => None,
    }
  }

  pub fn params(&self) -> &[Param] {
    &self.params
  }

  /// Service names of the required parameters, in declaration order.
  pub fn dependencies(&self) -> Vec<String> {
    self
      .params
      .iter()
      .filter(|param| param.is_required())
      .map(Param::key)
      .collect()
  }

  pub(crate) fn invoke(&self, service: &str, args: Args) -> Result<Instance> {
    (self.factory)(args).map_err(|source| match source.downcast::<Error>() {
      Ok(inner) => *inner,
      Err(source) => Error::Provider {
        name: service.to_owned(),
        source,
      },
    })
  }
}

impl fmt::Debug for Provider {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Provider")
      .field("kind", &self.kind)
      .field("params", &self.params)
      .finish_non_exhaustive()
  }
}

/// A type the container knows how to construct.
///
/// ```
/// use fibre_di::{params, Args, Container, FactoryResult, Injectable, Param};
///
/// struct Clock;
/// impl Injectable for Clock {
///   fn construct(_: Args) -> FactoryResult<Self> {
///     Ok(Clock)
///   }
/// }
///
/// struct Scheduler {
///   clock: std::sync::Arc<Clock>,
/// }
/// impl Injectable for Scheduler {
///   fn parameters() -> Vec<Param> {
///     params![clock]
///   }
///   fn construct(args: Args) -> FactoryResult<Self> {
///     Ok(Scheduler { clock: args.arg(0)? })
///   }
/// }
///
/// let container = Container::new();
/// container.register_type::<Clock>().unwrap();
/// container.register_type::<Scheduler>().unwrap();
/// let scheduler = container.resolve::<Scheduler>().unwrap();
/// assert!(std::sync::Arc::ptr_eq(&scheduler.clock, &container.resolve::<Clock>().unwrap()));
/// ```
pub trait Injectable: Any + Send + Sync + Sized {
  /// Defaults to the type name without its module path.
  fn service_name() -> String {
    short_type_name::<Self>().to_owned()
  }

  fn parameters() -> Vec<Param> {
    Vec::new()
  }

  fn construct(args: Args) -> FactoryResult<Self>;
}

/// Resolved arguments, handed to a factory in parameter order.
pub struct Args {
  keys: Vec<String>,
  values: Vec<Instance>,
  cursor: usize,
}

impl Args {
  pub(crate) fn new(keys: Vec<String>, values: Vec<Instance>) -> Self {
    Self {
      keys,
      values,
      cursor: 0,
    }
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// The argument at `index`, downcast to `T`.
  pub fn arg<T: Any + Send + Sync>(&self, index: usize) -> Result<Arc<T>> {
    let value = self.values.get(index).ok_or(Error::ArgumentIndex {
      index,
      len: self.values.len(),
    })?;
    Arc::clone(value)
      .downcast::<T>()
      .map_err(|_| Error::TypeMismatch {
        name: self.keys.get(index).cloned().unwrap_or_default(),
        expected: type_name::<T>(),
      })
  }

  /// The argument after the one returned by the previous call.
  pub fn next_arg<T: Any + Send + Sync>(&mut self) -> Result<Arc<T>> {
    let value = self.arg(self.cursor)?;
    self.cursor += 1;
    Ok(value)
  }

  /// The argument at `index` without a downcast.
  pub fn raw(&self, index: usize) -> Option<&Instance> {
    self.values.get(index)
  }
}

pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
  let full = type_name::<T>();
  let base = full.split('<').next().unwrap_or(full);
  base.rsplit("::").next().unwrap_or(base)
}
