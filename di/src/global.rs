//! The global container instance and access functions.

use crate::container::Container;
use once_cell::sync::Lazy;

// Created on first access in a thread-safe manner.
static GLOBAL_CONTAINER: Lazy<Container> = Lazy::new(Container::default);

/// Provides a reference to the process-wide default container.
///
/// Nothing in the crate depends on it; code that wants isolation (tests in
/// particular) can create its own [`Container`] instead.
///
/// # Examples
///
/// ```
/// use fibre_di::global;
///
/// global()
///   .register_instance("Greeting", String::from("Hello from global!"))
///   .unwrap();
/// assert!(global().is_registered("Greeting"));
/// ```
pub fn global() -> &'static Container {
  &GLOBAL_CONTAINER
}
