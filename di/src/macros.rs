//! Public macros for declaring parameters and resolving services.

/// Builds a `Vec<Param>` from a compact parameter list.
///
/// Each entry is a parameter name, optionally followed by `: "Service"` to
/// annotate the service it asks for and by `= value` to give it a default.
///
/// ```
/// use fibre_di::params;
///
/// let params = params![dep_one, dep_two: "SecondDependency", retries = 3_u32];
/// assert_eq!(params[0].key(), "DepOne");
/// assert_eq!(params[1].key(), "SecondDependency");
/// assert!(!params[2].is_required());
/// ```
#[macro_export]
macro_rules! params {
  () => {
    ::std::vec::Vec::<$crate::Param>::new()
  };
  ($($name:ident $(: $service:literal)? $(= $default:expr)?),+ $(,)?) => {
    ::std::vec![
      $(
        $crate::Param::new(::std::stringify!($name))
          $(.annotated($service))?
          $(.with_default($default))?
      ),+
    ]
  };
}

/// Resolves a service from the global container.
///
/// It panics if the service cannot be resolved, ensuring that required
/// dependencies are present at runtime. For a non-panicking version, use
/// `global().get_as(...)` directly.
///
/// - `resolve!(Type)` resolves an [`Injectable`](crate::Injectable) type under its own name.
/// - `resolve!(Type, "Name")` resolves the service `"Name"` and downcasts it to `Type`.
///
/// ```
/// use fibre_di::{global, resolve};
///
/// global().register_instance("Motd", String::from("hello")).unwrap();
/// let message = resolve!(String, "Motd");
/// assert_eq!(*message, "hello");
/// ```
#[macro_export]
macro_rules! resolve {
  ($type:ty) => {
    $crate::global()
      .resolve::<$type>()
      .unwrap_or_else(|e| {
        panic!(
          "Failed to resolve required service {}: {}",
          ::std::any::type_name::<$type>(),
          e
        )
      })
  };

  ($type:ty, $name:expr) => {
    $crate::global()
      .get_as::<$type>($name)
      .unwrap_or_else(|e| {
        panic!(
          "Failed to resolve required service '{}' as {}: {}",
          $name,
          ::std::any::type_name::<$type>(),
          e
        )
      })
  };
}
