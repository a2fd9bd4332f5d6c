//! Derivation of service names from parameter names.

/// Converts a parameter name into the service name it refers to by default.
///
/// The name is split on `_`, the first character of every token is upper-cased
/// and the tokens are joined back together. The rest of each token is left
/// untouched, so camel case survives the conversion.
///
/// ```
/// use fibre_di::to_service_name;
///
/// assert_eq!(to_service_name("long_underscore_case"), "LongUnderscoreCase");
/// assert_eq!(to_service_name("camelCase"), "CamelCase");
/// ```
pub fn to_service_name(param_name: &str) -> String {
  let mut service_name = String::with_capacity(param_name.len());
  for token in param_name.split('_') {
    let mut chars = token.chars();
    if let Some(first) = chars.next() {
      service_name.extend(first.to_uppercase());
      service_name.push_str(chars.as_str());
    }
  }
  service_name
}
