//! Conventions for type identifiers produced by the metadata extractor.
//!
//! Names are fully qualified with `.` between namespace segments and `+`
//! between an outer type and its nested types. Arrays, pointers and
//! by-reference types keep their element name with a trailing `[]`, `*` or
//! `&` marker.

const FRAMEWORK_PREFIXES: [&str; 2] = ["System", "Microsoft"];

const SUFFIX_MARKERS: [&str; 3] = ["[]", "*", "&"];

/// Strips trailing array, pointer and by-reference markers.
///
/// ```
/// use typedeps::source::element_name;
///
/// assert_eq!(element_name("App.Entity[][]"), "App.Entity");
/// assert_eq!(element_name("App.Buffer*&"), "App.Buffer");
/// ```
pub fn element_name(name: &str) -> &str {
    let mut current = name;
    while let Some(stripped) = SUFFIX_MARKERS
        .iter()
        .find_map(|marker| current.strip_suffix(marker))
    {
        current = stripped;
    }
    current
}

/// Returns the namespace of a type name, or `""` for the global namespace.
///
/// Nested types report the namespace of their outermost type.
pub fn namespace_of(name: &str) -> &str {
    let element = element_name(name);
    let outer = element.split('+').next().unwrap_or(element);
    outer.rsplit_once('.').map_or("", |(namespace, _)| namespace)
}

/// Returns true if the type belongs to a framework namespace.
///
/// ```
/// use typedeps::source::is_framework_type;
///
/// assert!(is_framework_type("System.Collections.Generic.List`1"));
/// assert!(is_framework_type("Microsoft.Extensions.Logging.ILogger[]"));
/// assert!(!is_framework_type("App.SystemMonitor"));
/// ```
pub fn is_framework_type(name: &str) -> bool {
    let namespace = namespace_of(name);
    FRAMEWORK_PREFIXES.iter().any(|prefix| {
        namespace.starts_with(prefix) || name.starts_with(&format!("{}.", prefix))
    })
}
