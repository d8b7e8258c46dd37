//! Route path resolution.
//!
//! # Responsibilities
//! - Derive `/<name>/` from a handler's statically supplied name
//! - Accept an explicit path verbatim
//! - Join paths against the configured base path
//!
//! # Design Decisions
//! - Names are case-preserving
//! - Joining collapses duplicate slashes and keeps the last element's trailing slash

use crate::routing::registry::RegistryError;

/// Prefix every base path is joined with.
pub const DEFAULT_BASE_PATH: &str = "/";

/// Join two paths, collapsing empty segments.
///
/// The result always starts with `/` and ends with `/` when the last non-empty
/// input does.
pub fn join(base: &str, path: &str) -> String {
    let mut joined = String::from("/");
    for segment in base.split('/').chain(path.split('/')).filter(|s| !s.is_empty()) {
        if !joined.ends_with('/') {
            joined.push('/');
        }
        joined.push_str(segment);
    }

    let trailing = if path.is_empty() {
        base.ends_with('/')
    } else {
        path.ends_with('/')
    };
    if trailing && !joined.ends_with('/') {
        joined.push('/');
    }
    joined
}

/// Normalize a configured base path into the prefix routes are joined to.
pub fn base_prefix(base_path: &str) -> String {
    join(base_path, DEFAULT_BASE_PATH)
}

/// Derive a route path from a handler name: `"/" + name + "/"`.
pub fn derive(name: &str) -> Result<String, RegistryError> {
    if name.is_empty() || name.contains('/') || name.chars().any(char::is_whitespace) {
        return Err(RegistryError::InvalidName { name: name.to_string() });
    }
    Ok(format!("/{}/", name))
}

fn check_explicit(path: &str) -> Result<(), RegistryError> {
    let invalid = path.is_empty()
        || path.contains(['?', '#'])
        || path.chars().any(char::is_whitespace)
        || path.split('/').any(|segment| segment == "..");
    if invalid {
        return Err(RegistryError::InvalidPath { path: path.to_string() });
    }
    Ok(())
}

/// Resolve the full path of a route.
///
/// An explicit path wins regardless of `handler_name`; otherwise the path is
/// derived from the name. Either way it is joined against `base`.
pub fn resolve(base: &str, explicit: Option<&str>, handler_name: &str) -> Result<String, RegistryError> {
    let route = match explicit {
        Some(path) => {
            check_explicit(path)?;
            path.to_string()
        }
        None => derive(handler_name)?,
    };
    Ok(join(base, &route))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_preserves_case() {
        assert_eq!(derive("divide").unwrap(), "/divide/");
        assert_eq!(derive("RunSubtraction").unwrap(), "/RunSubtraction/");
    }

    #[test]
    fn test_derive_rejects_bad_names() {
        assert!(derive("").is_err());
        assert!(derive("a/b").is_err());
        assert!(derive("a b").is_err());
    }

    #[test]
    fn test_explicit_path_ignores_name() {
        assert_eq!(resolve("/", Some("/RunSubtraction/"), "subtract").unwrap(), "/RunSubtraction/");
        assert_eq!(resolve("/", Some("/RunSubtraction/"), "other").unwrap(), "/RunSubtraction/");
    }

    #[test]
    fn test_resolve_against_base() {
        let base = base_prefix("/api/optic");
        assert_eq!(base, "/api/optic/");
        assert_eq!(resolve(&base, None, "divide").unwrap(), "/api/optic/divide/");
        assert_eq!(resolve(&base, Some("/v2/divide"), "divide").unwrap(), "/api/optic/v2/divide");
    }

    #[test]
    fn test_explicit_path_validation() {
        assert!(resolve("/", Some(""), "x").is_err());
        assert!(resolve("/", Some("/a/../b/"), "x").is_err());
        assert!(resolve("/", Some("/a?b=1"), "x").is_err());
    }

    #[test]
    fn test_join() {
        assert_eq!(join("/", "/"), "/");
        assert_eq!(join("", ""), "/");
        assert_eq!(join("/api//optic/", "//divide/"), "/api/optic/divide/");
        assert_eq!(join("/api", "divide"), "/api/divide");
        assert_eq!(join("/api/", ""), "/api/");
    }
}
