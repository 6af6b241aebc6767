//! JSON patch construction

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use crate::{Error, Result};

/// `/segment` groups without spaces or slashes, optionally ending in a bare `/`
static PATH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:/[^ /]+)*/?$").expect("patch path pattern"));

/// Check a patch path
///
/// Valid: "/", "/foo", "/foo/bar", "/foo/-", "/foo/". Invalid: "", "foo",
/// "/foo//bar", "/foo/ bar".
pub fn is_valid_path(path: &str) -> bool {
    path.starts_with('/') && PATH_PATTERN.is_match(path)
}

/// Build an `add` operation
///
/// With a path ending in `/-` the value is appended to the array there.
pub fn add_operation(path: &str, value: Value) -> Result<Value> {
    if !is_valid_path(path) {
        return Err(Error::InvalidPatchPath(path.to_string()));
    }

    Ok(json!({
        "op": "add",
        "path": path,
        "value": value,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_operation() {
        let op = add_operation("/head/-", json!({"name": "Cap"})).unwrap();
        assert_eq!(
            op,
            json!({"op": "add", "path": "/head/-", "value": {"name": "Cap"}})
        );

        let keys: Vec<&str> = op.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["op", "path", "value"]);
    }

    #[test]
    fn test_add_operation_invalid() {
        for path in ["head", "/head/ space", ""] {
            let err = add_operation(path, json!(1)).unwrap_err();
            assert!(matches!(err, Error::InvalidPatchPath(ref p) if p == path));
        }
    }

    #[test]
    fn test_valid_paths() {
        for path in ["/", "/foo", "/foo/bar", "/foo/_bar", "/foo1", "/1foo", "/-", "/2", "/foo/"] {
            assert!(is_valid_path(path), "{} should be valid", path);
        }
    }

    #[test]
    fn test_invalid_paths() {
        for path in ["", "foo", "//", "/foo//bar", "/foo bar", "foo/bar"] {
            assert!(!is_valid_path(path), "{} should be invalid", path);
        }
    }
}
