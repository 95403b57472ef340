#![deny(missing_docs)]

//! # Reference Utilities
//!
//! JSON Pointer helpers and `$ref` normalization with respect to the OAS 3.2 `$self`.
//!
//! Nothing here fetches external documents. Absolute or relative references are
//! treated as local only when their document part matches the current `$self`.

use percent_encoding::percent_decode_str;
use std::path::Path;
use url::Url;

/// The pointer of the document root.
pub const ROOT: &str = "#";

/// Turns a `$ref` into a pointer into this document (`#/...`).
///
/// `None` for references into other documents and for references without a
/// fragment.
pub fn normalize_ref_to_local(ref_str: &str, self_uri: Option<&str>) -> Option<String> {
    if ref_str.starts_with("#/") || ref_str == ROOT {
        return Some(ref_str.to_string());
    }

    let (document, fragment) = ref_str.split_once('#')?;
    if document.is_empty() {
        return Some(format!("#{}", fragment));
    }
    let self_uri = self_uri?;
    if ref_doc_matches_self(document, self_uri) {
        return Some(format!("#{}", fragment));
    }
    None
}

/// Appends one (unescaped) segment to a pointer.
pub fn join_pointer(base: &str, segment: &str) -> String {
    format!("{}/{}", base, encode_pointer_segment(segment))
}

/// Splits a local pointer (`#/a/b~1c`) into decoded segments (`["a", "b/c"]`).
pub fn split_pointer(pointer: &str) -> Vec<String> {
    let trimmed = pointer.trim_start_matches('#');
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .trim_start_matches('/')
        .split('/')
        .map(decode_pointer_segment)
        .collect()
}

/// Rewrites a pointer into the form the document index uses (percent escapes
/// decoded, `~0`/`~1` escapes normalized).
pub fn canonical_pointer(pointer: &str) -> String {
    split_pointer(pointer)
        .iter()
        .fold(ROOT.to_string(), |acc, segment| join_pointer(&acc, segment))
}

/// Extracts the declared name of a reference target, i.e. its last pointer segment.
///
/// `#/components/schemas/User` -> `User`
pub fn declared_name(pointer: &str) -> Option<String> {
    split_pointer(pointer)
        .pop()
        .filter(|name| !name.is_empty())
}

/// Unescapes one pointer segment (`~1`, `~0` and percent escapes).
pub fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Encodes a JSON Pointer segment (`~` -> `~0`, `/` -> `~1`).
pub fn encode_pointer_segment(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

/// True if the document part of a reference names the document itself.
fn ref_doc_matches_self(ref_doc: &str, self_uri: &str) -> bool {
    if ref_doc == self_uri {
        return true;
    }
    match (Url::parse(ref_doc), Url::parse(self_uri)) {
        (Ok(target), Ok(own)) => {
            target.scheme() == own.scheme()
                && target.host() == own.host()
                && target.port() == own.port()
                && target.path() == own.path()
        }
        // An absolute-path `$self` matches any URL with that path.
        (Ok(target), Err(_)) if self_uri.starts_with('/') => target.path() == self_uri,
        (Err(_), Err(_)) => Path::new(ref_doc) == Path::new(self_uri),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_and_self_references() {
        let cases = [
            ("#/components/schemas/Pet", None),
            ("#", None),
            ("#/definitions/Pet", Some("petstore.json")),
            ("petstore.json#/definitions/Pet", Some("petstore.json")),
            ("https://api.example.org/openapi.json#/x", Some("https://api.example.org/openapi.json")),
            ("https://api.example.org/v2/openapi.json#/x", Some("/v2/openapi.json")),
        ];
        for (reference, self_uri) in cases {
            let local = normalize_ref_to_local(reference, self_uri);
            assert!(
                local.as_deref().is_some_and(|p| p.starts_with('#')),
                "{} should be local",
                reference
            );
        }
    }

    #[test]
    fn test_normalize_ref_external_is_rejected() {
        let ref_str = "other.yaml#/components/schemas/User";
        assert!(normalize_ref_to_local(ref_str, None).is_none());
        assert!(normalize_ref_to_local(ref_str, Some("openapi.yaml")).is_none());
    }

    #[test]
    fn test_pointer_round_trip_escapes() {
        let pointer = join_pointer("#/paths", "/users/{id}");
        assert_eq!(pointer, "#/paths/~1users~1{id}");
        assert_eq!(split_pointer(&pointer), vec!["paths", "/users/{id}"]);
        assert!(split_pointer(ROOT).is_empty());
    }

    #[test]
    fn test_canonical_pointer() {
        assert_eq!(
            canonical_pointer("#/components/schemas/User%20Profile"),
            "#/components/schemas/User Profile"
        );
        assert_eq!(canonical_pointer("#"), "#");
    }

    #[test]
    fn test_declared_name() {
        assert_eq!(
            declared_name("#/components/schemas/User").as_deref(),
            Some("User")
        );
        assert_eq!(declared_name("#"), None);
    }

    #[test]
    fn test_decode_pointer_segment_percent_encoding() {
        let encoded = "User%20Profile~1details";
        let decoded = decode_pointer_segment(encoded);
        assert_eq!(decoded, "User Profile/details");
    }
}
