//! Canonical resource: the path and subresource query the server signs against.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::s3_constant::S3_SUBRESOURCES;

/// Everything except unreserved characters. Spaces become `%20`, never `+`.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Resolve the path-style resource for a request.
///
/// A host other than `base_endpoint` is taken to be `<bucket>.<base_endpoint>`
/// and the bucket is moved into the path. The host is not validated: one
/// without the endpoint suffix is spliced into the path as it is.
///
/// The path is taken as raw bytes, as decoded from the URL.
///
/// ```
/// use s3_v2_signer::canonical_path;
///
/// assert_eq!(
///     canonical_path("bucket.storage.example", b"/key.txt", "storage.example"),
///     b"/bucket/key.txt"
/// );
/// assert_eq!(
///     canonical_path("storage.example", b"/bucket/key.txt", "storage.example"),
///     b"/bucket/key.txt"
/// );
/// ```
pub fn canonical_path(host: &str, path: &[u8], base_endpoint: &str) -> Vec<u8> {
    let path: &[u8] = if path.is_empty() { b"/" } else { path };
    if host == base_endpoint {
        return path.to_vec();
    }

    let bucket = host.replacen(&format!(".{}", base_endpoint), "", 1);
    let mut canonical = Vec::with_capacity(1 + bucket.len() + path.len());
    canonical.push(b'/');
    canonical.extend_from_slice(bucket.as_bytes());
    canonical.extend_from_slice(path);
    canonical
}

/// Select the subresources from a query, in declaration order of
/// [`S3_SUBRESOURCES`], and encode them as `key=value` pairs joined by `&`.
///
/// Only the first value of a repeated parameter is used.
pub fn canonical_query(query: &[(String, String)]) -> String {
    S3_SUBRESOURCES
        .iter()
        .filter_map(|name| {
            query
                .iter()
                .find(|(key, _)| key == name)
                .map(|(key, value)| format!("{}={}", encode(key), encode(value)))
        })
        .collect::<Vec<String>>()
        .join("&")
}

#[inline]
pub fn canonical_resource(path: &[u8], query: &str) -> Vec<u8> {
    let mut resource = path.to_vec();
    if !query.is_empty() {
        resource.push(b'?');
        resource.extend_from_slice(query.as_bytes());
    }
    resource
}

#[inline]
fn encode(s: &str) -> String {
    utf8_percent_encode(s, QUERY_ENCODE_SET).to_string()
}
