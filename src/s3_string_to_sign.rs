use std::collections::BTreeMap;

use crate::s3_constant::{S3_CONTENT_MD5_KEY, S3_CONTENT_TYPE_KEY, S3_VENDOR_PREFIX};
use crate::SigningRequest;

/// Request parts that go into the string to sign, as raw bytes.
///
/// Header values may carry obs-text (bytes above `0x7F`); they are signed as they are.
pub trait CanonicalRequest {
    fn content_md5(&self) -> &[u8];
    fn content_type(&self) -> &[u8];
    fn canonical_amz_headers(&self) -> Vec<Vec<u8>>;
}

impl CanonicalRequest for SigningRequest {
    fn content_md5(&self) -> &[u8] {
        self.header_bytes(S3_CONTENT_MD5_KEY).unwrap_or_default()
    }

    fn content_type(&self) -> &[u8] {
        self.header_bytes(S3_CONTENT_TYPE_KEY).unwrap_or_default()
    }

    /// One `name:value[,value...]` line per `x-amz-*` header, sorted by name.
    ///
    /// Values of a repeated header are joined in the order they were added.
    fn canonical_amz_headers(&self) -> Vec<Vec<u8>> {
        // HeaderMap stores names lowercased; its iteration order is not meaningful.
        let mut amz_headers = BTreeMap::new();
        for name in self.headers.keys() {
            let name = name.as_str().to_lowercase();
            if !name.starts_with(S3_VENDOR_PREFIX) {
                continue;
            }
            let values = self
                .headers
                .get_all(name.as_str())
                .iter()
                .map(|v| v.as_bytes())
                .collect::<Vec<&[u8]>>()
                .join(&b","[..]);
            amz_headers.insert(name, values);
        }

        amz_headers
            .into_iter()
            .map(|(name, values)| {
                let mut line = name.into_bytes();
                line.push(b':');
                line.extend_from_slice(&values);
                line
            })
            .collect()
    }
}

/// Assemble the newline separated bytes the signature is computed over.
///
/// ```text
/// <method>
/// <content-md5>
/// <content-type>
/// <empty date line>
/// x-amz-<a>:<value>
/// x-amz-<b>:<value>
/// <canonical resource>
/// ```
pub fn string_to_sign(req: &SigningRequest, resource: &[u8]) -> Vec<u8> {
    let mut parts: Vec<Vec<u8>> = vec![
        req.method.as_str().as_bytes().to_vec(),
        req.content_md5().to_vec(),
        req.content_type().to_vec(),
        // Date goes in x-amz-date instead.
        vec![],
    ];
    parts.extend(req.canonical_amz_headers());
    parts.push(resource.to_vec());

    parts.join(&b'\n')
}
