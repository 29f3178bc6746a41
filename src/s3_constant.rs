pub const S3_CONTENT_MD5_KEY: &str = "Content-MD5";
pub const S3_CONTENT_TYPE_KEY: &str = "Content-Type";
pub const S3_DATE_KEY: &str = "x-amz-date";
pub const S3_SECURITY_TOKEN_KEY: &str = "x-amz-security-token";
pub const S3_VENDOR_PREFIX: &str = "x-amz-";
pub const S3_ALGO_VALUE: &str = "AWS";

/// `Mon, 2 Jan 2006 15:04:05 +0000`: day of month is not padded, offset is literal.
pub const S3_DATE_FORMAT: &str = "%a, %-d %b %Y %H:%M:%S +0000";

/// Query parameters the server includes in the signed resource, in the order
/// they must appear. Do not sort.
pub const S3_SUBRESOURCES: [&str; 16] = [
    "acl",
    "delete",
    "lifecycle",
    "location",
    "logging",
    "notification",
    "partNumber",
    "policy",
    "requestPayment",
    "torrent",
    "uploadId",
    "uploads",
    "versionId",
    "versioning",
    "versions",
    "website",
];
