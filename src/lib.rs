//! Signature version 2 (HMAC-SHA1) request signing for S3 compatible storage.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use reqwest::Method;
//! use s3_v2_signer::{SignRequest, SigningContext, SigningRequest, StaticCredentialProvider, V2Signer};
//!
//! let credentials = StaticCredentialProvider::new("AKID", "secret");
//! let ctx = SigningContext::new(Utc.with_ymd_and_hms(2025, 6, 3, 14, 8, 5).unwrap(), "storage.example");
//! let req = SigningRequest::new(Method::GET, "mybucket.storage.example", "/file.txt");
//!
//! let signed = V2Signer::new().sign(&req, &credentials, &ctx).unwrap();
//! assert_eq!(
//!     signed.header("Authorization"),
//!     Some("AWS AKID:5/vDjMEb3H6qBEeOAyW0/oARx2k=")
//! );
//! ```

#[macro_use]
extern crate serde;

pub mod error;
pub mod s3;
pub mod s3_canonical;
pub mod s3_config;
pub mod s3_constant;
pub mod s3_credentials;
pub mod s3_request;
pub mod s3_signer;
pub mod s3_string_to_sign;

pub use error::{Error, Result};
pub use s3::*;
pub use s3_canonical::*;
pub use s3_config::*;
pub use s3_constant::*;
pub use s3_credentials::*;
pub use s3_request::*;
pub use s3_signer::*;
pub use s3_string_to_sign::*;
