use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::error::{Error, Result};
use crate::s3_request::host_with_port;
use crate::{
    AnonymousCredentials, CredentialProvider, SignRequest, SigningLogger,
    StaticCredentialProvider, TracingLogger, V2Signer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureVersion {
    #[default]
    V2,
}

impl SignatureVersion {
    /// Signing scheme registered for this version.
    pub fn signer(self, logger: Option<Arc<dyn SigningLogger>>) -> Box<dyn SignRequest> {
        match self {
            Self::V2 => {
                let signer = V2Signer::new();
                match logger {
                    Some(logger) => Box::new(signer.with_logger(logger)),
                    None => Box::new(signer),
                }
            }
        }
    }
}

/// Connection settings for an S3 compatible endpoint.
///
/// ```
/// use s3_v2_signer::S3Config;
///
/// let config = S3Config::from_json(r#"{
///     "access_key": "AKID",
///     "secret_key": "secret",
///     "endpoint": "http://localhost:9000"
/// }"#).unwrap();
/// assert_eq!(config.base_endpoint().unwrap(), "localhost:9000");
/// ```
#[derive(Clone, Deserialize)]
pub struct S3Config {
    /// Empty means anonymous access.
    #[serde(default)]
    pub access_key: String,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default)]
    pub session_token: Option<String>,
    /// Endpoint URL. `https://` is assumed when no scheme is given.
    pub endpoint: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub signature_version: SignatureVersion,
    #[serde(default)]
    pub force_path_style: bool,
    /// Trace every string to sign through `tracing`.
    #[serde(default)]
    pub debug_signing: bool,
}

impl S3Config {
    #[inline]
    pub fn new(
        endpoint: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            session_token: None,
            endpoint: endpoint.into(),
            region: String::new(),
            signature_version: SignatureVersion::default(),
            force_path_style: false,
            debug_signing: false,
        }
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn endpoint_url(&self) -> Result<Url> {
        let url = if self.endpoint.contains("://") {
            Url::parse(&self.endpoint)?
        } else {
            Url::parse(&format!("https://{}", self.endpoint))?
        };

        if url.host_str().map_or(true, str::is_empty) {
            return Err(Error::ConfigError(format!(
                "endpoint has no host: {}",
                self.endpoint
            )));
        }
        Ok(url)
    }

    /// Host and port path-style requests are sent to.
    pub fn base_endpoint(&self) -> Result<String> {
        Ok(host_with_port(&self.endpoint_url()?))
    }

    /// Credential source for this config: anonymous when no key is set at all.
    ///
    /// A secret key or session token without an access key is a `ConfigError`.
    pub fn credentials(&self) -> Result<Arc<dyn CredentialProvider>> {
        if self.access_key.is_empty() {
            let has_token = self.session_token.as_deref().map_or(false, |t| !t.is_empty());
            if !self.secret_key.is_empty() || has_token {
                return Err(Error::ConfigError(
                    "secret key or session token set without an access key".to_string(),
                ));
            }
            return Ok(Arc::new(AnonymousCredentials));
        }

        let provider = StaticCredentialProvider::new(&self.access_key, &self.secret_key);
        Ok(match &self.session_token {
            Some(token) => Arc::new(provider.with_session_token(token)),
            None => Arc::new(provider),
        })
    }

    pub fn signer(&self) -> Box<dyn SignRequest> {
        let logger: Option<Arc<dyn SigningLogger>> = if self.debug_signing {
            Some(Arc::new(TracingLogger))
        } else {
            None
        };
        self.signature_version.signer(logger)
    }
}

impl fmt::Debug for S3Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3Config")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("signature_version", &self.signature_version)
            .field("force_path_style", &self.force_path_style)
            .field("debug_signing", &self.debug_signing)
            .finish()
    }
}
