//! Credential sources consulted by the signer.
//!
//! A [`CredentialProvider`] is asked for a fresh [`Credentials`] value on every
//! signing attempt. [`AnonymousCredentials`] is the sentinel that turns signing off.

use std::fmt;

use crate::error::{Error, Result};

/// Access key pair plus an optional session token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
    session_token: Option<String>,
}

impl Credentials {
    #[inline]
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            session_token: None,
        }
    }

    #[inline]
    pub fn with_session_token(mut self, session_token: impl Into<String>) -> Self {
        self.session_token = Some(session_token.into());
        self
    }

    #[inline]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    #[inline]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Session token, if any. An empty token counts as absent.
    #[inline]
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref().filter(|t| !t.is_empty())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Source of credentials for signing.
///
/// Implementations are shared between concurrently signed requests, so any
/// refresh logic they carry must be internally synchronized.
pub trait CredentialProvider: Send + Sync {
    /// Resolve the credentials to sign the current attempt with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CredentialError`] if no credentials are available.
    fn resolve(&self) -> Result<Credentials>;

    /// Whether this source is the anonymous sentinel. Anonymous requests are never signed.
    fn is_anonymous(&self) -> bool {
        false
    }
}

/// Fixed credentials, typically read from configuration.
///
/// # Examples
///
/// ```
/// use s3_v2_signer::{CredentialProvider, StaticCredentialProvider};
///
/// let provider = StaticCredentialProvider::new("AKID", "secret");
/// let credentials = provider.resolve().unwrap();
/// assert_eq!(credentials.access_key(), "AKID");
/// ```
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credentials: Credentials,
}

impl StaticCredentialProvider {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(access_key, secret_key),
        }
    }

    pub fn with_session_token(mut self, session_token: impl Into<String>) -> Self {
        self.credentials = self.credentials.with_session_token(session_token);
        self
    }
}

impl From<Credentials> for StaticCredentialProvider {
    fn from(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn resolve(&self) -> Result<Credentials> {
        if self.credentials.access_key.is_empty() {
            return Err(Error::CredentialError("access key is empty".into()));
        }
        Ok(self.credentials.clone())
    }
}

/// Requests signed with these credentials are sent as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousCredentials;

impl CredentialProvider for AnonymousCredentials {
    fn resolve(&self) -> Result<Credentials> {
        Err(Error::CredentialError(
            "anonymous credentials cannot be resolved".into(),
        ))
    }

    fn is_anonymous(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_resolve_static_credentials() {
        let provider = StaticCredentialProvider::new("AKID", "secret").with_session_token("token");

        let credentials = provider.resolve().unwrap();
        assert_eq!(credentials.access_key(), "AKID");
        assert_eq!(credentials.secret_key(), "secret");
        assert_eq!(credentials.session_token(), Some("token"));
        assert!(!provider.is_anonymous());
    }

    #[test]
    fn test_should_reject_empty_access_key() {
        let provider = StaticCredentialProvider::new("", "secret");
        assert!(matches!(provider.resolve(), Err(Error::CredentialError(_))));
    }

    #[test]
    fn test_should_treat_empty_session_token_as_absent() {
        let credentials = Credentials::new("AKID", "secret").with_session_token("");
        assert_eq!(credentials.session_token(), None);
    }

    #[test]
    fn test_should_flag_anonymous_sentinel() {
        assert!(AnonymousCredentials.is_anonymous());
        assert!(AnonymousCredentials.resolve().is_err());
    }

    #[test]
    fn test_should_not_leak_secret_in_debug_output() {
        let credentials = Credentials::new("AKID", "topsecret").with_session_token("tok");
        let debug = format!("{:?}", credentials);
        assert!(debug.contains("AKID"));
        assert!(!debug.contains("topsecret"));
        assert!(!debug.contains("\"tok\""));
    }
}
