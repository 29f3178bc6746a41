use hmac::digest::InvalidLength;
use reqwest::header::{InvalidHeaderName, InvalidHeaderValue};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The credential source could not produce a key pair. The request must not be sent.
    #[error("Credential Error: {0}")]
    CredentialError(String),
    #[error("Config Error: {0}")]
    ConfigError(String),
    #[error("Sign Error: {0}")]
    SignError(String),
    #[error("Execute Request Error: {0}")]
    RequestError(#[from] reqwest::Error),
}

impl Error {
    /// Authentication or configuration failures, as opposed to transport failures.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::CredentialError(_) | Self::ConfigError(_))
    }
}

impl From<InvalidLength> for Error {
    fn from(e: InvalidLength) -> Self {
        Self::SignError(e.to_string())
    }
}

impl From<InvalidHeaderValue> for Error {
    fn from(e: InvalidHeaderValue) -> Self {
        Self::SignError(e.to_string())
    }
}

impl From<InvalidHeaderName> for Error {
    fn from(e: InvalidHeaderName) -> Self {
        Self::SignError(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Self::ConfigError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_classify_auth_errors() {
        assert!(Error::CredentialError("expired".into()).is_auth_error());
        assert!(Error::ConfigError("no host".into()).is_auth_error());
        assert!(!Error::SignError("bad header".into()).is_auth_error());
    }

    #[test]
    fn test_should_prefix_messages() {
        let e = Error::CredentialError("no access key".into());
        assert_eq!(e.to_string(), "Credential Error: no access key");
    }

    #[test]
    fn test_should_convert_url_errors_to_config_errors() {
        let e: Error = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(e, Error::ConfigError(_)));
    }
}
