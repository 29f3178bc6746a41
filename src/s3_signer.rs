use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};
use reqwest::Request;
use sha1::Sha1;
use tracing::debug;

use crate::error::{Error, Result};
use crate::s3_constant::{S3_ALGO_VALUE, S3_DATE_FORMAT, S3_DATE_KEY, S3_SECURITY_TOKEN_KEY};
use crate::{
    canonical_path, canonical_query, canonical_resource, string_to_sign, CredentialProvider,
    SigningContext, SigningRequest,
};

type HmacSha1 = Hmac<Sha1>;

pub const V2_SIGNER_NAME: &str = "v2.SignRequestHandler";

/// Receives the signing trace when one is wanted. Never handed to the transport.
pub trait SigningLogger: Send + Sync {
    fn log(&self, msg: &str);
}

/// Forwards the signing trace to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl SigningLogger for TracingLogger {
    fn log(&self, msg: &str) {
        debug!(target: "s3_v2_signer::trace", "{}", msg);
    }
}

/// A request signing scheme.
///
/// The dispatch side only talks to this trait, so a scheme can be swapped by
/// configuration without touching how requests are sent.
pub trait SignRequest: Send + Sync {
    fn name(&self) -> &'static str;

    /// Return a signed copy of `req`.
    ///
    /// Signing the output again with the same inputs yields an equal value.
    fn sign(
        &self,
        req: &SigningRequest,
        credentials: &dyn CredentialProvider,
        ctx: &SigningContext,
    ) -> Result<SigningRequest>;

    /// Pre-send hook: sign `req` in place right before it goes out.
    ///
    /// On error the request is left as it was and must not be sent.
    fn sign_request(
        &self,
        req: &mut Request,
        credentials: &dyn CredentialProvider,
        ctx: &SigningContext,
    ) -> Result<()> {
        if credentials.is_anonymous() {
            return Ok(());
        }
        let signed = self.sign(&SigningRequest::build(req), credentials, ctx)?;
        signed.apply(req);
        Ok(())
    }
}

pub struct Signer<'s> {
    secret_key: &'s str,
}

impl<'s> Signer<'s> {
    #[inline]
    pub fn new(secret_key: &'s str) -> Self {
        Self { secret_key }
    }

    /// Base64 HMAC-SHA1 of `string_to_sign`.
    #[inline]
    pub fn sign(&self, string_to_sign: &[u8]) -> std::result::Result<String, InvalidLength> {
        let mut h = HmacSha1::new_from_slice(self.secret_key.as_bytes())?;
        h.update(string_to_sign);
        Ok(STANDARD.encode(h.finalize().into_bytes()))
    }
}

/// Signature version 2: `Authorization: AWS <access key>:<signature>`.
#[derive(Clone, Default)]
pub struct V2Signer {
    logger: Option<Arc<dyn SigningLogger>>,
}

impl V2Signer {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_logger(mut self, logger: Arc<dyn SigningLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    fn log_signing_info(&self, string_to_sign: &[u8], authorization: &str) {
        if let Some(logger) = &self.logger {
            logger.log(&format_signing_info(string_to_sign, authorization));
        }
    }
}

impl fmt::Debug for V2Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("V2Signer")
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

impl SignRequest for V2Signer {
    fn name(&self) -> &'static str {
        V2_SIGNER_NAME
    }

    fn sign(
        &self,
        req: &SigningRequest,
        credentials: &dyn CredentialProvider,
        ctx: &SigningContext,
    ) -> Result<SigningRequest> {
        if credentials.is_anonymous() {
            debug!(method = %req.method, host = %req.host, "Anonymous credentials, skipping signing");
            return Ok(req.clone());
        }

        let credentials = credentials.resolve().map_err(|e| {
            debug!(error = %e, "Failed to resolve signing credentials");
            match e {
                Error::CredentialError(_) => e,
                other => Error::CredentialError(other.to_string()),
            }
        })?;

        let mut signed = req.clone();

        let date = ctx.time.format(S3_DATE_FORMAT).to_string();
        signed
            .headers
            .insert(HeaderName::from_static(S3_DATE_KEY), HeaderValue::from_str(&date)?);
        if let Some(token) = credentials.session_token() {
            let mut token = HeaderValue::from_str(token)?;
            token.set_sensitive(true);
            signed
                .headers
                .insert(HeaderName::from_static(S3_SECURITY_TOKEN_KEY), token);
        }

        // A retried request still carries the previous signature.
        signed.headers.remove(AUTHORIZATION);

        let path = canonical_path(&signed.host, &signed.path, &ctx.base_endpoint);
        let resource = canonical_resource(&path, &canonical_query(&signed.query));
        let string_to_sign = string_to_sign(&signed, &resource);

        let signature = Signer::new(credentials.secret_key()).sign(&string_to_sign)?;
        let authorization = format!(
            "{algo} {access_key}:{signature}",
            algo = S3_ALGO_VALUE,
            access_key = credentials.access_key(),
            signature = signature,
        );
        let mut value = HeaderValue::from_str(&authorization)?;
        value.set_sensitive(true);
        signed.headers.insert(AUTHORIZATION, value);

        debug!(
            method = %signed.method,
            resource = %String::from_utf8_lossy(&resource),
            access_key_id = %credentials.access_key(),
            "Signed request"
        );
        self.log_signing_info(&string_to_sign, &authorization);

        Ok(signed)
    }
}

fn format_signing_info(string_to_sign: &[u8], authorization: &str) -> String {
    format!(
        "DEBUG: Request Signature:\n\
         ---[ STRING TO SIGN ]--------------------------------\n\
         {}\n\
         ---[ SIGNATURE ]-------------------------------------\n\
         {}\n\
         -----------------------------------------------------",
        String::from_utf8_lossy(string_to_sign),
        authorization
    )
}
