use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use reqwest::{Client, Method, Request, Response, Url};
use tracing::debug;

use crate::error::{Error, Result};
use crate::{CredentialProvider, S3Config, SignRequest, SignatureVersion, SigningContext, SigningLogger};

pub struct S3 {
    endpoint: Url,
    base_endpoint: String,
    region: String,
    force_path_style: bool,
    signature_version: SignatureVersion,
    credentials: Arc<dyn CredentialProvider>,
    signer: Box<dyn SignRequest>,
    client: Client,
}

impl S3 {
    pub fn new(config: &S3Config) -> Result<Self> {
        let endpoint = config.endpoint_url()?;
        let base_endpoint = config.base_endpoint()?;

        Ok(Self {
            endpoint,
            base_endpoint,
            region: config.region.clone(),
            force_path_style: config.force_path_style,
            signature_version: config.signature_version,
            credentials: config.credentials()?,
            signer: config.signer(),
            client: Client::new(),
        })
    }

    #[inline]
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = credentials;
        self
    }

    #[inline]
    pub fn with_logger(mut self, logger: Arc<dyn SigningLogger>) -> Self {
        self.signer = self.signature_version.signer(Some(logger));
        self
    }

    #[inline]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    #[inline]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// `https://endpoint/bucket/` when path-style is forced, `https://bucket.endpoint/` otherwise.
    pub fn bucket_url(&self, bucket: &str) -> Result<Url> {
        self.object_url(bucket, "")
    }

    pub fn object_url(&self, bucket: &str, key: &str) -> Result<Url> {
        let mut url = self.endpoint.clone();
        if self.force_path_style {
            url.set_path(&format!("/{}/{}", bucket, key));
        } else {
            let host = url
                .host_str()
                .ok_or_else(|| Error::ConfigError("endpoint has no host".into()))?;
            let host = format!("{}.{}", bucket, host);
            url.set_host(Some(&host))?;
            url.set_path(&format!("/{}", key));
        }

        Ok(url)
    }

    #[inline]
    pub fn list_buckets(&self) -> Result<Request> {
        let mut url = self.endpoint.clone();
        url.set_path("/");
        self.prepare_request(Method::GET, url)
    }

    #[inline]
    pub fn head_object(&self, bucket: &str, key: &str) -> Result<Request> {
        self.prepare_request(Method::HEAD, self.object_url(bucket, key)?)
    }

    #[inline]
    pub fn get_object(&self, bucket: &str, key: &str) -> Result<Request> {
        self.prepare_request(Method::GET, self.object_url(bucket, key)?)
    }

    #[inline]
    pub fn delete_object(&self, bucket: &str, key: &str) -> Result<Request> {
        self.prepare_request(Method::DELETE, self.object_url(bucket, key)?)
    }

    #[inline]
    pub fn get_object_acl(&self, bucket: &str, key: &str) -> Result<Request> {
        let mut url = self.object_url(bucket, key)?;
        url.query_pairs_mut().append_key_only("acl");
        self.prepare_request(Method::GET, url)
    }

    /// Sign `req` with the current time. Call again before every retry.
    #[inline]
    pub fn sign(&self, req: &mut Request) -> Result<()> {
        self.sign_at(req, Utc::now())
    }

    pub fn sign_at(&self, req: &mut Request, time: DateTime<Utc>) -> Result<()> {
        let ctx = self.signing_context(time);
        self.signer
            .sign_request(req, self.credentials.as_ref(), &ctx)
    }

    /// Sign and send. A request that fails to sign is never sent.
    pub async fn execute(&self, mut req: Request) -> Result<Response> {
        self.sign(&mut req)?;
        debug!(method = %req.method(), url = %req.url(), signer = self.signer.name(), "Sending request");

        Ok(self.client.execute(req).await?)
    }

    #[inline]
    fn signing_context(&self, time: DateTime<Utc>) -> SigningContext {
        SigningContext::new(time, self.base_endpoint.as_str()).with_path_style(self.force_path_style)
    }

    #[inline]
    fn prepare_request(&self, method: Method, url: Url) -> Result<Request> {
        let mut req = Request::new(method, url);
        self.sign(&mut req)?;
        Ok(req)
    }
}

impl fmt::Debug for S3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3")
            .field("endpoint", &self.endpoint.as_str())
            .field("region", &self.region)
            .field("force_path_style", &self.force_path_style)
            .field("signer", &self.signer.name())
            .field("anonymous", &self.credentials.is_anonymous())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::Credentials;

    fn test_config(force_path_style: bool) -> S3Config {
        let mut config = S3Config::new("https://storage.example", "AKID", "secret");
        config.force_path_style = force_path_style;
        config
    }

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 3, 14, 8, 5).unwrap()
    }

    struct ExpiredCredentials;

    impl CredentialProvider for ExpiredCredentials {
        fn resolve(&self) -> Result<Credentials> {
            Err(Error::CredentialError("session expired".into()))
        }
    }

    #[test]
    fn test_should_build_virtual_hosted_url() {
        let s3 = S3::new(&test_config(false)).unwrap();
        assert_eq!(
            s3.object_url("mybucket", "file.txt").unwrap().as_str(),
            "https://mybucket.storage.example/file.txt"
        );
        assert_eq!(
            s3.bucket_url("mybucket").unwrap().as_str(),
            "https://mybucket.storage.example/"
        );
    }

    #[test]
    fn test_should_build_path_style_url() {
        let s3 = S3::new(&test_config(true)).unwrap();
        assert_eq!(
            s3.object_url("mybucket", "file.txt").unwrap().as_str(),
            "https://storage.example/mybucket/file.txt"
        );
        assert_eq!(
            s3.bucket_url("mybucket").unwrap().as_str(),
            "https://storage.example/mybucket/"
        );
    }

    #[test]
    fn test_should_sign_both_addressing_styles_identically() {
        let virtual_hosted = S3::new(&test_config(false)).unwrap();
        let path_style = S3::new(&test_config(true)).unwrap();

        let mut a = virtual_hosted.get_object("mybucket", "file.txt").unwrap();
        let mut b = path_style.get_object("mybucket", "file.txt").unwrap();
        virtual_hosted.sign_at(&mut a, fixed_time()).unwrap();
        path_style.sign_at(&mut b, fixed_time()).unwrap();

        assert_eq!(
            a.headers().get("authorization").unwrap(),
            "AWS AKID:5/vDjMEb3H6qBEeOAyW0/oARx2k="
        );
        assert_eq!(
            a.headers().get("authorization"),
            b.headers().get("authorization")
        );
    }

    #[test]
    fn test_should_add_acl_subresource() {
        let s3 = S3::new(&test_config(true)).unwrap();
        let req = s3.get_object_acl("mybucket", "file.txt").unwrap();

        assert_eq!(req.url().query(), Some("acl"));
        assert!(req.headers().get("authorization").is_some());
    }

    #[test]
    fn test_should_resign_on_retry() {
        let s3 = S3::new(&test_config(true)).unwrap();
        let mut req = s3.delete_object("mybucket", "file.txt").unwrap();
        s3.sign_at(&mut req, fixed_time()).unwrap();
        let first = req.headers().clone();
        s3.sign_at(&mut req, fixed_time()).unwrap();

        assert_eq!(req.headers(), &first);
        assert_eq!(req.headers().get_all("authorization").iter().count(), 1);
    }

    #[test]
    fn test_should_not_sign_anonymous_requests() {
        let s3 = S3::new(&S3Config::new("https://storage.example", "", "")).unwrap();
        let req = s3.list_buckets().unwrap();

        assert!(req.headers().is_empty());
        assert_eq!(req.url().as_str(), "https://storage.example/");
    }

    #[tokio::test]
    async fn test_should_not_send_when_signing_fails() {
        let s3 = S3::new(&test_config(true))
            .unwrap()
            .with_credentials(Arc::new(ExpiredCredentials));
        let req = Request::new(
            Method::GET,
            Url::parse("https://storage.example/mybucket/file.txt").unwrap(),
        );

        let err = s3.execute(req).await.unwrap_err();
        assert!(matches!(err, Error::CredentialError(_)));
        assert!(err.is_auth_error());
    }
}
