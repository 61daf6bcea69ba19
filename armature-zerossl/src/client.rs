/// ZeroSSL API client implementation
use crate::{
    certificate::*, cleanup, cleanup::CleanupReport, config::*, content::*, decode, decode::Decoded,
    error::*, request::ApiRequests, verification::*,
};
use async_trait::async_trait;
use reqwest::Request;

/// Listing and deletion, the operations the cleanup walker needs
#[async_trait]
pub trait CertificateApi: Send + Sync {
    /// List one page of certificates, optionally filtered by status and search term
    async fn list_certificates(
        &self,
        statuses: &[CertStatus],
        search: Option<&str>,
        limit: u32,
        page: u32,
    ) -> Result<Decoded<ListCertsResult>>;

    /// Cancel and remove a certificate
    async fn delete_certificate(&self, id: &str) -> Result<()>;
}

/// Client for the ZeroSSL REST API
///
/// Every method issues exactly one request and waits for the full response.
/// Nothing is retried; transport failures, error statuses and malformed
/// bodies are returned to the caller as they happen.
///
/// # Example
///
/// ```no_run
/// use armature_zerossl::{ZeroSslClient, ZeroSslConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = ZeroSslClient::new(ZeroSslConfig::new("my-access-key"))?;
///
/// let cert = client.get_certificate("a1b2c3").await?;
/// println!("{} is {:?}", cert.common_name, cert.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ZeroSslClient {
    config: ZeroSslConfig,
    http_client: reqwest::Client,
    requests: ApiRequests,
}

impl ZeroSslClient {
    /// Create a new ZeroSSL client
    pub fn new(config: ZeroSslConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let http_client = builder
            .build()
            .map_err(|e| ZeroSslError::InvalidRequest(e.to_string()))?;

        let requests = ApiRequests::new(
            http_client.clone(),
            &config.base_url,
            config.api_key.clone(),
        )?;

        Ok(Self {
            config,
            http_client,
            requests,
        })
    }

    /// Send a request and return the body of a successful response
    ///
    /// Statuses of 400 and above become [`ZeroSslError::Api`] carrying the
    /// body text when it can be read.
    async fn send(&self, request: Request) -> Result<Vec<u8>> {
        let method = request.method().clone();
        let path = request.url().path().to_string();
        tracing::debug!(%method, %path, "Sending ZeroSSL request");

        let response = self.http_client.execute(request).await?;
        let status = response.status().as_u16();

        if status >= 400 {
            let body = response.text().await.ok();
            tracing::debug!(%method, %path, status, "ZeroSSL request failed");
            return Err(ZeroSslError::Api { status, body });
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Fetch a certificate
    ///
    /// The body is decoded tolerantly: when the `validation` object (or any
    /// other field) has an unexpected shape, the remaining fields are still
    /// returned and the result is flagged partial.
    pub async fn get_certificate(&self, id: &str) -> Result<Decoded<CertificateInfo>> {
        let body = self.send(self.requests.get_certificate(id)?).await?;
        Ok(decode::tolerant(&body))
    }

    /// Create a certificate for `domains` signed from `csr`
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use armature_zerossl::{ZeroSslClient, ZeroSslConfig};
    /// # async fn example(client: ZeroSslClient, csr: &str) -> Result<(), Box<dyn std::error::Error>> {
    /// let cert = client
    ///     .create_certificate(&["example.com".to_string()], csr, 90, true)
    ///     .await?;
    /// println!("created {}", cert.id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_certificate(
        &self,
        domains: &[String],
        csr: &str,
        validity_days: u32,
        strict_domains: bool,
    ) -> Result<CertificateInfo> {
        tracing::info!(?domains, validity_days, "Creating certificate");
        let request = self
            .requests
            .create_certificate(domains, csr, validity_days, strict_domains)?;
        let body = self.send(request).await?;
        decode::strict(&body)
    }

    /// Cancel and remove a certificate
    pub async fn delete_certificate(&self, id: &str) -> Result<()> {
        self.send(self.requests.cancel_certificate(id)?).await?;
        Ok(())
    }

    /// Start domain verification for a certificate
    ///
    /// `email` is only sent for [`ValidationMethod::Email`] style requests
    /// and is ignored when empty.
    pub async fn verify_domains(
        &self,
        cert_id: &str,
        method: ValidationMethod,
        email: Option<&str>,
    ) -> Result<VerifyDomainsResult> {
        tracing::info!(%cert_id, %method, "Requesting domain verification");
        let body = self
            .send(self.requests.verify_domains(cert_id, method, email)?)
            .await?;
        decode::strict(&body)
    }

    /// Check how far domain verification has progressed
    pub async fn verification_status(&self, cert_id: &str) -> Result<VerificationStatusResult> {
        let body = self
            .send(self.requests.verification_status(cert_id)?)
            .await?;
        decode::strict(&body)
    }

    /// Download the issued certificate as PEM
    pub async fn download_certificate(
        &self,
        cert_id: &str,
        include_cross_signed: bool,
    ) -> Result<CertificateContent> {
        let body = self
            .send(
                self.requests
                    .download_certificate_inline(cert_id, include_cross_signed)?,
            )
            .await?;
        decode::strict(&body)
    }

    /// List one page of certificates
    ///
    /// Decoded tolerantly, like [`get_certificate`](Self::get_certificate):
    /// a malformed entry loses only the fields that failed, the counts and
    /// the other entries stay usable.
    pub async fn list_certificates(
        &self,
        statuses: &[CertStatus],
        search: Option<&str>,
        limit: u32,
        page: u32,
    ) -> Result<Decoded<ListCertsResult>> {
        tracing::debug!(?statuses, ?search, limit, page, "Listing certificates");
        let body = self
            .send(self.requests.list_certificates(statuses, search, limit, page)?)
            .await?;
        Ok(decode::tolerant(&body))
    }

    /// Delete every certificate still in `draft` or `pending_validation`
    ///
    /// See [`cleanup::clean_unfinished`] for how pages are walked.
    pub async fn clean_unfinished(&self) -> CleanupReport {
        cleanup::clean_unfinished(self, self.config.cleanup_page_size).await
    }

    /// Get the configuration
    pub fn config(&self) -> &ZeroSslConfig {
        &self.config
    }
}

#[async_trait]
impl CertificateApi for ZeroSslClient {
    async fn list_certificates(
        &self,
        statuses: &[CertStatus],
        search: Option<&str>,
        limit: u32,
        page: u32,
    ) -> Result<Decoded<ListCertsResult>> {
        ZeroSslClient::list_certificates(self, statuses, search, limit, page).await
    }

    async fn delete_certificate(&self, id: &str) -> Result<()> {
        ZeroSslClient::delete_certificate(self, id).await
    }
}
