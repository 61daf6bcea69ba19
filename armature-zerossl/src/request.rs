/// ZeroSSL REST request construction
use crate::certificate::CertStatus;
use crate::error::{Result, ZeroSslError};
use crate::verification::ValidationMethod;
use reqwest::{Method, Request, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

/// Builds a fully-formed request for every ZeroSSL endpoint
///
/// The API key travels as the `access_key` query parameter on every request.
/// Path segments are percent-encoded, so ids coming from API responses can be
/// passed through unchecked.
#[derive(Debug, Clone)]
pub struct ApiRequests {
    http: reqwest::Client,
    base_url: Url,
    api_key: SecretString,
}

impl ApiRequests {
    /// Create a request factory for the given endpoint
    pub fn new(http: reqwest::Client, base_url: &str, api_key: SecretString) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ZeroSslError::InvalidRequest(format!(
                "base URL cannot carry a path: {}",
                base_url
            )));
        }

        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    /// `GET /certificates/{id}`
    pub fn get_certificate(&self, id: &str) -> Result<Request> {
        self.build(Method::GET, &["certificates", id], |builder| builder)
    }

    /// `POST /certificates`
    pub fn create_certificate(
        &self,
        domains: &[String],
        csr: &str,
        validity_days: u32,
        strict_domains: bool,
    ) -> Result<Request> {
        let form = [
            ("certificate_domains", domains.join(",")),
            ("certificate_csr", csr.to_string()),
            ("certificate_validity_days", validity_days.to_string()),
            ("strict_domains", flag(strict_domains).to_string()),
        ];
        self.build(Method::POST, &["certificates"], |builder| builder.form(&form))
    }

    /// `POST /certificates/{id}/cancel`
    pub fn cancel_certificate(&self, id: &str) -> Result<Request> {
        self.build(Method::POST, &["certificates", id, "cancel"], |builder| {
            builder
        })
    }

    /// `POST /certificates/{id}/challenges`
    pub fn verify_domains(
        &self,
        cert_id: &str,
        method: ValidationMethod,
        email: Option<&str>,
    ) -> Result<Request> {
        let mut form = vec![("validation_method", method.as_str().to_string())];
        if let Some(email) = email.filter(|email| !email.is_empty()) {
            form.push(("validation_email", email.to_string()));
        }
        self.build(
            Method::POST,
            &["certificates", cert_id, "challenges"],
            |builder| builder.form(&form),
        )
    }

    /// `GET /certificates/{id}/status`
    pub fn verification_status(&self, cert_id: &str) -> Result<Request> {
        self.build(Method::GET, &["certificates", cert_id, "status"], |builder| {
            builder
        })
    }

    /// `GET /certificates/{id}/download/return`
    pub fn download_certificate_inline(
        &self,
        cert_id: &str,
        include_cross_signed: bool,
    ) -> Result<Request> {
        self.build(
            Method::GET,
            &["certificates", cert_id, "download", "return"],
            |builder| builder.query(&[("include_cross_signed", flag(include_cross_signed))]),
        )
    }

    /// `GET /certificates`
    ///
    /// Empty status and search filters are left out of the query.
    pub fn list_certificates(
        &self,
        statuses: &[CertStatus],
        search: Option<&str>,
        limit: u32,
        page: u32,
    ) -> Result<Request> {
        let mut query = Vec::with_capacity(4);
        if !statuses.is_empty() {
            let joined = statuses
                .iter()
                .map(CertStatus::as_str)
                .collect::<Vec<_>>()
                .join(",");
            query.push(("certificate_status", joined));
        }
        if let Some(search) = search.filter(|search| !search.is_empty()) {
            query.push(("search", search.to_string()));
        }
        query.push(("limit", limit.to_string()));
        query.push(("page", page.to_string()));

        self.build(Method::GET, &["certificates"], |builder| builder.query(&query))
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ZeroSslError::InvalidRequest(format!("base URL cannot carry a path: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut()
            .append_pair("access_key", self.api_key.expose_secret());
        Ok(url)
    }

    fn build<F>(&self, method: Method, segments: &[&str], customize: F) -> Result<Request>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let url = self.endpoint(segments)?;
        customize(self.http.request(method, url))
            .build()
            .map_err(|e| ZeroSslError::InvalidRequest(e.to_string()))
    }
}

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}
