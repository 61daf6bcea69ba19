/// ZeroSSL certificate and listing models
use crate::decode::{lenient_u32, null_as_default, Fields, Salvage};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Timestamp layout used by the `created` and `expires` fields
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Certificate status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CertStatus {
    /// Created, domains not yet submitted for verification
    Draft,
    /// Waiting for domain verification
    PendingValidation,
    /// Issued and valid
    Issued,
    /// Cancelled before or after issuance
    Cancelled,
    /// Issued, close to expiry
    ExpiringSoon,
    /// Past its expiry date
    Expired,
}

impl CertStatus {
    /// All statuses, in lifecycle order
    pub const ALL: [CertStatus; 6] = [
        CertStatus::Draft,
        CertStatus::PendingValidation,
        CertStatus::Issued,
        CertStatus::Cancelled,
        CertStatus::ExpiringSoon,
        CertStatus::Expired,
    ];

    /// Wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            CertStatus::Draft => "draft",
            CertStatus::PendingValidation => "pending_validation",
            CertStatus::Issued => "issued",
            CertStatus::Cancelled => "cancelled",
            CertStatus::ExpiringSoon => "expiring_soon",
            CertStatus::Expired => "expired",
        }
    }

    /// Issuance never finished (`draft` or `pending_validation`)
    pub fn is_unfinished(&self) -> bool {
        matches!(self, CertStatus::Draft | CertStatus::PendingValidation)
    }

    /// The certificate has left the issuance pipeline
    pub fn is_terminal(&self) -> bool {
        !self.is_unfinished()
    }
}

impl fmt::Display for CertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a status string the API does not define
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown certificate status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for CertStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CertStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A certificate as returned by the get, create and list endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CertificateInfo {
    /// Certificate hash id
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    /// Certificate type
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub cert_type: String,

    /// Primary domain
    #[serde(default, deserialize_with = "null_as_default")]
    pub common_name: String,

    /// Comma-separated additional domains
    #[serde(default, deserialize_with = "null_as_default")]
    pub additional_domains: String,

    /// Creation time, `YYYY-MM-DD HH:MM:SS` UTC
    #[serde(default, deserialize_with = "null_as_default")]
    pub created: String,

    /// Expiry time, `YYYY-MM-DD HH:MM:SS` UTC
    #[serde(default, deserialize_with = "null_as_default")]
    pub expires: String,

    /// Certificate status
    #[serde(default)]
    pub status: Option<CertStatus>,

    /// Validation method chosen for the certificate
    #[serde(default, deserialize_with = "null_as_default")]
    pub validation_type: String,

    /// Comma-separated validation emails
    #[serde(rename = "validation_email", default, deserialize_with = "null_as_default")]
    pub validation_emails: String,

    /// Id of the certificate this one replaces
    #[serde(default, deserialize_with = "null_as_default")]
    pub replacement_for: String,

    /// Per-domain validation details
    #[serde(
        default,
        deserialize_with = "validation_object",
        skip_serializing_if = "Option::is_none"
    )]
    pub validation: Option<ValidationInfo>,
}

impl CertificateInfo {
    /// Additional domains as a list
    pub fn additional_domain_list(&self) -> Vec<&str> {
        split_list(&self.additional_domains)
    }

    /// Common name followed by the additional domains
    pub fn domains(&self) -> Vec<&str> {
        let mut domains = split_list(&self.common_name);
        for domain in self.additional_domain_list() {
            if !domains.contains(&domain) {
                domains.push(domain);
            }
        }
        domains
    }

    /// Validation emails as a list
    pub fn validation_email_list(&self) -> Vec<&str> {
        split_list(&self.validation_emails)
    }

    /// Parsed creation time
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created)
    }

    /// Parsed expiry time
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.expires)
    }

    /// Whether issuance of this certificate never finished
    pub fn is_unfinished(&self) -> bool {
        self.status.is_some_and(|status| status.is_unfinished())
    }
}

impl Salvage for CertificateInfo {
    fn salvage(value: &Value, path: &str, degraded: &mut Vec<String>) -> Self {
        let mut fields = Fields::new(value, path, degraded);
        Self {
            id: fields.get("id"),
            cert_type: fields.get("type"),
            common_name: fields.get("common_name"),
            additional_domains: fields.get("additional_domains"),
            created: fields.get("created"),
            expires: fields.get("expires"),
            status: fields.get("status"),
            validation_type: fields.get("validation_type"),
            validation_emails: fields.get("validation_email"),
            replacement_for: fields.get("replacement_for"),
            validation: fields.get_with("validation", validation_object),
        }
    }
}

/// Domain validation details attached to a certificate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationInfo {
    /// Domain to candidate validation email addresses
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "HashMap::is_empty"
    )]
    pub email_validation: HashMap<String, Vec<String>>,

    /// Domain to HTTP file and CNAME validation details
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "HashMap::is_empty"
    )]
    pub other_methods: HashMap<String, OtherValidation>,
}

/// Read `validation` as an object or `null`
///
/// The derived impl would also take a JSON array, which the API sends for
/// some certificate states; that shape must fail so it is reported.
fn validation_object<'de, D>(deserializer: D) -> Result<Option<ValidationInfo>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Map<String, Value>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(object) => ValidationInfo::deserialize(Value::Object(object))
            .map(Some)
            .map_err(D::Error::custom),
    }
}

/// HTTP file and CNAME validation details for one domain
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtherValidation {
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_validation_url_http: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub file_validation_url_https: String,

    /// Lines the validation file must contain
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_validation_content: Vec<String>,

    /// CNAME record name
    #[serde(rename = "cname_validation_p1", default, deserialize_with = "null_as_default")]
    pub cname_validation_name: String,

    /// CNAME record target
    #[serde(rename = "cname_validation_p2", default, deserialize_with = "null_as_default")]
    pub cname_validation_target: String,
}

impl OtherValidation {
    /// Body to serve at the file validation URL
    pub fn file_validation_body(&self) -> String {
        self.file_validation_content.join("\n")
    }
}

/// One page of certificates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListCertsResult {
    /// Certificates matching the query across all pages
    #[serde(default)]
    pub total_count: u32,

    /// Certificates on this page
    #[serde(default)]
    pub result_count: u32,

    /// Page number; the API sends it as a number or a string
    #[serde(default, deserialize_with = "lenient_u32", skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Page size
    #[serde(default)]
    pub limit: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<CertificateInfo>,
}

impl ListCertsResult {
    /// Pages needed to enumerate every certificate at this page size
    pub fn pages_needed(&self) -> u32 {
        if self.limit == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.limit)
    }
}

impl Salvage for ListCertsResult {
    fn salvage(value: &Value, path: &str, degraded: &mut Vec<String>) -> Self {
        let mut fields = Fields::new(value, path, degraded);
        Self {
            total_count: fields.get("total_count"),
            result_count: fields.get("result_count"),
            page: fields.get_with("page", lenient_u32),
            limit: fields.get("limit"),
            results: fields.list("results"),
        }
    }
}

fn split_list(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::tolerant;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn certificate_json(validation: Value) -> Value {
        json!({
            "id": "a1b2c3",
            "type": "1",
            "common_name": "example.com",
            "additional_domains": "www.example.com,api.example.com",
            "created": "2024-03-01 10:20:30",
            "expires": "2024-05-30 23:59:59",
            "status": "pending_validation",
            "validation_type": "HTTP_CSR_HASH",
            "validation_email": "",
            "replacement_for": "",
            "validation": validation
        })
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&CertStatus::PendingValidation).unwrap();
        assert_eq!(json, "\"pending_validation\"");

        let status: CertStatus = serde_json::from_str("\"expiring_soon\"").unwrap();
        assert_eq!(status, CertStatus::ExpiringSoon);
    }

    #[test]
    fn test_status_rejects_unknown() {
        assert!(serde_json::from_str::<CertStatus>("\"revoked\"").is_err());
        assert_eq!(
            "revoked".parse::<CertStatus>(),
            Err(UnknownStatus("revoked".to_string()))
        );
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in CertStatus::ALL {
            assert_eq!(status.as_str().parse::<CertStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_unfinished_statuses() {
        let unfinished: Vec<_> = CertStatus::ALL
            .into_iter()
            .filter(CertStatus::is_unfinished)
            .collect();
        assert_eq!(
            unfinished,
            vec![CertStatus::Draft, CertStatus::PendingValidation]
        );
        assert!(CertStatus::Expired.is_terminal());
    }

    #[test]
    fn test_certificate_deserialization() {
        let value = certificate_json(json!({
            "other_methods": {
                "example.com": {
                    "file_validation_url_http": "http://example.com/.well-known/pki-validation/AB12.txt",
                    "file_validation_url_https": "https://example.com/.well-known/pki-validation/AB12.txt",
                    "file_validation_content": ["hash", "comodoca.com", "token"],
                    "cname_validation_p1": "_AB12.example.com",
                    "cname_validation_p2": "hash.token.sectigo.com"
                }
            }
        }));

        let cert: CertificateInfo = serde_json::from_value(value).unwrap();
        assert_eq!(cert.id, "a1b2c3");
        assert_eq!(cert.status, Some(CertStatus::PendingValidation));
        assert!(cert.is_unfinished());

        let validation = cert.validation.unwrap();
        let other = &validation.other_methods["example.com"];
        assert_eq!(other.cname_validation_name, "_AB12.example.com");
        assert_eq!(other.file_validation_body(), "hash\ncomodoca.com\ntoken");
        assert!(validation.email_validation.is_empty());
    }

    #[test]
    fn test_email_validation_deserialization() {
        let value = certificate_json(json!({
            "email_validation": {
                "example.com": ["admin@example.com", "webmaster@example.com"]
            },
            "other_methods": null
        }));

        let cert: CertificateInfo = serde_json::from_value(value).unwrap();
        let validation = cert.validation.unwrap();
        assert_eq!(validation.email_validation["example.com"].len(), 2);
        assert!(validation.other_methods.is_empty());
    }

    #[test]
    fn test_empty_array_validation_fails_strict_decode() {
        let value = certificate_json(json!([]));
        assert!(serde_json::from_value::<CertificateInfo>(value).is_err());
    }

    #[test]
    fn test_validation_rejects_non_object_shapes() {
        for shape in [json!([]), json!(["x"]), json!("none"), json!(0)] {
            let value = json!({"id": "a", "status": "draft", "validation": shape});
            assert!(
                serde_json::from_value::<CertificateInfo>(value).is_err(),
                "accepted validation: {}",
                shape
            );
        }
    }

    #[test]
    fn test_empty_object_validation_is_clean() {
        let body = serde_json::to_vec(&certificate_json(json!({}))).unwrap();
        let decoded: crate::Decoded<CertificateInfo> = tolerant(&body);

        assert!(!decoded.is_partial());
        assert_eq!(decoded.validation, Some(ValidationInfo::default()));
    }

    #[test]
    fn test_empty_array_validation_is_salvaged() {
        let body = serde_json::to_vec(&certificate_json(json!([]))).unwrap();
        let decoded: crate::Decoded<CertificateInfo> = tolerant(&body);

        assert!(decoded.is_partial());
        assert_eq!(decoded.degraded_fields(), ["validation"]);
        assert_eq!(decoded.id, "a1b2c3");
        assert_eq!(decoded.common_name, "example.com");
        assert_eq!(decoded.status, Some(CertStatus::PendingValidation));
        assert_eq!(decoded.validation_type, "HTTP_CSR_HASH");
        assert!(decoded.validation.is_none());
    }

    #[test]
    fn test_unknown_status_is_salvaged_as_missing() {
        let mut value = certificate_json(json!(null));
        value["status"] = json!("revoked");
        let body = serde_json::to_vec(&value).unwrap();

        let decoded: crate::Decoded<CertificateInfo> = tolerant(&body);
        assert_eq!(decoded.degraded_fields(), ["status"]);
        assert_eq!(decoded.status, None);
        assert!(!decoded.is_unfinished());
    }

    #[test]
    fn test_null_strings_decode_empty() {
        let cert: CertificateInfo = serde_json::from_value(json!({
            "id": "x",
            "status": "draft",
            "replacement_for": null,
            "validation": null
        }))
        .unwrap();

        assert_eq!(cert.replacement_for, "");
        assert!(cert.validation.is_none());
    }

    #[test]
    fn test_domain_helpers() {
        let cert: CertificateInfo =
            serde_json::from_value(certificate_json(json!(null))).unwrap();

        assert_eq!(
            cert.additional_domain_list(),
            vec!["www.example.com", "api.example.com"]
        );
        assert_eq!(
            cert.domains(),
            vec!["example.com", "www.example.com", "api.example.com"]
        );
        assert!(cert.validation_email_list().is_empty());
    }

    #[test]
    fn test_timestamps() {
        let cert: CertificateInfo =
            serde_json::from_value(certificate_json(json!(null))).unwrap();

        let created = cert.created_at().unwrap();
        assert_eq!((created.year(), created.month(), created.day()), (2024, 3, 1));
        assert_eq!(created.hour(), 10);

        let broken = CertificateInfo {
            expires: "soon".to_string(),
            ..cert
        };
        assert!(broken.expires_at().is_none());
    }

    #[test]
    fn test_list_page_as_string_or_number() {
        let numeric: ListCertsResult = serde_json::from_value(json!({
            "total_count": 3, "result_count": 2, "page": 1, "limit": 2, "results": []
        }))
        .unwrap();
        let text: ListCertsResult = serde_json::from_value(json!({
            "total_count": 3, "result_count": 2, "page": "1", "limit": 2, "results": []
        }))
        .unwrap();

        assert_eq!(numeric.page, Some(1));
        assert_eq!(text.page, Some(1));
        assert_eq!(numeric.pages_needed(), 2);
    }

    #[test]
    fn test_list_salvages_each_result() {
        let body = serde_json::to_vec(&json!({
            "total_count": 2,
            "result_count": 2,
            "page": 1,
            "limit": 100,
            "results": [
                certificate_json(json!([])),
                {"id": "b", "status": "issued", "validation": {"email_validation": {}}}
            ]
        }))
        .unwrap();

        let decoded: crate::Decoded<ListCertsResult> = tolerant(&body);
        assert_eq!(decoded.degraded_fields(), ["results[0].validation"]);
        assert_eq!(decoded.total_count, 2);
        assert_eq!(decoded.results.len(), 2);
        assert_eq!(decoded.results[0].id, "a1b2c3");
        assert_eq!(decoded.results[1].status, Some(CertStatus::Issued));
        assert!(decoded.results[1].validation.is_some());
    }

    #[test]
    fn test_pages_needed_with_zero_limit() {
        let page = ListCertsResult::default();
        assert_eq!(page.pages_needed(), 0);
    }
}
