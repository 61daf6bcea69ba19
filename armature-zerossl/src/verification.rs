/// Domain verification types
use crate::certificate::CertStatus;
use crate::decode::{flag, null_as_default};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// How domain ownership is proven to ZeroSSL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationMethod {
    /// Approval link sent to one of the domain's admin addresses
    Email,
    /// CNAME record derived from the CSR hash
    CnameCsrHash,
    /// File served over HTTP
    HttpCsrHash,
    /// File served over HTTPS
    HttpsCsrHash,
}

impl ValidationMethod {
    /// Wire name of the method
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationMethod::Email => "EMAIL",
            ValidationMethod::CnameCsrHash => "CNAME_CSR_HASH",
            ValidationMethod::HttpCsrHash => "HTTP_CSR_HASH",
            ValidationMethod::HttpsCsrHash => "HTTPS_CSR_HASH",
        }
    }
}

impl fmt::Display for ValidationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Certificate state returned after requesting domain verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyDomainsResult {
    pub id: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub common_name: String,

    pub status: CertStatus,

    #[serde(default, deserialize_with = "null_as_default")]
    pub validation_type: String,

    #[serde(rename = "validation_email", default, deserialize_with = "null_as_default")]
    pub validation_emails: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub created: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub expires: String,
}

/// Verification progress of a certificate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationStatusResult {
    /// Every domain has been verified
    #[serde(deserialize_with = "flag")]
    pub validation_completed: bool,

    /// Per-domain verification state
    #[serde(default, deserialize_with = "null_as_default")]
    pub details: HashMap<String, DomainVerification>,
}

impl VerificationStatusResult {
    /// Domains whose verification has not succeeded yet, sorted
    pub fn pending_domains(&self) -> Vec<&str> {
        let mut pending: Vec<&str> = self
            .details
            .iter()
            .filter(|(_, detail)| !detail.is_verified())
            .map(|(domain, _)| domain.as_str())
            .collect();
        pending.sort_unstable();
        pending
    }
}

/// Verification state of one domain
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainVerification {
    #[serde(default, deserialize_with = "null_as_default")]
    pub method: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
}

impl DomainVerification {
    /// Whether the API reports the domain as verified
    pub fn is_verified(&self) -> bool {
        self.status.eq_ignore_ascii_case("verified")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_method_names() {
        assert_eq!(ValidationMethod::Email.as_str(), "EMAIL");
        assert_eq!(
            serde_json::to_string(&ValidationMethod::HttpsCsrHash).unwrap(),
            "\"HTTPS_CSR_HASH\""
        );
        assert_eq!(ValidationMethod::CnameCsrHash.to_string(), "CNAME_CSR_HASH");
    }

    #[test]
    fn test_verify_domains_ignores_validation_shape() {
        let result: VerifyDomainsResult = serde_json::from_value(json!({
            "id": "abc",
            "common_name": "example.com",
            "status": "pending_validation",
            "validation_type": "EMAIL",
            "validation_email": "admin@example.com",
            "validation": []
        }))
        .unwrap();

        assert_eq!(result.status, CertStatus::PendingValidation);
        assert_eq!(result.validation_emails, "admin@example.com");
    }

    #[test]
    fn test_verify_domains_requires_status() {
        let result = serde_json::from_value::<VerifyDomainsResult>(json!({"id": "abc"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_verification_status() {
        let status: VerificationStatusResult = serde_json::from_value(json!({
            "validation_completed": 0,
            "details": {
                "example.com": {"method": "HTTP_CSR_HASH", "status": "verified"},
                "www.example.com": {"method": "HTTP_CSR_HASH", "status": "pending"}
            }
        }))
        .unwrap();

        assert!(!status.validation_completed);
        assert_eq!(status.pending_domains(), vec!["www.example.com"]);
    }

    #[test]
    fn test_verification_status_completed_without_details() {
        let status: VerificationStatusResult =
            serde_json::from_value(json!({"validation_completed": 1})).unwrap();

        assert!(status.validation_completed);
        assert!(status.pending_domains().is_empty());
    }
}
