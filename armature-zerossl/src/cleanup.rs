//! Removal of certificates whose issuance never finished.
//!
//! ZeroSSL keeps every draft and every certificate stuck waiting for domain
//! verification, and they count against the account's certificate quota.
//! The walker pages through the whole account and deletes those.
//!
//! The number of pages is recomputed from `total_count` after every page,
//! while matching certificates are being deleted. Deletions shift later
//! entries towards earlier pages, so a walk can skip certificates near a
//! page boundary; run it again to pick those up. When `total_count` is an
//! exact multiple of the page size one trailing empty page is fetched.

use crate::client::CertificateApi;
use crate::error::ZeroSslError;

/// Outcome of a cleanup walk
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Pages fetched successfully
    pub pages_visited: u32,

    /// Ids of the certificates deleted
    pub deleted: Vec<String>,

    /// Certificates whose deletion failed, with the error
    pub failed: Vec<(String, ZeroSslError)>,

    /// Listing error that stopped the walk early
    pub aborted: Option<ZeroSslError>,
}

impl CleanupReport {
    /// Every page was walked and every deletion succeeded
    pub fn is_complete(&self) -> bool {
        self.aborted.is_none() && self.failed.is_empty()
    }
}

/// Walk all certificates `page_size` at a time and delete the unfinished ones
///
/// Individual deletion failures are logged and recorded, and the walk goes
/// on. A listing failure ends the walk, since there is neither a page to
/// clean nor a total to continue from.
pub async fn clean_unfinished<A>(api: &A, page_size: u32) -> CleanupReport
where
    A: CertificateApi + ?Sized,
{
    let page_size = page_size.max(1);
    let mut report = CleanupReport::default();
    let mut page: u32 = 1;

    tracing::info!(page_size, "Cleaning unfinished certificates");

    loop {
        let listing = match api.list_certificates(&[], None, page_size, page).await {
            Ok(listing) => listing,
            Err(err) => {
                tracing::error!(page, error = %err, "Listing certificates failed, stopping cleanup");
                report.aborted = Some(err);
                break;
            }
        };
        report.pages_visited += 1;

        tracing::debug!(
            page,
            page_size,
            result_count = listing.result_count,
            total_count = listing.total_count,
            "Fetched certificate page"
        );
        if listing.is_partial() {
            tracing::warn!(
                page,
                degraded = ?listing.degraded_fields(),
                "Certificate page only partially decoded"
            );
        }

        for cert in listing.results.iter().filter(|cert| cert.is_unfinished()) {
            if cert.id.is_empty() {
                tracing::warn!(
                    common_name = %cert.common_name,
                    "Skipping unfinished certificate without an id"
                );
                continue;
            }

            tracing::info!(
                cert_id = %cert.id,
                common_name = %cert.common_name,
                status = ?cert.status,
                "Deleting unfinished certificate"
            );

            match api.delete_certificate(&cert.id).await {
                Ok(()) => report.deleted.push(cert.id.clone()),
                Err(err) => {
                    tracing::warn!(cert_id = %cert.id, error = %err, "Failed to delete certificate");
                    report.failed.push((cert.id.clone(), err));
                }
            }
        }

        page += 1;
        if page - 1 > listing.total_count / page_size {
            break;
        }
    }

    tracing::info!(
        pages = report.pages_visited,
        deleted = report.deleted.len(),
        failed = report.failed.len(),
        "Cleanup finished"
    );

    report
}
