//! # Armature ZeroSSL
//!
//! Client for the [ZeroSSL REST API](https://zerossl.com/documentation/api/):
//! create certificates, verify domain ownership, download the issued PEM
//! material, and clean up certificates whose issuance never finished.
//!
//! ## Features
//!
//! - ✅ **Certificate Lifecycle** - Create, fetch, list, download and cancel certificates
//! - ✅ **Domain Verification** - Email, HTTP/HTTPS file and CNAME validation
//! - ✅ **Tolerant Decoding** - Certificates with an oddly shaped `validation` field stay readable
//! - ✅ **Cleanup** - Remove drafts and certificates stuck in `pending_validation`
//!
//! ## Quick Start
//!
//! ```no_run
//! use armature_zerossl::{ValidationMethod, ZeroSslClient, ZeroSslConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ZeroSslClient::new(ZeroSslConfig::new("my-access-key"))?;
//!
//!     let csr = std::fs::read_to_string("example.com.csr")?;
//!     let cert = client
//!         .create_certificate(&["example.com".to_string()], &csr, 90, true)
//!         .await?;
//!
//!     // Serve the file from `validation.other_methods` first
//!     client
//!         .verify_domains(&cert.id, ValidationMethod::HttpCsrHash, None)
//!         .await?;
//!
//!     let status = client.verification_status(&cert.id).await?;
//!     if status.validation_completed {
//!         let content = client.download_certificate(&cert.id, false).await?;
//!         content.save("./certs")?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Tolerant Decoding
//!
//! ZeroSSL sends the `validation` object of a certificate as an empty array
//! for some certificate states. [`ZeroSslClient::get_certificate`] and
//! [`ZeroSslClient::list_certificates`] still return every field that could be
//! read and flag the result as partial:
//!
//! ```no_run
//! # use armature_zerossl::{ZeroSslClient, ZeroSslConfig};
//! # async fn example(client: ZeroSslClient) -> Result<(), Box<dyn std::error::Error>> {
//! let cert = client.get_certificate("a1b2c3").await?;
//! if cert.is_partial() {
//!     println!("could not read {:?}", cert.degraded_fields());
//! }
//! println!("{} is {:?}", cert.common_name, cert.status);
//! # Ok(())
//! # }
//! ```
//!
//! All other operations decode strictly and return
//! [`ZeroSslError::Decode`] on a shape mismatch.
//!
//! ## Cleaning Up
//!
//! ```no_run
//! # use armature_zerossl::{ZeroSslClient, ZeroSslConfig};
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ZeroSslClient::new(ZeroSslConfig::new("my-access-key"))?;
//!
//! let report = client.clean_unfinished().await;
//! println!("deleted {} certificates", report.deleted.len());
//! for (id, err) in &report.failed {
//!     eprintln!("could not delete {}: {}", id, err);
//! }
//! # Ok(())
//! # }
//! ```

pub mod certificate;
pub mod cleanup;
pub mod client;
pub mod config;
pub mod content;
pub mod decode;
pub mod error;
pub mod request;
pub mod verification;

pub use certificate::*;
pub use cleanup::{clean_unfinished, CleanupReport};
pub use client::*;
pub use config::*;
pub use content::*;
pub use decode::Decoded;
pub use error::*;
pub use request::*;
pub use verification::*;
