/// Downloaded certificate material
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// PEM certificate and CA bundle returned by the inline download endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateContent {
    /// Leaf certificate, PEM
    #[serde(rename = "certificate.crt")]
    pub certificate: String,

    /// Intermediate chain, PEM
    #[serde(rename = "ca_bundle.crt", default)]
    pub ca_bundle: String,
}

impl CertificateContent {
    /// Leaf certificate followed by the CA bundle
    pub fn full_chain(&self) -> String {
        let mut chain = self.certificate.trim_end().to_string();
        let bundle = self.ca_bundle.trim();
        if !bundle.is_empty() {
            chain.push('\n');
            chain.push_str(bundle);
        }
        chain.push('\n');
        chain
    }

    /// Write `certificate.crt` and `ca_bundle.crt` into `dir`, creating it if needed
    ///
    /// Returns the paths of the two files.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<(PathBuf, PathBuf)> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let cert_path = dir.join("certificate.crt");
        let bundle_path = dir.join("ca_bundle.crt");

        fs::write(&cert_path, &self.certificate)?;
        fs::write(&bundle_path, &self.ca_bundle)?;

        Ok((cert_path, bundle_path))
    }
}
