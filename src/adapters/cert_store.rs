//! Certificate store: loads the broker's mutual-TLS credentials.
//!
//! On ESP-IDF targets the three PEM artifacts live as blobs in the `certs`
//! NVS namespace.  On simulation targets they are read from a directory
//! using the file names the IoT console hands out.
//!
//! ## Layout
//!
//! | Artifact        | NVS key       | File                  |
//! |-----------------|---------------|-----------------------|
//! | client key      | `private_key` | `private.pem.key`     |
//! | client cert     | `client_cert` | `certificate.pem.crt` |
//! | trusted root CA | `root_ca`     | `AmazonRootCA1.pem`   |
//!
//! Every artifact must be PEM-framed with a non-empty body.  Loaded buffers
//! are NUL-terminated for mbedTLS.

use log::{info, warn};

use crate::error::CommsError;

/// Maximum certificate size (PEM format, includes headers).
const MAX_CERT_SIZE: usize = 4096;

/// Maximum private key size (room for RSA-4096).
const MAX_KEY_SIZE: usize = 4096;

/// NVS namespace holding the blobs.
pub const CERT_NAMESPACE: &str = "certs";

/// One of the three credential artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    PrivateKey,
    ClientCert,
    RootCa,
}

impl Artifact {
    pub const ALL: [Artifact; 3] = [Self::PrivateKey, Self::ClientCert, Self::RootCa];

    pub fn nvs_key(self) -> &'static str {
        match self {
            Self::PrivateKey => "private_key",
            Self::ClientCert => "client_cert",
            Self::RootCa => "root_ca",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::PrivateKey => "private.pem.key",
            Self::ClientCert => "certificate.pem.crt",
            Self::RootCa => "AmazonRootCA1.pem",
        }
    }
}

/// Container for loaded certificate material.
pub struct CertBundle {
    /// Client private key (PEM-encoded, NUL-terminated for mbedTLS).
    pub private_key: heapless::Vec<u8, MAX_KEY_SIZE>,
    /// Client certificate (PEM-encoded, NUL-terminated for mbedTLS).
    pub client_cert: heapless::Vec<u8, MAX_CERT_SIZE>,
    /// Trusted root CA (PEM-encoded, NUL-terminated for mbedTLS).
    pub root_ca: heapless::Vec<u8, MAX_CERT_SIZE>,
}

impl core::fmt::Debug for CertBundle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CertBundle")
            .field("private_key", &"<redacted>")
            .field("client_cert_len", &self.client_cert.len())
            .field("root_ca_len", &self.root_ca.len())
            .finish()
    }
}

/// Check PEM framing: a `-----BEGIN` line, a non-blank body, an `-----END` line.
pub fn validate_pem(data: &[u8]) -> bool {
    let Ok(text) = core::str::from_utf8(data) else {
        return false;
    };
    let text = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    if !text.starts_with("-----BEGIN") {
        return false;
    }
    let Some(header_end) = text.find('\n') else {
        return false;
    };
    let Some(footer) = text.rfind("-----END") else {
        return false;
    };
    footer > header_end && !text[header_end..footer].trim().is_empty()
}

/// Copy a validated artifact into a fixed buffer, NUL-terminated.
fn nul_terminated<const N: usize>(
    artifact: Artifact,
    data: &[u8],
) -> Result<heapless::Vec<u8, N>, CommsError> {
    if !validate_pem(data) {
        warn!("CertStore: '{}' is not a PEM artifact", artifact.nvs_key());
        return Err(CommsError::CredentialsMissing);
    }
    let body = data.strip_suffix(&[0]).unwrap_or(data);
    let mut buf = heapless::Vec::new();
    if buf.extend_from_slice(body).is_err() || buf.push(0).is_err() {
        warn!("CertStore: '{}' exceeds {} bytes", artifact.nvs_key(), N);
        return Err(CommsError::CredentialsMissing);
    }
    Ok(buf)
}

/// Certificate store adapter.
pub struct CertStore {
    #[cfg(target_os = "espidf")]
    partition: esp_idf_svc::nvs::EspDefaultNvsPartition,
    #[cfg(not(target_os = "espidf"))]
    dir: std::path::PathBuf,
}

impl CertStore {
    #[cfg(target_os = "espidf")]
    pub fn new(partition: esp_idf_svc::nvs::EspDefaultNvsPartition) -> Self {
        Self { partition }
    }

    /// Simulation: read the artifacts from `dir`.
    #[cfg(not(target_os = "espidf"))]
    pub fn new(dir: impl Into<std::path::PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load and validate all three artifacts.  Any missing or malformed
    /// artifact fails the whole bundle.
    pub fn load_bundle(&self) -> Result<CertBundle, CommsError> {
        let bundle = CertBundle {
            private_key: nul_terminated(Artifact::PrivateKey, &self.read(Artifact::PrivateKey)?)?,
            client_cert: nul_terminated(Artifact::ClientCert, &self.read(Artifact::ClientCert)?)?,
            root_ca: nul_terminated(Artifact::RootCa, &self.read(Artifact::RootCa)?)?,
        };

        info!(
            "CertStore: loaded certificate bundle (key={}B, cert={}B, ca={}B)",
            bundle.private_key.len(),
            bundle.client_cert.len(),
            bundle.root_ca.len(),
        );
        Ok(bundle)
    }

    fn read(&self, artifact: Artifact) -> Result<Vec<u8>, CommsError> {
        self.platform_read(artifact).ok_or_else(|| {
            warn!("CertStore: '{}' not found", artifact.nvs_key());
            CommsError::CredentialsMissing
        })
    }

    // ── Platform-specific loading ────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_read(&self, artifact: Artifact) -> Option<Vec<u8>> {
        use esp_idf_svc::nvs::EspNvs;

        let nvs = EspNvs::new(self.partition.clone(), CERT_NAMESPACE, false).ok()?;
        let mut buf = vec![0u8; MAX_CERT_SIZE.max(MAX_KEY_SIZE)];
        let len = nvs.get_blob(artifact.nvs_key(), &mut buf).ok()??.len();
        buf.truncate(len);
        Some(buf)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_read(&self, artifact: Artifact) -> Option<Vec<u8>> {
        std::fs::read(self.dir.join(artifact.file_name())).ok()
    }
}

// ── Tests ────────────────────────────────────────────────────
