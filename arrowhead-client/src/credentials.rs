//! PKCS#12 client credentials for mutual TLS with the Core.

use std::fmt;
use std::path::{Path, PathBuf};
use reqwest::{Certificate, Identity};
use serde::{Deserialize, Serialize};
use crate::error::{ClientError, Result};

/// Paths to the files identifying a system to the Core.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pkcs12Credentials {
    /// Client certificate and private key bundle (`.p12`)
    pub p12file: PathBuf,
    /// Password of the bundle
    pub p12pass: String,
    /// Public key (`.pub`), announced as `authenticationInfo`
    pub pubfile: PathBuf,
    /// Certificate authority used to verify the Core (PEM or DER)
    pub cafile: PathBuf,
}

impl fmt::Debug for Pkcs12Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pkcs12Credentials")
            .field("p12file", &self.p12file)
            .field("p12pass", &"<redacted>")
            .field("pubfile", &self.pubfile)
            .field("cafile", &self.cafile)
            .finish()
    }
}

impl Pkcs12Credentials {
    pub fn new(
        p12file: impl Into<PathBuf>,
        p12pass: impl Into<String>,
        pubfile: impl Into<PathBuf>,
        cafile: impl Into<PathBuf>,
    ) -> Self {
        Self {
            p12file: p12file.into(),
            p12pass: p12pass.into(),
            pubfile: pubfile.into(),
            cafile: cafile.into(),
        }
    }

    /// Client identity decoded from the PKCS#12 bundle
    pub fn identity(&self) -> Result<Identity> {
        let der = read(&self.p12file)?;
        Identity::from_pkcs12_der(&der, &self.p12pass).map_err(|e| {
            ClientError::Certificate(format!("{}: {}", self.p12file.display(), e))
        })
    }

    /// Trust root for the Core's server certificate
    pub fn ca_certificate(&self) -> Result<Certificate> {
        let raw = read(&self.cafile)?;
        let parsed = if raw.starts_with(b"-----BEGIN") {
            Certificate::from_pem(&raw)
        } else {
            Certificate::from_der(&raw)
        };
        parsed.map_err(|e| ClientError::Certificate(format!("{}: {}", self.cafile.display(), e)))
    }

    /// Public key as a single line, ready for `authenticationInfo`
    pub fn public_key(&self) -> Result<String> {
        let raw = read(&self.pubfile)?;
        Ok(normalize_public_key(&String::from_utf8_lossy(&raw)))
    }
}

/// Strip PEM armor and line breaks from a public key file.
pub fn normalize_public_key(pem: &str) -> String {
    pem.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("-----"))
        .collect()
}

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| ClientError::Io {
        path: path.to_path_buf(),
        source,
    })
}
