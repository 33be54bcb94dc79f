//! Certificate file decoding and thumbprint computation.
//!
//! Source files may be PEM (first CERTIFICATE block is used) or raw DER.
//! Thumbprints are digests of the DER encoding, matching how OS stores
//! identify entries.

use anyhow::{Context, Result};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use x509_parser::prelude::FromDer;

use crate::thumbprint::Thumbprint;

/// Minimal metadata for a certificate found in a store or file.
#[derive(Debug, Clone)]
pub struct CertificateRecord {
    pub thumbprint: Thumbprint,
    pub subject: String,
    pub not_after: Option<time::OffsetDateTime>,
}

/// Read a certificate file and return its DER bytes.
pub fn read_certificate_der(path: &Path) -> Result<Vec<u8>> {
    let bytes =
        fs::read(path).with_context(|| format!("read certificate: {}", path.display()))?;

    if bytes.starts_with(b"-----BEGIN") {
        let der = rustls_pemfile::certs(&mut bytes.as_slice())
            .next()
            .and_then(|r| r.ok())
            .with_context(|| format!("no certificate in PEM file: {}", path.display()))?;
        return Ok(der.as_ref().to_vec());
    }

    // Raw DER; reject files that do not parse as a certificate.
    x509_parser::certificate::X509Certificate::from_der(&bytes)
        .map_err(|e| anyhow::anyhow!("parse DER certificate {}: {e:?}", path.display()))?;
    Ok(bytes)
}

/// SHA-1 thumbprint of DER bytes (the conventional store identity).
pub fn sha1_thumbprint(der: &[u8]) -> Thumbprint {
    Thumbprint::from_digest(&Sha1::digest(der))
}

/// SHA-256 thumbprint of DER bytes.
pub fn sha256_thumbprint(der: &[u8]) -> Thumbprint {
    Thumbprint::from_digest(&Sha256::digest(der))
}

/// Parse DER bytes into a metadata record (SHA-1 thumbprint).
pub fn record_from_der(der: &[u8]) -> Result<CertificateRecord> {
    let (_, cert) = x509_parser::certificate::X509Certificate::from_der(der)
        .map_err(|e| anyhow::anyhow!("parse X.509: {e:?}"))?;

    let not_after =
        time::OffsetDateTime::from_unix_timestamp(cert.validity().not_after.timestamp()).ok();

    Ok(CertificateRecord {
        thumbprint: sha1_thumbprint(der),
        subject: cert.subject().to_string(),
        not_after,
    })
}

/// Read a certificate file and return its DER bytes plus metadata.
pub fn read_certificate(path: &Path) -> Result<(Vec<u8>, CertificateRecord)> {
    let der = read_certificate_der(path)?;
    let record = record_from_der(&der)?;
    Ok((der, record))
}
