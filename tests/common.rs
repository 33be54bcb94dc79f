//! Shared test helpers.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

use certsync::cert::{self, CertificateRecord};
use certsync::error::{Error, Result};
use certsync::platform::CertStore;
use certsync::resource::{DesiredState, Location, Presence, StoreAddress};
use certsync::thumbprint::Thumbprint;

/// Create a temp directory for use as CERTSYNC_HOME or a store base.
/// Uses current dir (workspace) so sandbox allows full access.
pub fn temp_home() -> TempDir {
    tempfile::Builder::new()
        .prefix("certsync_test_")
        .tempdir_in(std::env::current_dir().unwrap_or_else(|_| std::path::Path::new(".").into()))
        .expect("temp dir")
}

/// Write a self-signed PEM certificate to `path`; returns its SHA-1 thumbprint.
pub fn write_test_cert(path: &Path, common_name: &str) -> Thumbprint {
    let key = rcgen::KeyPair::generate().expect("generate key");
    let mut params = rcgen::CertificateParams::default();
    params.distinguished_name = rcgen::DistinguishedName::new();
    params.distinguished_name.push(
        rcgen::DnType::CommonName,
        rcgen::DnValue::Utf8String(common_name.to_string()),
    );
    let cert = params.self_signed(&key).expect("self-sign");
    std::fs::write(path, cert.pem()).expect("write cert");

    let der = cert::read_certificate_der(path).expect("re-read cert");
    cert::sha1_thumbprint(&der)
}

/// StoreAddress for LocalMachine\My (the common default in tests).
pub fn machine_my() -> StoreAddress {
    StoreAddress::new(Location::LocalMachine, "My").unwrap()
}

pub fn desired(
    thumbprint: Thumbprint,
    source: impl Into<PathBuf>,
    address: StoreAddress,
    presence: Presence,
) -> DesiredState {
    DesiredState {
        thumbprint,
        source: source.into(),
        address,
        presence,
    }
}

/// In-memory store fake: tracks thumbprints per container and counts probes.
pub struct MemoryCertStore {
    entries: Mutex<HashMap<String, Vec<Thumbprint>>>,
    pub finds: Mutex<usize>,
}

impl MemoryCertStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            finds: Mutex::new(0),
        }
    }

    /// Seed a thumbprint without going through a source file.
    pub fn seed(&self, address: &StoreAddress, thumbprint: Thumbprint) {
        self.entries
            .lock()
            .unwrap()
            .entry(address.store_path())
            .or_default()
            .push(thumbprint);
    }

    pub fn contains(&self, address: &StoreAddress, thumbprint: &Thumbprint) -> bool {
        self.entries
            .lock()
            .unwrap()
            .get(&address.store_path())
            .is_some_and(|v| v.contains(thumbprint))
    }

    pub fn find_count(&self) -> usize {
        *self.finds.lock().unwrap()
    }
}

impl CertStore for MemoryCertStore {
    fn find(
        &self,
        thumbprint: &Thumbprint,
        address: &StoreAddress,
    ) -> Result<Option<CertificateRecord>> {
        *self.finds.lock().unwrap() += 1;
        let found = self.contains(address, thumbprint);
        Ok(found.then(|| CertificateRecord {
            thumbprint: thumbprint.clone(),
            subject: String::new(),
            not_after: None,
        }))
    }

    fn import(&self, address: &StoreAddress, source: &Path) -> Result<()> {
        let (_, record) = cert::read_certificate(source).map_err(|e| Error::Import {
            path: source.to_path_buf(),
            store_path: address.store_path(),
            reason: e.to_string(),
        })?;
        let mut entries = self.entries.lock().unwrap();
        let container = entries.entry(address.store_path()).or_default();
        if !container.contains(&record.thumbprint) {
            container.push(record.thumbprint);
        }
        Ok(())
    }

    fn remove(&self, thumbprint: &Thumbprint, address: &StoreAddress) -> Result<()> {
        if let Some(container) = self.entries.lock().unwrap().get_mut(&address.store_path()) {
            container.retain(|t| t != thumbprint);
        }
        Ok(())
    }
}
