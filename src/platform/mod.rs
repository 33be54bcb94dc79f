//! Platform abstraction for the OS certificate store.

use std::fs;
use std::path::{Path, PathBuf};

#[cfg(unix)]
pub mod unix;

#[cfg(windows)]
pub mod windows;

use crate::cert::{self, CertificateRecord};
use crate::config::CertsyncPaths;
use crate::error::{Error, Result};
use crate::resource::StoreAddress;
use crate::thumbprint::Thumbprint;

/// Narrow interface over a certificate store: lookup, insert, delete.
///
/// `find` returns `Ok(None)` for not-found; only an inaccessible
/// container is an error. `remove` of a non-matching thumbprint is a
/// successful no-op. Implementations own atomicity of single-entry
/// insert/delete; no locking happens above this trait.
pub trait CertStore: Send + Sync {
    /// Look up a certificate by thumbprint within the addressed container.
    fn find(
        &self,
        thumbprint: &Thumbprint,
        address: &StoreAddress,
    ) -> Result<Option<CertificateRecord>>;

    /// Decode the certificate file and insert it into the container.
    fn import(&self, address: &StoreAddress, source: &Path) -> Result<()>;

    /// Delete a certificate by thumbprint; absent entries are a no-op.
    fn remove(&self, thumbprint: &Thumbprint, address: &StoreAddress) -> Result<()>;
}

/// Get the certificate store implementation for this host.
/// If CERTSYNC_STORE_DIR is set (e.g. in tests), uses FileCertStore there.
/// An explicit CERTSYNC_HOME marks a dev setup and keeps the store under
/// its `store` directory instead of touching the OS store.
pub fn default_cert_store() -> Box<dyn CertStore> {
    if let Ok(dir) = std::env::var("CERTSYNC_STORE_DIR") {
        return Box::new(FileCertStore::new(dir));
    }
    if std::env::var("CERTSYNC_HOME").is_ok() {
        return Box::new(FileCertStore::new(CertsyncPaths::default_paths().store_dir));
    }
    #[cfg(unix)]
    return Box::new(unix::UnixCertStore);

    #[cfg(windows)]
    return Box::new(windows::WindowsCertStore);
}

/// Directory-backed store: one DER file per certificate at
/// `{base}/{location}/{store}/{THUMBPRINT}.cer`, named by SHA-1
/// thumbprint. Used for tests and as the dev-mode store.
#[derive(Clone)]
pub struct FileCertStore {
    base: PathBuf,
}

impl FileCertStore {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Directory backing one (location, store) container.
    pub fn container_dir(&self, address: &StoreAddress) -> PathBuf {
        self.base
            .join(address.location.to_string())
            .join(&address.store)
    }

    fn store_access(address: &StoreAddress, e: std::io::Error) -> Error {
        Error::StoreAccess {
            store_path: address.store_path(),
            reason: e.to_string(),
        }
    }

    /// Locate the file holding the certificate with this thumbprint.
    ///
    /// Fast path is the SHA-1 file name; the scan fallback matches
    /// SHA-256 thumbprints against each entry's DER bytes.
    fn find_file(
        &self,
        thumbprint: &Thumbprint,
        address: &StoreAddress,
    ) -> Result<Option<PathBuf>> {
        let dir = self.container_dir(address);
        if !dir.exists() {
            // An absent container reads as an empty store.
            return Ok(None);
        }

        let named = dir.join(format!("{thumbprint}.cer"));
        if named.is_file() {
            return Ok(Some(named));
        }

        let entries = fs::read_dir(&dir).map_err(|e| Self::store_access(address, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| Self::store_access(address, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let der = match fs::read(&path) {
                Ok(b) => b,
                Err(e) => return Err(Self::store_access(address, e)),
            };
            if cert::sha1_thumbprint(&der) == *thumbprint
                || cert::sha256_thumbprint(&der) == *thumbprint
            {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }
}

impl CertStore for FileCertStore {
    fn find(
        &self,
        thumbprint: &Thumbprint,
        address: &StoreAddress,
    ) -> Result<Option<CertificateRecord>> {
        let Some(path) = self.find_file(thumbprint, address)? else {
            return Ok(None);
        };
        let der = fs::read(&path).map_err(|e| Self::store_access(address, e))?;
        let record = cert::record_from_der(&der).map_err(|e| Error::StoreAccess {
            store_path: address.store_path(),
            reason: format!("corrupt store entry {}: {e}", path.display()),
        })?;
        Ok(Some(record))
    }

    fn import(&self, address: &StoreAddress, source: &Path) -> Result<()> {
        let (der, record) = cert::read_certificate(source).map_err(|e| Error::Import {
            path: source.to_path_buf(),
            store_path: address.store_path(),
            reason: e.to_string(),
        })?;

        let dir = self.container_dir(address);
        fs::create_dir_all(&dir).map_err(|e| Self::store_access(address, e))?;
        let dest = dir.join(format!("{}.cer", record.thumbprint));
        fs::write(&dest, &der).map_err(|e| Error::Import {
            path: source.to_path_buf(),
            store_path: address.store_path(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    fn remove(&self, thumbprint: &Thumbprint, address: &StoreAddress) -> Result<()> {
        if let Some(path) = self.find_file(thumbprint, address)? {
            fs::remove_file(&path).map_err(|e| Self::store_access(address, e))?;
        }
        Ok(())
    }
}
