//! Unix (macOS, Linux) certificate store implementations.

use std::path::Path;

use super::CertStore;
use crate::cert::CertificateRecord;
use crate::error::Result;
use crate::resource::StoreAddress;
use crate::thumbprint::Thumbprint;

pub struct UnixCertStore;

/// Match a thumbprint against `security find-certificate -Z` output,
/// which prints a `SHA-1 hash:` and a `SHA-256 hash:` line per entry.
pub fn security_output_lists_thumbprint(output: &str, thumbprint: &Thumbprint) -> bool {
    output.lines().any(|l| {
        let l = l.trim_start();
        l.strip_prefix("SHA-1 hash: ")
            .or_else(|| l.strip_prefix("SHA-256 hash: "))
            .is_some_and(|h| h.trim().eq_ignore_ascii_case(thumbprint.as_str()))
    })
}

#[cfg(target_os = "macos")]
mod keychain {
    use super::*;
    use crate::error::Error;
    use std::process::Command;

    /// Keychain file for a store location. Store names do not map to
    /// separate containers on macOS; the keychain is the container.
    pub fn keychain_path(address: &StoreAddress) -> String {
        match address.location {
            crate::resource::Location::LocalMachine => {
                "/Library/Keychains/System.keychain".to_string()
            }
            crate::resource::Location::CurrentUser => {
                let home = std::env::var("HOME").unwrap_or_default();
                format!("{home}/Library/Keychains/login.keychain-db")
            }
        }
    }

    pub fn find(
        thumbprint: &Thumbprint,
        address: &StoreAddress,
    ) -> Result<Option<CertificateRecord>> {
        let output = Command::new("security")
            .args(["find-certificate", "-a", "-Z", &keychain_path(address)])
            .output()
            .map_err(|e| Error::StoreAccess {
                store_path: address.store_path(),
                reason: format!("security find-certificate: {e}"),
            })?;
        if !output.status.success() {
            return Err(Error::StoreAccess {
                store_path: address.store_path(),
                reason: "security find-certificate failed".to_string(),
            });
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let found = super::security_output_lists_thumbprint(&stdout, thumbprint);
        Ok(found.then(|| CertificateRecord {
            thumbprint: thumbprint.clone(),
            subject: String::new(),
            not_after: None,
        }))
    }

    pub fn import(address: &StoreAddress, source: &Path) -> Result<()> {
        let status = Command::new("security")
            .args(["add-certificates", "-k", &keychain_path(address)])
            .arg(source)
            .status()
            .map_err(|e| Error::Import {
                path: source.to_path_buf(),
                store_path: address.store_path(),
                reason: format!("security add-certificates: {e}"),
            })?;
        if !status.success() {
            return Err(Error::Import {
                path: source.to_path_buf(),
                store_path: address.store_path(),
                reason: "security add-certificates failed".to_string(),
            });
        }
        Ok(())
    }

    pub fn remove(thumbprint: &Thumbprint, address: &StoreAddress) -> Result<()> {
        // delete-certificate errors on a missing entry; probe first so
        // removal stays a no-op when nothing matches.
        if find(thumbprint, address)?.is_none() {
            return Ok(());
        }
        let status = Command::new("security")
            .args([
                "delete-certificate",
                "-Z",
                thumbprint.as_str(),
                &keychain_path(address),
            ])
            .status()
            .map_err(|e| Error::StoreAccess {
                store_path: address.store_path(),
                reason: format!("security delete-certificate: {e}"),
            })?;
        if !status.success() {
            return Err(Error::StoreAccess {
                store_path: address.store_path(),
                reason: "security delete-certificate failed".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(not(target_os = "macos"))]
mod linux {
    use super::*;
    use crate::platform::FileCertStore;

    /// Linux keeps DER files under a certsync-owned directory,
    /// machine-wide or per-user by location.
    pub fn backing_store(address: &StoreAddress) -> FileCertStore {
        match address.location {
            crate::resource::Location::LocalMachine => {
                FileCertStore::new("/var/lib/certsync/store")
            }
            crate::resource::Location::CurrentUser => {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                FileCertStore::new(format!("{home}/.local/share/certsync/store"))
            }
        }
    }
}

impl CertStore for UnixCertStore {
    fn find(
        &self,
        thumbprint: &Thumbprint,
        address: &StoreAddress,
    ) -> Result<Option<CertificateRecord>> {
        #[cfg(target_os = "macos")]
        return keychain::find(thumbprint, address);

        #[cfg(not(target_os = "macos"))]
        return linux::backing_store(address).find(thumbprint, address);
    }

    fn import(&self, address: &StoreAddress, source: &Path) -> Result<()> {
        #[cfg(target_os = "macos")]
        return keychain::import(address, source);

        #[cfg(not(target_os = "macos"))]
        return linux::backing_store(address).import(address, source);
    }

    fn remove(&self, thumbprint: &Thumbprint, address: &StoreAddress) -> Result<()> {
        #[cfg(target_os = "macos")]
        return keychain::remove(thumbprint, address);

        #[cfg(not(target_os = "macos"))]
        return linux::backing_store(address).remove(thumbprint, address);
    }
}
