//! Windows certificate store implementation (certutil).

use std::path::Path;
use std::process::Command;

use super::CertStore;
use crate::cert::CertificateRecord;
use crate::error::{Error, Result};
use crate::resource::{Location, StoreAddress};
use crate::thumbprint::Thumbprint;

pub struct WindowsCertStore;

/// certutil scopes to CurrentUser with -user; LocalMachine is the default.
fn location_args(location: Location) -> &'static [&'static str] {
    match location {
        Location::CurrentUser => &["-user"],
        Location::LocalMachine => &[],
    }
}

impl CertStore for WindowsCertStore {
    fn find(
        &self,
        thumbprint: &Thumbprint,
        address: &StoreAddress,
    ) -> Result<Option<CertificateRecord>> {
        // certutil -store <name> <thumbprint> exits non-zero both for
        // "no such cert" and "no such store"; stderr tells them apart.
        let output = Command::new("certutil")
            .args(location_args(address.location))
            .args(["-store", &address.store, thumbprint.as_str()])
            .output()
            .map_err(|e| Error::StoreAccess {
                store_path: address.store_path(),
                reason: format!("certutil -store: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("system cannot find") || stderr.contains("does not exist") {
                return Err(Error::StoreAccess {
                    store_path: address.store_path(),
                    reason: stderr.trim().to_string(),
                });
            }
            return Ok(None);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let subject = stdout
            .lines()
            .find_map(|l| l.trim().strip_prefix("Subject: "))
            .unwrap_or_default()
            .to_string();

        Ok(Some(CertificateRecord {
            thumbprint: thumbprint.clone(),
            subject,
            not_after: None,
        }))
    }

    fn import(&self, address: &StoreAddress, source: &Path) -> Result<()> {
        let status = Command::new("certutil")
            .args(location_args(address.location))
            .args(["-addstore", &address.store])
            .arg(source)
            .status()
            .map_err(|e| Error::Import {
                path: source.to_path_buf(),
                store_path: address.store_path(),
                reason: format!("certutil -addstore: {e}"),
            })?;
        if !status.success() {
            return Err(Error::Import {
                path: source.to_path_buf(),
                store_path: address.store_path(),
                reason: "certutil -addstore failed".to_string(),
            });
        }
        Ok(())
    }

    fn remove(&self, thumbprint: &Thumbprint, address: &StoreAddress) -> Result<()> {
        // -delstore fails on a missing entry; probe first to keep
        // removal a no-op when nothing matches.
        if self.find(thumbprint, address)?.is_none() {
            return Ok(());
        }
        let status = Command::new("certutil")
            .args(location_args(address.location))
            .args(["-delstore", &address.store, thumbprint.as_str()])
            .status()
            .map_err(|e| Error::StoreAccess {
                store_path: address.store_path(),
                reason: format!("certutil -delstore: {e}"),
            })?;
        if !status.success() {
            return Err(Error::StoreAccess {
                store_path: address.store_path(),
                reason: "certutil -delstore failed".to_string(),
            });
        }
        Ok(())
    }
}
