//! Desired/observed state model and the get/test/apply reconciliation core.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::platform::CertStore;
use crate::thumbprint::Thumbprint;

/// File extensions accepted as certificate sources.
const CERT_EXTENSIONS: &[&str] = &["cer", "crt", "pem", "der"];

/// Scope under which a certificate store is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
pub enum Location {
    CurrentUser,
    LocalMachine,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::CurrentUser => f.write_str("CurrentUser"),
            Location::LocalMachine => f.write_str("LocalMachine"),
        }
    }
}

impl FromStr for Location {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        match s.to_ascii_lowercase().as_str() {
            "currentuser" | "current-user" | "user" => Ok(Location::CurrentUser),
            "localmachine" | "local-machine" | "machine" => Ok(Location::LocalMachine),
            _ => Err(format!("unknown store location '{s}'")),
        }
    }
}

/// Desired or observed presence of a certificate in a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
pub enum Presence {
    Present,
    Absent,
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Presence::Present => f.write_str("Present"),
            Presence::Absent => f.write_str("Absent"),
        }
    }
}

/// A logical certificate container on the host: location plus store name.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoreAddress {
    pub location: Location,
    pub store: String,
}

impl StoreAddress {
    /// Build an address; the store name must be non-empty.
    pub fn new(location: Location, store: impl Into<String>) -> Result<Self> {
        let store = store.into();
        if store.trim().is_empty() {
            return Err(Error::StoreAccess {
                store_path: format!("{location}\\"),
                reason: "store name is empty".to_string(),
            });
        }
        Ok(Self { location, store })
    }

    /// Deterministic address string for messages and import primitives,
    /// e.g. `LocalMachine\My`.
    pub fn store_path(&self) -> String {
        format!("{}\\{}", self.location, self.store)
    }
}

impl fmt::Display for StoreAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.store_path())
    }
}

/// Caller-declared desired state; immutable for one reconciliation call.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DesiredState {
    pub thumbprint: Thumbprint,
    pub source: PathBuf,
    pub address: StoreAddress,
    pub presence: Presence,
}

/// State observed by probing the store. `source` is echoed from the
/// request, not independently observed.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ObservedState {
    pub thumbprint: Thumbprint,
    pub source: PathBuf,
    pub address: StoreAddress,
    pub presence: Presence,
}

/// Shape check on a candidate source path (not an existence check).
pub fn validate_certificate_path(path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let ok = path.file_name().is_some()
        && matches!(ext.as_deref(), Some(e) if CERT_EXTENSIONS.contains(&e));
    if ok {
        Ok(())
    } else {
        Err(Error::InvalidCertificatePath(path.to_path_buf()))
    }
}

/// A Present declaration with a missing source can never be satisfied,
/// so this is checked before any store probe, regardless of store state.
fn check_source_exists(desired: &DesiredState) -> Result<()> {
    if desired.presence == Presence::Present && !desired.source.is_file() {
        return Err(Error::MissingSourceFile(desired.source.clone()));
    }
    Ok(())
}

/// Read the observed state for a desired-state descriptor.
pub fn get(store: &dyn CertStore, desired: &DesiredState) -> Result<ObservedState> {
    check_source_exists(desired)?;

    tracing::debug!(
        thumbprint = %desired.thumbprint,
        address = %desired.address,
        "probing store"
    );
    let found = store.find(&desired.thumbprint, &desired.address)?;
    let presence = if found.is_some() {
        Presence::Present
    } else {
        Presence::Absent
    };
    tracing::debug!(%presence, "probe complete");

    Ok(ObservedState {
        thumbprint: desired.thumbprint.clone(),
        source: desired.source.clone(),
        address: desired.address.clone(),
        presence,
    })
}

/// Whether observed state already matches desired state.
///
/// Only presence is compared. A certificate imported from a different
/// file but with a matching thumbprint counts as converged; source path
/// and address are action parameters, not compared state.
pub fn test(store: &dyn CertStore, desired: &DesiredState) -> Result<bool> {
    let observed = get(store, desired)?;
    Ok(observed.presence == desired.presence)
}

/// Perform the corrective action for a desired-state descriptor.
///
/// No converged-check is done here; callers normally run [`test`] first
/// and only apply on divergence, but both branches are idempotent at the
/// store level so an unconditional apply is safe.
pub fn apply(store: &dyn CertStore, desired: &DesiredState) -> Result<()> {
    check_source_exists(desired)?;

    match desired.presence {
        Presence::Present => {
            tracing::info!(
                source = %desired.source.display(),
                address = %desired.address,
                "importing certificate"
            );
            store.import(&desired.address, &desired.source)
        }
        Presence::Absent => {
            tracing::info!(
                thumbprint = %desired.thumbprint,
                address = %desired.address,
                "removing certificate"
            );
            store.remove(&desired.thumbprint, &desired.address)
        }
    }
}
