//! Error taxonomy for validation, store access, and import failures.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by certsync operations.
///
/// All variants are fatal for the current operation; nothing is caught
/// and retried internally. A removal that finds no matching certificate
/// is not an error and never reaches this type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Thumbprint is not hex of a supported digest length.
    #[error("invalid thumbprint '{0}': expected hex of 32, 40, 56, 64, 96 or 128 characters")]
    InvalidThumbprint(String),

    /// Source path does not look like a certificate file.
    #[error("invalid certificate path '{}': expected a .cer, .crt, .pem or .der file", .0.display())]
    InvalidCertificatePath(PathBuf),

    /// Presence=Present was requested but the source file is not on disk.
    #[error("certificate file not found at '{}'", .0.display())]
    MissingSourceFile(PathBuf),

    /// The certificate container itself cannot be opened or enumerated.
    #[error("cannot access certificate store {store_path}: {reason}")]
    StoreAccess { store_path: String, reason: String },

    /// The import primitive could not decode or insert the certificate.
    #[error("failed to import '{}' into {store_path}: {reason}", .path.display())]
    Import {
        path: PathBuf,
        store_path: String,
        reason: String,
    },
}

impl Error {
    /// True for the InvalidArgument class (malformed or missing inputs).
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::InvalidThumbprint(_)
                | Error::InvalidCertificatePath(_)
                | Error::MissingSourceFile(_)
        )
    }
}
