//! Certsync - declarative X.509 certificate presence in the OS store.

pub mod cert;
pub mod cli;
pub mod config;
pub mod error;
pub mod platform;
pub mod resource;
pub mod thumbprint;
