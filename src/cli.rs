//! CLI definitions and command routing.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{CertsyncPaths, Config};
use crate::platform::{default_cert_store, CertStore};
use crate::resource::{self, DesiredState, Location, Presence, StoreAddress};
use crate::thumbprint::Thumbprint;

#[derive(Parser)]
#[command(name = "certsync")]
#[command(about = "Declarative certificate presence in the OS certificate store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Parameters shared by all commands: one certificate identity and
/// the store it should (or should not) be present in.
#[derive(Args)]
pub struct ResourceArgs {
    /// Certificate thumbprint (hex digest of the DER encoding)
    #[arg(long)]
    pub thumbprint: String,

    /// Path to the certificate file to import (.cer, .crt, .pem, .der)
    #[arg(long)]
    pub path: PathBuf,

    /// Store location; defaults from config.toml, else local-machine
    #[arg(long, value_enum)]
    pub location: Option<Location>,

    /// Store name; defaults from config.toml, else "My"
    #[arg(long)]
    pub store: Option<String>,

    /// Whether the certificate should be present or absent
    #[arg(long, value_enum, default_value_t = Presence::Present)]
    pub ensure: Presence,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read the observed state for the requested certificate
    Get {
        #[command(flatten)]
        resource: ResourceArgs,
        /// Print observed state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether observed state matches the request (exit 2 if not)
    Test {
        #[command(flatten)]
        resource: ResourceArgs,
    },
    /// Import or remove the certificate to match the request
    Set {
        #[command(flatten)]
        resource: ResourceArgs,
    },
}

/// Validate arguments and resolve defaults into a DesiredState.
fn desired_state(args: ResourceArgs, config: &Config) -> Result<DesiredState> {
    let thumbprint = Thumbprint::parse(&args.thumbprint)?;
    resource::validate_certificate_path(&args.path)?;
    let location = args.location.unwrap_or(config.default_location);
    let store = args.store.unwrap_or_else(|| config.default_store.clone());
    let address = StoreAddress::new(location, store)?;
    Ok(DesiredState {
        thumbprint,
        source: args.path,
        address,
        presence: args.ensure,
    })
}

/// Run CLI and dispatch to handlers.
pub fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let paths = CertsyncPaths::default_paths();
    let config = Config::load(&paths)?;
    let store = default_cert_store();

    match cli.command {
        Commands::Get { resource, json } => {
            let desired = desired_state(resource, &config)?;
            cmd_get(store.as_ref(), &desired, json)
        }
        Commands::Test { resource } => {
            let desired = desired_state(resource, &config)?;
            cmd_test(store.as_ref(), &desired)
        }
        Commands::Set { resource } => {
            let desired = desired_state(resource, &config)?;
            cmd_set(store.as_ref(), &desired)
        }
    }
}

fn cmd_get(store: &dyn CertStore, desired: &DesiredState, json: bool) -> Result<()> {
    let observed = resource::get(store, desired)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&observed)?);
    } else {
        println!(
            "{}\t{}\t{}",
            observed.thumbprint, observed.address, observed.presence
        );
    }
    Ok(())
}

fn cmd_test(store: &dyn CertStore, desired: &DesiredState) -> Result<()> {
    if resource::test(store, desired)? {
        println!("in sync: {} is {}", desired.thumbprint, desired.presence);
        Ok(())
    } else {
        println!("out of sync: {} is not {}", desired.thumbprint, desired.presence);
        std::process::exit(2);
    }
}

fn cmd_set(store: &dyn CertStore, desired: &DesiredState) -> Result<()> {
    resource::apply(store, desired)?;
    match desired.presence {
        Presence::Present => println!(
            "Imported {} into {}",
            desired.source.display(),
            desired.address
        ),
        Presence::Absent => println!(
            "Removed {} from {}",
            desired.thumbprint, desired.address
        ),
    }
    Ok(())
}
