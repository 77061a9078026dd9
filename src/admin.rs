//! Administrative tool: list or insert contacts straight against the store.
//!
//! ```text
//! phonebook-admin <credential>                  # list
//! phonebook-admin <credential> <name> <number>  # insert
//! ```
//!
//! The credential is the store URI (see [`StoreBackend`]).

use std::ffi::OsString;
use std::io::{self, Write};

use clap::error::ErrorKind;
use clap::{Arg, Command};
use thiserror::Error;

use crate::config::StoreBackend;
use crate::contact::{validate_new, ContactError, ContactPayload, ContactStore, StoreOpenError};

pub const USAGE: &str = "Usage: phonebook-admin <credential> [<name> <number>]";

#[derive(Debug, Error)]
pub enum AdminError {
    /// `--help` or `--version` output; not a failure.
    #[error("{0}")]
    Help(String),
    #[error("{0}")]
    Usage(String),
    #[error("invalid credential: {0}")]
    Credential(String),
    #[error(transparent)]
    Open(#[from] StoreOpenError),
    #[error(transparent)]
    Contact(#[from] ContactError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// What to do once the store is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    List,
    Add { name: String, number: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminArgs {
    pub backend: StoreBackend,
    pub command: AdminCommand,
}

/// Build the clap command tree.
pub fn build_cli() -> Command {
    Command::new("phonebook-admin")
        .about("List or add phonebook contacts directly in the store")
        .version(env!("CARGO_PKG_VERSION"))
        .override_usage("phonebook-admin <credential> [<name> <number>]")
        .arg(
            Arg::new("credential")
                .help("Store URI (memory:, file:<path> or a path)")
                .required(true),
        )
        .arg(
            Arg::new("name")
                .help("Name of the contact to add")
                .allow_hyphen_values(true),
        )
        .arg(
            Arg::new("number")
                .help("Number of the contact to add")
                .allow_hyphen_values(true),
        )
}

/// Parse command-line arguments (program name first).
///
/// Exactly one or three positional arguments are accepted.
pub fn parse_args<I, T>(args: I) -> Result<AdminArgs, AdminError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_cli()
        .try_get_matches_from(args)
        .map_err(|e| match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => AdminError::Help(e.to_string()),
            _ => AdminError::Usage(e.to_string()),
        })?;

    let credential = matches
        .get_one::<String>("credential")
        .ok_or_else(|| AdminError::Usage(USAGE.to_string()))?;
    let backend = credential
        .parse::<StoreBackend>()
        .map_err(AdminError::Credential)?;

    let command = match (
        matches.get_one::<String>("name"),
        matches.get_one::<String>("number"),
    ) {
        (None, None) => AdminCommand::List,
        (Some(name), Some(number)) => AdminCommand::Add {
            name: name.clone(),
            number: number.clone(),
        },
        _ => return Err(AdminError::Usage(USAGE.to_string())),
    };

    Ok(AdminArgs { backend, command })
}

/// Execute `command` against `store`, writing the report to `out`.
pub fn run(
    store: &dyn ContactStore,
    command: &AdminCommand,
    out: &mut impl Write,
) -> Result<(), AdminError> {
    match command {
        AdminCommand::List => {
            writeln!(out, "phonebook:")?;
            for contact in store.list()? {
                writeln!(out, "{} {}", contact.name, contact.number)?;
            }
        }
        AdminCommand::Add { name, number } => {
            let contact = validate_new(&ContactPayload::new(name.as_str(), number.as_str()))
                .map_err(ContactError::from)?;
            let created = store.create(contact)?;
            writeln!(
                out,
                "added {} number {} to phonebook",
                created.name, created.number
            )?;
        }
    }
    Ok(())
}
