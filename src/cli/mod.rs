// src/cli/mod.rs
// Maintenance commands over the workspace store and the catalog feeds

pub mod maintenance;
pub mod records;
pub mod sync;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use thiserror::Error;

use crate::catalog::feeds::FeedError;
use crate::settings::{self, AppSettings};
use crate::workspace::store::EntityStore;
use crate::workspace::{RecordKind, WorkspaceError};

#[derive(Parser)]
#[command(name = "secureit")]
#[command(about = "SecureIT Workbench - security compliance workbench with maintenance tools", long_about = None)]
pub struct Cli {
    /// Directory holding the workspace database (overrides settings and SECUREIT_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    #[value(alias = "databases", alias = "db")]
    Database,
    #[value(alias = "mappers", alias = "map")]
    Mapper,
}

impl From<KindArg> for RecordKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Database => RecordKind::Database,
            KindArg::Mapper => RecordKind::Mapper,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List saved databases and mappers
    List {
        /// Only list this kind
        kind: Option<KindArg>,
    },

    /// Print one record
    Show { kind: KindArg, id: String },

    /// Load every indexed record and the transfer slot, reporting corrupt ones
    Verify,

    /// Rebuild the id index from a full key scan
    Reindex,

    /// Move a record to a new id (fails if the new id exists)
    Rename {
        kind: KindArg,
        old_id: String,
        new_id: String,
    },

    /// Delete a record
    Delete { kind: KindArg, id: String },

    /// Fetch a remote feed and print what it would load
    Sync {
        /// controls, threats or vulnerabilities
        feed: String,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error("{0} problem(s) found")]
    Problems(usize),
}

/// Runs a subcommand against the resolved store.
pub fn run(command: Commands, data_dir: Option<&Path>) -> Result<(), CliError> {
    let settings = settings::io::load_or_default();
    let store = || open_store(&settings, data_dir);
    match command {
        Commands::List { kind } => {
            records::list(&store()?, kind.map(RecordKind::from));
            Ok(())
        }
        Commands::Show { kind, id } => records::show(&store()?, kind.into(), &id),
        Commands::Verify => maintenance::verify(&store()?),
        Commands::Reindex => maintenance::reindex(&mut store()?),
        Commands::Rename { kind, old_id, new_id } => {
            records::rename(&mut store()?, kind.into(), &old_id, &new_id)
        }
        Commands::Delete { kind, id } => records::delete(&mut store()?, kind.into(), &id),
        Commands::Sync { feed } => sync::run(&feed, &settings),
    }
}

fn open_store(settings: &AppSettings, data_dir: Option<&Path>) -> Result<EntityStore, CliError> {
    let dir = settings::io::resolve_data_dir(settings, data_dir);
    let path = settings::io::store_path(&dir);
    println!("Opening: {}\n", path.display());
    Ok(EntityStore::open_sqlite(&path)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_and_aliases() {
        let cli = Cli::try_parse_from(["secureit", "--data-dir", "/tmp/x", "list", "mappers"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        assert!(matches!(cli.command, Some(Commands::List { kind: Some(KindArg::Mapper) })));

        let cli = Cli::try_parse_from(["secureit", "rename", "db", "db-1", "assets"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Rename { kind: KindArg::Database, .. })
        ));

        let cli = Cli::try_parse_from(["secureit"]).unwrap();
        assert!(cli.command.is_none());
    }
}
