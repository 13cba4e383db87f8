use chrono::{Local, Utc};
use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::snapshot;
use crate::store::Store;

#[derive(Args)]
pub struct DataCommand {
    #[command(subcommand)]
    pub command: DataSubcommand,
}

#[derive(Subcommand)]
pub enum DataSubcommand {
    /// Export all data to a backup file
    Export {
        /// Output path (defaults to ./daily-drive-backup-<date>.json)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Import data from a backup file, replacing all current data
    Import {
        /// Path to the backup file
        path: PathBuf,
    },
}

impl DataCommand {
    pub fn run(&self, store: &mut Store) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            DataSubcommand::Export { output } => {
                let path = output.clone().unwrap_or_else(|| {
                    PathBuf::from(snapshot::backup_filename(Local::now().date_naive()))
                });

                let document = store.export_snapshot(Utc::now());
                snapshot::write_snapshot(&path, &document)?;

                println!("Exported data to {}", path.display());
                println!(
                    "  {} habit(s), {} todo(s), {} note(s)",
                    document.habits.len(),
                    document.todos.len(),
                    document.notes.len()
                );
                Ok(())
            }

            DataSubcommand::Import { path } => {
                // Validation happens before anything is replaced; a bad file
                // leaves the current data untouched.
                let document = snapshot::read_snapshot(path)?;

                let habits = document.habits.len();
                let todos = document.todos.len();
                let notes = document.notes.len();
                store.import_snapshot(document)?;

                println!("Imported data from {}", path.display());
                println!("  {} habit(s), {} todo(s), {} note(s)", habits, todos, notes);
                Ok(())
            }
        }
    }
}
