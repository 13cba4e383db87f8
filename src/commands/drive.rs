use clap::{Args, Subcommand};

use crate::backup::{BackupClient, RestoreOutcome};
use crate::store::Store;

#[derive(Args)]
pub struct DriveCommand {
    #[command(subcommand)]
    pub command: DriveSubcommand,
}

#[derive(Subcommand)]
pub enum DriveSubcommand {
    /// Connect the backup backend
    Connect,

    /// Disconnect the backup backend
    Disconnect,

    /// Show backup status
    Status,

    /// Back up all data
    Backup,

    /// Restore the most recent backup, replacing all current data
    Restore,
}

impl DriveCommand {
    pub async fn run(
        &self,
        client: &mut BackupClient,
        store: &mut Store,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            DriveSubcommand::Connect => {
                if client.is_connected() {
                    println!("Already connected ({}).", client.backend());
                    return Ok(());
                }

                println!("Connecting...");
                client.connect().await?;
                println!("Connected to {} backups.", client.backend());
                Ok(())
            }

            DriveSubcommand::Disconnect => {
                client.disconnect()?;
                println!("Disconnected.");
                Ok(())
            }

            DriveSubcommand::Status => {
                println!("Backup Status");
                println!("=============");
                println!();
                println!("Backend:     {}", client.backend());
                println!(
                    "Connection:  {}",
                    if client.is_connected() {
                        "connected"
                    } else {
                        "disconnected"
                    }
                );
                match store.last_backup_date() {
                    Some(date) => println!("Last backup: {}", date.format("%Y-%m-%d %H:%M:%S UTC")),
                    None => println!("Last backup: never"),
                }
                Ok(())
            }

            DriveSubcommand::Backup => {
                println!("Backing up...");
                let backed_up_at = client.backup(store).await?;
                println!(
                    "Backup complete at {}.",
                    backed_up_at.format("%Y-%m-%d %H:%M:%S UTC")
                );
                Ok(())
            }

            DriveSubcommand::Restore => {
                println!("Restoring...");
                match client.restore(store).await? {
                    RestoreOutcome::Restored(path) => {
                        println!("Restored backup from {}.", path.display());
                    }
                    RestoreOutcome::Nothing => {
                        println!("No backup available to restore.");
                    }
                }
                Ok(())
            }
        }
    }
}
