use clap::{Args, Subcommand};
use uuid::Uuid;

use super::OutputFormat;
use crate::models::{Notification, NotificationKind};
use crate::store::Store;

#[derive(Args)]
pub struct NotifyCommand {
    #[command(subcommand)]
    pub command: NotifySubcommand,
}

#[derive(Subcommand)]
pub enum NotifySubcommand {
    /// Add a notification
    Add {
        /// Title
        title: String,

        /// Message body
        message: String,

        /// Type (habit, todo, note, system)
        #[arg(long = "type", short = 't', default_value = "system")]
        kind: String,

        /// ID of the entity this notification points at
        #[arg(long)]
        target: Option<String>,
    },

    /// List notifications, newest first
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Only unread notifications
        #[arg(long, short)]
        unread: bool,
    },

    /// Mark a notification as read
    Read {
        /// Notification ID
        id: String,
    },

    /// Delete a notification
    Delete {
        /// Notification ID
        id: String,
    },
}

impl NotifyCommand {
    pub fn run(&self, store: &mut Store) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            NotifySubcommand::Add {
                title,
                message,
                kind,
                target,
            } => {
                let kind: NotificationKind = kind.parse().map_err(|e: String| e)?;

                let mut notification = Notification::new(title, message, kind);
                if let Some(target) = target {
                    let target_id = Uuid::parse_str(target)
                        .map_err(|_| format!("Invalid target ID: {}", target))?;
                    notification = notification.with_target(target_id);
                }

                let created = store.add_notification(notification)?;
                println!("Added {} notification '{}'", created.kind, created.title);
                Ok(())
            }

            NotifySubcommand::List { format, unread } => {
                let notifications: Vec<&Notification> = store
                    .notifications()
                    .iter()
                    .filter(|n| !unread || !n.read)
                    .collect();

                if notifications.is_empty() {
                    println!("No notifications.");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&notifications)?);
                    }
                    OutputFormat::Text => {
                        for n in &notifications {
                            let mark = if n.read { " " } else { "*" };
                            println!(
                                "  {} [{:<6}] {:<20} {}   {}",
                                mark, n.kind, n.title, n.message, n.id
                            );
                        }
                        println!("\nTotal: {} notification(s)", notifications.len());
                    }
                }
                Ok(())
            }

            NotifySubcommand::Read { id } => {
                let id = Uuid::parse_str(id).map_err(|_| format!("Invalid ID: {}", id))?;
                if store.mark_notification_read(id)? {
                    println!("Marked as read.");
                } else {
                    println!("Notification not found: {}", id);
                }
                Ok(())
            }

            NotifySubcommand::Delete { id } => {
                let id = Uuid::parse_str(id).map_err(|_| format!("Invalid ID: {}", id))?;
                if store.delete_notification(id)? {
                    println!("Deleted notification.");
                } else {
                    println!("Notification not found: {}", id);
                }
                Ok(())
            }
        }
    }
}
