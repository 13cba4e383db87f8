use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod backup;
mod commands;
mod config;
mod models;
mod snapshot;
mod storage;
mod store;

use backup::BackupClient;
use commands::{
    ConfigCommand, DataCommand, DriveCommand, HabitCommand, NoteCommand, NotifyCommand,
    TodoCommand,
};
use config::Config;
use storage::DataStorage;
use store::Store;

#[derive(Parser)]
#[command(name = "dailydrive")]
#[command(version)]
#[command(about = "A personal productivity CLI for habits, todos, and notes", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Track habits
    Habit(HabitCommand),

    /// Manage todos and todo lists
    Todo(TodoCommand),

    /// Manage notes and note categories
    Note(NoteCommand),

    /// Manage notifications
    Notify(NotifyCommand),

    /// Export and import all data
    Data(DataCommand),

    /// Back up data to the configured backend
    Drive(DriveCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dailydrive=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Habit(cmd)) => {
            let mut store = Store::load(DataStorage::new(config.data_dir.clone()));
            cmd.run(&mut store)?;
        }
        Some(Commands::Todo(cmd)) => {
            let mut store = Store::load(DataStorage::new(config.data_dir.clone()));
            cmd.run(&mut store)?;
        }
        Some(Commands::Note(cmd)) => {
            let mut store = Store::load(DataStorage::new(config.data_dir.clone()));
            cmd.run(&mut store)?;
        }
        Some(Commands::Notify(cmd)) => {
            let mut store = Store::load(DataStorage::new(config.data_dir.clone()));
            cmd.run(&mut store)?;
        }
        Some(Commands::Data(cmd)) => {
            let mut store = Store::load(DataStorage::new(config.data_dir.clone()));
            cmd.run(&mut store)?;
        }
        Some(Commands::Drive(cmd)) => {
            let storage = DataStorage::new(config.data_dir.clone());
            let mut store = Store::load(storage.clone());
            let mut client = BackupClient::load(storage, config.backup_backend);
            cmd.run(&mut client, &mut store).await?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
