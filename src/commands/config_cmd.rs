use clap::{Args, Subcommand};

use super::OutputFormat;
use crate::config::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        let default_path = Config::default_config_path();
                        if default_path.exists() {
                            println!("Config file: {}", default_path.display());
                        } else {
                            println!("Config file: {} (not found)", default_path.display());
                        }
                        println!();

                        println!("data_dir: {}", config.data_dir.display());
                        println!("backup_backend: {}", config.backup_backend);
                    }
                }
                Ok(())
            }
        }
    }
}
