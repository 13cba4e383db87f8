use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};

use super::{resolve, OutputFormat};
use crate::models::{Frequency, Habit};
use crate::store::{HabitPatch, Store};

#[derive(Args)]
pub struct HabitCommand {
    #[command(subcommand)]
    pub command: HabitSubcommand,
}

#[derive(Subcommand)]
pub enum HabitSubcommand {
    /// Add a new habit
    Add {
        /// Habit name
        name: String,

        /// Description
        #[arg(long, short)]
        description: Option<String>,

        /// Frequency (daily, weekly)
        #[arg(long, short, default_value = "daily")]
        frequency: String,

        /// Reminder time (HH:MM)
        #[arg(long)]
        reminder: Option<String>,

        /// Display color
        #[arg(long)]
        color: Option<String>,
    },

    /// List habits
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Toggle today's completion for a habit
    Done {
        /// Habit ID or name
        habit: String,
    },

    /// Edit a habit
    Edit {
        /// Habit ID or name
        habit: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New description
        #[arg(long, short)]
        description: Option<String>,

        /// New frequency (daily, weekly)
        #[arg(long, short)]
        frequency: Option<String>,

        /// New reminder time (HH:MM)
        #[arg(long)]
        reminder: Option<String>,

        /// New display color
        #[arg(long)]
        color: Option<String>,

        /// Replace the completed dates (comma-separated YYYY-MM-DD)
        #[arg(long, value_delimiter = ',')]
        dates: Option<Vec<String>>,
    },

    /// Delete a habit
    Delete {
        /// Habit ID or name
        habit: String,
    },
}

impl HabitCommand {
    pub fn run(&self, store: &mut Store) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            HabitSubcommand::Add {
                name,
                description,
                frequency,
                reminder,
                color,
            } => {
                let frequency: Frequency = frequency.parse().map_err(|e: String| e)?;

                let mut habit = Habit::new(name, frequency);
                if let Some(d) = description {
                    habit = habit.with_description(d);
                }
                if let Some(r) = reminder {
                    habit = habit.with_reminder_time(r);
                }
                if let Some(c) = color {
                    habit = habit.with_color(c);
                }

                let created = store.add_habit(habit)?;
                println!("Added habit '{}' ({})", created.name, created.frequency);
                println!("Habit ID: {}", created.id);
                Ok(())
            }

            HabitSubcommand::List { format } => {
                let habits = store.habits();

                if habits.is_empty() {
                    println!("No habits yet. Add one with 'dailydrive habit add <name>'.");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(habits)?);
                    }
                    OutputFormat::Text => {
                        let today = Local::now().date_naive();
                        for habit in habits {
                            let mark = if habit.completed_on(today) { "✓" } else { " " };
                            println!(
                                "  [{}] {:<25} {:<7} streak {:>3}   {}",
                                mark, habit.name, habit.frequency, habit.streak, habit.id
                            );
                        }
                        println!("\nTotal: {} habit(s)", habits.len());
                    }
                }
                Ok(())
            }

            HabitSubcommand::Done { habit } => {
                let id = resolve(store.habits(), habit, "Habit", |h| h.id, |h| &h.name)?;
                let today = Local::now().date_naive();

                let Some(updated) = store.toggle_habit(id, today)? else {
                    return Err(format!("Habit not found: {}", habit).into());
                };

                if updated.completed_on(today) {
                    println!(
                        "Marked '{}' done for {} (streak: {})",
                        updated.name, today, updated.streak
                    );
                } else {
                    println!(
                        "Unmarked '{}' for {} (streak: {})",
                        updated.name, today, updated.streak
                    );
                }
                Ok(())
            }

            HabitSubcommand::Edit {
                habit,
                name,
                description,
                frequency,
                reminder,
                color,
                dates,
            } => {
                let id = resolve(store.habits(), habit, "Habit", |h| h.id, |h| &h.name)?;

                let frequency = match frequency {
                    Some(f) => Some(f.parse::<Frequency>().map_err(|e: String| e)?),
                    None => None,
                };
                let completed_dates = match dates {
                    Some(raw) => Some(parse_dates(raw)?),
                    None => None,
                };

                let patch = HabitPatch {
                    name: name.clone(),
                    description: description.clone(),
                    frequency,
                    reminder_time: reminder.clone(),
                    color: color.clone(),
                    completed_dates,
                };

                let today = Local::now().date_naive();
                match store.update_habit(id, patch, today)? {
                    Some(updated) => println!("Updated habit '{}'", updated.name),
                    None => println!("Habit not found: {}", habit),
                }
                Ok(())
            }

            HabitSubcommand::Delete { habit } => {
                let id = resolve(store.habits(), habit, "Habit", |h| h.id, |h| &h.name)?;
                let name = store.habit(id).map(|h| h.name.clone()).unwrap_or_default();

                if store.delete_habit(id)? {
                    println!("Deleted habit '{}'", name);
                }
                Ok(())
            }
        }
    }
}

fn parse_dates(raw: &[String]) -> Result<Vec<NaiveDate>, String> {
    raw.iter()
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| format!("Invalid date format '{}'. Use YYYY-MM-DD.", s))
        })
        .collect()
}
