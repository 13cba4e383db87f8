use clap::{Args, Subcommand};

use super::{resolve, OutputFormat};
use crate::models::{Note, NoteCategory};
use crate::store::{NoteCategoryPatch, NotePatch, Store};

#[derive(Args)]
pub struct NoteCommand {
    #[command(subcommand)]
    pub command: NoteSubcommand,
}

#[derive(Subcommand)]
pub enum NoteSubcommand {
    /// Add a new note
    Add {
        /// Note title
        title: String,

        /// Note content
        content: String,

        /// Display color
        #[arg(long)]
        color: Option<String>,

        /// Tag (can be repeated)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,

        /// Category (ID or name)
        #[arg(long)]
        category: Option<String>,
    },

    /// List notes
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Only notes in this category (ID or name)
        #[arg(long)]
        category: Option<String>,
    },

    /// Show a note
    Show {
        /// Note ID or title
        note: String,
    },

    /// Edit a note
    Edit {
        /// Note ID or title
        note: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New content
        #[arg(long)]
        content: Option<String>,

        /// New display color
        #[arg(long)]
        color: Option<String>,

        /// Replace the tags (can be repeated)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,

        /// Move to this category (ID or name)
        #[arg(long)]
        category: Option<String>,
    },

    /// Delete a note
    Delete {
        /// Note ID or title
        note: String,
    },

    /// Create a note category
    CategoryAdd {
        /// Category name
        name: String,

        /// Display color
        #[arg(long)]
        color: Option<String>,
    },

    /// Show all note categories
    Categories {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Rename or recolor a note category
    CategoryEdit {
        /// Category ID or name
        category: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New display color
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a note category (its notes are kept and detached)
    CategoryDelete {
        /// Category ID or name
        category: String,
    },
}

impl NoteCommand {
    pub fn run(&self, store: &mut Store) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            NoteSubcommand::Add {
                title,
                content,
                color,
                tags,
                category,
            } => {
                let mut note = Note::new(title, content);
                if let Some(c) = color {
                    note = note.with_color(c);
                }
                if !tags.is_empty() {
                    note = note.with_tags(tags.clone());
                }
                if let Some(category) = category {
                    let category_id = resolve(
                        store.note_categories(),
                        category,
                        "Category",
                        |c| c.id,
                        |c| &c.name,
                    )?;
                    note = note.with_category(category_id);
                }

                let created = store.add_note(note)?;
                println!("Added note '{}'", created.title);
                println!("Note ID: {}", created.id);
                Ok(())
            }

            NoteSubcommand::List { format, category } => {
                let category_filter = match category {
                    Some(c) => Some(resolve(
                        store.note_categories(),
                        c,
                        "Category",
                        |c| c.id,
                        |c| &c.name,
                    )?),
                    None => None,
                };

                let notes: Vec<&Note> = store
                    .notes()
                    .iter()
                    .filter(|n| category_filter.map_or(true, |id| n.category_id == Some(id)))
                    .collect();

                if notes.is_empty() {
                    println!("No notes found.");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&notes)?);
                    }
                    OutputFormat::Text => {
                        for note in &notes {
                            let category_name = note
                                .category_id
                                .and_then(|id| store.note_category(id))
                                .map(|c| format!("  [{}]", c.name))
                                .unwrap_or_default();
                            println!(
                                "  {:<25} updated {}{}",
                                note.title,
                                note.updated_at.format("%Y-%m-%d %H:%M"),
                                category_name
                            );
                        }
                        println!("\nTotal: {} note(s)", notes.len());
                    }
                }
                Ok(())
            }

            NoteSubcommand::Show { note } => {
                let id = resolve(store.notes(), note, "Note", |n| n.id, |n| &n.title)?;
                let note = store
                    .note(id)
                    .ok_or_else(|| format!("Note not found: {}", id))?;
                println!("{}", note);
                Ok(())
            }

            NoteSubcommand::Edit {
                note,
                title,
                content,
                color,
                tags,
                category,
            } => {
                let id = resolve(store.notes(), note, "Note", |n| n.id, |n| &n.title)?;

                let category_id = match category {
                    Some(c) => Some(resolve(
                        store.note_categories(),
                        c,
                        "Category",
                        |c| c.id,
                        |c| &c.name,
                    )?),
                    None => None,
                };

                let patch = NotePatch {
                    title: title.clone(),
                    content: content.clone(),
                    color: color.clone(),
                    tags: if tags.is_empty() {
                        None
                    } else {
                        Some(tags.clone())
                    },
                    category_id,
                };

                match store.update_note(id, patch)? {
                    Some(updated) => println!("Updated note '{}'", updated.title),
                    None => println!("Note not found: {}", note),
                }
                Ok(())
            }

            NoteSubcommand::Delete { note } => {
                let id = resolve(store.notes(), note, "Note", |n| n.id, |n| &n.title)?;
                let title = store.note(id).map(|n| n.title.clone()).unwrap_or_default();

                if store.delete_note(id)? {
                    println!("Deleted note '{}'", title);
                }
                Ok(())
            }

            NoteSubcommand::CategoryAdd { name, color } => {
                let mut category = NoteCategory::new(name);
                if let Some(c) = color {
                    category = category.with_color(c);
                }

                let created = store.add_note_category(category)?;
                println!("Created category '{}'", created.name);
                println!("Category ID: {}", created.id);
                Ok(())
            }

            NoteSubcommand::Categories { format } => {
                let categories = store.note_categories();

                if categories.is_empty() {
                    println!("No note categories yet.");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(categories)?);
                    }
                    OutputFormat::Text => {
                        for category in categories {
                            let count = store
                                .notes()
                                .iter()
                                .filter(|n| n.category_id == Some(category.id))
                                .count();
                            println!(
                                "  {:<25} {} note(s)   {}",
                                category.name, count, category.id
                            );
                        }
                        println!("\nTotal: {} category(ies)", categories.len());
                    }
                }
                Ok(())
            }

            NoteSubcommand::CategoryEdit {
                category,
                name,
                color,
            } => {
                let id = resolve(
                    store.note_categories(),
                    category,
                    "Category",
                    |c| c.id,
                    |c| &c.name,
                )?;

                let patch = NoteCategoryPatch {
                    name: name.clone(),
                    color: color.clone(),
                };

                match store.update_note_category(id, patch)? {
                    Some(updated) => println!("Updated category '{}'", updated.name),
                    None => println!("Category not found: {}", category),
                }
                Ok(())
            }

            NoteSubcommand::CategoryDelete { category } => {
                let id = resolve(
                    store.note_categories(),
                    category,
                    "Category",
                    |c| c.id,
                    |c| &c.name,
                )?;
                let name = store
                    .note_category(id)
                    .map(|c| c.name.clone())
                    .unwrap_or_default();

                if store.delete_note_category(id)? {
                    println!("Deleted category '{}'. Its notes were kept.", name);
                }
                Ok(())
            }
        }
    }
}
