use chrono::NaiveDate;
use clap::{Args, Subcommand};

use super::{resolve, OutputFormat};
use crate::models::{Priority, Todo, TodoList};
use crate::store::{Store, TodoListPatch, TodoPatch};

#[derive(Args)]
pub struct TodoCommand {
    #[command(subcommand)]
    pub command: TodoSubcommand,
}

#[derive(Subcommand)]
pub enum TodoSubcommand {
    /// Add a new todo
    Add {
        /// Todo title
        title: String,

        /// Description
        #[arg(long, short)]
        description: Option<String>,

        /// Priority (low, medium, high)
        #[arg(long, short, default_value = "medium")]
        priority: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// List to file the todo under (ID or name)
        #[arg(long)]
        list: Option<String>,

        /// Tag (can be repeated)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
    },

    /// List todos
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Include completed todos
        #[arg(long, short)]
        all: bool,

        /// Only todos in this list (ID or name)
        #[arg(long)]
        list: Option<String>,
    },

    /// Toggle a todo's completion
    Done {
        /// Todo ID or title
        todo: String,
    },

    /// Edit a todo
    Edit {
        /// Todo ID or title
        todo: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long, short)]
        description: Option<String>,

        /// New priority (low, medium, high)
        #[arg(long, short)]
        priority: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Move to this list (ID or name)
        #[arg(long)]
        list: Option<String>,

        /// Replace the tags (can be repeated)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
    },

    /// Delete a todo
    Delete {
        /// Todo ID or title
        todo: String,
    },

    /// Create a todo list
    ListAdd {
        /// List name
        name: String,

        /// Display color
        #[arg(long)]
        color: Option<String>,
    },

    /// Show all todo lists
    Lists {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Rename or recolor a todo list
    ListEdit {
        /// List ID or name
        list: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New display color
        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a todo list (its todos are kept and detached)
    ListDelete {
        /// List ID or name
        list: String,
    },
}

impl TodoCommand {
    pub fn run(&self, store: &mut Store) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            TodoSubcommand::Add {
                title,
                description,
                priority,
                due,
                list,
                tags,
            } => {
                let priority: Priority = priority.parse().map_err(|e: String| e)?;

                let mut todo = Todo::new(title, priority);
                if let Some(d) = description {
                    todo = todo.with_description(d);
                }
                if let Some(due) = due {
                    todo = todo.with_due_date(parse_date(due)?);
                }
                if let Some(list) = list {
                    let list_id =
                        resolve(store.todo_lists(), list, "List", |l| l.id, |l| &l.name)?;
                    todo = todo.with_list(list_id);
                }
                if !tags.is_empty() {
                    todo = todo.with_tags(tags.clone());
                }

                let created = store.add_todo(todo)?;
                println!("Added todo '{}' ({})", created.title, created.priority);
                println!("Todo ID: {}", created.id);
                Ok(())
            }

            TodoSubcommand::List { format, all, list } => {
                let list_filter = match list {
                    Some(l) => Some(resolve(
                        store.todo_lists(),
                        l,
                        "List",
                        |l| l.id,
                        |l| &l.name,
                    )?),
                    None => None,
                };

                let todos: Vec<&Todo> = store
                    .todos()
                    .iter()
                    .filter(|t| *all || !t.completed)
                    .filter(|t| list_filter.map_or(true, |id| t.list_id == Some(id)))
                    .collect();

                if todos.is_empty() {
                    println!("No todos found.");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&todos)?);
                    }
                    OutputFormat::Text => {
                        for todo in &todos {
                            let list_name = todo
                                .list_id
                                .and_then(|id| store.todo_list(id))
                                .map(|l| format!("  [{}]", l.name))
                                .unwrap_or_default();
                            println!("  {}{}", todo, list_name);
                        }
                        println!("\nTotal: {} todo(s)", todos.len());
                    }
                }
                Ok(())
            }

            TodoSubcommand::Done { todo } => {
                let id = resolve(store.todos(), todo, "Todo", |t| t.id, |t| &t.title)?;

                let Some(updated) = store.toggle_todo(id)? else {
                    return Err(format!("Todo not found: {}", todo).into());
                };

                // Confirm only the transition to completed.
                if updated.completed {
                    println!("Completed '{}'", updated.title);
                }
                Ok(())
            }

            TodoSubcommand::Edit {
                todo,
                title,
                description,
                priority,
                due,
                list,
                tags,
            } => {
                let id = resolve(store.todos(), todo, "Todo", |t| t.id, |t| &t.title)?;

                let priority = match priority {
                    Some(p) => Some(p.parse::<Priority>().map_err(|e: String| e)?),
                    None => None,
                };
                let due_date = match due {
                    Some(d) => Some(parse_date(d)?),
                    None => None,
                };
                let list_id = match list {
                    Some(l) => Some(resolve(
                        store.todo_lists(),
                        l,
                        "List",
                        |l| l.id,
                        |l| &l.name,
                    )?),
                    None => None,
                };

                let patch = TodoPatch {
                    title: title.clone(),
                    description: description.clone(),
                    priority,
                    due_date,
                    reminder_time: None,
                    tags: if tags.is_empty() {
                        None
                    } else {
                        Some(tags.clone())
                    },
                    list_id,
                };

                match store.update_todo(id, patch)? {
                    Some(updated) => println!("Updated todo '{}'", updated.title),
                    None => println!("Todo not found: {}", todo),
                }
                Ok(())
            }

            TodoSubcommand::Delete { todo } => {
                let id = resolve(store.todos(), todo, "Todo", |t| t.id, |t| &t.title)?;
                let title = store.todo(id).map(|t| t.title.clone()).unwrap_or_default();

                if store.delete_todo(id)? {
                    println!("Deleted todo '{}'", title);
                }
                Ok(())
            }

            TodoSubcommand::ListAdd { name, color } => {
                let mut list = TodoList::new(name);
                if let Some(c) = color {
                    list = list.with_color(c);
                }

                let created = store.add_todo_list(list)?;
                println!("Created list '{}'", created.name);
                println!("List ID: {}", created.id);
                Ok(())
            }

            TodoSubcommand::Lists { format } => {
                let lists = store.todo_lists();

                if lists.is_empty() {
                    println!("No todo lists yet.");
                    return Ok(());
                }

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(lists)?);
                    }
                    OutputFormat::Text => {
                        for list in lists {
                            let count = store
                                .todos()
                                .iter()
                                .filter(|t| t.list_id == Some(list.id))
                                .count();
                            println!("  {:<25} {} todo(s)   {}", list.name, count, list.id);
                        }
                        println!("\nTotal: {} list(s)", lists.len());
                    }
                }
                Ok(())
            }

            TodoSubcommand::ListEdit { list, name, color } => {
                let id = resolve(store.todo_lists(), list, "List", |l| l.id, |l| &l.name)?;

                let patch = TodoListPatch {
                    name: name.clone(),
                    color: color.clone(),
                };

                match store.update_todo_list(id, patch)? {
                    Some(updated) => println!("Updated list '{}'", updated.name),
                    None => println!("List not found: {}", list),
                }
                Ok(())
            }

            TodoSubcommand::ListDelete { list } => {
                let id = resolve(store.todo_lists(), list, "List", |l| l.id, |l| &l.name)?;
                let name = store
                    .todo_list(id)
                    .map(|l| l.name.clone())
                    .unwrap_or_default();

                if store.delete_todo_list(id)? {
                    println!("Deleted list '{}'. Its todos were kept.", name);
                }
                Ok(())
            }
        }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date format '{}'. Use YYYY-MM-DD.", s))
}
