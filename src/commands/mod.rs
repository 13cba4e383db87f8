mod config_cmd;
mod data;
mod drive;
mod habit;
mod note;
mod notify;
mod todo;

pub use config_cmd::ConfigCommand;
pub use data::DataCommand;
pub use drive::DriveCommand;
pub use habit::HabitCommand;
pub use note::NoteCommand;
pub use notify::NotifyCommand;
pub use todo::TodoCommand;

use clap::ValueEnum;
use uuid::Uuid;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Resolves a user-supplied reference (UUID, case-insensitive name, or
/// unique name prefix) to an entity ID. An exact name match wins over
/// prefix matches; either must identify exactly one entity.
fn resolve<T>(
    items: &[T],
    reference: &str,
    label: &str,
    id_of: impl Fn(&T) -> Uuid,
    name_of: impl Fn(&T) -> &str,
) -> Result<Uuid, String> {
    if let Ok(uuid) = Uuid::parse_str(reference) {
        if items.iter().any(|item| id_of(item) == uuid) {
            return Ok(uuid);
        }
        return Err(format!("{} not found: {}", label, reference));
    }

    let exact: Vec<Uuid> = items
        .iter()
        .filter(|item| name_of(item).eq_ignore_ascii_case(reference))
        .map(|item| id_of(item))
        .collect();

    match exact.as_slice() {
        [id] => return Ok(*id),
        [] => {}
        _ => {
            return Err(format!(
                "Multiple {}s named '{}'. Use the ID instead.",
                label.to_lowercase(),
                reference
            ))
        }
    }

    let lowered = reference.to_lowercase();
    let prefixed: Vec<Uuid> = items
        .iter()
        .filter(|item| name_of(item).to_lowercase().starts_with(&lowered))
        .map(|item| id_of(item))
        .collect();

    match prefixed.as_slice() {
        [id] => Ok(*id),
        [] => Err(format!("{} not found: {}", label, reference)),
        _ => Err(format!(
            "'{}' matches multiple {}s. Use the ID or a longer prefix.",
            reference,
            label.to_lowercase()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, Habit};

    #[test]
    fn test_resolve_by_name_is_case_insensitive() {
        let habits = vec![Habit::new("Read", Frequency::Daily)];
        let id = resolve(&habits, "read", "Habit", |h| h.id, |h| &h.name).unwrap();
        assert_eq!(id, habits[0].id);
    }

    #[test]
    fn test_resolve_by_id() {
        let habits = vec![Habit::new("Read", Frequency::Daily)];
        let id_str = habits[0].id.to_string();
        let id = resolve(&habits, &id_str, "Habit", |h| h.id, |h| &h.name).unwrap();
        assert_eq!(id, habits[0].id);
    }

    #[test]
    fn test_resolve_unknown_is_error() {
        let habits = vec![Habit::new("Read", Frequency::Daily)];
        assert!(resolve(&habits, "run", "Habit", |h| h.id, |h| &h.name).is_err());
    }

    #[test]
    fn test_resolve_by_unique_prefix() {
        let habits = vec![
            Habit::new("Read", Frequency::Daily),
            Habit::new("Stretch", Frequency::Daily),
        ];
        let id = resolve(&habits, "str", "Habit", |h| h.id, |h| &h.name).unwrap();
        assert_eq!(id, habits[1].id);
    }

    #[test]
    fn test_resolve_exact_match_wins_over_prefix() {
        let habits = vec![
            Habit::new("Read", Frequency::Daily),
            Habit::new("Reading list", Frequency::Weekly),
        ];
        let id = resolve(&habits, "read", "Habit", |h| h.id, |h| &h.name).unwrap();
        assert_eq!(id, habits[0].id);
    }

    #[test]
    fn test_resolve_ambiguous_prefix_is_error() {
        let habits = vec![
            Habit::new("Run", Frequency::Daily),
            Habit::new("Rur", Frequency::Daily),
        ];
        let err = resolve(&habits, "ru", "Habit", |h| h.id, |h| &h.name).unwrap_err();
        assert!(err.contains("longer prefix"));
    }

    #[test]
    fn test_resolve_ambiguous_name_is_error() {
        let habits = vec![
            Habit::new("Read", Frequency::Daily),
            Habit::new("read", Frequency::Weekly),
        ];
        let err = resolve(&habits, "READ", "Habit", |h| h.id, |h| &h.name).unwrap_err();
        assert!(err.contains("Multiple"));
    }
}
