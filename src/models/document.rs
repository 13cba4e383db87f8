use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Habit, Note, NoteCategory, Todo, TodoList};

/// The aggregate root: every domain collection plus the last-backup
/// timestamp. This whole object is the unit of persistence.
///
/// `todo_lists` and `note_categories` were added after the format's first
/// version, so they default to empty when missing from older documents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistentDocument {
    pub habits: Vec<Habit>,
    pub todos: Vec<Todo>,
    #[serde(default)]
    pub todo_lists: Vec<TodoList>,
    pub notes: Vec<Note>,
    #[serde(default)]
    pub note_categories: Vec<NoteCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_backup_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let doc = PersistentDocument::default();
        assert!(doc.habits.is_empty());
        assert!(doc.todos.is_empty());
        assert!(doc.last_backup_date.is_none());
    }

    #[test]
    fn test_old_documents_without_new_collections_still_parse() {
        // Format predating todoLists and noteCategories.
        let json = r#"{"habits": [], "todos": [], "notes": []}"#;
        let doc: PersistentDocument = serde_json::from_str(json).unwrap();
        assert!(doc.todo_lists.is_empty());
        assert!(doc.note_categories.is_empty());
    }

    #[test]
    fn test_missing_core_collection_is_an_error() {
        let json = r#"{"habits": [], "todos": []}"#;
        assert!(serde_json::from_str::<PersistentDocument>(json).is_err());
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let doc = PersistentDocument::default();
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("todoLists").is_some());
        assert!(json.get("noteCategories").is_some());
    }
}
