use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every edit; never decreases.
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
}

impl Note {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
            color: None,
            tags: None,
            category_id: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", "=".repeat(self.title.len()))?;
        writeln!(f, "{}", self.content)?;
        if let Some(tags) = &self.tags {
            writeln!(f, "\nTags: {}", tags.join(", "))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteCategory {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl NoteCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_new_sets_both_timestamps() {
        let note = Note::new("Ideas", "Write more Rust");
        assert_eq!(note.created_at, note.updated_at);
        assert!(note.category_id.is_none());
    }

    #[test]
    fn test_note_display_includes_tags() {
        let note = Note::new("Ideas", "Body").with_tags(vec!["a".into(), "b".into()]);
        let output = format!("{}", note);
        assert!(output.contains("Ideas"));
        assert!(output.contains("Tags: a, b"));
    }

    #[test]
    fn test_note_json_uses_camel_case() {
        let note = Note::new("Ideas", "Body").with_category(Uuid::new_v4());
        let json = serde_json::to_value(&note).unwrap();
        assert!(json.get("categoryId").is_some());
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn test_category_new() {
        let category = NoteCategory::new("Journal").with_color("#0000ff");
        assert_eq!(category.name, "Journal");
        assert_eq!(category.color.as_deref(), Some("#0000ff"));
    }
}
