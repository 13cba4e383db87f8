use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Habit,
    Todo,
    Note,
    System,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::Habit => write!(f, "habit"),
            NotificationKind::Todo => write!(f, "todo"),
            NotificationKind::Note => write!(f, "note"),
            NotificationKind::System => write!(f, "system"),
        }
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "habit" => Ok(NotificationKind::Habit),
            "todo" => Ok(NotificationKind::Todo),
            "note" => Ok(NotificationKind::Note),
            "system" => Ok(NotificationKind::System),
            _ => Err(format!(
                "Invalid notification type '{}'. Valid options: habit, todo, note, system",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<Uuid>,
}

impl Notification {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            message: message.into(),
            kind,
            read: false,
            created_at: Utc::now(),
            target_id: None,
        }
    }

    pub fn with_target(mut self, target_id: Uuid) -> Self {
        self.target_id = Some(target_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_new_defaults_unread() {
        let n = Notification::new("Reminder", "Drink water", NotificationKind::Habit);
        assert!(!n.read);
        assert!(n.target_id.is_none());
    }

    #[test]
    fn test_kind_serializes_under_type_key() {
        let n = Notification::new("Reminder", "Drink water", NotificationKind::System);
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json.get("type").unwrap(), "system");
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(
            NotificationKind::from_str("todo").unwrap(),
            NotificationKind::Todo
        );
        assert!(NotificationKind::from_str("email").is_err());
    }
}
