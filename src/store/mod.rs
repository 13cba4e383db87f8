//! The local store: the in-memory snapshot of every domain collection,
//! mirrored to disk after each mutation.
//!
//! The store exclusively owns its collections. Entities reference each other
//! by ID only, so deletes walk dependents explicitly. Every successful
//! mutation re-serializes the owning document wholesale; mutations against
//! an unknown ID are silent no-ops and skip the write.

use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{
    current_streak, Frequency, Habit, Note, NoteCategory, Notification, PersistentDocument,
    Priority, Todo, TodoList,
};
use crate::storage::{DataStorage, StorageError, StoreKey};

/// Partial update for a habit. `None` fields are left unchanged.
#[derive(Debug, Default)]
pub struct HabitPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub frequency: Option<Frequency>,
    pub reminder_time: Option<String>,
    pub color: Option<String>,
    /// Manual date edits; normalized to sorted, duplicate-free order.
    pub completed_dates: Option<Vec<NaiveDate>>,
}

/// Partial update for a todo. `None` fields are left unchanged.
#[derive(Debug, Default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub reminder_time: Option<String>,
    pub tags: Option<Vec<String>>,
    pub list_id: Option<Uuid>,
}

/// Partial update for a todo list.
#[derive(Debug, Default)]
pub struct TodoListPatch {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Partial update for a note. `updated_at` is always refreshed.
#[derive(Debug, Default)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub color: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category_id: Option<Uuid>,
}

/// Partial update for a note category.
#[derive(Debug, Default)]
pub struct NoteCategoryPatch {
    pub name: Option<String>,
    pub color: Option<String>,
}

pub struct Store {
    storage: DataStorage,
    document: PersistentDocument,
    notifications: Vec<Notification>,
}

impl Store {
    /// Loads the persisted state, falling back to an empty document when a
    /// file is absent or malformed. Malformed data is logged and replaced;
    /// the application always stays interactive.
    pub fn load(storage: DataStorage) -> Self {
        Self::load_at(storage, Local::now().date_naive())
    }

    /// `today` anchors the streak refresh for the loaded habits.
    fn load_at(storage: DataStorage, today: NaiveDate) -> Self {
        let mut document = match storage.load(StoreKey::Document) {
            Ok(Some(doc)) => doc,
            Ok(None) => PersistentDocument::default(),
            Err(e) => {
                warn!("failed to load saved data, starting empty: {}", e);
                PersistentDocument::default()
            }
        };

        // Stored streaks go stale as days pass; the dates are the source of
        // truth.
        for habit in &mut document.habits {
            habit.streak = current_streak(&habit.completed_dates, habit.frequency, today);
        }

        let notifications = match storage.load(StoreKey::Notifications) {
            Ok(Some(list)) => list,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("failed to load saved notifications, starting empty: {}", e);
                Vec::new()
            }
        };

        Self {
            storage,
            document,
            notifications,
        }
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn habits(&self) -> &[Habit] {
        &self.document.habits
    }

    pub fn todos(&self) -> &[Todo] {
        &self.document.todos
    }

    pub fn todo_lists(&self) -> &[TodoList] {
        &self.document.todo_lists
    }

    pub fn notes(&self) -> &[Note] {
        &self.document.notes
    }

    pub fn note_categories(&self) -> &[NoteCategory] {
        &self.document.note_categories
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn last_backup_date(&self) -> Option<DateTime<Utc>> {
        self.document.last_backup_date
    }

    pub fn habit(&self, id: Uuid) -> Option<&Habit> {
        self.document.habits.iter().find(|h| h.id == id)
    }

    pub fn todo(&self, id: Uuid) -> Option<&Todo> {
        self.document.todos.iter().find(|t| t.id == id)
    }

    pub fn todo_list(&self, id: Uuid) -> Option<&TodoList> {
        self.document.todo_lists.iter().find(|l| l.id == id)
    }

    pub fn note(&self, id: Uuid) -> Option<&Note> {
        self.document.notes.iter().find(|n| n.id == id)
    }

    pub fn note_category(&self, id: Uuid) -> Option<&NoteCategory> {
        self.document.note_categories.iter().find(|c| c.id == id)
    }

    // ------------------------------------------------------------------
    // Habits
    // ------------------------------------------------------------------

    pub fn add_habit(&mut self, habit: Habit) -> Result<Habit, StoreError> {
        self.document.habits.push(habit.clone());
        self.persist()?;
        Ok(habit)
    }

    /// Merges `patch` into the habit matching `id`; silent no-op when the ID
    /// is unknown. `today` anchors the streak recomputation after manual
    /// date edits.
    pub fn update_habit(
        &mut self,
        id: Uuid,
        patch: HabitPatch,
        today: NaiveDate,
    ) -> Result<Option<Habit>, StoreError> {
        let Some(habit) = self.document.habits.iter_mut().find(|h| h.id == id) else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            habit.name = name;
        }
        if let Some(description) = patch.description {
            habit.description = Some(description);
        }
        if let Some(frequency) = patch.frequency {
            habit.frequency = frequency;
        }
        if let Some(reminder_time) = patch.reminder_time {
            habit.reminder_time = Some(reminder_time);
        }
        if let Some(color) = patch.color {
            habit.color = Some(color);
        }
        if let Some(mut dates) = patch.completed_dates {
            dates.sort_unstable();
            dates.dedup();
            habit.completed_dates = dates;
        }
        habit.streak = current_streak(&habit.completed_dates, habit.frequency, today);

        let habit = habit.clone();
        self.persist()?;
        Ok(Some(habit))
    }

    pub fn delete_habit(&mut self, id: Uuid) -> Result<bool, StoreError> {
        let before = self.document.habits.len();
        self.document.habits.retain(|h| h.id != id);
        if self.document.habits.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Toggles today's completion for a habit.
    ///
    /// Removes `today` when already present, inserts it (keeping the dates
    /// sorted and duplicate-free) otherwise. The streak is recomputed from
    /// the dates in both cases, so toggling twice is an involution.
    pub fn toggle_habit(
        &mut self,
        id: Uuid,
        today: NaiveDate,
    ) -> Result<Option<Habit>, StoreError> {
        let Some(habit) = self.document.habits.iter_mut().find(|h| h.id == id) else {
            return Ok(None);
        };

        match habit.completed_dates.binary_search(&today) {
            Ok(i) => {
                habit.completed_dates.remove(i);
            }
            Err(i) => {
                habit.completed_dates.insert(i, today);
            }
        }
        habit.streak = current_streak(&habit.completed_dates, habit.frequency, today);

        let habit = habit.clone();
        self.persist()?;
        Ok(Some(habit))
    }

    // ------------------------------------------------------------------
    // Todos
    // ------------------------------------------------------------------

    pub fn add_todo(&mut self, todo: Todo) -> Result<Todo, StoreError> {
        self.document.todos.push(todo.clone());
        self.persist()?;
        Ok(todo)
    }

    pub fn update_todo(&mut self, id: Uuid, patch: TodoPatch) -> Result<Option<Todo>, StoreError> {
        let Some(todo) = self.document.todos.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            todo.title = title;
        }
        if let Some(description) = patch.description {
            todo.description = Some(description);
        }
        if let Some(priority) = patch.priority {
            todo.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            todo.due_date = Some(due_date);
        }
        if let Some(reminder_time) = patch.reminder_time {
            todo.reminder_time = Some(reminder_time);
        }
        if let Some(tags) = patch.tags {
            todo.tags = Some(tags);
        }
        if let Some(list_id) = patch.list_id {
            todo.list_id = Some(list_id);
        }

        let todo = todo.clone();
        self.persist()?;
        Ok(Some(todo))
    }

    pub fn delete_todo(&mut self, id: Uuid) -> Result<bool, StoreError> {
        let before = self.document.todos.len();
        self.document.todos.retain(|t| t.id != id);
        if self.document.todos.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Flips the completion flag. The returned todo carries the new state so
    /// callers can confirm the transition to completed.
    pub fn toggle_todo(&mut self, id: Uuid) -> Result<Option<Todo>, StoreError> {
        let Some(todo) = self.document.todos.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        todo.completed = !todo.completed;

        let todo = todo.clone();
        self.persist()?;
        Ok(Some(todo))
    }

    // ------------------------------------------------------------------
    // Todo lists
    // ------------------------------------------------------------------

    pub fn add_todo_list(&mut self, list: TodoList) -> Result<TodoList, StoreError> {
        self.document.todo_lists.push(list.clone());
        self.persist()?;
        Ok(list)
    }

    pub fn update_todo_list(
        &mut self,
        id: Uuid,
        patch: TodoListPatch,
    ) -> Result<Option<TodoList>, StoreError> {
        let Some(list) = self.document.todo_lists.iter_mut().find(|l| l.id == id) else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            list.name = name;
        }
        if let Some(color) = patch.color {
            list.color = Some(color);
        }

        let list = list.clone();
        self.persist()?;
        Ok(Some(list))
    }

    /// Deletes a todo list and detaches its todos: dependents keep existing
    /// with their list reference cleared.
    pub fn delete_todo_list(&mut self, id: Uuid) -> Result<bool, StoreError> {
        let before = self.document.todo_lists.len();
        self.document.todo_lists.retain(|l| l.id != id);
        if self.document.todo_lists.len() == before {
            return Ok(false);
        }

        let mut detached = 0;
        for todo in &mut self.document.todos {
            if todo.list_id == Some(id) {
                todo.list_id = None;
                detached += 1;
            }
        }
        debug!("deleted todo list {}, detached {} todos", id, detached);

        self.persist()?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Notes
    // ------------------------------------------------------------------

    pub fn add_note(&mut self, note: Note) -> Result<Note, StoreError> {
        self.document.notes.push(note.clone());
        self.persist()?;
        Ok(note)
    }

    /// Merges `patch` into the note matching `id` and refreshes
    /// `updated_at`, which never decreases.
    pub fn update_note(&mut self, id: Uuid, patch: NotePatch) -> Result<Option<Note>, StoreError> {
        let Some(note) = self.document.notes.iter_mut().find(|n| n.id == id) else {
            return Ok(None);
        };

        if let Some(title) = patch.title {
            note.title = title;
        }
        if let Some(content) = patch.content {
            note.content = content;
        }
        if let Some(color) = patch.color {
            note.color = Some(color);
        }
        if let Some(tags) = patch.tags {
            note.tags = Some(tags);
        }
        if let Some(category_id) = patch.category_id {
            note.category_id = Some(category_id);
        }
        note.updated_at = Utc::now().max(note.updated_at);

        let note = note.clone();
        self.persist()?;
        Ok(Some(note))
    }

    pub fn delete_note(&mut self, id: Uuid) -> Result<bool, StoreError> {
        let before = self.document.notes.len();
        self.document.notes.retain(|n| n.id != id);
        if self.document.notes.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Note categories
    // ------------------------------------------------------------------

    pub fn add_note_category(&mut self, category: NoteCategory) -> Result<NoteCategory, StoreError> {
        self.document.note_categories.push(category.clone());
        self.persist()?;
        Ok(category)
    }

    pub fn update_note_category(
        &mut self,
        id: Uuid,
        patch: NoteCategoryPatch,
    ) -> Result<Option<NoteCategory>, StoreError> {
        let Some(category) = self
            .document
            .note_categories
            .iter_mut()
            .find(|c| c.id == id)
        else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            category.name = name;
        }
        if let Some(color) = patch.color {
            category.color = Some(color);
        }

        let category = category.clone();
        self.persist()?;
        Ok(Some(category))
    }

    /// Deletes a note category and detaches its notes: the notes survive
    /// with their category reference cleared.
    pub fn delete_note_category(&mut self, id: Uuid) -> Result<bool, StoreError> {
        let before = self.document.note_categories.len();
        self.document.note_categories.retain(|c| c.id != id);
        if self.document.note_categories.len() == before {
            return Ok(false);
        }

        for note in &mut self.document.notes {
            if note.category_id == Some(id) {
                note.category_id = None;
            }
        }

        self.persist()?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Notifications (independent collection)
    // ------------------------------------------------------------------

    pub fn add_notification(
        &mut self,
        notification: Notification,
    ) -> Result<Notification, StoreError> {
        // Newest first.
        self.notifications.insert(0, notification.clone());
        self.persist_notifications()?;
        Ok(notification)
    }

    pub fn mark_notification_read(&mut self, id: Uuid) -> Result<bool, StoreError> {
        let Some(notification) = self.notifications.iter_mut().find(|n| n.id == id) else {
            return Ok(false);
        };
        notification.read = true;
        self.persist_notifications()?;
        Ok(true)
    }

    pub fn delete_notification(&mut self, id: Uuid) -> Result<bool, StoreError> {
        let before = self.notifications.len();
        self.notifications.retain(|n| n.id != id);
        if self.notifications.len() == before {
            return Ok(false);
        }
        self.persist_notifications()?;
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Snapshot exchange
    // ------------------------------------------------------------------

    /// Returns a copy of the full document stamped with `now` as the backup
    /// time. Does not mutate persisted state.
    pub fn export_snapshot(&self, now: DateTime<Utc>) -> PersistentDocument {
        let mut snapshot = self.document.clone();
        snapshot.last_backup_date = Some(now);
        snapshot
    }

    /// Replaces the document wholesale. Validation happens at the file
    /// boundary (`snapshot::read_snapshot`); there is no merge.
    pub fn import_snapshot(&mut self, document: PersistentDocument) -> Result<(), StoreError> {
        self.document = document;
        self.persist()?;
        Ok(())
    }

    /// Records a completed backup.
    pub fn mark_backed_up(&mut self, now: DateTime<Utc>) -> Result<(), StoreError> {
        self.document.last_backup_date = Some(now);
        self.persist()?;
        Ok(())
    }

    // ------------------------------------------------------------------

    fn persist(&self) -> Result<(), StoreError> {
        self.storage.save(StoreKey::Document, &self.document)?;
        Ok(())
    }

    fn persist_notifications(&self) -> Result<(), StoreError> {
        self.storage
            .save(StoreKey::Notifications, &self.notifications)?;
        Ok(())
    }
}

#[derive(Debug)]
pub enum StoreError {
    Storage(StorageError),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Storage(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Storage(e) => Some(e),
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(e: StorageError) -> Self {
        StoreError::Storage(e)
    }
}
