mod document;
mod habit;
mod note;
mod notification;
mod todo;

pub use document::PersistentDocument;
pub use habit::{current_streak, Frequency, Habit};
pub use note::{Note, NoteCategory};
pub use notification::{Notification, NotificationKind};
pub use todo::{Priority, Todo, TodoList};
