use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use super::kv::KeyValueStore;
use crate::todo::{DateKey, IdGenerator, TodoCollection, TodoId, TodoItem};

/// Well-known key the whole collection is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "allTodos";

/// Date-indexed todo lists with write-through persistence.
///
/// Every mutation is applied in memory first and then the full collection is
/// written to the backend. The in-memory collection stays authoritative when a
/// write fails; the store is then marked dirty until a later write succeeds.
pub struct DateTodoStore<B: KeyValueStore> {
    collection: TodoCollection,
    backend: B,
    key: String,
    ids: IdGenerator,
    dirty: bool,
}

impl<B: KeyValueStore> DateTodoStore<B> {
    /// Load the collection stored under `key`, or start empty.
    ///
    /// Missing, unreadable, or malformed data is logged and replaced by an
    /// empty collection; loading never fails.
    pub fn load(backend: B, key: impl Into<String>) -> Self {
        let key = key.into();
        let collection = match backend.get(&key) {
            Ok(Some(raw)) => match TodoCollection::from_json(&raw) {
                Ok(collection) => {
                    info!(key = %key, days = collection.dates().count(), "Loaded todos");
                    collection
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Stored todos are malformed, starting empty");
                    TodoCollection::new()
                }
            },
            Ok(None) => {
                debug!(key = %key, "No stored todos, starting empty");
                TodoCollection::new()
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read stored todos, starting empty");
                TodoCollection::new()
            }
        };

        Self {
            ids: IdGenerator::seeded_after(collection.max_id()),
            collection,
            backend,
            key,
            dirty: false,
        }
    }

    /// Write the full collection to the backend.
    pub fn save(&mut self) -> Result<()> {
        let result = self
            .collection
            .to_json()
            .context("Failed to serialize todos")
            .and_then(|json| {
                self.backend
                    .set(&self.key, &json)
                    .with_context(|| format!("Failed to store todos under {:?}", self.key))
            });

        self.dirty = result.is_err();
        result
    }

    /// Retry the write if an earlier one failed.
    pub fn flush(&mut self) -> Result<()> {
        if self.dirty { self.save() } else { Ok(()) }
    }

    /// True while the durable copy is behind the in-memory collection.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn collection(&self) -> &TodoCollection {
        &self.collection
    }

    pub fn todos_for_date(&self, date: &DateKey) -> &[TodoItem] {
        self.collection.get(date)
    }

    pub fn has_todos(&self, date: &DateKey) -> bool {
        self.collection.has_todos(date)
    }

    pub fn all_completed(&self, date: &DateKey) -> bool {
        self.collection.all_completed(date)
    }

    /// Append a new todo. Blank text is ignored and nothing is written.
    pub fn add_todo(&mut self, date: &DateKey, text: &str) -> Option<TodoId> {
        if text.trim().is_empty() {
            debug!(date = %date, "Ignoring blank todo");
            return None;
        }

        // Past i64::MAX, fall back to an id below everything on this day.
        let Some(id) = self
            .ids
            .next_id()
            .or_else(|| self.collection.unused_id_below(date))
        else {
            warn!(date = %date, "No free todo id left, dropping add");
            return None;
        };
        self.collection
            .push(date.clone(), TodoItem::new(id, text.to_string()));
        debug!(date = %date, id = %id, "Added todo");
        self.persist();
        Some(id)
    }

    /// Returns whether a todo was removed. Writes either way.
    pub fn delete_todo(&mut self, date: &DateKey, id: TodoId) -> bool {
        let removed = self.collection.remove(date, id).is_some();
        debug!(date = %date, id = %id, removed, "Delete todo");
        self.persist();
        removed
    }

    /// Returns whether a todo was found. Writes either way.
    pub fn toggle_todo(&mut self, date: &DateKey, id: TodoId) -> bool {
        let found = match self.collection.find_mut(date, id) {
            Some(item) => {
                item.toggle();
                true
            }
            None => false,
        };
        debug!(date = %date, id = %id, found, "Toggle todo");
        self.persist();
        found
    }

    /// Replace a todo's text verbatim. Unlike add, blank text is accepted.
    pub fn edit_todo(&mut self, date: &DateKey, id: TodoId, new_text: &str) -> bool {
        let found = match self.collection.find_mut(date, id) {
            Some(item) => {
                item.text = new_text.to_string();
                true
            }
            None => false,
        };
        debug!(date = %date, id = %id, found, "Edit todo");
        self.persist();
        found
    }

    /// Move the dragged todo into the drop target's position.
    ///
    /// Missing ids or dropping an item onto itself change nothing and skip the
    /// write.
    pub fn reorder_todo(&mut self, date: &DateKey, from_id: TodoId, to_id: TodoId) -> bool {
        if !self.collection.move_item(date, from_id, to_id) {
            debug!(date = %date, from = %from_id, to = %to_id, "Reorder skipped");
            return false;
        }
        debug!(date = %date, from = %from_id, to = %to_id, "Reordered todo");
        self.persist();
        true
    }

    fn persist(&mut self) {
        if let Err(e) = self.save() {
            let error = format!("{e:#}");
            warn!(key = %self.key, error = %error, "Todos kept in memory only");
        }
    }
}
