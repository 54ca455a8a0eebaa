use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{DateKey, TodoId, TodoItem};

/// All todos, keyed by day. Each day's list is in display order.
///
/// A day with no entry reads as an empty list. Entries are only created by
/// [`TodoCollection::push`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoCollection {
    days: BTreeMap<DateKey, Vec<TodoItem>>,
}

impl TodoCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn get(&self, date: &DateKey) -> &[TodoItem] {
        self.days.get(date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn dates(&self) -> impl Iterator<Item = &DateKey> {
        self.days.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.days.values().all(Vec::is_empty)
    }

    pub fn has_todos(&self, date: &DateKey) -> bool {
        !self.get(date).is_empty()
    }

    /// False for a day with no todos.
    pub fn all_completed(&self, date: &DateKey) -> bool {
        let items = self.get(date);
        !items.is_empty() && items.iter().all(|item| item.completed)
    }

    pub fn max_id(&self) -> Option<TodoId> {
        self.days.values().flatten().map(|item| item.id).max()
    }

    pub fn position(&self, date: &DateKey, id: TodoId) -> Option<usize> {
        self.get(date).iter().position(|item| item.id == id)
    }

    /// An id below every id on `date`, or None when `i64::MIN` is taken.
    pub fn unused_id_below(&self, date: &DateKey) -> Option<TodoId> {
        match self.get(date).iter().map(|item| item.id.value()).min() {
            Some(lowest) => lowest.checked_sub(1).map(TodoId),
            None => Some(TodoId(i64::MAX)),
        }
    }

    /// Append to the end of the day's list, creating the day if needed.
    pub fn push(&mut self, date: DateKey, item: TodoItem) {
        self.days.entry(date).or_default().push(item);
    }

    pub fn remove(&mut self, date: &DateKey, id: TodoId) -> Option<TodoItem> {
        let items = self.days.get_mut(date)?;
        let index = items.iter().position(|item| item.id == id)?;
        Some(items.remove(index))
    }

    pub fn find_mut(&mut self, date: &DateKey, id: TodoId) -> Option<&mut TodoItem> {
        self.days
            .get_mut(date)?
            .iter_mut()
            .find(|item| item.id == id)
    }

    /// Move `from_id` into the slot currently held by `to_id`.
    ///
    /// Items between the two positions shift by one; this is not a swap.
    /// Returns false, leaving the list untouched, when either id is missing
    /// or both are the same.
    pub fn move_item(&mut self, date: &DateKey, from_id: TodoId, to_id: TodoId) -> bool {
        if from_id == to_id {
            return false;
        }
        let from = self.position(date, from_id);
        let to = self.position(date, to_id);
        let (Some(from), Some(to)) = (from, to) else {
            return false;
        };
        let Some(items) = self.days.get_mut(date) else {
            return false;
        };

        let item = items.remove(from);
        items.insert(to, item);
        true
    }
}
