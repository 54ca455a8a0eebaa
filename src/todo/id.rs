use chrono::Utc;

use super::TodoId;

/// Hands out time-based ids that strictly increase within a session.
///
/// Two adds in the same millisecond, or a clock that steps backwards, still
/// get distinct ids. Returns None once `i64::MAX` has been handed out.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start after an id that is already in use.
    pub fn seeded_after(max_existing: Option<TodoId>) -> Self {
        Self {
            last: max_existing.map(TodoId::value).unwrap_or(0),
        }
    }

    pub fn next_id(&mut self) -> Option<TodoId> {
        self.next_at(Utc::now().timestamp_millis())
    }

    pub fn next_at(&mut self, now_millis: i64) -> Option<TodoId> {
        let id = now_millis.max(self.last.checked_add(1)?);
        self.last = id;
        Some(TodoId(id))
    }
}
