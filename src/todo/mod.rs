pub mod collection;
pub mod date_key;
pub mod id;
pub mod item;

pub use collection::TodoCollection;
pub use date_key::DateKey;
pub use id::IdGenerator;
pub use item::{TodoId, TodoItem};
