//! Local key/value storage for BuildTrack
//!
//! This crate provides string-keyed, string-valued storage with the same
//! semantics as a browser's local storage: `get_item`, `set_item`,
//! `remove_item`, `keys`. Two backends are included:
//!
//! - [`FileStorage`]: one JSON document on disk, written atomically
//!   (temp file, fsync, rename).
//! - [`MemoryStorage`]: in-process map, for tests and throwaway sessions.
//!
//! # Examples
//!
//! ```
//! use buildtrack_storage::{MemoryStorage, Storage};
//!
//! let mut storage = MemoryStorage::new();
//! storage.set_item("buildtrack_users_db", "[]").unwrap();
//! assert_eq!(storage.get_item("buildtrack_users_db").unwrap().as_deref(), Some("[]"));
//! ```

#![warn(missing_docs)]

mod error;
mod file;
mod memory;

pub use error::{Result, StorageError};
pub use file::{default_path, FileStorage};
pub use memory::MemoryStorage;

/// Key/value storage with local-storage semantics.
///
/// Reads of a missing key return `Ok(None)`; removing a missing key is not
/// an error.
pub trait Storage {
    /// Returns the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`.
    fn remove_item(&mut self, key: &str) -> Result<()>;

    /// Lists all stored keys in sorted order.
    fn keys(&self) -> Result<Vec<String>>;
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        (**self).remove_item(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}
