//! Durable key-value storage seam.
//!
//! RULE: The tracker never knows where its state lives.
//! Anything that can get/set a string under a key can back it:
//! an in-page map, a SQLite table, a browser's local storage.

use crate::error::WidgetResult;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub trait KeyValueStorage {
    /// Read the value under `key`. `Ok(None)` means no entry.
    fn get(&self, key: &str) -> WidgetResult<Option<String>>;

    /// Overwrite the value under `key` (last write wins).
    fn set(&mut self, key: &str, value: &str) -> WidgetResult<()>;

    fn remove(&mut self, key: &str) -> WidgetResult<()>;
}

/// In-memory storage. Clones share the same entries, the way every
/// script on a page shares one local storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> WidgetResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> WidgetResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> WidgetResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let mut a = MemoryStorage::new();
        let b = a.clone();
        a.set("k", "v1").unwrap();
        a.set("k", "v2").unwrap();
        assert_eq!(b.get("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(b.len(), 1);
        a.remove("k").unwrap();
        assert!(b.get("k").unwrap().is_none());
    }
}
