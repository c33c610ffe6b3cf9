// src/registry.rs
//! Name to dense id registry.

use std::collections::HashMap;

use parking_lot::Mutex;

#[derive(Debug, Default)]
struct State {
    ids: HashMap<String, usize>,
    names: Vec<String>,
}

/// Thread-safe bijection from names to ids `0..count`.
///
/// Ids are handed out in insertion order and never reused.
#[derive(Debug, Default)]
pub struct IdRegistry {
    state: Mutex<State>,
}

impl IdRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up `name`, assigning the next id when it is unknown and
    /// `allow_create` is set.
    pub fn get_id(&self, name: &str, allow_create: bool) -> Option<usize> {
        if allow_create {
            return Some(self.get_or_create(name));
        }
        self.state.lock().ids.get(name).copied()
    }

    /// Id of `name`, assigned on first sight.
    pub fn get_or_create(&self, name: &str) -> usize {
        let mut state = self.state.lock();
        if let Some(&id) = state.ids.get(name) {
            return id;
        }
        let id = state.names.len();
        state.names.push(name.to_string());
        state.ids.insert(name.to_string(), id);
        id
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.state.lock().names.len()
    }

    /// Names indexed by id.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.state.lock().names.clone()
    }
}
