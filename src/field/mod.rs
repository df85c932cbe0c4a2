//! Generic field-state container used by the form.
//!
//! A field is registered with its stored value and a validator. The validator
//! is kept with the value so the form can re-check the field on demand.

pub mod email;
pub mod username;

use std::{collections::HashMap, fmt, sync::Arc};

use log::trace;

use crate::connection::Connection;

/// Re-validates a candidate value. Shared so it can be called from anywhere.
pub type Validator = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Sink receiving field registrations.
pub trait FieldRegistry {
    fn set_field(&mut self, connection: &Connection, value: String, key: &str, validator: Validator);
}

/// State of one registered field.
#[derive(Clone)]
pub struct FieldState {
    value: String,
    validator: Validator,
}

impl FieldState {
    pub fn new(value: String, validator: Validator) -> Self {
        Self { value, validator }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Runs the validator against the stored value.
    pub fn is_valid(&self) -> bool {
        (self.validator)(&self.value)
    }

    /// Runs the validator against another candidate.
    pub fn validate(&self, candidate: &str) -> bool {
        (self.validator)(candidate)
    }

    pub fn validator(&self) -> Validator {
        Arc::clone(&self.validator)
    }
}

impl fmt::Debug for FieldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldState")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// In-memory field container, one state per key.
#[derive(Debug, Default, Clone)]
pub struct FieldStore {
    fields: HashMap<String, FieldState>,
}

impl FieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FieldState> {
        self.fields.get(key)
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(FieldState::value)
    }

    /// Unknown fields are never valid.
    pub fn is_valid(&self, key: &str) -> bool {
        self.get(key).is_some_and(FieldState::is_valid)
    }

    pub fn validate(&self, key: &str, candidate: &str) -> Option<bool> {
        self.get(key).map(|state| state.validate(candidate))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldState> {
        self.fields.remove(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FieldRegistry for FieldStore {
    fn set_field(&mut self, _connection: &Connection, value: String, key: &str, validator: Validator) {
        trace!("Registering field {}", key);
        self.fields
            .insert(key.to_owned(), FieldState::new(value, validator));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn non_empty() -> Validator {
        Arc::new(|candidate: &str| !candidate.is_empty())
    }

    #[test]
    fn test_set_and_read_field() {
        let mut store = FieldStore::new();
        store.set_field(&Connection::default(), "alice".to_string(), "username", non_empty());

        assert_eq!(store.value("username"), Some("alice"));
        assert!(store.is_valid("username"));
        assert!(store.contains("username"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_validator_is_rerun_on_demand() {
        let mut store = FieldStore::new();
        store.set_field(&Connection::default(), String::new(), "username", non_empty());

        assert!(!store.is_valid("username"));
        assert_eq!(store.validate("username", "bob"), Some(true));
        assert_eq!(store.validate("username", ""), Some(false));
    }

    #[test]
    fn test_setting_again_replaces_state() {
        let mut store = FieldStore::new();
        let connection = Connection::default();
        store.set_field(&connection, "first".to_string(), "username", non_empty());
        store.set_field(&connection, "second".to_string(), "username", Arc::new(|_: &str| false));

        assert_eq!(store.len(), 1);
        assert_eq!(store.value("username"), Some("second"));
        assert!(!store.is_valid("username"));
    }

    #[test]
    fn test_unknown_field() {
        let mut store = FieldStore::new();

        assert!(store.is_empty());
        assert!(!store.is_valid("email"));
        assert_eq!(store.value("email"), None);
        assert_eq!(store.validate("email", "a@a.com"), None);
        assert!(store.remove("email").is_none());
    }

    #[test]
    fn test_debug_does_not_run_validator() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&calls);
        let state = FieldState::new(
            "alice".to_string(),
            Arc::new(move |_: &str| {
                counted.fetch_add(1, Ordering::SeqCst);
                true
            }),
        );

        let printed = format!("{:?}", state);
        assert!(printed.contains("alice"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_remove_field() {
        let mut store = FieldStore::new();
        store.set_field(&Connection::default(), "alice".to_string(), "username", non_empty());

        let removed = store.remove("username").unwrap();
        assert_eq!(removed.value(), "alice");
        assert!(removed.is_valid());
        assert!(store.is_empty());
    }
}
