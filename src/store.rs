//! Context store: a router-wide key/value map for cross-phase data
//! passing.
//!
//! Hooks, handlers and error views share one store per router. Entries
//! persist across dispatches until [`ContextStore::clear`] is called; the
//! store is never reset automatically.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;

/// A mutable key/value map shared by every phase of a dispatch.
///
/// Values are [`serde_json::Value`], so hosts can pass structured data
/// between a before-hook, a handler and an after-hook. A value explicitly
/// stored as `Value::Null` or an empty string is still *present*:
/// [`ContextStore::get`] returns `Some` for it and `None` only for keys
/// that were never set (or cleared).
#[derive(Debug, Default)]
pub struct ContextStore {
	entries: RwLock<HashMap<String, Value>>,
}

impl ContextStore {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores `value` under `name` and returns the stored value.
	/// Last write wins.
	pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) -> Value {
		let value = value.into();
		self.entries.write().insert(name.into(), value.clone());
		value
	}

	/// Returns the value stored under `name`, or `None` if never set.
	pub fn get(&self, name: &str) -> Option<Value> {
		self.entries.read().get(name).cloned()
	}

	/// Discards all entries.
	pub fn clear(&self) {
		self.entries.write().clear();
	}

	/// Returns the number of stored entries.
	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	/// Returns whether the store has no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_set_get_clear() {
		let store = ContextStore::new();
		assert_eq!(store.set("k", "v"), Value::String("v".into()));
		assert_eq!(store.get("k"), Some(Value::String("v".into())));

		store.clear();
		assert_eq!(store.get("k"), None);
		assert!(store.is_empty());
	}

	#[test]
	fn test_last_write_wins() {
		let store = ContextStore::new();
		store.set("k", "first");
		store.set("k", "second");
		assert_eq!(store.get("k"), Some(Value::String("second".into())));
	}

	#[test]
	fn test_null_is_present_not_absent() {
		let store = ContextStore::new();
		store.set("empty", Value::Null);
		store.set("blank", "");

		assert_eq!(store.get("empty"), Some(Value::Null));
		assert_eq!(store.get("blank"), Some(Value::String(String::new())));
		assert_eq!(store.get("missing"), None);
	}

	#[test]
	fn test_structured_values() {
		let store = ContextStore::new();
		store.set("user", json!({"id": 42, "name": "sumon"}));
		let user = store.get("user").unwrap();
		assert_eq!(user["id"], json!(42));
	}
}
