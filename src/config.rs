//! Router configuration: a flat string key/value map.
//!
//! Configuration is supplied by the host as plain key/value pairs; loading
//! and storage are out of scope. Repeated calls overlay key by key
//! (shallow merge), so later values win for overlapping keys while
//! non-overlapping keys are preserved.

use std::collections::HashMap;

/// Prefix stripped from the request path before matching.
pub const SUB_DIR_PATH: &str = "SubDirPath";

/// Handler descriptor invoked on any dispatch error, receiving the error.
pub const ERROR_VIEW: &str = "ErrorView";

/// Member name used when a bare handler descriptor is resolved against a
/// registered controller.
pub const DEFAULT_FUNCTION: &str = "DefaultFunction";

/// Flat configuration map for the router.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
	values: HashMap<String, String>,
}

impl Config {
	/// Creates an empty configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets a single option. Last write wins.
	pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.values.insert(key.into(), value.into());
	}

	/// Overlays the given entries onto the current configuration, key by
	/// key.
	pub fn merge<K, V>(&mut self, entries: impl IntoIterator<Item = (K, V)>)
	where
		K: Into<String>,
		V: Into<String>,
	{
		self.values
			.extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
	}

	/// Returns the value for `key`, if set.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.values.get(key).map(String::as_str)
	}

	/// Returns the number of configured options.
	pub fn len(&self) -> usize {
		self.values.len()
	}

	/// Returns whether no options are configured.
	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_set_and_get() {
		let mut config = Config::new();
		config.set(SUB_DIR_PATH, "/sub-dir");
		assert_eq!(config.get(SUB_DIR_PATH), Some("/sub-dir"));
		assert_eq!(config.get(ERROR_VIEW), None);
	}

	#[test]
	fn test_shallow_merge_overlays() {
		let mut config = Config::new();
		config.merge([(SUB_DIR_PATH, "/old"), (DEFAULT_FUNCTION, "Go")]);
		config.merge([(SUB_DIR_PATH, "/new")]);

		// Overlapping key takes the later value; the rest survive.
		assert_eq!(config.get(SUB_DIR_PATH), Some("/new"));
		assert_eq!(config.get(DEFAULT_FUNCTION), Some("Go"));
		assert_eq!(config.len(), 2);
	}
}
