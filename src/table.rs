//! Route table: ordered pattern-to-descriptor mappings.

use std::collections::BTreeMap;

/// An ordered mapping from route pattern to handler descriptor.
///
/// Input order does not matter; matching always iterates keys in
/// descending lexicographic order, so longer and lexicographically larger
/// keys are attempted first (`/page/2` before `/page/1` before `/page`).
///
/// A table is supplied fresh per dispatch call and borrowed for its
/// duration; the engine never mutates or retains it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
	entries: BTreeMap<String, String>,
}

impl RouteTable {
	/// Creates an empty route table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a route, builder style.
	pub fn route(mut self, pattern: impl Into<String>, descriptor: impl Into<String>) -> Self {
		self.insert(pattern, descriptor);
		self
	}

	/// Inserts a route. A duplicate pattern replaces the prior descriptor.
	pub fn insert(&mut self, pattern: impl Into<String>, descriptor: impl Into<String>) {
		self.entries.insert(pattern.into(), descriptor.into());
	}

	/// Iterates `(pattern, descriptor)` pairs in descending lexicographic
	/// order over patterns. This is the match-selection order.
	pub fn iter_desc(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries
			.iter()
			.rev()
			.map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Returns the number of routes.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns whether the table has no routes.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<P: Into<String>, D: Into<String>> FromIterator<(P, D)> for RouteTable {
	fn from_iter<I: IntoIterator<Item = (P, D)>>(iter: I) -> Self {
		let mut table = Self::new();
		for (pattern, descriptor) in iter {
			table.insert(pattern, descriptor);
		}
		table
	}
}
