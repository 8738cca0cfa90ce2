//! Route pattern compilation and path matching.
//!
//! A route pattern is a literal path, optionally carrying embedded regex
//! groups or the shorthand tokens `:any`, `:str` and `:num`. Compilation
//! anchors the pattern at both ends, allows one optional trailing slash and
//! matches case-insensitively.

use regex::RegexBuilder;
use thiserror::Error;

/// Maximum allowed size for a compiled route pattern regex (in bytes).
const MAX_PATTERN_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// Shorthand tokens and their regex replacements, applied globally as
/// literal text substitution. Each occurrence captures independently.
const TOKENS: [(&str, &str); 3] = [
	(":any", "(.+)"),
	(":str", "([a-zA-Z\\-_.]+)"),
	(":num", "([0-9.]+)"),
];

/// Error type for pattern compilation.
#[derive(Debug, Clone, Error)]
pub enum PatternError {
	/// The pattern did not compile to a valid regex.
	#[error("invalid route pattern '{pattern}': {source}")]
	Invalid {
		/// The raw pattern as supplied.
		pattern: String,
		/// The underlying regex error.
		source: regex::Error,
	},
}

/// A successful pattern match against a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMatch {
	/// The full matched path (capture index 0). Scopes the hook run for
	/// this match.
	pub matched: String,
	/// Capture group values in order, excluding the full match. Unmatched
	/// optional groups yield empty strings.
	pub captures: Vec<String>,
}

/// A compiled route pattern.
///
/// # Pattern Syntax
///
/// - `:any` - one or more of any character (greedy, capturing)
/// - `:str` - one or more of letters, hyphen, underscore, dot (capturing)
/// - `:num` - one or more of digits and dot (capturing)
/// - embedded regex groups such as `(\d+)` pass through untouched
///
/// The compiled form is always `^{pattern}/?$` with case-insensitive
/// matching, so exactly one trailing slash on the request path is
/// tolerated.
#[derive(Debug, Clone)]
pub struct RoutePattern {
	/// The original pattern string.
	raw: String,
	/// Compiled anchored regex.
	regex: regex::Regex,
}

impl RoutePattern {
	/// Compiles a raw route pattern.
	///
	/// # Errors
	///
	/// Returns [`PatternError::Invalid`] if the substituted pattern is not
	/// a valid regex or exceeds the compiled size limit.
	pub fn compile(raw: &str) -> Result<Self, PatternError> {
		let mut expr = raw.to_string();
		for (token, replacement) in TOKENS {
			if expr.contains(token) {
				expr = expr.replace(token, replacement);
			}
		}

		let anchored = format!("^{expr}/?$");
		let regex = RegexBuilder::new(&anchored)
			.case_insensitive(true)
			.size_limit(MAX_PATTERN_REGEX_SIZE)
			.build()
			.map_err(|source| PatternError::Invalid {
				pattern: raw.to_string(),
				source,
			})?;

		Ok(Self {
			raw: raw.to_string(),
			regex,
		})
	}

	/// Returns the original pattern string.
	pub fn raw(&self) -> &str {
		&self.raw
	}

	/// Attempts to match a request path against this pattern.
	///
	/// Returns the full matched path plus the positional capture values on
	/// success.
	pub fn match_path(&self, path: &str) -> Option<PathMatch> {
		self.regex.captures(path).map(|caps| {
			let matched = caps
				.get(0)
				.map(|m| m.as_str().to_string())
				.unwrap_or_default();
			let captures = caps
				.iter()
				.skip(1)
				.map(|m| m.map(|m| m.as_str().to_string()).unwrap_or_default())
				.collect();
			PathMatch { matched, captures }
		})
	}

	/// Checks whether this pattern matches the given path.
	pub fn is_match(&self, path: &str) -> bool {
		self.regex.is_match(path)
	}
}

impl std::fmt::Display for RoutePattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.raw)
	}
}

impl PartialEq for RoutePattern {
	fn eq(&self, other: &Self) -> bool {
		self.raw == other.raw
	}
}

impl Eq for RoutePattern {}
