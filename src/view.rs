//! Output surface and built-in fallback error rendering.

use crate::error::RouteError;
use parking_lot::Mutex;
use std::io::{self, Write};

/// Destination for user-visible output.
///
/// Handlers, hooks and error views write through the router's sink.
/// Defaults to standard output; tests swap in a buffer.
pub struct OutputSink {
	inner: Mutex<Box<dyn Write + Send>>,
}

impl OutputSink {
	/// Creates a sink over an arbitrary writer.
	pub fn new(writer: Box<dyn Write + Send>) -> Self {
		Self {
			inner: Mutex::new(writer),
		}
	}

	/// Creates a sink over standard output.
	pub fn stdout() -> Self {
		Self::new(Box::new(io::stdout()))
	}

	/// Writes and flushes the given text.
	pub fn write_str(&self, text: &str) -> io::Result<()> {
		let mut writer = self.inner.lock();
		writer.write_all(text.as_bytes())?;
		writer.flush()
	}
}

impl Default for OutputSink {
	fn default() -> Self {
		Self::stdout()
	}
}

impl std::fmt::Debug for OutputSink {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("OutputSink").finish_non_exhaustive()
	}
}

/// Renders the built-in minimal error fragment.
///
/// Used when no `ErrorView` descriptor is configured: diagnostic code 404
/// renders a not-found message, anything else a generic error message.
pub fn render_fallback(err: &RouteError) -> String {
	match err.code() {
		404 => format!("<h1>404 Not Found</h1>\n<p>{err}</p>\n"),
		code => format!("<h1>{code} Error</h1>\n<p>{err}</p>\n"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_fallback_distinguishes_not_found() {
		let rendered = render_fallback(&RouteError::NotFound { path: "/x".into() });
		assert!(rendered.contains("404 Not Found"));
		assert!(rendered.contains("/x"));
	}

	#[test]
	fn test_fallback_generic_for_other_codes() {
		let rendered = render_fallback(&RouteError::method_not_supported("show"));
		assert!(rendered.contains("501 Error"));

		let rendered = render_fallback(&RouteError::handler("boom"));
		assert!(rendered.contains("500 Error"));
		assert!(rendered.contains("boom"));
	}

	#[test]
	fn test_sink_writes_to_buffer() {
		let sink = OutputSink::new(Box::new(Vec::new()));
		assert!(sink.write_str("hello").is_ok());
	}
}
