//! Error types for route dispatching.

use thiserror::Error;

/// Errors raised while resolving or dispatching a request path.
///
/// Every variant carries a diagnostic code (see [`RouteError::code`]) used
/// by the built-in fallback error renderer. Errors never escape the
/// top-level dispatch entry point; they are routed to the configured error
/// view or the fallback renderer instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
	/// No route pattern matched the resolved path.
	#[error("no route matched path '{path}'")]
	NotFound {
		/// The path after sub-directory-prefix stripping.
		path: String,
	},
	/// The resolved target and member are not registered as an invocable
	/// entity, for any invocation kind.
	#[error("method '{member}' not supported")]
	MethodNotSupported {
		/// The member or target name that failed to resolve.
		member: String,
	},
	/// A handler or hook failed while running.
	#[error("{message}")]
	Handler {
		/// Failure description supplied by the handler.
		message: String,
	},
}

impl RouteError {
	/// Creates a handler failure with the given message.
	pub fn handler(message: impl Into<String>) -> Self {
		Self::Handler {
			message: message.into(),
		}
	}

	/// Creates a method-not-supported error for the given member or
	/// target name.
	pub fn method_not_supported(member: impl Into<String>) -> Self {
		Self::MethodNotSupported {
			member: member.into(),
		}
	}

	/// Returns the diagnostic code for this error.
	///
	/// `404` for unmatched paths, `501` for unresolvable handler members,
	/// `500` for handler failures.
	pub fn code(&self) -> u16 {
		match self {
			Self::NotFound { .. } => 404,
			Self::MethodNotSupported { .. } => 501,
			Self::Handler { .. } => 500,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(RouteError::NotFound { path: "/x".into() }, 404)]
	#[case(RouteError::method_not_supported("show"), 501)]
	#[case(RouteError::handler("boom"), 500)]
	fn test_diagnostic_codes(#[case] err: RouteError, #[case] code: u16) {
		assert_eq!(err.code(), code);
	}

	#[test]
	fn test_display() {
		assert_eq!(
			RouteError::NotFound { path: "/a/b".into() }.to_string(),
			"no route matched path '/a/b'"
		);
		assert_eq!(
			RouteError::method_not_supported("Go").to_string(),
			"method 'Go' not supported"
		);
	}
}
