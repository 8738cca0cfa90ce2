//! Handler descriptor resolution and invocation.
//!
//! A route table maps patterns to *handler descriptors*: strings of the
//! form `Target:Member` (static invocation), `Target@Member` (instance
//! invocation on a fresh controller) or a bare `Target`. Targets are not
//! resolved by name at runtime; the host registers each target in a
//! [`HandlerRegistry`] up front, and resolution fails fast with
//! [`RouteError::MethodNotSupported`] when a lookup misses.

use crate::error::RouteError;
use crate::store::ContextStore;
use crate::view::OutputSink;
use std::collections::HashMap;
use std::sync::Arc;

/// Member name used for a bare descriptor when the configuration does not
/// name a `DefaultFunction`.
pub const FALLBACK_MEMBER: &str = "default";

/// A parsed handler descriptor.
///
/// The separators are checked in priority order: `:` first, then `@`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerSpec<'a> {
	/// `Target:Member` - invoke a registered static member, no instance.
	Static {
		/// Registered target identifier.
		target: &'a str,
		/// Member name on the target.
		member: &'a str,
	},
	/// `Target@Member` - construct a fresh controller, invoke the member.
	Instance {
		/// Registered target identifier.
		target: &'a str,
		/// Member name on the instance.
		member: &'a str,
	},
	/// Bare `Target` - a controller invoked with the default member, or a
	/// directly-callable registered function.
	Bare {
		/// Registered target identifier.
		target: &'a str,
	},
}

impl<'a> HandlerSpec<'a> {
	/// Parses a descriptor string. Splits at the first separator only, so
	/// the member part may itself contain separators.
	pub fn parse(descriptor: &'a str) -> Self {
		if let Some((target, member)) = descriptor.split_once(':') {
			Self::Static { target, member }
		} else if let Some((target, member)) = descriptor.split_once('@') {
			Self::Instance { target, member }
		} else {
			Self::Bare { target: descriptor }
		}
	}
}

/// Everything a handler, hook or error view receives for one invocation.
pub struct Invocation<'a> {
	path: &'a str,
	captures: &'a [String],
	store: &'a ContextStore,
	error: Option<&'a RouteError>,
	sink: &'a OutputSink,
}

impl<'a> Invocation<'a> {
	pub(crate) fn new(
		path: &'a str,
		captures: &'a [String],
		store: &'a ContextStore,
		error: Option<&'a RouteError>,
		sink: &'a OutputSink,
	) -> Self {
		Self {
			path,
			captures,
			store,
			error,
			sink,
		}
	}

	/// The full matched path for this invocation.
	pub fn path(&self) -> &str {
		self.path
	}

	/// Positional capture values extracted from the pattern match.
	pub fn captures(&self) -> &[String] {
		self.captures
	}

	/// Returns the capture at `index`, if present.
	pub fn capture(&self, index: usize) -> Option<&str> {
		self.captures.get(index).map(String::as_str)
	}

	/// The router's context store.
	pub fn store(&self) -> &ContextStore {
		self.store
	}

	/// The error being rendered, when this invocation targets an error
	/// view. `None` during normal handler and hook runs.
	pub fn error(&self) -> Option<&RouteError> {
		self.error
	}

	/// Writes user-visible output through the router's sink.
	///
	/// # Errors
	///
	/// Returns [`RouteError::Handler`] if the sink write fails.
	pub fn write(&self, text: &str) -> Result<(), RouteError> {
		self.sink
			.write_str(text)
			.map_err(|e| RouteError::handler(format!("output write failed: {e}")))
	}

	/// Writes user-visible output followed by a newline.
	///
	/// # Errors
	///
	/// Returns [`RouteError::Handler`] if the sink write fails.
	pub fn writeln(&self, text: &str) -> Result<(), RouteError> {
		self.write(text)?;
		self.write("\n")
	}
}

impl std::fmt::Debug for Invocation<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Invocation")
			.field("path", &self.path)
			.field("captures", &self.captures)
			.field("is_error_view", &self.error.is_some())
			.finish()
	}
}

/// A registered callable: bare function target or static member.
pub type HandlerFn = Arc<dyn Fn(&Invocation<'_>) -> Result<(), RouteError> + Send + Sync>;

/// Constructs a fresh controller for one instance-style invocation.
pub type ControllerFactory = Arc<dyn Fn() -> Box<dyn Controller> + Send + Sync>;

/// A target invoked instance-style: one fresh value per dispatch.
///
/// Implementations dispatch on `member` and must return
/// [`RouteError::MethodNotSupported`] for member names they do not
/// implement, so unresolvable members reach the error reporter with
/// diagnostic code 501.
pub trait Controller: Send + Sync {
	/// Invokes `member` on this instance.
	fn invoke(&self, member: &str, inv: &Invocation<'_>) -> Result<(), RouteError>;
}

/// Registry mapping descriptor targets to invocable handlers.
///
/// Three invocation kinds are registered independently:
/// - [`register_fn`](Self::register_fn) for directly-callable targets,
/// - [`register_static`](Self::register_static) for `Target:Member` pairs,
/// - [`register_controller`](Self::register_controller) for factories
///   backing `Target@Member` and bare-target default-member invocation.
#[derive(Default)]
pub struct HandlerRegistry {
	functions: HashMap<String, HandlerFn>,
	statics: HashMap<String, HashMap<String, HandlerFn>>,
	factories: HashMap<String, ControllerFactory>,
}

impl HandlerRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a directly-callable target.
	pub fn register_fn<F>(&mut self, name: impl Into<String>, handler: F)
	where
		F: Fn(&Invocation<'_>) -> Result<(), RouteError> + Send + Sync + 'static,
	{
		self.functions.insert(name.into(), Arc::new(handler));
	}

	/// Registers a static member under `target`.
	pub fn register_static<F>(
		&mut self,
		target: impl Into<String>,
		member: impl Into<String>,
		handler: F,
	) where
		F: Fn(&Invocation<'_>) -> Result<(), RouteError> + Send + Sync + 'static,
	{
		self.statics
			.entry(target.into())
			.or_default()
			.insert(member.into(), Arc::new(handler));
	}

	/// Registers a controller factory under `target`. The factory runs
	/// once per dispatch that resolves to this target.
	pub fn register_controller<F>(&mut self, target: impl Into<String>, factory: F)
	where
		F: Fn() -> Box<dyn Controller> + Send + Sync + 'static,
	{
		self.factories.insert(target.into(), Arc::new(factory));
	}

	/// Resolves `descriptor` and invokes the handler.
	///
	/// `default_member` is the configured `DefaultFunction`, used for bare
	/// descriptors that resolve to a controller; [`FALLBACK_MEMBER`] is
	/// used when it is unset.
	///
	/// # Errors
	///
	/// Returns [`RouteError::MethodNotSupported`] when no registered
	/// entity backs the descriptor, or whatever error the handler itself
	/// raises.
	pub fn invoke(
		&self,
		descriptor: &str,
		default_member: Option<&str>,
		inv: &Invocation<'_>,
	) -> Result<(), RouteError> {
		match HandlerSpec::parse(descriptor) {
			HandlerSpec::Static { target, member } => {
				let handler = self
					.statics
					.get(target)
					.and_then(|members| members.get(member))
					.ok_or_else(|| RouteError::method_not_supported(member))?;
				handler(inv)
			}
			HandlerSpec::Instance { target, member } => {
				// A missing factory is a miss on the target, not the member.
				let factory = self
					.factories
					.get(target)
					.ok_or_else(|| RouteError::method_not_supported(target))?;
				factory().invoke(member, inv)
			}
			HandlerSpec::Bare { target } => {
				if let Some(factory) = self.factories.get(target) {
					let member = default_member.unwrap_or(FALLBACK_MEMBER);
					factory().invoke(member, inv)
				} else if let Some(handler) = self.functions.get(target) {
					handler(inv)
				} else {
					Err(RouteError::method_not_supported(target))
				}
			}
		}
	}
}

impl std::fmt::Debug for HandlerRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HandlerRegistry")
			.field("functions", &self.functions.keys().collect::<Vec<_>>())
			.field("statics", &self.statics.keys().collect::<Vec<_>>())
			.field("factories", &self.factories.keys().collect::<Vec<_>>())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::sync::atomic::{AtomicUsize, Ordering};

	fn empty_invocation<'a>(
		store: &'a ContextStore,
		sink: &'a OutputSink,
	) -> Invocation<'a> {
		Invocation::new("/", &[], store, None, sink)
	}

	struct Pages;

	impl Controller for Pages {
		fn invoke(&self, member: &str, inv: &Invocation<'_>) -> Result<(), RouteError> {
			match member {
				"show" => {
					inv.store().set("invoked", "Pages::show");
					Ok(())
				}
				FALLBACK_MEMBER => {
					inv.store().set("invoked", "Pages::default");
					Ok(())
				}
				other => Err(RouteError::method_not_supported(other)),
			}
		}
	}

	#[rstest]
	#[case("A:b", HandlerSpec::Static { target: "A", member: "b" })]
	#[case("A@b", HandlerSpec::Instance { target: "A", member: "b" })]
	#[case("A", HandlerSpec::Bare { target: "A" })]
	#[case("A:b@c", HandlerSpec::Static { target: "A", member: "b@c" })]
	fn test_spec_parse(#[case] descriptor: &str, #[case] expected: HandlerSpec<'_>) {
		assert_eq!(HandlerSpec::parse(descriptor), expected);
	}

	#[test]
	fn test_static_invocation_constructs_no_instance() {
		let constructed = Arc::new(AtomicUsize::new(0));
		let mut registry = HandlerRegistry::new();

		let counter = Arc::clone(&constructed);
		registry.register_controller("Pages", move || {
			counter.fetch_add(1, Ordering::SeqCst);
			Box::new(Pages)
		});
		registry.register_static("Pages", "show", |inv: &Invocation<'_>| {
			inv.store().set("invoked", "static");
			Ok(())
		});

		let store = ContextStore::new();
		let sink = OutputSink::new(Box::new(Vec::new()));
		let inv = empty_invocation(&store, &sink);

		registry.invoke("Pages:show", None, &inv).unwrap();
		assert_eq!(store.get("invoked").unwrap(), "static");
		assert_eq!(constructed.load(Ordering::SeqCst), 0);
	}

	#[test]
	fn test_instance_invocation_fresh_per_dispatch() {
		let constructed = Arc::new(AtomicUsize::new(0));
		let mut registry = HandlerRegistry::new();

		let counter = Arc::clone(&constructed);
		registry.register_controller("Pages", move || {
			counter.fetch_add(1, Ordering::SeqCst);
			Box::new(Pages)
		});

		let store = ContextStore::new();
		let sink = OutputSink::new(Box::new(Vec::new()));
		let inv = empty_invocation(&store, &sink);

		registry.invoke("Pages@show", None, &inv).unwrap();
		registry.invoke("Pages@show", None, &inv).unwrap();

		assert_eq!(constructed.load(Ordering::SeqCst), 2);
		assert_eq!(store.get("invoked").unwrap(), "Pages::show");
	}

	#[test]
	fn test_bare_descriptor_uses_default_member() {
		let mut registry = HandlerRegistry::new();
		registry.register_controller("Pages", || Box::new(Pages));

		let store = ContextStore::new();
		let sink = OutputSink::new(Box::new(Vec::new()));
		let inv = empty_invocation(&store, &sink);

		registry.invoke("Pages", None, &inv).unwrap();
		assert_eq!(store.get("invoked").unwrap(), "Pages::default");
	}

	#[test]
	fn test_bare_descriptor_falls_back_to_function() {
		let mut registry = HandlerRegistry::new();
		registry.register_fn("show_page", |inv: &Invocation<'_>| {
			inv.store().set("invoked", "fn");
			Ok(())
		});

		let store = ContextStore::new();
		let sink = OutputSink::new(Box::new(Vec::new()));
		let inv = empty_invocation(&store, &sink);

		registry.invoke("show_page", None, &inv).unwrap();
		assert_eq!(store.get("invoked").unwrap(), "fn");
	}

	#[rstest]
	#[case("Missing:show", "show")]
	#[case("Missing@show", "Missing")]
	#[case("missing_fn", "missing_fn")]
	fn test_registry_miss_is_method_not_supported(
		#[case] descriptor: &str,
		#[case] member: &str,
	) {
		let registry = HandlerRegistry::new();
		let store = ContextStore::new();
		let sink = OutputSink::new(Box::new(Vec::new()));
		let inv = empty_invocation(&store, &sink);

		let err = registry.invoke(descriptor, None, &inv).unwrap_err();
		assert_eq!(err, RouteError::method_not_supported(member));
		assert_eq!(err.code(), 501);
	}

	#[test]
	fn test_unknown_member_on_controller() {
		let mut registry = HandlerRegistry::new();
		registry.register_controller("Pages", || Box::new(Pages));

		let store = ContextStore::new();
		let sink = OutputSink::new(Box::new(Vec::new()));
		let inv = empty_invocation(&store, &sink);

		let err = registry.invoke("Pages@nope", None, &inv).unwrap_err();
		assert_eq!(err, RouteError::method_not_supported("nope"));
	}

	#[test]
	fn test_configured_default_member() {
		struct Payment;
		impl Controller for Payment {
			fn invoke(&self, member: &str, inv: &Invocation<'_>) -> Result<(), RouteError> {
				match member {
					"Go" => {
						inv.store().set("invoked", "Payment::Go");
						Ok(())
					}
					other => Err(RouteError::method_not_supported(other)),
				}
			}
		}

		let mut registry = HandlerRegistry::new();
		registry.register_controller("Payment", || Box::new(Payment));

		let store = ContextStore::new();
		let sink = OutputSink::new(Box::new(Vec::new()));
		let inv = empty_invocation(&store, &sink);

		registry.invoke("Payment", Some("Go"), &inv).unwrap();
		assert_eq!(store.get("invoked").unwrap(), "Payment::Go");
	}
}
