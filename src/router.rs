//! The router: match, hook, invoke, report.
//!
//! A [`Router`] owns the configuration, handler registry, hook registry,
//! context store and output sink for one application. Dispatching is
//! synchronous; each call runs to completion. Route tables are borrowed
//! per call and never retained.

use crate::config::{Config, DEFAULT_FUNCTION, ERROR_VIEW, SUB_DIR_PATH};
use crate::error::RouteError;
use crate::handler::{Controller, HandlerRegistry, Invocation};
use crate::hooks::{HookPhase, HookRegistry};
use crate::pattern::{PatternError, RoutePattern};
use crate::store::ContextStore;
use crate::table::RouteTable;
use crate::view::{self, OutputSink};
use std::io::Write;
use tracing::{debug, error, warn};
use url::Url;

/// The dispatch engine.
///
/// Construct one per application lifetime, register handler targets and
/// hooks, then call [`dispatch`](Self::dispatch) with a raw request string
/// and a route table. Dispatch never returns an error: any failure is
/// rendered through the configured error view or the built-in fallback,
/// and the caller observes only the produced output.
#[derive(Debug, Default)]
pub struct Router {
	config: Config,
	registry: HandlerRegistry,
	hooks: HookRegistry,
	store: ContextStore,
	sink: OutputSink,
}

impl Router {
	/// Creates a router with empty configuration and registries, writing
	/// to standard output.
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces the output sink. Tests typically install a shared buffer.
	pub fn set_sink(&mut self, writer: Box<dyn Write + Send>) {
		self.sink = OutputSink::new(writer);
	}

	/// Overlays configuration entries onto the current configuration,
	/// key by key (shallow merge).
	pub fn configure<K, V>(&mut self, entries: impl IntoIterator<Item = (K, V)>)
	where
		K: Into<String>,
		V: Into<String>,
	{
		self.config.merge(entries);
	}

	/// The current configuration.
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// The context store shared by hooks, handlers and error views.
	pub fn store(&self) -> &ContextStore {
		&self.store
	}

	/// Registers a directly-callable handler target.
	pub fn register_fn<F>(&mut self, name: impl Into<String>, handler: F)
	where
		F: Fn(&Invocation<'_>) -> Result<(), RouteError> + Send + Sync + 'static,
	{
		self.registry.register_fn(name, handler);
	}

	/// Registers a static member handler for `Target:Member` descriptors.
	pub fn register_static<F>(
		&mut self,
		target: impl Into<String>,
		member: impl Into<String>,
		handler: F,
	) where
		F: Fn(&Invocation<'_>) -> Result<(), RouteError> + Send + Sync + 'static,
	{
		self.registry.register_static(target, member, handler);
	}

	/// Registers a controller factory for `Target@Member` and bare-target
	/// descriptors. A fresh controller is constructed per dispatch.
	pub fn register_controller<F>(&mut self, target: impl Into<String>, factory: F)
	where
		F: Fn() -> Box<dyn Controller> + Send + Sync + 'static,
	{
		self.registry.register_controller(target, factory);
	}

	/// Registers a wildcard before-hook.
	pub fn before<F>(&mut self, callback: F)
	where
		F: Fn(&Invocation<'_>) -> Result<(), RouteError> + Send + Sync + 'static,
	{
		self.hooks.register(HookPhase::Before, callback);
	}

	/// Registers a before-hook scoped to paths matching `expr`.
	///
	/// # Errors
	///
	/// Returns [`PatternError::Invalid`] if `expr` is not a valid regex.
	pub fn before_scoped<F>(
		&mut self,
		expr: impl Into<String>,
		callback: F,
	) -> Result<(), PatternError>
	where
		F: Fn(&Invocation<'_>) -> Result<(), RouteError> + Send + Sync + 'static,
	{
		self.hooks.register_scoped(HookPhase::Before, expr, callback)
	}

	/// Registers a wildcard after-hook.
	pub fn after<F>(&mut self, callback: F)
	where
		F: Fn(&Invocation<'_>) -> Result<(), RouteError> + Send + Sync + 'static,
	{
		self.hooks.register(HookPhase::After, callback);
	}

	/// Registers an after-hook scoped to paths matching `expr`.
	///
	/// # Errors
	///
	/// Returns [`PatternError::Invalid`] if `expr` is not a valid regex.
	pub fn after_scoped<F>(
		&mut self,
		expr: impl Into<String>,
		callback: F,
	) -> Result<(), PatternError>
	where
		F: Fn(&Invocation<'_>) -> Result<(), RouteError> + Send + Sync + 'static,
	{
		self.hooks.register_scoped(HookPhase::After, expr, callback)
	}

	/// Dispatches a raw request string against a route table.
	///
	/// The raw string is reduced to its path component (scheme, host,
	/// query and fragment are discarded) and the configured `SubDirPath`
	/// prefix is stripped. Table keys are then tried in descending
	/// lexicographic order and **every** matching entry is dispatched,
	/// each with its own before/after hook cycle. Callers that want
	/// single-dispatch semantics must keep their patterns non-overlapping.
	///
	/// Failures never propagate: the first error aborts the remaining
	/// matches and is rendered through the error reporter exactly once.
	pub fn dispatch(&self, raw: &str, table: &RouteTable) {
		let path = self.resolve_path(raw);
		if let Err(err) = self.dispatch_resolved(&path, table) {
			self.report(&err, &path);
		}
	}

	/// Reduces the raw request string to a matchable path: keeps only the
	/// path component, then strips the configured sub-directory prefix.
	fn resolve_path(&self, raw: &str) -> String {
		let path = match Url::parse(raw) {
			Ok(url) => url.path().to_string(),
			// Not an absolute URL: treat as a raw path, drop any query or
			// fragment.
			Err(_) => {
				let end = raw.find(['?', '#']).unwrap_or(raw.len());
				raw[..end].to_string()
			}
		};

		match self.config.get(SUB_DIR_PATH) {
			Some(prefix) => path.strip_prefix(prefix).unwrap_or(&path).to_string(),
			None => path,
		}
	}

	fn dispatch_resolved(&self, path: &str, table: &RouteTable) -> Result<(), RouteError> {
		let mut found = false;

		for (raw_pattern, descriptor) in table.iter_desc() {
			let pattern = match RoutePattern::compile(raw_pattern) {
				Ok(pattern) => pattern,
				Err(err) => {
					warn!(pattern = raw_pattern, %err, "skipping uncompilable route pattern");
					continue;
				}
			};
			let Some(path_match) = pattern.match_path(path) else {
				continue;
			};
			found = true;
			debug!(pattern = raw_pattern, descriptor, path, "route matched");

			let inv = Invocation::new(
				&path_match.matched,
				&path_match.captures,
				&self.store,
				None,
				&self.sink,
			);
			self.hooks.run(HookPhase::Before, &path_match.matched, &inv)?;
			self.registry
				.invoke(descriptor, self.config.get(DEFAULT_FUNCTION), &inv)?;
			self.hooks.run(HookPhase::After, &path_match.matched, &inv)?;
		}

		if !found {
			return Err(RouteError::NotFound {
				path: path.to_string(),
			});
		}
		Ok(())
	}

	/// Renders a dispatch error. Delegates to the configured `ErrorView`
	/// descriptor when present; a failure inside the error view itself is
	/// fatal and written to the sink directly, never re-reported.
	fn report(&self, err: &RouteError, path: &str) {
		error!(code = err.code(), %err, path, "dispatch failed");

		match self.config.get(ERROR_VIEW) {
			Some(descriptor) => {
				let inv = Invocation::new(path, &[], &self.store, Some(err), &self.sink);
				if let Err(view_err) =
					self.registry
						.invoke(descriptor, self.config.get(DEFAULT_FUNCTION), &inv)
				{
					error!(descriptor, %view_err, "error view failed");
					let _ = self.sink.write_str(&format!(
						"fatal: error view '{descriptor}' failed: {view_err}\n"
					));
				}
			}
			None => {
				let _ = self.sink.write_str(&view::render_fallback(err));
			}
		}
	}
}
