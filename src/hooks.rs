//! Before/after hook registration and execution.
//!
//! Hooks are callbacks run around every handler invocation. A hook is
//! either *wildcard* (runs for every matched path) or *scoped* (gated by
//! an unanchored regex evaluated against the full matched path). For each
//! phase the scoped hooks run first in their stored order, then the
//! wildcard hooks in registration order; this ordering is a contract.

use crate::error::RouteError;
use crate::handler::Invocation;
use crate::pattern::PatternError;
use regex::Regex;
use std::sync::Arc;
use tracing::trace;

/// A registered hook callback.
pub type HookFn = Arc<dyn Fn(&Invocation<'_>) -> Result<(), RouteError> + Send + Sync>;

/// The two hook phases around handler invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
	/// Runs before the handler.
	Before,
	/// Runs after the handler.
	After,
}

impl HookPhase {
	fn as_str(self) -> &'static str {
		match self {
			Self::Before => "before",
			Self::After => "after",
		}
	}
}

struct ScopedHook {
	expr: String,
	regex: Regex,
	callback: HookFn,
}

#[derive(Default)]
struct PhaseHooks {
	scoped: Vec<ScopedHook>,
	wildcard: Vec<HookFn>,
}

/// Registrations for both hook phases.
///
/// Registrations accumulate for the lifetime of the owning router; there
/// is no removal operation. Re-registering a scope expression replaces the
/// prior callback in place (last registration wins, original order
/// position kept). Wildcard registrations always append.
#[derive(Default)]
pub struct HookRegistry {
	before: PhaseHooks,
	after: PhaseHooks,
}

impl HookRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a wildcard hook for `phase`.
	pub fn register<F>(&mut self, phase: HookPhase, callback: F)
	where
		F: Fn(&Invocation<'_>) -> Result<(), RouteError> + Send + Sync + 'static,
	{
		self.phase_mut(phase).wildcard.push(Arc::new(callback));
	}

	/// Registers a scoped hook for `phase`. The scope expression is an
	/// unanchored regex matched against the full matched path.
	///
	/// # Errors
	///
	/// Returns [`PatternError::Invalid`] if the scope expression is not a
	/// valid regex.
	pub fn register_scoped<F>(
		&mut self,
		phase: HookPhase,
		expr: impl Into<String>,
		callback: F,
	) -> Result<(), PatternError>
	where
		F: Fn(&Invocation<'_>) -> Result<(), RouteError> + Send + Sync + 'static,
	{
		let expr = expr.into();
		let regex = Regex::new(&expr).map_err(|source| PatternError::Invalid {
			pattern: expr.clone(),
			source,
		})?;

		let hooks = self.phase_mut(phase);
		let callback: HookFn = Arc::new(callback);
		if let Some(existing) = hooks.scoped.iter_mut().find(|h| h.expr == expr) {
			existing.callback = callback;
		} else {
			hooks.scoped.push(ScopedHook {
				expr,
				regex,
				callback,
			});
		}
		Ok(())
	}

	/// Runs the hooks for `phase` against the matched path: scoped hooks
	/// first (each gated by its scope match), then all wildcard hooks.
	///
	/// # Errors
	///
	/// Propagates the first hook error; remaining hooks do not run.
	pub fn run(
		&self,
		phase: HookPhase,
		path: &str,
		inv: &Invocation<'_>,
	) -> Result<(), RouteError> {
		let hooks = self.phase(phase);
		for hook in &hooks.scoped {
			if hook.regex.is_match(path) {
				trace!(phase = phase.as_str(), scope = %hook.expr, path, "running scoped hook");
				(hook.callback)(inv)?;
			}
		}
		for callback in &hooks.wildcard {
			trace!(phase = phase.as_str(), path, "running wildcard hook");
			callback(inv)?;
		}
		Ok(())
	}

	fn phase(&self, phase: HookPhase) -> &PhaseHooks {
		match phase {
			HookPhase::Before => &self.before,
			HookPhase::After => &self.after,
		}
	}

	fn phase_mut(&mut self, phase: HookPhase) -> &mut PhaseHooks {
		match phase {
			HookPhase::Before => &mut self.before,
			HookPhase::After => &mut self.after,
		}
	}
}

impl std::fmt::Debug for HookRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HookRegistry")
			.field("before_scoped", &self.before.scoped.len())
			.field("before_wildcard", &self.before.wildcard.len())
			.field("after_scoped", &self.after.scoped.len())
			.field("after_wildcard", &self.after.wildcard.len())
			.finish()
	}
}
