//! # routeforge
//!
//! Pattern-based request path routing and dispatch.
//!
//! Given an incoming path and an ordered pattern-to-descriptor table, the
//! router matches the path against every pattern, resolves each matching
//! descriptor to a registered handler and invokes it with the captured
//! path segments. Path-scoped before/after hooks run around each handler,
//! and a router-owned context store passes data between the phases of a
//! dispatch.
//!
//! ## Overview
//!
//! ```text
//! raw request -> path resolution -> match (descending key order)
//!                                      |
//!                         before hooks | handler | after hooks   (per match)
//!                                      |
//!                            any error -> error view / fallback renderer
//! ```
//!
//! Route patterns are anchored at both ends, matched case-insensitively
//! and tolerate one optional trailing slash. The shorthand tokens `:any`,
//! `:str` and `:num` expand to capturing groups; embedded regex groups
//! pass through untouched. When several patterns match one path, **every**
//! matching entry is dispatched in descending key order, each with its own
//! hook cycle.
//!
//! Handler descriptors name registered targets: `Target:Member` invokes a
//! static member, `Target@Member` constructs a fresh controller per
//! dispatch, and a bare `Target` uses the configured default member (or is
//! called directly when registered as a function).
//!
//! ## Example
//!
//! ```rust
//! use routeforge::{Invocation, RouteTable, Router};
//!
//! let mut router = Router::new();
//! router.register_fn("show_page", |inv: &Invocation<'_>| {
//!     let page = inv.capture(0).unwrap_or("1");
//!     inv.write(&format!("page {page}\n"))
//! });
//! router.before(|inv: &Invocation<'_>| {
//!     inv.store().set("name", "sumon");
//!     Ok(())
//! });
//!
//! let table = RouteTable::new()
//!     .route("/", "show_page")
//!     .route("/page/:num", "show_page");
//!
//! // Prints "page 42"; errors are rendered, never returned.
//! router.dispatch("/page/42", &table);
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod hooks;
pub mod pattern;
pub mod router;
pub mod store;
pub mod table;
pub mod view;

// Re-exports
pub use config::{Config, DEFAULT_FUNCTION, ERROR_VIEW, SUB_DIR_PATH};
pub use error::RouteError;
pub use handler::{
	Controller, ControllerFactory, FALLBACK_MEMBER, HandlerFn, HandlerRegistry, HandlerSpec,
	Invocation,
};
pub use hooks::{HookFn, HookPhase, HookRegistry};
pub use pattern::{PathMatch, PatternError, RoutePattern};
pub use router::Router;
pub use store::ContextStore;
pub use table::RouteTable;
pub use view::OutputSink;
