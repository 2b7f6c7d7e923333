//! # Nuages
//!
//! Session-history synchronization and navigation blocking for reactive
//! Rust frontends.
//!
//! Nuages keeps a view layer and a session history in step without tying
//! either to a framework: the history side owns location snapshots, the
//! port contract and the blocking protocol; the router side owns target
//! resolution, link activation and the render-state bridge. Everything is
//! an explicit value over an explicit port, so server-side rendering,
//! tests and multiple independent UIs on one page all work without
//! process-global state.
//!
//! ## Core Principles
//!
//! - **One owner per concern**: the port owns the session, the scope owns
//!   the view's slice of it
//! - **Cancellation is cooperative**: every blocker runs, any cancellation
//!   wins, and the decision freezes before listeners see it
//! - **Backends are interchangeable**: code written against the port
//!   behaves identically on the browser and in-memory backends
//! - **Misconfiguration is an error, not a panic**
//!
//! ## Feature Flags
//!
//! - `debug-hooks` - Verbose navigation tracing through the browser
//!   console on WASM targets
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use std::rc::Rc;
//!
//! use nuages::prelude::*;
//!
//! // One port per tab; the browser backend follows popstate.
//! let port: Rc<dyn HistoryPort> = Rc::new(BrowserHistory::new()?);
//! let scope = RouterScope::with_basename(port, "/app")?;
//!
//! // Guard unsaved work: cancel pops, remember what was blocked.
//! let guard = scope.block(
//!     |event, stop| {
//!         event.set_cancelled(true);
//!         stop.stop();
//!         Ok(())
//!     },
//!     BlockOptions::only(NavAction::Pop),
//! );
//!
//! // Imperative navigation resolves relative to the render location.
//! scope.navigate("drafts/42")?;
//!
//! // Links decide for themselves which clicks stay native.
//! let link = Link::new("../published").replace(true);
//! if link.activate(&scope, &click)? == Activation::Intercepted {
//!     // the scope already navigated
//! }
//! ```

// Module re-exports, one per layer
pub mod history;
pub mod router;

// Re-export the port contract and backends
pub use nuages_history::{HistoryPort, HistoryUpdate, Listener, ListenerGuard, MemoryHistory};

#[cfg(target_arch = "wasm32")]
pub use nuages_history::BrowserHistory;

// Re-export the location model
pub use nuages_history::{Location, NavAction, NavEvent, Path, Target};

// Re-export the blocking protocol
pub use nuages_history::{
	BlockOptions, Blocker, BlockerChain, BlockerFault, BlockerGuard, StopBlocking,
};

// Re-export the scope surface
pub use nuages_router::{
	Activation, ActiveOptions, ClickEvent, Link, NavigateOptions, Navigator, OwnerId, RouterScope,
	SearchParams, SubscriptionBridge,
};

// Re-export errors from both layers
pub use nuages_history::HistoryError;
pub use nuages_router::{NavError, TargetError};

// Re-export common external dependencies
pub use serde_json::{Value, json};

pub mod prelude {
	//! Convenience re-exports for common usage.

	// Port and backends - always available
	pub use crate::{HistoryPort, HistoryUpdate, Listener, ListenerGuard, MemoryHistory};

	#[cfg(target_arch = "wasm32")]
	pub use crate::BrowserHistory;

	// Location model
	pub use crate::{Location, NavAction, NavEvent, Path, Target};

	// Blocking
	pub use crate::{BlockOptions, Blocker, BlockerFault, BlockerGuard, StopBlocking};

	// Scope surface
	pub use crate::{
		Activation, ActiveOptions, ClickEvent, Link, NavigateOptions, Navigator, OwnerId,
		RouterScope, SearchParams,
	};

	// Errors
	pub use crate::{HistoryError, NavError, TargetError};

	// External
	pub use serde_json::{Value, json};
}
