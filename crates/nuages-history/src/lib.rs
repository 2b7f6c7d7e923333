//! Nuages History - Session History Synchronization Core
//!
//! The history layer underneath the Nuages router: a plain-data location
//! model, a backend-agnostic port contract and a cooperative blocking
//! protocol, with an in-memory backend for tests and server-side code and
//! a browser backend driving `window.history` through `web-sys`.
//!
//! ## Features
//!
//! - **One contract, two backends**: routers hold an `Rc<dyn HistoryPort>` and
//!   behave identically on the in-memory stack and the browser session history
//! - **Cooperative blocking**: blockers run in registration order, are skipped
//!   for kinds they did not ask for, never short-circuit each other, and any
//!   cancellation wins
//! - **Cancellation-safe pops**: a cancelled back/forward movement is reverted
//!   and the unchanged location is republished with the cancelled event attached
//! - **Explicit lifetimes**: listeners and blockers are released through RAII
//!   guards or, for blockers, from inside the callback via [`StopBlocking`]
//!
//! ## Architecture
//!
//! - [`location`]: locations, paths, targets and path resolution
//! - [`event`]: navigation kinds and the cancellable event
//! - [`blocking`]: the ordered blocker chain
//! - [`port`]: the [`HistoryPort`] trait, updates and listener registry
//! - [`memory`]: the in-memory backend
//! - [`browser`]: the `window.history` backend (wasm32 only)
//! - [`error`]: backend error taxonomy
//! - [`logging`]: console/stderr logging macros
//!
//! ## Example
//!
//! ```
//! use nuages_history::{BlockOptions, Blocker, HistoryPort, MemoryHistory, NavAction, Path};
//!
//! let history = MemoryHistory::new();
//! let guard = history.block(
//!     Blocker::new(|event, _stop| {
//!         event.set_cancelled(true);
//!         Ok(())
//!     }),
//!     BlockOptions::only(NavAction::Push),
//! );
//!
//! history.push(&Path::from_pathname("/away"), None);
//! assert_eq!(history.location().pathname, "/");
//!
//! guard.release();
//! history.push(&Path::from_pathname("/away"), None);
//! assert_eq!(history.location().pathname, "/away");
//! ```

#![warn(missing_docs)]

// Core location model
pub mod event;
pub mod location;

// Blocking protocol and the port contract
pub mod blocking;
pub mod port;

// Backends
#[cfg(target_arch = "wasm32")]
pub mod browser;
pub mod memory;

// Error taxonomy
pub mod error;

// Logging macros
pub mod logging;

// Re-export commonly used types
pub use blocking::{BlockOptions, Blocker, BlockerChain, BlockerFault, BlockerGuard, StopBlocking};
#[cfg(target_arch = "wasm32")]
pub use browser::BrowserHistory;
pub use error::HistoryError;
pub use event::{NavAction, NavEvent};
pub use location::{
	Location, Path, Target, create_path, join_paths, normalize_hash, normalize_search, parse_path,
	resolve_path, strip_basename,
};
pub use memory::MemoryHistory;
pub use port::{HistoryPort, HistoryUpdate, Listener, ListenerGuard, ListenerRegistry};
