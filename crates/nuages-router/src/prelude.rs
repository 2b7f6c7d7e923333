//! Convenience re-exports for common usage.
//!
//! # Example
//!
//! ```ignore
//! use nuages_router::prelude::*;
//!
//! let scope = RouterScope::new(Rc::new(MemoryHistory::new()));
//! scope.navigate("/inbox")?;
//! let guard = scope.block(
//!     |_event, _stop| Ok(()),
//!     BlockOptions::default(),
//! );
//! ```

// Scope and hooks
pub use crate::scope::{OwnerId, RouterScope};

// Navigation
pub use crate::navigator::{NavigateOptions, Navigator};

// Link activation
pub use crate::link::{Activation, ActiveOptions, ClickEvent, Link, pathname_is_active};

// Query-string view
pub use crate::search_params::SearchParams;

// Render-state bridge
pub use crate::bridge::SubscriptionBridge;

// Error types
pub use crate::error::{NavError, TargetError};

// History-layer types that surface through the scope API
pub use nuages_history::{
	BlockOptions, Blocker, BlockerFault, BlockerGuard, HistoryPort, HistoryUpdate, Listener,
	ListenerGuard, Location, MemoryHistory, NavAction, NavEvent, Path, StopBlocking, Target,
};

#[cfg(target_arch = "wasm32")]
pub use nuages_history::BrowserHistory;
