//! Session-history core: locations, the port contract and blocking
//!
//! This module provides access to nuages-history, the layer that owns
//! the session itself. It defines the [`HistoryPort`](crate::HistoryPort)
//! contract, the immutable [`Location`](crate::Location) snapshot model,
//! the navigation blocking protocol, and two interchangeable backends.
//!
//! ## Architecture
//!
//! - **Location Model**: parsed, normalized path/search/hash snapshots
//!   with per-entry keys and attached state
//! - **Port Contract**: push/replace/go plus listener and blocker
//!   registration, identical across backends
//! - **Blocking Protocol**: an ordered chain where every blocker runs,
//!   any cancellation wins and faults are isolated
//! - **Backends**: browser session history over the History API, and an
//!   in-memory stack for tests and server-side rendering
//!
//! ## Example
//!
//! ```rust,ignore
//! use nuages::history::{HistoryPort, MemoryHistory, Path};
//!
//! let history = MemoryHistory::new();
//! history.push(&Path::from_pathname("/inbox"), None);
//! history.back();
//! assert_eq!(history.location().pathname, "/");
//! ```

// Re-export all nuages-history functionality
pub use nuages_history::*;
