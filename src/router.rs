//! View-layer navigation: scopes, links and the render-state bridge
//!
//! This module provides access to nuages-router, the layer a view talks
//! to. A [`RouterScope`](crate::RouterScope) bundles a history port with
//! basename-aware resolution, the single-subscription render-state
//! bridge, and managed blocker registration.
//!
//! ## Architecture
//!
//! - **Scope**: a cloneable handle exposing the hook surface
//! - **Navigator**: target validation, relative resolution and basename
//!   translation
//! - **Bridge**: one port subscription feeding a cached render state
//! - **Links**: activation decisions that keep browser affordances
//!   (modifiers, non-primary buttons, foreign targets) native
//! - **Search Params**: an ordered multimap view of the query string
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::rc::Rc;
//!
//! use nuages::router::prelude::*;
//!
//! let scope = RouterScope::new(Rc::new(MemoryHistory::new()));
//! scope.navigate("/inbox?unread=1")?;
//! assert_eq!(scope.search_params().get("unread"), Some("1"));
//! ```

// Re-export all nuages-router functionality
pub use nuages_router::*;
