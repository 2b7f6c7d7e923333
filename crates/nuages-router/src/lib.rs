//! Nuages Router - View-Layer Navigation over the History Port
//!
//! The router side of Nuages: everything a view layer needs to stay in
//! step with a history port without caring which backend drives it. A
//! [`RouterScope`] bundles the port, a basename-aware [`Navigator`] and
//! the render-state bridge into one cloneable handle; [`Link`] decides
//! which clicks to intercept; [`SearchParams`] gives the query string an
//! ordered multimap view.
//!
//! ## Features
//!
//! - **No globals**: every scope is an explicit value over an explicit
//!   port; two scopes never observe each other
//! - **One subscription per scope**: the bridge tears down before it
//!   re-attaches, however often the view remounts
//! - **Browser-grade link handling**: modifier keys, secondary buttons,
//!   foreign frame targets and handled events all stay native
//! - **Misconfiguration is an error**: malformed basenames and structured
//!   targets with smuggled separators return `Err` instead of panicking
//!
//! ## Architecture
//!
//! - [`scope`]: the [`RouterScope`] hook surface
//! - [`navigator`]: target resolution and imperative navigation
//! - [`bridge`]: the single-subscription render-state cache
//! - [`link`]: link activation and active-state matching
//! - [`search_params`]: the query-string view
//! - [`error`]: router error taxonomy
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//!
//! use nuages_history::MemoryHistory;
//! use nuages_router::{Activation, ClickEvent, Link, RouterScope};
//!
//! let scope = RouterScope::new(Rc::new(MemoryHistory::new()));
//! scope.navigate("/inbox?unread=1").unwrap();
//!
//! let link = Link::new("../archive");
//! assert_eq!(
//!     link.activate(&scope, &ClickEvent::primary()).unwrap(),
//!     Activation::Intercepted
//! );
//! assert_eq!(scope.location().pathname, "/archive");
//! ```

#![warn(missing_docs)]

// Navigation facade
pub mod navigator;

// Render-state bridge
pub mod bridge;

// Hook surface
pub mod scope;

// Links and activation
pub mod link;

// Query-string view
pub mod search_params;

// Error taxonomy
pub mod error;

// Unified prelude for simplified imports
pub mod prelude;

// Re-export commonly used types
pub use bridge::SubscriptionBridge;
pub use error::{NavError, TargetError};
pub use link::{Activation, ActiveOptions, ClickEvent, Link, pathname_is_active};
pub use navigator::{NavigateOptions, Navigator};
pub use scope::{OwnerId, RouterScope};
pub use search_params::SearchParams;
