//! Basename-aware imperative navigation over a history port.
//!
//! A [`Navigator`] owns the translation between the router's coordinate
//! space and the port's: callers resolve and navigate with basename-free
//! paths, the navigator prefixes the basename before the port sees them,
//! and locations read back with the basename stripped away. Structured
//! targets are validated before resolution so a pathname can never
//! smuggle in a search or hash separator.

use std::fmt;
use std::rc::Rc;

use nuages_history::{
	HistoryPort, Location, Path, Target, create_path, debug_log, join_paths, resolve_path,
	strip_basename, warn_log,
};
use serde_json::Value;

use crate::error::{NavError, TargetError};

/// Options for a single navigation.
#[derive(Debug, Clone, Default)]
pub struct NavigateOptions {
	/// Replace the current entry instead of pushing a new one.
	pub replace: bool,
	/// State to attach to the target entry.
	pub state: Option<Value>,
}

impl NavigateOptions {
	/// Options that replace the current entry.
	pub fn replacing() -> Self {
		NavigateOptions {
			replace: true,
			state: None,
		}
	}

	/// Attaches state to the navigation.
	pub fn with_state(mut self, state: Value) -> Self {
		self.state = Some(state);
		self
	}
}

fn normalize_basename(basename: &str) -> Result<String, NavError> {
	if basename.is_empty() || basename == "/" {
		return Ok("/".to_string());
	}
	if !basename.starts_with('/') || basename.contains('?') || basename.contains('#') {
		return Err(NavError::InvalidBasename(basename.to_string()));
	}
	let trimmed = basename.trim_end_matches('/');
	if trimmed.is_empty() {
		return Ok("/".to_string());
	}
	Ok(trimmed.to_string())
}

fn validate_target(target: Target) -> Result<Target, TargetError> {
	if let Target::Parts(parts) = &target {
		if parts.pathname.contains('?') || parts.pathname.contains('#') {
			return Err(TargetError::PathnameSeparator);
		}
		if parts.search.contains('#') {
			return Err(TargetError::SearchSeparator);
		}
	}
	Ok(target)
}

/// Imperative navigation facade bound to one history port.
///
/// Cloning shares the port; the basename is immutable after construction.
#[derive(Clone)]
pub struct Navigator {
	port: Rc<dyn HistoryPort>,
	basename: String,
}

impl Navigator {
	/// A navigator mounted at the root, with no basename prefix.
	pub fn new(port: Rc<dyn HistoryPort>) -> Self {
		Navigator {
			port,
			basename: "/".to_string(),
		}
	}

	/// A navigator mounted under `basename`.
	///
	/// Trailing slashes are trimmed; `""` and `"/"` mean no prefix.
	///
	/// # Errors
	///
	/// [`NavError::InvalidBasename`] when the basename is relative or
	/// carries a `?` or `#`.
	pub fn with_basename(port: Rc<dyn HistoryPort>, basename: &str) -> Result<Self, NavError> {
		Ok(Navigator {
			port,
			basename: normalize_basename(basename)?,
		})
	}

	/// The normalized basename, `/` when unset.
	pub fn basename(&self) -> &str {
		&self.basename
	}

	/// Strips the basename off a port-space location.
	///
	/// A location outside the basename keeps its full pathname; that is a
	/// deployment mismatch worth a warning rather than a panic.
	pub fn strip_location(&self, mut location: Location) -> Location {
		match strip_basename(&location.pathname, &self.basename) {
			Some(stripped) => location.pathname = stripped,
			None => {
				warn_log!(
					"location {} is outside basename {}",
					location.pathname,
					self.basename
				);
			}
		}
		location
	}

	/// The current location in router space.
	pub fn location(&self) -> Location {
		self.strip_location(self.port.location())
	}

	/// Resolves a target against the current location, in router space.
	///
	/// Relative pathnames resolve against the current pathname, `.` and
	/// `..` included; absolute pathnames pass through.
	pub fn resolve(&self, to: impl Into<Target>) -> Result<Path, NavError> {
		let target = validate_target(to.into())?;
		Ok(resolve_path(&target, &self.location().pathname))
	}

	/// Resolves a target and prefixes the basename: the path the port sees.
	pub fn resolve_full(&self, to: impl Into<Target>) -> Result<Path, NavError> {
		let mut path = self.resolve(to)?;
		if self.basename != "/" {
			path.pathname = join_paths(&self.basename, &path.pathname);
		}
		Ok(path)
	}

	/// A serialized href for anchors, basename included.
	pub fn create_href(&self, to: impl Into<Target>) -> Result<String, NavError> {
		Ok(create_path(&self.resolve_full(to)?))
	}

	/// Navigates with default options.
	pub fn navigate(&self, to: impl Into<Target>) -> Result<(), NavError> {
		self.navigate_with(to, NavigateOptions::default())
	}

	/// Resolves the target and pushes or replaces through the port.
	///
	/// # Example
	///
	/// ```
	/// use std::rc::Rc;
	///
	/// use nuages_history::MemoryHistory;
	/// use nuages_router::{NavigateOptions, Navigator};
	/// use serde_json::json;
	///
	/// let navigator = Navigator::new(Rc::new(MemoryHistory::new()));
	/// navigator
	/// 	.navigate_with("/report", NavigateOptions::replacing().with_state(json!({"tab": 1})))
	/// 	.unwrap();
	/// assert_eq!(navigator.location().pathname, "/report");
	/// ```
	pub fn navigate_with(
		&self,
		to: impl Into<Target>,
		options: NavigateOptions,
	) -> Result<(), NavError> {
		let path = self.resolve_full(to)?;
		debug_log!(
			"navigating to {} (replace: {})",
			create_path(&path),
			options.replace
		);
		if options.replace {
			self.port.replace(&path, options.state);
		} else {
			self.port.push(&path, options.state);
		}
		Ok(())
	}

	/// Pushes a new entry for the resolved target.
	pub fn push(&self, to: impl Into<Target>, state: Option<Value>) -> Result<(), NavError> {
		self.navigate_with(
			to,
			NavigateOptions {
				replace: false,
				state,
			},
		)
	}

	/// Replaces the current entry with the resolved target.
	pub fn replace(&self, to: impl Into<Target>, state: Option<Value>) -> Result<(), NavError> {
		self.navigate_with(
			to,
			NavigateOptions {
				replace: true,
				state,
			},
		)
	}

	/// Moves within the session stack.
	pub fn go(&self, delta: i32) {
		self.port.go(delta);
	}

	/// Moves one entry back.
	pub fn back(&self) {
		self.port.back();
	}

	/// Moves one entry forward.
	pub fn forward(&self) {
		self.port.forward();
	}
}

impl fmt::Debug for Navigator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Navigator")
			.field("basename", &self.basename)
			.finish_non_exhaustive()
	}
}
