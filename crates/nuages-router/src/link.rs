//! Declarative links and click interception.
//!
//! A [`Link`] pairs a navigation target with an activation policy. View
//! code offers it a [`ClickEvent`]; the link decides whether the click is
//! routed through the history port or left to the platform's native
//! anchor handling. The decision matches what a browser user expects:
//! secondary buttons, modifier keys, foreign frame targets, an already
//! handled event or an explicit full-reload request all stay native.
//!
//! The click type is view-framework agnostic. DOM integrations build it
//! from a `web_sys::MouseEvent` and call the DOM `preventDefault` when the
//! activation reports [`Activation::Intercepted`].

use std::cell::Cell;

use nuages_history::{Target, create_path};
use serde_json::Value;

use crate::error::NavError;
use crate::navigator::NavigateOptions;
use crate::scope::RouterScope;

/// Outcome of offering a click to a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
	/// The click was intercepted and routed through the history port.
	Intercepted,
	/// The click is left to the platform's native handling.
	Native,
}

/// A view-framework-agnostic description of a click.
#[derive(Debug, Clone, Default)]
pub struct ClickEvent {
	/// Mouse button, `0` for the primary button.
	pub button: i16,
	/// Control key held.
	pub ctrl_key: bool,
	/// Alt key held.
	pub alt_key: bool,
	/// Shift key held.
	pub shift_key: bool,
	/// Meta key held.
	pub meta_key: bool,
	prevented: Cell<bool>,
}

impl ClickEvent {
	/// An unmodified primary-button click.
	pub fn primary() -> Self {
		ClickEvent::default()
	}

	/// A click with the given button.
	pub fn with_button(button: i16) -> Self {
		ClickEvent {
			button,
			..ClickEvent::default()
		}
	}

	/// A primary click with the given modifier keys held.
	pub fn modified(ctrl: bool, alt: bool, shift: bool, meta: bool) -> Self {
		ClickEvent {
			ctrl_key: ctrl,
			alt_key: alt,
			shift_key: shift,
			meta_key: meta,
			..ClickEvent::default()
		}
	}

	/// Whether any modifier key is held.
	pub fn has_modifier(&self) -> bool {
		self.ctrl_key || self.alt_key || self.shift_key || self.meta_key
	}

	/// Marks the event as handled.
	pub fn prevent_default(&self) {
		self.prevented.set(true);
	}

	/// Whether the event was already handled.
	pub fn default_prevented(&self) -> bool {
		self.prevented.get()
	}
}

#[cfg(target_arch = "wasm32")]
impl From<&web_sys::MouseEvent> for ClickEvent {
	fn from(event: &web_sys::MouseEvent) -> Self {
		ClickEvent {
			button: event.button(),
			ctrl_key: event.ctrl_key(),
			alt_key: event.alt_key(),
			shift_key: event.shift_key(),
			meta_key: event.meta_key(),
			prevented: Cell::new(event.default_prevented()),
		}
	}
}

/// Options for active-state matching.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActiveOptions {
	/// Require the full pathname to match instead of any `/`-boundary
	/// prefix.
	pub end: bool,
	/// Compare pathnames case-sensitively.
	pub case_sensitive: bool,
}

/// Whether `current_pathname` counts as "at" `to_pathname`.
///
/// Without `end`, a link is active on itself and on any descendant
/// separated by a `/` boundary, so `/users` is active at `/users/42` but
/// not at `/users-archive`.
pub fn pathname_is_active(
	current_pathname: &str,
	to_pathname: &str,
	options: ActiveOptions,
) -> bool {
	let (current, to) = if options.case_sensitive {
		(current_pathname.to_string(), to_pathname.to_string())
	} else {
		(current_pathname.to_lowercase(), to_pathname.to_lowercase())
	};
	current == to
		|| (!options.end && current.starts_with(&to) && current[to.len()..].starts_with('/'))
}

/// A navigation target plus its activation policy.
///
/// ## Example
///
/// ```
/// use std::rc::Rc;
///
/// use nuages_history::MemoryHistory;
/// use nuages_router::{Activation, ClickEvent, Link, RouterScope};
///
/// let scope = RouterScope::new(Rc::new(MemoryHistory::new()));
/// let link = Link::new("/archive?year=2026");
///
/// let click = ClickEvent::primary();
/// assert_eq!(link.activate(&scope, &click).unwrap(), Activation::Intercepted);
/// assert!(click.default_prevented());
/// assert_eq!(scope.location().to_path_string(), "/archive?year=2026");
/// ```
#[derive(Debug, Clone)]
pub struct Link {
	to: Target,
	replace: bool,
	state: Option<Value>,
	reload_document: bool,
	target: Option<String>,
}

impl Link {
	/// A link to the given target with default policy.
	pub fn new(to: impl Into<Target>) -> Self {
		Link {
			to: to.into(),
			replace: false,
			state: None,
			reload_document: false,
			target: None,
		}
	}

	/// Forces replacing the current entry instead of pushing.
	pub fn replace(mut self, replace: bool) -> Self {
		self.replace = replace;
		self
	}

	/// Attaches state to the navigation.
	pub fn state(mut self, state: Value) -> Self {
		self.state = Some(state);
		self
	}

	/// Opts out of interception entirely; clicks stay native.
	pub fn reload_document(mut self, reload: bool) -> Self {
		self.reload_document = reload;
		self
	}

	/// Sets the anchor frame target. Anything other than `_self` keeps
	/// clicks native.
	pub fn target(mut self, target: impl Into<String>) -> Self {
		self.target = Some(target.into());
		self
	}

	/// The link's navigation target.
	pub fn to(&self) -> &Target {
		&self.to
	}

	/// The href to render on the anchor, basename included.
	pub fn href(&self, scope: &RouterScope) -> Result<String, NavError> {
		scope.href(self.to.clone())
	}

	/// Offers a click to the link.
	///
	/// Intercepted clicks are marked handled on the event and routed
	/// through the scope. Navigating onto the location the scope is
	/// already at replaces instead of pushing, so repeated clicks on the
	/// same link do not stack duplicate entries.
	pub fn activate(&self, scope: &RouterScope, event: &ClickEvent) -> Result<Activation, NavError> {
		if event.default_prevented() || self.reload_document {
			return Ok(Activation::Native);
		}
		if event.button != 0 {
			return Ok(Activation::Native);
		}
		if let Some(target) = &self.target
			&& target != "_self"
		{
			return Ok(Activation::Native);
		}
		if event.has_modifier() {
			return Ok(Activation::Native);
		}

		event.prevent_default();
		let current = scope.location().to_path_string();
		let resolved = create_path(&scope.navigator().resolve(self.to.clone())?);
		let options = NavigateOptions {
			replace: self.replace || resolved == current,
			state: self.state.clone(),
		};
		scope.navigate_with(self.to.clone(), options)?;
		Ok(Activation::Intercepted)
	}

	/// Whether the scope's current pathname counts as "at" this link.
	pub fn is_active(&self, scope: &RouterScope, options: ActiveOptions) -> Result<bool, NavError> {
		let resolved = scope.navigator().resolve(self.to.clone())?;
		Ok(pathname_is_active(
			&scope.location().pathname,
			&resolved.pathname,
			options,
		))
	}
}
