//! Navigation events offered to the blocking chain.
//!
//! A [`NavEvent`] describes one attempted transition: its kind, the
//! location it leaves, and the location it targets. Blockers receive the
//! event while it is in the blocking stage and may cancel it; once the
//! owning port seals the event the cancellation flag is frozen and late
//! writes are ignored.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::location::Location;
use crate::warn_log;

/// The kind of a navigation: a new entry, an in-place swap, or a move
/// through existing entries (back/forward included).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
	/// A new entry appended to the stack.
	Push,
	/// The current entry swapped in place.
	Replace,
	/// Movement across existing entries by some delta.
	Pop,
}

impl fmt::Display for NavAction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			NavAction::Push => write!(f, "Push"),
			NavAction::Replace => write!(f, "Replace"),
			NavAction::Pop => write!(f, "Pop"),
		}
	}
}

#[derive(Debug, Default)]
struct EventFlags {
	cancelled: Cell<bool>,
	sealed: Cell<bool>,
}

/// One attempted navigation, shared between the port, the blocking chain,
/// and render-state observers.
///
/// Clones share the cancellation flag, so a clone held in render state
/// reflects the decision made while the original was in the blocking
/// stage.
#[derive(Debug, Clone)]
pub struct NavEvent {
	kind: NavAction,
	from: Location,
	to: Location,
	flags: Rc<EventFlags>,
}

impl NavEvent {
	/// Creates an event in the blocking stage (unsealed, not cancelled).
	pub fn new(kind: NavAction, from: Location, to: Location) -> Self {
		NavEvent {
			kind,
			from,
			to,
			flags: Rc::new(EventFlags::default()),
		}
	}

	/// The kind of this navigation.
	pub fn kind(&self) -> NavAction {
		self.kind
	}

	/// The location the navigation leaves.
	pub fn from(&self) -> &Location {
		&self.from
	}

	/// The location the navigation targets.
	pub fn to(&self) -> &Location {
		&self.to
	}

	/// Whether any blocker cancelled this event.
	pub fn is_cancelled(&self) -> bool {
		self.flags.cancelled.get()
	}

	/// Cancels the event, or attempts to clear a cancellation.
	///
	/// Cancellation is sticky: once any blocker has cancelled the event,
	/// clearing attempts are ignored, so any cancellation wins regardless
	/// of chain position. Calls after the event was sealed are ignored and
	/// logged, since the navigation decision has already been applied.
	pub fn set_cancelled(&self, cancelled: bool) {
		if self.flags.sealed.get() {
			warn_log!(
				"ignoring cancellation change on a settled {} event to {}",
				self.kind,
				self.to
			);
			return;
		}
		if !cancelled && self.flags.cancelled.get() {
			return;
		}
		self.flags.cancelled.set(cancelled);
	}

	/// Freezes the cancellation flag. Ports call this once the blocking
	/// stage is over, before the event becomes visible to listeners.
	pub fn seal(&self) {
		self.flags.sealed.set(true);
	}
}
