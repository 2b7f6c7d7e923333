//! The history port contract shared by every backend.
//!
//! A history port owns a location stack, publishes a [`HistoryUpdate`] to
//! its listeners after every transition, and offers each transition to its
//! blocking chain first. [`HistoryPort`] is object safe so routers and
//! hooks can hold an `Rc<dyn HistoryPort>` and stay agnostic of whether
//! the backend is the in-memory stack or the browser session history.
//!
//! Listener registrations mirror blocker registrations: [`listen`]
//! returns a [`ListenerGuard`] that unsubscribes when released or
//! dropped, and notification walks a snapshot of the registry so a
//! listener unsubscribing mid-walk affects future updates only.
//!
//! [`listen`]: HistoryPort::listen

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::blocking::{BlockOptions, Blocker, BlockerGuard};
use crate::debug_log;
use crate::event::{NavAction, NavEvent};
use crate::location::{Location, Path};

thread_local! {
	static NEXT_LISTENER_ID: Cell<u64> = const { Cell::new(1) };
}

fn next_listener_id() -> u64 {
	NEXT_LISTENER_ID.with(|counter| {
		let id = counter.get();
		counter.set(id + 1);
		id
	})
}

/// The payload delivered to listeners after a transition.
///
/// Committed transitions carry the new location and their kind. Cancelled
/// transitions are republished with the port's location and last action
/// unchanged, and the carried event reports the cancellation.
#[derive(Debug, Clone)]
pub struct HistoryUpdate {
	/// Kind of the last committed transition.
	pub action: NavAction,
	/// Current location of the port.
	pub location: Location,
	/// The event behind this update. `None` for the initial state a
	/// subscriber synthesizes before any transition happened.
	pub event: Option<NavEvent>,
}

impl HistoryUpdate {
	/// The update a fresh subscriber starts from: the current location
	/// with a [`NavAction::Pop`] action and no event.
	pub fn initial(location: Location) -> Self {
		HistoryUpdate {
			action: NavAction::Pop,
			location,
			event: None,
		}
	}

	/// Whether this update reports a cancelled transition.
	pub fn was_cancelled(&self) -> bool {
		self.event.as_ref().is_some_and(NavEvent::is_cancelled)
	}
}

/// A cloneable listener callback.
#[derive(Clone)]
pub struct Listener {
	inner: Rc<dyn Fn(&HistoryUpdate)>,
}

impl Listener {
	/// Wraps a callback invoked with every published update.
	pub fn new(callback: impl Fn(&HistoryUpdate) + 'static) -> Self {
		Listener {
			inner: Rc::new(callback),
		}
	}

	/// Invokes the callback.
	pub fn call(&self, update: &HistoryUpdate) {
		(self.inner)(update);
	}
}

impl fmt::Debug for Listener {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Listener").finish_non_exhaustive()
	}
}

#[derive(Debug)]
struct ListenerEntry {
	id: u64,
	listener: Listener,
}

fn remove_listener(registry: &Weak<RefCell<Vec<ListenerEntry>>>, id: u64) {
	if let Some(registry) = registry.upgrade() {
		registry.borrow_mut().retain(|entry| entry.id != id);
	}
}

/// The ordered listener registry a port notifies after every transition.
///
/// Cloning shares the underlying registry.
#[derive(Debug, Clone, Default)]
pub struct ListenerRegistry {
	registry: Rc<RefCell<Vec<ListenerEntry>>>,
}

impl ListenerRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		ListenerRegistry::default()
	}

	/// Appends a listener; it stays subscribed until the guard is
	/// released or dropped.
	#[must_use = "the listener is unsubscribed when the guard is dropped"]
	pub fn add(&self, listener: Listener) -> ListenerGuard {
		let id = next_listener_id();
		self.registry.borrow_mut().push(ListenerEntry { id, listener });
		ListenerGuard {
			registry: Rc::downgrade(&self.registry),
			id,
		}
	}

	/// Delivers an update to every listener, in subscription order.
	///
	/// Walks a snapshot so listeners may unsubscribe or subscribe during
	/// delivery without affecting the current walk.
	pub fn notify(&self, update: &HistoryUpdate) {
		let snapshot: Vec<Listener> = self
			.registry
			.borrow()
			.iter()
			.map(|entry| entry.listener.clone())
			.collect();
		debug_log!(
			"notifying {} listeners of {} -> {}",
			snapshot.len(),
			update.action,
			update.location
		);
		for listener in snapshot {
			listener.call(update);
		}
	}

	/// Number of live subscriptions.
	pub fn len(&self) -> usize {
		self.registry.borrow().len()
	}

	/// Whether the registry has no subscriptions.
	pub fn is_empty(&self) -> bool {
		self.registry.borrow().is_empty()
	}
}

/// Keeps one listener subscribed; unsubscribing is idempotent and also
/// happens on drop.
#[must_use = "the listener is unsubscribed when the guard is dropped"]
#[derive(Debug)]
pub struct ListenerGuard {
	registry: Weak<RefCell<Vec<ListenerEntry>>>,
	id: u64,
}

impl ListenerGuard {
	/// Removes the listener from the registry.
	pub fn release(&self) {
		remove_listener(&self.registry, self.id);
	}
}

impl Drop for ListenerGuard {
	fn drop(&mut self) {
		self.release();
	}
}

/// The operations every history backend exposes.
///
/// Implementations offer each push, replace and pop to their
/// [`BlockerChain`](crate::blocking::BlockerChain) before committing,
/// publish a [`HistoryUpdate`] either way, and keep the location unchanged
/// when the event was cancelled.
pub trait HistoryPort {
	/// The current location.
	fn location(&self) -> Location;

	/// Pushes a new entry, dropping any forward entries.
	fn push(&self, path: &Path, state: Option<Value>);

	/// Replaces the current entry in place.
	fn replace(&self, path: &Path, state: Option<Value>);

	/// Moves by `delta` entries; out-of-range targets clamp to the stack
	/// bounds and a zero effective move publishes nothing.
	fn go(&self, delta: i32);

	/// Rewrites the state of the current entry without navigating.
	fn update_state(&self, state: Option<Value>);

	/// Subscribes to updates.
	fn listen(&self, listener: Listener) -> ListenerGuard;

	/// Registers a blocker for the kinds selected by `options`.
	fn block(&self, blocker: Blocker, options: BlockOptions) -> BlockerGuard;

	/// Moves one entry back.
	fn back(&self) {
		self.go(-1);
	}

	/// Moves one entry forward.
	fn forward(&self) {
		self.go(1);
	}
}
