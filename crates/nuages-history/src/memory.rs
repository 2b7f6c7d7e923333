//! An in-memory history backend.
//!
//! [`MemoryHistory`] keeps the entry stack in plain memory, which makes it
//! the backend for tests, server-side rendering and any embedding without
//! a browser session history. It implements the full [`HistoryPort`]
//! contract including blocking and cancellation, so code exercised
//! against it behaves identically on the browser backend.
//!
//! ## Example
//!
//! ```
//! use nuages_history::{HistoryPort, MemoryHistory, Path};
//!
//! let history = MemoryHistory::new();
//! history.push(&Path::from_pathname("/inbox"), None);
//! assert_eq!(history.location().pathname, "/inbox");
//! history.back();
//! assert_eq!(history.location().pathname, "/");
//! ```

use std::cell::{Cell, RefCell};

use serde_json::Value;

use crate::blocking::{BlockOptions, Blocker, BlockerChain, BlockerGuard};
use crate::debug_log;
use crate::event::{NavAction, NavEvent};
use crate::location::{Location, Path, parse_path};
use crate::port::{HistoryPort, HistoryUpdate, Listener, ListenerGuard, ListenerRegistry};

/// A history port backed by an in-memory entry stack.
///
/// The stack always holds at least one entry and the index always points
/// at a valid one. Pushing from the middle of the stack drops the forward
/// entries first, mirroring how a browser session history behaves.
#[derive(Debug)]
pub struct MemoryHistory {
	entries: RefCell<Vec<Location>>,
	index: Cell<usize>,
	last_action: Cell<NavAction>,
	listeners: ListenerRegistry,
	blockers: BlockerChain,
}

impl Default for MemoryHistory {
	fn default() -> Self {
		MemoryHistory::new()
	}
}

impl MemoryHistory {
	/// Creates a history with a single `/` entry.
	pub fn new() -> Self {
		MemoryHistory {
			entries: RefCell::new(vec![Location::root()]),
			index: Cell::new(0),
			last_action: Cell::new(NavAction::Pop),
			listeners: ListenerRegistry::new(),
			blockers: BlockerChain::new(),
		}
	}

	/// Creates a history seeded with the given entries, starting at the
	/// last one. Each entry is parsed as a full path; an empty iterator
	/// falls back to a single `/` entry.
	///
	/// # Example
	///
	/// ```
	/// use nuages_history::{HistoryPort, MemoryHistory};
	///
	/// let history = MemoryHistory::with_entries(["/", "/settings?tab=profile"]);
	/// assert_eq!(history.location().pathname, "/settings");
	/// assert_eq!(history.location().search, "?tab=profile");
	/// ```
	pub fn with_entries<I, S>(initial: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut entries: Vec<Location> = initial
			.into_iter()
			.map(|entry| Location::new(&parse_path(entry.as_ref()), None))
			.collect();
		if entries.is_empty() {
			entries.push(Location::root());
		}
		let index = entries.len() - 1;
		MemoryHistory {
			entries: RefCell::new(entries),
			index: Cell::new(index),
			last_action: Cell::new(NavAction::Pop),
			listeners: ListenerRegistry::new(),
			blockers: BlockerChain::new(),
		}
	}

	/// Kind of the last committed transition.
	pub fn action(&self) -> NavAction {
		self.last_action.get()
	}

	/// Index of the current entry.
	pub fn index(&self) -> usize {
		self.index.get()
	}

	/// Number of entries on the stack.
	pub fn len(&self) -> usize {
		self.entries.borrow().len()
	}

	/// Always `false`; the stack keeps at least one entry.
	pub fn is_empty(&self) -> bool {
		false
	}

	/// Number of subscribed listeners.
	pub fn listener_count(&self) -> usize {
		self.listeners.len()
	}

	/// Number of registered blockers.
	pub fn blocker_count(&self) -> usize {
		self.blockers.len()
	}

	fn publish_cancelled(&self, event: NavEvent) {
		event.seal();
		debug_log!("{} cancelled, republishing unchanged location", event.kind());
		self.listeners.notify(&HistoryUpdate {
			action: self.last_action.get(),
			location: self.location(),
			event: Some(event),
		});
	}

	fn commit(&self, action: NavAction, location: Location, event: NavEvent) {
		event.seal();
		self.last_action.set(action);
		self.listeners.notify(&HistoryUpdate {
			action,
			location,
			event: Some(event),
		});
	}
}

impl HistoryPort for MemoryHistory {
	fn location(&self) -> Location {
		self.entries.borrow()[self.index.get()].clone()
	}

	fn push(&self, path: &Path, state: Option<Value>) {
		let to = Location::new(path, state);
		let event = NavEvent::new(NavAction::Push, self.location(), to.clone());
		if self.blockers.offer(&event) {
			self.publish_cancelled(event);
			return;
		}
		let index = self.index.get();
		{
			let mut entries = self.entries.borrow_mut();
			entries.truncate(index + 1);
			entries.push(to.clone());
		}
		self.index.set(index + 1);
		self.commit(NavAction::Push, to, event);
	}

	fn replace(&self, path: &Path, state: Option<Value>) {
		let to = Location::new(path, state);
		let event = NavEvent::new(NavAction::Replace, self.location(), to.clone());
		if self.blockers.offer(&event) {
			self.publish_cancelled(event);
			return;
		}
		self.entries.borrow_mut()[self.index.get()] = to.clone();
		self.commit(NavAction::Replace, to, event);
	}

	fn go(&self, delta: i32) {
		let index = self.index.get();
		let last = self.entries.borrow().len() as i64 - 1;
		let target = (index as i64 + i64::from(delta)).clamp(0, last) as usize;
		if target == index {
			return;
		}
		let to = self.entries.borrow()[target].clone();
		let event = NavEvent::new(NavAction::Pop, self.location(), to.clone());
		if self.blockers.offer(&event) {
			self.publish_cancelled(event);
			return;
		}
		self.index.set(target);
		self.commit(NavAction::Pop, to, event);
	}

	fn update_state(&self, state: Option<Value>) {
		self.entries.borrow_mut()[self.index.get()].state = state;
	}

	fn listen(&self, listener: Listener) -> ListenerGuard {
		self.listeners.add(listener)
	}

	fn block(&self, blocker: Blocker, options: BlockOptions) -> BlockerGuard {
		self.blockers.block(blocker, options)
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use serde_json::json;

	use super::*;

	fn push_path(history: &MemoryHistory, pathname: &str) {
		history.push(&Path::from_pathname(pathname), None);
	}

	#[test]
	fn starts_at_root_with_pop_action() {
		let history = MemoryHistory::new();
		assert_eq!(history.location().pathname, "/");
		assert_eq!(history.action(), NavAction::Pop);
		assert_eq!(history.len(), 1);
		assert_eq!(history.index(), 0);
	}

	#[test]
	fn with_entries_starts_at_the_last_entry() {
		let history = MemoryHistory::with_entries(["/", "/a", "/b?x=1#frag"]);
		assert_eq!(history.len(), 3);
		assert_eq!(history.index(), 2);
		assert_eq!(history.location().pathname, "/b");
		assert_eq!(history.location().search, "?x=1");
		assert_eq!(history.location().hash, "#frag");
	}

	#[test]
	fn with_entries_falls_back_to_root_when_empty() {
		let history = MemoryHistory::with_entries(Vec::<String>::new());
		assert_eq!(history.len(), 1);
		assert_eq!(history.location().pathname, "/");
	}

	#[test]
	fn push_appends_and_advances() {
		let history = MemoryHistory::new();
		push_path(&history, "/first");
		push_path(&history, "/second");
		assert_eq!(history.len(), 3);
		assert_eq!(history.index(), 2);
		assert_eq!(history.action(), NavAction::Push);
		assert_eq!(history.location().pathname, "/second");
	}

	#[test]
	fn push_from_the_middle_drops_forward_entries() {
		let history = MemoryHistory::new();
		push_path(&history, "/first");
		push_path(&history, "/second");
		history.go(-2);
		push_path(&history, "/branch");
		assert_eq!(history.len(), 2);
		assert_eq!(history.location().pathname, "/branch");
		history.forward();
		assert_eq!(history.location().pathname, "/branch");
	}

	#[test]
	fn replace_swaps_in_place() {
		let history = MemoryHistory::new();
		push_path(&history, "/old");
		let replaced = Path::from_pathname("/new");
		history.replace(&replaced, Some(json!({"kept": true})));
		assert_eq!(history.len(), 2);
		assert_eq!(history.index(), 1);
		assert_eq!(history.action(), NavAction::Replace);
		assert_eq!(history.location().pathname, "/new");
		assert_eq!(history.location().state, Some(json!({"kept": true})));
	}

	#[test]
	fn every_entry_gets_a_distinct_key() {
		let history = MemoryHistory::new();
		push_path(&history, "/a");
		let first = history.location().key.clone();
		history.replace(&Path::from_pathname("/a"), None);
		let second = history.location().key.clone();
		assert_ne!(first, second);
	}

	#[test]
	fn go_clamps_to_stack_bounds() {
		let history = MemoryHistory::new();
		push_path(&history, "/only");
		history.go(-10);
		assert_eq!(history.index(), 0);
		assert_eq!(history.location().pathname, "/");
		history.go(10);
		assert_eq!(history.index(), 1);
		assert_eq!(history.location().pathname, "/only");
	}

	#[test]
	fn zero_effective_move_publishes_nothing() {
		let history = MemoryHistory::new();
		let updates = Rc::new(RefCell::new(0));
		let consulted = Rc::new(RefCell::new(0));
		let _listener = history.listen(Listener::new({
			let updates = Rc::clone(&updates);
			move |_| *updates.borrow_mut() += 1
		}));
		let _blocker = history.block(
			Blocker::new({
				let consulted = Rc::clone(&consulted);
				move |_, _| {
					*consulted.borrow_mut() += 1;
					Ok(())
				}
			}),
			BlockOptions::default(),
		);

		history.go(0);
		history.back();
		assert_eq!(*updates.borrow(), 0);
		assert_eq!(*consulted.borrow(), 0);
	}

	#[test]
	fn back_and_forward_walk_the_stack() {
		let history = MemoryHistory::new();
		push_path(&history, "/first");
		push_path(&history, "/second");
		history.back();
		assert_eq!(history.location().pathname, "/first");
		assert_eq!(history.action(), NavAction::Pop);
		history.forward();
		assert_eq!(history.location().pathname, "/second");
	}

	#[test]
	fn listeners_receive_the_committed_update() {
		let history = MemoryHistory::new();
		let seen = Rc::new(RefCell::new(Vec::new()));
		let _guard = history.listen(Listener::new({
			let seen = Rc::clone(&seen);
			move |update: &HistoryUpdate| {
				seen.borrow_mut()
					.push((update.action, update.location.pathname.clone()));
			}
		}));

		push_path(&history, "/first");
		history.back();
		assert_eq!(
			*seen.borrow(),
			vec![
				(NavAction::Push, "/first".to_string()),
				(NavAction::Pop, "/".to_string()),
			]
		);
	}

	#[test]
	fn dropped_listener_guard_stops_updates() {
		let history = MemoryHistory::new();
		let updates = Rc::new(RefCell::new(0));
		{
			let _guard = history.listen(Listener::new({
				let updates = Rc::clone(&updates);
				move |_| *updates.borrow_mut() += 1
			}));
			push_path(&history, "/seen");
		}
		push_path(&history, "/unseen");
		assert_eq!(*updates.borrow(), 1);
		assert_eq!(history.listener_count(), 0);
	}

	#[test]
	fn cancelled_push_leaves_the_stack_unchanged() {
		let history = MemoryHistory::new();
		let _blocker = history.block(
			Blocker::new(|event, _| {
				event.set_cancelled(true);
				Ok(())
			}),
			BlockOptions::default(),
		);
		let seen = Rc::new(RefCell::new(Vec::new()));
		let _listener = history.listen(Listener::new({
			let seen = Rc::clone(&seen);
			move |update: &HistoryUpdate| {
				seen.borrow_mut().push((
					update.action,
					update.location.pathname.clone(),
					update.was_cancelled(),
				));
			}
		}));

		push_path(&history, "/denied");
		assert_eq!(history.len(), 1);
		assert_eq!(history.location().pathname, "/");
		assert_eq!(history.action(), NavAction::Pop);
		assert_eq!(*seen.borrow(), vec![(NavAction::Pop, "/".to_string(), true)]);
	}

	#[test]
	fn cancelled_pop_keeps_the_index() {
		let history = MemoryHistory::new();
		push_path(&history, "/stay");
		let _blocker = history.block(
			Blocker::new(|event, _| {
				event.set_cancelled(true);
				Ok(())
			}),
			BlockOptions::only(NavAction::Pop),
		);

		history.back();
		assert_eq!(history.index(), 1);
		assert_eq!(history.location().pathname, "/stay");
	}

	#[test]
	fn listeners_cannot_flip_cancellation_after_the_walk() {
		let history = MemoryHistory::new();
		let _listener = history.listen(Listener::new(|update: &HistoryUpdate| {
			if let Some(event) = &update.event {
				event.set_cancelled(true);
			}
		}));

		push_path(&history, "/through");
		assert_eq!(history.location().pathname, "/through");
		assert_eq!(history.len(), 2);
	}

	#[test]
	fn update_state_rewrites_without_navigating() {
		let history = MemoryHistory::new();
		push_path(&history, "/draft");
		let key = history.location().key.clone();
		let updates = Rc::new(RefCell::new(0));
		let _listener = history.listen(Listener::new({
			let updates = Rc::clone(&updates);
			move |_| *updates.borrow_mut() += 1
		}));

		history.update_state(Some(json!({"saved": false})));
		assert_eq!(history.location().state, Some(json!({"saved": false})));
		assert_eq!(history.location().key, key);
		assert_eq!(history.len(), 2);
		assert_eq!(*updates.borrow(), 0);
	}

	#[test]
	fn stop_blocking_allows_the_reissued_navigation() {
		let history = MemoryHistory::new();
		let _blocker = history.block(
			Blocker::new(|event, stop| {
				event.set_cancelled(true);
				stop.stop();
				Ok(())
			}),
			BlockOptions::default(),
		);

		push_path(&history, "/guarded");
		assert_eq!(history.location().pathname, "/");
		push_path(&history, "/guarded");
		assert_eq!(history.location().pathname, "/guarded");
		assert_eq!(history.blocker_count(), 0);
	}
}
