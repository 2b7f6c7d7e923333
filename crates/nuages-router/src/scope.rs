//! The router scope: a cloneable capability handle for the hook surface.
//!
//! A [`RouterScope`] ties one history port, its [`Navigator`] and its
//! [`SubscriptionBridge`] together. View code clones the scope freely and
//! asks it for whatever a hook would have provided: the render location,
//! the last action and event, imperative navigation, blocker and listener
//! registration, and entry-state access. Nothing is process-global; two
//! scopes over two ports never observe each other.
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//!
//! use nuages_history::MemoryHistory;
//! use nuages_router::RouterScope;
//!
//! let scope = RouterScope::new(Rc::new(MemoryHistory::new()));
//! scope.navigate("/inbox").unwrap();
//! assert_eq!(scope.location().pathname, "/inbox");
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use nuages_history::{
	BlockOptions, Blocker, BlockerFault, BlockerGuard, HistoryPort, HistoryUpdate, Listener,
	ListenerGuard, Location, NavAction, NavEvent, StopBlocking, Target,
};
use serde_json::Value;

use crate::bridge::SubscriptionBridge;
use crate::error::NavError;
use crate::navigator::{NavigateOptions, Navigator};

thread_local! {
	static NEXT_OWNER_ID: Cell<u64> = const { Cell::new(1) };
}

/// Identifies the owner of a managed blocker registration.
///
/// A component-like caller allocates one id per mount and re-registers
/// under it whenever its dependencies change; the scope releases the
/// previous registration each time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(u64);

impl OwnerId {
	/// Allocates a fresh owner id.
	pub fn next() -> Self {
		NEXT_OWNER_ID.with(|counter| {
			let id = counter.get();
			counter.set(id + 1);
			OwnerId(id)
		})
	}
}

struct ScopeInner {
	port: Rc<dyn HistoryPort>,
	navigator: Navigator,
	bridge: SubscriptionBridge,
	owned_blockers: RefCell<HashMap<OwnerId, BlockerGuard>>,
}

/// Cloneable handle binding a port, a navigator and the bridge together.
#[derive(Clone)]
pub struct RouterScope {
	inner: Rc<ScopeInner>,
}

impl RouterScope {
	/// A scope mounted at the root.
	pub fn new(port: Rc<dyn HistoryPort>) -> Self {
		let navigator = Navigator::new(Rc::clone(&port));
		Self::assemble(port, navigator)
	}

	/// A scope mounted under `basename`.
	///
	/// # Errors
	///
	/// [`NavError::InvalidBasename`] when the basename is malformed.
	pub fn with_basename(port: Rc<dyn HistoryPort>, basename: &str) -> Result<Self, NavError> {
		let navigator = Navigator::with_basename(Rc::clone(&port), basename)?;
		Ok(Self::assemble(port, navigator))
	}

	fn assemble(port: Rc<dyn HistoryPort>, navigator: Navigator) -> Self {
		let bridge = SubscriptionBridge::new(Rc::clone(&port));
		RouterScope {
			inner: Rc::new(ScopeInner {
				port,
				navigator,
				bridge,
				owned_blockers: RefCell::new(HashMap::new()),
			}),
		}
	}

	/// The underlying history port.
	pub fn history(&self) -> Rc<dyn HistoryPort> {
		Rc::clone(&self.inner.port)
	}

	/// The navigator bound to this scope.
	pub fn navigator(&self) -> &Navigator {
		&self.inner.navigator
	}

	/// The scope's basename, `/` when unset.
	pub fn basename(&self) -> &str {
		self.inner.navigator.basename()
	}

	/// The latest update, with the location translated into router space.
	///
	/// Raw port-space updates are available through [`listen`].
	///
	/// [`listen`]: RouterScope::listen
	pub fn render_state(&self) -> HistoryUpdate {
		let mut state = self.inner.bridge.state();
		state.location = self.inner.navigator.strip_location(state.location);
		state
	}

	/// The current render location, basename stripped.
	pub fn location(&self) -> Location {
		self.render_state().location
	}

	/// Kind of the last committed transition.
	pub fn action(&self) -> NavAction {
		self.inner.bridge.state().action
	}

	/// The event behind the latest update, if any.
	pub fn last_event(&self) -> Option<NavEvent> {
		self.inner.bridge.state().event
	}

	/// Navigates with default options.
	pub fn navigate(&self, to: impl Into<Target>) -> Result<(), NavError> {
		self.inner.navigator.navigate(to)
	}

	/// Navigates with explicit options.
	pub fn navigate_with(
		&self,
		to: impl Into<Target>,
		options: NavigateOptions,
	) -> Result<(), NavError> {
		self.inner.navigator.navigate_with(to, options)
	}

	/// A serialized href for the target, basename included.
	pub fn href(&self, to: impl Into<Target>) -> Result<String, NavError> {
		self.inner.navigator.create_href(to)
	}

	/// Moves within the session stack.
	pub fn go(&self, delta: i32) {
		self.inner.navigator.go(delta);
	}

	/// Moves one entry back.
	pub fn back(&self) {
		self.inner.navigator.back();
	}

	/// Moves one entry forward.
	pub fn forward(&self) {
		self.inner.navigator.forward();
	}

	/// Registers a blocker; the registration lives as long as the guard.
	pub fn block(
		&self,
		callback: impl Fn(&NavEvent, &StopBlocking) -> Result<(), BlockerFault> + 'static,
		options: BlockOptions,
	) -> BlockerGuard {
		self.inner.port.block(Blocker::new(callback), options)
	}

	/// Registers a blocker owned by `owner`, releasing any previous
	/// registration under the same owner first.
	///
	/// This is the re-render idiom: call it again whenever the blocking
	/// condition changes and the old blocker is torn down before the new
	/// one attaches.
	pub fn use_blocker(
		&self,
		owner: OwnerId,
		callback: impl Fn(&NavEvent, &StopBlocking) -> Result<(), BlockerFault> + 'static,
		options: BlockOptions,
	) {
		self.inner.owned_blockers.borrow_mut().remove(&owner);
		let guard = self.inner.port.block(Blocker::new(callback), options);
		self.inner.owned_blockers.borrow_mut().insert(owner, guard);
	}

	/// Releases an owned blocker. Returns whether one was registered.
	pub fn release_owner(&self, owner: OwnerId) -> bool {
		self.inner.owned_blockers.borrow_mut().remove(&owner).is_some()
	}

	/// Subscribes to raw port updates.
	pub fn listen(&self, callback: impl Fn(&HistoryUpdate) + 'static) -> ListenerGuard {
		self.inner.port.listen(Listener::new(callback))
	}

	/// State attached to the current entry, from the render cache.
	pub fn history_state(&self) -> Option<Value> {
		self.inner.bridge.state().location.state
	}

	/// Like [`history_state`](RouterScope::history_state), falling back to
	/// `initial` when the entry carries none.
	pub fn history_state_or(&self, initial: Value) -> Value {
		self.history_state().unwrap_or(initial)
	}

	/// Rewrites the current entry's state without navigating, keeping the
	/// render cache in step.
	pub fn set_history_state(&self, value: Option<Value>) {
		self.inner.port.update_state(value.clone());
		self.inner.bridge.update_location_state(value);
	}

	/// Re-attaches the bridge subscription, resetting the render state.
	pub fn rebind(&self) {
		self.inner.bridge.rebind();
	}

	/// Detaches the bridge subscription; render state freezes.
	pub fn unbind(&self) {
		self.inner.bridge.unbind();
	}

	/// Whether the bridge subscription is attached.
	pub fn is_listening(&self) -> bool {
		self.inner.bridge.is_listening()
	}
}

impl fmt::Debug for RouterScope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouterScope")
			.field("basename", &self.basename())
			.field("listening", &self.is_listening())
			.finish_non_exhaustive()
	}
}
