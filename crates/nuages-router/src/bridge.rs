//! The subscription bridge between a history port and render state.
//!
//! A view layer wants exactly one live subscription per mounted router,
//! a cached copy of the latest update to render from, and a teardown
//! that can run any number of times. [`SubscriptionBridge`] owns all
//! three: it binds on construction, [`rebind`](SubscriptionBridge::rebind)
//! tears the old subscription down before attaching the next one, and the
//! cached state always restarts from the port's current location.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use nuages_history::{HistoryPort, HistoryUpdate, Listener, ListenerGuard, debug_log};
use serde_json::Value;

/// Caches the latest [`HistoryUpdate`] behind a single port subscription.
pub struct SubscriptionBridge {
	port: Rc<dyn HistoryPort>,
	state: Rc<RefCell<HistoryUpdate>>,
	subscription: RefCell<Option<ListenerGuard>>,
}

impl SubscriptionBridge {
	/// Binds to the port immediately.
	pub fn new(port: Rc<dyn HistoryPort>) -> Self {
		let bridge = SubscriptionBridge {
			state: Rc::new(RefCell::new(HistoryUpdate::initial(port.location()))),
			subscription: RefCell::new(None),
			port,
		};
		bridge.rebind();
		bridge
	}

	/// Drops any existing subscription, resets the cached state to the
	/// port's current location and subscribes anew.
	///
	/// The old guard is released before the new listener attaches, so the
	/// port never carries two subscriptions from the same bridge.
	pub fn rebind(&self) {
		self.subscription.replace(None);
		*self.state.borrow_mut() = HistoryUpdate::initial(self.port.location());
		debug_log!("bridge rebinding at {}", self.state.borrow().location);
		let state = Rc::clone(&self.state);
		let guard = self.port.listen(Listener::new(move |update: &HistoryUpdate| {
			*state.borrow_mut() = update.clone();
		}));
		*self.subscription.borrow_mut() = Some(guard);
	}

	/// Tears the subscription down; the cached state freezes until the
	/// next [`rebind`](SubscriptionBridge::rebind).
	pub fn unbind(&self) {
		self.subscription.replace(None);
	}

	/// Whether a subscription is currently attached.
	pub fn is_listening(&self) -> bool {
		self.subscription.borrow().is_some()
	}

	/// The latest observed update.
	pub fn state(&self) -> HistoryUpdate {
		self.state.borrow().clone()
	}

	/// Patches the cached location's state value in place, for entry-state
	/// rewrites that bypass navigation and therefore publish no update.
	pub fn update_location_state(&self, value: Option<Value>) {
		self.state.borrow_mut().location.state = value;
	}
}

impl fmt::Debug for SubscriptionBridge {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SubscriptionBridge")
			.field("listening", &self.is_listening())
			.field("state", &self.state.borrow())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use nuages_history::{MemoryHistory, NavAction, Path};
	use serde_json::json;

	use super::*;

	fn bridged() -> (Rc<MemoryHistory>, SubscriptionBridge) {
		let history = Rc::new(MemoryHistory::new());
		let bridge = SubscriptionBridge::new(Rc::clone(&history) as Rc<dyn HistoryPort>);
		(history, bridge)
	}

	#[test]
	fn binds_on_construction() {
		let (history, bridge) = bridged();
		assert!(bridge.is_listening());
		assert_eq!(history.listener_count(), 1);
		assert_eq!(bridge.state().action, NavAction::Pop);
		assert_eq!(bridge.state().location.pathname, "/");
		assert!(bridge.state().event.is_none());
	}

	#[test]
	fn tracks_transitions_through_the_port() {
		let (history, bridge) = bridged();
		history.push(&Path::from_pathname("/tracked"), Some(json!({"n": 1})));

		let state = bridge.state();
		assert_eq!(state.action, NavAction::Push);
		assert_eq!(state.location.pathname, "/tracked");
		assert_eq!(state.location.state, Some(json!({"n": 1})));
		assert!(state.event.is_some());
	}

	#[test]
	fn repeated_rebinds_keep_at_most_one_subscription() {
		let (history, bridge) = bridged();
		for _ in 0..5 {
			bridge.rebind();
		}
		assert_eq!(history.listener_count(), 1);

		history.push(&Path::from_pathname("/once"), None);
		assert_eq!(bridge.state().location.pathname, "/once");
	}

	#[test]
	fn rebind_resets_to_the_current_location_without_an_event() {
		let (history, bridge) = bridged();
		history.push(&Path::from_pathname("/deep"), None);
		assert_eq!(bridge.state().action, NavAction::Push);

		bridge.rebind();
		let state = bridge.state();
		assert_eq!(state.action, NavAction::Pop);
		assert_eq!(state.location.pathname, "/deep");
		assert!(state.event.is_none());
	}

	#[test]
	fn unbind_freezes_the_cached_state() {
		let (history, bridge) = bridged();
		history.push(&Path::from_pathname("/seen"), None);
		bridge.unbind();
		assert!(!bridge.is_listening());
		assert_eq!(history.listener_count(), 0);

		history.push(&Path::from_pathname("/missed"), None);
		assert_eq!(bridge.state().location.pathname, "/seen");
	}

	#[test]
	fn update_location_state_patches_the_cache_only() {
		let (history, bridge) = bridged();
		history.push(&Path::from_pathname("/form"), None);

		bridge.update_location_state(Some(json!({"draft": true})));
		assert_eq!(bridge.state().location.state, Some(json!({"draft": true})));
		assert_eq!(history.location().state, None);
	}
}
