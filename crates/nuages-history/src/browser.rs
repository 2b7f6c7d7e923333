//! Browser session history backend.
//!
//! [`BrowserHistory`] drives `window.history` through `web-sys` and keeps
//! the [`HistoryPort`] contract identical to the in-memory backend. Entry
//! state, the entry key and the entry's depth within the session are
//! persisted in the native history state slot, so reloads recover them
//! and cancelled pops can be reverted by moving back by the observed
//! delta.
//!
//! Pops are inherently asynchronous here: `go` asks the browser to move
//! and the update publishes when the `popstate` event arrives. When a
//! blocker cancels a pop the backend immediately moves back to the entry
//! it came from and swallows the resulting `popstate`, then republishes
//! the unchanged location with the cancelled event attached.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use crate::blocking::{BlockOptions, Blocker, BlockerChain, BlockerGuard};
use crate::error::HistoryError;
use crate::event::{NavAction, NavEvent};
use crate::location::{Location, Path, normalize_hash, normalize_search};
use crate::port::{HistoryPort, HistoryUpdate, Listener, ListenerGuard, ListenerRegistry};
use crate::{error_log, warn_log};

/// The payload stored in the native history state slot.
///
/// `usr` carries the caller's state, `key` the entry key and `idx` the
/// entry's depth within the session. The field names survive reloads, so
/// they are part of the on-disk format and must stay stable.
#[derive(Debug, Serialize, Deserialize)]
struct EntryState {
	usr: Option<Value>,
	key: String,
	idx: i64,
}

fn decode_entry_state(value: &JsValue) -> Option<EntryState> {
	if value.is_null() || value.is_undefined() {
		return None;
	}
	let json = js_sys::JSON::stringify(value).ok()?;
	serde_json::from_str(&String::from(json)).ok()
}

fn encode_entry_state(entry: &EntryState) -> Result<JsValue, HistoryError> {
	let json = serde_json::to_string(entry)?;
	js_sys::JSON::parse(&json)
		.map_err(|_| HistoryError::Backend("history state is not JSON compatible".into()))
}

struct BrowserInner {
	window: web_sys::Window,
	history: web_sys::History,
	current: RefCell<Location>,
	last_action: Cell<NavAction>,
	depth: Cell<i64>,
	reverting: Cell<bool>,
	listeners: ListenerRegistry,
	blockers: BlockerChain,
}

impl BrowserInner {
	/// Reads the location the browser is showing right now, preferring the
	/// key and state recorded in the native state slot.
	fn read_location(&self, raw_state: &JsValue) -> (Location, Option<i64>) {
		let shown = self.window.location();
		let path = Path {
			pathname: shown.pathname().unwrap_or_else(|_| String::from("/")),
			search: normalize_search(&shown.search().unwrap_or_default()),
			hash: normalize_hash(&shown.hash().unwrap_or_default()),
		};
		match decode_entry_state(raw_state) {
			Some(entry) => {
				let mut location = Location::new(&path, entry.usr);
				location.key = entry.key;
				(location, Some(entry.idx))
			}
			None => (Location::new(&path, None), None),
		}
	}

	fn stamp(&self, entry: &EntryState) {
		match encode_entry_state(entry) {
			Ok(js_state) => {
				if let Err(value) = self.history.replace_state(&js_state, "") {
					error_log!("replaceState rejected the entry stamp: {:?}", value);
				}
			}
			Err(error) => error_log!("failed to encode history state: {}", error),
		}
	}

	fn publish_cancelled(&self, event: NavEvent) {
		event.seal();
		self.listeners.notify(&HistoryUpdate {
			action: self.last_action.get(),
			location: self.current.borrow().clone(),
			event: Some(event),
		});
	}

	fn commit(&self, action: NavAction, location: Location, event: NavEvent) {
		event.seal();
		*self.current.borrow_mut() = location.clone();
		self.last_action.set(action);
		self.listeners.notify(&HistoryUpdate {
			action,
			location,
			event: Some(event),
		});
	}

	fn handle_popstate(&self) {
		let raw_state = self.history.state().unwrap_or(JsValue::NULL);
		let (to, new_depth) = self.read_location(&raw_state);
		if self.reverting.replace(false) {
			// This popstate is the revert of a cancelled pop; resync the
			// depth and stay silent.
			self.depth.set(new_depth.unwrap_or_else(|| self.depth.get()));
			return;
		}
		let from = self.current.borrow().clone();
		let event = NavEvent::new(NavAction::Pop, from, to.clone());
		if self.blockers.offer(&event) {
			match new_depth {
				Some(new_depth) => {
					let delta = self.depth.get() - new_depth;
					if delta != 0 {
						self.reverting.set(true);
						if let Err(value) = self.history.go_with_delta(delta as i32) {
							error_log!("failed to revert a cancelled pop: {:?}", value);
							self.reverting.set(false);
						}
					}
				}
				None => {
					warn_log!("cannot revert a pop onto an entry without depth metadata");
				}
			}
			self.publish_cancelled(event);
			return;
		}
		self.depth.set(new_depth.unwrap_or_else(|| self.depth.get()));
		self.commit(NavAction::Pop, to, event);
	}
}

/// A history port backed by the browser session history.
pub struct BrowserHistory {
	inner: Rc<BrowserInner>,
	popstate: Closure<dyn FnMut(web_sys::PopStateEvent)>,
}

impl BrowserHistory {
	/// Binds to `window.history` and starts listening for `popstate`.
	///
	/// The current entry is adopted as-is when it already carries this
	/// crate's state stamp; otherwise it is stamped in place so reloads
	/// and pops can recover the key and depth.
	///
	/// # Errors
	///
	/// [`HistoryError::WindowUnavailable`] outside a browsing context,
	/// [`HistoryError::Backend`] when the session history refuses to
	/// attach.
	pub fn new() -> Result<Self, HistoryError> {
		let window = web_sys::window().ok_or(HistoryError::WindowUnavailable)?;
		let history = window
			.history()
			.map_err(|_| HistoryError::Backend("session history is unavailable".into()))?;

		let shown = window.location();
		let path = Path {
			pathname: shown.pathname().unwrap_or_else(|_| String::from("/")),
			search: normalize_search(&shown.search().unwrap_or_default()),
			hash: normalize_hash(&shown.hash().unwrap_or_default()),
		};
		let raw_state = history.state().unwrap_or(JsValue::NULL);
		let (location, depth, needs_stamp) = match decode_entry_state(&raw_state) {
			Some(entry) => {
				let mut location = Location::new(&path, entry.usr);
				location.key = entry.key;
				(location, entry.idx, false)
			}
			None => (Location::new(&path, None), 0, true),
		};

		let inner = Rc::new(BrowserInner {
			window,
			history,
			current: RefCell::new(location),
			last_action: Cell::new(NavAction::Pop),
			depth: Cell::new(depth),
			reverting: Cell::new(false),
			listeners: ListenerRegistry::new(),
			blockers: BlockerChain::new(),
		});
		if needs_stamp {
			let current = inner.current.borrow().clone();
			inner.stamp(&EntryState {
				usr: current.state,
				key: current.key,
				idx: depth,
			});
		}

		let popstate = {
			let inner = Rc::clone(&inner);
			Closure::wrap(Box::new(move |_: web_sys::PopStateEvent| {
				inner.handle_popstate();
			}) as Box<dyn FnMut(web_sys::PopStateEvent)>)
		};
		inner
			.window
			.add_event_listener_with_callback("popstate", popstate.as_ref().unchecked_ref())
			.map_err(|_| HistoryError::Backend("failed to attach the popstate listener".into()))?;

		Ok(BrowserHistory { inner, popstate })
	}
}

impl HistoryPort for BrowserHistory {
	fn location(&self) -> Location {
		self.inner.current.borrow().clone()
	}

	fn push(&self, path: &Path, state: Option<Value>) {
		let to = Location::new(path, state);
		let event = NavEvent::new(NavAction::Push, self.location(), to.clone());
		if self.inner.blockers.offer(&event) {
			self.inner.publish_cancelled(event);
			return;
		}
		let depth = self.inner.depth.get() + 1;
		let entry = EntryState {
			usr: to.state.clone(),
			key: to.key.clone(),
			idx: depth,
		};
		let url = to.to_path_string();
		let js_state = match encode_entry_state(&entry) {
			Ok(value) => value,
			Err(error) => {
				error_log!("failed to encode history state: {}", error);
				JsValue::NULL
			}
		};
		if self
			.inner
			.history
			.push_state_with_url(&js_state, "", Some(&url))
			.is_err()
		{
			// Some embedders refuse pushState; fall back to a full load
			// so the navigation still happens.
			warn_log!("pushState rejected {}, falling back to a full load", url);
			let _ = self.inner.window.location().assign(&url);
			return;
		}
		self.inner.depth.set(depth);
		self.inner.commit(NavAction::Push, to, event);
	}

	fn replace(&self, path: &Path, state: Option<Value>) {
		let to = Location::new(path, state);
		let event = NavEvent::new(NavAction::Replace, self.location(), to.clone());
		if self.inner.blockers.offer(&event) {
			self.inner.publish_cancelled(event);
			return;
		}
		let entry = EntryState {
			usr: to.state.clone(),
			key: to.key.clone(),
			idx: self.inner.depth.get(),
		};
		let url = to.to_path_string();
		let js_state = match encode_entry_state(&entry) {
			Ok(value) => value,
			Err(error) => {
				error_log!("failed to encode history state: {}", error);
				JsValue::NULL
			}
		};
		if self
			.inner
			.history
			.replace_state_with_url(&js_state, "", Some(&url))
			.is_err()
		{
			warn_log!("replaceState rejected {}, falling back to a full load", url);
			let _ = self.inner.window.location().replace(&url);
			return;
		}
		self.inner.commit(NavAction::Replace, to, event);
	}

	fn go(&self, delta: i32) {
		// The movement is asynchronous: the update publishes when the
		// popstate event arrives.
		if delta == 0 {
			return;
		}
		if let Err(value) = self.inner.history.go_with_delta(delta) {
			error_log!("history.go({}) rejected: {:?}", delta, value);
		}
	}

	fn update_state(&self, state: Option<Value>) {
		{
			let mut current = self.inner.current.borrow_mut();
			current.state = state;
		}
		let current = self.inner.current.borrow().clone();
		self.inner.stamp(&EntryState {
			usr: current.state,
			key: current.key,
			idx: self.inner.depth.get(),
		});
	}

	fn listen(&self, listener: Listener) -> ListenerGuard {
		self.inner.listeners.add(listener)
	}

	fn block(&self, blocker: Blocker, options: BlockOptions) -> BlockerGuard {
		self.inner.blockers.block(blocker, options)
	}
}

impl Drop for BrowserHistory {
	fn drop(&mut self) {
		let _ = self.inner.window.remove_event_listener_with_callback(
			"popstate",
			self.popstate.as_ref().unchecked_ref(),
		);
	}
}

impl fmt::Debug for BrowserHistory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BrowserHistory")
			.field("location", &self.inner.current.borrow())
			.field("depth", &self.inner.depth.get())
			.finish_non_exhaustive()
	}
}
