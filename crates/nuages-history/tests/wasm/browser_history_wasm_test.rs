//! Browser-backed history tests
//!
//! These run in a real browser through wasm-bindgen-test and drive the
//! native session history:
//! 1. Binding to and stamping the current entry
//! 2. Synchronous push/replace commits
//! 3. State persistence across bindings
//! 4. Asynchronous pops and cancelled-pop reverts

#![cfg(target_arch = "wasm32")]

use std::cell::RefCell;
use std::rc::Rc;

use nuages_history::{
	BlockOptions, Blocker, BrowserHistory, HistoryPort, HistoryUpdate, Listener, ListenerGuard,
	NavAction, parse_path,
};
use serde_json::json;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn window_pathname() -> String {
	web_sys::window().unwrap().location().pathname().unwrap()
}

type SeenUpdate = Rc<RefCell<Option<HistoryUpdate>>>;

/// A future resolving on the next published update, together with a slot
/// holding that update. The one-shot listener removes itself after firing.
fn next_update(history: &BrowserHistory) -> (JsFuture, SeenUpdate) {
	let seen: SeenUpdate = Rc::default();
	let guard_slot: Rc<RefCell<Option<ListenerGuard>>> = Rc::default();
	let promise = js_sys::Promise::new(&mut |resolve, _reject| {
		let guard = history.listen(Listener::new({
			let seen = Rc::clone(&seen);
			let guard_slot = Rc::clone(&guard_slot);
			move |update: &HistoryUpdate| {
				*seen.borrow_mut() = Some(update.clone());
				guard_slot.borrow_mut().take();
				let _ = resolve.call0(&JsValue::NULL);
			}
		}));
		*guard_slot.borrow_mut() = Some(guard);
	});
	(JsFuture::from(promise), seen)
}

/// Success Criterion 1: Binding adopts the entry the browser is showing
#[wasm_bindgen_test]
fn test_binds_to_the_current_entry() {
	let history = BrowserHistory::new().unwrap();
	assert_eq!(history.location().pathname, window_pathname());
}

/// Success Criterion 2: push commits synchronously and notifies
#[wasm_bindgen_test]
fn test_push_commits_synchronously_and_notifies() {
	let history = BrowserHistory::new().unwrap();
	let seen = Rc::new(RefCell::new(Vec::new()));
	let _guard = history.listen(Listener::new({
		let seen = Rc::clone(&seen);
		move |update: &HistoryUpdate| {
			seen.borrow_mut()
				.push((update.action, update.location.pathname.clone()));
		}
	}));

	history.push(&parse_path("/wasm/pushed?probe=1"), Some(json!({"probe": true})));
	assert_eq!(window_pathname(), "/wasm/pushed");
	assert_eq!(history.location().search, "?probe=1");
	assert_eq!(history.location().state, Some(json!({"probe": true})));
	assert_eq!(
		*seen.borrow(),
		vec![(NavAction::Push, "/wasm/pushed".to_string())]
	);
}

/// Success Criterion 2: replace swaps the current entry in place
#[wasm_bindgen_test]
fn test_replace_swaps_the_current_entry() {
	let history = BrowserHistory::new().unwrap();
	history.push(&parse_path("/wasm/original"), None);
	history.replace(&parse_path("/wasm/replacement"), None);
	assert_eq!(window_pathname(), "/wasm/replacement");
	assert_eq!(history.location().pathname, "/wasm/replacement");
}

/// Success Criterion 3: stamped state survives a fresh binding
#[wasm_bindgen_test]
fn test_update_state_persists_across_bindings() {
	let history = BrowserHistory::new().unwrap();
	history.push(&parse_path("/wasm/stateful"), None);
	history.update_state(Some(json!({"cursor": 7})));
	assert_eq!(history.location().state, Some(json!({"cursor": 7})));

	let key = history.location().key.clone();
	drop(history);
	let reborn = BrowserHistory::new().unwrap();
	assert_eq!(reborn.location().state, Some(json!({"cursor": 7})));
	assert_eq!(reborn.location().key, key);
}

/// Success Criterion 4: pops arrive asynchronously through popstate
#[wasm_bindgen_test]
async fn test_pop_travels_back_asynchronously() {
	let history = BrowserHistory::new().unwrap();
	history.push(&parse_path("/wasm/first"), None);
	history.push(&parse_path("/wasm/second"), None);

	let (fired, seen) = next_update(&history);
	history.back();
	fired.await.unwrap();

	let update = seen.borrow_mut().take().unwrap();
	assert_eq!(update.action, NavAction::Pop);
	assert_eq!(update.location.pathname, "/wasm/first");
	assert_eq!(history.location().pathname, "/wasm/first");
}

/// Success Criterion 4: a cancelled pop keeps the location and reports
/// the cancellation
#[wasm_bindgen_test]
async fn test_cancelled_pop_keeps_the_location() {
	let history = BrowserHistory::new().unwrap();
	history.push(&parse_path("/wasm/hold"), None);
	history.push(&parse_path("/wasm/here"), None);
	let _blocker = history.block(
		Blocker::new(|event, _| {
			event.set_cancelled(true);
			Ok(())
		}),
		BlockOptions::only(NavAction::Pop),
	);

	let (fired, seen) = next_update(&history);
	history.back();
	fired.await.unwrap();

	let update = seen.borrow_mut().take().unwrap();
	assert!(update.was_cancelled());
	assert_eq!(update.location.pathname, "/wasm/here");
	assert_eq!(history.location().pathname, "/wasm/here");
}
