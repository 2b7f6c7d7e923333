//! Integration tests for the in-memory history backend
//!
//! These tests drive full navigation flows through the port contract:
//! 1. Push/replace/pop sequences and stack maintenance
//! 2. Listener subscription lifecycle
//! 3. Blocking, cancellation and the stop-blocking flow
//! 4. Entry state attachment and in-place updates

use std::cell::RefCell;
use std::rc::Rc;

use nuages_history::{
	BlockOptions, Blocker, HistoryPort, HistoryUpdate, Listener, ListenerGuard, MemoryHistory,
	NavAction, Path, parse_path,
};
use serde_json::json;

type Recorded = Rc<RefCell<Vec<(NavAction, String, bool)>>>;

fn record_updates(history: &MemoryHistory) -> (Recorded, ListenerGuard) {
	let recorded: Recorded = Rc::default();
	let guard = history.listen(Listener::new({
		let recorded = Rc::clone(&recorded);
		move |update: &HistoryUpdate| {
			recorded.borrow_mut().push((
				update.action,
				update.location.to_path_string(),
				update.was_cancelled(),
			));
		}
	}));
	(recorded, guard)
}

/// Success Criterion 1: A push/pop/replace journey keeps the stack and
/// the current location consistent
#[test]
fn test_navigation_journey() {
	let history = MemoryHistory::new();
	history.push(&parse_path("/users?page=1"), None);
	history.push(&parse_path("/users/42#profile"), None);
	assert_eq!(history.location().to_path_string(), "/users/42#profile");

	history.back();
	assert_eq!(history.location().to_path_string(), "/users?page=1");
	assert_eq!(history.action(), NavAction::Pop);

	history.replace(&parse_path("/users?page=2"), None);
	assert_eq!(history.location().to_path_string(), "/users?page=2");
	assert_eq!(history.len(), 3);

	history.forward();
	assert_eq!(history.location().to_path_string(), "/users/42#profile");
}

/// Success Criterion 1: Pushing after going back drops the forward branch
#[test]
fn test_push_drops_forward_entries() {
	let history = MemoryHistory::with_entries(["/", "/a", "/b", "/c"]);
	history.go(-3);
	assert_eq!(history.location().pathname, "/");

	history.push(&Path::from_pathname("/fresh"), None);
	assert_eq!(history.len(), 2);
	history.go(5);
	assert_eq!(history.location().pathname, "/fresh");
}

/// Success Criterion 1: go moves by whole deltas and clamps at the ends
#[test]
fn test_go_with_multi_entry_deltas() {
	let history = MemoryHistory::with_entries(["/", "/a", "/b", "/c"]);
	history.go(-2);
	assert_eq!(history.location().pathname, "/a");
	history.go(-5);
	assert_eq!(history.location().pathname, "/");
	history.go(2);
	assert_eq!(history.location().pathname, "/b");
}

/// Success Criterion 2: Listeners observe every committed transition in
/// order
#[test]
fn test_listener_sees_each_transition() {
	let history = MemoryHistory::new();
	let (recorded, _guard) = record_updates(&history);

	history.push(&parse_path("/a"), None);
	history.push(&parse_path("/b"), None);
	history.back();
	history.replace(&parse_path("/a2"), None);

	assert_eq!(
		*recorded.borrow(),
		vec![
			(NavAction::Push, "/a".to_string(), false),
			(NavAction::Push, "/b".to_string(), false),
			(NavAction::Pop, "/a".to_string(), false),
			(NavAction::Replace, "/a2".to_string(), false),
		]
	);
}

/// Success Criterion 2: Releasing the subscription stops delivery
#[test]
fn test_released_listener_stops_receiving() {
	let history = MemoryHistory::new();
	let (recorded, guard) = record_updates(&history);

	history.push(&parse_path("/seen"), None);
	guard.release();
	history.push(&parse_path("/unseen"), None);

	assert_eq!(recorded.borrow().len(), 1);
	assert_eq!(history.listener_count(), 0);
}

/// Success Criterion 3: A pop blocker cancels the back movement and the
/// published update reports the cancellation on the unchanged location
#[test]
fn test_cancelled_pop_republishes_unchanged_location() {
	let history = MemoryHistory::new();
	history.push(&parse_path("/editing"), None);
	let (recorded, _listener) = record_updates(&history);

	let _blocker = history.block(
		Blocker::new(|event, _| {
			event.set_cancelled(true);
			Ok(())
		}),
		BlockOptions::only(NavAction::Pop),
	);

	history.back();
	assert_eq!(history.location().pathname, "/editing");
	assert_eq!(history.index(), 1);
	assert_eq!(
		*recorded.borrow(),
		vec![(NavAction::Push, "/editing".to_string(), true)]
	);
}

/// Success Criterion 3: Kind filtering skips blockers instead of invoking
/// them with a pass
#[test]
fn test_pop_only_blocker_never_consulted_for_push_or_replace() {
	let history = MemoryHistory::new();
	let consulted = Rc::new(RefCell::new(0));
	let _blocker = history.block(
		Blocker::new({
			let consulted = Rc::clone(&consulted);
			move |_, _| {
				*consulted.borrow_mut() += 1;
				Ok(())
			}
		}),
		BlockOptions::only(NavAction::Pop),
	);

	history.push(&parse_path("/a"), None);
	history.replace(&parse_path("/b"), None);
	assert_eq!(*consulted.borrow(), 0);

	history.back();
	assert_eq!(*consulted.borrow(), 1);
}

/// Success Criterion 3: The confirm-then-reissue dialog flow
#[test]
fn test_confirm_then_reissue_flow() {
	let history = MemoryHistory::new();
	history.push(&parse_path("/form"), None);

	let pending: Rc<RefCell<Option<String>>> = Rc::default();
	let _guard = history.block(
		Blocker::new({
			let pending = Rc::clone(&pending);
			move |event, stop| {
				event.set_cancelled(true);
				*pending.borrow_mut() = Some(event.to().to_path_string());
				stop.stop();
				Ok(())
			}
		}),
		BlockOptions::default(),
	);

	history.push(&parse_path("/away?draft=discard"), None);
	assert_eq!(history.location().pathname, "/form");

	// The dialog confirmed; re-issue the recorded navigation.
	let target = pending.borrow_mut().take().unwrap();
	history.push(&parse_path(&target), None);
	assert_eq!(history.location().to_path_string(), "/away?draft=discard");
	assert_eq!(history.blocker_count(), 0);
}

/// Success Criterion 3: A failing blocker neither blocks the transition
/// nor silences the blockers after it
#[test]
fn test_blocker_fault_isolation_end_to_end() {
	let history = MemoryHistory::new();
	let _failing = history.block(
		Blocker::new(|_, _| Err("confirmation widget missing".into())),
		BlockOptions::default(),
	);

	history.push(&parse_path("/through"), None);
	assert_eq!(history.location().pathname, "/through");

	let _cancelling = history.block(
		Blocker::new(|event, _| {
			event.set_cancelled(true);
			Ok(())
		}),
		BlockOptions::default(),
	);
	history.push(&parse_path("/held"), None);
	assert_eq!(history.location().pathname, "/through");
}

/// Success Criterion 4: Pushed state rides along and pops back with the
/// entry
#[test]
fn test_entry_state_round_trip() {
	let history = MemoryHistory::new();
	history.push(&parse_path("/wizard/step-2"), Some(json!({"step": 2})));
	history.push(&parse_path("/wizard/step-3"), Some(json!({"step": 3})));

	history.back();
	assert_eq!(history.location().state, Some(json!({"step": 2})));
	assert_eq!(history.location().pathname, "/wizard/step-2");
}

/// Success Criterion 4: update_state rewrites the current entry silently
#[test]
fn test_update_state_keeps_entry_and_silence() {
	let history = MemoryHistory::new();
	history.push(&parse_path("/draft"), Some(json!({"dirty": false})));
	let key = history.location().key.clone();
	let (recorded, _guard) = record_updates(&history);

	history.update_state(Some(json!({"dirty": true})));
	assert!(recorded.borrow().is_empty());
	assert_eq!(history.location().key, key);
	assert_eq!(history.location().state, Some(json!({"dirty": true})));
}
