//! The cooperative navigation blocking chain.
//!
//! Ports offer every [`NavEvent`] to a [`BlockerChain`] before committing
//! the transition. Blockers run in registration order, each one may cancel
//! the event, and a cancellation never short-circuits the walk: later
//! blockers still observe the event, and any cancellation wins.
//!
//! Registrations have explicit lifetimes. [`BlockerChain::block`] returns a
//! [`BlockerGuard`] that keeps the registration alive until it is released
//! or dropped, and every invocation additionally receives a
//! [`StopBlocking`] capability that releases that one registration from
//! inside the callback. The classic use is a confirmation dialog: the
//! blocker cancels the event, shows the dialog, and once the user confirms
//! it stops blocking so the caller can re-issue the navigation.
//!
//! ## Example
//!
//! ```ignore
//! let chain = BlockerChain::new();
//! let guard = chain.block(
//! 	Blocker::new(|event, stop| {
//! 		event.set_cancelled(true);
//! 		stop.stop();
//! 		Ok(())
//! 	}),
//! 	BlockOptions::only(NavAction::Pop),
//! );
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use thiserror::Error;

use crate::event::{NavAction, NavEvent};
use crate::{debug_log, error_log};

thread_local! {
	static NEXT_REGISTRATION_ID: Cell<u64> = const { Cell::new(1) };
}

fn next_registration_id() -> u64 {
	NEXT_REGISTRATION_ID.with(|counter| {
		let id = counter.get();
		counter.set(id + 1);
		id
	})
}

/// Selects which navigation kinds a blocker is invoked for.
///
/// A blocker whose options do not match an event's kind is skipped
/// entirely, not invoked-and-ignored, so callbacks with side effects never
/// fire for kinds they did not ask for. The default blocks all kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockOptions {
	/// Invoke for new entries.
	pub block_push: bool,
	/// Invoke for back/forward movement, keyboard navigation included.
	pub block_pop: bool,
	/// Invoke for in-place entry swaps.
	pub block_replace: bool,
}

impl Default for BlockOptions {
	fn default() -> Self {
		BlockOptions {
			block_push: true,
			block_pop: true,
			block_replace: true,
		}
	}
}

impl BlockOptions {
	/// Options matching exactly one navigation kind.
	pub fn only(kind: NavAction) -> Self {
		BlockOptions {
			block_push: kind == NavAction::Push,
			block_pop: kind == NavAction::Pop,
			block_replace: kind == NavAction::Replace,
		}
	}

	/// Whether a blocker with these options is invoked for `kind`.
	pub fn matches(&self, kind: NavAction) -> bool {
		match kind {
			NavAction::Push => self.block_push,
			NavAction::Pop => self.block_pop,
			NavAction::Replace => self.block_replace,
		}
	}
}

/// A failure returned by a blocker callback.
///
/// Faults are isolated: the chain logs them and keeps walking, so one
/// broken blocker never silences the others or corrupts the registration
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BlockerFault {
	message: String,
}

impl BlockerFault {
	/// Creates a fault with the given diagnostic message.
	pub fn new(message: impl Into<String>) -> Self {
		BlockerFault {
			message: message.into(),
		}
	}

	/// The diagnostic message.
	pub fn message(&self) -> &str {
		&self.message
	}
}

impl From<&str> for BlockerFault {
	fn from(message: &str) -> Self {
		BlockerFault::new(message)
	}
}

impl From<String> for BlockerFault {
	fn from(message: String) -> Self {
		BlockerFault::new(message)
	}
}

/// A cloneable blocker callback.
#[derive(Clone)]
pub struct Blocker {
	inner: Rc<dyn Fn(&NavEvent, &StopBlocking) -> Result<(), BlockerFault>>,
}

impl Blocker {
	/// Wraps a callback invoked with the event and a release capability.
	pub fn new(
		callback: impl Fn(&NavEvent, &StopBlocking) -> Result<(), BlockerFault> + 'static,
	) -> Self {
		Blocker {
			inner: Rc::new(callback),
		}
	}

	/// Invokes the callback.
	pub fn call(&self, event: &NavEvent, stop: &StopBlocking) -> Result<(), BlockerFault> {
		(self.inner)(event, stop)
	}
}

impl fmt::Debug for Blocker {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Blocker").finish_non_exhaustive()
	}
}

#[derive(Debug)]
struct Registration {
	id: u64,
	blocker: Blocker,
	options: BlockOptions,
}

type Registry = Rc<RefCell<Vec<Registration>>>;

fn remove_registration(registry: &Weak<RefCell<Vec<Registration>>>, id: u64) -> bool {
	let Some(registry) = registry.upgrade() else {
		return false;
	};
	let mut registrations = registry.borrow_mut();
	let before = registrations.len();
	registrations.retain(|registration| registration.id != id);
	registrations.len() != before
}

/// The ordered blocker registry walked for every navigation event.
///
/// Cloning the chain shares the underlying registry, so a port and its
/// callers can hold the same chain. All mutation is deterministic:
/// registrations append in call order and are removed by stable id.
#[derive(Debug, Clone, Default)]
pub struct BlockerChain {
	registry: Registry,
}

impl BlockerChain {
	/// Creates an empty chain.
	pub fn new() -> Self {
		BlockerChain::default()
	}

	/// Appends a blocker to the chain.
	///
	/// The registration lives until the returned guard is released or
	/// dropped, or until an invocation of the blocker calls its
	/// [`StopBlocking`] capability.
	#[must_use = "the blocker is released when the guard is dropped"]
	pub fn block(&self, blocker: Blocker, options: BlockOptions) -> BlockerGuard {
		let id = next_registration_id();
		self.registry.borrow_mut().push(Registration {
			id,
			blocker,
			options,
		});
		BlockerGuard {
			registry: Rc::downgrade(&self.registry),
			id,
		}
	}

	/// Offers an event to every matching blocker, in registration order.
	///
	/// The walk runs over a snapshot of the registrations taken when the
	/// event arrives, so releases performed by the callbacks affect future
	/// events, not the current walk. Cancellation does not stop the walk;
	/// the return value is the event's final cancellation flag. A callback
	/// returning an error is logged and the walk continues.
	pub fn offer(&self, event: &NavEvent) -> bool {
		let snapshot: Vec<(u64, Blocker, BlockOptions)> = self
			.registry
			.borrow()
			.iter()
			.map(|registration| {
				(
					registration.id,
					registration.blocker.clone(),
					registration.options,
				)
			})
			.collect();
		debug_log!(
			"offering {} event to {} registered blockers",
			event.kind(),
			snapshot.len()
		);
		for (id, blocker, options) in snapshot {
			if !options.matches(event.kind()) {
				continue;
			}
			let stop = StopBlocking {
				registry: Rc::downgrade(&self.registry),
				id,
			};
			if let Err(fault) = blocker.call(event, &stop) {
				error_log!("blocker {} failed on {} event: {}", id, event.kind(), fault);
			}
		}
		event.is_cancelled()
	}

	/// Number of live registrations.
	pub fn len(&self) -> usize {
		self.registry.borrow().len()
	}

	/// Whether the chain has no registrations.
	pub fn is_empty(&self) -> bool {
		self.registry.borrow().is_empty()
	}
}

/// Keeps one blocker registration alive; releasing is idempotent and also
/// happens on drop.
#[must_use = "the blocker is released when the guard is dropped"]
#[derive(Debug)]
pub struct BlockerGuard {
	registry: Weak<RefCell<Vec<Registration>>>,
	id: u64,
}

impl BlockerGuard {
	/// Removes the registration from the chain.
	pub fn release(&self) {
		remove_registration(&self.registry, self.id);
	}

	/// Whether the registration is still present in the chain.
	pub fn is_active(&self) -> bool {
		self.registry
			.upgrade()
			.is_some_and(|registry| {
				registry
					.borrow()
					.iter()
					.any(|registration| registration.id == self.id)
			})
	}
}

impl Drop for BlockerGuard {
	fn drop(&mut self) {
		self.release();
	}
}

/// Per-invocation capability releasing the registration it was issued for.
#[derive(Debug, Clone)]
pub struct StopBlocking {
	registry: Weak<RefCell<Vec<Registration>>>,
	id: u64,
}

impl StopBlocking {
	/// Releases the registration. Returns whether it was still registered.
	pub fn stop(&self) -> bool {
		remove_registration(&self.registry, self.id)
	}
}
