//! Session history mechanisms.
//!
//! [`SessionHistory`] is the seam between the navigation controller and
//! the host environment's entry list. [`MemoryHistory`] implements the
//! contract in-process with browser entry-list semantics; the
//! wasm-only [`crate::BrowserHistory`] adapter wraps the real thing.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::location::Location;

/// Contract the navigation controller consumes from the host
/// session-history mechanism.
///
/// All operations are synchronous and infallible from the caller's point
/// of view: a move past the history boundary is silently ignored, never
/// an error, matching host history conventions.
pub trait SessionHistory {
	/// Snapshot of the current URL.
	fn location(&self) -> Location;

	/// Opaque state attached to the current entry, if any.
	fn state(&self) -> Option<Value>;

	/// Appends a new entry at `to`, carrying `state`. Entries after the
	/// current position are discarded.
	fn push(&self, state: Value, to: &str);

	/// Overwrites the current entry with `state` and `to` without
	/// creating a new back-navigable entry.
	fn replace(&self, state: Value, to: &str);

	/// Best-effort relative move within the entry list. Out-of-range
	/// deltas are silently ignored; `go(0)` is a no-op.
	fn go(&self, delta: i64);

	/// Subscribes `callback` to position changes caused outside the
	/// caller's own `push`/`replace`/`go` calls (e.g. a back/forward
	/// gesture), returning a function removing the subscription.
	///
	/// Implementations backed by foreign callbacks also remove the
	/// subscription when the returned function is dropped unused, so
	/// callers intending to keep it for the page lifetime must retain
	/// the function.
	fn on_pop(&self, callback: Rc<dyn Fn()>) -> Box<dyn FnOnce()>;
}

/// One entry in the in-memory session.
#[derive(Debug, Clone)]
struct Entry {
	location: Location,
	state: Option<Value>,
}

/// In-process session history with browser entry-list semantics.
///
/// Starts with a single entry at `/` carrying no state. `push` drops any
/// forward entries, `go` clamps silently at the boundaries, and an
/// applied move fires the pop signal before `go` returns (the in-memory
/// session has no asynchronous host to wait for).
pub struct MemoryHistory {
	entries: RefCell<Vec<Entry>>,
	position: Cell<usize>,
	pop_listeners: Rc<RefCell<Vec<Rc<dyn Fn()>>>>,
}

impl MemoryHistory {
	/// Creates a session with a single entry at `/`.
	pub fn new() -> Self {
		Self::with_initial("/")
	}

	/// Creates a session whose first entry sits at `to`.
	pub fn with_initial(to: &str) -> Self {
		Self {
			entries: RefCell::new(vec![Entry {
				location: Location::parse(to),
				state: None,
			}]),
			position: Cell::new(0),
			pop_listeners: Rc::new(RefCell::new(Vec::new())),
		}
	}

	/// Returns the number of entries currently in the session.
	pub fn entry_count(&self) -> usize {
		self.entries.borrow().len()
	}

	/// Returns the current position within the entry list.
	pub fn position(&self) -> usize {
		self.position.get()
	}
}

impl Default for MemoryHistory {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for MemoryHistory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MemoryHistory")
			.field("entries", &self.entries.borrow().len())
			.field("position", &self.position.get())
			.finish()
	}
}

impl SessionHistory for MemoryHistory {
	fn location(&self) -> Location {
		self.entries.borrow()[self.position.get()].location.clone()
	}

	fn state(&self) -> Option<Value> {
		self.entries.borrow()[self.position.get()].state.clone()
	}

	fn push(&self, state: Value, to: &str) {
		let mut entries = self.entries.borrow_mut();
		entries.truncate(self.position.get() + 1);
		entries.push(Entry {
			location: Location::parse(to),
			state: Some(state),
		});
		self.position.set(entries.len() - 1);
	}

	fn replace(&self, state: Value, to: &str) {
		self.entries.borrow_mut()[self.position.get()] = Entry {
			location: Location::parse(to),
			state: Some(state),
		};
	}

	fn go(&self, delta: i64) {
		if delta == 0 {
			return;
		}

		let target = self.position.get() as i64 + delta;
		if target < 0 || target >= self.entries.borrow().len() as i64 {
			// Out-of-range moves are silently ignored; no signal fires.
			return;
		}
		self.position.set(target as usize);

		let listeners: Vec<Rc<dyn Fn()>> = self.pop_listeners.borrow().clone();
		for listener in listeners {
			listener();
		}
	}

	fn on_pop(&self, callback: Rc<dyn Fn()>) -> Box<dyn FnOnce()> {
		self.pop_listeners.borrow_mut().push(Rc::clone(&callback));

		let listeners = Rc::clone(&self.pop_listeners);
		Box::new(move || {
			listeners.borrow_mut().retain(|l| !Rc::ptr_eq(l, &callback));
		})
	}
}
