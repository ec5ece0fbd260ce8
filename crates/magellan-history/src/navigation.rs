//! Navigation controller.
//!
//! [`Navigation`] is the single authoritative source of "what is the
//! current location" and "what just changed". It wraps a
//! [`SessionHistory`] mechanism that can also change underneath it (a
//! back/forward gesture) and publishes every change as a
//! [`NavigateEvent`] with a signed position delta.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::location::Location;
use crate::session::{MemoryHistory, SessionHistory};
use crate::state::EntryState;

/// The kind of history operation a navigation event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateAction {
	/// A new entry was appended.
	Push,
	/// The current entry was overwritten.
	Replace,
	/// The position moved within the existing entry list.
	Pop,
}

/// A navigation event, published once per navigation and delivered to
/// every registered listener synchronously, in registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigateEvent {
	/// The operation that produced this event.
	pub action: NavigateAction,
	/// URL snapshot taken after the operation applied.
	pub location: Location,
	/// Signed difference between the position index after the operation
	/// and the position index before it: `1` for a push, `0` for a
	/// replace, and the traversed distance for a pop.
	pub delta: i64,
}

/// A subscriber to navigation events, identified by pointer identity.
pub type NavigateListener = Rc<dyn Fn(&NavigateEvent)>;

/// Function returned from [`Navigation::listen`] and
/// [`Navigation::register`] that removes the subscription again.
pub type Unlisten = Box<dyn FnOnce()>;

struct Inner {
	history: Rc<dyn SessionHistory>,
	/// Position index of the current entry, as last observed by
	/// [`Navigation::notify`]. Only mutated there.
	idx: Cell<i64>,
	/// Registered listeners, in registration order, deduplicated by
	/// pointer identity.
	listeners: RefCell<Vec<NavigateListener>>,
}

/// The navigation controller.
///
/// Cheap to clone: clones share the same position index and listener
/// registry. The controller is single-threaded by design; construct one
/// per application (or per embedded router) and pass it to consumers.
#[derive(Clone)]
pub struct Navigation {
	inner: Rc<Inner>,
}

impl fmt::Debug for Navigation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Navigation")
			.field("idx", &self.inner.idx.get())
			.field("listeners", &self.inner.listeners.borrow().len())
			.finish()
	}
}

impl Navigation {
	/// Creates a controller over the given session history.
	///
	/// The position index is initialized from the current entry's stored
	/// state, defaulting to 0 when the entry carries none (or a foreign
	/// shape).
	pub fn new(history: Rc<dyn SessionHistory>) -> Self {
		let idx = EntryState::from_value(history.state().as_ref()).idx;

		Self {
			inner: Rc::new(Inner {
				history,
				idx: Cell::new(idx),
				listeners: RefCell::new(Vec::new()),
			}),
		}
	}

	/// Creates a controller over a fresh in-memory session starting at
	/// `/`.
	pub fn in_memory() -> Self {
		Self::new(Rc::new(MemoryHistory::new()))
	}

	/// Returns the latest location snapshot from the session history.
	pub fn location(&self) -> Location {
		self.inner.history.location()
	}

	/// Returns the position index recorded for the current entry.
	pub fn position(&self) -> i64 {
		self.inner.idx.get()
	}

	/// Appends a new entry at `to` and publishes a `Push` event.
	///
	/// The new entry carries a position index one greater than the entry
	/// it supersedes and is addressable by back-navigation afterwards.
	pub fn push(&self, to: &str) {
		let state = EntryState::new(self.inner.idx.get() + 1);
		tracing::debug!(to, idx = state.idx, "push entry");
		self.inner.history.push(state.to_value(), to);
		self.notify(NavigateAction::Push);
	}

	/// Overwrites the current entry with `to` and publishes a `Replace`
	/// event. The position index is unchanged and no new back-navigable
	/// entry is created.
	pub fn replace(&self, to: &str) {
		let state = EntryState::new(self.inner.idx.get());
		tracing::debug!(to, idx = state.idx, "replace entry");
		self.inner.history.replace(state.to_value(), to);
		self.notify(NavigateAction::Replace);
	}

	/// Moves `delta` steps within the entry list.
	///
	/// Publishes nothing itself: the move is asynchronous on real hosts
	/// and may be ignored entirely at a history boundary. The `Pop` event
	/// arrives through the position-change signal wired up by
	/// [`Navigation::register`], if and when the host applies the move.
	pub fn go(&self, delta: i64) {
		tracing::debug!(delta, "relative move");
		self.inner.history.go(delta);
	}

	/// Moves one entry back; sugar for `go(-1)`.
	pub fn back(&self) {
		self.go(-1);
	}

	/// Moves one entry forward; sugar for `go(1)`.
	pub fn forward(&self) {
		self.go(1);
	}

	/// Adds `listener` to the registry and returns a function removing
	/// it again.
	///
	/// Listeners are identified by pointer identity: registering the
	/// same `Rc` twice is a no-op, and each registered listener is
	/// invoked exactly once per event, in registration order. Removal is
	/// idempotent. A panic inside a listener is not contained and
	/// unwinds through the publishing navigation call.
	pub fn listen(&self, listener: NavigateListener) -> Unlisten {
		{
			let mut listeners = self.inner.listeners.borrow_mut();
			if !listeners.iter().any(|l| Rc::ptr_eq(l, &listener)) {
				listeners.push(Rc::clone(&listener));
			}
		}

		let inner = Rc::downgrade(&self.inner);
		Box::new(move || {
			if let Some(inner) = inner.upgrade() {
				inner
					.listeners
					.borrow_mut()
					.retain(|l| !Rc::ptr_eq(l, &listener));
			}
		})
	}

	/// Removes a listener previously added with [`Navigation::listen`].
	/// Removing a listener that is not registered is a no-op.
	pub fn unlisten(&self, listener: &NavigateListener) {
		self.inner
			.listeners
			.borrow_mut()
			.retain(|l| !Rc::ptr_eq(l, listener));
	}

	/// Composes [`Navigation::listen`] with a subscription to the host's
	/// external position-change signal, so back/forward gestures outside
	/// this controller's own calls publish `Pop` events.
	///
	/// Intended for the top-level controller owner; descendants use
	/// ad-hoc [`Navigation::listen`] calls. The returned function tears
	/// down both registrations; retain it for as long as the
	/// subscription should stay alive (see [`SessionHistory::on_pop`]).
	pub fn register(&self, listener: NavigateListener) -> Unlisten {
		let unlisten = self.listen(listener);

		let inner = Rc::downgrade(&self.inner);
		let unsubscribe = self.inner.history.on_pop(Rc::new(move || {
			if let Some(inner) = inner.upgrade() {
				Navigation { inner }.notify(NavigateAction::Pop);
			}
		}));

		Box::new(move || {
			unlisten();
			unsubscribe();
		})
	}

	/// Publishes an event for an operation that just applied.
	///
	/// Reads the location and position index as they are now, computes
	/// the delta against the stored index, delivers the event, and only
	/// then overwrites the stored index, so a listener calling back into
	/// the controller mid-notification still sees the pre-event index.
	fn notify(&self, action: NavigateAction) {
		let location = self.inner.history.location();
		let current = EntryState::from_value(self.inner.history.state().as_ref()).idx;
		let delta = current - self.inner.idx.get();
		let event = NavigateEvent {
			action,
			location,
			delta,
		};
		tracing::debug!(?action, delta, pathname = %event.location.pathname, "navigation event");

		// Deliver to a snapshot: listeners added mid-notification only
		// see future events, listeners removed mid-notification are
		// skipped.
		let snapshot: Vec<NavigateListener> = self.inner.listeners.borrow().clone();
		for listener in snapshot {
			let registered = self
				.inner
				.listeners
				.borrow()
				.iter()
				.any(|l| Rc::ptr_eq(l, &listener));
			if registered {
				listener(&event);
			}
		}

		self.inner.idx.set(current);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn recorder() -> (NavigateListener, Rc<RefCell<Vec<NavigateEvent>>>) {
		let events = Rc::new(RefCell::new(Vec::new()));
		let sink = Rc::clone(&events);
		let listener: NavigateListener = Rc::new(move |event: &NavigateEvent| {
			sink.borrow_mut().push(event.clone());
		});
		(listener, events)
	}

	#[test]
	fn test_push_and_replace_delta_accounting() {
		let nav = Navigation::in_memory();
		let (listener, events) = recorder();
		let _unlisten = nav.listen(listener);

		assert_eq!(nav.position(), 0);

		nav.push("/users/42");
		assert_eq!(nav.position(), 1);

		nav.replace("/users/42?tab=posts");
		assert_eq!(nav.position(), 1);

		let events = events.borrow();
		assert_eq!(events.len(), 2);

		assert_eq!(events[0].action, NavigateAction::Push);
		assert_eq!(events[0].delta, 1);
		assert_eq!(events[0].location.pathname, "/users/42");

		assert_eq!(events[1].action, NavigateAction::Replace);
		assert_eq!(events[1].delta, 0);
		assert_eq!(events[1].location.search, "?tab=posts");
	}

	#[test]
	fn test_listener_registered_twice_fires_once() {
		let nav = Navigation::in_memory();
		let (listener, events) = recorder();

		let _first = nav.listen(Rc::clone(&listener));
		let _second = nav.listen(listener);

		nav.push("/a");
		assert_eq!(events.borrow().len(), 1);
	}

	#[test]
	fn test_unlisten_stops_delivery() {
		let nav = Navigation::in_memory();
		let (listener, events) = recorder();

		let unlisten = nav.listen(listener);
		nav.push("/a");
		unlisten();
		nav.push("/b");

		assert_eq!(events.borrow().len(), 1);
	}

	#[test]
	fn test_unlisten_by_reference() {
		let nav = Navigation::in_memory();
		let (listener, events) = recorder();

		let _unlisten = nav.listen(Rc::clone(&listener));
		nav.unlisten(&listener);
		// Removing an already-removed listener is a no-op.
		nav.unlisten(&listener);

		nav.push("/a");
		assert!(events.borrow().is_empty());
	}

	#[test]
	fn test_listeners_fire_in_registration_order() {
		let nav = Navigation::in_memory();
		let order = Rc::new(RefCell::new(Vec::new()));

		for tag in ["first", "second", "third"] {
			let order = Rc::clone(&order);
			let _ = nav.listen(Rc::new(move |_: &NavigateEvent| {
				order.borrow_mut().push(tag);
			}));
		}

		nav.push("/a");
		assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
	}

	#[test]
	fn test_listener_removed_mid_notification_is_skipped() {
		let nav = Navigation::in_memory();
		let (second, second_events) = recorder();

		let remover = {
			let nav = nav.clone();
			let second = Rc::clone(&second);
			Rc::new(move |_: &NavigateEvent| {
				nav.unlisten(&second);
			}) as NavigateListener
		};

		let _a = nav.listen(remover);
		let _b = nav.listen(second);

		nav.push("/a");
		assert!(second_events.borrow().is_empty());
	}

	#[test]
	fn test_listener_added_mid_notification_sees_future_events_only() {
		let nav = Navigation::in_memory();
		let (late, late_events) = recorder();

		let adder = {
			let nav = nav.clone();
			let late = Rc::clone(&late);
			Rc::new(move |_: &NavigateEvent| {
				let _ = nav.listen(Rc::clone(&late));
			}) as NavigateListener
		};

		let _a = nav.listen(adder);

		nav.push("/a");
		assert!(late_events.borrow().is_empty());

		nav.push("/b");
		assert_eq!(late_events.borrow().len(), 1);
	}

	#[test]
	fn test_register_publishes_pop_with_traversed_delta() {
		let nav = Navigation::in_memory();
		let (listener, events) = recorder();
		let _unregister = nav.register(listener);

		nav.push("/a");
		nav.push("/b");
		nav.go(-2);

		let events = events.borrow();
		assert_eq!(events.len(), 3);
		assert_eq!(events[2].action, NavigateAction::Pop);
		assert_eq!(events[2].delta, -2);
		assert_eq!(events[2].location.pathname, "/");
		drop(events);

		assert_eq!(nav.position(), 0);
	}

	#[test]
	fn test_back_and_forward_sugar() {
		let nav = Navigation::in_memory();
		let (listener, events) = recorder();
		let _unregister = nav.register(listener);

		nav.push("/a");
		nav.back();
		nav.forward();

		let events = events.borrow();
		assert_eq!(events.len(), 3);
		assert_eq!(events[1].delta, -1);
		assert_eq!(events[2].delta, 1);
		assert_eq!(events[2].location.pathname, "/a");
	}

	#[test]
	fn test_out_of_range_go_publishes_nothing() {
		let nav = Navigation::in_memory();
		let (listener, events) = recorder();
		let _unregister = nav.register(listener);

		nav.back();
		nav.go(5);

		assert!(events.borrow().is_empty());
		assert_eq!(nav.position(), 0);
	}

	#[test]
	fn test_go_without_register_publishes_nothing() {
		// `listen` alone does not wire the external position-change
		// signal; only `register` does.
		let nav = Navigation::in_memory();
		let (listener, events) = recorder();
		let _unlisten = nav.listen(listener);

		nav.push("/a");
		nav.back();

		assert_eq!(events.borrow().len(), 1);
	}

	#[test]
	fn test_unregister_tears_down_pop_subscription() {
		let nav = Navigation::in_memory();
		let (listener, events) = recorder();
		let unregister = nav.register(listener);

		nav.push("/a");
		unregister();
		nav.back();

		assert_eq!(events.borrow().len(), 1);
	}

	#[test]
	fn test_reentrant_push_sees_pre_event_index() {
		let nav = Navigation::in_memory();
		let events = Rc::new(RefCell::new(Vec::new()));
		let reentered = Rc::new(Cell::new(false));

		let listener = {
			let nav = nav.clone();
			let events = Rc::clone(&events);
			let reentered = Rc::clone(&reentered);
			Rc::new(move |event: &NavigateEvent| {
				events.borrow_mut().push(event.clone());
				if !reentered.replace(true) {
					nav.push("/nested");
				}
			}) as NavigateListener
		};
		let _unlisten = nav.listen(listener);

		nav.push("/outer");

		// The nested push ran before the outer notification committed
		// its index, so both events are computed against index 0.
		let events = events.borrow();
		assert_eq!(events.len(), 2);
		assert_eq!(events[0].delta, 1);
		assert_eq!(events[1].delta, 1);
		assert_eq!(events[1].location.pathname, "/nested");
	}

	#[test]
	fn test_initial_index_read_from_existing_state() {
		let history = Rc::new(MemoryHistory::new());
		history.push(EntryState::new(4).to_value(), "/deep");

		let nav = Navigation::new(history);
		assert_eq!(nav.position(), 4);
	}
}
