//! # Magellan History
//!
//! Session-history tracking and navigation events for single-page
//! applications.
//!
//! The [`Navigation`] controller wraps a host session-history mechanism
//! behind the [`SessionHistory`] trait and turns its side-effecting
//! operations into an observable stream of [`NavigateEvent`]s. Every
//! entry the controller produces carries a position index in the host's
//! opaque state slot ([`EntryState`]); the signed difference between
//! indices is the event's `delta`, which is how the controller knows how
//! far a back/forward gesture travelled even though the host never says.
//!
//! Everything here is single-threaded and synchronous: events are
//! delivered inline to listeners in registration order, and the only
//! asynchronous edge is the host's own position-change signal for
//! gestures outside the controller's control.
//!
//! ## Example
//!
//! ```
//! use magellan_history::{NavigateAction, Navigation};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let nav = Navigation::in_memory();
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! let _unregister = nav.register(Rc::new(move |event| {
//! 	sink.borrow_mut().push((event.action, event.delta));
//! }));
//!
//! nav.push("/users/42");
//! nav.push("/users/42/posts");
//! nav.back();
//!
//! assert_eq!(
//! 	*seen.borrow(),
//! 	vec![
//! 		(NavigateAction::Push, 1),
//! 		(NavigateAction::Push, 1),
//! 		(NavigateAction::Pop, -1),
//! 	]
//! );
//! assert_eq!(nav.location().pathname, "/users/42");
//! ```

mod location;
mod navigation;
mod session;
mod state;

#[cfg(target_arch = "wasm32")]
mod browser;

pub use location::Location;
pub use navigation::{NavigateAction, NavigateEvent, NavigateListener, Navigation, Unlisten};
pub use session::{MemoryHistory, SessionHistory};
pub use state::EntryState;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserHistory;
