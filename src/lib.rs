//! # Magellan
//!
//! A client-side navigation layer for single-page applications.
//!
//! Magellan pairs two small, single-threaded building blocks:
//!
//! - [`history`]: the navigation controller. It wraps the host
//!   session-history mechanism behind the [`SessionHistory`] trait and
//!   turns its side-effecting operations into an observable stream of
//!   [`NavigateEvent`]s with position-delta tracking.
//! - [`routes`]: the hierarchical route matcher. A pure, depth-first,
//!   declaration-order walk of an immutable [`Route`] tree that resolves a
//!   pathname to a traversal path and extracted parameters.
//!
//! View rendering is deliberately out of scope: a composition layer
//! subscribes to the controller, re-runs the matcher on every event, and
//! uses [`RouteMatch::path`] to pick which child to render at each nesting
//! level.
//!
//! ## Example
//!
//! ```
//! use magellan::{Navigation, Route, Routes};
//!
//! let routes = Routes::new(vec![
//! 	Route::group().with_children([
//! 		Route::index(),
//! 		Route::path("users/:user_id"),
//! 		Route::path("files/*"),
//! 	]),
//! 	Route::path("*"),
//! ])
//! .unwrap();
//!
//! let nav = Navigation::in_memory();
//! nav.push("/users/42");
//!
//! let matched = routes.match_path(&nav.location().pathname).unwrap();
//! assert_eq!(matched.path, vec![0, 1]);
//! assert_eq!(matched.params["user_id"], "42");
//! ```

pub use magellan_history as history;
pub use magellan_routes as routes;

pub use magellan_history::{
	EntryState, Location, MemoryHistory, NavigateAction, NavigateEvent, NavigateListener,
	Navigation, SessionHistory,
};
pub use magellan_routes::{
	PathPattern, PatternError, Route, RouteMatch, RouteTreeError, Routes, match_route,
};

#[cfg(target_arch = "wasm32")]
pub use magellan_history::BrowserHistory;
