//! # Magellan Routes
//!
//! Hierarchical route matching for single-page applications.
//!
//! A pathname is resolved against a statically declared, nested tree of
//! [`Route`] nodes by an ordered, depth-first walk: siblings are tried in
//! declaration order and the first tree branch yielding any leaf match
//! wins. The result is a [`RouteMatch`] carrying the child-index trail
//! from the root to the matched leaf and the parameters bound by the
//! leaf's template.
//!
//! Matching is a pure, synchronous computation over an immutable tree;
//! there is no internal state and nothing is cached.
//!
//! ## Example
//!
//! ```
//! use magellan_routes::{Route, Routes};
//!
//! let routes = Routes::new(vec![
//! 	Route::group().with_children([
//! 		Route::index(),
//! 		Route::path("dashboard"),
//! 		Route::path("users/:user_id"),
//! 	]),
//! 	Route::path("*"),
//! ])
//! .unwrap();
//!
//! let matched = routes.match_path("/users/42").unwrap();
//! assert_eq!(matched.path, vec![0, 2]);
//! assert_eq!(matched.routename, "/users/:user_id");
//! assert_eq!(matched.params["user_id"], "42");
//!
//! // Unmatched pathnames fall through to the trailing catch-all.
//! let fallback = routes.match_path("/no/such/page").unwrap();
//! assert_eq!(fallback.path, vec![1]);
//! ```

mod matcher;
mod pattern;
mod route;

pub use matcher::{RouteMatch, match_route};
pub use pattern::{PathPattern, PatternError, WILDCARD_PARAM};
pub use route::{Route, RouteTreeError, Routes};
