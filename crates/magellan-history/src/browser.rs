//! Browser-backed session history.
//!
//! Wraps the DOM History API behind [`SessionHistory`]. The external
//! position-change signal is the `popstate` event, which the browser
//! fires for back/forward gestures (and for `history.go` moves once
//! they apply) but not for `pushState`/`replaceState` calls.

use std::rc::Rc;

use js_sys::JSON;
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;

use crate::location::Location;
use crate::navigation::Navigation;
use crate::session::SessionHistory;

/// Session adapter over the browser History API.
pub struct BrowserHistory {
	window: web_sys::Window,
	history: web_sys::History,
}

impl BrowserHistory {
	/// Binds to the current browsing context.
	///
	/// Returns `None` outside a window environment (e.g. in a worker).
	pub fn new() -> Option<Self> {
		let window = web_sys::window()?;
		let history = window.history().ok()?;
		Some(Self { window, history })
	}
}

/// Removes the `popstate` listener when dropped, so an unsubscribe
/// function that is dropped unused still detaches cleanly instead of
/// leaving the browser holding a dead callback.
struct PopSubscription {
	window: web_sys::Window,
	closure: Closure<dyn FnMut()>,
}

impl Drop for PopSubscription {
	fn drop(&mut self) {
		let _ = self
			.window
			.remove_event_listener_with_callback("popstate", self.closure.as_ref().unchecked_ref());
	}
}

impl SessionHistory for BrowserHistory {
	fn location(&self) -> Location {
		let location = self.window.location();
		Location {
			pathname: location.pathname().unwrap_or_default(),
			search: location.search().unwrap_or_default(),
			hash: location.hash().unwrap_or_default(),
		}
	}

	fn state(&self) -> Option<Value> {
		let state = self.history.state().ok()?;
		if state.is_null() || state.is_undefined() {
			return None;
		}
		let text = String::from(JSON::stringify(&state).ok()?);
		serde_json::from_str(&text).ok()
	}

	fn push(&self, state: Value, to: &str) {
		if let Err(error) = self.history.push_state_with_url(&to_js(&state), "", Some(to)) {
			tracing::warn!(?error, to, "pushState rejected");
		}
	}

	fn replace(&self, state: Value, to: &str) {
		if let Err(error) = self
			.history
			.replace_state_with_url(&to_js(&state), "", Some(to))
		{
			tracing::warn!(?error, to, "replaceState rejected");
		}
	}

	fn go(&self, delta: i64) {
		// Out-of-range moves are silently ignored by the host.
		let _ = self.history.go_with_delta(delta as i32);
	}

	fn on_pop(&self, callback: Rc<dyn Fn()>) -> Box<dyn FnOnce()> {
		let closure = Closure::<dyn FnMut()>::new(move || callback());

		if let Err(error) = self
			.window
			.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
		{
			tracing::warn!(?error, "failed to attach popstate listener");
		}

		let subscription = PopSubscription {
			window: self.window.clone(),
			closure,
		};
		Box::new(move || drop(subscription))
	}
}

/// Crosses the serde/JS boundary through JSON text; shapes that fail to
/// serialize degrade to `null`, which readers treat as absent state.
fn to_js(state: &Value) -> JsValue {
	serde_json::to_string(state)
		.ok()
		.and_then(|text| JSON::parse(&text).ok())
		.unwrap_or(JsValue::NULL)
}

impl Navigation {
	/// Creates a controller over the browser session history.
	///
	/// Returns `None` outside a window environment.
	pub fn browser() -> Option<Self> {
		BrowserHistory::new().map(|history| Self::new(Rc::new(history)))
	}
}
