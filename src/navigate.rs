//! Navigation capability injected by callers.
//!
//! The client never owns navigation policy. When a request observes an expired session it asks
//! the caller-supplied [`Navigator`] to replace the current view with the login route. Callers
//! may see redundant redirects when several in-flight requests expire together, so navigators
//! should treat a replace to the current route as a no-op.

// std
use std::sync::mpsc::Sender;
// self
use crate::_prelude::*;

/// Options accompanying a navigation request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NavigateOptions {
	/// Replace the current history entry instead of pushing a new one.
	pub replace: bool,
}
impl NavigateOptions {
	/// History-replacing navigation.
	pub const REPLACE: Self = Self { replace: true };
}

/// Owned record of a navigation request, used by channel-based navigators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
	/// Target route.
	pub path: String,
	/// Options supplied with the request.
	pub options: NavigateOptions,
}

/// Redirect callback supplied by the caller.
pub trait Navigator
where
	Self: Send + Sync,
{
	/// Navigates to `path`.
	fn navigate(&self, path: &str, options: NavigateOptions);
}
impl<F> Navigator for F
where
	F: Send + Sync + Fn(&str, NavigateOptions),
{
	fn navigate(&self, path: &str, options: NavigateOptions) {
		self(path, options)
	}
}
impl Navigator for Sender<Navigation> {
	fn navigate(&self, path: &str, options: NavigateOptions) {
		// A dropped receiver means nobody is listening anymore, which is not the client's concern.
		let _ = self.send(Navigation { path: path.to_owned(), options });
	}
}

/// Navigator that records every request, for tests and headless callers.
#[derive(Clone, Debug, Default)]
pub struct RecordingNavigator(Arc<Mutex<Vec<Navigation>>>);
impl RecordingNavigator {
	/// Returns a snapshot of the recorded navigations.
	pub fn history(&self) -> Vec<Navigation> {
		self.0.lock().clone()
	}

	/// Number of recorded navigations.
	pub fn count(&self) -> usize {
		self.0.lock().len()
	}
}
impl Navigator for RecordingNavigator {
	fn navigate(&self, path: &str, options: NavigateOptions) {
		self.0.lock().push(Navigation { path: path.to_owned(), options });
	}
}
