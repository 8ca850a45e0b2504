//! Thread-safe in-memory [`SessionStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	store::{SessionStore, StoreError},
};

type StoreMap = Arc<RwLock<HashMap<String, String>>>;

/// Thread-safe storage backend that keeps session keys in-process.
///
/// Clones share the same map, so a handle kept by a test observes every mutation made
/// through the client.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Returns the number of stored keys.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when no keys are stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl SessionStore for MemoryStore {
	fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
		Ok(self.0.read().get(key).cloned())
	}

	fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
		self.0.write().insert(key.to_owned(), value.to_owned());

		Ok(())
	}

	fn remove(&self, key: &str) -> Result<(), StoreError> {
		self.0.write().remove(key);

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::thread;
	// self
	use super::*;
	use crate::session::TOKEN_KEY;

	#[test]
	fn clones_share_state() {
		let store = MemoryStore::default();
		let handle = store.clone();

		store.set(TOKEN_KEY, "abc").expect("Setting the token should succeed.");

		assert_eq!(handle.get(TOKEN_KEY).expect("Lookup should succeed."), Some("abc".into()));
		assert_eq!(handle.len(), 1);

		handle.remove(TOKEN_KEY).expect("Removing the token should succeed.");

		assert!(store.is_empty());
	}

	#[test]
	fn concurrent_removals_do_not_fail() {
		let store = MemoryStore::default();

		store.set(TOKEN_KEY, "abc").expect("Setting the token should succeed.");

		let workers = (0..8)
			.map(|_| {
				let store = store.clone();

				thread::spawn(move || store.remove(TOKEN_KEY))
			})
			.collect::<Vec<_>>();

		for worker in workers {
			worker
				.join()
				.expect("Worker thread should not panic.")
				.expect("Concurrent removal should succeed.");
		}

		assert!(store.is_empty());
	}
}
