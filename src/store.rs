//! Session store contract and built-in store implementations.
//!
//! A [`SessionStore`] is a synchronous, process-wide key-value capability shared by every
//! component that issues requests. It is injected into the client instead of being reached
//! through a global, so tests and embedders decide where the session lives.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{
	_prelude::*,
	session::{ROLE_KEY, SESSION_KEYS, Session, SessionToken, TOKEN_KEY},
};

/// Key-value backend holding session data.
///
/// Implementations must tolerate concurrent callers: any request may read the token while
/// another clears it. [`remove`](SessionStore::remove) on a missing key succeeds.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Reads the value stored under `key`, if present.
	fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

	/// Stores `value` under `key`, replacing any previous value.
	fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

	/// Removes `key`; missing keys are not an error.
	fn remove(&self, key: &str) -> Result<(), StoreError>;
}
impl<'a> dyn SessionStore + 'a {
	/// Returns the stored bearer token.
	pub fn token(&self) -> Result<Option<SessionToken>, StoreError> {
		Ok(self.get(TOKEN_KEY)?.map(SessionToken::new))
	}

	/// Returns the stored role.
	pub fn role(&self) -> Result<Option<String>, StoreError> {
		self.get(ROLE_KEY)
	}

	/// Loads the whole session.
	pub fn load_session(&self) -> Result<Session, StoreError> {
		Ok(Session { token: self.token()?, role: self.role()? })
	}

	/// Persists `session`, removing keys whose value is absent.
	pub fn save_session(&self, session: &Session) -> Result<(), StoreError> {
		match &session.token {
			Some(token) => self.set(TOKEN_KEY, token.expose())?,
			None => self.remove(TOKEN_KEY)?,
		}
		match &session.role {
			Some(role) => self.set(ROLE_KEY, role)?,
			None => self.remove(ROLE_KEY)?,
		}

		Ok(())
	}

	/// Removes the token, role, and cached user data. Idempotent.
	///
	/// Every key is attempted even if an earlier removal fails; the first failure is returned.
	pub fn clear_session(&self) -> Result<(), StoreError> {
		let mut first_err = None;

		for key in SESSION_KEYS {
			if let Err(e) = self.remove(key) {
				first_err.get_or_insert(e);
			}
		}

		match first_err {
			Some(e) => Err(e),
			None => Ok(()),
		}
	}
}

/// Error type produced by [`SessionStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{error::Error, session::USER_KEY};

	struct ReadOnlyStore(MemoryStore);
	impl SessionStore for ReadOnlyStore {
		fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
			self.0.get(key)
		}

		fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
			Err(StoreError::Backend { message: "read-only".into() })
		}

		fn remove(&self, key: &str) -> Result<(), StoreError> {
			if key == TOKEN_KEY {
				return Err(StoreError::Backend { message: "token is pinned".into() });
			}

			self.0.remove(key)
		}
	}

	#[test]
	fn store_error_converts_into_client_error_with_source() {
		let store_error = StoreError::Backend { message: "disk full".into() };
		let client_error: Error = store_error.clone().into();

		assert!(matches!(client_error, Error::Storage(_)));
		assert!(client_error.to_string().contains("disk full"));

		let source = StdError::source(&client_error)
			.expect("Client error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn session_helpers_round_trip() {
		let backend = MemoryStore::default();
		let store: &dyn SessionStore = &backend;
		let session = Session::new("abc", Some("ROLE_ADMIN".into()));

		store.save_session(&session).expect("Saving a session should succeed.");

		assert_eq!(store.load_session().expect("Loading a session should succeed."), session);

		store.save_session(&Session::default()).expect("Saving an empty session should succeed.");

		assert_eq!(backend.get(TOKEN_KEY).expect("Token lookup should succeed."), None);
		assert_eq!(backend.get(ROLE_KEY).expect("Role lookup should succeed."), None);
	}

	#[test]
	fn clear_session_is_idempotent() {
		let backend = MemoryStore::default();
		let store: &dyn SessionStore = &backend;

		backend.set(TOKEN_KEY, "abc").expect("Seeding the token should succeed.");
		backend.set(USER_KEY, "{\"name\":\"ada\"}").expect("Seeding the user should succeed.");
		backend.set("theme", "dark").expect("Seeding an unrelated key should succeed.");

		store.clear_session().expect("First clear should succeed.");
		store.clear_session().expect("Second clear should succeed.");

		for key in SESSION_KEYS {
			assert_eq!(backend.get(key).expect("Lookup should succeed."), None);
		}

		assert_eq!(
			backend.get("theme").expect("Lookup should succeed."),
			Some("dark".into()),
			"Clearing the session must not touch unrelated keys."
		);
	}

	#[test]
	fn clear_session_attempts_every_key() {
		let inner = MemoryStore::default();

		inner.set(TOKEN_KEY, "abc").expect("Seeding the token should succeed.");
		inner.set(ROLE_KEY, "ROLE_ADMIN").expect("Seeding the role should succeed.");

		let pinned = ReadOnlyStore(inner.clone());
		let store: &dyn SessionStore = &pinned;
		let err = store.clear_session().expect_err("Pinned token removal should fail.");

		assert_eq!(err, StoreError::Backend { message: "token is pinned".into() });
		assert_eq!(inner.get(ROLE_KEY).expect("Lookup should succeed."), None);
		assert!(store.save_session(&Session::default()).is_err());
	}
}
