//! Session model: the bearer token and role persisted between requests.

// self
use crate::_prelude::*;

/// Store key holding the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Store key holding the signed-in user's role.
pub const ROLE_KEY: &str = "role";
/// Store key holding cached user data.
pub const USER_KEY: &str = "user";

/// Every key owned by a session; clearing the session removes all of them.
pub const SESSION_KEYS: [&str; 3] = [TOKEN_KEY, ROLE_KEY, USER_KEY];

/// Redacted bearer token wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken(String);
impl SessionToken {
	/// Wraps a new token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Formats the `Authorization` header value for this token.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.0)
	}
}
impl AsRef<str> for SessionToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for SessionToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SessionToken").field(&"<redacted>").finish()
	}
}
impl Display for SessionToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Authenticated-user context created by a successful login.
///
/// Both fields are optional because the store may hold a token without a role (or the
/// reverse) when another component wrote only part of the session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
	/// Bearer token, when signed in.
	pub token: Option<SessionToken>,
	/// Role reported by the backend at login (e.g. `ROLE_ADMIN`).
	pub role: Option<String>,
}
impl Session {
	/// Creates a session from a freshly issued token and role.
	pub fn new(token: impl Into<String>, role: Option<String>) -> Self {
		Self { token: Some(SessionToken::new(token)), role }
	}

	/// Returns `true` when a token is present.
	pub fn is_authenticated(&self) -> bool {
		self.token.is_some()
	}
}
