//! Login and logout: the only operations that create or explicitly destroy a session.

// self
use crate::{
	_prelude::*,
	client::SessionClient,
	entity::ValidationError,
	http::{HttpRequest, HttpTransport, Method, RequestOptions},
	obs::{self, OperationKind, RequestOutcome, RequestSpan},
	session::Session,
};

/// Message used when the login endpoint rejects credentials without a `detail`.
pub const DEFAULT_LOGIN_FAILURE: &str = "Login failed. Please check your credentials.";

#[derive(Deserialize)]
struct LoginResponse {
	access_token: String,
	#[serde(default)]
	role: Option<String>,
}

/// Username + password pair submitted to the login form.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	/// Account name.
	pub username: String,
	/// Plain-text password; never printed by `Debug`.
	pub password: String,
}
impl Credentials {
	/// Bundles a username and password.
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self { username: username.into(), password: password.into() }
	}

	/// Both fields are required.
	pub fn validate(&self) -> Result<(), ValidationError> {
		if self.username.is_empty() {
			return Err(ValidationError::Required { field: "username" });
		}
		if self.password.is_empty() {
			return Err(ValidationError::Required { field: "password" });
		}

		Ok(())
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}

impl<T> SessionClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Exchanges credentials for a bearer token and persists the new session.
	///
	/// The login request itself is not guarded: a 401 here means bad credentials, not an
	/// expired session, so it is reported as [`Error::LoginRejected`] without redirecting.
	pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
		const KIND: OperationKind = OperationKind::Login;

		let span = RequestSpan::new(KIND, "login");

		obs::record_request_outcome(KIND, RequestOutcome::Attempt);

		let result = span
			.instrument(async move {
				credentials.validate()?;

				let url = self.config.login_url()?;
				let options = RequestOptions::new(Method::Post).form([
					("username", credentials.username.as_str()),
					("password", credentials.password.as_str()),
				]);
				let response = self.send(HttpRequest::from_options(url, options)?).await?;

				if !response.is_success() {
					return Err(Error::LoginRejected {
						status: response.status,
						detail: response
							.message_field(&["detail", "message"])
							.unwrap_or_else(|| DEFAULT_LOGIN_FAILURE.into()),
					});
				}

				let body: LoginResponse = response.json()?;
				let session = Session::new(body.access_token, body.role);

				self.store.save_session(&session)?;

				Ok(session)
			})
			.await;

		match &result {
			Ok(_) => obs::record_request_outcome(KIND, RequestOutcome::Response),
			Err(_) => obs::record_request_outcome(KIND, RequestOutcome::Failure),
		}

		result
	}

	/// Clears the session. Safe to call when already signed out.
	pub fn logout(&self) -> Result<()> {
		const KIND: OperationKind = OperationKind::Logout;

		obs::record_request_outcome(KIND, RequestOutcome::Attempt);

		let result = self.store.clear_session().map_err(Error::from);

		match &result {
			Ok(()) => obs::record_request_outcome(KIND, RequestOutcome::Response),
			Err(_) => obs::record_request_outcome(KIND, RequestOutcome::Failure),
		}

		result
	}

	/// Reads the current session from the store.
	pub fn session(&self) -> Result<Session> {
		Ok(self.store.load_session()?)
	}
}
