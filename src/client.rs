//! Session-guarded HTTP client.
//!
//! [`SessionClient::fetch_with_auth`] is the single entry point every authenticated call goes
//! through. It reads the bearer token from the injected [`SessionStore`], attaches it to the
//! request, and handles session expiry uniformly: a 401 from any endpoint clears the session,
//! sends the caller's [`Navigator`] to the login route with history replacement, and resolves
//! to [`Outcome::SessionExpired`] instead of the response. Every other status is returned
//! untouched for the caller to interpret, and transport failures propagate as
//! [`Error::Transport`] with the transport's own error as the source.

// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	error::TransportError,
	http::{HttpRequest, HttpResponse, HttpTransport, RequestOptions},
	navigate::{NavigateOptions, Navigator},
	obs::{self, OperationKind, RequestOutcome, RequestSpan},
	session::SessionToken,
	store::SessionStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

/// Header carrying the bearer token.
pub const AUTHORIZATION: &str = "Authorization";
/// Status the backend uses to report an invalid session.
pub const UNAUTHORIZED: u16 = 401;

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestSessionClient = SessionClient<ReqwestTransport>;

/// Result of a guarded request that did not fail at the transport layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
	/// The backend answered with something other than 401.
	Response(T),
	/// The backend reported the session invalid. The session has been cleared and the
	/// navigator already sent to the login route; the caller should stop processing.
	SessionExpired,
}
impl<T> Outcome<T> {
	/// Returns `true` for [`Outcome::SessionExpired`].
	pub fn is_session_expired(&self) -> bool {
		matches!(self, Self::SessionExpired)
	}

	/// Returns the response, or `None` when the session expired.
	pub fn into_response(self) -> Option<T> {
		match self {
			Self::Response(value) => Some(value),
			Self::SessionExpired => None,
		}
	}

	/// Maps the response value, keeping the expiry sentinel.
	pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
		match self {
			Self::Response(value) => Outcome::Response(f(value)),
			Self::SessionExpired => Outcome::SessionExpired,
		}
	}

	/// Fallible variant of [`Outcome::map`].
	pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Outcome<U>, E> {
		match self {
			Self::Response(value) => f(value).map(Outcome::Response),
			Self::SessionExpired => Ok(Outcome::SessionExpired),
		}
	}
}

/// Issues backend requests with the current session's bearer token.
///
/// The client owns the transport, the session store handle, and the backend configuration.
/// Navigation is not owned: each call receives the caller's [`Navigator`] because only the
/// caller knows how to change views.
pub struct SessionClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Transport used for every outbound request.
	pub transport: Arc<T>,
	/// Shared session store; any component may read or clear it.
	pub store: Arc<dyn SessionStore>,
	/// Backend location and login route.
	pub config: ClientConfig,
}
impl<T> SessionClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(
		store: Arc<dyn SessionStore>,
		config: ClientConfig,
		transport: impl Into<Arc<T>>,
	) -> Self {
		Self { transport: transport.into(), store, config }
	}

	/// Performs `options` against `url` with the session's bearer token attached.
	///
	/// `url` may be absolute or relative to the configured base URL.
	///
	/// # Errors
	///
	/// - [`Error::Storage`] when the token cannot be read, or when clearing an expired session
	///   fails (the navigator has still been invoked in that case).
	/// - [`Error::Config`] when the URL or a header is invalid; nothing is sent.
	/// - [`Error::Transport`] when the transport fails; the store is left untouched.
	pub async fn fetch_with_auth(
		&self,
		url: &str,
		options: RequestOptions,
		navigator: &dyn Navigator,
	) -> Result<Outcome<HttpResponse>> {
		const KIND: OperationKind = OperationKind::Fetch;

		let span = RequestSpan::new(KIND, "fetch_with_auth");

		obs::record_request_outcome(KIND, RequestOutcome::Attempt);

		let result = span
			.instrument(async move {
				let url = self.config.join(url)?;

				self.send_guarded(url, options, navigator).await
			})
			.await;

		record_outcome(KIND, &result);

		result
	}

	/// Guarded send for an already resolved URL.
	pub(crate) async fn send_guarded(
		&self,
		url: Url,
		options: RequestOptions,
		navigator: &dyn Navigator,
	) -> Result<Outcome<HttpResponse>> {
		let token = self.store.token()?;
		let request = authorize(url, options, token.as_ref())?;
		let url = request.url.clone();
		let response = self.send(request).await?;

		if response.status == UNAUTHORIZED {
			self.expire_session(&url, navigator)?;

			return Ok(Outcome::SessionExpired);
		}

		Ok(Outcome::Response(response))
	}

	/// Sends without touching the session; used by the login exchange.
	pub(crate) async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
		let response = self.transport.send(request).await.map_err(TransportError::network)?;

		Ok(response)
	}

	fn expire_session(&self, url: &Url, navigator: &dyn Navigator) -> Result<()> {
		obs::session_expired_event(url, &self.config.login_route);

		let cleared = self.store.clear_session();

		if let Err(e) = &cleared {
			obs::session_clear_failed_event(e);
		}

		navigator.navigate(&self.config.login_route, NavigateOptions::REPLACE);

		cleared.map_err(Error::from)
	}
}
#[cfg(feature = "reqwest")]
impl SessionClient<ReqwestTransport> {
	/// Creates a client backed by a default reqwest transport.
	pub fn new(store: Arc<dyn SessionStore>, config: ClientConfig) -> Self {
		Self::with_transport(store, config, ReqwestTransport::default())
	}
}
impl<T> Clone for SessionClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: Arc::clone(&self.transport),
			store: Arc::clone(&self.store),
			config: self.config.clone(),
		}
	}
}
impl<T> Debug for SessionClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionClient").field("config", &self.config).finish()
	}
}

/// Records the terminal outcome of a guarded operation.
pub(crate) fn record_outcome<V>(kind: OperationKind, result: &Result<Outcome<V>>) {
	let outcome = match result {
		Ok(Outcome::Response(_)) => RequestOutcome::Response,
		Ok(Outcome::SessionExpired) => RequestOutcome::SessionExpired,
		Err(_) => RequestOutcome::Failure,
	};

	obs::record_request_outcome(kind, outcome);
}

/// Replaces any caller `Authorization` header with the session's bearer token.
///
/// Without a token the header is omitted entirely.
fn authorize(
	url: Url,
	mut options: RequestOptions,
	token: Option<&SessionToken>,
) -> Result<HttpRequest> {
	options.headers.retain(|(name, _)| !name.eq_ignore_ascii_case(AUTHORIZATION));

	if let Some(token) = token {
		options.headers.push((AUTHORIZATION.into(), token.bearer()));
	}

	HttpRequest::from_options(url, options).map_err(Error::from)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		error::ConfigError,
		http::{Method, TransportFuture},
		navigate::RecordingNavigator,
		session::{ROLE_KEY, TOKEN_KEY, USER_KEY},
		store::{MemoryStore, StoreError},
	};

	#[derive(Debug)]
	struct ConnectionRefused;
	impl Display for ConnectionRefused {
		fn fmt(&self, f: &mut Formatter) -> FmtResult {
			f.write_str("connection refused")
		}
	}
	impl StdError for ConnectionRefused {}

	/// Answers every request with a fixed status, or fails, and records what it was sent.
	#[derive(Default)]
	struct FakeTransport {
		status: Option<u16>,
		body: Vec<u8>,
		seen: Mutex<Vec<HttpRequest>>,
	}
	impl FakeTransport {
		fn answering(status: u16, body: &str) -> Self {
			Self { status: Some(status), body: body.as_bytes().to_vec(), ..Default::default() }
		}

		fn refusing() -> Self {
			Self::default()
		}

		fn seen(&self) -> Vec<HttpRequest> {
			self.seen.lock().clone()
		}
	}
	impl HttpTransport for FakeTransport {
		type TransportError = ConnectionRefused;

		fn send(&self, request: HttpRequest) -> TransportFuture<'_, Self::TransportError> {
			self.seen.lock().push(request);

			let response = self.status.map(|status| HttpResponse::new(status, self.body.clone()));

			Box::pin(async move { response.ok_or(ConnectionRefused) })
		}
	}

	struct BrokenStore;
	impl SessionStore for BrokenStore {
		fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
			Ok(Some("abc".into()))
		}

		fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
			Err(StoreError::Backend { message: "store offline".into() })
		}

		fn remove(&self, _key: &str) -> Result<(), StoreError> {
			Err(StoreError::Backend { message: "store offline".into() })
		}
	}

	fn client_with(
		transport: FakeTransport,
		token: Option<&str>,
	) -> (SessionClient<FakeTransport>, MemoryStore, Arc<FakeTransport>) {
		let backend = MemoryStore::default();

		if let Some(token) = token {
			backend.set(TOKEN_KEY, token).expect("Seeding the token should succeed.");
		}

		backend.set(ROLE_KEY, "ROLE_ADMIN").expect("Seeding the role should succeed.");
		backend.set(USER_KEY, "{\"fullname\":\"Ada\"}").expect("Seeding the user should succeed.");

		let transport = Arc::new(transport);
		let config = ClientConfig::new("http://localhost:8000").expect("Base URL should parse.");
		let client: SessionClient<FakeTransport> = SessionClient::with_transport(
			Arc::new(backend.clone()),
			config,
			Arc::clone(&transport),
		);

		(client, backend, transport)
	}

	#[tokio::test]
	async fn bearer_token_replaces_caller_authorization() {
		let (client, _store, transport) =
			client_with(FakeTransport::answering(200, "{}"), Some("abc"));
		let navigator = RecordingNavigator::default();
		let options = RequestOptions::new(Method::Post)
			.header("authorization", "Bearer stale")
			.header("X-Request-Id", "42")
			.body("{}");
		let outcome = client
			.fetch_with_auth("/api/v1/akadone/admin/course/create", options, &navigator)
			.await
			.expect("Guarded request should succeed.");

		assert!(!outcome.is_session_expired());

		let seen = transport.seen();
		let request = seen.first().expect("Transport should receive exactly one request.");

		assert_eq!(seen.len(), 1);
		assert_eq!(request.method, Method::Post);
		assert_eq!(
			request.url.as_str(),
			"http://localhost:8000/api/v1/akadone/admin/course/create"
		);
		assert_eq!(request.header("Authorization"), Some("Bearer abc"));
		assert_eq!(
			request
				.headers
				.iter()
				.filter(|(name, _)| name.eq_ignore_ascii_case("authorization"))
				.count(),
			1,
			"Caller authorization headers must be replaced, not duplicated."
		);
		assert_eq!(request.header("x-request-id"), Some("42"));
		assert_eq!(request.body.as_deref(), Some(&b"{}"[..]));
		assert_eq!(navigator.count(), 0);
	}

	#[tokio::test]
	async fn missing_token_omits_authorization() {
		let (client, _store, transport) = client_with(FakeTransport::answering(200, "{}"), None);
		let navigator = RecordingNavigator::default();
		let options = RequestOptions::get().header("Authorization", "Bearer forged");

		client
			.fetch_with_auth("/items", options, &navigator)
			.await
			.expect("Guarded request should succeed without a token.");

		let seen = transport.seen();

		assert_eq!(seen[0].header("authorization"), None);
	}

	#[tokio::test]
	async fn unauthorized_clears_session_and_redirects_once() {
		let (client, store, _transport) =
			client_with(FakeTransport::answering(401, "{\"detail\":\"expired\"}"), Some("abc"));
		let navigator = RecordingNavigator::default();
		let outcome = client
			.fetch_with_auth("/items", RequestOptions::get(), &navigator)
			.await
			.expect("A 401 must not surface as an error.");

		assert_eq!(outcome, Outcome::SessionExpired);
		assert!(store.is_empty(), "Token, role, and user must all be removed.");
		assert_eq!(
			navigator.history(),
			vec![crate::navigate::Navigation {
				path: "/login".into(),
				options: NavigateOptions { replace: true },
			}]
		);
	}

	#[tokio::test]
	async fn other_statuses_pass_through_untouched() {
		for status in [200, 204, 400, 403, 404, 500] {
			let body = format!("{{\"message\":\"status {status}\"}}");
			let (client, store, _transport) =
				client_with(FakeTransport::answering(status, &body), Some("abc"));
			let navigator = RecordingNavigator::default();
			let outcome = client
				.fetch_with_auth("/items", RequestOptions::get(), &navigator)
				.await
				.expect("Non-401 statuses must not error.");
			let response =
				outcome.into_response().expect("Non-401 statuses must return the response.");

			assert_eq!(response, HttpResponse::new(status, body.into_bytes()));
			assert_eq!(store.len(), 3, "The session store must not be mutated for HTTP {status}.");
			assert_eq!(navigator.count(), 0);
		}
	}

	#[tokio::test]
	async fn transport_failure_propagates_original_error() {
		let (client, store, _transport) = client_with(FakeTransport::refusing(), Some("abc"));
		let navigator = RecordingNavigator::default();
		let err = client
			.fetch_with_auth("/items", RequestOptions::get(), &navigator)
			.await
			.expect_err("Transport failures must propagate.");

		match &err {
			Error::Transport(TransportError::Network { source }) => {
				assert!(source.downcast_ref::<ConnectionRefused>().is_some());
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}

		assert_eq!(store.get(TOKEN_KEY).expect("Lookup should succeed."), Some("abc".into()));
		assert_eq!(store.len(), 3);
		assert_eq!(navigator.count(), 0);
	}

	#[tokio::test]
	async fn concurrent_unauthorized_requests_both_redirect() {
		let (client, store, transport) =
			client_with(FakeTransport::answering(401, ""), Some("abc"));
		let navigator = RecordingNavigator::default();
		let (first, second) = tokio::join!(
			client.fetch_with_auth("/api/v1/akadone/admin/course/all", RequestOptions::get(), &navigator),
			client.fetch_with_auth("/api/v1/akadone/combo/course", RequestOptions::get(), &navigator),
		);

		assert!(first.expect("First 401 must not error.").is_session_expired());
		assert!(second.expect("Second 401 must not error.").is_session_expired());
		assert_eq!(transport.seen().len(), 2);
		assert_eq!(navigator.count(), 2);
		assert!(navigator.history().iter().all(|nav| nav.path == "/login" && nav.options.replace));
		assert!(store.is_empty());
	}

	#[tokio::test]
	async fn failed_clear_still_redirects() {
		let transport = Arc::new(FakeTransport::answering(401, ""));
		let config = ClientConfig::new("http://localhost:8000")
			.expect("Base URL should parse.")
			.with_login_route("/signin");
		let client: SessionClient<FakeTransport> =
			SessionClient::with_transport(Arc::new(BrokenStore), config, transport);
		let navigator = RecordingNavigator::default();
		let err = client
			.fetch_with_auth("/items", RequestOptions::get(), &navigator)
			.await
			.expect_err("Clear failures must be reported.");

		assert!(matches!(err, Error::Storage(StoreError::Backend { .. })));
		assert_eq!(navigator.history()[0].path, "/signin");
	}

	#[tokio::test]
	async fn invalid_headers_are_not_sent() {
		let (client, store, transport) =
			client_with(FakeTransport::answering(200, ""), Some("abc"));
		let navigator = RecordingNavigator::default();
		let err = client
			.fetch_with_auth("/items", RequestOptions::get().header("Bad Header", "x"), &navigator)
			.await
			.expect_err("Invalid headers must be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidHeader { .. })));
		assert!(transport.seen().is_empty());
		assert_eq!(store.len(), 3);
	}

	#[test]
	fn outcome_helpers_preserve_sentinel() {
		let expired: Outcome<u16> = Outcome::SessionExpired;

		assert_eq!(expired.clone().map(|status| status + 1), Outcome::SessionExpired);
		assert_eq!(expired.into_response(), None);
		assert_eq!(Outcome::Response(200).map(|status| status + 1), Outcome::Response(201));
		assert_eq!(
			Outcome::Response("7").try_map(|raw| raw.parse::<u8>()),
			Ok(Outcome::Response(7))
		);
	}

	#[cfg(feature = "reqwest")]
	#[tokio::test]
	async fn reqwest_transport_sends_bearer_over_the_wire() {
		// crates.io
		use httpmock::prelude::*;
		// self
		use crate::_preludet::build_reqwest_test_client;

		let server = MockServer::start_async().await;
		let mock = server
			.mock_async(|when, then| {
				when.method(GET).path("/items").header("authorization", "Bearer abc");
				then.status(200)
					.header("content-type", "application/json")
					.body("{\"items\":[],\"total\":0}");
			})
			.await;
		let (client, store, navigator) = build_reqwest_test_client(&server.base_url(), Some("abc"));
		let response = client
			.fetch_with_auth("/items", RequestOptions::get(), &navigator)
			.await
			.expect("Guarded request should reach the mock server.")
			.into_response()
			.expect("A 200 must return the response.");

		mock.assert_async().await;

		assert_eq!(response.status, 200);
		assert_eq!(response.header("Content-Type"), Some("application/json"));
		assert_eq!(response.text(), "{\"items\":[],\"total\":0}");
		assert_eq!(store.len(), 1);
		assert_eq!(navigator.count(), 0);
	}
}
