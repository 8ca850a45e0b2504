//! Transport primitives shared by the guarded client and the login exchange.
//!
//! The module exposes [`HttpTransport`] alongside the owned [`HttpRequest`] and
//! [`HttpResponse`] values it moves, so downstream crates can plug in their own HTTP stack
//! (or a fake for tests) without touching session handling. Responses are fully buffered:
//! callers inspect status and body after the transport returns.

// std
use std::borrow::Cow;
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::ConfigError};

/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing backend requests.
///
/// Implementations must be `Send + Sync + 'static` so one transport can be shared by every
/// client handle and resource, and the futures they return must be `Send` so requests can
/// hop executors. A transport reports only transport-level failures through
/// [`TransportError`](HttpTransport::TransportError); every HTTP status, including 401,
/// comes back as an [`HttpResponse`].
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Executes `request` and buffers the full response.
	fn send(&self, request: HttpRequest) -> TransportFuture<'_, Self::TransportError>;
}

/// HTTP methods used against the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
	/// `GET`
	#[default]
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `PATCH`
	Patch,
	/// `DELETE`
	Delete,
}
impl Method {
	/// Returns the method's wire name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
			Method::Put => "PUT",
			Method::Patch => "PATCH",
			Method::Delete => "DELETE",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Caller-supplied request options; every field is optional and defaults to a bare `GET`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
	/// HTTP method.
	pub method: Method,
	/// Headers in insertion order.
	pub headers: Vec<(String, String)>,
	/// Raw request body.
	pub body: Option<Vec<u8>>,
}
impl RequestOptions {
	/// Options for the provided method with no headers or body.
	pub fn new(method: Method) -> Self {
		Self { method, ..Default::default() }
	}

	/// Shorthand for a `GET` request.
	pub fn get() -> Self {
		Self::new(Method::Get)
	}

	/// Appends a header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Sets a raw body.
	pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
		self.body = Some(body.into());

		self
	}

	/// Serializes `value` as the JSON body and sets `Content-Type: application/json`.
	pub fn json<T>(self, value: &T) -> Result<Self, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		let body = serde_json::to_vec(value)?;

		Ok(self.header("Content-Type", "application/json").body(body))
	}

	/// Encodes `pairs` as an `application/x-www-form-urlencoded` body.
	pub fn form<'a, I>(self, pairs: I) -> Self
	where
		I: IntoIterator<Item = (&'a str, &'a str)>,
	{
		let body = url::form_urlencoded::Serializer::new(String::new()).extend_pairs(pairs).finish();

		self.header("Content-Type", "application/x-www-form-urlencoded").body(body)
	}
}

/// Fully resolved request handed to an [`HttpTransport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute target URL.
	pub url: Url,
	/// Headers in insertion order.
	pub headers: Vec<(String, String)>,
	/// Raw request body.
	pub body: Option<Vec<u8>>,
}
impl HttpRequest {
	/// Builds a request from caller options after validating every header.
	pub fn from_options(url: Url, options: RequestOptions) -> Result<Self, ConfigError> {
		for (name, value) in &options.headers {
			validate_header(name, value)?;
		}

		Ok(Self { method: options.method, url, headers: options.headers, body: options.body })
	}

	/// Returns the first header matching `name`, ignoring ASCII case.
	pub fn header(&self, name: &str) -> Option<&str> {
		find_header(&self.headers, name)
	}
}

/// Buffered HTTP response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HttpResponse {
	/// Status code.
	pub status: u16,
	/// Headers in the order the transport reported them.
	pub headers: Vec<(String, String)>,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Creates a response with the provided status and body and no headers.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers: Vec::new(), body: body.into() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Returns the first header matching `name`, ignoring ASCII case.
	pub fn header(&self, name: &str) -> Option<&str> {
		find_header(&self.headers, name)
	}

	/// Body decoded as UTF-8, replacing invalid sequences.
	pub fn text(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(&self.body)
	}

	/// Returns the first of `fields` holding a non-empty string in a JSON object body.
	///
	/// Error bodies are free-form, so anything that is not such an object yields `None`.
	pub fn message_field(&self, fields: &[&str]) -> Option<String> {
		let body: serde_json::Value = serde_json::from_slice(&self.body).ok()?;

		fields
			.iter()
			.filter_map(|field| body.get(field)?.as_str())
			.find(|message| !message.trim().is_empty())
			.map(ToOwned::to_owned)
	}

	/// Decodes the JSON body, reporting the failing path on error.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| Error::Decode { source, status: self.status })
	}
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
	headers.iter().find(|(key, _)| key.eq_ignore_ascii_case(name)).map(|(_, value)| value.as_str())
}

/// Rejects header names that are not RFC 9110 tokens and values carrying control characters.
fn validate_header(name: &str, value: &str) -> Result<(), ConfigError> {
	const SEPARATORS: &[u8] = b"()<>@,;:\\\"/[]?={} \t";

	let name_ok = !name.is_empty()
		&& name.bytes().all(|b| b.is_ascii_graphic() && !SEPARATORS.contains(&b));
	let value_ok = value.bytes().all(|b| b == b'\t' || (b >= 0x20 && b != 0x7f));

	if name_ok && value_ok {
		Ok(())
	} else {
		Err(ConfigError::InvalidHeader { name: name.to_owned() })
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	type TransportError = ReqwestError;

	fn send(&self, request: HttpRequest) -> TransportFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let method = match request.method {
				Method::Get => reqwest::Method::GET,
				Method::Post => reqwest::Method::POST,
				Method::Put => reqwest::Method::PUT,
				Method::Patch => reqwest::Method::PATCH,
				Method::Delete => reqwest::Method::DELETE,
			};
			let mut builder = client.request(method, request.url);

			for (name, value) in &request.headers {
				builder = builder.header(name.as_str(), value.as_str());
			}
			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let headers = response
				.headers()
				.iter()
				.filter_map(|(name, value)| {
					value.to_str().ok().map(|value| (name.as_str().to_owned(), value.to_owned()))
				})
				.collect();
			let body = response.bytes().await?.to_vec();

			Ok(HttpResponse { status, headers, body })
		})
	}
}
