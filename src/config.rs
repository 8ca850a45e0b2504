//! Backend location and route configuration.

// std
use std::env;
// self
use crate::{_prelude::*, error::ConfigError};

/// Environment variable consulted by [`ClientConfig::from_env`].
pub const BASE_URL_ENV: &str = "AKADONE_BASE_URL";
/// Backend used when [`BASE_URL_ENV`] is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// Route the navigator is sent to when a session expires.
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";

const API_PREFIX: &str = "api/v1/akadone";

/// Where the backend lives and where expired sessions are sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// Backend origin (plus optional path prefix); always ends with `/`.
	pub base_url: Url,
	/// View route passed to the navigator on session expiry.
	pub login_route: String,
}
impl ClientConfig {
	/// Builds a configuration for `base_url` with the default login route.
	pub fn new(base_url: impl AsRef<str>) -> Result<Self, ConfigError> {
		let raw = base_url.as_ref().trim();
		let mut base_url = Url::parse(raw).map_err(|source| ConfigError::InvalidBaseUrl {
			value: raw.to_owned(),
			source: Some(source),
		})?;

		if base_url.cannot_be_a_base() {
			return Err(ConfigError::InvalidBaseUrl { value: raw.to_owned(), source: None });
		}
		// `Url::join` drops the last segment unless the path ends with a slash.
		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());

			base_url.set_path(&path);
		}

		Ok(Self { base_url, login_route: DEFAULT_LOGIN_ROUTE.into() })
	}

	/// Reads [`BASE_URL_ENV`], falling back to [`DEFAULT_BASE_URL`] when unset or blank.
	pub fn from_env() -> Result<Self, ConfigError> {
		let value = env::var(BASE_URL_ENV)
			.ok()
			.filter(|value| !value.trim().is_empty())
			.unwrap_or_else(|| DEFAULT_BASE_URL.into());

		Self::new(value)
	}

	/// Overrides the login route.
	pub fn with_login_route(mut self, route: impl Into<String>) -> Self {
		self.login_route = route.into();

		self
	}

	/// Resolves `path` (relative to the API prefix) into an absolute URL.
	pub fn api_url(&self, path: &str) -> Result<Url, ConfigError> {
		self.join(&format!("{API_PREFIX}/{}", path.trim_start_matches('/')))
	}

	/// Resolves `reference` against the base URL; absolute URLs pass through unchanged.
	pub fn join(&self, reference: &str) -> Result<Url, ConfigError> {
		self.base_url
			.join(reference.trim_start_matches('/'))
			.map_err(|source| ConfigError::InvalidUrl { value: reference.to_owned(), source })
	}

	/// Login endpoint.
	pub fn login_url(&self) -> Result<Url, ConfigError> {
		self.api_url("auth/login")
	}
}
