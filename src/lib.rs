//! Session-guarded REST client for the akadone academic administration backend: bearer-token
//! injection, centralized session-expiry handling, and typed course/department/admin/lecturer
//! resources over one generic controller.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod entity;
pub mod error;
pub mod http;
pub mod navigate;
pub mod obs;
pub mod resource;
pub mod session;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::{ReqwestSessionClient, SessionClient},
		config::ClientConfig,
		http::ReqwestTransport,
		navigate::RecordingNavigator,
		session::TOKEN_KEY,
		store::{MemoryStore, SessionStore},
	};

	/// Builds a reqwest transport that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_transport() -> ReqwestTransport {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestTransport::with_client(client)
	}

	/// Constructs a [`SessionClient`] pointed at `base_url`, backed by an in-memory store that
	/// optionally holds `token`, plus a navigator that records redirects.
	pub fn build_reqwest_test_client(
		base_url: &str,
		token: Option<&str>,
	) -> (ReqwestSessionClient, MemoryStore, RecordingNavigator) {
		let store_backend = MemoryStore::default();

		if let Some(token) = token {
			store_backend.set(TOKEN_KEY, token).expect("Failed to seed the test session token.");
		}

		let store: Arc<dyn SessionStore> = Arc::new(store_backend.clone());
		let config = ClientConfig::new(base_url).expect("Failed to parse the mock server URL.");
		let client: ReqwestSessionClient =
			SessionClient::with_transport(store, config, test_reqwest_transport());

		(client, store_backend, RecordingNavigator::default())
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
