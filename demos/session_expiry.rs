//! Demonstrates how an expired session is handled: the backend answers 401, the client clears
//! the stored session, and the caller's navigator receives a history-replacing redirect over a
//! channel.

// std
use std::sync::{Arc, mpsc};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use akadone_client::{
	client::{Outcome, ReqwestSessionClient},
	config::ClientConfig,
	http::RequestOptions,
	navigate::Navigation,
	session::{ROLE_KEY, TOKEN_KEY},
	store::{MemoryStore, SessionStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let expired_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/akadone/admin/department/all");
			then.status(401).body("{\"detail\":\"Token expired\"}");
		})
		.await;
	let backend = MemoryStore::default();

	backend.set(TOKEN_KEY, "stale-token")?;
	backend.set(ROLE_KEY, "ROLE_ADMIN")?;

	let store: Arc<dyn SessionStore> = Arc::new(backend.clone());
	let client = ReqwestSessionClient::new(store, ClientConfig::new(server.base_url())?);
	let (navigator, redirects) = mpsc::channel::<Navigation>();
	let outcome = client
		.fetch_with_auth("/api/v1/akadone/admin/department/all", RequestOptions::get(), &navigator)
		.await?;

	match outcome {
		Outcome::SessionExpired => {
			println!("Session expired; {} keys left in the store.", backend.len())
		},
		Outcome::Response(response) => println!("Unexpected HTTP {}.", response.status),
	}

	for redirect in redirects.try_iter() {
		println!("Redirected to {} (replace: {}).", redirect.path, redirect.options.replace);
	}

	expired_mock.assert_async().await;

	Ok(())
}
