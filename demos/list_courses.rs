//! Demonstrates logging in against a mock backend, then paging through courses and filling a
//! lecturer select box with the same guarded client.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use akadone_client::{
	auth::Credentials,
	client::ReqwestSessionClient,
	config::ClientConfig,
	entity::Course,
	navigate::NavigateOptions,
	resource::{Combo, ListQuery},
	store::{MemoryStore, SessionStore},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let login_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/v1/akadone/auth/login");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"demo-token\",\"role\":\"ROLE_ADMIN\"}");
		})
		.await;
	let courses_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v1/akadone/admin/course/all")
				.header("authorization", "Bearer demo-token");
			then.status(200).header("content-type", "application/json").body(
				"{\"items\":[{\"_id\":\"c-1\",\"title\":\"Linear Algebra\",\"code\":\"MATH101\"},{\"_id\":\"c-2\",\"title\":\"Calculus\",\"code\":\"MATH102\"}],\"total\":12}",
			);
		})
		.await;
	let lecturers_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/v1/akadone/combo/user")
				.query_param("userType", "ROLE_LECTURER");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"items\":[{\"_id\":\"l-1\",\"fullname\":\"Ada Lovelace\"}],\"total\":1}");
		})
		.await;
	let store: Arc<dyn SessionStore> = Arc::new(MemoryStore::default());
	let client = ReqwestSessionClient::new(store, ClientConfig::new(server.base_url())?);
	let navigator = |path: &str, options: NavigateOptions| {
		println!("Navigate to {path} (replace: {}).", options.replace);
	};
	let session = client.login(&Credentials::new("admin", "admin")).await?;

	println!("Signed in with role {}.", session.role.as_deref().unwrap_or("unknown"));

	let query = ListQuery::for_entity::<Course>().sort("title");

	if let Some(page) = client.resource::<Course>().list(&query, &navigator).await?.into_response()
	{
		println!("Page {} of {}:", query.page, page.total_pages(query.size));

		for course in &page.items {
			println!("  {} {}", course.code, course.title);
		}
	}
	if let Some(options) = client.combo(Combo::Lecturer, "", &navigator).await?.into_response() {
		for option in &options.items {
			println!("Lecturer option {} => {}.", option.id, option.label());
		}
	}

	login_mock.assert_async().await;
	courses_mock.assert_async().await;
	lecturers_mock.assert_async().await;

	Ok(())
}
