//! Generic list/create/update/delete controller over [`Entity`] descriptors.
//!
//! Every call goes through the guarded client, so an expired session surfaces as
//! [`Outcome::SessionExpired`] from any of these operations. Non-success statuses are turned
//! into [`Error::Api`] carrying the backend's `message` (or `detail`) field.

// std
use std::marker::PhantomData;
// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	client::{self, Outcome, SessionClient},
	entity::{Entity, FormMode},
	error::ConfigError,
	http::{HttpResponse, HttpTransport, Method, RequestOptions},
	navigate::Navigator,
	obs::{self, OperationKind, RequestOutcome, RequestSpan},
};

/// Default page size for list queries.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Sort direction for list queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
	/// Ascending.
	#[default]
	Asc,
	/// Descending.
	Desc,
}
impl SortOrder {
	/// Returns the query-string value.
	pub const fn as_str(self) -> &'static str {
		match self {
			SortOrder::Asc => "asc",
			SortOrder::Desc => "desc",
		}
	}

	/// Flips the direction, as when a column header is clicked twice.
	pub const fn toggle(self) -> Self {
		match self {
			SortOrder::Asc => SortOrder::Desc,
			SortOrder::Desc => SortOrder::Asc,
		}
	}
}
impl Display for SortOrder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Pagination, sorting, and search parameters for a list request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
	/// 1-based page number.
	pub page: u32,
	/// Items per page.
	pub size: u32,
	/// Column to sort by.
	pub sort_by: String,
	/// Sort direction.
	pub order: SortOrder,
	/// Free-text filter applied to the entity's search parameter.
	pub search: String,
}
impl ListQuery {
	/// First page sorted by `E`'s default column.
	pub fn for_entity<E>() -> Self
	where
		E: Entity,
	{
		Self { sort_by: E::DEFAULT_SORT.into(), ..Default::default() }
	}

	/// Moves to `page`, clamped to at least 1.
	pub fn with_page(mut self, page: u32) -> Self {
		self.page = page.max(1);

		self
	}

	/// Sets the page size.
	pub fn with_size(mut self, size: u32) -> Self {
		self.size = size;

		self
	}

	/// Sets the search filter.
	pub fn with_search(mut self, search: impl Into<String>) -> Self {
		self.search = search.into();

		self
	}

	/// Sorts by `column`; sorting again by the current column toggles the direction instead.
	pub fn sort(mut self, column: &str) -> Self {
		if self.sort_by == column {
			self.order = self.order.toggle();
		} else {
			self.sort_by = column.to_owned();
			self.order = SortOrder::Asc;
		}

		self
	}
}
impl Default for ListQuery {
	fn default() -> Self {
		Self {
			page: 1,
			size: DEFAULT_PAGE_SIZE,
			sort_by: "name".into(),
			order: SortOrder::Asc,
			search: String::new(),
		}
	}
}

/// One page of list results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
	/// Items on this page.
	#[serde(default = "Vec::new")]
	pub items: Vec<T>,
	/// Total number of matching items across all pages.
	#[serde(default)]
	pub total: u64,
}
impl<T> Page<T> {
	/// Number of pages needed for [`total`](Page::total) items at `size` per page.
	pub fn total_pages(&self, size: u32) -> u64 {
		if size == 0 { 0 } else { self.total.div_ceil(u64::from(size)) }
	}
}

/// Combo-box lookups used to fill select inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Combo {
	/// Courses, e.g. for prerequisites.
	Course,
	/// Departments.
	Department,
	/// Users with the lecturer role.
	Lecturer,
}
impl Combo {
	fn path(self) -> &'static str {
		match self {
			Combo::Course => "combo/course",
			Combo::Department => "combo/department",
			Combo::Lecturer => "combo/user",
		}
	}
}

/// Option entry returned by a combo lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComboItem {
	/// Backend identifier used as the option value.
	#[serde(rename = "_id")]
	pub id: String,
	/// Course title.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	/// Department name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// User display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub fullname: Option<String>,
}
impl ComboItem {
	/// Display label: the title, name, or full name, falling back to the identifier.
	pub fn label(&self) -> &str {
		self.title
			.as_deref()
			.or(self.name.as_deref())
			.or(self.fullname.as_deref())
			.unwrap_or(&self.id)
	}
}

/// Typed CRUD handle for one entity kind.
pub struct Resource<'c, T, E>
where
	T: ?Sized + HttpTransport,
{
	client: &'c SessionClient<T>,
	entity: PhantomData<fn() -> E>,
}
impl<T, E> Resource<'_, T, E>
where
	T: ?Sized + HttpTransport,
	E: Entity,
{
	/// Fetches one page of entities.
	pub async fn list(
		&self,
		query: &ListQuery,
		navigator: &dyn Navigator,
	) -> Result<Outcome<Page<E>>> {
		let mut url = self.client.config.api_url(&format!("admin/{}/all", E::PATH))?;

		url.query_pairs_mut()
			.append_pair("page", &query.page.to_string())
			.append_pair("size", &query.size.to_string())
			.append_pair("sortby", &query.sort_by)
			.append_pair("order", query.order.as_str())
			.append_pair(E::SEARCH_PARAM, &query.search);

		let outcome = self
			.client
			.execute(OperationKind::List, url, RequestOptions::get(), navigator, || {
				format!("Failed to fetch {}s", E::LABEL)
			})
			.await?;

		outcome.try_map(|response| response.json())
	}

	/// Creates `entity` after validating its required fields.
	pub async fn create(&self, entity: &E, navigator: &dyn Navigator) -> Result<Outcome<Value>> {
		entity.validate(FormMode::Create)?;

		let url = self.client.config.api_url(&format!("admin/{}/create", E::PATH))?;
		let options = RequestOptions::new(Method::Post).json(entity)?;
		let outcome = self
			.client
			.execute(OperationKind::Create, url, options, navigator, || {
				format!("Failed to create {}", E::LABEL)
			})
			.await?;

		outcome.try_map(|response| body_value(&response))
	}

	/// Replaces the entity identified by `id` after validating its required fields.
	pub async fn update(
		&self,
		id: &str,
		entity: &E,
		navigator: &dyn Navigator,
	) -> Result<Outcome<Value>> {
		entity.validate(FormMode::Update)?;

		let url = self.entity_url("update", id)?;
		let options = RequestOptions::new(Method::Put).json(entity)?;
		let outcome = self
			.client
			.execute(OperationKind::Update, url, options, navigator, || {
				format!("Failed to update {}", E::LABEL)
			})
			.await?;

		outcome.try_map(|response| body_value(&response))
	}

	/// Deletes the entity identified by `id`.
	pub async fn delete(&self, id: &str, navigator: &dyn Navigator) -> Result<Outcome<()>> {
		let url = self.entity_url("delete", id)?;
		let options = RequestOptions::new(Method::Delete);
		let outcome = self
			.client
			.execute(OperationKind::Delete, url, options, navigator, || {
				format!("Failed to delete {}", E::LABEL)
			})
			.await?;

		Ok(outcome.map(|_| ()))
	}

	fn entity_url(&self, action: &str, id: &str) -> Result<Url> {
		let mut url = self.client.config.api_url(&format!("admin/{}/{action}", E::PATH))?;

		url.path_segments_mut()
			.map_err(|_| ConfigError::InvalidBaseUrl {
				value: self.client.config.base_url.to_string(),
				source: None,
			})?
			.push(id);

		Ok(url)
	}
}

impl<T> SessionClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Returns a CRUD handle for entity `E`.
	pub fn resource<E>(&self) -> Resource<'_, T, E>
	where
		E: Entity,
	{
		Resource { client: self, entity: PhantomData }
	}

	/// Looks up select options whose label matches `name`.
	pub async fn combo(
		&self,
		combo: Combo,
		name: &str,
		navigator: &dyn Navigator,
	) -> Result<Outcome<Page<ComboItem>>> {
		let mut url = self.config.api_url(combo.path())?;

		{
			let mut pairs = url.query_pairs_mut();

			if combo == Combo::Lecturer {
				pairs.append_pair("userType", "ROLE_LECTURER");
			}

			pairs.append_pair("name", name);
		}

		let outcome = self
			.execute(OperationKind::Combo, url, RequestOptions::get(), navigator, || {
				"Failed to fetch options".into()
			})
			.await?;

		outcome.try_map(|response| response.json())
	}

	/// Guarded send that turns non-success statuses into [`Error::Api`].
	async fn execute(
		&self,
		kind: OperationKind,
		url: Url,
		options: RequestOptions,
		navigator: &dyn Navigator,
		fallback: impl FnOnce() -> String,
	) -> Result<Outcome<HttpResponse>> {
		let span = RequestSpan::new(kind, "execute");

		obs::record_request_outcome(kind, RequestOutcome::Attempt);

		let result = span
			.instrument(async move {
				match self.send_guarded(url, options, navigator).await? {
					Outcome::Response(response) if !response.is_success() => Err(Error::Api {
						status: response.status,
						message: response
							.message_field(&["message", "detail"])
							.unwrap_or_else(fallback),
					}),
					outcome => Ok(outcome),
				}
			})
			.await;

		client::record_outcome(kind, &result);

		result
	}
}

/// JSON body as a value; empty bodies become `null`.
fn body_value(response: &HttpResponse) -> Result<Value> {
	if response.body.iter().all(u8::is_ascii_whitespace) {
		return Ok(Value::Null);
	}

	response.json()
}
