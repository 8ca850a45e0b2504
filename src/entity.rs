//! Entity descriptors for the administrative resources.
//!
//! Each entity knows its admin path segment, the query parameter its list endpoint searches
//! on, and which fields its form requires. Everything else (URLs, pagination, error
//! handling) lives once in [`Resource`](crate::resource::Resource).

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::_prelude::*;

/// Whether a form submission creates a new entity or updates an existing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormMode {
	/// `POST .../create`
	Create,
	/// `PUT .../update/{id}`
	Update,
}

/// Form input rejected before any request is sent.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// A required field was empty.
	#[error("Field `{field}` is required.")]
	Required {
		/// Wire name of the missing field.
		field: &'static str,
	},
}

/// Descriptor implemented by every administrative entity.
pub trait Entity
where
	Self: 'static + Send + Sync + Serialize + DeserializeOwned,
{
	/// Path segment under `admin/` (e.g. `course`).
	const PATH: &'static str;
	/// Human-readable singular name used in fallback error messages.
	const LABEL: &'static str;
	/// Query parameter the list endpoint filters on.
	const SEARCH_PARAM: &'static str;
	/// Column a fresh list view is sorted by.
	const DEFAULT_SORT: &'static str;

	/// Backend identifier, when the entity has been persisted.
	fn id(&self) -> Option<&str>;

	/// Checks required fields for `mode`.
	fn validate(&self, mode: FormMode) -> Result<(), ValidationError>;
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
	if value.is_empty() { Err(ValidationError::Required { field }) } else { Ok(()) }
}

/// Course offered by a department.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Course {
	/// Backend identifier.
	#[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Course title.
	pub title: String,
	/// Course code.
	pub code: String,
	/// Free-form description.
	pub description: String,
	/// Owning department.
	pub department_id: String,
	/// Prerequisite course identifiers.
	#[serde(rename = "prequisitesId")]
	pub prerequisite_ids: Vec<String>,
	/// Responsible lecturer.
	pub lecturer_id: String,
	/// Semester label.
	pub semester: String,
	/// Academic year.
	pub academic_year: i32,
	/// Schedule description.
	pub schedule: String,
	/// Room the course is held in.
	pub room_location: String,
	/// Credit points, when the backend reports them.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub credits: Option<u32>,
}
impl Entity for Course {
	const DEFAULT_SORT: &'static str = "name";
	const LABEL: &'static str = "course";
	const PATH: &'static str = "course";
	const SEARCH_PARAM: &'static str = "title";

	fn id(&self) -> Option<&str> {
		self.id.as_deref()
	}

	fn validate(&self, _mode: FormMode) -> Result<(), ValidationError> {
		require("title", &self.title)?;
		require("code", &self.code)
	}
}

/// Academic department.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Department {
	/// Backend identifier.
	#[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Department name.
	pub name: String,
	/// Department code.
	pub code: String,
	/// Free-form description.
	pub description: String,
	/// Lecturer heading the department.
	pub head_id: String,
}
impl Entity for Department {
	const DEFAULT_SORT: &'static str = "name";
	const LABEL: &'static str = "department";
	const PATH: &'static str = "department";
	const SEARCH_PARAM: &'static str = "name";

	fn id(&self) -> Option<&str> {
		self.id.as_deref()
	}

	fn validate(&self, _mode: FormMode) -> Result<(), ValidationError> {
		require("name", &self.name)?;
		require("code", &self.code)
	}
}

/// Administrator account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Admin {
	/// Backend identifier.
	#[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Login name.
	pub username: String,
	/// Password; required in both form modes.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub password: String,
	/// Display name.
	pub fullname: String,
	/// Avatar URL.
	pub photo_url: String,
	/// Contact email.
	pub email: String,
	/// Contact phone.
	pub phone: String,
	/// National identity number.
	pub no_id: String,
	/// Gender label.
	pub gender: String,
	/// Granted permissions.
	pub permissions: Vec<String>,
	/// Role name (e.g. `ROLE_ADMIN`).
	pub role: String,
	/// Departments this admin manages.
	pub managed_departments: Vec<String>,
}
impl Entity for Admin {
	const DEFAULT_SORT: &'static str = "username";
	const LABEL: &'static str = "admin";
	const PATH: &'static str = "admin";
	const SEARCH_PARAM: &'static str = "name";

	fn id(&self) -> Option<&str> {
		self.id.as_deref()
	}

	fn validate(&self, _mode: FormMode) -> Result<(), ValidationError> {
		require("username", &self.username)?;
		require("password", &self.password)?;
		require("email", &self.email)?;
		require("role", &self.role)
	}
}

/// Lecturer account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lecturer {
	/// Backend identifier.
	#[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
	pub id: Option<String>,
	/// Login name.
	pub username: String,
	/// Password; omitted from the body when empty so updates keep the stored one.
	#[serde(skip_serializing_if = "String::is_empty")]
	pub password: String,
	/// Display name.
	pub fullname: String,
	/// Avatar URL.
	pub photo_url: String,
	/// Contact email.
	pub email: String,
	/// Contact phone.
	pub phone: String,
	/// National identity number.
	pub no_id: String,
	/// Gender label.
	pub gender: String,
	/// Granted permissions.
	pub permissions: Vec<String>,
	/// Teaching specialization.
	pub specialization: String,
}
impl Entity for Lecturer {
	const DEFAULT_SORT: &'static str = "username";
	const LABEL: &'static str = "lecturer";
	const PATH: &'static str = "lecturer";
	const SEARCH_PARAM: &'static str = "name";

	fn id(&self) -> Option<&str> {
		self.id.as_deref()
	}

	fn validate(&self, mode: FormMode) -> Result<(), ValidationError> {
		require("username", &self.username)?;

		if mode == FormMode::Create {
			require("password", &self.password)?;
		}

		require("email", &self.email)
	}
}
