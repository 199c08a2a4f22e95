//! Department tree endpoints.

// self
use crate::{
	_prelude::*,
	client::{AgentClient, ApiCall},
	codec::{Envelope, Query},
	http::ApiTransport,
	obs::CallKind,
};

const KIND: CallKind = CallKind::Department;
const PATH_DEPARTMENT_CREATE: &str = "/cgi-bin/department/create";
const PATH_DEPARTMENT_UPDATE: &str = "/cgi-bin/department/update";
const PATH_DEPARTMENT_DELETE: &str = "/cgi-bin/department/delete";
const PATH_DEPARTMENT_LIST: &str = "/cgi-bin/department/list";

/// Department tree surface obtained from
/// [`AgentClient::departments`](crate::client::AgentClient::departments).
pub struct DepartmentApi<'a, T>
where
	T: ?Sized + ApiTransport,
{
	client: &'a AgentClient<T>,
}
impl<'a, T> DepartmentApi<'a, T>
where
	T: ?Sized + ApiTransport,
{
	pub(crate) fn new(client: &'a AgentClient<T>) -> Self {
		Self { client }
	}

	/// Creates a department and returns the id the gateway assigned.
	pub async fn create(&self, department: &DepartmentUpsert) -> Result<DepartmentCreated> {
		self.client.execute(ApiCall::post(KIND, PATH_DEPARTMENT_CREATE).json(department)?).await
	}

	/// Updates a department; unset fields keep their current values.
	pub async fn update(&self, department: &DepartmentUpsert) -> Result<Envelope> {
		self.client.execute(ApiCall::post(KIND, PATH_DEPARTMENT_UPDATE).json(department)?).await
	}

	/// Deletes a department; it must be empty of members and sub-departments.
	pub async fn delete(&self, id: i64) -> Result<Envelope> {
		let call =
			ApiCall::get(KIND, PATH_DEPARTMENT_DELETE).query(Query::new().pair("id", id.to_string()));

		self.client.execute(call).await
	}

	/// Lists the sub-tree below `id`, or the whole tree when `None`.
	pub async fn list(&self, id: Option<i64>) -> Result<DepartmentList> {
		let mut call = ApiCall::get(KIND, PATH_DEPARTMENT_LIST);

		if let Some(id) = id {
			call = call.query(Query::new().pair("id", id.to_string()));
		}

		self.client.execute(call).await
	}
}
impl<T> Clone for DepartmentApi<'_, T>
where
	T: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		*self
	}
}
impl<T> Copy for DepartmentApi<'_, T> where T: ?Sized + ApiTransport {}

/// Department payload for create and update calls.
///
/// Create calls need `name` and `parentid`; update calls need `id` plus whichever
/// fields change. Unset fields are skipped on the wire.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DepartmentUpsert {
	/// Department id; assigned by the gateway when omitted on creation.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub id: Option<i64>,
	/// Display name, unique among siblings.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// English display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name_en: Option<String>,
	/// Parent department id; the root department is `1`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub parentid: Option<i64>,
	/// Sort order among siblings, higher first.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub order: Option<i64>,
}
impl DepartmentUpsert {
	/// Starts a creation payload under the given parent.
	pub fn create(name: impl Into<String>, parentid: i64) -> Self {
		Self { name: Some(name.into()), parentid: Some(parentid), ..Self::default() }
	}

	/// Starts an update payload for an existing department.
	pub fn update(id: i64) -> Self {
		Self { id: Some(id), ..Self::default() }
	}
}

/// Response of the department creation endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct DepartmentCreated {
	/// Response envelope passed through verbatim.
	#[serde(flatten)]
	pub envelope: Envelope,
	/// Id assigned to the new department; `0` on error envelopes.
	#[serde(default)]
	pub id: i64,
}

/// One department node returned by the list endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct DepartmentInfo {
	/// Department id.
	pub id: i64,
	/// Display name.
	#[serde(default)]
	pub name: String,
	/// English display name.
	#[serde(default)]
	pub name_en: Option<String>,
	/// Parent department id; `0` for the root.
	#[serde(default)]
	pub parentid: i64,
	/// Sort order among siblings.
	#[serde(default)]
	pub order: i64,
}

/// Response of the department list endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct DepartmentList {
	/// Response envelope passed through verbatim.
	#[serde(flatten)]
	pub envelope: Envelope,
	/// Department nodes; empty on error envelopes.
	#[serde(default)]
	pub department: Vec<DepartmentInfo>,
}
