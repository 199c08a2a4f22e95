//! Contact directory endpoints: members, id conversion, and batch invitations.

// self
use crate::{
	_prelude::*,
	auth::UserId,
	client::{AgentClient, ApiCall},
	codec::{AsQuery, Envelope, Query},
	http::ApiTransport,
	obs::CallKind,
};

const KIND: CallKind = CallKind::Contact;
const PATH_MEMBER_CREATE: &str = "/cgi-bin/user/create";
const PATH_MEMBER_GET: &str = "/cgi-bin/user/get";
const PATH_MEMBER_UPDATE: &str = "/cgi-bin/user/update";
const PATH_MEMBER_DELETE: &str = "/cgi-bin/user/delete";
const PATH_MEMBER_BATCH_DELETE: &str = "/cgi-bin/user/batchdelete";
const PATH_MEMBER_SIMPLE_LIST: &str = "/cgi-bin/user/simplelist";
const PATH_MEMBER_LIST: &str = "/cgi-bin/user/list";
const PATH_CONVERT_TO_OPENID: &str = "/cgi-bin/user/convert_to_openid";
const PATH_CONVERT_TO_USERID: &str = "/cgi-bin/user/convert_to_userid";
const PATH_AUTH_SUCC: &str = "/cgi-bin/user/authsucc";
const PATH_BATCH_INVITE: &str = "/cgi-bin/batch/invite";

/// Contact directory surface obtained from
/// [`AgentClient::contacts`](crate::client::AgentClient::contacts).
pub struct ContactApi<'a, T>
where
	T: ?Sized + ApiTransport,
{
	client: &'a AgentClient<T>,
}
impl<'a, T> ContactApi<'a, T>
where
	T: ?Sized + ApiTransport,
{
	pub(crate) fn new(client: &'a AgentClient<T>) -> Self {
		Self { client }
	}

	/// Creates a directory member.
	pub async fn create_member(&self, member: &Member) -> Result<Envelope> {
		self.client.execute(ApiCall::post(KIND, PATH_MEMBER_CREATE).json(member)?).await
	}

	/// Fetches the full record of one member.
	pub async fn member(&self, userid: &UserId) -> Result<MemberDetail> {
		let call = ApiCall::get(KIND, PATH_MEMBER_GET)
			.query(Query::new().pair("userid", userid.as_ref()));

		self.client.execute(call).await
	}

	/// Updates a member; unset fields keep their current values.
	pub async fn update_member(&self, member: &Member) -> Result<Envelope> {
		self.client.execute(ApiCall::post(KIND, PATH_MEMBER_UPDATE).json(member)?).await
	}

	/// Removes one member from the directory.
	pub async fn delete_member(&self, userid: &UserId) -> Result<Envelope> {
		let call = ApiCall::get(KIND, PATH_MEMBER_DELETE)
			.query(Query::new().pair("userid", userid.as_ref()));

		self.client.execute(call).await
	}

	/// Removes several members in one round trip.
	pub async fn delete_members(&self, userids: &[UserId]) -> Result<Envelope> {
		let call =
			ApiCall::post(KIND, PATH_MEMBER_BATCH_DELETE).json(&BatchDeleteRequest { useridlist: userids })?;

		self.client.execute(call).await
	}

	/// Lists id/name summaries of the members in a department.
	pub async fn simple_list(&self, filter: &MemberListFilter) -> Result<MemberSummaryList> {
		self.client.execute(ApiCall::get(KIND, PATH_MEMBER_SIMPLE_LIST).query(filter)).await
	}

	/// Lists full member records of a department.
	pub async fn list(&self, filter: &MemberListFilter) -> Result<MemberList> {
		self.client.execute(ApiCall::get(KIND, PATH_MEMBER_LIST).query(filter)).await
	}

	/// Converts a member id into the openid used by external WeChat surfaces.
	pub async fn to_openid(&self, userid: &UserId) -> Result<OpenIdConversion> {
		let call =
			ApiCall::post(KIND, PATH_CONVERT_TO_OPENID).json(&ConvertToOpenIdRequest { userid })?;

		self.client.execute(call).await
	}

	/// Converts an openid back into the corp-internal member id.
	pub async fn to_userid(&self, openid: &str) -> Result<UserIdConversion> {
		let call =
			ApiCall::post(KIND, PATH_CONVERT_TO_USERID).json(&ConvertToUserIdRequest { openid })?;

		self.client.execute(call).await
	}

	/// Marks a member's second verification as completed.
	pub async fn confirm_auth(&self, userid: &UserId) -> Result<Envelope> {
		let call =
			ApiCall::get(KIND, PATH_AUTH_SUCC).query(Query::new().pair("userid", userid.as_ref()));

		self.client.execute(call).await
	}

	/// Sends enrollment invitations to members, departments, and tags.
	pub async fn invite(&self, invitation: &Invitation) -> Result<InvitationOutcome> {
		self.client.execute(ApiCall::post(KIND, PATH_BATCH_INVITE).json(invitation)?).await
	}
}
impl<T> Clone for ContactApi<'_, T>
where
	T: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		*self
	}
}
impl<T> Copy for ContactApi<'_, T> where T: ?Sized + ApiTransport {}

/// Directory member payload for create and update calls.
///
/// Only `userid` is mandatory; every other field is skipped on the wire when unset,
/// which update calls rely on to leave current values untouched.
#[derive(Clone, Debug, Serialize)]
pub struct Member {
	/// Member account id, unique inside the corp.
	pub userid: UserId,
	/// Display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Alias shown to external contacts.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub alias: Option<String>,
	/// Mobile number; the directory requires mobile or email on creation.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub mobile: Option<String>,
	/// Email address.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Job position.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub position: Option<String>,
	/// Ids of the departments the member belongs to.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub department: Option<Vec<i64>>,
	/// Sort order inside each department, parallel to `department`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub order: Option<Vec<i64>>,
	/// Gender.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub gender: Option<Gender>,
	/// Leader flags (`1`/`0`) per department, parallel to `department`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub is_leader_in_dept: Option<Vec<i64>>,
	/// Account state: `1` enabled, `0` disabled.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub enable: Option<i64>,
	/// Landline number.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub telephone: Option<String>,
	/// Office address.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub address: Option<String>,
	/// Media id of an uploaded avatar image.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub avatar_mediaid: Option<String>,
	/// Whether creation also sends an enrollment invitation.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub to_invite: Option<bool>,
}
impl Member {
	/// Starts a member payload with every optional field unset.
	pub fn new(userid: UserId) -> Self {
		Self {
			userid,
			name: None,
			alias: None,
			mobile: None,
			email: None,
			position: None,
			department: None,
			order: None,
			gender: None,
			is_leader_in_dept: None,
			enable: None,
			telephone: None,
			address: None,
			avatar_mediaid: None,
			to_invite: None,
		}
	}
}

/// Member gender as the directory encodes it: quoted digits on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
	/// Not specified.
	#[serde(rename = "0")]
	Unspecified,
	/// Male.
	#[serde(rename = "1")]
	Male,
	/// Female.
	#[serde(rename = "2")]
	Female,
}

/// Full member record returned by the member lookup and list endpoints.
///
/// Every domain field defaults so the record still decodes when the gateway returns a
/// bare error envelope.
#[derive(Clone, Debug, Deserialize)]
pub struct MemberDetail {
	/// Response envelope passed through verbatim.
	#[serde(flatten)]
	pub envelope: Envelope,
	/// Member account id; `None` on error envelopes.
	#[serde(default)]
	pub userid: Option<UserId>,
	/// Display name.
	#[serde(default)]
	pub name: Option<String>,
	/// Alias shown to external contacts.
	#[serde(default)]
	pub alias: Option<String>,
	/// Mobile number.
	#[serde(default)]
	pub mobile: Option<String>,
	/// Email address.
	#[serde(default)]
	pub email: Option<String>,
	/// Job position.
	#[serde(default)]
	pub position: Option<String>,
	/// Gender.
	#[serde(default)]
	pub gender: Option<Gender>,
	/// Ids of the departments the member belongs to.
	#[serde(default)]
	pub department: Vec<i64>,
	/// Sort order inside each department.
	#[serde(default)]
	pub order: Vec<i64>,
	/// Leader flags per department.
	#[serde(default)]
	pub is_leader_in_dept: Vec<i64>,
	/// Account state: `1` enabled, `0` disabled.
	#[serde(default)]
	pub enable: Option<i64>,
	/// Activation state: `1` activated, `2` disabled, `4` not activated, `5` exited.
	#[serde(default)]
	pub status: Option<i64>,
	/// Landline number.
	#[serde(default)]
	pub telephone: Option<String>,
	/// Office address.
	#[serde(default)]
	pub address: Option<String>,
	/// Avatar image URL.
	#[serde(default)]
	pub avatar: Option<String>,
	/// Thumbnail avatar URL.
	#[serde(default)]
	pub thumb_avatar: Option<String>,
	/// Globally unique id across corps sharing the directory.
	#[serde(default)]
	pub open_userid: Option<String>,
}

/// Compact member record returned by the simple list endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct MemberSummary {
	/// Member account id.
	pub userid: UserId,
	/// Display name.
	#[serde(default)]
	pub name: Option<String>,
	/// Ids of the departments the member belongs to.
	#[serde(default)]
	pub department: Vec<i64>,
	/// Globally unique id across corps sharing the directory.
	#[serde(default)]
	pub open_userid: Option<String>,
}

/// Response of the simple member list endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct MemberSummaryList {
	/// Response envelope passed through verbatim.
	#[serde(flatten)]
	pub envelope: Envelope,
	/// Member summaries; empty on error envelopes.
	#[serde(default)]
	pub userlist: Vec<MemberSummary>,
}

/// Response of the full member list endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct MemberList {
	/// Response envelope passed through verbatim.
	#[serde(flatten)]
	pub envelope: Envelope,
	/// Full member records; empty on error envelopes.
	#[serde(default)]
	pub userlist: Vec<MemberDetail>,
}

/// Filter applied to the member listing endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemberListFilter {
	/// Department whose members are listed.
	pub department_id: i64,
	/// Whether sub-departments are included recursively.
	pub fetch_child: bool,
}
impl MemberListFilter {
	/// Lists one department without recursing into its children.
	pub fn department(department_id: i64) -> Self {
		Self { department_id, fetch_child: false }
	}

	/// Enables recursion into sub-departments.
	pub fn recursive(mut self) -> Self {
		self.fetch_child = true;

		self
	}
}
impl AsQuery for MemberListFilter {
	fn as_query(&self) -> Query {
		Query::new()
			.pair("department_id", self.department_id.to_string())
			.pair("fetch_child", if self.fetch_child { "1" } else { "0" })
	}
}

#[derive(Serialize)]
struct BatchDeleteRequest<'a> {
	useridlist: &'a [UserId],
}

#[derive(Serialize)]
struct ConvertToOpenIdRequest<'a> {
	userid: &'a UserId,
}

/// Result of a userid-to-openid conversion.
#[derive(Clone, Debug, Deserialize)]
pub struct OpenIdConversion {
	/// Response envelope passed through verbatim.
	#[serde(flatten)]
	pub envelope: Envelope,
	/// Converted openid; empty on error envelopes.
	#[serde(default)]
	pub openid: String,
}

#[derive(Serialize)]
struct ConvertToUserIdRequest<'a> {
	openid: &'a str,
}

/// Result of an openid-to-userid conversion.
#[derive(Clone, Debug, Deserialize)]
pub struct UserIdConversion {
	/// Response envelope passed through verbatim.
	#[serde(flatten)]
	pub envelope: Envelope,
	/// Converted member id; empty on error envelopes.
	#[serde(default)]
	pub userid: String,
}

/// Batch invitation request naming members, departments, and tags to notify.
///
/// Empty groups are skipped on the wire; the gateway rejects requests where all three
/// are empty.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Invitation {
	/// Member ids to invite.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub user: Vec<String>,
	/// Department ids to invite.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub party: Vec<String>,
	/// Tag ids to invite.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub tag: Vec<String>,
}
impl Invitation {
	/// Invites the given member ids.
	pub fn users<I, S>(ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self { user: ids.into_iter().map(Into::into).collect(), ..Self::default() }
	}

	/// Adds department ids to the invitation, appending to any already listed.
	pub fn and_parties<I>(mut self, ids: I) -> Self
	where
		I: IntoIterator<Item = i64>,
	{
		self.party.extend(ids.into_iter().map(|id| id.to_string()));

		self
	}

	/// Adds tag ids to the invitation, appending to any already listed.
	pub fn and_tags<I>(mut self, ids: I) -> Self
	where
		I: IntoIterator<Item = i64>,
	{
		self.tag.extend(ids.into_iter().map(|id| id.to_string()));

		self
	}
}

/// Per-group rejection lists returned by the batch invitation endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct InvitationOutcome {
	/// Response envelope passed through verbatim.
	#[serde(flatten)]
	pub envelope: Envelope,
	/// Member ids the gateway refused to invite.
	#[serde(default)]
	pub invaliduser: String,
	/// Department ids the gateway refused to invite.
	#[serde(default)]
	pub invalidparty: String,
	/// Tag ids the gateway refused to invite.
	#[serde(default)]
	pub invalidtag: String,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn userid(value: &str) -> UserId {
		UserId::new(value).expect("User identifier fixture should be valid.")
	}

	#[test]
	fn member_payloads_skip_unset_fields() {
		let member = Member::new(userid("zhangsan"));

		assert_eq!(
			serde_json::to_value(&member).expect("Member should serialize."),
			serde_json::json!({ "userid": "zhangsan" })
		);

		let mut member = Member::new(userid("zhangsan"));

		member.name = Some("Zhang San".into());
		member.department = Some(vec![1, 2]);
		member.gender = Some(Gender::Male);

		assert_eq!(
			serde_json::to_value(&member).expect("Member should serialize."),
			serde_json::json!({
				"userid": "zhangsan",
				"name": "Zhang San",
				"department": [1, 2],
				"gender": "1"
			})
		);
	}

	#[test]
	fn list_filters_render_ordered_numeric_flags() {
		let query = MemberListFilter::department(2).as_query();

		assert_eq!(query.iter().collect::<Vec<_>>(), [("department_id", "2"), ("fetch_child", "0")]);

		let query = MemberListFilter::department(2).recursive().as_query();

		assert_eq!(query.iter().collect::<Vec<_>>(), [("department_id", "2"), ("fetch_child", "1")]);
	}

	#[test]
	fn member_details_decode_bare_error_envelopes() {
		let detail = serde_json::from_str::<MemberDetail>(
			r#"{"errcode":60111,"errmsg":"invalid string size"}"#,
		)
		.expect("Error envelopes must decode into the detail type.");

		assert_eq!(detail.envelope.errcode, 60111);
		assert!(detail.userid.is_none());
		assert!(detail.department.is_empty());
	}

	#[test]
	fn member_details_decode_full_records() {
		let detail = serde_json::from_str::<MemberDetail>(
			r#"{
				"errcode": 0,
				"errmsg": "ok",
				"userid": "zhangsan",
				"name": "Zhang San",
				"department": [1, 2],
				"gender": "1",
				"status": 1
			}"#,
		)
		.expect("Full member record should decode.");

		assert!(detail.envelope.is_ok());
		assert_eq!(detail.userid.as_deref(), Some("zhangsan"));
		assert_eq!(detail.gender, Some(Gender::Male));
		assert_eq!(detail.department, [1, 2]);
	}

	#[test]
	fn invitations_skip_empty_groups() {
		let invitation = Invitation::users(["zhangsan"]).and_tags([3]);

		assert_eq!(
			serde_json::to_value(&invitation).expect("Invitation should serialize."),
			serde_json::json!({ "user": ["zhangsan"], "tag": ["3"] })
		);
	}

	#[test]
	fn invitation_builders_append_across_calls() {
		let invitation =
			Invitation::users(["zhangsan"]).and_parties([1]).and_parties([2]).and_tags([3]);

		assert_eq!(
			serde_json::to_value(&invitation).expect("Invitation should serialize."),
			serde_json::json!({ "user": ["zhangsan"], "party": ["1", "2"], "tag": ["3"] })
		);
	}
}
