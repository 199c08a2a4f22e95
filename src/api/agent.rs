//! Agent (application) management endpoints.

// self
use crate::{
	_prelude::*,
	auth::{AgentId, UserId},
	client::{AgentClient, ApiCall},
	codec::{Envelope, Query},
	http::ApiTransport,
	obs::CallKind,
};

const KIND: CallKind = CallKind::Agent;
const PATH_AGENT_GET: &str = "/cgi-bin/agent/get";
const PATH_AGENT_SET: &str = "/cgi-bin/agent/set";
const PATH_AGENT_LIST: &str = "/cgi-bin/agent/list";

/// Agent management surface obtained from
/// [`AgentClient::agents`](crate::client::AgentClient::agents).
pub struct AgentApi<'a, T>
where
	T: ?Sized + ApiTransport,
{
	client: &'a AgentClient<T>,
}
impl<'a, T> AgentApi<'a, T>
where
	T: ?Sized + ApiTransport,
{
	pub(crate) fn new(client: &'a AgentClient<T>) -> Self {
		Self { client }
	}

	/// Fetches the full profile of one agent, including its visibility scopes.
	pub async fn details(&self, agentid: AgentId) -> Result<AgentDetail> {
		let call = ApiCall::get(KIND, PATH_AGENT_GET)
			.query(Query::new().pair("agentid", agentid.value().to_string()));

		self.client.execute(call).await
	}

	/// Updates an agent's profile; unset fields keep their current values.
	pub async fn update(&self, settings: &AgentSettings) -> Result<Envelope> {
		self.client.execute(ApiCall::post(KIND, PATH_AGENT_SET).json(settings)?).await
	}

	/// Lists every agent the credential is allowed to see.
	pub async fn list(&self) -> Result<AgentList> {
		self.client.execute(ApiCall::get(KIND, PATH_AGENT_LIST)).await
	}
}
impl<T> Clone for AgentApi<'_, T>
where
	T: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		*self
	}
}
impl<T> Copy for AgentApi<'_, T> where T: ?Sized + ApiTransport {}

/// Full agent profile returned by the agent lookup endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct AgentDetail {
	/// Response envelope passed through verbatim.
	#[serde(flatten)]
	pub envelope: Envelope,
	/// Agent id; `0` on error envelopes.
	#[serde(default)]
	pub agentid: AgentId,
	/// Display name.
	#[serde(default)]
	pub name: String,
	/// Square logo URL.
	#[serde(default)]
	pub square_logo_url: String,
	/// Description shown in the workbench.
	#[serde(default)]
	pub description: String,
	/// Members allowed to see the agent.
	#[serde(default)]
	pub allow_userinfos: AllowedUsers,
	/// Departments allowed to see the agent.
	#[serde(default)]
	pub allow_partys: AllowedParties,
	/// Tags allowed to see the agent.
	#[serde(default)]
	pub allow_tags: AllowedTags,
	/// Whether the agent is disabled: `1` disabled, `0` enabled.
	#[serde(default)]
	pub close: i64,
	/// Trusted domain for OAuth redirects.
	#[serde(default)]
	pub redirect_domain: String,
	/// Whether the agent reports member locations: `0` no, `1` on entry.
	#[serde(default)]
	pub report_location_flag: i64,
	/// Whether the agent reports workbench entry events.
	#[serde(default)]
	pub isreportenter: i64,
	/// Home page URL opened from the workbench.
	#[serde(default)]
	pub home_url: String,
}

/// Member visibility list nested inside [`AgentDetail`].
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AllowedUsers {
	/// Visible members.
	#[serde(default)]
	pub user: Vec<AllowedUser>,
}

/// One visible member entry.
#[derive(Clone, Debug, Deserialize)]
pub struct AllowedUser {
	/// Member account id.
	pub userid: UserId,
}

/// Department visibility list nested inside [`AgentDetail`].
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AllowedParties {
	/// Visible department ids.
	#[serde(default)]
	pub partyid: Vec<i64>,
}

/// Tag visibility list nested inside [`AgentDetail`].
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AllowedTags {
	/// Visible tag ids.
	#[serde(default)]
	pub tagid: Vec<i64>,
}

/// Agent profile payload for the update endpoint.
///
/// Only `agentid` is mandatory; unset fields are skipped on the wire and keep their
/// current values.
#[derive(Clone, Debug, Serialize)]
pub struct AgentSettings {
	/// Agent to update.
	pub agentid: AgentId,
	/// Display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Description shown in the workbench.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Trusted domain for OAuth redirects.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub redirect_domain: Option<String>,
	/// Media id of an uploaded logo image.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub logo_mediaid: Option<String>,
	/// Location reporting mode: `0` off, `1` on workbench entry.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub report_location_flag: Option<i64>,
	/// Whether to report workbench entry events.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub isreportenter: Option<i64>,
	/// Home page URL opened from the workbench.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub home_url: Option<String>,
}
impl AgentSettings {
	/// Starts an update payload with every optional field unset.
	pub fn new(agentid: AgentId) -> Self {
		Self {
			agentid,
			name: None,
			description: None,
			redirect_domain: None,
			logo_mediaid: None,
			report_location_flag: None,
			isreportenter: None,
			home_url: None,
		}
	}
}

/// Compact agent entry returned by the agent list endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct AgentSummary {
	/// Agent id.
	pub agentid: AgentId,
	/// Display name.
	#[serde(default)]
	pub name: String,
	/// Square logo URL.
	#[serde(default)]
	pub square_logo_url: String,
}

/// Response of the agent list endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct AgentList {
	/// Response envelope passed through verbatim.
	#[serde(flatten)]
	pub envelope: Envelope,
	/// Agents visible to the credential; empty on error envelopes.
	#[serde(default)]
	pub agentlist: Vec<AgentSummary>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn agent_details_decode_nested_visibility_lists() {
		let detail = serde_json::from_str::<AgentDetail>(
			r#"{
				"errcode": 0,
				"errmsg": "ok",
				"agentid": 1000002,
				"name": "HR Helper",
				"square_logo_url": "https://example.com/logo.png",
				"description": "Onboarding assistant",
				"allow_userinfos": { "user": [{ "userid": "zhangsan" }, { "userid": "lisi" }] },
				"allow_partys": { "partyid": [1] },
				"allow_tags": { "tagid": [1, 2, 3] },
				"close": 0,
				"redirect_domain": "example.com",
				"report_location_flag": 0,
				"isreportenter": 0,
				"home_url": "https://example.com"
			}"#,
		)
		.expect("Agent profile should decode.");

		assert!(detail.envelope.is_ok());
		assert_eq!(detail.agentid.value(), 1_000_002);
		assert_eq!(detail.allow_userinfos.user.len(), 2);
		assert_eq!(detail.allow_userinfos.user[0].userid.as_ref(), "zhangsan");
		assert_eq!(detail.allow_partys.partyid, [1]);
		assert_eq!(detail.allow_tags.tagid, [1, 2, 3]);
	}

	#[test]
	fn agent_details_decode_bare_error_envelopes() {
		let detail =
			serde_json::from_str::<AgentDetail>(r#"{"errcode":301002,"errmsg":"no privilege"}"#)
				.expect("Error envelopes must decode into the profile type.");

		assert_eq!(detail.envelope.errcode, 301_002);
		assert_eq!(detail.agentid.value(), 0);
		assert!(detail.allow_userinfos.user.is_empty());
	}

	#[test]
	fn settings_payloads_skip_unset_fields() {
		let mut settings = AgentSettings::new(AgentId::from(1_000_002));

		settings.name = Some("HR Helper".into());

		assert_eq!(
			serde_json::to_value(&settings).expect("Settings should serialize."),
			serde_json::json!({ "agentid": 1_000_002, "name": "HR Helper" })
		);
	}
}
