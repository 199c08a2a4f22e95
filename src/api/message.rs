//! Application message delivery endpoints.

// self
use crate::{
	_prelude::*,
	auth::AgentId,
	client::{AgentClient, ApiCall},
	codec::Envelope,
	http::ApiTransport,
	obs::CallKind,
};

const KIND: CallKind = CallKind::Message;
const PATH_MESSAGE_SEND: &str = "/cgi-bin/message/send";

/// Message delivery surface obtained from
/// [`AgentClient::messages`](crate::client::AgentClient::messages).
pub struct MessageApi<'a, T>
where
	T: ?Sized + ApiTransport,
{
	client: &'a AgentClient<T>,
}
impl<'a, T> MessageApi<'a, T>
where
	T: ?Sized + ApiTransport,
{
	pub(crate) fn new(client: &'a AgentClient<T>) -> Self {
		Self { client }
	}

	/// Delivers a fully-specified message.
	pub async fn send(&self, message: &OutgoingMessage) -> Result<MessageReceipt> {
		self.client.execute(ApiCall::post(KIND, PATH_MESSAGE_SEND).json(message)?).await
	}

	/// Delivers a plain text message from the client's own agent.
	pub async fn send_text(
		&self,
		recipients: Recipients,
		content: impl Into<String>,
	) -> Result<MessageReceipt> {
		self.send(&OutgoingMessage::text(recipients, self.client.credential.agent_id, content)).await
	}

	/// Delivers a markdown message from the client's own agent.
	pub async fn send_markdown(
		&self,
		recipients: Recipients,
		content: impl Into<String>,
	) -> Result<MessageReceipt> {
		self.send(&OutgoingMessage::markdown(recipients, self.client.credential.agent_id, content))
			.await
	}
}
impl<T> Clone for MessageApi<'_, T>
where
	T: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		*self
	}
}
impl<T> Copy for MessageApi<'_, T> where T: ?Sized + ApiTransport {}

/// Target audience of one message.
///
/// Each group renders as a pipe-joined id list on the wire. The special member list
/// `@all` broadcasts to the whole corp, which [`Recipients::everyone`] produces.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Recipients {
	/// Pipe-joined member ids.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub touser: Option<String>,
	/// Pipe-joined department ids.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub toparty: Option<String>,
	/// Pipe-joined tag ids.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub totag: Option<String>,
}
impl Recipients {
	/// Targets the given member ids.
	pub fn users<I, S>(ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self { touser: Some(join_ids(ids)), ..Self::default() }
	}

	/// Broadcasts to every member of the corp.
	pub fn everyone() -> Self {
		Self { touser: Some("@all".into()), ..Self::default() }
	}

	/// Targets the given department ids.
	pub fn parties<I>(ids: I) -> Self
	where
		I: IntoIterator<Item = i64>,
	{
		Self { toparty: Some(join_numbers(ids)), ..Self::default() }
	}

	/// Targets the given tag ids.
	pub fn tags<I>(ids: I) -> Self
	where
		I: IntoIterator<Item = i64>,
	{
		Self { totag: Some(join_numbers(ids)), ..Self::default() }
	}

	/// Adds department ids to the audience, appending to any already targeted.
	pub fn and_parties<I>(mut self, ids: I) -> Self
	where
		I: IntoIterator<Item = i64>,
	{
		self.toparty = Some(join_groups(self.toparty.take(), join_numbers(ids)));

		self
	}

	/// Adds tag ids to the audience, appending to any already targeted.
	pub fn and_tags<I>(mut self, ids: I) -> Self
	where
		I: IntoIterator<Item = i64>,
	{
		self.totag = Some(join_groups(self.totag.take(), join_numbers(ids)));

		self
	}
}

/// Message payload variants, discriminated by `msgtype` on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "msgtype", rename_all = "lowercase")]
pub enum MessagePayload {
	/// Plain text, up to 2048 bytes of UTF-8.
	Text {
		/// Text body.
		text: TextContent,
	},
	/// Markdown rendered by the WeCom clients.
	Markdown {
		/// Markdown body.
		markdown: TextContent,
	},
	/// Card with a title, description, and one link.
	Textcard {
		/// Card body.
		textcard: TextCard,
	},
	/// Multi-article news message.
	News {
		/// Article list.
		news: NewsContent,
	},
}

/// Body shared by text and markdown payloads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TextContent {
	/// Message text.
	pub content: String,
}

/// Body of a text card payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TextCard {
	/// Card title.
	pub title: String,
	/// Card description.
	pub description: String,
	/// Link opened when the card is tapped.
	pub url: String,
	/// Button caption; the clients default it when unset.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub btntxt: Option<String>,
}

/// Body of a news payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewsContent {
	/// Articles shown as one stacked message, up to eight.
	pub articles: Vec<NewsArticle>,
}

/// One article inside a news payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewsArticle {
	/// Article title.
	pub title: String,
	/// Short description shown below the title.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Link opened when the article is tapped.
	pub url: String,
	/// Cover image URL.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub picurl: Option<String>,
}

/// Complete message request consumed by the send endpoint.
#[derive(Clone, Debug, Serialize)]
pub struct OutgoingMessage {
	/// Target audience, flattened onto the wire object.
	#[serde(flatten)]
	pub recipients: Recipients,
	/// Sending agent.
	pub agentid: AgentId,
	/// Payload, flattened onto the wire object next to its `msgtype` tag.
	#[serde(flatten)]
	pub payload: MessagePayload,
	/// Confidential flag: `1` watermarks the message and blocks forwarding.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub safe: Option<i64>,
}
impl OutgoingMessage {
	/// Builds a plain text message.
	pub fn text(recipients: Recipients, agentid: AgentId, content: impl Into<String>) -> Self {
		Self::with_payload(
			recipients,
			agentid,
			MessagePayload::Text { text: TextContent { content: content.into() } },
		)
	}

	/// Builds a markdown message.
	pub fn markdown(recipients: Recipients, agentid: AgentId, content: impl Into<String>) -> Self {
		Self::with_payload(
			recipients,
			agentid,
			MessagePayload::Markdown { markdown: TextContent { content: content.into() } },
		)
	}

	/// Builds a message around an arbitrary payload.
	pub fn with_payload(recipients: Recipients, agentid: AgentId, payload: MessagePayload) -> Self {
		Self { recipients, agentid, payload, safe: None }
	}

	/// Marks the message confidential.
	pub fn confidential(mut self) -> Self {
		self.safe = Some(1);

		self
	}
}

/// Delivery receipt returned by the send endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct MessageReceipt {
	/// Response envelope passed through verbatim.
	#[serde(flatten)]
	pub envelope: Envelope,
	/// Member ids the gateway refused to deliver to.
	#[serde(default)]
	pub invaliduser: String,
	/// Department ids the gateway refused to deliver to.
	#[serde(default)]
	pub invalidparty: String,
	/// Tag ids the gateway refused to deliver to.
	#[serde(default)]
	pub invalidtag: String,
	/// Gateway-assigned message id, usable for recall.
	#[serde(default)]
	pub msgid: String,
}

fn join_ids<I, S>(ids: I) -> String
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	ids.into_iter().map(|id| id.as_ref().to_owned()).collect::<Vec<_>>().join("|")
}

fn join_numbers<I>(ids: I) -> String
where
	I: IntoIterator<Item = i64>,
{
	ids.into_iter().map(|id| id.to_string()).collect::<Vec<_>>().join("|")
}

fn join_groups(existing: Option<String>, added: String) -> String {
	match existing {
		Some(existing) if existing.is_empty() => added,
		Some(existing) if added.is_empty() => existing,
		Some(existing) => format!("{existing}|{added}"),
		None => added,
	}
}
