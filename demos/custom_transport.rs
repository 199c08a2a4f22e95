//! Demonstrates plugging a custom transport into the client: a thin wrapper that logs
//! every outbound request before delegating to the bundled reqwest transport.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use wecom_client::{
	auth::{AgentId, ApiSecret, CorpId, Credential},
	client::AgentClient,
	http::{ApiTransport, RawRequest, ReqwestTransport, TransportFuture},
};

struct LoggingTransport {
	inner: ReqwestTransport,
}
impl ApiTransport for LoggingTransport {
	fn execute(&self, request: RawRequest) -> TransportFuture {
		// The `Debug` rendering elides credential query values, so the full request is
		// safe to log.
		println!("-> {request:?}");

		self.inner.execute(request)
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/gettoken");
			then.status(200).header("content-type", "application/json").body(
				"{\"errcode\":0,\"errmsg\":\"ok\",\"access_token\":\"demo-access\",\"expires_in\":7200}",
			);
		})
		.await;
	let list_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/agent/list");
			then.status(200).header("content-type", "application/json").body(
				"{\"errcode\":0,\"errmsg\":\"ok\",\"agentlist\":[{\"agentid\":1000002,\"name\":\"HR Helper\"}]}",
			);
		})
		.await;
	let credential = Credential::new(
		CorpId::new("ww1234567890abcdef")?,
		ApiSecret::new("demo-corp-secret"),
		AgentId::from(1_000_002),
	);
	let client =
		AgentClient::with_transport(credential, LoggingTransport { inner: ReqwestTransport::default() })
			.with_base_url(Url::parse(&server.base_url())?);
	let list = client.agents().list().await?;

	for agent in &list.agentlist {
		println!("Agent {} is named {}.", agent.agentid, agent.name);
	}

	token_mock.assert_async().await;
	list_mock.assert_async().await;

	Ok(())
}
