//! Demonstrates sending a text message through the default reqwest transport, with the
//! access token fetched lazily and cached on first use.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use wecom_client::{
	api::Recipients,
	auth::{AgentId, ApiSecret, CorpId, Credential},
	client::AgentClient,
};

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
	let send_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/cgi-bin/message/send")
				.query_param("access_token", "demo-access");
			then.status(200).header("content-type", "application/json").body(
				"{\"errcode\":0,\"errmsg\":\"ok\",\"invaliduser\":\"lisi\",\"msgid\":\"demo-msg-1\"}",
			);
		})
		.await;
	let credential = Credential::new(
		CorpId::new("ww1234567890abcdef")?,
		ApiSecret::new("demo-corp-secret"),
		AgentId::from(1_000_002),
	);
	let client =
		AgentClient::new(credential).with_base_url(Url::parse(&server.base_url())?);
	let receipt = client
		.messages()
		.send_text(Recipients::users(["zhangsan", "lisi"]), "Deploy finished, dashboards are green.")
		.await?;

	println!("Delivered message {}.", receipt.msgid);

	if !receipt.invaliduser.is_empty() {
		println!("Undeliverable member ids: {}.", receipt.invaliduser);
	}

	token_mock.assert_async().await;
	send_mock.assert_async().await;

	Ok(())
}
