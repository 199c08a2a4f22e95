//! Demonstrates directory lookups: one member fetch plus a recursive department
//! listing, both reusing the same cached access token.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use wecom_client::{
	api::MemberListFilter,
	auth::{AgentId, ApiSecret, CorpId, Credential, UserId},
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
	let member_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/cgi-bin/user/get").query_param("userid", "zhangsan");
			then.status(200).header("content-type", "application/json").body(
				"{\"errcode\":0,\"errmsg\":\"ok\",\"userid\":\"zhangsan\",\"name\":\"Zhang San\",\"department\":[2]}",
			);
		})
		.await;
	let list_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/cgi-bin/user/simplelist")
				.query_param("department_id", "2")
				.query_param("fetch_child", "1");
			then.status(200).header("content-type", "application/json").body(
				"{\"errcode\":0,\"errmsg\":\"ok\",\"userlist\":[{\"userid\":\"zhangsan\",\"name\":\"Zhang San\"},{\"userid\":\"lisi\",\"name\":\"Li Si\"}]}",
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
	let contacts = client.contacts();
	let detail = contacts.member(&UserId::new("zhangsan")?).await?;

	println!(
		"Member {} works in departments {:?}.",
		detail.name.as_deref().unwrap_or("<unnamed>"),
		detail.department
	);

	let list = contacts.simple_list(&MemberListFilter::department(2).recursive()).await?;

	println!("Department 2 holds {} members:", list.userlist.len());

	for member in &list.userlist {
		println!("  - {} ({})", member.name.as_deref().unwrap_or("<unnamed>"), member.userid);
	}

	token_mock.assert_async().await;
	member_mock.assert_async().await;
	list_mock.assert_async().await;

	Ok(())
}
