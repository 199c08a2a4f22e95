#![cfg(all(feature = "reqwest", feature = "test"))]

// crates.io
use httpmock::prelude::*;
// self
use wecom_client::{
	_preludet::*,
	api::{Invitation, Member, MemberListFilter},
	auth::UserId,
};

const CORP_ID: &str = "wwcontact12345678";
const CORP_SECRET: &str = "contact-secret";
const AGENT_ID: i64 = 1_000_011;
const ACCESS_TOKEN: &str = "contact-token";

fn build_client(server: &MockServer) -> ReqwestTestClient {
	build_reqwest_test_client(&server.base_url(), CORP_ID, CORP_SECRET, AGENT_ID)
}

fn userid(value: &str) -> UserId {
	UserId::new(value).expect("User identifier fixture should be valid.")
}

async fn mock_gettoken(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/cgi-bin/gettoken")
				.query_param("corpid", CORP_ID)
				.query_param("corpsecret", CORP_SECRET);
			then.status(200).header("content-type", "application/json").body(format!(
				"{{\"errcode\":0,\"errmsg\":\"ok\",\"access_token\":\"{ACCESS_TOKEN}\",\"expires_in\":7200}}"
			));
		})
		.await
}

#[tokio::test]
async fn member_lifecycle_reuses_one_token() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let token_mock = mock_gettoken(&server).await;
	let create_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/cgi-bin/user/create")
				.query_param("access_token", ACCESS_TOKEN)
				.json_body(serde_json::json!({
					"userid": "zhangsan",
					"name": "Zhang San",
					"department": [2]
				}));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"errcode\":0,\"errmsg\":\"created\"}");
		})
		.await;
	let get_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/cgi-bin/user/get")
				.query_param("userid", "zhangsan")
				.query_param("access_token", ACCESS_TOKEN);
			then.status(200).header("content-type", "application/json").body(
				"{\"errcode\":0,\"errmsg\":\"ok\",\"userid\":\"zhangsan\",\"name\":\"Zhang San\",\"department\":[2]}",
			);
		})
		.await;
	let delete_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/cgi-bin/user/delete")
				.query_param("userid", "zhangsan")
				.query_param("access_token", ACCESS_TOKEN);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"errcode\":0,\"errmsg\":\"deleted\"}");
		})
		.await;
	let contacts = client.contacts();
	let mut member = Member::new(userid("zhangsan"));

	member.name = Some("Zhang San".into());
	member.department = Some(vec![2]);

	let created = contacts.create_member(&member).await.expect("Member creation should succeed.");

	assert!(created.is_ok());
	assert_eq!(created.errmsg, "created");

	let detail =
		contacts.member(&userid("zhangsan")).await.expect("Member lookup should succeed.");

	assert_eq!(detail.name.as_deref(), Some("Zhang San"));
	assert_eq!(detail.department, [2]);

	let deleted =
		contacts.delete_member(&userid("zhangsan")).await.expect("Member removal should succeed.");

	assert_eq!(deleted.errmsg, "deleted");

	token_mock.assert_calls_async(1).await;
	create_mock.assert_async().await;
	get_mock.assert_async().await;
	delete_mock.assert_async().await;
}

#[tokio::test]
async fn batch_deletions_post_the_id_list() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let _token_mock = mock_gettoken(&server).await;
	let batch_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/cgi-bin/user/batchdelete")
				.query_param("access_token", ACCESS_TOKEN)
				.json_body(serde_json::json!({ "useridlist": ["zhangsan", "lisi"] }));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"errcode\":0,\"errmsg\":\"deleted\"}");
		})
		.await;
	let envelope = client
		.contacts()
		.delete_members(&[userid("zhangsan"), userid("lisi")])
		.await
		.expect("Batch removal should succeed.");

	assert!(envelope.is_ok());

	batch_mock.assert_async().await;
}

#[tokio::test]
async fn recursive_listing_renders_numeric_flags() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let _token_mock = mock_gettoken(&server).await;
	let list_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/cgi-bin/user/simplelist")
				.query_param("department_id", "2")
				.query_param("fetch_child", "1")
				.query_param("access_token", ACCESS_TOKEN);
			then.status(200).header("content-type", "application/json").body(
				"{\"errcode\":0,\"errmsg\":\"ok\",\"userlist\":[\
				 {\"userid\":\"zhangsan\",\"name\":\"Zhang San\",\"department\":[2]},\
				 {\"userid\":\"lisi\",\"name\":\"Li Si\",\"department\":[2,3]}]}",
			);
		})
		.await;
	let list = client
		.contacts()
		.simple_list(&MemberListFilter::department(2).recursive())
		.await
		.expect("Member listing should succeed.");

	assert_eq!(list.userlist.len(), 2);
	assert_eq!(list.userlist[0].userid.as_ref(), "zhangsan");
	assert_eq!(list.userlist[1].department, [2, 3]);

	list_mock.assert_async().await;
}

#[tokio::test]
async fn invitations_report_per_group_rejections() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let _token_mock = mock_gettoken(&server).await;
	let invite_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/cgi-bin/batch/invite")
				.query_param("access_token", ACCESS_TOKEN)
				.json_body(serde_json::json!({ "user": ["zhangsan", "ghost"], "party": ["2"] }));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"errcode\":0,\"errmsg\":\"ok\",\"invaliduser\":\"ghost\"}");
		})
		.await;
	let outcome = client
		.contacts()
		.invite(&Invitation::users(["zhangsan", "ghost"]).and_parties([2]))
		.await
		.expect("Batch invitation should succeed.");

	assert!(outcome.envelope.is_ok());
	assert_eq!(outcome.invaliduser, "ghost");
	assert!(outcome.invalidparty.is_empty());

	invite_mock.assert_async().await;
}

#[tokio::test]
async fn id_conversions_round_trip() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let _token_mock = mock_gettoken(&server).await;
	let to_openid_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/cgi-bin/user/convert_to_openid")
				.json_body(serde_json::json!({ "userid": "zhangsan" }));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"errcode\":0,\"errmsg\":\"ok\",\"openid\":\"oABCDEF\"}");
		})
		.await;
	let to_userid_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/cgi-bin/user/convert_to_userid")
				.json_body(serde_json::json!({ "openid": "oABCDEF" }));
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"errcode\":0,\"errmsg\":\"ok\",\"userid\":\"zhangsan\"}");
		})
		.await;
	let contacts = client.contacts();
	let conversion = contacts
		.to_openid(&userid("zhangsan"))
		.await
		.expect("The openid conversion should succeed.");

	assert_eq!(conversion.openid, "oABCDEF");

	let back = contacts
		.to_userid(&conversion.openid)
		.await
		.expect("The userid conversion should succeed.");

	assert_eq!(back.userid, "zhangsan");

	to_openid_mock.assert_async().await;
	to_userid_mock.assert_async().await;
}

#[tokio::test]
async fn second_verification_confirms_by_query() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let _token_mock = mock_gettoken(&server).await;
	let auth_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/cgi-bin/user/authsucc")
				.query_param("userid", "zhangsan")
				.query_param("access_token", ACCESS_TOKEN);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"errcode\":0,\"errmsg\":\"ok\"}");
		})
		.await;
	let envelope = client
		.contacts()
		.confirm_auth(&userid("zhangsan"))
		.await
		.expect("Verification confirmation should succeed.");

	assert!(envelope.is_ok());

	auth_mock.assert_async().await;
}
