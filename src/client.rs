//! Client core: credential-bound dispatcher with lazy token acquisition.
//!
//! [`AgentClient`] resolves every call in three steps: acquire an access token from
//! the shared [`TokenCache`] (unless the call opts out), build the endpoint URL with
//! the ordered query string plus a trailing `access_token` parameter, then hand the
//! request to the [`ApiTransport`]. Typed endpoint surfaces live under [`crate::api`];
//! [`AgentClient::dispatch`] stays public for endpoints they do not cover yet.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	api::{AgentApi, ContactApi, DepartmentApi, MessageApi},
	auth::{ApiSecret, Credential, RefreshPolicy, TokenCache, TokenRecord},
	codec::{self, AsQuery, Envelope, Query},
	error::ConfigError,
	http::{ApiTransport, Method, RawRequest, RawResponse},
	obs::{self, CallKind, CallOutcome, CallSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

/// Default production API origin.
pub const DEFAULT_BASE_URL: &str = "https://qyapi.weixin.qq.com";

const PATH_GETTOKEN: &str = "/cgi-bin/gettoken";

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestAgentClient = AgentClient<ReqwestTransport>;

/// Asynchronous API client bound to one corp/agent credential.
///
/// The client owns its transport, credential, and token cache behind `Arc`s, so
/// cloning is cheap and every clone shares the same cached token. Tokens are fetched
/// lazily: nothing touches the authorization endpoint until the first authenticated
/// call, and concurrent callers piggy-back on one in-flight fetch instead of
/// stampeding it.
pub struct AgentClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Transport used for every outbound request.
	pub transport: Arc<T>,
	/// Corp/agent credential driving token acquisition.
	pub credential: Credential,
	/// Token cache shared by every clone of this client.
	pub token_cache: Arc<TokenCache>,
	base_url: Option<Url>,
	refresh_policy: RefreshPolicy,
	default_timeout: Option<StdDuration>,
}
impl<T> AgentClient<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(credential: Credential, transport: impl Into<Arc<T>>) -> Self {
		Self {
			transport: transport.into(),
			credential,
			token_cache: Default::default(),
			base_url: None,
			refresh_policy: RefreshPolicy::new(),
			default_timeout: None,
		}
	}

	/// Overrides the API base, e.g. for a regional gateway or a mock server. A path
	/// prefix on the base is kept ahead of every endpoint path.
	pub fn with_base_url(mut self, base_url: Url) -> Self {
		self.base_url = Some(base_url);

		self
	}

	/// Replaces the refresh policy applied to routine token acquisition.
	pub fn with_refresh_policy(mut self, policy: RefreshPolicy) -> Self {
		self.refresh_policy = policy;

		self
	}

	/// Sets a deadline applied to every call that does not carry its own.
	pub fn with_default_timeout(mut self, timeout: StdDuration) -> Self {
		self.default_timeout = Some(timeout);

		self
	}

	/// Contact directory operations.
	pub fn contacts(&self) -> ContactApi<'_, T> {
		ContactApi::new(self)
	}

	/// Department tree operations.
	pub fn departments(&self) -> DepartmentApi<'_, T> {
		DepartmentApi::new(self)
	}

	/// Application message delivery operations.
	pub fn messages(&self) -> MessageApi<'_, T> {
		MessageApi::new(self)
	}

	/// Agent (application) management operations.
	pub fn agents(&self) -> AgentApi<'_, T> {
		AgentApi::new(self)
	}

	/// Returns a usable access token, fetching or refreshing per the client policy.
	pub async fn access_token(&self) -> Result<ApiSecret> {
		self.token_with_policy(&self.refresh_policy).await
	}

	/// Forces a fresh token fetch, replacing whatever the cache holds.
	///
	/// Call this after the gateway reports a token-invalidation `errcode` (40014 or
	/// 42001); the next authenticated call then carries the replacement token.
	pub async fn refresh_access_token(&self) -> Result<ApiSecret> {
		let policy = self.refresh_policy.clone().with_force(true);

		self.token_with_policy(&policy).await
	}

	/// Executes a call and decodes its JSON response body into `R`.
	///
	/// The response envelope is decoded as part of `R` and passed through verbatim;
	/// a non-zero `errcode` on a domain endpoint is data, not an [`Error`].
	pub async fn execute<R>(&self, call: ApiCall) -> Result<R>
	where
		R: DeserializeOwned,
	{
		let kind = call.kind;
		let span = CallSpan::new(kind, call.path);

		obs::record_call_outcome(kind, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let response = self.dispatch(call).await?;

				codec::decode_json(&response.body, Some(response.status)).map_err(Error::from)
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(kind, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(kind, CallOutcome::Failure),
		}

		result
	}

	/// Resolves a call into a raw request and executes it without decoding the body.
	pub async fn dispatch(&self, call: ApiCall) -> Result<RawResponse> {
		let token = if call.needs_token { Some(self.access_token().await?) } else { None };
		let url = self.endpoint(call.path, &call.query, token.as_ref())?;
		let request = RawRequest {
			method: call.method,
			url,
			body: call.body,
			timeout: call.timeout.or(self.default_timeout),
		};

		self.transport.execute(request).await
	}

	async fn token_with_policy(&self, policy: &RefreshPolicy) -> Result<ApiSecret> {
		const KIND: CallKind = CallKind::Token;

		let span = CallSpan::new(KIND, PATH_GETTOKEN);

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let record = self.token_cache.acquire(policy, || self.fetch_token()).await?;

				Ok(record.access_token)
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}

	async fn fetch_token(&self) -> Result<TokenRecord> {
		let query = Query::new()
			.pair("corpid", self.credential.corp_id.as_ref())
			.pair("corpsecret", self.credential.secret.expose());
		let url = self.endpoint(PATH_GETTOKEN, &query, None)?;
		let response = self
			.transport
			.execute(RawRequest {
				method: Method::Get,
				url,
				body: None,
				timeout: self.default_timeout,
			})
			.await?;
		let token = codec::decode_json::<TokenResponse>(&response.body, Some(response.status))?;

		if !token.envelope.is_ok() {
			return Err(Error::Auth { code: token.envelope.errcode, message: token.envelope.errmsg });
		}

		let access_token = token.access_token.ok_or(ConfigError::MissingAccessToken)?;
		let expires_in = token.expires_in.ok_or(ConfigError::MissingExpiresIn)?;

		if expires_in <= 0 {
			return Err(ConfigError::NonPositiveExpiresIn { seconds: expires_in }.into());
		}

		TokenRecord::builder()
			.access_token(access_token)
			.issued_now()
			.expires_in(Duration::seconds(expires_in))
			.build()
			.map_err(|e| ConfigError::from(e).into())
	}

	fn endpoint(
		&self,
		path: &str,
		query: &Query,
		token: Option<&ApiSecret>,
	) -> Result<Url, ConfigError> {
		let mut url = self
			.base_url()?
			.join(path.trim_start_matches('/'))
			.map_err(|e| ConfigError::InvalidPath { path: path.into(), source: e })?;

		// An untouched query-pairs builder would leave a dangling `?` on the URL.
		if !(query.is_empty() && token.is_none()) {
			let mut pairs = url.query_pairs_mut();

			for (key, value) in query.iter() {
				pairs.append_pair(key, value);
			}
			if let Some(token) = token {
				pairs.append_pair("access_token", token.expose());
			}
		}

		Ok(url)
	}

	fn base_url(&self) -> Result<Url, ConfigError> {
		let mut url = if let Some(url) = &self.base_url {
			url.clone()
		} else {
			Url::parse(DEFAULT_BASE_URL)
				.map_err(|_| ConfigError::InvalidBaseUrl { url: DEFAULT_BASE_URL.into() })?
		};

		if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
			return Err(ConfigError::InvalidBaseUrl { url: url.as_str().to_owned() });
		}
		// `Url::join` resolves against the last `/`, so a path prefix survives only in
		// directory form.
		if !url.path().ends_with('/') {
			let path = format!("{}/", url.path());

			url.set_path(&path);
		}

		Ok(url)
	}
}
#[cfg(feature = "reqwest")]
impl AgentClient<ReqwestTransport> {
	/// Creates a client backed by the crate's default reqwest transport.
	///
	/// The client provisions its own [`ReqwestTransport`] so callers do not need to
	/// pass HTTP handles explicitly. Use [`AgentClient::with_transport`] to supply a
	/// preconfigured transport instead.
	pub fn new(credential: Credential) -> Self {
		Self::with_transport(credential, ReqwestTransport::default())
	}
}
impl<T> Clone for AgentClient<T>
where
	T: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self {
			transport: self.transport.clone(),
			credential: self.credential.clone(),
			token_cache: self.token_cache.clone(),
			base_url: self.base_url.clone(),
			refresh_policy: self.refresh_policy.clone(),
			default_timeout: self.default_timeout,
		}
	}
}
impl<T> Debug for AgentClient<T>
where
	T: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AgentClient")
			.field("credential", &self.credential)
			.field("base_url", &self.base_url)
			.field("refresh_policy", &self.refresh_policy)
			.field("default_timeout", &self.default_timeout)
			.finish()
	}
}

/// Description of one API call, consumed by [`AgentClient::execute`].
///
/// Calls carry an `access_token` parameter by default; only the token fetch itself
/// opts out through [`ApiCall::unauthenticated`].
#[derive(Clone, Debug)]
pub struct ApiCall {
	/// API surface the call belongs to, used for span and metric labels.
	pub kind: CallKind,
	/// HTTP method.
	pub method: Method,
	/// Endpoint path below the API origin.
	pub path: &'static str,
	/// Ordered query parameters preceding the `access_token` parameter.
	pub query: Query,
	/// Pre-encoded JSON body for `POST` calls.
	pub body: Option<Vec<u8>>,
	/// Whether an `access_token` parameter is appended to the URL.
	pub needs_token: bool,
	/// Per-call deadline overriding the client default.
	pub timeout: Option<StdDuration>,
}
impl ApiCall {
	/// Starts a `GET` call description.
	pub fn get(kind: CallKind, path: &'static str) -> Self {
		Self::new(kind, Method::Get, path)
	}

	/// Starts a `POST` call description.
	pub fn post(kind: CallKind, path: &'static str) -> Self {
		Self::new(kind, Method::Post, path)
	}

	fn new(kind: CallKind, method: Method, path: &'static str) -> Self {
		Self { kind, method, path, query: Query::new(), body: None, needs_token: true, timeout: None }
	}

	/// Replaces the ordered query parameters.
	pub fn query(mut self, query: impl AsQuery) -> Self {
		self.query = query.as_query();

		self
	}

	/// Attaches a JSON body, serializing eagerly so failures surface before dispatch.
	pub fn json<B>(mut self, body: &B) -> Result<Self, ConfigError>
	where
		B: ?Sized + Serialize,
	{
		self.body = Some(codec::encode_json(body)?);

		Ok(self)
	}

	/// Drops the `access_token` parameter from the call.
	pub fn unauthenticated(mut self) -> Self {
		self.needs_token = false;

		self
	}

	/// Sets a per-call deadline overriding the client default.
	pub fn timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = Some(timeout);

		self
	}
}

/// Authorization endpoint response shape.
#[derive(Debug, Deserialize)]
struct TokenResponse {
	#[serde(flatten)]
	envelope: Envelope,
	#[serde(default)]
	access_token: Option<String>,
	#[serde(default)]
	expires_in: Option<i64>,
}
