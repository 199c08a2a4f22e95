//! Transport primitives for API calls.
//!
//! The module exposes [`ApiTransport`] so downstream crates can integrate custom HTTP
//! stacks, plus the [`RawRequest`]/[`RawResponse`] pair the dispatcher speaks to them
//! with. Implementations classify their failures into the crate's error taxonomy:
//! deadline overruns become [`TransientError::Timeout`](crate::error::TransientError)
//! and remain retryable, everything else at the connection level becomes
//! [`TransportError::Network`](crate::error::TransportError).

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::CONTENT_TYPE;
use url::Position;
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::{TransientError, TransportError};

/// HTTP methods used by the API surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET` request; parameters travel in the query string.
	Get,
	/// `POST` request; parameters travel as a JSON body.
	Post,
}
impl Method {
	/// Returns the canonical uppercase method name.
	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully-resolved request handed to the transport.
///
/// The URL already carries the ordered query string and the `access_token` parameter;
/// transports must send it verbatim without re-encoding or reordering. The `Debug`
/// rendering replaces the `corpsecret` and `access_token` query values with
/// `<redacted>` so transports can log the request they received.
#[derive(Clone)]
pub struct RawRequest {
	/// HTTP method to use.
	pub method: Method,
	/// Absolute request URL including the encoded query string.
	pub url: Url,
	/// JSON body bytes for `POST` requests.
	pub body: Option<Vec<u8>>,
	/// Per-request deadline; `None` leaves the transport's own default in force.
	pub timeout: Option<StdDuration>,
}
impl Debug for RawRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RawRequest")
			.field("method", &self.method)
			.field("url", &redact_url(&self.url))
			.field("body_len", &self.body.as_ref().map(Vec::len))
			.field("timeout", &self.timeout)
			.finish()
	}
}

/// Raw response returned by the transport.
#[derive(Clone, Debug)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}

/// Boxed future returned by [`ApiTransport::execute`].
pub type TransportFuture = Pin<Box<dyn Future<Output = Result<RawResponse>> + Send>>;

/// Abstraction over HTTP transports capable of executing API calls.
///
/// The trait is the crate's only dependency on an HTTP stack. Callers provide an
/// implementation (typically behind `Arc<T>` where `T: ApiTransport`) and the
/// dispatcher hands it fully-resolved requests. Implementations must be
/// `Send + Sync + 'static` so one client can be shared across tasks, and the futures
/// they return must own whatever state they need so they stay `Send` for the lifetime
/// of the in-flight call.
pub trait ApiTransport
where
	Self: 'static + Send + Sync,
{
	/// Executes one request, classifying transport failures into the crate taxonomy.
	fn execute(&self, request: RawRequest) -> TransportFuture;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Request bodies are always JSON, so the wrapper sets `Content-Type` itself; callers
/// supplying a custom [`ReqwestClient`] only need to configure connection concerns
/// such as proxies, TLS roots, or a global timeout.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl ApiTransport for ReqwestTransport {
	fn execute(&self, request: RawRequest) -> TransportFuture {
		let client = self.0.clone();

		Box::pin(async move {
			let path = request.url.path().to_owned();
			let mut builder = match request.method {
				Method::Get => client.get(request.url),
				Method::Post => client.post(request.url),
			};

			if let Some(timeout) = request.timeout {
				builder = builder.timeout(timeout);
			}
			if let Some(body) = request.body {
				builder = builder.header(CONTENT_TYPE, "application/json").body(body);
			}

			let response = builder.send().await.map_err(|e| classify(&path, e))?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(|e| classify(&path, e))?.to_vec();

			Ok(RawResponse { status, body })
		})
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

fn redact_url(url: &Url) -> String {
	let query = url
		.query_pairs()
		.map(|(key, value)| {
			if matches!(&*key, "corpsecret" | "access_token") {
				format!("{key}=<redacted>")
			} else {
				format!("{key}={value}")
			}
		})
		.collect::<Vec<_>>()
		.join("&");

	if query.is_empty() {
		url[..Position::AfterPath].to_owned()
	} else {
		format!("{}?{query}", &url[..Position::AfterPath])
	}
}

#[cfg(feature = "reqwest")]
fn classify(path: &str, e: ReqwestError) -> Error {
	if e.is_timeout() {
		TransientError::Timeout { path: path.into() }.into()
	} else {
		TransportError::network(path, e).into()
	}
}
