//! Client-level error types shared across the codec, token cache, and dispatcher.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn StdError + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Temporary upstream failure; retry with backoff.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body could not be decoded into the requested type.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// Authorization endpoint rejected the credential (non-zero `errcode`).
	///
	/// Domain calls never produce this variant; their envelopes pass through to the
	/// caller untouched. Only the token fetch consumes its own envelope.
	#[error("Authorization endpoint rejected the credential: errcode {code}, {message}.")]
	Auth {
		/// Verbatim `errcode` returned by the endpoint.
		code: i64,
		/// Verbatim `errmsg` returned by the endpoint.
		message: String,
	},
}
impl Error {
	/// Returns `true` when retrying the same call later may succeed.
	///
	/// Only the transient class qualifies; hard transport failures, decode failures,
	/// and credential rejections need caller intervention first.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::Transient(_))
	}
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL must be an absolute http(s) origin.
	#[error("Base URL must be an absolute http(s) origin, got `{url}`.")]
	InvalidBaseUrl {
		/// Offending URL string.
		url: String,
	},
	/// Endpoint path cannot be resolved against the base URL.
	#[error("Endpoint path `{path}` cannot be resolved against the base URL.")]
	InvalidPath {
		/// Offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request body failed to serialize to JSON.
	#[error("Request body could not be serialized to JSON.")]
	BodyEncode {
		/// Underlying serialization failure.
		#[source]
		source: serde_json::Error,
	},

	/// Token record builder validation failed.
	#[error("Unable to build token record.")]
	TokenBuild(#[from] crate::auth::TokenRecordBuilderError),
	/// Authorization endpoint response omitted `access_token`.
	#[error("Authorization endpoint response is missing access_token.")]
	MissingAccessToken,
	/// Authorization endpoint response omitted `expires_in`.
	#[error("Authorization endpoint response is missing expires_in.")]
	MissingExpiresIn,
	/// Authorization endpoint returned a non-positive token lifetime.
	#[error("The expires_in value must be a positive number of seconds, got {seconds}.")]
	NonPositiveExpiresIn {
		/// Value reported by the endpoint.
		seconds: i64,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// The HTTP request exceeded its deadline.
	#[error("Request to `{path}` timed out.")]
	Timeout {
		/// Endpoint path of the timed-out call.
		path: String,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling `{path}`.")]
	Network {
		/// Endpoint path of the failed call.
		path: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the remote service.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(path: impl Into<String>, src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { path: path.into(), source: Box::new(src) }
	}
}

/// Decoding failure for a JSON response body.
///
/// Carries the serde path of the offending field plus the HTTP status of the response
/// so callers can tell a mangled payload from an upstream HTML error page.
#[derive(Debug, ThisError)]
#[error("Response body is not valid JSON for the requested type.")]
pub struct DecodeError {
	/// Structured parsing failure with the offending field path.
	#[source]
	pub source: serde_path_to_error::Error<serde_json::Error>,
	/// HTTP status code of the response, when available.
	pub status: Option<u16>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn retryable_covers_only_the_transient_class() {
		let timeout: Error = TransientError::Timeout { path: "/cgi-bin/user/get".into() }.into();
		let auth = Error::Auth { code: 40013, message: "invalid corpid".into() };
		let network: Error = TransportError::network(
			"/cgi-bin/user/get",
			std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"),
		)
		.into();

		assert!(timeout.is_retryable());
		assert!(!auth.is_retryable());
		assert!(!network.is_retryable());
	}

	#[test]
	fn auth_error_carries_verbatim_code_and_message() {
		let err = Error::Auth { code: 40001, message: "invalid credential".into() };
		let rendered = err.to_string();

		assert!(rendered.contains("40001"));
		assert!(rendered.contains("invalid credential"));
	}
}
