//! JSON body encoding and path-annotated decoding.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::{ConfigError, DecodeError},
};

/// Encodes a request body as JSON bytes.
pub fn encode_json<B>(body: &B) -> Result<Vec<u8>, ConfigError>
where
	B: ?Sized + Serialize,
{
	serde_json::to_vec(body).map_err(|e| ConfigError::BodyEncode { source: e })
}

/// Decodes a JSON response body, annotating failures with the path that broke.
///
/// The optional HTTP status is attached to decode errors so a caller can tell a
/// malformed 200 apart from an HTML error page served with a 5xx.
pub fn decode_json<R>(bytes: &[u8], status: Option<u16>) -> Result<R, DecodeError>
where
	R: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|e| DecodeError { source: e, status })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::codec::Envelope;

	#[test]
	fn round_trips_an_envelope() {
		let bytes = encode_json(&Envelope { errcode: 0, errmsg: "ok".into() })
			.expect("Envelope should encode.");
		let envelope =
			decode_json::<Envelope>(&bytes, Some(200)).expect("Envelope should decode back.");

		assert!(envelope.is_ok());
	}

	#[test]
	fn unknown_fields_are_tolerated() {
		let envelope = decode_json::<Envelope>(
			br#"{"errcode":0,"errmsg":"ok","brand_new_field":{"nested":true}}"#,
			Some(200),
		)
		.expect("Unknown fields must not fail decoding.");

		assert!(envelope.is_ok());
	}

	#[test]
	fn malformed_bodies_report_status_and_path() {
		let err = decode_json::<Envelope>(br#"{"errcode":"not a number"}"#, Some(200))
			.expect_err("Mistyped field should fail decoding.");

		assert_eq!(err.status, Some(200));
		assert_eq!(err.source.path().to_string(), "errcode");
	}

	#[test]
	fn truncated_bodies_fail_cleanly() {
		decode_json::<Envelope>(br#"{"errcode":0,"#, Some(502))
			.expect_err("Truncated body should fail decoding.");
	}
}
