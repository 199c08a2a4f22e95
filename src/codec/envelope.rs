//! Standard `errcode`/`errmsg` response envelope.

// self
use crate::_prelude::*;

/// Envelope carried by every API response body.
///
/// `errcode` zero means success; any other value is a gateway-reported failure whose
/// code and message are passed through to the caller verbatim. Both fields default so
/// the envelope also decodes from bodies that omit them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
	/// Gateway status code, `0` on success.
	#[serde(default)]
	pub errcode: i64,
	/// Human-readable gateway message, usually `"ok"` on success.
	#[serde(default)]
	pub errmsg: String,
}
impl Envelope {
	/// Returns true when the gateway reported success.
	pub fn is_ok(&self) -> bool {
		self.errcode == 0
	}
}
impl Display for Envelope {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "errcode {}: {}", self.errcode, self.errmsg)
	}
}
