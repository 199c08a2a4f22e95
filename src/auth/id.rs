//! Strongly typed identifiers enforced across the client domain.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

// The directory caps userids at 64 bytes; corp ids are shorter still.
const IDENTIFIER_MAX_LEN: usize = 64;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (corp, user).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (corp, user).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (corp, user).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { CorpId, "Unique identifier of one WeCom corp (enterprise).", "Corp" }
def_id! { UserId, "Unique identifier of one member inside a corp's directory.", "User" }

/// Numeric identifier of one application (agent) registered inside a corp.
#[derive(
	Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AgentId(pub i64);
impl AgentId {
	/// Returns the raw numeric value.
	pub const fn value(self) -> i64 {
		self.0
	}
}
impl From<i64> for AgentId {
	fn from(value: i64) -> Self {
		Self(value)
	}
}
impl Display for AgentId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}", self.0)
	}
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashMap;
	// self
	use super::*;

	#[test]
	fn identifiers_reject_whitespace() {
		assert!(CorpId::new(" ww1234").is_err(), "Leading whitespace must be rejected.");
		assert!(CorpId::new("ww1234 ").is_err(), "Trailing whitespace must be rejected.");

		let corp = CorpId::new("ww1234567890abcdef").expect("Corp fixture should be valid.");

		assert_eq!(corp.as_ref(), "ww1234567890abcdef");
		assert!(UserId::new("").is_err());
		assert!(UserId::new("zhang san").is_err());
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let payload = "\"zhangsan\"";
		let user: UserId =
			serde_json::from_str(payload).expect("User identifier should deserialize successfully.");

		assert_eq!(user.as_ref(), "zhangsan");
		assert!(serde_json::from_str::<UserId>("\"zhang san\"").is_err());
		assert!(serde_json::from_str::<UserId>("\" zhangsan\"").is_err());
	}

	#[test]
	fn unicode_whitespace_and_length_limits() {
		let nbsp = format!("zhang{}san", '\u{00A0}');

		assert!(UserId::new(&nbsp).is_err());

		let exact = "a".repeat(IDENTIFIER_MAX_LEN);

		UserId::new(&exact).expect("Exact length should succeed.");

		let too_long = "a".repeat(IDENTIFIER_MAX_LEN + 1);

		assert!(UserId::new(&too_long).is_err());
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<UserId, u8> = HashMap::from_iter([(
			UserId::new("zhangsan").expect("User identifier used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("zhangsan"), Some(&7));
	}

	#[test]
	fn agent_id_serializes_as_a_bare_number() {
		let agent = AgentId::from(1_000_002);

		assert_eq!(
			serde_json::to_string(&agent).expect("Agent identifier should serialize."),
			"1000002"
		);
		assert_eq!(agent.to_string(), "1000002");
		assert_eq!(agent.value(), 1_000_002);
	}
}
