//! Application credentials and their stable fingerprints.

// std
use std::sync::OnceLock;
// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::{
	_prelude::*,
	auth::{AgentId, ApiSecret, CorpId},
};

/// Identity of one WeCom application: corp id, per-agent secret, and agent id.
///
/// Immutable after construction. The secret never appears in `Debug` output; the
/// [`fingerprint`](Self::fingerprint) helper lazily caches a base64 (no padding) SHA-256
/// digest over the full triple as a loggable identity string instead. Two credentials
/// differing in any component produce different fingerprints and must never share a
/// cached token.
pub struct Credential {
	/// Corp identifier.
	pub corp_id: CorpId,
	/// Per-agent API secret used to mint access tokens.
	pub secret: ApiSecret,
	/// Numeric agent identifier.
	pub agent_id: AgentId,
	fingerprint_cache: OnceLock<String>,
}
impl Credential {
	/// Creates a credential for one agent.
	pub fn new(corp_id: CorpId, secret: ApiSecret, agent_id: AgentId) -> Self {
		Self { corp_id, secret, agent_id, fingerprint_cache: OnceLock::new() }
	}

	/// Stable fingerprint derived from the full credential triple.
	///
	/// The fingerprint is a base64 (no padding) encoding of the SHA-256 digest over the
	/// corp id, agent id, and secret, and is cached after the first calculation.
	pub fn fingerprint(&self) -> String {
		self.fingerprint_cache.get_or_init(|| compute_fingerprint(self)).clone()
	}
}
impl Clone for Credential {
	fn clone(&self) -> Self {
		Self {
			corp_id: self.corp_id.clone(),
			secret: self.secret.clone(),
			agent_id: self.agent_id,
			fingerprint_cache: OnceLock::new(),
		}
	}
}
impl PartialEq for Credential {
	fn eq(&self, other: &Self) -> bool {
		self.corp_id == other.corp_id
			&& self.secret == other.secret
			&& self.agent_id == other.agent_id
	}
}
impl Eq for Credential {}
impl Debug for Credential {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credential")
			.field("corp_id", &self.corp_id)
			.field("agent_id", &self.agent_id)
			.field("secret", &"<redacted>")
			.field("fingerprint", &self.fingerprint())
			.finish()
	}
}

fn compute_fingerprint(credential: &Credential) -> String {
	let mut hasher = Sha256::new();

	hasher.update(credential.corp_id.as_ref().as_bytes());
	hasher.update([0x1f]);
	hasher.update(credential.agent_id.value().to_be_bytes());
	hasher.update([0x1f]);
	hasher.update(credential.secret.expose().as_bytes());

	let digest = hasher.finalize();

	STANDARD_NO_PAD.encode(digest)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn credential(corp: &str, secret: &str, agent: i64) -> Credential {
		Credential::new(
			CorpId::new(corp).expect("Corp fixture should be valid."),
			ApiSecret::new(secret),
			AgentId::from(agent),
		)
	}

	#[test]
	fn fingerprints_differ_per_component() {
		let base = credential("ww-corp", "secret-a", 1);

		assert_ne!(base.fingerprint(), credential("ww-corp", "secret-b", 1).fingerprint());
		assert_ne!(base.fingerprint(), credential("ww-other", "secret-a", 1).fingerprint());
		assert_ne!(base.fingerprint(), credential("ww-corp", "secret-a", 2).fingerprint());
	}

	#[test]
	fn fingerprint_is_cached_and_stable() {
		let credential = credential("ww-corp", "secret-a", 1);
		let first = credential.fingerprint();
		let second = credential.fingerprint();

		assert_eq!(first, second);
		assert_eq!(first, credential.clone().fingerprint(), "Clones must fingerprint equally.");
	}

	#[test]
	fn debug_redacts_the_secret() {
		let credential = credential("ww-corp", "super-secret", 7);
		let rendered = format!("{credential:?}");

		assert!(!rendered.contains("super-secret"));
		assert!(rendered.contains("<redacted>"));
		assert!(rendered.contains("ww-corp"));
	}

	#[test]
	fn equality_ignores_the_fingerprint_cache() {
		let lhs = credential("ww-corp", "secret", 3);
		let rhs = credential("ww-corp", "secret", 3);

		lhs.fingerprint();

		assert_eq!(lhs, rhs);
	}
}
