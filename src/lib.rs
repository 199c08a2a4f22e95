//! Typed async client for the WeCom (WeChat Work) enterprise HTTP API - lazy token caching,
//! ordered query codecs, and a transport-aware error taxonomy in one embeddable crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod client;
pub mod codec;
pub mod error;
pub mod http;
pub mod obs;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{AgentId, ApiSecret, CorpId, Credential},
		client::AgentClient,
		http::ReqwestTransport,
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = AgentClient<ReqwestTransport>;

	/// Builds a credential triple from plain strings, panicking on invalid fixtures.
	pub fn test_credential(corp_id: &str, corp_secret: &str, agent_id: i64) -> Credential {
		Credential::new(
			CorpId::new(corp_id).expect("Corp identifier fixture should be valid."),
			ApiSecret::new(corp_secret),
			AgentId::from(agent_id),
		)
	}

	/// Constructs an [`AgentClient`] aimed at a mock server origin, backed by the default
	/// reqwest transport used across integration tests.
	pub fn build_reqwest_test_client(
		base_url: &str,
		corp_id: &str,
		corp_secret: &str,
		agent_id: i64,
	) -> ReqwestTestClient {
		let base_url = Url::parse(base_url).expect("Mock server origin should parse successfully.");

		AgentClient::new(test_credential(corp_id, corp_secret, agent_id)).with_base_url(base_url)
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
