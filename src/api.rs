//! Typed endpoint surfaces grouped by API area.
//!
//! Each surface borrows an [`AgentClient`](crate::client::AgentClient) and translates
//! its calls into [`ApiCall`](crate::client::ApiCall) descriptions, so token caching,
//! URL construction, and instrumentation stay in one place. Response types embed the
//! gateway envelope verbatim; a non-zero `errcode` from a domain endpoint is returned
//! as data for the caller to inspect.

pub mod agent;
pub mod contact;
pub mod department;
pub mod message;

pub use agent::*;
pub use contact::*;
pub use department::*;
pub use message::*;
