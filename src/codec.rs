//! Wire codecs: ordered query strings, JSON bodies, and the response envelope.

pub mod envelope;
pub mod json;
pub mod query;

pub use envelope::*;
pub use json::*;
pub use query::*;
