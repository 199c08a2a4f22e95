//! Token lifecycle: immutable records and the per-credential cache.

pub mod cache;
pub mod record;
