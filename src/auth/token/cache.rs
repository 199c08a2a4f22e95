//! Per-credential token cache with early refresh and singleflight population.

// self
use crate::{_prelude::*, auth::token::record::TokenRecord};

/// Refresh decision policy evaluated against a cached record.
///
/// A record is due for refetch when it is expired at the evaluation instant or inside
/// the early-refresh window before its expiry; a missing record always triggers a
/// fetch. `force` bypasses the cache entirely for one acquisition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefreshPolicy {
	/// Forces cache bypass when true.
	pub force: bool,
	/// Early-refresh window before expiry (zero disables early refresh).
	pub early_window: Duration,
}
impl RefreshPolicy {
	const DEFAULT_EARLY_WINDOW: Duration = Duration::seconds(60);

	/// Creates the default policy: 60-second early-refresh window, no force.
	pub fn new() -> Self {
		Self { force: false, early_window: Self::DEFAULT_EARLY_WINDOW }
	}

	/// Forces the next acquisition to bypass the cache.
	pub fn force_refresh(mut self) -> Self {
		self.force = true;

		self
	}

	/// Overrides the force flag.
	pub fn with_force(mut self, force: bool) -> Self {
		self.force = force;

		self
	}

	/// Overrides the early-refresh window (negative values clamp to zero).
	pub fn with_early_window(mut self, window: Duration) -> Self {
		self.early_window = if window.is_negative() { Duration::ZERO } else { window };

		self
	}

	/// Determines whether the cached record should be refreshed at `now`.
	pub fn should_refresh(&self, record: &TokenRecord, now: OffsetDateTime) -> bool {
		if self.force || record.is_expired_at(now) {
			return true;
		}
		if self.early_window.is_zero() {
			return false;
		}

		record.remaining_at(now) <= self.early_window
	}
}
impl Default for RefreshPolicy {
	fn default() -> Self {
		Self::new()
	}
}

/// Thread-safe slot holding the single token record for one credential.
///
/// Reads go through a reader/writer lock, so a populated cache costs one read lock per
/// call; population is serialized by an async mutex, so concurrent callers piggy-back
/// on one in-flight fetch instead of stampeding the authorization endpoint.
#[derive(Debug, Default)]
pub struct TokenCache {
	current: RwLock<Option<TokenRecord>>,
	refresh_guard: AsyncMutex<()>,
}
impl TokenCache {
	/// Creates an empty cache.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a clone of the cached record without any freshness evaluation.
	pub fn peek(&self) -> Option<TokenRecord> {
		self.current.read().clone()
	}

	/// Replaces the cached record.
	pub fn store(&self, record: TokenRecord) {
		*self.current.write() = Some(record);
	}

	/// Drops the cached record so the next acquisition fetches anew.
	pub fn clear(&self) {
		*self.current.write() = None;
	}

	/// Returns a usable record, invoking `fetch` only when the policy demands it.
	///
	/// The policy is re-evaluated after the singleflight guard is acquired, so callers
	/// queued behind an in-flight fetch reuse its stored result instead of fetching
	/// again. A failed fetch leaves the cache untouched.
	pub async fn acquire<F, Fut>(&self, policy: &RefreshPolicy, fetch: F) -> Result<TokenRecord>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<TokenRecord>>,
	{
		if let Some(current) = self.usable(policy, OffsetDateTime::now_utc()) {
			return Ok(current);
		}

		let _singleflight = self.refresh_guard.lock().await;

		if let Some(current) = self.usable(policy, OffsetDateTime::now_utc()) {
			return Ok(current);
		}

		let record = fetch().await?;

		self.store(record.clone());

		Ok(record)
	}

	fn usable(&self, policy: &RefreshPolicy, now: OffsetDateTime) -> Option<TokenRecord> {
		self.current.read().as_ref().filter(|record| !policy.should_refresh(record, now)).cloned()
	}
}
