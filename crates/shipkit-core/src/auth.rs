//! Bearer-token lifetime tracking for carriers that authenticate with a
//! client-credentials exchange.
//!
//! Expiry is decided locally from the issue time and the declared lifetime.
//! Carriers send no invalidation signal, so a token inside its lifetime is
//! reused without asking the server again.

use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use tracing::debug;

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct AccessToken {
    value: String,
    issued_at: DateTime<Utc>,
    /// Lifetime in seconds.
    expires_in: u64,
}

impl AccessToken {
    #[must_use]
    pub fn new(value: impl Into<String>, issued_at: DateTime<Utc>, expires_in: u64) -> Self {
        Self {
            value: value.into(),
            issued_at,
            expires_in,
        }
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub const fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    #[must_use]
    pub const fn expires_in(&self) -> u64 {
        self.expires_in
    }

    /// First instant at which the token is no longer usable.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        i64::try_from(self.expires_in)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|lifetime| self.issued_at.checked_add_signed(lifetime))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at()
    }

    #[must_use]
    pub fn state_at(&self, now: DateTime<Utc>) -> TokenState {
        if self.is_valid_at(now) {
            TokenState::TokenValid
        } else {
            TokenState::TokenExpired
        }
    }
}

impl Debug for AccessToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenState {
    NoToken,
    TokenRequested,
    TokenValid,
    TokenExpired,
}

/// Cached token for one credential set.
///
/// At most one refresh runs at a time. Callers that find the token expired
/// while another refresh is in flight wait for it and reuse its result.
#[derive(Debug, Default)]
pub struct TokenCache {
    token: Mutex<Option<AccessToken>>,
    refresh: Mutex<()>,
    refreshing: AtomicBool,
}

impl TokenCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_at(&self, now: DateTime<Utc>) -> TokenState {
        if self.refreshing.load(Ordering::Acquire) {
            return TokenState::TokenRequested;
        }
        match self.lock_token().as_ref() {
            Some(token) => token.state_at(now),
            None => TokenState::NoToken,
        }
    }

    /// The cached token if it is still valid at `now`, without refreshing.
    pub fn cached_at(&self, now: DateTime<Utc>) -> Option<AccessToken> {
        self.lock_token()
            .as_ref()
            .filter(|token| token.is_valid_at(now))
            .cloned()
    }

    pub fn token<E>(
        &self,
        fetch: impl FnOnce() -> Result<AccessToken, E>,
    ) -> Result<AccessToken, E> {
        self.token_at(Utc::now(), fetch)
    }

    /// Returns the cached token when valid at `now`; otherwise calls `fetch`
    /// and caches what it returns. A failed fetch leaves the cache as it was.
    pub fn token_at<E>(
        &self,
        now: DateTime<Utc>,
        fetch: impl FnOnce() -> Result<AccessToken, E>,
    ) -> Result<AccessToken, E> {
        if let Some(token) = self.cached_at(now) {
            return Ok(token);
        }

        let _refresh = self.refresh.lock().unwrap_or_else(PoisonError::into_inner);
        // A refresh that finished while we waited already produced our token.
        if let Some(token) = self.cached_at(now) {
            return Ok(token);
        }

        let fetched = {
            let _requested = RequestedFlag::raise(&self.refreshing);
            fetch()
        };
        let token = fetched?;
        debug!(
            issued_at = %token.issued_at,
            expires_in = token.expires_in,
            "cached new access token"
        );
        *self.lock_token() = Some(token.clone());
        Ok(token)
    }

    /// Drops the cached token; the next call fetches a new one.
    pub fn clear(&self) {
        *self.lock_token() = None;
    }

    fn lock_token(&self) -> std::sync::MutexGuard<'_, Option<AccessToken>> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Marks a fetch as in flight until dropped, including on unwind.
struct RequestedFlag<'a>(&'a AtomicBool);

impl<'a> RequestedFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for RequestedFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
