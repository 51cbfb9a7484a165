//! Signed client-side login sessions.
//!
//! Nothing is stored on the server. The browser holds
//! `<user>.<expires>.<mac>` in the [`SESSION_COOKIE`] cookie: the display name
//! in URL-safe base64, the expiry as a Unix timestamp, and an HMAC-SHA256 of
//! the first two fields keyed with the configured secret, hex encoded. A
//! cookie whose MAC does not match, or whose expiry has passed, is ignored.
//! Sessions survive restarts as long as the secret is unchanged.

use std::time::Duration;

use axum::http::{HeaderMap, header};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::debug;

pub const SESSION_COOKIE: &str = "coach_session";

/// SHA-256 block size in bytes.
const BLOCK_SIZE: usize = 64;

/// One logged-in browser, as decoded from its cookie.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    /// Display name entered at login.
    pub user: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Issues and verifies session cookies.
pub struct SessionSigner {
    secret: Vec<u8>,
    ttl: Duration,
}

impl std::fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionSigner(ttl {:?})", self.ttl)
    }
}

impl SessionSigner {
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self { secret: secret.into().into_bytes(), ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Signed cookie value for a session of `user` starting now.
    pub fn create(&self, user: &str) -> String {
        let expires_at = chrono::Duration::from_std(self.ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        let payload = format!("{}.{}", URL_SAFE_NO_PAD.encode(user), expires_at.timestamp());
        let mac = hex::encode(self.mac(&payload));
        format!("{payload}.{mac}")
    }

    /// Decode a cookie value into its live session.
    ///
    /// Returns `None` for a malformed value, a MAC mismatch or an expired
    /// session.
    pub fn lookup(&self, cookie: &str) -> Option<SessionRecord> {
        let (payload, mac) = cookie.rsplit_once('.')?;
        let mac = hex::decode(mac).ok()?;
        if !constant_time_eq(&mac, &self.mac(payload)) {
            debug!("session cookie signature mismatch");
            return None;
        }

        let (user, expires) = payload.split_once('.')?;
        let user = String::from_utf8(URL_SAFE_NO_PAD.decode(user).ok()?).ok()?;
        let expires_at = DateTime::from_timestamp(expires.parse().ok()?, 0)?;

        let record = SessionRecord { user, expires_at };
        if record.is_expired(Utc::now()) {
            debug!(expires_at = %record.expires_at, "session cookie expired");
            return None;
        }
        Some(record)
    }

    fn mac(&self, payload: &str) -> Vec<u8> {
        hmac_sha256(&self.secret, payload.as_bytes())
    }
}

/// HMAC-SHA256 (RFC 2104).
fn hmac_sha256(key: &[u8], message: &[u8]) -> Vec<u8> {
    let mut block = [0u8; BLOCK_SIZE];
    if key.len() > BLOCK_SIZE {
        let digest = Sha256::digest(key).to_vec();
        block[..digest.len()].copy_from_slice(&digest);
    } else {
        block[..key.len()].copy_from_slice(key);
    }

    let ipad: Vec<u8> = block.iter().map(|b| b ^ 0x36).collect();
    let opad: Vec<u8> = block.iter().map(|b| b ^ 0x5c).collect();

    let inner = Sha256::new().chain_update(&ipad).chain_update(message).finalize().to_vec();
    Sha256::new().chain_update(&opad).chain_update(&inner).finalize().to_vec()
}

/// Compare without short-circuiting on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

// ── Cookie helpers ───────────────────────────────────────────────────────────

/// Value of the session cookie in the request's `Cookie` headers.
pub fn session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

/// `Set-Cookie` value that stores `value` for `ttl`.
pub fn set_cookie(value: &str, ttl: Duration) -> String {
    format!(
        "{SESSION_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        ttl.as_secs()
    )
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

// ── Tests ──────────────────────────────────────────────────────────────────────
