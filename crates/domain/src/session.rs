//! Session model: a time-bounded credential binding a user to a tenant.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

/// Stored lifecycle status of a session row.
///
/// A closed set. There is no "expired" status: expiry is derived from
/// `expires_at` at validation time, never stored. Unrecognized strings are
/// rejected at parse time, never defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Valid,
    Invalid,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "valid" => Ok(Self::Valid),
            "invalid" => Ok(Self::Invalid),
            other => Err(Error::InvalidStatus(other.to_owned())),
        }
    }
}

/// A single authentication session row.
///
/// `id` is the opaque generated token and primary identity; `user_id` and
/// `tenant_id` are immutable after creation. Rows are never deleted here,
/// only status-transitioned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub occurred_at: DateTime<Utc>,
    /// Last-activity stamp. Advisory only; validity checks never read it.
    pub last_event: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub status: SessionStatus,
}

impl Session {
    /// Build a freshly issued session: valid as of `now`, expiring after
    /// `ttl`.
    pub fn issue(
        id: String,
        user_id: Uuid,
        tenant_id: Uuid,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            id,
            user_id,
            tenant_id,
            occurred_at: now,
            last_event: now,
            expires_at: now + ttl,
            status: SessionStatus::Valid,
        }
    }

    /// Whether this session is usable for authentication at `now`.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.status == SessionStatus::Valid && now < self.expires_at
    }
}

/// The authenticated principal a valid session resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
}
