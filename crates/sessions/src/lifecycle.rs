//! The session lifecycle state machine.
//!
//! Two stored states, `valid` and `invalid`. Expiry is not a third state:
//! it is a predicate over `expires_at` evaluated at validation time, so no
//! background sweep exists and stale rows simply stop validating. Rows are
//! only ever status-transitioned, never deleted here.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use tc_domain::config::SessionsConfig;
use tc_domain::error::{Error, Result};
use tc_domain::session::{Principal, Session, SessionStatus};
use tc_domain::trace::TraceEvent;
use tc_storage::UnitOfWork;

use crate::store;
use crate::token::{self, TokenDigest};

/// Issues, validates, and transitions sessions inside a caller-held unit of
/// work. The caller owns commit and rollback, which is what lets a session
/// create compose atomically with other writes.
pub struct SessionLifecycle {
    config: SessionsConfig,
}

impl SessionLifecycle {
    pub fn new(config: SessionsConfig) -> Self {
        Self { config }
    }

    /// Issue a new session for `user_id` under `tenant_id`.
    ///
    /// The token is generated, never caller-supplied. A store-level failure
    /// (including a token collision) propagates unchanged; no retry here.
    pub fn create(
        &self,
        uow: &UnitOfWork<'_>,
        user_id: Uuid,
        tenant_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Session> {
        let id = token::generate(self.config.token_bytes, Some(TokenDigest::Sha256))?;
        let session = Session::issue(id, user_id, tenant_id, now, self.config.ttl());
        store::insert(uow, &session)?;

        TraceEvent::SessionIssued {
            user_id: user_id.to_string(),
            tenant_id: tenant_id.to_string(),
            expires_at: session.expires_at.to_rfc3339(),
        }
        .emit();

        Ok(session)
    }

    /// Resolve a presented token to its principal.
    ///
    /// Missing, revoked, and expired sessions all fail with
    /// `SessionNotFound`; an unauthenticated caller learns nothing about
    /// which it was.
    pub fn validate(
        &self,
        uow: &UnitOfWork<'_>,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<Principal> {
        store::find_valid_by_id(uow, token, now)?.ok_or(Error::SessionNotFound)
    }

    /// Set one session to `status`, whatever its current status. Either
    /// direction is allowed; revocation policy lives with the caller.
    pub fn transition(
        &self,
        uow: &UnitOfWork<'_>,
        token: &str,
        status: SessionStatus,
    ) -> Result<()> {
        let affected = store::update_status(uow, token, status)?;
        TraceEvent::SessionsTransitioned {
            affected,
            status: status.to_string(),
        }
        .emit();
        Ok(())
    }

    /// Set every session in `tokens` to `status` in one atomic statement.
    /// All rows in the set are affected or the store fails; there is no
    /// partial outcome.
    pub fn bulk_transition(
        &self,
        uow: &UnitOfWork<'_>,
        tokens: &[String],
        status: SessionStatus,
    ) -> Result<usize> {
        let affected = store::bulk_update_status(uow, tokens, status)?;
        TraceEvent::SessionsTransitioned {
            affected,
            status: status.to_string(),
        }
        .emit();
        Ok(affected)
    }

    /// Every session owned by `user_id` currently in `status`, in store
    /// order.
    pub fn list_by_owner(
        &self,
        uow: &UnitOfWork<'_>,
        user_id: Uuid,
        status: SessionStatus,
    ) -> Result<Vec<Session>> {
        store::list_by_user(uow, user_id, status)
    }

    /// Stamp last activity on a session. Advisory only; the TTL window is
    /// fixed at creation and does not slide.
    pub fn record_activity(
        &self,
        uow: &UnitOfWork<'_>,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        store::touch(uow, token, now)?;
        Ok(())
    }
}
