//! Session row operations.
//!
//! Every function takes the caller's `UnitOfWork` and issues parameterized
//! statements through it; nothing here opens, commits, or retries
//! transactions.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, ToSql};
use uuid::Uuid;

use tc_domain::error::{Error, Result};
use tc_domain::session::{Principal, Session, SessionStatus};
use tc_storage::UnitOfWork;

/// Insert a freshly issued session row.
///
/// A primary-key collision on the token surfaces as `Error::Persistence`;
/// whether to retry with a new token is the caller's decision.
pub fn insert(uow: &UnitOfWork<'_>, session: &Session) -> Result<()> {
    uow.tx()
        .execute(
            "INSERT INTO sessions
                 (id, user_id, tenant_id, occurred_at, last_event, expires_at, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                session.id,
                session.user_id,
                session.tenant_id,
                session.occurred_at,
                session.last_event,
                session.expires_at,
                session.status.as_str(),
            ],
        )
        .map_err(|err| Error::Persistence(err.to_string()))?;
    Ok(())
}

/// Point query behind validation: the row must exist, carry `valid` status,
/// and not be past its expiry instant at `now`.
pub fn find_valid_by_id(
    uow: &UnitOfWork<'_>,
    id: &str,
    now: DateTime<Utc>,
) -> Result<Option<Principal>> {
    uow.tx()
        .query_row(
            "SELECT user_id, tenant_id
             FROM sessions
             WHERE id = ?1 AND status = ?2 AND expires_at > ?3",
            params![id, SessionStatus::Valid.as_str(), now],
            |row| {
                Ok(Principal {
                    user_id: row.get(0)?,
                    tenant_id: row.get(1)?,
                })
            },
        )
        .optional()
        .map_err(|err| Error::Persistence(err.to_string()))
}

/// List every session owned by `user_id` currently in `status`.
///
/// Rows come back in store order; callers must not rely on it.
pub fn list_by_user(
    uow: &UnitOfWork<'_>,
    user_id: Uuid,
    status: SessionStatus,
) -> Result<Vec<Session>> {
    let mut stmt = uow
        .tx()
        .prepare(
            "SELECT id, user_id, tenant_id, occurred_at, last_event, expires_at, status
             FROM sessions
             WHERE user_id = ?1 AND status = ?2",
        )
        .map_err(|err| Error::Persistence(err.to_string()))?;

    let rows = stmt
        .query_map(params![user_id, status.as_str()], map_row)
        .map_err(|err| Error::Persistence(err.to_string()))?;

    rows.collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|err| Error::Persistence(err.to_string()))
}

/// Unconditionally set the status of one session. Both transition
/// directions are allowed; policy lives with the caller.
pub fn update_status(uow: &UnitOfWork<'_>, id: &str, status: SessionStatus) -> Result<usize> {
    uow.tx()
        .execute(
            "UPDATE sessions SET status = ?2 WHERE id = ?1",
            params![id, status.as_str()],
        )
        .map_err(|err| Error::Persistence(err.to_string()))
}

/// Set the status of every session in `ids` with one set-based statement,
/// so concurrent readers never observe a partially transitioned batch.
/// An empty set is a no-op.
pub fn bulk_update_status(
    uow: &UnitOfWork<'_>,
    ids: &[String],
    status: SessionStatus,
) -> Result<usize> {
    if ids.is_empty() {
        return Ok(0);
    }

    let marks = (2..ids.len() + 2)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!("UPDATE sessions SET status = ?1 WHERE id IN ({marks})");

    let status_str = status.as_str();
    let mut args: Vec<&dyn ToSql> = Vec::with_capacity(ids.len() + 1);
    args.push(&status_str);
    for id in ids {
        args.push(id);
    }

    let affected = uow
        .tx()
        .execute(&sql, args.as_slice())
        .map_err(|err| Error::Persistence(err.to_string()))?;
    tracing::debug!(affected, status = status.as_str(), "bulk session status update");
    Ok(affected)
}

/// Stamp last activity on a session. Advisory: validity checks never read
/// `last_event`.
pub fn touch(uow: &UnitOfWork<'_>, id: &str, now: DateTime<Utc>) -> Result<usize> {
    uow.tx()
        .execute(
            "UPDATE sessions SET last_event = ?2 WHERE id = ?1",
            params![id, now],
        )
        .map_err(|err| Error::Persistence(err.to_string()))
}

fn map_row(row: &rusqlite::Row<'_>) -> std::result::Result<Session, rusqlite::Error> {
    let status_raw: String = row.get(6)?;
    let status = status_raw
        .parse::<SessionStatus>()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(err)))?;

    Ok(Session {
        id: row.get(0)?,
        user_id: row.get(1)?,
        tenant_id: row.get(2)?,
        occurred_at: row.get(3)?,
        last_event: row.get(4)?,
        expires_at: row.get(5)?,
        status,
    })
}
