//! Tenant-scoped configuration store.
//!
//! Append-only key/value rows carrying a typed-value discriminator and an
//! advisory `locked` flag. Writes go through the caller's unit of work and
//! record its actor as provenance; reads resolve the most recently inserted
//! row for a key and may run outside any unit of work.

use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension};

use tc_domain::error::{Error, Result};
use tc_domain::setting::{Setting, ValueType};
use tc_domain::trace::TraceEvent;
use tc_storage::{Store, UnitOfWork};

/// Insert an unlocked setting.
pub fn set(uow: &UnitOfWork<'_>, key: &str, value: &str, value_type: ValueType) -> Result<()> {
    set_with_lock(uow, key, value, value_type, false)
}

/// Insert a setting row.
///
/// `locked` is recorded verbatim; the write path never refuses to insert
/// over a previously locked key. Enforcement, if wanted, is the caller's.
pub fn set_with_lock(
    uow: &UnitOfWork<'_>,
    key: &str,
    value: &str,
    value_type: ValueType,
    locked: bool,
) -> Result<()> {
    uow.tx()
        .execute(
            "INSERT INTO settings (key, value, value_type, locked, created_by)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![key, value, value_type.as_str(), locked, uow.actor()],
        )
        .map_err(|err| Error::Persistence(err.to_string()))?;

    TraceEvent::SettingWritten {
        key: key.to_owned(),
        value_type: value_type.to_string(),
        locked,
    }
    .emit();

    Ok(())
}

/// Fetch the current value of `key`, outside any unit of work.
///
/// Rows are append-only, so "current" means the most recently inserted one.
pub fn get(store: &Store, key: &str) -> Result<Option<Setting>> {
    let setting = store
        .conn()
        .query_row(
            "SELECT key, value, value_type, locked, created_by
             FROM settings
             WHERE key = ?1
             ORDER BY rowid DESC
             LIMIT 1",
            params![key],
            map_row,
        )
        .optional()
        .map_err(|err| Error::Persistence(err.to_string()))?;

    if setting.is_none() {
        tracing::debug!(key, "setting not found");
    }
    Ok(setting)
}

fn map_row(row: &rusqlite::Row<'_>) -> std::result::Result<Setting, rusqlite::Error> {
    let type_raw: String = row.get(2)?;
    let value_type = type_raw
        .parse::<ValueType>()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(err)))?;

    Ok(Setting {
        key: row.get(0)?,
        value: row.get(1)?,
        value_type,
        locked: row.get(3)?,
        created_by: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(writes: &[(&str, &str, ValueType, bool)]) -> Store {
        let mut db = Store::in_memory().unwrap();
        let uow = db.begin("tests").unwrap();
        for (key, value, value_type, locked) in writes {
            set_with_lock(&uow, key, value, *value_type, *locked).unwrap();
        }
        uow.commit().unwrap();
        db
    }

    #[test]
    fn string_setting_roundtrips() {
        let db = store_with(&[("greeting", "hi", ValueType::String, false)]);
        let setting = get(&db, "greeting").unwrap().unwrap();
        assert_eq!(setting.as_string().unwrap(), "hi");
        assert!(!setting.locked);
        assert_eq!(setting.created_by, "tests");
    }

    #[test]
    fn bool_setting_roundtrips() {
        let db = store_with(&[("lockdown", "true", ValueType::Bool, true)]);
        let setting = get(&db, "lockdown").unwrap().unwrap();
        assert!(setting.as_bool());
        assert!(setting.locked);
    }

    #[test]
    fn as_bool_on_string_setting_is_false_not_error() {
        let db = store_with(&[("greeting", "hi", ValueType::String, false)]);
        let setting = get(&db, "greeting").unwrap().unwrap();
        assert!(!setting.as_bool());
    }

    #[test]
    fn unknown_key_reads_as_none() {
        let db = store_with(&[]);
        assert!(get(&db, "absent").unwrap().is_none());
    }

    #[test]
    fn most_recent_row_wins() {
        let db = store_with(&[
            ("mode", "a", ValueType::String, false),
            ("mode", "b", ValueType::String, false),
        ]);
        let setting = get(&db, "mode").unwrap().unwrap();
        assert_eq!(setting.as_string().unwrap(), "b");
    }

    #[test]
    fn locked_flag_does_not_block_further_writes() {
        let mut db = store_with(&[("mode", "a", ValueType::String, true)]);

        // A later unlocked write over a locked key is accepted as-is.
        let uow = db.begin("tests").unwrap();
        set(&uow, "mode", "b", ValueType::String).unwrap();
        uow.commit().unwrap();

        let setting = get(&db, "mode").unwrap().unwrap();
        assert_eq!(setting.as_string().unwrap(), "b");
        assert!(!setting.locked);
    }

    #[test]
    fn uncommitted_write_is_not_visible() {
        let mut db = Store::in_memory().unwrap();
        let uow = db.begin("tests").unwrap();
        set(&uow, "mode", "a", ValueType::String).unwrap();
        uow.rollback().unwrap();

        assert!(get(&db, "mode").unwrap().is_none());
    }
}
