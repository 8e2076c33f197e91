use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, TransactionBehavior};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use scombz_core::types::{DeadlineMode, LoginData, Task, Timetable};

use crate::db::init_db;
use crate::error::{Result, StoreError};
use crate::types::{Field, Saves, DATA_SECTION, SETTINGS_SECTION};

/// Field-scoped persistent store for settings and cached LMS data.
///
/// Every [`Field`] is its own row, so concurrent writers only race on the
/// field they both touch. [`Store::update`] makes a read-modify-write of a
/// single field atomic.
pub struct Store {
    db: Mutex<Connection>,
}

impl Store {
    /// Wrap an open connection, running the schema migration first.
    pub fn new(conn: Connection) -> Result<Self> {
        init_db(&conn)?;
        Ok(Self {
            db: Mutex::new(conn),
        })
    }

    /// Open (or create) the store file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        info!(path = %path.display(), "opening store");
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::new(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::new(Connection::open_in_memory()?)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.db.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Raw JSON of a field, `None` when it has never been written.
    pub fn get_raw(&self, field: Field) -> Result<Option<Value>> {
        let db = self.conn()?;
        read_raw(&db, field)
    }

    /// Typed read, `None` when the field has never been written.
    pub fn get<T: DeserializeOwned>(&self, field: Field) -> Result<Option<T>> {
        match self.get_raw(field)? {
            Some(v) => Ok(Some(serde_json::from_value(v)?)),
            None => Ok(None),
        }
    }

    /// Typed read that falls back to the field's default.
    pub fn get_or_default<T: DeserializeOwned>(&self, field: Field) -> Result<T> {
        let value = self.get_raw(field)?.unwrap_or_else(|| field.default_value());
        Ok(serde_json::from_value(value)?)
    }

    /// Overwrite one field.
    #[instrument(skip(self, value), fields(field = %field))]
    pub fn set<T: Serialize>(&self, field: Field, value: &T) -> Result<()> {
        let json = serde_json::to_value(value)?;
        let db = self.conn()?;
        write_raw(&db, field, &json)?;
        debug!("field written");
        Ok(())
    }

    /// Atomically read, transform and write back one field.
    ///
    /// Runs inside an `IMMEDIATE` transaction so a second process cannot
    /// interleave its own write between the read and the write.
    #[instrument(skip(self, f), fields(field = %field))]
    pub fn update<T, F>(&self, field: Field, f: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(T) -> T,
    {
        let mut db = self.conn()?;
        let tx = db.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let current = read_raw(&tx, field)?.unwrap_or_else(|| field.default_value());
        let next = f(serde_json::from_value(current)?);
        write_raw(&tx, field, &serde_json::to_value(&next)?)?;
        tx.commit()?;
        debug!("field updated");
        Ok(next)
    }

    /// Remove a field so the next read sees its default.
    pub fn clear(&self, field: Field) -> Result<()> {
        let db = self.conn()?;
        db.execute("DELETE FROM kv WHERE key = ?1", [field.key()])?;
        Ok(())
    }

    /// Every field, defaults filled in.
    pub fn snapshot(&self) -> Result<Saves> {
        Ok(serde_json::from_value(self.export_blob()?)?)
    }

    /// Produce the `{settings, scombzData}` blob, defaults filled in.
    pub fn export_blob(&self) -> Result<Value> {
        let stored = {
            let db = self.conn()?;
            let mut stmt = db.prepare("SELECT key, value FROM kv")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;
            rows.collect::<rusqlite::Result<HashMap<String, String>>>()?
        };

        let mut settings = Map::new();
        let mut data = Map::new();
        for field in Field::ALL {
            let value = match stored.get(&field.key()) {
                Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
                    warn!(field = %field, "stored value is not JSON, using default: {e}");
                    field.default_value()
                }),
                None => field.default_value(),
            };
            let section = if field.section() == SETTINGS_SECTION {
                &mut settings
            } else {
                &mut data
            };
            section.insert(field.name().to_string(), value);
        }

        let mut blob = Map::new();
        blob.insert(SETTINGS_SECTION.to_string(), Value::Object(settings));
        blob.insert(DATA_SECTION.to_string(), Value::Object(data));
        Ok(Value::Object(blob))
    }

    /// Ingest a browser storage blob.
    ///
    /// Known fields present in the blob are written; unknown ones are
    /// ignored. The blob is validated as a whole before anything is written.
    #[instrument(skip(self, blob))]
    pub fn import_blob(&self, blob: &Value) -> Result<usize> {
        let obj = blob
            .as_object()
            .ok_or_else(|| StoreError::InvalidBlob("top level is not an object".into()))?;
        serde_json::from_value::<Saves>(blob.clone())
            .map_err(|e| StoreError::InvalidBlob(e.to_string()))?;

        let mut db = self.conn()?;
        let tx = db.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut written = 0;
        for field in Field::ALL {
            let value = obj
                .get(field.section())
                .and_then(|section| section.get(field.name()));
            if let Some(value) = value {
                write_raw(&tx, field, value)?;
                written += 1;
            }
        }
        tx.commit()?;
        info!(fields = written, "storage blob imported");
        Ok(written)
    }

    // --- typed accessors ---------------------------------------------------

    pub fn hidden_task_ids(&self) -> Result<Vec<String>> {
        self.get_or_default(Field::HiddenTaskIdList)
    }

    pub fn set_hidden_task_ids(&self, ids: &[String]) -> Result<()> {
        self.set(Field::HiddenTaskIdList, &ids)
    }

    pub fn deadline_mode(&self) -> Result<DeadlineMode> {
        self.get_or_default(Field::DeadlineMode)
    }

    pub fn set_deadline_mode(&self, mode: DeadlineMode) -> Result<()> {
        self.set(Field::DeadlineMode, &mode)
    }

    pub fn timetable(&self) -> Result<Timetable> {
        self.get_or_default(Field::Timetable)
    }

    pub fn set_timetable(&self, timetable: &Timetable) -> Result<()> {
        self.set(Field::Timetable, timetable)
    }

    pub fn login_data(&self) -> Result<LoginData> {
        self.get_or_default(Field::LoginData)
    }

    pub fn set_login_data(&self, login: &LoginData) -> Result<()> {
        self.set(Field::LoginData, login)
    }

    /// Append a user-authored task to `originalTasklist`.
    pub fn push_original_task(&self, task: Task) -> Result<Vec<Task>> {
        self.update(Field::OriginalTasklist, |mut tasks: Vec<Task>| {
            tasks.push(task);
            tasks
        })
    }
}

fn read_raw(conn: &Connection, field: Field) -> Result<Option<Value>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM kv WHERE key = ?1",
            [field.key()],
            |row| row.get(0),
        )
        .optional()?;
    match raw {
        Some(s) => Ok(Some(serde_json::from_str(&s)?)),
        None => Ok(None),
    }
}

fn write_raw(conn: &Connection, field: Field, value: &Value) -> Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        rusqlite::params![field.key(), value.to_string(), now],
    )?;
    Ok(())
}
