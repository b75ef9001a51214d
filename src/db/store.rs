//! The journal store: an explicitly opened SQLite database plus the
//! generic per-table CRUD surface consumed by the CLI and the codecs.

use crate::db::migrate::run_pending_migrations;
use crate::db::observer::{Observer, SubscriptionId};
use crate::db::record::{Record, Table};
use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;

/// Competency tables smaller than this get the default catalogue topped up.
pub const DEFAULT_SEED_THRESHOLD: usize = 5;

#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub seed_defaults: bool,
    pub seed_threshold: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            seed_defaults: true,
            seed_threshold: DEFAULT_SEED_THRESHOLD,
        }
    }
}

pub struct Store {
    conn: Option<Connection>,
    path: String,
    pub(crate) observers: Vec<Observer>,
    pub(crate) next_subscription: SubscriptionId,
}

impl Store {
    pub fn open(path: &str) -> AppResult<Self> {
        Self::open_with(path, StoreOptions::default())
    }

    pub fn open_with(path: &str, opts: StoreOptions) -> AppResult<Self> {
        let conn = Connection::open(Path::new(path))
            .map_err(|e| AppError::StorageUnavailable(format!("{}: {}", path, e)))?;
        Self::from_connection(conn, path, opts)
    }

    pub fn open_in_memory() -> AppResult<Self> {
        Self::open_in_memory_with(StoreOptions::default())
    }

    pub fn open_in_memory_with(opts: StoreOptions) -> AppResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| AppError::StorageUnavailable(e.to_string()))?;
        Self::from_connection(conn, ":memory:", opts)
    }

    fn from_connection(mut conn: Connection, path: &str, opts: StoreOptions) -> AppResult<Self> {
        conn.pragma_update(None, "foreign_keys", true)
            .map_err(|e| AppError::StorageUnavailable(format!("{}: {}", path, e)))?;

        run_pending_migrations(&mut conn)?;

        let mut store = Self {
            conn: Some(conn),
            path: path.to_string(),
            observers: Vec::new(),
            next_subscription: 1,
        };

        if opts.seed_defaults {
            store.seed_competencies(opts.seed_threshold);
        }

        Ok(store)
    }

    /// Release the connection. Later calls fail with `StorageUnavailable`.
    pub fn close(&mut self) -> AppResult<()> {
        self.observers.clear();
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| AppError::Db(e))?;
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn conn(&self) -> AppResult<&Connection> {
        self.conn
            .as_ref()
            .ok_or_else(|| AppError::StorageUnavailable("store is closed".into()))
    }

    pub(crate) fn conn_mut(&mut self) -> AppResult<&mut Connection> {
        self.conn
            .as_mut()
            .ok_or_else(|| AppError::StorageUnavailable("store is closed".into()))
    }

    // ------------------------------------------------------------------
    // Generic CRUD
    // ------------------------------------------------------------------

    pub fn find<R: Record>(&self, id: i64) -> AppResult<Option<R>> {
        let conn = self.conn()?;
        let sql = format!("SELECT * FROM {} WHERE id = ?1", R::TABLE.name());
        let row = conn.query_row(&sql, [id], R::map_row).optional()?;
        Ok(row)
    }

    pub fn get<R: Record>(&self, id: i64) -> AppResult<R> {
        self.find(id)?.ok_or_else(|| R::not_found(id))
    }

    /// Every row of the table, by id.
    pub fn all<R: Record>(&self) -> AppResult<Vec<R>> {
        let sql = format!("SELECT * FROM {} ORDER BY id ASC", R::TABLE.name());
        self.query(&sql, [])
    }

    pub fn count<R: Record>(&self) -> AppResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", R::TABLE.name());
        Ok(self.conn()?.query_row(&sql, [], |row| row.get(0))?)
    }

    pub(crate) fn query<R: Record, P: rusqlite::Params>(
        &self,
        sql: &str,
        params: P,
    ) -> AppResult<Vec<R>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, R::map_row)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn add<R: Record>(&mut self, row: &R) -> AppResult<i64> {
        let conn = self.conn()?;
        R::validate_insert(conn, row)?;
        let id = R::insert(conn, row)?;

        self.notify(&[R::TABLE]);
        Ok(id)
    }

    /// Insert many rows atomically; either all land or none do.
    pub fn bulk_add<R: Record>(&mut self, rows: &[R]) -> AppResult<Vec<i64>> {
        let tx = self.conn_mut()?.transaction()?;
        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            R::validate_insert(&tx, row)?;
            ids.push(R::insert(&tx, row)?);
        }
        tx.commit()?;

        self.notify(&[R::TABLE]);
        Ok(ids)
    }

    /// Merge a partial JSON object (camelCase keys) into row `id`.
    ///
    /// The `id` key is ignored. Unknown keys are dropped; a value of the
    /// wrong shape fails with `InvalidFormat`.
    pub fn update<R: Record>(&mut self, id: i64, patch: &Value) -> AppResult<R> {
        let Some(changes) = patch.as_object() else {
            return Err(AppError::InvalidFormat(
                "update patch must be a JSON object".into(),
            ));
        };

        let current: R = self.get(id)?;
        let mut merged = serde_json::to_value(&current)?;
        if let Some(target) = merged.as_object_mut() {
            for (k, v) in changes {
                if k != "id" {
                    target.insert(k.clone(), v.clone());
                }
            }
        }

        let mut updated: R = serde_json::from_value(merged)
            .map_err(|e| AppError::InvalidFormat(format!("{} update: {}", R::TABLE.label(), e)))?;
        updated.set_id(id);

        self.replace(&updated)?;
        Ok(updated)
    }

    /// Overwrite an existing row with `row` (matched by its id).
    pub fn replace<R: Record>(&mut self, row: &R) -> AppResult<()> {
        let id = row.id().ok_or_else(|| {
            AppError::InvalidFormat(format!("{} without id cannot be updated", R::TABLE.label()))
        })?;

        let current: R = self.get(id)?;
        let mut next = row.clone();
        next.touch();

        let conn = self.conn()?;
        R::validate_update(conn, &current, &next)?;
        R::write(conn, id, &next)?;

        self.notify(&[R::TABLE]);
        Ok(())
    }

    /// Delete row `id` together with the rows it owns.
    pub fn delete<R: Record>(&mut self, id: i64) -> AppResult<()> {
        let table = R::TABLE.name();
        let tx = self.conn_mut()?.transaction()?;

        R::delete_owned(&tx, Some(id))?;

        let n = tx.execute(&format!("DELETE FROM {} WHERE id = ?1", table), [id])?;
        if n == 0 {
            return Err(R::not_found(id));
        }
        tx.commit()?;

        let mut changed = vec![R::TABLE];
        changed.extend_from_slice(R::CASCADES);
        self.notify(&changed);
        Ok(())
    }

    /// Remove every row of the table. Returns the number of rows removed.
    pub fn clear<R: Record>(&mut self) -> AppResult<usize> {
        let tx = self.conn_mut()?.transaction()?;
        R::delete_owned(&tx, None)?;
        let n = tx.execute(&format!("DELETE FROM {}", R::TABLE.name()), [])?;
        tx.commit()?;

        let mut changed = vec![R::TABLE];
        changed.extend_from_slice(R::CASCADES);
        self.notify(&changed);
        Ok(n)
    }

    /// "Clear all data": empties the four journal tables in one transaction.
    pub fn clear_all(&mut self) -> AppResult<()> {
        let tx = self.conn_mut()?.transaction()?;
        tx.execute_batch(
            "DELETE FROM captures;
             DELETE FROM sessions;
             DELETE FROM competencies;
             DELETE FROM logs;",
        )?;
        crate::db::log::ttlog(&tx, "clear", "all", "All journal data deleted")?;
        tx.commit()?;

        self.notify(&Table::ALL);
        Ok(())
    }

    /// Best-effort audit line; failures are reported, never raised.
    pub fn audit(&self, operation: &str, target: &str, message: &str) {
        let res = self
            .conn()
            .and_then(|conn| crate::db::log::ttlog(conn, operation, target, message));
        if let Err(e) = res {
            crate::ui::messages::warning(format!("Failed to write internal log: {}", e));
        }
    }
}
