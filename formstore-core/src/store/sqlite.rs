//! SQLite-backed [`RecordStore`]
//!
//! One table per variant, named by the schema. Identifiers come from
//! validated schemas and are always double-quoted; values are always bound.
//! rusqlite is blocking, so every call runs on the blocking pool behind a
//! shared connection mutex.

use super::{RecordStore, StoreError, StoreResult};
use crate::record::Record;
use crate::schema::{FieldDef, FieldKind, FieldValue, RecordSchema, Values};
use async_trait::async_trait;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Path that selects a private in-memory database
pub const MEMORY_PATH: &str = ":memory:";

/// Timestamp format of `created_at` / `updated_at`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Open (or create) a database file, creating parent directories as needed
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if path.as_os_str() == MEMORY_PATH {
            return Self::open_in_memory();
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        log::info!("🗄️  Opened SQLite database at {}", path.display());
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        log::debug!("🗄️  Opened in-memory SQLite database");
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self { conn: Arc::new(Mutex::new(conn)) }
    }

    async fn run<T, F>(&self, work: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> StoreResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            work(&mut guard)
        })
        .await
        .map_err(|e| StoreError::Worker(e.to_string()))?
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn ensure_table(&self, schema: &RecordSchema) -> StoreResult<()> {
        let ddl = create_table_sql(schema);
        let table = schema.table().to_string();
        self.run(move |conn| {
            conn.execute_batch(&ddl)?;
            log::debug!("📋 Table '{}' ready", table);
            Ok(())
        })
        .await
    }

    async fn list(&self, schema: &RecordSchema, filter: Option<&str>) -> StoreResult<Vec<Record>> {
        let schema = schema.clone();
        let pattern = filter.filter(|f| !f.is_empty()).map(like_pattern);
        self.run(move |conn| {
            let mut sql = select_sql(&schema);
            let mut params = Vec::new();
            if let Some(pattern) = pattern {
                sql.push_str(&format!(
                    " WHERE {} LIKE ?1 ESCAPE '\\' OR {} LIKE ?1 ESCAPE '\\'",
                    quote(schema.title_field()),
                    quote(schema.content_field())
                ));
                params.push(SqlValue::Text(pattern));
            }
            sql.push_str(" ORDER BY created_at DESC, id DESC");

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(params), |row| Ok(read_row(&schema, row)))?;
            let mut records = Vec::new();
            for row in rows {
                records.push(row??);
            }
            Ok(records)
        })
        .await
    }

    async fn get(&self, schema: &RecordSchema, id: i64) -> StoreResult<Option<Record>> {
        let schema = schema.clone();
        self.run(move |conn| fetch(conn, &schema, id)).await
    }

    async fn insert(&self, schema: &RecordSchema, values: &Values) -> StoreResult<Record> {
        let schema = schema.clone();
        let params = bind_values(&schema, values);
        self.run(move |conn| {
            let tx = conn.transaction()?;
            let now = timestamp();
            let columns: Vec<String> = schema.fields().iter().map(|f| quote(&f.name)).collect();
            let placeholders: Vec<String> = (1..=columns.len() + 2).map(|i| format!("?{i}")).collect();
            let sql = format!(
                "INSERT INTO {} ({}, created_at, updated_at) VALUES ({})",
                quote(schema.table()),
                columns.join(", "),
                placeholders.join(", ")
            );
            let mut params = params;
            params.push(SqlValue::Text(now.clone()));
            params.push(SqlValue::Text(now));
            tx.execute(&sql, params_from_iter(params))?;

            let id = tx.last_insert_rowid();
            let record = fetch(&tx, &schema, id)?.ok_or_else(|| StoreError::CorruptRow {
                table: schema.table().to_string(),
                reason: format!("inserted row {id} not readable"),
            })?;
            tx.commit()?;
            Ok(record)
        })
        .await
    }

    async fn update(&self, schema: &RecordSchema, id: i64, values: &Values) -> StoreResult<Option<Record>> {
        let schema = schema.clone();
        let params = bind_values(&schema, values);
        self.run(move |conn| {
            let tx = conn.transaction()?;
            let fields = schema.fields();
            let assignments: Vec<String> =
                fields.iter().enumerate().map(|(i, f)| format!("{} = ?{}", quote(&f.name), i + 1)).collect();
            let sql = format!(
                "UPDATE {} SET {}, updated_at = ?{} WHERE id = ?{}",
                quote(schema.table()),
                assignments.join(", "),
                fields.len() + 1,
                fields.len() + 2
            );
            let mut params = params;
            params.push(SqlValue::Text(timestamp()));
            params.push(SqlValue::Integer(id));
            if tx.execute(&sql, params_from_iter(params))? == 0 {
                return Ok(None);
            }
            let record = fetch(&tx, &schema, id)?;
            tx.commit()?;
            Ok(record)
        })
        .await
    }

    async fn delete(&self, schema: &RecordSchema, id: i64) -> StoreResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", quote(schema.table()));
        self.run(move |conn| Ok(conn.execute(&sql, [id])? > 0)).await
    }
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

fn timestamp() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// `%filter%` with LIKE wildcards escaped
fn like_pattern(filter: &str) -> String {
    let mut pattern = String::with_capacity(filter.len() + 2);
    pattern.push('%');
    for c in filter.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn column_sql(def: &FieldDef) -> String {
    let decl = match def.kind {
        FieldKind::Flag => "INTEGER NOT NULL DEFAULT 0",
        FieldKind::Choice(_) => "TEXT NOT NULL",
        FieldKind::Text | FieldKind::Date => "TEXT NOT NULL DEFAULT ''",
    };
    format!("{} {}", quote(&def.name), decl)
}

pub(crate) fn create_table_sql(schema: &RecordSchema) -> String {
    let columns: Vec<String> = schema.fields().iter().map(column_sql).collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {table} (\n    id INTEGER PRIMARY KEY AUTOINCREMENT,\n    {columns},\n    created_at TEXT NOT NULL,\n    updated_at TEXT NOT NULL\n);\nCREATE INDEX IF NOT EXISTS {index} ON {table} (created_at);",
        table = quote(schema.table()),
        columns = columns.join(",\n    "),
        index = quote(&format!("{}_created_at", schema.table())),
    )
}

fn select_sql(schema: &RecordSchema) -> String {
    let columns: Vec<String> = schema.fields().iter().map(|f| quote(&f.name)).collect();
    format!("SELECT id, {}, created_at, updated_at FROM {}", columns.join(", "), quote(schema.table()))
}

fn bind_values(schema: &RecordSchema, values: &Values) -> Vec<SqlValue> {
    schema
        .fields()
        .iter()
        .map(|def| match values.get(&def.name).cloned().unwrap_or_else(|| def.default_value()) {
            FieldValue::Flag(b) => SqlValue::Integer(i64::from(b)),
            FieldValue::Text(s) => SqlValue::Text(s),
        })
        .collect()
}

fn fetch(conn: &Connection, schema: &RecordSchema, id: i64) -> StoreResult<Option<Record>> {
    let sql = format!("{} WHERE id = ?1", select_sql(schema));
    let row = conn.query_row(&sql, [id], |row| Ok(read_row(schema, row))).optional()?;
    row.transpose()
}

/// Decode one `select_sql` row; column errors surface as `CorruptRow`
fn read_row(schema: &RecordSchema, row: &Row<'_>) -> StoreResult<Record> {
    let corrupt = |e: rusqlite::Error| StoreError::CorruptRow {
        table: schema.table().to_string(),
        reason: e.to_string(),
    };

    let id: i64 = row.get(0).map_err(corrupt)?;
    let mut values = Values::new();
    for (i, def) in schema.fields().iter().enumerate() {
        let value = match def.kind {
            FieldKind::Flag => FieldValue::Flag(row.get::<_, i64>(i + 1).map_err(corrupt)? != 0),
            _ => FieldValue::Text(row.get::<_, String>(i + 1).map_err(corrupt)?),
        };
        values.insert(def.name.clone(), value);
    }
    let n = schema.fields().len();
    Ok(Record {
        id,
        values,
        created_at: row.get(n + 1).map_err(corrupt)?,
        updated_at: row.get(n + 2).map_err(corrupt)?,
    })
}
