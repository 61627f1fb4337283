//! Key-value backends for persisted preferences.
//!
//! Every value is stored together with its kind, so a key written as a
//! boolean never reads back as a string or an integer.

use anyhow::Context;
use rusqlite::{Connection, params};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Mutex;

/// A single typed preference value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefValue {
    Int(i32),
    Str(String),
    Bool(bool),
}

/// The type tag stored next to each value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefKind {
    Int,
    Str,
    Bool,
}

impl PrefKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PrefKind::Int => "int",
            PrefKind::Str => "str",
            PrefKind::Bool => "bool",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "int" => Some(PrefKind::Int),
            "str" => Some(PrefKind::Str),
            "bool" => Some(PrefKind::Bool),
            _ => None,
        }
    }
}

impl PrefValue {
    pub fn kind(&self) -> PrefKind {
        match self {
            PrefValue::Int(_) => PrefKind::Int,
            PrefValue::Str(_) => PrefKind::Str,
            PrefValue::Bool(_) => PrefKind::Bool,
        }
    }

    /// Parse user-supplied text as a value of `kind`.
    pub fn parse(kind: PrefKind, raw: &str) -> anyhow::Result<Self> {
        Ok(match kind {
            PrefKind::Int => PrefValue::Int(
                raw.trim()
                    .parse()
                    .with_context(|| format!("{raw:?} is not an integer"))?,
            ),
            PrefKind::Bool => PrefValue::Bool(
                raw.trim()
                    .parse()
                    .with_context(|| format!("{raw:?} is not true/false"))?,
            ),
            PrefKind::Str => PrefValue::Str(raw.to_string()),
        })
    }

    fn encode(&self) -> String {
        match self {
            PrefValue::Int(v) => v.to_string(),
            PrefValue::Str(v) => v.clone(),
            PrefValue::Bool(v) => v.to_string(),
        }
    }

    fn decode(tag: &str, raw: String) -> anyhow::Result<Self> {
        let kind = PrefKind::from_tag(tag).with_context(|| format!("unknown value kind {tag:?}"))?;
        match kind {
            PrefKind::Str => Ok(PrefValue::Str(raw)),
            _ => PrefValue::parse(kind, &raw),
        }
    }
}

impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Opaque key-value namespace the settings layer reads and writes through.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<PrefValue>>;
    fn put(&self, key: &str, value: &PrefValue) -> anyhow::Result<()>;
    fn remove(&self, key: &str) -> anyhow::Result<()>;
    fn keys(&self) -> anyhow::Result<Vec<String>>;
}

impl<T: PreferenceStore + ?Sized> PreferenceStore for &T {
    fn get(&self, key: &str) -> anyhow::Result<Option<PrefValue>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &PrefValue) -> anyhow::Result<()> {
        (**self).put(key, value)
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> anyhow::Result<Vec<String>> {
        (**self).keys()
    }
}

/// SQLite-backed store. One database may hold several namespaces.
pub struct SqliteStore {
    conn: Connection,
    namespace: String,
}

impl SqliteStore {
    pub fn open(path: &Path, namespace: &str) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }

        let conn = Connection::open(path).with_context(|| format!("open {}", path.display()))?;
        Self::with_connection(conn, namespace)
    }

    pub fn open_in_memory(namespace: &str) -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        Self::with_connection(conn, namespace)
    }

    fn with_connection(conn: Connection, namespace: &str) -> anyhow::Result<Self> {
        let s = Self {
            conn,
            namespace: namespace.to_string(),
        };
        s.init_schema()?;
        Ok(s)
    }

    fn init_schema(&self) -> anyhow::Result<()> {
        self.conn
            .execute_batch(
                r#"
CREATE TABLE IF NOT EXISTS preferences (
  namespace TEXT NOT NULL,
  key TEXT NOT NULL,
  kind TEXT NOT NULL,
  value TEXT NOT NULL,
  updated_at INTEGER NOT NULL,
  PRIMARY KEY(namespace, key)
);
"#,
            )
            .context("init schema")?;
        Ok(())
    }
}

impl PreferenceStore for SqliteStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<PrefValue>> {
        let mut stmt = self
            .conn
            .prepare("SELECT kind, value FROM preferences WHERE namespace=?1 AND key=?2")
            .context("prepare preference read")?;
        let mut rows = stmt
            .query(params![self.namespace, key])
            .context("query preference")?;
        if let Some(row) = rows.next().context("read preference row")? {
            let kind: String = row.get(0)?;
            let raw: String = row.get(1)?;
            let value = PrefValue::decode(&kind, raw).with_context(|| format!("decode {key}"))?;
            Ok(Some(value))
        } else {
            Ok(None)
        }
    }

    fn put(&self, key: &str, value: &PrefValue) -> anyhow::Result<()> {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        self.conn
            .execute(
                r#"
INSERT INTO preferences(namespace, key, kind, value, updated_at)
VALUES(?1, ?2, ?3, ?4, ?5)
ON CONFLICT(namespace, key) DO UPDATE SET
  kind=excluded.kind,
  value=excluded.value,
  updated_at=excluded.updated_at
"#,
                params![self.namespace, key, value.kind().as_str(), value.encode(), now],
            )
            .with_context(|| format!("write preference {key}"))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.conn
            .execute(
                "DELETE FROM preferences WHERE namespace=?1 AND key=?2",
                params![self.namespace, key],
            )
            .with_context(|| format!("remove preference {key}"))?;
        Ok(())
    }

    fn keys(&self) -> anyhow::Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM preferences WHERE namespace=?1 ORDER BY key")
            .context("prepare key listing")?;
        let keys = stmt
            .query_map(params![self.namespace], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()
            .context("list preference keys")?;
        Ok(keys)
    }
}

/// Process-local store, mostly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, PrefValue>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> anyhow::Result<std::sync::MutexGuard<'_, HashMap<String, PrefValue>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store poisoned"))
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<PrefValue>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &PrefValue) -> anyhow::Result<()> {
        self.lock()?.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> anyhow::Result<Vec<String>> {
        let mut keys: Vec<String> = self.lock()?.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_round_trips_each_kind() {
        let store = SqliteStore::open_in_memory("configs").unwrap();
        store.put("page", &PrefValue::Int(-3)).unwrap();
        store.put("name", &PrefValue::Str("  padded ".into())).unwrap();
        store.put("flag", &PrefValue::Bool(true)).unwrap();

        assert_eq!(store.get("page").unwrap(), Some(PrefValue::Int(-3)));
        assert_eq!(store.get("name").unwrap(), Some(PrefValue::Str("  padded ".into())));
        assert_eq!(store.get("flag").unwrap(), Some(PrefValue::Bool(true)));
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn sqlite_last_write_wins_and_kind_follows() {
        let store = SqliteStore::open_in_memory("configs").unwrap();
        store.put("k", &PrefValue::Str("1".into())).unwrap();
        store.put("k", &PrefValue::Int(1)).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(PrefValue::Int(1)));
        assert_eq!(store.keys().unwrap(), vec!["k".to_string()]);
    }

    #[test]
    fn sqlite_namespaces_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db").join("prefs.sqlite3");

        let a = SqliteStore::open(&path, "configs").unwrap();
        a.put("theme", &PrefValue::Str("dark_theme".into())).unwrap();
        drop(a);

        let b = SqliteStore::open(&path, "other").unwrap();
        assert_eq!(b.get("theme").unwrap(), None);

        let a = SqliteStore::open(&path, "configs").unwrap();
        assert_eq!(a.get("theme").unwrap(), Some(PrefValue::Str("dark_theme".into())));
    }

    #[test]
    fn sqlite_remove() {
        let store = SqliteStore::open_in_memory("configs").unwrap();
        store.put("k", &PrefValue::Bool(false)).unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        store.remove("k").unwrap();
    }

    #[test]
    fn memory_store_lists_sorted_keys() {
        let store = MemoryStore::new();
        store.put("b", &PrefValue::Int(1)).unwrap();
        store.put("a", &PrefValue::Int(2)).unwrap();
        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn parse_rejects_wrong_text() {
        assert!(PrefValue::parse(PrefKind::Int, "two").is_err());
        assert!(PrefValue::parse(PrefKind::Bool, "yes").is_err());
        assert_eq!(PrefValue::parse(PrefKind::Int, " 4 ").unwrap(), PrefValue::Int(4));
        assert_eq!(
            PrefValue::parse(PrefKind::Str, "yes").unwrap(),
            PrefValue::Str("yes".into())
        );
    }
}
