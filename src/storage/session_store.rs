use rusqlite::{OptionalExtension, Result as SqlResult, params};
use std::path::Path;

use super::database::Database;

const TOKEN_KEY: &str = "token";

/// Persistent home of the auth token. Every protected view reads it;
/// only login, registration and logout write it.
pub struct SessionStore {
    db: Database,
}

impl SessionStore {
    /// Open (or create) the store at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> SqlResult<Self> {
        Ok(Self {
            db: Database::new(path)?,
        })
    }

    #[cfg(test)]
    pub fn in_memory() -> SqlResult<Self> {
        Ok(Self {
            db: Database::in_memory()?,
        })
    }

    /// Stored token, if any
    pub fn get(&self) -> SqlResult<Option<String>> {
        self.db
            .connection()
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![TOKEN_KEY],
                |row| row.get(0),
            )
            .optional()
    }

    pub fn set(&self, token: &str) -> SqlResult<()> {
        self.db.connection().execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![TOKEN_KEY, token],
        )?;
        Ok(())
    }

    pub fn clear(&self) -> SqlResult<()> {
        self.db
            .connection()
            .execute("DELETE FROM kv WHERE key = ?1", params![TOKEN_KEY])?;
        Ok(())
    }

    /// Gate check for protected views. A read failure counts as logged out.
    pub fn token(&self) -> Option<String> {
        match self.get() {
            Ok(token) => token,
            Err(err) => {
                log::warn!("Failed to read session token: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_has_no_token() {
        let store = SessionStore::in_memory().unwrap();
        assert_eq!(store.get().unwrap(), None);
        assert_eq!(store.token(), None);
    }

    #[test]
    fn set_overwrites_and_clear_removes() {
        let store = SessionStore::in_memory().unwrap();
        store.set("first").unwrap();
        store.set("second").unwrap();
        assert_eq!(store.token().as_deref(), Some("second"));

        store.clear().unwrap();
        assert_eq!(store.token(), None);
        // clearing twice is harmless
        store.clear().unwrap();
    }

    #[test]
    fn token_survives_reopen() {
        let dir = std::env::temp_dir().join(format!("room_chat_store_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("client.db");

        SessionStore::open(&path).unwrap().set("persisted").unwrap();
        let reopened = SessionStore::open(&path).unwrap();
        assert_eq!(reopened.token().as_deref(), Some("persisted"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
