// src/sink/sqlite.rs
// =============================================================================
// SQLite output: an `articles` table, one row per article.
//
// Each write() runs in one transaction, so a failed run never leaves half a
// batch behind. The write mode decides what happens to rows already there:
//   append    -> plain INSERT
//   overwrite -> DELETE everything first (only on the first write)
//   dedupe    -> INSERT only when no row has the same title key
//
// Dedupe compares title keys (see article::title_key), not raw titles, so
// "EBay" stored by a Main Page run and "eBay" from a crawl are one article,
// exactly as in the CSV sink.
//
// Rust concepts:
// - Transaction: rolled back on drop unless commit() is called
// - A `{ ... }` block to end the statement's borrow of `tx` before commit
// =============================================================================

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rusqlite::{params, Connection};
use tracing::debug;

use super::ArticleSink;
use crate::article::{title_key, Article};
use crate::config::WriteMode;
use crate::error::SinkError;

const INSERT: &str = "
    INSERT INTO articles (title, url, summary, links, categories, image_url, date_scraped)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

pub struct SqliteSink {
    conn: Connection,
    mode: WriteMode,
    label: String,
}

impl SqliteSink {
    pub fn open(path: &Path, mode: WriteMode) -> Result<Self, SinkError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| SinkError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::with_connection(conn, mode, format!("SQLite {}", path.display()))
    }

    pub fn in_memory(mode: WriteMode) -> Result<Self, SinkError> {
        Self::with_connection(Connection::open_in_memory()?, mode, "SQLite :memory:".to_string())
    }

    fn with_connection(conn: Connection, mode: WriteMode, label: String) -> Result<Self, SinkError> {
        init_schema(&conn)?;
        debug!(%label, "database initialised");
        Ok(SqliteSink { conn, mode, label })
    }
}

// Title keys of every row already stored
//
// Parameters:
// - conn: the connection (or an open transaction) to read through
//
// Returns: the set of normalised keys, so "EBay" and "eBay" collide
fn existing_keys(conn: &Connection) -> Result<HashSet<String>, SinkError> {
    let mut stmt = conn.prepare("SELECT title FROM articles")?;
    let keys = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .map(|title| title.map(|t| title_key(&t)))
        .collect::<Result<HashSet<String>, _>>()?;
    Ok(keys)
}

pub fn init_schema(conn: &Connection) -> Result<(), SinkError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS articles (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            title        TEXT NOT NULL,
            url          TEXT NOT NULL,
            summary      TEXT,
            links        TEXT,
            categories   TEXT,
            image_url    TEXT,
            date_scraped TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_articles_title ON articles(title);
        ",
    )?;
    Ok(())
}

impl ArticleSink for SqliteSink {
    fn write(&mut self, articles: &[Article]) -> Result<usize, SinkError> {
        let tx = self.conn.transaction()?;

        if self.mode == WriteMode::Overwrite {
            let removed = tx.execute("DELETE FROM articles", [])?;
            debug!(removed, "cleared articles table");
        }

        // Only dedupe mode looks at what is already stored
        let mut known = match self.mode {
            WriteMode::Deduplicate => Some(existing_keys(&tx)?),
            _ => None,
        };

        let mut written = 0;
        {
            let mut stmt = tx.prepare(INSERT)?;
            for article in articles {
                if let Some(known) = known.as_mut() {
                    if !known.insert(article.key()) {
                        continue;
                    }
                }
                written += stmt.execute(params![
                    article.title,
                    article.url,
                    article.summary,
                    serde_json::to_string(&article.links)?,
                    article.categories.join("|"),
                    article.image_url,
                    article.date_scraped(),
                ])?;
            }
        }
        tx.commit()?;

        if self.mode == WriteMode::Overwrite {
            self.mode = WriteMode::Append;
        }

        debug!(label = %self.label, rows = written, "wrote SQLite rows");
        Ok(written)
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}
