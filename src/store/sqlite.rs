use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use rusqlite_migration::{Migrations, M};

use crate::app::{ReaderError, Result};
use crate::domain::{Article, Published};
use crate::store::Store;

const MIGRATION_SLICE: &[M<'static>] = &[M::up(include_str!("../../migrations/001-initial/up.sql"))];
const MIGRATIONS: Migrations<'static> = Migrations::from_slice(MIGRATION_SLICE);

const SELECT_COLUMNS: &str = "SELECT title, link, source_origin, published, description, category FROM article_list";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    /// Safe to run on every startup: the table is created only if missing.
    fn run_migrations(&self) -> Result<()> {
        let mut conn = self.lock();
        MIGRATIONS
            .to_latest(&mut conn)
            .map_err(|e| ReaderError::Migration(e.to_string()))?;

        Ok(())
    }

    /// A panic while holding the lock leaves no open transaction behind
    /// (it rolls back on drop), so a poisoned connection is still usable.
    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn row_to_article(row: &Row<'_>) -> rusqlite::Result<Article> {
        Ok(Article {
            title: row.get(0)?,
            link: row.get(1)?,
            source_origin: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            published: row
                .get::<_, Option<String>>(3)?
                .map(|s| Published::from_stored(&s))
                .unwrap_or(Published::Unknown),
            description: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
            category: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
        })
    }
}

impl Store for SqliteStore {
    fn upsert(&self, articles: &[Article]) -> Result<usize> {
        let mut conn = self.lock();

        let tx = conn.transaction()?;
        let mut count = 0;

        for article in articles {
            let inserted = tx.execute(
                "INSERT OR IGNORE INTO article_list (title, link, source_origin, published, description, category)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    article.title,
                    article.link,
                    article.source_origin,
                    article.published.to_string(),
                    article.description,
                    article.category
                ],
            )?;
            count += inserted;
        }

        tx.commit()?;
        tracing::debug!("Inserted {} of {} articles", count, articles.len());
        Ok(count)
    }

    fn query(&self, date: NaiveDate, source_origin: Option<&str>, limit: usize) -> Result<Vec<Article>> {
        let conn = self.lock();
        let published = Published::Date(date).to_string();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        match source_origin {
            Some(origin) => tracing::debug!("Searching for articles from {} on {}", origin, published),
            None => tracing::debug!("Searching for articles on {}", published),
        }

        let mut stmt = conn.prepare(&format!(
            "{SELECT_COLUMNS} WHERE published = ?1 AND (?2 IS NULL OR source_origin = ?2) ORDER BY rowid LIMIT ?3"
        ))?;
        let articles = stmt
            .query_map(params![published, source_origin, limit], Self::row_to_article)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        if articles.is_empty() {
            return Err(ReaderError::NoMatchingNews);
        }

        Ok(articles)
    }

    fn count(&self) -> Result<usize> {
        let conn = self.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM article_list", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}
