//! SQLite storage for theaters, screens and showtimes.

use super::models::{Screen, ScreenUsage, Showtime, ShowtimeSummary};
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::info;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS theater (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS screen (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    theater_id INTEGER NOT NULL REFERENCES theater(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    screen_type TEXT NOT NULL DEFAULT 'STANDARD'
);
CREATE TABLE IF NOT EXISTS showtime (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    movie_id TEXT NOT NULL,
    screen_id INTEGER NOT NULL REFERENCES screen(id) ON DELETE CASCADE,
    start_time TEXT NOT NULL,
    end_time TEXT NOT NULL,
    price INTEGER NOT NULL,
    available_seats INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_showtime_movie ON showtime(movie_id);
CREATE INDEX IF NOT EXISTS idx_showtime_screen_start ON showtime(screen_id, start_time);
"#;

pub struct SqliteShowtimeStore {
    conn: Connection,
}

impl SqliteShowtimeStore {
    /// Open the database at `db_path`, creating missing tables.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(&db_path)
            .with_context(|| format!("Failed to open database {:?}", db_path.as_ref()))?;
        Self::init(conn)
    }

    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute("PRAGMA foreign_keys = ON;", [])?;
        conn.execute_batch(SCHEMA)
            .context("Failed to create showtime schema")?;
        Ok(Self { conn })
    }

    pub fn add_theater(&self, name: &str) -> Result<i64> {
        self.conn
            .execute("INSERT INTO theater (name) VALUES (?1)", params![name])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn add_screen(&self, theater_id: i64, name: &str, screen_type: &str) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO screen (theater_id, name, screen_type) VALUES (?1, ?2, ?3)",
            params![theater_id, name, screen_type],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Every screen with its theater name, ordered by screen id.
    pub fn list_screens(&self) -> Result<Vec<Screen>> {
        let mut stmt = self.conn.prepare(
            r#"SELECT s.id, s.theater_id, s.name, s.screen_type, t.name
               FROM screen s
               JOIN theater t ON s.theater_id = t.id
               ORDER BY s.id"#,
        )?;
        let screens = stmt
            .query_map([], |row| {
                Ok(Screen {
                    id: row.get(0)?,
                    theater_id: row.get(1)?,
                    name: row.get(2)?,
                    screen_type: row.get(3)?,
                    theater_name: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(screens)
    }

    /// Insert all showtimes in one transaction. Nothing is written on error.
    pub fn insert_showtimes(&mut self, showtimes: &[Showtime]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"INSERT INTO showtime
                   (movie_id, screen_id, start_time, end_time, price, available_seats)
                   VALUES (?1, ?2, ?3, ?4, ?5, ?6)"#,
            )?;
            for showtime in showtimes {
                stmt.execute(params![
                    showtime.movie_id,
                    showtime.screen_id,
                    showtime.start_time.format(DATETIME_FORMAT).to_string(),
                    showtime.end_time.format(DATETIME_FORMAT).to_string(),
                    showtime.price,
                    showtime.available_seats,
                ])
                .with_context(|| {
                    format!(
                        "Failed to insert showtime of {} on screen {}",
                        showtime.movie_id, showtime.screen_id
                    )
                })?;
            }
        }
        tx.commit()?;
        info!("Inserted {} showtimes", showtimes.len());
        Ok(showtimes.len())
    }

    pub fn showtimes_for_movie(&self, movie_id: &str) -> Result<Vec<Showtime>> {
        let mut stmt = self.conn.prepare(
            r#"SELECT movie_id, screen_id, start_time, end_time, price, available_seats
               FROM showtime
               WHERE movie_id = ?1
               ORDER BY start_time, screen_id"#,
        )?;
        let rows = stmt
            .query_map(params![movie_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, u32>(4)?,
                    row.get::<_, u32>(5)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(movie_id, screen_id, start, end, price, available_seats)| {
                Ok(Showtime {
                    movie_id,
                    screen_id,
                    start_time: NaiveDateTime::parse_from_str(&start, DATETIME_FORMAT)?,
                    end_time: NaiveDateTime::parse_from_str(&end, DATETIME_FORMAT)?,
                    price,
                    available_seats,
                })
            })
            .collect()
    }

    /// Totals per movie, per day and the ten busiest screens.
    pub fn summary(&self) -> Result<ShowtimeSummary> {
        let total: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM showtime", [], |row| row.get(0))?;

        let mut stmt = self.conn.prepare(
            r#"SELECT movie_id, COUNT(*) AS count
               FROM showtime
               GROUP BY movie_id
               ORDER BY count DESC, movie_id"#,
        )?;
        let per_movie = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as usize))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = self.conn.prepare(
            r#"SELECT substr(start_time, 1, 10) AS day, COUNT(*)
               FROM showtime
               GROUP BY day
               ORDER BY day"#,
        )?;
        let per_date = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as usize))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?
            .into_iter()
            .map(|(day, count)| Ok((NaiveDate::parse_from_str(&day, "%Y-%m-%d")?, count)))
            .collect::<Result<Vec<_>>>()?;

        let mut stmt = self.conn.prepare(
            r#"SELECT t.name, s.name, COUNT(st.id) AS count
               FROM screen s
               LEFT JOIN theater t ON s.theater_id = t.id
               LEFT JOIN showtime st ON s.id = st.screen_id
               GROUP BY s.id
               ORDER BY count DESC, s.id
               LIMIT 10"#,
        )?;
        let top_screens = stmt
            .query_map([], |row| {
                Ok(ScreenUsage {
                    theater_name: row.get::<_, Option<String>>(0)?.unwrap_or_default(),
                    screen_name: row.get(1)?,
                    showtimes: row.get::<_, i64>(2)? as usize,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(ShowtimeSummary {
            total: total as usize,
            per_movie,
            per_date,
            top_screens,
        })
    }
}
