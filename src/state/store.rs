use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::SeedData;
use crate::error::{BotError, Result};
use crate::models::{AuthorizedUser, ScheduleEntry, Team, UserId};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        user_id        INTEGER PRIMARY KEY,
        real_name      TEXT NOT NULL,
        nickname       TEXT NOT NULL DEFAULT '',
        allowed_access INTEGER NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS teams (
        id   INTEGER PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS schedule (
        id     INTEGER PRIMARY KEY AUTOINCREMENT,
        date   TEXT NOT NULL,
        time   TEXT NOT NULL,
        result TEXT,
        winner TEXT,
        team1  INTEGER NOT NULL REFERENCES teams(id),
        team2  INTEGER NOT NULL REFERENCES teams(id)
    )
    "#,
];

/// Handle to the club database (users, teams, match schedule)
#[derive(Clone)]
pub struct Store {
    pool: Pool<Sqlite>,
}

impl Store {
    /// Connect, creating the database file if needed, and ensure the schema
    pub async fn open(database_url: &str) -> Result<Self> {
        let open_err = |source| BotError::StoreOpen {
            url: database_url.to_string(),
            source,
        };

        let connect_options = SqliteConnectOptions::from_str(database_url)
            .map_err(open_err)?
            .create_if_missing(true);

        // Every connection to an in-memory database is a separate database
        let in_memory = database_url.contains(":memory:");
        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
                .connect_with(connect_options)
                .await
        } else {
            SqlitePoolOptions::new()
                .max_connections(5)
                .connect_with(connect_options)
                .await
        }
        .map_err(open_err)?;

        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(open_err)?;
        }

        info!("Opened store at {}", database_url);
        Ok(Self { pool })
    }

    /// Users with `allowed_access` set
    pub async fn load_authorized_users(&self) -> Result<Vec<AuthorizedUser>> {
        let rows = sqlx::query(
            "SELECT user_id, real_name, nickname FROM users WHERE allowed_access <> 0 ORDER BY user_id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(BotError::query("load_authorized_users"))?;

        rows.iter()
            .map(|row| {
                Ok(AuthorizedUser {
                    id: UserId(row.try_get::<i64, _>("user_id")? as u64),
                    name: row.try_get("real_name")?,
                    nickname: row.try_get("nickname")?,
                })
            })
            .collect::<std::result::Result<Vec<_>, sqlx::Error>>()
            .map_err(BotError::query("load_authorized_users"))
    }

    /// Teams in menu order
    pub async fn load_teams(&self) -> Result<Vec<Team>> {
        let rows = sqlx::query("SELECT id, name FROM teams ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(BotError::query("load_teams"))?;

        rows.iter()
            .map(|row| {
                Ok(Team {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                })
            })
            .collect::<std::result::Result<Vec<_>, sqlx::Error>>()
            .map_err(BotError::query("load_teams"))
    }

    /// Fixture between two teams in either home/away order.
    ///
    /// When the pair has several fixtures the earliest inserted one wins.
    pub async fn find_schedule_entry(&self, a: &Team, b: &Team) -> Result<Option<ScheduleEntry>> {
        let row = sqlx::query(
            r#"
            SELECT s.date, s.time, s.result, s.winner, t1.name AS team1, t2.name AS team2
            FROM schedule s
            JOIN teams t1 ON s.team1 = t1.id
            JOIN teams t2 ON s.team2 = t2.id
            WHERE (s.team1 = ? AND s.team2 = ?) OR (s.team1 = ? AND s.team2 = ?)
            ORDER BY s.id
            LIMIT 1
            "#,
        )
        .bind(a.id)
        .bind(b.id)
        .bind(b.id)
        .bind(a.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(BotError::query("find_schedule_entry"))?;

        let Some(row) = row else {
            debug!("No fixture for {} vs {}", a.name, b.name);
            return Ok(None);
        };

        let entry = (|| -> std::result::Result<ScheduleEntry, sqlx::Error> {
            Ok(ScheduleEntry {
                date: row.try_get("date")?,
                time: row.try_get("time")?,
                result: row.try_get("result")?,
                winner: row.try_get("winner")?,
                team1: row.try_get("team1")?,
                team2: row.try_get("team2")?,
            })
        })()
        .map_err(BotError::query("find_schedule_entry"))?;

        Ok(Some(entry))
    }

    /// Import users, teams and fixtures from a seed file.
    ///
    /// Users are upserted, existing teams are kept, fixtures are appended.
    pub async fn import_seed(&self, seed: &SeedData) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(BotError::query("import_seed"))?;

        for user in &seed.users {
            sqlx::query(
                r#"
                INSERT INTO users (user_id, real_name, nickname, allowed_access)
                VALUES (?, ?, ?, ?)
                ON CONFLICT(user_id) DO UPDATE SET
                    real_name = excluded.real_name,
                    nickname = excluded.nickname,
                    allowed_access = excluded.allowed_access
                "#,
            )
            .bind(user.id as i64)
            .bind(&user.name)
            .bind(&user.nickname)
            .bind(user.allowed as i64)
            .execute(&mut *tx)
            .await
            .map_err(BotError::query("import_seed"))?;
        }

        for name in &seed.teams {
            sqlx::query("INSERT OR IGNORE INTO teams (name) VALUES (?)")
                .bind(name)
                .execute(&mut *tx)
                .await
                .map_err(BotError::query("import_seed"))?;
        }

        for fixture in &seed.schedule {
            let mut team_ids = Vec::with_capacity(2);
            for name in [&fixture.team1, &fixture.team2] {
                let id: Option<i64> = sqlx::query_scalar("SELECT id FROM teams WHERE name = ?")
                    .bind(name)
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(BotError::query("import_seed"))?;
                team_ids.push(id.ok_or_else(|| BotError::TeamNotFound { name: name.clone() })?);
            }

            sqlx::query(
                "INSERT INTO schedule (date, time, result, winner, team1, team2) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&fixture.date)
            .bind(&fixture.time)
            .bind(&fixture.result)
            .bind(&fixture.winner)
            .bind(team_ids[0])
            .bind(team_ids[1])
            .execute(&mut *tx)
            .await
            .map_err(BotError::query("import_seed"))?;
        }

        tx.commit().await.map_err(BotError::query("import_seed"))?;

        info!(
            "Imported seed: {} users, {} teams, {} fixtures",
            seed.users.len(),
            seed.teams.len(),
            seed.schedule.len()
        );
        Ok(())
    }

    #[cfg(test)]
    pub(crate) async fn close(&self) {
        self.pool.close().await;
    }
}
