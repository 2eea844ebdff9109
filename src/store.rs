use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::error::StoreError;
use crate::model::{NewPlayer, NewPlayerStat, Player, PlayerKey, PlayerStat};

/// Persistence gateway for players and their stat lines.
///
/// Every call is a single round trip. Implementations must not hold a
/// transaction open between calls.
pub trait RecordStore {
    fn list_players(&self) -> Result<Vec<Player>, StoreError>;
    fn find_player(&self, key: PlayerKey) -> Result<Player, StoreError>;
    fn insert_player(&self, player: &NewPlayer) -> Result<Player, StoreError>;
    fn update_player(&self, key: PlayerKey, player: &NewPlayer) -> Result<(), StoreError>;
    fn delete_player(&self, key: PlayerKey) -> Result<(), StoreError>;
    fn list_stats_for_player(&self, key: PlayerKey) -> Result<Vec<PlayerStat>, StoreError>;
    fn insert_stat(&self, stat: &NewPlayerStat) -> Result<PlayerStat, StoreError>;
}

impl<S: RecordStore + ?Sized> RecordStore for &S {
    fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        (**self).list_players()
    }
    fn find_player(&self, key: PlayerKey) -> Result<Player, StoreError> {
        (**self).find_player(key)
    }
    fn insert_player(&self, player: &NewPlayer) -> Result<Player, StoreError> {
        (**self).insert_player(player)
    }
    fn update_player(&self, key: PlayerKey, player: &NewPlayer) -> Result<(), StoreError> {
        (**self).update_player(key, player)
    }
    fn delete_player(&self, key: PlayerKey) -> Result<(), StoreError> {
        (**self).delete_player(key)
    }
    fn list_stats_for_player(&self, key: PlayerKey) -> Result<Vec<PlayerStat>, StoreError> {
        (**self).list_stats_for_player(key)
    }
    fn insert_stat(&self, stat: &NewPlayerStat) -> Result<PlayerStat, StoreError> {
        (**self).insert_stat(stat)
    }
}

const PLAYER_COLUMNS: &str = "player_key, player_id, player, age, team, season";

const STAT_COLUMNS: &str = "stats_id, player_key, player_id, season, team, games, games_started, \
     minutes, points, rebounds, assists, steals, blocks, turnovers, fg_pct, three_pct, ft_pct";

/// SQLite-backed store. Holds only the file path; each operation opens its
/// own connection and drops it before returning.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Creates the parent directory and schema if needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let store = Self { path };
        let conn = store.connect()?;
        init_schema(&conn)?;
        log::debug!("opened roster db {}", store.path.display());
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }
}

pub fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS players (
            player_key INTEGER PRIMARY KEY AUTOINCREMENT,
            player_id TEXT NOT NULL,
            player TEXT NOT NULL,
            age INTEGER NULL,
            team TEXT NULL,
            season INTEGER NULL
        );
        CREATE INDEX IF NOT EXISTS idx_players_player_id ON players(player_id);

        CREATE TABLE IF NOT EXISTS player_stats (
            stats_id INTEGER PRIMARY KEY AUTOINCREMENT,
            player_key INTEGER NOT NULL REFERENCES players(player_key) ON DELETE CASCADE,
            player_id TEXT NULL,
            season INTEGER NULL,
            team TEXT NULL,
            games INTEGER NULL,
            games_started INTEGER NULL,
            minutes REAL NULL,
            points REAL NULL,
            rebounds REAL NULL,
            assists REAL NULL,
            steals REAL NULL,
            blocks REAL NULL,
            turnovers REAL NULL,
            fg_pct REAL NULL,
            three_pct REAL NULL,
            ft_pct REAL NULL
        );
        CREATE INDEX IF NOT EXISTS idx_player_stats_player ON player_stats(player_key);
        "#,
    )?;
    Ok(())
}

impl RecordStore for SqliteStore {
    fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PLAYER_COLUMNS} FROM players ORDER BY player_key ASC"
        ))?;
        let rows = stmt.query_map([], player_from_row)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn find_player(&self, key: PlayerKey) -> Result<Player, StoreError> {
        let conn = self.connect()?;
        conn.query_row(
            &format!("SELECT {PLAYER_COLUMNS} FROM players WHERE player_key = ?1"),
            params![key],
            player_from_row,
        )
        .optional()?
        .ok_or(StoreError::NotFound(key))
    }

    fn insert_player(&self, player: &NewPlayer) -> Result<Player, StoreError> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO players (player_id, player, age, team, season)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                player.player_id,
                player.name,
                player.age,
                player.team,
                player.season
            ],
        )?;
        let key = conn.last_insert_rowid();
        Ok(player.clone().with_key(key))
    }

    fn update_player(&self, key: PlayerKey, player: &NewPlayer) -> Result<(), StoreError> {
        let conn = self.connect()?;
        let changed = conn.execute(
            "UPDATE players
             SET player_id = ?1, player = ?2, age = ?3, team = ?4, season = ?5
             WHERE player_key = ?6",
            params![
                player.player_id,
                player.name,
                player.age,
                player.team,
                player.season,
                key
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(key));
        }
        Ok(())
    }

    fn delete_player(&self, key: PlayerKey) -> Result<(), StoreError> {
        let conn = self.connect()?;
        let changed = conn.execute("DELETE FROM players WHERE player_key = ?1", params![key])?;
        if changed == 0 {
            return Err(StoreError::NotFound(key));
        }
        Ok(())
    }

    fn list_stats_for_player(&self, key: PlayerKey) -> Result<Vec<PlayerStat>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {STAT_COLUMNS} FROM player_stats
             WHERE player_key = ?1
             ORDER BY season ASC, stats_id ASC"
        ))?;
        let rows = stmt.query_map(params![key], stat_from_row)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn insert_stat(&self, stat: &NewPlayerStat) -> Result<PlayerStat, StoreError> {
        let conn = self.connect()?;
        conn.execute(
            r#"
            INSERT INTO player_stats (
                player_key, player_id, season, team, games, games_started,
                minutes, points, rebounds, assists, steals, blocks, turnovers,
                fg_pct, three_pct, ft_pct
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                ?14, ?15, ?16
            )
            "#,
            params![
                stat.player_key,
                stat.player_id,
                stat.season,
                stat.team,
                stat.games,
                stat.games_started,
                stat.minutes,
                stat.points,
                stat.rebounds,
                stat.assists,
                stat.steals,
                stat.blocks,
                stat.turnovers,
                stat.fg_pct,
                stat.three_pct,
                stat.ft_pct,
            ],
        )?;
        let id = conn.last_insert_rowid();
        Ok(stat.clone().with_id(id))
    }
}

fn player_from_row(row: &Row<'_>) -> rusqlite::Result<Player> {
    Ok(Player {
        player_key: row.get(0)?,
        player_id: row.get(1)?,
        name: row.get(2)?,
        age: row.get(3)?,
        team: row.get(4)?,
        season: row.get(5)?,
    })
}

fn stat_from_row(row: &Row<'_>) -> rusqlite::Result<PlayerStat> {
    Ok(PlayerStat {
        stat_id: row.get(0)?,
        player_key: row.get(1)?,
        player_id: row.get(2)?,
        season: row.get(3)?,
        team: row.get(4)?,
        games: row.get(5)?,
        games_started: row.get(6)?,
        minutes: row.get(7)?,
        points: row.get(8)?,
        rebounds: row.get(9)?,
        assists: row.get(10)?,
        steals: row.get(11)?,
        blocks: row.get(12)?,
        turnovers: row.get(13)?,
        fg_pct: row.get(14)?,
        three_pct: row.get(15)?,
        ft_pct: row.get(16)?,
    })
}
