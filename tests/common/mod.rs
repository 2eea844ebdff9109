#![allow(dead_code)]

use std::cell::{Cell, RefCell};

use hoops_roster::error::PhotoError;
use hoops_roster::model::{NewPlayer, NewPlayerStat, Player, PlayerKey, PlayerStat};
use hoops_roster::photo::PhotoSource;
use hoops_roster::{RecordStore, StoreError};

/// In-memory store that counts every call and can be told to fail.
#[derive(Default)]
pub struct RecordingStore {
    pub players: RefCell<Vec<Player>>,
    pub stats: RefCell<Vec<PlayerStat>>,
    pub calls: Cell<usize>,
    pub writes: Cell<usize>,
    pub fail_writes: Cell<bool>,
    pub fail_reads: Cell<bool>,
    next_key: Cell<PlayerKey>,
}

impl RecordingStore {
    pub fn with_players(players: Vec<NewPlayer>) -> Self {
        let store = Self::default();
        for p in players {
            store.insert_player(&p).unwrap();
        }
        store.calls.set(0);
        store.writes.set(0);
        store
    }

    fn touch(&self, write: bool) -> Result<(), StoreError> {
        self.calls.set(self.calls.get() + 1);
        if write {
            self.writes.set(self.writes.get() + 1);
            if self.fail_writes.get() {
                return Err(StoreError::Database(rusqlite::Error::InvalidQuery));
            }
        } else if self.fail_reads.get() {
            return Err(StoreError::Database(rusqlite::Error::InvalidQuery));
        }
        Ok(())
    }
}

impl RecordStore for RecordingStore {
    fn list_players(&self) -> Result<Vec<Player>, StoreError> {
        self.touch(false)?;
        Ok(self.players.borrow().clone())
    }

    fn find_player(&self, key: PlayerKey) -> Result<Player, StoreError> {
        self.touch(false)?;
        self.players
            .borrow()
            .iter()
            .find(|p| p.player_key == key)
            .cloned()
            .ok_or(StoreError::NotFound(key))
    }

    fn insert_player(&self, player: &NewPlayer) -> Result<Player, StoreError> {
        self.touch(true)?;
        let key = self.next_key.get() + 1;
        self.next_key.set(key);
        let player = player.clone().with_key(key);
        self.players.borrow_mut().push(player.clone());
        Ok(player)
    }

    fn update_player(&self, key: PlayerKey, player: &NewPlayer) -> Result<(), StoreError> {
        self.touch(true)?;
        let mut players = self.players.borrow_mut();
        let slot = players
            .iter_mut()
            .find(|p| p.player_key == key)
            .ok_or(StoreError::NotFound(key))?;
        *slot = player.clone().with_key(key);
        Ok(())
    }

    fn delete_player(&self, key: PlayerKey) -> Result<(), StoreError> {
        self.touch(true)?;
        let mut players = self.players.borrow_mut();
        let before = players.len();
        players.retain(|p| p.player_key != key);
        if players.len() == before {
            return Err(StoreError::NotFound(key));
        }
        Ok(())
    }

    fn list_stats_for_player(&self, key: PlayerKey) -> Result<Vec<PlayerStat>, StoreError> {
        self.touch(false)?;
        Ok(self
            .stats
            .borrow()
            .iter()
            .filter(|s| s.player_key == key)
            .cloned()
            .collect())
    }

    fn insert_stat(&self, stat: &NewPlayerStat) -> Result<PlayerStat, StoreError> {
        self.touch(true)?;
        let id = self.stats.borrow().len() as i64 + 1;
        let stat = stat.clone().with_id(id);
        self.stats.borrow_mut().push(stat.clone());
        Ok(stat)
    }
}

/// Photo source that always fails, like an unreachable host.
pub struct Unreachable;

impl PhotoSource for Unreachable {
    fn fetch(&self, player_id: &str) -> Result<Vec<u8>, PhotoError> {
        Err(PhotoError::Other(format!("connection refused for {player_id}")))
    }
}

/// Serves a tiny generated PNG for every id.
pub struct SolidPng;

impl PhotoSource for SolidPng {
    fn fetch(&self, _player_id: &str) -> Result<Vec<u8>, PhotoError> {
        let img = image::RgbaImage::from_pixel(8, 12, image::Rgba([200, 40, 40, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png)?;
        Ok(out.into_inner())
    }
}

pub fn new_player(id: &str, name: &str, age: i32, team: &str, season: i32) -> NewPlayer {
    NewPlayer {
        player_id: id.to_string(),
        name: name.to_string(),
        age: Some(age),
        team: Some(team.to_string()),
        season: Some(season),
    }
}

pub fn sample_roster() -> Vec<NewPlayer> {
    vec![
        new_player("jamesle01", "LeBron James", 39, "LAL", 2024),
        new_player("davisan02", "Anthony Davis", 30, "LAL", 2024),
        new_player("curryst01", "Stephen Curry", 36, "GSW", 2024),
        new_player("butleji01", "Jimmy Butler", 30, "MIA", 2024),
        new_player("reaveau01", "Austin Reaves", 25, "Lakers", 2023),
    ]
}

impl RecordingStore {
    /// Direct view of the rows, bypassing the call counters.
    pub fn list_all(&self) -> Vec<Player> {
        self.players.borrow().clone()
    }

    pub fn find(&self, key: PlayerKey) -> Option<Player> {
        self.players
            .borrow()
            .iter()
            .find(|p| p.player_key == key)
            .cloned()
    }
}
