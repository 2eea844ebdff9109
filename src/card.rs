use crate::error::StoreError;
use crate::model::{PlayerKey, PlayerStat};
use crate::photo::{Photo, PhotoSource};
use crate::store::RecordStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFace {
    Front,
    Back,
}

impl CardFace {
    pub fn flipped(self) -> Self {
        match self {
            CardFace::Front => CardFace::Back,
            CardFace::Back => CardFace::Front,
        }
    }

    /// Label for the flip control: names the face the next flip reveals.
    pub fn flip_label(self) -> &'static str {
        match self {
            CardFace::Front => "View Stats",
            CardFace::Back => "View Photo",
        }
    }
}

/// Per-player detail card: photo on the front, season stats on the back.
#[derive(Debug, Clone)]
pub struct PlayerCard {
    player_key: PlayerKey,
    player_id: String,
    player_name: String,
    photo: Photo,
    stats: Vec<PlayerStat>,
    face: CardFace,
}

impl PlayerCard {
    /// Photo failures never surface here; stat lookups do.
    pub fn open<S: RecordStore + ?Sized>(
        store: &S,
        photos: &dyn PhotoSource,
        player_key: PlayerKey,
        player_id: &str,
        player_name: &str,
    ) -> Result<Self, StoreError> {
        let photo = Photo::resolve(photos, player_id);
        let stats = store.list_stats_for_player(player_key)?;
        Ok(Self {
            player_key,
            player_id: player_id.to_string(),
            player_name: player_name.to_string(),
            photo,
            stats,
            face: CardFace::Front,
        })
    }

    pub fn player_key(&self) -> PlayerKey {
        self.player_key
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn photo(&self) -> &Photo {
        &self.photo
    }

    pub fn stats(&self) -> &[PlayerStat] {
        &self.stats
    }

    pub fn face(&self) -> CardFace {
        self.face
    }

    pub fn flip(&mut self) -> CardFace {
        self.face = self.face.flipped();
        self.face
    }

    pub fn flip_label(&self) -> &'static str {
        self.face.flip_label()
    }

    pub fn stat_table(&self) -> StatTable {
        StatTable::from_stats(&self.stats)
    }
}

/// Stat columns never shown on the card.
pub const HIDDEN_STAT_COLUMNS: [&str; 3] = ["StatsId", "PlayerKey", "PlayerId"];

/// Every stat column in storage order, technical ones included.
pub fn stat_columns(stat: &PlayerStat) -> Vec<(&'static str, String)> {
    vec![
        ("StatsId", stat.stat_id.to_string()),
        ("PlayerKey", stat.player_key.to_string()),
        ("PlayerId", opt_text(stat.player_id.as_deref())),
        ("Season", opt_int(stat.season)),
        ("Team", opt_text(stat.team.as_deref())),
        ("G", opt_int(stat.games)),
        ("GS", opt_int(stat.games_started)),
        ("MP", opt_real(stat.minutes, 1)),
        ("PTS", opt_real(stat.points, 1)),
        ("TRB", opt_real(stat.rebounds, 1)),
        ("AST", opt_real(stat.assists, 1)),
        ("STL", opt_real(stat.steals, 1)),
        ("BLK", opt_real(stat.blocks, 1)),
        ("TOV", opt_real(stat.turnovers, 1)),
        ("FG%", opt_real(stat.fg_pct, 3)),
        ("3P%", opt_real(stat.three_pct, 3)),
        ("FT%", opt_real(stat.ft_pct, 3)),
    ]
}

/// Display projection of stat rows with the technical columns removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatTable {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl StatTable {
    pub fn from_stats(stats: &[PlayerStat]) -> Self {
        let headers = match stats.first() {
            Some(first) => stat_columns(first)
                .into_iter()
                .map(|(name, _)| name)
                .filter(|name| is_visible(name))
                .collect(),
            None => Vec::new(),
        };
        let rows = stats
            .iter()
            .map(|stat| {
                stat_columns(stat)
                    .into_iter()
                    .filter(|(name, _)| is_visible(name))
                    .map(|(_, value)| value)
                    .collect()
            })
            .collect();
        Self { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn is_visible(name: &str) -> bool {
    !HIDDEN_STAT_COLUMNS.contains(&name)
}

fn opt_text(v: Option<&str>) -> String {
    v.unwrap_or("").to_string()
}

fn opt_int(v: Option<i32>) -> String {
    v.map(|n| n.to_string()).unwrap_or_default()
}

fn opt_real(v: Option<f64>, places: usize) -> String {
    v.map(|n| format!("{n:.places$}")).unwrap_or_default()
}
