use serde::{Deserialize, Serialize};

pub type PlayerKey = i64;
pub type StatId = i64;

/// One roster row. `player_key` is assigned by the store and never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub player_key: PlayerKey,
    pub player_id: String,
    pub name: String,
    pub age: Option<i32>,
    pub team: Option<String>,
    pub season: Option<i32>,
}

/// Player values without a key, as written by insert and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPlayer {
    pub player_id: String,
    pub name: String,
    pub age: Option<i32>,
    pub team: Option<String>,
    pub season: Option<i32>,
}

impl NewPlayer {
    pub fn with_key(self, player_key: PlayerKey) -> Player {
        Player {
            player_key,
            player_id: self.player_id,
            name: self.name,
            age: self.age,
            team: self.team,
            season: self.season,
        }
    }
}

/// A season stat line. Everything past `player_id` is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStat {
    pub stat_id: StatId,
    pub player_key: PlayerKey,
    pub player_id: Option<String>,
    pub season: Option<i32>,
    pub team: Option<String>,
    pub games: Option<i32>,
    pub games_started: Option<i32>,
    pub minutes: Option<f64>,
    pub points: Option<f64>,
    pub rebounds: Option<f64>,
    pub assists: Option<f64>,
    pub steals: Option<f64>,
    pub blocks: Option<f64>,
    pub turnovers: Option<f64>,
    pub fg_pct: Option<f64>,
    pub three_pct: Option<f64>,
    pub ft_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewPlayerStat {
    #[serde(default)]
    pub player_key: PlayerKey,
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default)]
    pub season: Option<i32>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub games: Option<i32>,
    #[serde(default)]
    pub games_started: Option<i32>,
    #[serde(default)]
    pub minutes: Option<f64>,
    #[serde(default)]
    pub points: Option<f64>,
    #[serde(default)]
    pub rebounds: Option<f64>,
    #[serde(default)]
    pub assists: Option<f64>,
    #[serde(default)]
    pub steals: Option<f64>,
    #[serde(default)]
    pub blocks: Option<f64>,
    #[serde(default)]
    pub turnovers: Option<f64>,
    #[serde(default)]
    pub fg_pct: Option<f64>,
    #[serde(default)]
    pub three_pct: Option<f64>,
    #[serde(default)]
    pub ft_pct: Option<f64>,
}

impl NewPlayerStat {
    pub fn with_id(self, stat_id: StatId) -> PlayerStat {
        PlayerStat {
            stat_id,
            player_key: self.player_key,
            player_id: self.player_id,
            season: self.season,
            team: self.team,
            games: self.games,
            games_started: self.games_started,
            minutes: self.minutes,
            points: self.points,
            rebounds: self.rebounds,
            assists: self.assists,
            steals: self.steals,
            blocks: self.blocks,
            turnovers: self.turnovers,
            fg_pct: self.fg_pct,
            three_pct: self.three_pct,
            ft_pct: self.ft_pct,
        }
    }
}

/// Names of the editable roster fields, used to report which input failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    PlayerId,
    Name,
    Age,
    Team,
    Season,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::PlayerId,
        Field::Name,
        Field::Age,
        Field::Team,
        Field::Season,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::PlayerId => "Player ID",
            Field::Name => "Name",
            Field::Age => "Age",
            Field::Team => "Team",
            Field::Season => "Season",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw text of the five input boxes. Filter criteria use the same shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerFields {
    pub player_id: String,
    pub name: String,
    pub age: String,
    pub team: String,
    pub season: String,
}

pub type FilterCriteria = PlayerFields;

impl PlayerFields {
    pub fn from_player(player: &Player) -> Self {
        Self {
            player_id: player.player_id.clone(),
            name: player.name.clone(),
            age: player.age.map(|a| a.to_string()).unwrap_or_default(),
            team: player.team.clone().unwrap_or_default(),
            season: player.season.map(|s| s.to_string()).unwrap_or_default(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::PlayerId => &self.player_id,
            Field::Name => &self.name,
            Field::Age => &self.age,
            Field::Team => &self.team,
            Field::Season => &self.season,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::PlayerId => &mut self.player_id,
            Field::Name => &mut self.name,
            Field::Age => &mut self.age,
            Field::Team => &mut self.team,
            Field::Season => &mut self.season,
        }
    }
}

pub fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

/// Integer parse that tolerates surrounding whitespace and a leading sign.
pub fn parse_int(raw: &str) -> Option<i32> {
    raw.trim().parse::<i32>().ok()
}
