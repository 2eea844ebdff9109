use crate::error::RosterError;
use crate::model::{Field, FilterCriteria, Player, is_blank, parse_int};

/// Compiled roster filter. Text fields match by case-sensitive substring,
/// numeric fields by equality; an unset field matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerFilter {
    pub player_id: Option<String>,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub team: Option<String>,
    pub season: Option<i32>,
}

impl PlayerFilter {
    pub fn parse(criteria: &FilterCriteria) -> Result<Self, RosterError> {
        let age = parse_numeric(&criteria.age, Field::Age)?;
        let season = parse_numeric(&criteria.season, Field::Season)?;

        Ok(Self {
            player_id: text_criterion(&criteria.player_id),
            name: text_criterion(&criteria.name),
            age,
            team: text_criterion(&criteria.team),
            season,
        })
    }

    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, player: &Player) -> bool {
        if let Some(needle) = &self.player_id {
            if !player.player_id.contains(needle.as_str()) {
                return false;
            }
        }
        if let Some(needle) = &self.name {
            if !player.name.contains(needle.as_str()) {
                return false;
            }
        }
        if let Some(age) = self.age {
            if player.age != Some(age) {
                return false;
            }
        }
        if let Some(needle) = &self.team {
            let hit = player
                .team
                .as_deref()
                .is_some_and(|team| team.contains(needle.as_str()));
            if !hit {
                return false;
            }
        }
        if let Some(season) = self.season {
            if player.season != Some(season) {
                return false;
            }
        }
        true
    }

    /// Keeps matching players in their original order.
    pub fn apply(&self, players: &[Player]) -> Vec<Player> {
        players.iter().filter(|p| self.matches(p)).cloned().collect()
    }
}

fn text_criterion(raw: &str) -> Option<String> {
    if is_blank(raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

fn parse_numeric(raw: &str, field: Field) -> Result<Option<i32>, RosterError> {
    if is_blank(raw) {
        return Ok(None);
    }
    parse_int(raw).map(Some).ok_or_else(|| {
        RosterError::validation(field, format!("{field} filter must be a valid number."))
    })
}
