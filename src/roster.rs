use crate::card::PlayerCard;
use crate::error::RosterError;
use crate::filter::PlayerFilter;
use crate::model::{
    Field, FilterCriteria, NewPlayer, Player, PlayerFields, PlayerKey, is_blank, parse_int,
};
use crate::photo::PhotoSource;
use crate::store::RecordStore;

/// Result of a successful filter pass. An empty match is informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOutcome {
    pub matched: usize,
}

impl FilterOutcome {
    pub fn is_empty(&self) -> bool {
        self.matched == 0
    }
}

/// Mediates between the raw input boxes and the record store.
///
/// `players` is only ever replaced wholesale by a successful read, so a
/// failed mutation leaves the last loaded list in place.
pub struct Roster<S> {
    store: S,
    players: Vec<Player>,
    criteria: FilterCriteria,
    fields: PlayerFields,
    selected: Option<PlayerKey>,
}

impl<S: RecordStore> Roster<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            players: Vec::new(),
            criteria: FilterCriteria::default(),
            fields: PlayerFields::default(),
            selected: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn criteria_mut(&mut self) -> &mut FilterCriteria {
        &mut self.criteria
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    pub fn fields(&self) -> &PlayerFields {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut PlayerFields {
        &mut self.fields
    }

    pub fn set_fields(&mut self, fields: PlayerFields) {
        self.fields = fields;
    }

    pub fn selected(&self) -> Option<PlayerKey> {
        self.selected
    }

    pub fn selected_player(&self) -> Option<&Player> {
        let key = self.selected?;
        self.players.iter().find(|p| p.player_key == key)
    }

    pub fn load(&mut self) -> Result<(), RosterError> {
        let players = self.store.list_players()?;
        log::debug!("loaded {} players", players.len());
        self.players = players;
        self.selected = None;
        Ok(())
    }

    /// Selects a displayed row and copies its values into the input fields.
    /// Returns false (and clears the selection) when the key is not shown.
    pub fn select(&mut self, key: Option<PlayerKey>) -> bool {
        let Some(player) = key.and_then(|k| self.players.iter().find(|p| p.player_key == k)) else {
            self.selected = None;
            return false;
        };
        self.fields = PlayerFields::from_player(player);
        self.selected = Some(player.player_key);
        true
    }

    pub fn apply_filters(&mut self) -> Result<FilterOutcome, RosterError> {
        let filter = PlayerFilter::parse(&self.criteria)?;
        let all = self.store.list_players()?;
        let players = filter.apply(&all);
        let outcome = FilterOutcome {
            matched: players.len(),
        };
        if outcome.is_empty() {
            log::info!("no players match the entered filters");
        }
        self.players = players;
        self.selected = None;
        Ok(outcome)
    }

    pub fn clear_filters(&mut self) -> Result<(), RosterError> {
        self.criteria = FilterCriteria::default();
        self.load()
    }

    pub fn add_player(&mut self) -> Result<Player, RosterError> {
        let new_player = validate_fields(&self.fields)?;
        let player = self.store.insert_player(&new_player)?;
        log::info!(
            "added player {} ({}) as key {}",
            player.name,
            player.player_id,
            player.player_key
        );
        self.load()?;
        Ok(player)
    }

    pub fn update_player(&mut self) -> Result<(), RosterError> {
        let key = self
            .selected
            .ok_or(RosterError::NoSelection { action: "update" })?;
        let new_player = validate_fields(&self.fields)?;
        self.store.update_player(key, &new_player)?;
        log::info!("updated player key {key}");
        self.load()
    }

    pub fn delete_player(&mut self) -> Result<(), RosterError> {
        let key = self
            .selected
            .ok_or(RosterError::NoSelection { action: "delete" })?;
        self.store.delete_player(key)?;
        log::info!("deleted player key {key}");
        self.load()
    }

    pub fn open_card(&self, photos: &dyn PhotoSource) -> Result<PlayerCard, RosterError> {
        let player = self
            .selected_player()
            .ok_or(RosterError::NoSelection { action: "view" })?;
        let card = PlayerCard::open(
            &self.store,
            photos,
            player.player_key,
            &player.player_id,
            &player.name,
        )?;
        Ok(card)
    }
}

/// Checks the add/update inputs. Required text fields are reported first
/// (in display order), then age, then season.
pub fn validate_fields(fields: &PlayerFields) -> Result<NewPlayer, RosterError> {
    for field in [Field::PlayerId, Field::Name, Field::Team] {
        if is_blank(fields.get(field)) {
            return Err(RosterError::validation(
                field,
                format!("{field} is a required field."),
            ));
        }
    }
    let age = parse_int(&fields.age)
        .ok_or_else(|| RosterError::validation(Field::Age, "Age must be a valid number."))?;
    let season = parse_int(&fields.season)
        .ok_or_else(|| RosterError::validation(Field::Season, "Season must be a valid number."))?;

    Ok(NewPlayer {
        player_id: fields.player_id.trim().to_string(),
        name: fields.name.trim().to_string(),
        age: Some(age),
        team: Some(fields.team.trim().to_string()),
        season: Some(season),
    })
}
