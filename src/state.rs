use std::collections::VecDeque;

use chrono::Local;

use crate::card::{CardFace, PlayerCard};
use crate::error::RosterError;
use crate::model::{Field, Player};
use crate::photo::PhotoSource;
use crate::roster::Roster;
use crate::store::RecordStore;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Grid,
    Filter(Field),
    Edit(Field),
}

impl Focus {
    fn step(self, forward: bool) -> Self {
        let next = |field: Field| {
            let idx = Field::ALL.iter().position(|f| *f == field).unwrap_or(0);
            let len = Field::ALL.len();
            let idx = if forward {
                (idx + 1) % len
            } else {
                (idx + len - 1) % len
            };
            Field::ALL[idx]
        };
        match self {
            Focus::Grid => Focus::Grid,
            Focus::Filter(f) => Focus::Filter(next(f)),
            Focus::Edit(f) => Focus::Edit(next(f)),
        }
    }
}

/// Everything the terminal UI renders, plus the actions its keys trigger.
pub struct AppState<S> {
    pub roster: Roster<S>,
    pub photos: Box<dyn PhotoSource>,
    pub cursor: usize,
    pub focus: Focus,
    pub card: Option<PlayerCard>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl<S: RecordStore> AppState<S> {
    pub fn new(roster: Roster<S>, photos: Box<dyn PhotoSource>) -> Self {
        Self {
            roster,
            photos,
            cursor: 0,
            focus: Focus::Grid,
            card: None,
            logs: VecDeque::with_capacity(MAX_LOGS),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        let line = format!("{} {}", Local::now().format("%H:%M:%S"), msg.into());
        self.logs.push_back(line);
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn players(&self) -> &[Player] {
        self.roster.players()
    }

    pub fn load(&mut self) {
        match self.roster.load() {
            Ok(()) => {
                self.clamp_cursor();
                let count = self.players().len();
                self.push_log(format!("[INFO] Loaded {count} players"));
            }
            Err(err) => self.report("loading players", err, Focus::Edit),
        }
    }

    pub fn apply_filters(&mut self) {
        match self.roster.apply_filters() {
            Ok(outcome) => {
                self.cursor = 0;
                if outcome.is_empty() {
                    self.push_log("[INFO] No players match the entered search filters.");
                } else {
                    self.push_log(format!("[INFO] {} players match", outcome.matched));
                }
            }
            Err(err) => self.report("filtering players", err, Focus::Filter),
        }
    }

    pub fn clear_filters(&mut self) {
        match self.roster.clear_filters() {
            Ok(()) => {
                self.clamp_cursor();
                self.push_log("[INFO] Filters cleared");
            }
            Err(err) => self.report("loading players", err, Focus::Edit),
        }
    }

    pub fn add_player(&mut self) {
        match self.roster.add_player() {
            Ok(player) => {
                if let Some(idx) = self
                    .players()
                    .iter()
                    .position(|p| p.player_key == player.player_key)
                {
                    self.cursor = idx;
                }
                self.clamp_cursor();
                self.push_log("[OK] Player added successfully.");
            }
            Err(err) => self.report("adding player", err, Focus::Edit),
        }
    }

    pub fn update_player(&mut self) {
        match self.roster.update_player() {
            Ok(()) => {
                self.clamp_cursor();
                self.push_log("[OK] Player updated successfully.");
            }
            Err(err) => self.report("updating player", err, Focus::Edit),
        }
    }

    pub fn delete_player(&mut self) {
        match self.roster.delete_player() {
            Ok(()) => {
                self.clamp_cursor();
                self.push_log("[OK] Player deleted successfully.");
            }
            Err(err) => self.report("deleting player", err, Focus::Edit),
        }
    }

    /// Selects the row under the cursor, syncing the edit fields.
    pub fn select_cursor(&mut self) {
        let key = self.players().get(self.cursor).map(|p| p.player_key);
        self.roster.select(key);
    }

    pub fn select_next(&mut self) {
        let total = self.players().len();
        if total == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = (self.cursor + 1).min(total - 1);
        self.select_cursor();
    }

    pub fn select_prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        if !self.players().is_empty() {
            self.select_cursor();
        }
    }

    pub fn open_card(&mut self) {
        if self.roster.selected().is_none() {
            self.select_cursor();
        }
        match self.roster.open_card(self.photos.as_ref()) {
            Ok(card) => {
                if card.photo().is_placeholder() {
                    self.push_log(format!("[INFO] No photo for {}", card.player_id()));
                }
                self.card = Some(card);
            }
            Err(err) => self.report("opening player card", err, Focus::Edit),
        }
    }

    pub fn flip_card(&mut self) -> Option<CardFace> {
        self.card.as_mut().map(PlayerCard::flip)
    }

    pub fn close_card(&mut self) {
        self.card = None;
    }

    pub fn focus_filters(&mut self) {
        self.focus = Focus::Filter(Field::PlayerId);
    }

    pub fn focus_fields(&mut self) {
        self.focus = Focus::Edit(Field::PlayerId);
    }

    pub fn focus_grid(&mut self) {
        self.focus = Focus::Grid;
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.step(true);
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.step(false);
    }

    pub fn input_char(&mut self, c: char) {
        if let Some(text) = self.focused_text_mut() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.focused_text_mut() {
            text.pop();
        }
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Grid => None,
            Focus::Filter(field) => Some(self.roster.criteria_mut().get_mut(field)),
            Focus::Edit(field) => Some(self.roster.fields_mut().get_mut(field)),
        }
    }

    fn clamp_cursor(&mut self) {
        let total = self.players().len();
        self.cursor = self.cursor.min(total.saturating_sub(1));
    }

    fn report(&mut self, action: &str, err: RosterError, refocus: fn(Field) -> Focus) {
        match &err {
            RosterError::Validation { .. } | RosterError::NoSelection { .. } => {
                self.push_log(format!("[WARN] {err}"));
                if let Some(field) = err.field() {
                    self.focus = refocus(field);
                }
            }
            RosterError::Store(_) => {
                log::error!("error {action}: {err}");
                self.push_log(format!("[ERR] Error {action}: {err}"));
            }
        }
    }
}
