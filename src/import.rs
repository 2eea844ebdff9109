use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::model::{NewPlayer, NewPlayerStat, is_blank};
use crate::store::RecordStore;

/// On-disk roster file: players with their season stat lines nested.
#[derive(Debug, Clone, Deserialize)]
pub struct RosterFile {
    pub players: Vec<ImportedPlayer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportedPlayer {
    pub player_id: String,
    pub name: String,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub season: Option<i32>,
    #[serde(default)]
    pub stats: Vec<NewPlayerStat>,
}

#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    pub players_inserted: usize,
    pub stats_inserted: usize,
    pub skipped: Vec<String>,
}

pub fn parse_roster_json(raw: &str) -> Result<RosterFile> {
    serde_json::from_str(raw).context("parse roster json")
}

pub fn read_roster_file(path: &Path) -> Result<RosterFile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read roster file {}", path.display()))?;
    parse_roster_json(&raw)
}

/// Inserts every usable player and its stats. Players missing an id or name
/// are skipped and listed in the summary; store failures abort the import.
pub fn import_roster(store: &dyn RecordStore, file: &RosterFile) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();

    for (idx, item) in file.players.iter().enumerate() {
        if is_blank(&item.player_id) || is_blank(&item.name) {
            summary.skipped.push(format!(
                "entry {idx}: player_id and name are required ({:?})",
                item.name
            ));
            continue;
        }

        let player = store
            .insert_player(&NewPlayer {
                player_id: item.player_id.trim().to_string(),
                name: item.name.trim().to_string(),
                age: item.age,
                team: item
                    .team
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string),
                season: item.season,
            })
            .with_context(|| format!("insert player {}", item.player_id))?;
        summary.players_inserted += 1;

        for stat in &item.stats {
            let mut stat = stat.clone();
            stat.player_key = player.player_key;
            stat.player_id = Some(player.player_id.clone());
            store
                .insert_stat(&stat)
                .with_context(|| format!("insert stats for {}", player.player_id))?;
            summary.stats_inserted += 1;
        }
        log::debug!(
            "imported {} with {} stat lines",
            player.player_id,
            item.stats.len()
        );
    }

    if summary.players_inserted == 0 && !file.players.is_empty() {
        return Err(anyhow!("no importable players in roster file"));
    }
    Ok(summary)
}
