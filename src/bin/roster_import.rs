use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use hoops_roster::SqliteStore;
use hoops_roster::config::AppConfig;
use hoops_roster::import::{import_roster, read_roster_file};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Some(input) = parse_input_arg() else {
        return Err(anyhow!(
            "usage: roster_import <roster.json> [--db <path>]"
        ));
    };

    let db_path = match parse_db_path_arg() {
        Some(path) => path,
        None => AppConfig::load()?.db_path,
    };

    let file = read_roster_file(&input)?;
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("open roster db {}", db_path.display()))?;
    let summary = import_roster(&store, &file)?;

    println!("Roster import complete");
    println!("DB: {}", store.path().display());
    println!("Players inserted: {}", summary.players_inserted);
    println!("Stat lines inserted: {}", summary.stats_inserted);
    if !summary.skipped.is_empty() {
        println!("Skipped: {}", summary.skipped.len());
        for reason in summary.skipped.iter().take(10) {
            println!("   - {reason}");
        }
    }
    Ok(())
}

fn parse_input_arg() -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut skip_next = false;
    for arg in &args {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg == "--db" {
            skip_next = true;
            continue;
        }
        if arg.starts_with("--") {
            continue;
        }
        return Some(PathBuf::from(arg));
    }
    None
}

fn parse_db_path_arg() -> Option<PathBuf> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix("--db=") {
            return Some(PathBuf::from(value));
        }
        if arg == "--db" {
            return args.get(idx + 1).map(PathBuf::from);
        }
    }
    None
}
