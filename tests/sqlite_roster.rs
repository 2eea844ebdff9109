use hoops_roster::model::{FilterCriteria, NewPlayerStat, PlayerFields};
use hoops_roster::{RecordStore, Roster, SqliteStore};

fn scratch_store() -> (tempfile::TempDir, SqliteStore) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SqliteStore::open(dir.path().join("nested").join("roster.sqlite"))
        .expect("store should open");
    (dir, store)
}

fn lebron_fields() -> PlayerFields {
    PlayerFields {
        player_id: "jamesle01".to_string(),
        name: "LeBron James".to_string(),
        age: "39".to_string(),
        team: "LAL".to_string(),
        season: "2024".to_string(),
    }
}

#[test]
fn added_player_is_retrievable_by_assigned_key() {
    let (_dir, store) = scratch_store();
    let mut roster = Roster::new(store.clone());
    roster.load().unwrap();
    assert!(roster.players().is_empty());

    roster.set_fields(lebron_fields());
    let added = roster.add_player().unwrap();

    let found = store.find_player(added.player_key).unwrap();
    assert_eq!(found, added);
    assert_eq!(found.name, "LeBron James");
    assert_eq!(found.age, Some(39));
    assert_eq!(found.team.as_deref(), Some("LAL"));
    assert_eq!(found.season, Some(2024));
    assert_eq!(roster.players(), store.list_players().unwrap().as_slice());
}

#[test]
fn list_reflects_every_mutation() {
    let (_dir, store) = scratch_store();
    let mut roster = Roster::new(store.clone());
    roster.load().unwrap();

    roster.set_fields(lebron_fields());
    let first = roster.add_player().unwrap();
    roster.set_fields(PlayerFields {
        player_id: "jamesbr02".to_string(),
        name: "Bronny James".to_string(),
        age: "19".to_string(),
        team: "LAL".to_string(),
        season: "2024".to_string(),
    });
    let second = roster.add_player().unwrap();
    assert_ne!(first.player_key, second.player_key);
    assert_eq!(roster.players().len(), 2);

    roster.select(Some(second.player_key));
    roster.fields_mut().team = "SDW".to_string();
    roster.update_player().unwrap();
    assert_eq!(roster.players(), store.list_players().unwrap().as_slice());
    assert_eq!(
        store.find_player(second.player_key).unwrap().team.as_deref(),
        Some("SDW")
    );

    roster.select(Some(first.player_key));
    roster.delete_player().unwrap();
    assert_eq!(roster.players(), store.list_players().unwrap().as_slice());
    assert_eq!(roster.players().len(), 1);
}

#[test]
fn duplicate_player_ids_are_allowed() {
    let (_dir, store) = scratch_store();
    let mut roster = Roster::new(store.clone());
    roster.set_fields(lebron_fields());
    roster.add_player().unwrap();
    roster.add_player().unwrap();

    roster.set_criteria(FilterCriteria {
        player_id: "jamesle01".to_string(),
        ..FilterCriteria::default()
    });
    assert_eq!(roster.apply_filters().unwrap().matched, 2);
}

#[test]
fn stats_come_back_for_their_player_only() {
    let (_dir, store) = scratch_store();
    let mut roster = Roster::new(store.clone());
    roster.set_fields(lebron_fields());
    let lebron = roster.add_player().unwrap();
    roster.fields_mut().player_id = "curryst01".to_string();
    let other = roster.add_player().unwrap();

    let lines = [
        (lebron.player_key, 2023),
        (lebron.player_key, 2024),
        (other.player_key, 2024),
    ];
    for (key, season) in lines {
        store
            .insert_stat(&NewPlayerStat {
                player_key: key,
                season: Some(season),
                points: Some(25.0),
                ..NewPlayerStat::default()
            })
            .unwrap();
    }

    let stats = store.list_stats_for_player(lebron.player_key).unwrap();
    assert_eq!(stats.len(), 2);
    assert!(stats.iter().all(|s| s.player_key == lebron.player_key));
    assert_eq!(stats[0].season, Some(2023));
}

#[test]
fn reopening_keeps_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roster.sqlite");
    {
        let store = SqliteStore::open(&path).unwrap();
        let mut roster = Roster::new(store);
        roster.set_fields(lebron_fields());
        roster.add_player().unwrap();
    }
    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.list_players().unwrap().len(), 1);
}
