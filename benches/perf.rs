use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use hoops_roster::filter::PlayerFilter;
use hoops_roster::model::{FilterCriteria, Player, PlayerFields};
use hoops_roster::roster::validate_fields;

const TEAMS: [&str; 6] = ["LAL", "GSW", "BOS", "MIA", "DEN", "PHX"];

fn sample_players(n: usize) -> Vec<Player> {
    (0..n)
        .map(|i| Player {
            player_key: i as i64 + 1,
            player_id: format!("player{i:05}"),
            name: format!("Player Number {i}"),
            age: Some(19 + (i % 20) as i32),
            team: Some(TEAMS[i % TEAMS.len()].to_string()),
            season: Some(2015 + (i % 10) as i32),
        })
        .collect()
}

fn bench_filter_apply(c: &mut Criterion) {
    let players = sample_players(5_000);
    let criteria = FilterCriteria {
        name: "Number 1".to_string(),
        team: "L".to_string(),
        age: "30".to_string(),
        ..FilterCriteria::default()
    };

    c.bench_function("filter_apply_5k", |b| {
        b.iter(|| {
            let filter = PlayerFilter::parse(black_box(&criteria)).unwrap();
            let hits = filter.apply(black_box(&players));
            black_box(hits.len());
        })
    });
}

fn bench_validate_fields(c: &mut Criterion) {
    let fields = PlayerFields {
        player_id: "jamesle01".to_string(),
        name: "LeBron James".to_string(),
        age: "39".to_string(),
        team: "LAL".to_string(),
        season: "2024".to_string(),
    };
    c.bench_function("validate_fields", |b| {
        b.iter(|| {
            let player = validate_fields(black_box(&fields)).unwrap();
            black_box(player.age);
        })
    });
}

criterion_group!(benches, bench_filter_apply, bench_validate_fields);
criterion_main!(benches);
