use std::hash::Hasher;

use habitual_game::{
    CareerConfig, CareerSession, CareerStatus, GameState, LeagueCatalog, MatchdayInput,
    advance_season, initialize_career, simulate_matchday,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde_json::{Map, Value};
use twox_hash::XxHash64;

#[test]
fn bundled_catalog_is_a_six_tier_pyramid() {
    let catalog = LeagueCatalog::load_from_static().unwrap();
    let levels: Vec<u8> = catalog.leagues().iter().map(|l| l.level).collect();
    assert_eq!(levels, vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(catalog.lowest().unwrap().id, "lpf");
    assert_eq!(catalog.by_level(6).unwrap().id, "premier-league");
    for league in catalog.leagues() {
        assert_eq!(league.teams.len(), 9, "{}", league.id);
        assert_eq!(league.season_size(), 10);
    }
    let mean = |level: u8| {
        let teams = &catalog.by_level(level).unwrap().teams;
        teams.iter().map(|t| u32::from(t.strength)).sum::<u32>() / 9
    };
    assert!((1..6).all(|level| mean(level) < mean(level + 1)));
}

#[test]
fn catalog_snapshot_survives_reserialization() {
    let catalog = LeagueCatalog::load_from_static().unwrap();
    let first = canonical(serde_json::to_value(&catalog).unwrap());
    let reparsed = LeagueCatalog::from_json(&first).unwrap();
    let second = canonical(serde_json::to_value(&reparsed).unwrap());
    assert_eq!(snapshot_hash(first.as_bytes()), snapshot_hash(second.as_bytes()));
    assert_eq!(reparsed, catalog);
}

#[test]
fn saved_state_uses_camel_case_shape() {
    let catalog = LeagueCatalog::load_from_static().unwrap();
    let mut session =
        CareerSession::new(&catalog, "Habit FC", None, 0xFACE_B00C, CareerConfig::default())
            .unwrap();
    for _ in 0..3 {
        session.simulate_day(MatchdayInput::new(2, true)).unwrap();
    }
    let value = serde_json::to_value(session.state()).unwrap();
    let object = value.as_object().unwrap();
    for key in [
        "player",
        "leagues",
        "currentSeason",
        "currentMatchday",
        "fixtures",
        "table",
        "gameWon",
    ] {
        assert!(object.contains_key(key), "missing {key}");
    }
    assert_eq!(value["player"]["teamName"], "Habit FC");
    assert_eq!(value["player"]["currentLeagueId"], "lpf");

    let played = &value["fixtures"][0];
    assert!(played["homeTeamId"].is_string());
    assert!(played["result"]["homeGoals"].is_u64());
    let unplayed = value["fixtures"]
        .as_array()
        .unwrap()
        .iter()
        .find(|f| f["matchday"] == 9)
        .unwrap();
    assert!(unplayed.get("result").is_none());

    let row = &value["table"][0];
    for key in [
        "teamId",
        "teamName",
        "isPlayer",
        "played",
        "wins",
        "draws",
        "losses",
        "goalsFor",
        "goalsAgainst",
        "goalDifference",
        "points",
    ] {
        assert!(row.get(key).is_some(), "table row missing {key}");
    }
}

#[test]
fn save_roundtrip_is_byte_stable() {
    let catalog = LeagueCatalog::load_from_static().unwrap();
    let state = initialize_career(&catalog, "Habit FC", None, None).unwrap();
    let json = serde_json::to_string(&state).unwrap();
    let restored: GameState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, state);
    assert_eq!(
        snapshot_hash(json.as_bytes()),
        snapshot_hash(serde_json::to_string(&restored).unwrap().as_bytes())
    );
}

#[test]
fn minimal_legacy_save_loads_with_defaults() {
    let catalog = LeagueCatalog::load_from_static().unwrap();
    let mut value = serde_json::to_value(initialize_career(&catalog, "Habit FC", None, None).unwrap())
        .unwrap();
    let object = value.as_object_mut().unwrap();
    object.remove("gameWon");
    object["player"].as_object_mut().unwrap().remove("seasonHistory");

    let state: GameState = serde_json::from_value(value).unwrap();
    assert!(!state.game_won);
    assert!(state.player.season_history.is_empty());
}

#[test]
fn reordered_saved_catalog_keeps_tier_decisions() {
    let catalog = LeagueCatalog::load_from_static().unwrap();
    let state = initialize_career(&catalog, "Habit FC", None, Some(100)).unwrap();
    let mut value = serde_json::to_value(&state).unwrap();
    value["leagues"].as_array_mut().unwrap().reverse();
    assert_eq!(value["leagues"][0]["level"], 6);

    let mut restored: GameState = serde_json::from_value(value).unwrap();
    assert_eq!(restored, state);

    let mut rng = SmallRng::seed_from_u64(21);
    while restored.status() == CareerStatus::SeasonInProgress {
        restored = simulate_matchday(&restored, 5, true, &mut rng).unwrap();
    }
    assert_eq!(restored.player_position(), Some(1));
    let next = advance_season(&restored).unwrap();
    assert!(!next.game_won);
    assert_eq!(next.player.current_league_id, catalog.by_level(2).unwrap().id);
}

fn canonical(value: Value) -> String {
    serde_json::to_string_pretty(&canonicalize_value(value)).unwrap()
}

fn canonicalize_value(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize_value).collect()),
        Value::Object(map) => {
            let mut result = Map::with_capacity(map.len());
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            for (key, value) in entries {
                result.insert(key, canonicalize_value(value));
            }
            Value::Object(result)
        }
        other => other,
    }
}

fn snapshot_hash(bytes: &[u8]) -> u64 {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(bytes);
    hasher.finish()
}
