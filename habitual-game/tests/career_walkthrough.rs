use habitual_game::{
    AiTeam, CareerConfig, CareerError, CareerStatus, GameState, League, LeagueCatalog,
    SeasonTransition, advance_season, advance_season_with_config, initialize_career,
    simulate_matchday,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn roster(prefix: &str, strength: u8) -> Vec<AiTeam> {
    (1..=4)
        .map(|i| AiTeam {
            id: format!("{prefix}-{i}"),
            name: format!("{prefix} {i}"),
            strength,
        })
        .collect()
}

/// Three tiers of four AI clubs each; every club in a tier shares a rating.
fn pyramid(low: u8, mid: u8, top: u8) -> LeagueCatalog {
    LeagueCatalog::new(vec![
        League {
            id: "amateur".into(),
            name: "Amateur League".into(),
            level: 1,
            teams: roster("amateur", low),
        },
        League {
            id: "regional".into(),
            name: "Regional League".into(),
            level: 2,
            teams: roster("regional", mid),
        },
        League {
            id: "national".into(),
            name: "National League".into(),
            level: 3,
            teams: roster("national", top),
        },
    ])
    .unwrap()
}

fn play_season(mut state: GameState, training: u32, seed: u64) -> GameState {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    while state.status() == CareerStatus::SeasonInProgress {
        state = simulate_matchday(&state, training, true, &mut rng).unwrap();
    }
    state
}

#[test]
fn four_team_league_runs_five_matchdays() {
    let catalog = pyramid(40, 50, 60);
    let state = initialize_career(&catalog, "Habit FC", None, None).unwrap();
    assert_eq!(state.total_matchdays(), 5);
    assert_eq!(state.fixtures.len(), 10);

    let done = play_season(state, 2, 1);
    assert_eq!(done.current_matchday, 6);
    assert_eq!(done.status(), CareerStatus::SeasonOver);
    // Five clubs: each sits out exactly one matchday.
    assert!(done.table.iter().all(|entry| entry.played() == 4));
}

#[test]
fn dominant_club_climbs_to_the_title() {
    let catalog = pyramid(0, 0, 0);
    let mut state = initialize_career(&catalog, "Habit FC", None, Some(100)).unwrap();

    state = play_season(state, 5, 10);
    assert_eq!(state.player_position(), Some(1));
    state = advance_season(&state).unwrap();
    assert_eq!(state.player.current_league_id, "regional");
    assert_eq!(state.current_season, 2);
    assert_eq!(state.current_matchday, 1);

    state = play_season(state, 5, 11);
    state = advance_season(&state).unwrap();
    assert_eq!(state.player.current_league_id, "national");

    state = play_season(state, 5, 12);
    assert_eq!(state.player_position(), Some(1));
    let (won, report) = advance_season_with_config(&state, &CareerConfig::default()).unwrap();
    assert_eq!(report.transition, SeasonTransition::Champion);
    assert!(won.game_won);
    assert_eq!(won.status(), CareerStatus::GameWon);
    assert_eq!(won.player.season_history.len(), 3);
    assert_eq!(won.player.season_history[&3].final_position, 1);

    let mut rng = ChaCha20Rng::seed_from_u64(0);
    assert_eq!(
        simulate_matchday(&won, 1, false, &mut rng).unwrap_err(),
        CareerError::GameAlreadyWon
    );
    assert_eq!(advance_season(&won).unwrap_err(), CareerError::GameAlreadyWon);
}

#[test]
fn club_names_are_unique_across_the_pyramid() {
    let catalog = pyramid(0, 0, 0);
    assert_eq!(
        initialize_career(&catalog, "national-2", None, Some(100)).unwrap_err(),
        CareerError::TeamNameConflict("national-2".into())
    );

    // A lookalike that is not a roster id climbs every tier without clashing.
    let mut state = initialize_career(&catalog, "national-9", None, Some(100)).unwrap();
    for (seed, expected) in [(30, "regional"), (31, "national")] {
        state = play_season(state, 5, seed);
        assert_eq!(state.player_position(), Some(1));
        state = advance_season(&state).unwrap();
        assert_eq!(state.player.current_league_id, expected);
    }
    assert!(state.table.iter().any(|entry| entry.team_id() == "national-9"));
}

#[test]
fn winless_club_is_relegated_above_the_floor() {
    let catalog = pyramid(100, 100, 100);
    let state = initialize_career(&catalog, "Habit FC", Some("regional"), Some(0)).unwrap();
    let done = play_season(state, 0, 4);
    assert_eq!(done.player_position(), Some(5));
    assert_eq!(done.player_entry().unwrap().points(), 0);

    let (next, report) = advance_season_with_config(&done, &CareerConfig::default()).unwrap();
    assert_eq!(report.transition, SeasonTransition::Relegated);
    assert_eq!(next.player.current_league_id, "amateur");
    assert_eq!(next.player.strength, 1);
    assert_eq!(next.player.season_history[&1].league_id, "regional");
}

#[test]
fn lowest_tier_never_relegates() {
    let catalog = pyramid(100, 100, 100);
    let state = initialize_career(&catalog, "Habit FC", None, Some(0)).unwrap();
    let done = play_season(state, 0, 5);
    assert_eq!(done.player_position(), Some(5));

    let (next, report) = advance_season_with_config(&done, &CareerConfig::default()).unwrap();
    assert_eq!(report.transition, SeasonTransition::Stayed);
    assert_eq!(next.player.current_league_id, "amateur");
    assert_eq!(next.player.strength, 2);
}

#[test]
fn podium_at_the_top_keeps_the_league() {
    let catalog = pyramid(0, 0, 0);
    let mut state = initialize_career(&catalog, "Habit FC", Some("national"), Some(100)).unwrap();
    state = play_season(state, 5, 6);
    // Hand the title to an AI club to land the player in second.
    state.table.swap(0, 1);
    let (next, report) = advance_season_with_config(&state, &CareerConfig::default()).unwrap();
    assert_eq!(report.final_position, 2);
    assert_eq!(report.transition, SeasonTransition::Stayed);
    assert_eq!(report.strength_bonus, 5);
    assert_eq!(next.player.current_league_id, "national");
    assert!(!next.game_won);
}

#[test]
fn resimulating_a_resolved_matchday_changes_nothing() {
    let catalog = pyramid(40, 50, 60);
    let state = initialize_career(&catalog, "Habit FC", None, None).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(77);
    let first = simulate_matchday(&state, 3, false, &mut rng).unwrap();

    let mut rewound = first.clone();
    rewound.current_matchday = 1;
    let mut other_rng = ChaCha20Rng::seed_from_u64(78);
    let again = simulate_matchday(&rewound, 3, false, &mut other_rng).unwrap();
    assert_eq!(again.fixtures, first.fixtures);
    assert_eq!(again.table, first.table);
}

#[test]
fn configured_slots_change_the_cutoffs() {
    let catalog = pyramid(100, 100, 100);
    let state = initialize_career(&catalog, "Habit FC", Some("regional"), Some(0)).unwrap();
    let done = play_season(state, 0, 8);

    let cfg = CareerConfig {
        relegation_slots: 1,
        promotion_slots: 1,
        ..CareerConfig::default()
    };
    let (_, report) = advance_season_with_config(&done, &cfg).unwrap();
    assert_eq!(report.transition, SeasonTransition::Relegated);

    let mut mid_table = done;
    let player_row = mid_table.player_position().unwrap() - 1;
    mid_table.table.swap(player_row, 2);
    let (_, report) = advance_season_with_config(&mid_table, &cfg).unwrap();
    assert_eq!(report.final_position, 3);
    assert_eq!(report.transition, SeasonTransition::Stayed);
}
