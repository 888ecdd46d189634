//! Integration tests for the progression ladder.

use futebol_digital_web::{default_ladder, level_for_goals, GameError, GameStore, Level};

#[test]
fn default_ladder_is_valid_and_has_ten_tiers() {
    let store = GameStore::new();
    assert_eq!(store.levels.len(), 10);
    assert_eq!(store.levels[0].name, "Estreante da Várzea");
    assert_eq!(store.levels[9].name, "Imortal das Quatro Linhas");
}

#[test]
fn level_is_a_pure_function_of_lifetime_goals() {
    let ladder = default_ladder();
    assert_eq!(level_for_goals(&ladder, 0).unwrap().level, 1);
    assert_eq!(level_for_goals(&ladder, 9).unwrap().level, 1);
    assert_eq!(level_for_goals(&ladder, 10).unwrap().level, 2);
    assert_eq!(level_for_goals(&ladder, 150).unwrap().level, 5);
    assert_eq!(level_for_goals(&ladder, 1499).unwrap().level, 9);
    assert_eq!(level_for_goals(&ladder, 1500).unwrap().level, 10);
    // Goals past the last cap stay on the top tier.
    assert_eq!(level_for_goals(&ladder, 2_000_000).unwrap().level, 10);
}

#[test]
fn ladder_edits_must_partition_the_goal_range() {
    let mut store = GameStore::new();

    // A gap between tiers is rejected...
    let gapped = vec![
        Level::new(1, "Base", 0, 9, "-"),
        Level::new(2, "Topo", 11, 999, "-"),
    ];
    let err = store.set_ladder(gapped).unwrap_err();
    assert!(matches!(err, GameError::LadderNotContiguous { level: 2 }));

    // ...as are overlaps, a first tier not starting at zero, and an empty
    // ladder. The stored ladder survives every rejected edit.
    let overlapping = vec![
        Level::new(1, "Base", 0, 9, "-"),
        Level::new(2, "Topo", 5, 999, "-"),
    ];
    assert!(store.set_ladder(overlapping).is_err());
    let late_start = vec![Level::new(1, "Base", 1, 9, "-")];
    assert!(store.set_ladder(late_start).is_err());
    assert!(matches!(store.set_ladder(Vec::new()), Err(GameError::EmptyLadder)));
    assert_eq!(store.levels.len(), 10);

    // A contiguous replacement is accepted.
    let replacement = vec![
        Level::new(1, "Estreante", 0, 49, "-"),
        Level::new(2, "Veterano", 50, 999_999, "-"),
    ];
    store.set_ladder(replacement).unwrap();
    assert_eq!(store.levels.len(), 2);
    assert_eq!(level_for_goals(&store.levels, 50).unwrap().level, 2);
}
