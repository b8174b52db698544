use super::*;

#[test]
fn test_defaults() {
    let config = ProgressionConfig::default();
    assert_eq!(config.experience.threshold_per_level, 100.0);
    assert_eq!(config.abilities.starting_points, 1);
    assert_eq!(config.apprenticeship.capacity, 1);
    assert_eq!(config.apprenticeship.ticks_per_day, 60_000);
    assert_eq!(config.apprenticeship.bond_cooldown_ticks(), 60_000);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_toml_fills_defaults() {
    let config = ProgressionConfig::from_toml_str(
        r#"
[apprenticeship]
capacity = 3
bond_chance = 0.25
"#,
    )
    .unwrap();

    assert_eq!(config.apprenticeship.capacity, 3);
    assert_eq!(config.apprenticeship.bond_chance, 0.25);
    assert_eq!(config.apprenticeship.promotion_level, 10);
    assert_eq!(config.experience.global_multiplier, 1.0);
}

#[test]
fn test_rejects_bad_bond_chance() {
    let mut config = ProgressionConfig::default();
    config.apprenticeship.bond_chance = 1.5;

    match config.validate() {
        Err(Error::InvalidConfig { field, .. }) => {
            assert_eq!(field, "apprenticeship.bond_chance");
        }
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
}

#[test]
fn test_rejects_inverted_interval() {
    let mut config = ProgressionConfig::default();
    config.apprenticeship.experience_interval_min_days = 6;
    assert!(config.validate().is_err());
}

#[test]
fn test_rejects_alignment_range_outside_meter() {
    let mut config = ProgressionConfig::default();
    config.alignment.initial_max = 1200.0;
    assert!(config.validate().is_err());
}

#[test]
fn test_rejects_zero_threshold() {
    let mut config = ProgressionConfig::default();
    config.experience.threshold_per_level = 0.0;
    assert!(config.validate().is_err());
}

#[test]
fn test_malformed_toml() {
    let result = ProgressionConfig::from_toml_str("[experience\nglobal_multiplier = ");
    assert!(matches!(result, Err(Error::Serialization(_))));
}
