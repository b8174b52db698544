use super::*;
use crate::host::NullHost;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_activate_is_lazy_and_idempotent() {
    let config = ProgressionConfig::default();
    let mut rng = StdRng::seed_from_u64(7);
    let mut roster = Roster::new();

    roster
        .activate("kira", "Kira", &config, &NullHost, &mut rng)
        .add_ability_points(4);
    let again = roster.activate("kira", "Someone Else", &config, &NullHost, &mut rng);

    assert_eq!(again.name(), "Kira");
    assert_eq!(again.ability_points(), config.abilities.starting_points + 4);
    assert_eq!(roster.len(), 1);
}

#[test]
fn test_require_unknown_agent() {
    let roster = Roster::new();
    let result = roster.require(&AgentId::from("ghost"));
    assert!(matches!(result, Err(Error::UnknownAgent(id)) if id == "ghost"));
}

#[test]
fn test_ids_are_ordered() {
    let config = ProgressionConfig::default();
    let mut rng = StdRng::seed_from_u64(7);
    let mut roster = Roster::new();
    for id in ["zed", "ana", "mo"] {
        roster.activate(id, id, &config, &NullHost, &mut rng);
    }

    let ids: Vec<_> = roster.ids().iter().map(|a| a.to_string()).collect();
    assert_eq!(ids, vec!["ana", "mo", "zed"]);
}

#[test]
fn test_from_records_repairs() {
    let config = ProgressionConfig::default();
    let record: ProgressionRecord =
        serde_json::from_str(r#"{ "agent": "kira", "presets": { "current": "Gone" } }"#).unwrap();

    let roster = Roster::from_records([record], &config);
    let kira = roster.get(&"kira".into()).unwrap();

    assert_eq!(kira.presets().current_name(), "Default");
    assert_eq!(kira.level(), 1);
    assert_eq!(kira.experience().threshold(), 100.0);
}

#[test]
fn test_remove() {
    let config = ProgressionConfig::default();
    let mut rng = StdRng::seed_from_u64(7);
    let mut roster = Roster::new();
    roster.activate("kira", "Kira", &config, &NullHost, &mut rng);

    assert!(roster.remove(&"kira".into()).is_some());
    assert!(roster.is_empty());
    assert!(roster.remove(&"kira".into()).is_none());
}
