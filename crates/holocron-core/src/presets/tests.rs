use super::*;

fn ids(list: &[&str]) -> BTreeSet<AbilityId> {
    list.iter().map(|s| AbilityId::from(*s)).collect()
}

fn manager_with(unlocked: &BTreeSet<AbilityId>) -> PresetManager {
    let mut manager = PresetManager::new();
    for id in unlocked {
        manager.activate_unlocked(id);
    }
    manager
}

#[test]
fn test_new_has_default_selected() {
    let manager = PresetManager::new();
    assert_eq!(manager.current_name(), DEFAULT_PRESET);
    assert_eq!(manager.len(), 1);
    assert!(manager.get(DEFAULT_PRESET).unwrap().active.is_empty());
}

#[test]
fn test_save_copies_only_active_set() {
    let unlocked = ids(&["push", "pull", "heal"]);
    let mut manager = manager_with(&unlocked);
    manager.toggle(&"heal".into(), false, &unlocked);

    assert!(manager.save_current_as("Duel"));

    assert_eq!(manager.current_name(), "Duel");
    assert_eq!(manager.get("Duel").unwrap().active, ids(&["push", "pull"]));
    assert_eq!(manager.get("Duel").unwrap().name, "Duel");
}

#[test]
fn test_save_existing_name_is_silent_noop() {
    let unlocked = ids(&["push"]);
    let mut manager = manager_with(&unlocked);
    manager.save_current_as("Duel");
    manager.toggle(&"push".into(), false, &unlocked);
    manager.load(DEFAULT_PRESET);

    assert!(!manager.save_current_as("Duel"));

    // Neither the existing preset nor the selection changed
    assert_eq!(manager.current_name(), DEFAULT_PRESET);
    assert!(manager.get("Duel").unwrap().active.is_empty());
}

#[test]
fn test_load() {
    let mut manager = PresetManager::new();
    manager.save_current_as("Stealth");
    assert!(manager.load(DEFAULT_PRESET));
    assert_eq!(manager.current_name(), DEFAULT_PRESET);

    assert!(!manager.load("Missing"));
    assert_eq!(manager.current_name(), DEFAULT_PRESET);
}

#[test]
fn test_toggle_requires_unlocked() {
    let unlocked = ids(&["push"]);
    let mut manager = manager_with(&unlocked);

    assert!(!manager.toggle(&"choke".into(), true, &unlocked));
    assert!(!manager.get(DEFAULT_PRESET).unwrap().active.contains(&"choke".into()));

    assert!(manager.toggle(&"push".into(), false, &unlocked));
    assert!(!manager.is_active(&"push".into(), &unlocked));
    assert!(manager.toggle(&"push".into(), true, &unlocked));
    assert!(manager.is_active(&"push".into(), &unlocked));
}

#[test]
fn test_is_active_requires_unlock() {
    let unlocked = ids(&["push"]);
    let manager = manager_with(&unlocked);

    // Still listed in the preset but no longer unlocked
    assert!(!manager.is_active(&"push".into(), &BTreeSet::new()));
    assert!(manager.active_abilities(&BTreeSet::new()).is_empty());
    assert_eq!(manager.active_abilities(&unlocked), unlocked);
}

#[test]
fn test_activate_unlocked_touches_current_and_default_only() {
    let unlocked = ids(&["push"]);
    let mut manager = manager_with(&unlocked);
    manager.save_current_as("Duel");
    manager.save_current_as("Stealth");

    manager.activate_unlocked(&"pull".into());

    assert!(manager.get("Stealth").unwrap().active.contains(&"pull".into()));
    assert!(manager.get(DEFAULT_PRESET).unwrap().active.contains(&"pull".into()));
    assert!(!manager.get("Duel").unwrap().active.contains(&"pull".into()));
}

#[test]
fn test_delete_current_falls_back() {
    let mut manager = PresetManager::new();
    manager.save_current_as("Duel");

    assert!(manager.delete("Duel"));
    assert_eq!(manager.current_name(), DEFAULT_PRESET);
    assert!(!manager.delete("Duel"));
}

#[test]
fn test_delete_non_current_keeps_selection() {
    let mut manager = PresetManager::new();
    manager.save_current_as("Duel");
    manager.save_current_as("Stealth");

    assert!(manager.delete("Duel"));
    assert_eq!(manager.current_name(), "Stealth");
}

#[test]
fn test_delete_only_preset_recreates_default_literal() {
    let unlocked = ids(&["push"]);
    let mut manager = manager_with(&unlocked);
    assert_eq!(manager.len(), 1);

    assert!(manager.delete(DEFAULT_PRESET));

    // Recreated through the fallback, empty
    assert_eq!(manager.current_name(), DEFAULT_PRESET);
    assert_eq!(manager.len(), 1);
    assert!(manager.get(DEFAULT_PRESET).unwrap().active.is_empty());
}

#[test]
fn test_delete_default_with_others_selects_remaining() {
    let mut manager = PresetManager::new();
    manager.save_current_as("Duel");
    manager.load(DEFAULT_PRESET);

    assert!(manager.delete(DEFAULT_PRESET));
    assert_eq!(manager.current_name(), "Duel");
    assert!(!manager.contains(DEFAULT_PRESET));

    // Repair restores the invariant without touching the selection
    assert!(manager.ensure_default_preset());
    assert!(manager.contains(DEFAULT_PRESET));
    assert_eq!(manager.current_name(), "Duel");
}

#[test]
fn test_ensure_default_is_idempotent() {
    let mut manager = PresetManager::new();
    assert!(!manager.ensure_default_preset());
    assert!(!manager.ensure_default_preset());
}

#[test]
fn test_ensure_default_repairs_garbage_record() {
    let mut manager: PresetManager = serde_json::from_str(
        r#"{
            "presets": {
                "Duel": { "name": "Wrong", "active": ["push"] },
                "Stealth": {}
            },
            "current": "Vanished"
        }"#,
    )
    .unwrap();

    assert!(manager.ensure_default_preset());

    assert_eq!(manager.current_name(), DEFAULT_PRESET);
    assert_eq!(manager.get("Duel").unwrap().name, "Duel");
    assert_eq!(manager.get("Stealth").unwrap().name, "Stealth");
    assert!(manager.get("Stealth").unwrap().active.is_empty());
    assert_eq!(manager.len(), 3);
}

#[test]
fn test_ensure_default_on_empty_record() {
    let mut manager: PresetManager = serde_json::from_str("{}").unwrap();
    assert!(manager.is_empty());

    assert!(manager.ensure_default_preset());
    assert_eq!(manager, PresetManager::new());
}

#[test]
fn test_prune() {
    let unlocked = ids(&["push", "pull"]);
    let mut manager = manager_with(&unlocked);
    manager.save_current_as("Duel");

    let removed = manager.prune(&ids(&["pull"]));

    assert_eq!(removed, 2);
    assert_eq!(manager.get("Duel").unwrap().active, ids(&["pull"]));
    assert_eq!(manager.get(DEFAULT_PRESET).unwrap().active, ids(&["pull"]));
}

#[test]
fn test_serde_round_trip() {
    let unlocked = ids(&["push", "pull"]);
    let mut manager = manager_with(&unlocked);
    manager.save_current_as("Duel");
    manager.toggle(&"pull".into(), false, &unlocked);

    let json = serde_json::to_string(&manager).unwrap();
    let mut restored: PresetManager = serde_json::from_str(&json).unwrap();
    assert!(!restored.ensure_default_preset());
    assert_eq!(restored, manager);
}
