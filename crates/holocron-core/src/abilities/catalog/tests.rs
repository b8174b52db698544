use super::*;
use crate::abilities::RequirementKind;

const TABLE: &str = r#"
[[abilities]]
id = "force_push"
label = "Force Push"
requirements = []

[[abilities]]
id = "force_choke"
requirements = [
    { kind = "level", min = 5 },
    { kind = "abilities", ids = ["force_push"], mode = "all" },
    { kind = "alignment", axis = "dark", min = 200.0 },
]

[[abilities]]
id = "battle_meditation"
requirements = [
    { kind = "traits", ids = ["kind", "wise"], mode = "any" },
]

[[abilities]]
id = "forbidden_art"
"#;

#[test]
fn test_from_toml_str() {
    let table = AbilityTable::from_toml_str(TABLE).unwrap();
    assert_eq!(table.len(), 4);

    let push = table.ability(&"force_push".into()).unwrap();
    assert_eq!(push.display_name(), "Force Push");
    assert_eq!(push.requirements, Some(vec![]));

    let choke = table.ability(&"force_choke".into()).unwrap();
    assert_eq!(choke.display_name(), "force_choke");
    let reqs = choke.requirements.as_ref().unwrap();
    assert_eq!(reqs[0], Requirement::Level { min: 5 });
    assert_eq!(
        reqs[2],
        Requirement::Alignment {
            axis: AttunementAxis::Dark,
            min: 200.0
        }
    );

    let meditation = table.ability(&"battle_meditation".into()).unwrap();
    match &meditation.requirements.as_ref().unwrap()[0] {
        Requirement::Traits { ids, mode } => {
            assert_eq!(ids.len(), 2);
            assert_eq!(*mode, RequirementMode::Any);
        }
        other => panic!("unexpected requirement {other:?}"),
    }

    // No requirement table at all
    let forbidden = table.ability(&"forbidden_art".into()).unwrap();
    assert!(forbidden.requirements.is_none());
}

#[test]
fn test_mode_defaults_to_all() {
    let table = AbilityTable::from_toml_str(
        r#"
[[abilities]]
id = "a"
requirements = [{ kind = "abilities", ids = ["b"] }]

[[abilities]]
id = "b"
requirements = []
"#,
    )
    .unwrap();

    let a = table.ability(&"a".into()).unwrap();
    assert_eq!(
        a.requirements.as_ref().unwrap()[0],
        Requirement::Abilities {
            ids: vec!["b".into()],
            mode: RequirementMode::All
        }
    );
}

#[test]
fn test_duplicate_ids_rejected() {
    let result = AbilityTable::from_abilities([AbilityDef::new("heal"), AbilityDef::new("heal")]);
    assert!(matches!(result, Err(Error::InvalidConfig { .. })));
}

#[test]
fn test_dangling_prerequisites() {
    let table = AbilityTable::from_abilities([
        AbilityDef::new("lightning").requires_abilities(["choke", "drain"], RequirementMode::Any),
        AbilityDef::new("choke"),
    ])
    .unwrap();

    let dangling = table.dangling_prerequisites();
    assert_eq!(
        dangling,
        vec![(AbilityId::from("lightning"), AbilityId::from("drain"))]
    );
}

#[test]
fn test_builder() {
    let ability = AbilityDef::unspecified("valor")
        .with_label("Valor")
        .requires_level(3)
        .requires_conditions(["meditating"], RequirementMode::All);

    let reqs = ability.requirements.unwrap();
    assert_eq!(reqs.len(), 2);
    assert_eq!(reqs[0].kind(), RequirementKind::Level);
    assert_eq!(reqs[1].kind(), RequirementKind::Conditions);
}

#[test]
fn test_abilities_in_id_order() {
    let table = AbilityTable::from_abilities([AbilityDef::new("b"), AbilityDef::new("a")]).unwrap();
    let abilities = table.abilities();
    let ids: Vec<_> = abilities.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[test]
fn test_load_missing_file() {
    let result = AbilityTable::load("/definitely/not/here.toml");
    assert!(matches!(result, Err(Error::Internal(_))));
}

#[test]
fn test_malformed_table() {
    let result = AbilityTable::from_toml_str("[[abilities]]\nid = 3");
    assert!(matches!(result, Err(Error::Serialization(_))));
}

#[test]
fn test_requirement_display() {
    let ability = AbilityDef::new("lightning")
        .requires_level(8)
        .requires_abilities(["choke", "drain"], RequirementMode::Any)
        .requires_alignment(AttunementAxis::Dark, 500.0);

    let text: Vec<_> = ability
        .requirements
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(text, vec!["level 8", "abilities [choke | drain]", "dark >= 500"]);
}
