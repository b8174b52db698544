use super::*;
use crate::abilities::RequirementMode;
use crate::alignment::AttunementAxis;
use crate::host::{MockProgressionHost, NullHost};
use crate::testing::RecordingHost;

struct Agent {
    id: AgentId,
    level: u32,
    points: u32,
    unlocked: BTreeSet<AbilityId>,
    alignment: Alignment,
}

impl Agent {
    fn new(level: u32) -> Self {
        Self {
            id: AgentId::from("kira"),
            level,
            points: 1,
            unlocked: BTreeSet::new(),
            alignment: Alignment::default(),
        }
    }

    fn ctx<'a>(&'a self, host: &'a dyn ProgressionHost) -> UnlockContext<'a> {
        UnlockContext {
            agent: &self.id,
            level: self.level,
            ability_points: self.points,
            unlocked: &self.unlocked,
            alignment: &self.alignment,
            host,
        }
    }
}

#[test]
fn test_missing_ability() {
    let agent = Agent::new(1);
    assert_eq!(
        agent.ctx(&NullHost).check(None),
        Err(UnlockRejection::MissingAbility)
    );
}

#[test]
fn test_short_circuit_order() {
    let mut agent = Agent::new(1);
    let ability = AbilityDef::new("push");

    agent.points = 0;
    agent.unlocked.insert("push".into());
    // Points are checked before membership
    assert_eq!(
        agent.ctx(&NullHost).check(Some(&ability)),
        Err(UnlockRejection::NoAbilityPoints)
    );

    agent.points = 1;
    assert_eq!(
        agent.ctx(&NullHost).check(Some(&ability)),
        Err(UnlockRejection::AlreadyUnlocked)
    );
}

#[test]
fn test_no_requirements_block() {
    let agent = Agent::new(20);
    let ability = AbilityDef::unspecified("mystery");
    assert_eq!(
        agent.ctx(&NullHost).check(Some(&ability)),
        Err(UnlockRejection::NoRequirements)
    );
}

#[test]
fn test_unrestricted_ability() {
    let agent = Agent::new(1);
    assert!(agent.ctx(&NullHost).can_unlock(Some(&AbilityDef::new("push"))));
}

#[test]
fn test_level_requirement() {
    let ability = AbilityDef::new("pull").requires_level(3);

    assert_eq!(
        Agent::new(2).ctx(&NullHost).check(Some(&ability)),
        Err(UnlockRejection::Unmet(RequirementKind::Level))
    );
    assert!(Agent::new(3).ctx(&NullHost).can_unlock(Some(&ability)));
}

#[test]
fn test_ability_prerequisites_all_and_any() {
    let mut agent = Agent::new(5);
    agent.unlocked.insert("push".into());

    let all = AbilityDef::new("wave").requires_abilities(["push", "pull"], RequirementMode::All);
    let any = AbilityDef::new("throw").requires_abilities(["push", "pull"], RequirementMode::Any);

    assert_eq!(
        agent.ctx(&NullHost).check(Some(&all)),
        Err(UnlockRejection::Unmet(RequirementKind::Abilities))
    );
    assert!(agent.ctx(&NullHost).can_unlock(Some(&any)));

    agent.unlocked.insert("pull".into());
    assert!(agent.ctx(&NullHost).can_unlock(Some(&all)));
}

#[test]
fn test_empty_prerequisite_set_passes() {
    let agent = Agent::new(1);
    let ability = AbilityDef::new("sense").requires_abilities(Vec::<&str>::new(), RequirementMode::Any);
    assert!(agent.ctx(&NullHost).can_unlock(Some(&ability)));
}

#[test]
fn test_trait_requirement_uses_host() {
    let agent = Agent::new(1);
    let host = RecordingHost::new().with_traits("kira", &["kind"]);

    let any = AbilityDef::new("heal").requires_traits(["kind", "wise"], RequirementMode::Any);
    let all = AbilityDef::new("valor").requires_traits(["kind", "wise"], RequirementMode::All);

    assert!(agent.ctx(&host).can_unlock(Some(&any)));
    assert_eq!(
        agent.ctx(&host).check(Some(&all)),
        Err(UnlockRejection::Unmet(RequirementKind::Traits))
    );
}

#[test]
fn test_missing_trait_registry_is_hard_failure() {
    let agent = Agent::new(1);
    let ability = AbilityDef::new("heal").requires_traits(["kind"], RequirementMode::Any);

    assert_eq!(
        agent.ctx(&NullHost).check(Some(&ability)),
        Err(UnlockRejection::Unmet(RequirementKind::Traits))
    );
}

#[test]
fn test_condition_requirement_queries_each_id() {
    let agent = Agent::new(1);
    let ability = AbilityDef::new("rage").requires_conditions(["angry", "wounded"], RequirementMode::All);

    let mut host = MockProgressionHost::new();
    host.expect_has_condition()
        .withf(|agent, id| agent.as_str() == "kira" && id == "angry")
        .times(1)
        .return_const(Some(true));
    host.expect_has_condition()
        .withf(|_, id| id == "wounded")
        .times(1)
        .return_const(Some(true));

    assert!(agent.ctx(&host).can_unlock(Some(&ability)));
}

#[test]
fn test_missing_condition_registry_stops_any_mode() {
    let agent = Agent::new(1);
    let ability = AbilityDef::new("rage").requires_conditions(["angry", "wounded"], RequirementMode::Any);

    let mut host = MockProgressionHost::new();
    host.expect_has_condition().times(1).return_const(None);

    assert_eq!(
        agent.ctx(&host).check(Some(&ability)),
        Err(UnlockRejection::Unmet(RequirementKind::Conditions))
    );
}

#[test]
fn test_alignment_threshold() {
    let mut agent = Agent::new(1);
    let ability = AbilityDef::new("choke").requires_alignment(AttunementAxis::Dark, 200.0);

    agent.alignment = Alignment::new(900.0, 199.0);
    assert_eq!(
        agent.ctx(&NullHost).check(Some(&ability)),
        Err(UnlockRejection::Unmet(RequirementKind::Alignment))
    );

    agent.alignment = Alignment::new(0.0, 200.0);
    assert!(agent.ctx(&NullHost).can_unlock(Some(&ability)));
}

#[test]
fn test_reports_first_failure_in_canonical_order() {
    let agent = Agent::new(1);
    // Declared alignment-first, but level is evaluated first
    let ability = AbilityDef::new("storm")
        .requires_alignment(AttunementAxis::Light, 500.0)
        .requires_level(10);

    assert_eq!(
        agent.ctx(&NullHost).check(Some(&ability)),
        Err(UnlockRejection::Unmet(RequirementKind::Level))
    );
}

#[test]
fn test_rejection_serializes() {
    let json = serde_json::to_string(&UnlockRejection::Unmet(RequirementKind::Traits)).unwrap();
    assert_eq!(json, r#"{"unmet":"traits"}"#);
    assert_eq!(
        serde_json::to_string(&UnlockRejection::NoAbilityPoints).unwrap(),
        r#""no_ability_points""#
    );
}
