//! Construction of participant rosters and judgment pipelines from
//! configuration values

use tracing::info;

use moot_core::{
    JudgeMode, JudgeSettings, ModelConfig, MootError, Participant, ParticipantSpec, Result, Role,
    Topology, Validator,
};
use moot_judge::{DirectJudgment, JudgmentStrategy, WeightedVoting};

use crate::client::ChatClient;
use crate::judges::{LlmAdjudicator, LlmValidator};
use crate::participants::{DualDebater, Panelist, ReflectiveParticipant};

/// Default roster when no participant specs are configured
fn default_specs(topology: Topology) -> Vec<ParticipantSpec> {
    match topology {
        Topology::Single => vec![ParticipantSpec::new("agent_1")],
        Topology::Dual => vec![
            ParticipantSpec::new("solver").with_role(Role::Solver),
            ParticipantSpec::new("critic").with_role(Role::Critic),
        ],
        Topology::Multi => (1..=3)
            .map(|i| ParticipantSpec::new(format!("expert_{}", i)))
            .collect(),
    }
}

fn check_role(topology: Topology, spec: &ParticipantSpec, allowed: &[Role]) -> Result<Role> {
    match spec.role {
        None => Ok(allowed[0]),
        Some(role) if allowed.contains(&role) => Ok(role),
        Some(role) => Err(MootError::Config(format!(
            "role {} is not valid for participant {:?} under {} topology",
            role, spec.id, topology
        ))),
    }
}

/// Build the LLM-backed participant roster for a debate.
///
/// Empty specs produce a topology-appropriate default roster. The dual
/// topology requires one solver and one critic; the first unassigned spec
/// becomes the solver, the second the critic.
pub fn build_participants(
    question: &str,
    topology: Topology,
    specs: &[ParticipantSpec],
    model: &ModelConfig,
    api_key: &str,
) -> Result<Vec<Box<dyn Participant>>> {
    let specs = if specs.is_empty() {
        default_specs(topology)
    } else {
        specs.to_vec()
    };
    let client = |_: &ParticipantSpec| ChatClient::new(model, api_key);

    let participants: Vec<Box<dyn Participant>> = match topology {
        Topology::Single => {
            let [spec] = specs.as_slice() else {
                return Err(MootError::Config(format!(
                    "single topology takes exactly one participant spec, got {}",
                    specs.len()
                )));
            };
            check_role(topology, spec, &[Role::Reflector])?;
            vec![Box::new(ReflectiveParticipant::new(
                &spec.id,
                question,
                client(spec),
                spec.background.as_deref(),
            ))]
        }
        Topology::Dual => {
            let [first, second] = specs.as_slice() else {
                return Err(MootError::Config(format!(
                    "dual topology takes exactly two participant specs, got {}",
                    specs.len()
                )));
            };
            let first_role = check_role(topology, first, &[Role::Solver, Role::Critic])?;
            let second_role = match first_role {
                Role::Solver => check_role(topology, second, &[Role::Critic, Role::Solver])?,
                _ => check_role(topology, second, &[Role::Solver, Role::Critic])?,
            };
            if first_role == second_role {
                return Err(MootError::Config(
                    "dual topology needs one solver and one critic".to_string(),
                ));
            }
            vec![
                Box::new(DualDebater::new(
                    &first.id,
                    question,
                    first_role,
                    client(first),
                    first.background.as_deref(),
                )),
                Box::new(DualDebater::new(
                    &second.id,
                    question,
                    second_role,
                    client(second),
                    second.background.as_deref(),
                )),
            ]
        }
        Topology::Multi => {
            if specs.len() < 2 {
                return Err(MootError::Config(format!(
                    "multi topology needs at least two participant specs, got {}",
                    specs.len()
                )));
            }
            specs
                .iter()
                .map(|spec| {
                    check_role(topology, spec, &[Role::Expert])?;
                    Ok(Box::new(Panelist::new(
                        &spec.id,
                        question,
                        client(spec),
                        spec.background.as_deref(),
                    )) as Box<dyn Participant>)
                })
                .collect::<Result<Vec<_>>>()?
        }
    };

    info!(
        "Built {} participant(s) for {} topology",
        participants.len(),
        topology
    );
    Ok(participants)
}

/// Build the judgment strategy selected by the settings
pub fn build_judgment(
    settings: &JudgeSettings,
    model: &ModelConfig,
    api_key: &str,
) -> Result<Box<dyn JudgmentStrategy>> {
    match settings.mode {
        JudgeMode::Direct => Ok(Box::new(DirectJudgment::new(Box::new(LlmAdjudicator::new(
            ChatClient::new(model, api_key),
        ))))),
        JudgeMode::Voting => {
            if settings.validators == 0 {
                return Err(MootError::Config(
                    "voting judge needs at least one validator".to_string(),
                ));
            }
            let weights = match &settings.weights {
                Some(weights) if weights.len() != settings.validators => {
                    return Err(MootError::Config(format!(
                        "got {} weights for {} validators",
                        weights.len(),
                        settings.validators
                    )));
                }
                Some(weights) => weights.clone(),
                None => vec![1.0; settings.validators],
            };

            let mut voting = WeightedVoting::new();
            for (index, weight) in weights.into_iter().enumerate() {
                let validator: Box<dyn Validator> = Box::new(LlmValidator::new(
                    format!("validator_{}", index + 1),
                    ChatClient::new(model, api_key),
                ));
                voting = voting.with_validator(validator, weight);
            }
            Ok(Box::new(voting))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ModelConfig {
        ModelConfig::default()
    }

    #[test]
    fn test_default_rosters() {
        for (topology, expected) in [
            (Topology::Single, 1),
            (Topology::Dual, 2),
            (Topology::Multi, 3),
        ] {
            let participants =
                build_participants("q", topology, &[], &model(), "sk-test").unwrap();
            assert_eq!(participants.len(), expected);
        }
    }

    #[test]
    fn test_dual_role_assignment() {
        let specs = [
            ParticipantSpec::new("a"),
            ParticipantSpec::new("b"),
        ];
        let participants =
            build_participants("q", Topology::Dual, &specs, &model(), "sk-test").unwrap();
        assert_eq!(participants[0].role(), Role::Solver);
        assert_eq!(participants[1].role(), Role::Critic);
    }

    #[test]
    fn test_dual_rejects_two_solvers() {
        let specs = [
            ParticipantSpec::new("a").with_role(Role::Solver),
            ParticipantSpec::new("b").with_role(Role::Solver),
        ];
        let err =
            build_participants("q", Topology::Dual, &specs, &model(), "sk-test").err().unwrap();
        assert!(matches!(err, MootError::Config(_)));
    }

    #[test]
    fn test_multi_rejects_solo_panel() {
        let specs = [ParticipantSpec::new("only")];
        let err =
            build_participants("q", Topology::Multi, &specs, &model(), "sk-test").err().unwrap();
        assert!(matches!(err, MootError::Config(_)));
    }

    #[test]
    fn test_role_topology_mismatch_rejected() {
        let specs = [ParticipantSpec::new("a").with_role(Role::Critic)];
        let err =
            build_participants("q", Topology::Single, &specs, &model(), "sk-test").err().unwrap();
        assert!(matches!(err, MootError::Config(_)));
    }

    #[test]
    fn test_voting_weights_validated() {
        let settings = JudgeSettings {
            mode: JudgeMode::Voting,
            validators: 3,
            weights: Some(vec![2.0, 1.0]),
        };
        assert!(build_judgment(&settings, &model(), "sk-test").is_err());

        let settings = JudgeSettings {
            mode: JudgeMode::Voting,
            validators: 3,
            weights: None,
        };
        assert!(build_judgment(&settings, &model(), "sk-test").is_ok());
    }
}
