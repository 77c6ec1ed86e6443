//! Per-mode phase machine: `inactive | ended | active --start--> active`, `active --end--> ended`.

use serde_json::Value;

use crate::dao::models::{GameMode, GameStateEntity, PhaseStatus};

/// Current phase and payload of one game mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeState {
    /// Mode this state belongs to.
    pub mode: GameMode,
    /// Current phase.
    pub status: PhaseStatus,
    /// Question or start time recorded when the phase began.
    pub payload: Value,
    /// `None` for the synthesized default of a mode that was never started.
    pub updated_at: Option<String>,
}

impl ModeState {
    /// Default reported for a mode without a stored record.
    pub fn inactive(mode: GameMode) -> Self {
        Self {
            mode,
            status: PhaseStatus::Inactive,
            payload: Value::Null,
            updated_at: None,
        }
    }

    /// Whether guests can currently take part.
    pub fn is_active(&self) -> bool {
        self.status == PhaseStatus::Active
    }

    /// Identifier of the question carried in a quiz payload.
    pub fn question_id(&self) -> Option<i64> {
        self.payload.get("questionId")?.as_i64()
    }

    /// Record to persist for this state, stamped with `updated_at`.
    pub fn to_entity(&self, updated_at: String) -> GameStateEntity {
        GameStateEntity {
            mode: self.mode,
            status: self.status,
            payload: self.payload.clone(),
            updated_at,
        }
    }
}

impl From<GameStateEntity> for ModeState {
    fn from(entity: GameStateEntity) -> Self {
        Self {
            mode: entity.mode,
            status: entity.status,
            payload: entity.payload,
            updated_at: Some(entity.updated_at),
        }
    }
}

/// Admin command driving a mode.
#[derive(Debug, Clone, PartialEq)]
pub enum PhaseCommand {
    /// Open the mode with a fresh payload, replacing any previous one.
    Start {
        /// Payload of the new phase.
        payload: Value,
    },
    /// Close the mode, keeping the payload readable.
    End,
}

/// Outcome of planning a command against the current state.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Persist and announce the new state.
    Apply(ModeState),
    /// Nothing changes and nothing is announced.
    Noop,
}

/// Compute the state that results from `command`.
pub fn plan(current: &ModeState, command: PhaseCommand) -> Transition {
    match command {
        PhaseCommand::Start { payload } => Transition::Apply(ModeState {
            mode: current.mode,
            status: PhaseStatus::Active,
            payload,
            updated_at: None,
        }),
        PhaseCommand::End if current.is_active() => Transition::Apply(ModeState {
            mode: current.mode,
            status: PhaseStatus::Ended,
            payload: current.payload.clone(),
            updated_at: None,
        }),
        PhaseCommand::End => Transition::Noop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn active_quiz() -> ModeState {
        ModeState {
            mode: GameMode::Qa,
            status: PhaseStatus::Active,
            payload: json!({"questionId": 42, "question": "Where did we meet?"}),
            updated_at: Some("2024-06-01T12:00:00.000Z".into()),
        }
    }

    #[test]
    fn start_is_allowed_from_every_phase() {
        for status in [PhaseStatus::Inactive, PhaseStatus::Active, PhaseStatus::Ended] {
            let current = ModeState {
                status,
                ..ModeState::inactive(GameMode::PhotoVoting)
            };
            let payload = json!({"startTime": "now"});
            let Transition::Apply(next) = plan(
                &current,
                PhaseCommand::Start {
                    payload: payload.clone(),
                },
            ) else {
                panic!("start must apply from {status:?}");
            };
            assert_eq!(next.status, PhaseStatus::Active);
            assert_eq!(next.payload, payload);
        }
    }

    #[test]
    fn end_keeps_the_question() {
        let Transition::Apply(next) = plan(&active_quiz(), PhaseCommand::End) else {
            panic!("end of an active quiz must apply");
        };
        assert_eq!(next.status, PhaseStatus::Ended);
        assert_eq!(next.question_id(), Some(42));
    }

    #[test]
    fn end_outside_active_is_a_noop() {
        assert_eq!(
            plan(&ModeState::inactive(GameMode::Qa), PhaseCommand::End),
            Transition::Noop
        );
        let ended = ModeState {
            status: PhaseStatus::Ended,
            ..active_quiz()
        };
        assert_eq!(plan(&ended, PhaseCommand::End), Transition::Noop);
    }

    #[test]
    fn question_id_requires_an_integer() {
        let mut state = active_quiz();
        assert_eq!(state.question_id(), Some(42));
        state.payload = json!({"questionId": "42"});
        assert_eq!(state.question_id(), None);
        assert_eq!(ModeState::inactive(GameMode::Qa).question_id(), None);
    }
}
