use serde_json::{Value, json};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::{
    dao::{
        models::{GameMode, PhaseStatus},
        now_timestamp,
    },
    error::ServiceError,
    services::sse_events,
    state::{
        SharedState,
        game_state::{ModeState, PhaseCommand, Transition, plan},
    },
};

/// Current phase of `mode`; `inactive` with a null payload when never started.
pub async fn get_state(state: &SharedState, mode: GameMode) -> Result<ModeState, ServiceError> {
    let stored = state.store().find_game_state(mode).await?;
    Ok(stored
        .map(ModeState::from)
        .unwrap_or_else(|| ModeState::inactive(mode)))
}

/// Overwrite the record for `mode` with the given phase and payload.
///
/// Runs under the transition gate like the dedicated commands and announces
/// the new phase: entering `active` sends the mode's started event, leaving it
/// sends the ended event. An active quiz payload must carry an integer
/// `questionId` and a `question`.
pub async fn set_state(
    state: &SharedState,
    mode: GameMode,
    status: PhaseStatus,
    payload: Value,
) -> Result<ModeState, ServiceError> {
    let next = ModeState {
        mode,
        status,
        payload,
        updated_at: None,
    };
    if mode == GameMode::Qa && next.is_active() && open_question(&next).is_none() {
        return Err(ServiceError::InvalidInput(
            "an active quiz needs an integer questionId and a question".into(),
        ));
    }

    let _gate = state.lock_transitions().await;
    let current = get_state(state, mode).await?;
    let next = persist(state, next).await?;
    info!(%mode, status = next.status.as_str(), "game state overwritten");
    announce(state, &current, &next);
    Ok(next)
}

fn open_question(state: &ModeState) -> Option<(i64, &str)> {
    let question = state.payload.get("question")?.as_str()?;
    Some((state.question_id()?, question))
}

/// Broadcast the event matching a phase change from `previous` to `next`.
fn announce(state: &SharedState, previous: &ModeState, next: &ModeState) {
    match (next.mode, next.is_active()) {
        (GameMode::Qa, true) => {
            if let Some((question_id, question)) = open_question(next) {
                sse_events::broadcast_question_started(state, question_id, question);
            }
        }
        (GameMode::PhotoVoting, true) => {
            let start_time = next
                .payload
                .get("startTime")
                .and_then(Value::as_str)
                .or(next.updated_at.as_deref())
                .unwrap_or_default();
            sse_events::broadcast_voting_started(state, start_time);
        }
        (_, false) if next.status == previous.status => {}
        (GameMode::Qa, false) => {
            let question_id = next.question_id().or_else(|| previous.question_id());
            sse_events::broadcast_question_ended(state, question_id);
        }
        (GameMode::PhotoVoting, false) => sse_events::broadcast_voting_ended(state),
    }
}

/// Open a quiz question and return its identifier.
pub async fn start_quiz(state: &SharedState, question: &str) -> Result<i64, ServiceError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(ServiceError::InvalidInput("question must not be blank".into()));
    }

    let _gate = state.lock_transitions().await;
    let current = get_state(state, GameMode::Qa).await?;
    let question_id = next_question_id(current.question_id());
    let payload = json!({
        "questionId": question_id,
        "question": question,
        "startTime": now_timestamp(),
    });

    apply(state, &current, PhaseCommand::Start { payload }).await?;
    info!(question_id, "quiz question started");
    sse_events::broadcast_question_started(state, question_id, question);
    Ok(question_id)
}

/// Close the open question. Returns `false` when no question was active.
pub async fn end_quiz(state: &SharedState) -> Result<bool, ServiceError> {
    let _gate = state.lock_transitions().await;
    let current = get_state(state, GameMode::Qa).await?;
    let Some(ended) = apply(state, &current, PhaseCommand::End).await? else {
        return Ok(false);
    };

    info!(question_id = ?ended.question_id(), "quiz question ended");
    sse_events::broadcast_question_ended(state, ended.question_id());
    Ok(true)
}

/// Open photo voting.
pub async fn start_voting(state: &SharedState) -> Result<(), ServiceError> {
    let _gate = state.lock_transitions().await;
    let current = get_state(state, GameMode::PhotoVoting).await?;
    let start_time = now_timestamp();
    let payload = json!({ "startTime": start_time });

    apply(state, &current, PhaseCommand::Start { payload }).await?;
    info!("photo voting started");
    sse_events::broadcast_voting_started(state, &start_time);
    Ok(())
}

/// Close photo voting. Returns `false` when voting was not active.
pub async fn end_voting(state: &SharedState) -> Result<bool, ServiceError> {
    let _gate = state.lock_transitions().await;
    let current = get_state(state, GameMode::PhotoVoting).await?;
    if apply(state, &current, PhaseCommand::End).await?.is_none() {
        return Ok(false);
    }

    info!("photo voting ended");
    sse_events::broadcast_voting_ended(state);
    Ok(true)
}

async fn apply(
    state: &SharedState,
    current: &ModeState,
    command: PhaseCommand,
) -> Result<Option<ModeState>, ServiceError> {
    match plan(current, command) {
        Transition::Apply(next) => persist(state, next).await.map(Some),
        Transition::Noop => {
            debug!(mode = %current.mode, status = current.status.as_str(), "transition skipped");
            Ok(None)
        }
    }
}

async fn persist(state: &SharedState, mut next: ModeState) -> Result<ModeState, ServiceError> {
    let updated_at = now_timestamp();
    state
        .store()
        .save_game_state(next.to_entity(updated_at.clone()))
        .await?;
    next.updated_at = Some(updated_at);
    Ok(next)
}

/// Current Unix time in milliseconds, bumped past `previous` so ids never repeat.
fn next_question_id(previous: Option<i64>) -> i64 {
    let now_ms = i64::try_from(OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000)
        .unwrap_or(i64::MAX);
    match previous {
        Some(previous) if previous >= now_ms => previous + 1,
        _ => now_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_ids_follow_the_clock() {
        let id = next_question_id(None);
        assert!(id > 1_600_000_000_000);
    }

    #[test]
    fn question_ids_never_repeat() {
        let far_future = i64::MAX / 2;
        assert_eq!(next_question_id(Some(far_future)), far_future + 1);
        let id = next_question_id(Some(1));
        assert!(id > 1);
    }
}
