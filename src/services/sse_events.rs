use serde::Serialize;
use tracing::warn;

use crate::{
    dao::models::{PhotoEntity, QaAnswerEntity},
    dto::{
        public::LeaderboardEntry,
        sse::{
            LeaderboardUpdatedEvent, NewAnswerEvent, ParticipantsUpdatedEvent,
            PhotoUploadedEvent, QuestionEndedEvent, QuestionStartedEvent, ServerEvent,
            VoteUpdatedEvent, VotingEndedEvent, VotingStartedEvent,
        },
    },
    state::SharedState,
};

/// Greeting sent to each new subscriber.
pub const EVENT_INFO: &str = "info";
/// Guest count changed.
pub const EVENT_PARTICIPANTS_UPDATED: &str = "participants-updated";
/// Scores changed.
pub const EVENT_LEADERBOARD_UPDATED: &str = "leaderboard-updated";
/// Quiz question opened.
pub const EVENT_QUESTION_STARTED: &str = "qa-question-started";
/// Quiz question closed.
pub const EVENT_QUESTION_ENDED: &str = "qa-question-ended";
/// Answer received.
pub const EVENT_NEW_ANSWER: &str = "qa-new-answer";
/// Photo stored.
pub const EVENT_PHOTO_UPLOADED: &str = "photo-uploaded";
/// Voting opened.
pub const EVENT_VOTING_STARTED: &str = "photo-voting-started";
/// Voting closed.
pub const EVENT_VOTING_ENDED: &str = "photo-voting-ended";
/// Tally changed.
pub const EVENT_VOTE_UPDATED: &str = "photo-vote-updated";

/// Broadcast the number of registered guests.
pub fn broadcast_participants(state: &SharedState, count: i64) {
    send_public_event(
        state,
        EVENT_PARTICIPANTS_UPDATED,
        &ParticipantsUpdatedEvent { count },
    );
}

/// Broadcast the full leaderboard after scores moved.
pub fn broadcast_leaderboard(state: &SharedState, entries: Vec<LeaderboardEntry>) {
    send_public_event(
        state,
        EVENT_LEADERBOARD_UPDATED,
        &LeaderboardUpdatedEvent(entries),
    );
}

/// Broadcast a freshly opened question.
pub fn broadcast_question_started(state: &SharedState, question_id: i64, question: &str) {
    let payload = QuestionStartedEvent {
        question_id,
        question: question.to_string(),
    };
    send_public_event(state, EVENT_QUESTION_STARTED, &payload);
}

/// Broadcast that the question was closed.
pub fn broadcast_question_ended(state: &SharedState, question_id: Option<i64>) {
    send_public_event(
        state,
        EVENT_QUESTION_ENDED,
        &QuestionEndedEvent { question_id },
    );
}

/// Broadcast an answer as soon as it has been recorded.
pub fn broadcast_new_answer(state: &SharedState, answer: &QaAnswerEntity) {
    let payload = NewAnswerEvent {
        user_id: answer.user_id.clone(),
        user_name: answer.user_name.clone(),
        answer: answer.answer.clone(),
        question_id: answer.question_id,
        submitted_at: answer.submitted_at.clone(),
    };
    send_public_event(state, EVENT_NEW_ANSWER, &payload);
}

/// Broadcast a newly stored photo.
pub fn broadcast_photo_uploaded(state: &SharedState, photo: &PhotoEntity) {
    let payload = PhotoUploadedEvent {
        photo_id: photo.id,
        user_id: photo.user_id.clone(),
        user_name: photo.user_name.clone(),
        filename: photo.filename.clone(),
        uploaded_at: photo.uploaded_at.clone(),
    };
    send_public_event(state, EVENT_PHOTO_UPLOADED, &payload);
}

/// Broadcast that voting opened at `start_time`.
pub fn broadcast_voting_started(state: &SharedState, start_time: &str) {
    let payload = VotingStartedEvent {
        start_time: start_time.to_string(),
    };
    send_public_event(state, EVENT_VOTING_STARTED, &payload);
}

/// Broadcast that voting closed.
pub fn broadcast_voting_ended(state: &SharedState) {
    send_public_event(state, EVENT_VOTING_ENDED, &VotingEndedEvent {});
}

/// Broadcast the new tally of a photo after an accepted vote.
pub fn broadcast_vote_updated(state: &SharedState, photo_id: i64, votes: i64) {
    send_public_event(
        state,
        EVENT_VOTE_UPDATED,
        &VoteUpdatedEvent { photo_id, votes },
    );
}

fn send_public_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.events().publish(event),
        Err(err) => warn!(event, error = %err, "failed to serialize public SSE payload"),
    }
}
