use tracing::debug;

use crate::{
    dao::models::{NewAnswer, QaAnswerEntity},
    error::ServiceError,
    services::{sse_events, user_service},
    state::SharedState,
};

/// Record `answer` for `question_id` and announce it. Guests may answer more than once.
pub async fn submit_answer(
    state: &SharedState,
    user_id: &str,
    question_id: i64,
    answer: &str,
) -> Result<QaAnswerEntity, ServiceError> {
    user_service::ensure_user(state, user_id).await?;

    let saved = state
        .store()
        .insert_answer(NewAnswer {
            user_id: user_id.to_string(),
            question_id,
            answer: answer.to_string(),
        })
        .await?;
    debug!(user_id, question_id, answer_id = saved.id, "answer recorded");

    sse_events::broadcast_new_answer(state, &saved);
    Ok(saved)
}

/// Answers for `question_id` in submission order.
pub async fn list_answers(
    state: &SharedState,
    question_id: i64,
) -> Result<Vec<QaAnswerEntity>, ServiceError> {
    Ok(state.store().list_answers(question_id).await?)
}
