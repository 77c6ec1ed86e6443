//! Dispatch of inbound chat events to the game.
//!
//! Every event is classified against [`ROUTING_RULES`] (first match wins) and
//! handled independently; a failing event is logged and never affects its
//! siblings in the same batch.

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::{
    dao::models::GameMode,
    dto::webhook::{EventKind, InboundEvent, MessageKind},
    error::ServiceError,
    services::{
        game_state_service, photo_service, quiz_service, user_service,
        voting_service::{self, VoteError, VoteOutcome},
    },
    state::SharedState,
};

/// What the router decided to do with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Register the guest and welcome them.
    Follow,
    /// Store the attached image as a photo entry.
    UploadPhoto,
    /// Record the text as an answer to the open question.
    QuizAnswer {
        /// Open question.
        question_id: i64,
    },
    /// Vote for the photo with this 1-based gallery number.
    Vote {
        /// Number typed by the guest.
        index: u64,
    },
    /// Text outside any game.
    Idle,
    /// Not something the game reacts to.
    Ignore,
}

/// Game facts the routing rules depend on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoutingContext {
    /// Identifier of the open quiz question, if any.
    pub active_question: Option<i64>,
}

/// One entry of the routing table.
pub struct RoutingRule {
    /// Name logged when the rule matches.
    pub name: &'static str,
    /// Route chosen for the event, or `None` to fall through.
    pub select: fn(&InboundEvent, &RoutingContext) -> Option<Route>,
}

/// Routing table in priority order.
pub const ROUTING_RULES: &[RoutingRule] = &[
    RoutingRule {
        name: "follow",
        select: select_follow,
    },
    RoutingRule {
        name: "image",
        select: select_image,
    },
    RoutingRule {
        name: "quiz-answer",
        select: select_quiz_answer,
    },
    RoutingRule {
        name: "vote-number",
        select: select_vote,
    },
    RoutingRule {
        name: "idle-text",
        select: select_idle,
    },
];

fn select_follow(event: &InboundEvent, _: &RoutingContext) -> Option<Route> {
    (event.kind == EventKind::Follow).then_some(Route::Follow)
}

fn select_image(event: &InboundEvent, _: &RoutingContext) -> Option<Route> {
    (message_kind(event) == Some(MessageKind::Image)).then_some(Route::UploadPhoto)
}

fn select_quiz_answer(event: &InboundEvent, context: &RoutingContext) -> Option<Route> {
    event.text()?;
    context
        .active_question
        .map(|question_id| Route::QuizAnswer { question_id })
}

fn select_vote(event: &InboundEvent, _: &RoutingContext) -> Option<Route> {
    parse_vote_number(event.text()?).map(|index| Route::Vote { index })
}

fn select_idle(event: &InboundEvent, _: &RoutingContext) -> Option<Route> {
    event.text().map(|_| Route::Idle)
}

/// Pick the route of `event`; events without a sender are always ignored.
pub fn classify(event: &InboundEvent, context: &RoutingContext) -> Route {
    if event.user_id().is_none() {
        return Route::Ignore;
    }
    ROUTING_RULES
        .iter()
        .find_map(|rule| {
            let route = (rule.select)(event, context)?;
            debug!(rule = rule.name, ?route, "routing rule matched");
            Some(route)
        })
        .unwrap_or(Route::Ignore)
}

/// Positive integer typed by a guest, e.g. `" 2 "`.
///
/// Digit strings too large for `u64` saturate to `u64::MAX` so they are
/// still treated as an out-of-range gallery number.
pub fn parse_vote_number(text: &str) -> Option<u64> {
    let digits = text.trim();
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    match digits.parse::<u64>() {
        Ok(0) => None,
        Ok(number) => Some(number),
        Err(_) if digits.bytes().any(|byte| byte != b'0') => Some(u64::MAX),
        Err(_) => None,
    }
}

fn message_kind(event: &InboundEvent) -> Option<MessageKind> {
    if event.kind != EventKind::Message {
        return None;
    }
    event.message.as_ref().map(|message| message.kind)
}

/// Outcome counters of a processed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Events that ran to completion.
    pub handled: usize,
    /// Events the game does not react to.
    pub ignored: usize,
    /// Events whose handling failed.
    pub failed: usize,
}

enum EventResult {
    Handled,
    Ignored,
    Failed,
}

/// Handle every event of a webhook delivery concurrently and wait for all of them.
pub async fn process_batch(state: &SharedState, events: Vec<InboundEvent>) -> BatchSummary {
    let results = join_all(events.iter().map(|event| process_event(state, event))).await;

    let mut summary = BatchSummary::default();
    for result in results {
        match result {
            EventResult::Handled => summary.handled += 1,
            EventResult::Ignored => summary.ignored += 1,
            EventResult::Failed => summary.failed += 1,
        }
    }
    if summary.failed > 0 {
        warn!(?summary, "webhook batch finished with failures");
    }
    summary
}

async fn process_event(state: &SharedState, event: &InboundEvent) -> EventResult {
    let context = match routing_context(state, event).await {
        Ok(context) => context,
        Err(err) => {
            warn!(error = %err, "failed to load game state for inbound event");
            return EventResult::Failed;
        }
    };

    let route = classify(event, &context);
    let Some(user_id) = event.user_id().filter(|_| route != Route::Ignore) else {
        debug!(kind = ?event.kind, "inbound event ignored");
        return EventResult::Ignored;
    };

    match handle(state, event, user_id, route).await {
        Ok(reply) => {
            send_reply(state, event, reply).await;
            EventResult::Handled
        }
        Err(err) => {
            warn!(user_id, ?route, error = %err, "failed to handle inbound event");
            EventResult::Failed
        }
    }
}

async fn routing_context(
    state: &SharedState,
    event: &InboundEvent,
) -> Result<RoutingContext, ServiceError> {
    if event.text().is_none() {
        return Ok(RoutingContext::default());
    }

    let quiz = game_state_service::get_state(state, GameMode::Qa).await?;
    Ok(RoutingContext {
        active_question: quiz.is_active().then(|| quiz.question_id()).flatten(),
    })
}

/// Run the route and return the text to reply with.
async fn handle(
    state: &SharedState,
    event: &InboundEvent,
    user_id: &str,
    route: Route,
) -> Result<String, ServiceError> {
    match route {
        Route::Follow => {
            let user = user_service::register_follower(state, user_id).await?;
            info!(user_id, name = %user.name, "guest followed");
            Ok(replies::welcome(&user.name))
        }
        Route::UploadPhoto => {
            let message_id = event
                .message
                .as_ref()
                .map(|message| message.id.as_str())
                .unwrap_or_default();
            photo_service::upload_from_message(state, user_id, message_id).await?;
            Ok(replies::PHOTO_RECEIVED.to_string())
        }
        Route::QuizAnswer { question_id } => {
            let answer = event.text().unwrap_or_default();
            quiz_service::submit_answer(state, user_id, question_id, answer).await?;
            Ok(replies::answer_received(answer))
        }
        Route::Vote { index } => {
            match voting_service::vote_by_index(state, user_id, index).await {
                Ok(VoteOutcome::Accepted { .. }) => Ok(replies::vote_accepted(index)),
                Ok(VoteOutcome::AlreadyVoted { .. }) => Ok(replies::already_voted(index)),
                Err(VoteError::IndexOutOfRange { available, .. }) => {
                    Ok(replies::out_of_range(available))
                }
                Err(VoteError::NotVotingPhase) => Ok(replies::NO_ACTIVE_VOTING.to_string()),
                Err(err) => Err(err.into()),
            }
        }
        Route::Idle => Ok(replies::NO_ACTIVE_GAME.to_string()),
        Route::Ignore => Ok(String::new()),
    }
}

async fn send_reply(state: &SharedState, event: &InboundEvent, text: String) {
    let Some(reply_token) = event.reply_token.clone() else {
        return;
    };
    if text.is_empty() {
        return;
    }
    if let Err(err) = state.messenger().reply_text(reply_token, text).await {
        warn!(error = %err, "failed to send chat reply");
    }
}

/// Texts sent back to guests.
pub mod replies {
    /// Reply to an uploaded photo.
    pub const PHOTO_RECEIVED: &str = "Photo uploaded! 📸 Thanks for sharing!";
    /// Reply to text outside any game.
    pub const NO_ACTIVE_GAME: &str =
        "There is no game in progress right now. Please wait for the host to start one!";
    /// Reply to a number while voting is closed.
    pub const NO_ACTIVE_VOTING: &str = "Photo voting is not open right now!";

    /// Greeting with the rules, sent on follow.
    pub fn welcome(name: &str) -> String {
        format!(
            "Welcome {name}, and thanks for joining the wedding games! 🎉\n\n\
             How to play:\n\
             1. Quiz: when the host asks a question, just reply with your answer\n\
             2. Photos: send pictures at any time to enter the photo contest\n\
             3. Voting: reply with a photo number (e.g. 1, 2, 3...)\n\n\
             Have fun! ❤️"
        )
    }

    /// Acknowledgement of a quiz answer.
    pub fn answer_received(answer: &str) -> String {
        format!("Got your answer: \"{answer}\" ✅")
    }

    /// Acknowledgement of a counted vote.
    pub fn vote_accepted(index: u64) -> String {
        format!("Vote counted for photo #{index} 🗳️")
    }

    /// Reply to a repeated vote.
    pub fn already_voted(index: u64) -> String {
        format!("You have already voted for photo #{index}!")
    }

    /// Reply to a gallery number with no photo behind it.
    pub fn out_of_range(available: usize) -> String {
        if available == 0 {
            "There are no photos to vote for yet!".to_string()
        } else {
            format!("Invalid photo number! Please send a number from 1 to {available}.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(value: serde_json::Value) -> InboundEvent {
        serde_json::from_value(value).unwrap()
    }

    fn text(body: &str) -> InboundEvent {
        event(json!({
            "type": "message",
            "replyToken": "r",
            "source": {"type": "user", "userId": "U1"},
            "message": {"type": "text", "id": "m", "text": body}
        }))
    }

    fn quiz_open() -> RoutingContext {
        RoutingContext {
            active_question: Some(7),
        }
    }

    #[test]
    fn rules_are_listed_in_priority_order() {
        let names: Vec<_> = ROUTING_RULES.iter().map(|rule| rule.name).collect();
        assert_eq!(
            names,
            vec!["follow", "image", "quiz-answer", "vote-number", "idle-text"]
        );
    }

    #[test]
    fn follow_and_image_events() {
        let follow = event(json!({"type": "follow", "source": {"userId": "U1"}}));
        assert_eq!(classify(&follow, &quiz_open()), Route::Follow);

        let image = event(json!({
            "type": "message",
            "source": {"userId": "U1"},
            "message": {"type": "image", "id": "m1"}
        }));
        assert_eq!(classify(&image, &quiz_open()), Route::UploadPhoto);
    }

    #[test]
    fn numbers_are_answers_while_a_question_is_open() {
        assert_eq!(
            classify(&text("2"), &quiz_open()),
            Route::QuizAnswer { question_id: 7 }
        );
        assert_eq!(
            classify(&text("2"), &RoutingContext::default()),
            Route::Vote { index: 2 }
        );
    }

    #[test]
    fn other_text_falls_through_to_idle() {
        let idle = RoutingContext::default();
        assert_eq!(classify(&text("hello"), &idle), Route::Idle);
        assert_eq!(classify(&text("0"), &idle), Route::Idle);
        assert_eq!(classify(&text("-3"), &idle), Route::Idle);
        assert_eq!(classify(&text(" 3 "), &idle), Route::Vote { index: 3 });
    }

    #[test]
    fn unsupported_events_are_ignored() {
        let context = RoutingContext::default();
        let unfollow = event(json!({"type": "unfollow", "source": {"userId": "U1"}}));
        let sticker = event(json!({
            "type": "message",
            "source": {"userId": "U1"},
            "message": {"type": "sticker", "id": "m"}
        }));
        let anonymous = event(json!({"type": "follow"}));

        for event in [unfollow, sticker, anonymous] {
            assert_eq!(classify(&event, &context), Route::Ignore);
        }
    }

    #[test]
    fn vote_numbers_must_be_positive_integers() {
        assert_eq!(parse_vote_number("12"), Some(12));
        assert_eq!(parse_vote_number("\t4\n"), Some(4));
        assert_eq!(parse_vote_number("0"), None);
        assert_eq!(parse_vote_number("1.5"), None);
        assert_eq!(parse_vote_number("two"), None);
        assert_eq!(parse_vote_number(""), None);
        assert_eq!(parse_vote_number("+3"), None);
    }

    #[test]
    fn oversized_vote_numbers_saturate() {
        assert_eq!(
            parse_vote_number("18446744073709551616"),
            Some(u64::MAX)
        );
        assert_eq!(parse_vote_number("0000000000000000000000"), None);
        assert_eq!(
            classify(&text("99999999999999999999999"), &RoutingContext::default()),
            Route::Vote { index: u64::MAX }
        );
    }
}
