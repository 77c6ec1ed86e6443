use thiserror::Error;
use tracing::{debug, info};

use crate::{
    dao::{
        models::{GameMode, PhotoEntity, VoteRecord},
        storage::StorageError,
    },
    error::ServiceError,
    services::{game_state_service, sse_events, user_service},
    state::SharedState,
};

/// Normal results of a vote attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The vote counted; `votes` is the photo's new tally.
    Accepted {
        /// Photo voted for.
        photo_id: i64,
        /// Tally after this vote.
        votes: i64,
    },
    /// The guest had already voted for this photo; nothing changed.
    AlreadyVoted {
        /// Photo voted for.
        photo_id: i64,
    },
}

/// Reasons a vote is refused.
#[derive(Debug, Error)]
pub enum VoteError {
    /// Voting is not in its `active` phase.
    #[error("photo voting is not active")]
    NotVotingPhase,
    /// No photo has this id.
    #[error("photo {0} does not exist")]
    UnknownPhoto(i64),
    /// A gallery number outside `1..=available`.
    #[error("photo number {index} is out of range (1 to {available})")]
    IndexOutOfRange {
        /// Number typed by the guest.
        index: u64,
        /// Photos currently in the gallery.
        available: usize,
    },
    /// Storage or other service failure.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<StorageError> for VoteError {
    fn from(err: StorageError) -> Self {
        VoteError::Service(err.into())
    }
}

impl From<VoteError> for ServiceError {
    fn from(err: VoteError) -> Self {
        match err {
            VoteError::NotVotingPhase => ServiceError::InvalidState(err.to_string()),
            VoteError::UnknownPhoto(_) => ServiceError::NotFound(err.to_string()),
            VoteError::IndexOutOfRange { .. } => ServiceError::InvalidInput(err.to_string()),
            VoteError::Service(inner) => inner,
        }
    }
}

/// Cast `user_id`'s vote for `photo_id`. Each guest counts at most once per photo.
pub async fn vote(
    state: &SharedState,
    user_id: &str,
    photo_id: i64,
) -> Result<VoteOutcome, VoteError> {
    ensure_voting_open(state).await?;
    if state.store().find_photo(photo_id).await?.is_none() {
        return Err(VoteError::UnknownPhoto(photo_id));
    }
    record(state, user_id, photo_id).await
}

/// Vote for the `index`-th photo (1-based) in upload order.
pub async fn vote_by_index(
    state: &SharedState,
    user_id: &str,
    index: u64,
) -> Result<VoteOutcome, VoteError> {
    ensure_voting_open(state).await?;

    let photos = state.store().list_photos().await?;
    let photo = usize::try_from(index)
        .ok()
        .and_then(|index| index.checked_sub(1))
        .and_then(|position| photos.get(position))
        .ok_or(VoteError::IndexOutOfRange {
            index,
            available: photos.len(),
        })?;
    record(state, user_id, photo.id).await
}

/// Best-voted photos, ties broken by earliest upload.
pub async fn top_photos(state: &SharedState, limit: u32) -> Result<Vec<PhotoEntity>, ServiceError> {
    Ok(state.store().top_photos(limit).await?)
}

async fn ensure_voting_open(state: &SharedState) -> Result<(), VoteError> {
    let voting = game_state_service::get_state(state, GameMode::PhotoVoting).await?;
    if voting.is_active() {
        Ok(())
    } else {
        Err(VoteError::NotVotingPhase)
    }
}

async fn record(state: &SharedState, user_id: &str, photo_id: i64) -> Result<VoteOutcome, VoteError> {
    user_service::ensure_user(state, user_id).await?;

    match state
        .store()
        .record_vote(user_id.to_string(), photo_id)
        .await?
    {
        VoteRecord::Inserted { votes } => {
            info!(user_id, photo_id, votes, "vote accepted");
            sse_events::broadcast_vote_updated(state, photo_id, votes);
            Ok(VoteOutcome::Accepted { photo_id, votes })
        }
        VoteRecord::Duplicate => {
            debug!(user_id, photo_id, "duplicate vote ignored");
            Ok(VoteOutcome::AlreadyVoted { photo_id })
        }
    }
}
