use tracing::{debug, warn};

use crate::{
    chat::Profile,
    dao::models::{NewUser, UserEntity},
    error::ServiceError,
    services::sse_events,
    state::SharedState,
};

/// Display name used when the platform profile cannot be fetched.
pub const FALLBACK_NAME: &str = "Guest";

/// Register (or refresh) a guest who just followed the bot and announce the new head count.
pub async fn register_follower(
    state: &SharedState,
    user_id: &str,
) -> Result<UserEntity, ServiceError> {
    let user = state.store().upsert_user(profile_of(state, user_id).await).await?;
    announce_participants(state).await?;
    Ok(user)
}

/// Return the guest, creating it from the platform profile when unknown.
///
/// Guests may answer or upload before the follow event reached us; the
/// lazily created row keeps foreign keys valid.
pub async fn ensure_user(state: &SharedState, user_id: &str) -> Result<UserEntity, ServiceError> {
    if let Some(user) = state.store().find_user(user_id.to_string()).await? {
        return Ok(user);
    }

    let created = state
        .store()
        .ensure_user(profile_of(state, user_id).await)
        .await?;
    if created {
        debug!(user_id, "guest created lazily");
        announce_participants(state).await?;
    }

    state
        .store()
        .find_user(user_id.to_string())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("user `{user_id}`")))
}

/// Number of registered guests.
pub async fn participant_count(state: &SharedState) -> Result<i64, ServiceError> {
    Ok(state.store().count_users().await?)
}

async fn announce_participants(state: &SharedState) -> Result<(), ServiceError> {
    let count = participant_count(state).await?;
    sse_events::broadcast_participants(state, count);
    Ok(())
}

async fn profile_of(state: &SharedState, user_id: &str) -> NewUser {
    let profile = match state.messenger().get_profile(user_id.to_string()).await {
        Ok(profile) => profile,
        Err(err) => {
            warn!(user_id, error = %err, "profile lookup failed; using fallback name");
            Profile {
                display_name: FALLBACK_NAME.to_string(),
                picture_url: None,
            }
        }
    };

    NewUser {
        id: user_id.to_string(),
        name: profile.display_name,
        avatar: profile.picture_url,
    }
}
