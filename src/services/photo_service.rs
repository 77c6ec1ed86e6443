use tracing::info;

use crate::{
    dao::models::{NewPhoto, PhotoEntity},
    error::ServiceError,
    services::{sse_events, user_service},
    state::SharedState,
};

/// Store an uploaded photo, record it and queue it for archival.
///
/// The archive job is queued only after the row is committed and its outcome
/// never affects the upload.
pub async fn upload_photo(
    state: &SharedState,
    user_id: &str,
    bytes: &[u8],
) -> Result<PhotoEntity, ServiceError> {
    let user = user_service::ensure_user(state, user_id).await?;

    let filename = state.media().save_photo(bytes).await.map_err(|err| {
        ServiceError::External(format!("failed to store uploaded photo: {err}"))
    })?;

    let photo = state
        .store()
        .insert_photo(NewPhoto {
            user_id: user.id.clone(),
            filename,
            original_name: Some(format!("{}_photo", user.name)),
        })
        .await?;
    info!(photo_id = photo.id, user_id, filename = %photo.filename, "photo uploaded");

    state.archive().enqueue(&photo.filename);
    sse_events::broadcast_photo_uploaded(state, &photo);
    Ok(photo)
}

/// Download the content of an inbound image message and store it as a photo.
pub async fn upload_from_message(
    state: &SharedState,
    user_id: &str,
    message_id: &str,
) -> Result<PhotoEntity, ServiceError> {
    let bytes = state
        .messenger()
        .fetch_content(message_id.to_string())
        .await
        .map_err(|err| ServiceError::External(err.to_string()))?;
    upload_photo(state, user_id, &bytes).await
}

/// Photos in upload order, the numbering guests vote with.
pub async fn list_photos(state: &SharedState) -> Result<Vec<PhotoEntity>, ServiceError> {
    Ok(state.store().list_photos().await?)
}
