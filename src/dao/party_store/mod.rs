/// SQLite backend.
pub mod sqlite;

use crate::dao::models::{
    GameMode, GameStateEntity, NewAnswer, NewPhoto, NewUser, PhotoEntity, QaAnswerEntity,
    UserEntity, VoteRecord,
};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;

/// Abstraction over the relational store holding guests, phases, answers, photos and votes.
pub trait PartyStore: Send + Sync {
    /// Insert the guest or refresh name and avatar, keeping score and join time.
    fn upsert_user(&self, user: NewUser) -> BoxFuture<'static, StorageResult<UserEntity>>;
    /// Insert the guest only when unknown. Returns `true` when a row was created.
    fn ensure_user(&self, user: NewUser) -> BoxFuture<'static, StorageResult<bool>>;
    /// Guest by chat user id.
    fn find_user(&self, id: String) -> BoxFuture<'static, StorageResult<Option<UserEntity>>>;
    /// Guests ordered by score descending, then join time ascending.
    fn list_users(&self) -> BoxFuture<'static, StorageResult<Vec<UserEntity>>>;
    /// Number of registered guests.
    fn count_users(&self) -> BoxFuture<'static, StorageResult<i64>>;
    /// Add `delta` to the guest's score. `None` when the guest does not exist.
    fn adjust_score(
        &self,
        user_id: String,
        delta: i64,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>>;
    /// Replace the single record kept for `state.mode`.
    fn save_game_state(&self, state: GameStateEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Stored record of `mode`, if any.
    fn find_game_state(
        &self,
        mode: GameMode,
    ) -> BoxFuture<'static, StorageResult<Option<GameStateEntity>>>;
    /// Record an answer, stamped with the submission time.
    fn insert_answer(&self, answer: NewAnswer) -> BoxFuture<'static, StorageResult<QaAnswerEntity>>;
    /// Answers for a question in submission order.
    fn list_answers(&self, question_id: i64)
    -> BoxFuture<'static, StorageResult<Vec<QaAnswerEntity>>>;
    /// Record an uploaded photo with a zero tally.
    fn insert_photo(&self, photo: NewPhoto) -> BoxFuture<'static, StorageResult<PhotoEntity>>;
    /// Photo by id.
    fn find_photo(&self, id: i64) -> BoxFuture<'static, StorageResult<Option<PhotoEntity>>>;
    /// Photos in upload order.
    fn list_photos(&self) -> BoxFuture<'static, StorageResult<Vec<PhotoEntity>>>;
    /// Photos by tally descending, ties broken by earliest upload.
    fn top_photos(&self, limit: u32) -> BoxFuture<'static, StorageResult<Vec<PhotoEntity>>>;
    /// Insert the (user, photo) ledger row and bump the tally as one all-or-nothing unit.
    fn record_vote(
        &self,
        user_id: String,
        photo_id: i64,
    ) -> BoxFuture<'static, StorageResult<VoteRecord>>;
    /// Cheap round trip proving the database answers.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
