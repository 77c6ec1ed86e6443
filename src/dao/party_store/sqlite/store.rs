use std::str::FromStr;

use futures::future::BoxFuture;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use tracing::{debug, info};

use super::{
    config::SqliteConfig,
    error::{SqliteDaoError, SqliteResult},
    models::{AnswerRow, GameStateRow, PhotoRow, UserRow},
    schema::ensure_schema,
};
use crate::dao::{
    models::{
        GameMode, GameStateEntity, NewAnswer, NewPhoto, NewUser, PhotoEntity, QaAnswerEntity,
        UserEntity, VoteRecord,
    },
    now_timestamp,
    party_store::PartyStore,
    storage::StorageResult,
};

const USER_COLUMNS: &str = "id, name, avatar, score, joined_at";
const PHOTO_SELECT: &str = r#"
    SELECT p.id, p.user_id, u.name AS user_name, p.filename, p.original_name, p.votes, p.uploaded_at
    FROM photos p
    JOIN users u ON p.user_id = u.id
"#;
const ANSWER_SELECT: &str = r#"
    SELECT qa.id, qa.user_id, u.name AS user_name, qa.question_id, qa.answer, qa.submitted_at
    FROM qa_answers qa
    JOIN users u ON qa.user_id = u.id
"#;

/// [`PartyStore`] backed by a SQLite connection pool.
#[derive(Clone)]
pub struct SqlitePartyStore {
    pool: SqlitePool,
}

impl SqlitePartyStore {
    /// Open the database, creating the file and the schema when absent.
    pub async fn connect(config: SqliteConfig) -> SqliteResult<Self> {
        let mut options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|source| SqliteDaoError::InvalidUrl {
                url: config.url.clone(),
                source,
            })?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout);
        if !config.is_memory() {
            options = options.journal_mode(SqliteJournalMode::Wal);
        }

        let mut pool_options = SqlitePoolOptions::new().max_connections(config.pool_size());
        if config.is_memory() {
            // Dropping the only connection would drop the database with it.
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|source| SqliteDaoError::Connect {
                url: config.url.clone(),
                source,
            })?;

        ensure_schema(&pool).await?;
        info!(url = %config.url, "SQLite store ready");
        Ok(Self { pool })
    }

    async fn upsert_user_row(&self, user: NewUser) -> SqliteResult<UserEntity> {
        let sql = format!(
            r#"
            INSERT INTO users (id, name, avatar, score, joined_at)
            VALUES (?1, ?2, ?3, 0, ?4)
            ON CONFLICT (id) DO UPDATE SET name = excluded.name, avatar = excluded.avatar
            RETURNING {USER_COLUMNS}
            "#
        );
        let row: UserRow = sqlx::query_as(&sql)
            .bind(&user.id)
            .bind(&user.name)
            .bind(&user.avatar)
            .bind(now_timestamp())
            .fetch_one(&self.pool)
            .await
            .map_err(SqliteDaoError::query("upsert_user"))?;
        Ok(row.into())
    }

    async fn insert_user_if_missing(&self, user: NewUser) -> SqliteResult<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO users (id, name, avatar, score, joined_at) VALUES (?1, ?2, ?3, 0, ?4)",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.avatar)
        .bind(now_timestamp())
        .execute(&self.pool)
        .await
        .map_err(SqliteDaoError::query("ensure_user"))?;
        Ok(result.rows_affected() == 1)
    }

    async fn find_user_row(&self, id: &str) -> SqliteResult<Option<UserEntity>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(SqliteDaoError::query("find_user"))?;
        Ok(row.map(Into::into))
    }

    async fn list_user_rows(&self) -> SqliteResult<Vec<UserEntity>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY score DESC, joined_at ASC, rowid ASC");
        let rows: Vec<UserRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(SqliteDaoError::query("list_users"))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_user_rows(&self) -> SqliteResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(SqliteDaoError::query("count_users"))
    }

    async fn adjust_score_row(&self, user_id: &str, delta: i64) -> SqliteResult<Option<UserEntity>> {
        let sql = format!("UPDATE users SET score = score + ?1 WHERE id = ?2 RETURNING {USER_COLUMNS}");
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(delta)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(SqliteDaoError::query("adjust_score"))?;
        Ok(row.map(Into::into))
    }

    async fn save_game_state_row(&self, state: GameStateEntity) -> SqliteResult<()> {
        let payload = if state.payload.is_null() {
            None
        } else {
            Some(state.payload.to_string())
        };
        sqlx::query(
            r#"
            INSERT INTO game_states (mode, status, payload, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (mode) DO UPDATE SET
                status = excluded.status,
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(state.mode.as_str())
        .bind(state.status.as_str())
        .bind(payload)
        .bind(&state.updated_at)
        .execute(&self.pool)
        .await
        .map_err(SqliteDaoError::query("save_game_state"))?;
        debug!(mode = %state.mode, status = state.status.as_str(), "game state saved");
        Ok(())
    }

    async fn find_game_state_row(&self, mode: GameMode) -> SqliteResult<Option<GameStateEntity>> {
        let row: Option<GameStateRow> = sqlx::query_as(
            "SELECT mode, status, payload, updated_at FROM game_states WHERE mode = ?1",
        )
        .bind(mode.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(SqliteDaoError::query("find_game_state"))?;
        row.map(GameStateEntity::try_from).transpose()
    }

    async fn insert_answer_row(&self, answer: NewAnswer) -> SqliteResult<QaAnswerEntity> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO qa_answers (user_id, question_id, answer, submitted_at) VALUES (?1, ?2, ?3, ?4) RETURNING id",
        )
        .bind(&answer.user_id)
        .bind(answer.question_id)
        .bind(&answer.answer)
        .bind(now_timestamp())
        .fetch_one(&self.pool)
        .await
        .map_err(SqliteDaoError::query("insert_answer"))?;

        let sql = format!("{ANSWER_SELECT} WHERE qa.id = ?1");
        let row: Option<AnswerRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(SqliteDaoError::query("insert_answer"))?;
        row.map(Into::into).ok_or(SqliteDaoError::MissingRow {
            operation: "insert_answer",
        })
    }

    async fn list_answer_rows(&self, question_id: i64) -> SqliteResult<Vec<QaAnswerEntity>> {
        let sql = format!("{ANSWER_SELECT} WHERE qa.question_id = ?1 ORDER BY qa.submitted_at ASC, qa.id ASC");
        let rows: Vec<AnswerRow> = sqlx::query_as(&sql)
            .bind(question_id)
            .fetch_all(&self.pool)
            .await
            .map_err(SqliteDaoError::query("list_answers"))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_photo_row(&self, photo: NewPhoto) -> SqliteResult<PhotoEntity> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO photos (user_id, filename, original_name, votes, uploaded_at) VALUES (?1, ?2, ?3, 0, ?4) RETURNING id",
        )
        .bind(&photo.user_id)
        .bind(&photo.filename)
        .bind(&photo.original_name)
        .bind(now_timestamp())
        .fetch_one(&self.pool)
        .await
        .map_err(SqliteDaoError::query("insert_photo"))?;

        self.find_photo_row(id)
            .await?
            .ok_or(SqliteDaoError::MissingRow {
                operation: "insert_photo",
            })
    }

    async fn find_photo_row(&self, id: i64) -> SqliteResult<Option<PhotoEntity>> {
        let sql = format!("{PHOTO_SELECT} WHERE p.id = ?1");
        let row: Option<PhotoRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(SqliteDaoError::query("find_photo"))?;
        Ok(row.map(Into::into))
    }

    async fn list_photo_rows(&self) -> SqliteResult<Vec<PhotoEntity>> {
        let sql = format!("{PHOTO_SELECT} ORDER BY p.uploaded_at ASC, p.id ASC");
        let rows: Vec<PhotoRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(SqliteDaoError::query("list_photos"))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn top_photo_rows(&self, limit: u32) -> SqliteResult<Vec<PhotoEntity>> {
        let sql = format!("{PHOTO_SELECT} ORDER BY p.votes DESC, p.uploaded_at ASC, p.id ASC LIMIT ?1");
        let rows: Vec<PhotoRow> = sqlx::query_as(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(SqliteDaoError::query("top_photos"))?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn record_vote_rows(&self, user_id: &str, photo_id: i64) -> SqliteResult<VoteRecord> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(SqliteDaoError::transaction("record_vote"))?;

        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO votes (user_id, photo_id, voted_at) VALUES (?1, ?2, ?3)",
        )
        .bind(user_id)
        .bind(photo_id)
        .bind(now_timestamp())
        .execute(&mut *tx)
        .await
        .map_err(SqliteDaoError::query("record_vote"))?
        .rows_affected();

        if inserted == 0 {
            tx.rollback()
                .await
                .map_err(SqliteDaoError::transaction("record_vote"))?;
            return Ok(VoteRecord::Duplicate);
        }

        // Dropping `tx` on any early return below rolls the ledger row back.
        let votes: i64 =
            sqlx::query_scalar("UPDATE photos SET votes = votes + 1 WHERE id = ?1 RETURNING votes")
                .bind(photo_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(SqliteDaoError::query("record_vote"))?
                .ok_or(SqliteDaoError::MissingRow {
                    operation: "record_vote",
                })?;

        tx.commit()
            .await
            .map_err(SqliteDaoError::transaction("record_vote"))?;
        Ok(VoteRecord::Inserted { votes })
    }

    async fn ping(&self) -> SqliteResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(SqliteDaoError::query("health_check"))?;
        Ok(())
    }
}

impl PartyStore for SqlitePartyStore {
    fn upsert_user(&self, user: NewUser) -> BoxFuture<'static, StorageResult<UserEntity>> {
        let store = self.clone();
        Box::pin(async move { store.upsert_user_row(user).await.map_err(Into::into) })
    }

    fn ensure_user(&self, user: NewUser) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move { store.insert_user_if_missing(user).await.map_err(Into::into) })
    }

    fn find_user(&self, id: String) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_user_row(&id).await.map_err(Into::into) })
    }

    fn list_users(&self) -> BoxFuture<'static, StorageResult<Vec<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_user_rows().await.map_err(Into::into) })
    }

    fn count_users(&self) -> BoxFuture<'static, StorageResult<i64>> {
        let store = self.clone();
        Box::pin(async move { store.count_user_rows().await.map_err(Into::into) })
    }

    fn adjust_score(
        &self,
        user_id: String,
        delta: i64,
    ) -> BoxFuture<'static, StorageResult<Option<UserEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .adjust_score_row(&user_id, delta)
                .await
                .map_err(Into::into)
        })
    }

    fn save_game_state(&self, state: GameStateEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_game_state_row(state).await.map_err(Into::into) })
    }

    fn find_game_state(
        &self,
        mode: GameMode,
    ) -> BoxFuture<'static, StorageResult<Option<GameStateEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_game_state_row(mode).await.map_err(Into::into) })
    }

    fn insert_answer(&self, answer: NewAnswer) -> BoxFuture<'static, StorageResult<QaAnswerEntity>> {
        let store = self.clone();
        Box::pin(async move { store.insert_answer_row(answer).await.map_err(Into::into) })
    }

    fn list_answers(
        &self,
        question_id: i64,
    ) -> BoxFuture<'static, StorageResult<Vec<QaAnswerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_answer_rows(question_id).await.map_err(Into::into) })
    }

    fn insert_photo(&self, photo: NewPhoto) -> BoxFuture<'static, StorageResult<PhotoEntity>> {
        let store = self.clone();
        Box::pin(async move { store.insert_photo_row(photo).await.map_err(Into::into) })
    }

    fn find_photo(&self, id: i64) -> BoxFuture<'static, StorageResult<Option<PhotoEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_photo_row(id).await.map_err(Into::into) })
    }

    fn list_photos(&self) -> BoxFuture<'static, StorageResult<Vec<PhotoEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_photo_rows().await.map_err(Into::into) })
    }

    fn top_photos(&self, limit: u32) -> BoxFuture<'static, StorageResult<Vec<PhotoEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.top_photo_rows(limit).await.map_err(Into::into) })
    }

    fn record_vote(
        &self,
        user_id: String,
        photo_id: i64,
    ) -> BoxFuture<'static, StorageResult<VoteRecord>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .record_vote_rows(&user_id, photo_id)
                .await
                .map_err(Into::into)
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.ping().await.map_err(Into::into) })
    }
}
