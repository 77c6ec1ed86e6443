use sqlx::SqlitePool;
use tracing::debug;

use super::error::{SqliteDaoError, SqliteResult};

/// Schema objects created at startup when absent, in dependency order.
const SCHEMA: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            avatar TEXT,
            score INTEGER NOT NULL DEFAULT 0,
            joined_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "game_states",
        r#"
        CREATE TABLE IF NOT EXISTS game_states (
            mode TEXT PRIMARY KEY,
            status TEXT NOT NULL,
            payload TEXT,
            updated_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "qa_answers",
        r#"
        CREATE TABLE IF NOT EXISTS qa_answers (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL REFERENCES users (id),
            question_id INTEGER NOT NULL,
            answer TEXT NOT NULL,
            submitted_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "idx_qa_answers_question",
        "CREATE INDEX IF NOT EXISTS idx_qa_answers_question ON qa_answers (question_id)",
    ),
    (
        "photos",
        r#"
        CREATE TABLE IF NOT EXISTS photos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL REFERENCES users (id),
            filename TEXT NOT NULL,
            original_name TEXT,
            votes INTEGER NOT NULL DEFAULT 0 CHECK (votes >= 0),
            uploaded_at TEXT NOT NULL
        )
        "#,
    ),
    (
        "votes",
        r#"
        CREATE TABLE IF NOT EXISTS votes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL REFERENCES users (id),
            photo_id INTEGER NOT NULL REFERENCES photos (id),
            voted_at TEXT NOT NULL,
            UNIQUE (user_id, photo_id)
        )
        "#,
    ),
];

/// Create every table and index that does not exist yet.
pub async fn ensure_schema(pool: &SqlitePool) -> SqliteResult<()> {
    for &(object, statement) in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|source| SqliteDaoError::Schema { object, source })?;
        debug!(object, "schema object ensured");
    }
    Ok(())
}
