#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use futures::future::BoxFuture;
use serde_json::{Value, json};
use tempfile::TempDir;

use wedding_game_back::{
    archive::{ArchiveReceipt, ArchiveResult, Archiver},
    chat::{ChatError, ChatMessenger, ChatResult, Profile},
    dao::party_store::{
        PartyStore,
        sqlite::{SqliteConfig, SqlitePartyStore},
    },
    dao::media::MediaStore,
    dto::{sse::ServerEvent, webhook::InboundEvent},
    state::{AppState, Broadcaster, SharedState, StateParts},
};

pub const ADMIN_PASSWORD: &str = "letmein";

/// Broadcaster keeping every published event for assertions.
#[derive(Default)]
pub struct RecordingBroadcaster {
    events: Mutex<Vec<ServerEvent>>,
}

impl RecordingBroadcaster {
    pub fn names(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|event| event.name().to_string())
            .collect()
    }

    /// Parsed payloads of every event called `name`.
    pub fn payloads(&self, name: &str) -> Vec<Value> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.name() == name)
            .map(|event| serde_json::from_str(&event.data).unwrap())
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl Broadcaster for RecordingBroadcaster {
    fn publish(&self, event: ServerEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Messenger answering from canned profiles and recording replies.
#[derive(Default)]
pub struct FakeMessenger {
    profiles: Mutex<HashMap<String, Profile>>,
    replies: Mutex<Vec<(String, String)>>,
    content: Mutex<HashMap<String, Vec<u8>>>,
}

impl FakeMessenger {
    pub fn with_profile(&self, user_id: &str, name: &str) {
        self.profiles.lock().unwrap().insert(
            user_id.to_string(),
            Profile {
                display_name: name.to_string(),
                picture_url: None,
            },
        );
    }

    pub fn with_content(&self, message_id: &str, bytes: &[u8]) {
        self.content
            .lock()
            .unwrap()
            .insert(message_id.to_string(), bytes.to_vec());
    }

    /// Replies sent so far, as `(reply_token, text)`.
    pub fn replies(&self) -> Vec<(String, String)> {
        self.replies.lock().unwrap().clone()
    }

    pub fn reply_to(&self, token: &str) -> Option<String> {
        self.replies()
            .into_iter()
            .find(|(reply_token, _)| reply_token == token)
            .map(|(_, text)| text)
    }
}

impl ChatMessenger for FakeMessenger {
    fn reply_text(&self, reply_token: String, text: String) -> BoxFuture<'static, ChatResult<()>> {
        self.replies.lock().unwrap().push((reply_token, text));
        Box::pin(async { Ok(()) })
    }

    fn fetch_content(&self, message_id: String) -> BoxFuture<'static, ChatResult<Vec<u8>>> {
        let found = self.content.lock().unwrap().get(&message_id).cloned();
        Box::pin(async move { found.ok_or(ChatError::NotConfigured) })
    }

    fn get_profile(&self, user_id: String) -> BoxFuture<'static, ChatResult<Profile>> {
        let found = self.profiles.lock().unwrap().get(&user_id).cloned();
        Box::pin(async move { found.ok_or(ChatError::NotConfigured) })
    }
}

/// Archiver keeping blobs in memory.
#[derive(Default)]
pub struct MemoryArchiver {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryArchiver {
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.blobs.lock().unwrap().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Archiver for MemoryArchiver {
    fn archive(&self, name: String, bytes: Vec<u8>) -> BoxFuture<'static, ArchiveResult<ArchiveReceipt>> {
        let mut blobs = self.blobs.lock().unwrap();
        let receipt = if blobs.contains_key(&name) {
            ArchiveReceipt::AlreadyPresent
        } else {
            blobs.insert(name, bytes);
            ArchiveReceipt::Stored
        };
        Box::pin(async move { Ok(receipt) })
    }
}

/// Fully wired state over in-memory SQLite and fakes.
pub struct TestApp {
    pub state: SharedState,
    pub store: Arc<SqlitePartyStore>,
    pub events: Arc<RecordingBroadcaster>,
    pub messenger: Arc<FakeMessenger>,
    pub archiver: Arc<MemoryArchiver>,
    pub uploads: TempDir,
    database: Option<TempDir>,
}

pub async fn test_app() -> TestApp {
    build(SqliteConfig::in_memory(), None, None).await
}

pub async fn test_app_with_secret(secret: &str) -> TestApp {
    build(SqliteConfig::in_memory(), Some(secret.to_string()), None).await
}

/// Same wiring over a WAL database file with a pool of several connections.
pub async fn test_app_on_disk() -> TestApp {
    let database = tempfile::tempdir().expect("database dir");
    let url = format!("sqlite://{}", database.path().join("party.db").display());
    build(SqliteConfig::new(url), None, Some(database)).await
}

async fn build(
    config: SqliteConfig,
    channel_secret: Option<String>,
    database: Option<TempDir>,
) -> TestApp {
    let store = Arc::new(
        SqlitePartyStore::connect(config)
            .await
            .expect("sqlite store"),
    );
    let events = Arc::new(RecordingBroadcaster::default());
    let messenger = Arc::new(FakeMessenger::default());
    let archiver = Arc::new(MemoryArchiver::default());
    let uploads = tempfile::tempdir().expect("uploads dir");

    let state = AppState::new(StateParts {
        store: store.clone() as Arc<dyn PartyStore>,
        messenger: messenger.clone(),
        archiver: archiver.clone(),
        media: MediaStore::new(uploads.path()),
        admin_password: ADMIN_PASSWORD.to_string(),
        channel_secret,
        broadcaster: Some(events.clone()),
    });

    TestApp {
        state,
        store,
        events,
        messenger,
        archiver,
        uploads,
        database,
    }
}

pub fn text_event(user_id: &str, reply_token: &str, text: &str) -> InboundEvent {
    event(json!({
        "type": "message",
        "replyToken": reply_token,
        "source": {"type": "user", "userId": user_id},
        "message": {"type": "text", "id": format!("m-{reply_token}"), "text": text}
    }))
}

pub fn image_event(user_id: &str, reply_token: &str, message_id: &str) -> InboundEvent {
    event(json!({
        "type": "message",
        "replyToken": reply_token,
        "source": {"type": "user", "userId": user_id},
        "message": {"type": "image", "id": message_id}
    }))
}

pub fn follow_event(user_id: &str, reply_token: &str) -> InboundEvent {
    event(json!({
        "type": "follow",
        "replyToken": reply_token,
        "source": {"type": "user", "userId": user_id}
    }))
}

pub fn event(value: Value) -> InboundEvent {
    serde_json::from_value(value).expect("valid inbound event")
}
