/// Admin password gate and bearer token.
pub mod admin;
/// Event fan-out to dashboard subscribers.
pub mod broadcast;
/// Phase machine of each game mode.
pub mod game_state;

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::{
    archive::Archiver,
    chat::{ChatMessenger, signature::WebhookVerifier},
    dao::{media::MediaStore, party_store::PartyStore},
    services::archive_service::ArchiveQueue,
};

pub use self::admin::AdminGate;
pub use self::broadcast::{Broadcaster, SseHub};

/// Handle cloned into every handler and background task.
pub type SharedState = Arc<AppState>;

/// Capacity of the public SSE channel before slow subscribers start lagging.
pub const SSE_CAPACITY: usize = 64;

/// Collaborators needed to assemble an [`AppState`].
pub struct StateParts {
    /// Persistence backend.
    pub store: Arc<dyn PartyStore>,
    /// Chat platform client.
    pub messenger: Arc<dyn ChatMessenger>,
    /// Backup destination for uploaded photos.
    pub archiver: Arc<dyn Archiver>,
    /// Local uploads directory.
    pub media: MediaStore,
    /// Shared password of the admin panel.
    pub admin_password: String,
    /// Enables `X-Line-Signature` checks on the webhook when set.
    pub channel_secret: Option<String>,
    /// Event sink; defaults to the public SSE hub.
    pub broadcaster: Option<Arc<dyn Broadcaster>>,
}

/// Central application state shared by every handler.
pub struct AppState {
    store: Arc<dyn PartyStore>,
    events: Arc<dyn Broadcaster>,
    sse: SseHub,
    messenger: Arc<dyn ChatMessenger>,
    media: MediaStore,
    archive: ArchiveQueue,
    admin: AdminGate,
    webhook_verifier: Option<WebhookVerifier>,
    transition_gate: Mutex<()>,
}

impl AppState {
    /// Assemble the state and start the archive worker. Must run inside a Tokio runtime.
    pub fn new(parts: StateParts) -> SharedState {
        let sse = SseHub::new(SSE_CAPACITY);
        let events = parts
            .broadcaster
            .unwrap_or_else(|| Arc::new(sse.clone()) as Arc<dyn Broadcaster>);
        let archive = ArchiveQueue::start(parts.archiver, parts.media.clone());

        Arc::new(Self {
            store: parts.store,
            events,
            sse,
            messenger: parts.messenger,
            media: parts.media,
            archive,
            admin: AdminGate::new(parts.admin_password),
            webhook_verifier: parts
                .channel_secret
                .filter(|secret| !secret.is_empty())
                .map(|secret| WebhookVerifier::new(&secret)),
            transition_gate: Mutex::new(()),
        })
    }

    /// Persistence backend.
    pub fn store(&self) -> &Arc<dyn PartyStore> {
        &self.store
    }

    /// Sink every publisher sends its notifications to.
    pub fn events(&self) -> &dyn Broadcaster {
        self.events.as_ref()
    }

    /// Hub the `/sse/public` stream subscribes to.
    pub fn public_sse(&self) -> &SseHub {
        &self.sse
    }

    /// Chat platform client.
    pub fn messenger(&self) -> &Arc<dyn ChatMessenger> {
        &self.messenger
    }

    /// Uploads directory.
    pub fn media(&self) -> &MediaStore {
        &self.media
    }

    /// Background archive queue.
    pub fn archive(&self) -> &ArchiveQueue {
        &self.archive
    }

    /// Admin password gate.
    pub fn admin(&self) -> &AdminGate {
        &self.admin
    }

    /// Signature verifier, present when a channel secret is configured.
    pub fn webhook_verifier(&self) -> Option<&WebhookVerifier> {
        self.webhook_verifier.as_ref()
    }

    /// Serialize phase transitions so read-plan-write sequences never interleave.
    pub async fn lock_transitions(&self) -> MutexGuard<'_, ()> {
        self.transition_gate.lock().await
    }
}
