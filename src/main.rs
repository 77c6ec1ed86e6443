//! Wedding game backend entrypoint wiring the chat webhook, REST, SSE and SQLite layers.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wedding_game_back::{
    archive::{Archiver, DirectoryArchiver, DisabledArchiver, HttpArchiveConfig, HttpArchiver},
    chat::{
        ChatMessenger, LoggingMessenger,
        line::{LineConfig, LineMessenger},
    },
    config::{AppConfig, ArchiveSettings, LineSettings},
    dao::{
        media::MediaStore,
        party_store::sqlite::{SqliteConfig, SqlitePartyStore},
    },
    routes,
    state::{AppState, SharedState, StateParts},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();

    let store = SqlitePartyStore::connect(SqliteConfig::new(config.database_url.clone()))
        .await
        .context("opening SQLite database")?;

    let media = MediaStore::new(config.upload_dir.clone());
    media
        .ensure_dir()
        .await
        .with_context(|| format!("creating uploads directory {}", config.upload_dir.display()))?;

    let app_state = AppState::new(StateParts {
        store: Arc::new(store),
        messenger: build_messenger(&config.line)?,
        archiver: build_archiver(&config.archive)?,
        media,
        admin_password: config.admin_password.clone(),
        channel_secret: config.line.channel_secret.clone(),
        broadcaster: None,
    });
    if app_state.webhook_verifier().is_none() {
        warn!("LINE channel secret not configured; webhook signatures are not checked");
    }

    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

fn build_messenger(settings: &LineSettings) -> anyhow::Result<Arc<dyn ChatMessenger>> {
    let Some(token) = settings.channel_access_token.clone() else {
        warn!("LINE access token not configured; replies will only be logged");
        return Ok(Arc::new(LoggingMessenger));
    };

    let mut line = LineConfig::new(token);
    if let Some(base_url) = settings.api_base_url.clone() {
        line = line.with_base_url(base_url);
    }
    let messenger = LineMessenger::new(line).context("building LINE client")?;
    Ok(Arc::new(messenger))
}

fn build_archiver(settings: &ArchiveSettings) -> anyhow::Result<Arc<dyn Archiver>> {
    if let Some(url) = settings.url.clone() {
        let mut remote = HttpArchiveConfig::new(url);
        if let Some(token) = settings.token.clone() {
            remote = remote.with_token(token);
        }
        info!(url = %remote.base_url, "archiving photos to remote storage");
        let archiver = HttpArchiver::new(remote).context("building archive client")?;
        return Ok(Arc::new(archiver));
    }

    if let Some(dir) = settings.dir.clone() {
        info!(dir = %dir.display(), "archiving photos to directory");
        return Ok(Arc::new(DirectoryArchiver::new(dir)));
    }

    info!("photo archival disabled");
    Ok(Arc::new(DisabledArchiver))
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = term.recv() => {},
                }
            }
            Err(err) => {
                warn!(error = %err, "failed to install SIGTERM handler; waiting for Ctrl+C");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
