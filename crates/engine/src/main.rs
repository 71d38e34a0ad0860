//! JoJo TTRPG Engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jojo_domain::CreationRules;
use jojo_engine::api::{self, websocket::WsState, ConnectionManager};
use jojo_engine::app::{App, Repositories, Services};
use jojo_engine::infrastructure::{
    auth::{InMemorySessionStore, Sha256PasswordHasher},
    clock::{SystemClock, SystemRandom},
    config::AppConfig,
    ports::ClockPort,
    sqlite::{self, SqliteCharacterRepo, SqliteUserRepo},
};

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(600);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine may be started from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jojo_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting JoJo TTRPG Engine");

    let config = AppConfig::from_env();

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());

    tracing::info!("Opening database at {}", config.database_url);
    let pool = sqlite::connect(&config.database_url).await?;

    let repositories = Repositories {
        user: Arc::new(SqliteUserRepo::new(pool.clone())),
        character: Arc::new(SqliteCharacterRepo::new(pool)),
    };

    let sessions = Arc::new(InMemorySessionStore::new(config.session_ttl, clock.clone()));
    let services = Services {
        passwords: Arc::new(Sha256PasswordHasher::default()),
        sessions: sessions.clone(),
        clock,
        random: Arc::new(SystemRandom::new()),
    };

    tracing::info!(
        policy = ?config.special_armor_policy,
        session_ttl_hours = config.session_ttl.num_hours(),
        "Character rules configured"
    );
    let app = Arc::new(App::new(
        repositories,
        services,
        CreationRules::default(),
        config.special_armor_policy,
    ));

    // Expired sessions are rejected on use; this only reclaims memory.
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(SESSION_PURGE_INTERVAL).await;
            let purged = sessions.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "Purged expired sessions");
            }
        }
    });

    let ws_state = Arc::new(WsState {
        app: app.clone(),
        connections: Arc::new(ConnectionManager::new()),
    });

    // Build router with separate states for HTTP and WebSocket
    let mut router = api::http::routes()
        .with_state(app)
        .route("/ws", get(api::websocket::ws_handler).with_state(ws_state))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer(config.cors_allowed_origins.as_deref()) {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer(allowed_origins: Option<&str>) -> Option<CorsLayer> {
    let allowed_origins = allowed_origins?;

    let mut cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        // Bearer tokens and JSON bodies both trigger preflights.
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
