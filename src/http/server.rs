//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (sessions, tracing, timeout)
//! - Bind server to listener, serve with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::config::AppConfig;
use crate::db::Database;
use crate::http::{contact, pages};
use crate::mail::Mailer;
use crate::observability::EventLog;
use crate::security::{CsrfGuard, RateLimiter};

const SESSION_COOKIE: &str = "latrung.sid";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Database,
    pub mailer: Mailer,
    pub events: EventLog,
    pub csrf: CsrfGuard,
    pub limiter: RateLimiter,
}

/// HTTP server for the site.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig, db: Database, events: EventLog) -> Self {
        let mailer = Mailer::new(
            config.mail.clone(),
            config.smtp.clone(),
            &config.site,
            events.clone(),
        );
        let csrf = CsrfGuard::new(&config.csrf);
        let limiter = RateLimiter::new(&config.rate_limit);

        let state = AppState {
            config: Arc::new(config),
            db,
            mailer,
            events,
            csrf,
            limiter,
        };

        let router = Self::build_router(state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let session = &state.config.session;
        let same_site = match session.same_site.as_str() {
            "Lax" => SameSite::Lax,
            "None" => SameSite::None,
            _ => SameSite::Strict,
        };
        let session_layer = SessionManagerLayer::new(MemoryStore::default())
            .with_name(SESSION_COOKIE)
            .with_secure(session.secure)
            .with_http_only(session.http_only)
            .with_same_site(same_site);

        let timeout = Duration::from_secs(state.config.server.request_timeout_secs);

        Router::new()
            .route("/", get(pages::home))
            .route("/about", get(pages::about))
            .route("/contact", get(contact::show).post(contact::submit))
            .fallback(pages::not_found)
            .with_state(state)
            .layer(session_layer)
            .layer(TimeoutLayer::new(timeout))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
