//! Application startup and lifecycle management.
//!
//! Builds the shared state and router, binds the listener and serves until a
//! shutdown signal arrives.

use crate::config::RelayConfig;
use crate::handlers;
use crate::services::providers::gemini::GeminiTextProvider;
use crate::services::TextProvider;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Request},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    request_id_middleware, security_headers_middleware, REQUEST_ID_HEADER,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

/// Browser origins of the local frontend dev servers.
pub const ALLOWED_ORIGINS: [&str; 3] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:5173",
];

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub text_provider: Arc<dyn TextProvider>,
    /// Resolved once from `config.persona`.
    pub persona_instruction: Arc<str>,
}

impl AppState {
    pub fn new(config: RelayConfig, text_provider: Arc<dyn TextProvider>) -> Self {
        let persona_instruction = Arc::from(config.persona.instruction());
        Self {
            config: Arc::new(config),
            text_provider,
            persona_instruction,
        }
    }
}

/// Fixed CORS policy: listed origins only, credentials allowed, any method and
/// header (mirrored, since credentials rule out wildcards).
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(ALLOWED_ORIGINS.map(HeaderValue::from_static))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

pub fn build_router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/chat", post(handlers::chat))
        .route("/chat/", post(handlers::chat));

    if state.config.features.image_description {
        app = app.merge(
            Router::new()
                .route("/describe-image", post(handlers::describe_image))
                .route("/describe-image/", post(handlers::describe_image))
                .layer(DefaultBodyLimit::disable()),
        );
    }

    app.with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(REQUEST_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .layer(cors_layer())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application against the Gemini endpoint in `config`.
    pub async fn build(config: RelayConfig) -> Result<Self, AppError> {
        config.validate()?;
        let text_provider: Arc<dyn TextProvider> =
            Arc::new(GeminiTextProvider::new(config.gemini.clone()));

        tracing::info!(
            endpoint = %config.gemini.endpoint_url,
            "Initialized Gemini text provider"
        );

        Self::build_with_provider(config, text_provider).await
    }

    /// Build the application with an explicit provider.
    pub async fn build_with_provider(
        config: RelayConfig,
        text_provider: Arc<dyn TextProvider>,
    ) -> Result<Self, AppError> {
        // Never bind without a usable key.
        config.validate()?;

        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!(
            persona = %config.persona,
            image_description = config.features.image_description,
            "Relay service listening on port {}",
            port
        );

        let router = build_router(AppState::new(config, text_provider));

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}
