//! ClaimIQ gateway authorizer service.
//!
//! Serves the authorization decision endpoint the gateway calls in front
//! of every protected API route.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use claimiq_audit::{AuditEvent, AuditLogger, AuditSink, AuditSinkError};
use claimiq_authorizer::{Authorizer, AuthorizerConfig, AuthorizerRequest, AuthorizerResponse};

/// Audit sink that emits events to the structured log stream.
///
/// The durable append-only store is deployment-specific; this binary
/// ships the log-stream sink, and deployments with a durable store swap
/// in their own [`AuditSink`].
struct LogAuditSink;

#[async_trait::async_trait]
impl AuditSink for LogAuditSink {
    async fn append(&self, event: AuditEvent) -> Result<(), AuditSinkError> {
        let record =
            serde_json::to_string(&event).map_err(|e| AuditSinkError(e.to_string()))?;
        tracing::info!(target: "audit", %record, "audit event");
        Ok(())
    }
}

#[derive(Clone)]
struct AppState {
    authorizer: Arc<Authorizer>,
}

#[tokio::main]
async fn main() {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,claimiq_authorizer=debug")),
        )
        .init();

    // Load configuration (fail-fast on missing required values)
    let config = AuthorizerConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        std::process::exit(1);
    });

    let listen_addr =
        std::env::var("AUTHORIZER_LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    tracing::info!(
        issuer = %config.issuer_url(),
        jwks_url = %config.jwks_url(),
        client_id = %config.client_id,
        "starting authorizer"
    );

    let audit = AuditLogger::new(Arc::new(LogAuditSink));
    let authorizer = Authorizer::from_config(&config, audit).unwrap_or_else(|e| {
        eprintln!("Authorizer initialization error: {e}");
        std::process::exit(1);
    });

    let state = AppState {
        authorizer: Arc::new(authorizer),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/authorize", post(authorize_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .with_state(state);

    tracing::info!(%listen_addr, "authorizer listening");

    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("Bind error on {listen_addr}: {e}");
            std::process::exit(1);
        });

    axum::serve(listener, app).await.unwrap_or_else(|e| {
        eprintln!("Server error: {e}");
        std::process::exit(1);
    });
}

async fn authorize_handler(
    State(state): State<AppState>,
    Json(request): Json<AuthorizerRequest>,
) -> Json<AuthorizerResponse> {
    Json(state.authorizer.authorize(&request).await)
}

async fn health_handler() -> &'static str {
    "ok"
}
