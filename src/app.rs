// app.rs
use anyhow::Result;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    Router,
};
use chrono::Utc;
use serde_json::json;
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, JSON_UTF8, TEXT_PLAIN};
use crate::payments::{display_value, fabricate_wallet, PaymentRequest, PaymentResponse};
use crate::routes::{Route, RouteTable};
use crate::static_files::{StaticResolver, StaticResource};
use crate::webhook::{PaymentStatus, WebhookError, WebhookVerifier};

/// Read-only after startup; shared across requests without locking.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Config,
    pub routes: RouteTable,
    pub resolver: StaticResolver,
    pub verifier: WebhookVerifier,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let resolver = StaticResolver::new(config.static_root.clone(), config.welcome_path());
        let verifier =
            WebhookVerifier::new(config.webhook_secret.clone(), config.signature_mode);

        Self {
            config,
            routes: RouteTable::default(),
            resolver,
            verifier,
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    let body_limit = state.config.max_body_bytes;

    Router::new()
        .fallback(dispatch)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(timeout))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: Config) -> Result<()> {
    if config.webhook_secret.is_insecure_default() {
        warn!(
            "WEBHOOK_SECRET is not set; using the built-in demo secret. \
             Anyone can forge webhooks. DO NOT use this in production!"
        );
    }
    if config.signature_mode != crate::config::SignatureMode::Raw {
        warn!(
            mode = ?config.signature_mode,
            "Webhook signatures cover a re-serialized payload; senders using a \
             different JSON encoder may fail verification"
        );
    }

    let bind_address = config.bind_address();
    let state = Arc::new(AppState::new(config));
    info!(
        root = %state.resolver.root().display(),
        "Serving static files"
    );

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Server starting on {}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn dispatch(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path();

    let result = match state.routes.resolve(&method, path) {
        Route::Welcome => state
            .resolver
            .welcome(path)
            .await
            .map(resource_response)
            .map_err(AppError::from),
        Route::Health => Ok(health_check().into_response()),
        Route::StaticFile => state
            .resolver
            .resolve(path)
            .await
            .map(resource_response)
            .map_err(AppError::from),
        Route::CreatePayment => create_payment(&body),
        Route::PaymentWebhook => handle_webhook(&state.verifier, &headers, &body),
        Route::NotFound => Err(AppError::NotFound),
    };

    result.into_response()
}

fn resource_response(resource: StaticResource) -> Response {
    (
        [(header::CONTENT_TYPE, resource.content_type)],
        resource.content,
    )
        .into_response()
}

fn create_payment(body: &[u8]) -> AppResult<Response> {
    let value = if body.is_empty() {
        json!({})
    } else {
        serde_json::from_slice(body).map_err(|e| {
            warn!("Rejected payment request: {}", e);
            AppError::InvalidPaymentRequest
        })?
    };

    let request = PaymentRequest::from_value(&value);
    let wallet = fabricate_wallet();
    info!(
        "Payment created: {} {}",
        display_value(&request.amount),
        display_value(&request.coin)
    );

    Ok((
        [(header::CONTENT_TYPE, JSON_UTF8)],
        Json(PaymentResponse { wallet }),
    )
        .into_response())
}

fn handle_webhook(
    verifier: &WebhookVerifier,
    headers: &HeaderMap,
    body: &[u8],
) -> AppResult<Response> {
    let verified = verifier.verify_request(headers, body).map_err(|e| {
        match &e {
            WebhookError::InvalidPayload(cause) => {
                warn!("Rejected webhook with invalid JSON: {}", cause)
            }
            WebhookError::SignatureMismatch => warn!("Invalid webhook signature"),
        }
        AppError::from(e)
    })?;

    match verified.status() {
        PaymentStatus::Confirmed { amount, coin } => info!(
            "Payment confirmed: {} {}",
            display_value(&amount),
            display_value(&coin)
        ),
        PaymentStatus::PendingOrFailed => {
            warn!(payload = %verified.payload, "Payment pending or failed")
        }
    }

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, TEXT_PLAIN)], "OK").into_response())
}

fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now()
    }))
}
