// lib.rs
//! Static file server with an HMAC-verified payment webhook.
//!
//! - [`static_files`] resolves request paths under a root directory
//! - [`webhook`] verifies `X-Signature` (hex HMAC-SHA512) over the payload
//! - [`payments`] answers the demo `create-payment` call
//! - [`routes`] and [`app`] dispatch requests

pub mod app;
pub mod config;
pub mod error;
pub mod mime;
pub mod payments;
pub mod routes;
pub mod static_files;
pub mod telemetry;
pub mod webhook;

pub use app::{build_router, AppState};
pub use config::{Config, ServerSecret, SignatureMode};
pub use error::AppError;
pub use static_files::{ResolveError, StaticResolver, StaticResource};
pub use webhook::{PaymentStatus, VerifiedWebhook, WebhookError, WebhookVerifier};
