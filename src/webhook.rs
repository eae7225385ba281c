// webhook.rs
use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha512;
use std::borrow::Cow;
use subtle::ConstantTimeEq;

use crate::config::{ServerSecret, SignatureMode};

type HmacSha512 = Hmac<Sha512>;

pub const SIGNATURE_HEADER: &str = "X-Signature";

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("payload is not valid JSON: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    /// Covers both a missing header and a wrong value.
    #[error("signature mismatch")]
    SignatureMismatch,
}

/// Business status carried by an authenticated payment notification.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentStatus {
    Confirmed { amount: Value, coin: Value },
    PendingOrFailed,
}

#[derive(Debug, Clone)]
pub struct VerifiedWebhook {
    pub payload: Value,
}

impl VerifiedWebhook {
    /// Only the exact string `"success"` confirms a payment.
    pub fn status(&self) -> PaymentStatus {
        match self.payload.get("status").and_then(Value::as_str) {
            Some("success") => PaymentStatus::Confirmed {
                amount: self.payload.get("amount").cloned().unwrap_or(Value::Null),
                coin: self.payload.get("coin").cloned().unwrap_or(Value::Null),
            },
            _ => PaymentStatus::PendingOrFailed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WebhookVerifier {
    secret: ServerSecret,
    mode: SignatureMode,
}

impl WebhookVerifier {
    pub fn new(secret: ServerSecret, mode: SignatureMode) -> Self {
        Self { secret, mode }
    }

    pub fn mode(&self) -> SignatureMode {
        self.mode
    }

    /// Lowercase hex HMAC-SHA512 of `bytes` under the server secret.
    pub fn sign(&self, bytes: &[u8]) -> Option<String> {
        let mut mac = match HmacSha512::new_from_slice(self.secret.as_bytes()) {
            Ok(mac) => mac,
            Err(_) => return None,
        };

        mac.update(bytes);
        Some(hex::encode(mac.finalize().into_bytes()))
    }

    /// Bytes the signature covers for this payload under the configured mode.
    pub fn signed_bytes<'a>(&self, raw_body: &'a [u8], payload: &Value) -> Cow<'a, [u8]> {
        match self.mode {
            SignatureMode::Raw => Cow::Borrowed(raw_body),
            // Serializing a `Value` cannot fail.
            SignatureMode::Compact => Cow::Owned(serde_json::to_vec(payload).unwrap_or_default()),
        }
    }

    /// Parse the body, then check `signature` against the expected digest.
    ///
    /// Malformed JSON is rejected before any HMAC work happens.
    pub fn verify(
        &self,
        raw_body: &[u8],
        signature: Option<&str>,
    ) -> Result<VerifiedWebhook, WebhookError> {
        let payload = parse_payload(raw_body)?;

        let provided = match signature {
            Some(sig) if !sig.is_empty() => sig,
            _ => return Err(WebhookError::SignatureMismatch),
        };
        let expected = self
            .sign(&self.signed_bytes(raw_body, &payload))
            .ok_or(WebhookError::SignatureMismatch)?;

        if !signatures_match(&expected, provided) {
            return Err(WebhookError::SignatureMismatch);
        }

        Ok(VerifiedWebhook { payload })
    }

    /// Same as [`verify`](Self::verify), reading the signature from headers.
    /// A non-UTF-8 header value counts as missing.
    pub fn verify_request(
        &self,
        headers: &HeaderMap,
        raw_body: &[u8],
    ) -> Result<VerifiedWebhook, WebhookError> {
        let signature = headers
            .get(SIGNATURE_HEADER)
            .and_then(|value| value.to_str().ok());
        self.verify(raw_body, signature)
    }
}

/// Byte-exact comparison via `subtle`. Running time does not depend on
/// where the two strings first differ, only on the (public) expected length.
pub fn signatures_match(expected: &str, provided: &str) -> bool {
    expected.as_bytes().ct_eq(provided.as_bytes()).into()
}

/// An empty body stands for the empty object.
pub fn parse_payload(raw_body: &[u8]) -> Result<Value, WebhookError> {
    if raw_body.is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_slice(raw_body).map_err(WebhookError::InvalidPayload)
}
