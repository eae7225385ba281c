// payments.rs
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use uuid::Uuid;

pub const WALLET_PREFIX: &str = "0xDEMO";
const WALLET_HEX_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub amount: Value,
    pub coin: Value,
}

impl PaymentRequest {
    /// Absent fields, or a body that is not an object, fall back to
    /// `amount = "0"` and `coin = "USDT"`. An explicit `null` is kept.
    pub fn from_value(body: &Value) -> Self {
        let field = |name: &str, default: &str| {
            body.get(name)
                .cloned()
                .unwrap_or_else(|| Value::String(default.to_string()))
        };

        Self {
            amount: field("amount", "0"),
            coin: field("coin", "USDT"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentResponse {
    pub wallet: String,
}

/// Placeholder deposit address. Not a real wallet: nothing backs it.
pub fn fabricate_wallet() -> String {
    let digest = Sha256::digest(Uuid::new_v4().as_bytes());
    let hex = hex::encode(digest);
    format!("{}{}", WALLET_PREFIX, &hex[..WALLET_HEX_LEN])
}

/// Strings print bare, everything else as JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_when_fields_missing() {
        let req = PaymentRequest::from_value(&json!({}));
        assert_eq!(req.amount, json!("0"));
        assert_eq!(req.coin, json!("USDT"));

        let req = PaymentRequest::from_value(&json!([1, 2]));
        assert_eq!(req.coin, json!("USDT"));
    }

    #[test]
    fn keeps_supplied_fields() {
        let req = PaymentRequest::from_value(&json!({"amount": 12.5, "coin": "BTC"}));
        assert_eq!(display_value(&req.amount), "12.5");
        assert_eq!(display_value(&req.coin), "BTC");
    }

    #[test]
    fn wallet_shape() {
        let wallet = fabricate_wallet();
        assert!(wallet.starts_with(WALLET_PREFIX));
        let suffix = &wallet[WALLET_PREFIX.len()..];
        assert_eq!(suffix.len(), WALLET_HEX_LEN);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn wallets_differ_between_calls() {
        assert_ne!(fabricate_wallet(), fabricate_wallet());
    }
}
