// config.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{env, fmt, path::PathBuf};

/// Fallback HMAC key used when `WEBHOOK_SECRET` is unset or empty.
///
/// Anyone who reads this source can forge webhooks against a server running
/// with it. Never deploy with this value.
pub const INSECURE_DEFAULT_SECRET: &str = "MY_DEMO_SECRET";

pub const DEFAULT_PORT: u16 = 3000;

/// HMAC key for webhook verification. Immutable once loaded.
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ServerSecret(Vec<u8>);

impl ServerSecret {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_insecure_default(&self) -> bool {
        self.0 == INSECURE_DEFAULT_SECRET.as_bytes()
    }
}

impl Default for ServerSecret {
    fn default() -> Self {
        Self::new(INSECURE_DEFAULT_SECRET)
    }
}

impl From<String> for ServerSecret {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<ServerSecret> for String {
    fn from(value: ServerSecret) -> Self {
        String::from_utf8_lossy(&value.0).into_owned()
    }
}

impl fmt::Debug for ServerSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ServerSecret(<redacted>)")
    }
}

/// Which bytes the webhook HMAC is computed over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureMode {
    /// The body exactly as received.
    #[default]
    Raw,
    /// Compact re-serialization of the parsed body, keys in received order.
    /// Only for senders that sign a re-encoded payload; number formatting
    /// and string escaping can differ between JSON encoders.
    Compact,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub webhook_secret: ServerSecret,
    pub static_root: PathBuf,
    /// Served for `/` and `/index.html`. Relative paths resolve against
    /// `static_root`; an empty value disables the special case.
    pub welcome_file: String,
    pub signature_mode: SignatureMode,
    pub max_body_bytes: usize,
    pub request_timeout_secs: u64,
    pub log_json: bool,
}

impl Config {
    /// Load from defaults, an optional `config` file, `SERVER_*` variables,
    /// and finally `WEBHOOK_SECRET` / `PORT`.
    pub fn load() -> Result<Self> {
        Self::load_with(env::var("WEBHOOK_SECRET").ok(), env::var("PORT").ok())
    }

    pub fn load_with(webhook_secret: Option<String>, port: Option<String>) -> Result<Self> {
        let webhook_secret = webhook_secret.filter(|s| !s.is_empty());
        let port = port.filter(|p| !p.trim().is_empty());

        let settings = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("webhook_secret", INSECURE_DEFAULT_SECRET)?
            .set_default("static_root", ".")?
            .set_default("welcome_file", "index.html")?
            .set_default("signature_mode", "raw")?
            .set_default("max_body_bytes", 1_048_576)? // 1MB
            .set_default("request_timeout_secs", 30)?
            .set_default("log_json", false)?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_override_option("webhook_secret", webhook_secret)?
            .set_override_option("port", port)?
            .build()?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn welcome_path(&self) -> Option<PathBuf> {
        if self.welcome_file.trim().is_empty() {
            return None;
        }
        Some(self.static_root.join(&self.welcome_file))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            webhook_secret: ServerSecret::default(),
            static_root: PathBuf::from("."),
            welcome_file: "index.html".to_string(),
            signature_mode: SignatureMode::Raw,
            max_body_bytes: 1_048_576,
            request_timeout_secs: 30,
            log_json: false,
        }
    }
}
