//! Configuration for the wallet terminal

pub mod rpc;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub use rpc::RpcConfig;

/// Language model API key environment variable name
pub const MODEL_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Default key file, relative to the working directory
pub const DEFAULT_KEY_FILE: &str = "zero_wallet_groq.json";

/// Transaction construction and confirmation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletSettings {
    /// Gas limit for every transfer
    pub gas_limit: u64,
    /// How long `send` waits for a receipt before giving up
    pub receipt_timeout_secs: u64,
    /// Delay between receipt polls
    pub receipt_poll_interval_ms: u64,
}

impl WalletSettings {
    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout_secs)
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }
}

impl Default for WalletSettings {
    fn default() -> Self {
        Self {
            gas_limit: 100_000,
            receipt_timeout_secs: 120,
            receipt_poll_interval_ms: 1_000,
        }
    }
}

/// Hosted language model settings (OpenAI-compatible API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// API base URL
    pub api_base: String,
    /// Model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.3,
            api_key_env: MODEL_API_KEY_ENV.to_string(),
        }
    }
}

/// Interactive session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Balance the session PnL is measured against
    pub pnl_baseline: f64,
    /// Strategy text used when none is given
    pub default_strategy: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            pnl_baseline: 10.0,
            default_strategy: "High-frequency arbitrage. Risk tolerance: Moderate.".to_string(),
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path of the key file
    pub key_file: PathBuf,
    /// RPC URL override; falls back to the environment when unset
    #[serde(default)]
    pub rpc_url: Option<String>,
    /// Faucet method name on the RPC endpoint
    pub faucet_method: String,
    /// Transaction settings
    #[serde(default)]
    pub wallet: WalletSettings,
    /// Language model settings
    #[serde(default)]
    pub model: ModelSettings,
    /// Session settings
    #[serde(default)]
    pub session: SessionSettings,
    /// Automated loop interval (milliseconds)
    pub check_interval_ms: u64,
}

impl Config {
    /// Resolve the RPC endpoint, preferring the explicit override
    pub fn rpc_config(&self) -> RpcConfig {
        let base = match &self.rpc_url {
            Some(url) => RpcConfig::with_url(url.clone()),
            None => RpcConfig::from_env(),
        };
        base.with_faucet_method(self.faucet_method.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key_file: PathBuf::from(DEFAULT_KEY_FILE),
            rpc_url: None,
            faucet_method: rpc::DEFAULT_FAUCET_METHOD.to_string(),
            wallet: WalletSettings::default(),
            model: ModelSettings::default(),
            session: SessionSettings::default(),
            check_interval_ms: 60_000, // 1 minute
        }
    }
}
