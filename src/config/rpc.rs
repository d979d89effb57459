//! RPC endpoint configuration
//!
//! The terminal talks to a single JSON-RPC endpoint. Resolution order:
//! 1. `TENDERLY_RPC_URL` - a Tenderly virtual testnet (supports the faucet method)
//! 2. `ETH_RPC_URL` - any other endpoint; the faucet call may be rejected
//! 3. Public Sepolia RPC - for testing only
//!
//! # Examples
//!
//! ```bash
//! export TENDERLY_RPC_URL="https://virtual.sepolia.rpc.tenderly.co/YOUR_ID"
//! ```

/// Environment variable names
pub mod env_vars {
    pub const TENDERLY_RPC_URL: &str = "TENDERLY_RPC_URL";
    pub const ETH_RPC_URL: &str = "ETH_RPC_URL";
}

/// Public fallback endpoint (rate limited, no faucet)
pub const PUBLIC_SEPOLIA_RPC: &str = "https://rpc.sepolia.org";

/// Non-standard balance crediting method exposed by Tenderly virtual testnets
pub const DEFAULT_FAUCET_METHOD: &str = "tenderly_addBalance";

/// Resolved endpoint for the chain client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcConfig {
    url: String,
    faucet_method: String,
}

impl RpcConfig {
    /// Resolve the endpoint from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve the endpoint from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let url = if let Some(url) = lookup(env_vars::TENDERLY_RPC_URL) {
            tracing::debug!("Using TENDERLY_RPC_URL");
            url
        } else if let Some(url) = lookup(env_vars::ETH_RPC_URL) {
            tracing::info!("Using ETH_RPC_URL; faucet credits may be unsupported");
            url
        } else {
            tracing::warn!("No RPC configured, using public Sepolia RPC (rate limited, no faucet)");
            PUBLIC_SEPOLIA_RPC.to_string()
        };

        Self {
            url,
            faucet_method: DEFAULT_FAUCET_METHOD.to_string(),
        }
    }

    /// Create with an explicit URL
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            faucet_method: DEFAULT_FAUCET_METHOD.to_string(),
        }
    }

    /// Override the faucet method name
    pub fn with_faucet_method(mut self, method: impl Into<String>) -> Self {
        self.faucet_method = method.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn faucet_method(&self) -> &str {
        &self.faucet_method
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
