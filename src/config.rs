//! Process-wide configuration (§3, §6), read once at startup from
//! environment variables rather than scattered `env::var` calls.

use std::net::SocketAddr;

use crate::error::{AppError, Result};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_token: String,
    pub llm_api_key: Option<String>,
    pub llm_model: Option<String>,
    pub bind_addr: SocketAddr,
}

impl Config {
    /// Reads `API_TOKEN` (required), `LLM_API_KEY`/`LLM_MODEL` (optional,
    /// enable the narrator), and `BIND_ADDR` (defaults to
    /// `0.0.0.0:8080`). Missing `API_TOKEN` is deferred to request time per
    /// §6's token-check ordering, not raised here - a server with no token
    /// configured should still boot and log its address.
    pub fn from_env() -> Result<Self> {
        let api_token = std::env::var("API_TOKEN").unwrap_or_default();
        let llm_api_key = std::env::var("LLM_API_KEY").ok().filter(|v| !v.is_empty());
        let llm_model = std::env::var("LLM_MODEL").ok().filter(|v| !v.is_empty());
        let bind_addr_raw = std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr_raw
            .parse()
            .map_err(|e| AppError::ServerMisconfigured(format!("invalid BIND_ADDR {bind_addr_raw:?}: {e}")))?;

        Ok(Self { api_token, llm_api_key, llm_model, bind_addr })
    }
}
