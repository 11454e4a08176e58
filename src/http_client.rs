//! Factory for the single HTTP client shared by one audit run.
//!
//! One client is built per audit (see [`crate::orchestrator`]); connection
//! pooling and redirect handling are the client's responsibility, not ours.

use anyhow::{Context, Result};
use rquest::Client;
use std::time::Duration;

pub const USER_AGENT: &str = "SimpleSiteAuditBot/1.0";

/// Builds the client used for crawling, robots/sitemap probing, and internal
/// link verification. `timeout` is the per-page budget for the active
/// profile. Redirects are handled manually by [`crate::crawler::fetch`] so
/// that `redirect_hops` can be counted exactly, so automatic redirect
/// following is disabled here.
pub fn create_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .redirect(rquest::redirect::Policy::none())
        .build()
        .context("failed to build rquest client")
}
