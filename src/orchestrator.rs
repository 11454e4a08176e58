//! Audit Orchestrator & Cache (§4.9): two execution profiles sharing one
//! process-wide TTL cache keyed by `(profile, normalized url)`, plus a
//! narrower cache for executive summaries.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use rquest::Client;
use tracing::info;

use crate::config::Config;
use crate::crawler::{self, Budgets, Profile};
use crate::domain::CrawlResult;
use crate::error::{AppError, Result};
use crate::findings::{self, Report};
use crate::http_client;
use crate::narrator;
use crate::translator;
use crate::validate::validate_url;

const AUDIT_CACHE_TTL: Duration = Duration::from_secs(900);
const SUMMARY_CACHE_TTL: Duration = Duration::from_secs(600);

#[derive(Clone)]
struct CachedAudit {
    crawl: Arc<CrawlResult>,
    report: Arc<Report>,
}

pub struct Orchestrator {
    config: Config,
    audit_cache: Cache<String, CachedAudit>,
    summary_cache: Cache<String, Arc<HashMap<String, String>>>,
}

impl Orchestrator {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            audit_cache: Cache::builder().time_to_live(AUDIT_CACHE_TTL).build(),
            summary_cache: Cache::builder().time_to_live(SUMMARY_CACHE_TTL).build(),
        }
    }

    pub fn api_token(&self) -> &str {
        &self.config.api_token
    }

    async fn run_crawl(&self, client: &Client, url: &str, profile: Profile) -> (Arc<CrawlResult>, Arc<Report>) {
        let budgets = Budgets::for_profile(profile);
        let crawl = crawler::crawl(client, url, budgets).await;
        let report = findings::build_report(&crawl, &budgets, profile);
        (Arc::new(crawl), Arc::new(report))
    }

    /// `POST /report`: validate, reuse a fresh full-profile cache entry when
    /// present, otherwise crawl with full budgets and cache the result.
    pub async fn run_report(&self, raw_url: &str) -> Result<serde_json::Value> {
        let url = validate_url(raw_url)?;
        let cache_key = format!("full|{url}");

        let (crawl, report, origem_dados) = match self.audit_cache.get(&cache_key).await {
            Some(cached) => {
                info!("audit cache hit for {}", url);
                (cached.crawl, cached.report, "cache")
            }
            None => {
                let client = http_client::create_client(Budgets::for_profile(Profile::Full).per_page_timeout)
                    .map_err(AppError::Other)?;
                let (crawl, report) = self.run_crawl(&client, &url, Profile::Full).await;
                self.audit_cache
                    .insert(cache_key, CachedAudit { crawl: crawl.clone(), report: report.clone() })
                    .await;
                (crawl, report, "processamento_novo")
            }
        };

        Ok(translator::report_json(&crawl.url, &crawl.generated_at, origem_dados, &report))
    }

    /// `POST /analyze_summary`: validate, reuse a fresh summary cache entry,
    /// else reuse a fresh full-profile audit's sections, else run a
    /// `summary`-profile crawl; then narrate. A narrator failure is not
    /// cached and propagates as [`AppError::LlmUnavailable`].
    pub async fn run_summary(&self, raw_url: &str) -> Result<HashMap<String, String>> {
        let url = validate_url(raw_url)?;

        if let Some(cached) = self.summary_cache.get(&url).await {
            info!("summary cache hit for {}", url);
            return Ok((*cached).clone());
        }

        let full_key = format!("full|{url}");
        let report = match self.audit_cache.get(&full_key).await {
            Some(cached) => cached.report,
            None => {
                let client = http_client::create_client(Budgets::for_profile(Profile::Summary).per_page_timeout)
                    .map_err(AppError::Other)?;
                let (_, report) = self.run_crawl(&client, &url, Profile::Summary).await;
                report
            }
        };

        let sections = [
            ("overall", &report.overall),
            ("seo", &report.seo),
            ("a11y", &report.a11y),
            ("content", &report.content),
            ("performance", &report.performance),
            ("indexacao", &report.indexacao),
            ("erros_criticos", &report.erros_criticos),
        ]
        .into_iter()
        .collect::<HashMap<_, _>>();

        let narrator_client = http_client::create_client(Duration::from_secs(30)).map_err(AppError::Other)?;
        let sentences = narrator::narrate(
            &narrator_client,
            self.config.llm_api_key.as_deref(),
            self.config.llm_model.as_deref(),
            &sections,
        )
        .await?;

        self.summary_cache.insert(url.clone(), Arc::new(sentences.clone())).await;
        Ok(sentences)
    }
}
