use serde::Serialize;

use super::{Finding, PageRecord};

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub score: i32,
    pub status: &'static str,
    pub summary: String,
    pub findings: Vec<Finding>,
    pub next_actions: Vec<String>,
    pub measured: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RobotsInfo {
    pub robots_url: String,
    pub robots_present: bool,
    pub robots_status: Option<u16>,
    pub sitemap_url: String,
    pub sitemap_present: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BrokenLink {
    pub url: String,
    pub status: u16,
}

#[derive(Debug, Clone, Serialize)]
pub struct FetchError {
    pub url: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    pub url: String,
    pub generated_at: String,
    pub pages: Vec<PageRecord>,
    pub broken_internal_links: Vec<BrokenLink>,
    pub links_checked: u32,
    pub all_internal_links_count: u32,
    pub skipped_by_robots: u32,
    pub non_html_urls: u32,
    pub fetch_errors: Vec<FetchError>,
    pub robots: RobotsInfo,
    pub limit_notes: Vec<String>,
    pub runtime_seconds: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorstPage {
    pub url: String,
    pub status: u16,
    pub total_issues: u32,
    pub seo_issues: u32,
    pub a11y_issues: u32,
    pub content_issues: u32,
    pub performance_issues: u32,
    pub indexacao_issues: u32,
    pub critical_issues: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Appendix {
    pub pages_scanned_html: u32,
    pub broken_internal_links_count: u32,
    pub http_4xx_5xx_pages_count: u32,
    pub noindex_pages_count: u32,
    pub missing_meta_description_count: u32,
    pub missing_title_count: u32,
    pub missing_lang_count: u32,
    pub images_missing_alt_total: u32,
    pub inputs_missing_label_total: u32,
    pub mixed_content_pages_count: u32,
    pub redirect_chain_pages_count: u32,
    pub robots_present: bool,
    pub sitemap_present: bool,
    pub links_checked_internal: u32,
    pub partial_crawl: bool,
}
