use serde::Serialize;

/// One crawled URL and everything the extractor could read off of it.
///
/// Non-HTML pages carry only the transport fields - every HTML-derived field
/// stays at its zero value rather than being `Option`-wrapped, matching the
/// reference engine's "always-present dict with empty defaults" shape.
#[derive(Debug, Clone, Serialize)]
pub struct PageRecord {
    pub url: String,
    pub final_url: String,
    pub depth: u32,

    pub status: u16,
    pub content_type: String,
    pub is_html: bool,
    pub redirect_hops: u32,
    pub html_size_bytes: u64,
    pub ttfb_ms: u64,

    pub title: String,
    pub meta_description: String,
    pub canonical: String,
    pub robots_meta: String,

    pub h1_count: u32,
    pub lang: String,
    pub word_count: u32,
    pub internal_links: Vec<String>,

    pub images_total: u32,
    pub images_missing_alt: u32,
    pub inputs_total: u32,
    pub inputs_missing_label: u32,

    pub resource_count: u32,
    pub render_blocking_count: u32,
    pub mixed_content_count: u32,

    pub error: Option<String>,
}

impl PageRecord {
    /// A page that could not be fetched at all: transport failure (`status`
    /// 0), every HTML field empty/zero, `error` set.
    pub fn transport_failure(url: String, depth: u32, error: String) -> Self {
        Self {
            url: url.clone(),
            final_url: url,
            depth,
            status: 0,
            content_type: String::new(),
            is_html: false,
            redirect_hops: 0,
            html_size_bytes: 0,
            ttfb_ms: 0,
            title: String::new(),
            meta_description: String::new(),
            canonical: String::new(),
            robots_meta: String::new(),
            h1_count: 0,
            lang: String::new(),
            word_count: 0,
            internal_links: Vec::new(),
            images_total: 0,
            images_missing_alt: 0,
            inputs_total: 0,
            inputs_missing_label: 0,
            resource_count: 0,
            render_blocking_count: 0,
            mixed_content_count: 0,
            error: Some(error),
        }
    }
}
