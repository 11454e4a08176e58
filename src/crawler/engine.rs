//! Crawler (§4.5): breadth-first frontier with dedup, bounded by four
//! budgets, followed by internal-link reachability verification.
//!
//! The frontier is a `VecDeque` popped from the front - true FIFO/BFS. This
//! is deliberate: the reference desktop build's discovery service (a `Vec`
//! popped from the back) is LIFO despite its own doc comment, which
//! contradicts the BFS-ordering guarantee the findings/scoring layer relies
//! on. This engine is grounded on the original Python crawler's
//! `collections.deque` instead.

use std::collections::{HashSet, VecDeque};
use std::time::Instant;

use chrono::{SubsecRound, Utc};
use rquest::Client;

use super::budgets::Budgets;
use super::fetch;
use super::robots::RobotsProbe;
use crate::domain::{BrokenLink, CrawlResult, FetchError, PageRecord};
use crate::extractor;
use crate::url_norm::normalize_str;

const MAX_RUNTIME_NOTE: &str = "MAX_RUNTIME_SECONDS reached during crawl.";
const MAX_PAGES_NOTE: &str = "MAX_PAGES reached.";
const MAX_LINK_CHECKS_NOTE: &str = "MAX_LINK_CHECKS reached while checking internal links.";
const MAX_RUNTIME_LINKS_NOTE: &str = "MAX_RUNTIME_SECONDS reached while checking internal links.";

fn push_note(notes: &mut Vec<String>, note: &str) {
    if !notes.iter().any(|n| n == note) {
        notes.push(note.to_string());
    }
}

pub async fn crawl(client: &Client, start_url: &str, budgets: Budgets) -> CrawlResult {
    let started = Instant::now();
    let origin = start_url.to_string();

    let robots = RobotsProbe::fetch(client, start_url).await;

    let mut queue: VecDeque<(String, u32)> = VecDeque::new();
    queue.push_back((start_url.to_string(), 0));
    let mut queued: HashSet<String> = HashSet::from([start_url.to_string()]);
    let mut visited: HashSet<String> = HashSet::new();
    let mut pages: Vec<PageRecord> = Vec::new();
    let mut status_cache: std::collections::HashMap<String, u16> = std::collections::HashMap::new();
    let mut all_internal_links: HashSet<String> = HashSet::new();
    let mut skipped_by_robots = 0u32;
    let mut non_html_urls = 0u32;
    let mut fetch_errors: Vec<FetchError> = Vec::new();
    let mut limit_notes: Vec<String> = Vec::new();

    while !queue.is_empty() {
        if started.elapsed() >= budgets.max_runtime {
            push_note(&mut limit_notes, MAX_RUNTIME_NOTE);
            break;
        }
        if pages.len() >= budgets.max_pages {
            push_note(&mut limit_notes, MAX_PAGES_NOTE);
            break;
        }

        let (current_url, depth) = queue.pop_front().unwrap();
        queued.remove(&current_url);
        if visited.contains(&current_url) {
            continue;
        }
        visited.insert(current_url.clone());
        if depth > budgets.max_depth {
            continue;
        }
        if !robots.allowed(&current_url) {
            skipped_by_robots += 1;
            continue;
        }

        let page = match fetch::get(client, &current_url).await {
            Ok(outcome) => {
                let normalized_url = normalize_str(&current_url);
                let normalized_final = normalize_str(&outcome.final_url);
                let is_html = outcome.content_type.contains("text/html");
                if is_html {
                    let extracted = extractor::extract(&outcome.body, &normalized_final, &origin);
                    PageRecord {
                        url: normalized_url,
                        final_url: normalized_final,
                        depth,
                        status: outcome.status,
                        content_type: outcome.content_type,
                        is_html: true,
                        redirect_hops: outcome.redirect_hops,
                        html_size_bytes: outcome.body.len() as u64,
                        ttfb_ms: outcome.ttfb_ms,
                        title: extracted.title,
                        meta_description: extracted.meta_description,
                        canonical: extracted.canonical,
                        robots_meta: extracted.robots_meta,
                        h1_count: extracted.h1_count,
                        lang: extracted.lang,
                        word_count: extracted.word_count,
                        internal_links: extracted.internal_links,
                        images_total: extracted.images_total,
                        images_missing_alt: extracted.images_missing_alt,
                        inputs_total: extracted.inputs_total,
                        inputs_missing_label: extracted.inputs_missing_label,
                        resource_count: extracted.resource_count,
                        render_blocking_count: extracted.render_blocking_count,
                        mixed_content_count: extracted.mixed_content_count,
                        error: None,
                    }
                } else {
                    PageRecord {
                        url: normalized_url,
                        final_url: normalized_final,
                        depth,
                        status: outcome.status,
                        content_type: outcome.content_type,
                        is_html: false,
                        redirect_hops: outcome.redirect_hops,
                        html_size_bytes: outcome.body.len() as u64,
                        ttfb_ms: outcome.ttfb_ms,
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
                        error: None,
                    }
                }
            }
            Err(error) => {
                fetch_errors.push(FetchError { url: current_url.clone(), error: error.clone() });
                PageRecord::transport_failure(normalize_str(&current_url), depth, error)
            }
        };

        status_cache.insert(page.url.clone(), page.status);
        status_cache.insert(page.final_url.clone(), page.status);

        if page.is_html {
            for link in &page.internal_links {
                all_internal_links.insert(link.clone());
                if depth < budgets.max_depth && !visited.contains(link) && !queued.contains(link) {
                    queued.insert(link.clone());
                    queue.push_back((link.clone(), depth + 1));
                }
            }
            pages.push(page);
        } else {
            non_html_urls += 1;
        }
    }

    let mut broken_internal_links: Vec<BrokenLink> = Vec::new();
    let mut links_checked = 0u32;
    if budgets.max_link_checks > 0 {
        let mut sorted_links: Vec<&String> = all_internal_links.iter().collect();
        sorted_links.sort();
        for link in sorted_links {
            if links_checked as usize >= budgets.max_link_checks {
                push_note(&mut limit_notes, MAX_LINK_CHECKS_NOTE);
                break;
            }
            if started.elapsed() >= budgets.max_runtime {
                push_note(&mut limit_notes, MAX_RUNTIME_LINKS_NOTE);
                break;
            }
            if !robots.allowed(link) {
                continue;
            }

            links_checked += 1;
            let status = match status_cache.get(link) {
                Some(status) => *status,
                None => {
                    let status = fetch::check_link(client, link).await;
                    status_cache.insert(link.clone(), status);
                    status
                }
            };

            if status >= 400 || status == 0 {
                broken_internal_links.push(BrokenLink { url: link.clone(), status });
            }
        }
    }

    CrawlResult {
        url: origin,
        generated_at: Utc::now().trunc_subsecs(0).to_rfc3339(),
        pages,
        broken_internal_links,
        links_checked,
        all_internal_links_count: all_internal_links.len() as u32,
        skipped_by_robots,
        non_html_urls,
        fetch_errors,
        robots: robots.info,
        limit_notes,
        runtime_seconds: (started.elapsed().as_millis() as f64 / 1000.0 * 100.0).round() / 100.0,
    }
}
