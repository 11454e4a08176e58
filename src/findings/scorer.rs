//! Section Builder & Scorer (§4.7): turns a flat finding list into a scored,
//! status-labeled [`Section`], plus worst-page ranking and the numeric
//! appendix.

use crate::domain::{Appendix, CrawlResult, Finding, PageRecord, Section, Severity, WorstPage};

const FALLBACK_ACTION: &str = "Manter monitoramento recorrente e validar regressao semanal.";

fn sort_and_truncate(mut findings: Vec<Finding>) -> Vec<Finding> {
    findings.sort_by(|a, b| b.severity.order().cmp(&a.severity.order()).then_with(|| a.title.cmp(b.title)));
    findings.truncate(10);
    findings
}

fn score_and_status(findings: &[Finding]) -> (i32, &'static str) {
    let mut score = 100i32;
    let mut has_critical = false;
    for finding in findings {
        score -= finding.severity.penalty();
        if finding.severity == Severity::Critical {
            has_critical = true;
        }
    }
    score = score.clamp(0, 100);
    let status = if has_critical || score < 60 {
        "critical"
    } else if score < 85 {
        "attention"
    } else {
        "ok"
    };
    (score, status)
}

fn next_actions(findings: &[Finding]) -> Vec<String> {
    let mut actions = Vec::new();
    for finding in findings {
        let action = finding.how_to_fix.trim();
        if !action.is_empty() && !actions.iter().any(|a: &String| a == action) {
            actions.push(action.to_string());
        }
        if actions.len() == 5 {
            break;
        }
    }
    if actions.is_empty() {
        actions.push(FALLBACK_ACTION.to_string());
    }
    actions
}

pub fn build_section(findings: Vec<Finding>, summary: String, measured: Vec<&'static str>) -> Section {
    let findings = sort_and_truncate(findings);
    let (score, status) = score_and_status(&findings);
    let next_actions = next_actions(&findings);
    Section { score, status, summary, findings, next_actions, measured }
}

/// Builds the overall section from the union of the six category sections'
/// retained findings, then (when at least one HTML page was scanned)
/// replaces the penalty-based score with the truncated mean of the six
/// category scores and recomputes status from that override.
pub fn build_overall(categories: &[&Section], summary: String, pages_scanned_html: u32) -> Section {
    let union: Vec<Finding> = categories.iter().flat_map(|s| s.findings.clone()).collect();
    let findings = sort_and_truncate(union);
    let (mut score, mut status) = score_and_status(&findings);
    if pages_scanned_html > 0 {
        let sum: i32 = categories.iter().map(|s| s.score).sum();
        score = sum / categories.len() as i32;
        status = if findings.iter().any(|f| f.severity == Severity::Critical) || score < 60 {
            "critical"
        } else if score < 85 {
            "attention"
        } else {
            "ok"
        };
    }
    let next_actions = next_actions(&findings);
    let measured = vec!["crawl coverage", "severity roll-up", "status via category-score mean"];
    Section { score, status, summary, findings, next_actions, measured }
}

fn page_issue_flags(page: &PageRecord, origin: &str) -> (u32, u32, u32, u32, u32, u32) {
    use crate::url_norm::same_origin;

    let seo = (page.title.trim().is_empty()
        || page.title.chars().count() < 15
        || page.title.chars().count() > 60
        || page.meta_description.trim().is_empty()
        || page.canonical.trim().is_empty()
        || page.h1_count != 1) as u32;
    let a11y = (page.images_missing_alt > 0 || page.inputs_missing_label > 0 || page.lang.trim().is_empty()) as u32;
    let content = (page.word_count < 120 || page.h1_count == 0) as u32;
    let performance = (page.ttfb_ms > 1200
        || page.html_size_bytes > 512_000
        || page.resource_count > 80
        || page.render_blocking_count > 5) as u32;
    let indexacao = (page.robots_meta.to_lowercase().contains("noindex")
        || (!page.canonical.trim().is_empty() && !same_origin(&page.canonical, origin))) as u32;
    let critical = (page.status >= 400
        || page.status == 0
        || page.redirect_hops >= 3
        || page.mixed_content_count > 0) as u32;
    (seo, a11y, content, performance, indexacao, critical)
}

pub fn worst_pages(pages: &[PageRecord], origin: &str) -> Vec<WorstPage> {
    let mut ranked: Vec<WorstPage> = pages
        .iter()
        .map(|page| {
            let (seo, a11y, content, performance, indexacao, critical) = page_issue_flags(page, origin);
            WorstPage {
                url: page.url.clone(),
                status: page.status,
                total_issues: seo + a11y + content + performance + indexacao + critical,
                seo_issues: seo,
                a11y_issues: a11y,
                content_issues: content,
                performance_issues: performance,
                indexacao_issues: indexacao,
                critical_issues: critical,
            }
        })
        .filter(|w| w.total_issues > 0)
        .collect();
    ranked.sort_by(|a, b| b.total_issues.cmp(&a.total_issues));
    ranked.truncate(20);
    ranked
}

pub fn build_appendix(crawl: &CrawlResult, profile_include_limit_findings: bool) -> Appendix {
    let pages = &crawl.pages;
    let http_4xx_5xx = pages.iter().filter(|p| p.status >= 400 || p.status == 0).count() as u32;
    let noindex = pages.iter().filter(|p| p.robots_meta.to_lowercase().contains("noindex")).count() as u32;
    let missing_meta = pages.iter().filter(|p| p.meta_description.trim().is_empty()).count() as u32;
    let missing_title = pages.iter().filter(|p| p.title.trim().is_empty()).count() as u32;
    let missing_lang = pages.iter().filter(|p| p.lang.trim().is_empty()).count() as u32;
    let images_missing_alt_total: u32 = pages.iter().map(|p| p.images_missing_alt).sum();
    let inputs_missing_label_total: u32 = pages.iter().map(|p| p.inputs_missing_label).sum();
    let mixed_content_pages = pages.iter().filter(|p| p.mixed_content_count > 0).count() as u32;
    let redirect_chain_pages = pages.iter().filter(|p| p.redirect_hops >= 3).count() as u32;

    Appendix {
        pages_scanned_html: pages.len() as u32,
        broken_internal_links_count: crawl.broken_internal_links.len() as u32,
        http_4xx_5xx_pages_count: http_4xx_5xx,
        noindex_pages_count: noindex,
        missing_meta_description_count: missing_meta,
        missing_title_count: missing_title,
        missing_lang_count: missing_lang,
        images_missing_alt_total,
        inputs_missing_label_total,
        mixed_content_pages_count: mixed_content_pages,
        redirect_chain_pages_count: redirect_chain_pages,
        robots_present: crawl.robots.robots_present,
        sitemap_present: crawl.robots.sitemap_present,
        links_checked_internal: crawl.links_checked,
        partial_crawl: profile_include_limit_findings && !crawl.limit_notes.is_empty(),
    }
}
