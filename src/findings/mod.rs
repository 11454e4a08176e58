//! Findings Engine + Section Builder & Scorer (§4.6, §4.7): evaluates the
//! fixed rule catalogue against a crawl, then assembles the six category
//! sections, the overall roll-up, worst pages, and the numeric appendix.

mod rules;
mod scorer;

use crate::crawler::{Budgets, Profile};
use crate::domain::{Appendix, CrawlResult, Finding, Section, WorstPage};

/// The assembled, scored report body - everything downstream of a finished
/// crawl. The HTTP/orchestrator layer adds `url`, timestamps and cache
/// provenance around this.
pub struct Report {
    pub overall: Section,
    pub seo: Section,
    pub a11y: Section,
    pub content: Section,
    pub performance: Section,
    pub indexacao: Section,
    pub erros_criticos: Section,
    pub worst_pages: Vec<WorstPage>,
    pub appendix: Appendix,
}

fn dedupe_push(notes: &mut Vec<Finding>, finding: Option<Finding>) {
    if let Some(f) = finding {
        notes.push(f);
    }
}

fn category_summary(n: usize, p: u32, non_zero_template: &str, empty_template: &str) -> String {
    if p == 0 {
        empty_template.to_string()
    } else {
        non_zero_template.replace("{n}", &n.to_string()).replace("{p}", &p.to_string())
    }
}

pub fn build_report(crawl: &CrawlResult, budgets: &Budgets, profile: Profile) -> Report {
    let pages = &crawl.pages;
    let origin = crawl.url.as_str();
    let pages_scanned_html = pages.len() as u32;

    let mut seo_findings = Vec::new();
    dedupe_push(&mut seo_findings, rules::seo_title_missing(pages));
    dedupe_push(&mut seo_findings, rules::seo_title_length(pages));
    dedupe_push(&mut seo_findings, rules::seo_meta_description_missing(pages));
    dedupe_push(&mut seo_findings, rules::seo_meta_description_length(pages));
    dedupe_push(&mut seo_findings, rules::seo_canonical_missing(pages));
    dedupe_push(&mut seo_findings, rules::seo_h1_count(pages));
    dedupe_push(&mut seo_findings, rules::seo_broken_internal_links(crawl));

    let mut a11y_findings = Vec::new();
    dedupe_push(&mut a11y_findings, rules::a11y_img_alt_missing(pages));
    dedupe_push(&mut a11y_findings, rules::a11y_input_label_missing(pages));
    dedupe_push(&mut a11y_findings, rules::a11y_lang_missing(pages));
    dedupe_push(&mut a11y_findings, rules::a11y_title_missing(pages));

    let mut content_findings = Vec::new();
    dedupe_push(&mut content_findings, rules::content_thin_pages(pages));
    dedupe_push(&mut content_findings, rules::content_missing_h1(pages));

    let mut performance_findings = Vec::new();
    dedupe_push(&mut performance_findings, rules::perf_slow_ttfb(pages));
    dedupe_push(&mut performance_findings, rules::perf_heavy_html(pages));
    dedupe_push(&mut performance_findings, rules::perf_many_requests(pages));
    dedupe_push(&mut performance_findings, rules::perf_render_blocking(pages));

    let mut indexacao_findings = Vec::new();
    dedupe_push(&mut indexacao_findings, rules::indexacao_robots_missing(crawl));
    dedupe_push(&mut indexacao_findings, rules::indexacao_sitemap_missing(crawl));
    dedupe_push(&mut indexacao_findings, rules::indexacao_noindex_pages(pages));
    dedupe_push(&mut indexacao_findings, rules::indexacao_canonical_conflict(pages, origin));

    let mut critical_findings = Vec::new();
    dedupe_push(&mut critical_findings, rules::critical_http_errors(pages));
    dedupe_push(&mut critical_findings, rules::critical_redirect_chains(pages));
    dedupe_push(&mut critical_findings, rules::critical_mixed_content(pages));
    if budgets.include_limit_findings {
        dedupe_push(&mut critical_findings, rules::critical_partial_crawl(crawl, profile));
    }

    let seo = scorer::build_section(
        seo_findings.clone(),
        category_summary(
            seo_findings.len(),
            pages_scanned_html,
            "{n} achados SEO em {p} paginas HTML analisadas.",
            "Nenhuma pagina HTML analisada para SEO.",
        ),
        vec!["title & meta-desc", "canonical & h1", "broken internal links", "sitemap/robots"],
    );
    let a11y = scorer::build_section(
        a11y_findings.clone(),
        category_summary(
            a11y_findings.len(),
            pages_scanned_html,
            "{n} achados de acessibilidade em verificacoes basicas.",
            "Nenhuma pagina HTML analisada para acessibilidade.",
        ),
        vec!["img-alt", "input-label", "html-lang", "document title"],
    );
    let content = scorer::build_section(
        content_findings.clone(),
        category_summary(
            content_findings.len(),
            pages_scanned_html,
            "{n} achados de conteudo com foco em cobertura e estrutura.",
            "Nenhuma pagina HTML analisada para conteudo.",
        ),
        vec!["words-per-page", "presence of main heading"],
    );
    let performance = scorer::build_section(
        performance_findings.clone(),
        category_summary(
            performance_findings.len(),
            pages_scanned_html,
            "{n} achados de performance por proxies leves (TTFB, tamanho HTML e recursos).",
            "Nenhuma pagina HTML analisada para performance.",
        ),
        vec!["TTFB proxy", "HTML size", "resource count", "render-blocking resources"],
    );
    let indexacao = scorer::build_section(
        indexacao_findings.clone(),
        category_summary(
            indexacao_findings.len(),
            pages_scanned_html,
            "{n} achados de indexacao com base em robots, sitemap, noindex e canonical.",
            "Nenhuma pagina HTML analisada para indexacao.",
        ),
        vec!["robots.txt & sitemap.xml", "noindex pages", "canonical conflicts"],
    );
    let erros_criticos = scorer::build_section(
        critical_findings.clone(),
        if critical_findings.is_empty() && pages_scanned_html == 0 {
            "Nenhum erro critico identificado.".to_string()
        } else {
            format!(
                "{} achados criticos relacionados a erro HTTP, redirect chain, mixed content e limites.",
                critical_findings.len()
            )
        },
        vec!["4xx/5xx", "redirect chains", "mixed content", "crawl-limit hit"],
    );

    let overall_summary = if pages_scanned_html == 0 {
        "Nenhuma pagina HTML rastreada. Verifique disponibilidade e robots.".to_string()
    } else {
        let total: usize = [&seo, &a11y, &content, &performance, &indexacao, &erros_criticos]
            .iter()
            .map(|s| s.findings.len())
            .sum();
        format!("Crawl em {pages_scanned_html} paginas HTML; {total} achados relevantes.")
    };
    let overall = scorer::build_overall(
        &[&seo, &a11y, &content, &performance, &indexacao, &erros_criticos],
        overall_summary,
        pages_scanned_html,
    );

    let worst_pages = scorer::worst_pages(pages, origin);
    let appendix = scorer::build_appendix(crawl, budgets.include_limit_findings);

    Report { overall, seo, a11y, content, performance, indexacao, erros_criticos, worst_pages, appendix }
}
