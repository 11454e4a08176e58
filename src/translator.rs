//! Translator/Formatter (§4.10): renames the internal English section keys,
//! severities, statuses and finding fields into the Portuguese report JSON
//! contract, and assembles the top-level `resumo_executivo`/`secoes`/
//! `piores_paginas`/`apendice` shape described in §6.

use serde::Serialize;
use serde_json::{json, Value};

use crate::domain::{Appendix, Finding, Section, Severity, WorstPage};
use crate::findings::Report;

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "critica",
        Severity::High => "alta",
        Severity::Medium => "media",
        Severity::Low => "baixa",
    }
}

fn status_label(status: &str) -> &'static str {
    match status {
        "critical" => "critico",
        "attention" => "atencao",
        _ => "ok",
    }
}

fn finding_json(finding: &Finding) -> Value {
    let evidencias: Vec<Value> = finding
        .evidence
        .iter()
        .map(|e| {
            json!({
                "url": e.url,
                "seletor": e.selector,
                "valor": e.value,
                "metrica": e.metric,
            })
        })
        .collect();
    json!({
        "id": finding.id,
        "severidade": severity_label(finding.severity),
        "titulo": finding.title,
        "descricao": finding.description,
        "impacto": finding.impact,
        "como_corrigir": finding.how_to_fix,
        "evidencias": evidencias,
        "urls_afetadas": finding.affected_urls,
    })
}

fn section_json(key: &str, label: &str, section: &Section) -> Value {
    json!({
        "chave": key,
        "rotulo": label,
        "score": section.score,
        "status": status_label(section.status),
        "resumo": section.summary,
        "achados": section.findings.iter().map(finding_json).collect::<Vec<_>>(),
        "proximas_acoes": section.next_actions,
        "verificado": section.measured,
    })
}

fn worst_page_json(page: &WorstPage) -> Value {
    json!({
        "url": page.url,
        "status": page.status,
        "total_problemas": page.total_issues,
        "seo": page.seo_issues,
        "acessibilidade": page.a11y_issues,
        "conteudo": page.content_issues,
        "performance": page.performance_issues,
        "indexacao": page.indexacao_issues,
        "criticos": page.critical_issues,
    })
}

fn appendix_json(appendix: &Appendix) -> Value {
    json!({
        "paginas_html_analisadas": appendix.pages_scanned_html,
        "links_internos_quebrados": appendix.broken_internal_links_count,
        "paginas_erro_4xx_5xx": appendix.http_4xx_5xx_pages_count,
        "paginas_noindex": appendix.noindex_pages_count,
        "paginas_sem_meta_description": appendix.missing_meta_description_count,
        "paginas_sem_title": appendix.missing_title_count,
        "paginas_sem_lang": appendix.missing_lang_count,
        "imagens_sem_alt": appendix.images_missing_alt_total,
        "inputs_sem_label": appendix.inputs_missing_label_total,
        "paginas_mixed_content": appendix.mixed_content_pages_count,
        "paginas_redirect_chain": appendix.redirect_chain_pages_count,
        "robots_presente": appendix.robots_present,
        "sitemap_presente": appendix.sitemap_present,
        "links_internos_verificados": appendix.links_checked_internal,
        "crawl_parcial": appendix.partial_crawl,
    })
}

#[derive(Serialize)]
struct ScoreStatus {
    score: i32,
    status: &'static str,
}

/// Builds the full `/report` response body: `url`, `gerado_em`,
/// `origem_dados`, `resumo_executivo`, `secoes`, `piores_paginas`,
/// `apendice`.
pub fn report_json(url: &str, generated_at: &str, origem_dados: &'static str, report: &Report) -> Value {
    let categories: [(&str, &str, &Section); 6] = [
        ("seo", "seo", &report.seo),
        ("a11y", "acessibilidade", &report.a11y),
        ("content", "conteudo", &report.content),
        ("performance", "performance", &report.performance),
        ("indexacao", "indexacao", &report.indexacao),
        ("erros_criticos", "erros_criticos", &report.erros_criticos),
    ];

    let mut pontuacoes = serde_json::Map::new();
    for (_, label, section) in &categories {
        pontuacoes.insert(
            label.to_string(),
            serde_json::to_value(ScoreStatus { score: section.score, status: status_label(section.status) }).unwrap(),
        );
    }

    let mut secoes: Vec<Value> = vec![section_json("overall", "visao_geral", &report.overall)];
    secoes.extend(categories.iter().map(|(key, label, section)| section_json(key, label, section)));

    json!({
        "url": url,
        "gerado_em": generated_at,
        "origem_dados": origem_dados,
        "resumo_executivo": {
            "score_geral": report.overall.score,
            "status_geral": status_label(report.overall.status),
            "mensagem_geral": report.overall.summary,
            "pontuacoes": pontuacoes,
        },
        "secoes": secoes,
        "piores_paginas": report.worst_pages.iter().map(worst_page_json).collect::<Vec<_>>(),
        "apendice": appendix_json(&report.appendix),
    })
}
