//! The fixed rule catalogue (§4.6). Each rule is a free function over the
//! crawl result; it fires at most once and returns the finding carrying the
//! full affected-page set (truncated to [`Finding::MAX_AFFECTED_URLS`]).
//!
//! Portuguese copy is verbatim from the reference audit engine - do not
//! reword it, even where the English reader would phrase it differently.

use crate::crawler::Profile;
use crate::domain::{CrawlResult, Evidence, Finding, PageRecord, Severity};
use crate::url_norm::same_origin;

fn affected_urls(pages: &[&PageRecord]) -> Vec<String> {
    pages.iter().map(|p| p.url.clone()).collect()
}

fn one(
    id: &'static str,
    severity: Severity,
    title: &'static str,
    description: String,
    impact: &'static str,
    how_to_fix: &'static str,
    pages: Vec<&PageRecord>,
    evidence: Evidence,
) -> Option<Finding> {
    if pages.is_empty() {
        return None;
    }
    let urls = affected_urls(&pages);
    Some(Finding::new(id, severity, title, description, impact, how_to_fix, vec![evidence], urls))
}

pub fn seo_title_missing(pages: &[PageRecord]) -> Option<Finding> {
    let affected: Vec<&PageRecord> = pages.iter().filter(|p| p.title.trim().is_empty()).collect();
    let n = affected.len();
    one(
        "seo_title_missing",
        Severity::High,
        "Paginas sem title",
        format!("{n} paginas HTML sem tag <title>."),
        "Prejudica relevancia organica e CTR.",
        "Definir um title unico e descritivo por pagina.",
        affected.clone(),
        Evidence::new(affected.first()?.url.clone()).selector("title"),
    )
}

pub fn seo_title_length(pages: &[PageRecord]) -> Option<Finding> {
    let affected: Vec<&PageRecord> = pages
        .iter()
        .filter(|p| !p.title.trim().is_empty() && (p.title.chars().count() < 15 || p.title.chars().count() > 60))
        .collect();
    let n = affected.len();
    one(
        "seo_title_length",
        Severity::Medium,
        "Titles fora do tamanho recomendado",
        format!("{n} paginas com title curto ou longo demais."),
        "Pode reduzir clareza do snippet no buscador.",
        "Manter titles entre 15 e 60 caracteres.",
        affected.clone(),
        Evidence::new(affected.first()?.url.clone()).selector("title").value(affected.first()?.title.clone()),
    )
}

pub fn seo_meta_description_missing(pages: &[PageRecord]) -> Option<Finding> {
    let affected: Vec<&PageRecord> = pages.iter().filter(|p| p.meta_description.trim().is_empty()).collect();
    let n = affected.len();
    one(
        "seo_meta_description_missing",
        Severity::Medium,
        "Meta description ausente",
        format!("{n} paginas sem meta description."),
        "Diminui controle sobre texto exibido no resultado de busca.",
        "Adicionar meta description unica e objetiva em cada pagina.",
        affected.clone(),
        Evidence::new(affected.first()?.url.clone()).selector("meta[name=description]"),
    )
}

pub fn seo_meta_description_length(pages: &[PageRecord]) -> Option<Finding> {
    let affected: Vec<&PageRecord> = pages
        .iter()
        .filter(|p| {
            let len = p.meta_description.chars().count();
            !p.meta_description.trim().is_empty() && (len < 70 || len > 160)
        })
        .collect();
    let n = affected.len();
    one(
        "seo_meta_description_length",
        Severity::Low,
        "Meta descriptions fora do tamanho recomendado",
        format!("{n} paginas com meta description curta ou longa demais."),
        "Pode afetar compreensao do snippet.",
        "Ajustar meta descriptions para faixa entre 70 e 160 caracteres.",
        affected.clone(),
        Evidence::new(affected.first()?.url.clone()).selector("meta[name=description]"),
    )
}

pub fn seo_canonical_missing(pages: &[PageRecord]) -> Option<Finding> {
    let affected: Vec<&PageRecord> = pages.iter().filter(|p| p.canonical.trim().is_empty()).collect();
    let n = affected.len();
    one(
        "seo_canonical_missing",
        Severity::Medium,
        "Canonical ausente",
        format!("{n} paginas sem link canonical."),
        "Pode dificultar consolidacao de sinais para URLs similares.",
        "Adicionar <link rel='canonical'> em paginas indexaveis.",
        affected.clone(),
        Evidence::new(affected.first()?.url.clone()).selector("link[rel=canonical]"),
    )
}

pub fn seo_h1_count(pages: &[PageRecord]) -> Option<Finding> {
    let affected: Vec<&PageRecord> = pages.iter().filter(|p| p.h1_count != 1).collect();
    let n = affected.len();
    one(
        "seo_h1_count",
        Severity::Medium,
        "Estrutura de H1 inconsistente",
        format!("{n} paginas com quantidade de H1 diferente de 1."),
        "Pode reduzir clareza semantica da pagina.",
        "Garantir exatamente um H1 principal por pagina.",
        affected.clone(),
        Evidence::new(affected.first()?.url.clone()).selector("h1").metric(affected.first()?.h1_count),
    )
}

pub fn seo_broken_internal_links(crawl: &CrawlResult) -> Option<Finding> {
    if crawl.broken_internal_links.is_empty() {
        return None;
    }
    let n = crawl.broken_internal_links.len();
    let severity = if n >= 10 { Severity::Critical } else { Severity::High };
    let first = &crawl.broken_internal_links[0];
    let urls: Vec<String> = crawl.broken_internal_links.iter().map(|l| l.url.clone()).collect();
    let truncated: Vec<String> = urls.into_iter().take(Finding::MAX_AFFECTED_URLS).collect();
    Some(Finding::new(
        "seo_broken_internal_links",
        severity,
        "Links internos quebrados",
        format!("{n} links internos retornando erro (4xx/5xx/timeout)."),
        "Impacta rastreabilidade, UX e distribuicao de autoridade interna.",
        "Corrigir URLs quebradas e atualizar links de navegacao.",
        vec![Evidence::new(first.url.clone()).metric(first.status)],
        truncated,
    ))
}

pub fn a11y_img_alt_missing(pages: &[PageRecord]) -> Option<Finding> {
    let affected: Vec<&PageRecord> = pages.iter().filter(|p| p.images_missing_alt > 0).collect();
    if affected.is_empty() {
        return None;
    }
    let n: u32 = affected.iter().map(|p| p.images_missing_alt).sum();
    let m = affected.len();
    let severity = if n >= 20 { Severity::High } else { Severity::Medium };
    one(
        "a11y_img_alt_missing",
        severity,
        "Imagens sem texto alternativo",
        format!("{n} imagens sem alt em {m} paginas."),
        "Prejudica acessibilidade para leitores de tela.",
        "Definir atributo alt descritivo em todas as imagens relevantes.",
        affected.clone(),
        Evidence::new(affected.first()?.url.clone()).selector("img").metric(n),
    )
}

pub fn a11y_input_label_missing(pages: &[PageRecord]) -> Option<Finding> {
    let affected: Vec<&PageRecord> = pages.iter().filter(|p| p.inputs_missing_label > 0).collect();
    if affected.is_empty() {
        return None;
    }
    let n: u32 = affected.iter().map(|p| p.inputs_missing_label).sum();
    one(
        "a11y_input_label_missing",
        Severity::High,
        "Campos de formulario sem label",
        format!("{n} inputs sem label associada."),
        "Dificulta navegacao com tecnologia assistiva.",
        "Associar labels via for/id ou usar aria-label/aria-labelledby.",
        affected.clone(),
        Evidence::new(affected.first()?.url.clone()).selector("input").metric(n),
    )
}

pub fn a11y_lang_missing(pages: &[PageRecord]) -> Option<Finding> {
    let affected: Vec<&PageRecord> = pages.iter().filter(|p| p.lang.trim().is_empty()).collect();
    let n = affected.len();
    one(
        "a11y_lang_missing",
        Severity::Medium,
        "Atributo lang ausente",
        format!("{n} paginas sem atributo lang na tag html."),
        "Pode reduzir compatibilidade com leitores de tela.",
        "Definir lang apropriado no elemento <html>.",
        affected.clone(),
        Evidence::new(affected.first()?.url.clone()).selector("html"),
    )
}

pub fn a11y_title_missing(pages: &[PageRecord]) -> Option<Finding> {
    let affected: Vec<&PageRecord> = pages.iter().filter(|p| p.title.trim().is_empty()).collect();
    let n = affected.len();
    one(
        "a11y_title_missing",
        Severity::Medium,
        "Titulo da pagina ausente",
        format!("{n} paginas sem titulo de documento."),
        "Compromete contexto de navegacao para usuarios assistivos.",
        "Adicionar tag <title> descritiva em todas as paginas.",
        affected.clone(),
        Evidence::new(affected.first()?.url.clone()).selector("title"),
    )
}

pub fn content_thin_pages(pages: &[PageRecord]) -> Option<Finding> {
    let affected: Vec<&PageRecord> = pages.iter().filter(|p| p.word_count < 120).collect();
    let n = affected.len();
    one(
        "content_thin_pages",
        Severity::Medium,
        "Conteudo muito curto",
        format!("{n} paginas com menos de 120 palavras."),
        "Pode reduzir capacidade de ranqueamento e conversao.",
        "Expandir conteudo util com contexto, prova e CTA claros.",
        affected.clone(),
        Evidence::new(affected.first()?.url.clone()).metric(affected.first()?.word_count),
    )
}

pub fn content_missing_h1(pages: &[PageRecord]) -> Option<Finding> {
    let affected: Vec<&PageRecord> = pages.iter().filter(|p| p.h1_count == 0).collect();
    let n = affected.len();
    one(
        "content_missing_h1",
        Severity::Medium,
        "Estrutura sem heading principal",
        format!("{n} paginas sem H1."),
        "Reduz clareza da proposta principal para usuarios e buscadores.",
        "Incluir heading principal alinhado com o objetivo da pagina.",
        affected.clone(),
        Evidence::new(affected.first()?.url.clone()).selector("h1"),
    )
}

pub fn perf_slow_ttfb(pages: &[PageRecord]) -> Option<Finding> {
    let affected: Vec<&PageRecord> = pages.iter().filter(|p| p.ttfb_ms > 1200).collect();
    let n = affected.len();
    one(
        "perf_slow_ttfb",
        Severity::High,
        "TTFB elevado",
        format!("{n} paginas com TTFB acima de 1200ms."),
        "Aumenta tempo de carregamento percebido.",
        "Revisar backend, cache e latencia de servidor.",
        affected.clone(),
        Evidence::new(affected.first()?.url.clone()).metric(affected.first()?.ttfb_ms),
    )
}

pub fn perf_heavy_html(pages: &[PageRecord]) -> Option<Finding> {
    let affected: Vec<&PageRecord> = pages.iter().filter(|p| p.html_size_bytes > 512_000).collect();
    let n = affected.len();
    one(
        "perf_heavy_html",
        Severity::Medium,
        "HTML muito pesado",
        format!("{n} paginas com HTML acima de 500KB."),
        "Pode aumentar tempo de download e parse.",
        "Reduzir markup redundante e componentes inline excessivos.",
        affected.clone(),
        Evidence::new(affected.first()?.url.clone()).metric(affected.first()?.html_size_bytes),
    )
}

pub fn perf_many_requests(pages: &[PageRecord]) -> Option<Finding> {
    let affected: Vec<&PageRecord> = pages.iter().filter(|p| p.resource_count > 80).collect();
    let n = affected.len();
    one(
        "perf_many_requests",
        Severity::Medium,
        "Muitos recursos na pagina",
        format!("{n} paginas com mais de 80 recursos referenciados."),
        "Aumenta custo de renderizacao e transferencias.",
        "Consolidar e otimizar scripts, CSS e imagens.",
        affected.clone(),
        Evidence::new(affected.first()?.url.clone()).metric(affected.first()?.resource_count),
    )
}

pub fn perf_render_blocking(pages: &[PageRecord]) -> Option<Finding> {
    let affected: Vec<&PageRecord> = pages.iter().filter(|p| p.render_blocking_count > 5).collect();
    let n = affected.len();
    one(
        "perf_render_blocking",
        Severity::Medium,
        "Recursos bloqueando renderizacao",
        format!("{n} paginas com mais de 5 recursos bloqueantes no head."),
        "Pode atrasar exibicao de conteudo acima da dobra.",
        "Aplicar defer/async em scripts e otimizar CSS critico.",
        affected.clone(),
        Evidence::new(affected.first()?.url.clone()).metric(affected.first()?.render_blocking_count),
    )
}

pub fn indexacao_robots_missing(crawl: &CrawlResult) -> Option<Finding> {
    if crawl.robots.robots_present {
        return None;
    }
    Some(Finding::new(
        "indexacao_robots_missing",
        Severity::High,
        "robots.txt ausente",
        "Arquivo robots.txt nao encontrado com status 200.".to_string(),
        "Bots podem rastrear caminhos sem orientacao.",
        "Publicar robots.txt com regras claras de rastreamento.",
        vec![Evidence::new(crawl.robots.robots_url.clone())],
        vec![crawl.url.clone()],
    ))
}

pub fn indexacao_sitemap_missing(crawl: &CrawlResult) -> Option<Finding> {
    if crawl.robots.sitemap_present {
        return None;
    }
    Some(Finding::new(
        "indexacao_sitemap_missing",
        Severity::Medium,
        "Sitemap nao encontrado",
        "Sitemap nao encontrado em robots.txt nem em /sitemap.xml.".to_string(),
        "Pode dificultar descoberta de URLs relevantes.",
        "Gerar sitemap.xml atualizado e referenciar no robots.txt.",
        vec![Evidence::new(crawl.robots.sitemap_url.clone())],
        vec![crawl.url.clone()],
    ))
}

pub fn indexacao_noindex_pages(pages: &[PageRecord]) -> Option<Finding> {
    let affected: Vec<&PageRecord> = pages.iter().filter(|p| p.robots_meta.to_lowercase().contains("noindex")).collect();
    let n = affected.len();
    one(
        "indexacao_noindex_pages",
        Severity::Medium,
        "Paginas com noindex",
        format!("{n} paginas HTML com meta robots noindex."),
        "Pode remover paginas da indexacao organica.",
        "Revisar noindex e manter apenas em paginas que realmente devem ficar fora do indice.",
        affected.clone(),
        Evidence::new(affected.first()?.url.clone()).selector("meta[name=robots]"),
    )
}

pub fn indexacao_canonical_conflict(pages: &[PageRecord], origin: &str) -> Option<Finding> {
    let affected: Vec<&PageRecord> = pages
        .iter()
        .filter(|p| !p.canonical.trim().is_empty() && !same_origin(&p.canonical, origin))
        .collect();
    let n = affected.len();
    one(
        "indexacao_canonical_conflict",
        Severity::High,
        "Canonical apontando para outra origem",
        format!("{n} paginas com canonical em dominio diferente."),
        "Pode transferir sinais de relevancia para outro host.",
        "Ajustar canonical para URL canonica correta do mesmo site.",
        affected.clone(),
        Evidence::new(affected.first()?.url.clone()).selector("link[rel=canonical]").value(affected.first()?.canonical.clone()),
    )
}

pub fn critical_http_errors(pages: &[PageRecord]) -> Option<Finding> {
    let affected: Vec<&PageRecord> = pages.iter().filter(|p| p.status >= 400 || p.status == 0).collect();
    if affected.is_empty() {
        return None;
    }
    let n = affected.len();
    let severity = if affected.iter().any(|p| p.status >= 500 || p.status == 0) {
        Severity::Critical
    } else {
        Severity::High
    };
    one(
        "critical_http_errors",
        severity,
        "Paginas com erro HTTP",
        format!("{n} paginas HTML com status 4xx/5xx ou timeout."),
        "Interrompe jornada do usuario e rastreio.",
        "Corrigir rotas quebradas e falhas de servidor prioritariamente.",
        affected.clone(),
        Evidence::new(affected.first()?.url.clone()).metric(affected.first()?.status),
    )
}

pub fn critical_redirect_chains(pages: &[PageRecord]) -> Option<Finding> {
    let affected: Vec<&PageRecord> = pages.iter().filter(|p| p.redirect_hops >= 3).collect();
    let n = affected.len();
    one(
        "critical_redirect_chains",
        Severity::High,
        "Cadeias de redirecionamento longas",
        format!("{n} paginas com cadeia de 3+ redirecionamentos."),
        "Aumenta latencia e pode causar perda de sinal SEO.",
        "Reduzir para no maximo um redirecionamento por URL.",
        affected.clone(),
        Evidence::new(affected.first()?.url.clone()).metric(affected.first()?.redirect_hops),
    )
}

pub fn critical_mixed_content(pages: &[PageRecord]) -> Option<Finding> {
    let affected: Vec<&PageRecord> = pages.iter().filter(|p| p.mixed_content_count > 0).collect();
    let n = affected.len();
    one(
        "critical_mixed_content",
        Severity::High,
        "Mixed content em paginas HTTPS",
        format!("{n} paginas carregando recursos HTTP em contexto HTTPS."),
        "Pode causar bloqueio de recursos e alertas de seguranca.",
        "Migrar todos os recursos para HTTPS.",
        affected.clone(),
        Evidence::new(affected.first()?.url.clone()).metric(affected.first()?.mixed_content_count),
    )
}

pub fn critical_partial_crawl(crawl: &CrawlResult, profile: Profile) -> Option<Finding> {
    if profile != Profile::Full || crawl.limit_notes.is_empty() {
        return None;
    }
    let notes = crawl.limit_notes.join("; ");
    Some(Finding::new(
        "critical_partial_crawl",
        Severity::Critical,
        "Crawl parcial por limite de seguranca",
        format!("A varredura foi interrompida antes de cobrir todo o site: {notes}"),
        "Resultados representam amostra parcial do site.",
        "Reexecutar auditoria apos reduzir complexidade de rastreamento ou revisar arquitetura.",
        vec![Evidence::new(crawl.url.clone())],
        vec![crawl.url.clone()],
    ))
}
