//! Executive Narrator (§4.8): renders the six section summaries plus
//! overall into one Portuguese sentence per key via a remote chat-completion
//! endpoint, with a rule-based fallback sentence per key when the model
//! returns nothing usable for it.
//!
//! Grounded on the reference engine's Gemini caller (same shape: build a
//! prompt payload, POST JSON, pull text out of the response, bail with
//! context on any transport/shape failure) generalized to an
//! OpenAI-compatible `/chat/completions` endpoint so both Groq and OpenAI
//! work unmodified.

use std::collections::HashMap;

use regex::Regex;
use rquest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::OnceLock;

use crate::domain::{Finding, Section};
use crate::error::{AppError, Result};

pub const SECTION_KEYS: [&str; 7] =
    ["overall", "seo", "a11y", "content", "performance", "indexacao", "erros_criticos"];

fn fallback_focus(key: &str) -> &'static str {
    match key {
        "overall" => "desempenho digital e potencial de crescimento",
        "seo" => "visibilidade organica e geracao de demanda",
        "a11y" => "experiencia de navegacao e confianca da marca",
        "content" => "clareza da proposta e capacidade de conversao",
        "performance" => "fluidez da jornada e tempo de resposta percebido",
        "indexacao" => "presenca organica e cobertura de paginas",
        "erros_criticos" => "riscos tecnicos com impacto direto em resultados",
        _ => "desempenho digital",
    }
}

/// Portuguese focus phrase for the per-key fallback sentence: the sanitized
/// title of the section's first finding when one exists, else the fixed
/// `fallback_focus` phrase for that key.
fn sentence_focus(key: &str, findings: &[Finding]) -> String {
    findings
        .first()
        .and_then(|f| focus_from_title(f.title))
        .unwrap_or_else(|| fallback_focus(key).to_string())
}

/// Mirrors the reference engine's rule-based sentence builder: one of four
/// templates chosen by status when findings exist, a distinct "stable"
/// template when the section has none, always naming the derived focus.
fn fallback_sentence(key: &str, status: &str, findings: &[Finding]) -> String {
    let focus = sentence_focus(key, findings);
    if findings.is_empty() {
        format!(
            "Nesta leitura inicial, {focus} aparece estavel e o proximo passo e refinar essa frente para ampliar resultados com previsibilidade."
        )
    } else if status == "critical" {
        format!(
            "Foram identificados riscos relevantes em {focus} e o proximo passo e priorizar correcoes de maior impacto para proteger conversao e receita."
        )
    } else if status == "attention" {
        format!(
            "Ha oportunidades claras em {focus} e o proximo passo e executar melhorias priorizadas para transformar potencial em ganho comercial."
        )
    } else {
        format!(
            "Existem oportunidades pontuais em {focus} e o proximo passo e capturar ganhos adicionais com ajustes de alto retorno."
        )
    }
}

#[derive(Serialize)]
struct PayloadFinding {
    severity: &'static str,
    title: &'static str,
    how_to_fix: &'static str,
}

#[derive(Serialize)]
struct PayloadSection {
    status: &'static str,
    summary: String,
    findings: Vec<PayloadFinding>,
    next_actions: Vec<String>,
}

fn build_payload(sections: &HashMap<&str, &Section>) -> Value {
    let mut map = serde_json::Map::new();
    for key in SECTION_KEYS {
        let section = sections[key];
        let payload = PayloadSection {
            status: section.status,
            summary: section.summary.clone(),
            findings: section
                .findings
                .iter()
                .take(3)
                .map(|f| PayloadFinding { severity: f.severity.as_str(), title: f.title, how_to_fix: f.how_to_fix })
                .collect(),
            next_actions: section.next_actions.iter().take(3).cloned().collect(),
        };
        map.insert(key.to_string(), serde_json::to_value(payload).unwrap());
    }
    Value::Object(map)
}

const SYSTEM_PROMPT: &str = "Voce e um consultor de performance digital. Para cada chave do JSON recebido, \
produza exatamente uma frase em portugues, terminada em ponto, em tom consultivo comercial. Nunca inclua URLs, \
metricas numericas ou percentuais, tags HTML, marcadores de lista, nem a expressao 'analise completa'. Responda \
apenas com um objeto JSON contendo as mesmas chaves recebidas, cada uma mapeando para a frase correspondente.";

struct Provider {
    base_url: &'static str,
    default_model: &'static str,
}

fn provider_for(api_key: &str) -> Provider {
    if api_key.starts_with("gsk_") {
        Provider { base_url: "https://api.groq.com/openai/v1", default_model: "llama-3.1-8b-instant" }
    } else {
        Provider { base_url: "https://api.openai.com/v1", default_model: "gpt-4o-mini" }
    }
}

/// Requests the narrator sentences. `api_key` absent is an immediate
/// [`AppError::LlmUnavailable`] - no network call is attempted.
pub async fn narrate(
    client: &Client,
    api_key: Option<&str>,
    model_override: Option<&str>,
    sections: &HashMap<&str, &Section>,
) -> Result<HashMap<String, String>> {
    let api_key = api_key.ok_or_else(|| AppError::LlmUnavailable("LLM_API_KEY not configured".to_string()))?;
    let provider = provider_for(api_key);
    let model = model_override.unwrap_or(provider.default_model);

    let payload = build_payload(sections);
    let body = json!({
        "model": model,
        "temperature": 0,
        "response_format": {"type": "json_object"},
        "messages": [
            {"role": "system", "content": SYSTEM_PROMPT},
            {"role": "user", "content": payload.to_string()},
        ],
    });

    let response = client
        .post(format!("{}/chat/completions", provider.base_url))
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| AppError::LlmUnavailable(format!("transport error calling LLM: {e}")))?;

    if !response.status().is_success() {
        let status = response.status();
        return Err(AppError::LlmUnavailable(format!("LLM endpoint returned {status}")));
    }

    let envelope: Value = response
        .json()
        .await
        .map_err(|e| AppError::LlmUnavailable(format!("failed to parse LLM response: {e}")))?;

    let raw_content = envelope["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| AppError::LlmUnavailable("LLM response missing message content".to_string()))?;

    let parsed: Value = serde_json::from_str(raw_content)
        .map_err(|e| AppError::LlmUnavailable(format!("LLM content is not valid JSON: {e}")))?;

    let object = parsed.as_object().ok_or_else(|| AppError::LlmUnavailable("LLM content is not a JSON object".to_string()))?;

    let mut out = HashMap::new();
    for key in SECTION_KEYS {
        let section = sections[key];
        let raw = object.get(key).and_then(Value::as_str).unwrap_or("");
        let sanitized = sanitize(raw);
        let sentence =
            if sanitized.is_empty() { fallback_sentence(key, section.status, &section.findings) } else { sanitized };
        out.insert(key.to_string(), sentence);
    }
    Ok(out)
}

/// Rule-based rendering used by [`crate::orchestrator`] when the whole
/// narrator call fails - never a silent per-key substitute, only a full
/// fallback path for the caller.
pub fn rule_based(sections: &HashMap<&str, &Section>) -> HashMap<String, String> {
    SECTION_KEYS
        .iter()
        .map(|&key| {
            let section = sections[key];
            (key.to_string(), fallback_sentence(key, section.status, &section.findings))
        })
        .collect()
}

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(?:https?://|www\.)\S+").unwrap())
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").unwrap())
}

fn numeric_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\d+(?:[.,]\d+)?%?\b").unwrap())
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

const GLOSSARY: &[(&str, &str)] = &[
    ("mixed content", "conteudo misto"),
    ("render blocking", "bloqueio de renderizacao"),
    ("title", "titulo"),
    ("heading", "cabecalho"),
];

/// Strips URLs, tags and numeric tokens, translates a small glossary,
/// replaces the banned phrase, collapses whitespace, and keeps only the
/// first sentence. Returns empty when nothing sentence-shaped survives.
fn sanitize(raw: &str) -> String {
    let mut text = url_re().replace_all(raw, "").to_string();
    text = tag_re().replace_all(&text, "").to_string();
    text = numeric_re().replace_all(&text, "").to_string();
    for (term, translation) in GLOSSARY {
        text = text.replace(term, translation);
    }
    text = text.replace("analise completa", "aprofundamento estrategico");
    text = whitespace_re().replace_all(&text, " ").trim().to_string();

    match text.find('.') {
        Some(idx) => text[..=idx].trim().to_string(),
        None if text.is_empty() => String::new(),
        None => format!("{text}."),
    }
}

/// Strips URLs/tags/numeric tokens out of a finding title, translates the
/// glossary, and lowercases the result for use as a sentence's focus phrase.
/// Returns `None` when nothing survives the strip.
fn focus_from_title(title: &str) -> Option<String> {
    let mut text = url_re().replace_all(title, "").to_string();
    text = tag_re().replace_all(&text, "").to_string();
    text = numeric_re().replace_all(&text, "").to_string();
    text = text.replace('.', " ");
    for (term, translation) in GLOSSARY {
        text = text.replace(term, translation);
    }
    text = whitespace_re().replace_all(&text, " ").trim().to_lowercase();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
