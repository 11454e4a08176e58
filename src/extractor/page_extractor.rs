//! Page Extractor (§4.3): a deterministic pure function from raw HTML to the
//! typed signals the findings engine reads. Selectors are compiled once per
//! process via `OnceLock`, following the teacher's caching pattern.

use crate::domain::PageRecord;
use crate::url_norm::normalize_str;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use url::Url;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        fn $name() -> &'static Selector {
            static SEL: OnceLock<Selector> = OnceLock::new();
            SEL.get_or_init(|| Selector::parse($css).expect("static selector is valid"))
        }
    };
}

selector!(title_sel, "title");
selector!(meta_desc_sel, "meta[name]");
selector!(link_sel, "link[href]");
selector!(meta_robots_sel, "meta[name]");
selector!(h1_sel, "h1");
selector!(html_sel, "html");
selector!(img_sel, "img");
selector!(input_sel, "input");
selector!(label_for_sel, "label[for]");
selector!(label_sel, "label");
selector!(script_src_sel, "script[src]");
selector!(iframe_src_sel, "iframe[src]");
selector!(source_src_sel, "source[src]");
selector!(head_sel, "head");
selector!(noise_sel, "script, style, noscript");

fn rel_tokens(value: &str) -> Vec<String> {
    value.split_whitespace().map(|s| s.to_lowercase()).collect()
}

/// Builds the HTML-derived fields of a [`PageRecord`]; the caller fills in
/// the transport fields (`url`, `final_url`, `status`, `depth`, ...) first.
pub fn extract(html_src: &str, final_url: &str, origin: &str) -> PageRecordExtracted {
    let document = Html::parse_document(html_src);

    let title = document
        .select(title_sel())
        .next()
        .map(|el| el.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();

    let meta_description = document
        .select(meta_desc_sel())
        .find(|el| {
            el.value()
                .attr("name")
                .is_some_and(|n| n.eq_ignore_ascii_case("description"))
        })
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();

    let canonical = document
        .select(link_sel())
        .find(|el| {
            el.value()
                .attr("rel")
                .map(|rel| rel_tokens(rel).iter().any(|t| t == "canonical"))
                .unwrap_or(false)
        })
        .and_then(|el| el.value().attr("href"))
        .and_then(|href| Url::parse(final_url).ok().and_then(|base| base.join(href).ok()))
        .map(|u| normalize_str(u.as_str()))
        .unwrap_or_default();

    let robots_meta = document
        .select(meta_robots_sel())
        .find(|el| {
            el.value()
                .attr("name")
                .is_some_and(|n| n.eq_ignore_ascii_case("robots"))
        })
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default();

    let h1_count = document.select(h1_sel()).count() as u32;

    let lang = document
        .select(html_sel())
        .next()
        .and_then(|el| el.value().attr("lang"))
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default();

    let images: Vec<_> = document.select(img_sel()).collect();
    let images_total = images.len() as u32;
    let images_missing_alt = images
        .iter()
        .filter(|img| img.value().attr("alt").unwrap_or("").trim().is_empty())
        .count() as u32;

    let labels_for: std::collections::HashSet<String> = document
        .select(label_for_sel())
        .filter_map(|el| el.value().attr("for"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let inputs: Vec<_> = document
        .select(input_sel())
        .filter(|input| {
            let ty = input.value().attr("type").unwrap_or("text").trim().to_lowercase();
            !matches!(ty.as_str(), "hidden" | "submit" | "button" | "image" | "reset")
        })
        .collect();
    let inputs_total = inputs.len() as u32;
    let inputs_missing_label = inputs
        .iter()
        .filter(|input| !has_label(input, &labels_for))
        .count() as u32;

    let base = Url::parse(final_url).ok();
    let mut resources: Vec<String> = Vec::new();
    for el in document.select(script_src_sel()) {
        push_resolved(&mut resources, &base, el.value().attr("src").or_else(|| el.value().attr("data-src")));
    }
    for el in document.select(img_sel()) {
        push_resolved(&mut resources, &base, el.value().attr("src").or_else(|| el.value().attr("data-src")));
    }
    for el in document.select(iframe_src_sel()) {
        push_resolved(&mut resources, &base, el.value().attr("src"));
    }
    for el in document.select(source_src_sel()) {
        push_resolved(&mut resources, &base, el.value().attr("src"));
    }
    for el in document.select(link_sel()) {
        push_resolved(&mut resources, &base, el.value().attr("href"));
    }
    let resource_count = resources.len() as u32;

    let render_blocking_count = document
        .select(head_sel())
        .next()
        .map(|head| {
            let scripts = head
                .select(script_src_sel())
                .filter(|el| el.value().attr("async").is_none() && el.value().attr("defer").is_none())
                .count();
            let stylesheets = head
                .select(link_sel())
                .filter(|el| {
                    el.value()
                        .attr("rel")
                        .map(|rel| rel_tokens(rel).iter().any(|t| t == "stylesheet"))
                        .unwrap_or(false)
                })
                .count();
            (scripts + stylesheets) as u32
        })
        .unwrap_or(0);

    let mixed_content_count = if final_url.starts_with("https://") {
        resources.iter().filter(|r| r.to_lowercase().starts_with("http://")).count() as u32
    } else {
        0
    };

    let word_count = count_words(&document);

    let internal_links = extract_internal_links(&document, &base, origin);

    PageRecordExtracted {
        title,
        meta_description,
        canonical,
        robots_meta,
        h1_count,
        lang,
        images_total,
        images_missing_alt,
        inputs_total,
        inputs_missing_label,
        resource_count,
        render_blocking_count,
        mixed_content_count,
        word_count,
        internal_links,
    }
}

fn has_label(input: &scraper::ElementRef, labels_for: &std::collections::HashSet<String>) -> bool {
    let non_empty = |attr: &str| !input.value().attr(attr).unwrap_or("").trim().is_empty();
    let has_aria = non_empty("aria-label") || non_empty("aria-labelledby");
    let input_id = input.value().attr("id").unwrap_or("").trim().to_string();
    let has_for_label = !input_id.is_empty() && labels_for.contains(&input_id);
    let label_sel = label_sel();
    let has_wrapping_label = input.ancestors().any(|a| {
        scraper::ElementRef::wrap(a)
            .map(|el| label_sel.matches(&el))
            .unwrap_or(false)
    });
    has_aria || has_for_label || has_wrapping_label
}

fn push_resolved(out: &mut Vec<String>, base: &Option<Url>, src: Option<&str>) {
    let Some(src) = src.map(str::trim).filter(|s| !s.is_empty()) else {
        return;
    };
    let resolved = match base {
        Some(base) => base.join(src).map(|u| u.to_string()).unwrap_or_else(|_| src.to_string()),
        None => src.to_string(),
    };
    out.push(resolved);
}

fn count_words(document: &Html) -> u32 {
    let all_text: String = document.root_element().text().collect::<Vec<_>>().join(" ");
    let noise_text: String = document
        .select(noise_sel())
        .flat_map(|el| el.text())
        .collect::<Vec<_>>()
        .join(" ");
    let total = all_text.split_whitespace().count();
    let noise = noise_text.split_whitespace().count();
    total.saturating_sub(noise) as u32
}

fn extract_internal_links(document: &Html, base: &Option<Url>, origin: &str) -> Vec<String> {
    static A_SEL: OnceLock<Selector> = OnceLock::new();
    let selector = A_SEL.get_or_init(|| Selector::parse("a[href]").unwrap());

    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for el in document.select(selector) {
        let Some(href) = el.value().attr("href").map(str::trim) else {
            continue;
        };
        if href.is_empty()
            || href.starts_with('#')
            || href.starts_with("mailto:")
            || href.starts_with("tel:")
            || href.starts_with("javascript:")
        {
            continue;
        }
        let resolved = match base {
            Some(base) => base.join(href).ok(),
            None => Url::parse(href).ok(),
        };
        let Some(resolved) = resolved else { continue };
        if resolved.scheme() != "http" && resolved.scheme() != "https" {
            continue;
        }
        let normalized = normalize_str(resolved.as_str());
        if !crate::url_norm::same_origin(&normalized, origin) {
            continue;
        }
        if seen.insert(normalized.clone()) {
            out.push(normalized);
        }
    }
    out
}

/// HTML-derived fields produced by [`extract`]; merged into a [`PageRecord`]
/// by the crawler alongside the transport fields it already knows.
pub struct PageRecordExtracted {
    pub title: String,
    pub meta_description: String,
    pub canonical: String,
    pub robots_meta: String,
    pub h1_count: u32,
    pub lang: String,
    pub images_total: u32,
    pub images_missing_alt: u32,
    pub inputs_total: u32,
    pub inputs_missing_label: u32,
    pub resource_count: u32,
    pub render_blocking_count: u32,
    pub mixed_content_count: u32,
    pub word_count: u32,
    pub internal_links: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_title_meta_canonical() {
        let html = r#"<html lang="pt-br"><head>
            <title>  Hello   World </title>
            <meta name="description" content="  a desc  ">
            <link rel="canonical" href="/page">
        </head><body></body></html>"#;
        let out = extract(html, "https://example.test/page", "https://example.test");
        assert_eq!(out.title, "Hello World");
        assert_eq!(out.meta_description, "a desc");
        assert_eq!(out.canonical, "https://example.test/page");
        assert_eq!(out.lang, "pt-br");
    }

    #[test]
    fn counts_images_missing_alt() {
        let html = r#"<html><body>
            <img src="a.png" alt="ok">
            <img src="b.png" alt="">
            <img src="c.png">
        </body></html>"#;
        let out = extract(html, "https://example.test/", "https://example.test");
        assert_eq!(out.images_total, 3);
        assert_eq!(out.images_missing_alt, 2);
    }

    #[test]
    fn input_label_rules() {
        let html = r#"<html><body>
            <label for="a">A</label>
            <input id="a" type="text">
            <input type="text" aria-label="b">
            <label><input type="text"></label>
            <input type="text">
            <input type="hidden">
        </body></html>"#;
        let out = extract(html, "https://example.test/", "https://example.test");
        assert_eq!(out.inputs_total, 4);
        assert_eq!(out.inputs_missing_label, 1);
    }

    #[test]
    fn render_blocking_counts_head_only() {
        let html = r#"<html><head>
            <script src="a.js"></script>
            <script src="b.js" async></script>
            <link rel="stylesheet" href="s.css">
        </head><body><script src="c.js"></script></body></html>"#;
        let out = extract(html, "https://example.test/", "https://example.test");
        assert_eq!(out.render_blocking_count, 2);
    }

    #[test]
    fn mixed_content_only_on_https() {
        let html = r#"<html><body><img src="http://cdn.example/x.png"></body></html>"#;
        let https = extract(html, "https://example.test/", "https://example.test");
        assert_eq!(https.mixed_content_count, 1);
        let http = extract(html, "http://example.test/", "http://example.test");
        assert_eq!(http.mixed_content_count, 0);
    }

    #[test]
    fn internal_links_dedup_same_origin_only() {
        let html = r#"<html><body>
            <a href="/a">A</a>
            <a href="/a">A again</a>
            <a href="https://other.test/b">B</a>
            <a href="#frag">frag</a>
            <a href="mailto:x@example.test">mail</a>
        </body></html>"#;
        let out = extract(html, "https://example.test/", "https://example.test");
        assert_eq!(out.internal_links, vec!["https://example.test/a".to_string()]);
    }
}
