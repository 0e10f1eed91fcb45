use crate::constants::*;
use crate::errors::AppResult;
use crate::models::{ItemSource, ProgramStatus, SearchableItem};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use tracing::debug;
use url::Url;

/// Cached selectors for program cards and their parts.
/// Compiled once at initialization.
static CARD_SELECTORS: OnceLock<CardSelectors> = OnceLock::new();

/// Cached regex collapsing whitespace runs in extracted text.
static WHITESPACE_RUN: OnceLock<Regex> = OnceLock::new();

struct CardSelectors {
    card: Selector,
    title: Selector,
    meta: Selector,
    link: Selector,
}

fn card_selectors() -> &'static CardSelectors {
    CARD_SELECTORS.get_or_init(|| CardSelectors {
        card: Selector::parse(PROGRAM_CARD_SELECTOR)
            .expect("PROGRAM_CARD_SELECTOR is a valid CSS selector"),
        title: Selector::parse(CARD_TITLE_SELECTOR)
            .expect("CARD_TITLE_SELECTOR is a valid CSS selector"),
        meta: Selector::parse(CARD_META_SELECTOR)
            .expect("CARD_META_SELECTOR is a valid CSS selector"),
        link: Selector::parse(CARD_LINK_SELECTOR)
            .expect("CARD_LINK_SELECTOR is a valid CSS selector"),
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    let whitespace = WHITESPACE_RUN
        .get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is a valid regex"));
    let raw: String = element.text().collect();
    whitespace.replace_all(raw.trim(), " ").into_owned()
}

fn fallback_description(status: Option<&str>) -> &'static str {
    match status.map(ProgramStatus::from) {
        Some(ProgramStatus::Open) => "Open program",
        Some(ProgramStatus::Closed) => "Closed program",
        _ => "Upcoming program",
    }
}

/// Extracts searchable items from program cards rendered on an HTML page.
///
/// Every element carrying `data-program` is a card. Its title is the text of
/// its first `h3` (or the `data-name` attribute), its description the text of
/// `.meta` (or a phrase derived from `data-estado`), and its URL the first
/// link, resolved against `base_url`. Cards without a title are skipped.
pub fn extract_cards(html: &str, base_url: &Url) -> AppResult<Vec<SearchableItem>> {
    let document = Html::parse_document(html);
    let selectors = card_selectors();

    let mut items = Vec::new();
    for card in document.select(&selectors.card) {
        let attrs = card.value();
        let title = card
            .select(&selectors.title)
            .next()
            .map(element_text)
            .filter(|t| !t.is_empty())
            .or_else(|| attrs.attr("data-name").map(|n| n.trim().to_string()))
            .unwrap_or_default();
        if title.is_empty() {
            continue;
        }

        let description = card
            .select(&selectors.meta)
            .next()
            .map(element_text)
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| fallback_description(attrs.attr("data-estado")).to_string());

        let url = card
            .select(&selectors.link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|href| resolve_href(base_url, href))
            .unwrap_or_else(|| "#".to_string());

        items.push(SearchableItem {
            title,
            description: Some(description),
            keywords: None,
            content: None,
            url,
            source: ItemSource::Page,
        });
    }

    debug!(cards = items.len(), "Program cards extracted from page");
    Ok(items)
}

/// Resolves a card link. In-page anchors stay as they are; anything the base
/// URL cannot join is kept verbatim.
fn resolve_href(base_url: &Url, href: &str) -> String {
    if href.starts_with('#') {
        return href.to_string();
    }
    base_url
        .join(href)
        .map(String::from)
        .unwrap_or_else(|_| href.to_string())
}
