use super::snippet::build_snippet;
use crate::constants::*;
use crate::engine::collation::collation_key;
use crate::models::{MatchedField, SearchResult, SearchableItem};
use std::collections::BTreeSet;

/// Tunables for [`search_with`].
#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    /// Characters of context kept on each side of a snippet match
    pub snippet_context_chars: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            snippet_context_chars: 50,
        }
    }
}

/// A query after trimming, lowercasing and tokenizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub phrase: String,
    /// Every whitespace-separated word, in order
    pub words: Vec<String>,
}

impl NormalizedQuery {
    /// Returns `None` for a blank query.
    pub fn parse(query: &str) -> Option<Self> {
        let phrase = query.trim().to_lowercase();
        if phrase.is_empty() {
            return None;
        }
        let words = phrase.split_whitespace().map(str::to_string).collect();
        Some(Self { phrase, words })
    }

    /// Words long enough to earn per-token bonuses.
    pub fn scoring_tokens(&self) -> impl Iterator<Item = &str> {
        self.words
            .iter()
            .map(String::as_str)
            .filter(|w| w.chars().count() > MIN_TOKEN_CHARS)
    }
}

struct LoweredFields {
    title: String,
    description: String,
    keywords: String,
    content: String,
}

impl LoweredFields {
    fn of(item: &SearchableItem) -> Self {
        let lower = |field: &Option<String>| field.as_deref().unwrap_or_default().to_lowercase();
        Self {
            title: item.title.to_lowercase(),
            description: lower(&item.description),
            keywords: lower(&item.keywords),
            content: lower(&item.content),
        }
    }
}

/// Scores one item against a query.
///
/// Title phrase bonuses are exclusive (only the best of exact / prefix /
/// contains applies); every other bonus is additive, and token bonuses apply
/// once per query token.
pub fn score_item(
    item: &SearchableItem,
    query: &NormalizedQuery,
) -> (u32, BTreeSet<MatchedField>) {
    let fields = LoweredFields::of(item);
    let phrase = query.phrase.as_str();
    let mut score = 0;
    let mut matched = BTreeSet::new();

    let title_bonus = if fields.title == phrase {
        SCORE_TITLE_EXACT
    } else if fields.title.starts_with(phrase) {
        SCORE_TITLE_PREFIX
    } else if fields.title.contains(phrase) {
        SCORE_TITLE_CONTAINS
    } else {
        0
    };
    if title_bonus > 0 {
        score += title_bonus;
        matched.insert(MatchedField::Title);
    }

    if fields.keywords.contains(phrase) {
        score += SCORE_KEYWORDS_PHRASE;
        matched.insert(MatchedField::Keywords);
    }
    if fields.content.contains(phrase) {
        score += SCORE_CONTENT_PHRASE;
        matched.insert(MatchedField::Content);
    }
    if fields.description.contains(phrase) {
        score += SCORE_DESCRIPTION_PHRASE;
        matched.insert(MatchedField::Description);
    }

    for token in query.scoring_tokens() {
        if fields.title.contains(token) {
            score += SCORE_TITLE_TOKEN;
        }
        if fields.keywords.contains(token) {
            score += SCORE_KEYWORDS_TOKEN;
        }
        if fields.content.contains(token) {
            score += SCORE_CONTENT_TOKEN;
        }
        if fields.description.contains(token) {
            score += SCORE_DESCRIPTION_TOKEN;
        }
    }

    (score, matched)
}

/// Ranks `corpus` against `query` with default options.
pub fn search(corpus: &[SearchableItem], query: &str) -> Vec<SearchResult> {
    search_with(corpus, query, SearchOptions::default())
}

/// Scores every item, drops non-matches and sorts by score (descending),
/// breaking ties alphabetically by title.
///
/// A blank query matches nothing.
pub fn search_with(
    corpus: &[SearchableItem],
    query: &str,
    options: SearchOptions,
) -> Vec<SearchResult> {
    let Some(query) = NormalizedQuery::parse(query) else {
        return Vec::new();
    };
    let first_word = query.words.first().map(String::as_str);

    let mut ranked: Vec<_> = corpus
        .iter()
        .filter_map(|item| {
            let (score, matched_fields) = score_item(item, &query);
            if score == 0 {
                return None;
            }
            let snippet = build_snippet(
                item.content.as_deref(),
                item.description.as_deref(),
                &query.phrase,
                first_word,
                options.snippet_context_chars,
            );
            let result = SearchResult {
                item: item.clone(),
                score,
                matched_fields,
                snippet,
            };
            Some((collation_key(&item.title), result))
        })
        .collect();

    ranked.sort_by(|(ka, a), (kb, b)| b.score.cmp(&a.score).then_with(|| ka.cmp(kb)));
    ranked.into_iter().map(|(_, result)| result).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemSource;

    fn item(title: &str, description: &str, keywords: &str, content: &str) -> SearchableItem {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        SearchableItem {
            title: title.to_string(),
            description: opt(description),
            keywords: opt(keywords),
            content: opt(content),
            url: "#".to_string(),
            source: ItemSource::Catalog,
        }
    }

    fn score(item: &SearchableItem, query: &str) -> u32 {
        score_item(item, &NormalizedQuery::parse(query).unwrap()).0
    }

    #[test]
    fn exact_title_scores_100_plus_token_bonus() {
        // exact +100, token "circular" in title +20, "33" too short
        assert_eq!(score(&item("Circular 33", "", "", ""), "circular 33"), 120);
    }

    #[test]
    fn title_bonuses_do_not_stack() {
        // starts-with +80 only (not +80 +60), token in title +20
        assert_eq!(score(&item("Circular 33", "", "", ""), "circular"), 100);
        // contains +60, token +20
        assert_eq!(score(&item("La Circular 33", "", "", ""), "circular"), 80);
    }

    #[test]
    fn phrase_bonuses_stack_across_fields() {
        let it = item("x", "fril desc", "fril kw", "fril content");
        // keywords 50 + content 30 + description 40 + tokens 15 + 10 + 5
        assert_eq!(score(&it, "fril"), 150);
    }

    #[test]
    fn short_tokens_get_no_token_bonus() {
        let it = item("x", "", "", "el 33");
        // content phrase +30 for "33"; no token bonus because "33" is too short
        assert_eq!(score(&it, "33"), 30);
    }

    #[test]
    fn token_bonus_applies_without_phrase_match() {
        let it = item("Fondo Regional", "", "", "");
        // phrase "regional fondo" misses; tokens "regional" and "fondo" hit the title
        assert_eq!(score(&it, "regional fondo"), 40);
    }

    #[test]
    fn fndr_title_match_outranks_content_only_match() {
        let corpus = vec![
            item("Otro programa", "otra cosa", "", "menciona fndr de pasada"),
            item(
                "Subvenciones para actividades FNDR 8%",
                "Subvenciones para actividades",
                "fndr 8% subvenciones",
                "",
            ),
        ];
        let results = search(&corpus, "fndr");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].item.title, "Subvenciones para actividades FNDR 8%");
        assert!(results[0].score >= 50);
        assert_eq!(results[1].score, 40);
        assert!(results[0]
            .matched_fields
            .contains(&MatchedField::Title));
        assert!(results[0]
            .matched_fields
            .contains(&MatchedField::Keywords));
    }

    #[test]
    fn empty_query_returns_nothing() {
        let corpus = vec![item("Circular 33", "", "", "")];
        assert!(search(&corpus, "").is_empty());
        assert!(search(&corpus, "   ").is_empty());
    }

    #[test]
    fn non_matching_items_are_dropped() {
        let corpus = vec![item("Circular 33", "", "", ""), item("FRIL", "", "", "")];
        let results = search(&corpus, "fril");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].item.title, "FRIL");
    }

    #[test]
    fn ties_are_broken_alphabetically() {
        let corpus = vec![
            item("Zona fondo", "", "", ""),
            item("Área fondo", "", "", ""),
            item("Bosque fondo", "", "", ""),
        ];
        let titles: Vec<_> = search(&corpus, "fondo")
            .into_iter()
            .map(|r| r.item.title)
            .collect();
        assert_eq!(titles, vec!["Área fondo", "Bosque fondo", "Zona fondo"]);
    }

    #[test]
    fn query_is_trimmed_and_lowercased() {
        let query = NormalizedQuery::parse("  FRIL  Maule ").unwrap();
        assert_eq!(query.phrase, "fril  maule");
        assert_eq!(query.words, vec!["fril", "maule"]);
    }

    #[test]
    fn snippet_comes_from_content() {
        let corpus = vec![item("FRIL", "desc", "", "Plataforma digital Maule Pro")];
        let results = search_with(
            &corpus,
            "maule",
            SearchOptions {
                snippet_context_chars: 4,
            },
        );
        assert_eq!(results[0].snippet, "...tal Maule Pro...");
    }
}
