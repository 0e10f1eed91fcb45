use super::html::HtmlWriter;
use crate::models::{SearchOutcome, SearchResult};
use crate::utils::plural_suffix;

const EMPTY_QUERY_MESSAGE: &str = "Please enter a search term.";
const FAILED_MESSAGE: &str = "An error occurred while searching. Please try again.";
const TRY_AGAIN_HINT: &str = "Try different search terms";

fn count_line(count: usize) -> String {
    format!("Found {count} result{}", plural_suffix(count))
}

fn more_line(remaining: usize) -> String {
    format!("And {remaining} more result{}.", plural_suffix(remaining))
}

/// The snippet is only worth showing when it adds something beyond the description.
fn distinct_snippet(result: &SearchResult) -> Option<&str> {
    let description = result.item.description.as_deref().unwrap_or_default();
    (!result.snippet.is_empty() && result.snippet != description).then_some(result.snippet.as_str())
}

fn write_result(w: &mut HtmlWriter, result: &SearchResult) {
    w.open(
        "a",
        &[
            ("href", result.item.url.as_str()),
            ("class", "d-block p-3 mb-2 program-search-result"),
        ],
    );
    w.element("h3", &[("class", "h6 fw-bold mb-1")], &result.item.title);
    if let Some(snippet) = distinct_snippet(result) {
        w.open("p", &[("class", "text-muted small mb-1")]);
        w.element("em", &[], snippet);
        w.close("p");
    }
    w.element(
        "p",
        &[("class", "text-muted small mb-0")],
        result.item.description.as_deref().unwrap_or_default(),
    );
    w.close("a");
}

/// Renders a search outcome as an HTML fragment.
pub fn outcome_to_html(outcome: &SearchOutcome) -> String {
    let mut w = HtmlWriter::new();
    w.open("div", &[("class", "search-results")]);
    match outcome {
        SearchOutcome::EmptyQuery => {
            w.element("p", &[("class", "text-muted empty-state")], EMPTY_QUERY_MESSAGE);
        }
        SearchOutcome::NoMatches { query } => {
            w.open("p", &[("class", "text-muted empty-state")]);
            w.text("No results found for \"");
            w.element("strong", &[], query);
            w.text("\"");
            w.close("p");
            w.element("p", &[("class", "text-muted small")], TRY_AGAIN_HINT);
        }
        SearchOutcome::Failed { .. } => {
            w.element("p", &[("class", "text-warning error-state")], FAILED_MESSAGE);
        }
        SearchOutcome::Results {
            results, shown, ..
        } => {
            w.element(
                "p",
                &[("class", "text-muted small mb-0")],
                &count_line(results.len()),
            );
            for result in results.iter().take(*shown) {
                write_result(&mut w, result);
            }
            if outcome.hidden() > 0 {
                w.element(
                    "p",
                    &[("class", "text-muted small text-center mt-2")],
                    &more_line(outcome.hidden()),
                );
            }
        }
    }
    w.close("div");
    w.finish()
}

/// Renders a search outcome for a terminal.
pub fn outcome_to_text(outcome: &SearchOutcome) -> String {
    let mut lines = Vec::new();
    match outcome {
        SearchOutcome::EmptyQuery => lines.push(EMPTY_QUERY_MESSAGE.to_string()),
        SearchOutcome::NoMatches { query } => {
            lines.push(format!("No results found for \"{query}\""));
            lines.push(TRY_AGAIN_HINT.to_string());
        }
        SearchOutcome::Failed { .. } => lines.push(FAILED_MESSAGE.to_string()),
        SearchOutcome::Results {
            results, shown, ..
        } => {
            lines.push(count_line(results.len()));
            for result in results.iter().take(*shown) {
                lines.push(format!(
                    "[{:>3}] {}  ({})",
                    result.score, result.item.title, result.item.url
                ));
                if let Some(snippet) = distinct_snippet(result) {
                    lines.push(format!("      {snippet}"));
                }
                if let Some(description) = result.item.description.as_deref() {
                    lines.push(format!("      {description}"));
                }
            }
            if outcome.hidden() > 0 {
                lines.push(more_line(outcome.hidden()));
            }
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemSource, SearchableItem};
    use std::collections::BTreeSet;

    fn result(title: &str, snippet: &str) -> SearchResult {
        SearchResult {
            item: SearchableItem {
                title: title.to_string(),
                description: Some("desc".to_string()),
                keywords: None,
                content: None,
                url: "pages/x.html".to_string(),
                source: ItemSource::Catalog,
            },
            score: 80,
            matched_fields: BTreeSet::new(),
            snippet: snippet.to_string(),
        }
    }

    #[test]
    fn empty_states_are_distinct() {
        let empty = outcome_to_text(&SearchOutcome::EmptyQuery);
        let none = outcome_to_text(&SearchOutcome::NoMatches {
            query: "xyz".into(),
        });
        let failed = outcome_to_text(&SearchOutcome::Failed {
            message: "boom".into(),
        });
        assert!(empty.contains("enter a search term"));
        assert!(none.contains("No results found for \"xyz\""));
        assert!(failed.contains("error occurred"));
        assert_ne!(none, failed);
    }

    #[test]
    fn truncated_results_announce_the_rest() {
        let outcome = SearchOutcome::Results {
            query: "fondo".into(),
            results: vec![result("A", "desc"), result("B", "desc"), result("C", "desc")],
            shown: 1,
        };
        let text = outcome_to_text(&outcome);
        assert!(text.starts_with("Found 3 results"));
        assert!(text.contains("And 2 more results."));
        assert!(!text.contains("] B"));
    }

    #[test]
    fn single_result_is_singular() {
        let outcome = SearchOutcome::Results {
            query: "a".into(),
            results: vec![result("A", "desc")],
            shown: 1,
        };
        assert!(outcome_to_text(&outcome).starts_with("Found 1 result\n"));
    }

    #[test]
    fn snippet_equal_to_description_is_not_repeated() {
        let outcome = SearchOutcome::Results {
            query: "a".into(),
            results: vec![result("A", "desc")],
            shown: 1,
        };
        assert!(!outcome_to_html(&outcome).contains("<em>"));

        let outcome = SearchOutcome::Results {
            query: "a".into(),
            results: vec![result("A", "...context...")],
            shown: 1,
        };
        assert!(outcome_to_html(&outcome).contains("<em>...context...</em>"));
    }

    #[test]
    fn html_query_is_escaped_in_no_match_state() {
        let html = outcome_to_html(&SearchOutcome::NoMatches {
            query: "<img src=x>".into(),
        });
        assert!(html.contains("<strong>&lt;img src=x&gt;</strong>"));
    }
}
