//! Excerpts shown under a search hit.

const ELLIPSIS: &str = "...";

/// Lowercases character by character so indices line up with the original.
fn fold(text: &str) -> Vec<char> {
    text.chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}

fn find_chars(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Cuts `context` characters on each side of the first match of `needle`.
fn excerpt(content: &str, needle: &str, context: usize) -> Option<String> {
    let original: Vec<char> = content.chars().collect();
    let needle = fold(needle);
    let index = find_chars(&fold(content), &needle)?;
    let start = index.saturating_sub(context);
    let end = (index + needle.len() + context).min(original.len());
    let middle: String = original[start..end].iter().collect();
    Some(format!("{ELLIPSIS}{middle}{ELLIPSIS}"))
}

/// Builds the snippet for one item.
///
/// Tries the full normalized query inside `content`, then the first query
/// token, and finally falls back to the description (or an empty string).
pub fn build_snippet(
    content: Option<&str>,
    description: Option<&str>,
    query: &str,
    first_token: Option<&str>,
    context: usize,
) -> String {
    if let Some(content) = content.filter(|c| !c.is_empty()) {
        if let Some(snippet) = excerpt(content, query, context) {
            return snippet;
        }
        if let Some(snippet) = first_token.and_then(|t| excerpt(content, t, context)) {
            return snippet;
        }
    }
    description.unwrap_or_default().to_string()
}
