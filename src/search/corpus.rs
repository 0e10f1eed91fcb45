use super::page::extract_cards;
use crate::catalog::Catalog;
use crate::errors::AppResult;
use crate::models::SearchableItem;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use url::Url;

/// Anything that can produce the items a query is matched against.
pub trait CorpusSource {
    fn items(&self) -> AppResult<Vec<SearchableItem>>;
}

impl CorpusSource for Catalog {
    fn items(&self) -> AppResult<Vec<SearchableItem>> {
        Ok(self.searchable_items())
    }
}

#[derive(Debug, Clone)]
enum PageOrigin {
    Inline(String),
    File(PathBuf),
}

/// Program cards found on a rendered page.
///
/// The file and base URL are only read and parsed inside
/// [`CorpusSource::items`], once per search.
#[derive(Debug, Clone)]
pub struct PageSource {
    origin: PageOrigin,
    base_url: String,
}

impl PageSource {
    /// A page already held in memory.
    pub fn from_html(html: impl Into<String>, base_url: &str) -> Self {
        Self {
            origin: PageOrigin::Inline(html.into()),
            base_url: base_url.to_string(),
        }
    }

    /// A page read from disk on every search.
    pub fn from_file(path: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            origin: PageOrigin::File(path.into()),
            base_url: base_url.to_string(),
        }
    }
}

impl CorpusSource for PageSource {
    fn items(&self) -> AppResult<Vec<SearchableItem>> {
        let base_url = Url::parse(&self.base_url)?;
        match &self.origin {
            PageOrigin::Inline(html) => extract_cards(html, &base_url),
            PageOrigin::File(path) => extract_cards(&fs::read_to_string(path)?, &base_url),
        }
    }
}

/// On-page cards first, then the catalog, de-duplicated by title.
pub struct MergedCorpus<'a> {
    pub page: Option<&'a dyn CorpusSource>,
    pub catalog: &'a dyn CorpusSource,
}

impl CorpusSource for MergedCorpus<'_> {
    fn items(&self) -> AppResult<Vec<SearchableItem>> {
        let page_items = match self.page {
            Some(page) => page.items()?,
            None => Vec::new(),
        };
        Ok(build_corpus(page_items, self.catalog.items()?))
    }
}

/// Concatenates both sources, keeping the first item seen for each exact title.
pub fn build_corpus(
    page_items: Vec<SearchableItem>,
    catalog_items: Vec<SearchableItem>,
) -> Vec<SearchableItem> {
    let mut seen = HashSet::new();
    page_items
        .into_iter()
        .chain(catalog_items)
        .filter(|item| seen.insert(item.title.clone()))
        .collect()
}
