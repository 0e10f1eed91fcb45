//! Free-text search over catalog programs and on-page program cards.
//!
//! Scoring is a weighted multi-field substring match: no stemming and no term
//! frequencies. The main entry points are [`search`] and [`search_with`];
//! corpora are assembled through [`CorpusSource`].

mod corpus;
mod page;
mod scoring;
mod snippet;

// Re-export public API
pub use corpus::{build_corpus, CorpusSource, MergedCorpus, PageSource};
pub use page::extract_cards;
pub use scoring::{score_item, search, search_with, NormalizedQuery, SearchOptions};
pub use snippet::build_snippet;
