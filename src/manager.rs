//! Orchestration of the two user-facing flows.
//!
//! [`FilterManager`] turns criteria into an ordered, counted program list.
//! [`SearchManager`] turns a free-text query into ranked results, either as a
//! one-shot search or through a debounced [`SearchSession`].

use crate::catalog::Catalog;
use crate::config::ResolvedConfig;
use crate::debounce::{Debouncer, LatestResults, RequestSequencer};
use crate::engine::{filter, sort, FilterCriteria, SearchParams};
use crate::models::{Program, SearchOutcome, SortOrder, StatusCounts};
use crate::render::render_grid;
use crate::search::{search_with, CorpusSource, SearchOptions};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of one filter + sort pass over the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListOutcome {
    pub programs: Vec<Program>,
    pub counts: StatusCounts,
    pub order: SortOrder,
    /// Problems found in the raw criteria; they never abort the pass
    pub warnings: Vec<String>,
}

impl ListOutcome {
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// The card grid for this list as seen at `now`.
    pub fn to_html(&self, now: DateTime<Utc>) -> String {
        render_grid(&self.programs, now)
    }
}

/// Filter, sort and count over a borrowed catalog.
#[derive(Debug, Clone, Copy)]
pub struct FilterManager<'a> {
    catalog: &'a Catalog,
}

impl<'a> FilterManager<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn apply(&self, criteria: &FilterCriteria, order: SortOrder) -> ListOutcome {
        let filtered = filter(self.catalog.programs(), criteria);
        let programs = sort(&filtered, order);
        let counts = StatusCounts::from_programs(&programs);
        info!(
            total = counts.total,
            open = counts.open,
            upcoming = counts.upcoming,
            closed = counts.closed,
            ?order,
            "Filtered catalog"
        );
        ListOutcome {
            programs,
            counts,
            order,
            warnings: Vec::new(),
        }
    }

    /// Applies raw portal parameters. Invalid values are logged, reported in
    /// [`ListOutcome::warnings`] and otherwise ignored.
    pub fn apply_params(&self, params: &SearchParams) -> ListOutcome {
        let warnings = params.validate();
        for warning in &warnings {
            warn!(warning = warning.as_str(), "Ignoring invalid search parameter");
        }
        let mut outcome = self.apply(&params.criteria(), params.order());
        outcome.warnings = warnings;
        outcome
    }
}

/// Limits for the search-as-you-type path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RealtimeLimits {
    pub min_query_chars: usize,
    pub max_results: usize,
}

impl Default for RealtimeLimits {
    fn default() -> Self {
        Self {
            min_query_chars: 2,
            max_results: 5,
        }
    }
}

/// Scores queries against a corpus source.
///
/// The corpus is rebuilt on every search so freshly rendered page cards are
/// always included. A corpus failure becomes [`SearchOutcome::Failed`].
pub struct SearchManager<'a> {
    corpus: &'a dyn CorpusSource,
    options: SearchOptions,
    realtime: RealtimeLimits,
}

impl<'a> SearchManager<'a> {
    pub fn new(corpus: &'a dyn CorpusSource) -> Self {
        Self {
            corpus,
            options: SearchOptions::default(),
            realtime: RealtimeLimits::default(),
        }
    }

    pub fn with_config(mut self, config: &ResolvedConfig) -> Self {
        self.options.snippet_context_chars = config.snippet_context_chars;
        self.realtime = RealtimeLimits {
            min_query_chars: config.realtime_min_query_len,
            max_results: config.realtime_max_results,
        };
        self
    }

    pub fn realtime_limits(&self) -> RealtimeLimits {
        self.realtime
    }

    /// Runs a search, showing at most `limit` results when given.
    pub fn run(&self, query: &str, limit: Option<usize>) -> SearchOutcome {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return SearchOutcome::EmptyQuery;
        }

        let corpus = match self.corpus.items() {
            Ok(items) => items,
            Err(e) => {
                warn!(query = trimmed, error = %e, "Search failed");
                return SearchOutcome::Failed {
                    message: e.to_string(),
                };
            }
        };

        let results = search_with(&corpus, trimmed, self.options);
        debug!(
            query = trimmed,
            corpus = corpus.len(),
            results = results.len(),
            "Search completed"
        );
        if results.is_empty() {
            return SearchOutcome::NoMatches {
                query: trimmed.to_string(),
            };
        }

        let shown = limit.map_or(results.len(), |n| n.min(results.len()));
        SearchOutcome::Results {
            query: trimmed.to_string(),
            results,
            shown,
        }
    }

    /// Search-as-you-type: short queries show nothing and results are capped.
    pub fn run_realtime(&self, query: &str) -> SearchOutcome {
        if query.trim().chars().count() < self.realtime.min_query_chars {
            return SearchOutcome::EmptyQuery;
        }
        self.run(query, Some(self.realtime.max_results))
    }
}

/// One search box: debounced typing plus explicit submission.
///
/// Typing goes through the debouncer and the realtime path; submitting runs a
/// full search immediately and drops any pending keystrokes. Every search gets
/// a request id so an older completion can never replace a newer one.
pub struct SearchSession<'a> {
    manager: SearchManager<'a>,
    debouncer: Debouncer<String>,
    sequencer: RequestSequencer,
    latest: LatestResults<SearchOutcome>,
}

impl<'a> SearchSession<'a> {
    pub fn new(manager: SearchManager<'a>, debounce_ms: u64) -> Self {
        Self {
            manager,
            debouncer: Debouncer::from_millis(debounce_ms),
            sequencer: RequestSequencer::new(),
            latest: LatestResults::new(),
        }
    }

    /// Records a keystroke; nothing is searched until the input goes quiet.
    pub fn on_input(&mut self, query: impl Into<String>, now: Instant) {
        self.debouncer.trigger(query.into(), now);
    }

    /// Runs the pending realtime search if its quiet window has passed.
    /// Returns the new outcome when one was produced.
    pub fn tick(&mut self, now: Instant) -> Option<&SearchOutcome> {
        let query = self.debouncer.poll(now)?;
        let id = self.sequencer.next_id();
        let outcome = self.manager.run_realtime(&query);
        self.complete(id, outcome)
    }

    /// Explicit submission (Enter): full, unlimited search right away.
    pub fn submit(&mut self, query: &str) -> Option<&SearchOutcome> {
        self.debouncer.cancel();
        let id = self.sequencer.next_id();
        let outcome = self.manager.run(query, None);
        self.complete(id, outcome)
    }

    /// Starts a request whose result is delivered later through
    /// [`SearchSession::complete`].
    pub fn begin_request(&mut self) -> u64 {
        self.sequencer.next_id()
    }

    /// Delivers the outcome of request `id`; stale outcomes are dropped.
    pub fn complete(&mut self, id: u64, outcome: SearchOutcome) -> Option<&SearchOutcome> {
        if self.latest.offer(id, outcome) {
            self.latest.get()
        } else {
            debug!(request = id, newest = self.latest.accepted_id(), "Dropped stale search result");
            None
        }
    }

    pub fn current(&self) -> Option<&SearchOutcome> {
        self.latest.get()
    }

    pub fn manager(&self) -> &SearchManager<'a> {
        &self.manager
    }
}
