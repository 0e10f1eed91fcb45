use crate::constants::*;
use crate::utils::parse_close_date;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Publication status of a funding call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum ProgramStatus {
    Open,
    Upcoming,
    Closed,
    /// Any status value the catalog does not recognize.
    Unknown,
}

impl ProgramStatus {
    /// Parses a status or one of its aliases, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        let lower = value.trim().to_lowercase();
        if OPEN_ALIASES.contains(&lower.as_str()) {
            Some(Self::Open)
        } else if UPCOMING_ALIASES.contains(&lower.as_str()) {
            Some(Self::Upcoming)
        } else if CLOSED_ALIASES.contains(&lower.as_str()) {
            Some(Self::Closed)
        } else {
            None
        }
    }

    /// Ordering weight used by the `openFirst` and `relevance` sort orders.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Open => 3,
            Self::Upcoming => 2,
            Self::Closed => 1,
            Self::Unknown => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Upcoming => "upcoming",
            Self::Closed => "closed",
            Self::Unknown => "unknown",
        }
    }
}

impl From<&str> for ProgramStatus {
    fn from(value: &str) -> Self {
        Self::parse(value).unwrap_or(Self::Unknown)
    }
}

impl From<String> for ProgramStatus {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl fmt::Display for ProgramStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who may apply to a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", rename_all = "camelCase")]
pub enum BeneficiaryGroup {
    Municipalities,
    Organizations,
    PublicServices,
    Companies,
    Individuals,
}

impl BeneficiaryGroup {
    /// Parses a beneficiary group or one of its aliases, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        let lower = value.trim().to_lowercase();
        let lower = lower.as_str();
        if MUNICIPALITIES_ALIASES.contains(&lower) {
            Some(Self::Municipalities)
        } else if ORGANIZATIONS_ALIASES.contains(&lower) {
            Some(Self::Organizations)
        } else if PUBLIC_SERVICES_ALIASES.contains(&lower) {
            Some(Self::PublicServices)
        } else if COMPANIES_ALIASES.contains(&lower) {
            Some(Self::Companies)
        } else if INDIVIDUALS_ALIASES.contains(&lower) {
            Some(Self::Individuals)
        } else {
            None
        }
    }

    /// Canonical identifier, as written in catalog files.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Municipalities => "municipalities",
            Self::Organizations => "organizations",
            Self::PublicServices => "publicServices",
            Self::Companies => "companies",
            Self::Individuals => "individuals",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Municipalities => "Municipalities",
            Self::Organizations => "Organizations",
            Self::PublicServices => "Public services",
            Self::Companies => "Companies",
            Self::Individuals => "Individuals",
        }
    }
}

impl TryFrom<String> for BeneficiaryGroup {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown beneficiary group '{value}'"))
    }
}

/// Sort order applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    #[default]
    Relevance,
    OpenFirst,
    Date,
    Alphabetical,
}

impl SortOrder {
    /// Parses a sort order alias; `None` when the value is not recognized.
    pub fn parse(value: &str) -> Option<Self> {
        let lower = value.trim().to_lowercase();
        let lower = lower.as_str();
        if RELEVANCE_ALIASES.contains(&lower) {
            Some(Self::Relevance)
        } else if OPEN_FIRST_ALIASES.contains(&lower) {
            Some(Self::OpenFirst)
        } else if DATE_ALIASES.contains(&lower) {
            Some(Self::Date)
        } else if ALPHABETICAL_ALIASES.contains(&lower) {
            Some(Self::Alphabetical)
        } else {
            None
        }
    }
}

impl From<&str> for SortOrder {
    fn from(value: &str) -> Self {
        // Unrecognized orders fall back to relevance; callers log if needed.
        Self::parse(value).unwrap_or_default()
    }
}

/// One funding program of the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Program {
    pub name: String,
    pub benef_group: BeneficiaryGroup,
    pub status: ProgramStatus,
    /// Raw close date as written in the catalog (`YYYY-MM-DD` or RFC 3339)
    #[serde(default)]
    pub close_date: Option<String>,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub beneficiary_description: String,
    #[serde(default)]
    pub date_range_text: String,
    #[serde(default)]
    pub amount_text: String,
    #[serde(default = "default_detail_url")]
    pub detail_url: String,
    #[serde(default)]
    pub has_deadline_badge: bool,
    /// Advisory only; urgency shown on cards is recomputed from `close_date`.
    #[serde(default)]
    pub deadline_is_urgent: bool,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

fn default_region() -> String {
    "Regional".to_string()
}

fn default_detail_url() -> String {
    "#".to_string()
}

impl Program {
    /// Parsed close date; `None` when absent, blank or unparseable.
    pub fn close_datetime(&self) -> Option<DateTime<Utc>> {
        self.close_date.as_deref().and_then(parse_close_date)
    }
}

/// Result counters shown next to a result list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    pub open: usize,
    pub upcoming: usize,
    pub closed: usize,
}

impl StatusCounts {
    pub fn from_programs(programs: &[Program]) -> Self {
        programs.iter().fold(
            Self {
                total: programs.len(),
                ..Self::default()
            },
            |mut counts, program| {
                match program.status {
                    ProgramStatus::Open => counts.open += 1,
                    ProgramStatus::Upcoming => counts.upcoming += 1,
                    ProgramStatus::Closed => counts.closed += 1,
                    ProgramStatus::Unknown => {}
                }
                counts
            },
        )
    }
}

/// Where a searchable item came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemSource {
    Page,
    Catalog,
}

/// Flattened text fields a search query is matched against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchableItem {
    pub title: String,
    pub description: Option<String>,
    pub keywords: Option<String>,
    pub content: Option<String>,
    pub url: String,
    pub source: ItemSource,
}

/// Field of a [`SearchableItem`] that matched the full query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchedField {
    Title,
    Keywords,
    Content,
    Description,
}

/// Ranked search hit. Created per query and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub item: SearchableItem,
    pub score: u32,
    pub matched_fields: BTreeSet<MatchedField>,
    pub snippet: String,
}

/// What a search interaction ended with. Each variant maps to a distinct
/// display state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SearchOutcome {
    /// Query was blank; nothing was searched
    EmptyQuery,
    NoMatches {
        query: String,
    },
    Results {
        query: String,
        results: Vec<SearchResult>,
        /// How many of `results` to display; equals `results.len()` when unlimited
        shown: usize,
    },
    /// Building the corpus or scoring failed
    Failed {
        message: String,
    },
}

impl SearchOutcome {
    pub fn total(&self) -> usize {
        match self {
            Self::Results { results, .. } => results.len(),
            _ => 0,
        }
    }

    /// Results left out by a top-N limit.
    pub fn hidden(&self) -> usize {
        match self {
            Self::Results { results, shown, .. } => results.len().saturating_sub(*shown),
            _ => 0,
        }
    }
}
