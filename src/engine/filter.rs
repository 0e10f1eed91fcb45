use crate::constants::REGIONAL_SCOPE;
use crate::models::{BeneficiaryGroup, Program, ProgramStatus};

/// Criteria for narrowing the catalog. Every field is optional and all set
/// fields must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the program name
    pub query: Option<String>,
    pub status: Option<ProgramStatus>,
    pub benef_group: Option<BeneficiaryGroup>,
    /// Case-insensitive exact region; `"regional"` matches everything
    pub region: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_status(mut self, status: ProgramStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_benef_group(mut self, group: BeneficiaryGroup) -> Self {
        self.benef_group = Some(group);
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Check if any criterion actually narrows the result set
    pub fn is_empty(&self) -> bool {
        self.normalized_query().is_none()
            && self.status.is_none()
            && self.benef_group.is_none()
            && self.normalized_region().is_none()
    }

    fn normalized_query(&self) -> Option<String> {
        self.query
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty())
    }

    fn normalized_region(&self) -> Option<String> {
        self.region
            .as_deref()
            .map(|r| r.trim().to_lowercase())
            .filter(|r| !r.is_empty() && r != REGIONAL_SCOPE)
    }

    /// Check whether a single program passes every criterion
    pub fn matches(&self, program: &Program) -> bool {
        self.matches_normalized(
            program,
            self.normalized_query().as_deref(),
            self.normalized_region().as_deref(),
        )
    }

    fn matches_normalized(
        &self,
        program: &Program,
        query: Option<&str>,
        region: Option<&str>,
    ) -> bool {
        if let Some(q) = query {
            if !program.name.to_lowercase().contains(q) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if program.status != status {
                return false;
            }
        }
        if let Some(group) = self.benef_group {
            if program.benef_group != group {
                return false;
            }
        }
        if let Some(r) = region {
            if program.region.to_lowercase() != r {
                return false;
            }
        }
        true
    }
}

/// Returns the programs that satisfy `criteria`, preserving input order.
///
/// The input slice is never modified; an empty slice yields an empty vector.
pub fn filter(programs: &[Program], criteria: &FilterCriteria) -> Vec<Program> {
    let query = criteria.normalized_query();
    let region = criteria.normalized_region();
    programs
        .iter()
        .filter(|p| criteria.matches_normalized(p, query.as_deref(), region.as_deref()))
        .cloned()
        .collect()
}
