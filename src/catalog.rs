//! Immutable snapshot of the program catalog.
//!
//! The catalog is loaded once (from the built-in data or a TOML file) and then
//! passed by reference to every component that needs it.

use crate::constants::BUILTIN_CATALOG;
use crate::errors::{AppError, AppResult};
use crate::models::{
    BeneficiaryGroup, ItemSource, Program, ProgramStatus, SearchableItem,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    program: Vec<Program>,
}

/// Read-only list of programs, in publication order.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    programs: Vec<Program>,
}

impl Catalog {
    /// Builds a catalog from already-parsed programs.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if two programs share a name.
    pub fn new(programs: Vec<Program>) -> AppResult<Self> {
        let mut seen = HashSet::with_capacity(programs.len());
        for program in &programs {
            if !seen.insert(program.name.as_str()) {
                return Err(AppError::CatalogError(format!(
                    "duplicate program name '{}'",
                    program.name
                )));
            }
            if matches!(program.status, ProgramStatus::Open | ProgramStatus::Upcoming)
                && program.close_datetime().is_none()
            {
                warn!(
                    program = program.name.as_str(),
                    status = %program.status,
                    "Active program has no usable close date"
                );
            }
        }
        Ok(Self { programs })
    }

    /// The catalog shipped with the binary.
    pub fn builtin() -> AppResult<Self> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Parses a catalog from TOML text containing `[[program]]` tables.
    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        let file: CatalogFile = toml::from_str(contents)
            .map_err(|e| AppError::ParseError(format!("Failed to parse catalog: {e}")))?;
        debug!(programs = file.program.len(), "Catalog parsed");
        Self::new(file.program)
    }

    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Loads the catalog at `path`, or the built-in one when no path is given.
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        match path {
            Some(p) => Self::from_toml_file(p),
            None => Self::builtin(),
        }
    }

    pub fn programs(&self) -> &[Program] {
        &self.programs
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Program> {
        self.programs.iter().find(|p| p.name == name)
    }

    pub fn by_status(&self, status: ProgramStatus) -> Vec<&Program> {
        self.programs.iter().filter(|p| p.status == status).collect()
    }

    pub fn by_benef_group(&self, group: BeneficiaryGroup) -> Vec<&Program> {
        self.programs
            .iter()
            .filter(|p| p.benef_group == group)
            .collect()
    }

    /// Search corpus entries derived from the catalog, in catalog order.
    pub fn searchable_items(&self) -> Vec<SearchableItem> {
        self.programs.iter().map(SearchableItem::from).collect()
    }
}

fn status_phrase(status: ProgramStatus) -> &'static str {
    match status {
        ProgramStatus::Open => "Open program",
        ProgramStatus::Closed => "Closed program",
        ProgramStatus::Upcoming | ProgramStatus::Unknown => "Upcoming program",
    }
}

impl From<&Program> for SearchableItem {
    fn from(program: &Program) -> Self {
        let description = program
            .description
            .clone()
            .or_else(|| program.subtitle.clone())
            .unwrap_or_else(|| status_phrase(program.status).to_string());
        Self {
            title: program.name.clone(),
            description: Some(description),
            keywords: program.keywords.clone(),
            content: program.content.clone(),
            url: program.detail_url.clone(),
            source: ItemSource::Catalog,
        }
    }
}
