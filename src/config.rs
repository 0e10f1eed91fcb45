use crate::engine::SearchParams;
use crate::errors::{AppError, AppResult};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolved configuration with all values filled in (no Options except the
/// catalog path, where `None` means the built-in catalog).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolvedConfig {
    /// TOML catalog to load instead of the built-in one
    pub catalog_path: Option<PathBuf>,
    /// Quiet window before a typed query is searched
    pub debounce_ms: u64,
    /// Results shown while typing
    pub realtime_max_results: usize,
    /// Shorter queries show nothing while typing
    pub realtime_min_query_len: usize,
    /// Characters of context on each side of a snippet match
    pub snippet_context_chars: usize,
    /// Base URL relative card links are resolved against
    pub site_base_url: String,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            debounce_ms: 300,
            realtime_max_results: 5,
            realtime_min_query_len: 2,
            snippet_context_chars: 50,
            site_base_url: "http://localhost:8000/".to_string(),
        }
    }
}

/// A saved `list` run loaded from a TOML file.
///
/// Run fields are raw strings, validated the same way as URL parameters. The
/// parser rejects unknown keys to catch typos, and validates that
/// `debounce_ms` and `realtime_max_results` are greater than 0.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolvedConfigFile {
    #[serde(default)]
    pub query: Option<String>,
    /// `open`, `upcoming`, `closed` or an alias
    #[serde(default)]
    pub status: Option<String>,
    /// Beneficiary group code or alias
    #[serde(default)]
    pub benef: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    /// `relevance`, `openfirst`, `date` or `alpha`
    #[serde(default)]
    pub order: Option<String>,
    /// Reference time for deadline badges (`YYYY-MM-DD` or RFC 3339)
    #[serde(default)]
    pub now: Option<String>,
    /// Flattened resolved configuration with defaults
    #[serde(flatten)]
    pub resolved: ResolvedConfig,
}

impl ResolvedConfigFile {
    /// Loads and validates a run file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the TOML is malformed, unknown keys are
    /// present, or `debounce_ms`/`realtime_max_results` are zero.
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)?;
        let config: ResolvedConfigFile = toml::from_str(&contents)
            .map_err(|e| AppError::InvalidInput(format!("Failed to parse config: {e}")))?;

        if config.resolved.debounce_ms == 0 {
            return Err(AppError::InvalidInput(
                "Debounce delay must be greater than 0".into(),
            ));
        }
        if config.resolved.realtime_max_results == 0 {
            return Err(AppError::InvalidInput(
                "Realtime result count must be greater than 0".into(),
            ));
        }

        Ok(config)
    }

    /// The run fields as raw search parameters.
    pub fn search_params(&self) -> SearchParams {
        let field = |value: &Option<String>| value.clone().unwrap_or_default();
        SearchParams {
            q: field(&self.query),
            estado: field(&self.status),
            benef: field(&self.benef),
            orden: field(&self.order),
            region: field(&self.region),
        }
    }
}
