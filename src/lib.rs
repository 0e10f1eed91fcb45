//! grants-cli library
//!
//! This crate provides the core functionality for the `grants-cli` binary: a
//! catalog of regional public funding programs that can be filtered, sorted,
//! searched and rendered as program cards.
//!
//! ## Overview
//!
//! - [`catalog`] - Immutable program snapshot, built-in or loaded from TOML
//! - [`engine`] - Pure filtering and sorting, Spanish collation and URL parameters
//! - [`search`] - Corpus building (catalog plus on-page cards), scoring and snippets
//! - [`render`] - Program cards, deadline badges and search result lists
//! - [`debounce`] - Debounce gate and request sequencing for search-as-you-type
//! - [`manager`] - Orchestration of the list and search flows
//! - [`cli`] - Command-line interface
//! - [`config`] - Resolved settings and TOML run files
//! - [`models`] - Data structures shared by every module
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! ```no_run
//! use grants_cli::catalog::Catalog;
//! use grants_cli::engine::SearchParams;
//! use grants_cli::manager::{FilterManager, SearchManager};
//! use grants_cli::errors::AppResult;
//!
//! # fn example() -> AppResult<()> {
//! let catalog = Catalog::builtin()?;
//!
//! let params = SearchParams::from_query_string("estado=closed&orden=alpha");
//! let listed = FilterManager::new(&catalog).apply_params(&params);
//! println!("{} closed programs", listed.counts.closed);
//!
//! let outcome = SearchManager::new(&catalog).run("fndr 8%", Some(5));
//! println!("{} results", outcome.total());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod debounce;
pub mod engine;
pub mod errors;
pub mod manager;
pub mod models;
pub mod render;
pub mod search;
pub mod utils;
