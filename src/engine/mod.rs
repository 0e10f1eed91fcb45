//! Filtering and ordering of catalog programs.
//!
//! Both engines are pure: they take a slice, return a new vector and never
//! touch their input. The main entry points are [`filter`] and [`sort`].

pub mod collation;
mod filter;
mod params;
mod sort;

// Re-export public API
pub use filter::{filter, FilterCriteria};
pub use params::SearchParams;
pub use sort::sort;
