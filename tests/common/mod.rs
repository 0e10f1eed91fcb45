//! Common test utilities for integration tests

use chrono::{DateTime, TimeZone, Utc};
use grants_cli::catalog::Catalog;
use grants_cli::models::{BeneficiaryGroup, Program, ProgramStatus};
use std::fs;
use std::path::{Path, PathBuf};

/// Reference time used by every deadline assertion: 2025-11-25 00:00 UTC.
#[allow(dead_code)]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 25, 0, 0, 0).unwrap()
}

/// Program with the given identity and every optional field empty
#[allow(dead_code)]
pub fn program(
    name: &str,
    benef_group: BeneficiaryGroup,
    status: ProgramStatus,
    close_date: Option<&str>,
) -> Program {
    Program {
        name: name.to_string(),
        benef_group,
        status,
        close_date: close_date.map(str::to_string),
        region: "Regional".to_string(),
        beneficiary_description: String::new(),
        date_range_text: String::new(),
        amount_text: String::new(),
        detail_url: "#".to_string(),
        has_deadline_badge: close_date.is_some(),
        deadline_is_urgent: false,
        subtitle: None,
        description: None,
        keywords: None,
        content: None,
    }
}

/// Small catalog exercising every status and a missing close date
#[allow(dead_code)]
pub fn sample_catalog() -> Catalog {
    Catalog::new(vec![
        program(
            "Zapallo Comunitario",
            BeneficiaryGroup::Organizations,
            ProgramStatus::Closed,
            None,
        ),
        program(
            "Ñandú Productivo",
            BeneficiaryGroup::Companies,
            ProgramStatus::Upcoming,
            Some("2026-01-10"),
        ),
        program(
            "Alerce Municipal",
            BeneficiaryGroup::Municipalities,
            ProgramStatus::Open,
            Some("2025-11-27"),
        ),
        program(
            "Nogal Vecinal",
            BeneficiaryGroup::Organizations,
            ProgramStatus::Open,
            Some("2025-12-20"),
        ),
    ])
    .unwrap()
}

/// Sample catalog file in the on-disk TOML format
#[allow(dead_code)]
pub const SAMPLE_CATALOG_TOML: &str = r#"
[[program]]
name = "Fondo Vecinal"
benef_group = "organizations"
status = "open"
close_date = "2025-12-01"
has_deadline_badge = true
keywords = "vecinos barrio"

[[program]]
name = "Apoyo Pyme"
benef_group = "companies"
status = "closed"
"#;

/// Writes `contents` to `dir/name`, creating parents, and returns the path
#[allow(dead_code)]
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}
