use super::deadline::{program_deadline, DeadlineInfo};
use super::html::HtmlWriter;
use crate::models::{Program, ProgramStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Text and CSS class of the status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub text: &'static str,
    pub class: &'static str,
}

impl StatusBadge {
    /// Unrecognized statuses get the closed presentation.
    pub fn for_status(status: ProgramStatus) -> Self {
        match status {
            ProgramStatus::Open => Self {
                text: "Open",
                class: "status-badge-open",
            },
            ProgramStatus::Upcoming => Self {
                text: "Upcoming",
                class: "status-badge-upcoming",
            },
            ProgramStatus::Closed | ProgramStatus::Unknown => Self {
                text: "Closed",
                class: "status-badge-closed",
            },
        }
    }
}

/// One labeled line in the card body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InfoRow {
    pub icon: &'static str,
    pub label: &'static str,
    pub value: String,
}

/// Display-ready card, independent of any output format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub title: String,
    pub subtitle: Option<String>,
    pub status: ProgramStatus,
    pub benef_code: &'static str,
    pub close_date: String,
    pub status_badge: StatusBadge,
    /// Present only when the program wants a countdown and one is visible
    pub deadline: Option<DeadlineInfo>,
    pub rows: Vec<InfoRow>,
    pub details_url: String,
}

/// Builds the card for `program` as seen at `now`.
pub fn render(program: &Program, now: DateTime<Utc>) -> CardView {
    let deadline = program
        .has_deadline_badge
        .then(|| program_deadline(program, now))
        .filter(|info| info.visible);

    CardView {
        title: program.name.clone(),
        subtitle: program.subtitle.clone().filter(|s| !s.trim().is_empty()),
        status: program.status,
        benef_code: program.benef_group.code(),
        close_date: program.close_date.clone().unwrap_or_default(),
        status_badge: StatusBadge::for_status(program.status),
        deadline,
        rows: vec![
            InfoRow {
                icon: "bi-people-fill",
                label: "Beneficiaries:",
                value: program.beneficiary_description.clone(),
            },
            InfoRow {
                icon: "bi-calendar-event",
                label: "Dates:",
                value: program.date_range_text.clone(),
            },
            InfoRow {
                icon: "bi-cash-stack",
                label: "Amounts:",
                value: program.amount_text.clone(),
            },
        ],
        details_url: program.detail_url.clone(),
    }
}

impl CardView {
    /// Writes the card as a grid column. All program text is escaped.
    pub fn write_html(&self, w: &mut HtmlWriter) {
        let badge_class = format!("program-card-status-badge {}", self.status_badge.class);

        w.open(
            "div",
            &[
                ("class", "col-12 col-md-6 col-lg-3"),
                ("data-program", ""),
                ("data-name", self.title.as_str()),
                ("data-benef", self.benef_code),
                ("data-estado", self.status.as_str()),
                ("data-close", self.close_date.as_str()),
            ],
        );
        w.open("article", &[("class", "program-card")]);

        w.open("div", &[("class", "program-card-header")]);
        w.open("div", &[("class", "program-card-header-top")]);
        w.element("span", &[("class", badge_class.as_str())], self.status_badge.text);
        if let Some(deadline) = &self.deadline {
            let class = format!("deadline-badge {}", deadline.urgency.css_class());
            w.element("span", &[("class", class.trim_end()), ("data-deadline", "")], &deadline.label);
        }
        w.close("div");
        w.element("h3", &[], &self.title);
        if let Some(subtitle) = &self.subtitle {
            w.element("p", &[("class", "meta")], subtitle);
        }
        w.close("div");

        w.open("div", &[("class", "program-card-body")]);
        w.open("div", &[("class", "program-card-info")]);
        for row in &self.rows {
            let icon_class = format!("bi {}", row.icon);
            w.open("div", &[("class", "program-card-info-item")]);
            w.element("i", &[("class", icon_class.as_str())], "");
            w.open("div", &[("class", "program-card-info-item-content")]);
            w.element("strong", &[], row.label);
            w.element("span", &[], &row.value);
            w.close("div");
            w.close("div");
        }
        w.close("div");
        w.open("div", &[("class", "program-card-footer")]);
        w.element(
            "a",
            &[("class", "btn btn-outline-dark"), ("href", self.details_url.as_str())],
            "View details",
        );
        w.close("div");
        w.close("div");

        w.close("article");
        w.close("div");
    }

    pub fn to_html(&self) -> String {
        let mut w = HtmlWriter::new();
        self.write_html(&mut w);
        w.finish()
    }
}

/// Renders every card into one grid container.
pub fn render_grid(programs: &[Program], now: DateTime<Utc>) -> String {
    let mut w = HtmlWriter::new();
    w.open("div", &[("id", "grid"), ("class", "row g-4")]);
    if programs.is_empty() {
        write_empty_state(&mut w);
    }
    for program in programs {
        render(program, now).write_html(&mut w);
    }
    w.close("div");
    w.finish()
}

/// Shown in place of the cards when no program passes the filters.
pub const EMPTY_LIST_MESSAGE: &str = "No programs match the selected filters.";
const SHOW_ALL_LABEL: &str = "Show all programs";

fn write_empty_state(w: &mut HtmlWriter) {
    w.open("div", &[("class", "col-12 empty-state")]);
    w.element("p", &[("class", "text-center text-muted py-5")], EMPTY_LIST_MESSAGE);
    w.open("p", &[("class", "text-center")]);
    w.element("a", &[("href", "?"), ("class", "btn btn-primary")], SHOW_ALL_LABEL);
    w.close("p");
    w.close("div");
}
