//! Presentation layer: program cards, deadline badges and search result
//! lists, rendered as escaped HTML fragments or plain text.

mod card;
mod deadline;
mod html;
mod results;

pub use card::{render, render_grid, CardView, InfoRow, StatusBadge, EMPTY_LIST_MESSAGE};
pub use deadline::{deadline_info, program_deadline, DeadlineInfo, Urgency};
pub use html::{escape_html, HtmlWriter};
pub use results::{outcome_to_html, outcome_to_text};
