use super::collation::{collation_key, CollationKey};
use crate::constants::FAR_FUTURE_CLOSE_DATE;
use crate::models::{Program, SortOrder};
use crate::utils::parse_close_date;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// Position of a program when ordering by close date.
///
/// Missing dates take the far-future sentinel; unparseable dates go after
/// everything else and keep their relative order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum DateKey {
    Dated(DateTime<Utc>),
    Unparseable,
}

fn date_key(program: &Program, sentinel: DateTime<Utc>) -> DateKey {
    match program.close_date.as_deref().map(str::trim) {
        None | Some("") => DateKey::Dated(sentinel),
        Some(raw) => parse_close_date(raw)
            .map(DateKey::Dated)
            .unwrap_or(DateKey::Unparseable),
    }
}

fn far_future() -> DateTime<Utc> {
    parse_close_date(FAR_FUTURE_CLOSE_DATE).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Returns a new vector ordered by `order`. The input is left untouched.
///
/// Every order uses a stable sort: programs that compare equal keep their
/// input order.
pub fn sort(programs: &[Program], order: SortOrder) -> Vec<Program> {
    let mut sorted = programs.to_vec();
    match order {
        SortOrder::Alphabetical => {
            sort_with_names(&mut sorted, |_, a, b| a.cmp(b));
        }
        SortOrder::OpenFirst => {
            sorted.sort_by(|a, b| b.status.rank().cmp(&a.status.rank()));
        }
        SortOrder::Date => {
            let sentinel = far_future();
            sorted.sort_by_key(|p| date_key(p, sentinel));
        }
        SortOrder::Relevance => {
            sort_with_names(&mut sorted, |(a, b), ka, kb| {
                b.status
                    .rank()
                    .cmp(&a.status.rank())
                    .then_with(|| ka.cmp(kb))
            });
        }
    }
    sorted
}

/// Stable sort with collation keys computed once per program.
fn sort_with_names<F>(programs: &mut Vec<Program>, cmp: F)
where
    F: Fn((&Program, &Program), &CollationKey, &CollationKey) -> Ordering,
{
    let mut keyed: Vec<(CollationKey, Program)> = programs
        .drain(..)
        .map(|p| (collation_key(&p.name), p))
        .collect();
    keyed.sort_by(|(ka, a), (kb, b)| cmp((a, b), ka, kb));
    programs.extend(keyed.into_iter().map(|(_, p)| p));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program(name: &str, status: &str, close: Option<&str>) -> Program {
        let close = close
            .map(|c| format!("close_date = \"{c}\""))
            .unwrap_or_default();
        toml::from_str(&format!(
            r#"
            name = "{name}"
            status = "{status}"
            benef_group = "municipalities"
            {close}
            "#
        ))
        .unwrap()
    }

    fn names(programs: &[Program]) -> Vec<&str> {
        programs.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn relevance_puts_open_before_closed() {
        let programs = vec![program("B", "closed", None), program("A", "open", None)];
        assert_eq!(names(&sort(&programs, SortOrder::Relevance)), vec!["A", "B"]);
    }

    #[test]
    fn relevance_breaks_rank_ties_alphabetically() {
        let programs = vec![
            program("Fondo Regional de Iniciativa Local (FRIL)", "closed", None),
            program("Circular 33", "closed", None),
            program("Subvenciones para actividades FNDR 8%", "open", None),
            program("Árbol urbano", "closed", None),
        ];
        assert_eq!(
            names(&sort(&programs, SortOrder::Relevance)),
            vec![
                "Subvenciones para actividades FNDR 8%",
                "Árbol urbano",
                "Circular 33",
                "Fondo Regional de Iniciativa Local (FRIL)",
            ]
        );
    }

    #[test]
    fn open_first_is_stable_for_equal_ranks() {
        let programs = vec![
            program("Zeta", "closed", None),
            program("Alfa", "open", None),
            program("Beta", "closed", None),
            program("Omega", "upcoming", None),
            program("Gamma", "open", None),
            program("Delta", "archived", None),
        ];
        assert_eq!(
            names(&sort(&programs, SortOrder::OpenFirst)),
            vec!["Alfa", "Gamma", "Omega", "Zeta", "Beta", "Delta"]
        );
    }

    #[test]
    fn date_order_reads_offsetless_timestamps() {
        let programs = vec![
            program("Sin fecha", "open", None),
            program("Con hora", "open", Some("2025-12-15T18:00:00")),
            program("Antes", "open", Some("2025-12-01")),
        ];
        assert_eq!(
            names(&sort(&programs, SortOrder::Date)),
            vec!["Antes", "Con hora", "Sin fecha"]
        );
    }

    #[test]
    fn alphabetical_uses_spanish_collation() {
        let programs = vec![
            program("Oso", "open", None),
            program("Ñandú", "open", None),
            program("Nube", "open", None),
            program("Évora", "open", None),
            program("Fondo", "open", None),
        ];
        assert_eq!(
            names(&sort(&programs, SortOrder::Alphabetical)),
            vec!["Évora", "Fondo", "Nube", "Ñandú", "Oso"]
        );
    }

    #[test]
    fn date_orders_ascending_with_missing_and_invalid_last() {
        let programs = vec![
            program("no date", "closed", None),
            program("garbage", "closed", Some("next week")),
            program("december", "open", Some("2025-12-15")),
            program("blank", "closed", Some("")),
            program("november", "open", Some("2025-11-30")),
            program("garbage 2", "closed", Some("soon")),
        ];
        assert_eq!(
            names(&sort(&programs, SortOrder::Date)),
            vec!["november", "december", "no date", "blank", "garbage", "garbage 2"]
        );
    }

    #[test]
    fn sort_does_not_mutate_input() {
        let programs = vec![program("B", "closed", None), program("A", "open", None)];
        let before = programs.clone();
        let _ = sort(&programs, SortOrder::Alphabetical);
        assert_eq!(programs, before);
    }

    #[test]
    fn empty_input_sorts_to_empty() {
        assert!(sort(&[], SortOrder::Date).is_empty());
    }
}
