use super::filter::FilterCriteria;
use crate::models::{BeneficiaryGroup, ProgramStatus, SortOrder};
use serde::Deserialize;
use url::form_urlencoded;

/// Raw criteria exactly as a form or URL delivers them.
///
/// Values are kept as strings so invalid input can be reported before it is
/// dropped; conversion to typed criteria never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchParams {
    pub q: String,
    pub estado: String,
    pub benef: String,
    pub orden: String,
    pub region: String,
}

impl SearchParams {
    /// Parses portal URL parameters (`?q=..&estado=..&benef=..&orden=..&region=..`).
    ///
    /// A leading `?` is ignored, repeated keys keep the last value, and the
    /// English aliases `status`, `group` and `order` are accepted.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                "q" | "query" => params.q = value,
                "estado" | "status" => params.estado = value,
                "benef" | "group" => params.benef = value,
                "orden" | "order" => params.orden = value,
                "region" => params.region = value,
                _ => {}
            }
        }
        params
    }

    /// Lists human-readable problems with the raw values.
    ///
    /// Problems are advisory: [`SearchParams::criteria`] and
    /// [`SearchParams::order`] fall back to "no filter" and relevance.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !self.estado.trim().is_empty() && ProgramStatus::parse(&self.estado).is_none() {
            errors.push(format!(
                "status must be open, upcoming, closed or empty, got '{}'",
                self.estado
            ));
        }
        if !self.benef.trim().is_empty() && BeneficiaryGroup::parse(&self.benef).is_none() {
            errors.push(format!("beneficiary group '{}' is not valid", self.benef));
        }
        if !self.orden.trim().is_empty() && SortOrder::parse(&self.orden).is_none() {
            errors.push(format!(
                "order must be relevance, openfirst, date or alpha, got '{}'",
                self.orden
            ));
        }
        errors
    }

    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            query: non_blank(&self.q),
            status: ProgramStatus::parse(&self.estado),
            benef_group: BeneficiaryGroup::parse(&self.benef),
            region: non_blank(&self.region),
        }
    }

    pub fn order(&self) -> SortOrder {
        SortOrder::from(self.orden.as_str())
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
