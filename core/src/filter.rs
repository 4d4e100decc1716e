//! Filter state: the one canonical view of the dashboard's filter controls.
//!
//! RULE: widgets never read controls directly. A fresh FilterState is built
//! from FilterControls on every refresh and passed down explicitly.

use crate::types::{ClientId, ALL_SENTINEL, DATE_FMT};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Raw control values exactly as the UI holds them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterControls {
    pub client:         String,
    pub start_date:     String,
    pub end_date:       String,
    pub selected_risks: Vec<String>,
}

impl Default for FilterControls {
    fn default() -> Self {
        Self {
            client:         ALL_SENTINEL.to_string(),
            start_date:     String::new(),
            end_date:       String::new(),
            selected_risks: Vec::new(),
        }
    }
}

impl FilterControls {
    /// Reset every control to its "all" value, as the clear-filters button does.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ClientFilter {
    All,
    Client(ClientId),
}

impl ClientFilter {
    pub fn from_control(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == ALL_SENTINEL {
            Self::All
        } else {
            Self::Client(trimmed.to_string())
        }
    }

    /// Value sent to `/rangos_fechas`, which expects the sentinel for "all".
    pub fn as_param(&self) -> &str {
        match self {
            Self::All        => ALL_SENTINEL,
            Self::Client(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub client:     ClientFilter,
    pub start_date: Option<NaiveDate>,
    pub end_date:   Option<NaiveDate>,
    /// Selection order, no duplicates. Empty means no risk filter.
    pub risks:      Vec<String>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            client:     ClientFilter::All,
            start_date: None,
            end_date:   None,
            risks:      Vec::new(),
        }
    }
}

impl FilterState {
    pub fn read(controls: &FilterControls) -> Self {
        let mut risks: Vec<String> = Vec::new();
        for risk in &controls.selected_risks {
            let risk = risk.trim();
            if risk.is_empty() || risk == ALL_SENTINEL {
                continue;
            }
            if !risks.iter().any(|r| r == risk) {
                risks.push(risk.to_string());
            }
        }

        Self {
            client:     ClientFilter::from_control(&controls.client),
            start_date: parse_date_control("inicio", &controls.start_date),
            end_date:   parse_date_control("fin", &controls.end_date),
            risks,
        }
    }

    /// Form-urlencoded query for every widget endpoint.
    /// Dimensions at their "all"/empty value are omitted entirely.
    pub fn query_string(&self) -> String {
        let mut params = form_urlencoded::Serializer::new(String::new());
        if let ClientFilter::Client(id) = &self.client {
            params.append_pair("cliente", id);
        }
        if let Some(start) = self.start_date {
            params.append_pair("inicio", &start.format(DATE_FMT).to_string());
        }
        if let Some(end) = self.end_date {
            params.append_pair("fin", &end.format(DATE_FMT).to_string());
        }
        if !self.risks.is_empty() {
            params.append_pair("riesgos", &self.risks.join(","));
        }
        params.finish()
    }

    pub fn is_unfiltered(&self) -> bool {
        self.query_string().is_empty()
    }
}

fn parse_date_control(field: &str, raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(trimmed, DATE_FMT) {
        Ok(date) => Some(date),
        Err(e) => {
            log::warn!("ignoring unparsable {field} date {trimmed:?}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_dates_are_absent() {
        let controls = FilterControls {
            start_date: "   ".into(),
            end_date: "not-a-date".into(),
            ..FilterControls::default()
        };
        let state = FilterState::read(&controls);
        assert_eq!(state.start_date, None);
        assert_eq!(state.end_date, None);
    }

    #[test]
    fn clear_restores_sentinels() {
        let mut controls = FilterControls {
            client: "C9".into(),
            start_date: "2024-01-01".into(),
            end_date: "2024-01-31".into(),
            selected_risks: vec!["Alto".into()],
        };
        controls.clear();
        assert_eq!(controls, FilterControls::default());
        assert!(FilterState::read(&controls).is_unfiltered());
    }
}
