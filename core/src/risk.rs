//! Risk classifier: the one place a risk label becomes a colour.
//!
//! RULE: every widget that colours by risk (consumption segments and points,
//! risk distribution datasets, record badges) goes through RiskClassifier.
//! No widget matches on risk labels itself.

use serde::{Deserialize, Serialize};

pub const ALTO_COLOR:    &str = "#e74c3c"; // red
pub const MEDIO_COLOR:   &str = "#f1c40f"; // yellow
pub const BAJO_COLOR:    &str = "#2ecc71"; // green
pub const UNKNOWN_COLOR: &str = "#95a5a6"; // gray

/// Badge text shown for a record with no risk label at all.
pub const NO_RISK_LABEL: &str = "Sin riesgo";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RiskLevel {
    Alto,
    Medio,
    Bajo,
    Unknown,
}

impl RiskLevel {
    /// Total: anything that is not exactly Alto/Medio/Bajo is Unknown.
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("Alto")  => Self::Alto,
            Some("Medio") => Self::Medio,
            Some("Bajo")  => Self::Bajo,
            _             => Self::Unknown,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Self::Alto    => ALTO_COLOR,
            Self::Medio   => MEDIO_COLOR,
            Self::Bajo    => BAJO_COLOR,
            Self::Unknown => UNKNOWN_COLOR,
        }
    }
}

/// Stateless classifier injected into each widget's render step.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskClassifier;

impl RiskClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, label: Option<&str>) -> RiskLevel {
        RiskLevel::from_label(label)
    }

    pub fn color(&self, label: Option<&str>) -> &'static str {
        self.classify(label).color()
    }

    /// Text for a risk badge: the label itself, or "Sin riesgo" when blank.
    pub fn badge_text(&self, label: Option<&str>) -> String {
        match label {
            Some(l) if !l.is_empty() => l.to_string(),
            _ => NO_RISK_LABEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_map_to_their_colors() {
        let c = RiskClassifier::new();
        assert_eq!(c.color(Some("Alto")), "#e74c3c");
        assert_eq!(c.color(Some("Medio")), "#f1c40f");
        assert_eq!(c.color(Some("Bajo")), "#2ecc71");
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(RiskLevel::from_label(Some("alto")), RiskLevel::Unknown);
        assert_eq!(RiskLevel::from_label(Some(" Alto")), RiskLevel::Unknown);
    }

    #[test]
    fn blank_badge_reads_sin_riesgo() {
        let c = RiskClassifier::new();
        assert_eq!(c.badge_text(None), "Sin riesgo");
        assert_eq!(c.badge_text(Some("")), "Sin riesgo");
        assert_eq!(c.badge_text(Some("Medio")), "Medio");
    }
}
