//! KPI panel: six scalar fields from `/kpis`.
//!
//! If the average volume is missing or NaN the whole snapshot is treated as
//! empty and every field shows its zero default, whatever the other fields
//! say. Transport and decode failures land on the same zero panel.

use crate::{
    error::{DashError, DashResult},
    transport::Endpoint,
    widget::{DashWidget, RenderContext, WidgetView},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KpiSnapshot {
    #[serde(default)]
    pub total_clientes:       Option<i64>,
    #[serde(default)]
    pub total_anomalias:      Option<i64>,
    #[serde(default)]
    pub alertas_criticas:     Option<i64>,
    #[serde(default)]
    pub promedio_volumen:     Option<f64>,
    #[serde(default)]
    pub promedio_presion:     Option<f64>,
    #[serde(default)]
    pub promedio_temperatura: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct KpiPanel {
    pub clientes:    String,
    pub anomalias:   String,
    pub alertas:     String,
    pub volumen:     String,
    pub presion:     String,
    pub temperatura: String,
}

impl KpiPanel {
    pub fn zeroed() -> Self {
        Self {
            clientes:    "0".into(),
            anomalias:   "0".into(),
            alertas:     "0".into(),
            volumen:     "0 m³".into(),
            presion:     "0 psi".into(),
            temperatura: "0 °C".into(),
        }
    }

    pub fn from_snapshot(snapshot: &KpiSnapshot) -> Self {
        match snapshot.promedio_volumen {
            Some(v) if !v.is_nan() => {}
            _ => return Self::zeroed(),
        }

        let avg = |v: Option<f64>| v.filter(|x| !x.is_nan()).unwrap_or(0.0);
        Self {
            clientes:    snapshot.total_clientes.unwrap_or(0).to_string(),
            anomalias:   snapshot.total_anomalias.unwrap_or(0).to_string(),
            alertas:     snapshot.alertas_criticas.unwrap_or(0).to_string(),
            volumen:     format!("{} m³", avg(snapshot.promedio_volumen)),
            presion:     format!("{} psi", avg(snapshot.promedio_presion)),
            temperatura: format!("{} °C", avg(snapshot.promedio_temperatura)),
        }
    }
}

/// `null` or a non-object body is an empty snapshot, not a failure.
pub fn parse_kpis(body: &str) -> DashResult<KpiSnapshot> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if !value.is_object() {
        return Ok(KpiSnapshot::default());
    }
    Ok(serde_json::from_value(value)?)
}

pub struct KpiWidget;

impl DashWidget for KpiWidget {
    fn name(&self) -> &'static str { "kpis" }

    fn endpoint(&self) -> Endpoint { Endpoint::Kpis }

    fn render(&self, body: &str, _ctx: &RenderContext) -> DashResult<WidgetView> {
        let snapshot = parse_kpis(body)?;
        Ok(WidgetView::Kpis(KpiPanel::from_snapshot(&snapshot)))
    }

    fn fallback(&self, _failure: &DashError) -> WidgetView {
        WidgetView::Kpis(KpiPanel::zeroed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn averages_print_like_plain_numbers() {
        let panel = KpiPanel::from_snapshot(&KpiSnapshot {
            total_clientes: Some(12),
            total_anomalias: Some(3),
            alertas_criticas: Some(1),
            promedio_volumen: Some(120.0),
            promedio_presion: Some(45.25),
            promedio_temperatura: None,
        });
        assert_eq!(panel.clientes, "12");
        assert_eq!(panel.volumen, "120 m³");
        assert_eq!(panel.presion, "45.25 psi");
        assert_eq!(panel.temperatura, "0 °C");
    }

    #[test]
    fn null_body_is_empty_snapshot() {
        assert_eq!(parse_kpis("null").unwrap(), KpiSnapshot::default());
    }
}
