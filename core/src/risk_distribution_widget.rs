//! Stacked risk-distribution bar chart from `/riesgo_por_cliente`.
//!
//! One dataset per risk category, x labels are clients. Dataset colour comes
//! from the classifier so "Alto" is the same red here as everywhere else.

use crate::{
    error::{DashError, DashResult},
    transport::Endpoint,
    widget::{DashWidget, RenderContext, WidgetView},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const CHART_TITLE: &str = "Distribución de Riesgo por Cliente";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RiskByClient {
    #[serde(default)]
    pub clientes: Vec<String>,
    #[serde(default)]
    pub riesgos:  Vec<String>,
    /// Counts per risk, aligned with `clientes`.
    #[serde(default)]
    pub valores:  HashMap<String, Vec<f64>>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BarDataset {
    pub label:            String,
    pub data:             Vec<f64>,
    pub background_color: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BarChartSpec {
    pub title:        String,
    pub labels:       Vec<String>,
    pub datasets:     Vec<BarDataset>,
    pub stacked:      bool,
    pub x_axis_title: String,
    pub y_axis_title: String,
}

impl BarChartSpec {
    pub fn build(data: &RiskByClient, ctx: &RenderContext) -> Self {
        let width = data.clientes.len();
        let datasets = data
            .riesgos
            .iter()
            .map(|riesgo| {
                // Short or missing value arrays pad with zero.
                let values = data.valores.get(riesgo);
                let series = (0..width)
                    .map(|i| values.and_then(|v| v.get(i)).copied().unwrap_or(0.0))
                    .collect();
                BarDataset {
                    label:            riesgo.clone(),
                    data:             series,
                    background_color: ctx.classifier.color(Some(riesgo.as_str())).to_string(),
                }
            })
            .collect();

        Self {
            title:        CHART_TITLE.into(),
            labels:       data.clientes.clone(),
            datasets,
            stacked:      true,
            x_axis_title: "Cliente".into(),
            y_axis_title: "Cantidad de registros".into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() || self.datasets.is_empty()
    }
}

pub struct RiskDistributionWidget;

impl DashWidget for RiskDistributionWidget {
    fn name(&self) -> &'static str { "risk_distribution" }

    fn endpoint(&self) -> Endpoint { Endpoint::RiskByClient }

    fn render(&self, body: &str, ctx: &RenderContext) -> DashResult<WidgetView> {
        let data: RiskByClient = serde_json::from_str(body)?;
        Ok(WidgetView::RiskDistribution(BarChartSpec::build(&data, ctx)))
    }

    fn fallback(&self, _failure: &DashError) -> WidgetView {
        WidgetView::RiskDistribution(BarChartSpec::build(
            &RiskByClient::default(),
            &RenderContext::default(),
        ))
    }
}
