//! Consumption line chart from `/grafico_volumen`.
//!
//! One dataset of daily volume. Each point and each segment is coloured by
//! risk through the injected classifier; segment i takes the colour of the
//! point it starts from.

use crate::{
    error::{DashError, DashResult},
    transport::Endpoint,
    widget::{DashWidget, RenderContext, WidgetView},
};
use serde::{Deserialize, Serialize};

pub const SERIES_LABEL: &str = "Volumen (m³)";
pub const CHART_TITLE:  &str = "Consumo Diario (Volumen, Presión, Temperatura)";
pub const AREA_FILL:    &str = "rgba(75, 192, 192, 0.2)";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsumptionPoint {
    pub x:           String,
    pub y:           f64,
    #[serde(default)]
    pub riesgo:      Option<String>,
    #[serde(default)]
    pub presion:     Option<f64>,
    #[serde(default)]
    pub temperatura: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ConsumptionResponse {
    #[serde(default)]
    datos: Vec<ConsumptionPoint>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LineChartSpec {
    pub title:          String,
    pub label:          String,
    pub x_axis_title:   String,
    pub y_axis_title:   String,
    pub points:         Vec<ConsumptionPoint>,
    pub point_colors:   Vec<String>,
    /// `points.len() - 1` entries; empty when there are fewer than two points.
    pub segment_colors: Vec<String>,
    pub tooltips:       Vec<Vec<String>>,
    pub fill_color:     String,
    pub border_width:   u32,
    pub tension:        f64,
}

impl LineChartSpec {
    pub fn build(points: Vec<ConsumptionPoint>, ctx: &RenderContext) -> Self {
        let point_colors: Vec<String> = points
            .iter()
            .map(|p| ctx.classifier.color(p.riesgo.as_deref()).to_string())
            .collect();

        let segment_colors = points
            .windows(2)
            .map(|w| ctx.classifier.color(w[0].riesgo.as_deref()).to_string())
            .collect();

        let tooltips = points.iter().map(tooltip_lines).collect();

        Self {
            title:          CHART_TITLE.into(),
            label:          SERIES_LABEL.into(),
            x_axis_title:   "Fecha".into(),
            y_axis_title:   SERIES_LABEL.into(),
            points,
            point_colors,
            segment_colors,
            tooltips,
            fill_color:     AREA_FILL.into(),
            border_width:   2,
            tension:        0.3,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn tooltip_lines(p: &ConsumptionPoint) -> Vec<String> {
    let opt = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
    vec![
        format!("Volumen: {} m³", p.y),
        format!("Presión: {} psi", opt(p.presion)),
        format!("Temperatura: {} °C", opt(p.temperatura)),
    ]
}

pub struct ConsumptionWidget;

impl DashWidget for ConsumptionWidget {
    fn name(&self) -> &'static str { "consumption" }

    fn endpoint(&self) -> Endpoint { Endpoint::Consumption }

    fn render(&self, body: &str, ctx: &RenderContext) -> DashResult<WidgetView> {
        let response: ConsumptionResponse = serde_json::from_str(body)?;
        Ok(WidgetView::Consumption(LineChartSpec::build(response.datos, ctx)))
    }

    fn fallback(&self, _failure: &DashError) -> WidgetView {
        WidgetView::Consumption(LineChartSpec::build(Vec::new(), &RenderContext::default()))
    }
}
