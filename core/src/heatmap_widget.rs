//! Anomaly heatmap from `/anomalias_por_dia_hora`.
//!
//! Either a matrix chart (canvas shown) or an inline message (canvas hidden).
//! This is the only widget that surfaces a failure to the user in text.

use crate::{
    error::{DashError, DashResult},
    heatmap::{cell_color, intensity, AnomalyMatrix, HeatmapBuild, HeatmapGrid},
    transport::Endpoint,
    widget::{DashWidget, RenderContext, WidgetView},
};
use serde::Serialize;

pub const CHART_TITLE:   &str = "Anomalías por Día y Hora";
pub const NO_DATA_TEXT:  &str = "No se registraron anomalías para los filtros seleccionados.";
pub const FAILURE_TEXT:  &str = "Error al cargar anomalías.";
pub const CELL_BORDER:   &str = "rgba(255,255,255,0.5)";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HeatCell {
    pub x:       String,
    pub y:       String,
    pub v:       u64,
    pub alpha:   f64,
    pub color:   String,
    pub tooltip: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatrixChartSpec {
    pub title:        String,
    pub x_labels:     Vec<String>,
    pub y_labels:     Vec<String>,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub cells:        Vec<HeatCell>,
    pub max_value:    u64,
    pub border_color: String,
}

impl MatrixChartSpec {
    pub fn from_grid(grid: HeatmapGrid, rgb: [u8; 3]) -> Self {
        let max_value = grid.max_value;
        let cells = grid
            .points
            .into_iter()
            .map(|p| {
                let alpha = intensity(p.value, max_value);
                HeatCell {
                    tooltip: format!("Día: {}, Hora: {}, Anomalías: {}", p.day, p.hour, p.value),
                    color:   cell_color(rgb, alpha),
                    alpha,
                    x:       p.hour,
                    y:       p.day,
                    v:       p.value,
                }
            })
            .collect();

        Self {
            title:        CHART_TITLE.into(),
            x_labels:     grid.hours,
            y_labels:     grid.days,
            x_axis_title: "Hora del Día".into(),
            y_axis_title: "Día de la Semana".into(),
            cells,
            max_value,
            border_color: CELL_BORDER.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum HeatmapView {
    Chart(MatrixChartSpec),
    Message { text: String },
}

impl HeatmapView {
    pub fn is_chart(&self) -> bool {
        matches!(self, Self::Chart(_))
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Message { text } => Some(text.as_str()),
            Self::Chart(_) => None,
        }
    }
}

pub struct HeatmapWidget;

impl DashWidget for HeatmapWidget {
    fn name(&self) -> &'static str { "heatmap" }

    fn endpoint(&self) -> Endpoint { Endpoint::AnomaliesByDayHour }

    fn render(&self, body: &str, ctx: &RenderContext) -> DashResult<WidgetView> {
        let matrix: AnomalyMatrix = serde_json::from_str(body)?;
        let view = match matrix.build()? {
            HeatmapBuild::NoData => HeatmapView::Message { text: NO_DATA_TEXT.into() },
            HeatmapBuild::Ready(grid) => {
                HeatmapView::Chart(MatrixChartSpec::from_grid(grid, ctx.heatmap_rgb))
            }
        };
        Ok(WidgetView::Heatmap(view))
    }

    fn fallback(&self, _failure: &DashError) -> WidgetView {
        WidgetView::Heatmap(HeatmapView::Message { text: FAILURE_TEXT.into() })
    }
}
