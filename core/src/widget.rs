//! Widget trait and the views widgets produce.
//!
//! RULE: every widget implements DashWidget.
//! A widget is a pure function of one endpoint body plus the injected
//! RenderContext. It keeps no state between refreshes, so rendering the
//! same body twice yields the same view.

use crate::{
    consumption_widget::LineChartSpec,
    error::{DashError, DashResult},
    heatmap_widget::HeatmapView,
    kpi_widget::KpiPanel,
    records_widget::RecordsView,
    risk::RiskClassifier,
    risk_distribution_widget::BarChartSpec,
    transport::Endpoint,
};
use serde::Serialize;

/// Shared, read-only inputs to every render step.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub classifier:  RiskClassifier,
    pub heatmap_rgb: [u8; 3],
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            classifier:  RiskClassifier::new(),
            heatmap_rgb: [255, 99, 132],
        }
    }
}

/// Everything a widget can put on screen.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "widget", content = "view", rename_all = "snake_case")]
pub enum WidgetView {
    Kpis(KpiPanel),
    Consumption(LineChartSpec),
    RiskDistribution(BarChartSpec),
    Heatmap(HeatmapView),
    Records(RecordsView),
}

impl WidgetView {
    /// Views drawn on a chart canvas, as opposed to plain DOM text.
    pub fn is_chart(&self) -> bool {
        match self {
            Self::Consumption(_) | Self::RiskDistribution(_) => true,
            Self::Heatmap(h) => h.is_chart(),
            Self::Kpis(_) | Self::Records(_) => false,
        }
    }
}

/// The contract every widget must fulfill.
pub trait DashWidget {
    /// Unique stable name; also the canvas/panel key on the board.
    fn name(&self) -> &'static str;

    fn endpoint(&self) -> Endpoint;

    /// Decode and transform `body` into a view.
    /// An empty dataset is a successful render, not an error.
    fn render(&self, body: &str, ctx: &RenderContext) -> DashResult<WidgetView>;

    /// Safe empty view shown when fetching or rendering failed.
    fn fallback(&self, failure: &DashError) -> WidgetView;
}
