//! The refresh orchestrator: one trigger, every widget, no widget waits on
//! another.
//!
//! RULES:
//!   - Every refresh is tagged with a RefreshTicket (generation + query).
//!   - Widgets run concurrently on the caller's task; completion order is
//!     not defined and not relied upon.
//!   - A widget failure is caught here, logged, and turned into that
//!     widget's fallback view. It never reaches the caller or another widget.
//!
//! REGISTRATION ORDER (report order only, never completion order):
//!   1. KPIs
//!   2. Consumption chart
//!   3. Risk distribution chart
//!   4. Anomaly heatmap
//!   5. Records table

use crate::{
    config::DashConfig,
    consumption_widget::ConsumptionWidget,
    filter::FilterState,
    heatmap_widget::HeatmapWidget,
    kpi_widget::KpiWidget,
    records_widget::RecordsWidget,
    risk::RiskClassifier,
    risk_distribution_widget::RiskDistributionWidget,
    transport::Transport,
    types::Generation,
    widget::{DashWidget, RenderContext, WidgetView},
};
use futures_util::{
    future::join_all,
    stream::{FuturesUnordered, StreamExt},
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshTicket {
    pub generation: Generation,
    pub filter:     FilterState,
    pub query:      String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WidgetStatus {
    Rendered,
    Fallback { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetOutcome {
    pub widget: &'static str,
    pub view:   WidgetView,
    pub status: WidgetStatus,
}

impl WidgetOutcome {
    pub fn failed(&self) -> bool {
        matches!(self.status, WidgetStatus::Fallback { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshReport {
    pub ticket:   RefreshTicket,
    pub outcomes: Vec<WidgetOutcome>,
}

impl RefreshReport {
    pub fn outcome(&self, widget: &str) -> Option<&WidgetOutcome> {
        self.outcomes.iter().find(|o| o.widget == widget)
    }

    pub fn failures(&self) -> impl Iterator<Item = &WidgetOutcome> {
        self.outcomes.iter().filter(|o| o.failed())
    }
}

pub struct RefreshOrchestrator<T: Transport> {
    transport:       T,
    ctx:             RenderContext,
    widgets:         Vec<Box<dyn DashWidget>>,
    last_generation: Generation,
}

impl<T: Transport> RefreshOrchestrator<T> {
    pub fn new(transport: T, ctx: RenderContext) -> Self {
        Self {
            transport,
            ctx,
            widgets: Vec::new(),
            last_generation: 0,
        }
    }

    /// Build an orchestrator with all five widgets registered.
    /// Call this instead of new() + manual register() calls.
    pub fn build(transport: T, config: &DashConfig) -> Self {
        let ctx = RenderContext {
            classifier:  RiskClassifier::new(),
            heatmap_rgb: config.heatmap_base_rgb,
        };
        let mut orchestrator = Self::new(transport, ctx);

        // REGISTRATION ORDER: fixed, documented above.
        orchestrator.register(Box::new(KpiWidget));
        orchestrator.register(Box::new(ConsumptionWidget));
        orchestrator.register(Box::new(RiskDistributionWidget));
        orchestrator.register(Box::new(HeatmapWidget));
        orchestrator.register(Box::new(RecordsWidget));
        orchestrator
    }

    pub fn register(&mut self, widget: Box<dyn DashWidget>) {
        self.widgets.push(widget);
    }

    pub fn widget_names(&self) -> Vec<&'static str> {
        self.widgets.iter().map(|w| w.name()).collect()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn last_generation(&self) -> Generation {
        self.last_generation
    }

    /// Tag a new refresh for `filter`. Generations strictly increase.
    pub fn issue(&mut self, filter: FilterState) -> RefreshTicket {
        self.last_generation += 1;
        let query = filter.query_string();
        log::debug!("refresh #{} query={query:?}", self.last_generation);
        RefreshTicket { generation: self.last_generation, filter, query }
    }

    async fn run_widget(&self, widget: &dyn DashWidget, query: &str) -> WidgetOutcome {
        let rendered = match self.transport.fetch(widget.endpoint(), query).await {
            Ok(body) => widget.render(&body, &self.ctx),
            Err(e) => Err(e),
        };
        match rendered {
            Ok(view) => {
                log::debug!("widget {} rendered", widget.name());
                WidgetOutcome { widget: widget.name(), view, status: WidgetStatus::Rendered }
            }
            Err(e) => {
                log::warn!("widget {} failed, showing empty state: {e}", widget.name());
                WidgetOutcome {
                    widget: widget.name(),
                    view:   widget.fallback(&e),
                    status: WidgetStatus::Fallback { reason: e.to_string() },
                }
            }
        }
    }

    /// Run every widget and collect the outcomes in registration order.
    pub async fn run(&self, ticket: RefreshTicket) -> RefreshReport {
        let outcomes = join_all(
            self.widgets
                .iter()
                .map(|w| self.run_widget(w.as_ref(), &ticket.query)),
        )
        .await;
        RefreshReport { ticket, outcomes }
    }

    /// Run every widget, handing each outcome to `on_done` as soon as it
    /// resolves. No barrier across widgets.
    pub async fn run_streaming<F>(&self, ticket: &RefreshTicket, mut on_done: F)
    where
        F: FnMut(WidgetOutcome),
    {
        let mut pending: FuturesUnordered<_> = self
            .widgets
            .iter()
            .map(|w| self.run_widget(w.as_ref(), &ticket.query))
            .collect();
        while let Some(outcome) = pending.next().await {
            on_done(outcome);
        }
    }
}
