//! The dashboard session: owns the controls, the board and the refresh
//! machinery, and turns UI events into refreshes.
//!
//! EVENT FLOW:
//!   initial load   → sync dates; the sync's cascade is the first refresh,
//!                    else refresh only if both dates are already set
//!   filter change  → one refresh
//!   client change  → sync dates for the new client, then exactly one
//!                    refresh (a cascade from the sync counts as that one)
//!   clear filters  → reset controls, sync, one refresh
//!
//! STALENESS: every session method takes `&mut self`, so the session never
//! has two refreshes in flight. Outcomes are still checked against the
//! controls as they stand when each one is applied, which also covers
//! reports run outside the session and handed to `apply_report`.

use crate::{
    board::{ApplyResult, Board},
    config::{DashConfig, ExportConfig},
    date_range::{DateBounds, DateRangeSync, SyncOutcome},
    filter::{FilterControls, FilterState},
    orchestrator::{RefreshOrchestrator, RefreshReport, RefreshTicket, WidgetStatus},
    raw_panel::{self, RawPanel},
    snapshot::DashboardSnapshot,
    transport::Transport,
    types::Generation,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshSummary {
    pub generation: Generation,
    pub query:      String,
    pub applied:    usize,
    /// (widget, reason) for every widget that fell back to its empty state.
    pub failures:   Vec<(&'static str, String)>,
}

pub struct Dashboard<T: Transport> {
    pub controls:    FilterControls,
    pub date_bounds: Option<DateBounds>,
    pub board:       Board,
    orchestrator:    RefreshOrchestrator<T>,
    sync:            DateRangeSync,
    refreshes:       Vec<RefreshSummary>,
    export:          ExportConfig,
}

impl<T: Transport> Dashboard<T> {
    pub fn new(transport: T, config: &DashConfig) -> Self {
        let orchestrator = RefreshOrchestrator::build(transport, config);
        Self {
            controls:     FilterControls::default(),
            date_bounds:  None,
            board:        Board::with_slots(&orchestrator.widget_names()),
            orchestrator,
            sync:         DateRangeSync::new(config.default_window_days),
            refreshes:    Vec::new(),
            export:       config.export.clone(),
        }
    }

    pub fn transport(&self) -> &T {
        self.orchestrator.transport()
    }

    /// A fresh read of the controls.
    pub fn filter(&self) -> FilterState {
        FilterState::read(&self.controls)
    }

    /// Every refresh run by this session, oldest first.
    pub fn refresh_history(&self) -> &[RefreshSummary] {
        &self.refreshes
    }

    /// Cascade reload: every widget, current filter.
    pub async fn refresh(&mut self) -> RefreshSummary {
        let ticket = self.orchestrator.issue(self.filter());
        self.run_ticket(ticket).await
    }

    async fn run_ticket(&mut self, ticket: RefreshTicket) -> RefreshSummary {
        let mut applied = 0;
        let mut failures = Vec::new();

        let board = &mut self.board;
        let controls = &self.controls;
        self.orchestrator
            .run_streaming(&ticket, |outcome| {
                if let WidgetStatus::Fallback { reason } = &outcome.status {
                    failures.push((outcome.widget, reason.clone()));
                }
                let current_query = FilterState::read(controls).query_string();
                if board.apply_outcome(&ticket, outcome, &current_query) == ApplyResult::Applied {
                    applied += 1;
                }
            })
            .await;

        let summary = RefreshSummary {
            generation: ticket.generation,
            query: ticket.query,
            applied,
            failures,
        };
        self.refreshes.push(summary.clone());
        summary
    }

    /// Apply a report produced outside this session's refresh path; outcomes
    /// for a filter other than the current one are discarded.
    pub fn apply_report(&mut self, report: RefreshReport) -> usize {
        let current_query = self.filter().query_string();
        self.board.apply(report, &current_query)
    }

    async fn sync_dates(&mut self) -> SyncOutcome {
        self.sync
            .sync(self.orchestrator.transport(), &mut self.controls, &mut self.date_bounds)
            .await
    }

    pub async fn initial_load(&mut self) -> Option<RefreshSummary> {
        let synced = self.sync_dates().await;
        if synced.cascade {
            return Some(self.refresh().await);
        }
        let filter = self.filter();
        if filter.start_date.is_some() && filter.end_date.is_some() {
            return Some(self.refresh().await);
        }
        log::info!("initial load: no dates available, widgets left empty");
        None
    }

    pub async fn on_filter_change(&mut self) -> RefreshSummary {
        self.refresh().await
    }

    pub async fn on_client_change(&mut self, client: &str) -> RefreshSummary {
        self.controls.client = client.to_string();
        self.sync_dates().await;
        self.refresh().await
    }

    /// Reset to "all"; always refreshes so no widget keeps showing data
    /// for the filters that were just cleared.
    pub async fn clear_filters(&mut self) -> RefreshSummary {
        self.controls.clear();
        self.sync_dates().await;
        self.refresh().await
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot::capture(&self.board, self.filter(), self.date_bounds, self.export.clone())
    }

    pub async fn load_raw_data(&self) -> RawPanel {
        raw_panel::load_raw_data(self.orchestrator.transport()).await
    }

    pub async fn run_prediction(&self) -> RawPanel {
        raw_panel::run_prediction(self.orchestrator.transport()).await
    }
}
