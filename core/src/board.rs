//! The board: what is currently on screen, one slot per widget.
//!
//! RULES:
//!   - Each chart canvas is owned by exactly one CanvasHandle.
//!   - A new chart view always destroys the previous instance before the
//!     new one is created. Charts are never mutated in place.
//!   - A widget outcome is applied only if it belongs to the current filter
//!     and is not older than what the slot already shows.

use crate::{
    orchestrator::{RefreshReport, RefreshTicket, WidgetOutcome, WidgetStatus},
    types::Generation,
    widget::WidgetView,
};

/// A live chart on a canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartInstance {
    pub generation: Generation,
    pub view:       WidgetView,
}

#[derive(Debug, Default)]
pub struct CanvasHandle {
    instance:  Option<ChartInstance>,
    visible:   bool,
    created:   u64,
    destroyed: u64,
}

impl CanvasHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destroy the current chart, if any, then create one from `view`.
    pub fn recreate(&mut self, canvas: &str, view: WidgetView, generation: Generation) {
        self.destroy(canvas);
        self.instance = Some(ChartInstance { generation, view });
        self.visible = true;
        self.created += 1;
    }

    pub fn destroy(&mut self, canvas: &str) {
        if let Some(old) = self.instance.take() {
            log::debug!("canvas {canvas}: destroying chart from generation {}", old.generation);
            self.destroyed += 1;
        }
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn instance(&self) -> Option<&ChartInstance> {
        self.instance.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible && self.instance.is_some()
    }

    /// (created, destroyed) over the handle's lifetime.
    pub fn lifecycle_counts(&self) -> (u64, u64) {
        (self.created, self.destroyed)
    }
}

#[derive(Debug)]
pub struct WidgetSlot {
    pub name:       &'static str,
    pub generation: Generation,
    /// Current non-chart content (KPI text, table, heatmap message).
    pub view:       Option<WidgetView>,
    pub canvas:     CanvasHandle,
    pub status:     Option<WidgetStatus>,
}

impl WidgetSlot {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            generation: 0,
            view: None,
            canvas: CanvasHandle::new(),
            status: None,
        }
    }

    /// What the slot shows right now, chart or not.
    pub fn current_view(&self) -> Option<&WidgetView> {
        match self.canvas.instance() {
            Some(chart) if self.canvas.is_visible() => Some(&chart.view),
            _ => self.view.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyResult {
    Applied,
    /// Older than what the slot already shows.
    Superseded,
    /// Produced for a filter that is no longer current.
    FilterChanged,
}

#[derive(Debug, Default)]
pub struct Board {
    slots: Vec<WidgetSlot>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-create empty slots so the board lists widgets in a fixed order.
    pub fn with_slots(names: &[&'static str]) -> Self {
        Self { slots: names.iter().map(|&n| WidgetSlot::new(n)).collect() }
    }

    pub fn slot(&self, name: &str) -> Option<&WidgetSlot> {
        self.slots.iter().find(|s| s.name == name)
    }

    pub fn slots(&self) -> &[WidgetSlot] {
        &self.slots
    }

    pub fn view(&self, name: &str) -> Option<&WidgetView> {
        self.slot(name).and_then(WidgetSlot::current_view)
    }

    fn slot_mut(&mut self, name: &'static str) -> &mut WidgetSlot {
        if let Some(i) = self.slots.iter().position(|s| s.name == name) {
            return &mut self.slots[i];
        }
        self.slots.push(WidgetSlot::new(name));
        let last = self.slots.len() - 1;
        &mut self.slots[last]
    }

    /// Apply one widget's outcome, guarded against stale responses.
    pub fn apply_outcome(
        &mut self,
        ticket: &RefreshTicket,
        outcome: WidgetOutcome,
        current_query: &str,
    ) -> ApplyResult {
        if ticket.query != current_query {
            log::warn!(
                "discarding {} from generation {}: filter changed",
                outcome.widget, ticket.generation
            );
            return ApplyResult::FilterChanged;
        }

        let slot = self.slot_mut(outcome.widget);
        if ticket.generation < slot.generation {
            log::warn!(
                "discarding {} from generation {}: slot already at {}",
                outcome.widget, ticket.generation, slot.generation
            );
            return ApplyResult::Superseded;
        }

        slot.generation = ticket.generation;
        slot.status = Some(outcome.status);
        if outcome.view.is_chart() {
            slot.canvas.recreate(slot.name, outcome.view, ticket.generation);
            slot.view = None;
        } else {
            // Text-only state: any chart from an earlier refresh must go.
            slot.canvas.destroy(slot.name);
            slot.canvas.hide();
            slot.view = Some(outcome.view);
        }
        ApplyResult::Applied
    }

    /// Apply a whole report; returns how many outcomes were applied.
    pub fn apply(&mut self, report: RefreshReport, current_query: &str) -> usize {
        let ticket = report.ticket;
        report
            .outcomes
            .into_iter()
            .map(|o| self.apply_outcome(&ticket, o, current_query))
            .filter(|r| *r == ApplyResult::Applied)
            .count()
    }
}
