//! Snapshot export: the board's current content to JSON/HTML.
//!
//! The JSON snapshot captures everything on screen for the current filter:
//! enough for an external PDF engine (or a later diff) to reproduce the
//! exported page without refetching.

use crate::{
    board::Board,
    config::ExportConfig,
    date_range::DateBounds,
    error::DashResult,
    filter::FilterState,
    records_widget::RecordsView,
    types::Generation,
    widget::WidgetView,
};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct WidgetEntry {
    pub widget:     String,
    pub generation: Generation,
    pub visible:    bool,
    pub view:       Option<WidgetView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub filter:      FilterState,
    pub query:       String,
    pub date_bounds: Option<DateBounds>,
    pub widgets:     Vec<WidgetEntry>,
    pub export:      ExportConfig,
}

impl DashboardSnapshot {
    pub fn capture(
        board: &Board,
        filter: FilterState,
        date_bounds: Option<DateBounds>,
        export: ExportConfig,
    ) -> Self {
        let widgets = board
            .slots()
            .iter()
            .map(|slot| WidgetEntry {
                widget:     slot.name.to_string(),
                generation: slot.generation,
                visible:    slot.canvas.is_visible() || slot.view.is_some(),
                view:       slot.current_view().cloned(),
            })
            .collect();
        Self {
            query: filter.query_string(),
            filter,
            date_bounds,
            widgets,
            export,
        }
    }

    pub fn records(&self) -> Option<&RecordsView> {
        self.widgets.iter().find_map(|w| match &w.view {
            Some(WidgetView::Records(r)) => Some(r),
            _ => None,
        })
    }

    pub fn to_json(&self) -> DashResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> DashResult<()> {
        std::fs::write(path, self.to_json()?)?;
        log::debug!("snapshot written to {}", path.display());
        Ok(())
    }

    /// The records table as a standalone HTML page.
    pub fn write_records_html(&self, path: &Path) -> DashResult<()> {
        let body = self
            .records()
            .map(RecordsView::to_html)
            .unwrap_or_default();
        let page = format!(
            "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title></head>\
             <body>{body}</body></html>\n",
            self.export.file_stem
        );
        std::fs::write(path, page)?;
        Ok(())
    }
}
