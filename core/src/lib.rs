//! Refresh core of the metered-consumption telemetry dashboard.
//!
//! Reads the filter controls, fans out one fetch per widget, shapes the
//! responses (risk colours, padded anomaly heatmap, KPI fallbacks, records
//! table) and keeps the board consistent with the current filter.

pub mod board;
pub mod config;
pub mod consumption_widget;
pub mod dashboard;
pub mod date_range;
pub mod error;
pub mod filter;
pub mod heatmap;
pub mod heatmap_widget;
pub mod kpi_widget;
pub mod orchestrator;
pub mod raw_panel;
pub mod records_widget;
pub mod risk;
pub mod risk_distribution_widget;
pub mod snapshot;
pub mod transport;
pub mod types;
pub mod widget;
