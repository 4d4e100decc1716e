//! Shared primitive types used across the dashboard core.

/// A client identifier as the backend knows it (`Numero_Cliente`).
pub type ClientId = String;

/// A CSS colour string, either `#rrggbb` or `rgba(...)`.
pub type Color = String;

/// Monotonic refresh number. Generation 0 means "nothing applied yet".
pub type Generation = u64;

/// The sentinel the UI uses for "no restriction on this dimension".
pub const ALL_SENTINEL: &str = "todos";

/// ISO date format used by the date inputs and `/rangos_fechas`.
pub const DATE_FMT: &str = "%Y-%m-%d";
