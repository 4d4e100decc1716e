//! Date range synchronizer: keeps the date inputs inside the selected
//! client's data range and auto-fills a trailing window when none is chosen.
//!
//! RULES:
//!   - Bounds come only from `/rangos_fechas`.
//!   - Auto-fill happens only when BOTH inputs are empty, and only then is
//!     a cascade reload requested.
//!   - A failed fetch leaves inputs and prior bounds untouched.

use crate::{
    error::{DashError, DashResult},
    filter::{ClientFilter, FilterControls},
    transport::{Endpoint, Transport},
    types::DATE_FMT,
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateBounds {
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
}

impl DateBounds {
    pub fn new(min_date: NaiveDate, max_date: NaiveDate) -> DashResult<Self> {
        if min_date > max_date {
            return Err(DashError::InvalidDateBounds {
                min: min_date.format(DATE_FMT).to_string(),
                max: max_date.format(DATE_FMT).to_string(),
            });
        }
        Ok(Self { min_date, max_date })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min_date <= date && date <= self.max_date
    }
}

#[derive(Debug, Deserialize)]
struct DateRangeResponse {
    min_fecha: Option<String>,
    max_fecha: Option<String>,
}

/// Decode a `/rangos_fechas` body. Null bounds (client without data) are malformed here.
pub fn parse_date_bounds(body: &str) -> DashResult<DateBounds> {
    let endpoint = Endpoint::DateRanges.path();
    let raw: DateRangeResponse = serde_json::from_str(body)?;
    let (Some(min), Some(max)) = (raw.min_fecha, raw.max_fecha) else {
        return Err(DashError::malformed(endpoint, "date bounds are null"));
    };
    let parse = |s: &str| {
        NaiveDate::parse_from_str(s.trim(), DATE_FMT)
            .map_err(|e| DashError::malformed(endpoint, format!("bad date {s:?}: {e}")))
    };
    DateBounds::new(parse(&min)?, parse(&max)?)
}

/// `[max - days, max]`, both ends inclusive. A negative window is treated
/// as zero; a window reaching past the calendar start saturates at `NaiveDate::MIN`.
pub fn trailing_window(max_date: NaiveDate, days: i64) -> (NaiveDate, NaiveDate) {
    let start = Duration::try_days(days.max(0))
        .and_then(|window| max_date.checked_sub_signed(window))
        .unwrap_or(NaiveDate::MIN);
    (start, max_date)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Bounds now applied to the inputs; None when the fetch failed.
    pub bounds:     Option<DateBounds>,
    pub autofilled: Option<(NaiveDate, NaiveDate)>,
    /// True only when dates were auto-filled and every widget must reload.
    pub cascade:    bool,
}

impl SyncOutcome {
    fn failed() -> Self {
        Self { bounds: None, autofilled: None, cascade: false }
    }
}

pub struct DateRangeSync {
    window_days: i64,
}

impl DateRangeSync {
    /// Negative windows are clamped to zero.
    pub fn new(window_days: i64) -> Self {
        if window_days < 0 {
            log::warn!("negative date window {window_days} clamped to 0 days");
        }
        Self { window_days: window_days.max(0) }
    }

    /// Fetch the bounds for the client currently selected in `controls`,
    /// apply them to `bounds`, and auto-fill the dates when both are empty.
    pub async fn sync<T: Transport>(
        &self,
        transport: &T,
        controls: &mut FilterControls,
        bounds: &mut Option<DateBounds>,
    ) -> SyncOutcome {
        let client = ClientFilter::from_control(&controls.client);
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("cliente", client.as_param())
            .finish();

        let fetched = match transport.fetch(Endpoint::DateRanges, &query).await {
            Ok(body) => parse_date_bounds(&body),
            Err(e) => Err(e),
        };
        let fetched = match fetched {
            Ok(b) => b,
            Err(e) => {
                log::warn!("date range sync failed for cliente={}: {e}", client.as_param());
                return SyncOutcome::failed();
            }
        };

        *bounds = Some(fetched);

        let inputs_empty =
            controls.start_date.trim().is_empty() && controls.end_date.trim().is_empty();
        if !inputs_empty {
            for (field, raw) in [("inicio", &controls.start_date), ("fin", &controls.end_date)] {
                if let Ok(date) = NaiveDate::parse_from_str(raw.trim(), DATE_FMT) {
                    if !fetched.contains(date) {
                        log::warn!(
                            "{field} {date} is outside the data range {} .. {}",
                            fetched.min_date, fetched.max_date
                        );
                    }
                }
            }
            return SyncOutcome { bounds: Some(fetched), autofilled: None, cascade: false };
        }

        let (start, end) = trailing_window(fetched.max_date, self.window_days);
        controls.start_date = start.format(DATE_FMT).to_string();
        controls.end_date = end.format(DATE_FMT).to_string();
        log::debug!(
            "auto-filled dates {} .. {} (window {} days)",
            controls.start_date, controls.end_date, self.window_days
        );

        SyncOutcome { bounds: Some(fetched), autofilled: Some((start, end)), cascade: true }
    }
}
