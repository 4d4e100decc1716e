//! Heatmap matrix builder: turns the sparse day×hour anomaly counts into the
//! padded, flattened, intensity-normalized point set the matrix chart draws.
//!
//! Steps (fixed order):
//!   1. Empty day or hour axis → NoData.
//!   2. Validate the grid against the axis lengths.
//!   3. Pad one all-zero row before the first day and after the last, with
//!      "" labels, so edge cells are not clipped against the axis.
//!   4. Flatten row-major: outer padded days, inner hours.
//!   5. Normalize linearly: alpha = value / max, 0 when max is 0.
//!
//! Normalization is linear, not histogram-equalized.

use crate::{
    error::{DashError, DashResult},
    transport::Endpoint,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnomalyMatrix {
    #[serde(rename = "dias")]
    pub days:   Vec<String>,
    #[serde(rename = "horas")]
    pub hours:  Vec<String>,
    #[serde(rename = "matriz", deserialize_with = "de::count_grid")]
    pub counts: Vec<Vec<u64>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeatPoint {
    pub hour:  String,
    pub day:   String,
    pub value: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HeatmapGrid {
    /// Day labels including the two "" padding entries.
    pub days:      Vec<String>,
    pub hours:     Vec<String>,
    pub points:    Vec<HeatPoint>,
    pub max_value: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HeatmapBuild {
    NoData,
    Ready(HeatmapGrid),
}

impl AnomalyMatrix {
    pub fn validate(&self) -> DashResult<()> {
        let endpoint = Endpoint::AnomaliesByDayHour.path();
        if self.counts.len() != self.days.len() {
            return Err(DashError::malformed(
                endpoint,
                format!("{} rows for {} days", self.counts.len(), self.days.len()),
            ));
        }
        if let Some((i, row)) = self
            .counts
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.hours.len())
        {
            return Err(DashError::malformed(
                endpoint,
                format!("row {i} has {} cells for {} hours", row.len(), self.hours.len()),
            ));
        }
        Ok(())
    }

    pub fn build(&self) -> DashResult<HeatmapBuild> {
        if self.days.is_empty() || self.hours.is_empty() {
            return Ok(HeatmapBuild::NoData);
        }
        self.validate()?;

        let zero_row = vec![0u64; self.hours.len()];

        let mut days = Vec::with_capacity(self.days.len() + 2);
        days.push(String::new());
        days.extend(self.days.iter().cloned());
        days.push(String::new());

        let mut rows: Vec<&[u64]> = Vec::with_capacity(days.len());
        rows.push(&zero_row);
        rows.extend(self.counts.iter().map(Vec::as_slice));
        rows.push(&zero_row);

        let mut points = Vec::with_capacity(days.len() * self.hours.len());
        for (day, row) in days.iter().zip(&rows) {
            for (hour, value) in self.hours.iter().zip(row.iter()) {
                points.push(HeatPoint {
                    hour:  hour.clone(),
                    day:   day.clone(),
                    value: *value,
                });
            }
        }

        let max_value = points.iter().map(|p| p.value).max().unwrap_or(0);

        Ok(HeatmapBuild::Ready(HeatmapGrid {
            days,
            hours: self.hours.clone(),
            points,
            max_value,
        }))
    }
}

/// Display intensity of a cell, in [0, 1].
pub fn intensity(value: u64, max_value: u64) -> f64 {
    if max_value == 0 {
        return 0.0;
    }
    (value as f64 / max_value as f64).clamp(0.0, 1.0)
}

pub fn cell_color(rgb: [u8; 3], alpha: f64) -> String {
    let [r, g, b] = rgb;
    format!("rgba({r}, {g}, {b}, {alpha})")
}

impl HeatmapGrid {
    pub fn alpha_of(&self, point: &HeatPoint) -> f64 {
        intensity(point.value, self.max_value)
    }
}

/// Serde-compatible deserializers for backend grids.
pub mod de {
    use serde::{self, Deserialize, Deserializer};

    /// Counts arrive as `3` or, after a reindex upstream, as `3.0`.
    /// Negative, fractional or non-finite values are rejected.
    pub fn count_grid<'de, D>(deserializer: D) -> Result<Vec<Vec<u64>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<Vec<f64>>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|row| row.into_iter().map(to_count).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(serde::de::Error::custom)
    }

    fn to_count(v: f64) -> Result<u64, String> {
        if !v.is_finite() || v < 0.0 || v.fract() != 0.0 {
            return Err(format!("invalid anomaly count {v}"));
        }
        Ok(v as u64)
    }
}
