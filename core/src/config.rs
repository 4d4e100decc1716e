use serde::{Deserialize, Serialize};

/// Options handed to the external PDF engine when the board is exported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportConfig {
    /// File stem shared by the PDF and the JSON snapshot.
    pub file_stem:     String,
    pub page_format:   String,
    pub orientation:   String,
    pub margin_inches: f64,
    pub render_scale:  u32,
    pub image_quality: f64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_stem:     "monitoreo_clientes".into(),
            page_format:   "a4".into(),
            orientation:   "landscape".into(),
            margin_inches: 0.5,
            render_scale:  2,
            image_quality: 0.98,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashConfig {
    pub base_url:             String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Length of the trailing window auto-filled when no dates are chosen.
    #[serde(default = "default_window_days")]
    pub default_window_days:  i64,
    /// RGB of the heatmap cells; alpha carries the intensity.
    #[serde(default = "default_heatmap_rgb")]
    pub heatmap_base_rgb:     [u8; 3],
    #[serde(default)]
    pub export:               ExportConfig,
}

fn default_timeout_secs() -> u64 { 10 }
fn default_window_days() -> i64 { 30 }
fn default_heatmap_rgb() -> [u8; 3] { [255, 99, 132] }

impl DashConfig {
    /// Load from a JSON config file.
    /// In tests, use DashConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: DashConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks shared by file loading and command-line overrides.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.default_window_days < 0 {
            anyhow::bail!("default_window_days must be non-negative, got {}", self.default_window_days);
        }
        Ok(())
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url:             base_url.into(),
            request_timeout_secs: default_timeout_secs(),
            default_window_days:  default_window_days(),
            heatmap_base_rgb:     default_heatmap_rgb(),
            export:               ExportConfig::default(),
        }
    }

    /// Config used by tests; the base URL is never dialled.
    pub fn default_test() -> Self {
        Self::with_base_url("http://127.0.0.1:5000")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let config: DashConfig =
            serde_json::from_str(r#"{ "base_url": "http://dash.local" }"#).unwrap();
        assert_eq!(config.default_window_days, 30);
        assert_eq!(config.heatmap_base_rgb, [255, 99, 132]);
        assert_eq!(config.export.file_stem, "monitoreo_clientes");
    }

    #[test]
    fn negative_window_fails_validation() {
        let mut config = DashConfig::default_test();
        assert!(config.validate().is_ok());
        config.default_window_days = -1;
        assert!(config.validate().is_err());
    }
}
