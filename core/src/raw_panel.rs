//! Raw data and prediction panels: pretty-printed JSON from `/datos` and
//! `/predecir`. Not part of the refresh cascade.

use crate::transport::{Endpoint, Transport};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "state", content = "text", rename_all = "snake_case")]
pub enum RawPanel {
    Json(String),
    Error(String),
}

async fn load<T: Transport>(transport: &T, endpoint: Endpoint) -> RawPanel {
    let pretty = async {
        let body = transport.fetch(endpoint, "").await?;
        let value: serde_json::Value = serde_json::from_str(&body)?;
        Ok::<_, crate::error::DashError>(serde_json::to_string_pretty(&value)?)
    };
    match pretty.await {
        Ok(text) => RawPanel::Json(text),
        Err(e) => {
            log::warn!("{} failed: {e}", endpoint.path());
            RawPanel::Error(format!("Error al consultar {}: {e}", endpoint.path()))
        }
    }
}

pub async fn load_raw_data<T: Transport>(transport: &T) -> RawPanel {
    load(transport, Endpoint::RawData).await
}

/// Trigger a prediction run on the backend (POST) and show its answer.
pub async fn run_prediction<T: Transport>(transport: &T) -> RawPanel {
    let panel = load(transport, Endpoint::Predict).await;
    if let RawPanel::Json(text) = &panel {
        log::info!("prediction result: {text}");
    }
    panel
}
