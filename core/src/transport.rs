//! Transport: the only code that talks to the backend.
//!
//! RULE: widgets and the synchronizer ask a Transport for a raw body.
//! Decoding happens in the caller, so a malformed body is the caller's
//! failure, not the transport's.

use crate::{
    config::DashConfig,
    error::{DashError, DashResult},
};
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Kpis,
    Consumption,
    RiskByClient,
    AnomaliesByDayHour,
    Records,
    DateRanges,
    RawData,
    Predict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Kpis               => "/kpis",
            Self::Consumption        => "/grafico_volumen",
            Self::RiskByClient       => "/riesgo_por_cliente",
            Self::AnomaliesByDayHour => "/anomalias_por_dia_hora",
            Self::Records            => "/tabla_registros",
            Self::DateRanges         => "/rangos_fechas",
            Self::RawData            => "/datos",
            Self::Predict            => "/predecir",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Self::Predict => Method::Post,
            _             => Method::Get,
        }
    }
}

/// Fetch the raw response body of `endpoint` with an already-encoded query.
///
/// Futures are not required to be `Send`: the orchestrator joins them on a
/// single task.
pub trait Transport {
    fn fetch(&self, endpoint: Endpoint, query: &str) -> impl Future<Output = DashResult<String>>;
}

/// Build `base + path[?query]`. An empty query adds no `?`.
pub fn endpoint_url(base_url: &str, endpoint: Endpoint, query: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if query.is_empty() {
        format!("{base}{}", endpoint.path())
    } else {
        format!("{base}{}?{query}", endpoint.path())
    }
}

pub struct HttpTransport {
    http:     reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &DashConfig) -> DashResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self { http, base_url: config.base_url.clone() })
    }
}

impl Transport for HttpTransport {
    async fn fetch(&self, endpoint: Endpoint, query: &str) -> DashResult<String> {
        let url = endpoint_url(&self.base_url, endpoint, query);
        log::debug!("{:?} {url}", endpoint.method());

        let request = match endpoint.method() {
            Method::Get  => self.http.get(&url),
            Method::Post => self.http.post(&url),
        };
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DashError::Status {
                endpoint: endpoint.path(),
                status:   status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}
