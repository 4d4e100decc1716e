//! Scripted in-memory transport shared by the integration tests.

#![allow(dead_code)]

use meterdash_core::{
    error::{DashError, DashResult},
    transport::{Endpoint, Transport},
};
use std::cell::RefCell;
use std::collections::HashMap;

/// Route `log` output through the test harness; safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Clone)]
pub enum Reply {
    Body(String),
    Status(u16),
}

#[derive(Default)]
pub struct ScriptedTransport {
    replies: RefCell<HashMap<Endpoint, Reply>>,
    calls:   RefCell<Vec<(Endpoint, String)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, endpoint: Endpoint, body: &str) -> Self {
        self.set(endpoint, Reply::Body(body.to_string()));
        self
    }

    pub fn fail(self, endpoint: Endpoint, status: u16) -> Self {
        self.set(endpoint, Reply::Status(status));
        self
    }

    pub fn set(&self, endpoint: Endpoint, reply: Reply) {
        self.replies.borrow_mut().insert(endpoint, reply);
    }

    pub fn calls(&self) -> Vec<(Endpoint, String)> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.calls.borrow().iter().filter(|(e, _)| *e == endpoint).count()
    }

    pub fn last_query(&self, endpoint: Endpoint) -> Option<String> {
        self.calls
            .borrow()
            .iter()
            .rev()
            .find(|(e, _)| *e == endpoint)
            .map(|(_, q)| q.clone())
    }

    /// A backend where every widget endpoint answers with valid data.
    pub fn healthy() -> Self {
        Self::new()
            .reply(Endpoint::DateRanges, r#"{"min_fecha":"2024-01-01","max_fecha":"2024-03-31"}"#)
            .reply(Endpoint::Kpis, KPIS)
            .reply(Endpoint::Consumption, CONSUMPTION)
            .reply(Endpoint::RiskByClient, RISK_BY_CLIENT)
            .reply(Endpoint::AnomaliesByDayHour, ANOMALIES)
            .reply(Endpoint::Records, RECORDS)
    }
}

impl Transport for ScriptedTransport {
    async fn fetch(&self, endpoint: Endpoint, query: &str) -> DashResult<String> {
        self.calls.borrow_mut().push((endpoint, query.to_string()));
        // Give the other widgets a chance to interleave.
        tokio::task::yield_now().await;
        let reply = self.replies.borrow().get(&endpoint).cloned();
        match reply {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Status(status)) => Err(DashError::Status { endpoint: endpoint.path(), status }),
            None => Err(DashError::Status { endpoint: endpoint.path(), status: 404 }),
        }
    }
}

pub const KPIS: &str = r#"{
    "total_clientes": 4,
    "total_anomalias": 9,
    "alertas_criticas": 2,
    "promedio_volumen": 152.4,
    "promedio_presion": 61.2,
    "promedio_temperatura": 17.5
}"#;

pub const CONSUMPTION: &str = r#"{"datos": [
    {"x": "2024-03-01", "y": 150.0, "riesgo": "Bajo",  "presion": 60.0, "temperatura": 17.0},
    {"x": "2024-03-02", "y": 180.5, "riesgo": "Alto",  "presion": 64.1, "temperatura": 18.2},
    {"x": "2024-03-03", "y": 140.2, "riesgo": "Sin riesgo", "presion": 59.3, "temperatura": 16.9}
]}"#;

pub const RISK_BY_CLIENT: &str = r#"{
    "clientes": ["C1", "C2"],
    "riesgos": ["Alto", "Bajo", "Medio"],
    "valores": {"Alto": [3, 0], "Bajo": [10, 7], "Medio": [1, 2]}
}"#;

pub const ANOMALIES: &str = r#"{
    "dias": ["Lunes", "Martes", "Miércoles"],
    "horas": ["08", "09", "10", "11"],
    "matriz": [[0, 1, 0, 2], [4, 0, 0, 0], [1.0, 1.0, 3.0, 0]]
}"#;

pub const RECORDS: &str = r#"[
    {"Fecha": "2024-03-02 10:00:00", "Presion": 64.123, "Temperatura": 18.2,
     "Volumen": 180.5, "Volumen_Predicho": 150.0, "Residual": 30.5, "Riesgo": "Alto"},
    {"Fecha": "2024-03-01 09:00:00", "Presion": 60, "Temperatura": null,
     "Volumen": 150, "Volumen_Predicho": 149.9, "Residual": 0.1, "Riesgo": ""}
]"#;
