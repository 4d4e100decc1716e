//! Records table from `/tabla_registros`.
//!
//! Fixed column order. Numeric columns are shown with two decimals, missing
//! values as "", and the Riesgo column as a coloured badge.

use crate::{
    error::{DashError, DashResult},
    transport::Endpoint,
    widget::{DashWidget, RenderContext, WidgetView},
};
use serde::Serialize;
use serde_json::{Map, Value};

pub const COLUMNS: [&str; 7] = [
    "Fecha", "Presion", "Temperatura", "Volumen", "Volumen_Predicho", "Residual", "Riesgo",
];
const NUMERIC_COLUMNS: [&str; 5] = ["Presion", "Temperatura", "Volumen", "Volumen_Predicho", "Residual"];
const RISK_COLUMN: &str = "Riesgo";

pub const EMPTY_TEXT:   &str = "No hay registros disponibles.";
pub const FAILURE_TEXT: &str = "Error al cargar la tabla.";

pub type TableRow = Map<String, Value>;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Badge {
    pub text:  String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Cell {
    pub text:  String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RecordsView {
    Table { columns: Vec<String>, rows: Vec<Vec<Cell>> },
    Message { text: String, is_error: bool },
}

/// Text of a plain cell: two decimals for numeric columns, "" for missing.
pub fn format_cell(column: &str, value: Option<&Value>) -> String {
    let numeric = NUMERIC_COLUMNS.contains(&column);
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::Number(n)) if numeric => match n.as_f64() {
            Some(f) => two_decimals(f),
            None => n.to_string(),
        },
        Some(Value::String(s)) if numeric => match s.trim().parse::<f64>() {
            Ok(f) if f.is_finite() => two_decimals(f),
            _ => s.clone(),
        },
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Ties round away from zero (`1.125` → `"1.13"`), not to even.
fn two_decimals(f: f64) -> String {
    let rounded = (f * 100.0).round() / 100.0;
    if rounded.is_finite() {
        format!("{rounded:.2}")
    } else {
        format!("{f:.2}")
    }
}

impl RecordsView {
    pub fn build(rows: &[TableRow], ctx: &RenderContext) -> Self {
        if rows.is_empty() {
            return Self::Message { text: EMPTY_TEXT.into(), is_error: false };
        }

        let rows = rows
            .iter()
            .map(|row| {
                COLUMNS
                    .iter()
                    .map(|&col| {
                        if col == RISK_COLUMN {
                            let label = row.get(col).and_then(Value::as_str);
                            Cell {
                                text:  label.unwrap_or_default().to_string(),
                                badge: Some(Badge {
                                    text:  ctx.classifier.badge_text(label),
                                    color: ctx.classifier.color(label).to_string(),
                                }),
                            }
                        } else {
                            Cell { text: format_cell(col, row.get(col)), badge: None }
                        }
                    })
                    .collect()
            })
            .collect();

        Self::Table {
            columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    pub fn row_count(&self) -> usize {
        match self {
            Self::Table { rows, .. } => rows.len(),
            Self::Message { .. } => 0,
        }
    }

    /// Standalone HTML, as inserted into the records container.
    pub fn to_html(&self) -> String {
        match self {
            Self::Message { text, is_error: false } => format!("<p>{}</p>", escape_html(text)),
            Self::Message { text, is_error: true } => {
                format!("<p style=\"color:red;\">{}</p>", escape_html(text))
            }
            Self::Table { columns, rows } => {
                let mut html = String::from(
                    "<table border=\"1\" cellpadding=\"6\" cellspacing=\"0\"><thead><tr>",
                );
                for col in columns {
                    html.push_str(&format!("<th>{}</th>", escape_html(col)));
                }
                html.push_str("</tr></thead><tbody>");
                for row in rows {
                    html.push_str("<tr>");
                    for cell in row {
                        match &cell.badge {
                            Some(badge) => html.push_str(&format!(
                                "<td><span style=\"background-color: {}; padding: 4px 8px; \
                                 border-radius: 4px; color: white;\">{}</span></td>",
                                badge.color,
                                escape_html(&badge.text)
                            )),
                            None => html.push_str(&format!("<td>{}</td>", escape_html(&cell.text))),
                        }
                    }
                    html.push_str("</tr>");
                }
                html.push_str("</tbody></table>");
                html
            }
        }
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&'  => out.push_str("&amp;"),
            '<'  => out.push_str("&lt;"),
            '>'  => out.push_str("&gt;"),
            '"'  => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _    => out.push(c),
        }
    }
    out
}

/// `null` is an empty table; anything else must be an array of objects.
pub fn parse_records(body: &str) -> DashResult<Vec<TableRow>> {
    let value: Value = serde_json::from_str(body)?;
    match value {
        Value::Null => Ok(Vec::new()),
        other => Ok(serde_json::from_value(other)?),
    }
}

pub struct RecordsWidget;

impl DashWidget for RecordsWidget {
    fn name(&self) -> &'static str { "records" }

    fn endpoint(&self) -> Endpoint { Endpoint::Records }

    fn render(&self, body: &str, ctx: &RenderContext) -> DashResult<WidgetView> {
        let rows = parse_records(body)?;
        Ok(WidgetView::Records(RecordsView::build(&rows, ctx)))
    }

    fn fallback(&self, _failure: &DashError) -> WidgetView {
        WidgetView::Records(RecordsView::Message { text: FAILURE_TEXT.into(), is_error: true })
    }
}
