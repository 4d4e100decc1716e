//! dash-runner: headless refresh runner for the consumption dashboard.
//!
//! Usage:
//!   dash-runner --base-url http://127.0.0.1:5000
//!   dash-runner --config dash.json --cliente C123 --riesgos Alto,Medio --out board.json
//!   dash-runner --base-url http://127.0.0.1:5000 --inicio 2024-03-01 --fin 2024-03-31 --html tabla.html
//!   dash-runner --base-url http://127.0.0.1:5000 --raw --predict

use anyhow::Result;
use meterdash_core::{
    config::DashConfig,
    dashboard::{Dashboard, RefreshSummary},
    raw_panel::RawPanel,
    transport::HttpTransport,
    widget::WidgetView,
};
use std::env;
use std::path::PathBuf;

#[derive(serde::Serialize)]
struct RunSummary<'a> {
    query:      &'a str,
    generation: u64,
    applied:    usize,
    failures:   Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = match arg_value(&args, "--config") {
        Some(path) => DashConfig::load(path)?,
        None => DashConfig::with_base_url("http://127.0.0.1:5000"),
    };
    if let Some(base_url) = arg_value(&args, "--base-url") {
        config.base_url = base_url.to_string();
    }
    config.default_window_days = parse_arg(&args, "--window-days", config.default_window_days);
    config.validate()?;
    let json_summary = args.iter().any(|a| a == "--json");

    let transport = HttpTransport::new(&config)?;
    let mut dash = Dashboard::new(transport, &config);

    if let Some(client) = arg_value(&args, "--cliente") {
        dash.controls.client = client.to_string();
    }
    if let Some(start) = arg_value(&args, "--inicio") {
        dash.controls.start_date = start.to_string();
    }
    if let Some(end) = arg_value(&args, "--fin") {
        dash.controls.end_date = end.to_string();
    }
    if let Some(risks) = arg_value(&args, "--riesgos") {
        dash.controls.selected_risks = risks.split(',').map(str::to_string).collect();
    }

    if !json_summary {
        println!("dash-runner: consumption dashboard");
        println!("  backend:   {}", config.base_url);
        println!("  window:    {} days", config.default_window_days);
        println!();
    }

    let summary = match dash.initial_load().await {
        Some(summary) => summary,
        // No date bounds and no user dates: load the unbounded view anyway.
        None => dash.refresh().await,
    };

    if json_summary {
        let out = RunSummary {
            query:      &summary.query,
            generation: summary.generation,
            applied:    summary.applied,
            failures:   summary.failures.iter().map(|(w, r)| format!("{w}: {r}")).collect(),
        };
        println!("{}", serde_json::to_string(&out)?);
    } else {
        print_summary(&dash, &summary);
    }

    if args.iter().any(|a| a == "--raw") {
        print_panel("/datos", &dash.load_raw_data().await);
    }
    if args.iter().any(|a| a == "--predict") {
        print_panel("/predecir", &dash.run_prediction().await);
    }

    let snapshot = dash.snapshot();
    let out = arg_value(&args, "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("{}.json", config.export.file_stem)));
    snapshot.write_json(&out)?;
    log::info!("snapshot written to {}", out.display());

    if let Some(html) = arg_value(&args, "--html") {
        snapshot.write_records_html(&PathBuf::from(html))?;
        log::info!("records table written to {html}");
    }

    Ok(())
}

fn print_summary<T: meterdash_core::transport::Transport>(
    dash: &Dashboard<T>,
    summary: &RefreshSummary,
) {
    println!("=== REFRESH SUMMARY ===");
    println!("  generation:   {}", summary.generation);
    println!("  query:        {}", if summary.query.is_empty() { "(none)" } else { &summary.query });
    if let Some(bounds) = dash.date_bounds {
        println!("  date bounds:  {} .. {}", bounds.min_date, bounds.max_date);
    }
    println!("  widgets ok:   {}", summary.applied - summary.failures.len().min(summary.applied));
    for (widget, reason) in &summary.failures {
        println!("  FAILED {widget}: {reason}");
    }

    println!();
    println!("=== KPIs ===");
    if let Some(WidgetView::Kpis(k)) = dash.board.view("kpis") {
        println!("  clientes:     {}", k.clientes);
        println!("  anomalías:    {}", k.anomalias);
        println!("  alertas:      {}", k.alertas);
        println!("  volumen:      {}", k.volumen);
        println!("  presión:      {}", k.presion);
        println!("  temperatura:  {}", k.temperatura);
    }

    if let Some(WidgetView::Consumption(line)) = dash.board.view("consumption") {
        println!("  serie:        {} puntos", line.points.len());
    }
    match dash.board.view("heatmap") {
        Some(WidgetView::Heatmap(h)) => match h.message() {
            Some(text) => println!("  heatmap:      {text}"),
            None => println!("  heatmap:      rendered"),
        },
        _ => println!("  heatmap:      (empty)"),
    }
    if let Some(WidgetView::Records(r)) = dash.board.view("records") {
        println!("  registros:    {}", r.row_count());
    }
}

fn print_panel(path: &str, panel: &RawPanel) {
    println!();
    println!("=== {path} ===");
    match panel {
        RawPanel::Json(text) => println!("{text}"),
        RawPanel::Error(text) => println!("  {text}"),
    }
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
