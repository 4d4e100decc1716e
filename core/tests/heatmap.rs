use meterdash_core::{
    error::DashError,
    heatmap::{intensity, AnomalyMatrix, HeatmapBuild},
    heatmap_widget::{HeatmapView, HeatmapWidget, FAILURE_TEXT, NO_DATA_TEXT},
    widget::{DashWidget, RenderContext, WidgetView},
};

fn matrix(days: &[&str], hours: &[&str], counts: Vec<Vec<u64>>) -> AnomalyMatrix {
    AnomalyMatrix {
        days: days.iter().map(|d| d.to_string()).collect(),
        hours: hours.iter().map(|h| h.to_string()).collect(),
        counts,
    }
}

fn ready(m: &AnomalyMatrix) -> meterdash_core::heatmap::HeatmapGrid {
    match m.build().expect("valid matrix") {
        HeatmapBuild::Ready(grid) => grid,
        HeatmapBuild::NoData => panic!("expected a grid"),
    }
}

#[test]
fn point_count_is_padded_days_times_hours() {
    let m = matrix(&["Lunes", "Martes"], &["00", "01", "02"], vec![vec![1, 2, 3], vec![4, 5, 6]]);
    let grid = ready(&m);
    assert_eq!(grid.points.len(), (2 + 2) * 3);
    assert_eq!(grid.days, vec!["", "Lunes", "Martes", ""]);
}

#[test]
fn padding_rows_are_all_zero() {
    let m = matrix(&["Lunes"], &["00", "01"], vec![vec![7, 9]]);
    let grid = ready(&m);
    let h = grid.hours.len();
    let first = &grid.points[..h];
    let last = &grid.points[grid.points.len() - h..];
    assert!(first.iter().chain(last).all(|p| p.value == 0 && p.day.is_empty()));
}

#[test]
fn flattening_is_row_major() {
    let m = matrix(&["Lunes"], &["00", "01"], vec![vec![7, 9]]);
    let grid = ready(&m);
    let real: Vec<(&str, &str, u64)> = grid.points[2..4]
        .iter()
        .map(|p| (p.day.as_str(), p.hour.as_str(), p.value))
        .collect();
    assert_eq!(real, vec![("Lunes", "00", 7), ("Lunes", "01", 9)]);
}

#[test]
fn all_zero_matrix_has_zero_alpha_everywhere() {
    let m = matrix(&["Lunes", "Martes"], &["00"], vec![vec![0], vec![0]]);
    let grid = ready(&m);
    assert_eq!(grid.max_value, 0);
    assert!(grid.points.iter().all(|p| grid.alpha_of(p) == 0.0));
}

#[test]
fn max_cell_has_full_alpha() {
    let m = matrix(&["Lunes"], &["00", "01"], vec![vec![2, 8]]);
    let grid = ready(&m);
    let max_point = grid.points.iter().find(|p| p.value == 8).unwrap();
    assert_eq!(grid.alpha_of(max_point), 1.0);
    assert_eq!(intensity(2, 8), 0.25);
    assert_eq!(intensity(9, 8), 1.0);
}

#[test]
fn empty_axis_means_no_data() {
    assert_eq!(matrix(&[], &["00"], vec![]).build().unwrap(), HeatmapBuild::NoData);
    assert_eq!(matrix(&["Lunes"], &[], vec![vec![]]).build().unwrap(), HeatmapBuild::NoData);
}

#[test]
fn ragged_grid_is_malformed() {
    let m = matrix(&["Lunes", "Martes"], &["00", "01"], vec![vec![1, 2], vec![3]]);
    assert!(matches!(m.build(), Err(DashError::Malformed { .. })));

    let missing_row = matrix(&["Lunes", "Martes"], &["00"], vec![vec![1]]);
    assert!(matches!(missing_row.build(), Err(DashError::Malformed { .. })));
}

#[test]
fn widget_shows_message_when_no_anomalies() {
    let view = HeatmapWidget
        .render(r#"{"dias": [], "horas": [], "matriz": []}"#, &RenderContext::default())
        .unwrap();
    assert_eq!(view, WidgetView::Heatmap(HeatmapView::Message { text: NO_DATA_TEXT.into() }));
    assert!(!view.is_chart());
}

#[test]
fn widget_colors_cells_with_base_rgb() {
    let ctx = RenderContext { heatmap_rgb: [10, 20, 30], ..RenderContext::default() };
    let view = HeatmapWidget
        .render(r#"{"dias": ["Lunes"], "horas": ["00", "01"], "matriz": [[1, 4]]}"#, &ctx)
        .unwrap();
    let WidgetView::Heatmap(HeatmapView::Chart(spec)) = view else {
        panic!("expected chart");
    };
    assert_eq!(spec.cells.len(), 6);
    assert_eq!(spec.y_labels, vec!["", "Lunes", ""]);
    let full = spec.cells.iter().find(|c| c.v == 4).unwrap();
    assert_eq!(full.color, "rgba(10, 20, 30, 1)");
    assert_eq!(full.tooltip, "Día: Lunes, Hora: 01, Anomalías: 4");
}

#[test]
fn widget_fallback_is_inline_error() {
    let err = DashError::Status { endpoint: "/anomalias_por_dia_hora", status: 500 };
    let view = HeatmapWidget.fallback(&err);
    let WidgetView::Heatmap(h) = view else { panic!("expected heatmap view") };
    assert_eq!(h.message(), Some(FAILURE_TEXT));
}
