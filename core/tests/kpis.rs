use meterdash_core::{
    error::DashError,
    kpi_widget::{KpiPanel, KpiSnapshot, KpiWidget},
    widget::{DashWidget, RenderContext, WidgetView},
};

fn zero_panel() -> KpiPanel {
    KpiPanel {
        clientes: "0".into(),
        anomalias: "0".into(),
        alertas: "0".into(),
        volumen: "0 m³".into(),
        presion: "0 psi".into(),
        temperatura: "0 °C".into(),
    }
}

#[test]
fn null_volume_resets_every_field() {
    let view = KpiWidget
        .render(
            r#"{"total_clientes": 5, "total_anomalias": 8, "alertas_criticas": 3,
                "promedio_volumen": null, "promedio_presion": 60.5, "promedio_temperatura": 20}"#,
            &RenderContext::default(),
        )
        .unwrap();
    assert_eq!(view, WidgetView::Kpis(zero_panel()));
}

#[test]
fn nan_volume_resets_every_field() {
    let snapshot = KpiSnapshot {
        total_clientes: Some(5),
        total_anomalias: Some(8),
        alertas_criticas: Some(3),
        promedio_volumen: Some(f64::NAN),
        promedio_presion: Some(60.5),
        promedio_temperatura: Some(20.0),
    };
    assert_eq!(KpiPanel::from_snapshot(&snapshot), zero_panel());
}

#[test]
fn bare_nan_literal_falls_back_to_zero_panel() {
    // Python backends emit a bare NaN, which is not valid JSON.
    let err = KpiWidget
        .render(r#"{"total_clientes": 5, "promedio_volumen": NaN}"#, &RenderContext::default())
        .unwrap_err();
    assert!(matches!(err, DashError::Serialization(_)));
    assert_eq!(KpiWidget.fallback(&err), WidgetView::Kpis(zero_panel()));
}

#[test]
fn valid_snapshot_shows_units() {
    let view = KpiWidget
        .render(
            r#"{"total_clientes": 4, "total_anomalias": 9, "alertas_criticas": 2,
                "promedio_volumen": 152.4, "promedio_presion": 61.2, "promedio_temperatura": 17.5}"#,
            &RenderContext::default(),
        )
        .unwrap();
    let WidgetView::Kpis(panel) = view else { panic!("expected kpis") };
    assert_eq!(panel.clientes, "4");
    assert_eq!(panel.anomalias, "9");
    assert_eq!(panel.alertas, "2");
    assert_eq!(panel.volumen, "152.4 m³");
    assert_eq!(panel.presion, "61.2 psi");
    assert_eq!(panel.temperatura, "17.5 °C");
}

#[test]
fn missing_counts_show_zero_when_volume_present() {
    let view = KpiWidget
        .render(r#"{"promedio_volumen": 10}"#, &RenderContext::default())
        .unwrap();
    let WidgetView::Kpis(panel) = view else { panic!("expected kpis") };
    assert_eq!(panel.clientes, "0");
    assert_eq!(panel.volumen, "10 m³");
    assert_eq!(panel.presion, "0 psi");
}
