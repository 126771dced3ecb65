//! Integration tests for dashboard assembly and output formats

use carbon_atlas::core::chart::{Projection, WorldMap};
use carbon_atlas::core::dashboard::{
    Dashboard, Event, HtmlReporter, MarkdownReporter, ReportGenerator, Selection, SvgReporter,
};
use carbon_atlas::core::data::{Datasets, EmissionMetric};
use std::path::Path;
use tempfile::TempDir;

fn datasets() -> Datasets {
    Datasets::load(
        Path::new("samples/data/co2_sample.csv"),
        Some(Path::new("samples/data/wdi_sample.csv")),
    )
    .expect("samples should load")
}

fn world() -> WorldMap {
    WorldMap::load_geojson("samples/maps/world_sample.geojson").expect("sample map should load")
}

fn selection(data: &Datasets) -> Selection {
    let mut selection = Selection::new(data.year_range().unwrap(), 10);
    for key in ["DEU", "FRA", "CHN"] {
        selection.apply(Event::ToggleCountry(key.to_string()));
    }
    selection.apply(Event::SetIndicator(Some("NY.GDP.PCAP.CD".to_string())));
    selection.apply(Event::Focus("DEU".to_string()));
    selection
}

#[test]
fn test_full_dashboard_panels() {
    let data = datasets();
    let map = world();
    let selection = selection(&data);
    let dashboard = Dashboard::new(&data, &selection).with_map(&map);

    let ids: Vec<&str> = dashboard.panels().iter().map(|p| p.id).collect();
    assert_eq!(ids, ["emissions", "indicator", "sources", "map"]);
    assert_eq!(dashboard.title(), "CO₂ emissions by country, 2000–2020");
    assert_eq!(
        dashboard.indicator_name().as_deref(),
        Some("GDP per capita (current US$)")
    );

    let summary = dashboard.summary();
    assert_eq!(summary.len(), 3);
    assert_eq!(summary[0].name, "Germany");
    assert_eq!(summary[0].latest_text(), "640 (2020)");
    assert_eq!(summary[0].change_text(), "-28.9%");
}

#[test]
fn test_html_dashboard_file() {
    let data = datasets();
    let map = world();
    let selection = selection(&data);
    let dashboard = Dashboard::new(&data, &selection)
        .with_map(&map)
        .with_projection(Projection::Mercator);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dashboard.html");
    HtmlReporter::new().generate(&dashboard, &path).unwrap();

    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert_eq!(html.matches("<svg ").count(), 4);
    assert!(html.contains("id=\"panel-map\""));
    assert!(html.contains("[\"DEU\",\"FRA\",\"CHN\"]"));
    assert!(html.contains("<tr data-key=\"CHN\">"));
    assert!(html.contains("data-tip=\"Germany&#10;2020: 640 Mt\""));
}

#[test]
fn test_markdown_dashboard() {
    let data = datasets();
    let mut selection = selection(&data);
    selection.apply(Event::SetRange(2010, 2020));
    let dashboard = Dashboard::new(&data, &selection);

    let md = MarkdownReporter::new().render(&dashboard).unwrap();
    assert!(md.contains("CO₂ emissions by country, 2010–2020"));
    assert!(md.contains("| Year | Germany | France | China |"));
    assert!(md.contains("| 2020 | 640 | 280 | 10,900 |"));
    assert!(md.contains("| 2020 | 256 (40.0%) |"));
    assert!(!md.contains("{{"));
}

#[test]
fn test_svg_export_writes_one_file_per_panel() {
    let data = datasets();
    let map = world();
    let mut selection = selection(&data);
    selection.apply(Event::SetIndicator(None));
    selection.apply(Event::SetMetric(EmissionMetric::Co2PerCapita));
    let dashboard = Dashboard::new(&data, &selection).with_map(&map);

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("charts");
    let written = SvgReporter::new().write_all(&dashboard, &out).unwrap();

    let names: Vec<String> = written
        .iter()
        .filter_map(|p| p.file_name()?.to_str().map(str::to_string))
        .collect();
    assert_eq!(names, ["emissions.svg", "sources.svg", "map.svg"]);
    for path in &written {
        let svg = std::fs::read_to_string(path).unwrap();
        assert!(svg.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\""));
    }
}

#[test]
fn test_selection_events_drive_dashboard() {
    let data = datasets();
    let mut selection = Selection::new(data.year_range().unwrap(), 2);
    assert!(selection.apply(Event::ToggleCountry("IND".into())));
    assert!(selection.apply(Event::ToggleCountry("USA".into())));
    assert!(selection.apply(Event::ToggleCountry("CHL".into())));
    assert_eq!(selection.countries(), ["USA", "CHL"]);

    // Chile has no source columns in 2000, leaving four bars
    selection.apply(Event::Focus("CHL".into()));
    let dashboard = Dashboard::new(&data, &selection);
    assert_eq!(dashboard.source_mix().len(), 4);

    assert!(!selection.apply(Event::SetYear(2020)));
    selection.apply(Event::SetYear(2005));
    let dashboard = Dashboard::new(&data, &selection);
    assert_eq!(dashboard.map_values().get("USA"), Some(&6130.0));
}
