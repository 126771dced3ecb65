//! Integration tests for chart rendering from the bundled samples

use carbon_atlas::core::chart::palette::{NO_DATA, SEQUENTIAL_REDS};
use carbon_atlas::core::chart::{
    BarMode, ChoroplethMap, Frame, LineChart, Projection, StackedBarChart, WorldMap,
};
use carbon_atlas::core::data::{load_emissions, EmissionMetric, EmissionsTable};

const EMISSIONS: &str = "samples/data/co2_sample.csv";
const MAP: &str = "samples/maps/world_sample.geojson";

fn emissions() -> EmissionsTable {
    load_emissions(EMISSIONS).expect("sample emissions should load")
}

/// The single line of markup holding the element with `data-key="<key>"`
fn element_line<'a>(svg: &'a str, tag: &str, key: &str) -> &'a str {
    let needle = format!("data-key=\"{key}\"");
    svg.lines()
        .find(|l| l.starts_with(&format!("<{tag} ")) && l.contains(&needle))
        .unwrap_or_else(|| panic!("no <{tag}> for {key}"))
}

#[test]
fn test_line_chart_from_sample() {
    let table = emissions();
    let series = vec![
        table.series("DEU", EmissionMetric::Co2),
        table.series("FRA", EmissionMetric::Co2),
        table.series("ATL", EmissionMetric::Co2),
    ];
    let svg = LineChart::new("CO₂ emissions")
        .with_frame(Frame::new(640.0, 320.0))
        .with_axis("Mt", "Mt")
        .with_selected(&["DEU".to_string()])
        .render(&series);

    assert!(svg.starts_with("<svg "));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert_eq!(svg.matches("class=\"line\"").count(), 2);
    assert_eq!(svg.matches("class=\"point\"").count(), 10);
    assert!(svg.contains("<title>Germany&#10;2020: 640 Mt</title>"));
    assert!(element_line(&svg, "g", "DEU").contains("class=\"series selected\""));
    assert!(element_line(&svg, "g", "FRA").contains("class=\"series dimmed\""));
}

#[test]
fn test_stacked_bars_from_sample() {
    let table = emissions();
    let bars = table.source_mix_series("DEU", &(2000..=2020));
    assert_eq!(bars.len(), 5);

    let svg = StackedBarChart::new("Emission sources: Germany")
        .with_unit("Mt")
        .render(&bars);
    assert_eq!(svg.matches("class=\"bar\"").count(), 5);
    assert!(svg.contains("Coal: 256 Mt (40.0%)"));

    let percent = StackedBarChart::new("Shares")
        .with_mode(BarMode::Percent)
        .render(&bars);
    assert_eq!(percent.matches("class=\"bar\"").count(), 5);

    let empty = StackedBarChart::new("Chile").render(&table.source_mix_series("CHL", &(2000..=2000)));
    assert!(empty.contains("No source breakdown available"));
}

#[test]
fn test_world_map_sample() {
    let map = WorldMap::load_geojson(MAP).expect("sample map should load");

    // Null and point geometries are skipped
    assert_eq!(map.len(), 8);
    assert_eq!(map.feature("usa").map(|f| f.polygons.len()), Some(2));
    assert_eq!(map.feature("CHL").map(|f| f.name.as_str()), Some("Chile"));
    assert!(map.features().iter().any(|f| f.iso.is_none() && f.key() == "Kosovo"));

    let (min_lon, min_lat, max_lon, max_lat) = map.bounds().unwrap();
    assert_eq!((min_lon, max_lon), (-168.0, 135.0));
    assert_eq!((min_lat, max_lat), (-55.5, 70.0));
}

#[test]
fn test_choropleth_from_sample() {
    let map = WorldMap::load_geojson(MAP).unwrap();
    let values = emissions().values_for_year(2020, EmissionMetric::Co2);

    let svg = ChoroplethMap::new("CO₂ emissions in 2020")
        .with_unit("Mt")
        .with_projection(Projection::Mercator)
        .with_selected(&["IND".to_string()])
        .render(&map, &values);

    assert_eq!(svg.matches("<path class=\"country").count(), 8);
    let darkest = SEQUENTIAL_REDS[SEQUENTIAL_REDS.len() - 1];
    assert!(element_line(&svg, "path", "CHN").contains(&format!("fill=\"{darkest}\"")));
    assert!(element_line(&svg, "path", "CHL").contains(&format!("fill=\"{}\"", SEQUENTIAL_REDS[0])));
    assert!(element_line(&svg, "path", "BRA").contains(&format!("fill=\"{NO_DATA}\"")));
    assert!(element_line(&svg, "path", "IND").contains("class=\"country selected\""));
    assert!(svg.contains("<title>Brazil&#10;No data</title>"));
    assert!(svg.contains("<title>China&#10;10,900 Mt</title>"));
}

#[test]
fn test_choropleth_without_geometry() {
    let svg = ChoroplethMap::new("Empty").render(&WorldMap::default(), &Default::default());
    assert!(svg.contains("No map geometry loaded"));
}
