//! Choropleth world map
//!
//! Country outlines come from a local GeoJSON `FeatureCollection`. Only
//! `Polygon` and `MultiPolygon` geometries are drawn; features are matched to
//! data by ISO 3166-1 alpha-3 code read from the usual Natural Earth property
//! names, falling back to the feature `id`.

use super::axis::{format_compact, format_value};
use super::palette::{NO_DATA, SEQUENTIAL_REDS};
use super::scale::QuantizeScale;
use super::svg::{attr, num, SvgWriter};
use super::tooltip::Tooltip;
use super::{legend, no_data, title, Frame, LegendItem};
use crate::core::error::{DataError, DataResult};
use crate::{debug, info};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::f64::consts::PI;
use std::fmt::Write;
use std::path::Path;

const ISO_KEYS: [&str; 5] = ["ISO_A3", "iso_a3", "ISO3", "ADM0_A3", "iso_code"];
const NAME_KEYS: [&str; 4] = ["name", "NAME", "ADMIN", "name_long"];
const MERCATOR_LAT_LIMIT: f64 = 85.0;

#[derive(Debug, Deserialize)]
struct GeoJsonFeatureCollection {
    features: Vec<GeoJsonFeature>,
}

#[derive(Debug, Deserialize)]
struct GeoJsonFeature {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<GeoJsonGeometry>,
}

#[derive(Debug, Deserialize)]
struct GeoJsonGeometry {
    #[serde(rename = "type")]
    ty: String,
    #[serde(default)]
    coordinates: Value,
}

/// Closed ring of `(longitude, latitude)` pairs
pub type Ring = Vec<(f64, f64)>;

/// Outer ring followed by any holes
pub type Polygon = Vec<Ring>;

/// One drawable country
#[derive(Debug, Clone, PartialEq)]
pub struct MapFeature {
    /// Upper-case ISO alpha-3 code, when the feature carries one
    pub iso: Option<String>,
    /// Display name
    pub name: String,
    /// Polygons making up the country
    pub polygons: Vec<Polygon>,
}

impl MapFeature {
    /// Selection key: the ISO code, or the name without one
    #[must_use]
    pub fn key(&self) -> &str {
        self.iso.as_deref().unwrap_or(&self.name)
    }

    fn points(&self) -> impl Iterator<Item = &(f64, f64)> {
        self.polygons.iter().flatten().flatten()
    }
}

/// Country outlines ready for rendering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldMap {
    features: Vec<MapFeature>,
}

impl WorldMap {
    /// Build a map from already parsed features
    #[must_use]
    pub fn from_features(features: Vec<MapFeature>) -> Self {
        Self { features }
    }

    /// Parse a GeoJSON `FeatureCollection`
    ///
    /// # Errors
    /// Returns [`DataError::GeoJson`] when the text is not a feature collection.
    pub fn parse_geojson(text: &str) -> DataResult<Self> {
        let collection: GeoJsonFeatureCollection = serde_json::from_str(text)?;
        let total = collection.features.len();
        let features: Vec<MapFeature> = collection
            .features
            .into_iter()
            .filter_map(convert_feature)
            .collect();
        if features.len() < total {
            debug!(
                "Skipped {} map features without polygon geometry",
                total - features.len()
            );
        }
        Ok(Self { features })
    }

    /// Read and parse a GeoJSON file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_geojson<P: AsRef<Path>>(path: P) -> DataResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
        let map = Self::parse_geojson(&text)?;
        info!("Loaded {} map features from {}", map.len(), path.display());
        Ok(map)
    }

    /// Drawable features
    #[must_use]
    pub fn features(&self) -> &[MapFeature] {
        &self.features
    }

    /// Number of features
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the map has no features
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Feature with the given ISO code (case-insensitive)
    #[must_use]
    pub fn feature(&self, iso: &str) -> Option<&MapFeature> {
        self.features
            .iter()
            .find(|f| f.iso.as_deref().is_some_and(|code| code.eq_ignore_ascii_case(iso)))
    }

    /// `(min_lon, min_lat, max_lon, max_lat)` over every feature
    #[must_use]
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        self.features
            .iter()
            .flat_map(|f| f.points())
            .fold(None, |acc, &(lon, lat)| {
                Some(match acc {
                    None => (lon, lat, lon, lat),
                    Some((x0, y0, x1, y1)) => (x0.min(lon), y0.min(lat), x1.max(lon), y1.max(lat)),
                })
            })
    }
}

fn convert_feature(feature: GeoJsonFeature) -> Option<MapFeature> {
    let geometry = feature.geometry?;
    let polygons = match geometry.ty.as_str() {
        "Polygon" => parse_polygon(&geometry.coordinates).into_iter().collect(),
        "MultiPolygon" => geometry
            .coordinates
            .as_array()
            .map(|polys| polys.iter().filter_map(parse_polygon).collect())
            .unwrap_or_default(),
        _ => Vec::new(),
    };
    if polygons.is_empty() {
        return None;
    }

    let properties = feature.properties.unwrap_or_default();
    let iso = ISO_KEYS
        .iter()
        .filter_map(|key| properties.get(*key).and_then(Value::as_str))
        .chain(feature.id.as_ref().and_then(Value::as_str))
        .map(str::trim)
        .find(|code| code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()))
        .map(str::to_ascii_uppercase);
    let name = NAME_KEYS
        .iter()
        .find_map(|key| properties.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .or_else(|| iso.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    Some(MapFeature {
        iso,
        name,
        polygons,
    })
}

fn parse_polygon(value: &Value) -> Option<Polygon> {
    let rings: Polygon = value
        .as_array()?
        .iter()
        .filter_map(parse_ring)
        .filter(|ring| ring.len() >= 3)
        .collect();
    (!rings.is_empty()).then_some(rings)
}

fn parse_ring(value: &Value) -> Option<Ring> {
    let ring = value
        .as_array()?
        .iter()
        .filter_map(|pos| {
            let pos = pos.as_array()?;
            Some((pos.first()?.as_f64()?, pos.get(1)?.as_f64()?))
        })
        .collect();
    Some(ring)
}

/// Map projection from longitude/latitude onto the plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    /// Longitude and latitude used directly
    #[default]
    Equirectangular,
    /// Web Mercator, latitude clamped to ±85°
    Mercator,
}

impl Projection {
    /// Unscaled planar coordinates, y pointing north
    #[must_use]
    pub fn project(self, lon: f64, lat: f64) -> (f64, f64) {
        match self {
            Self::Equirectangular => (lon, lat),
            Self::Mercator => {
                let phi = lat
                    .clamp(-MERCATOR_LAT_LIMIT, MERCATOR_LAT_LIMIT)
                    .to_radians();
                (lon, (PI / 4.0 + phi / 2.0).tan().ln().to_degrees())
            }
        }
    }
}

impl std::str::FromStr for Projection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "equirectangular" | "plate-carree" => Ok(Self::Equirectangular),
            "mercator" => Ok(Self::Mercator),
            other => Err(format!("Unknown projection: {other}")),
        }
    }
}

/// Projection scaled and centred into a pixel box
#[derive(Debug, Clone, Copy)]
struct Fit {
    projection: Projection,
    scale: f64,
    min_x: f64,
    max_y: f64,
    offset: (f64, f64),
}

impl Fit {
    fn new(
        projection: Projection,
        bounds: (f64, f64, f64, f64),
        origin: (f64, f64),
        size: (f64, f64),
    ) -> Self {
        let (min_x, min_y) = projection.project(bounds.0, bounds.1);
        let (max_x, max_y) = projection.project(bounds.2, bounds.3);
        let (dx, dy) = ((max_x - min_x).max(1e-9), (max_y - min_y).max(1e-9));
        let scale = (size.0 / dx).min(size.1 / dy);
        Self {
            projection,
            scale,
            min_x,
            max_y,
            offset: (
                origin.0 + (size.0 - dx * scale) / 2.0,
                origin.1 + (size.1 - dy * scale) / 2.0,
            ),
        }
    }

    fn apply(&self, lon: f64, lat: f64) -> (f64, f64) {
        let (x, y) = self.projection.project(lon, lat);
        (
            self.offset.0 + (x - self.min_x) * self.scale,
            self.offset.1 + (self.max_y - y) * self.scale,
        )
    }
}

/// World map shaded by one value per country
#[derive(Debug, Clone)]
pub struct ChoroplethMap {
    /// Size and margins
    pub frame: Frame,
    /// Title drawn above the map
    pub title: String,
    /// Unit appended to tooltip values
    pub unit: String,
    /// Projection used to draw outlines
    pub projection: Projection,
    /// Selected country keys, drawn with a heavy outline
    pub selected: Vec<String>,
}

impl ChoroplethMap {
    /// Create a map with the default frame and projection
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            frame: Frame::default(),
            title: title.into(),
            unit: String::new(),
            projection: Projection::default(),
            selected: Vec::new(),
        }
    }

    /// Set the frame
    #[must_use]
    pub const fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    /// Set the tooltip unit
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Set the projection
    #[must_use]
    pub const fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    /// Mark country keys as selected
    #[must_use]
    pub fn with_selected(mut self, selected: &[String]) -> Self {
        self.selected = selected.to_vec();
        self
    }

    /// Render to SVG markup. `values` is keyed by upper-case ISO code;
    /// countries without a finite value get the no-data fill.
    #[must_use]
    pub fn render(&self, map: &WorldMap, values: &HashMap<String, f64>) -> String {
        let frame = &self.frame;
        let mut svg = SvgWriter::new(frame.width, frame.height, "chart choropleth");
        title(&mut svg, frame, &self.title);

        let Some(bounds) = map.bounds() else {
            no_data(&mut svg, frame, "No map geometry loaded");
            return svg.finish();
        };

        let value_of = |feature: &MapFeature| {
            feature
                .iso
                .as_ref()
                .and_then(|iso| values.get(iso))
                .copied()
                .filter(|v| v.is_finite())
        };
        let scale = QuantizeScale::quantiles(
            map.features().iter().filter_map(value_of),
            &SEQUENTIAL_REDS,
        );

        let area = frame.plot_area();
        let fit = Fit::new(
            self.projection,
            bounds,
            (area.left, area.top),
            (area.right - area.left, area.bottom - area.top),
        );

        svg.open("g", &[attr("class", "countries")]);
        for feature in map.features() {
            let key = feature.key();
            let value = value_of(feature);
            let fill = value.and_then(|v| scale.color(v)).unwrap_or(NO_DATA);
            let is_selected = self.selected.iter().any(|k| k.eq_ignore_ascii_case(key));

            let (d, anchor) = feature_path(feature, &fit);
            let amount = value.map_or_else(
                || "No data".to_string(),
                |v| format!("{} {}", format_value(v), self.unit).trim_end().to_string(),
            );
            let tip = Tooltip::new([feature.name.clone(), amount]);
            let [tip_text, tip_x, tip_y] = tip.attrs(anchor, frame.viewport());

            svg.open(
                "path",
                &[
                    attr(
                        "class",
                        if is_selected {
                            "country selected"
                        } else {
                            "country"
                        },
                    ),
                    attr("data-key", key),
                    attr("d", d),
                    attr("fill", fill),
                    attr("stroke", if is_selected { "#000" } else { "#fff" }),
                    attr("stroke-width", if is_selected { 1.5 } else { 0.5 }),
                    tip_text,
                    tip_x,
                    tip_y,
                ],
            );
            svg.text("title", &[], &tip.text());
            svg.close();
        }
        svg.close();

        let labels = bin_labels(&scale);
        let mut items: Vec<LegendItem> = scale
            .colors()
            .iter()
            .zip(&labels)
            .map(|(color, label)| LegendItem {
                key: "",
                label: label.as_str(),
                color,
            })
            .collect();
        items.push(LegendItem {
            key: "",
            label: "No data",
            color: NO_DATA,
        });
        legend(&mut svg, frame, &items);

        svg.finish()
    }
}

/// Path data for every ring of a feature and the centre of its pixel bounds
fn feature_path(feature: &MapFeature, fit: &Fit) -> (String, (f64, f64)) {
    let mut d = String::new();
    let (mut x0, mut y0, mut x1, mut y1) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
    for ring in feature.polygons.iter().flatten() {
        for (i, &(lon, lat)) in ring.iter().enumerate() {
            let (x, y) = fit.apply(lon, lat);
            (x0, y0, x1, y1) = (x0.min(x), y0.min(y), x1.max(x), y1.max(y));
            let cmd = if i == 0 { 'M' } else { 'L' };
            let _ = write!(d, "{cmd}{},{}", num(x), num(y));
        }
        d.push('Z');
    }
    (d, ((x0 + x1) / 2.0, (y0 + y1) / 2.0))
}

/// Legend text for each colour bin
fn bin_labels(scale: &QuantizeScale) -> Vec<String> {
    let t = scale.thresholds();
    (0..scale.colors().len())
        .map(|i| match (i.checked_sub(1).and_then(|j| t.get(j)), t.get(i)) {
            (None, Some(hi)) => format!("< {}", format_compact(*hi)),
            (Some(lo), Some(hi)) => format!("{} – {}", format_compact(*lo), format_compact(*hi)),
            (Some(lo), None) => format!("≥ {}", format_compact(*lo)),
            (None, None) => "All values".to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
      "type": "FeatureCollection",
      "features": [
        {"type": "Feature", "properties": {"ISO_A3": "AAA", "NAME": "Alpha"},
         "geometry": {"type": "Polygon", "coordinates": [[[0,0],[10,0],[10,10],[0,10],[0,0]]]}},
        {"type": "Feature", "properties": {"ISO_A3": "-99", "ADM0_A3": "bbb", "name": "Beta"},
         "geometry": {"type": "MultiPolygon", "coordinates": [
            [[[20,0],[30,0],[30,10],[20,0]]],
            [[[40,-10],[50,-10],[50,0],[40,-10]]]
         ]}},
        {"type": "Feature", "id": "CCC", "properties": {},
         "geometry": {"type": "Polygon", "coordinates": [[[0,20],[5,20],[5,25],[0,20]]]}},
        {"type": "Feature", "properties": {"name": "Pin"},
         "geometry": {"type": "Point", "coordinates": [1, 1]}},
        {"type": "Feature", "properties": {"name": "Nowhere"}, "geometry": null}
      ]
    }"#;

    #[test]
    fn test_parse_keeps_polygons_only() {
        let map = WorldMap::parse_geojson(SAMPLE).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.feature("aaa").map(|f| f.name.as_str()), Some("Alpha"));
        assert_eq!(map.feature("BBB").map(|f| f.polygons.len()), Some(2));
        assert_eq!(map.feature("CCC").map(|f| f.name.as_str()), Some("CCC"));
    }

    #[test]
    fn test_bounds() {
        let map = WorldMap::parse_geojson(SAMPLE).unwrap();
        assert_eq!(map.bounds(), Some((0.0, -10.0, 50.0, 25.0)));
        assert_eq!(WorldMap::default().bounds(), None);
    }

    #[test]
    fn test_invalid_geojson_is_an_error() {
        assert!(matches!(
            WorldMap::parse_geojson("{\"type\": 1}"),
            Err(DataError::GeoJson(_))
        ));
    }

    #[test]
    fn test_mercator_is_finite_at_poles() {
        let (_, y) = Projection::Mercator.project(0.0, 90.0);
        assert!(y.is_finite());
        let (_, y0) = Projection::Mercator.project(0.0, 0.0);
        assert!(y0.abs() < 1e-9);
    }

    #[test]
    fn test_render_fills_and_no_data() {
        let map = WorldMap::parse_geojson(SAMPLE).unwrap();
        let values = HashMap::from([("AAA".to_string(), 5.0), ("BBB".to_string(), 500.0)]);
        let out = ChoroplethMap::new("CO₂ 2020")
            .with_unit("Mt")
            .with_selected(&["BBB".to_string()])
            .render(&map, &values);
        assert_eq!(out.matches("<path class=\"country").count(), 3);
        assert!(out.contains("class=\"country selected\" data-key=\"BBB\""));
        assert!(out.contains("data-tip=\"Alpha&#10;5 Mt\""));
        assert!(out.contains("data-tip=\"CCC&#10;No data\""));
        assert!(out.contains(&format!("fill=\"{NO_DATA}\"")));
    }

    #[test]
    fn test_render_empty_map() {
        let out = ChoroplethMap::new("Empty").render(&WorldMap::default(), &HashMap::new());
        assert!(out.contains("No map geometry loaded"));
    }

    #[test]
    fn test_projection_from_str() {
        assert_eq!("Mercator".parse::<Projection>(), Ok(Projection::Mercator));
        assert!("globe".parse::<Projection>().is_err());
    }
}
