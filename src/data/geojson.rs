use crate::{
    core::geo::{LatLng, LatLngBounds},
    data::normalize::NormalizeError,
};
use geo::BoundingRect;
use geo_types::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Polygon,
};
use serde::{Deserialize, Serialize};

/// A GeoJSON position reduced to longitude and latitude.
///
/// Extra members (altitude, measures) are accepted on input and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "[f64; 2]")]
pub struct Position {
    pub lng: f64,
    pub lat: f64,
}

impl Position {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    pub fn to_lat_lng(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }

    fn to_coord(self) -> Coord<f64> {
        Coord {
            x: self.lng,
            y: self.lat,
        }
    }
}

impl TryFrom<Vec<f64>> for Position {
    type Error = NormalizeError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        match values.as_slice() {
            [lng, lat, ..] if lng.is_finite() && lat.is_finite() => Ok(Self::new(*lng, *lat)),
            [_, _, ..] => Err(NormalizeError::InvalidPosition(format!(
                "non-finite coordinate in {values:?}"
            ))),
            _ => Err(NormalizeError::InvalidPosition(format!(
                "expected at least 2 numbers, found {}",
                values.len()
            ))),
        }
    }
}

impl From<Position> for [f64; 2] {
    fn from(position: Position) -> Self {
        [position.lng, position.lat]
    }
}

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GeoJsonGeometry {
    Point {
        coordinates: Position,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<GeoJsonGeometry>,
    },
}

impl GeoJsonGeometry {
    pub fn type_name(&self) -> &'static str {
        match self {
            GeoJsonGeometry::Point { .. } => "Point",
            GeoJsonGeometry::LineString { .. } => "LineString",
            GeoJsonGeometry::Polygon { .. } => "Polygon",
            GeoJsonGeometry::MultiPoint { .. } => "MultiPoint",
            GeoJsonGeometry::MultiLineString { .. } => "MultiLineString",
            GeoJsonGeometry::MultiPolygon { .. } => "MultiPolygon",
            GeoJsonGeometry::GeometryCollection { .. } => "GeometryCollection",
        }
    }

    /// Converts to a `geo_types` geometry for spatial algorithms
    pub fn to_geo(&self) -> Geometry<f64> {
        match self {
            GeoJsonGeometry::Point { coordinates } => {
                Geometry::Point(coordinates.to_coord().into())
            }
            GeoJsonGeometry::LineString { coordinates } => {
                Geometry::LineString(line_string(coordinates))
            }
            GeoJsonGeometry::Polygon { coordinates } => Geometry::Polygon(polygon(coordinates)),
            GeoJsonGeometry::MultiPoint { coordinates } => Geometry::MultiPoint(MultiPoint(
                coordinates.iter().map(|p| p.to_coord().into()).collect(),
            )),
            GeoJsonGeometry::MultiLineString { coordinates } => Geometry::MultiLineString(
                MultiLineString(coordinates.iter().map(|l| line_string(l)).collect()),
            ),
            GeoJsonGeometry::MultiPolygon { coordinates } => Geometry::MultiPolygon(
                MultiPolygon(coordinates.iter().map(|p| polygon(p)).collect()),
            ),
            GeoJsonGeometry::GeometryCollection { geometries } => Geometry::GeometryCollection(
                GeometryCollection(geometries.iter().map(GeoJsonGeometry::to_geo).collect()),
            ),
        }
    }

    /// Bounding box of all positions, `None` for empty geometries
    pub fn bounds(&self) -> Option<LatLngBounds> {
        let rect = self.to_geo().bounding_rect()?;
        Some(LatLngBounds::from_coords(
            rect.min().y,
            rect.min().x,
            rect.max().y,
            rect.max().x,
        ))
    }

    /// Number of positions, nested members included
    pub fn position_count(&self) -> usize {
        match self {
            GeoJsonGeometry::Point { .. } => 1,
            GeoJsonGeometry::LineString { coordinates }
            | GeoJsonGeometry::MultiPoint { coordinates } => coordinates.len(),
            GeoJsonGeometry::Polygon { coordinates }
            | GeoJsonGeometry::MultiLineString { coordinates } => {
                coordinates.iter().map(Vec::len).sum()
            }
            GeoJsonGeometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .flat_map(|polygon| polygon.iter().map(Vec::len))
                .sum(),
            GeoJsonGeometry::GeometryCollection { geometries } => {
                geometries.iter().map(GeoJsonGeometry::position_count).sum()
            }
        }
    }
}

fn line_string(positions: &[Position]) -> LineString<f64> {
    LineString::new(positions.iter().map(|p| p.to_coord()).collect())
}

fn polygon(rings: &[Vec<Position>]) -> Polygon<f64> {
    let mut rings = rings.iter().map(|ring| line_string(ring));
    let exterior = rings.next().unwrap_or_else(|| LineString::new(Vec::new()));
    Polygon::new(exterior, rings.collect())
}

/// A standards-compliant GeoJSON Feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct GeoJsonFeature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    pub geometry: GeoJsonGeometry,
    #[serde(default)]
    pub properties: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
}

impl GeoJsonFeature {
    pub fn new(geometry: GeoJsonGeometry) -> Self {
        Self {
            id: None,
            geometry,
            properties: None,
            bbox: None,
        }
    }

    /// Feature id as a string, when one is present
    pub fn id_string(&self) -> Option<String> {
        match self.id.as_ref()? {
            serde_json::Value::String(id) => Some(id.clone()),
            serde_json::Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    pub fn bounds(&self) -> Option<LatLngBounds> {
        self.geometry.bounds()
    }
}
