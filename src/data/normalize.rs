//! Turns land-registry features into strict GeoJSON.
//!
//! Registry features carry members the GeoJSON format does not define (notably
//! `geometry_name`). Such features are rejected by strict consumers, so every
//! feature is copied, stripped down to the standard members and its geometry
//! parsed into [`GeoJsonGeometry`]. The caller's feature is never modified.

use crate::{
    data::geojson::{GeoJsonFeature, GeoJsonGeometry, Position},
    models::Feature,
};
use serde_json::{Map, Value};

/// Top-level members a GeoJSON Feature may carry
pub const STANDARD_MEMBERS: [&str; 5] = ["type", "id", "geometry", "properties", "bbox"];

/// Why a feature could not be turned into renderable GeoJSON
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NormalizeError {
    #[error("feature has no geometry")]
    MissingGeometry,

    #[error("malformed geometry: {0}")]
    MalformedGeometry(String),

    #[error("invalid position: {0}")]
    InvalidPosition(String),
}

/// A feature left out of a batch, with the reason
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFeature {
    /// Position of the feature in the input
    pub index: usize,
    pub feature_id: Option<String>,
    pub reason: NormalizeError,
}

/// Copies `feature` into a standards-compliant GeoJSON Feature
pub fn normalize_feature(feature: &Feature) -> Result<GeoJsonFeature, NormalizeError> {
    let value = serde_json::to_value(feature)
        .map_err(|e| NormalizeError::MalformedGeometry(e.to_string()))?;
    let Value::Object(mut members) = value else {
        return Err(NormalizeError::MalformedGeometry(
            "feature is not an object".to_string(),
        ));
    };

    strip_foreign_members(&mut members);

    let geometry = match members.get("geometry") {
        None | Some(Value::Null) => return Err(NormalizeError::MissingGeometry),
        Some(geometry) => parse_geometry(geometry)?,
    };

    let properties = match members.remove("properties") {
        Some(Value::Object(properties)) => Some(properties),
        _ => None,
    };

    let bbox = members
        .remove("bbox")
        .and_then(|bbox| serde_json::from_value::<Vec<f64>>(bbox).ok());

    Ok(GeoJsonFeature {
        id: members.remove("id").filter(|id| !id.is_null()),
        geometry,
        properties,
        bbox,
    })
}

/// Normalizes a batch; a failing feature is skipped without affecting the rest
pub fn normalize_features(features: &[Feature]) -> (Vec<GeoJsonFeature>, Vec<SkippedFeature>) {
    let mut normalized = Vec::with_capacity(features.len());
    let mut skipped = Vec::new();

    for (index, feature) in features.iter().enumerate() {
        match normalize_feature(feature) {
            Ok(geojson) => normalized.push(geojson),
            Err(reason) => skipped.push(SkippedFeature {
                index,
                feature_id: feature.id.clone(),
                reason,
            }),
        }
    }

    (normalized, skipped)
}

fn strip_foreign_members(members: &mut Map<String, Value>) {
    members.retain(|key, _| STANDARD_MEMBERS.contains(&key.as_str()));
}

/// Parses a GeoJSON geometry object
pub fn parse_geometry(value: &Value) -> Result<GeoJsonGeometry, NormalizeError> {
    let object = value.as_object().ok_or_else(|| {
        NormalizeError::MalformedGeometry(format!("expected an object, found {value}"))
    })?;
    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| NormalizeError::MalformedGeometry("geometry has no type".to_string()))?;

    if kind == "GeometryCollection" {
        let geometries = object
            .get("geometries")
            .map(|geometries| array(geometries, "geometries"))
            .transpose()?
            .ok_or_else(|| {
                NormalizeError::MalformedGeometry(
                    "GeometryCollection has no geometries".to_string(),
                )
            })?;
        return Ok(GeoJsonGeometry::GeometryCollection {
            geometries: geometries
                .iter()
                .map(parse_geometry)
                .collect::<Result<_, _>>()?,
        });
    }

    let coordinates = object
        .get("coordinates")
        .ok_or_else(|| NormalizeError::MalformedGeometry(format!("{kind} has no coordinates")))?;

    let geometry = match kind {
        "Point" => GeoJsonGeometry::Point {
            coordinates: position(coordinates)?,
        },
        "LineString" => GeoJsonGeometry::LineString {
            coordinates: positions(coordinates)?,
        },
        "MultiPoint" => GeoJsonGeometry::MultiPoint {
            coordinates: positions(coordinates)?,
        },
        "Polygon" => GeoJsonGeometry::Polygon {
            coordinates: rings(coordinates)?,
        },
        "MultiLineString" => GeoJsonGeometry::MultiLineString {
            coordinates: rings(coordinates)?,
        },
        "MultiPolygon" => GeoJsonGeometry::MultiPolygon {
            coordinates: array(coordinates, kind)?
                .iter()
                .map(rings)
                .collect::<Result<_, _>>()?,
        },
        other => {
            return Err(NormalizeError::MalformedGeometry(format!(
                "unknown geometry type `{other}`"
            )))
        }
    };

    Ok(geometry)
}

fn array<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>, NormalizeError> {
    value
        .as_array()
        .ok_or_else(|| NormalizeError::MalformedGeometry(format!("{what} must be an array")))
}

fn position(value: &Value) -> Result<Position, NormalizeError> {
    let items = value.as_array().ok_or_else(|| {
        NormalizeError::InvalidPosition(format!("expected an array, found {value}"))
    })?;
    let numbers = items
        .iter()
        .map(|item| {
            item.as_f64().ok_or_else(|| {
                NormalizeError::InvalidPosition(format!("expected a number, found {item}"))
            })
        })
        .collect::<Result<Vec<f64>, _>>()?;

    Position::try_from(numbers)
}

fn positions(value: &Value) -> Result<Vec<Position>, NormalizeError> {
    array(value, "coordinates")?.iter().map(position).collect()
}

fn rings(value: &Value) -> Result<Vec<Vec<Position>>, NormalizeError> {
    array(value, "coordinates")?.iter().map(positions).collect()
}
