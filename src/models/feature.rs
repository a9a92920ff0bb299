use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A geographic feature as returned by the Crown land registry (Tantalis).
///
/// The registry adds members that are not part of GeoJSON (for example
/// `geometry_name`); they are kept in `extra` so nothing is lost.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub geometry: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<TenureProperties>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Feature {
    pub fn new(id: impl Into<String>, geometry: Value) -> Self {
        Self {
            id: Some(id.into()),
            kind: Some("Feature".to_string()),
            geometry: Some(geometry),
            properties: None,
            extra: Map::new(),
        }
    }

    pub fn with_properties(mut self, properties: TenureProperties) -> Self {
        self.properties = Some(properties);
        self
    }
}

/// Tenure attributes attached to each registry feature.
///
/// None of these influence the map; they travel with the rendered layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct TenureProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_chr_stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crown_lands_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disposition_transaction_sid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_area_sqm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_length_m: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intrid_sid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objectid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible_business_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sw_anno_cad_data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenure_area_derivation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenure_area_in_hectares: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenure_document: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenure_expiry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenure_legal_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenure_location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenure_purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenure_stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenure_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenure_subpurpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenure_subtype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenure_type: Option<String>,
    /// Attributes not listed above
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_feature_keeps_foreign_members() {
        let feature: Feature = serde_json::from_value(json!({
            "type": "Feature",
            "id": "WHSE_TANTALIS.TA_CROWN_TENURES_SVW.fid-1",
            "geometry": { "type": "Point", "coordinates": [-123.0, 48.0] },
            "geometry_name": "SHAPE",
            "properties": {
                "TENURE_PURPOSE": "COMMERCIAL",
                "TENURE_AREA_IN_HECTARES": 1.25,
                "INTRID_SID": 42,
                "SOMETHING_NEW": true
            }
        }))
        .unwrap();

        assert_eq!(feature.kind.as_deref(), Some("Feature"));
        assert_eq!(feature.extra.get("geometry_name"), Some(&json!("SHAPE")));

        let properties = feature.properties.unwrap();
        assert_eq!(properties.tenure_purpose.as_deref(), Some("COMMERCIAL"));
        assert_eq!(properties.tenure_area_in_hectares, Some(1.25));
        assert_eq!(properties.intrid_sid, Some(42));
        assert_eq!(properties.other.get("SOMETHING_NEW"), Some(&json!(true)));
    }

    #[test]
    fn test_null_geometry() {
        let feature: Feature =
            serde_json::from_value(json!({ "id": "x", "geometry": null })).unwrap();
        assert!(feature.geometry.is_none());
    }
}
