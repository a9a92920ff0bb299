//! Catalog of selectable base maps.

use crate::{MapError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Name of the base layer shown when a map is created
pub const DEFAULT_BASE_LAYER: &str = "World Imagery";

/// A named tile service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseLayerSpec {
    pub name: String,
    pub url_template: String,
    pub attribution: String,
    pub max_zoom: u8,
    /// Do not repeat the world horizontally
    #[serde(default)]
    pub no_wrap: bool,
}

impl BaseLayerSpec {
    pub fn new(
        name: impl Into<String>,
        url_template: impl Into<String>,
        attribution: impl Into<String>,
        max_zoom: u8,
    ) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
            attribution: attribution.into(),
            max_zoom,
            no_wrap: true,
        }
    }
}

static CATALOG: Lazy<Vec<BaseLayerSpec>> = Lazy::new(|| {
    vec![
        BaseLayerSpec::new(
            "Ocean Base",
            "https://server.arcgisonline.com/ArcGIS/rest/services/Ocean_Basemap/MapServer/tile/{z}/{y}/{x}",
            "Tiles &copy; Esri &mdash; Sources: GEBCO, NOAA, CHS, OSU, UNH, CSUMB, National Geographic, DeLorme, NAVTEQ, and Esri",
            13,
        ),
        BaseLayerSpec::new(
            "Nat Geo World Map",
            "https://server.arcgisonline.com/ArcGIS/rest/services/NatGeo_World_Map/MapServer/tile/{z}/{y}/{x}",
            "Tiles &copy; Esri &mdash; National Geographic, Esri, DeLorme, NAVTEQ, UNEP-WCMC, USGS, NASA, ESA, METI, NRCAN, GEBCO, NOAA, iPC",
            16,
        ),
        BaseLayerSpec::new(
            "Open Surfer Roads",
            "https://korona.geog.uni-heidelberg.de/tiles/roads/x={x}&y={y}&z={z}",
            "Imagery from <a href=\"http://giscience.uni-hd.de/\">GIScience Research Group @ University of Heidelberg</a> &mdash; Map data &copy; <a href=\"http://www.openstreetmap.org/copyright\">OpenStreetMap</a>",
            20,
        ),
        BaseLayerSpec::new(
            "World Topographic",
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Topo_Map/MapServer/tile/{z}/{y}/{x}",
            "Tiles &copy; Esri &mdash; Esri, DeLorme, NAVTEQ, TomTom, Intermap, iPC, USGS, FAO, NPS, NRCAN, GeoBase, Kadaster NL, Ordnance Survey, Esri Japan, METI, Esri China (Hong Kong), and the GIS User Community",
            16,
        ),
        BaseLayerSpec::new(
            "World Imagery",
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
            "Tiles &copy; Esri &mdash; Source: Esri, i-cubed, USDA, USGS, AEX, GeoEye, Getmapping, Aerogrid, IGN, IGP, UPR-EGP, and the GIS User Community",
            17,
        ),
    ]
});

/// Ordered set of base layers with exactly one active entry
#[derive(Debug, Clone, PartialEq)]
pub struct BaseLayerRegistry {
    specs: Vec<BaseLayerSpec>,
    active: usize,
}

impl BaseLayerRegistry {
    /// Registry over `specs` with `default` active
    pub fn new(specs: Vec<BaseLayerSpec>, default: &str) -> Result<Self> {
        let active = specs
            .iter()
            .position(|spec| spec.name == default)
            .ok_or_else(|| MapError::UnknownBaseLayer(default.to_string()))?;
        Ok(Self { specs, active })
    }

    /// The built-in catalog with "World Imagery" active
    pub fn catalog() -> Self {
        let active = CATALOG
            .iter()
            .position(|spec| spec.name == DEFAULT_BASE_LAYER)
            .unwrap_or(0);
        Self {
            specs: CATALOG.clone(),
            active,
        }
    }

    /// The built-in catalog with another entry active
    pub fn with_default(name: &str) -> Result<Self> {
        Self::new(CATALOG.clone(), name)
    }

    /// Makes `name` the active base layer
    pub fn activate(&mut self, name: &str) -> Result<&BaseLayerSpec> {
        let index = self
            .specs
            .iter()
            .position(|spec| spec.name == name)
            .ok_or_else(|| MapError::UnknownBaseLayer(name.to_string()))?;
        self.active = index;
        Ok(&self.specs[index])
    }

    pub fn active(&self) -> &BaseLayerSpec {
        &self.specs[self.active]
    }

    pub fn get(&self, name: &str) -> Option<&BaseLayerSpec> {
        self.specs.iter().find(|spec| spec.name == name)
    }

    /// Names in catalog order
    pub fn names(&self) -> Vec<&str> {
        self.specs.iter().map(|spec| spec.name.as_str()).collect()
    }

    pub fn specs(&self) -> &[BaseLayerSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

impl Default for BaseLayerRegistry {
    fn default() -> Self {
        Self::catalog()
    }
}
