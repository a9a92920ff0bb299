use crate::core::geo::TileCoord;

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;
}

/// Leaflet-style URL template with `{z}`, `{x}`, `{y}` and `{s}` placeholders
#[derive(Debug, Clone, PartialEq)]
pub struct UrlTemplateSource {
    template: String,
    subdomains: Vec<String>,
}

impl UrlTemplateSource {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        }
    }

    pub fn with_subdomains(mut self, subdomains: Vec<String>) -> Self {
        self.subdomains = subdomains;
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }
}

impl TileSource for UrlTemplateSource {
    fn url(&self, coord: TileCoord) -> String {
        let mut url = self
            .template
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string());

        if url.contains("{s}") {
            // Guard against an empty subdomain list
            let sub = if self.subdomains.is_empty() {
                ""
            } else {
                let idx = ((coord.x + coord.y) % self.subdomains.len() as u32) as usize;
                self.subdomains[idx].as_str()
            };
            url = url.replace("{s}", sub);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arcgis_template() {
        let source = UrlTemplateSource::new(
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}",
        );
        assert_eq!(
            source.url(TileCoord::new(80, 175, 9)),
            "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/9/175/80"
        );
    }

    #[test]
    fn test_query_style_template() {
        let source =
            UrlTemplateSource::new("https://korona.geog.uni-heidelberg.de/tiles/roads/x={x}&y={y}&z={z}");
        assert_eq!(
            source.url(TileCoord::new(1, 2, 3)),
            "https://korona.geog.uni-heidelberg.de/tiles/roads/x=1&y=2&z=3"
        );
    }

    #[test]
    fn test_subdomains() {
        let source = UrlTemplateSource::new("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png");
        assert_eq!(
            source.url(TileCoord::new(1, 0, 1)),
            "https://b.tile.openstreetmap.org/1/1/0.png"
        );
    }
}
