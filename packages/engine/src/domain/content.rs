//! Shape catalog
//!
//! Shape definitions arrive as a JSON bundle (same shape as the rest of the
//! content pipeline: camelCase keys, a format version, a flat list). Every
//! definition is prepared exactly once here; scenes only clone the `Arc`s.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::config::GeometryConfig;
use crate::core::{EngineError, GeometryError};
use crate::geometry::{prepare_outline, PreparedShape};

use super::shape::{PaintRefs, ShapeDefinition};

pub const BUNDLE_FORMAT_VERSION: u32 = 1;

/// One definition plus the outcome of preparing it
#[derive(Clone, Debug)]
pub struct CatalogEntry {
    pub definition: Arc<ShapeDefinition>,
    pub prepared: Result<Arc<PreparedShape>, GeometryError>,
}

#[derive(Clone, Debug, Default)]
pub struct ShapeCatalog {
    entries: Vec<CatalogEntry>,
}

impl ShapeCatalog {
    pub fn from_bundle_json(json: &str, geometry: &GeometryConfig) -> Result<Self, EngineError> {
        let bundle: BundleRoot = serde_json::from_str(json).map_err(EngineError::Bundle)?;
        if bundle.format_version != BUNDLE_FORMAT_VERSION {
            return Err(EngineError::BundleVersion(bundle.format_version));
        }
        let defs = bundle
            .shapes
            .into_iter()
            .map(|s| ShapeDefinition {
                id: s.id,
                path_data: s.d,
                paint: s.paint,
                count: s.count,
            })
            .collect();
        Ok(Self::from_definitions(defs, geometry))
    }

    /// Prepare every definition. Failures are logged and kept as skipped entries.
    pub fn from_definitions(defs: Vec<ShapeDefinition>, geometry: &GeometryConfig) -> Self {
        let entries = defs
            .into_iter()
            .map(|def| {
                let prepared = prepare_outline(&def.id, &def.path_data, geometry).map(Arc::new);
                if let Err(err) = &prepared {
                    log::warn!("shape '{}' skipped: {}", def.id, err);
                }
                CatalogEntry { definition: Arc::new(def), prepared }
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn prepared_count(&self) -> usize {
        self.entries.iter().filter(|e| e.prepared.is_ok()).count()
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.definition.id == id)
    }

    /// Definition/shape pairs in spawn order, each repeated `count` times.
    /// Skipped definitions contribute nothing.
    pub fn spawn_list(&self) -> Vec<(Arc<ShapeDefinition>, Arc<PreparedShape>)> {
        let mut out = Vec::new();
        for entry in &self.entries {
            let Ok(shape) = &entry.prepared else {
                continue;
            };
            for _ in 0..entry.definition.count {
                out.push((entry.definition.clone(), shape.clone()));
            }
        }
        out
    }

    pub fn manifest_json(&self) -> String {
        let shapes: Vec<ManifestShape> = self
            .entries
            .iter()
            .map(|e| ManifestShape {
                id: &e.definition.id,
                count: e.definition.count,
                prepared: e.prepared.is_ok(),
                vertices: e
                    .prepared
                    .as_ref()
                    .map(|s| s.polygon.len().saturating_sub(1))
                    .unwrap_or(0),
                error: e.prepared.as_ref().err().map(|err| err.to_string()),
            })
            .collect();
        let out = Manifest { format_version: BUNDLE_FORMAT_VERSION, shapes };
        serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
    }
}

fn default_count() -> u32 {
    1
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleRoot {
    format_version: u32,
    shapes: Vec<BundleShape>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BundleShape {
    id: String,
    d: String,
    #[serde(flatten)]
    paint: PaintRefs,
    #[serde(default = "default_count")]
    count: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Manifest<'a> {
    format_version: u32,
    shapes: Vec<ManifestShape<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ManifestShape<'a> {
    id: &'a str,
    count: u32,
    prepared: bool,
    vertices: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLE: &str = r#"{
        "formatVersion": 1,
        "shapes": [
            { "id": "square", "d": "M0 0 L100 0 L100 100 L0 100 Z", "fillVar": "--a", "count": 3 },
            { "id": "broken", "d": "", "count": 5 },
            { "id": "tri", "d": "M0 0 L80 0 L40 60 Z", "strokeVar": "--b", "strokeWidth": 2 }
        ]
    }"#;

    #[test]
    fn bundle_parses_and_skips_bad_outlines() {
        let catalog = ShapeCatalog::from_bundle_json(BUNDLE, &GeometryConfig::default()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.prepared_count(), 2);
        assert!(catalog.get("broken").unwrap().prepared.is_err());

        let tri = catalog.get("tri").unwrap();
        assert_eq!(tri.definition.count, 1);
        assert_eq!(tri.definition.paint.stroke_width, 2.0);
        assert_eq!(tri.definition.paint.stroke_var.as_deref(), Some("--b"));
    }

    #[test]
    fn spawn_list_repeats_by_count_and_shares_geometry() {
        let catalog = ShapeCatalog::from_bundle_json(BUNDLE, &GeometryConfig::default()).unwrap();
        let list = catalog.spawn_list();
        assert_eq!(list.len(), 4);
        assert!(Arc::ptr_eq(&list[0].1, &list[2].1));
        assert_eq!(list[3].0.id, "tri");
    }

    #[test]
    fn wrong_version_is_rejected() {
        let err = ShapeCatalog::from_bundle_json(
            r#"{ "formatVersion": 9, "shapes": [] }"#,
            &GeometryConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::BundleVersion(9)));
    }

    #[test]
    fn manifest_reports_skipped_shapes() {
        let catalog = ShapeCatalog::from_bundle_json(BUNDLE, &GeometryConfig::default()).unwrap();
        let manifest: serde_json::Value = serde_json::from_str(&catalog.manifest_json()).unwrap();
        let shapes = manifest["shapes"].as_array().unwrap();
        assert_eq!(shapes[1]["prepared"], false);
        assert!(shapes[1]["error"].is_string());
        assert_eq!(shapes[0]["vertices"], 4);
    }
}
