//! Scene catalog loading and filtering.
//!
//! ```yaml
//! scenes:
//!   - id: S2A_20230610_T32TMR
//!     date: 2023-06-10
//!     cloudy_pixel_percentage: 4.2
//!     bbox: { min_lon: 9.0, min_lat: 45.1, max_lon: 9.3, max_lat: 45.3 }
//!     width: 512
//!     height: 512
//!     path: S2A_20230610_T32TMR.bin
//! ```
//!
//! Scene paths are resolved relative to the catalog file's directory.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use soc_common::{CompositingWindow, Region, Result, SocError};

/// One Sentinel-2 scene on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneEntry {
    pub id: String,
    /// Acquisition date.
    pub date: NaiveDate,
    pub cloudy_pixel_percentage: f64,
    /// Footprint of the scene grid.
    pub bbox: Region,
    /// Columns in the scene grid.
    pub width: usize,
    /// Rows in the scene grid.
    pub height: usize,
    /// Raw little-endian f32 file, band-interleaved by pixel.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneCatalog {
    #[serde(default)]
    pub scenes: Vec<SceneEntry>,
}

impl SceneCatalog {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| SocError::invalid_configuration(format!("invalid scene catalog: {}", e)))
    }

    /// Load a catalog file and resolve scene paths against its directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            SocError::image_source(format!("cannot read catalog {}: {}", path.display(), e))
        })?;
        let mut catalog = Self::from_yaml(&yaml)?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for scene in &mut catalog.scenes {
            if scene.path.is_relative() {
                scene.path = base.join(&scene.path);
            }
        }

        debug!(scenes = catalog.scenes.len(), path = %path.display(), "Loaded scene catalog");
        Ok(catalog)
    }

    /// Scenes acquired inside `window`, overlapping `region`, and below the
    /// cloud threshold, in acquisition order.
    pub fn select(
        &self,
        region: &Region,
        window: &CompositingWindow,
        max_cloud_percentage: f64,
    ) -> Vec<&SceneEntry> {
        let mut selected: Vec<&SceneEntry> = self
            .scenes
            .iter()
            .filter(|scene| window.contains(scene.date))
            .filter(|scene| scene.bbox.intersects(region))
            .filter(|scene| scene.cloudy_pixel_percentage < max_cloud_percentage)
            .collect();
        selected.sort_by_key(|scene| scene.date);
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soc_common::ObservationDate;

    const CATALOG: &str = r#"
scenes:
  - id: early
    date: 2023-05-20
    cloudy_pixel_percentage: 2.0
    bbox: { min_lon: 0.0, min_lat: 0.0, max_lon: 1.0, max_lat: 1.0 }
    width: 4
    height: 4
    path: early.bin
  - id: cloudy
    date: 2023-06-12
    cloudy_pixel_percentage: 20.0
    bbox: { min_lon: 0.0, min_lat: 0.0, max_lon: 1.0, max_lat: 1.0 }
    width: 4
    height: 4
    path: cloudy.bin
  - id: clear
    date: 2023-06-10
    cloudy_pixel_percentage: 5.5
    bbox: { min_lon: 0.0, min_lat: 0.0, max_lon: 1.0, max_lat: 1.0 }
    width: 4
    height: 4
    path: clear.bin
  - id: elsewhere
    date: 2023-06-11
    cloudy_pixel_percentage: 1.0
    bbox: { min_lon: 50.0, min_lat: 50.0, max_lon: 51.0, max_lat: 51.0 }
    width: 4
    height: 4
    path: /abs/elsewhere.bin
"#;

    #[test]
    fn test_select_filters_window_cloud_and_footprint() {
        let catalog = SceneCatalog::from_yaml(CATALOG).unwrap();
        let window = ObservationDate::from_ymd(2023, 6, 15).unwrap().window(15);
        let region = Region::new(0.2, 0.2, 0.4, 0.4);

        let ids: Vec<&str> = catalog
            .select(&region, &window, 20.0)
            .iter()
            .map(|scene| scene.id.as_str())
            .collect();
        assert_eq!(ids, vec!["clear"]);
    }

    #[test]
    fn test_select_sorted_by_date() {
        let catalog = SceneCatalog::from_yaml(CATALOG).unwrap();
        let window = ObservationDate::from_ymd(2023, 6, 1).unwrap().window(15);
        let region = Region::new(0.2, 0.2, 0.4, 0.4);

        let ids: Vec<&str> = catalog
            .select(&region, &window, 50.0)
            .iter()
            .map(|scene| scene.id.as_str())
            .collect();
        assert_eq!(ids, vec!["early", "clear", "cloudy"]);
    }

    #[test]
    fn test_scene_on_window_end_not_selected() {
        let catalog = SceneCatalog::from_yaml(CATALOG).unwrap();
        let region = Region::new(0.2, 0.2, 0.4, 0.4);

        // "clear" is dated 2023-06-10, fifteen days after the centre.
        let ids = |center: ObservationDate| -> Vec<String> {
            catalog
                .select(&region, &center.window(15), 20.0)
                .iter()
                .map(|scene| scene.id.clone())
                .collect()
        };

        assert_eq!(ids(ObservationDate::from_ymd(2023, 5, 26).unwrap()), vec!["early"]);
        assert_eq!(
            ids(ObservationDate::from_ymd(2023, 5, 27).unwrap()),
            vec!["early", "clear"]
        );
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.yaml");
        std::fs::write(&path, CATALOG).unwrap();

        let catalog = SceneCatalog::load(&path).unwrap();
        assert_eq!(catalog.scenes[0].path, dir.path().join("early.bin"));
        assert_eq!(catalog.scenes[3].path, PathBuf::from("/abs/elsewhere.bin"));
    }

    #[test]
    fn test_invalid_yaml() {
        let result = SceneCatalog::from_yaml("scenes: [ { id: 1 } ]");
        assert!(matches!(result, Err(SocError::InvalidConfiguration(_))));
    }
}
