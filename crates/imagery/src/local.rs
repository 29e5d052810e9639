//! File-backed image source over a local scene catalog.

use std::sync::Arc;

use async_trait::async_trait;
use ndarray::{Array3, Axis};
use tracing::{debug, info, instrument, warn};

use soc_common::{BandList, ObservationDate, RasterArray, Region, Result, SocError};

use crate::catalog::{SceneCatalog, SceneEntry};
use crate::composite::median_composite;
use crate::config::SceneSourceConfig;
use crate::scene::load_clipped;
use crate::source::ImageSource;
use crate::spectral::{add_indices, INDEXED_BANDS};

/// Composites Sentinel-2 scenes listed in a [`SceneCatalog`].
pub struct LocalSceneSource {
    config: SceneSourceConfig,
    catalog: Arc<SceneCatalog>,
    bands: BandList,
}

impl LocalSceneSource {
    pub fn new(config: SceneSourceConfig, catalog: SceneCatalog, bands: BandList) -> Result<Self> {
        config
            .validate()
            .map_err(SocError::invalid_configuration)?;
        band_indices(&bands)?;

        Ok(Self {
            config,
            catalog: Arc::new(catalog),
            bands,
        })
    }

    /// Load the catalog named by `config.catalog_path`.
    pub fn from_config(config: SceneSourceConfig, bands: BandList) -> Result<Self> {
        let catalog = SceneCatalog::load(&config.catalog_path)?;
        info!(
            scenes = catalog.scenes.len(),
            catalog = %config.catalog_path.display(),
            "Scene catalog loaded"
        );
        Self::new(config, catalog, bands)
    }

    pub fn config(&self) -> &SceneSourceConfig {
        &self.config
    }

    pub fn catalog(&self) -> &SceneCatalog {
        &self.catalog
    }
}

#[async_trait]
impl ImageSource for LocalSceneSource {
    #[instrument(skip(self), fields(region = %region, date = %date.date()))]
    async fn fetch(&self, region: &Region, date: ObservationDate) -> Result<RasterArray> {
        let window = date.window(self.config.window_days);
        let scenes: Vec<SceneEntry> = self
            .catalog
            .select(region, &window, self.config.max_cloud_percentage)
            .into_iter()
            .cloned()
            .collect();

        info!(scenes = scenes.len(), window = %window, "Selected scenes for composite");

        if scenes.is_empty() {
            return Err(SocError::no_imagery(
                date.date().to_string(),
                format!(
                    "no scenes with <{}% cloud cover in {}",
                    self.config.max_cloud_percentage, window
                ),
            ));
        }

        let region = *region;
        let bands = self.bands.clone();
        let gsd_m = self.config.gsd_m;
        let date_label = date.date().to_string();

        tokio::task::spawn_blocking(move || {
            composite_scenes(&scenes, &region, &bands, gsd_m, &date_label)
        })
        .await
        .map_err(|e| SocError::image_source(format!("compositing task failed: {}", e)))?
    }

    fn name(&self) -> &str {
        "local-scenes"
    }
}

fn band_indices(bands: &BandList) -> Result<Vec<usize>> {
    bands
        .names()
        .iter()
        .map(|name| {
            INDEXED_BANDS
                .iter()
                .position(|band| band == name)
                .ok_or_else(|| {
                    SocError::invalid_configuration(format!(
                        "band {} is not produced by the scene source (available: {})",
                        name,
                        INDEXED_BANDS.join(",")
                    ))
                })
        })
        .collect()
}

fn composite_scenes(
    scenes: &[SceneEntry],
    region: &Region,
    bands: &BandList,
    gsd_m: f64,
    date_label: &str,
) -> Result<RasterArray> {
    let mut layers: Vec<Array3<f32>> = Vec::with_capacity(scenes.len());

    for scene in scenes {
        let Some(reflectance) = load_clipped(scene, region)? else {
            continue;
        };

        if let Some(first) = layers.first() {
            let (rows, cols, _) = first.dim();
            let (scene_rows, scene_cols, _) = reflectance.dim();
            if (rows, cols) != (scene_rows, scene_cols) {
                warn!(
                    scene = %scene.id,
                    expected = ?(rows, cols),
                    actual = ?(scene_rows, scene_cols),
                    "Skipping scene on a different grid"
                );
                continue;
            }
        }

        debug!(scene = %scene.id, "Scene clipped and masked");
        layers.push(add_indices(reflectance.view()));
    }

    if layers.is_empty() {
        return Err(SocError::no_imagery(
            date_label,
            "no selected scene overlaps the region",
        ));
    }

    let composite = median_composite(&layers)?;
    let selected = composite.select(Axis(2), &band_indices(bands)?);

    RasterArray::new(selected, bands.names().to_vec(), gsd_m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_band_rejected() {
        let bands = BandList::parse("B2,B5").unwrap();
        let result =
            LocalSceneSource::new(SceneSourceConfig::default(), SceneCatalog::default(), bands);
        assert!(matches!(result, Err(SocError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_band_indices_follow_requested_order() {
        let bands = BandList::parse("BSI,B2,NDVI").unwrap();
        assert_eq!(band_indices(&bands).unwrap(), vec![7, 0, 5]);
    }

    #[tokio::test]
    async fn test_empty_catalog_has_no_imagery() {
        let source = LocalSceneSource::new(
            SceneSourceConfig::default(),
            SceneCatalog::default(),
            BandList::default(),
        )
        .unwrap();
        let date = ObservationDate::from_ymd(2023, 6, 15).unwrap();
        let result = source.fetch(&Region::new(0.0, 0.0, 1.0, 1.0), date).await;
        assert!(matches!(result, Err(SocError::NoImageryAvailable { .. })));
    }
}
