//! Reading boundary collections from disk and writing them back.
//!
//! Loading is all-or-nothing: any I/O or parse failure is returned before
//! a single feature reaches the pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::models::{FeatureCollection, Layer};

/// Path of a layer's dataset inside `data_dir`
pub fn layer_path(data_dir: &Path, layer: Layer) -> PathBuf {
    data_dir.join(format!("{}.geojson", layer.file_stem()))
}

/// Parse a GeoJSON feature collection, dropping any pipeline-owned keys.
pub fn parse_collection(content: &str) -> serde_json::Result<FeatureCollection> {
    let mut collection: FeatureCollection = serde_json::from_str(content)?;
    let stripped = collection.strip_derived();
    if stripped > 0 {
        warn!("Dropped {} derived keys found in source properties", stripped);
    }
    Ok(collection)
}

pub fn load_collection<P: AsRef<Path>>(path: P) -> Result<FeatureCollection> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let collection = parse_collection(&content).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    info!(
        "Loaded {} features from {}",
        collection.len(),
        path.display()
    );
    Ok(collection)
}

/// Load `<data_dir>/<layer>.geojson`
pub fn load_layer(data_dir: &Path, layer: Layer) -> Result<FeatureCollection> {
    load_collection(layer_path(data_dir, layer))
}

/// Write a processed collection with its derived metrics.
pub fn write_annotated<P: AsRef<Path>>(path: P, collection: &FeatureCollection) -> Result<()> {
    let json = serde_json::to_string(&collection.annotated())?;
    write_file(path.as_ref(), &json)
}

/// Write a collection as canonical source data, derived metrics omitted.
pub fn write_canonical<P: AsRef<Path>>(path: P, collection: &FeatureCollection) -> Result<()> {
    let json = collection.to_canonical_json()?;
    write_file(path.as_ref(), &json)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, content).map_err(io_err)?;
    info!("Wrote {}", path.display());
    Ok(())
}
