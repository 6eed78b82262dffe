//! Fixed place catalog: a JSON array of place records on disk.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use thiserror::Error;
use tracing::info;

use crate::models::Place;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parse a JSON array of place records
pub fn parse_places(bytes: &[u8]) -> Result<Vec<Place>, CatalogError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Load places from `path`, decompressing `.gz` files
pub fn load_places(path: &Path) -> Result<Vec<Place>, CatalogError> {
    info!("Loading place catalog from {}", path.display());

    let io_err = |source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_err)?;
    let mut reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(io_err)?;

    let places = parse_places(&bytes)?;
    info!(
        "Loaded {} places ({} with coordinates)",
        places.len(),
        places.iter().filter(|p| p.coordinate.is_some()).count()
    );
    Ok(places)
}
