//! Dataset locations: local files or http(s) URLs, optionally gzipped.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::debug;
use url::Url;

use super::RegionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetLocation {
    File(PathBuf),
    Remote(Url),
}

impl DatasetLocation {
    pub fn parse(location: &str) -> Result<Self, RegionError> {
        let trimmed = location.trim();
        if trimmed.is_empty() {
            return Err(RegionError::Location("empty dataset location".to_string()));
        }

        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            let url = Url::parse(trimmed)
                .map_err(|e| RegionError::Location(format!("{}: {}", trimmed, e)))?;
            return Ok(DatasetLocation::Remote(url));
        }

        Ok(DatasetLocation::File(PathBuf::from(trimmed)))
    }

    fn is_gzipped(&self) -> bool {
        match self {
            DatasetLocation::File(path) => path.extension().map_or(false, |e| e == "gz"),
            DatasetLocation::Remote(url) => url.path().ends_with(".gz"),
        }
    }

    /// Read the raw dataset bytes, decompressing `.gz` payloads
    pub async fn read(&self, client: &reqwest::Client) -> Result<Vec<u8>, RegionError> {
        let raw = match self {
            DatasetLocation::File(path) => read_file(path).await?,
            DatasetLocation::Remote(url) => {
                let response = client
                    .get(url.clone())
                    .send()
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(|e| RegionError::Fetch {
                        location: self.to_string(),
                        message: e.to_string(),
                    })?;
                response
                    .bytes()
                    .await
                    .map_err(|e| RegionError::Fetch {
                        location: self.to_string(),
                        message: e.to_string(),
                    })?
                    .to_vec()
            }
        };

        debug!("Read {} bytes from {}", raw.len(), self);

        if !self.is_gzipped() {
            return Ok(raw);
        }

        let mut decoded = Vec::new();
        GzDecoder::new(raw.as_slice())
            .read_to_end(&mut decoded)
            .map_err(|source| RegionError::Io {
                location: self.to_string(),
                source,
            })?;
        Ok(decoded)
    }
}

async fn read_file(path: &Path) -> Result<Vec<u8>, RegionError> {
    tokio::fs::read(path).await.map_err(|source| RegionError::Io {
        location: path.display().to_string(),
        source,
    })
}

impl fmt::Display for DatasetLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetLocation::File(path) => write!(f, "{}", path.display()),
            DatasetLocation::Remote(url) => write!(f, "{}", url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_parse_locations() {
        assert_eq!(
            DatasetLocation::parse("data/seoul.geojson").unwrap(),
            DatasetLocation::File(PathBuf::from("data/seoul.geojson"))
        );
        assert!(matches!(
            DatasetLocation::parse("https://example.org/seoul.geojson").unwrap(),
            DatasetLocation::Remote(_)
        ));
        assert!(DatasetLocation::parse("  ").is_err());
        assert!(DatasetLocation::parse("http://exa mple.org/x").is_err());
    }

    #[tokio::test]
    async fn test_read_gzipped_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("regions.geojson.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"{\"features\": []}").unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        let location = DatasetLocation::File(path);
        let bytes = location.read(&reqwest::Client::new()).await.unwrap();
        assert_eq!(bytes, b"{\"features\": []}");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let location = DatasetLocation::File(PathBuf::from("/nonexistent/regions.geojson"));
        let err = location.read(&reqwest::Client::new()).await.unwrap_err();
        assert!(matches!(err, RegionError::Io { .. }));
    }
}
