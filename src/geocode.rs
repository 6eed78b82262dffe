//! Address geocoding against the Kakao Local API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::models::Coordinate;
use crate::view::Geocoder;

const ADDRESS_SEARCH_PATH: &str = "v2/local/search/address.json";

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid geocoder URL: {0}")]
    Url(String),
}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        GeocodeError::Network(err.to_string())
    }
}

/// Geocoder settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    pub base_url: String,
    /// REST API key; `KAKAO_API_KEY` is used when empty
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dapi.kakao.com/".to_string(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

impl GeocoderConfig {
    pub fn resolved_api_key(&self) -> Option<String> {
        if !self.api_key.is_empty() {
            return Some(self.api_key.clone());
        }
        std::env::var("KAKAO_API_KEY").ok().filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct AddressSearchResponse {
    documents: Vec<AddressDocument>,
}

/// Kakao returns coordinates as strings, `x` = longitude, `y` = latitude
#[derive(Debug, Deserialize)]
struct AddressDocument {
    x: String,
    y: String,
}

/// Resolves addresses with a single request and no retry
pub struct KakaoGeocoder {
    client: Client,
    endpoint: Url,
    api_key: String,
}

impl KakaoGeocoder {
    pub fn new(config: &GeocoderConfig, api_key: String) -> Result<Self, GeocodeError> {
        let base = Url::parse(&config.base_url).map_err(|e| GeocodeError::Url(e.to_string()))?;
        let endpoint = base
            .join(ADDRESS_SEARCH_PATH)
            .map_err(|e| GeocodeError::Url(e.to_string()))?;

        let client = Client::builder()
            .user_agent("districtmap/0.1")
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait(?Send)]
impl Geocoder for KakaoGeocoder {
    async fn resolve(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("query", address);

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("KakaoAK {}", self.api_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: AddressSearchResponse = response
            .json()
            .await
            .map_err(|e| GeocodeError::Parse(e.to_string()))?;

        let resolved = body.documents.first().and_then(document_coordinate);
        debug!("Geocoded '{}' -> {:?}", address, resolved);
        Ok(resolved)
    }
}

fn document_coordinate(doc: &AddressDocument) -> Option<Coordinate> {
    let lat = doc.y.trim().parse::<f64>().ok()?;
    let lng = doc.x.trim().parse::<f64>().ok()?;
    Some(Coordinate::new(lat, lng)).filter(|c| c.is_valid() && !c.is_zero())
}
