//! Recommendation server.
//!
//! Exposes the ranked recommendation list and the district hierarchy over
//! HTTP. Region datasets are optional: when they fail to load the server
//! still ranks places and the region routes answer 503.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use districtmap::models::{Coordinate, Place, RankedEntry};
use districtmap::ranking::{format, RecommendationRanker};
use districtmap::regions::{load_hierarchy, RegionHierarchy};
use districtmap::Config;

#[derive(Parser, Debug)]
#[command(name = "serve")]
#[command(about = "Nearby recommendation server")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    listen: String,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: Level,
}

/// Application state shared across handlers
struct AppState {
    ranker: RecommendationRanker,
    regions: Option<RegionHierarchy>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.as_str().to_lowercase()));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Districtmap Recommendation Server");

    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            Config::load_from_file(path)?
        }
        None => Config::default(),
    };

    let client = reqwest::Client::new();
    let regions = match load_hierarchy(&config.regions, &client).await {
        Ok(hierarchy) => {
            info!("Loaded {} regions", hierarchy.len());
            Some(hierarchy)
        }
        Err(e) => {
            warn!("Region datasets unavailable, region routes disabled: {}", e);
            None
        }
    };

    let state = Arc::new(AppState {
        ranker: RecommendationRanker::new(config.ranking),
        regions,
    });

    // Build router
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/recommend", post(recommend_handler))
        .route("/v1/regions", get(regions_handler))
        .route("/v1/regions/{name}", get(region_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    info!("Starting server on {}", args.listen);

    let listener = tokio::net::TcpListener::bind(&args.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let regions = state.regions.is_some();
    Json(HealthResponse {
        status: if regions { "ok" } else { "degraded" },
        regions,
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    regions: bool,
}

#[derive(Deserialize)]
struct RecommendRequest {
    user: Coordinate,
    #[serde(default)]
    places: Vec<Place>,
}

#[derive(Serialize)]
struct RecommendResponse {
    recommendations: Vec<RankedEntry>,
}

/// Rank the posted candidates around the user. An empty list means nothing
/// qualified.
async fn recommend_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RecommendRequest>,
) -> Json<RecommendResponse> {
    let scored = state.ranker.rank(request.user, &request.places);
    info!(
        "Ranked {} candidates into {} recommendations",
        request.places.len(),
        scored.len()
    );
    Json(RecommendResponse {
        recommendations: format(&scored),
    })
}

#[derive(Serialize)]
struct RegionSummary {
    name: String,
    sub_regions: usize,
}

#[derive(Serialize)]
struct RegionsResponse {
    regions: Vec<RegionSummary>,
    orphans: usize,
}

#[derive(Serialize)]
struct RegionResponse {
    name: String,
    sub_regions: Vec<String>,
}

fn loaded(state: &AppState) -> Result<&RegionHierarchy, (StatusCode, String)> {
    state.regions.as_ref().ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        "Region datasets are not loaded".to_string(),
    ))
}

/// List districts with their sub-district counts
async fn regions_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RegionsResponse>, (StatusCode, String)> {
    let hierarchy = loaded(&state)?;
    let regions = hierarchy
        .regions()
        .iter()
        .map(|r| RegionSummary {
            name: r.name.clone(),
            sub_regions: hierarchy.child_count(&r.name),
        })
        .collect();

    Ok(Json(RegionsResponse {
        regions,
        orphans: hierarchy.orphans().count(),
    }))
}

/// Sub-districts a drill-down into `name` would show
async fn region_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<RegionResponse>, (StatusCode, String)> {
    let hierarchy = loaded(&state)?;
    if !hierarchy.contains(&name) {
        return Err((StatusCode::NOT_FOUND, format!("Unknown region: {}", name)));
    }

    let sub_regions = hierarchy
        .sub_regions_of(&name)
        .map(|s| s.name.clone())
        .collect();
    Ok(Json(RegionResponse { name, sub_regions }))
}
