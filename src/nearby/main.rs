//! Command line front end for the recommendation and drill-down engine.
//!
//! Ranks a place catalog around a position, inspects the district
//! hierarchy, and replays a map session against a logging view.

mod console;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use districtmap::catalog::load_places;
use districtmap::drilldown::{AnchorRegistry, DrillDownController};
use districtmap::geocode::{GeocodeError, KakaoGeocoder};
use districtmap::models::Coordinate;
use districtmap::ranking::{format, RecommendationRanker};
use districtmap::regions::{load_hierarchy, RegionHierarchy};
use districtmap::view::Geocoder;
use districtmap::{Config, MapScreen};

use crate::console::{ConsoleNavigator, ConsoleView};

#[derive(Parser, Debug)]
#[command(name = "nearby")]
#[command(about = "Nearby place recommendations and district drill-down")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank a place catalog around a position and print the recommendations
    Rank {
        /// JSON array of place records (.gz accepted)
        #[arg(long)]
        catalog: PathBuf,

        #[arg(long)]
        lat: f64,

        #[arg(long)]
        lng: f64,

        /// Override the configured recommendation limit
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List districts with their sub-district counts
    Regions,

    /// Print the sub-districts shown when drilling into a district
    Drill {
        /// District name, as in the region dataset
        region: String,
    },

    /// Replay a map session: overview, user position, markers, recommendations
    Markers {
        #[arg(long)]
        catalog: PathBuf,

        #[arg(long, requires = "lng")]
        lat: Option<f64>,

        #[arg(long, requires = "lat")]
        lng: Option<f64>,
    },
}

/// Stand-in when no API key is configured: every lookup is not-found
struct OfflineGeocoder;

#[async_trait(?Send)]
impl Geocoder for OfflineGeocoder {
    async fn resolve(&self, _: &str) -> Result<Option<Coordinate>, GeocodeError> {
        Ok(None)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.as_str().to_lowercase()));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => Config::default(),
    };

    match args.command {
        Command::Rank {
            catalog,
            lat,
            lng,
            limit,
        } => {
            let places = load_places(&catalog)?;
            let mut ranking = config.ranking;
            if let Some(limit) = limit {
                ranking.limit = limit;
            }

            let ranker = RecommendationRanker::new(ranking);
            let entries = format(&ranker.rank(Coordinate::new(lat, lng), &places));
            if entries.is_empty() {
                info!("No place qualified for a recommendation");
            }
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }

        Command::Regions => {
            let hierarchy = load_regions(&config).await?;
            for region in hierarchy.regions() {
                println!("{}\t{}", region.name, hierarchy.child_count(&region.name));
            }
            let orphans = hierarchy.orphans().count();
            if orphans > 0 {
                warn!("{} sub-regions have no loaded parent", orphans);
            }
        }

        Command::Drill { region } => {
            let hierarchy = load_regions(&config).await?;
            let view = Rc::new(RefCell::new(ConsoleView::default()));
            let mut controller =
                DrillDownController::new(view, ConsoleNavigator, hierarchy, config.map.clone())
                    .with_anchors(AnchorRegistry::new(config.anchors.0.clone()))
                    .with_palette(config.palette.clone());

            controller.draw_top_level();
            let shown = controller.select_region(&region)?;
            info!("'{}' has {} sub-regions", region, shown);
            for name in controller.visible_sub_regions() {
                println!("{}", name);
            }
        }

        Command::Markers { catalog, lat, lng } => {
            let places = load_places(&catalog)?;
            let client = reqwest::Client::new();
            let regions = load_hierarchy(&config.regions, &client).await;

            let geocoder: Box<dyn Geocoder> = match config.geocoder.resolved_api_key() {
                Some(key) => Box::new(KakaoGeocoder::new(&config.geocoder, key)?),
                None => {
                    warn!("No geocoder API key configured, address-only places are skipped");
                    Box::new(OfflineGeocoder)
                }
            };

            let view = Rc::new(RefCell::new(ConsoleView::default()));
            let mut screen = MapScreen::new(view.clone(), ConsoleNavigator, &config, regions);
            screen.start();
            screen.set_user_location(lat.zip(lng).map(|(lat, lng)| Coordinate::new(lat, lng)));
            screen.set_catalog(places);

            let report = screen.refresh_markers(geocoder.as_ref()).await;
            info!(
                "Placed {} markers, skipped {} ({} overlays drawn)",
                report.placed,
                report.skipped,
                view.borrow().overlays
            );

            println!("{}", serde_json::to_string_pretty(screen.recommend())?);
            screen.dispose();
            info!("{} markers left after dispose", view.borrow().markers);
        }
    }

    Ok(())
}

async fn load_regions(config: &Config) -> Result<RegionHierarchy> {
    let client = reqwest::Client::new();
    let hierarchy = load_hierarchy(&config.regions, &client)
        .await
        .context("Failed to load region datasets")?;
    Ok(hierarchy)
}
