//! The map screen: one instance owns the view handle, the drill-down, the
//! marker pipeline and the recommendation state for its whole lifetime.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{info, warn};

use crate::config::{Config, MapConfig};
use crate::drilldown::{AnchorRegistry, DrillDownController, DrillDownError, OverlayEvent};
use crate::markers::{MarkerPipeline, PlacementReport};
use crate::models::{Coordinate, Place, RankedEntry};
use crate::ranking::{format, RecommendationRanker};
use crate::regions::{RegionError, RegionHierarchy};
use crate::view::{Geocoder, MapView, MarkerContent, MarkerHandle, MarkerKind, Navigator};

const USER_MARKER_TITLE: &str = "현재 위치";

pub struct MapScreen<V, N> {
    view: Rc<RefCell<V>>,
    map: MapConfig,
    anchors: AnchorRegistry,
    ranker: RecommendationRanker,
    /// Absent when the region datasets failed to load
    controller: Option<DrillDownController<V, N>>,
    markers: MarkerPipeline<V>,
    user_location: Coordinate,
    user_marker: Option<MarkerHandle>,
    /// Temporary marker at the last focused anchor
    anchor_marker: Option<MarkerHandle>,
    catalog: Vec<Place>,
    search_results: Vec<Place>,
    recommendations: Vec<RankedEntry>,
}

impl<V: MapView, N: Navigator> MapScreen<V, N> {
    /// A region load failure only disables the drill-down; ranking and
    /// markers keep working.
    pub fn new(
        view: Rc<RefCell<V>>,
        navigator: N,
        config: &Config,
        regions: Result<RegionHierarchy, RegionError>,
    ) -> Self {
        let anchors = AnchorRegistry::new(config.anchors.0.clone());

        let controller = match regions {
            Ok(hierarchy) => Some(
                DrillDownController::new(view.clone(), navigator, hierarchy, config.map.clone())
                    .with_anchors(anchors.clone())
                    .with_palette(config.palette.clone()),
            ),
            Err(e) => {
                warn!("Region overlays disabled: {}", e);
                None
            }
        };

        let fallback = config
            .markers
            .fallback_marker
            .then_some(config.map.default_center);
        let markers = MarkerPipeline::new(view.clone()).with_fallback(fallback);

        Self {
            view,
            map: config.map.clone(),
            anchors,
            ranker: RecommendationRanker::new(config.ranking),
            controller,
            markers,
            user_location: config.map.default_center,
            user_marker: None,
            anchor_marker: None,
            catalog: Vec::new(),
            search_results: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    /// Show the overview: camera, region overlays and the user marker
    pub fn start(&mut self) {
        {
            let mut view = self.view.borrow_mut();
            view.set_center(self.map.default_center);
            view.set_zoom(self.map.overview_zoom);
        }
        if let Some(controller) = self.controller.as_mut() {
            controller.draw_top_level();
        }
        self.place_user_marker();
    }

    /// Remove everything the screen drew and discard in-flight marker runs
    pub fn dispose(&mut self) {
        if let Some(controller) = self.controller.as_mut() {
            controller.dispose();
        }
        self.markers.clear();
        if let Some(handle) = self.user_marker.take() {
            self.view.borrow_mut().remove_marker(handle);
        }
        self.clear_anchor_marker();
        self.recommendations.clear();
        info!("Map screen disposed");
    }

    fn place_user_marker(&mut self) {
        let mut view = self.view.borrow_mut();
        if let Some(handle) = self.user_marker.take() {
            view.remove_marker(handle);
        }
        self.user_marker = Some(view.add_marker(
            self.user_location,
            MarkerContent::labelled(MarkerKind::User, USER_MARKER_TITLE),
        ));
    }

    /// Record the user's position (the default center when unknown) and
    /// recentre on it
    pub fn set_user_location(&mut self, location: Option<Coordinate>) {
        self.user_location = location
            .filter(|c| c.is_valid() && !c.is_zero())
            .unwrap_or(self.map.default_center);
        self.place_user_marker();

        let mut view = self.view.borrow_mut();
        view.set_center(self.user_location);
        view.set_zoom(self.map.user_zoom);
    }

    pub fn user_location(&self) -> Coordinate {
        self.user_location
    }

    /// Recentre on a named anchor and mark it. Returns false for unknown
    /// names.
    ///
    /// The anchor marker is temporary: it is replaced by the next focus and
    /// the host removes it with `clear_anchor_marker` once its timer fires.
    pub fn focus_on_anchor(&mut self, name: &str) -> bool {
        let Some(anchor) = self.anchors.find(name) else {
            return false;
        };
        let at = anchor.coordinate();
        let title = if anchor.display_name.is_empty() {
            anchor.name.clone()
        } else {
            anchor.display_name.clone()
        };

        self.clear_anchor_marker();
        let mut view = self.view.borrow_mut();
        view.set_center(at);
        view.set_zoom(self.map.anchor_zoom);
        self.anchor_marker = Some(view.add_marker(
            at,
            MarkerContent::labelled(MarkerKind::Anchor, title),
        ));
        true
    }

    pub fn clear_anchor_marker(&mut self) {
        if let Some(handle) = self.anchor_marker.take() {
            self.view.borrow_mut().remove_marker(handle);
        }
    }

    pub fn set_catalog(&mut self, places: Vec<Place>) {
        self.catalog = places;
    }

    pub fn set_search_results(&mut self, places: Vec<Place>) {
        self.search_results = places;
    }

    /// Search results when there are any, the catalog otherwise
    pub fn visible_places(&self) -> &[Place] {
        if self.search_results.is_empty() {
            &self.catalog
        } else {
            &self.search_results
        }
    }

    /// Rebuild markers for the visible places
    pub async fn refresh_markers<G>(&self, geocoder: &G) -> PlacementReport
    where
        G: Geocoder + ?Sized,
    {
        self.markers.run(geocoder, self.visible_places()).await
    }

    /// Rank the catalog around the user and keep the result.
    ///
    /// Search results only change which markers are shown; recommendations
    /// always come from the catalog.
    pub fn recommend(&mut self) -> &[RankedEntry] {
        let scored = self.ranker.rank(self.user_location, &self.catalog);
        self.recommendations = format(&scored);
        &self.recommendations
    }

    pub fn recommendations(&self) -> &[RankedEntry] {
        &self.recommendations
    }

    pub fn reset_recommendations(&mut self) {
        self.recommendations.clear();
    }

    /// Forward a pointer event to the drill-down, if regions are loaded
    pub fn handle_overlay_event(&mut self, event: OverlayEvent) -> Result<(), DrillDownError> {
        match self.controller.as_mut() {
            Some(controller) => controller.handle(event),
            None => Ok(()),
        }
    }

    pub fn go_back(&mut self) {
        if let Some(controller) = self.controller.as_mut() {
            controller.go_back();
        }
    }

    pub fn controller(&self) -> Option<&DrillDownController<V, N>> {
        self.controller.as_ref()
    }

    pub fn controller_mut(&mut self) -> Option<&mut DrillDownController<V, N>> {
        self.controller.as_mut()
    }

    pub fn markers(&self) -> &MarkerPipeline<V> {
        &self.markers
    }
}
