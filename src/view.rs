//! Boundary contract with the host: the map view, geocoding and navigation
//! collaborators.
//!
//! The core never holds vendor objects. Everything it draws is addressed by an
//! opaque handle returned from the view, and every pointer event the host
//! observes is routed back through the owning controller.

use async_trait::async_trait;
use geo::LineString;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::geocode::GeocodeError;
use crate::markers::GeoBounds;
use crate::models::Coordinate;

/// Handle of a polygon overlay drawn by the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayHandle(pub u64);

/// Handle of a point marker drawn by the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(pub u64);

/// Handle of an on-map control (the back button)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlHandle(pub u64);

/// Fill and stroke of a polygon overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    pub fill_color: String,
    pub fill_opacity: f32,
    pub stroke_color: String,
    pub stroke_opacity: f32,
    pub stroke_weight: u8,
}

/// A single ring to draw, `x = lng`, `y = lat`
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayShape {
    pub ring: LineString<f64>,
    pub style: OverlayStyle,
    /// Area name, for hosts that label overlays
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Place,
    /// The user's own position
    User,
    /// Placeholder when no place could be located
    Fallback,
    /// Temporary highlight of a focused anchor
    Anchor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerContent {
    pub kind: MarkerKind,
    pub title: String,
    pub address: String,
    pub place_type: String,
    pub detail_url: String,
}

impl MarkerContent {
    pub fn labelled(kind: MarkerKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            address: String::new(),
            place_type: String::new(),
            detail_url: String::new(),
        }
    }
}

/// Info window content
#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    pub title: String,
    pub body: String,
    /// Where the popup's call to action leads
    pub action: Option<Route>,
}

/// Destinations outside the map screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    /// Nearby listings for one sub-district
    SubRegionListings { region: String, sub_region: String },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::SubRegionListings { region, sub_region } => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair("region", region)
                    .append_pair("sub_region", sub_region)
                    .finish();
                format!("/restaurant?{}", query)
            }
        }
    }
}

/// Map widget the core draws on.
///
/// Implementations only perform the requested drawing; they never call back
/// into the core synchronously.
pub trait MapView {
    fn set_center(&mut self, center: Coordinate);
    fn set_zoom(&mut self, level: u8);
    fn fit_to_bounds(&mut self, bounds: &GeoBounds);

    fn add_overlay(&mut self, shape: OverlayShape) -> OverlayHandle;
    fn remove_overlay(&mut self, handle: OverlayHandle);
    fn restyle_overlay(&mut self, handle: OverlayHandle, style: &OverlayStyle);

    /// Transient hover decoration at the pointer
    fn show_decoration(&mut self, at: Coordinate);
    fn hide_decoration(&mut self);

    fn add_marker(&mut self, at: Coordinate, content: MarkerContent) -> MarkerHandle;
    fn remove_marker(&mut self, handle: MarkerHandle);

    fn open_popup(&mut self, content: PopupContent, anchor: Coordinate);
    fn close_popup(&mut self);

    fn add_back_control(&mut self, label: &str) -> ControlHandle;
    fn remove_control(&mut self, handle: ControlHandle);
}

/// Address → coordinate lookup. One attempt per call; `Ok(None)` is not-found.
#[async_trait(?Send)]
pub trait Geocoder {
    async fn resolve(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError>;
}

/// Host router
pub trait Navigator {
    fn navigate_to(&mut self, route: Route);
}
