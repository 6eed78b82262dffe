#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;

use async_trait::async_trait;
use geo::LineString;

use districtmap::drilldown::OverlayPalette;
use districtmap::geocode::GeocodeError;
use districtmap::markers::GeoBounds;
use districtmap::models::{Coordinate, Region, SubRegion};
use districtmap::regions::RegionHierarchy;
use districtmap::view::{
    ControlHandle, Geocoder, MapView, MarkerContent, MarkerHandle, MarkerKind, Navigator,
    OverlayHandle, OverlayShape, OverlayStyle, PopupContent, Route,
};

/// Map view that keeps the live scene and a log of camera requests
#[derive(Default)]
pub struct RecordingView {
    next_handle: u64,
    pub overlays: BTreeMap<OverlayHandle, OverlayShape>,
    pub markers: BTreeMap<MarkerHandle, (Coordinate, MarkerContent)>,
    pub controls: BTreeMap<ControlHandle, String>,
    pub centers: Vec<Coordinate>,
    pub zooms: Vec<u8>,
    pub fits: Vec<GeoBounds>,
    pub restyles: Vec<(OverlayHandle, OverlayStyle)>,
    pub popup: Option<PopupContent>,
    pub decoration: Option<Coordinate>,
}

impl RecordingView {
    pub fn shared() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::default()))
    }

    fn next(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    fn handles_with_fill(&self, fill: &str) -> Vec<OverlayHandle> {
        self.overlays
            .iter()
            .filter(|(_, shape)| shape.style.fill_color == fill)
            .map(|(h, _)| *h)
            .collect()
    }

    fn labels_with_fill(&self, fill: &str) -> BTreeSet<String> {
        self.overlays
            .values()
            .filter(|shape| shape.style.fill_color == fill)
            .map(|shape| shape.label.clone())
            .collect()
    }

    pub fn region_overlays(&self) -> Vec<OverlayHandle> {
        self.handles_with_fill(&OverlayPalette::default().region.fill_color)
    }

    pub fn sub_region_overlays(&self) -> Vec<OverlayHandle> {
        self.handles_with_fill(&OverlayPalette::default().sub_region.fill_color)
    }

    pub fn region_labels(&self) -> BTreeSet<String> {
        self.labels_with_fill(&OverlayPalette::default().region.fill_color)
    }

    pub fn sub_region_labels(&self) -> BTreeSet<String> {
        self.labels_with_fill(&OverlayPalette::default().sub_region.fill_color)
    }

    pub fn overlay_labelled(&self, label: &str) -> Option<OverlayHandle> {
        self.overlays
            .iter()
            .find(|(_, shape)| shape.label == label)
            .map(|(h, _)| *h)
    }

    pub fn markers_of(&self, kind: MarkerKind) -> Vec<Coordinate> {
        self.markers
            .values()
            .filter(|(_, content)| content.kind == kind)
            .map(|(at, _)| *at)
            .collect()
    }
}

impl MapView for RecordingView {
    fn set_center(&mut self, center: Coordinate) {
        self.centers.push(center);
    }

    fn set_zoom(&mut self, level: u8) {
        self.zooms.push(level);
    }

    fn fit_to_bounds(&mut self, bounds: &GeoBounds) {
        self.fits.push(*bounds);
    }

    fn add_overlay(&mut self, shape: OverlayShape) -> OverlayHandle {
        let handle = OverlayHandle(self.next());
        self.overlays.insert(handle, shape);
        handle
    }

    fn remove_overlay(&mut self, handle: OverlayHandle) {
        assert!(self.overlays.remove(&handle).is_some(), "overlay {:?} removed twice", handle);
    }

    fn restyle_overlay(&mut self, handle: OverlayHandle, style: &OverlayStyle) {
        if let Some(shape) = self.overlays.get_mut(&handle) {
            shape.style = style.clone();
        }
        self.restyles.push((handle, style.clone()));
    }

    fn show_decoration(&mut self, at: Coordinate) {
        self.decoration = Some(at);
    }

    fn hide_decoration(&mut self) {
        self.decoration = None;
    }

    fn add_marker(&mut self, at: Coordinate, content: MarkerContent) -> MarkerHandle {
        let handle = MarkerHandle(self.next());
        self.markers.insert(handle, (at, content));
        handle
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        assert!(self.markers.remove(&handle).is_some(), "marker {:?} removed twice", handle);
    }

    fn open_popup(&mut self, content: PopupContent, _: Coordinate) {
        self.popup = Some(content);
    }

    fn close_popup(&mut self) {
        self.popup = None;
    }

    fn add_back_control(&mut self, label: &str) -> ControlHandle {
        let handle = ControlHandle(self.next());
        self.controls.insert(handle, label.to_string());
        handle
    }

    fn remove_control(&mut self, handle: ControlHandle) {
        assert!(self.controls.remove(&handle).is_some(), "control {:?} removed twice", handle);
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub routes: Vec<Route>,
}

impl Navigator for RecordingNavigator {
    fn navigate_to(&mut self, route: Route) {
        self.routes.push(route);
    }
}

/// Geocoder answering from a fixed table
#[derive(Default)]
pub struct TableGeocoder {
    pub table: HashMap<String, Coordinate>,
}

impl TableGeocoder {
    pub fn with(mut self, address: &str, at: Coordinate) -> Self {
        self.table.insert(address.to_string(), at);
        self
    }
}

#[async_trait(?Send)]
impl Geocoder for TableGeocoder {
    async fn resolve(&self, address: &str) -> Result<Option<Coordinate>, GeocodeError> {
        Ok(self.table.get(address).copied())
    }
}

pub fn square(x: f64, y: f64) -> LineString<f64> {
    LineString::from(vec![
        (x, y),
        (x + 0.01, y),
        (x + 0.01, y + 0.01),
        (x, y + 0.01),
        (x, y),
    ])
}

/// Three districts and four sub-districts, one of them orphaned.
///
/// Jung-gu and Myeong-dong have two rings each.
pub fn seoul_hierarchy() -> RegionHierarchy {
    let regions = vec![
        Region::new("Jongno-gu", vec![square(126.97, 37.57)]),
        Region::new("Jung-gu", vec![square(126.98, 37.55), square(127.00, 37.55)]),
        Region::new("Mapo-gu", vec![square(126.90, 37.55)]),
    ];
    let sub_regions = vec![
        SubRegion::new("Sajik-dong", "Jongno-gu", vec![square(126.968, 37.575)]),
        SubRegion::new("Samcheong-dong", "Jongno-gu", vec![square(126.98, 37.585)]),
        SubRegion::new(
            "Myeong-dong",
            "Jung-gu",
            vec![square(126.985, 37.56), square(126.99, 37.565)],
        ),
        SubRegion::new("Lost-dong", "Nowhere-gu", vec![square(127.1, 37.6)]),
    ];
    RegionHierarchy::build(regions, sub_regions)
}

pub fn labels(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}
