use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, info};

use super::GeoBounds;
use crate::models::{Coordinate, Place};
use crate::view::{Geocoder, MapView, MarkerContent, MarkerHandle, MarkerKind};

/// How a place can be put on the map
#[derive(Debug, Clone, Copy, PartialEq)]
enum PlacementSource<'a> {
    Direct(Coordinate),
    Address(&'a str),
    Unlocatable,
}

fn placement_source(place: &Place) -> PlacementSource<'_> {
    match place.coordinate {
        Some(c) if !c.is_zero() => PlacementSource::Direct(c),
        _ if !place.address.trim().is_empty() => PlacementSource::Address(place.address.trim()),
        _ => PlacementSource::Unlocatable,
    }
}

/// Outcome of one placement run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementReport {
    pub epoch: u64,
    pub placed: usize,
    pub skipped: usize,
    /// A newer run started before this one finished; nothing further was applied
    pub superseded: bool,
    pub bounds: GeoBounds,
}

/// Places one marker per locatable place and fits the camera to them.
///
/// Runs are sequential within themselves: the geocoding lookup for place
/// `i + 1` starts only after place `i` settled. Runs are not cancellable, so
/// every run captures the epoch at start and stops applying results as soon
/// as a newer run (or a `clear`) has advanced it.
pub struct MarkerPipeline<V> {
    view: Rc<RefCell<V>>,
    epoch: Cell<u64>,
    markers: RefCell<Vec<MarkerHandle>>,
    fallback: Option<Coordinate>,
}

impl<V: MapView> MarkerPipeline<V> {
    pub fn new(view: Rc<RefCell<V>>) -> Self {
        Self {
            view,
            epoch: Cell::new(0),
            markers: RefCell::new(Vec::new()),
            fallback: None,
        }
    }

    /// Place a marker at `at` when a run resolves nothing
    pub fn with_fallback(mut self, at: Option<Coordinate>) -> Self {
        self.fallback = at;
        self
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.get()
    }

    pub fn markers(&self) -> Vec<MarkerHandle> {
        self.markers.borrow().clone()
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.epoch.get() == epoch
    }

    /// Remove every marker and invalidate in-flight runs
    pub fn clear(&self) -> u64 {
        let epoch = self.epoch.get() + 1;
        self.epoch.set(epoch);

        let stale: Vec<MarkerHandle> = self.markers.borrow_mut().drain(..).collect();
        let mut view = self.view.borrow_mut();
        for handle in stale {
            view.remove_marker(handle);
        }
        epoch
    }

    fn place(&self, at: Coordinate, content: MarkerContent) {
        let handle = self.view.borrow_mut().add_marker(at, content);
        self.markers.borrow_mut().push(handle);
    }

    /// Rebuild all markers for `places`
    pub async fn run<G>(&self, geocoder: &G, places: &[Place]) -> PlacementReport
    where
        G: Geocoder + ?Sized,
    {
        let epoch = self.clear();
        let mut report = PlacementReport {
            epoch,
            ..PlacementReport::default()
        };

        debug!("Marker run {} started for {} places", epoch, places.len());

        for place in places {
            let resolved = match placement_source(place) {
                PlacementSource::Direct(c) => Some(c),
                PlacementSource::Address(address) => match geocoder.resolve(address).await {
                    Ok(Some(c)) => Some(c),
                    Ok(None) => {
                        debug!("No geocoding result for '{}'", address);
                        None
                    }
                    Err(e) => {
                        debug!("Geocoding '{}' failed: {}", address, e);
                        None
                    }
                },
                PlacementSource::Unlocatable => {
                    debug!("No location data for '{}'", place.name);
                    None
                }
            };

            if !self.is_current(epoch) {
                debug!("Marker run {} superseded, discarding results", epoch);
                report.superseded = true;
                return report;
            }

            match resolved {
                Some(at) => {
                    self.place(at, place_marker(place));
                    report.bounds.extend(at);
                    report.placed += 1;
                }
                None => report.skipped += 1,
            }
        }

        if report.placed == 0 {
            if let Some(at) = self.fallback {
                debug!("No markers resolved, placing fallback marker");
                self.place(at, MarkerContent::labelled(MarkerKind::Fallback, ""));
                report.bounds.extend(at);
            }
        }

        if !report.bounds.is_empty() {
            self.view.borrow_mut().fit_to_bounds(&report.bounds);
        }

        info!(
            "Marker run {} placed {} markers, skipped {}",
            epoch, report.placed, report.skipped
        );
        report
    }
}

fn place_marker(place: &Place) -> MarkerContent {
    MarkerContent {
        kind: MarkerKind::Place,
        title: place.name.clone(),
        address: place.address.clone(),
        place_type: place.place_type.clone(),
        detail_url: place.detail_url.clone(),
    }
}
