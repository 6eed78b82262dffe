use std::cell::RefCell;
use std::mem;
use std::rc::Rc;

use geo::LineString;
use hashbrown::HashMap;
use tracing::{debug, info};

use super::{AnchorRegistry, DrillDownError, NavigationState, OverlayPalette};
use crate::config::MapConfig;
use crate::models::{Coordinate, RegionLevel};
use crate::regions::RegionHierarchy;
use crate::view::{
    ControlHandle, MapView, Navigator, OverlayHandle, OverlayShape, PopupContent, Route,
};

const BACK_LABEL: &str = "구 다시 선택하기";

/// Pointer events the host observed on an overlay this controller drew
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayEvent {
    PointerEnter { overlay: OverlayHandle, at: Coordinate },
    PointerLeave { overlay: OverlayHandle },
    Click { overlay: OverlayHandle, at: Coordinate },
}

/// What a drawn overlay stands for
#[derive(Debug, Clone, PartialEq)]
struct OverlayTarget {
    level: RegionLevel,
    name: String,
    /// Parent district, empty for districts
    parent: String,
}

/// Owns every overlay, the back control and the navigation state of the
/// drill-down. All view mutation for regions goes through here.
pub struct DrillDownController<V, N> {
    view: Rc<RefCell<V>>,
    navigator: N,
    hierarchy: RegionHierarchy,
    anchors: AnchorRegistry,
    palette: OverlayPalette,
    map: MapConfig,
    state: NavigationState,
    region_overlays: Vec<OverlayHandle>,
    sub_region_overlays: Vec<OverlayHandle>,
    targets: HashMap<OverlayHandle, OverlayTarget>,
    back_control: Option<ControlHandle>,
    hovered: Option<OverlayHandle>,
}

impl<V: MapView, N: Navigator> DrillDownController<V, N> {
    pub fn new(view: Rc<RefCell<V>>, navigator: N, hierarchy: RegionHierarchy, map: MapConfig) -> Self {
        Self {
            view,
            navigator,
            hierarchy,
            anchors: AnchorRegistry::default(),
            palette: OverlayPalette::default(),
            map,
            state: NavigationState::Top,
            region_overlays: Vec::new(),
            sub_region_overlays: Vec::new(),
            targets: HashMap::new(),
            back_control: None,
            hovered: None,
        }
    }

    pub fn with_anchors(mut self, anchors: AnchorRegistry) -> Self {
        self.anchors = anchors;
        self
    }

    pub fn with_palette(mut self, palette: OverlayPalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn hierarchy(&self) -> &RegionHierarchy {
        &self.hierarchy
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn region_overlay_count(&self) -> usize {
        self.region_overlays.len()
    }

    pub fn sub_region_overlay_count(&self) -> usize {
        self.sub_region_overlays.len()
    }

    pub fn has_back_control(&self) -> bool {
        self.back_control.is_some()
    }

    /// Names of the sub-regions currently drawn, in draw order
    pub fn visible_sub_regions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .sub_region_overlays
            .iter()
            .filter_map(|h| self.targets.get(h))
            .map(|t| t.name.as_str())
            .collect();
        names.dedup();
        names
    }

    fn add_overlay(&mut self, target: OverlayTarget, ring: LineString<f64>) -> OverlayHandle {
        let shape = OverlayShape {
            ring,
            style: self.palette.base(target.level).clone(),
            label: target.name.clone(),
        };
        let handle = self.view.borrow_mut().add_overlay(shape);
        self.targets.insert(handle, target);
        handle
    }

    fn remove_overlays(&mut self, handles: Vec<OverlayHandle>) {
        let mut view = self.view.borrow_mut();
        for handle in handles {
            view.remove_overlay(handle);
            self.targets.remove(&handle);
            if self.hovered == Some(handle) {
                self.hovered = None;
                view.hide_decoration();
            }
        }
    }

    fn ensure_back_control(&mut self) {
        if self.back_control.is_none() {
            self.back_control = Some(self.view.borrow_mut().add_back_control(BACK_LABEL));
        }
    }

    fn remove_back_control(&mut self) {
        if let Some(handle) = self.back_control.take() {
            self.view.borrow_mut().remove_control(handle);
        }
    }

    /// Remove sub-region overlays and the popup that belongs to them
    fn clear_drilled(&mut self) {
        let stale = mem::take(&mut self.sub_region_overlays);
        self.remove_overlays(stale);
        self.view.borrow_mut().close_popup();
    }

    /// Draw every top-level region from scratch, replacing prior overlays.
    /// Returns the number of overlays drawn.
    pub fn draw_top_level(&mut self) -> usize {
        let stale = mem::take(&mut self.region_overlays);
        self.remove_overlays(stale);

        let rings: Vec<(OverlayTarget, LineString<f64>)> = self
            .hierarchy
            .regions()
            .iter()
            .flat_map(|region| {
                region.outline.iter().map(move |ring| {
                    let target = OverlayTarget {
                        level: RegionLevel::District,
                        name: region.name.clone(),
                        parent: String::new(),
                    };
                    (target, ring.clone())
                })
            })
            .collect();

        for (target, ring) in rings {
            let handle = self.add_overlay(target, ring);
            self.region_overlays.push(handle);
        }

        info!(
            "Drew {} overlays for {} regions",
            self.region_overlays.len(),
            self.hierarchy.len()
        );
        self.region_overlays.len()
    }

    /// Drill into `name`, showing only its sub-regions.
    ///
    /// Selecting while already drilled clears the current sub-regions first.
    /// Returns the number of sub-regions shown.
    pub fn select_region(&mut self, name: &str) -> Result<usize, DrillDownError> {
        if !self.hierarchy.contains(name) {
            return Err(DrillDownError::UnknownRegion(name.to_string()));
        }

        if let Some(previous) = self.state.selected_region() {
            debug!("Leaving '{}' for '{}'", previous, name);
            self.clear_drilled();
        }

        let rings: Vec<(OverlayTarget, LineString<f64>)> = self
            .hierarchy
            .sub_regions_of(name)
            .flat_map(|sub| {
                sub.outline.iter().map(move |ring| {
                    let target = OverlayTarget {
                        level: RegionLevel::SubDistrict,
                        name: sub.name.clone(),
                        parent: sub.parent_name.clone(),
                    };
                    (target, ring.clone())
                })
            })
            .collect();

        for (target, ring) in rings {
            let handle = self.add_overlay(target, ring);
            self.sub_region_overlays.push(handle);
        }

        {
            let mut view = self.view.borrow_mut();
            if let Some(anchor) = self.anchors.find(name) {
                view.set_center(anchor.coordinate());
            }
            view.set_zoom(self.map.district_zoom);
        }
        self.ensure_back_control();

        let shown = self.hierarchy.child_count(name);
        info!("Selected region '{}' with {} sub-regions", name, shown);
        self.state = NavigationState::Drilled {
            region: name.to_string(),
        };
        Ok(shown)
    }

    /// Return to the overview. No-op at the top level.
    pub fn go_back(&mut self) {
        if !self.state.is_drilled() {
            debug!("Already at top level");
            return;
        }

        self.clear_drilled();
        self.remove_back_control();
        {
            let mut view = self.view.borrow_mut();
            view.hide_decoration();
            view.set_center(self.map.default_center);
            view.set_zoom(self.map.overview_zoom);
        }
        self.draw_top_level();
        self.state = NavigationState::Top;
    }

    /// Route a pointer event from the host. Events for overlays this
    /// controller no longer owns are ignored.
    pub fn handle(&mut self, event: OverlayEvent) -> Result<(), DrillDownError> {
        match event {
            OverlayEvent::PointerEnter { overlay, at } => {
                let Some(target) = self.targets.get(&overlay) else {
                    debug!("Ignoring hover on stale overlay {:?}", overlay);
                    return Ok(());
                };
                let mut view = self.view.borrow_mut();
                view.restyle_overlay(overlay, self.palette.hover(target.level));
                view.show_decoration(at);
                self.hovered = Some(overlay);
            }
            OverlayEvent::PointerLeave { overlay } => {
                let Some(target) = self.targets.get(&overlay) else {
                    return Ok(());
                };
                let mut view = self.view.borrow_mut();
                view.restyle_overlay(overlay, self.palette.base(target.level));
                // A late leave for an overlay no longer hovered keeps the current decoration
                if self.hovered == Some(overlay) {
                    view.hide_decoration();
                    self.hovered = None;
                }
            }
            OverlayEvent::Click { overlay, at } => {
                let Some(target) = self.targets.get(&overlay).cloned() else {
                    debug!("Ignoring click on stale overlay {:?}", overlay);
                    return Ok(());
                };
                match target.level {
                    RegionLevel::District => {
                        self.select_region(&target.name)?;
                    }
                    RegionLevel::SubDistrict => self.open_sub_region(target, at),
                }
            }
        }
        Ok(())
    }

    fn open_sub_region(&mut self, target: OverlayTarget, at: Coordinate) {
        let route = Route::SubRegionListings {
            region: target.parent.clone(),
            sub_region: target.name.clone(),
        };
        self.view.borrow_mut().open_popup(
            PopupContent {
                title: target.name,
                body: target.parent,
                action: Some(route.clone()),
            },
            at,
        );
        debug!("Navigating to {}", route.path());
        self.navigator.navigate_to(route);
        self.ensure_back_control();
    }

    /// Remove everything this controller drew
    pub fn dispose(&mut self) {
        let overlays: Vec<OverlayHandle> = mem::take(&mut self.region_overlays)
            .into_iter()
            .chain(mem::take(&mut self.sub_region_overlays))
            .collect();
        self.remove_overlays(overlays);
        self.remove_back_control();
        {
            let mut view = self.view.borrow_mut();
            view.close_popup();
            view.hide_decoration();
        }
        self.hovered = None;
        self.state = NavigationState::Top;
    }
}
