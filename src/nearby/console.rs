//! View and navigator that log every request instead of drawing.

use tracing::info;

use districtmap::markers::GeoBounds;
use districtmap::models::Coordinate;
use districtmap::view::{
    ControlHandle, MapView, MarkerContent, MarkerHandle, Navigator, OverlayHandle, OverlayShape,
    OverlayStyle, PopupContent, Route,
};

#[derive(Default)]
pub struct ConsoleView {
    next_handle: u64,
    pub overlays: usize,
    pub markers: usize,
}

impl ConsoleView {
    fn next(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl MapView for ConsoleView {
    fn set_center(&mut self, center: Coordinate) {
        info!("center -> ({:.4}, {:.4})", center.lat, center.lng);
    }

    fn set_zoom(&mut self, level: u8) {
        info!("zoom -> {}", level);
    }

    fn fit_to_bounds(&mut self, bounds: &GeoBounds) {
        if let (Some(sw), Some(ne)) = (bounds.south_west(), bounds.north_east()) {
            info!(
                "fit -> ({:.4}, {:.4}) .. ({:.4}, {:.4})",
                sw.lat, sw.lng, ne.lat, ne.lng
            );
        }
    }

    fn add_overlay(&mut self, shape: OverlayShape) -> OverlayHandle {
        self.overlays += 1;
        let handle = OverlayHandle(self.next());
        info!("overlay {} '{}' ({} points)", handle.0, shape.label, shape.ring.0.len());
        handle
    }

    fn remove_overlay(&mut self, _: OverlayHandle) {
        self.overlays = self.overlays.saturating_sub(1);
    }

    fn restyle_overlay(&mut self, _: OverlayHandle, _: &OverlayStyle) {}

    fn show_decoration(&mut self, _: Coordinate) {}

    fn hide_decoration(&mut self) {}

    fn add_marker(&mut self, at: Coordinate, content: MarkerContent) -> MarkerHandle {
        self.markers += 1;
        let handle = MarkerHandle(self.next());
        info!(
            "marker {} {:?} '{}' at ({:.4}, {:.4})",
            handle.0, content.kind, content.title, at.lat, at.lng
        );
        handle
    }

    fn remove_marker(&mut self, _: MarkerHandle) {
        self.markers = self.markers.saturating_sub(1);
    }

    fn open_popup(&mut self, content: PopupContent, _: Coordinate) {
        info!("popup '{}'", content.title);
    }

    fn close_popup(&mut self) {}

    fn add_back_control(&mut self, label: &str) -> ControlHandle {
        info!("control '{}'", label);
        ControlHandle(self.next())
    }

    fn remove_control(&mut self, _: ControlHandle) {}
}

pub struct ConsoleNavigator;

impl Navigator for ConsoleNavigator {
    fn navigate_to(&mut self, route: Route) {
        info!("navigate -> {}", route.path());
    }
}
