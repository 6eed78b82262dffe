//! Two-level region drill-down: districts at the top, the selected
//! district's sub-districts below.

mod anchors;
mod controller;
mod palette;

pub use anchors::{default_anchors, Anchor, AnchorRegistry};
pub use controller::{DrillDownController, OverlayEvent};
pub use palette::OverlayPalette;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DrillDownError {
    #[error("Unknown region: {0}")]
    UnknownRegion(String),
}

/// Where the drill-down currently is
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum NavigationState {
    #[default]
    Top,
    Drilled {
        region: String,
    },
}

impl NavigationState {
    pub fn is_drilled(&self) -> bool {
        matches!(self, NavigationState::Drilled { .. })
    }

    pub fn selected_region(&self) -> Option<&str> {
        match self {
            NavigationState::Top => None,
            NavigationState::Drilled { region } => Some(region),
        }
    }
}
