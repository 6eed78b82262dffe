//! District → sub-district association.

use hashbrown::HashMap;
use tracing::{debug, info};

use crate::models::{Region, SubRegion};

/// Immutable association of sub-regions to their parent regions.
///
/// Sub-regions are matched to regions by exact name equality on
/// `parent_name`; no normalization is applied. Sub-regions whose parent is not
/// loaded are kept as orphans and never displayed.
#[derive(Debug, Default)]
pub struct RegionHierarchy {
    regions: Vec<Region>,
    sub_regions: Vec<SubRegion>,
    /// Region name → index of its first occurrence
    by_name: HashMap<String, usize>,
    /// Region name → indices into `sub_regions`
    children: HashMap<String, Vec<usize>>,
    orphans: Vec<usize>,
}

impl RegionHierarchy {
    pub fn build(regions: Vec<Region>, sub_regions: Vec<SubRegion>) -> Self {
        info!(
            "Building region hierarchy for {} regions and {} sub-regions...",
            regions.len(),
            sub_regions.len()
        );

        let mut by_name = HashMap::with_capacity(regions.len());
        for (i, region) in regions.iter().enumerate() {
            by_name.entry(region.name.clone()).or_insert(i);
        }

        let mut children: HashMap<String, Vec<usize>> = HashMap::new();
        let mut orphans = Vec::new();
        for (i, sub) in sub_regions.iter().enumerate() {
            if by_name.contains_key(&sub.parent_name) {
                children.entry(sub.parent_name.clone()).or_default().push(i);
            } else {
                debug!(
                    "Sub-region '{}' has no loaded parent '{}'",
                    sub.name, sub.parent_name
                );
                orphans.push(i);
            }
        }

        info!(
            "Region hierarchy built: {} parents with children, {} orphaned sub-regions",
            children.len(),
            orphans.len()
        );

        Self {
            regions,
            sub_regions,
            by_name,
            children,
            orphans,
        }
    }

    /// All top-level regions in dataset order
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, name: &str) -> Option<&Region> {
        self.by_name.get(name).map(|&i| &self.regions[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Sub-regions whose parent name equals `name`, in dataset order
    pub fn sub_regions_of<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a SubRegion> + 'a {
        self.children
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|&i| &self.sub_regions[i])
    }

    pub fn child_count(&self, name: &str) -> usize {
        self.children.get(name).map_or(0, Vec::len)
    }

    pub fn orphans(&self) -> impl Iterator<Item = &SubRegion> {
        self.orphans.iter().map(|&i| &self.sub_regions[i])
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
