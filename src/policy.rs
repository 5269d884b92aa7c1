use std::collections::BTreeSet;

use crate::collection::MediaCollection;
use crate::decode::MediaDecoder;
use crate::error::IndexError;
use crate::frontier::{ThumbnailFrontierLoader, ThumbnailLoad};
use crate::geometry::{PresentationMode, ViewportGeometry};
use crate::layout::ContiguousLayout;
use crate::residency::{Reconciliation, ViewerResidencyReconciler};
use crate::scroll::{ContiguousScrollCoordinator, SnapOutcome};

/// What one tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub mode: PresentationMode,
    pub thumbnail: Option<ThumbnailLoad>,
    pub snap: Option<SnapOutcome>,
    pub reconciliation: Option<Reconciliation>,
}

impl TickReport {
    fn idle(mode: PresentationMode) -> Self {
        Self {
            mode,
            thumbnail: None,
            snap: None,
            reconciliation: None,
        }
    }

    /// True when nothing was decoded, released or moved.
    pub fn is_idle(&self) -> bool {
        self.thumbnail.is_none()
            && self.snap.is_none_or(|s| s.steps == 0)
            && self.reconciliation.as_ref().is_none_or(Reconciliation::is_noop)
    }
}

/// Per-tick residency driver. Grid mode goes to the frontier loader, the
/// viewer modes to the reconciler.
pub struct LoaderPolicy {
    frontier: ThumbnailFrontierLoader,
    reconciler: ViewerResidencyReconciler,
    coordinator: ContiguousScrollCoordinator,
}

impl LoaderPolicy {
    pub fn new(len: usize, thumbnail_size: u32, snap_steps_per_tick: Option<usize>) -> Self {
        Self {
            frontier: ThumbnailFrontierLoader::new(len, thumbnail_size),
            reconciler: ViewerResidencyReconciler::new(),
            coordinator: ContiguousScrollCoordinator::new(snap_steps_per_tick),
        }
    }

    /// Start the thumbnail scan over, e.g. after the thumbnail size changed.
    pub fn reset_thumbnails(&mut self, thumbnail_size: u32) {
        self.frontier.reset(thumbnail_size);
    }

    pub fn resident(&self) -> &BTreeSet<usize> {
        self.reconciler.resident()
    }

    /// Bring residency in line with `geometry`. In contiguous mode this may
    /// move `geometry.current` and `geometry.pan_y`.
    ///
    /// Switching modes does not evict anything by itself; resources from the
    /// previous mode stay until the active policy releases them.
    pub fn tick<D: MediaDecoder>(
        &mut self,
        collection: &mut MediaCollection<D::Resource>,
        decoder: &D,
        mode: PresentationMode,
        geometry: &mut ViewportGeometry,
    ) -> Result<TickReport, IndexError> {
        let mut report = TickReport::idle(mode);
        if collection.is_empty() {
            return Ok(report);
        }
        collection.get(geometry.current)?;

        match mode {
            PresentationMode::Grid => {
                let frontier = geometry.grid.window(collection.len());
                report.thumbnail =
                    self.frontier
                        .tick(collection, decoder, geometry.current, frontier)?;
            }
            PresentationMode::Single => {
                let needed = BTreeSet::from([geometry.current]);
                report.reconciliation =
                    Some(self.reconciler.reconcile(collection, decoder, &needed)?);
            }
            PresentationMode::Contiguous => {
                // heights must be known before snapping and before choosing
                // what to load
                ContiguousLayout::measure(collection, decoder, geometry)?;
                report.snap = self.coordinator.snap(collection, geometry)?;
                let needed = ContiguousLayout::measure(collection, decoder, geometry)?.needed();
                report.reconciliation =
                    Some(self.reconciler.reconcile(collection, decoder, &needed)?);
            }
        }

        Ok(report)
    }
}
