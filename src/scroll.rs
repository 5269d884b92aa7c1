use crate::collection::MediaCollection;
use crate::decode::Resource;
use crate::error::IndexError;
use crate::geometry::ViewportGeometry;
use crate::layout::ContiguousLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapOutcome {
    pub from: usize,
    pub to: usize,
    /// Index nearest the viewport center when the tick started.
    pub target: usize,
    pub steps: usize,
}

impl SnapOutcome {
    pub fn settled(&self) -> bool {
        self.to == self.target
    }
}

/// Keeps `current` on the item nearest the viewport center while the user
/// pans continuously in contiguous mode.
pub struct ContiguousScrollCoordinator {
    max_steps_per_tick: Option<usize>,
}

impl Default for ContiguousScrollCoordinator {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ContiguousScrollCoordinator {
    /// `None` settles on the target within a single tick.
    pub fn new(max_steps_per_tick: Option<usize>) -> Self {
        Self {
            max_steps_per_tick: max_steps_per_tick.map(|n| n.max(1)),
        }
    }

    pub fn snap<R: Resource>(
        &self,
        collection: &MediaCollection<R>,
        geometry: &mut ViewportGeometry,
    ) -> Result<Option<SnapOutcome>, IndexError> {
        if collection.is_empty() {
            return Ok(None);
        }
        collection.get(geometry.current)?;

        let layout = ContiguousLayout::compute(collection, geometry);
        let Some(target) = layout.nearest_center() else {
            return Ok(None);
        };

        let from = geometry.current;
        let budget = self.max_steps_per_tick.unwrap_or(usize::MAX);
        let mut steps = 0;
        while geometry.current != target && steps < budget {
            step_toward(collection, geometry, target)?;
            steps += 1;
        }

        Ok(Some(SnapOutcome {
            from,
            to: geometry.current,
            target,
            steps,
        }))
    }
}

/// Move `current` one item toward `target`, shifting the pan so nothing
/// moves on screen. With uniform heights the shift is one item height.
fn step_toward<R: Resource>(
    collection: &MediaCollection<R>,
    geometry: &mut ViewportGeometry,
    target: usize,
) -> Result<(), IndexError> {
    let current = geometry.current;
    let next = if target > current { current + 1 } else { current - 1 };

    let h_current = geometry.item_height(collection.get(current)?.aspect_ratio());
    let h_next = geometry.item_height(collection.get(next)?.aspect_ratio());
    let shift = (h_current + h_next) / 2.0;

    if next > current {
        geometry.pan_y -= shift;
    } else {
        geometry.pan_y += shift;
    }
    geometry.current = next;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::collection_of;

    fn geometry(current: usize, pan_y: f32) -> ViewportGeometry {
        let mut geo = ViewportGeometry::new(800, 600);
        geo.current = current;
        geo.pan_y = pan_y;
        geo
    }

    #[test]
    fn settles_in_one_tick_by_default() {
        let col = collection_of(10);
        let mut geo = geometry(2, 1200.0);
        let outcome = ContiguousScrollCoordinator::default()
            .snap(&col, &mut geo)
            .unwrap()
            .unwrap();
        assert_eq!(outcome, SnapOutcome { from: 2, to: 4, target: 4, steps: 2 });
        assert_eq!(geo.current, 4);
        assert_eq!(geo.pan_y, 0.0);
    }

    #[test]
    fn stepped_snap_spreads_over_ticks() {
        let col = collection_of(10);
        let mut geo = geometry(2, 1200.0);
        let coordinator = ContiguousScrollCoordinator::new(Some(1));

        let first = coordinator.snap(&col, &mut geo).unwrap().unwrap();
        assert_eq!((first.to, first.steps), (3, 1));
        assert!(!first.settled());
        assert_eq!(geo.pan_y, 600.0);

        let second = coordinator.snap(&col, &mut geo).unwrap().unwrap();
        assert_eq!((second.to, second.target), (4, 4));
        assert_eq!(geo.pan_y, 0.0);
    }

    #[test]
    fn scrolling_up_moves_backward() {
        let col = collection_of(10);
        let mut geo = geometry(5, -650.0);
        ContiguousScrollCoordinator::default().snap(&col, &mut geo).unwrap();
        assert_eq!(geo.current, 4);
        assert_eq!(geo.pan_y, -50.0);
    }

    #[test]
    fn steps_bounded_by_distance() {
        let col = collection_of(100);
        for pan in [-5000.0, -900.0, 0.0, 250.0, 299.0, 301.0, 4321.0] {
            let mut geo = geometry(50, pan);
            let before = geo.pan_y;
            let outcome = ContiguousScrollCoordinator::default()
                .snap(&col, &mut geo)
                .unwrap()
                .unwrap();
            assert!(outcome.settled());
            assert_eq!(outcome.steps, outcome.from.abs_diff(outcome.to));
            let moved = (before - geo.pan_y) / 600.0;
            assert_eq!(moved, moved.round());
            assert_eq!(moved.abs() as usize, outcome.steps);
        }
    }

    #[test]
    fn clamps_at_last_item() {
        let col = collection_of(3);
        let mut geo = geometry(1, 10_000.0);
        ContiguousScrollCoordinator::default().snap(&col, &mut geo).unwrap();
        assert_eq!(geo.current, 2);
    }

    #[test]
    fn empty_collection_is_noop() {
        let col = collection_of(0);
        let mut geo = geometry(0, 123.0);
        let outcome = ContiguousScrollCoordinator::default().snap(&col, &mut geo).unwrap();
        assert!(outcome.is_none());
        assert_eq!(geo.pan_y, 123.0);
    }
}
