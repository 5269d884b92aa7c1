use std::collections::BTreeSet;

use crate::collection::MediaCollection;
use crate::decode::{MediaDecoder, Resource};
use crate::error::IndexError;
use crate::geometry::{HeightFit, ViewportGeometry};

/// Vertical placement of one item in contiguous mode, in window pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub index: usize,
    pub top: f32,
    pub height: f32,
}

impl Placement {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn center(&self) -> f32 {
        self.top + self.height / 2.0
    }

    pub fn intersects(&self, window_height: f32) -> bool {
        self.top < window_height && self.bottom() > 0.0
    }
}

/// The stack of items around `current`, walked outward until the first
/// rectangle past each window edge.
///
/// Placements are stored in scan order: `current`, then forward, then
/// backward.
#[derive(Debug, Clone, PartialEq)]
pub struct ContiguousLayout {
    placements: Vec<Placement>,
    window_height: f32,
}

impl ContiguousLayout {
    pub fn compute<R: Resource>(
        collection: &MediaCollection<R>,
        geometry: &ViewportGeometry,
    ) -> Self {
        let wh = geometry.window_height;
        let mut placements = Vec::new();
        let len = collection.len();
        if geometry.current >= len {
            return Self { placements, window_height: wh };
        }

        let height_of = |index: usize| {
            let aspect = collection
                .get(index)
                .map(|item| item.aspect_ratio())
                .unwrap_or(1.0);
            geometry.item_height(aspect)
        };

        let center_h = height_of(geometry.current);
        let center = Placement {
            index: geometry.current,
            top: (wh - center_h) / 2.0 - geometry.pan_y,
            height: center_h,
        };
        placements.push(center);

        // forward: walk past items above the window, stop after the first
        // one fully below it
        let mut top = center.bottom();
        for index in geometry.current + 1..len {
            let placement = Placement { index, top, height: height_of(index) };
            placements.push(placement);
            if placement.top >= wh {
                break;
            }
            top = placement.bottom();
        }

        let mut bottom = center.top;
        for index in (0..geometry.current).rev() {
            let height = height_of(index);
            let placement = Placement { index, top: bottom - height, height };
            placements.push(placement);
            if placement.bottom() <= 0.0 {
                break;
            }
            bottom = placement.top;
        }

        Self { placements, window_height: wh }
    }

    /// Like [`compute`](Self::compute), but first reads the header
    /// dimensions of every placed item whose size is still unknown, so the
    /// heights match what a full decode would give. Only fit-width heights
    /// depend on dimensions. Each item is read at most once per call.
    pub fn measure<D: MediaDecoder>(
        collection: &mut MediaCollection<D::Resource>,
        decoder: &D,
        geometry: &ViewportGeometry,
    ) -> Result<Self, IndexError> {
        let mut tried = BTreeSet::new();
        loop {
            let layout = Self::compute(collection, geometry);
            if geometry.fit == HeightFit::Uniform {
                return Ok(layout);
            }

            let mut unknown = Vec::new();
            for p in &layout.placements {
                if collection.get(p.index)?.dimensions().is_none() && tried.insert(p.index) {
                    unknown.push(p.index);
                }
            }
            if unknown.is_empty() {
                return Ok(layout);
            }

            for index in unknown {
                let path = collection.get(index)?.path().to_path_buf();
                let probed = decoder.decode_dimensions(&path);
                if let Err(e) = &probed {
                    log::debug!("[contiguous] no dimensions for {}: {}", path.display(), e);
                }
                collection.set_dimensions(index, probed)?;
            }
        }
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn placement(&self, index: usize) -> Option<&Placement> {
        self.placements.iter().find(|p| p.index == index)
    }

    /// Indices that must be resident: everything overlapping the window,
    /// plus the current item.
    pub fn needed(&self) -> BTreeSet<usize> {
        let mut needed: BTreeSet<usize> = self
            .placements
            .iter()
            .filter(|p| p.intersects(self.window_height))
            .map(|p| p.index)
            .collect();
        if let Some(first) = self.placements.first() {
            needed.insert(first.index);
        }
        needed
    }

    /// Index whose center is nearest the window's vertical center. A later
    /// candidate replaces an earlier one only when strictly closer.
    pub fn nearest_center(&self) -> Option<usize> {
        let mid = self.window_height / 2.0;
        let mut best: Option<(usize, f32)> = None;
        for p in &self.placements {
            let dy = (mid - p.center()).abs();
            match best {
                Some((_, best_dy)) if dy >= best_dy => {}
                _ => best = Some((p.index, dy)),
            }
        }
        best.map(|(index, _)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, FakeDecoder, collection_of};

    fn geometry(current: usize, pan_y: f32, zoom: f32) -> ViewportGeometry {
        let mut geo = ViewportGeometry::new(800, 600);
        geo.current = current;
        geo.pan_y = pan_y;
        geo.zoom = zoom;
        geo
    }

    #[test]
    fn centered_full_height_needs_only_current() {
        let col = collection_of(10);
        let layout = ContiguousLayout::compute(&col, &geometry(5, 0.0, 1.0));
        assert_eq!(layout.needed(), BTreeSet::from([5]));
        assert_eq!(layout.placement(5).unwrap().top, 0.0);
    }

    #[test]
    fn small_zoom_stacks_neighbours() {
        let col = collection_of(10);
        // 150px items: current spans 225..375, neighbours fill the rest
        let layout = ContiguousLayout::compute(&col, &geometry(5, 0.0, 0.25));
        assert_eq!(layout.needed(), BTreeSet::from([3, 4, 5, 6, 7]));
    }

    #[test]
    fn walk_stops_at_collection_edges() {
        let col = collection_of(3);
        let layout = ContiguousLayout::compute(&col, &geometry(0, 0.0, 0.25));
        assert_eq!(layout.needed(), BTreeSet::from([0, 1, 2]));
        assert!(layout.placements().iter().all(|p| p.index < 3));
    }

    #[test]
    fn pan_shifts_needed_set() {
        let col = collection_of(10);
        let layout = ContiguousLayout::compute(&col, &geometry(2, 300.0, 1.0));
        assert_eq!(layout.needed(), BTreeSet::from([2, 3]));
    }

    #[test]
    fn nearest_center_prefers_strictly_closer() {
        let col = collection_of(10);
        // halfway between 2 and 3: the current item keeps the tie
        let layout = ContiguousLayout::compute(&col, &geometry(2, 300.0, 1.0));
        assert_eq!(layout.nearest_center(), Some(2));

        let layout = ContiguousLayout::compute(&col, &geometry(2, 301.0, 1.0));
        assert_eq!(layout.nearest_center(), Some(3));

        let layout = ContiguousLayout::compute(&col, &geometry(2, -301.0, 1.0));
        assert_eq!(layout.nearest_center(), Some(1));
    }

    #[test]
    fn aspect_width_uses_item_ratio() {
        let col = collection_of(4);
        let mut geo = geometry(1, 0.0, 0.5);
        geo.fit = HeightFit::AspectWidth;
        let layout = ContiguousLayout::compute(&col, &geo);
        // unknown dimensions fall back to square items: 400px tall
        assert_eq!(layout.placement(1).unwrap().height, 400.0);
        assert_eq!(layout.needed(), BTreeSet::from([0, 1, 2]));
    }

    #[test]
    fn measure_reads_unknown_sizes_before_placing() {
        let dec = FakeDecoder::new();
        let mut col = collection_of(12);
        let mut geo = geometry(5, 0.0, 0.25);
        geo.fit = HeightFit::AspectWidth;

        // unmeasured items are square: 200px instead of 150px
        assert_eq!(ContiguousLayout::compute(&col, &geo).needed(), BTreeSet::from([4, 5, 6]));

        let layout = ContiguousLayout::measure(&mut col, &dec, &geo).unwrap();
        assert_eq!(layout.placement(5).unwrap().height, 150.0);
        assert_eq!(layout.needed(), BTreeSet::from([3, 4, 5, 6, 7]));
        assert_eq!(ContiguousLayout::compute(&col, &geo), layout);

        let probes = dec.take_calls();
        assert!(probes.iter().all(|c| matches!(c, Call::Dimensions(_))));
        assert_eq!(probes.len(), 7);
        assert_eq!(dec.live(), 0);

        ContiguousLayout::measure(&mut col, &dec, &geo).unwrap();
        assert!(dec.calls().is_empty());
    }

    #[test]
    fn measure_gives_up_on_unreadable_headers() {
        let dec = FakeDecoder::new().failing(&[5]);
        let mut col = collection_of(12);
        let mut geo = geometry(5, 0.0, 0.25);
        geo.fit = HeightFit::AspectWidth;

        let layout = ContiguousLayout::measure(&mut col, &dec, &geo).unwrap();
        assert_eq!(layout.placement(5).unwrap().height, 200.0);
        let fives = dec.calls().iter().filter(|c| **c == Call::Dimensions(5)).count();
        assert_eq!(fives, 1);
    }

    #[test]
    fn uniform_measure_skips_probing() {
        let dec = FakeDecoder::new();
        let mut col = collection_of(4);
        let geo = geometry(1, 0.0, 1.0);
        let layout = ContiguousLayout::measure(&mut col, &dec, &geo).unwrap();
        assert_eq!(layout, ContiguousLayout::compute(&col, &geo));
        assert!(dec.calls().is_empty());
    }

    #[test]
    fn current_is_needed_even_off_screen() {
        let col = collection_of(2);
        let layout = ContiguousLayout::compute(&col, &geometry(0, 5000.0, 1.0));
        assert!(layout.needed().contains(&0));
        assert!(!layout.needed().contains(&1));
    }
}
