//! R-tree spatial index over point records.
//!
//! The naive density computation tests every (business, POI) and
//! (business, business) pair. The index replaces that scan with one R-tree
//! radius query per business; the tree is built once per run and is
//! read-only afterwards, so parallel queries need no locking.

use geo::Coord;
use rstar::{AABB, PointDistance, RTree, RTreeObject};

/// A point stored in the tree together with the slot of its source record.
///
/// The index never owns domain records; callers resolve slots back into
/// their own slices.
#[derive(Debug, Clone)]
struct SlotEntry {
    slot: usize,
    position: [f64; 2],
}

impl RTreeObject for SlotEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for SlotEntry {
    #[expect(
        clippy::float_arithmetic,
        reason = "squared Euclidean distance in projected metres"
    )]
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let [x, y] = *point;
        let dx = self.position[0] - x;
        let dy = self.position[1] - y;
        dx * dx + dy * dy
    }
}

/// A read-only R-tree over projected point locations.
///
/// Build once per computation run; query once per business. Queries return
/// slot indices into the collection the index was built from, in no
/// particular order.
#[derive(Debug)]
pub struct SpatialIndex {
    tree: RTree<SlotEntry>,
}

impl SpatialIndex {
    /// Bulk-load an index over `positions`, keyed by iteration order.
    #[must_use]
    pub fn build<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = Coord>,
    {
        let entries = positions
            .into_iter()
            .enumerate()
            .map(|(slot, coord)| SlotEntry {
                slot,
                position: [coord.x, coord.y],
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Slots of all points whose distance to `center` is at most `radius`.
    ///
    /// The disk is boundary-inclusive: a point at exactly `radius` metres is
    /// returned.
    #[expect(
        clippy::float_arithmetic,
        reason = "the tree works on squared distances to skip the square root"
    )]
    pub fn within_radius(&self, center: Coord, radius: f64) -> impl Iterator<Item = usize> + '_ {
        self.tree
            .locate_within_distance([center.x, center.y], radius * radius)
            .map(|entry| entry.slot)
    }
}
