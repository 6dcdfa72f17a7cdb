use geo::{BoundingRect, Contains, Intersects, MultiPolygon, Point, Rect};
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{RTree, AABB};

/// Envelope of one shape, tagged with the shape's position.
type Envelope = GeomWithData<Rectangle<[f64; 2]>, usize>;

fn envelope(idx: usize, rect: Rect<f64>) -> Envelope {
    GeomWithData::new(Rectangle::from_corners(rect.min().into(), rect.max().into()), idx)
}

/// An indexed set of MultiPolygons supporting point-in-polygon and intersection queries.
/// Indices returned by queries are positions in the slice the set was built from.
#[derive(Debug, Clone)]
pub(crate) struct Geometries {
    shapes: Vec<MultiPolygon<f64>>,
    rtree: RTree<Envelope>,
}

impl Geometries {
    /// Construct a Geometries object from a slice of MultiPolygons.
    /// Empty shapes have no bounding box and are never returned by queries.
    pub(crate) fn new(polygons: &[MultiPolygon<f64>]) -> Self {
        Self {
            rtree: RTree::bulk_load(
                polygons.iter().enumerate()
                    .filter_map(|(i, polygon)| polygon.bounding_rect().map(|rect| envelope(i, rect)))
                    .collect()
            ),
            shapes: polygons.to_vec(),
        }
    }

    /// Get the number of MultiPolygons.
    #[inline] pub(crate) fn len(&self) -> usize { self.shapes.len() }

    /// Get a reference to the list of MultiPolygons.
    #[inline] pub(crate) fn shapes(&self) -> &[MultiPolygon<f64>] { &self.shapes }

    /// Indices of every shape that strictly contains `point` (boundary points are excluded).
    pub(crate) fn containing(&self, point: &Point<f64>) -> Vec<usize> {
        let envelope = AABB::from_point([point.x(), point.y()]);
        let mut hits: Vec<usize> = self.rtree.locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.data)
            .filter(|&idx| self.shapes[idx].contains(point))
            .collect();
        hits.sort_unstable();
        hits
    }

    /// Indices of every shape intersecting `shape`, in ascending order.
    pub(crate) fn intersecting(&self, shape: &MultiPolygon<f64>) -> Vec<usize> {
        let Some(rect) = shape.bounding_rect() else { return Vec::new() };
        let envelope = AABB::from_corners(rect.min().into(), rect.max().into());
        let mut hits: Vec<usize> = self.rtree.locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.data)
            .filter(|&idx| self.shapes[idx].intersects(shape))
            .collect();
        hits.sort_unstable();
        hits
    }

    /// Count, for every shape, the points it strictly contains.
    pub(crate) fn count_within<'a>(&self, points: impl IntoIterator<Item = &'a Point<f64>>) -> Vec<u64> {
        let mut counts = vec![0u64; self.len()];
        for point in points {
            for idx in self.containing(point) {
                counts[idx] += 1;
            }
        }
        counts
    }
}
