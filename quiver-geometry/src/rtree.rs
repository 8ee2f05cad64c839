use geo_types::Point;
use rstar::{
    iterators::{LocateInEnvelopeIntersecting, LocateWithinDistanceIterator, RTreeIterator},
    Envelope, PointDistance, RTree, RTreeObject, AABB,
};

use crate::marks::{ShapeCore, ShapeCoreUtils};
use quiver_marks::marks::shape::ShapeScene;

/// A shape primitive with its instance index for storage in the R-tree
#[derive(Debug, Clone)]
pub struct CoreInstance {
    pub index: usize,
    pub core: ShapeCore,
    pub half_stroke_width: f32,
}

impl RTreeObject for CoreInstance {
    type Envelope = AABB<[f32; 2]>;

    /// Returns the envelope of the primitive, including the stroke width
    fn envelope(&self) -> Self::Envelope {
        let bbox = self.core.bounding_rect();
        AABB::from_corners(
            [
                bbox.min().x - self.half_stroke_width,
                bbox.min().y - self.half_stroke_width,
            ],
            [
                bbox.max().x + self.half_stroke_width,
                bbox.max().y + self.half_stroke_width,
            ],
        )
    }
}

impl PointDistance for CoreInstance {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        // Compute the distance from the point to the primitive surface, then
        // subtract the stroke half-width
        let point = Point::new(point[0], point[1]);
        (self.core.surface_distance(&point) - self.half_stroke_width).max(0.0)
    }

    fn contains_point(&self, point: &[f32; 2]) -> bool {
        let point = Point::new(point[0], point[1]);
        self.core.surface_distance(&point) <= self.half_stroke_width
    }
}

/// An R-tree over the hit-test primitives of one resolved scene.
#[derive(Debug, Clone)]
pub struct SceneRTree {
    rtree: RTree<CoreInstance>,
    envelope: AABB<[f32; 2]>,
}

impl SceneRTree {
    pub fn new(cores: Vec<CoreInstance>) -> Self {
        // Compute the envelope of the primitives
        let envelope = cores
            .iter()
            .map(|c| c.envelope())
            .reduce(|a, b| a.merged(&b))
            .unwrap_or(AABB::from_corners([0.0, 0.0], [0.0, 0.0]));

        // Bulk load the primitives into an R-tree
        let rtree = RTree::bulk_load(cores);

        Self { rtree, envelope }
    }

    /// Indexes every instance of a built scene.
    pub fn from_scene(scene: &ShapeScene) -> Self {
        Self::new(scene.core_iter().collect())
    }

    /// Returns the envelope of the entire tree
    pub fn envelope(&self) -> &AABB<[f32; 2]> {
        &self.envelope
    }

    /// Returns the number of objects in the r-tree
    pub fn size(&self) -> usize {
        self.rtree.size()
    }

    /// Returns an iterator over all elements contained in the tree
    pub fn iter(&self) -> RTreeIterator<CoreInstance> {
        self.rtree.iter()
    }

    /// Returns a single object that covers a given point.
    ///
    /// If multiple elements contain the given point, any of them is returned.
    pub fn locate_at_point(&self, point: &[f32; 2]) -> Option<&CoreInstance> {
        self.rtree.locate_at_point(point)
    }

    /// Returns all elements whose envelope intersects a given envelope
    pub fn locate_in_envelope_intersecting(
        &self,
        envelope: &AABB<[f32; 2]>,
    ) -> LocateInEnvelopeIntersecting<CoreInstance> {
        self.rtree.locate_in_envelope_intersecting(envelope)
    }

    /// Returns the nearest neighbor for a given point
    pub fn nearest_neighbor(&self, query_point: &[f32; 2]) -> Option<&CoreInstance> {
        self.rtree.nearest_neighbor(query_point)
    }

    /// Returns all elements of the tree sorted by their distance to a given point.
    ///
    /// The concrete iterator type is not exported by rstar, so this is opaque.
    pub fn nearest_neighbor_iter(
        &self,
        query_point: &[f32; 2],
    ) -> impl Iterator<Item = &CoreInstance> {
        self.rtree.nearest_neighbor_iter(query_point)
    }

    /// Returns all elements of the tree within a certain distance
    pub fn locate_within_distance(
        &self,
        query_point: [f32; 2],
        max_squared_radius: f32,
    ) -> LocateWithinDistanceIterator<CoreInstance> {
        self.rtree
            .locate_within_distance(query_point, max_squared_radius)
    }

    /// Insert a new core instance into the tree
    pub fn insert(&mut self, core: CoreInstance) {
        // Update the envelope to include the new primitive
        self.envelope = self.envelope.merged(&core.envelope());
        self.rtree.insert(core);
    }
}
