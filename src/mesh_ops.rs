//! Triangle mesh operations
//!
//! This module provides the geometric helpers the pipeline needs:
//! - Axis-aligned bounding boxes of placed parts
//! - Applying a placement transform to every vertex of a mesh
//!
//! Bounding boxes are computed from every transformed vertex, not from the
//! transformed corners of the untransformed box, so rotated parts get a
//! tight box.

use crate::error::{Error, Result};
use crate::model::{Mesh, Vertex};
use crate::part::Part;
use crate::transform::Transform4;

/// A 3D point represented as (x, y, z)
pub type Point3d = (f64, f64, f64);

/// A 3D vector represented as (x, y, z)
pub type Vector3 = (f64, f64, f64);

/// An axis-aligned bounding box grown one point at a time
///
/// A new box is empty: it has no corners until the first point is added.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    bounds: Option<(Point3d, Point3d)>,
}

impl BoundingBox {
    /// Create an empty box
    pub fn empty() -> Self {
        Self { bounds: None }
    }

    /// Whether no point has been added yet
    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// Grow the box to contain `point`
    pub fn expand(&mut self, point: Point3d) {
        let (x, y, z) = point;
        self.bounds = Some(match self.bounds {
            None => (point, point),
            Some((min, max)) => (
                (min.0.min(x), min.1.min(y), min.2.min(z)),
                (max.0.max(x), max.1.max(y), max.2.max(z)),
            ),
        });
    }

    /// Grow the box to contain another box
    pub fn union(&mut self, other: &BoundingBox) {
        if let Some((min, max)) = other.bounds {
            self.expand(min);
            self.expand(max);
        }
    }

    /// Minimum corner, if any point was added
    pub fn min(&self) -> Option<Point3d> {
        self.bounds.map(|(min, _)| min)
    }

    /// Maximum corner, if any point was added
    pub fn max(&self) -> Option<Point3d> {
        self.bounds.map(|(_, max)| max)
    }

    /// Extent along each axis
    pub fn size(&self) -> Option<Vector3> {
        self.bounds
            .map(|(min, max)| (max.0 - min.0, max.1 - min.1, max.2 - min.2))
    }

    /// Center point
    pub fn center(&self) -> Option<Point3d> {
        self.bounds.map(|(min, max)| {
            (
                (min.0 + max.0) / 2.0,
                (min.1 + max.1) / 2.0,
                (min.2 + max.2) / 2.0,
            )
        })
    }
}

/// Compute the bounding box of a part as placed by its transform
///
/// # Errors
///
/// Returns [`Error::InvalidModel`] if the part's mesh has no vertices.
pub fn compute_part_bbox(part: &Part) -> Result<BoundingBox> {
    compute_transformed_bbox(part.mesh(), part.transform()).map_err(|_| {
        Error::InvalidModel(format!(
            "Cannot compute bounding box of part '{}': mesh has no vertices",
            part.name()
        ))
    })
}

/// Compute the bounding box of a mesh after applying `transform` to each vertex
///
/// # Errors
///
/// Returns [`Error::InvalidModel`] if the mesh has no vertices.
pub fn compute_transformed_bbox(mesh: &Mesh, transform: &Transform4) -> Result<BoundingBox> {
    if mesh.vertices.is_empty() {
        return Err(Error::InvalidModel(
            "Cannot compute bounding box of empty mesh".to_string(),
        ));
    }

    let mut bbox = BoundingBox::empty();
    for vertex in &mesh.vertices {
        bbox.expand(transform.apply((vertex.x, vertex.y, vertex.z)));
    }
    Ok(bbox)
}

/// Return a copy of `mesh` with `transform` applied to every vertex
///
/// Triangles are copied unchanged, so element ids keep their meaning.
pub fn transform_mesh(mesh: &Mesh, transform: &Transform4) -> Mesh {
    let vertices = mesh
        .vertices
        .iter()
        .map(|vertex| {
            let (x, y, z) = transform.apply((vertex.x, vertex.y, vertex.z));
            Vertex::new(x, y, z)
        })
        .collect();

    Mesh {
        vertices,
        triangles: mesh.triangles.clone(),
    }
}
