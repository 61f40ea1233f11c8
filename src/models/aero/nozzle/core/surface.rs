use std::collections::HashMap;

use nalgebra::Point3;

use crate::support::su2::{ElementKind, Su2Error, Su2Mesh};

/// A boundary facet with patch-local vertex indices.
///
/// Two-dimensional meshes bound their domain with line segments, so a
/// marker there integrates over segments (per unit depth) instead of
/// triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Segment([usize; 2]),
    Triangle([usize; 3]),
}

impl Facet {
    #[must_use]
    pub fn vertices(&self) -> &[usize] {
        match self {
            Self::Segment(v) => v,
            Self::Triangle(v) => v,
        }
    }
}

/// The facets of one or more markers, compacted to the points they use.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfacePatch {
    pub points: Vec<Point3<f64>>,
    /// Mesh (and solution row) index of each patch vertex.
    pub nodes: Vec<usize>,
    pub facets: Vec<Facet>,
}

impl SurfacePatch {
    /// Collects the facets of every marker in `tags`.
    ///
    /// Quadrilaterals are split into two triangles. Volume elements on a
    /// marker are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Su2Error::UnknownMarker`] if a tag isn't in the mesh.
    pub fn extract<S: AsRef<str>>(mesh: &Su2Mesh, tags: &[S]) -> Result<Self, Su2Error> {
        let mut patch = Self {
            points: Vec::new(),
            nodes: Vec::new(),
            facets: Vec::new(),
        };
        let mut local: HashMap<usize, usize> = HashMap::new();

        for tag in tags {
            let marker = mesh.marker(tag.as_ref())?;
            for element in &marker.elements {
                if element.kind == ElementKind::Line {
                    let [a, b] = [element.nodes[0], element.nodes[1]]
                        .map(|node| patch.vertex(mesh, &mut local, node));
                    patch.facets.push(Facet::Segment([a, b]));
                    continue;
                }
                for triangle in element.triangles() {
                    let triangle = triangle.map(|node| patch.vertex(mesh, &mut local, node));
                    patch.facets.push(Facet::Triangle(triangle));
                }
            }
        }

        log::debug!(
            "markers {:?}: {} facets over {} vertices",
            tags.iter().map(AsRef::as_ref).collect::<Vec<_>>(),
            patch.facets.len(),
            patch.points.len()
        );
        Ok(patch)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    /// Length of a segment or area of a triangle.
    #[must_use]
    pub fn measure(&self, facet: &Facet) -> f64 {
        match *facet {
            Facet::Segment([a, b]) => (self.points[b] - self.points[a]).norm(),
            Facet::Triangle([a, b, c]) => {
                let ab = self.points[b] - self.points[a];
                let ac = self.points[c] - self.points[a];
                0.5 * ab.cross(&ac).norm()
            }
        }
    }

    #[must_use]
    pub fn total_measure(&self) -> f64 {
        self.facets.iter().map(|facet| self.measure(facet)).sum()
    }

    fn vertex(&mut self, mesh: &Su2Mesh, local: &mut HashMap<usize, usize>, node: usize) -> usize {
        *local.entry(node).or_insert_with(|| {
            self.points.push(mesh.points[node]);
            self.nodes.push(node);
            self.nodes.len() - 1
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::models::aero::nozzle::core::test_support::{MESH, mesh};

    #[test]
    fn line_marker_becomes_segments() {
        let mesh = mesh();
        let patch = SurfacePatch::extract(&mesh, &["9"]).unwrap();

        assert_eq!(patch.facets.len(), 2);
        assert_eq!(patch.nodes, [1, 4, 7]);
        assert_eq!(patch.facets[0], Facet::Segment([0, 1]));
        assert_relative_eq!(patch.total_measure(), 0.4);
    }

    #[test]
    fn shared_vertices_are_compacted_across_markers() {
        let mesh = mesh();
        let patch = SurfacePatch::extract(&mesh, &["9", "1"]).unwrap();

        // Point 7 is shared by both markers.
        assert_eq!(patch.points.len(), 5);
        assert_eq!(patch.facets.len(), 4);
    }

    #[test]
    fn quads_split_into_triangles() {
        let text = "\
NDIME= 3
NELEM= 0
NPOIN= 4
0 0 0
1 0 0
1 1 0
0 1 0
NMARK= 1
MARKER_TAG= exit
MARKER_ELEMS= 1
9 0 1 2 3
";
        let mesh = Su2Mesh::parse(text, "quad.su2").unwrap();
        let patch = SurfacePatch::extract(&mesh, &["exit"]).unwrap();

        assert_eq!(patch.facets, [Facet::Triangle([0, 1, 2]), Facet::Triangle([0, 2, 3])]);
        assert_relative_eq!(patch.total_measure(), 1.0);
    }

    #[test]
    fn unknown_marker() {
        let mesh = Su2Mesh::parse(MESH, "mesh.su2").unwrap();
        assert!(matches!(
            SurfacePatch::extract(&mesh, &["42"]),
            Err(Su2Error::UnknownMarker(tag)) if tag == "42"
        ));
    }
}
