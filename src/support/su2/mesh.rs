//! SU2 native mesh reader.
//!
//! ```text
//! NDIME= 2
//! NELEM= 2
//! 5 0 1 2 0
//! 5 0 2 3 1
//! NPOIN= 4
//! 0.0 0.0 0
//! ...
//! NMARK= 1
//! MARKER_TAG= 7
//! MARKER_ELEMS= 1
//! 3 0 1
//! ```
//!
//! Element lines carry a VTK type id, the connectivity, and an optional
//! trailing element index. Point lines carry `NDIME` coordinates and an
//! optional trailing point index. `%` starts a comment.

use std::{fs, path::Path};

use nalgebra::Point3;

use super::{Su2Error, tokens};

/// SU2 (VTK) element type identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Line = 3,
    Triangle = 5,
    Quadrilateral = 9,
    Tetrahedron = 10,
    Hexahedron = 12,
    Prism = 13,
    Pyramid = 14,
}

impl ElementKind {
    #[must_use]
    pub fn node_count(self) -> usize {
        match self {
            Self::Line => 2,
            Self::Triangle => 3,
            Self::Quadrilateral | Self::Tetrahedron => 4,
            Self::Pyramid => 5,
            Self::Prism => 6,
            Self::Hexahedron => 8,
        }
    }
}

impl TryFrom<u32> for ElementKind {
    type Error = Su2Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(Self::Line),
            5 => Ok(Self::Triangle),
            9 => Ok(Self::Quadrilateral),
            10 => Ok(Self::Tetrahedron),
            12 => Ok(Self::Hexahedron),
            13 => Ok(Self::Prism),
            14 => Ok(Self::Pyramid),
            other => Err(Su2Error::UnknownElement(other)),
        }
    }
}

/// A mesh element with zero-based point indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub kind: ElementKind,
    pub nodes: Vec<usize>,
}

impl Element {
    /// Splits a surface element into triangles.
    ///
    /// Quadrilaterals are split along the `0–2` diagonal. Non-surface
    /// elements yield nothing.
    #[must_use]
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        let n = &self.nodes;
        match self.kind {
            ElementKind::Triangle => vec![[n[0], n[1], n[2]]],
            ElementKind::Quadrilateral => vec![[n[0], n[1], n[2]], [n[0], n[2], n[3]]],
            _ => Vec::new(),
        }
    }
}

/// A tagged boundary made of lower-dimensional elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub tag: String,
    pub elements: Vec<Element>,
}

/// An SU2 native mesh.
///
/// Two-dimensional meshes are stored with `z = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Su2Mesh {
    pub dimension: usize,
    pub points: Vec<Point3<f64>>,
    pub elements: Vec<Element>,
    pub markers: Vec<Marker>,
}

impl Su2Mesh {
    /// Reads a mesh from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Su2Error`] on I/O failure or malformed content.
    pub fn read(path: &Path) -> Result<Self, Su2Error> {
        let text = fs::read_to_string(path).map_err(|e| Su2Error::io(path, e))?;
        Self::parse(&text, &path.display().to_string())
    }

    /// Parses mesh text; `file` labels error messages.
    ///
    /// # Errors
    ///
    /// Returns [`Su2Error`] on malformed content.
    pub fn parse(text: &str, file: &str) -> Result<Self, Su2Error> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, strip_comment(line).trim()))
            .filter(|(_, line)| !line.is_empty());

        let mut dimension = None;
        let mut points = Vec::new();
        let mut elements = Vec::new();
        let mut markers = Vec::new();
        let mut pending_tag: Option<String> = None;

        while let Some((line_no, line)) = lines.next() {
            let Some((key, value)) = line.split_once('=') else {
                return Err(Su2Error::parse(file, line_no, format!("unexpected `{line}`")));
            };
            let value = value.trim();

            match key.trim() {
                "NDIME" => {
                    let dim = parse_count(file, line_no, value)?;
                    if !(2..=3).contains(&dim) {
                        return Err(Su2Error::parse(
                            file,
                            line_no,
                            format!("NDIME must be 2 or 3, got {dim}"),
                        ));
                    }
                    dimension = Some(dim);
                }
                "NELEM" => {
                    let count = parse_count(file, line_no, value)?;
                    elements = read_elements(&mut lines, count, file)?;
                }
                "NPOIN" => {
                    let dim = dimension
                        .ok_or_else(|| Su2Error::parse(file, line_no, "NPOIN before NDIME"))?;
                    let count = parse_count(file, line_no, value)?;
                    points = read_points(&mut lines, count, dim, file)?;
                }
                "NMARK" => {
                    parse_count(file, line_no, value)?;
                }
                "MARKER_TAG" => pending_tag = Some(value.to_owned()),
                "MARKER_ELEMS" => {
                    let tag = pending_tag.take().ok_or_else(|| {
                        Su2Error::parse(file, line_no, "MARKER_ELEMS without MARKER_TAG")
                    })?;
                    let count = parse_count(file, line_no, value)?;
                    let elements = read_elements(&mut lines, count, file)?;
                    markers.push(Marker { tag, elements });
                }
                other => log::debug!("{file}:{line_no}: skipping keyword {other}"),
            }
        }

        let dimension = dimension.ok_or_else(|| Su2Error::missing(file, "NDIME"))?;
        if points.is_empty() {
            return Err(Su2Error::missing(file, "NPOIN"));
        }

        let mesh = Self {
            dimension,
            points,
            elements,
            markers,
        };
        mesh.check_connectivity()?;
        Ok(mesh)
    }

    /// Looks up a marker by tag.
    ///
    /// # Errors
    ///
    /// Returns [`Su2Error::UnknownMarker`] if no marker has this tag.
    pub fn marker(&self, tag: &str) -> Result<&Marker, Su2Error> {
        self.markers
            .iter()
            .find(|marker| marker.tag == tag)
            .ok_or_else(|| Su2Error::UnknownMarker(tag.to_owned()))
    }

    /// Volume elements of a 2D mesh, split into triangles.
    #[must_use]
    pub fn planar_triangles(&self) -> Vec<[usize; 3]> {
        self.elements.iter().flat_map(Element::triangles).collect()
    }

    fn check_connectivity(&self) -> Result<(), Su2Error> {
        let count = self.points.len();
        let all = self
            .elements
            .iter()
            .chain(self.markers.iter().flat_map(|m| m.elements.iter()));
        for element in all {
            if let Some(&index) = element.nodes.iter().find(|&&i| i >= count) {
                return Err(Su2Error::PointOutOfRange { index, count });
            }
        }
        Ok(())
    }
}

fn strip_comment(line: &str) -> &str {
    line.split_once('%').map_or(line, |(before, _)| before)
}

/// Parses the leading count of a `KEY= n [m]` value.
fn parse_count(file: &str, line_no: usize, value: &str) -> Result<usize, Su2Error> {
    value
        .split_whitespace()
        .next()
        .and_then(|n| n.parse().ok())
        .ok_or_else(|| Su2Error::parse(file, line_no, format!("expected a count, got `{value}`")))
}

fn read_elements<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
    count: usize,
    file: &str,
) -> Result<Vec<Element>, Su2Error> {
    let mut elements = Vec::new();
    for _ in 0..count {
        let (line_no, line) = lines
            .next()
            .ok_or_else(|| Su2Error::missing(file, format!("{count} element lines")))?;

        let values: Vec<usize> = tokens(line)
            .map(str::parse)
            .collect::<Result<_, _>>()
            .map_err(|_| Su2Error::parse(file, line_no, "non-integer element entry"))?;

        let (&kind, rest) = values
            .split_first()
            .ok_or_else(|| Su2Error::parse(file, line_no, "empty element line"))?;
        let kind = u32::try_from(kind)
            .map_err(|_| Su2Error::UnknownElement(u32::MAX))
            .and_then(ElementKind::try_from)?;

        let n = kind.node_count();
        if rest.len() < n {
            return Err(Su2Error::parse(
                file,
                line_no,
                format!("{kind:?} needs {n} nodes, found {}", rest.len()),
            ));
        }
        elements.push(Element {
            kind,
            nodes: rest[..n].to_vec(),
        });
    }
    Ok(elements)
}

fn read_points<'a>(
    lines: &mut impl Iterator<Item = (usize, &'a str)>,
    count: usize,
    dimension: usize,
    file: &str,
) -> Result<Vec<Point3<f64>>, Su2Error> {
    let mut points = Vec::new();
    for _ in 0..count {
        let (line_no, line) = lines
            .next()
            .ok_or_else(|| Su2Error::missing(file, format!("{count} point lines")))?;

        let coords: Vec<f64> = tokens(line)
            .take(dimension)
            .map(str::parse)
            .collect::<Result<_, _>>()
            .map_err(|_| Su2Error::parse(file, line_no, "non-numeric coordinate"))?;

        if coords.len() < dimension {
            return Err(Su2Error::parse(
                file,
                line_no,
                format!("expected {dimension} coordinates"),
            ));
        }
        let z = if dimension == 3 { coords[2] } else { 0.0 };
        points.push(Point3::new(coords[0], coords[1], z));
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = "\
% two triangles and a quad on the unit strip
NDIME= 2
NELEM= 3
5 0 1 2 0
5 0 2 3 1
9 1 4 5 2 2
NPOIN= 6
0.0 0.0 0
1.0 0.0 1
1.0 1.0 2
0.0 1.0 3
2.0 0.0 4
2.0 1.0 5
NMARK= 2
MARKER_TAG= 7
MARKER_ELEMS= 2
3 0 1
3 1 4
MARKER_TAG= 1
MARKER_ELEMS= 1
3 3 2
";

    #[test]
    fn parses_sections_and_markers() {
        let mesh = Su2Mesh::parse(SQUARE, "square.su2").unwrap();

        assert_eq!(mesh.dimension, 2);
        assert_eq!(mesh.points.len(), 6);
        assert_eq!(mesh.points[5], Point3::new(2.0, 1.0, 0.0));
        assert_eq!(mesh.elements.len(), 3);
        assert_eq!(mesh.elements[2].kind, ElementKind::Quadrilateral);
        assert_eq!(mesh.elements[2].nodes, [1, 4, 5, 2]);

        let axis = mesh.marker("7").unwrap();
        assert_eq!(axis.elements.len(), 2);
        assert_eq!(axis.elements[1].nodes, [1, 4]);
        assert!(matches!(
            mesh.marker("9"),
            Err(Su2Error::UnknownMarker(tag)) if tag == "9"
        ));
    }

    #[test]
    fn quads_split_into_two_triangles() {
        let mesh = Su2Mesh::parse(SQUARE, "square.su2").unwrap();
        let triangles = mesh.planar_triangles();

        assert_eq!(triangles.len(), 4);
        assert_eq!(triangles[2], [1, 4, 5]);
        assert_eq!(triangles[3], [1, 5, 2]);
    }

    #[test]
    fn three_dimensional_points_keep_z() {
        let text = "NDIME= 3\nNELEM= 0\nNPOIN= 1\n1.0 2.0 3.0 0\n";
        let mesh = Su2Mesh::parse(text, "point.su2").unwrap();
        assert_eq!(mesh.points[0], Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn rejects_out_of_range_connectivity() {
        let text = "NDIME= 2\nNELEM= 1\n5 0 1 9\nNPOIN= 3\n0 0\n1 0\n0 1\n";
        assert!(matches!(
            Su2Mesh::parse(text, "bad.su2"),
            Err(Su2Error::PointOutOfRange { index: 9, count: 3 })
        ));
    }

    #[test]
    fn rejects_unknown_element_type() {
        let text = "NDIME= 2\nNELEM= 1\n7 0 1 2\nNPOIN= 3\n0 0\n1 0\n0 1\n";
        assert!(matches!(
            Su2Mesh::parse(text, "bad.su2"),
            Err(Su2Error::UnknownElement(7))
        ));
    }

    #[test]
    fn truncated_point_list_is_reported() {
        let text = "NDIME= 2\nNELEM= 0\nNPOIN= 3\n0 0\n1 0\n";
        assert!(matches!(
            Su2Mesh::parse(text, "short.su2"),
            Err(Su2Error::Missing { .. })
        ));
    }

    #[test]
    fn rejects_unsupported_dimension() {
        for text in [
            "NDIME= 1\nNELEM= 0\nNPOIN= 1\n0.5 0\n",
            "NDIME= 0\nNELEM= 0\nNPOIN= 1\n0.5 0\n",
        ] {
            assert!(matches!(
                Su2Mesh::parse(text, "line.su2"),
                Err(Su2Error::Parse { line: 1, .. })
            ));
        }
    }

    #[test]
    fn huge_header_counts_fail_on_missing_lines() {
        let elements = format!("NDIME= 2\nNELEM= {}\n", usize::MAX);
        assert!(matches!(
            Su2Mesh::parse(&elements, "huge.su2"),
            Err(Su2Error::Missing { .. })
        ));

        let points = format!("NDIME= 2\nNELEM= 0\nNPOIN= {}\n0 0\n", usize::MAX);
        assert!(matches!(
            Su2Mesh::parse(&points, "huge.su2"),
            Err(Su2Error::Missing { .. })
        ));

        let markers = format!("NDIME= 2\nNELEM= 0\nNPOIN= 1\n0 0\nNMARK= {}\n", usize::MAX);
        assert!(Su2Mesh::parse(&markers, "huge.su2").unwrap().markers.is_empty());
    }
}
