//! Wavefront OBJ subset reader
//!
//! Supports `v`, `vt`, `vn` and triangle faces written as three `v/vt/vn`
//! corners. Every other record is ignored. Output is fully de-indexed: each
//! face corner becomes its own vertex and indices run `0, 1, 2, ...` in file
//! order.

use std::path::Path;

use crate::error::ObjError;
use crate::gfx::scene::{MeshData, Vertex};

/// De-indexed geometry read from an OBJ file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl From<ObjMesh> for MeshData {
    fn from(mesh: ObjMesh) -> Self {
        MeshData::new(mesh.vertices, mesh.indices)
    }
}

/// Reads and parses an OBJ file. Nothing is returned unless every record parses.
pub fn parse_obj_file(path: impl AsRef<Path>) -> Result<ObjMesh, ObjError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| ObjError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mesh = parse_obj_str(&source)?;
    log::debug!(
        "Parsed {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertices.len(),
        mesh.indices.len() / 3
    );
    Ok(mesh)
}

/// Parses OBJ text held in memory
pub fn parse_obj_str(source: &str) -> Result<ObjMesh, ObjError> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut uvs: Vec<[f32; 2]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();
    let mut mesh = ObjMesh::default();

    for (number, line) in source.lines().enumerate() {
        let line_number = number + 1;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => positions.push(parse_floats(tokens, line_number, "v")?),
            Some("vt") => uvs.push(parse_floats(tokens, line_number, "vt")?),
            Some("vn") => normals.push(parse_floats(tokens, line_number, "vn")?),
            Some("f") => {
                let corners: Vec<&str> = tokens.collect();
                if corners.len() != 3 {
                    return Err(ObjError::ComponentCount {
                        line: line_number,
                        record: "f",
                        expected: 3,
                        found: corners.len(),
                    });
                }

                for corner in corners {
                    let [v, vt, vn] = parse_corner(corner, line_number)?;
                    let vertex = Vertex::new(
                        lookup(&positions, v, line_number, "position")?,
                        lookup(&uvs, vt, line_number, "texture coordinate")?,
                        lookup(&normals, vn, line_number, "normal")?,
                    );
                    mesh.indices.push(mesh.vertices.len() as u32);
                    mesh.vertices.push(vertex);
                }
            }
            _ => {}
        }
    }

    if mesh.indices.is_empty() {
        return Err(ObjError::NoFaces);
    }

    Ok(mesh)
}

/// Parses the first `N` floats from the rest of a record line
///
/// Trailing components (`w` of `v x y z w`, `vt u v w`) must still be numbers
/// but are dropped.
fn parse_floats<'a, const N: usize>(
    tokens: impl Iterator<Item = &'a str>,
    line: usize,
    record: &'static str,
) -> Result<[f32; N], ObjError> {
    let tokens: Vec<&str> = tokens.collect();
    if tokens.len() < N {
        return Err(ObjError::ComponentCount {
            line,
            record,
            expected: N,
            found: tokens.len(),
        });
    }

    let mut values = [0.0; N];
    for (i, token) in tokens.into_iter().enumerate() {
        let value: f32 = token.parse().map_err(|_| ObjError::MalformedNumber {
            line,
            record,
            token: token.to_string(),
        })?;
        if let Some(slot) = values.get_mut(i) {
            *slot = value;
        }
    }
    Ok(values)
}

/// Splits `a/b/c` into its three 1-based indices
fn parse_corner(corner: &str, line: usize) -> Result<[u32; 3], ObjError> {
    let malformed = || ObjError::MalformedFaceCorner {
        line,
        corner: corner.to_string(),
    };

    let parts: Vec<&str> = corner.split('/').collect();
    if parts.len() != 3 {
        return Err(malformed());
    }

    let mut indices = [0u32; 3];
    for (index, part) in indices.iter_mut().zip(parts) {
        *index = part.parse().map_err(|_| malformed())?;
    }
    Ok(indices)
}

fn lookup<T: Copy>(pool: &[T], index: u32, line: usize, name: &'static str) -> Result<T, ObjError> {
    index
        .checked_sub(1)
        .and_then(|i| pool.get(i as usize))
        .copied()
        .ok_or(ObjError::IndexOutOfRange {
            line,
            pool: name,
            index,
            len: pool.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "\
# single triangle
o Triangle
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
vn 0.0 0.0 1.0
s off
f 1/1/1 2/2/1 3/3/1
";

    #[test]
    fn test_single_triangle() {
        let mesh = parse_obj_str(TRIANGLE).unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.vertices[2].uv, [0.0, 1.0]);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_corners_are_de_indexed() {
        let quad = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vn 0 0 1
f 1/1/1 2/1/1 3/1/1
f 3/1/1 4/1/1 1/1/1
";
        let mesh = parse_obj_str(quad).unwrap();
        assert_eq!(mesh.indices, (0..6).collect::<Vec<u32>>());
        assert_eq!(mesh.vertices.len(), mesh.indices.len());
        assert_eq!(mesh.vertices[0].position, mesh.vertices[5].position);
    }

    #[test]
    fn test_missing_component_rejects_file() {
        let source = TRIANGLE.replace("v 1.0 0.0 0.0", "v 1.0 0.0");
        match parse_obj_str(&source) {
            Err(ObjError::ComponentCount { line, record, .. }) => {
                assert_eq!(line, 4);
                assert_eq!(record, "v");
            }
            other => panic!("expected component count error, got {:?}", other),
        }
    }

    #[test]
    fn test_extra_components_are_dropped() {
        let source = TRIANGLE
            .replace("vt 1.0 0.0", "vt 0.5 0.5 0.0")
            .replace("v 1.0 0.0 0.0", "v 1 2 3 1");
        let mesh = parse_obj_str(&source).unwrap();
        assert_eq!(mesh.vertices[1].position, [1.0, 2.0, 3.0]);
        assert_eq!(mesh.vertices[1].uv, [0.5, 0.5]);

        let bad_w = TRIANGLE.replace("vt 1.0 0.0", "vt 1.0 0.0 w");
        assert!(matches!(
            parse_obj_str(&bad_w),
            Err(ObjError::MalformedNumber { line: 7, .. })
        ));
    }

    #[test]
    fn test_malformed_number() {
        let source = TRIANGLE.replace("vt 1.0 0.0", "vt 1.0 zero");
        assert!(matches!(
            parse_obj_str(&source),
            Err(ObjError::MalformedNumber { line: 7, .. })
        ));
    }

    #[test]
    fn test_face_shapes() {
        let quad_face = TRIANGLE.replace("f 1/1/1 2/2/1 3/3/1", "f 1/1/1 2/2/1 3/3/1 1/1/1");
        assert!(matches!(
            parse_obj_str(&quad_face),
            Err(ObjError::ComponentCount { record: "f", found: 4, .. })
        ));

        let no_uv = TRIANGLE.replace("f 1/1/1 2/2/1 3/3/1", "f 1//1 2//1 3//1");
        assert!(matches!(
            parse_obj_str(&no_uv),
            Err(ObjError::MalformedFaceCorner { .. })
        ));
    }

    #[test]
    fn test_index_range() {
        let zero = TRIANGLE.replace("f 1/1/1", "f 0/1/1");
        assert!(matches!(
            parse_obj_str(&zero),
            Err(ObjError::IndexOutOfRange { index: 0, .. })
        ));

        let past_end = TRIANGLE.replace("3/3/1", "3/3/2");
        assert!(matches!(
            parse_obj_str(&past_end),
            Err(ObjError::IndexOutOfRange { index: 2, len: 1, .. })
        ));
    }

    #[test]
    fn test_no_faces() {
        assert!(matches!(parse_obj_str("v 0 0 0\n"), Err(ObjError::NoFaces)));
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("tartan-does-not-exist.obj");
        assert!(matches!(parse_obj_file(&path), Err(ObjError::Io { .. })));
    }
}
