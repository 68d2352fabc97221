//! OBJ parser producing deduplicated, tangent-carrying submeshes.
//!
//! Recognizes `v`/`vt`/`vn`/`f`/`usemtl`; every other keyword is ignored.
//! Each `usemtl` closes the submesh in progress, so one submesh is emitted
//! per material range of the source file.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use corelib::{CompileError, CompileResult};

use crate::geometry::{self, Corner};
use crate::mesh::MeshData;

/// Load an OBJ mesh from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> CompileResult<MeshData> {
    let file = File::open(path.as_ref())?;
    let mesh = load_obj_from_reader(BufReader::new(file))?;
    log::debug!(
        "parsed {} submeshes from {}",
        mesh.submeshes.len(),
        path.as_ref().display()
    );
    Ok(mesh)
}

/// Load an OBJ mesh from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R) -> CompileResult<MeshData> {
    parse_obj(reader)
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> CompileResult<MeshData> {
    parse_obj(io::Cursor::new(contents))
}

fn parse_obj<R: BufRead>(reader: R) -> CompileResult<MeshData> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut texcoords: Vec<[f32; 2]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();

    // Corners of the submesh currently being assembled, three per triangle.
    let mut corners: Vec<Corner> = Vec::new();
    let mut submeshes = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = line_no + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let mut parts = trimmed.split_whitespace();
        let Some(tag) = parts.next() else {
            continue;
        };

        match tag {
            "v" => {
                let x = parse_f32(parts.next(), line_no, "x coordinate")?;
                let y = parse_f32(parts.next(), line_no, "y coordinate")?;
                let z = parse_f32(parts.next(), line_no, "z coordinate")?;
                positions.push([x, y, z]);
            }
            "vt" => {
                let u = parse_f32(parts.next(), line_no, "u coordinate")?;
                let v = parse_f32(parts.next(), line_no, "v coordinate")?;
                texcoords.push([u, v]);
            }
            "vn" => {
                let nx = parse_f32(parts.next(), line_no, "nx coordinate")?;
                let ny = parse_f32(parts.next(), line_no, "ny coordinate")?;
                let nz = parse_f32(parts.next(), line_no, "nz coordinate")?;
                normals.push([nx, ny, nz]);
            }
            "usemtl" => {
                // Material switch: close the current submesh. Closing before
                // any face was seen is a no-op.
                if let Some(sub) =
                    geometry::build_submesh(&positions, &texcoords, &normals, &corners)
                {
                    submeshes.push(sub);
                }
                corners.clear();
            }
            "f" => {
                let face = parts
                    .map(|token| {
                        parse_corner(
                            token,
                            positions.len(),
                            texcoords.len(),
                            normals.len(),
                            line_no,
                        )
                    })
                    .collect::<CompileResult<Vec<Corner>>>()?;

                if face.len() < 3 {
                    return Err(CompileError::malformed_line(
                        line_no,
                        format!("face with {} vertices", face.len()),
                    ));
                }

                corners.extend_from_slice(&face[0..3]);
                if face.len() > 3 {
                    // Quad: fan triangulation along the (v0, v2) diagonal.
                    corners.push(face[0]);
                    corners.push(face[2]);
                    corners.push(face[3]);
                }
            }
            _ => {
                // o/g/s/mtllib and friends carry no geometry.
            }
        }
    }

    // End of input closes the last submesh.
    if let Some(sub) = geometry::build_submesh(&positions, &texcoords, &normals, &corners) {
        submeshes.push(sub);
    }

    Ok(MeshData::new(submeshes))
}

fn parse_f32(value: Option<&str>, line_no: usize, what: &str) -> CompileResult<f32> {
    let token =
        value.ok_or_else(|| CompileError::malformed_line(line_no, format!("missing {what}")))?;
    token
        .parse::<f32>()
        .map_err(|_| CompileError::malformed_line(line_no, format!("unparsable {what} '{token}'")))
}

/// Parse one `pos/tex/normal` face element into 0-based attribute indices.
/// All three components are required; a missing one fails the whole file.
fn parse_corner(
    token: &str,
    pos_count: usize,
    tex_count: usize,
    norm_count: usize,
    line_no: usize,
) -> CompileResult<Corner> {
    let mut split = token.split('/');
    let mut component = |len: usize| -> CompileResult<u32> {
        match split.next() {
            Some(value) if !value.is_empty() => resolve_index(value, len, token, line_no),
            _ => Err(CompileError::malformed_face(line_no, token)),
        }
    };

    let pos = component(pos_count)?;
    let tex = component(tex_count)?;
    let norm = component(norm_count)?;
    Ok((pos, tex, norm))
}

/// Resolve a 1-based (or negative, end-relative) OBJ index against the
/// number of attributes declared so far. Out-of-range references are
/// malformed faces.
fn resolve_index(value: &str, len: usize, token: &str, line_no: usize) -> CompileResult<u32> {
    let raw = value
        .parse::<i64>()
        .map_err(|_| CompileError::malformed_face(line_no, token))?;

    let index = if raw > 0 {
        raw - 1
    } else if raw < 0 {
        len as i64 + raw
    } else {
        return Err(CompileError::malformed_face(line_no, token));
    };

    if index < 0 || index as usize >= len {
        return Err(CompileError::malformed_face(line_no, token));
    }
    Ok(index as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = r#"
        v 0.0 0.0 0.0
        v 1.0 0.0 0.0
        v 0.0 1.0 0.0
        vt 0.0 0.0
        vt 1.0 0.0
        vt 0.0 1.0
        vn 0.0 0.0 1.0
        f 1/1/1 2/2/1 3/3/1
    "#;

    #[test]
    fn parse_simple_triangle() {
        let mesh = load_obj_from_str(TRIANGLE).expect("parse triangle");
        assert_eq!(mesh.submeshes.len(), 1);
        let sub = &mesh.submeshes[0];
        assert_eq!(sub.vertices.len(), 3);
        assert_eq!(sub.indices, vec![0, 1, 2]);
        assert!(mesh.is_valid());
    }

    #[test]
    fn quad_fans_into_two_triangles_sharing_the_diagonal() {
        let src = r#"
            v 0.0 0.0 0.0
            v 1.0 0.0 0.0
            v 1.0 1.0 0.0
            v 0.0 1.0 0.0
            vt 0.0 0.0
            vt 1.0 0.0
            vt 1.0 1.0
            vt 0.0 1.0
            vn 0.0 0.0 1.0
            f 1/1/1 2/2/1 3/3/1 4/4/1
        "#;
        let mesh = load_obj_from_str(src).expect("parse quad");
        let sub = &mesh.submeshes[0];
        assert_eq!(sub.vertices.len(), 4);
        assert_eq!(sub.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn distinct_corner_triples_equal_vertex_count() {
        let src = r#"
            v 0.0 0.0 0.0
            v 1.0 0.0 0.0
            v 1.0 1.0 0.0
            v 0.0 1.0 0.0
            vt 0.0 0.0
            vt 1.0 1.0
            vn 0.0 0.0 1.0
            vn 1.0 0.0 0.0
            f 1/1/1 2/2/1 3/1/1
            f 1/1/1 3/1/1 4/2/1
            f 1/1/2 3/1/1 2/2/1
        "#;
        let mesh = load_obj_from_str(src).expect("parse");
        let sub = &mesh.submeshes[0];
        // Distinct triples used above: (0,0,0) (1,1,0) (2,0,0) (3,1,0) (0,0,1).
        assert_eq!(sub.vertices.len(), 5);
        assert_eq!(sub.indices.len(), 9);
        assert!(sub.is_valid());
    }

    #[test]
    fn usemtl_splits_submeshes() {
        let src = r#"
            v 0.0 0.0 0.0
            v 1.0 0.0 0.0
            v 0.0 1.0 0.0
            vt 0.0 0.0
            vn 0.0 0.0 1.0
            usemtl stone
            f 1/1/1 2/1/1 3/1/1
            usemtl grass
            f 3/1/1 2/1/1 1/1/1
        "#;
        let mesh = load_obj_from_str(src).expect("parse");
        assert_eq!(mesh.submeshes.len(), 2);
        // Indices restart from 0 in every submesh.
        assert_eq!(mesh.submeshes[0].indices, vec![0, 1, 2]);
        assert_eq!(mesh.submeshes[1].indices, vec![0, 1, 2]);
    }

    #[test]
    fn leading_usemtl_does_not_emit_an_empty_submesh() {
        let src = r#"
            usemtl stone
            v 0.0 0.0 0.0
            v 1.0 0.0 0.0
            v 0.0 1.0 0.0
            vt 0.0 0.0
            vn 0.0 0.0 1.0
            f 1/1/1 2/1/1 3/1/1
        "#;
        let mesh = load_obj_from_str(src).expect("parse");
        assert_eq!(mesh.submeshes.len(), 1);
    }

    #[test]
    fn missing_texcoord_component_is_a_malformed_face() {
        let src = r#"
            v 0.0 0.0 0.0
            vn 0.0 0.0 1.0
            f 1//1 1//1 1//1
        "#;
        let err = load_obj_from_str(src).unwrap_err();
        assert!(matches!(err, CompileError::MalformedFace { .. }));
    }

    #[test]
    fn out_of_range_index_is_a_malformed_face() {
        let src = r#"
            v 0.0 0.0 0.0
            vt 0.0 0.0
            vn 0.0 0.0 1.0
            f 1/1/1 2/1/1 1/1/1
        "#;
        let err = load_obj_from_str(src).unwrap_err();
        assert!(matches!(err, CompileError::MalformedFace { line: 5, .. }));
    }

    #[test]
    fn negative_indices_resolve_from_the_end() {
        let src = r#"
            v 0.0 0.0 0.0
            v 1.0 0.0 0.0
            v 0.0 1.0 0.0
            vt 0.0 0.0
            vn 0.0 0.0 1.0
            f -3/-1/-1 -2/-1/-1 -1/-1/-1
        "#;
        let mesh = load_obj_from_str(src).expect("parse");
        let sub = &mesh.submeshes[0];
        assert_eq!(sub.vertices.len(), 3);
        assert_eq!(sub.vertices[1].position, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn short_attribute_line_is_malformed() {
        let err = load_obj_from_str("v 1.0 2.0").unwrap_err();
        assert!(matches!(err, CompileError::MalformedLine { line: 1, .. }));
    }

    #[test]
    fn comments_and_unknown_keywords_are_ignored() {
        let src = r#"
            # a comment
            mtllib scene.mtl
            o cube
            s off
            v 0.0 0.0 0.0
            v 1.0 0.0 0.0
            v 0.0 1.0 0.0
            vt 0.0 0.0
            vn 0.0 0.0 1.0
            f 1/1/1 2/1/1 3/1/1
        "#;
        let mesh = load_obj_from_str(src).expect("parse");
        assert_eq!(mesh.submeshes.len(), 1);
    }
}
