//! Submesh assembly: vertex deduplication and tangent-space derivation.

use std::collections::HashMap;

use glam::Vec3;

use crate::mesh::{MeshVertex, SubMesh};

/// One corner of a source face: 0-based position/texcoord/normal indices
/// into the attribute arrays accumulated by the parser.
pub type Corner = (u32, u32, u32);

/// Build a submesh from face corners in original order.
///
/// The first occurrence of a (position, texcoord, normal) combination appends
/// a vertex and assigns the next dense index; repeats resolve to the existing
/// index, so triangle winding is preserved and no attribute combination is
/// stored twice. Returns `None` for an empty corner list (closing a submesh
/// that never saw a face is a no-op). Corners must reference declared
/// attributes; the parser validates them before handing them over.
pub fn build_submesh(
    positions: &[[f32; 3]],
    texcoords: &[[f32; 2]],
    normals: &[[f32; 3]],
    corners: &[Corner],
) -> Option<SubMesh> {
    if corners.is_empty() {
        return None;
    }

    let mut remap: HashMap<Corner, u32> = HashMap::new();
    let mut vertices: Vec<MeshVertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::with_capacity(corners.len());

    for corner in corners {
        let index = match remap.get(corner) {
            Some(&existing) => existing,
            None => {
                let (pi, ti, ni) = *corner;
                let index = vertices.len() as u32;
                vertices.push(MeshVertex::new(
                    positions[pi as usize],
                    texcoords[ti as usize],
                    normals[ni as usize],
                ));
                remap.insert(*corner, index);
                index
            }
        };
        indices.push(index);
    }

    compute_tangents(&mut vertices, &indices);
    Some(SubMesh::new(vertices, indices))
}

/// Derive one tangent per triangle from position/UV deltas and write it to
/// all three corners. Tangents are face-uniform, not smoothed: a vertex
/// shared by several triangles keeps the last-processed triangle's tangent.
///
/// The UV determinant is used unguarded; a degenerate UV triangle yields a
/// non-finite tangent that is stored as-is.
pub fn compute_tangents(vertices: &mut [MeshVertex], indices: &[u32]) {
    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);

        let p1 = Vec3::from(vertices[i0].position);
        let p2 = Vec3::from(vertices[i1].position);
        let p3 = Vec3::from(vertices[i2].position);
        let t1 = vertices[i0].texcoord;
        let t2 = vertices[i1].texcoord;
        let t3 = vertices[i2].texcoord;

        let e1 = p2 - p1;
        let e2 = p3 - p1;
        let (u1, v1) = (t2[0] - t1[0], t2[1] - t1[1]);
        let (u2, v2) = (t3[0] - t1[0], t3[1] - t1[1]);

        let det = u1 * v2 - v1 * u2;
        let tangent = e1 * (v2 / det) - e2 * (v1 / det);
        let tangent = (tangent / tangent.length()).to_array();

        vertices[i0].tangent = tangent;
        vertices[i1].tangent = tangent;
        vertices[i2].tangent = tangent;
    }
}
