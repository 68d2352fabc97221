//! CPU-side mesh representation produced by the OBJ converter.

/// Vertex with position/texcoord/normal plus a derived tangent.
/// Values are in object space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub texcoord: [f32; 2],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], texcoord: [f32; 2], normal: [f32; 3]) -> Self {
        Self {
            position,
            texcoord,
            normal,
            tangent: [0.0; 3],
        }
    }

    /// Number of `f32` values a vertex occupies in the binary mesh format.
    pub const FLOATS: usize = 11;
}

/// Indexed triangle list for one material range of a mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubMesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl SubMesh {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Returns `true` if both buffers are non-empty and every index refers
    /// to a vertex of this submesh.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty()
            && !self.indices.is_empty()
            && self.indices.iter().all(|&i| (i as usize) < self.vertices.len())
    }
}

/// A whole mesh file: submeshes in material order, one per `usemtl` range.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub submeshes: Vec<SubMesh>,
}

impl MeshData {
    pub fn new(submeshes: Vec<SubMesh>) -> Self {
        Self { submeshes }
    }

    pub fn is_valid(&self) -> bool {
        !self.submeshes.is_empty() && self.submeshes.iter().all(SubMesh::is_valid)
    }
}
