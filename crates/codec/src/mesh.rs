//! Mesh container codec.
//!
//! Per submesh: `i32` vertex count; 11 little-endian `f32` per vertex in
//! position/texcoord/normal/tangent order; `i32` index count; that many
//! little-endian `u32` indices. Submeshes follow each other with no outer
//! framing, so the reader runs until end-of-stream. There is no magic or
//! version field; identity is by directory convention.

use std::io::{self, Read, Write};

use asset::mesh::{MeshData, MeshVertex, SubMesh};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

pub fn write_mesh<W: Write>(writer: &mut W, mesh: &MeshData) -> io::Result<()> {
    for sub in &mesh.submeshes {
        write_submesh(writer, sub)?;
    }
    Ok(())
}

pub fn write_submesh<W: Write>(writer: &mut W, sub: &SubMesh) -> io::Result<()> {
    writer.write_i32::<LittleEndian>(sub.vertices.len() as i32)?;
    for vertex in &sub.vertices {
        for value in vertex.position {
            writer.write_f32::<LittleEndian>(value)?;
        }
        for value in vertex.texcoord {
            writer.write_f32::<LittleEndian>(value)?;
        }
        for value in vertex.normal {
            writer.write_f32::<LittleEndian>(value)?;
        }
        for value in vertex.tangent {
            writer.write_f32::<LittleEndian>(value)?;
        }
    }
    writer.write_i32::<LittleEndian>(sub.indices.len() as i32)?;
    for &index in &sub.indices {
        writer.write_u32::<LittleEndian>(index)?;
    }
    Ok(())
}

/// Read submesh records until the stream ends.
pub fn read_mesh<R: Read>(reader: &mut R) -> io::Result<MeshData> {
    let mut submeshes = Vec::new();
    while let Some(sub) = read_submesh(reader)? {
        submeshes.push(sub);
    }
    Ok(MeshData::new(submeshes))
}

/// Read one submesh record; `None` on a clean end-of-stream at a record
/// boundary. Truncation inside a record is an error.
pub fn read_submesh<R: Read>(reader: &mut R) -> io::Result<Option<SubMesh>> {
    let vertex_count = match reader.read_i32::<LittleEndian>() {
        Ok(count) => count,
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(err) => return Err(err),
    };
    let vertex_count = usize::try_from(vertex_count)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "negative vertex count"))?;

    let mut vertices = Vec::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        let mut vertex = MeshVertex::default();
        for value in &mut vertex.position {
            *value = reader.read_f32::<LittleEndian>()?;
        }
        for value in &mut vertex.texcoord {
            *value = reader.read_f32::<LittleEndian>()?;
        }
        for value in &mut vertex.normal {
            *value = reader.read_f32::<LittleEndian>()?;
        }
        for value in &mut vertex.tangent {
            *value = reader.read_f32::<LittleEndian>()?;
        }
        vertices.push(vertex);
    }

    let index_count = usize::try_from(reader.read_i32::<LittleEndian>()?)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "negative index count"))?;
    let mut indices = Vec::with_capacity(index_count);
    for _ in 0..index_count {
        indices.push(reader.read_u32::<LittleEndian>()?);
    }

    Ok(Some(SubMesh::new(vertices, indices)))
}
