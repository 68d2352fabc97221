//! Binary container codecs for the runtime formats: the `.sm` mesh
//! container and DDS textures with a DX10 extension header.

pub mod compression;
pub mod dds;
pub mod mesh;
