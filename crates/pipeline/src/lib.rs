//! Batch drivers gluing the parsers and encoders into directory converters.
//! Each converter takes explicit source/destination configuration, processes
//! every recognized file, and keeps going past per-file failures.

pub mod batch;
pub mod mesh;
pub mod texture;

pub use batch::{BatchSummary, CompilerConfig};
pub use mesh::MeshCompiler;
pub use texture::TextureCompiler;
