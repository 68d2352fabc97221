//! Mesh converter: `.obj` sources to binary `.sm` artifacts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Result;
use corelib::CompileResult;

use crate::batch::{self, BatchSummary, CompilerConfig};

pub struct MeshCompiler {
    config: CompilerConfig,
}

impl MeshCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Convert every `.obj` in the source directory.
    pub fn run(&self) -> Result<BatchSummary> {
        batch::run_batch(&self.config, "obj", "sm", compile_file)
    }
}

/// Convert one OBJ file into a mesh artifact.
pub fn compile_file(source: &Path, dest: &Path) -> CompileResult<()> {
    let mesh = asset::obj::load_obj_from_path(source)?;

    let mut writer = BufWriter::new(File::create(dest)?);
    codec::mesh::write_mesh(&mut writer, &mesh)?;
    writer.flush()?;
    Ok(())
}
