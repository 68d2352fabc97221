//! Texture converter: `.tga` sources to DDS artifacts.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Result;
use codec::compression::{Compression, PassThrough};
use corelib::CompileResult;

use crate::batch::{self, BatchSummary, CompilerConfig};

pub struct TextureCompiler {
    config: CompilerConfig,
    srgb: bool,
}

impl TextureCompiler {
    /// Batch output is always tagged sRGB.
    pub fn new(config: CompilerConfig) -> Self {
        Self::with_color_space(config, true)
    }

    pub fn with_color_space(config: CompilerConfig, srgb: bool) -> Self {
        Self { config, srgb }
    }

    /// Convert every `.tga` in the source directory.
    pub fn run(&self) -> Result<BatchSummary> {
        let srgb = self.srgb;
        batch::run_batch(&self.config, "tga", "dds", move |source, dest| {
            compile_file(source, dest, srgb)
        })
    }
}

/// Convert one TGA file into a DDS artifact.
pub fn compile_file(source: &Path, dest: &Path, srgb: bool) -> CompileResult<()> {
    let image = asset::tga::load_tga_from_path(source)?;

    let strategy = PassThrough::new(srgb);
    let header = strategy.header(&image)?;
    let payload = strategy.compress(&image)?;

    let mut writer = BufWriter::new(File::create(dest)?);
    codec::dds::write_dds(&mut writer, &header, &payload)?;
    writer.flush()?;
    Ok(())
}
