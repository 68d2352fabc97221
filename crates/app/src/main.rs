//! Entry point for the forge3d asset pipeline.
//! Converts interchange sources (OBJ meshes, TGA textures) into the runtime
//! binary formats, one batch per asset kind.

use std::path::PathBuf;

use anyhow::Result;
use pipeline::{BatchSummary, CompilerConfig, MeshCompiler, TextureCompiler};

fn parse_dir_arg(name: &str, default: &str) -> PathBuf {
    // Accept: --<name>=<dir>
    let prefix = format!("--{name}=");
    let mut value = PathBuf::from(default);
    for arg in std::env::args() {
        if let Some(dir) = arg.strip_prefix(prefix.as_str()) {
            if dir.is_empty() {
                eprintln!("[warn] Empty value for --{name}, keeping '{default}'.");
            } else {
                value = PathBuf::from(dir);
            }
        }
    }
    value
}

fn report(kind: &str, summary: BatchSummary) {
    log::info!(
        "{kind}: {} compiled, {} failed, {} skipped",
        summary.compiled,
        summary.failed,
        summary.skipped
    );
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let source_root = parse_dir_arg("source", "source");
    let out_root = parse_dir_arg("out", ".");
    log::info!(
        "Starting forge3d asset pipeline. source={}, out={}",
        source_root.display(),
        out_root.display()
    );

    let meshes = source_root.join("meshes");
    if meshes.is_dir() {
        let compiler = MeshCompiler::new(CompilerConfig::new(meshes, out_root.join("meshes")));
        report("meshes", compiler.run()?);
    } else {
        log::warn!("no mesh sources at {}", meshes.display());
    }

    let textures = source_root.join("textures");
    if textures.is_dir() {
        let compiler =
            TextureCompiler::new(CompilerConfig::new(textures, out_root.join("textures")));
        report("textures", compiler.run()?);
    } else {
        log::warn!("no texture sources at {}", textures.display());
    }

    log::info!("Asset pipeline finished.");
    Ok(())
}
