//! Shared batch runner for the per-directory converters.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use corelib::{CompileError, CompileResult};

/// Source and destination directories for one converter run. Passed in
/// explicitly at construction; the converters keep no ambient path state.
#[derive(Clone, Debug)]
pub struct CompilerConfig {
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
}

impl CompilerConfig {
    pub fn new(source_dir: impl Into<PathBuf>, dest_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            dest_dir: dest_dir.into(),
        }
    }
}

/// Outcome of one batch run. A failed file never fails the run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub compiled: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Enumerate the source directory in name order and feed every file with
/// `source_ext` through `compile`. Anything else is logged as unsupported
/// and skipped. On a per-file failure the partial artifact is deleted
/// before moving on; the batch itself only fails when the directories
/// cannot be set up or enumerated.
pub(crate) fn run_batch(
    config: &CompilerConfig,
    source_ext: &str,
    dest_ext: &str,
    compile: impl Fn(&Path, &Path) -> CompileResult<()>,
) -> Result<BatchSummary> {
    fs::create_dir_all(&config.dest_dir)
        .with_context(|| format!("cannot create {}", config.dest_dir.display()))?;

    let mut entries = fs::read_dir(&config.source_dir)
        .and_then(|dir| dir.map(|entry| entry.map(|e| e.path())).collect::<io::Result<Vec<_>>>())
        .with_context(|| format!("cannot enumerate {}", config.source_dir.display()))?;
    entries.sort();

    let mut summary = BatchSummary::default();
    for path in entries {
        let file_name = path
            .file_name()
            .unwrap_or(path.as_os_str())
            .to_string_lossy()
            .into_owned();

        if path.extension().and_then(OsStr::to_str) != Some(source_ext) || !path.is_file() {
            log::warn!("{}", CompileError::UnsupportedExtension(file_name));
            summary.skipped += 1;
            continue;
        }

        let dest = artifact_path(&config.dest_dir, &path, dest_ext);
        log::info!("processing {file_name}");
        match compile(&path, &dest) {
            Ok(()) => summary.compiled += 1,
            Err(err) => {
                log::error!("cannot process {file_name}: {err}");
                // The compile closure has dropped its destination handle by
                // now; a partial artifact must not survive the failure.
                if dest.exists() {
                    if let Err(remove_err) = fs::remove_file(&dest) {
                        log::warn!("cannot remove partial {}: {remove_err}", dest.display());
                    }
                }
                summary.failed += 1;
            }
        }
    }
    Ok(summary)
}

/// Destination path for a source file: same stem, new extension.
pub(crate) fn artifact_path(dest_dir: &Path, source: &Path, dest_ext: &str) -> PathBuf {
    let stem = source.file_stem().unwrap_or_default();
    dest_dir.join(stem).with_extension(dest_ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_keeps_the_stem_and_swaps_the_extension() {
        let dest = artifact_path(Path::new("/out"), Path::new("/src/rock.obj"), "sm");
        assert_eq!(dest, Path::new("/out/rock.sm"));
    }
}
