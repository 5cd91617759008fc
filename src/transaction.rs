//! Atomic publish of a rendered tree via a temp-dir → rename protocol.
use crate::util;
use anyhow::{Context, Result, bail};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tempfile::{Builder, TempDir};

/// Written into every staged tree; marks a directory as ours to replace.
pub const MARKER: &str = ".luigi-render";

pub struct Transaction {
    stage: TempDir,
    target: PathBuf,
}

impl Transaction {
    /// Create a staging directory next to `target` so the final rename stays
    /// on one filesystem.
    pub fn begin(target: &Path) -> Result<Self> {
        let parent = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)
            .with_context(|| format!("create parent dir {}", parent.display()))?;

        let stage = Builder::new()
            .prefix(".stage.")
            .tempdir_in(parent)
            .context("create staging dir")?;
        fs::write(stage.path().join(MARKER), "").context("write render marker")?;

        Ok(Self {
            stage,
            target: target.to_path_buf(),
        })
    }

    /// Path callers write rendered files into.
    #[inline]
    pub fn stage(&self) -> &Path {
        self.stage.path()
    }

    /// Replace `target` with the staged tree.
    ///
    /// An existing target is only replaced when it is empty or carries
    /// [`MARKER`] from an earlier commit.
    pub fn commit(self) -> Result<()> {
        ensure_replaceable(&self.target)?;

        // Surrender TempDir ownership before any fallible operations so the
        // staged tree survives every error path below.
        let stage_path = self.stage.keep();

        if fs::symlink_metadata(&self.target).is_ok() {
            util::remove_any(&self.target).context("remove previous output")?;
        }

        fs::rename(&stage_path, &self.target).with_context(|| {
            format!(
                "rename {} -> {}",
                stage_path.display(),
                self.target.display()
            )
        })
    }
}

fn ensure_replaceable(target: &Path) -> Result<()> {
    let Ok(meta) = fs::symlink_metadata(target) else {
        return Ok(());
    };
    if !meta.is_dir() {
        bail!("{} exists and is not a directory", target.display());
    }
    if target.join(MARKER).is_file() {
        return Ok(());
    }
    let mut entries =
        fs::read_dir(target).with_context(|| format!("read {}", target.display()))?;
    if entries.next().is_some() {
        bail!(
            "{} is not empty and was not produced by a previous render",
            target.display()
        );
    }
    Ok(())
}
