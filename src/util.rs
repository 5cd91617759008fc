//! Filesystem utility functions used by the binary.

use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Remove a path regardless of whether it is a file, symlink, or directory.
pub fn remove_any(p: &Path) -> Result<()> {
    let meta = fs::symlink_metadata(p).with_context(|| format!("stat {}", p.display()))?;

    if meta.is_dir() {
        fs::remove_dir_all(p)
    } else {
        fs::remove_file(p)
    }
    .with_context(|| format!("remove {}", p.display()))
}
