//! Directory rendering facade.

pub mod engine;

use crate::transaction::Transaction;
use anyhow::{Context, Result, bail};
use luigi::Row;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Render all templates into a staging directory, then swap it into
/// `out_dir` in one step. Returns the number of files written.
pub fn render_all(
    templates_dir: &Path,
    user_templates_dir: Option<&Path>,
    out_dir: &Path,
    row: &Row,
) -> Result<usize> {
    let out = resolve(out_dir)?;
    let sources = std::iter::once(templates_dir).chain(user_templates_dir);
    for src in sources.filter(|p| p.exists()) {
        let src_abs = resolve(src)?;
        if src_abs.starts_with(&out) {
            bail!(
                "output directory {} would replace template directory {}",
                out_dir.display(),
                src.display()
            );
        }
    }

    let txn = Transaction::begin(out_dir).context("begin transaction")?;
    let written = engine::render_all(templates_dir, user_templates_dir, txn.stage(), row)
        .context("render templates")?;
    txn.commit().context("commit transaction")?;
    Ok(written)
}

/// Absolute, symlink-free form of `path`. A missing final component is
/// joined onto its canonical parent.
fn resolve(path: &Path) -> Result<PathBuf> {
    if let Ok(abs) = fs::canonicalize(path) {
        return Ok(abs);
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let name = path
        .file_name()
        .with_context(|| format!("no file name in {}", path.display()))?;
    let parent = fs::canonicalize(parent).with_context(|| format!("resolve {}", parent.display()))?;
    Ok(parent.join(name))
}
