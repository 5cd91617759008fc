//! Render a directory tree of `*.tpl` templates through a [`Cache`].

use anyhow::{Context, Result, bail};
use luigi::{Cache, Row};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Render every template under `templates_dir` into `out_dir`.
///
/// Templates under `user_templates_dir` take precedence over the same
/// relative path in `templates_dir`. Returns the number of files written.
pub fn render_all(
    templates_dir: &Path,
    user_templates_dir: Option<&Path>,
    out_dir: &Path,
    row: &Row,
) -> Result<usize> {
    if !templates_dir.is_dir() {
        bail!("templates directory not found: {}", templates_dir.display());
    }
    fs::create_dir_all(out_dir).context("create output directory")?;

    let cache = Cache::new(load_sources(templates_dir, user_templates_dir)?);

    let mut keys: Vec<&str> = cache.keys().collect();
    keys.sort_unstable();

    for key in &keys {
        let rendered = cache
            .run(key, row)
            .with_context(|| format!("render template {key}"))?;
        write_output(out_dir, key, &rendered)?;
    }

    Ok(keys.len())
}

/// Collect `relative path -> source` for both directories, user copies last
/// so they overwrite the defaults.
fn load_sources(
    templates_dir: &Path,
    user_templates_dir: Option<&Path>,
) -> Result<HashMap<String, String>> {
    let mut sources = HashMap::new();

    let dirs = std::iter::once(templates_dir).chain(user_templates_dir.filter(|d| d.is_dir()));
    for dir in dirs {
        for tpl in templates_in(dir)? {
            let rel = tpl.strip_prefix(dir)?;
            let Some(rel) = rel.to_str() else {
                bail!("template path is not valid UTF-8: {}", tpl.display());
            };
            let src = fs::read_to_string(&tpl)
                .with_context(|| format!("read template {}", tpl.display()))?;
            if sources.insert(rel.to_owned(), src).is_some() {
                tracing::debug!(template = %rel, "user template overrides default");
            }
        }
    }

    Ok(sources)
}

/// Write `out_dir / rel` minus the `.tpl` extension.
fn write_output(out_dir: &Path, rel: &str, rendered: &str) -> Result<()> {
    let mut out_path = out_dir.join(rel);
    out_path.set_extension(""); // strip .tpl

    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create output subdir {}", parent.display()))?;
    }
    fs::write(&out_path, rendered).with_context(|| format!("write {}", out_path.display()))
}

/// Every `*.tpl` file below `dir`, in walk order.
///
/// A directory that cannot be read aborts the render: a partial tree must
/// never replace a previous complete output.
fn templates_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.with_context(|| format!("walk {}", dir.display()))?;
        let is_tpl = entry.path().extension().is_some_and(|x| x == "tpl");
        if entry.file_type().is_file() && is_tpl {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}
