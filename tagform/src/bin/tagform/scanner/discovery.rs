//! File discovery for finding Rust files containing FormClass derives.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Discovered source file with basic metadata
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    /// Path relative to the scanned root
    pub relative_path: String,
}

/// Walks `root` for `.rs` files that mention `FormClass`.
///
/// Hidden entries and `target/` are skipped. Results are sorted by relative
/// path.
pub fn discover_form_files(root: &Path) -> Result<Vec<DiscoveredFile>> {
    let mut discovered = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            entry.depth() == 0 || !(name.starts_with('.') || name == "target")
        });

    for entry in walker.filter_map(|e| e.ok()) {
        let path = entry.path();

        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "rs") {
            continue;
        }

        if file_mentions_form_class(path)? {
            let relative_path = path
                .strip_prefix(root)
                .unwrap_or(path)
                .to_string_lossy()
                .to_string();

            discovered.push(DiscoveredFile {
                path: path.to_path_buf(),
                relative_path,
            });
        }
    }

    discovered.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    Ok(discovered)
}

/// Fast text check before parsing.
fn file_mentions_form_class(path: &Path) -> Result<bool> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(content.contains("FormClass"))
}
