use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::LibrarySettings;

fn normalized_extensions(settings: &LibrarySettings) -> Vec<String> {
    settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn has_extension(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

/// Whether `path` has one of the configured import extensions (case-insensitive).
pub fn is_supported(path: &Path, settings: &LibrarySettings) -> bool {
    has_extension(path, &normalized_extensions(settings))
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Expand `inputs` into the list of files that may be handed to `Catalog::add`.
///
/// Directories are walked according to `settings`; plain paths are kept when
/// their extension is supported, even if they do not exist (the import step
/// reports those). Everything else is dropped here.
pub fn collect_importable<P: AsRef<Path>>(inputs: &[P], settings: &LibrarySettings) -> Vec<PathBuf> {
    let exts = normalized_extensions(settings);
    let mut out: Vec<PathBuf> = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        if !input.is_dir() {
            if has_extension(input, &exts) {
                out.push(input.to_path_buf());
            }
            continue;
        }

        let mut walker = WalkDir::new(input)
            .follow_links(settings.follow_links)
            .sort_by_file_name();

        // Non-recursive = only the directory itself.
        let depth_cap = if settings.recursive {
            settings.max_depth
        } else {
            Some(1)
        };
        if let Some(d) = depth_cap {
            walker = walker.max_depth(d);
        }

        for entry in walker
            .into_iter()
            .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if path.is_file() && has_extension(path, &exts) {
                out.push(path.to_path_buf());
            }
        }
    }

    out
}
