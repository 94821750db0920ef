use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    /// Names the exported table. Normally the file stem; see [`scan_images`].
    pub id: String,
    pub path: PathBuf,
}

fn has_image_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Lists the images directly inside `dir`, sorted by file name.
///
/// Subdirectories are not descended into. When several images share a stem
/// (`a.jpg`, `a.png`), the first keeps the stem as its id and the others get
/// the extension appended (`a_png`) so every image has its own output file.
pub fn scan_images(dir: &Path, extensions: &[String]) -> io::Result<Vec<ImageEntry>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_image_extension(&path, extensions) {
            paths.push(path);
        }
    }
    paths.sort_by(|left, right| left.file_name().cmp(&right.file_name()));

    let mut seen = HashSet::new();
    let images = paths
        .into_iter()
        .map(|path| {
            let stem = file_stem(&path);
            let id = if seen.insert(stem.clone()) {
                stem
            } else {
                let ext = path
                    .extension()
                    .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
                    .unwrap_or_default();
                format!("{stem}_{ext}")
            };
            ImageEntry { id, path }
        })
        .collect();
    Ok(images)
}
