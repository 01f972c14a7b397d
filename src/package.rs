//! Writing the generated artifact set
//!
//! Layout, both on disk and inside the zip:
//!
//! ```text
//! icons/<filename>.png
//! manifest.json
//! html-snippet.html
//! README.txt
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use crate::catalog::{self, Category};
use crate::descriptor::{generate_html_snippet, generate_manifest};
use crate::rendering::RasterResult;
use crate::{ManifestConfig, Result};

pub const ICONS_DIR: &str = "icons";
pub const MANIFEST_FILE: &str = "manifest.json";
pub const HTML_SNIPPET_FILE: &str = "html-snippet.html";
pub const README_FILE: &str = "README.txt";
pub const DEFAULT_ARCHIVE_NAME: &str = "pwa-icons.zip";

/// Installation notes shipped with every bundle.
pub fn readme() -> String {
    let list = |category: Category| {
        catalog::by_category(category)
            .map(|spec| spec.filename())
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "# PWA Icons Package

Icons and metadata files for a Progressive Web App.

## Contents:
- {icons}/ folder: all generated icon files
- {manifest}: web app manifest
- {snippet}: tags to paste into your HTML <head>

## Installation:
1. Copy the {icons} folder into your public directory
2. Place {manifest} in your public directory
3. Paste the contents of {snippet} into the <head> section of your HTML

## Icon Files:
- PWA Icons: {pwa}
- Favicons: {favicon}
- Apple Touch Icons: {apple}
",
        icons = ICONS_DIR,
        manifest = MANIFEST_FILE,
        snippet = HTML_SNIPPET_FILE,
        pwa = list(Category::Pwa),
        favicon = list(Category::Favicon),
        apple = list(Category::Apple),
    )
}

/// Every file of the bundle as (relative path, contents), icons first in
/// result order.
pub fn bundle_entries(
    results: &[RasterResult],
    config: &ManifestConfig,
) -> Vec<(String, Vec<u8>)> {
    let mut entries: Vec<(String, Vec<u8>)> = results
        .iter()
        .map(|r| (format!("{}/{}", ICONS_DIR, r.filename()), r.png_data.clone()))
        .collect();
    entries.push((MANIFEST_FILE.to_string(), generate_manifest(config).into_bytes()));
    entries.push((HTML_SNIPPET_FILE.to_string(), generate_html_snippet(config).into_bytes()));
    entries.push((README_FILE.to_string(), readme().into_bytes()));
    entries
}

/// Writes the bundle under `dir`, creating directories as needed. Returns the
/// paths written.
pub fn write_bundle(
    dir: &Path,
    results: &[RasterResult],
    config: &ManifestConfig,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir.join(ICONS_DIR))?;

    let mut written = Vec::new();
    for (name, data) in bundle_entries(results, config) {
        let path = dir.join(&name);
        fs::write(&path, data)?;
        written.push(path);
    }
    info!("wrote {} file(s) to {}", written.len(), dir.display());
    Ok(written)
}

/// Writes the bundle as a zip archive at `path`.
#[cfg(feature = "archive")]
pub fn write_zip(path: &Path, results: &[RasterResult], config: &ManifestConfig) -> Result<()> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    let file = fs::File::create(path)?;
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.add_directory(format!("{}/", ICONS_DIR), options)?;
    let entries = bundle_entries(results, config);
    let count = entries.len();
    for (name, data) in entries {
        zip.start_file(name, options)?;
        zip.write_all(&data)?;
    }
    zip.finish()?;

    info!("wrote {} file(s) to {}", count, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ICON_SIZES;

    fn fake_results() -> Vec<RasterResult> {
        ICON_SIZES
            .iter()
            .map(|&spec| RasterResult { spec, png_data: vec![spec.dimension as u8] })
            .collect()
    }

    #[test]
    fn readme_lists_every_icon() {
        let text = readme();
        for spec in ICON_SIZES.iter() {
            assert!(text.contains(&spec.filename()), "missing {}", spec.filename());
        }
    }

    #[test]
    fn entries_put_icons_under_icons_dir() {
        let entries = bundle_entries(&fake_results(), &ManifestConfig::default());
        assert_eq!(entries.len(), ICON_SIZES.len() + 3);
        assert_eq!(entries[0].0, "icons/icon-192.png");
        assert_eq!(entries[2].0, "icons/icon-192-maskable.png");
        let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
        assert!(names.contains(&MANIFEST_FILE));
        assert!(names.contains(&HTML_SNIPPET_FILE));
        assert!(names.contains(&README_FILE));
    }
}
