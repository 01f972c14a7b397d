//! SVG rasterizer
//!
//! Each call parses the SVG, allocates a `dimension x dimension` pixmap,
//! fills it with the opaque background, stretches the drawing over the whole
//! surface and encodes the result as PNG. The pixmap is dropped on every
//! return path.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use log::debug;
use resvg::tiny_skia;
use resvg::usvg::{self, fontdb};

use crate::catalog::SizeSpec;
use crate::rendering::{RasterResult, Rgb};
use crate::{Error, RasterConfig, Result};

/// Largest edge length accepted for a surface.
pub const MAX_DIMENSION: u32 = 16384;

/// Renders SVG bytes to square PNGs.
///
/// Cheap to clone; clones share the font database. Holds no mutable state,
/// so one instance can serve any number of threads at once.
#[derive(Clone)]
pub struct Rasterizer {
    background: Rgb,
    fontdb: Arc<fontdb::Database>,
    resources_dir: Option<PathBuf>,
}

/// Installed families tried, in order, for each CSS generic family.
const SANS_SERIF_FAMILIES: &[&str] = &[
    "Arial",
    "Helvetica",
    "Liberation Sans",
    "DejaVu Sans",
    "Noto Sans",
    "Roboto",
    "Cantarell",
    "FreeSans",
];
const SERIF_FAMILIES: &[&str] = &[
    "Times New Roman",
    "Times",
    "Liberation Serif",
    "DejaVu Serif",
    "Noto Serif",
    "FreeSerif",
];
const MONOSPACE_FAMILIES: &[&str] = &[
    "Courier New",
    "Menlo",
    "Liberation Mono",
    "DejaVu Sans Mono",
    "Noto Sans Mono",
    "FreeMono",
];

static SYSTEM_FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();

/// The system font database, loaded on first use and shared afterwards.
fn system_fonts() -> Arc<fontdb::Database> {
    SYSTEM_FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            map_generic_families(&mut db);
            debug!("loaded {} system font faces", db.len());
            Arc::new(db)
        })
        .clone()
}

/// Points the CSS generic families at faces that are present in `db`.
///
/// fontdb's built-in mapping names fonts (Arial, Times New Roman) that many
/// systems lack, in which case `font-family="sans-serif"` draws nothing.
fn map_generic_families(db: &mut fontdb::Database) {
    let installed: Vec<(String, bool)> = db
        .faces()
        .flat_map(|face| {
            face.families
                .iter()
                .map(move |(name, _)| (name.clone(), face.monospaced))
        })
        .collect();
    let Some((any_family, _)) = installed.first().cloned() else {
        return;
    };

    let pick = |preferred: &[&str]| {
        preferred
            .iter()
            .find(|want| installed.iter().any(|(name, _)| name == *want))
            .map(|name| name.to_string())
    };

    let sans = pick(SANS_SERIF_FAMILIES).unwrap_or_else(|| any_family.clone());
    let serif = pick(SERIF_FAMILIES).unwrap_or_else(|| sans.clone());
    let mono = pick(MONOSPACE_FAMILIES)
        .or_else(|| {
            installed
                .iter()
                .find(|(_, monospaced)| *monospaced)
                .map(|(name, _)| name.clone())
        })
        .unwrap_or_else(|| sans.clone());
    debug!("generic families: sans-serif={}, serif={}, monospace={}", sans, serif, mono);

    db.set_serif_family(serif);
    db.set_monospace_family(mono);
    db.set_cursive_family(sans.clone());
    db.set_fantasy_family(sans.clone());
    db.set_sans_serif_family(sans);
}

impl Rasterizer {
    pub fn new(config: &RasterConfig) -> Self {
        let fontdb = if config.load_system_fonts {
            system_fonts()
        } else {
            Arc::new(fontdb::Database::new())
        };
        Self {
            background: config.background,
            fontdb,
            resources_dir: None,
        }
    }

    /// Number of font faces available to `<text>` elements.
    pub fn font_faces(&self) -> usize {
        self.fontdb.len()
    }

    /// Directory for resolving relative image references inside the SVG.
    pub fn with_resources_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.resources_dir = dir;
        self
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    fn options(&self) -> usvg::Options<'static> {
        let mut opt = usvg::Options::default();
        opt.resources_dir = self.resources_dir.clone();
        opt.fontdb = self.fontdb.clone();
        opt
    }

    /// Parses SVG bytes into a render tree.
    pub fn parse(&self, svg: &[u8]) -> Result<usvg::Tree> {
        usvg::Tree::from_data(svg, &self.options())
            .map_err(|e| Error::LoadError(format!("Failed to parse SVG: {}", e)))
    }

    /// Renders a parsed tree onto a fresh opaque surface.
    pub fn render_pixmap(
        &self,
        tree: &usvg::Tree,
        dimension: u32,
    ) -> Result<tiny_skia::Pixmap> {
        if dimension > MAX_DIMENSION {
            return Err(Error::RenderSurfaceError(format!(
                "{d}x{d} exceeds the {max}x{max} limit",
                d = dimension,
                max = MAX_DIMENSION
            )));
        }
        let mut pixmap = tiny_skia::Pixmap::new(dimension, dimension).ok_or_else(|| {
            Error::RenderSurfaceError(format!("Failed to allocate {d}x{d} surface", d = dimension))
        })?;

        let Rgb(r, g, b) = self.background;
        pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, 255));

        // Stretch to fill: x and y scale independently.
        let size = tree.size();
        let sx = dimension as f32 / size.width();
        let sy = dimension as f32 / size.height();
        resvg::render(tree, tiny_skia::Transform::from_scale(sx, sy), &mut pixmap.as_mut());

        Ok(pixmap)
    }

    /// Rasterizes SVG bytes to PNG bytes at `dimension x dimension`.
    pub fn rasterize_png(&self, svg: &[u8], dimension: u32) -> Result<Vec<u8>> {
        let tree = self.parse(svg)?;
        let pixmap = self.render_pixmap(&tree, dimension)?;
        let png = pixmap
            .encode_png()
            .map_err(|e| Error::RenderSurfaceError(format!("Failed to encode PNG: {}", e)))?;
        debug!("rasterized {d}x{d}: {} bytes", png.len(), d = dimension);
        Ok(png)
    }

    /// Rasterizes SVG bytes for one catalog entry.
    pub fn rasterize(&self, svg: &[u8], spec: SizeSpec) -> Result<RasterResult> {
        let png_data = self.rasterize_png(svg, spec.dimension)?;
        Ok(RasterResult { spec, png_data })
    }
}
