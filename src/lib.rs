//! pwaicons
//!
//! Turns one SVG into the raster icon set a Progressive Web App needs (PWA
//! icons including maskable variants, favicons, Apple touch icons) and
//! produces the matching `manifest.json` and HTML `<head>` snippet.
//!
//! # Features
//!
//! - **remote** (default): load SVG sources from `http(s)` URLs
//! - **archive** (default): package the generated set as a zip file
//!
//! # Example
//!
//! ```no_run
//! use pwaicons::{catalog, RasterConfig, ManifestConfig, VectorSource};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = VectorSource::from_path("logo.svg");
//! let icons = pwaicons::generate_icons(&source, catalog::catalog(), &RasterConfig::default())?;
//! assert_eq!(icons.len(), 10);
//!
//! let manifest = pwaicons::generate_manifest(&ManifestConfig::default());
//! pwaicons::package::write_bundle("public".as_ref(), &icons, &ManifestConfig::default())?;
//! # let _ = manifest;
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

pub mod error;
pub use error::{Error, Result};

pub mod catalog;
pub use catalog::{Category, IconKind, Purpose, SizeSpec, ICON_SIZES};

pub mod source;
pub use source::VectorSource;

pub mod rendering;
pub use rendering::{RasterResult, Rasterizer, Rgb};

// Scoped-thread fan-out for synchronous callers
pub mod batch;

// Tokio-backed generator with bounded parallelism
pub mod async_api;
pub use async_api::IconGenerator;

pub mod descriptor;
pub use descriptor::{generate_html_snippet, generate_manifest};

// Writing the artifact set to disk (and zip with the `archive` feature)
pub mod package;

/// Rasterization settings
///
/// The defaults reproduce the reference output: a white background and one
/// worker per CPU.
///
/// # Examples
///
/// ```
/// let cfg = pwaicons::RasterConfig::default();
/// assert_eq!(cfg.background, pwaicons::Rgb::WHITE);
/// assert!(cfg.jobs >= 1);
/// ```
#[derive(Debug, Clone)]
pub struct RasterConfig {
    /// Colour painted under the vector content
    pub background: Rgb,
    /// Maximum number of rasterizations running at once
    pub jobs: usize,
    /// Load system fonts so `<text>` elements render
    pub load_system_fonts: bool,
    /// Reject remote responses whose `Content-Type` is not `image/svg+xml`
    pub check_content_type: bool,
    /// Timeout for fetching remote sources in milliseconds
    pub timeout_ms: u64,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            background: Rgb::WHITE,
            jobs: num_cpus::get().max(1),
            load_system_fonts: true,
            check_content_type: true,
            timeout_ms: 30000,
        }
    }
}

impl RasterConfig {
    /// Rejects settings no generator can run with.
    pub fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            return Err(Error::ConfigError("jobs must be at least 1".into()));
        }
        if self.timeout_ms == 0 {
            return Err(Error::ConfigError("timeout_ms must be greater than 0".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// App metadata written into the manifest and HTML snippet
///
/// The defaults are placeholders meant to be edited by the app author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestConfig {
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub start_url: String,
    /// Manifest display mode such as `standalone` or `fullscreen`
    pub display: String,
    pub background_color: String,
    /// Used for both the manifest and the `theme-color` meta tag
    pub theme_color: String,
    /// URL path the icons are served from
    pub icons_path: String,
    /// URL of the manifest referenced from the HTML snippet
    pub manifest_href: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            name: "Your App Name".to_string(),
            short_name: "App".to_string(),
            description: "Your app description".to_string(),
            start_url: "/".to_string(),
            display: "standalone".to_string(),
            background_color: "#ffffff".to_string(),
            theme_color: "#a855f7".to_string(),
            icons_path: "/icons".to_string(),
            manifest_href: "/manifest.json".to_string(),
        }
    }
}

/// Rasterizes one catalog entry from a source.
pub fn rasterize(
    source: &VectorSource,
    spec: SizeSpec,
    config: &RasterConfig,
) -> Result<RasterResult> {
    let svg = source.load_with(config.timeout(), config.check_content_type)?;
    Rasterizer::new(config)
        .with_resources_dir(source.resources_dir())
        .rasterize(&svg, spec)
}

/// Rasterizes every entry in `specs`, in parallel, returning results in the
/// same order. Fails as a whole if any entry fails.
pub fn generate_icons(
    source: &VectorSource,
    specs: &[SizeSpec],
    config: &RasterConfig,
) -> Result<Vec<RasterResult>> {
    config.validate()?;
    let outcomes = batch::rasterize_source_each(source, specs, config);
    batch::collect(specs, outcomes)
}
