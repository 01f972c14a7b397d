//! Web app manifest and HTML snippet generation
//!
//! Both documents are pure functions of the catalog and a `ManifestConfig`:
//! the same inputs always produce byte-identical text.

use log::error;
use serde::Serialize;

use crate::catalog::{self, Category, SizeSpec};
use crate::rendering::PNG_CONTENT_TYPE;
use crate::ManifestConfig;

/// Favicon sizes linked from the HTML snippet, in output order.
pub const HTML_FAVICON_SIZES: [u32; 2] = [32, 16];

#[derive(Serialize)]
struct WebManifest<'a> {
    name: &'a str,
    short_name: &'a str,
    description: &'a str,
    start_url: &'a str,
    display: &'a str,
    background_color: &'a str,
    theme_color: &'a str,
    icons: Vec<ManifestIcon>,
}

#[derive(Serialize)]
struct ManifestIcon {
    src: String,
    sizes: String,
    #[serde(rename = "type")]
    content_type: &'static str,
    purpose: &'static str,
}

/// URL of a generated icon under `config.icons_path`.
pub fn icon_href(config: &ManifestConfig, spec: SizeSpec) -> String {
    format!("{}/{}", config.icons_path.trim_end_matches('/'), spec.filename())
}

/// Renders `manifest.json`: app metadata plus one entry per PWA icon, as
/// two-space indented JSON with keys in a fixed order.
pub fn generate_manifest(config: &ManifestConfig) -> String {
    let icons = catalog::by_category(Category::Pwa)
        .filter_map(|spec| {
            spec.purpose().map(|purpose| ManifestIcon {
                src: icon_href(config, spec),
                sizes: spec.sizes(),
                content_type: PNG_CONTENT_TYPE,
                purpose: purpose.as_str(),
            })
        })
        .collect();

    let manifest = WebManifest {
        name: &config.name,
        short_name: &config.short_name,
        description: &config.description,
        start_url: &config.start_url,
        display: &config.display,
        background_color: &config.background_color,
        theme_color: &config.theme_color,
        icons,
    };

    serde_json::to_string_pretty(&manifest).unwrap_or_else(|e| {
        error!("manifest serialization failed: {}", e);
        String::from("{}")
    })
}

/// Renders the `<head>` snippet: favicon links, Apple touch icon links, the
/// manifest link and the theme-color meta tag.
pub fn generate_html_snippet(config: &ManifestConfig) -> String {
    let mut lines = vec!["<!-- Favicon -->".to_string()];
    for spec in HTML_FAVICON_SIZES
        .iter()
        .filter_map(|&d| catalog::find(d, Category::Favicon, None))
    {
        lines.push(format!(
            r#"<link rel="icon" type="{}" sizes="{}" href="{}">"#,
            PNG_CONTENT_TYPE,
            spec.sizes(),
            escape_attr(&icon_href(config, spec))
        ));
    }

    lines.push(String::new());
    lines.push("<!-- Apple Touch Icons -->".to_string());
    for spec in catalog::by_category(Category::Apple) {
        lines.push(format!(
            r#"<link rel="apple-touch-icon" sizes="{}" href="{}">"#,
            spec.sizes(),
            escape_attr(&icon_href(config, spec))
        ));
    }

    lines.push(String::new());
    lines.push("<!-- PWA Manifest -->".to_string());
    lines.push(format!(
        r#"<link rel="manifest" href="{}">"#,
        escape_attr(&config.manifest_href)
    ));
    lines.push(format!(
        r#"<meta name="theme-color" content="{}">"#,
        escape_attr(&config.theme_color)
    ));

    lines.join("\n")
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
