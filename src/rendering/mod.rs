//! Rendering: rasterized icon results and the SVG rasterizer

pub mod raster;

pub use raster::Rasterizer;

use std::fmt;
use std::str::FromStr;

use base64::Engine as Base64Engine;
use sha2::{Digest, Sha256};

use crate::catalog::{Category, Purpose, SizeSpec};

/// MIME type of every generated icon.
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// An opaque background colour. There is no alpha channel, so every pixel
/// painted with it is fully opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::WHITE
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = String;

    /// Parses `rrggbb` or `#rrggbb`.
    fn from_str(s: &str) -> Result<Rgb, String> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid colour {:?}: expected #rrggbb", s));
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// One generated icon: the catalog entry it was made for and its PNG bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterResult {
    pub spec: SizeSpec,
    pub png_data: Vec<u8>,
}

impl RasterResult {
    pub fn dimension(&self) -> u32 {
        self.spec.dimension
    }

    pub fn category(&self) -> Category {
        self.spec.category()
    }

    pub fn purpose(&self) -> Option<Purpose> {
        self.spec.purpose()
    }

    /// Conventional filename, e.g. `apple-touch-icon-180.png`.
    pub fn filename(&self) -> String {
        self.spec.filename()
    }

    /// The image as a `data:image/png;base64,...` URL.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            PNG_CONTENT_TYPE,
            base64::engine::general_purpose::STANDARD.encode(&self.png_data)
        )
    }

    /// Lowercase hex SHA-256 of the PNG bytes.
    pub fn sha256_hex(&self) -> String {
        hex::encode(Sha256::digest(&self.png_data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ICON_SIZES;

    #[test]
    fn rgb_parses_with_and_without_hash() {
        assert_eq!("#a855f7".parse::<Rgb>().unwrap(), Rgb(0xa8, 0x55, 0xf7));
        assert_eq!("FFFFFF".parse::<Rgb>().unwrap(), Rgb::WHITE);
        assert!("#fff".parse::<Rgb>().is_err());
        assert!("#gggggg".parse::<Rgb>().is_err());
        assert_eq!(Rgb(1, 2, 255).to_hex(), "#0102ff");
    }

    #[test]
    fn result_exposes_spec_fields() {
        let r = RasterResult { spec: ICON_SIZES[3], png_data: vec![1, 2, 3] };
        assert_eq!(r.dimension(), 512);
        assert_eq!(r.category(), Category::Pwa);
        assert_eq!(r.purpose(), Some(Purpose::Maskable));
        assert_eq!(r.filename(), "icon-512-maskable.png");
    }

    #[test]
    fn data_url_is_base64_png() {
        let r = RasterResult { spec: ICON_SIZES[4], png_data: b"abc".to_vec() };
        assert_eq!(r.to_data_url(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn digest_is_sha256_hex() {
        let r = RasterResult { spec: ICON_SIZES[4], png_data: b"abc".to_vec() };
        assert_eq!(
            r.sha256_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
