//! The fixed catalog of icon sizes to generate
//!
//! Every output is a square PNG. The catalog order is the default iteration
//! order for batch generation; results are always reassembled in this order.

use std::fmt;
use std::str::FromStr;

/// The family an icon belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Category {
    /// Progressive Web App icon referenced from the manifest.
    Pwa,
    /// Browser tab / bookmark icon.
    Favicon,
    /// iOS / iPadOS home screen icon.
    Apple,
}

impl Category {
    /// Lowercase name used on the command line and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Pwa => "pwa",
            Category::Favicon => "favicon",
            Category::Apple => "apple",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Category, String> {
        match s.to_ascii_lowercase().as_str() {
            "pwa" => Ok(Category::Pwa),
            "favicon" => Ok(Category::Favicon),
            "apple" => Ok(Category::Apple),
            other => Err(format!("unknown icon category: {}", other)),
        }
    }
}

/// The manifest `purpose` of a PWA icon.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Purpose {
    /// Standard icon, displayed as-is.
    Any,
    /// Adaptive icon with safe-zone padding that the platform may mask.
    Maskable,
}

impl Purpose {
    /// The value written to the manifest `purpose` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Purpose::Any => "any",
            Purpose::Maskable => "maskable",
        }
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category plus its optional sub-tag. Only PWA icons carry a purpose.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum IconKind {
    /// PWA icon with the given purpose.
    Pwa(Purpose),
    /// Favicon.
    Favicon,
    /// Apple touch icon.
    Apple,
}

/// One entry of the catalog: a square pixel dimension and what it is for.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SizeSpec {
    /// Width and height in pixels.
    pub dimension: u32,
    /// Category and purpose.
    pub kind: IconKind,
}

impl SizeSpec {
    /// Creates a size spec.
    pub const fn new(dimension: u32, kind: IconKind) -> SizeSpec {
        SizeSpec { dimension, kind }
    }

    /// Returns the category of this entry.
    pub fn category(self) -> Category {
        match self.kind {
            IconKind::Pwa(_) => Category::Pwa,
            IconKind::Favicon => Category::Favicon,
            IconKind::Apple => Category::Apple,
        }
    }

    /// Returns the purpose tag, present only for PWA icons.
    pub fn purpose(self) -> Option<Purpose> {
        match self.kind {
            IconKind::Pwa(purpose) => Some(purpose),
            _ => None,
        }
    }

    /// Returns the `sizes` attribute value, e.g. `"192x192"`.
    ///
    /// # Examples
    /// ```
    /// use pwaicons::{IconKind, SizeSpec};
    /// assert_eq!(SizeSpec::new(180, IconKind::Apple).sizes(), "180x180");
    /// ```
    pub fn sizes(self) -> String {
        format!("{d}x{d}", d = self.dimension)
    }

    /// Returns the conventional output filename for this entry.
    ///
    /// # Examples
    /// ```
    /// use pwaicons::{IconKind, Purpose, SizeSpec};
    /// assert_eq!(SizeSpec::new(192, IconKind::Pwa(Purpose::Any)).filename(), "icon-192.png");
    /// assert_eq!(SizeSpec::new(192, IconKind::Pwa(Purpose::Maskable)).filename(),
    ///            "icon-192-maskable.png");
    /// assert_eq!(SizeSpec::new(32, IconKind::Favicon).filename(), "favicon-32.png");
    /// assert_eq!(SizeSpec::new(167, IconKind::Apple).filename(), "apple-touch-icon-167.png");
    /// ```
    pub fn filename(self) -> String {
        let d = self.dimension;
        match self.kind {
            IconKind::Pwa(Purpose::Any) => format!("icon-{}.png", d),
            IconKind::Pwa(Purpose::Maskable) => format!("icon-{}-maskable.png", d),
            IconKind::Favicon => format!("favicon-{}.png", d),
            IconKind::Apple => format!("apple-touch-icon-{}.png", d),
        }
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.purpose() {
            Some(purpose) => write!(f, "{} {} ({})", self.category(), self.sizes(), purpose),
            None => write!(f, "{} {}", self.category(), self.sizes()),
        }
    }
}

/// Every icon generated from a source, in generation order.
pub const ICON_SIZES: [SizeSpec; 10] = [
    SizeSpec::new(192, IconKind::Pwa(Purpose::Any)),
    SizeSpec::new(512, IconKind::Pwa(Purpose::Any)),
    SizeSpec::new(192, IconKind::Pwa(Purpose::Maskable)),
    SizeSpec::new(512, IconKind::Pwa(Purpose::Maskable)),
    SizeSpec::new(16, IconKind::Favicon),
    SizeSpec::new(32, IconKind::Favicon),
    SizeSpec::new(48, IconKind::Favicon),
    SizeSpec::new(180, IconKind::Apple),
    SizeSpec::new(152, IconKind::Apple),
    SizeSpec::new(167, IconKind::Apple),
];

/// Returns the full catalog.
pub fn catalog() -> &'static [SizeSpec] {
    &ICON_SIZES
}

/// Exact-match lookup by dimension, category and purpose.
///
/// # Examples
/// ```
/// use pwaicons::catalog::{self, Category, Purpose};
/// let spec = catalog::find(512, Category::Pwa, Some(Purpose::Maskable)).unwrap();
/// assert_eq!(spec.filename(), "icon-512-maskable.png");
/// assert!(catalog::find(512, Category::Pwa, None).is_none());
/// assert!(catalog::find(64, Category::Favicon, None).is_none());
/// ```
pub fn find(dimension: u32, category: Category, purpose: Option<Purpose>) -> Option<SizeSpec> {
    ICON_SIZES
        .iter()
        .copied()
        .find(|s| s.dimension == dimension && s.category() == category && s.purpose() == purpose)
}

/// Catalog entries of one category, in catalog order.
pub fn by_category(category: Category) -> impl Iterator<Item = SizeSpec> {
    ICON_SIZES.iter().copied().filter(move |s| s.category() == category)
}
