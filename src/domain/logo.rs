//! Brand logo URL generation.
//!
//! Logos are produced by an external service; this module only knows how
//! to build the URL. [`LogoGenerator`] is the seam, [`TemplateLogoGenerator`]
//! the default implementation.

use std::fmt;

use super::slug::slugify;

/// Image format requested from the logo service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoFormat {
    /// PNG raster.
    Png,
    /// SVG vector.
    Svg,
    /// WebP raster.
    Webp,
}

impl fmt::Display for LogoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Png => write!(f, "png"),
            Self::Svg => write!(f, "svg"),
            Self::Webp => write!(f, "webp"),
        }
    }
}

/// Rendering options passed with every logo request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoOptions {
    /// Output format.
    pub format: LogoFormat,
    /// Edge length in pixels.
    pub size: u32,
}

impl Default for LogoOptions {
    fn default() -> Self {
        Self {
            format: LogoFormat::Png,
            size: 64,
        }
    }
}

/// Produces a logo URL for a brand name. Must be pure.
pub trait LogoGenerator: Send + Sync + fmt::Debug {
    /// Returns the logo URL for `brand_name`.
    fn logo_url(&self, brand_name: &str, options: LogoOptions) -> String;
}

/// Renders `{base}/{slug}.{format}?size={size}`.
#[derive(Debug, Clone)]
pub struct TemplateLogoGenerator {
    base_url: String,
}

impl TemplateLogoGenerator {
    /// Creates a generator rooted at `base_url`. A trailing slash is ignored.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }
}

impl LogoGenerator for TemplateLogoGenerator {
    fn logo_url(&self, brand_name: &str, options: LogoOptions) -> String {
        format!(
            "{}/{}.{}?size={}",
            self.base_url,
            slugify(brand_name),
            options.format,
            options.size
        )
    }
}
