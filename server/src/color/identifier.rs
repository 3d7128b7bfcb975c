use super::{
    to_hex, DominantColor, DominantColorExtractor, ExtractorSettings, ReferenceCatalog, RgbMatch,
};
use crate::error::ColorError;

/// Entry point for naming colors, shared read-only by all requests
#[derive(Debug, Clone)]
pub struct ColorIdentifier {
    catalog: ReferenceCatalog,
    extractor: DominantColorExtractor,
}

impl ColorIdentifier {
    pub fn new(catalog: ReferenceCatalog, settings: ExtractorSettings) -> Self {
        Self {
            catalog,
            extractor: DominantColorExtractor::new(settings),
        }
    }

    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }

    /// Name a single RGB value. Channels outside 0..=255 are rejected.
    pub fn identify_rgb(&self, r: i64, g: i64, b: i64) -> Result<RgbMatch, ColorError> {
        let rgb = [channel("r", r)?, channel("g", g)?, channel("b", b)?];

        Ok(RgbMatch {
            name: self.catalog.lookup(rgb).to_string(),
            hex: to_hex(rgb),
        })
    }

    /// Name the `n_colors` dominant colors of an encoded image.
    ///
    /// Clustering cost grows with `n_colors`; callers bound it themselves.
    pub fn identify_image(
        &self,
        image_bytes: &[u8],
        n_colors: usize,
    ) -> Result<Vec<DominantColor>, ColorError> {
        let colors = self.extractor.extract(&self.catalog, image_bytes, n_colors)?;
        tracing::debug!("Identified {} dominant colors", colors.len());
        Ok(colors)
    }
}

fn channel(name: &'static str, value: i64) -> Result<u8, ColorError> {
    u8::try_from(value).map_err(|_| ColorError::InvalidInput {
        channel: name,
        value,
    })
}
