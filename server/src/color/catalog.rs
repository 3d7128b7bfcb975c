use std::path::Path;

use serde::Deserialize;

use crate::error::ColorError;

/// A named reference color, one row of the catalog table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColorEntry {
    #[serde(rename = "R")]
    pub r: u8,
    #[serde(rename = "G")]
    pub g: u8,
    #[serde(rename = "B")]
    pub b: u8,
    #[serde(rename = "Name")]
    pub name: String,
}

impl ColorEntry {
    pub fn rgb(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Squared Euclidean distance in RGB space
    fn distance_sq(&self, other: [u8; 3]) -> u32 {
        self.rgb()
            .iter()
            .zip(other)
            .map(|(&a, b)| {
                let d = a as i32 - b as i32;
                (d * d) as u32
            })
            .sum()
    }
}

/// Immutable table of named colors answering nearest-neighbor queries.
///
/// Never empty. When several entries are equally close to a query the one
/// listed first in the table wins.
#[derive(Debug, Clone)]
pub struct ReferenceCatalog {
    entries: Vec<ColorEntry>,
}

impl ReferenceCatalog {
    /// Load a CSV table with `R,G,B,Name` header columns. Extra columns are ignored.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ColorError> {
        let path = path.as_ref();
        let load_error = |source| ColorError::CatalogLoad {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(load_error)?;

        let entries = reader
            .deserialize::<ColorEntry>()
            .collect::<Result<Vec<_>, _>>()
            .map_err(load_error)?;

        let catalog = Self::from_entries(entries)?;
        tracing::info!("Loaded {} reference colors from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn from_entries(entries: Vec<ColorEntry>) -> Result<Self, ColorError> {
        if entries.is_empty() {
            return Err(ColorError::CatalogEmpty);
        }
        Ok(Self { entries })
    }

    /// Name of the entry closest to `rgb`
    pub fn lookup(&self, rgb: [u8; 3]) -> &str {
        let mut closest = &self.entries[0];
        let mut min_distance = u32::MAX;

        for entry in &self.entries {
            let distance = entry.distance_sq(rgb);
            if distance < min_distance {
                min_distance = distance;
                closest = entry;
            }
        }

        &closest.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;
    use crate::color::test_support::{entry, primaries};

    fn write_catalog(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("color-catalog-{}-{}.csv", name, std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn exact_matches_return_their_own_name() {
        let catalog = primaries();
        for entry in &catalog.entries {
            assert_eq!(catalog.lookup(entry.rgb()), entry.name);
        }
    }

    #[test]
    fn lookup_picks_nearest_entry() {
        let catalog = primaries();
        assert_eq!(catalog.lookup([250, 10, 10]), "Red");
        assert_eq!(catalog.lookup([30, 200, 40]), "Green");
        assert_eq!(catalog.lookup([10, 20, 140]), "Blue");
    }

    #[test]
    fn ties_go_to_the_first_entry() {
        let catalog = ReferenceCatalog::from_entries(vec![
            entry(0, 0, 0, "Black"),
            entry(0, 0, 0, "Ink"),
            entry(255, 255, 255, "White"),
        ])
        .unwrap();
        assert_eq!(catalog.lookup([0, 0, 0]), "Black");

        let catalog = ReferenceCatalog::from_entries(vec![
            entry(0, 0, 100, "Lower"),
            entry(0, 0, 200, "Upper"),
        ])
        .unwrap();
        assert_eq!(catalog.lookup([0, 0, 150]), "Lower");
    }

    #[test]
    fn loads_csv_with_extra_columns_in_any_order() {
        let path = write_catalog(
            "extra",
            "Name,Hex,R,G,B\nCrimson,#dc143c,220,20,60\n Snow , #fffafa , 255 , 250 , 250 \n",
        );
        let catalog = ReferenceCatalog::load(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries[1], entry(255, 250, 250, "Snow"));
        assert_eq!(catalog.lookup([200, 30, 50]), "Crimson");
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = ReferenceCatalog::load("/nonexistent/colors.csv").unwrap_err();
        assert!(matches!(err, ColorError::CatalogLoad { .. }));
    }

    #[test]
    fn missing_column_is_a_load_error() {
        let path = write_catalog("nocol", "R,G,Name\n1,2,Odd\n");
        let err = ReferenceCatalog::load(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, ColorError::CatalogLoad { .. }));
    }

    #[test]
    fn out_of_range_channel_is_a_load_error() {
        let path = write_catalog("range", "R,G,B,Name\n256,0,0,TooRed\n");
        let err = ReferenceCatalog::load(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, ColorError::CatalogLoad { .. }));
    }

    #[test]
    fn header_only_table_is_empty() {
        let path = write_catalog("empty", "R,G,B,Name\n");
        let err = ReferenceCatalog::load(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, ColorError::CatalogEmpty));
    }

    #[test]
    fn bundled_catalog_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../colors.csv");
        let catalog = ReferenceCatalog::load(path).unwrap();
        assert!(catalog.len() > 100);
        assert_eq!(catalog.lookup([255, 0, 0]), "red");
        assert_eq!(catalog.lookup([1, 1, 1]), "black");
    }
}
