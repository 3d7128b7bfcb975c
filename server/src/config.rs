use std::path::PathBuf;
use std::str::FromStr;

use crate::color::ExtractorSettings;

/// Server configuration, read from the environment at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    /// CSV table of reference colors
    pub catalog_path: PathBuf,
    /// Frontend assets served for non-API paths
    pub static_dir: PathBuf,
    pub extractor: ExtractorSettings,
    /// Dominant colors returned for an uploaded image unless the request overrides it
    pub upload_colors: usize,
    /// Dominant colors returned for a live camera frame
    pub live_colors: usize,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".into(),
            catalog_path: "colors.csv".into(),
            static_dir: "static".into(),
            extractor: ExtractorSettings::default(),
            upload_colors: 5,
            live_colors: 1,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let number = |key: &str, default| parse_or(&lookup, key, default);

        Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            catalog_path: lookup("COLOR_CATALOG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog_path),
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            extractor: ExtractorSettings {
                max_edge: parse_or(&lookup, "DOWNSAMPLE_MAX_EDGE", defaults.extractor.max_edge),
                runs: parse_or(&lookup, "KMEANS_RUNS", defaults.extractor.runs),
                seed: parse_or(&lookup, "KMEANS_SEED", defaults.extractor.seed),
            },
            upload_colors: number("UPLOAD_COLORS", defaults.upload_colors),
            live_colors: number("LIVE_COLORS", defaults.live_colors),
            max_upload_bytes: number("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring invalid {}={:?}, using default", key, raw);
            default
        }),
        None => default,
    }
}
