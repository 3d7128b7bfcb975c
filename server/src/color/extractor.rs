use std::collections::HashSet;

use image::DynamicImage;
use kmeans_colors::get_kmeans;
use palette::Srgb;

use super::{to_hex, DominantColor, ReferenceCatalog};
use crate::error::ColorError;

/// Cluster labels are stored as u8 by the k-means engine
const MAX_CLUSTERS: usize = u8::MAX as usize;
const MAX_ITERATIONS: usize = 300;
/// Convergence threshold on centroid movement, in normalized [0, 1] RGB units
const CONVERGENCE: f32 = 1e-6;

/// Tunables for dominant color extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractorSettings {
    /// Images are shrunk so that their longer edge is at most this many pixels
    pub max_edge: u32,
    /// Number of randomly initialized k-means runs, the one with the lowest
    /// within-cluster sum of squares wins
    pub runs: u32,
    /// Run `i` is seeded with `seed + i`
    pub seed: u64,
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            max_edge: 200,
            runs: 10,
            seed: 42,
        }
    }
}

/// Reduces an image to a handful of named representative colors.
///
/// Output is reproducible for a given input and seed, but is not expected to
/// match other k-means implementations bit for bit.
#[derive(Debug, Clone)]
pub struct DominantColorExtractor {
    settings: ExtractorSettings,
}

impl DominantColorExtractor {
    pub fn new(settings: ExtractorSettings) -> Self {
        Self {
            settings: ExtractorSettings {
                max_edge: settings.max_edge.max(1),
                runs: settings.runs.max(1),
                ..settings
            },
        }
    }

    /// Find the `n_colors` dominant colors of an encoded image, in cluster label order
    pub fn extract(
        &self,
        catalog: &ReferenceCatalog,
        image_bytes: &[u8],
        n_colors: usize,
    ) -> Result<Vec<DominantColor>, ColorError> {
        let image = image::load_from_memory(image_bytes)?;
        let pixels = self.sample_pixels(image);

        let distinct = pixels.iter().collect::<HashSet<_>>().len();
        let limit = distinct.min(MAX_CLUSTERS);
        if n_colors < 1 || n_colors > limit {
            return Err(ColorError::InvalidColorCount {
                requested: n_colors,
                limit,
            });
        }

        let samples: Vec<Srgb> = pixels
            .iter()
            .map(|&[r, g, b]| Srgb::new(r, g, b).into_format())
            .collect();

        let clusters = self.cluster(&samples, n_colors);
        tracing::debug!(
            "Clustered {} pixels into {} colors (wcss {:.6}, {} empty)",
            samples.len(),
            n_colors,
            clusters.wcss,
            clusters.empty_clusters
        );

        Ok(clusters
            .centroids
            .iter()
            .map(|centroid| {
                let rgb = [
                    to_channel(centroid.red),
                    to_channel(centroid.green),
                    to_channel(centroid.blue),
                ];
                DominantColor {
                    name: catalog.lookup(rgb).to_string(),
                    hex: to_hex(rgb),
                    rgb,
                }
            })
            .collect())
    }

    /// Downsample and flatten to 8-bit RGB triples
    fn sample_pixels(&self, image: DynamicImage) -> Vec<[u8; 3]> {
        let max_edge = self.settings.max_edge;
        let image = if image.width() > max_edge || image.height() > max_edge {
            image.thumbnail(max_edge, max_edge)
        } else {
            image
        };

        image.to_rgb8().pixels().map(|pixel| pixel.0).collect()
    }

    /// Best of several seeded k-means runs.
    ///
    /// Runs are ranked by within-cluster sum of squares over the final
    /// assignment. A run left with a cluster that owns no sample ranks below
    /// every run without one. Ties keep the earliest run.
    fn cluster(&self, samples: &[Srgb], k: usize) -> Clustering {
        let seed = self.settings.seed;
        let mut best = Clustering::from_centroids(samples, run_kmeans(samples, k, seed));

        for run in 1..self.settings.runs {
            let candidate =
                Clustering::from_centroids(samples, run_kmeans(samples, k, seed.wrapping_add(run as u64)));
            if candidate.rank() < best.rank() {
                best = candidate;
            }
        }

        best
    }
}

/// Final centroids of one seeded run. The engine's own score is the last
/// centroid shift, not a quality measure, so it is not used.
fn run_kmeans(samples: &[Srgb], k: usize, seed: u64) -> Vec<Srgb> {
    get_kmeans(k, MAX_ITERATIONS, CONVERGENCE, false, samples, seed).centroids
}

/// Outcome of one k-means run, scored against the samples it clustered
#[derive(Debug, Clone)]
struct Clustering {
    centroids: Vec<Srgb>,
    wcss: f64,
    empty_clusters: usize,
}

impl Clustering {
    /// Reassign every sample to its nearest final centroid and sum the squared distances
    fn from_centroids(samples: &[Srgb], centroids: Vec<Srgb>) -> Self {
        let mut members = vec![0usize; centroids.len()];
        let mut wcss = 0.0;

        for sample in samples {
            let (nearest, distance) = centroids
                .iter()
                .map(|centroid| distance_sq(sample, centroid))
                .enumerate()
                .fold((0, f64::INFINITY), |closest, (i, d)| if d < closest.1 { (i, d) } else { closest });
            members[nearest] += 1;
            wcss += distance;
        }

        Self {
            empty_clusters: members.iter().filter(|&&n| n == 0).count(),
            centroids,
            wcss,
        }
    }

    fn rank(&self) -> (usize, f64) {
        (self.empty_clusters, self.wcss)
    }
}

fn distance_sq(a: &Srgb, b: &Srgb) -> f64 {
    let dr = (a.red - b.red) as f64;
    let dg = (a.green - b.green) as f64;
    let db = (a.blue - b.blue) as f64;
    dr * dr + dg * dg + db * db
}

fn to_channel(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}
