//! Shared application-level helpers for the CLI and examples.
//!
//! These functions wire up I/O (load category maps, optional mask map,
//! JSON/PNG output) around the `mapcmp-core` comparison APIs so the CLI
//! and examples can share the same behavior.

use crate::image::{
    distance_transform_image, gray_from_comparison, gray_from_distances, raster_from_gray,
};
use anyhow::{Context, Result};
use image::ImageReader;
use mapcmp_core::{
    exponential_decay, fuzzy_kappa_2009, one_neighbour, FuzzyKappaResult, Metric, Raster,
    SimilarityMatrix,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{fs::File, io::Write, path::Path, path::PathBuf, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Euclidean,
    Squared,
    Manhattan,
    Chessboard,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Euclidean,
        MetricKind::Squared,
        MetricKind::Manhattan,
        MetricKind::Chessboard,
    ];

    pub fn metric(self) -> Metric {
        match self {
            MetricKind::Euclidean => Metric::Euclidean,
            MetricKind::Squared => Metric::EuclideanSquared,
            MetricKind::Manhattan => Metric::Manhattan,
            MetricKind::Chessboard => Metric::Chessboard,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MetricKind::Euclidean => "euclidean",
            MetricKind::Squared => "squared",
            MetricKind::Manhattan => "manhattan",
            MetricKind::Chessboard => "chessboard",
        }
    }
}

impl FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euclidean" => Ok(MetricKind::Euclidean),
            "squared" => Ok(MetricKind::Squared),
            "manhattan" => Ok(MetricKind::Manhattan),
            "chessboard" => Ok(MetricKind::Chessboard),
            other => Err(format!(
                "invalid metric '{other}', expected euclidean|squared|manhattan|chessboard"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecayKind {
    Exponential,
    Neighbour,
}

/// Configuration for a Fuzzy Kappa comparison run.
///
/// Both maps are 8-bit grayscale images whose gray levels are category
/// indices. All optional fields have working defaults: a full mask, a
/// category count inferred from the data, the identity similarity matrix
/// and exponential decay with a halving distance of 2 cells.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CompareConfig {
    pub map_a: PathBuf,
    pub map_b: PathBuf,
    pub mask: Option<PathBuf>,
    pub categories: Option<u16>,
    pub similarity: Option<Vec<Vec<f64>>>,
    pub decay: Option<DecayKind>,
    pub halving: Option<f64>,
    pub neighbour_value: Option<f64>,
    pub output_json: Option<PathBuf>,
    pub output_png: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Serialize)]
pub struct CompareDump {
    pub map_a: String,
    pub map_b: String,
    pub rows: usize,
    pub cols: usize,
    pub categories: usize,
    pub valid_cells: usize,
    pub fuzzy_kappa: f64,
    pub comparable: bool,
}

/// Run a comparison and write its JSON summary and PNG similarity map.
///
/// Outputs default to the first map's path with `kappa.json` / `kappa.png`
/// extensions.
pub fn run_compare(cfg: CompareConfig) -> Result<FuzzyKappaResult> {
    let img_a = ImageReader::open(&cfg.map_a)
        .with_context(|| format!("opening map {}", cfg.map_a.display()))?
        .decode()?
        .to_luma8();
    let img_b = ImageReader::open(&cfg.map_b)
        .with_context(|| format!("opening map {}", cfg.map_b.display()))?
        .decode()?
        .to_luma8();
    let map_a = raster_from_gray(&img_a);
    let map_b = raster_from_gray(&img_b);
    anyhow::ensure!(
        (map_a.rows, map_a.cols) == (map_b.rows, map_b.cols),
        "maps disagree on size: {}x{} vs {}x{}",
        map_a.rows,
        map_a.cols,
        map_b.rows,
        map_b.cols
    );

    let mask = match &cfg.mask {
        Some(path) => {
            let img = ImageReader::open(path)
                .with_context(|| format!("opening mask {}", path.display()))?
                .decode()?
                .to_luma8();
            let mask = raster_from_gray(&img);
            anyhow::ensure!(
                (mask.rows, mask.cols) == (map_a.rows, map_a.cols),
                "mask size does not match the maps"
            );
            mask
        }
        None => Raster::filled_like(&map_a, 1u8),
    };

    let categories = match cfg.categories {
        Some(n) => {
            anyhow::ensure!(n >= 1, "categories must be >= 1");
            n as usize
        }
        None => infer_categories(&map_a, &map_b),
    };

    let similarity = match &cfg.similarity {
        Some(rows) => {
            anyhow::ensure!(
                rows.len() == categories && rows.iter().all(|r| r.len() == categories),
                "similarity matrix must be {categories}x{categories}"
            );
            SimilarityMatrix::from_rows(rows)
        }
        None => SimilarityMatrix::identity(categories),
    };

    let decay: Box<dyn Fn(f64) -> f64 + Sync> = match cfg.decay.unwrap_or(DecayKind::Exponential) {
        DecayKind::Exponential => {
            let halving = cfg.halving.unwrap_or(2.0);
            anyhow::ensure!(halving > 0.0, "halving distance must be > 0");
            Box::new(exponential_decay(halving))
        }
        DecayKind::Neighbour => Box::new(one_neighbour(cfg.neighbour_value.unwrap_or(0.5))),
    };

    let mut comparison = Raster::filled_like(&map_a, 0.0f64);
    let result = fuzzy_kappa_2009(
        &map_a,
        &map_b,
        &mask,
        categories,
        categories,
        &similarity,
        decay,
        &mut comparison,
    );

    let dump = CompareDump {
        map_a: cfg.map_a.to_string_lossy().into_owned(),
        map_b: cfg.map_b.to_string_lossy().into_owned(),
        rows: map_a.rows,
        cols: map_a.cols,
        categories,
        valid_cells: comparison.data.iter().filter(|&&v| v >= 0.0).count(),
        fuzzy_kappa: result.fuzzy_kappa,
        comparable: result.comparable,
    };
    let json_out = cfg
        .output_json
        .unwrap_or_else(|| cfg.map_a.with_extension("kappa.json"));
    write_json(&json_out, &dump)?;

    let png_out = cfg
        .output_png
        .unwrap_or_else(|| cfg.map_a.with_extension("kappa.png"));
    gray_from_comparison(&comparison)
        .save(&png_out)
        .with_context(|| format!("writing {}", png_out.display()))?;

    Ok(result)
}

/// Configuration for one or more distance-transform runs over a single
/// category map.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DistanceConfig {
    pub image: PathBuf,
    pub target: u8,
    /// Metrics to compute; all four when absent.
    pub metrics: Option<Vec<MetricKind>>,
    pub output_json: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Serialize)]
pub struct DistanceSummary {
    pub metric: String,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub png: String,
}

#[derive(Serialize)]
pub struct DistanceDump {
    pub image: String,
    pub rows: usize,
    pub cols: usize,
    pub target: u8,
    pub results: Vec<DistanceSummary>,
}

/// Run the configured distance transforms, writing one scaled PNG per
/// metric plus a JSON summary.
pub fn run_distance(cfg: DistanceConfig) -> Result<()> {
    let img = ImageReader::open(&cfg.image)
        .with_context(|| format!("opening map {}", cfg.image.display()))?
        .decode()?
        .to_luma8();

    let metrics = cfg.metrics.unwrap_or_else(|| MetricKind::ALL.to_vec());
    let mut results = Vec::with_capacity(metrics.len());
    for kind in metrics {
        let distances = distance_transform_image(&img, cfg.target, kind.metric());
        let png_out = cfg.image.with_extension(format!("{}.png", kind.name()));
        gray_from_distances(&distances)
            .save(&png_out)
            .with_context(|| format!("writing {}", png_out.display()))?;

        let min = distances.data.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = distances.data.iter().cloned().fold(0.0f64, f64::max);
        let mean = distances.data.iter().sum::<f64>() / distances.len().max(1) as f64;
        results.push(DistanceSummary {
            metric: kind.name().to_string(),
            min,
            max,
            mean,
            png: png_out.to_string_lossy().into_owned(),
        });
    }

    let dump = DistanceDump {
        image: cfg.image.to_string_lossy().into_owned(),
        rows: img.height() as usize,
        cols: img.width() as usize,
        target: cfg.target,
        results,
    };
    let json_out = cfg
        .output_json
        .unwrap_or_else(|| cfg.image.with_extension("distance.json"));
    write_json(&json_out, &dump)?;

    Ok(())
}

/// Smallest legend covering every category present in either map.
fn infer_categories(map_a: &Raster<u8>, map_b: &Raster<u8>) -> usize {
    map_a
        .data
        .iter()
        .chain(&map_b.data)
        .copied()
        .max()
        .map_or(0, |m| usize::from(m) + 1)
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let mut json_file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(&mut json_file, value)?;
    json_file.write_all(b"\n")?;
    Ok(())
}

/// Load a JSON config file.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let file = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
    let cfg = serde_json::from_reader(file)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_kind_parses_case_insensitively() {
        assert_eq!("Chessboard".parse::<MetricKind>(), Ok(MetricKind::Chessboard));
        assert_eq!("euclidean".parse::<MetricKind>(), Ok(MetricKind::Euclidean));
        assert!("l2".parse::<MetricKind>().is_err());
    }

    #[test]
    fn categories_are_inferred_from_both_maps() {
        let a = Raster::from_vec(1, 3, vec![0u8, 1, 0]);
        let b = Raster::from_vec(1, 3, vec![0u8, 0, 3]);
        assert_eq!(infer_categories(&a, &b), 4);
    }

    #[test]
    fn compare_config_accepts_minimal_json() {
        let cfg: CompareConfig =
            serde_json::from_str(r#"{"map_a": "a.png", "map_b": "b.png"}"#).unwrap();
        assert!(cfg.mask.is_none());
        assert!(cfg.categories.is_none());
        assert!(cfg.similarity.is_none());
    }
}
