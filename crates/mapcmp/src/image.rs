//! `image::GrayImage` interop for categorical rasters.
//!
//! These wrappers expose the `mapcmp-core` transforms in terms of
//! `image::GrayImage`, treating each gray level as a category index.

use image::GrayImage;
use mapcmp_core::{
    distance_transform, exponential_decay, fuzzy_kappa_2009, FuzzyKappaResult, Metric, Raster,
    SimilarityMatrix,
};

/// Interpret an 8-bit grayscale image as a categorical raster, one
/// category per gray level.
pub fn raster_from_gray(img: &GrayImage) -> Raster<u8> {
    Raster::from_vec(
        img.height() as usize,
        img.width() as usize,
        img.as_raw().clone(),
    )
}

/// Render a comparison raster to grayscale.
///
/// The NoData sentinel (negative similarity) maps to 0; similarities in
/// `[0, 1]` map to `1..=255` so valid cells never collide with NoData.
pub fn gray_from_comparison(comparison: &Raster<f64>) -> GrayImage {
    let data = comparison
        .data
        .iter()
        .map(|&v| {
            if v < 0.0 {
                0u8
            } else {
                1 + (v.clamp(0.0, 1.0) * 254.0).round() as u8
            }
        })
        .collect();
    GrayImage::from_vec(comparison.cols as u32, comparison.rows as u32, data)
        .expect("comparison raster dimensions fit the image")
}

/// Render a distance raster to grayscale, scaled so the largest distance
/// maps to 255.
pub fn gray_from_distances(distances: &Raster<f64>) -> GrayImage {
    let max = distances.data.iter().cloned().fold(0.0f64, f64::max);
    let scale = if max > 0.0 { 255.0 / max } else { 0.0 };
    let data = distances
        .data
        .iter()
        .map(|&v| (v * scale).round() as u8)
        .collect();
    GrayImage::from_vec(distances.cols as u32, distances.rows as u32, data)
        .expect("distance raster dimensions fit the image")
}

/// Distance transform of an image-backed categorical map.
pub fn distance_transform_image(img: &GrayImage, target: u8, metric: Metric) -> Raster<f64> {
    let input = raster_from_gray(img);
    let mut out = Raster::filled_like(&input, 0.0f64);
    distance_transform(&input, &mut out, target, metric);
    out
}

/// Fuzzy Kappa between two image-backed maps with a full mask, the
/// identity similarity matrix and exponential decay.
///
/// Returns the statistic together with the per-cell comparison raster.
pub fn fuzzy_kappa_image(
    map_a: &GrayImage,
    map_b: &GrayImage,
    n_cats: usize,
    halving: f64,
) -> (FuzzyKappaResult, Raster<f64>) {
    let a = raster_from_gray(map_a);
    let b = raster_from_gray(map_b);
    let mask = Raster::filled_like(&a, 1u8);
    let similarity = SimilarityMatrix::identity(n_cats);
    let mut comparison = Raster::filled_like(&a, 0.0f64);
    let result = fuzzy_kappa_2009(
        &a,
        &b,
        &mask,
        n_cats,
        n_cats,
        &similarity,
        exponential_decay(halving),
        &mut comparison,
    );
    (result, comparison)
}
