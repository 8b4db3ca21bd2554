//! Fuzzy Kappa (2009): chance-corrected agreement between two categorical
//! maps, weighted by distance-decayed categorical similarity.
//!
//! Each map is first expanded into one decayed Euclidean distance field per
//! category. A cell's similarity to the other map is then the best
//! category-weighted decay value in its neighbourhood, and the global
//! statistic corrects the mean per-cell similarity by the similarity
//! expected when cells are drawn independently from the two maps.

use crate::distribution::{expected_minimum, Distribution};
use crate::transform::euclidean_distance_transform;
use crate::{assert_same_shape, Raster, SimilarityMatrix};

#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Value written to the comparison raster on masked-out cells.
pub const NODATA_SIMILARITY: f64 = -1.0;

/// Outcome of a Fuzzy Kappa comparison.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FuzzyKappaResult {
    /// Chance-corrected agreement; at most 1.
    pub fuzzy_kappa: f64,
    /// False for the degenerate cases: no cells to compare (kappa 0), or an
    /// expected similarity of exactly 1 (kappa 1).
    pub comparable: bool,
}

/// Fuzzy Kappa between two categorical maps.
///
/// `map_a` and `map_b` hold category indices below `n_cats_a` and
/// `n_cats_b` respectively; `mask` selects the cells to compare (nonzero =
/// valid). `similarity` weighs category pairs across the two legends and
/// `decay` converts cell distances into neighbourhood weights.
///
/// On return `comparison` holds the per-cell similarity for every valid
/// cell and [`NODATA_SIMILARITY`] elsewhere.
///
/// # Panics
///
/// Panics if raster dimensions differ, if the similarity matrix shape is
/// not `n_cats_a` x `n_cats_b`, if either legend exceeds 256 categories, or
/// if a valid cell holds an out-of-range category.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(map_a, map_b, mask, similarity, decay, comparison),
        fields(rows = map_a.rows, cols = map_a.cols)
    )
)]
#[allow(clippy::too_many_arguments)]
pub fn fuzzy_kappa_2009<F>(
    map_a: &Raster<u8>,
    map_b: &Raster<u8>,
    mask: &Raster<u8>,
    n_cats_a: usize,
    n_cats_b: usize,
    similarity: &SimilarityMatrix,
    decay: F,
    comparison: &mut Raster<f64>,
) -> FuzzyKappaResult
where
    F: Fn(f64) -> f64 + Sync,
{
    assert_same_shape(map_a, map_b);
    assert_same_shape(map_a, mask);
    assert_same_shape(map_a, comparison);
    assert_eq!(
        (similarity.cats_a(), similarity.cats_b()),
        (n_cats_a, n_cats_b),
        "similarity matrix shape does not match the category counts"
    );
    assert!(
        n_cats_a <= 256 && n_cats_b <= 256,
        "8-bit category maps carry at most 256 categories"
    );

    // Decayed nearest-neighbour distances for every category in both maps.
    let distances_a = decayed_distance_fields(map_a, n_cats_a, &decay);
    let distances_b = decayed_distance_fields(map_b, n_cats_b, &decay);

    // Best similarity of each map's neighbourhood to the other legend's
    // categories, refined cell by cell below.
    let mut sim_a: Vec<Raster<f64>> = (0..n_cats_b)
        .map(|_| Raster::filled_like(map_a, 0.0))
        .collect();
    let mut sim_b: Vec<Raster<f64>> = (0..n_cats_a)
        .map(|_| Raster::filled_like(map_a, 0.0))
        .collect();

    let mut distribution_a = vec![vec![Distribution::new(); n_cats_b]; n_cats_a];
    let mut distribution_b = vec![vec![Distribution::new(); n_cats_a]; n_cats_b];
    let mut cat_counts_a = vec![0u64; n_cats_a];
    let mut cat_counts_b = vec![0u64; n_cats_b];

    let mut mean = 0.0;
    let mut count = 0u64;

    for p in 0..map_a.len() {
        for a in 0..n_cats_a {
            let da = distances_a[a].data[p];
            for b in 0..n_cats_b {
                let w = similarity.get(a, b);
                let sim_ab = w * da;
                let sim_ba = w * distances_b[b].data[p];
                if sim_a[b].data[p] < sim_ab {
                    sim_a[b].data[p] = sim_ab;
                }
                if sim_b[a].data[p] < sim_ba {
                    sim_b[a].data[p] = sim_ba;
                }
            }
        }

        if mask.data[p] == 0 {
            comparison.data[p] = NODATA_SIMILARITY;
            continue;
        }

        let cat_a = usize::from(map_a.data[p]);
        let cat_b = usize::from(map_b.data[p]);
        assert!(
            cat_a < n_cats_a && cat_b < n_cats_b,
            "valid cell holds a category outside the declared legends"
        );
        cat_counts_a[cat_a] += 1;
        cat_counts_b[cat_b] += 1;

        let sim = sim_a[cat_b].data[p].min(sim_b[cat_a].data[p]);
        comparison.data[p] = sim;
        mean += sim;
        count += 1;

        for b in 0..n_cats_b {
            distribution_a[cat_a][b].insert(sim_a[b].data[p]);
        }
        for a in 0..n_cats_a {
            distribution_b[cat_b][a].insert(sim_b[a].data[p]);
        }
    }

    if count == 0 {
        return FuzzyKappaResult {
            fuzzy_kappa: 0.0,
            comparable: false,
        };
    }
    let mean = mean / count as f64;

    // Similarity expected when cells are drawn independently from the two
    // maps, category pair by category pair.
    let squared_total = (count as f64) * (count as f64);
    let mut expected = 0.0;
    for a in 0..n_cats_a {
        for b in 0..n_cats_b {
            if cat_counts_a[a] > 0 && cat_counts_b[b] > 0 {
                let p_cats = (cat_counts_a[a] as f64) * (cat_counts_b[b] as f64) / squared_total;
                let e_cats = expected_minimum(
                    &distribution_a[a][b],
                    &distribution_b[b][a],
                    cat_counts_a[a] as f64,
                    cat_counts_b[b] as f64,
                );
                expected += p_cats * e_cats;
            }
        }
    }

    if expected == 1.0 {
        return FuzzyKappaResult {
            fuzzy_kappa: 1.0,
            comparable: false,
        };
    }

    FuzzyKappaResult {
        fuzzy_kappa: (mean - expected) / (1.0 - expected),
        comparable: true,
    }
}

/// One decayed Euclidean distance field per category of `map`.
fn decayed_distance_fields<F>(map: &Raster<u8>, n_cats: usize, decay: &F) -> Vec<Raster<f64>>
where
    F: Fn(f64) -> f64 + Sync,
{
    let field = |cat: usize| {
        let mut out = Raster::filled_like(map, 0.0f64);
        euclidean_distance_transform(map, &mut out, cat as u8);
        for v in &mut out.data {
            *v = decay(*v);
        }
        out
    };

    #[cfg(feature = "rayon")]
    {
        return (0..n_cats).into_par_iter().map(field).collect();
    }
    #[cfg(not(feature = "rayon"))]
    {
        (0..n_cats).map(field).collect()
    }
}
