//! Core primitives for exact raster distance transforms and Fuzzy Kappa map
//! comparison.
//!
//! # Overview
//!
//! This crate exposes two main building blocks:
//!
//! - [`transform`] – exact two-pass distance transforms (Meijster's
//!   algorithm) on dense grids, for the squared and plain Euclidean,
//!   Manhattan, and Chessboard metrics.
//! - [`kappa`] – the Fuzzy Kappa (2009) statistic: chance-corrected
//!   agreement between two categorical maps, weighted by distance-decayed
//!   categorical similarity.
//!
//! Both operate on [`Raster`], a plain owned row-major grid. The supporting
//! pieces – per-metric scan primitives ([`metric`]), distance-decay presets
//! ([`decay`]) and empirical similarity distributions ([`distribution`]) –
//! are public so callers can assemble their own comparisons.
//!
//! # Features
//!
//! - `rayon` – parallelizes the per-category distance transforms inside the
//!   Fuzzy Kappa driver using the `rayon` crate. This does not change
//!   numerical results, only performance when legends are large.
//! - `tracing` – emits debug-level spans around the distance transform and
//!   the Fuzzy Kappa driver.

pub mod decay;
pub mod distribution;
pub mod kappa;
pub mod metric;
pub mod transform;

pub use crate::decay::{exponential_decay, one_neighbour};
pub use crate::distribution::{expected_minimum, Distribution};
pub use crate::kappa::{fuzzy_kappa_2009, FuzzyKappaResult, NODATA_SIMILARITY};
pub use crate::metric::Metric;
pub use crate::transform::{
    chessboard_distance_transform, distance_transform, euclidean_distance_transform,
    manhattan_distance_transform, squared_euclidean_distance_transform, DistanceCell,
};

/// Dense 2-D grid in row-major layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster<T> {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<T>,
}

impl<T: Copy> Raster<T> {
    /// Grid of the given shape with every cell set to `value`.
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Grid with the same shape as `model`, every cell set to `value`.
    pub fn filled_like<U>(model: &Raster<U>, value: T) -> Self {
        Self::filled(model.rows, model.cols, value)
    }

    /// Wrap an existing row-major buffer.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Self {
        assert_eq!(data.len(), rows * cols, "raster buffer length mismatch");
        Self { rows, cols, data }
    }

    /// Cell value at `(row, col)`.
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> T {
        self.data[row * self.cols + col]
    }

    /// Overwrite the cell at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.data[row * self.cols + col] = value;
    }

    /// One row as a slice.
    #[inline]
    pub fn row(&self, row: usize) -> &[T] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Set every cell to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

/// Categorical similarity between the legends of two maps.
///
/// Entry `(a, b)` gives the closeness of category `a` of the first legend
/// to category `b` of the second, usually in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct SimilarityMatrix {
    cats_a: usize,
    cats_b: usize,
    data: Vec<f64>,
}

impl SimilarityMatrix {
    /// All-zero matrix for legends of `cats_a` and `cats_b` categories.
    pub fn zeros(cats_a: usize, cats_b: usize) -> Self {
        Self {
            cats_a,
            cats_b,
            data: vec![0.0; cats_a * cats_b],
        }
    }

    /// Square matrix with 1 on the diagonal: categories only match
    /// themselves.
    pub fn identity(cats: usize) -> Self {
        let mut m = Self::zeros(cats, cats);
        for c in 0..cats {
            m.set(c, c, 1.0);
        }
        m
    }

    /// Build from per-category rows.
    ///
    /// # Panics
    ///
    /// Panics if the rows are ragged.
    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        let cats_a = rows.len();
        let cats_b = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(cats_a * cats_b);
        for row in rows {
            assert_eq!(row.len(), cats_b, "similarity matrix rows are ragged");
            data.extend_from_slice(row);
        }
        Self {
            cats_a,
            cats_b,
            data,
        }
    }

    #[inline]
    pub fn get(&self, cat_a: usize, cat_b: usize) -> f64 {
        self.data[cat_a * self.cats_b + cat_b]
    }

    #[inline]
    pub fn set(&mut self, cat_a: usize, cat_b: usize, value: f64) {
        self.data[cat_a * self.cats_b + cat_b] = value;
    }

    /// Number of categories in the first legend.
    #[inline]
    pub fn cats_a(&self) -> usize {
        self.cats_a
    }

    /// Number of categories in the second legend.
    #[inline]
    pub fn cats_b(&self) -> usize {
        self.cats_b
    }
}

/// Panic unless two rasters have identical dimensions.
pub fn assert_same_shape<A, B>(a: &Raster<A>, b: &Raster<B>) {
    assert_eq!(a.rows, b.rows, "raster row count does not match");
    assert_eq!(a.cols, b.cols, "raster column count does not match");
}
