//! Exact two-pass distance transforms on dense rasters.
//!
//! Stage 1 scans every column top-to-bottom and back, leaving in each cell
//! the vertical distance to the nearest target cell in its own column.
//! Stage 2 (Meijster's second scan) then reduces each row with a monotone
//! stack of dominating columns, turning the vertical distances into true
//! 2-D distances under the chosen metric in O(cols) per row.

use crate::metric::{
    ChessboardOps, EuclideanOps, ManhattanOps, Metric, MetricOps, SquaredEuclideanOps,
};
use crate::{assert_same_shape, Raster};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Cell types a distance transform can write into.
///
/// Stage 1 stores small integer counts through `from_i64`/`add_one`;
/// `from_f64` carries the optional final square root. Integer outputs
/// truncate that square root, so pair the plain Euclidean metric with a
/// float output type.
pub trait DistanceCell: Copy + PartialOrd {
    fn from_i64(v: i64) -> Self;
    fn from_f64(v: f64) -> Self;
    fn to_f64(self) -> f64;
    fn add_one(self) -> Self;
}

impl DistanceCell for i32 {
    #[inline]
    fn from_i64(v: i64) -> Self {
        v as i32
    }
    #[inline]
    fn from_f64(v: f64) -> Self {
        v as i32
    }
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
    #[inline]
    fn add_one(self) -> Self {
        self + 1
    }
}

impl DistanceCell for i64 {
    #[inline]
    fn from_i64(v: i64) -> Self {
        v
    }
    #[inline]
    fn from_f64(v: f64) -> Self {
        v as i64
    }
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
    #[inline]
    fn add_one(self) -> Self {
        self + 1
    }
}

impl DistanceCell for f32 {
    #[inline]
    fn from_i64(v: i64) -> Self {
        v as f32
    }
    #[inline]
    fn from_f64(v: f64) -> Self {
        v as f32
    }
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
    #[inline]
    fn add_one(self) -> Self {
        self + 1.0
    }
}

impl DistanceCell for f64 {
    #[inline]
    fn from_i64(v: i64) -> Self {
        v as f64
    }
    #[inline]
    fn from_f64(v: f64) -> Self {
        v
    }
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
    #[inline]
    fn add_one(self) -> Self {
        self + 1.0
    }
}

/// Exact distance transform of `input` with respect to `target`.
///
/// `output[r, c]` becomes the distance from `(r, c)` to the nearest cell of
/// `input` holding `target` under `metric`; 0 on target cells themselves.
/// When no target cell exists every distance saturates at `rows + cols`,
/// the transform's stand-in for infinity (squared at emission for the
/// squared Euclidean metric).
///
/// The metric tag is resolved once here; the scans below are monomorphized
/// per metric and output type.
///
/// # Panics
///
/// Panics if `input` and `output` dimensions differ.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "debug",
        skip(input, output, target),
        fields(rows = input.rows, cols = input.cols)
    )
)]
pub fn distance_transform<T, V>(
    input: &Raster<T>,
    output: &mut Raster<V>,
    target: T,
    metric: Metric,
) where
    T: Copy + PartialEq,
    V: DistanceCell,
{
    assert_same_shape(input, output);
    match metric {
        Metric::EuclideanSquared => scan::<T, V, SquaredEuclideanOps>(input, output, target),
        Metric::Euclidean => scan::<T, V, EuclideanOps>(input, output, target),
        Metric::Manhattan => scan::<T, V, ManhattanOps>(input, output, target),
        Metric::Chessboard => scan::<T, V, ChessboardOps>(input, output, target),
    }
}

/// Euclidean distance transform (square root applied).
pub fn euclidean_distance_transform<T, V>(input: &Raster<T>, output: &mut Raster<V>, target: T)
where
    T: Copy + PartialEq,
    V: DistanceCell,
{
    distance_transform(input, output, target, Metric::Euclidean);
}

/// Squared Euclidean distance transform; integer-valued.
pub fn squared_euclidean_distance_transform<T, V>(
    input: &Raster<T>,
    output: &mut Raster<V>,
    target: T,
) where
    T: Copy + PartialEq,
    V: DistanceCell,
{
    distance_transform(input, output, target, Metric::EuclideanSquared);
}

/// City-block (L1) distance transform.
pub fn manhattan_distance_transform<T, V>(input: &Raster<T>, output: &mut Raster<V>, target: T)
where
    T: Copy + PartialEq,
    V: DistanceCell,
{
    distance_transform(input, output, target, Metric::Manhattan);
}

/// Chessboard (L-infinity) distance transform.
pub fn chessboard_distance_transform<T, V>(input: &Raster<T>, output: &mut Raster<V>, target: T)
where
    T: Copy + PartialEq,
    V: DistanceCell,
{
    distance_transform(input, output, target, Metric::Chessboard);
}

fn scan<T, V, M>(input: &Raster<T>, output: &mut Raster<V>, target: T)
where
    T: Copy + PartialEq,
    V: DistanceCell,
    M: MetricOps,
{
    let rows = input.rows;
    let cols = input.cols;
    if rows == 0 || cols == 0 {
        return;
    }

    let inf = (rows + cols) as i64;
    let far = V::from_i64(inf);
    let zero = V::from_i64(0);

    // Stage 1, downward: vertical distance to the nearest target above.
    for c in 0..cols {
        output.data[c] = if input.data[c] == target { zero } else { far };
    }
    for r in 1..rows {
        let base = r * cols;
        for c in 0..cols {
            let v = if input.data[base + c] == target {
                zero
            } else {
                let up = output.data[base - cols + c];
                if up == far {
                    far
                } else {
                    up.add_one()
                }
            };
            output.data[base + c] = v;
        }
    }

    // Stage 1, upward sweep fused with Stage 2: once a row's vertical
    // distances are final, the row is reduced before the sweep moves on.
    let mut g = vec![0i64; cols];
    let data = &mut output.data;
    for r in (0..rows - 1).rev() {
        let (top, rest) = data.split_at_mut((r + 1) * cols);
        let row = &mut top[r * cols..];
        let below = &rest[..cols];
        for c in 0..cols {
            let b = below[c];
            if row[c] > b {
                row[c] = b.add_one();
            }
            g[c] = round_half_up(b.to_f64());
        }
        process_line::<V, M>(&g, &mut rest[..cols], inf);
    }
    for c in 0..cols {
        g[c] = round_half_up(data[c].to_f64());
    }
    process_line::<V, M>(&g, &mut data[..cols], inf);
}

// Stage-1 values are never negative, so this matches round-half-up.
#[inline]
fn round_half_up(v: f64) -> i64 {
    (v + 0.5) as i64
}

/// Meijster's second scan over one row.
///
/// `g` holds the row's vertical distances; `row` receives the final 2-D
/// distances. The stack keeps `(s, t)` frames: column `s` provides the row
/// minimum from column `t` onwards, with both components strictly
/// increasing up the stack.
fn process_line<V, M>(g: &[i64], row: &mut [V], inf: i64)
where
    V: DistanceCell,
    M: MetricOps,
{
    let m = g.len() as i64;
    let mut st: Vec<(i64, i64)> = Vec::with_capacity(g.len());
    st.push((0, 0));

    for u in 1..m {
        while let Some(&(s, t)) = st.last() {
            if M::f(t, s, g) > M::f(t, u, g) {
                st.pop();
            } else {
                break;
            }
        }
        match st.last() {
            None => st.push((u, 0)),
            Some(&(s, _)) => {
                let w = 1 + M::sep(s, u, g, inf);
                if w < m {
                    st.push((u, w));
                }
            }
        }
    }

    for u in (0..m).rev() {
        let &(s, t) = st
            .last()
            .expect("dominator stack holds a frame for every column");
        let d = M::f(u, s, g);
        row[u as usize] = if M::SQRT {
            V::from_f64((d as f64).sqrt())
        } else {
            V::from_i64(d)
        };
        if u == t {
            st.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Raster;

    /// 3x3 grid with a single target cell in the top-left corner.
    fn corner_grid() -> Raster<i32> {
        Raster::from_vec(3, 3, vec![1, 0, 0, 0, 0, 0, 0, 0, 0])
    }

    #[test]
    fn chessboard_matches_hand_computed_grid() {
        let input = corner_grid();
        let mut out = Raster::filled_like(&input, 0i32);
        chessboard_distance_transform(&input, &mut out, 1);
        assert_eq!(out.data, vec![0, 1, 2, 1, 1, 2, 2, 2, 2]);
    }

    #[test]
    fn manhattan_matches_hand_computed_grid() {
        let input = corner_grid();
        let mut out = Raster::filled_like(&input, 0i32);
        manhattan_distance_transform(&input, &mut out, 1);
        assert_eq!(out.data, vec![0, 1, 2, 1, 2, 3, 2, 3, 4]);
    }

    #[test]
    fn squared_euclidean_matches_hand_computed_grid() {
        let input = corner_grid();
        let mut out = Raster::filled_like(&input, 0i32);
        squared_euclidean_distance_transform(&input, &mut out, 1);
        assert_eq!(out.data, vec![0, 1, 4, 1, 2, 5, 4, 5, 8]);
    }

    #[test]
    fn euclidean_is_the_square_root_of_the_squared_grid() {
        let input = corner_grid();
        let mut out = Raster::filled_like(&input, 0.0f64);
        euclidean_distance_transform(&input, &mut out, 1);
        let expected = [
            0.0,
            1.0,
            2.0,
            1.0,
            2.0f64.sqrt(),
            5.0f64.sqrt(),
            2.0,
            5.0f64.sqrt(),
            8.0f64.sqrt(),
        ];
        for (got, want) in out.data.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12, "{got} vs {want}");
        }
    }

    #[test]
    fn single_cell_grid_is_zero_for_every_metric() {
        let input = Raster::from_vec(1, 1, vec![7u8]);
        for metric in [
            Metric::EuclideanSquared,
            Metric::Euclidean,
            Metric::Manhattan,
            Metric::Chessboard,
        ] {
            let mut out = Raster::filled_like(&input, -1.0f64);
            distance_transform(&input, &mut out, 7, metric);
            assert_eq!(out.data, vec![0.0], "{metric:?}");
        }
    }

    #[test]
    fn missing_target_saturates_at_rows_plus_cols() {
        let input = Raster::filled(3, 4, 0u8);
        let inf = (3 + 4) as f64;
        for metric in [Metric::Euclidean, Metric::Manhattan, Metric::Chessboard] {
            let mut out = Raster::filled_like(&input, 0.0f64);
            distance_transform(&input, &mut out, 9, metric);
            assert!(
                out.data.iter().all(|&v| v == inf),
                "{metric:?}: {:?}",
                out.data
            );
        }
        // The squared metric emits the squared stand-in.
        let mut out = Raster::filled_like(&input, 0i64);
        distance_transform(&input, &mut out, 9, Metric::EuclideanSquared);
        assert!(out.data.iter().all(|&v| v == 49));
    }

    #[test]
    fn zero_exactly_on_target_cells() {
        let input = Raster::from_vec(3, 4, vec![0, 2, 0, 0, 0, 0, 2, 0, 2, 0, 0, 0]);
        let mut out = Raster::filled_like(&input, 0i32);
        manhattan_distance_transform(&input, &mut out, 2);
        for (cell, dist) in input.data.iter().zip(&out.data) {
            assert_eq!(*cell == 2, *dist == 0);
            assert!(*dist >= 0);
        }
    }

    #[test]
    fn single_row_and_single_column_grids() {
        let row = Raster::from_vec(1, 5, vec![0, 0, 3, 0, 0]);
        let mut out = Raster::filled_like(&row, 0i32);
        manhattan_distance_transform(&row, &mut out, 3);
        assert_eq!(out.data, vec![2, 1, 0, 1, 2]);

        let col = Raster::from_vec(5, 1, vec![0, 0, 0, 0, 3]);
        let mut out = Raster::filled_like(&col, 0i32);
        chessboard_distance_transform(&col, &mut out, 3);
        assert_eq!(out.data, vec![4, 3, 2, 1, 0]);
    }
}
