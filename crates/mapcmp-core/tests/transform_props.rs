//! Brute-force cross-checks of the two-pass distance transform.

use mapcmp_core::{distance_transform, Metric, Raster};
use rand::{rngs::StdRng, Rng, SeedableRng};

const METRICS: [Metric; 4] = [
    Metric::EuclideanSquared,
    Metric::Euclidean,
    Metric::Manhattan,
    Metric::Chessboard,
];

/// O(cells^2) reference: scan every target cell for every cell.
fn brute_force(input: &Raster<u8>, target: u8, metric: Metric) -> Vec<f64> {
    let rows = input.rows as i64;
    let cols = input.cols as i64;
    let inf = rows + cols;

    let mut out = Vec::with_capacity(input.len());
    for r in 0..rows {
        for c in 0..cols {
            let mut best: Option<i64> = None;
            for tr in 0..rows {
                for tc in 0..cols {
                    if input.at(tr as usize, tc as usize) != target {
                        continue;
                    }
                    let dr = (r - tr).abs();
                    let dc = (c - tc).abs();
                    let d = match metric {
                        Metric::EuclideanSquared | Metric::Euclidean => dr * dr + dc * dc,
                        Metric::Manhattan => dr + dc,
                        Metric::Chessboard => dr.max(dc),
                    };
                    best = Some(best.map_or(d, |b: i64| b.min(d)));
                }
            }
            let d = match (best, metric) {
                (Some(d), Metric::Euclidean) => (d as f64).sqrt(),
                (Some(d), _) => d as f64,
                // No target anywhere: the transform saturates.
                (None, Metric::EuclideanSquared) => (inf * inf) as f64,
                (None, _) => inf as f64,
            };
            out.push(d);
        }
    }
    out
}

fn random_grid(rng: &mut StdRng, rows: usize, cols: usize, target_share: f64) -> Raster<u8> {
    let data = (0..rows * cols)
        .map(|_| {
            if rng.gen_bool(target_share) {
                1u8
            } else {
                rng.gen_range(2..5)
            }
        })
        .collect();
    Raster::from_vec(rows, cols, data)
}

#[test]
fn transform_matches_brute_force_on_random_grids() {
    let mut rng = StdRng::seed_from_u64(0x6d61_7063);
    for &(rows, cols) in &[(1, 1), (1, 9), (9, 1), (4, 4), (7, 12), (13, 6)] {
        for &share in &[0.0, 0.05, 0.3, 0.9] {
            let input = random_grid(&mut rng, rows, cols, share);
            for metric in METRICS {
                let mut out = Raster::filled_like(&input, 0.0f64);
                distance_transform(&input, &mut out, 1, metric);
                let want = brute_force(&input, 1, metric);
                for (p, (got, want)) in out.data.iter().zip(&want).enumerate() {
                    assert_eq!(
                        got, want,
                        "{metric:?} {rows}x{cols} share={share} cell {p}"
                    );
                }
            }
        }
    }
}

#[test]
fn integer_outputs_match_the_float_path() {
    let mut rng = StdRng::seed_from_u64(7);
    let input = random_grid(&mut rng, 8, 11, 0.2);
    for metric in [Metric::EuclideanSquared, Metric::Manhattan, Metric::Chessboard] {
        let mut as_f64 = Raster::filled_like(&input, 0.0f64);
        let mut as_i32 = Raster::filled_like(&input, 0i32);
        distance_transform(&input, &mut as_f64, 1, metric);
        distance_transform(&input, &mut as_i32, 1, metric);
        for (a, b) in as_f64.data.iter().zip(&as_i32.data) {
            assert_eq!(*a, f64::from(*b), "{metric:?}");
        }
    }
}

#[test]
fn results_are_stable_under_quarter_rotation() {
    fn rotate<T: Copy + Default>(r: &Raster<T>) -> Raster<T> {
        // 90 degrees clockwise: (row, col) -> (col, rows - 1 - row).
        let mut out = Raster::filled(r.cols, r.rows, T::default());
        for row in 0..r.rows {
            for col in 0..r.cols {
                out.set(col, r.rows - 1 - row, r.at(row, col));
            }
        }
        out
    }

    let mut rng = StdRng::seed_from_u64(42);
    let input = random_grid(&mut rng, 6, 10, 0.15);
    let rotated = rotate(&input);

    for metric in METRICS {
        let mut out = Raster::filled_like(&input, 0.0f64);
        distance_transform(&input, &mut out, 1, metric);
        let mut out_rot = Raster::filled_like(&rotated, 0.0f64);
        distance_transform(&rotated, &mut out_rot, 1, metric);
        assert_eq!(rotate(&out).data, out_rot.data, "{metric:?}");
    }
}

#[test]
fn manhattan_distance_is_lipschitz_across_neighbours() {
    let mut rng = StdRng::seed_from_u64(99);
    let input = random_grid(&mut rng, 9, 9, 0.1);
    let mut out = Raster::filled_like(&input, 0i64);
    distance_transform(&input, &mut out, 1, Metric::Manhattan);

    for r in 0..input.rows {
        for c in 0..input.cols {
            if c + 1 < input.cols {
                assert!((out.at(r, c) - out.at(r, c + 1)).abs() <= 1);
            }
            if r + 1 < input.rows {
                assert!((out.at(r, c) - out.at(r + 1, c)).abs() <= 1);
            }
        }
    }
}
