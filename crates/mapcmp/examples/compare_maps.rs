//! Compare two synthetic category maps and print the statistic.
//!
//! Run with `cargo run --example compare_maps`.

use image::{GrayImage, Luma};
use mapcmp::fuzzy_kappa_image;

fn banded(w: u32, h: u32) -> GrayImage {
    let mut img = GrayImage::from_pixel(w, h, Luma([0u8]));
    for y in 0..h {
        for x in 0..w {
            img.put_pixel(x, y, Luma([(x * 3 / w) as u8]));
        }
    }
    img
}

fn main() {
    mapcmp::logger::init(None);

    let map_a = banded(64, 48);
    let mut map_b = banded(64, 48);
    // Perturb a block so the maps disagree locally.
    for y in 10..20 {
        for x in 30..40 {
            map_b.put_pixel(x, y, Luma([0u8]));
        }
    }

    let (result, comparison) = fuzzy_kappa_image(&map_a, &map_b, 3, 2.0);
    let worst = comparison
        .data
        .iter()
        .cloned()
        .fold(f64::INFINITY, f64::min);
    println!(
        "fuzzy kappa: {:.4} (comparable: {}), worst cell similarity {:.4}",
        result.fuzzy_kappa, result.comparable, worst
    );
}
