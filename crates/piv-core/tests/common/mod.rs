#![allow(dead_code)]

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use piv_core::frame::Frame;

/// Particle count used for 64x64 synthetic recordings (~0.1 particles/px).
pub const PARTICLES_64: usize = 400;

/// Gaussian particle radius (standard deviation) in pixels.
pub const PARTICLE_SIGMA: f64 = 0.7;

/// Random particle centres (row, col) covering an h x w image.
pub fn particle_positions(h: usize, w: usize, count: usize, seed: u64) -> Vec<(f64, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| (rng.random_range(0.0..h as f64), rng.random_range(0.0..w as f64)))
        .collect()
}

/// Render Gaussian particles displaced by (dy, dx), saturating at 1.0.
pub fn render_particles(
    h: usize,
    w: usize,
    positions: &[(f64, f64)],
    sigma: f64,
    dy: f64,
    dx: f64,
) -> Array2<f32> {
    let mut data = Array2::<f64>::zeros((h, w));
    let reach = (3.0 * sigma).ceil() as isize + 1;
    for &(py, px) in positions {
        let (py, px) = (py + dy, px + dx);
        let (r0, c0) = (py.floor() as isize, px.floor() as isize);
        for r in (r0 - reach)..=(r0 + reach) {
            for c in (c0 - reach)..=(c0 + reach) {
                if r < 0 || c < 0 || r >= h as isize || c >= w as isize {
                    continue;
                }
                let d2 = (r as f64 - py).powi(2) + (c as f64 - px).powi(2);
                data[[r as usize, c as usize]] += (-d2 / (2.0 * sigma * sigma)).exp();
            }
        }
    }
    data.mapv(|v| v.min(1.0) as f32)
}

/// A synthetic particle recording.
pub fn particle_frame(h: usize, w: usize, count: usize, seed: u64) -> Frame {
    let positions = particle_positions(h, w, count, seed);
    Frame::new(render_particles(h, w, &positions, PARTICLE_SIGMA, 0.0, 0.0), 8)
}

/// Shift an image by whole pixels: out[r, c] = data[r - dy, c - dx], zero-filled.
pub fn shift_integer(data: &Array2<f32>, dy: isize, dx: isize) -> Array2<f32> {
    let (h, w) = data.dim();
    Array2::from_shape_fn((h, w), |(r, c)| {
        let sr = r as isize - dy;
        let sc = c as isize - dx;
        if sr >= 0 && sc >= 0 && sr < h as isize && sc < w as isize {
            data[[sr as usize, sc as usize]]
        } else {
            0.0
        }
    })
}

/// Pair of 64x64 frames where B is A moved by (dy, dx) whole pixels.
pub fn translated_pair(dy: isize, dx: isize, seed: u64) -> (Frame, Frame) {
    let a = particle_frame(64, 64, PARTICLES_64, seed);
    let b = Frame::new(shift_integer(&a.data, dy, dx), 8);
    (a, b)
}

/// Interior cells of a field: everything but the outermost ring.
pub fn interior_cells(rows: usize, cols: usize) -> Vec<(usize, usize)> {
    let mut cells = Vec::new();
    for r in 1..rows.saturating_sub(1) {
        for c in 1..cols.saturating_sub(1) {
            cells.push((r, c));
        }
    }
    cells
}
