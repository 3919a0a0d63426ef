//! Content-aware crop window selection
//!
//! Both strategies score candidate windows on a downscaled grayscale copy:
//! `attention` sums a saliency map (edge strength blended with local
//! variance), `entropy` measures the Shannon entropy of the luminance
//! histogram inside the window. Ties keep the centered window.

use image::{imageops, GrayImage, RgbaImage};

use crate::transform::Strategy;

/// Downscale factor for the analysis copy
const ANALYSIS_SCALE: u32 = 4;

/// Upper bound of candidate positions per axis
const MAX_CANDIDATES: u32 = 32;

/// Top-left corner of the best `width` x `height` window inside `image`
pub fn crop_origin(image: &RgbaImage, width: u32, height: u32, strategy: Strategy) -> (u32, u32) {
    let (src_w, src_h) = image.dimensions();
    if width >= src_w && height >= src_h {
        return (0, 0);
    }

    let small_w = (src_w / ANALYSIS_SCALE).max(1);
    let small_h = (src_h / ANALYSIS_SCALE).max(1);
    let gray = imageops::grayscale(image);
    let small = imageops::resize(&gray, small_w, small_h, imageops::FilterType::Triangle);

    let win_w = (width / ANALYSIS_SCALE).clamp(1, small_w);
    let win_h = (height / ANALYSIS_SCALE).clamp(1, small_h);

    let score: Box<dyn Fn(u32, u32) -> f64> = match strategy {
        Strategy::Attention => {
            let table = SummedArea::new(&saliency_map(&small), small_w, small_h);
            Box::new(move |x, y| table.sum(x, y, win_w, win_h))
        }
        Strategy::Entropy => Box::new(move |x, y| window_entropy(&small, x, y, win_w, win_h)),
    };

    let center = ((small_w - win_w) / 2, (small_h - win_h) / 2);
    let mut best = center;
    let mut best_score = score(center.0, center.1);

    for y in candidates(small_h - win_h) {
        for x in candidates(small_w - win_w) {
            let s = score(x, y);
            if s > best_score {
                best_score = s;
                best = (x, y);
            }
        }
    }

    (
        (best.0 * ANALYSIS_SCALE).min(src_w.saturating_sub(width)),
        (best.1 * ANALYSIS_SCALE).min(src_h.saturating_sub(height)),
    )
}

/// Evenly spaced positions in `0..=max`, always including both ends
fn candidates(max: u32) -> Vec<u32> {
    let step = max.div_ceil(MAX_CANDIDATES).max(1);
    let mut positions: Vec<u32> = (0..=max).step_by(step as usize).collect();
    if positions.last() != Some(&max) {
        positions.push(max);
    }
    positions
}

/// Edge strength (central differences) blended with 3x3 local variance
fn saliency_map(gray: &GrayImage) -> Vec<f64> {
    let (w, h) = gray.dimensions();
    let at = |x: i64, y: i64| -> f64 {
        let cx = x.clamp(0, w as i64 - 1) as u32;
        let cy = y.clamp(0, h as i64 - 1) as u32;
        gray.get_pixel(cx, cy)[0] as f64
    };

    let mut map = Vec::with_capacity((w * h) as usize);
    for y in 0..h as i64 {
        for x in 0..w as i64 {
            let gx = at(x + 1, y) - at(x - 1, y);
            let gy = at(x, y + 1) - at(x, y - 1);
            let edge = (gx * gx + gy * gy).sqrt();

            let mut sum = 0.0;
            let mut sum_sq = 0.0;
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let v = at(x + dx, y + dy);
                    sum += v;
                    sum_sq += v * v;
                }
            }
            let mean = sum / 9.0;
            let variance = sum_sq / 9.0 - mean * mean;

            map.push(edge * 0.6 + variance * 0.4);
        }
    }
    map
}

fn window_entropy(gray: &GrayImage, x0: u32, y0: u32, w: u32, h: u32) -> f64 {
    let mut histogram = [0u32; 256];
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            histogram[gray.get_pixel(x, y)[0] as usize] += 1;
        }
    }
    let total = (w * h) as f64;
    histogram
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}

/// Integral image for constant-time window sums
struct SummedArea {
    table: Vec<f64>,
    stride: usize,
}

impl SummedArea {
    fn new(values: &[f64], width: u32, height: u32) -> Self {
        let stride = width as usize + 1;
        let mut table = vec![0.0; stride * (height as usize + 1)];
        for y in 0..height as usize {
            let mut row = 0.0;
            for x in 0..width as usize {
                row += values[y * width as usize + x];
                table[(y + 1) * stride + x + 1] = table[y * stride + x + 1] + row;
            }
        }
        Self { table, stride }
    }

    fn sum(&self, x: u32, y: u32, w: u32, h: u32) -> f64 {
        let (x0, y0) = (x as usize, y as usize);
        let (x1, y1) = (x0 + w as usize, y0 + h as usize);
        self.table[y1 * self.stride + x1] - self.table[y0 * self.stride + x1]
            - self.table[y1 * self.stride + x0]
            + self.table[y0 * self.stride + x0]
    }
}
