//! 構造的類似度（SSIM）によるスコアリング
//!
//! 両画像を 400x400 に縮小・グレースケール化（BT.601）してから比較する。
//! 7x7 の一様窓・K1=0.01・K2=0.03・ダイナミックレンジ255・標本共分散で、
//! 窓が画像内に収まる位置の平均をとる。

use crate::imageio::strip_alpha;
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma, RgbImage};

/// 比較前に揃えるサイズ（設定不可）
pub const TARGET_SIZE: u32 = 400;

const WINDOW: usize = 7;
const K1: f64 = 0.01;
const K2: f64 = 0.03;
const DATA_RANGE: f64 = 255.0;

/// 参考画像を一度だけ前処理して保持するスコアラー
#[derive(Debug, Clone)]
pub struct SimilarityScorer {
    reference: GrayImage,
}

impl SimilarityScorer {
    pub fn new(reference: &DynamicImage) -> Self {
        Self {
            reference: prepare(reference),
        }
    }

    /// 参考画像との類似度（0.0〜1.0）
    pub fn score(&self, candidate: &DynamicImage) -> f64 {
        ssim(&self.reference, &prepare(candidate)).clamp(0.0, 1.0)
    }
}

/// 2画像の類似度（0.0〜1.0）
pub fn similarity(a: &DynamicImage, b: &DynamicImage) -> f64 {
    ssim(&prepare(a), &prepare(b)).clamp(0.0, 1.0)
}

/// アルファ除去 → 縮小（双線形）→ グレースケール
fn prepare(image: &DynamicImage) -> GrayImage {
    let resized = strip_alpha(image).resize_exact(TARGET_SIZE, TARGET_SIZE, FilterType::Triangle);
    match resized {
        DynamicImage::ImageLuma8(gray) => gray,
        other => luma_bt601(&other.to_rgb8()),
    }
}

/// Y = 0.299R + 0.587G + 0.114B
fn luma_bt601(rgb: &RgbImage) -> GrayImage {
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let v = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
        Luma([v.round().clamp(0.0, 255.0) as u8])
    })
}

/// 同サイズのグレー画像同士の平均SSIM（-1.0〜1.0）
///
/// サイズ一致は `prepare` 済みであることが前提。
pub(crate) fn ssim(a: &GrayImage, b: &GrayImage) -> f64 {
    debug_assert_eq!(a.dimensions(), b.dimensions());

    let (w, h) = (a.width() as usize, a.height() as usize);
    if w < WINDOW || h < WINDOW {
        return if a.as_raw() == b.as_raw() { 1.0 } else { 0.0 };
    }

    let x: Vec<f64> = a.as_raw().iter().map(|&v| v as f64).collect();
    let y: Vec<f64> = b.as_raw().iter().map(|&v| v as f64).collect();
    let xx: Vec<f64> = x.iter().map(|v| v * v).collect();
    let yy: Vec<f64> = y.iter().map(|v| v * v).collect();
    let xy: Vec<f64> = x.iter().zip(&y).map(|(p, q)| p * q).collect();

    let sx = IntegralImage::new(&x, w, h);
    let sy = IntegralImage::new(&y, w, h);
    let sxx = IntegralImage::new(&xx, w, h);
    let syy = IntegralImage::new(&yy, w, h);
    let sxy = IntegralImage::new(&xy, w, h);

    let np = (WINDOW * WINDOW) as f64;
    let cov_norm = np / (np - 1.0);
    let c1 = (K1 * DATA_RANGE).powi(2);
    let c2 = (K2 * DATA_RANGE).powi(2);

    let mut total = 0.0;
    let mut count = 0usize;

    for top in 0..=(h - WINDOW) {
        for left in 0..=(w - WINDOW) {
            let ux = sx.window_sum(left, top, WINDOW) / np;
            let uy = sy.window_sum(left, top, WINDOW) / np;
            let uxx = sxx.window_sum(left, top, WINDOW) / np;
            let uyy = syy.window_sum(left, top, WINDOW) / np;
            let uxy = sxy.window_sum(left, top, WINDOW) / np;

            let vx = cov_norm * (uxx - ux * ux);
            let vy = cov_norm * (uyy - uy * uy);
            let vxy = cov_norm * (uxy - ux * uy);

            let a1 = 2.0 * ux * uy + c1;
            let a2 = 2.0 * vxy + c2;
            let b1 = ux * ux + uy * uy + c1;
            let b2 = vx + vy + c2;

            total += (a1 * a2) / (b1 * b2);
            count += 1;
        }
    }

    total / count as f64
}

/// 累積和テーブル（窓内の総和をO(1)で求める）
struct IntegralImage {
    sums: Vec<f64>,
    stride: usize,
}

impl IntegralImage {
    fn new(values: &[f64], w: usize, h: usize) -> Self {
        let stride = w + 1;
        let mut sums = vec![0.0; stride * (h + 1)];
        for yy in 0..h {
            let mut row = 0.0;
            for xx in 0..w {
                row += values[yy * w + xx];
                sums[(yy + 1) * stride + xx + 1] = sums[yy * stride + xx + 1] + row;
            }
        }
        Self { sums, stride }
    }

    fn window_sum(&self, left: usize, top: usize, size: usize) -> f64 {
        let (r0, r1) = (top * self.stride, (top + size) * self.stride);
        let (c0, c1) = (left, left + size);
        self.sums[r1 + c1] - self.sums[r0 + c1] - self.sums[r1 + c0] + self.sums[r0 + c0]
    }
}
