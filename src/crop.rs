//! 白い余白のトリミング
//!
//! 画像の周囲にある白い余白を検出し、内容部分＋余白分だけを残す。

use crate::batch::{print_summary, BatchSummary};
use crate::error::{PhotoOrientError, Result};
use crate::imageio::{load_image, save_image};
use crate::progress::{rule, BatchProgress};
use crate::scanner;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use tracing::warn;

/// トリミング範囲（left/top は含む、right/bottom は含まない）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropBox {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }
}

#[derive(Debug, Clone)]
pub struct CropResult {
    pub image: DynamicImage,
    /// 白以外が見つからなかった場合は None（元画像のまま）
    pub crop_box: Option<CropBox>,
    /// 元画像に対する残った面積（%）
    pub area_ratio: f64,
}

/// 白い余白を切り取る
///
/// RGB平均が `threshold` 未満の画素を内容とみなし、その外接矩形を
/// `padding` だけ広げて（画像内に収めて）切り出す。
pub fn crop_white_edges(image: &DynamicImage, threshold: u8, padding: u32) -> CropResult {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in rgb.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let gray = (r as f64 + g as f64 + b as f64) / 3.0;
        if gray < threshold as f64 {
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
    }

    let Some((min_x, min_y, max_x, max_y)) = bounds else {
        return CropResult {
            image: image.clone(),
            crop_box: None,
            area_ratio: 100.0,
        };
    };

    let crop_box = CropBox {
        left: min_x.saturating_sub(padding),
        top: min_y.saturating_sub(padding),
        right: (max_x + padding + 1).min(width),
        bottom: (max_y + padding + 1).min(height),
    };

    let original_area = width as f64 * height as f64;
    let cropped_area = crop_box.width() as f64 * crop_box.height() as f64;

    CropResult {
        image: image.crop_imm(crop_box.left, crop_box.top, crop_box.width(), crop_box.height()),
        crop_box: Some(crop_box),
        area_ratio: cropped_area / original_area * 100.0,
    }
}

/// 単体処理の既定出力先: `<stem>_cropped.<ext>`
pub fn default_single_output(input: &Path) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    match input.extension() {
        Some(ext) => parent.join(format!("{}_cropped.{}", stem, ext.to_string_lossy())),
        None => parent.join(format!("{}_cropped", stem)),
    }
}

/// 1ファイルを読み込んでトリミングし保存
pub fn crop_file(
    input: &Path,
    output: &Path,
    threshold: u8,
    padding: u32,
    progress: &BatchProgress,
) -> Result<CropResult> {
    let image = load_image(input)?;
    let result = crop_white_edges(&image, threshold, padding);

    match result.crop_box {
        Some(b) => {
            progress.println(format!("  元サイズ: {} × {}", image.width(), image.height()));
            progress.println(format!("  内容範囲: [{}:{}, {}:{}]", b.left, b.right, b.top, b.bottom));
            progress.println(format!("  トリミング後: {} × {}", b.width(), b.height()));
            progress.println(format!("  内容の割合: {:.1}%", result.area_ratio));
        }
        None => {
            warn!(file = %input.display(), "no non-white content");
            progress.println("  ⚠️  警告: 白以外の内容が検出されませんでした");
        }
    }

    save_image(&result.image, output)?;
    Ok(result)
}

/// フォルダ内の画像を一括トリミング
pub fn crop_folder(
    input: &Path,
    output: &Path,
    threshold: u8,
    padding: u32,
    progress: &BatchProgress,
) -> Result<BatchSummary> {
    let images = scanner::scan_folder(input)?;
    std::fs::create_dir_all(output)?;

    progress.println(format!("入力フォルダ: {}", input.display()));
    progress.println(format!("出力フォルダ: {}", output.display()));
    progress.println(format!("白の閾値: {}", threshold));
    progress.println(format!("余白: {} px", padding));
    progress.println(rule());

    if images.is_empty() {
        return Err(PhotoOrientError::NoImagesFound(input.display().to_string()));
    }
    progress.println(format!("{}枚の画像を検出\n", images.len()));
    progress.set_total(images.len());

    let mut summary = BatchSummary::new(images.len());

    for (idx, info) in images.iter().enumerate() {
        progress.start(&info.file_name);
        progress.println(format!("[{}/{}] 処理: {}", idx + 1, images.len(), info.file_name));

        let output_file = output.join(&info.file_name);
        match crop_file(&info.path, &output_file, threshold, padding, progress) {
            Ok(_) => {
                progress.println(format!("  ✓ 保存先: {}", output_file.display()));
                summary.succeeded += 1;
            }
            Err(e) => {
                warn!(file = %info.file_name, error = %e, "crop failed");
                progress.println(format!("  ✗ 処理失敗: {}", e));
                summary.failed += 1;
            }
        }

        progress.println("");
        progress.inc();
    }

    progress.finish();
    print_summary(&summary, output, progress);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    /// 白背景に (x0,y0)-(x1,y1) の黒い四角
    fn boxed(w: u32, h: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(w, h, |x, y| {
            if (x0..=x1).contains(&x) && (y0..=y1).contains(&y) {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        }))
    }

    #[test]
    fn test_crop_with_padding() {
        let result = crop_white_edges(&boxed(100, 80, 30, 20, 49, 39), 250, 10);
        let b = result.crop_box.unwrap();
        assert_eq!(b, CropBox { left: 20, top: 10, right: 60, bottom: 50 });
        assert_eq!(result.image.width(), 40);
        assert_eq!(result.image.height(), 40);
        assert!((result.area_ratio - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_padding_clamped_to_image() {
        let result = crop_white_edges(&boxed(50, 50, 2, 3, 47, 45), 250, 10);
        let b = result.crop_box.unwrap();
        assert_eq!(b, CropBox { left: 0, top: 0, right: 50, bottom: 50 });
    }

    #[test]
    fn test_all_white_returns_original() {
        let white = DynamicImage::ImageRgb8(RgbImage::from_pixel(30, 20, Rgb([255, 255, 255])));
        let result = crop_white_edges(&white, 250, 10);
        assert!(result.crop_box.is_none());
        assert_eq!(result.image.width(), 30);
        assert_eq!(result.image.height(), 20);
    }

    #[test]
    fn test_threshold_is_strict() {
        // 平均250ちょうどは白扱い
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(10, 10, |x, _| {
            if x == 5 { Rgb([250, 250, 250]) } else { Rgb([255, 255, 255]) }
        }));
        assert!(crop_white_edges(&img, 250, 0).crop_box.is_none());
        assert!(crop_white_edges(&img, 251, 0).crop_box.is_some());
    }

    #[test]
    fn test_alpha_kept_in_output() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_fn(20, 20, |x, y| {
            if x == 10 && y == 10 { Rgba([0, 0, 0, 100]) } else { Rgba([255, 255, 255, 255]) }
        }));
        let result = crop_white_edges(&img, 250, 1);
        assert!(result.image.color().has_alpha());
        assert_eq!(result.image.width(), 3);
    }

    #[test]
    fn test_default_single_output() {
        assert_eq!(
            default_single_output(Path::new("output/1.png")),
            PathBuf::from("output/1_cropped.png")
        );
    }
}
