//! 画像の読み込み・保存
//!
//! 保存形式は出力ファイルの拡張子から決まる（PNGは可逆、JPEGは再エンコード）。

use crate::error::{PhotoOrientError, Result};
use image::{DynamicImage, ImageFormat};
use std::borrow::Cow;
use std::path::Path;

/// 画像を読み込む（壊れた・未対応のファイルは Decode エラー）
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    image::open(path)
        .map_err(|e| PhotoOrientError::Decode(format!("{}: {}", path.display(), e)))
}

/// アルファチャンネルを除去する（アルファなしは借用のまま返す）
pub fn strip_alpha(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    if !image.color().has_alpha() {
        return Cow::Borrowed(image);
    }
    if image.color().has_color() {
        Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8()))
    } else {
        Cow::Owned(DynamicImage::ImageLuma8(image.to_luma8()))
    }
}

/// 拡張子に応じた形式で保存
pub fn save_image(image: &DynamicImage, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path)
        .map_err(|e| PhotoOrientError::Encode(format!("{}: {}", path.display(), e)))?;

    // JPEGはアルファを持てない
    let result = if format == ImageFormat::Jpeg && image.color().has_alpha() {
        strip_alpha(image).save_with_format(path, format)
    } else {
        image.save_with_format(path, format)
    };

    result.map_err(|e| PhotoOrientError::Encode(format!("{}: {}", path.display(), e)))
}
