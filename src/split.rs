//! 三分割抽出
//!
//! 3つの内容が並んだ画像を三等分し、指定した1つだけを保存する。

use crate::batch::{print_summary, BatchSummary};
use crate::error::{PhotoOrientError, Result};
use crate::imageio::{load_image, save_image};
use crate::progress::{rule, BatchProgress};
use crate::scanner;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// 分割方向
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitDirection {
    /// 横に三等分（左・中・右）
    #[default]
    Horizontal,
    /// 縦に三等分（上・中・下）
    Vertical,
}

impl SplitDirection {
    /// 部分の呼び名
    pub fn part_name(&self, part: u8) -> &'static str {
        match (self, part) {
            (SplitDirection::Horizontal, 1) => "左",
            (SplitDirection::Horizontal, 2) => "中央",
            (SplitDirection::Horizontal, _) => "右",
            (SplitDirection::Vertical, 1) => "上",
            (SplitDirection::Vertical, 2) => "中央",
            (SplitDirection::Vertical, _) => "下",
        }
    }
}

impl std::str::FromStr for SplitDirection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "horizontal" | "h" => Ok(SplitDirection::Horizontal),
            "vertical" | "v" => Ok(SplitDirection::Vertical),
            _ => Err(format!("Unknown direction: {}. Use horizontal or vertical", s)),
        }
    }
}

impl std::fmt::Display for SplitDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SplitDirection::Horizontal => write!(f, "horizontal"),
            SplitDirection::Vertical => write!(f, "vertical"),
        }
    }
}

/// 切り出し範囲（x, y, 幅, 高さ）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// 指定部分の範囲を求める（最後の部分は端まで含む）
pub fn part_region(width: u32, height: u32, part: u8, direction: SplitDirection) -> Result<SplitRegion> {
    if !(1..=3).contains(&part) {
        return Err(PhotoOrientError::InvalidArgument(format!(
            "part は 1, 2, 3 のいずれか: {}",
            part
        )));
    }
    let i = (part - 1) as u32;

    let region = match direction {
        SplitDirection::Horizontal => {
            let part_width = width / 3;
            let left = i * part_width;
            let right = if i < 2 { (i + 1) * part_width } else { width };
            SplitRegion { x: left, y: 0, width: right - left, height }
        }
        SplitDirection::Vertical => {
            let part_height = height / 3;
            let top = i * part_height;
            let bottom = if i < 2 { (i + 1) * part_height } else { height };
            SplitRegion { x: 0, y: top, width, height: bottom - top }
        }
    };
    Ok(region)
}

/// 画像から指定部分を切り出す
pub fn extract_part(image: &DynamicImage, part: u8, direction: SplitDirection) -> Result<(DynamicImage, SplitRegion)> {
    let r = part_region(image.width(), image.height(), part, direction)?;
    Ok((image.crop_imm(r.x, r.y, r.width, r.height), r))
}

/// 1ファイルを分割して出力フォルダに同名で保存
pub fn split_file(
    input: &Path,
    output_dir: &Path,
    part: u8,
    direction: SplitDirection,
    progress: &BatchProgress,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let image = load_image(input)?;
    progress.println(format!("  元サイズ: {} × {}", image.width(), image.height()));

    let (extracted, r) = extract_part(&image, part, direction)?;
    progress.println(format!(
        "  第{}部分（{}）を抽出: [{}, {}, {}, {}]",
        part,
        direction.part_name(part),
        r.x,
        r.y,
        r.x + r.width,
        r.y + r.height
    ));

    let file_name = input
        .file_name()
        .ok_or_else(|| PhotoOrientError::InvalidArgument(input.display().to_string()))?;
    let output_file = output_dir.join(file_name);
    save_image(&extracted, &output_file)?;
    progress.println(format!("  抽出サイズ: {} × {}", extracted.width(), extracted.height()));

    Ok(output_file)
}

/// フォルダ内の画像を一括分割
pub fn split_folder(
    input: &Path,
    output: &Path,
    part: u8,
    direction: SplitDirection,
    progress: &BatchProgress,
) -> Result<BatchSummary> {
    // 範囲外の part はファイルを読む前に弾く
    part_region(3, 3, part, direction)?;
    let images = scanner::scan_folder(input)?;

    let direction_label = match direction {
        SplitDirection::Horizontal => "横三等分",
        SplitDirection::Vertical => "縦三等分",
    };
    progress.println(format!("入力フォルダ: {}", input.display()));
    progress.println(format!("出力フォルダ: {}", output.display()));
    progress.println(format!("分割方向: {}", direction_label));
    progress.println(format!("抽出部分: 第{}部分（{}）", part, direction.part_name(part)));
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

        match split_file(&info.path, output, part, direction, progress) {
            Ok(path) => {
                progress.println(format!("  ✓ 保存先: {}", path.display()));
                summary.succeeded += 1;
            }
            Err(e) => {
                warn!(file = %info.file_name, error = %e, "split failed");
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
