//! 人工確認フォルダの一括修正
//!
//! manual_check 内の画像をすべて180°回転して出力フォルダへ移し、元ファイルを削除する。

use crate::batch::{print_summary, BatchSummary};
use crate::error::{PhotoOrientError, Result};
use crate::imageio::{load_image, save_image};
use crate::orient::Rotation;
use crate::progress::{rule, BatchProgress};
use crate::scanner::{self, ImageInfo};
use dialoguer::Confirm;
use std::path::Path;
use tracing::warn;

/// 実行前の確認
pub fn confirm(manual_dir: &Path) -> Result<bool> {
    let answer = Confirm::new()
        .with_prompt(format!(
            "{} 内のすべての画像を180°回転しますか？",
            manual_dir.display()
        ))
        .default(false)
        .interact()
        .map_err(|e| PhotoOrientError::Io(std::io::Error::other(e.to_string())))?;
    Ok(answer)
}

/// 人工確認フォルダの画像を180°回転して出力フォルダへ移動
pub fn fix_manual_check(manual_dir: &Path, output_dir: &Path, progress: &BatchProgress) -> Result<BatchSummary> {
    if !manual_dir.is_dir() {
        return Err(PhotoOrientError::FolderNotFound(manual_dir.display().to_string()));
    }

    let images = scanner::scan_folder(manual_dir)?;
    if images.is_empty() {
        progress.println("処理が必要な画像はありません");
        return Ok(BatchSummary::default());
    }

    std::fs::create_dir_all(output_dir)?;
    progress.println(format!("回転が必要な画像: {}枚\n", images.len()));
    progress.set_total(images.len());

    let mut summary = BatchSummary::new(images.len());

    for (idx, info) in images.iter().enumerate() {
        progress.start(&info.file_name);
        progress.println(format!("[{}/{}] 処理: {}", idx + 1, images.len(), info.file_name));

        match rotate_and_move(info, output_dir) {
            Ok(()) => {
                progress.println(format!(
                    "  ✓ 180°回転して保存: {}",
                    output_dir.join(&info.file_name).display()
                ));
                progress.println("  ✓ 元ファイルを削除");
                summary.succeeded += 1;
            }
            Err(e) => {
                warn!(file = %info.file_name, error = %e, "manual-check fix failed");
                progress.println(format!("  ✗ 処理失敗（元ファイルは残します）: {}", e));
                summary.failed += 1;
            }
        }

        progress.println("");
        progress.inc();
    }

    progress.finish();
    print_summary(&summary, output_dir, progress);

    if is_empty_dir(manual_dir)? {
        progress.println(format!("\n{} は空になりました", manual_dir.display()));
    }
    progress.println(rule());

    Ok(summary)
}

/// 保存に成功した場合のみ元ファイルを削除する
fn rotate_and_move(info: &ImageInfo, output_dir: &Path) -> Result<()> {
    let image = load_image(&info.path)?;
    let rotated = Rotation::Deg180.apply(&image);
    save_image(&rotated, &output_dir.join(&info.file_name))?;
    std::fs::remove_file(&info.path)?;
    Ok(())
}

fn is_empty_dir(dir: &Path) -> Result<bool> {
    Ok(std::fs::read_dir(dir)?.next().is_none())
}
