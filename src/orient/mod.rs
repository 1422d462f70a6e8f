//! 参考画像による向き補正モジュール
//!
//! ## 処理フロー
//! 1. 参考画像を一度だけ読み込み、400x400グレーに前処理
//! 2. 各画像について 0/90/180/270° の候補を生成し類似度を計算
//! 3. 最良角度を選び、次点との差が閾値未満なら人工確認フォルダへ
//! 4. 元画像（アルファ含む）を最良角度だけ時計回りに回転して保存

pub mod decision;
pub mod rotation;
pub mod similarity;

pub use decision::{decide, validate_threshold, OrientationDecision, ScoreMap};
pub use rotation::{rotation_candidates, Rotation};
pub use similarity::{similarity, SimilarityScorer};

use crate::error::{PhotoOrientError, Result};
use crate::imageio::{load_image, save_image, strip_alpha};
use crate::progress::{rule, BatchProgress};
use crate::scanner::{self, ImageInfo};
use image::DynamicImage;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// 人工確認用サブフォルダ名
pub const MANUAL_CHECK_DIR: &str = "manual_check";

/// 向き補正の入力設定
#[derive(Debug, Clone)]
pub struct OrientOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub reference: PathBuf,
    pub threshold: f64,
}

/// 1画像分の処理結果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrientOutcome {
    pub file_name: String,
    pub output_path: PathBuf,
    pub decision: OrientationDecision,
}

/// 失敗したファイル
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedFile {
    pub file_name: String,
    pub error: String,
}

/// バッチ全体の集計
///
/// corrected / already_correct は排他、manual_review はそれらと重複する。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrientStats {
    pub total: usize,
    pub corrected: usize,
    pub already_correct: usize,
    pub manual_review: usize,
    pub failed: usize,
}

impl OrientStats {
    pub fn record(&mut self, decision: &OrientationDecision) {
        self.total += 1;
        if decision.needs_rotation() {
            self.corrected += 1;
        } else {
            self.already_correct += 1;
        }
        if decision.needs_manual_review {
            self.manual_review += 1;
        }
    }

    pub fn record_failure(&mut self) {
        self.total += 1;
        self.failed += 1;
    }
}

/// バッチ実行の結果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrientReport {
    pub reference: PathBuf,
    pub threshold: f64,
    pub outcomes: Vec<OrientOutcome>,
    pub failures: Vec<FailedFile>,
    pub stats: OrientStats,
}

impl OrientReport {
    /// JSONで書き出す
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// 4候補を採点して判定する
pub fn find_best_rotation(
    scorer: &SimilarityScorer,
    candidate: &DynamicImage,
    threshold: f64,
) -> OrientationDecision {
    let candidate = strip_alpha(candidate);
    let mut scores = ScoreMap::default();

    for (rotation, rotated) in rotation_candidates(&candidate) {
        let started = Instant::now();
        let score = scorer.score(&rotated);
        let elapsed_ms = started.elapsed().as_millis() as u64;
        debug!(angle = rotation.degrees(), score, elapsed_ms, "candidate scored");
        scores.insert(rotation, score);
    }

    decide(scores, threshold)
}

/// フォルダ内の画像を一括で向き補正する
pub fn correct_folder(options: &OrientOptions, progress: &BatchProgress) -> Result<OrientReport> {
    // 閾値・参考画像・入力フォルダが不正なら何もせず中断
    validate_threshold(options.threshold)?;
    if !options.reference.is_file() {
        return Err(PhotoOrientError::FileNotFound(options.reference.display().to_string()));
    }
    if !options.input.is_dir() {
        return Err(PhotoOrientError::FolderNotFound(options.input.display().to_string()));
    }

    progress.println(format!("参考画像を読み込み中: {}", options.reference.display()));
    let reference = load_image(&options.reference)?;
    progress.println(format!("参考画像サイズ: {} x {}", reference.width(), reference.height()));
    let scorer = SimilarityScorer::new(&reference);
    drop(reference);

    let manual_dir = options.output.join(MANUAL_CHECK_DIR);
    std::fs::create_dir_all(&options.output)?;
    std::fs::create_dir_all(&manual_dir)?;

    progress.println(format!("入力フォルダ: {}", options.input.display()));
    progress.println(format!("出力フォルダ: {}", options.output.display()));
    progress.println(rule());

    let images = scanner::scan_folder(&options.input)?;
    if images.is_empty() {
        return Err(PhotoOrientError::NoImagesFound(options.input.display().to_string()));
    }
    progress.println(format!("{}枚の画像を検出\n", images.len()));
    progress.set_total(images.len());
    info!(count = images.len(), threshold = options.threshold, "orientation batch started");

    let mut report = OrientReport {
        reference: options.reference.clone(),
        threshold: options.threshold,
        outcomes: Vec::new(),
        failures: Vec::new(),
        stats: OrientStats::default(),
    };

    for (idx, info) in images.iter().enumerate() {
        progress.start(&info.file_name);
        progress.println(format!("[{}/{}] 処理: {}", idx + 1, images.len(), info.file_name));

        match process_file(info, &scorer, &options.output, &manual_dir, options.threshold) {
            Ok(outcome) => {
                print_outcome(&outcome, progress);
                report.stats.record(&outcome.decision);
                report.outcomes.push(outcome);
            }
            Err(e) => {
                warn!(file = %info.file_name, error = %e, "orientation failed");
                progress.println(format!("  ✗ 処理失敗: {}", e));
                report.stats.record_failure();
                report.failures.push(FailedFile {
                    file_name: info.file_name.clone(),
                    error: e.to_string(),
                });
            }
        }

        progress.println("");
        progress.inc();
    }

    progress.finish();
    print_summary(&report.stats, &options.output, &manual_dir, progress);

    Ok(report)
}

/// 1ファイル分: 読込 → 採点 → 判定 → 回転 → 保存
fn process_file(
    info: &ImageInfo,
    scorer: &SimilarityScorer,
    output_dir: &Path,
    manual_dir: &Path,
    threshold: f64,
) -> Result<OrientOutcome> {
    let image = load_image(&info.path)?;
    let decision = find_best_rotation(scorer, &image, threshold);

    let target_dir = if decision.needs_manual_review { manual_dir } else { output_dir };
    let output_path = target_dir.join(&info.file_name);

    // 0°でもそのままコピーを書き出す
    let rotated = decision.best_angle.apply_cow(&image);
    save_image(&rotated, &output_path)?;

    Ok(OrientOutcome {
        file_name: info.file_name.clone(),
        output_path,
        decision,
    })
}

fn print_outcome(outcome: &OrientOutcome, progress: &BatchProgress) {
    let decision = &outcome.decision;

    progress.println("  類似度分析:");
    for (rotation, score) in decision.scores.iter() {
        let marker = if rotation == decision.best_angle { "★" } else { " " };
        progress.println(format!("    {} {:>3}°: {:.4}", marker, rotation.degrees(), score));
    }
    progress.println(format!(
        "  類似度差: {:.4} (閾値: {})",
        decision.margin, decision.threshold
    ));

    let status = if decision.needs_rotation() {
        format!("  ✓ 補正: {}回転 (類似度: {:.4})", decision.best_angle, decision.best_score)
    } else {
        format!("  ✓ 向き正常: 回転不要 (類似度: {:.4})", decision.best_score)
    };

    if decision.needs_manual_review {
        progress.println("  ⚠️  警告: 複数の角度で類似度が近いため、人工確認を推奨");
        progress.println(status);
        progress.println(format!("  人工確認フォルダに保存: {}", outcome.output_path.display()));
    } else {
        progress.println(status);
        progress.println(format!("  保存先: {}", outcome.output_path.display()));
    }
}

fn print_summary(stats: &OrientStats, output_dir: &Path, manual_dir: &Path, progress: &BatchProgress) {
    progress.println(rule());
    progress.println("処理完了");
    progress.println(format!("合計: {}枚", stats.total));
    progress.println(format!("  - 補正済み: {}枚", stats.corrected));
    progress.println(format!("  - 補正不要: {}枚", stats.already_correct));
    progress.println(format!("  - 人工確認: {}枚 ⚠️", stats.manual_review));
    progress.println(format!("  - 失敗: {}枚", stats.failed));
    progress.println(format!("\n保存先: {}", output_dir.display()));

    if stats.manual_review > 0 {
        progress.println(format!(
            "\n⚠️  類似度差が小さい {}枚 を次のフォルダに保存しました:",
            stats.manual_review
        ));
        progress.println(format!("   {}", manual_dir.display()));
        progress.println("   向きが正しいか目視で確認してください");
    }
}
