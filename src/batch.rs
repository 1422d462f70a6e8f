//! トリミング・三分割・人工確認修正で共通の集計

use crate::progress::{rule, BatchProgress};
use std::path::Path;

/// 成功・失敗の集計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }
}

pub fn print_summary(summary: &BatchSummary, output: &Path, progress: &BatchProgress) {
    progress.println(rule());
    progress.println("処理完了");
    progress.println(format!("合計: {}枚", summary.total));
    progress.println(format!("  - 成功: {}枚", summary.succeeded));
    progress.println(format!("  - 失敗: {}枚", summary.failed));
    progress.println(format!("\n保存先: {}", output.display()));
}
