//! バッチ処理の進捗表示
//!
//! 進捗バーは標準エラー、処理ログは標準出力に出す。
//! ログ行はバーを一時的に退避してから出力するのでバーが崩れない。

use indicatif::{ProgressBar, ProgressStyle};

pub struct BatchProgress {
    bar: ProgressBar,
}

impl Default for BatchProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        Self { bar }
    }

    /// 進捗バーなし（テスト・ライブラリ利用向け）
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// 対象枚数が決まったら設定する
    pub fn set_total(&self, total: usize) {
        self.bar.set_length(total as u64);
    }

    pub fn println(&self, line: impl AsRef<str>) {
        let line = line.as_ref();
        self.bar.suspend(|| println!("{}", line));
    }

    pub fn start(&self, file_name: &str) {
        self.bar.set_message(file_name.to_string());
    }

    pub fn inc(&self) {
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

/// 区切り線
pub fn rule() -> String {
    "=".repeat(70)
}
