use crate::split::SplitDirection;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "photo-orient")]
#[command(about = "参考画像ベースの写真向き補正・余白トリミング・三分割ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 進捗バーを表示しない
    #[arg(long, global = true)]
    pub no_progress: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 参考画像と比較して向きを補正
    Orient {
        /// 入力フォルダ
        #[arg(default_value = "input")]
        input: PathBuf,

        /// 出力フォルダ（あいまいな画像は manual_check に保存）
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// 参考画像（省略時は設定ファイルの値）
        #[arg(short, long)]
        reference: Option<PathBuf>,

        /// 最良と次点の類似度差がこれ未満なら人工確認
        #[arg(short, long)]
        threshold: Option<f64>,

        /// 判定結果をJSONで保存
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// 白い余白をトリミング
    Crop {
        /// 入力フォルダまたは画像ファイル
        #[arg(default_value = "output")]
        input: PathBuf,

        /// 出力先（フォルダ時のデフォルト: output_cropped、ファイル時: <名前>_cropped）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 白とみなす閾値（0-255）
        #[arg(short, long)]
        threshold: Option<u8>,

        /// 残す余白（px）
        #[arg(short, long)]
        padding: Option<u32>,
    },

    /// 三等分して指定部分だけを保存
    Split {
        /// 入力フォルダまたは画像ファイル
        #[arg(default_value = "output_cropped")]
        input: PathBuf,

        /// 出力フォルダ
        #[arg(short, long, default_value = "output_split")]
        output: PathBuf,

        /// 残す部分（1/2/3）
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=3))]
        part: Option<u8>,

        /// 分割方向 (horizontal/vertical)
        #[arg(short, long)]
        direction: Option<SplitDirection>,
    },

    /// 人工確認フォルダの画像を180°回転して出力フォルダへ戻す
    FixManual {
        /// 人工確認フォルダ
        #[arg(long, default_value = "output/manual_check")]
        manual_dir: PathBuf,

        /// 移動先フォルダ
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// 確認せずに実行
        #[arg(short, long)]
        yes: bool,
    },

    /// 設定を表示/編集
    Config {
        /// 既定の参考画像を設定
        #[arg(long)]
        set_reference: Option<PathBuf>,

        /// 既定の閾値を設定
        #[arg(long)]
        set_threshold: Option<f64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
