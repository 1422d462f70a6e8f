use tracing_subscriber::EnvFilter;

/// 診断ログの初期化（RUST_LOG があればそれを優先）
///
/// 処理レポートは標準出力、診断ログは標準エラーに出す。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("photo_orient={}", default_level)));

    // テストなどで二重初期化されても無視する
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
