use clap::Parser;
use photo_orient::{cli, config, crop, error, fix, logging, orient, progress, split};
use cli::{Cli, Commands};
use config::Config;
use error::{PhotoOrientError, Result};
use progress::{rule, BatchProgress};
use std::path::PathBuf;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    let config = Config::load()?;

    let new_progress = || {
        if cli.no_progress {
            BatchProgress::hidden()
        } else {
            BatchProgress::new()
        }
    };

    match cli.command {
        Commands::Orient { input, output, reference, threshold, report } => {
            println!("{}", rule());
            println!("🧭 photo-orient - 向き自動補正");
            println!("{}\n", rule());

            let reference = reference
                .or_else(|| config.reference_image.clone())
                .ok_or_else(|| PhotoOrientError::Config(
                    "参考画像が指定されていません。`--reference` または `photo-orient config --set-reference` で設定してください".into(),
                ))?;

            let options = orient::OrientOptions {
                input,
                output,
                reference,
                threshold: threshold.unwrap_or(config.ambiguity_threshold),
            };

            let result = orient::correct_folder(&options, &new_progress())?;

            if let Some(report_path) = report {
                result.write_json(&report_path)?;
                println!("\n✔ 判定結果を保存: {}", report_path.display());
            }
        }

        Commands::Crop { input, output, threshold, padding } => {
            println!("{}", rule());
            println!("✂️  photo-orient - 白余白トリミング");
            println!("{}\n", rule());

            let threshold = threshold.unwrap_or(config.white_threshold);
            let padding = padding.unwrap_or(config.crop_padding);

            if input.is_file() {
                let output = output.unwrap_or_else(|| crop::default_single_output(&input));
                println!("処理: {}", input.display());
                println!("{}", rule());
                crop::crop_file(&input, &output, threshold, padding, &BatchProgress::hidden())?;
                println!("✓ 保存先: {}", output.display());
            } else {
                let output = output.unwrap_or_else(|| PathBuf::from("output_cropped"));
                crop::crop_folder(&input, &output, threshold, padding, &new_progress())?;
            }
        }

        Commands::Split { input, output, part, direction } => {
            println!("{}", rule());
            println!("🔪 photo-orient - 三分割抽出");
            println!("{}\n", rule());

            let part = part.unwrap_or(config.split_part);
            let direction = direction.unwrap_or(config.split_direction);

            if input.is_file() {
                println!("処理: {}", input.display());
                let saved = split::split_file(&input, &output, part, direction, &BatchProgress::hidden())?;
                println!("✓ 保存先: {}", saved.display());
            } else {
                split::split_folder(&input, &output, part, direction, &new_progress())?;
            }
        }

        Commands::FixManual { manual_dir, output, yes } => {
            println!("{}", rule());
            println!("🔄 photo-orient - 人工確認フォルダの修正（180°回転）");
            println!("{}\n", rule());

            if !yes && !fix::confirm(&manual_dir)? {
                println!("キャンセルしました");
                return Ok(());
            }

            fix::fix_manual_check(&manual_dir, &output, &new_progress())?;
        }

        Commands::Config { set_reference, set_threshold, show } => {
            let mut config = config;

            if let Some(path) = set_reference {
                config.set_reference(path)?;
                println!("✔ 参考画像を設定しました");
            }

            if let Some(threshold) = set_threshold {
                config.set_threshold(threshold)?;
                println!("✔ 閾値を設定しました");
            }

            if show {
                println!("設定:");
                println!(
                    "  参考画像: {}",
                    config
                        .reference_image
                        .as_ref()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "未設定".into())
                );
                println!("  類似度差の閾値: {}", config.ambiguity_threshold);
                println!("  白の閾値: {}", config.white_threshold);
                println!("  余白: {}px", config.crop_padding);
                println!("  三分割: 第{}部分 ({})", config.split_part, config.split_direction);
            }
        }
    }

    Ok(())
}
