use crate::error::{PhotoOrientError, Result};
use crate::split::SplitDirection;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 曖昧判定の既定閾値（最良角度と次点の差が1.5%未満なら人工確認）
pub const DEFAULT_AMBIGUITY_THRESHOLD: f64 = 0.015;

/// 白と見なすグレー値の既定閾値
pub const DEFAULT_WHITE_THRESHOLD: u8 = 250;

/// トリミング後に残す余白（px）
pub const DEFAULT_CROP_PADDING: u32 = 10;

/// 三分割で残す部分（1始まり）
pub const DEFAULT_SPLIT_PART: u8 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub reference_image: Option<PathBuf>,
    pub ambiguity_threshold: f64,
    pub white_threshold: u8,
    pub crop_padding: u32,
    pub split_part: u8,
    pub split_direction: SplitDirection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reference_image: None,
            ambiguity_threshold: DEFAULT_AMBIGUITY_THRESHOLD,
            white_threshold: DEFAULT_WHITE_THRESHOLD,
            crop_padding: DEFAULT_CROP_PADDING,
            split_part: DEFAULT_SPLIT_PART,
            split_direction: SplitDirection::Horizontal,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスから読み込み（存在しなければ既定値）
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PhotoOrientError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("photo-orient").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.ambiguity_threshold) {
            return Err(PhotoOrientError::Config(format!(
                "ambiguity_threshold は 0.0〜1.0 で指定してください: {}",
                self.ambiguity_threshold
            )));
        }
        if !(1..=3).contains(&self.split_part) {
            return Err(PhotoOrientError::Config(format!(
                "split_part は 1, 2, 3 のいずれか: {}",
                self.split_part
            )));
        }
        Ok(())
    }

    pub fn set_reference(&mut self, path: PathBuf) -> Result<()> {
        self.reference_image = Some(path);
        self.save()
    }

    pub fn set_threshold(&mut self, threshold: f64) -> Result<()> {
        self.ambiguity_threshold = threshold;
        self.validate()?;
        self.save()
    }
}
