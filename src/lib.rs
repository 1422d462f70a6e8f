//! photo-orient
//!
//! 参考画像との構造的類似度で写真の向きを補正するツールと、
//! 余白トリミング・三分割・人工確認修正の補助ツール群

pub mod batch;
pub mod cli;
pub mod config;
pub mod crop;
pub mod error;
pub mod fix;
pub mod imageio;
pub mod logging;
pub mod orient;
pub mod progress;
pub mod scanner;
pub mod split;

pub use error::{PhotoOrientError, Result};
