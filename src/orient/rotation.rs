//! 回転候補の生成
//!
//! 0°, 90°, 180°, 270° の4候補をこの順で1回だけ生成する。
//! 角度はすべて時計回り。

use image::DynamicImage;
use serde::Serialize;
use std::borrow::Cow;

/// 候補となる回転角（時計回り）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Rotation {
    #[serde(rename = "0")]
    Deg0,
    #[serde(rename = "90")]
    Deg90,
    #[serde(rename = "180")]
    Deg180,
    #[serde(rename = "270")]
    Deg270,
}

impl Rotation {
    /// 生成順（同点時はこの順で先のものが優先）
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// 元に戻す回転
    pub fn inverse(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg0,
            Rotation::Deg90 => Rotation::Deg270,
            Rotation::Deg180 => Rotation::Deg180,
            Rotation::Deg270 => Rotation::Deg90,
        }
    }

    /// 画像を回転する。キャンバスは回転後の内容に合わせて広がり、欠けも劣化もない
    pub fn apply(self, image: &DynamicImage) -> DynamicImage {
        match self {
            Rotation::Deg0 => image.clone(),
            Rotation::Deg90 => image.rotate90(),
            Rotation::Deg180 => image.rotate180(),
            Rotation::Deg270 => image.rotate270(),
        }
    }

    /// 0°はコピーせず借用のまま返す
    pub fn apply_cow(self, image: &DynamicImage) -> Cow<'_, DynamicImage> {
        match self {
            Rotation::Deg0 => Cow::Borrowed(image),
            other => Cow::Owned(other.apply(image)),
        }
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// 4つの回転候補を遅延生成する
pub fn rotation_candidates(
    image: &DynamicImage,
) -> impl Iterator<Item = (Rotation, Cow<'_, DynamicImage>)> + '_ {
    Rotation::ALL
        .into_iter()
        .map(move |rotation| (rotation, rotation.apply_cow(image)))
}
