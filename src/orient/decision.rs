//! 向き判定ポリシー
//!
//! 4角度のスコアから最良角度を選び、次点との差が閾値未満なら人工確認に回す。

use super::rotation::Rotation;
use crate::error::{PhotoOrientError, Result};
use serde::{Serialize, Serializer};

/// 角度→スコアの対応（生成順 0, 90, 180, 270 を保持）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreMap {
    scores: [f64; 4],
}

impl ScoreMap {
    pub fn new(scores: [f64; 4]) -> Self {
        Self { scores }
    }

    pub fn insert(&mut self, rotation: Rotation, score: f64) {
        self.scores[Self::index(rotation)] = score;
    }

    pub fn get(&self, rotation: Rotation) -> f64 {
        self.scores[Self::index(rotation)]
    }

    /// 生成順に列挙
    pub fn iter(&self) -> impl Iterator<Item = (Rotation, f64)> + '_ {
        Rotation::ALL.into_iter().zip(self.scores.iter().copied())
    }

    /// 最大スコアの角度（同点は生成順で先のもの）
    pub fn best(&self) -> (Rotation, f64) {
        let mut best = (Rotation::Deg0, self.scores[0]);
        for (rotation, score) in self.iter().skip(1) {
            if score > best.1 {
                best = (rotation, score);
            }
        }
        best
    }

    /// 降順に並べた2番目の値（最良と同値のものも数える）
    pub fn second_best(&self) -> f64 {
        let mut sorted = self.scores;
        sorted.sort_by(|a, b| b.total_cmp(a));
        sorted[1]
    }

    fn index(rotation: Rotation) -> usize {
        match rotation {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 1,
            Rotation::Deg180 => 2,
            Rotation::Deg270 => 3,
        }
    }
}

impl Serialize for ScoreMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(r, s)| (r.degrees().to_string(), s)))
    }
}

/// 1画像分の判定結果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrientationDecision {
    pub best_angle: Rotation,
    pub best_score: f64,
    pub second_best_score: f64,
    pub margin: f64,
    pub threshold: f64,
    pub needs_manual_review: bool,
    pub scores: ScoreMap,
}

impl OrientationDecision {
    /// 回転が必要か（0°以外）
    pub fn needs_rotation(&self) -> bool {
        self.best_angle != Rotation::Deg0
    }
}

/// 閾値は 0.0〜1.0 のみ受け付ける（NaN は範囲外）
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(PhotoOrientError::InvalidArgument(format!(
            "閾値は 0.0〜1.0 で指定してください: {}",
            threshold
        )));
    }
    Ok(())
}

/// スコアから判定を作る
///
/// 差 == 閾値 はあいまいとしない（厳密な未満比較）。
pub fn decide(scores: ScoreMap, threshold: f64) -> OrientationDecision {
    let (best_angle, best_score) = scores.best();
    let second_best_score = scores.second_best();
    let margin = best_score - second_best_score;

    OrientationDecision {
        best_angle,
        best_score,
        second_best_score,
        margin,
        threshold,
        needs_manual_review: margin < threshold,
        scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_is_max() {
        let decision = decide(ScoreMap::new([0.2, 0.9, 0.3, 0.1]), 0.015);
        assert_eq!(decision.best_angle, Rotation::Deg90);
        assert_eq!(decision.best_score, 0.9);
        assert_eq!(decision.second_best_score, 0.3);
        assert!((decision.margin - 0.6).abs() < 1e-12);
        assert!(!decision.needs_manual_review);
        assert!(decision.needs_rotation());
    }

    #[test]
    fn test_tie_prefers_earlier_angle() {
        let decision = decide(ScoreMap::new([0.1, 0.7, 0.2, 0.7]), 0.015);
        assert_eq!(decision.best_angle, Rotation::Deg90);
        assert_eq!(decision.margin, 0.0);
        assert!(decision.needs_manual_review);
    }

    #[test]
    fn test_all_equal_scores_need_review() {
        let decision = decide(ScoreMap::new([0.5; 4]), 0.015);
        assert_eq!(decision.best_angle, Rotation::Deg0);
        assert_eq!(decision.margin, 0.0);
        assert!(decision.needs_manual_review);
        assert!(!decision.needs_rotation());
    }

    #[test]
    fn test_margin_equal_to_threshold_is_not_ambiguous() {
        let decision = decide(ScoreMap::new([0.5, 0.25, 0.0, 0.0]), 0.25);
        assert_eq!(decision.margin, 0.25);
        assert!(!decision.needs_manual_review);
    }

    #[test]
    fn test_margin_just_below_threshold_is_ambiguous() {
        let decision = decide(ScoreMap::new([0.5, 0.25, 0.0, 0.0]), 0.250001);
        assert!(decision.needs_manual_review);
    }

    #[test]
    fn test_best_score_consistent_with_map() {
        let cases = [
            [0.3, 0.2, 0.1, 0.0],
            [0.0, 0.0, 0.4, 0.4],
            [0.9, 0.95, 0.95, 0.1],
            [0.0, 0.0, 0.0, 0.0],
        ];
        for scores in cases {
            let decision = decide(ScoreMap::new(scores), 0.015);
            let max = scores.iter().cloned().fold(f64::MIN, f64::max);
            assert_eq!(decision.best_score, max);
            assert_eq!(decision.scores.get(decision.best_angle), max);

            let first_max = scores.iter().position(|&s| s == max).unwrap();
            assert_eq!(decision.best_angle, Rotation::ALL[first_max]);
        }
    }

    #[test]
    fn test_insert_and_iter_order() {
        let mut map = ScoreMap::default();
        map.insert(Rotation::Deg270, 0.4);
        map.insert(Rotation::Deg0, 0.1);
        let collected: Vec<_> = map.iter().collect();
        assert_eq!(collected[0], (Rotation::Deg0, 0.1));
        assert_eq!(collected[3], (Rotation::Deg270, 0.4));
    }

    #[test]
    fn test_serialize_score_map() {
        let json = serde_json::to_value(ScoreMap::new([0.5, 0.25, 0.0, 1.0])).unwrap();
        assert_eq!(json["0"], 0.5);
        assert_eq!(json["270"], 1.0);
    }

    #[test]
    fn test_validate_threshold() {
        assert!(validate_threshold(0.0).is_ok());
        assert!(validate_threshold(0.015).is_ok());
        assert!(validate_threshold(1.0).is_ok());
        assert!(matches!(
            validate_threshold(f64::NAN),
            Err(PhotoOrientError::InvalidArgument(_))
        ));
        assert!(validate_threshold(-0.1).is_err());
        assert!(validate_threshold(1.5).is_err());
        assert!(validate_threshold(f64::INFINITY).is_err());
    }
}
