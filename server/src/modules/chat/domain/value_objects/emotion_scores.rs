use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Emotion;

/// 情感分数分布
///
/// 值对象：每个规范情感标签对应一个 [0, 1] 区间的分数，始终包含全部标签
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmotionScores(BTreeMap<Emotion, f32>);

impl EmotionScores {
    /// 全零分布（空输入或降级检测时使用）
    pub fn zeroed() -> Self {
        Self(Emotion::all().iter().map(|e| (*e, 0.0)).collect())
    }

    /// 从模型原始标签分布构建，原始标签归一化后累加到对应的规范标签
    pub fn from_model_distribution<'a, I>(distribution: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f32)>,
    {
        let mut scores = Self::zeroed();
        for (label, score) in distribution {
            if !score.is_finite() {
                continue;
            }
            let bucket = scores.0.entry(Emotion::from_model_label(label)).or_insert(0.0);
            *bucket = (*bucket + score).clamp(0.0, 1.0);
        }
        scores
    }

    pub fn get(&self, emotion: Emotion) -> f32 {
        self.0.get(&emotion).copied().unwrap_or(0.0)
    }

    pub fn is_zero(&self) -> bool {
        self.0.values().all(|score| *score == 0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f32)> + '_ {
        self.0.iter().map(|(e, s)| (*e, *s))
    }
}

impl Default for EmotionScores {
    fn default() -> Self {
        Self::zeroed()
    }
}
