use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 情感类型
///
/// 值对象：全系统统一使用的规范情感标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    /// 悲伤
    Sad,
    /// 开心
    Happy,
    /// 愤怒
    Angry,
    /// 焦虑
    Anxious,
    /// 爱
    Love,
    /// 惊讶
    Surprised,
    /// 中性
    Neutral,
}

/// 模型标签归一化表，按顺序做子串匹配
static MODEL_LABEL_ALIASES: &[(&[&str], Emotion)] = &[
    (&["sad"], Emotion::Sad),
    (&["joy", "happy", "happiness"], Emotion::Happy),
    (&["anger", "angry"], Emotion::Angry),
    (&["fear", "anxious", "anxiety", "panic"], Emotion::Anxious),
    (&["love"], Emotion::Love),
    (&["surprise"], Emotion::Surprised),
];

/// 关键词降级检测表，顺序即优先级
static FALLBACK_KEYWORDS: &[(Emotion, &[&str])] = &[
    (Emotion::Sad, &["sad", "unhappy", "depressed", "cry", "lonely"]),
    (Emotion::Happy, &["happy", "glad", "awesome", "great", "joy"]),
    (Emotion::Angry, &["angry", "mad", "furious", "annoyed", "hate"]),
    (Emotion::Anxious, &["anxious", "scared", "nervous", "worried", "panic"]),
    (Emotion::Love, &["love", "luv"]),
    (
        Emotion::Surprised,
        &["surprised", "shocked", "astonished", "unexpected"],
    ),
];

impl Emotion {
    /// 获取所有可用的情感类型
    pub fn all() -> &'static [Emotion] {
        &[
            Emotion::Sad,
            Emotion::Happy,
            Emotion::Angry,
            Emotion::Anxious,
            Emotion::Love,
            Emotion::Surprised,
            Emotion::Neutral,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Sad => "sad",
            Emotion::Happy => "happy",
            Emotion::Angry => "angry",
            Emotion::Anxious => "anxious",
            Emotion::Love => "love",
            Emotion::Surprised => "surprised",
            Emotion::Neutral => "neutral",
        }
    }

    /// 将模型输出的标签（如 "sadness"、"joy"）归一化为规范标签
    ///
    /// 未识别的标签（如 "disgust"）归为 Neutral
    pub fn from_model_label(label: &str) -> Self {
        let label = label.to_lowercase();
        MODEL_LABEL_ALIASES
            .iter()
            .find(|(aliases, _)| aliases.iter().any(|alias| label.contains(alias)))
            .map(|(_, emotion)| *emotion)
            .unwrap_or(Emotion::Neutral)
    }

    /// 宽松解析：未知标签一律视为 Neutral
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }

    /// 关键词子串匹配检测情感（模型不可用时的降级路径）
    pub fn detect_from_text(text: &str) -> Self {
        let text_lower = text.to_lowercase();

        FALLBACK_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|kw| text_lower.contains(kw)))
            .map(|(emotion, _)| *emotion)
            .unwrap_or(Emotion::Neutral)
    }

    /// 降级检测使用的关键词
    #[cfg(test)]
    pub fn fallback_keywords(&self) -> &'static [&'static str] {
        FALLBACK_KEYWORDS
            .iter()
            .find(|(emotion, _)| emotion == self)
            .map(|(_, keywords)| *keywords)
            .unwrap_or(&[])
    }
}

impl Default for Emotion {
    fn default() -> Self {
        Self::Neutral
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sad" => Ok(Emotion::Sad),
            "happy" => Ok(Emotion::Happy),
            "angry" => Ok(Emotion::Angry),
            "anxious" => Ok(Emotion::Anxious),
            "love" => Ok(Emotion::Love),
            "surprised" => Ok(Emotion::Surprised),
            "neutral" => Ok(Emotion::Neutral),
            _ => Err(format!("Unknown emotion: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_detection() {
        assert_eq!(
            Emotion::detect_from_text("I feel really sad and lonely today"),
            Emotion::Sad
        );
        assert_eq!(Emotion::detect_from_text("So GLAD it worked"), Emotion::Happy);
        assert_eq!(Emotion::detect_from_text("I am furious"), Emotion::Angry);
        assert_eq!(Emotion::detect_from_text("worried about exams"), Emotion::Anxious);
        assert_eq!(Emotion::detect_from_text("luv you"), Emotion::Love);
        assert_eq!(Emotion::detect_from_text("I was shocked"), Emotion::Surprised);
        assert_eq!(Emotion::detect_from_text("the bus is late"), Emotion::Neutral);
    }

    #[test]
    fn test_every_keyword_maps_to_its_category() {
        for emotion in Emotion::all() {
            for keyword in emotion.fallback_keywords() {
                let text = format!("well, {} it is", keyword);
                assert_eq!(
                    Emotion::detect_from_text(&text),
                    *emotion,
                    "keyword {:?}",
                    keyword
                );
            }
        }
    }

    #[test]
    fn test_keyword_priority_order() {
        // sad 优先于 happy
        assert_eq!(
            Emotion::detect_from_text("happy but also sad"),
            Emotion::Sad
        );
    }

    #[test]
    fn test_model_label_normalization() {
        assert_eq!(Emotion::from_model_label("sadness"), Emotion::Sad);
        assert_eq!(Emotion::from_model_label("JOY"), Emotion::Happy);
        assert_eq!(Emotion::from_model_label("anger"), Emotion::Angry);
        assert_eq!(Emotion::from_model_label("fear"), Emotion::Anxious);
        assert_eq!(Emotion::from_model_label("love"), Emotion::Love);
        assert_eq!(Emotion::from_model_label("surprise"), Emotion::Surprised);
        assert_eq!(Emotion::from_model_label("disgust"), Emotion::Neutral);
        assert_eq!(Emotion::from_model_label("neutral"), Emotion::Neutral);
    }

    #[test]
    fn test_lenient_label_parsing() {
        assert_eq!(Emotion::from_label("Anxious"), Emotion::Anxious);
        assert_eq!(Emotion::from_label("confused"), Emotion::Neutral);
        assert!("confused".parse::<Emotion>().is_err());
    }

    #[test]
    fn test_display_matches_serde() {
        for emotion in Emotion::all() {
            let json = serde_json::to_string(emotion).unwrap();
            assert_eq!(json, format!("\"{}\"", emotion));
        }
    }
}
