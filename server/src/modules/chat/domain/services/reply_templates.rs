use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

use super::super::value_objects::Emotion;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template table has no neutral entry")]
    MissingNeutral,

    #[error("template entry for {emotion} has no {kind} sentences")]
    EmptyList {
        emotion: Emotion,
        kind: &'static str,
    },

    #[error("invalid template table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// 某一情感的候选句子
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateEntry {
    #[serde(rename = "validation")]
    pub validations: Vec<String>,
    #[serde(rename = "suggestion")]
    pub suggestions: Vec<String>,
}

impl TemplateEntry {
    fn from_static(validations: &[&str], suggestions: &[&str]) -> Self {
        Self {
            validations: validations.iter().map(|s| s.to_string()).collect(),
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// 回复模板表
///
/// 情感 -> (确认句, 建议句)，启动时构建一次，只读。
/// 保证存在非空的 neutral 条目。
#[derive(Debug, Clone)]
pub struct ReplyTemplateTable {
    neutral: TemplateEntry,
    entries: HashMap<Emotion, TemplateEntry>,
}

static BUILTIN_TEMPLATES: &[(Emotion, &[&str], &[&str])] = &[
    (
        Emotion::Sad,
        &[
            "I'm really sorry you're going through this. That sounds really heavy.",
            "That must be so difficult—thank you for sharing that with me.",
        ],
        &[
            "Would you like a quick breathing exercise? Or would you like to tell me more about what happened?",
            "Sometimes writing one sentence about what you feel can help. Want to try?",
        ],
    ),
    (
        Emotion::Angry,
        &[
            "I can hear the anger in your words. It's valid to feel upset.",
            "Anger is a natural reaction. I'm here to listen without judgement.",
        ],
        &[
            "A slow 4-4-4 breathing can help calm: breathe in 4s, hold 4s, out 4s. Want to try?",
            "If it helps, you can name one thing you can change about the situation and one you can't.",
        ],
    ),
    (
        Emotion::Anxious,
        &[
            "Being anxious feels overwhelming—you're not alone in that.",
            "I hear that worry. Let's try something grounding together if you're open to it.",
        ],
        &[
            "Try grounding: name 5 things you can see, 4 you can touch, 3 you can hear.",
            "Shallow breathing makes anxiety worse—slow deep breaths often help.",
        ],
    ),
    (
        Emotion::Happy,
        &[
            "That's wonderful to hear—thank you for sharing your joy!",
            "I'm so glad you're feeling good. What made you feel this way?",
        ],
        &[
            "Would you like me to save this as a happy memory in your journal?",
            "Want to celebrate? I can share a short compliment or a motivating quote.",
        ],
    ),
    (
        Emotion::Love,
        &[
            "That's lovely — feeling connected is so meaningful.",
            "I'm happy you have something or someone bringing you warmth.",
        ],
        &[
            "That's heartwarming. Would you like to reflect on what made this connection strong?",
            "Would you like to note this as a positive memory?",
        ],
    ),
    (
        Emotion::Surprised,
        &[
            "Oh—that sounds surprising. Want to tell me more?",
            "That must have been unexpected. How are you processing it?",
        ],
        &[
            "Do you want to unpack what surprised you and how you feel about it?",
            "If it's good surprise—congratulations! If it's not, I'm here to listen.",
        ],
    ),
];

static NEUTRAL_VALIDATIONS: &[&str] = &[
    "I'm here and listening—tell me more if you'd like.",
    "Thanks for sharing. What else is on your mind?",
];

static NEUTRAL_SUGGESTIONS: &[&str] = &[
    "Would you like a prompt to help share more—like 'What happened today?'",
    "We can try a short check-in exercise if you'd like.",
];

impl ReplyTemplateTable {
    /// 校验并创建模板表
    pub fn new(mut entries: HashMap<Emotion, TemplateEntry>) -> Result<Self, TemplateError> {
        for (emotion, entry) in &entries {
            if entry.validations.is_empty() {
                return Err(TemplateError::EmptyList {
                    emotion: *emotion,
                    kind: "validation",
                });
            }
            if entry.suggestions.is_empty() {
                return Err(TemplateError::EmptyList {
                    emotion: *emotion,
                    kind: "suggestion",
                });
            }
        }
        let neutral = entries
            .remove(&Emotion::Neutral)
            .ok_or(TemplateError::MissingNeutral)?;
        Ok(Self { neutral, entries })
    }

    /// 内置模板表（覆盖全部规范情感）
    pub fn builtin() -> Self {
        let entries = BUILTIN_TEMPLATES
            .iter()
            .map(|(emotion, validations, suggestions)| {
                (*emotion, TemplateEntry::from_static(validations, suggestions))
            })
            .collect();
        Self {
            neutral: TemplateEntry::from_static(NEUTRAL_VALIDATIONS, NEUTRAL_SUGGESTIONS),
            entries,
        }
    }

    /// 从 JSON 解析：`{"sad": {"validation": [...], "suggestion": [...]}, ...}`
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        let entries: HashMap<Emotion, TemplateEntry> = serde_json::from_str(json)?;
        Self::new(entries)
    }

    /// 获取情感对应的模板，没有条目时退回 neutral
    pub fn entry(&self, emotion: Emotion) -> &TemplateEntry {
        self.entries.get(&emotion).unwrap_or(&self.neutral)
    }

    pub fn contains(&self, emotion: Emotion) -> bool {
        emotion == Emotion::Neutral || self.entries.contains_key(&emotion)
    }
}

impl Default for ReplyTemplateTable {
    fn default() -> Self {
        Self::builtin()
    }
}
