use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use super::super::value_objects::{Emotion, EmotionScores};
use crate::modules::chat::ports::{EmotionModel, LabelScore};

/// 送入模型前的最大字符数
pub const MAX_CLASSIFY_CHARS: usize = 512;

/// 分类结果来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    /// 模型推理成功
    Model,
    /// 降级：关键词匹配
    Keyword,
    /// 空输入，未推理
    Empty,
}

/// 情感分类结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub emotion: Emotion,
    pub scores: EmotionScores,
    pub source: ClassificationSource,
}

impl Classification {
    fn empty() -> Self {
        Self {
            emotion: Emotion::Neutral,
            scores: EmotionScores::zeroed(),
            source: ClassificationSource::Empty,
        }
    }

    fn keyword(text: &str) -> Self {
        Self {
            emotion: Emotion::detect_from_text(text),
            scores: EmotionScores::zeroed(),
            source: ClassificationSource::Keyword,
        }
    }

    /// 从模型输出构建：取概率最高的原始标签并归一化
    fn from_predictions(predictions: &[LabelScore]) -> Option<Self> {
        let top = predictions
            .iter()
            .filter(|p| p.score.is_finite())
            .max_by(|a, b| a.score.total_cmp(&b.score))?;

        Some(Self {
            emotion: Emotion::from_model_label(&top.label),
            scores: EmotionScores::from_model_distribution(
                predictions.iter().map(|p| (p.label.as_str(), p.score)),
            ),
            source: ClassificationSource::Model,
        })
    }

    /// 是否为降级结果
    #[cfg(test)]
    pub fn is_degraded(&self) -> bool {
        self.source == ClassificationSource::Keyword
    }
}

/// 情感分类服务
///
/// 领域服务：优先使用模型推理，任何失败都退回关键词匹配，不向调用方抛错。
/// 启动时构建一次，之后只读共享。
#[derive(Clone, Default)]
pub struct EmotionClassifier {
    model: Option<Arc<dyn EmotionModel>>,
}

impl EmotionClassifier {
    /// 仅使用关键词匹配
    pub fn keyword_only() -> Self {
        Self { model: None }
    }

    /// 使用模型推理，失败时退回关键词匹配
    pub fn with_model(model: Arc<dyn EmotionModel>) -> Self {
        Self { model: Some(model) }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// 分类文本情感
    pub async fn classify(&self, text: &str) -> Classification {
        let text = text.trim();
        if text.is_empty() {
            return Classification::empty();
        }

        let Some(model) = &self.model else {
            return Classification::keyword(text);
        };

        let bounded = truncate_chars(text, MAX_CLASSIFY_CHARS);
        match model.predict(bounded).await {
            Ok(predictions) => match Classification::from_predictions(&predictions) {
                Some(classification) => {
                    debug!(
                        "[EmotionClassifier] {} -> {}",
                        model.model_id(),
                        classification.emotion
                    );
                    classification
                }
                None => {
                    warn!(
                        "[EmotionClassifier] {} returned no usable scores, using keywords",
                        model.model_id()
                    );
                    Classification::keyword(text)
                }
            },
            Err(e) => {
                warn!(
                    "[EmotionClassifier] {} failed, using keywords: {}",
                    model.model_id(),
                    e
                );
                Classification::keyword(text)
            }
        }
    }
}

/// 按字符截断（不会切断 UTF-8 字符）
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::chat::ports::ModelError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 返回固定分布并记录输入的模型
    struct FixedModel {
        predictions: Vec<LabelScore>,
        seen: Mutex<Vec<String>>,
    }

    impl FixedModel {
        fn new(predictions: Vec<LabelScore>) -> Self {
            Self {
                predictions,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl EmotionModel for FixedModel {
        fn model_id(&self) -> &str {
            "fixed"
        }

        async fn predict(&self, text: &str) -> Result<Vec<LabelScore>, ModelError> {
            self.seen.lock().unwrap().push(text.to_string());
            Ok(self.predictions.clone())
        }
    }

    struct BrokenModel;

    #[async_trait]
    impl EmotionModel for BrokenModel {
        fn model_id(&self) -> &str {
            "broken"
        }

        async fn predict(&self, _text: &str) -> Result<Vec<LabelScore>, ModelError> {
            Err(ModelError::NetworkError("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_blank_input_is_neutral_without_inference() {
        let model = Arc::new(FixedModel::new(vec![LabelScore::new("joy", 1.0)]));
        let classifier = EmotionClassifier::with_model(model.clone());

        for text in ["", "   ", "\n\t"] {
            let result = classifier.classify(text).await;
            assert_eq!(result.emotion, Emotion::Neutral);
            assert!(result.scores.is_zero());
            assert_eq!(result.source, ClassificationSource::Empty);
        }
        assert!(model.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_keyword_only_classifier() {
        let classifier = EmotionClassifier::keyword_only();
        let result = classifier
            .classify("I feel really sad and lonely today")
            .await;

        assert_eq!(result.emotion, Emotion::Sad);
        assert!(result.scores.is_zero());
        assert!(result.is_degraded());
    }

    #[tokio::test]
    async fn test_model_top_label_is_normalized() {
        let model = Arc::new(FixedModel::new(vec![
            LabelScore::new("joy", 0.1),
            LabelScore::new("fear", 0.7),
            LabelScore::new("sadness", 0.2),
        ]));
        let classifier = EmotionClassifier::with_model(model);

        let result = classifier.classify("exam tomorrow").await;

        assert_eq!(result.emotion, Emotion::Anxious);
        assert_eq!(result.source, ClassificationSource::Model);
        assert!((result.scores.get(Emotion::Anxious) - 0.7).abs() < 1e-6);
        assert!((result.scores.get(Emotion::Sad) - 0.2).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_model_failure_falls_back_to_keywords() {
        let classifier = EmotionClassifier::with_model(Arc::new(BrokenModel));
        let result = classifier.classify("I am so angry right now").await;

        assert_eq!(result.emotion, Emotion::Angry);
        assert_eq!(result.source, ClassificationSource::Keyword);
        assert!(result.scores.is_zero());
    }

    #[tokio::test]
    async fn test_empty_prediction_falls_back_to_keywords() {
        let classifier = EmotionClassifier::with_model(Arc::new(FixedModel::new(vec![])));
        let result = classifier.classify("nothing much").await;

        assert_eq!(result.emotion, Emotion::Neutral);
        assert!(result.is_degraded());
    }

    #[tokio::test]
    async fn test_input_is_truncated_before_inference() {
        let model = Arc::new(FixedModel::new(vec![LabelScore::new("neutral", 0.9)]));
        let classifier = EmotionClassifier::with_model(model.clone());

        let long = "é".repeat(MAX_CLASSIFY_CHARS + 100);
        classifier.classify(&long).await;

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen[0].chars().count(), MAX_CLASSIFY_CHARS);
    }

    #[test]
    fn test_truncate_chars_short_input() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 2), "he");
    }
}
