use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};

use super::super::entities::Message;
use super::super::value_objects::Emotion;
use super::reply_templates::ReplyTemplateTable;
use crate::modules::chat::ports::{GeneratedReply, ReplyGenerator, ReplySource};

/// 复述用户原话的最大词数
pub const REFLECTION_MAX_WORDS: usize = 12;

/// 模板回复组合器
///
/// 确认句 + 复述 + 建议句。句子随机选取，结构固定，不依赖外部服务。
pub struct TemplateComposer {
    table: Arc<ReplyTemplateTable>,
    rng: Mutex<StdRng>,
}

impl TemplateComposer {
    pub fn new(table: Arc<ReplyTemplateTable>) -> Self {
        Self {
            table,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// 固定随机种子，相同种子与输入产生相同回复
    pub fn with_seed(table: Arc<ReplyTemplateTable>, seed: u64) -> Self {
        Self {
            table,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn table(&self) -> &ReplyTemplateTable {
        &self.table
    }

    /// 组合回复文本
    pub fn compose(&self, text: &str, emotion: Emotion) -> String {
        let entry = self.table.entry(emotion);

        let (validation, suggestion) = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            let validation = entry.validations.choose(&mut *rng).cloned();
            let suggestion = entry.suggestions.choose(&mut *rng).cloned();
            (validation, suggestion)
        };

        let parts: Vec<String> = [validation, reflect(text), suggestion]
            .into_iter()
            .flatten()
            .collect();
        parts.join(" ")
    }
}

#[async_trait]
impl ReplyGenerator for TemplateComposer {
    fn kind(&self) -> &'static str {
        "template"
    }

    async fn generate(&self, text: &str, emotion: Emotion, _history: &[Message]) -> GeneratedReply {
        GeneratedReply {
            text: self.compose(text, emotion),
            source: ReplySource::Template,
        }
    }
}

/// 复述句：引用用户消息的前 12 个词，超出时加省略号
pub fn reflect(text: &str) -> Option<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return None;
    }

    let quoted = words
        .iter()
        .take(REFLECTION_MAX_WORDS)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    let ellipsis = if words.len() > REFLECTION_MAX_WORDS {
        "..."
    } else {
        ""
    };
    Some(format!("You said: \"{}{}\"", quoted, ellipsis))
}
