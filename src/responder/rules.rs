//! Canned reply tables

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// A topic keyword and the reply it triggers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TopicRule {
    pub topic: String,
    pub reply: String,
}

impl TopicRule {
    #[must_use]
    pub fn new(topic: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            reply: reply.into(),
        }
    }
}

/// Errors loading a rule table from disk
#[derive(Debug, Error)]
pub enum RuleTableError {
    #[error("Cannot read rule file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("Malformed rule file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("Rule {index} has an empty topic")]
    EmptyTopic { index: usize },
}

/// Ordered topic rules. Declaration order decides which topic wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    rules: Vec<TopicRule>,
}

impl RuleTable {
    /// # Errors
    ///
    /// Returns [`RuleTableError::EmptyTopic`] if any topic is blank.
    pub fn new(rules: Vec<TopicRule>) -> Result<Self, RuleTableError> {
        if let Some(index) = rules.iter().position(|r| r.topic.trim().is_empty()) {
            return Err(RuleTableError::EmptyTopic { index });
        }
        Ok(Self { rules })
    }

    /// The table shipped with the demo
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            rules: BUILTIN_TOPICS
                .iter()
                .map(|(topic, reply)| TopicRule::new(*topic, *reply))
                .collect(),
        }
    }

    /// Load a JSON array of `{"topic", "reply"}` objects
    ///
    /// # Errors
    ///
    /// [`RuleTableError::Read`] or [`RuleTableError::Parse`] for I/O and JSON
    /// failures; blank topics are rejected as in [`RuleTable::new`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, RuleTableError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| RuleTableError::Read {
            path: display.clone(),
            source,
        })?;
        let rules: Vec<TopicRule> =
            serde_json::from_str(&raw).map_err(|source| RuleTableError::Parse {
                path: display,
                source,
            })?;
        Self::new(rules)
    }

    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &TopicRule> {
        self.rules.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

pub const AI_REPLY: &str = "人工智能（AI）是计算机科学的一个分支，致力于创建能够模拟人类智能的系统。它包括机器学习、深度学习、自然语言处理等技术。现代AI已经在图像识别、语音识别、自动驾驶等领域取得了重大突破。";

pub const QUANTUM_REPLY: &str = "量子计算是一种利用量子力学原理进行计算的新型计算方式。与传统计算机使用比特（0或1）不同，量子计算机使用量子比特，可以同时处于多个状态。这使得量子计算机在某些特定问题上具有指数级的速度优势。";

pub const MACHINE_LEARNING_REPLY: &str = "机器学习是人工智能的核心技术之一，它使计算机能够从数据中学习并改进性能，而无需明确编程。常见的机器学习方法包括监督学习、无监督学习和强化学习。";

pub const BLOCKCHAIN_REPLY: &str = "区块链是一种分布式账本技术，通过加密算法确保数据的安全性和不可篡改性。它最初作为比特币的底层技术，现在已经扩展到金融、供应链、医疗等多个领域。";

const BUILTIN_TOPICS: [(&str, &str); 4] = [
    ("人工智能", AI_REPLY),
    ("量子计算", QUANTUM_REPLY),
    ("机器学习", MACHINE_LEARNING_REPLY),
    ("区块链", BLOCKCHAIN_REPLY),
];

pub(super) const GREETING_WORDS: [&str; 5] = ["你好", "您好", "嗨", "hi", "hello"];
pub(super) const POETRY_WORDS: [&str; 3] = ["诗", "诗歌", "写诗"];
pub(super) const THANKS_WORDS: [&str; 3] = ["谢谢", "感谢", "thank"];
pub(super) const CAPABILITY_WORDS: [&str; 4] = ["你能", "你会", "功能", "能做什么"];

pub const GREETING_REPLY: &str = "你好！我是AI助手，很高兴为您服务。有什么我可以帮助您的吗？";

pub const POEM_REPLY: &str = "春风拂面花满枝，\n莺歌燕舞醉人时。\n碧水青山相映美，\n人间四月好风姿。\n\n这是我为您创作的一首关于春天的诗，希望您喜欢！";

pub const THANKS_REPLY: &str = "不客气！很高兴能帮到您。如果您还有其他问题，随时告诉我！";

pub const CAPABILITY_REPLY: &str = "我可以帮您：\n• 回答各种问题\n• 解释复杂概念\n• 创作诗歌和文章\n• 进行知识探讨\n• 提供学习建议\n还有更多功能等您探索！";

pub const FILLER_PHRASES: [&str; 5] = [
    "这是一个很好的问题！作为AI助手，我可以帮助您探索各种话题。",
    "让我想想...这个话题确实很有趣。",
    "基于我的理解，我认为这个问题可以从多个角度来分析。",
    "很高兴能和您讨论这个话题！",
    "这是一个深入的问题，让我为您详细解答。",
];

/// Sentence that follows the echoed input in a fallback reply
pub const FALLBACK_CLOSING: &str = "我理解您想了解更多相关信息。虽然我是一个演示版本的LLM，但我会尽力为您提供有价值的回答。您能否告诉我您具体想了解哪方面的内容呢？";

/// Build the fallback reply around the verbatim user input
#[must_use]
pub fn fallback_reply(filler: &str, original: &str) -> String {
    format!("{filler} 关于\"{original}\"，{FALLBACK_CLOSING}")
}
