use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;

/// 选项字母，固定为 A–D
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
}

impl OptionLetter {
    /// 从字符解析（不区分大小写）
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(OptionLetter::A),
            'B' => Some(OptionLetter::B),
            'C' => Some(OptionLetter::C),
            'D' => Some(OptionLetter::D),
            _ => None,
        }
    }

    /// 小写形式，作为选项映射的键
    pub fn as_str(self) -> &'static str {
        match self {
            OptionLetter::A => "a",
            OptionLetter::B => "b",
            OptionLetter::C => "c",
            OptionLetter::D => "d",
        }
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OptionLetter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// 选项映射，插入顺序即展示顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionOptions(Vec<(OptionLetter, String)>);

impl QuestionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入选项；重复字母覆盖旧值但保留原位置
    pub fn insert(&mut self, letter: OptionLetter, text: impl Into<String>) {
        let text = text.into();
        match self.0.iter_mut().find(|(l, _)| *l == letter) {
            Some(entry) => entry.1 = text,
            None => self.0.push((letter, text)),
        }
    }

    pub fn get(&self, letter: OptionLetter) -> Option<&str> {
        self.0
            .iter()
            .find(|(l, _)| *l == letter)
            .map(|(_, text)| text.as_str())
    }

    pub fn contains(&self, letter: OptionLetter) -> bool {
        self.get(letter).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (OptionLetter, &str)> {
        self.0.iter().map(|(l, text)| (*l, text.as_str()))
    }
}

impl<S: Into<String>> FromIterator<(OptionLetter, S)> for QuestionOptions {
    fn from_iter<I: IntoIterator<Item = (OptionLetter, S)>>(iter: I) -> Self {
        let mut options = QuestionOptions::new();
        for (letter, text) in iter {
            options.insert(letter, text);
        }
        options
    }
}

impl Serialize for QuestionOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (letter, text) in &self.0 {
            map.serialize_entry(letter.as_str(), text)?;
        }
        map.end()
    }
}

/// 题目来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionSource {
    /// 从 LLM 响应中解析得到
    Parsed,
    /// 解析失败时的模板兜底题目，内容未经校验
    Fallback,
}

/// 生成的一道练习题
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub id: String,
    pub question: String,
    pub options: QuestionOptions,
    pub correct_answer: OptionLetter,
    pub explanation: String,
    /// 在本批次中的序号
    pub number: u32,
    pub source: QuestionSource,
}

impl GeneratedQuestion {
    pub fn is_fallback(&self) -> bool {
        self.source == QuestionSource::Fallback
    }
}

/// `generate_questions` 的返回结果
///
/// 成功时带 `totalQuestions` / `enhancedMode`，失败时带 `error` 且题目为空
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub success: bool,
    pub questions: Vec<GeneratedQuestion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_questions: Option<usize>,
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enhanced_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QuizResult {
    pub fn success(topic: impl Into<String>, questions: Vec<GeneratedQuestion>) -> Self {
        Self {
            success: true,
            total_questions: Some(questions.len()),
            questions,
            topic: topic.into(),
            enhanced_mode: Some(true),
            error: None,
        }
    }

    pub fn failure(topic: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            questions: Vec::new(),
            total_questions: None,
            topic: topic.into(),
            enhanced_mode: None,
            error: Some(error.into()),
        }
    }
}

/// 一致性探测结果：同一概念的多种问法，原样返回模型输出
#[derive(Debug, Clone, Serialize)]
pub struct ConsistencyProbe {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variations: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
