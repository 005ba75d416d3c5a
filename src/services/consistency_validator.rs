//! 一致性校验 - 业务能力层
//!
//! 按核心概念归组已生成的题目，同一概念出现不同正确答案时报告冲突。
//! 概念提取只是在固定词表上做子串匹配，用来粗略检查多次生成之间是否自相矛盾，
//! 不判断答案本身是否正确。
//!
//! 状态属于单个会话（由 `QuizFlow` 持有），不跨会话共享

use crate::models::OptionLetter;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// 领域术语词表（小写）
pub const CONCEPT_VOCABULARY: &[&str] = &[
    "azure openai",
    "gpt",
    "completions",
    "embeddings",
    "cognitive services",
    "computer vision",
    "speech services",
    "language understanding",
    "luis",
    "qna maker",
    "bot framework",
    "custom vision",
    "form recognizer",
    "translator",
    "content moderator",
    "personalizer",
    "anomaly detector",
];

/// 归一化时去掉的停用词
const STOPWORDS: &[&str] = &[
    "el", "la", "de", "en", "para", "con", "por", "a", "es", "son", "está", "están",
];

/// 某个概念下记录的一道题
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConceptRecord {
    pub question: String,
    pub normalized: String,
    pub answer: OptionLetter,
    pub explanation: String,
}

/// 同一概念下答案不一致的记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inconsistency {
    pub concept: String,
    pub conflicting_records: Vec<ConceptRecord>,
}

/// 一致性校验器
#[derive(Debug, Default)]
pub struct ConsistencyValidator {
    concept_answers: BTreeMap<String, Vec<ConceptRecord>>,
}

impl ConsistencyValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一道题的答案
    ///
    /// 题干不含任何词表术语时不记录，返回 `None`；否则返回概念键
    pub fn record_answer(
        &mut self,
        question: &str,
        correct_answer: OptionLetter,
        explanation: &str,
    ) -> Option<String> {
        let concept = extract_core_concept(question)?;

        self.concept_answers
            .entry(concept.clone())
            .or_default()
            .push(ConceptRecord {
                question: question.to_string(),
                normalized: normalize_question(question),
                answer: correct_answer,
                explanation: explanation.to_string(),
            });

        Some(concept)
    }

    /// 所有出现多个不同正确答案的概念，按概念键排序
    pub fn list_inconsistencies(&self) -> Vec<Inconsistency> {
        self.concept_answers
            .iter()
            .filter(|(_, records)| {
                records
                    .iter()
                    .map(|r| r.answer)
                    .collect::<BTreeSet<_>>()
                    .len()
                    > 1
            })
            .map(|(concept, records)| Inconsistency {
                concept: concept.clone(),
                conflicting_records: records.clone(),
            })
            .collect()
    }

    /// 已记录的概念数
    pub fn concept_count(&self) -> usize {
        self.concept_answers.len()
    }

    pub fn records_for(&self, concept: &str) -> &[ConceptRecord] {
        self.concept_answers
            .get(concept)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// 提取核心概念：匹配到的术语排序后用 `_` 连接
pub fn extract_core_concept(question: &str) -> Option<String> {
    let lower = question.to_lowercase();
    let mut found: Vec<&str> = CONCEPT_VOCABULARY
        .iter()
        .copied()
        .filter(|term| lower.contains(term))
        .collect();

    if found.is_empty() {
        return None;
    }
    found.sort_unstable();
    Some(found.join("_"))
}

/// 归一化题干：小写、去标点、去停用词、合并空白
pub fn normalize_question(question: &str) -> String {
    let lower = question.to_lowercase();
    let stripped: String = lower
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '_')
        .collect();

    stripped
        .split_whitespace()
        .filter(|word| !STOPWORDS.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}
