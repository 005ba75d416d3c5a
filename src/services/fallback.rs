//! 兜底题目
//!
//! LLM 响应中一道有效题目都解析不出来时，按主题生成固定模板的题目，
//! 保证调用方拿到请求的数量。这些题目没有经过校验，`source` 标记为 `Fallback`。

use crate::models::{GeneratedQuestion, OptionLetter, QuestionOptions, QuestionSource};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const FALLBACK_OPTIONS: [(OptionLetter, &str); 4] = [
    (OptionLetter::A, "Azure Cognitive Services"),
    (OptionLetter::B, "Azure OpenAI Service"),
    (OptionLetter::C, "Azure Machine Learning"),
    (OptionLetter::D, "Azure Bot Framework"),
];

/// 生成 `count` 道兜底题目
pub fn fallback_questions(topic: &str, count: usize) -> Vec<GeneratedQuestion> {
    let topic_lower = topic.to_lowercase();
    let topic_hash = {
        let mut hasher = DefaultHasher::new();
        topic.hash(&mut hasher);
        hasher.finish()
    };

    (1..=count)
        .map(|i| GeneratedQuestion {
            id: format!("fallback_q_{}_{:016x}", i, topic_hash),
            question: format!(
                "Which Azure service is most suitable for implementing {} solutions?",
                topic_lower
            ),
            options: FALLBACK_OPTIONS.into_iter().collect::<QuestionOptions>(),
            correct_answer: OptionLetter::A,
            explanation: format!(
                "Azure Cognitive Services provides pre-built AI capabilities that are ideal for {} implementations, offering quick deployment and reliable performance.",
                topic_lower
            ),
            number: i as u32,
            source: QuestionSource::Fallback,
        })
        .collect()
}
