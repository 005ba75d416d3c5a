//! 题目解析服务 - 业务能力层
//!
//! 从 LLM 的自由文本中恢复结构化题目。响应格式约定：
//!
//! ```text
//! QUESTION 1: <题干>
//! A) <选项>
//! B) <选项>
//! C) <选项>
//! D) <选项>
//! CORRECT ANSWER: B <可选的选项原文>
//! EXPLANATION: <解析，可跨多行>
//! ```
//!
//! 这是宽松的扫描而不是严格语法：缺任何必需部分的题目块直接丢弃，
//! 不影响相邻题目块。

use crate::models::{GeneratedQuestion, OptionLetter, QuestionOptions, QuestionSource};
use regex::Regex;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use tracing::debug;

/// 题目解析能力
///
/// 调用方只依赖这个接口，匹配策略可以整体替换（例如换成结构化输出）
pub trait QuestionParser: Send + Sync {
    fn parse(&self, raw_text: &str) -> Vec<GeneratedQuestion>;
}

/// 基于正则的题目解析器
pub struct RegexQuestionParser {
    question_marker: Regex,
    option_line: Regex,
    section_keyword: Regex,
    correct_answer: Regex,
    explanation: Regex,
}

impl RegexQuestionParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            question_marker: Regex::new(r"(?i)QUESTION\s*(\d+):")?,
            option_line: Regex::new(r"^([ABCD])\)\s*(.*)$")?,
            section_keyword: Regex::new(r"(?i)^(CORRECT\s*ANSWER|EXPLANATION):")?,
            correct_answer: Regex::new(r"(?i)CORRECT\s*ANSWER:\s*([ABCD])\b")?,
            explanation: Regex::new(r"(?is)EXPLANATION:\s*(.*)")?,
        })
    }

    /// 按 `QUESTION n:` 标记切分，返回 (题号, 题目块内容)
    ///
    /// 题号不是正整数的标记不算分隔符，留在所在题目块的文本里
    fn split_blocks<'a>(&self, raw_text: &'a str) -> Vec<(&'a str, &'a str)> {
        let markers: Vec<_> = self
            .question_marker
            .captures_iter(raw_text)
            .filter(|caps| {
                caps.get(1)
                    .and_then(|m| m.as_str().parse::<u32>().ok())
                    .is_some_and(|n| n > 0)
            })
            .collect();

        markers
            .iter()
            .enumerate()
            .filter_map(|(i, caps)| {
                let whole = caps.get(0)?;
                let number = caps.get(1)?.as_str();
                let end = markers
                    .get(i + 1)
                    .and_then(|next| next.get(0))
                    .map(|m| m.start())
                    .unwrap_or(raw_text.len());
                Some((number, &raw_text[whole.end()..end]))
            })
            .collect()
    }

    /// 解析单个题目块，缺少任何必需部分时返回 `None`
    fn parse_block(&self, number: &str, block: &str) -> Option<GeneratedQuestion> {
        let number: u32 = number.parse().ok().filter(|n| *n > 0)?;

        let content = block.trim();
        let mut lines = content.lines();
        let stem = lines.next()?.trim();
        // 第一行已经是选项或答案/解析，说明缺少题干
        if stem.is_empty() || self.option_line.is_match(stem) || self.section_keyword.is_match(stem) {
            debug!("题目 {} 缺少题干，丢弃", number);
            return None;
        }

        let mut options = QuestionOptions::new();
        for line in lines {
            if let Some(caps) = self.option_line.captures(line.trim()) {
                let letter = caps
                    .get(1)
                    .and_then(|m| m.as_str().chars().next())
                    .and_then(OptionLetter::from_char)?;
                let text = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
                options.insert(letter, text);
            }
        }
        if options.is_empty() {
            return None;
        }

        let correct_answer = self
            .correct_answer
            .captures(content)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().chars().next())
            .and_then(OptionLetter::from_char)?;
        if !options.contains(correct_answer) {
            debug!("题目 {} 的正确答案 {} 不在选项中，丢弃", number, correct_answer);
            return None;
        }

        let explanation = self
            .explanation
            .captures(content)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|e| !e.is_empty())?;

        Some(GeneratedQuestion {
            id: question_id(stem, number),
            question: stem.to_string(),
            options,
            correct_answer,
            explanation: explanation.to_string(),
            number,
            source: QuestionSource::Parsed,
        })
    }
}

impl QuestionParser for RegexQuestionParser {
    fn parse(&self, raw_text: &str) -> Vec<GeneratedQuestion> {
        let blocks = self.split_blocks(raw_text);
        let questions: Vec<GeneratedQuestion> = blocks
            .iter()
            .filter_map(|(number, block)| self.parse_block(number, block))
            .collect();

        debug!(
            "解析 LLM 响应: {} 个题目块，{} 道有效题目",
            blocks.len(),
            questions.len()
        );
        questions
    }
}

/// 题目标识：题干哈希 + 题号，只保证在同一响应内可区分
fn question_id(stem: &str, number: u32) -> String {
    let mut hasher = DefaultHasher::new();
    stem.hash(&mut hasher);
    format!("q_{:016x}_{}", hasher.finish(), number)
}
