//! 题目生成流程 - 流程层
//!
//! 核心职责：定义"一次生成请求"的完整处理流程
//!
//! 流程顺序：
//! 1. 构建提示词（主题 + 受控术语 + 可选课程模块）
//! 2. 调用 LLM（只调用一次）
//! 3. 解析响应 → 无有效题目时使用兜底题目
//! 4. 解析出的题目写入一致性校验器

use tracing::{error, info, warn};

use crate::clients::{CompletionClient, CompletionOptions};
use crate::models::{ConsistencyProbe, CourseData, QuizResult};
use crate::services::prompt_builder::{build_consistency_prompt, build_quiz_prompt, MAX_CONTEXT_MODULES};
use crate::services::{
    fallback_questions, ConsistencyValidator, Inconsistency, QuestionParser, RegexQuestionParser,
};
use crate::utils::truncate_text;

/// 一致性探测使用的采样参数
const PROBE_OPTIONS: CompletionOptions = CompletionOptions {
    temperature: 0.2,
    max_tokens: 2000,
};

/// 题目生成流程
///
/// - 持有补全客户端、解析器和本会话的一致性校验器
/// - 并发使用时由调用方加锁，或者每个会话创建一个实例
pub struct QuizFlow<C: CompletionClient> {
    client: C,
    parser: Box<dyn QuestionParser>,
    validator: ConsistencyValidator,
    course_data: Option<CourseData>,
    options: CompletionOptions,
}

impl<C: CompletionClient> QuizFlow<C> {
    /// 创建新的题目生成流程
    pub fn new(
        client: C,
        course_data: Option<CourseData>,
        options: CompletionOptions,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            client,
            parser: Box::new(RegexQuestionParser::new()?),
            validator: ConsistencyValidator::new(),
            course_data,
            options,
        })
    }

    /// 替换解析策略
    pub fn with_parser(mut self, parser: Box<dyn QuestionParser>) -> Self {
        self.parser = parser;
        self
    }

    /// 生成练习题
    ///
    /// 只有 LLM 调用失败时返回失败结果；解析不出题目时返回 `count` 道兜底题目
    pub async fn generate_questions(&mut self, topic: &str, count: usize) -> QuizResult {
        let module_names = self
            .course_data
            .as_ref()
            .map(|data| data.module_names(MAX_CONTEXT_MODULES))
            .unwrap_or_default();

        let prompt = build_quiz_prompt(topic, count, &module_names);
        info!(
            "🤖 为主题 '{}' 生成 {} 道题目（课程模块上下文: {}）",
            truncate_text(topic, 40),
            count,
            module_names.len()
        );

        let content = match self.client.complete(&prompt, self.options).await {
            Ok(content) => content,
            Err(e) => {
                error!("❌ 题目生成失败: {}", e);
                return QuizResult::failure(
                    topic,
                    format!("Error generating optimized questions: {}", e),
                );
            }
        };

        let mut questions = self.parser.parse(&content);

        if questions.is_empty() {
            warn!(
                "⚠️ 未能从 LLM 响应中解析出题目，使用 {} 道兜底题目。响应预览: {}",
                count,
                truncate_text(&content, 80)
            );
            questions = fallback_questions(topic, count);
        } else {
            for question in &questions {
                self.validator.record_answer(
                    &question.question,
                    question.correct_answer,
                    &question.explanation,
                );
            }
            info!("✓ 解析出 {} 道题目", questions.len());
        }

        QuizResult::success(topic, questions)
    }

    /// 一致性探测：请求同一概念的多种问法，原样返回模型输出
    pub async fn probe_consistency(&self, topic: &str, variations: usize) -> ConsistencyProbe {
        let prompt = build_consistency_prompt(topic, variations);

        match self.client.complete(&prompt, PROBE_OPTIONS).await {
            Ok(content) => ConsistencyProbe {
                success: true,
                content: Some(content),
                topic: topic.to_string(),
                variations: Some(variations),
                error: None,
            },
            Err(e) => {
                error!("❌ 一致性探测失败: {}", e);
                ConsistencyProbe {
                    success: false,
                    content: None,
                    topic: topic.to_string(),
                    variations: None,
                    error: Some(format!("Error in consistency test: {}", e)),
                }
            }
        }
    }

    /// 本会话中答案冲突的概念
    pub fn list_inconsistencies(&self) -> Vec<Inconsistency> {
        self.validator.list_inconsistencies()
    }

    pub fn validator(&self) -> &ConsistencyValidator {
        &self.validator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompletionError;
    use crate::models::{GeneratedQuestion, OptionLetter};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 按顺序返回预设响应，并记录收到的提示词
    struct ScriptedClient {
        responses: Mutex<Vec<Result<String, CompletionError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn new(responses: Vec<Result<String, CompletionError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().rev().collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(
            &self,
            prompt: &str,
            _options: CompletionOptions,
        ) -> Result<String, CompletionError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(String::new()))
        }
    }

    fn options() -> CompletionOptions {
        CompletionOptions::new(0.1, 4000)
    }

    fn response(answer: char) -> Result<String, CompletionError> {
        Ok(format!(
            "QUESTION 1: Which Computer Vision feature reads printed text?\nA) OCR\nB) Tagging\nC) Captioning\nD) Face\nCORRECT ANSWER: {}\nEXPLANATION: The Read API performs OCR.",
            answer
        ))
    }

    #[tokio::test]
    async fn test_parsed_questions_are_returned_and_recorded() {
        let client = ScriptedClient::new(vec![response('A')]);
        let mut flow = QuizFlow::new(client, None, options()).unwrap();

        let result = flow.generate_questions("Computer Vision", 1).await;

        assert!(result.success);
        assert_eq!(result.total_questions, Some(1));
        assert_eq!(result.enhanced_mode, Some(true));
        assert!(!result.questions[0].is_fallback());
        assert_eq!(flow.validator().concept_count(), 1);
        assert!(flow.list_inconsistencies().is_empty());
    }

    #[tokio::test]
    async fn test_conflicting_answers_across_calls_are_reported() {
        let client = ScriptedClient::new(vec![response('A'), response('C')]);
        let mut flow = QuizFlow::new(client, None, options()).unwrap();

        flow.generate_questions("Computer Vision", 1).await;
        flow.generate_questions("Computer Vision", 1).await;

        let inconsistencies = flow.list_inconsistencies();
        assert_eq!(inconsistencies.len(), 1);
        assert_eq!(inconsistencies[0].concept, "computer vision");
    }

    #[tokio::test]
    async fn test_unparsable_response_falls_back_to_requested_count() {
        let client = ScriptedClient::new(vec![Ok("Sorry, I can't do that.".to_string())]);
        let mut flow = QuizFlow::new(client, None, options()).unwrap();

        let result = flow.generate_questions("Speech", 4).await;

        assert!(result.success);
        assert_eq!(result.questions.len(), 4);
        assert_eq!(result.total_questions, Some(4));
        assert!(result.questions.iter().all(GeneratedQuestion::is_fallback));
        // 兜底题目不进入一致性校验
        assert_eq!(flow.validator().concept_count(), 0);
    }

    #[tokio::test]
    async fn test_completion_error_becomes_failure_result() {
        let client = ScriptedClient::new(vec![Err(CompletionError::EmptyContent {
            model: "test-model".to_string(),
        })]);
        let mut flow = QuizFlow::new(client, None, options()).unwrap();

        let result = flow.generate_questions("Translator", 3).await;

        assert!(!result.success);
        assert!(result.questions.is_empty());
        assert_eq!(result.topic, "Translator");
        assert!(result.error.unwrap().contains("test-model"));
    }

    #[tokio::test]
    async fn test_course_modules_enrich_prompt() {
        let course_data: CourseData = serde_json::from_str(
            r#"{"modules":[{"name":"Create computer vision solutions"},{"name":"Develop NLP solutions"}]}"#,
        )
        .unwrap();
        let client = ScriptedClient::new(vec![response('A')]);
        let mut flow = QuizFlow::new(client, Some(course_data), options()).unwrap();

        flow.generate_questions("Computer Vision", 1).await;

        let prompts = flow.client.prompts.lock().unwrap();
        assert!(prompts[0].contains("• Create computer vision solutions"));
        assert!(prompts[0].contains("• Develop NLP solutions"));
    }

    struct FixedParser;

    impl QuestionParser for FixedParser {
        fn parse(&self, _raw_text: &str) -> Vec<GeneratedQuestion> {
            crate::services::fallback_questions("fixed", 1)
                .into_iter()
                .map(|mut q| {
                    q.correct_answer = OptionLetter::B;
                    q
                })
                .collect()
        }
    }

    #[tokio::test]
    async fn test_parser_can_be_swapped() {
        let client = ScriptedClient::new(vec![Ok("anything".to_string())]);
        let mut flow = QuizFlow::new(client, None, options())
            .unwrap()
            .with_parser(Box::new(FixedParser));

        let result = flow.generate_questions("Anything", 2).await;

        assert_eq!(result.questions.len(), 1);
        assert_eq!(result.questions[0].correct_answer, OptionLetter::B);
    }

    #[tokio::test]
    async fn test_probe_consistency() {
        let client = ScriptedClient::new(vec![Ok("QUESTION 1: ...".to_string())]);
        let flow = QuizFlow::new(client, None, options()).unwrap();

        let probe = flow.probe_consistency("Custom Vision", 3).await;

        assert!(probe.success);
        assert_eq!(probe.variations, Some(3));
        assert_eq!(probe.content.as_deref(), Some("QUESTION 1: ..."));
    }
}
