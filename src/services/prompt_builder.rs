//! 提示词构建
//!
//! 题目提示词要求模型只使用受控术语表，并严格按照 `QuestionParser` 能识别的格式输出

/// 受控术语表，要求模型只用这些服务名称
pub const CONSISTENCY_KEYWORDS: &[&str] = &[
    "Azure OpenAI Service",
    "Cognitive Services",
    "Computer Vision API",
    "Speech Services",
    "Language Understanding",
    "LUIS",
    "Custom Vision",
    "Form Recognizer",
    "Text Analytics",
    "Translator",
    "Bot Framework",
];

const FOCUS_AREAS: &[&str] = &[
    "Azure OpenAI Service implementation and configuration",
    "Computer Vision API integration",
    "Speech Services and Language Understanding",
    "Responsible AI principles and governance",
    "Performance optimization and monitoring",
];

const EXAM_TIPS: &[&str] = &[
    "Look for Azure-native solutions first",
    "Consider cost optimization in answers",
    "Security and compliance are often key factors",
];

const CERTIFICATION: &str = "Microsoft AI-102";

/// 最多引用的课程模块数
pub const MAX_CONTEXT_MODULES: usize = 3;

/// 构建题目生成提示词
///
/// # 参数
/// - `topic`: 主题
/// - `count`: 题目数量
/// - `module_names`: 课程数据中的模块名称，只取前三个
pub fn build_quiz_prompt(topic: &str, count: usize, module_names: &[String]) -> String {
    let mut context_parts = vec![
        format!("TOPIC: {}", topic),
        format!("CERTIFICATION: {}", CERTIFICATION),
        "MANDATORY CONSISTENT TERMINOLOGY:".to_string(),
        CONSISTENCY_KEYWORDS
            .iter()
            .take(10)
            .copied()
            .collect::<Vec<_>>()
            .join(", "),
    ];

    if !module_names.is_empty() {
        context_parts.push("\nAVAILABLE COURSE MODULES:".to_string());
        for name in module_names.iter().take(MAX_CONTEXT_MODULES) {
            context_parts.push(format!("  • {}", name));
        }
    }

    context_parts.push("\nMAXIMUM FOCUS AREAS:".to_string());
    context_parts.extend(FOCUS_AREAS.iter().take(3).map(|area| format!("• {}", area)));
    context_parts.push("\nAPPLICABLE EXAM TIPS:".to_string());
    context_parts.extend(EXAM_TIPS.iter().map(|tip| format!("• {}", tip)));

    let full_context = context_parts.join("\n");

    format!(
        r#"You are an expert specialized in {certification} certifications with access to official documentation.

ENHANCED CONTEXT:
{full_context}

GENERATE EXACTLY {count} QUESTIONS following this EXACT structure:

QUESTION [number]: [Specific question about the topic using official terminology]
A) [Option A - use consistent terminology]
B) [Option B - use consistent terminology]
C) [Option C - use consistent terminology]
D) [Option D - use consistent terminology]

CORRECT ANSWER: [A/B/C/D] [Complete text of the correct option]
EXPLANATION: [Detailed explanation of why it's correct and why the others are incorrect. Include specific technical concepts and references to official documentation when applicable.]

STRICT RULES:
1. USE ONLY terminology from the provided official list
2. ALL questions must be verifiable against Microsoft documentation
3. MAINTAIN absolute consistency in Azure service names
4. Explanations must be educational and technically accurate
5. Each question must simulate the real AI-102 exam

DISTRIBUTION:
• 40% Technical implementation (configuration, APIs, integration)
• 35% Setup and configuration (endpoints, authentication, resources)
• 25% Concepts and best practices (security, optimization, monitoring)

QUALITY:
- Difficulty level: Intermediate-Advanced (like the real exam)
- Answers based ONLY on official Microsoft documentation
- Explanations that teach key exam concepts
- Realistic scenarios that an Azure AI Engineer would face

EVERYTHING IN ENGLISH"#,
        certification = CERTIFICATION,
        full_context = full_context,
        count = count,
    )
}

/// 构建一致性探测提示词：同一概念的多种问法，答案应保持一致
pub fn build_consistency_prompt(topic: &str, variations: usize) -> String {
    format!(
        r#"Generate {variations} variations of questions on the same technical concept: {topic}

IMPORTANT: All questions must have the SAME conceptually correct answer, but formulated differently.

For each question, use this EXACT structure:

QUESTION [number]: [Variation of the question about {topic}]
A) [Option A]
B) [Option B]
C) [Option C]

CORRECT ANSWER: [A/B/C] [Answer text]
KEY CONCEPT: [The central technical concept being tested]

CONSISTENCY RULES:
1. The central technical concept must be identical in all variations
2. The correct answer must be conceptually the same
3. Only change the question formulation, not the evaluated concept
4. Use official Microsoft Azure technical terminology"#,
        variations = variations,
        topic = topic,
    )
}
