use async_trait::async_trait;
use exam_gen::clients::{CompletionClient, CompletionOptions, HtmlFetcher};
use exam_gen::error::{CompletionError, FetchError};
use exam_gen::models::{CourseData, OptionLetter, ReplacementTable};
use exam_gen::services::SiteLayout;
use exam_gen::{CourseProcessor, QuizFlow, ScrapeStats};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const TRAINING: &str = "https://learn.microsoft.com/en-us/training/";
const COURSE_URL: &str = "https://learn.microsoft.com/en-us/training/courses/ai-102t00";

/// 内存中的站点：按地址返回固定 HTML，并统计请求次数
struct FixtureSite {
    pages: HashMap<String, String>,
    requests: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl FixtureSite {
    fn new(pages: Vec<(String, &str)>) -> Self {
        Self {
            pages: pages
                .into_iter()
                .map(|(url, html)| (url, html.to_string()))
                .collect(),
            requests: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl HtmlFetcher for FixtureSite {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(url.to_string());
        self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

fn training(path: &str) -> String {
    format!("{}{}", TRAINING, path)
}

fn ai_102_site() -> FixtureSite {
    FixtureSite::new(vec![
        (
            COURSE_URL.to_string(),
            r#"<html><head>
                <meta property="og:title" content="Designing and Implementing a Microsoft Azure AI Solution">
                <meta name="learn_item" content="learn.wwl.prepare-for-ai-engineering">
                <meta name="learn_item" content="learn.wwl.create-computer-vision-solutions-azure-cognitive-services">
                <meta name="learn_item" content="learn.wwl.prepare-for-ai-engineering">
            </head><body></body></html>"#,
        ),
        // 第一个模块
        (
            training("paths/prepare-for-ai-engineering"),
            r#"<html><head><meta property="og:title" content="Get started with Azure AI"></head><body>
                <a href="../../modules/prepare-azure-ai-development/">Prepare for development</a>
                <a href="../../modules/prepare-azure-ai-development/">Prepare for development (again)</a>
                <a href="/en-us/azure/">Unrelated</a>
            </body></html>"#,
        ),
        (
            training("modules/prepare-azure-ai-development/"),
            r#"<html><body><h1>Prepare for Azure AI development</h1>
                <a class="unit-title" href="1-introduction">Introduction</a>
                <a class="unit-title" href="2-what-is-ai">What is AI?</a>
                <a class="unit-title" href="3-exercise">Exercise - Explore Azure AI</a>
                <a class="unit-title" href="4-knowledge-check">Module assessment</a>
                <a class="unit-title" href="https://learn.microsoft.com/en-us/training/modules/prepare-azure-ai-development/5-summary">Summary</a>
            </body></html>"#,
        ),
        (
            training("modules/prepare-azure-ai-development/1-introduction"),
            r#"<html><body><div id="module-unit-content">
                <p>Azure AI services help developers add intelligence.</p>
                <img src="../../wwl-data-ai/prepare-azure-ai-development/media/overview.png" alt="Overview">
                <div class="embeddedvideo"><iframe src="https://learn-video.azurefd.net/vod/player?id=intro"></iframe></div>
            </div></body></html>"#,
        ),
        // 2-what-is-ai 缺少内容容器
        (
            training("modules/prepare-azure-ai-development/2-what-is-ai"),
            r#"<html><body><main>Moved</main></body></html>"#,
        ),
        (
            training("modules/prepare-azure-ai-development/3-exercise"),
            r#"<html><body><div id="module-unit-content">
                <p>Try it yourself.</p>
                <a href="/en-us/azure/ai-services/">Azure AI services docs</a>
                <a href="https://microsoftlearning.github.io/mslearn-ai-services/Instructions/Exercises/01-use-azure-ai-services.html">Launch the exercise</a>
            </div></body></html>"#,
        ),
        (
            training("modules/prepare-azure-ai-development/5-summary"),
            r#"<html><body><div id="module-unit-content"><p>You learned the basics.</p></div></body></html>"#,
        ),
        // 第二个模块经替换表修正
        (
            training("paths/create-computer-vision-solutions-azure-ai"),
            r#"<html><head><meta property="og:title" content="Create computer vision solutions"></head><body>
                <a href="../../modules/analyze-images/">Analyze images</a>
                <a href="../../modules/missing-unit/">Missing unit</a>
            </body></html>"#,
        ),
        (
            training("modules/analyze-images/"),
            r#"<html><body><h1>Analyze images</h1>
                <a class="unit-title" href="1-introduction">Introduction</a>
            </body></html>"#,
        ),
        (
            training("modules/analyze-images/1-introduction"),
            r#"<html><body><div id="module-unit-content"><p>Azure AI Vision analyzes images.</p></div></body></html>"#,
        ),
    ])
}

fn replacements() -> ReplacementTable {
    ReplacementTable::new(HashMap::from([(
        "create-computer-vision-solutions-azure-cognitive-services".to_string(),
        "create-computer-vision-solutions-azure-ai".to_string(),
    )]))
}

fn processor(site: Arc<FixtureSite>, max_concurrent: usize) -> CourseProcessor {
    CourseProcessor::new(
        site,
        SiteLayout::from_training_base(TRAINING).unwrap(),
        replacements(),
        max_concurrent,
    )
}

#[tokio::test]
async fn test_scrape_full_course_tree() {
    let site = Arc::new(ai_102_site());
    let (tree, stats) = processor(site.clone(), 3)
        .scrape_course_content(COURSE_URL)
        .await
        .expect("课程抓取失败");

    assert_eq!(
        tree.course,
        "Designing and Implementing a Microsoft Azure AI Solution"
    );
    assert_eq!(
        tree.module_names(),
        vec!["Get started with Azure AI", "Create computer vision solutions"]
    );

    // 重复的单元链接只保留一次；缺失的单元被跳过
    assert_eq!(tree.modules[0].units.len(), 1);
    assert_eq!(tree.modules[1].units.len(), 1);
    assert_eq!(tree.topic_count(), 6);

    assert_eq!(
        stats,
        ScrapeStats {
            extracted: 4,
            skipped: 1,
            failed: 1
        }
    );

    let contents = tree.topic_contents();
    let topics: Vec<&str> = contents.iter().map(|c| c.topic.as_str()).collect();
    assert_eq!(
        topics,
        vec![
            "Introduction",
            "Exercise - Explore Azure AI",
            "Summary",
            "Introduction"
        ]
    );

    let intro = contents[0];
    assert_eq!(intro.module, "Get started with Azure AI");
    assert_eq!(intro.unit, "Prepare for Azure AI development");
    assert_eq!(
        intro.images.as_ref().unwrap()[0].image_src,
        "https://learn.microsoft.com/en-us/training/wwl-data-ai/prepare-azure-ai-development/media/overview.png"
    );
    assert_eq!(intro.videos.as_ref().unwrap()[0].name, "video1");

    let exercise = contents[1];
    assert_eq!(
        exercise.exercise.as_deref(),
        Some("https://microsoftlearning.github.io/mslearn-ai-services/Instructions/Exercises/01-use-azure-ai-services.html")
    );
    assert!(exercise.images.is_none());

    assert_eq!(contents[3].module, "Create computer vision solutions");

    // 测验页从不请求
    let requested = site.requested.lock().unwrap();
    assert!(!requested.iter().any(|url| url.ends_with("4-knowledge-check")));
}

#[tokio::test]
async fn test_scrape_output_serializes_as_course_data() {
    let site = Arc::new(ai_102_site());
    let (tree, _) = processor(site, 2)
        .scrape_course_content(COURSE_URL)
        .await
        .unwrap();

    // 抓取结果可以直接作为生成阶段的课程数据
    let json = serde_json::to_string(&tree).unwrap();
    let course_data: CourseData = serde_json::from_str(&json).unwrap();
    assert_eq!(
        course_data.module_names(3),
        vec!["Get started with Azure AI", "Create computer vision solutions"]
    );
}

#[tokio::test]
async fn test_course_without_markers_is_discovery_error() {
    let site = Arc::new(FixtureSite::new(vec![(
        COURSE_URL.to_string(),
        "<html><head><title>No markers</title></head></html>",
    )]));

    let result = processor(site.clone(), 2).scrape_course_content(COURSE_URL).await;

    assert!(matches!(
        result,
        Err(exam_gen::error::ScrapeError::Discovery { .. })
    ));
    assert_eq!(site.requests.load(Ordering::SeqCst), 1);
}

/// 按顺序返回预设响应的补全客户端
struct ScriptedCompletion {
    responses: Mutex<Vec<Result<String, CompletionError>>>,
}

impl ScriptedCompletion {
    fn new(responses: Vec<Result<String, CompletionError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().rev().collect()),
        }
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(
        &self,
        _prompt: &str,
        _options: CompletionOptions,
    ) -> Result<String, CompletionError> {
        self.responses
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

const TWO_QUESTIONS: &str = r#"Here are the questions you requested.

QUESTION 1: Which Azure service should you use to extract printed text from scanned invoices with Form Recognizer?
A) Form Recognizer prebuilt invoice model
B) Translator
C) Custom Vision
D) Bot Framework

CORRECT ANSWER: A Form Recognizer prebuilt invoice model
EXPLANATION: The prebuilt invoice model in Form Recognizer extracts key fields from invoices.
The other services do not provide document field extraction.

QUESTION 2: You need to detect the language of customer reviews. Which Text Analytics capability do you use?
A) Key phrase extraction
B) Language detection
C) Entity linking
D) Sentiment analysis

CORRECT ANSWER: B
EXPLANATION: Language detection returns the language of the input text."#;

fn options() -> CompletionOptions {
    CompletionOptions::new(0.1, 4000)
}

#[tokio::test]
async fn test_generate_questions_end_to_end() {
    let client = ScriptedCompletion::new(vec![Ok(TWO_QUESTIONS.to_string())]);
    let mut flow = QuizFlow::new(client, None, options()).unwrap();

    let result = flow.generate_questions("Azure AI Document Intelligence", 2).await;

    assert!(result.success);
    assert_eq!(result.total_questions, Some(2));
    assert_eq!(result.questions[0].correct_answer, OptionLetter::A);
    assert_eq!(result.questions[1].correct_answer, OptionLetter::B);
    assert!(result.questions[0]
        .explanation
        .ends_with("do not provide document field extraction."));

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["totalQuestions"], 2);
    assert_eq!(json["enhancedMode"], true);
    assert_eq!(json["questions"][1]["correctAnswer"], "b");
    assert_eq!(json["questions"][1]["options"]["b"], "Language detection");
    assert!(json.get("error").is_none());
}

#[tokio::test]
async fn test_fallback_and_failure_paths() {
    let client = ScriptedCompletion::new(vec![
        Ok("I'm unable to produce questions right now.".to_string()),
        Err(CompletionError::InvalidRequest {
            reason: "missing model".to_string(),
        }),
    ]);
    let mut flow = QuizFlow::new(client, None, options()).unwrap();

    let fallback = flow.generate_questions("Speech", 3).await;
    assert!(fallback.success);
    assert_eq!(fallback.questions.len(), 3);
    assert!(fallback.questions.iter().all(|q| q.is_fallback()));

    let failure = flow.generate_questions("Speech", 3).await;
    assert!(!failure.success);
    assert!(failure.questions.is_empty());
    let json = serde_json::to_value(&failure).unwrap();
    assert_eq!(json["questions"], serde_json::json!([]));
    assert!(json["error"].as_str().unwrap().contains("missing model"));
    assert!(json.get("totalQuestions").is_none());
}

#[tokio::test]
async fn test_inconsistency_detected_across_generations() {
    let first = "QUESTION 1: Which Translator feature converts documents?\nA) Document translation\nB) Text translation\nCORRECT ANSWER: A\nEXPLANATION: Document translation keeps formatting.";
    let second = "QUESTION 1: What does the Translator document API do?\nA) Text translation\nB) Document translation\nCORRECT ANSWER: B\nEXPLANATION: Document translation keeps formatting.";

    let client = ScriptedCompletion::new(vec![Ok(first.to_string()), Ok(second.to_string())]);
    let mut flow = QuizFlow::new(client, None, options()).unwrap();

    flow.generate_questions("Translator", 1).await;
    assert!(flow.list_inconsistencies().is_empty());

    flow.generate_questions("Translator", 1).await;
    let inconsistencies = flow.list_inconsistencies();
    assert_eq!(inconsistencies.len(), 1);
    assert_eq!(inconsistencies[0].concept, "translator");
    assert_eq!(inconsistencies[0].conflicting_records.len(), 2);
}
