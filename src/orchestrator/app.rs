//! 应用入口 - 编排层
//!
//! 按命令组装各层：加载配置文件、创建客户端、运行流程、写输出文件。
//! 本层使用 `anyhow`，下层的类型化错误在这里补充上下文。

use crate::clients::{fetcher_from_config, CompletionOptions, OpenAiCompletionClient};
use crate::config::Config;
use crate::models::{
    load_course_data, load_replacement_table, ConsistencyProbe, CourseTree, QuizResult,
};
use crate::orchestrator::course_processor::{CourseProcessor, ScrapeStats};
use crate::services::SiteLayout;
use crate::utils::logging;
use crate::workflow::QuizFlow;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// 课程抓取的默认输出文件名
const COURSE_OUTPUT_FILE: &str = "course.json";

/// 应用主结构
pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// 抓取整门课程并写入 JSON 文件
    ///
    /// # 参数
    /// - `course_url`: 课程首页地址
    /// - `output`: 输出文件，缺省为 `<output_dir>/course.json`
    pub async fn run_scrape(
        &self,
        course_url: &str,
        output: Option<PathBuf>,
    ) -> Result<(CourseTree, ScrapeStats)> {
        logging::log_startup("scrape");

        let replacements = load_replacement_table(Path::new(&self.config.replacement_table_path))
            .await
            .context("加载模块替换表失败")?;
        if !replacements.is_empty() {
            info!("📋 已加载 {} 条模块替换规则", replacements.len());
        }

        let layout = SiteLayout::from_training_base(&self.config.training_base_url)
            .with_context(|| format!("无效的培训站点地址: {}", self.config.training_base_url))?;
        let fetcher = fetcher_from_config(&self.config).context("创建页面抓取客户端失败")?;

        let processor = CourseProcessor::new(
            fetcher,
            layout,
            replacements,
            self.config.max_concurrent_topics,
        );
        let (tree, stats) = processor
            .scrape_course_content(course_url)
            .await
            .with_context(|| format!("抓取课程失败: {}", course_url))?;

        let output = output
            .unwrap_or_else(|| Path::new(&self.config.output_dir).join(COURSE_OUTPUT_FILE));
        write_json(&output, &tree).await?;

        logging::log_scrape_summary(&tree.course, &stats);
        info!("📚 模块: {}", tree.module_names().join(" | "));
        info!("💾 课程内容已保存至: {}", output.display());

        Ok((tree, stats))
    }

    /// 为一个主题生成练习题
    pub async fn run_quiz(
        &self,
        topic: &str,
        count: usize,
        output: Option<PathBuf>,
    ) -> Result<QuizResult> {
        logging::log_startup("quiz");

        let mut flow = self.quiz_flow().await?;
        let result = flow.generate_questions(topic, count).await;

        for inconsistency in flow.list_inconsistencies() {
            warn!(
                "⚠️ 概念 '{}' 存在 {} 条答案不一致的记录",
                inconsistency.concept,
                inconsistency.conflicting_records.len()
            );
        }

        logging::log_quiz_summary(&result);

        if let Some(output) = output {
            write_json(&output, &result).await?;
            info!("💾 题目已保存至: {}", output.display());
        }

        Ok(result)
    }

    /// 一致性探测
    pub async fn run_consistency_probe(
        &self,
        topic: &str,
        variations: usize,
    ) -> Result<ConsistencyProbe> {
        logging::log_startup("consistency");

        let flow = self.quiz_flow().await?;
        Ok(flow.probe_consistency(topic, variations).await)
    }

    async fn quiz_flow(&self) -> Result<QuizFlow<OpenAiCompletionClient>> {
        let course_data = load_course_data(Path::new(&self.config.course_data_path)).await;
        let client = OpenAiCompletionClient::new(&self.config);
        let options = CompletionOptions::new(self.config.temperature, self.config.max_tokens);

        QuizFlow::new(client, course_data, options).context("初始化题目解析器失败")
    }
}

/// 以格式化 JSON 写入文件，自动创建父目录
pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("无法创建输出目录: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(value).context("序列化输出失败")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("无法写入文件: {}", path.display()))?;
    Ok(())
}
