//! 课程处理器 - 编排层
//!
//! ## 职责
//!
//! 1. 委托 `CourseTreeScraper` 发现课程结构（顺序进行，每层依赖上一层页面）
//! 2. 用 Semaphore 限制并发，为每个主题启动一个提取任务
//! 3. 按文档顺序把提取结果挂回课程树
//! 4. 汇总统计（成功 / 跳过 / 失败）
//!
//! 单个主题失败只记日志并计数，不影响其他主题

use crate::clients::HtmlFetcher;
use crate::error::ScrapeError;
use crate::models::{CourseTree, ReplacementTable, TopicContent};
use crate::services::{ContentExtractor, CourseTreeScraper, SiteLayout, TopicLocation};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// 主题提取统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScrapeStats {
    /// 成功提取的主题数
    pub extracted: usize,
    /// 跳过的测验页数
    pub skipped: usize,
    /// 提取失败的主题数
    pub failed: usize,
}

impl ScrapeStats {
    pub fn total(&self) -> usize {
        self.extracted + self.skipped + self.failed
    }
}

/// 单个主题任务的结果
enum TopicOutcome {
    Extracted(TopicContent),
    Skipped,
    Failed,
}

/// 课程处理器
pub struct CourseProcessor {
    scraper: CourseTreeScraper,
    extractor: Arc<ContentExtractor>,
    max_concurrent: usize,
}

impl CourseProcessor {
    pub fn new(
        fetcher: Arc<dyn HtmlFetcher>,
        layout: SiteLayout,
        replacements: ReplacementTable,
        max_concurrent: usize,
    ) -> Self {
        Self {
            scraper: CourseTreeScraper::new(fetcher.clone(), layout.clone(), replacements),
            extractor: Arc::new(ContentExtractor::new(fetcher, layout)),
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// 抓取整门课程：结构 + 每个主题的内容
    ///
    /// 只有课程页本身失败时返回错误；模块、单元、主题的失败都只跳过
    pub async fn scrape_course_content(
        &self,
        course_url: &str,
    ) -> Result<(CourseTree, ScrapeStats), ScrapeError> {
        let mut tree = self.scraper.scrape_course(course_url).await?;

        let locations = topic_locations(&tree);
        info!(
            "\n📄 开始提取 {} 个主题（最大并发: {}）",
            locations.len(),
            self.max_concurrent
        );

        let outcomes = self.extract_all(locations).await;

        let mut stats = ScrapeStats::default();
        for ((module_idx, unit_idx, topic_idx), outcome) in outcomes {
            let content = match outcome {
                TopicOutcome::Extracted(content) => {
                    stats.extracted += 1;
                    content
                }
                TopicOutcome::Skipped => {
                    stats.skipped += 1;
                    continue;
                }
                TopicOutcome::Failed => {
                    stats.failed += 1;
                    continue;
                }
            };

            if let Some(topic) = tree
                .modules
                .get_mut(module_idx)
                .and_then(|m| m.units.get_mut(unit_idx))
                .and_then(|u| u.topics.get_mut(topic_idx))
            {
                topic.content = Some(content);
            }
        }

        Ok((tree, stats))
    }

    /// 并发提取所有主题，结果顺序与输入一致
    async fn extract_all(
        &self,
        locations: Vec<(TopicIndex, TopicLocation)>,
    ) -> Vec<(TopicIndex, TopicOutcome)> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let total = locations.len();

        let handles = locations
            .into_iter()
            .enumerate()
            .map(|(i, (index, location))| {
                let semaphore = semaphore.clone();
                let extractor = self.extractor.clone();
                let handle = tokio::spawn(async move {
                    let _permit = match semaphore.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(e) => {
                            error!("[主题 {}/{}] 无法获取并发许可: {}", i + 1, total, e);
                            return TopicOutcome::Failed;
                        }
                    };
                    extract_one(&extractor, &location, i + 1, total).await
                });
                (index, handle)
            });

        let (indices, handles): (Vec<_>, Vec<_>) = handles.unzip();
        let results = join_all(handles).await;

        indices
            .into_iter()
            .zip(results)
            .map(|(index, result)| {
                let outcome = result.unwrap_or_else(|e| {
                    error!("主题任务执行失败: {}", e);
                    TopicOutcome::Failed
                });
                (index, outcome)
            })
            .collect()
    }
}

/// (模块, 单元, 主题) 在课程树中的下标
type TopicIndex = (usize, usize, usize);

/// 按文档顺序展开所有主题
fn topic_locations(tree: &CourseTree) -> Vec<(TopicIndex, TopicLocation)> {
    let mut locations = Vec::with_capacity(tree.topic_count());
    for (module_idx, module) in tree.modules.iter().enumerate() {
        for (unit_idx, unit) in module.units.iter().enumerate() {
            for (topic_idx, topic) in unit.topics.iter().enumerate() {
                locations.push((
                    (module_idx, unit_idx, topic_idx),
                    TopicLocation {
                        course: tree.course.clone(),
                        module: module.name.clone(),
                        unit: unit.name.clone(),
                        topic: topic.name.clone(),
                        url: topic.url.clone(),
                    },
                ));
            }
        }
    }
    locations
}

async fn extract_one(
    extractor: &ContentExtractor,
    location: &TopicLocation,
    index: usize,
    total: usize,
) -> TopicOutcome {
    match extractor.extract_topic_content(location).await {
        Ok(Some(content)) => {
            info!("[主题 {}/{}] ✓ {}", index, total, location.topic);
            TopicOutcome::Extracted(content)
        }
        Ok(None) => {
            info!("[主题 {}/{}] ⏭️ 跳过测验: {}", index, total, location.topic);
            TopicOutcome::Skipped
        }
        Err(e) => {
            warn!("[主题 {}/{}] ⚠️ 提取失败 '{}': {}", index, total, location.topic, e);
            TopicOutcome::Failed
        }
    }
}
