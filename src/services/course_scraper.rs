//! 课程结构发现 - 业务能力层
//!
//! 从课程首页出发，逐层发现 module → unit → topic，只收集名称和地址，
//! 不提取主题正文（正文由 `ContentExtractor` 负责）。
//!
//! 页面约定：
//! - 课程页：`<meta name="learn_item" content="learn.xxx.<module-path>">` 标记每个模块
//! - 模块页：`href` 以 `../../modules/` 开头的链接指向各个单元
//! - 单元页：`a.unit-title` 链接指向各个主题

use crate::clients::HtmlFetcher;
use crate::error::ScrapeError;
use crate::models::{CourseTree, ModuleNode, ReplacementTable, TopicNode, UnitNode};
use crate::services::html::{as_directory, meta_property, normalized_text, parse_selector};
use scraper::Html;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// 单元链接的相对前缀
const UNIT_HREF_PREFIX: &str = "../../modules/";

/// 培训站点的地址布局
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    /// 站点根，例如 `https://learn.microsoft.com/`
    pub site_root: Url,
    /// 培训根，例如 `https://learn.microsoft.com/en-us/training/`
    pub training_root: Url,
}

impl SiteLayout {
    pub fn from_training_base(training_base_url: &str) -> Result<Self, url::ParseError> {
        let training_root = Url::parse(&as_directory(training_base_url))?;
        let site_root = training_root.join("/")?;
        Ok(Self {
            site_root,
            training_root,
        })
    }

    /// 学习路径（模块）根地址
    pub fn paths_root(&self) -> String {
        format!("{}paths/", self.training_root)
    }
}

/// 课程结构发现服务
///
/// 单个模块或单元失败时记录日志并跳过，其余分支继续
pub struct CourseTreeScraper {
    fetcher: Arc<dyn HtmlFetcher>,
    layout: SiteLayout,
    replacements: ReplacementTable,
}

impl CourseTreeScraper {
    pub fn new(
        fetcher: Arc<dyn HtmlFetcher>,
        layout: SiteLayout,
        replacements: ReplacementTable,
    ) -> Self {
        Self {
            fetcher,
            layout,
            replacements,
        }
    }

    /// 发现课程下的全部模块、单元和主题
    ///
    /// 课程页本身获取失败或没有模块标记时返回错误
    pub async fn scrape_course(&self, course_url: &str) -> Result<CourseTree, ScrapeError> {
        info!("📚 正在发现课程结构: {}", course_url);

        let html = self.fetcher.fetch(course_url).await?;
        let (course_name, module_urls) =
            parse_course_page(&html, course_url, &self.layout, &self.replacements)?;

        info!("✓ 课程 '{}' 共 {} 个模块", course_name, module_urls.len());

        let mut modules = Vec::with_capacity(module_urls.len());
        for module_url in &module_urls {
            match self.scrape_module(module_url).await {
                Ok(module) => modules.push(module),
                Err(e) => warn!("⚠️ 跳过模块 {}: {}", module_url, e),
            }
        }

        Ok(CourseTree {
            course: course_name,
            url: course_url.to_string(),
            modules,
        })
    }

    /// 发现一个模块下的单元和主题
    pub async fn scrape_module(&self, module_url: &str) -> Result<ModuleNode, ScrapeError> {
        let html = self.fetcher.fetch(module_url).await?;
        let (module_name, unit_urls) = parse_module_page(&html, module_url, &self.layout)?;

        info!("  模块 '{}': {} 个单元", module_name, unit_urls.len());

        let mut units = Vec::with_capacity(unit_urls.len());
        for unit_url in &unit_urls {
            match self.scrape_unit(unit_url).await {
                Ok(unit) => units.push(unit),
                Err(e) => warn!("⚠️ 跳过单元 {}: {}", unit_url, e),
            }
        }

        Ok(ModuleNode {
            name: module_name,
            url: module_url.to_string(),
            units,
        })
    }

    /// 发现一个单元下的主题
    pub async fn scrape_unit(&self, unit_url: &str) -> Result<UnitNode, ScrapeError> {
        let html = self.fetcher.fetch(unit_url).await?;
        let unit = parse_unit_page(&html, unit_url)?;
        debug!("    单元 '{}': {} 个主题", unit.name, unit.topics.len());
        Ok(unit)
    }
}

/// 解析课程页，返回 (课程名称, 模块地址列表)
pub fn parse_course_page(
    html: &str,
    course_url: &str,
    layout: &SiteLayout,
    replacements: &ReplacementTable,
) -> Result<(String, Vec<String>), ScrapeError> {
    let document = Html::parse_document(html);
    let selector = parse_selector(r#"meta[name="learn_item"]"#)
        .map_err(|e| ScrapeError::discovery(course_url, e))?;

    let course_name =
        meta_property(&document, "og:title").unwrap_or_else(|| "Untitled course".to_string());

    let mut module_urls: Vec<String> = Vec::new();
    for marker in document.select(&selector) {
        let content = marker
            .value()
            .attr("content")
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ScrapeError::discovery(course_url, "learn_item 标记缺少 content 属性"))?;

        let module_url = module_url_for(content, layout, replacements);
        if !module_urls.contains(&module_url) {
            module_urls.push(module_url);
        }
    }

    if module_urls.is_empty() {
        return Err(ScrapeError::discovery(course_url, "未找到 learn_item 标记"));
    }

    Ok((course_name, module_urls))
}

/// 由 learn_item 标识推导模块地址：取最后一个 `.` 之后的部分，再经替换表修正
fn module_url_for(identifier: &str, layout: &SiteLayout, replacements: &ReplacementTable) -> String {
    let suffix = identifier.rsplit('.').next().unwrap_or(identifier);
    let path = replacements.resolve(suffix);

    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!("{}{}", layout.paths_root(), path.trim_start_matches('/'))
    }
}

/// 解析模块页，返回 (模块名称, 单元地址列表)
///
/// 单元地址按首次出现顺序去重
pub fn parse_module_page(
    html: &str,
    module_url: &str,
    layout: &SiteLayout,
) -> Result<(String, Vec<String>), ScrapeError> {
    let document = Html::parse_document(html);
    let selector =
        parse_selector("a[href]").map_err(|e| ScrapeError::discovery(module_url, e))?;

    let module_name =
        meta_property(&document, "og:title").unwrap_or_else(|| "Untitled module".to_string());

    let mut unit_urls: Vec<String> = Vec::new();
    for anchor in document.select(&selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if let Some(relative) = href.strip_prefix(UNIT_HREF_PREFIX) {
            let unit_url = format!("{}modules/{}", layout.training_root, relative);
            if !unit_urls.contains(&unit_url) {
                unit_urls.push(unit_url);
            }
        }
    }

    if unit_urls.is_empty() {
        return Err(ScrapeError::discovery(module_url, "未找到单元链接"));
    }

    Ok((module_name, unit_urls))
}

/// 解析单元页，返回带主题列表的单元节点
///
/// 主题按 `a.unit-title` 在文档中的顺序排列；任一主题缺少名称或链接都视为结构异常
pub fn parse_unit_page(html: &str, unit_url: &str) -> Result<UnitNode, ScrapeError> {
    let document = Html::parse_document(html);
    let title_selector = parse_selector("h1").map_err(|e| ScrapeError::discovery(unit_url, e))?;
    let topic_selector =
        parse_selector("a.unit-title").map_err(|e| ScrapeError::discovery(unit_url, e))?;

    let unit_name = document
        .select(&title_selector)
        .next()
        .map(normalized_text)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Untitled unit".to_string());

    let base = Url::parse(&as_directory(unit_url))
        .map_err(|e| ScrapeError::discovery(unit_url, format!("无效的单元地址: {}", e)))?;

    let mut topics = Vec::new();
    for anchor in document.select(&topic_selector) {
        let name = normalized_text(anchor);
        if name.is_empty() {
            return Err(ScrapeError::discovery(unit_url, "主题链接缺少名称"));
        }

        let href = anchor
            .value()
            .attr("href")
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or_else(|| {
                ScrapeError::discovery(unit_url, format!("主题 '{}' 缺少链接", name))
            })?;

        let topic_url = if href.starts_with("http") {
            href.to_string()
        } else {
            base.join(href)
                .map_err(|e| {
                    ScrapeError::discovery(unit_url, format!("无法解析主题链接 '{}': {}", href, e))
                })?
                .to_string()
        };

        topics.push(TopicNode::new(name, topic_url));
    }

    if topics.is_empty() {
        return Err(ScrapeError::discovery(unit_url, "未找到 unit-title 主题链接"));
    }

    Ok(UnitNode {
        name: unit_name,
        url: unit_url.to_string(),
        topics,
    })
}
