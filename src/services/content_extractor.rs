//! 主题内容提取 - 业务能力层
//!
//! 只负责"把一个主题页面变成 `TopicContent`"，不关心遍历顺序和并发

use crate::clients::HtmlFetcher;
use crate::error::ScrapeError;
use crate::models::{ImageInfo, TopicContent, TopicKind, VideoInfo};
use crate::services::course_scraper::SiteLayout;
use crate::services::html::{normalized_text, parse_selector, resolve_url};
use scraper::{ElementRef, Html};
use std::sync::Arc;
use tracing::debug;

/// 主题页面的内容容器 id
const CONTENT_CONTAINER_ID: &str = "module-unit-content";

/// 图片地址中的相对培训路径
const RELATIVE_TRAINING_PREFIX: &str = "../../";

/// 主题在课程树中的位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicLocation {
    pub course: String,
    pub module: String,
    pub unit: String,
    pub topic: String,
    pub url: String,
}

impl TopicLocation {
    pub fn kind(&self) -> TopicKind {
        TopicKind::from_topic_name(&self.topic)
    }
}

/// 主题内容提取服务
pub struct ContentExtractor {
    fetcher: Arc<dyn HtmlFetcher>,
    layout: SiteLayout,
}

impl ContentExtractor {
    pub fn new(fetcher: Arc<dyn HtmlFetcher>, layout: SiteLayout) -> Self {
        Self { fetcher, layout }
    }

    /// 获取并解析一个主题页面
    ///
    /// 测验页不发请求，直接返回 `None`
    pub async fn extract_topic_content(
        &self,
        location: &TopicLocation,
    ) -> Result<Option<TopicContent>, ScrapeError> {
        if location.kind() == TopicKind::Assessment {
            debug!("跳过测验页: {}", location.topic);
            return Ok(None);
        }

        let html = self.fetcher.fetch(&location.url).await?;
        parse_topic_page(&html, location, &self.layout).map(Some)
    }
}

/// 解析主题页面
///
/// 缺少内容容器或正文为空时返回 `ScrapeError::Extraction`
pub fn parse_topic_page(
    html: &str,
    location: &TopicLocation,
    layout: &SiteLayout,
) -> Result<TopicContent, ScrapeError> {
    let url = location.url.as_str();
    let document = Html::parse_document(html);
    let container_selector = parse_selector(&format!("#{}", CONTENT_CONTAINER_ID))
        .map_err(|e| ScrapeError::extraction(url, e))?;

    let container = document.select(&container_selector).next().ok_or_else(|| {
        ScrapeError::extraction(url, format!("未找到 <div id='{}'>", CONTENT_CONTAINER_ID))
    })?;

    let text = normalized_text(container);
    if text.is_empty() {
        return Err(ScrapeError::extraction(url, "内容容器中没有文本"));
    }

    let all_links = extract_links(container, layout).map_err(|e| ScrapeError::extraction(url, e))?;
    let videos = extract_videos(container).map_err(|e| ScrapeError::extraction(url, e))?;

    let (links, images, exercise) = match location.kind() {
        TopicKind::Exercise => {
            let mut links = all_links;
            let exercise = links
                .pop()
                .ok_or_else(|| ScrapeError::extraction(url, "练习页没有练习链接"))?;
            (non_empty(links), None, Some(exercise))
        }
        _ => {
            let images = extract_images(container, layout).map_err(|e| ScrapeError::extraction(url, e))?;
            (non_empty(all_links), non_empty(images), None)
        }
    };

    Ok(TopicContent {
        course: location.course.clone(),
        module: location.module.clone(),
        unit: location.unit.clone(),
        topic: location.topic.clone(),
        text,
        links,
        images,
        videos: non_empty(videos),
        exercise,
    })
}

/// 所有链接，解析为站点下的绝对地址
fn extract_links(container: ElementRef<'_>, layout: &SiteLayout) -> Result<Vec<String>, String> {
    let selector = parse_selector("a[href]")?;
    Ok(container
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| resolve_url(&layout.site_root, href))
        .collect())
}

/// 所有图片，`../../` 开头的地址换成培训根地址
fn extract_images(container: ElementRef<'_>, layout: &SiteLayout) -> Result<Vec<ImageInfo>, String> {
    let selector = parse_selector("img")?;
    let training_root = layout.training_root.as_str();

    Ok(container
        .select(&selector)
        .enumerate()
        .map(|(index, img)| ImageInfo {
            image_name: format!("image{}", index + 1),
            image_src: img
                .value()
                .attr("src")
                .unwrap_or_default()
                .replace(RELATIVE_TRAINING_PREFIX, training_root),
            image_alt: img.value().attr("alt").unwrap_or_default().to_string(),
        })
        .collect())
}

/// `div.embeddedvideo` 中的 iframe 地址；没有 iframe 的容器也占用一个序号
fn extract_videos(container: ElementRef<'_>) -> Result<Vec<VideoInfo>, String> {
    let video_selector = parse_selector("div.embeddedvideo")?;
    let iframe_selector = parse_selector("iframe[src]")?;

    Ok(container
        .select(&video_selector)
        .enumerate()
        .filter_map(|(index, video_div)| {
            video_div
                .select(&iframe_selector)
                .next()
                .and_then(|iframe| iframe.value().attr("src"))
                .map(|src| VideoInfo {
                    name: format!("video{}", index + 1),
                    video_src: src.to_string(),
                })
        })
        .collect())
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
