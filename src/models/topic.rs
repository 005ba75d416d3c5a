use serde::{Deserialize, Serialize};

/// 图片描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// 按出现顺序命名：image1, image2, ...
    pub image_name: String,
    pub image_src: String,
    pub image_alt: String,
}

/// 嵌入视频描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInfo {
    /// 按出现顺序命名：video1, video2, ...
    pub name: String,
    pub video_src: String,
}

/// 一个主题页面的抓取结果
///
/// 练习页只填充 `exercise`，普通页只填充 `images`（页面没有图片时两者都可能为空）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicContent {
    pub course: String,
    pub module: String,
    pub unit: String,
    pub topic: String,
    /// 非空正文
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ImageInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<VideoInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise: Option<String>,
}

/// 主题页面类型，由主题名称决定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicKind {
    /// 普通课程页
    Lesson,
    /// 练习页：最后一个链接是练习入口
    Exercise,
    /// 测验页：整页跳过
    Assessment,
}

impl TopicKind {
    /// 根据主题名称判断页面类型（不区分大小写）
    pub fn from_topic_name(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower.contains("assessment") {
            TopicKind::Assessment
        } else if lower.contains("exercise") {
            TopicKind::Exercise
        } else {
            TopicKind::Lesson
        }
    }
}
