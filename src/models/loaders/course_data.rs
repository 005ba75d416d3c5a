//! 可选的课程数据
//!
//! 只用来给提示词补充模块名称；文件缺失或格式不对都不算错误

use serde::Deserialize;
use std::path::Path;
use tokio::fs;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseData {
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default)]
    pub modules: Vec<CourseDataModule>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CourseDataModule {
    #[serde(default)]
    pub name: Option<String>,
}

impl CourseData {
    /// 前 `limit` 个模块名称，缺名的模块按序号补全
    pub fn module_names(&self, limit: usize) -> Vec<String> {
        self.modules
            .iter()
            .take(limit)
            .enumerate()
            .map(|(i, module)| {
                module
                    .name
                    .clone()
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| format!("Module {}", i + 1))
            })
            .collect()
    }
}

/// 加载课程数据 JSON
pub async fn load_course_data(path: &Path) -> Option<CourseData> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!("课程数据不可用 ({}): {}", path.display(), e);
            return None;
        }
    };

    match serde_json::from_str::<CourseData>(&content) {
        Ok(data) => {
            tracing::info!(
                "已加载课程数据 '{}'，共 {} 个模块",
                data.course.as_deref().unwrap_or("未命名课程"),
                data.modules.len()
            );
            Some(data)
        }
        Err(e) => {
            tracing::warn!("课程数据解析失败，忽略 ({}): {}", path.display(), e);
            None
        }
    }
}
