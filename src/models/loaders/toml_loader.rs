use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

/// 模块标识替换表
///
/// 部分课程页面上的 learn_item 标识末段与真实路径不一致，
/// 这里把已知的错误末段映射到修正后的路径
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReplacementTable {
    #[serde(default)]
    replacements: HashMap<String, String>,
}

impl ReplacementTable {
    pub fn new(replacements: HashMap<String, String>) -> Self {
        Self { replacements }
    }

    /// 查找修正路径，未登记时返回原值
    pub fn resolve<'a>(&'a self, suffix: &'a str) -> &'a str {
        self.replacements
            .get(suffix)
            .map(String::as_str)
            .unwrap_or(suffix)
    }

    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }
}

/// 从 TOML 文件加载替换表
///
/// 文件不存在时返回空表；文件存在但无法读取或解析时报错
pub async fn load_replacement_table(path: &Path) -> Result<ReplacementTable, ConfigError> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("替换表不存在，使用空表: {}", path.display());
            return Ok(ReplacementTable::default());
        }
        Err(e) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                source: e,
            })
        }
    };

    let table: ReplacementTable = toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        source: e,
    })?;

    tracing::info!("已加载 {} 条模块标识替换规则", table.len());
    Ok(table)
}
