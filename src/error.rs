//! 错误类型
//!
//! 抓取阶段的错误（`ScrapeError`）只影响出错的分支，调用方记录日志后跳过；
//! 生成阶段的传输错误（`CompletionError`）由编排层转换为结构化的失败结果。

use thiserror::Error;

/// 外部抓取传输错误
#[derive(Debug, Error)]
pub enum FetchError {
    /// 网络请求失败（含超时）
    #[error("请求 {url} 失败: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// 返回了非成功状态码
    #[error("请求 {url} 返回状态码 {status}")]
    Status { url: String, status: u16 },
    /// 读取响应内容失败
    #[error("读取 {url} 的响应内容失败: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// 课程抓取错误
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// 发现课程结构时缺少预期的页面标记
    #[error("结构发现失败 ({url}): {reason}")]
    Discovery { url: String, reason: String },
    /// 提取主题内容时缺少内容容器或正文
    #[error("内容提取失败 ({url}): {reason}")]
    Extraction { url: String, reason: String },
    /// 页面获取失败
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl ScrapeError {
    pub fn discovery(url: impl Into<String>, reason: impl Into<String>) -> Self {
        ScrapeError::Discovery {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn extraction(url: impl Into<String>, reason: impl Into<String>) -> Self {
        ScrapeError::Extraction {
            url: url.into(),
            reason: reason.into(),
        }
    }
}

/// LLM 补全错误
#[derive(Debug, Error)]
pub enum CompletionError {
    /// API 调用失败
    #[error("LLM API 调用失败 (模型: {model}): {source}")]
    Request {
        model: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回内容为空
    #[error("LLM 返回内容为空 (模型: {model})")]
    EmptyContent { model: String },
    /// 请求构建失败
    #[error("LLM 请求构建失败: {reason}")]
    InvalidRequest { reason: String },
}

/// 静态配置文件错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件失败 ({path}): {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML解析失败 ({path}): {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("抓取错误: {0}")]
    Scrape(#[from] ScrapeError),
    #[error("获取错误: {0}")]
    Fetch(#[from] FetchError),
    #[error("LLM错误: {0}")]
    Completion(#[from] CompletionError),
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
