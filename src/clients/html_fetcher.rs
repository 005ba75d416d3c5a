/// HTML 获取客户端
///
/// 抓取层只依赖 `HtmlFetcher` 这一个能力：给定 URL 返回页面 HTML。
/// 生产环境通过 ScrapingAnt 代理获取，也可以直接请求目标站点。
use crate::config::Config;
use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// 页面获取能力
#[async_trait]
pub trait HtmlFetcher: Send + Sync {
    /// 获取页面 HTML
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// 通过 ScrapingAnt 通用接口获取页面
pub struct ScrapingAntFetcher {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl ScrapingAntFetcher {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_client(config.fetch_timeout_secs, &config.scraping_endpoint)?,
            endpoint: config.scraping_endpoint.clone(),
            api_key: config.scraping_api_key.clone(),
        })
    }
}

#[async_trait]
impl HtmlFetcher for ScrapingAntFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!("ScrapingAnt 获取: {}", url);

        let response = self
            .client
            .get(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .query(&[
                ("url", url),
                ("x-api-key", self.api_key.as_str()),
                ("browser", "false"),
            ])
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                source: e,
            })?;

        read_body(url, response).await
    }
}

/// 直接请求目标站点
pub struct DirectFetcher {
    client: Client,
}

impl DirectFetcher {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_client(config.fetch_timeout_secs, &config.training_base_url)?,
        })
    }
}

#[async_trait]
impl HtmlFetcher for DirectFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!("直接获取: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request {
                url: url.to_string(),
                source: e,
            })?;

        read_body(url, response).await
    }
}

/// 根据配置选择获取方式：配置了 ScrapingAnt 密钥时走代理
pub fn fetcher_from_config(config: &Config) -> Result<Arc<dyn HtmlFetcher>, FetchError> {
    if config.scraping_api_key.is_empty() {
        Ok(Arc::new(DirectFetcher::new(config)?))
    } else {
        Ok(Arc::new(ScrapingAntFetcher::new(config)?))
    }
}

fn build_client(timeout_secs: u64, url: &str) -> Result<Client, FetchError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| FetchError::Request {
            url: url.to_string(),
            source: e,
        })
}

async fn read_body(url: &str, response: reqwest::Response) -> Result<String, FetchError> {
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    response.text().await.map_err(|e| FetchError::Body {
        url: url.to_string(),
        source: e,
    })
}
