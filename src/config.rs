/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    // --- 抓取配置 ---
    /// ScrapingAnt API 密钥，为空时直接请求目标站点
    pub scraping_api_key: String,
    pub scraping_endpoint: String,
    /// 单次页面请求超时（秒）
    pub fetch_timeout_secs: u64,
    /// 同时提取的主题数量
    pub max_concurrent_topics: usize,
    /// 培训站点根路径，以 `/` 结尾
    pub training_base_url: String,
    /// 模块标识替换表（TOML）
    pub replacement_table_path: String,
    /// 可选的课程数据（JSON），用于丰富提示词
    pub course_data_path: String,
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub temperature: f32,
    pub max_tokens: u32,
    // --- 输出 ---
    pub output_dir: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scraping_api_key: String::new(),
            scraping_endpoint: "https://api.scrapingant.com/v2/general".to_string(),
            fetch_timeout_secs: 60,
            max_concurrent_topics: 4,
            training_base_url: "https://learn.microsoft.com/en-us/training/".to_string(),
            replacement_table_path: "config/replacements.toml".to_string(),
            course_data_path: "data/course.json".to_string(),
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-3.5-turbo".to_string(),
            temperature: 0.1,
            max_tokens: 4000,
            output_dir: "output".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            scraping_api_key: std::env::var("SCRAPING_API_KEY").unwrap_or(default.scraping_api_key),
            scraping_endpoint: std::env::var("SCRAPING_ENDPOINT").unwrap_or(default.scraping_endpoint),
            fetch_timeout_secs: std::env::var("FETCH_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.fetch_timeout_secs),
            max_concurrent_topics: std::env::var("MAX_CONCURRENT_TOPICS").ok().and_then(|v| v.parse().ok()).filter(|n| *n > 0).unwrap_or(default.max_concurrent_topics),
            training_base_url: std::env::var("TRAINING_BASE_URL").map(with_trailing_slash).unwrap_or(default.training_base_url),
            replacement_table_path: std::env::var("REPLACEMENT_TABLE_PATH").unwrap_or(default.replacement_table_path),
            course_data_path: std::env::var("COURSE_DATA_PATH").unwrap_or(default.course_data_path),
            llm_api_key: std::env::var("LLM_API_KEY").unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            temperature: std::env::var("LLM_TEMPERATURE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.temperature),
            max_tokens: std::env::var("LLM_MAX_TOKENS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_tokens),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(default.output_dir),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }
}

fn with_trailing_slash(mut url: String) -> String {
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}
