//! # Exam Gen
//!
//! 抓取 Microsoft Learn 培训内容，并用 LLM 生成带答案和解析的认证练习题
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 只暴露外部能力，不含业务判断
//! - `HtmlFetcher` - 获取页面 HTML（ScrapingAnt 代理或直接请求）
//! - `CompletionClient` - 给定提示词返回模型输出
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `CourseTreeScraper` - 发现 course → module → unit → topic 结构
//! - `ContentExtractor` - 提取单个主题页面的正文、链接、图片、视频
//! - `QuestionParser` - 从 LLM 文本中恢复结构化题目，解析失败时有兜底题目
//! - `ConsistencyValidator` - 检测同一概念的答案冲突
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次生成请求"的完整流程
//! - `QuizFlow` - 提示词 → LLM → 解析 → 兜底 → 一致性记录
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/course_processor` - 整门课程的抓取，控制并发和统计
//! - `orchestrator/app` - 按命令组装各层、写输出文件
//!
//! ## 模块结构

pub mod cli;
pub mod clients;
pub mod config;
pub mod error;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{CourseTree, GeneratedQuestion, QuizResult, TopicContent};
pub use orchestrator::{App, CourseProcessor, ScrapeStats};
pub use workflow::QuizFlow;
