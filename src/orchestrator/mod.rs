//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，只做组装、并发控制和统计，不做具体业务判断。
//!
//! ## 模块划分
//!
//! ### `course_processor` - 课程处理器
//! - 委托 `CourseTreeScraper` 发现课程结构
//! - 用 Semaphore 控制主题提取的并发数量
//! - 按文档顺序挂回结果，输出抓取统计
//!
//! ### `app` - 应用入口
//! - 按命令组装客户端、流程和配置文件
//! - 写输出文件
//!
//! ## 层次关系
//!
//! ```text
//! app (按命令组装)
//!     ↓
//! course_processor (处理整门课程)      workflow::QuizFlow (处理一次生成请求)
//!     ↓                                   ↓
//! services (能力层：scraper / extractor / parser / validator)
//!     ↓
//! clients (基础设施：HtmlFetcher / CompletionClient)
//! ```

pub mod app;
pub mod course_processor;

// 重新导出主要类型
pub use app::{write_json, App};
pub use course_processor::{CourseProcessor, ScrapeStats};
