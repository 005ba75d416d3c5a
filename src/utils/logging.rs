/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::QuizResult;
use crate::orchestrator::ScrapeStats;

/// 初始化全局日志
///
/// `RUST_LOG` 优先；否则按 `verbose` 选择 debug 或 info 级别
pub fn init(verbose: bool) {
    let default_level = if verbose { "exam_gen=debug" } else { "exam_gen=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 重复初始化（例如测试中）直接忽略
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `mode`: 运行模式（scrape / quiz / consistency）
pub fn log_startup(mode: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - {} 模式", mode);
    info!(
        "启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
}

/// 打印抓取统计信息
///
/// # 参数
/// - `course`: 课程名称
/// - `stats`: 抓取统计
pub fn log_scrape_summary(course: &str, stats: &ScrapeStats) {
    info!("\n{}", "=".repeat(60));
    info!("📊 课程抓取完成: {}", course);
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功提取: {}", stats.extracted);
    info!("⏭️ 跳过: {}", stats.skipped);
    info!("❌ 失败: {}", stats.failed);
    info!("{}", "=".repeat(60));
}

/// 打印题目生成结果摘要
pub fn log_quiz_summary(result: &QuizResult) {
    info!("\n{}", "─".repeat(60));
    if result.success {
        info!(
            "✓ 主题 '{}' 生成 {} 道题目",
            truncate_text(&result.topic, 40),
            result.questions.len()
        );
    } else {
        info!(
            "✗ 主题 '{}' 生成失败: {}",
            truncate_text(&result.topic, 40),
            result.error.as_deref().unwrap_or("未知错误")
        );
    }
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
