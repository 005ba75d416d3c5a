//! HTML 解析辅助函数
//!
//! `scraper::Html` 不是 `Send`，所以所有解析都在同步函数里完成，
//! 异步代码只在拿到 HTML 字符串之后调用这里的函数

use scraper::{ElementRef, Html, Selector};
use url::Url;

/// 编译 CSS 选择器，失败时返回可读的错误描述
pub fn parse_selector(css: &str) -> Result<Selector, String> {
    Selector::parse(css).map_err(|e| format!("无效的选择器 '{}': {}", css, e))
}

/// 读取 `<meta property="..." content="...">` 的内容
pub fn meta_property(document: &Html, property: &str) -> Option<String> {
    let selector = parse_selector(&format!(r#"meta[property="{}"]"#, property)).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}

/// 元素的可见文本：所有文本节点按空白切分后用单个空格连接
pub fn normalized_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// 把相对地址解析为绝对地址；已是绝对地址时保持不变
pub fn resolve_url(base: &Url, href: &str) -> Option<String> {
    base.join(href.trim()).ok().map(|url| url.to_string())
}

/// 确保地址以 `/` 结尾，便于把它当作目录使用
pub fn as_directory(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}
