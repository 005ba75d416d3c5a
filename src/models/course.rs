use serde::{Deserialize, Serialize};

use super::topic::TopicContent;

/// 课程结构树：course → modules → units → topics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseTree {
    pub course: String,
    pub url: String,
    pub modules: Vec<ModuleNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleNode {
    pub name: String,
    pub url: String,
    pub units: Vec<UnitNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitNode {
    pub name: String,
    pub url: String,
    pub topics: Vec<TopicNode>,
}

/// 主题节点；结构发现阶段只有名称和 URL，内容提取后填充 `content`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicNode {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<TopicContent>,
}

impl TopicNode {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            content: None,
        }
    }
}

impl CourseTree {
    /// 主题总数
    pub fn topic_count(&self) -> usize {
        self.modules
            .iter()
            .flat_map(|m| &m.units)
            .map(|u| u.topics.len())
            .sum()
    }

    /// 按文档顺序展开所有已提取的主题内容
    pub fn topic_contents(&self) -> Vec<&TopicContent> {
        self.modules
            .iter()
            .flat_map(|m| &m.units)
            .flat_map(|u| &u.topics)
            .filter_map(|t| t.content.as_ref())
            .collect()
    }

    /// 按文档顺序列出模块名称
    pub fn module_names(&self) -> Vec<&str> {
        self.modules.iter().map(|m| m.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> CourseTree {
        CourseTree {
            course: "AI-102".to_string(),
            url: "https://example.com/course".to_string(),
            modules: vec![ModuleNode {
                name: "Module 1".to_string(),
                url: "https://example.com/m1".to_string(),
                units: vec![UnitNode {
                    name: "Unit 1".to_string(),
                    url: "https://example.com/u1/".to_string(),
                    topics: vec![
                        TopicNode::new("Intro", "https://example.com/u1/1-intro"),
                        TopicNode::new("Summary", "https://example.com/u1/2-summary"),
                    ],
                }],
            }],
        }
    }

    #[test]
    fn test_topic_count_and_contents() {
        let mut tree = sample_tree();
        assert_eq!(tree.topic_count(), 2);
        assert!(tree.topic_contents().is_empty());

        tree.modules[0].units[0].topics[1].content = Some(TopicContent {
            course: "AI-102".to_string(),
            module: "Module 1".to_string(),
            unit: "Unit 1".to_string(),
            topic: "Summary".to_string(),
            text: "done".to_string(),
            links: None,
            images: None,
            videos: None,
            exercise: None,
        });
        let contents = tree.topic_contents();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0].topic, "Summary");
        assert_eq!(tree.module_names(), vec!["Module 1"]);
    }
}
