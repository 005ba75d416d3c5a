//! 命令行参数定义

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "exam-gen",
    version,
    about = "Scrape Microsoft Learn training content and generate exam practice questions"
)]
pub struct Cli {
    /// 输出 debug 级别日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scrape a course (modules, units and topic content) into a JSON file
    ///
    /// Example: exam-gen scrape https://learn.microsoft.com/en-us/training/courses/ai-102t00
    Scrape {
        /// Course landing page URL
        course_url: String,

        /// Output file (default: <OUTPUT_DIR>/course.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate multiple-choice practice questions for a topic
    Quiz {
        /// Topic to generate questions about
        topic: String,

        /// Number of questions to request
        #[arg(short, long, default_value_t = 5)]
        count: usize,

        /// Also write the result to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Ask the model for several phrasings of the same concept
    Consistency {
        /// Concept to probe
        topic: String,

        /// Number of variations
        #[arg(long, default_value_t = 3)]
        variations: usize,
    },
}
